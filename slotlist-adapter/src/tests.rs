use crate::*;

use std::sync::Arc;

use slotlist::{
    ListOptions, ScrollRequest, ScrollToEndParams, ScrollToIndexParams, Size,
};

fn items(n: u32) -> Vec<u32> {
    (0..n).collect()
}

fn fixed(size: f64) -> ListOptions<u32> {
    ListOptions::new()
        .with_get_fixed_item_size(move |_, _, _| Some(size))
        .with_draw_distance(0.0)
}

#[test]
fn tween_samples_and_retargets() {
    let mut tween = Tween::new(0.0, 100.0, 0, 100, Easing::Linear);
    assert_eq!(tween.sample(0), 0.0);
    assert_eq!(tween.sample(50), 50.0);
    assert_eq!(tween.sample(500), 100.0);
    assert!(!tween.is_done(99));
    assert!(tween.is_done(100));

    tween.retarget(50, 0.0, 10);
    assert_eq!(tween.from, 50.0);
    assert_eq!(tween.sample(60), 0.0);

    tween.shift(20.0);
    assert_eq!((tween.from, tween.to), (70.0, 20.0));

    for easing in [Easing::Linear, Easing::SmoothStep, Easing::EaseInOutCubic] {
        assert_eq!(easing.sample(0.0), 0.0);
        assert_eq!(easing.sample(1.0), 1.0);
    }
}

#[test]
fn programmatic_scroll_is_echoed_on_next_tick() {
    let mut c = Controller::new(fixed(50.0), items(100), 0).unwrap();
    c.on_layout(Size::new(320.0, 200.0), 0).unwrap();

    c.scroll_to_index(ScrollToIndexParams::new(10), 0).unwrap();
    assert_eq!(c.offset(), 500.0);
    assert_eq!(c.engine().scroll_target(), Some(500.0));
    assert_eq!(
        c.executed_ops(),
        [HostOp::ScrollTo(ScrollRequest {
            offset: 500.0,
            animated: false
        })]
    );

    c.tick(16).unwrap();
    assert_eq!(c.engine().scroll_target(), None);
    assert!(c.is_idle());
}

#[test]
fn animated_scroll_to_end_is_tweened() {
    let mut c = Controller::new(fixed(50.0), items(20), 0)
        .unwrap()
        .with_animation(100, Easing::Linear);
    c.on_layout(Size::new(320.0, 200.0), 0).unwrap();

    c.scroll_to_end(
        ScrollToEndParams {
            animated: true,
            ..Default::default()
        },
        0,
    )
    .unwrap();
    assert!(c.is_animating());
    assert_eq!(c.engine().scroll(), 0.0);

    let mut last = 0.0;
    for now_ms in [16u64, 32, 48, 64, 80, 96, 112] {
        if let Some(offset) = c.tick(now_ms).unwrap() {
            assert!(offset >= last);
            last = offset;
        }
    }
    assert!(!c.is_animating());
    assert_eq!(c.offset(), 800.0);
    assert_eq!(c.engine().scroll(), 800.0);
    assert_eq!(c.engine().scroll_target(), None);
    assert!(c.engine().is_at_end());
}

#[test]
fn user_scroll_interrupts_animation() {
    let mut c = Controller::new(fixed(50.0), items(40), 0)
        .unwrap()
        .with_animation(200, Easing::SmoothStep);
    c.on_layout(Size::new(320.0, 200.0), 0).unwrap();
    c.scroll_to_index(ScrollToIndexParams::new(30).animated(true), 0)
        .unwrap();
    c.tick(50).unwrap();
    assert!(c.is_animating());

    c.on_user_scroll(100.0, 60).unwrap();
    assert!(!c.is_animating());
    assert_eq!(c.engine().scroll(), 100.0);
    assert_eq!(c.engine().scroll_target(), None);
}

#[test]
fn prepend_is_compensated_through_the_host() {
    let options = ListOptions::<u32>::new()
        .with_key_extractor(|item, _| Arc::from(format!("msg-{item}")))
        .with_estimated_item_size(50.0)
        .with_draw_distance(0.0)
        .with_maintain_visible_content_position(true);
    let mut c = Controller::new(options, items(20), 0).unwrap();
    c.on_layout(Size::new(320.0, 200.0), 0).unwrap();
    c.layout_containers(1, |_, _| 50.0).unwrap();
    assert!(c.engine().containers_did_layout());

    c.on_user_scroll(500.0, 10).unwrap();
    c.layout_containers(11, |_, _| 50.0).unwrap();

    let mut data: Vec<u32> = (100..105).collect();
    data.extend(items(20));
    c.set_data(data, 20).unwrap();
    assert_eq!(c.executed_ops(), [HostOp::Adjust(250.0)]);
    assert_eq!(c.offset(), 750.0);

    c.tick(36).unwrap();
    let now = c.settle(36, 16, 20).unwrap();
    assert!(c.is_idle(), "still busy at {now}");
    assert_eq!(c.engine().scroll(), 750.0);
    assert_eq!(c.engine().visible_range().start_no_buffer, Some(15));
}

#[test]
fn removing_leading_items_keeps_the_offset_in_bounds() {
    let options = ListOptions::<u32>::new()
        .with_key_extractor(|item, _| Arc::from(item.to_string()))
        .with_estimated_item_size(100.0)
        .with_draw_distance(0.0)
        .with_maintain_visible_content_position(true);
    let mut c = Controller::new(options, items(20), 0).unwrap();
    c.on_layout(Size::new(320.0, 200.0), 0).unwrap();
    c.layout_containers(1, |_, _| 100.0).unwrap();
    c.on_user_scroll(10.0, 10).unwrap();

    c.set_data((1..20).collect(), 20).unwrap();
    assert_eq!(c.executed_ops(), [HostOp::Adjust(-10.0)]);
    assert_eq!(c.offset(), 0.0);

    let now = c.settle(20, 16, 20).unwrap();
    assert!(c.is_idle(), "still busy at {now}");
    assert_eq!(c.engine().scroll(), 0.0);
    assert_eq!(c.offset(), 0.0);
    assert!(c.engine().is_at_start());
    assert_eq!(c.engine().visible_range().start_no_buffer, Some(0));
}

#[test]
fn initial_scroll_index_converges_with_real_sizes() {
    let options = ListOptions::<u32>::new()
        .with_key_extractor(|item, _| Arc::from(item.to_string()))
        .with_estimated_item_size(100.0)
        .with_draw_distance(0.0)
        .with_initial_scroll_index(Some(10));
    let mut c = Controller::new(options, items(50), 0).unwrap();
    c.on_layout(Size::new(320.0, 400.0), 0).unwrap();
    assert_eq!(
        c.executed_ops().first(),
        Some(&HostOp::ScrollTo(ScrollRequest {
            offset: 1000.0,
            animated: false
        }))
    );

    let mut now = 0;
    for _ in 0..60 {
        now += 16;
        c.layout_containers(now, |_, _| 50.0).unwrap();
        c.tick(now).unwrap();
        let unmeasured = c
            .engine()
            .ids_in_view()
            .iter()
            .any(|key| c.engine().known_size(key).is_none());
        if c.is_idle() && !unmeasured {
            break;
        }
    }
    assert!(c.is_idle());
    assert_eq!(c.engine().item_position(10), Some(500.0));
    assert_eq!(c.engine().scroll(), 500.0);
    assert_eq!(c.offset(), 500.0);
    assert_eq!(c.engine().visible_range().start_no_buffer, Some(10));
    assert!(
        c.executed_ops()
            .iter()
            .any(|op| matches!(op, HostOp::Adjust(delta) if *delta < 0.0))
    );
}

#[test]
fn horizontal_controller_reports_x_offsets() {
    let mut c = Controller::new(fixed(50.0).with_horizontal(true), items(20), 0).unwrap();
    c.on_layout(Size::new(200.0, 40.0), 0).unwrap();
    c.scroll_to_index(ScrollToIndexParams::new(10), 0).unwrap();
    c.tick(16).unwrap();
    assert_eq!(c.engine().scroll_target(), None);
    assert_eq!(c.engine().visible_range().start_no_buffer, Some(10));
    assert_eq!(c.engine().cross_length(), 40.0);
}

#[test]
fn update_runs_engine_operations_through_the_host() {
    let mut c = Controller::new(fixed(50.0), items(20), 0).unwrap();
    c.on_layout(Size::new(320.0, 200.0), 0).unwrap();
    c.update(5, |engine| engine.scroll_index_into_view(12, false))
        .unwrap();
    assert_eq!(c.offset(), 450.0);
    c.tick(21).unwrap();
    assert_eq!(c.engine().scroll(), 450.0);
    assert_eq!(c.into_engine().visible_range().end_no_buffer, Some(12));
}
