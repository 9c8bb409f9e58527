use slotlist::{ListOptions, ScrollToIndexParams, Size};
use slotlist_adapter::{Controller, Easing};

fn main() -> slotlist::Result<()> {
    // Example: a frame loop driving an animated scroll-to-index without any UI objects.
    //
    // An adapter would:
    // - forward the command to the controller
    // - call tick(now_ms) every frame
    // - apply the returned offset to the real scroll container (if any)
    // - render the engine's containers
    let options = ListOptions::<u32>::new()
        .with_estimated_item_size(48.0)
        .with_get_fixed_item_size(|_, _, _| Some(48.0));
    let mut c =
        Controller::new(options, (0..10_000).collect(), 0)?.with_animation(240, Easing::SmoothStep);
    c.on_layout(Size::new(360.0, 720.0), 0)?;

    c.scroll_to_index(
        ScrollToIndexParams::new(2_000).view_position(0.5).animated(true),
        0,
    )?;

    let mut now_ms = 0u64;
    while c.is_animating() {
        now_ms += 16;
        if let Some(offset) = c.tick(now_ms)? {
            if now_ms % 80 == 0 {
                println!("t={now_ms} off={offset} range={:?}", c.engine().visible_range());
            }
        }
    }
    let now_ms = c.settle(now_ms, 16, 32)?;

    println!(
        "done at t={now_ms}: off={} first visible={:?}",
        c.offset(),
        c.engine().visible_range().start_no_buffer
    );
    Ok(())
}
