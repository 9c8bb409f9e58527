use std::sync::Arc;

use slotlist::{ListOptions, Size};
use slotlist_adapter::{Controller, HostOp};

fn main() -> slotlist::Result<()> {
    // Example: the controller applies the engine's scroll corrections when older messages are
    // prepended, so the message on screen stays put.
    let options = ListOptions::<u64>::new()
        .with_key_extractor(|id, _| Arc::from(format!("msg-{id}")))
        .with_estimated_item_size(64.0)
        .with_maintain_visible_content_position(true);
    let mut c = Controller::new(options, (1000..1100).collect(), 0)?;
    c.on_layout(Size::new(360.0, 640.0), 0)?;
    c.layout_containers(1, |_, _| 64.0)?;

    c.on_user_scroll(3200.0, 10)?;
    c.layout_containers(11, |_, _| 64.0)?;
    let before = c.engine().visible_range().start_no_buffer;
    println!("before prepend: off={} first={before:?}", c.offset());

    let mut data: Vec<u64> = (2000..2010).collect();
    data.extend(c.engine().data().iter().copied());
    c.set_data(data, 20)?;
    c.settle(20, 16, 32)?;

    for op in c.executed_ops() {
        if let HostOp::Adjust(delta) = op {
            println!("host scrolled by {delta}");
        }
    }
    println!(
        "after prepend: off={} first={:?}",
        c.offset(),
        c.engine().visible_range().start_no_buffer
    );
    Ok(())
}
