// Example: minimal usage, a scroll event and a scroll-to request.
use std::sync::{Arc, Mutex};

use slotlist::{ListEngine, ListOptions, ScrollEvent, ScrollToIndexParams, Size};

fn main() -> slotlist::Result<()> {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&requests);
    let options = ListOptions::<u32>::new()
        .with_get_fixed_item_size(|_, _, _| Some(48.0))
        .with_scroll_to_handler(move |request| sink.lock().unwrap().push(request));

    let mut list = ListEngine::new(options, (0..10_000u32).collect(), 0)?;
    list.on_layout(Size::new(360.0, 640.0), 0)?;
    list.on_scroll(ScrollEvent::vertical(12_345.0, list.content_size()), 16)?;

    println!("total_size={}", list.total_size());
    println!("visible_range={:?}", list.visible_range());
    let used = list.containers().iter().filter(|c| !c.is_empty()).count();
    println!("containers={} used={used}", list.containers().len());

    list.scroll_to_index(ScrollToIndexParams::new(9_999))?;
    println!("scroll requests={:?}", requests.lock().unwrap());
    println!("after scroll_to_index: scroll={}", list.scroll());
    Ok(())
}
