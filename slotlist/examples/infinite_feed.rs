// Example: loading more items when the end of the list comes near.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use slotlist::{ListEngine, ListOptions, ScrollEvent, Size};

fn main() -> slotlist::Result<()> {
    let wants_more = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&wants_more);
    let options = ListOptions::<u32>::new()
        .with_key_extractor(|id: &u32, _| Arc::from(id.to_string()))
        .with_get_fixed_item_size(|_, _, _| Some(80.0))
        .with_on_end_reached_threshold(1.0)
        .with_on_end_reached(move |e| {
            println!("end reached, {} left", e.distance_from_end);
            flag.store(true, Ordering::Relaxed);
        });

    let mut list = ListEngine::new(options, (0..30u32).collect(), 0)?;
    list.on_layout(Size::new(360.0, 640.0), 0)?;

    let mut offset = 0.0;
    for frame in 1..=120u64 {
        offset += 60.0;
        list.on_scroll(ScrollEvent::vertical(offset, list.content_size()), frame * 16)?;
        if wants_more.swap(false, Ordering::Relaxed) {
            let next = list.len() as u32;
            let mut data = list.data().to_vec();
            data.extend(next..next + 30);
            list.set_data(data)?;
            println!("loaded page, len={}", list.len());
        }
    }
    println!("final scroll={} total_size={}", list.scroll(), list.total_size());
    Ok(())
}
