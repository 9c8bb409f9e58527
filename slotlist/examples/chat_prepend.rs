// Example: keeping the visible message in place while older messages are prepended.
use std::sync::Arc;

use slotlist::{ListEngine, ListOptions, ScrollEvent, Size};

#[derive(Clone, Debug, PartialEq)]
struct Message {
    id: u64,
    text: String,
}

fn page(ids: std::ops::Range<u64>) -> Vec<Message> {
    ids.map(|id| Message {
        id,
        text: format!("message #{id}"),
    })
    .collect()
}

fn main() -> slotlist::Result<()> {
    let options = ListOptions::new()
        .with_key_extractor(|m: &Message, _| Arc::from(m.id.to_string()))
        .with_estimated_item_size(64.0)
        .with_maintain_visible_content_position(true)
        .with_on_start_reached(|e| println!("start reached ({} from top)", e.distance_from_start))
        .with_scroll_adjust_handler(|delta| println!("host: scroll by {delta}"));

    let mut list = ListEngine::new(options, page(100..140), 0)?;
    list.on_layout(Size::new(360.0, 640.0), 0)?;
    for key in list.ids_in_view().to_vec() {
        list.on_item_layout(&key, Size::new(360.0, 64.0), 1)?;
    }
    list.on_scroll(ScrollEvent::vertical(900.0, list.content_size()), 16)?;
    let anchor = list.ids_in_view().first().cloned();
    println!("anchor={anchor:?} at {:?}", anchor.as_deref().and_then(|k| list.index_of_key(k)));

    let mut older = page(80..100);
    older.extend(list.data().iter().cloned());
    list.set_data(older)?;

    println!("scroll={} (was 900)", list.scroll());
    println!("anchor now at {:?}", anchor.as_deref().and_then(|k| list.index_of_key(k)));
    Ok(())
}
