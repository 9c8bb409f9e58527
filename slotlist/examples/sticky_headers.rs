// Example: sticky section headers pinned to the top of the viewport.
use slotlist::{ListEngine, ListOptions, ScrollEvent, Size};

#[derive(Debug)]
enum Row {
    Header(char),
    Entry(String),
}

fn main() -> slotlist::Result<()> {
    let mut rows = Vec::new();
    let mut sticky = Vec::new();
    for letter in 'A'..='F' {
        sticky.push(rows.len());
        rows.push(Row::Header(letter));
        for n in 0..12 {
            rows.push(Row::Entry(format!("{letter}{n}")));
        }
    }

    let options = ListOptions::new()
        .with_get_fixed_item_size(|_, row: &Row, _| match row {
            Row::Header(_) => Some(32.0),
            Row::Entry(_) => Some(56.0),
        })
        .with_sticky_indices(sticky)
        .with_on_sticky_header_change(|change| println!("header -> {:?}", change.item));

    let mut list = ListEngine::new(options, rows, 0)?;
    list.on_layout(Size::new(360.0, 400.0), 0)?;
    for (step, offset) in [300.0, 700.0, 1400.0, 2100.0].into_iter().enumerate() {
        list.on_scroll(ScrollEvent::vertical(offset, list.content_size()), step as u64 * 16)?;
        for id in list.sticky_containers() {
            let slot = &list.containers()[id];
            println!(
                "scroll={offset} sticky slot {id}: index {:?} at {}",
                slot.index, slot.position
            );
        }
    }
    Ok(())
}
