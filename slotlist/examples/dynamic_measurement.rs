// Example: estimated sizes replaced by measurements as items render.
use slotlist::{ListEngine, ListOptions, Size};

fn real_height(item: &u32) -> f64 {
    40.0 + f64::from(item % 5) * 12.0
}

fn main() -> slotlist::Result<()> {
    let options = ListOptions::<u32>::new()
        .with_estimated_item_size(60.0)
        .with_draw_distance(120.0)
        .with_on_item_size_changed(|change| {
            println!(
                "item {} resized {:?} -> {}",
                change.index, change.previous, change.size
            );
        })
        .with_on_load(|load| println!("first screen measured after {}ms", load.elapsed_time_in_ms));

    let mut list = ListEngine::new(options, (0..200u32).collect(), 0)?;
    list.on_layout(Size::new(320.0, 480.0), 0)?;

    // A host measures whatever it rendered, which may bring new items into range.
    for frame in 1..=4u64 {
        let rendered: Vec<_> = list
            .containers()
            .iter()
            .filter_map(|c| Some((c.item_key.clone()?, c.index?)))
            .collect();
        for (key, index) in rendered {
            let height = real_height(&list.data()[index]);
            list.on_item_layout(&key, Size::new(320.0, height), frame * 16)?;
        }
    }

    println!("average={:?}", list.average_size(None));
    println!("total_size={}", list.total_size());
    println!("visible_range={:?}", list.visible_range());
    Ok(())
}
