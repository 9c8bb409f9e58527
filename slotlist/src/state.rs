use crate::engine::ListEngine;
use crate::scroll::ScrollSample;
use crate::{Container, ItemKey, VisibleRange};

/// Layout of one item as of the last computation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemLayout {
    pub key: ItemKey,
    pub index: usize,
    /// Absolute offset of the leading edge.
    pub position: f64,
    pub size: Option<f64>,
    /// Whether `size` comes from a measurement or fixed-size function.
    pub measured: bool,
}

/// A serializable snapshot of a list's layout and scroll state.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`. Useful for
/// debugging overlays and for restoring state across sessions.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListSnapshot {
    pub scroll: f64,
    pub scroll_length: f64,
    pub content_size: f64,
    pub total_size: f64,
    pub range: VisibleRange,
    pub first_fully_on_screen_index: Option<usize>,
    pub ids_in_view: Vec<ItemKey>,
    pub items: Vec<ItemLayout>,
    pub containers: Vec<Container>,
    pub end_reached: Option<bool>,
    pub start_reached: Option<bool>,
    pub is_at_end: bool,
    pub is_at_start: bool,
    pub scroll_history: Vec<ScrollSample>,
    pub scroll_velocity: f64,
}

impl<T> ListEngine<T> {
    pub fn get_state(&self) -> ListSnapshot {
        let inset = self.options.top_inset();
        let items = self
            .ids
            .keys()
            .iter()
            .enumerate()
            .filter_map(|(index, key)| {
                let position = self.store.positions.get(key)?;
                Some(ItemLayout {
                    key: key.clone(),
                    index,
                    position: position + inset,
                    size: self.store.current(key),
                    measured: self.store.known.contains_key(key),
                })
            })
            .collect();

        ListSnapshot {
            scroll: self.tracker.scroll,
            scroll_length: self.scroll_length,
            content_size: self.content_size(),
            total_size: self.store.total_size,
            range: self.range,
            first_fully_on_screen_index: self.first_fully_on_screen,
            ids_in_view: self.ids_in_view.clone(),
            items,
            containers: self.pool.slots().to_vec(),
            end_reached: self.end_reached.reached,
            start_reached: self.start_reached.reached,
            is_at_end: self.at_end,
            is_at_start: self.at_start,
            scroll_history: self.tracker.history().copied().collect(),
            scroll_velocity: self.tracker.velocity(),
        }
    }
}
