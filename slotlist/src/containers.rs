use std::collections::{BTreeSet, HashMap};

use crate::engine::ListEngine;
use crate::{Container, DEFAULT_ITEM_SIZE, ItemKey};

/// Where one item of the current pass should be rendered.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Placement {
    pub(crate) key: ItemKey,
    pub(crate) index: usize,
    /// Absolute render offset.
    pub(crate) position: f64,
    pub(crate) column: usize,
    pub(crate) sticky: bool,
}

/// Bounded set of reusable slots.
///
/// A key is held by at most one slot. Slot ids are stable for the lifetime of the pool.
#[derive(Clone, Debug, Default)]
pub(crate) struct ContainerPool {
    slots: Vec<Container>,
    sticky: BTreeSet<usize>,
}

impl ContainerPool {
    pub(crate) fn slots(&self) -> &[Container] {
        &self.slots
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn sticky_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.sticky.iter().copied()
    }

    /// Grows the pool to `len` empty slots. Never shrinks.
    pub(crate) fn ensure_len(&mut self, len: usize) -> bool {
        if len <= self.slots.len() {
            return false;
        }
        self.slots.resize_with(len, Container::default);
        true
    }

    /// Empties slots whose key no longer exists.
    pub(crate) fn release_missing(&mut self, exists: impl Fn(&str) -> bool) {
        for (id, slot) in self.slots.iter_mut().enumerate() {
            let gone = slot.item_key.as_deref().is_some_and(|key| !exists(key));
            if gone {
                *slot = Container::default();
                self.sticky.remove(&id);
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Container::default();
        }
        self.sticky.clear();
    }

    /// Moves the pinned offset of the slot holding `key`.
    pub(crate) fn set_position(&mut self, key: &str, position: f64) {
        if let Some(slot) = self
            .slots
            .iter_mut()
            .find(|slot| slot.item_key.as_deref() == Some(key))
        {
            slot.position = position;
        }
    }

    /// Assigns every placement to a slot and empties the rest.
    ///
    /// Slots already holding a placed key keep it. Missing keys take the out-of-range slot
    /// furthest from their position, then an empty slot, then a new slot. Returns how many
    /// slots had to be added.
    pub(crate) fn assign(&mut self, placements: &[Placement]) -> usize {
        let wanted: HashMap<&str, usize> = placements
            .iter()
            .enumerate()
            .map(|(i, p)| (&*p.key, i))
            .collect();
        let mut claimed = vec![false; self.slots.len()];
        let mut placed = vec![false; placements.len()];

        for (id, slot) in self.slots.iter_mut().enumerate() {
            let Some(&p) = slot.item_key.as_deref().and_then(|key| wanted.get(key)) else {
                continue;
            };
            if placed[p] {
                continue;
            }
            apply(slot, &placements[p]);
            claimed[id] = true;
            placed[p] = true;
        }

        let mut grown = 0;
        for (p, placement) in placements.iter().enumerate() {
            if placed[p] {
                continue;
            }
            let id = match self.furthest_unclaimed(&claimed, placement.position) {
                Some(id) => id,
                None => match (0..self.slots.len())
                    .find(|&id| !claimed[id] && self.slots[id].is_empty())
                {
                    Some(id) => id,
                    None => {
                        self.slots.push(Container::default());
                        claimed.push(false);
                        grown += 1;
                        self.slots.len() - 1
                    }
                },
            };
            apply(&mut self.slots[id], placement);
            claimed[id] = true;
        }

        for (id, slot) in self.slots.iter_mut().enumerate() {
            if !claimed[id] && !slot.is_empty() {
                *slot = Container::default();
            }
        }
        self.sticky = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.sticky)
            .map(|(id, _)| id)
            .collect();
        grown
    }

    fn furthest_unclaimed(&self, claimed: &[bool], position: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (id, slot) in self.slots.iter().enumerate() {
            if claimed[id] || slot.is_empty() {
                continue;
            }
            let distance = (slot.position - position).abs();
            if best.is_none_or(|(_, d)| distance > d) {
                best = Some((id, distance));
            }
        }
        best.map(|(id, _)| id)
    }
}

fn apply(slot: &mut Container, placement: &Placement) {
    if slot.item_key.as_ref() != Some(&placement.key) {
        slot.item_key = Some(placement.key.clone());
    }
    slot.index = Some(placement.index);
    slot.position = placement.position;
    slot.column = placement.column;
    slot.sticky = placement.sticky;
}

impl<T> ListEngine<T> {
    /// Slots needed to cover `length` plus the draw distance on both sides.
    pub(crate) fn pool_size_for(&self, length: f64) -> usize {
        let estimate = self
            .options
            .estimated_item_size
            .filter(|size| *size > 0.0)
            .unwrap_or(DEFAULT_ITEM_SIZE);
        let span = length + 2.0 * self.options.draw_distance.max(0.0);
        let rows = (span / estimate).ceil().max(1.0);
        let slots = rows
            * self.options.columns() as f64
            * self.options.initial_container_pool_ratio.max(1.0);
        (slots.ceil() as usize).max(1)
    }

    /// Allocates slots for a viewport of `length`. Returns `true` when the pool grew.
    pub(crate) fn allocate_containers(&mut self, length: f64) -> bool {
        let wanted = self.pool_size_for(length);
        let grew = self.pool.ensure_len(wanted);
        if grew {
            sdebug!(slots = self.pool.len(), "container pool allocated");
        }
        grew
    }
}
