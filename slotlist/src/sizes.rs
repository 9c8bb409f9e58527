use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::ListEngine;
use crate::error::{Error, Result};
use crate::key::KeyMap;
use crate::options::ListOptions;
use crate::{AverageSize, DEFAULT_ITEM_SIZE, ItemKey, ItemSizeChanged, ItemType};

/// Size changes smaller than this are treated as layout noise.
const SIZE_EPSILON: f64 = 0.1;

/// Measurements are snapped to this grid (1/8 of a unit).
const SIZE_GRID: f64 = 8.0;

pub(crate) fn round_size(size: f64) -> f64 {
    (size * SIZE_GRID).round() / SIZE_GRID
}

/// How `SizeStore::resolve` may answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Lookup {
    pub(crate) use_average: bool,
    pub(crate) prefer_cached: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SizeChange {
    pub(crate) previous: Option<f64>,
    pub(crate) size: f64,
}

/// Outcome of storing a measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Measured {
    Unchanged,
    /// Below the noise floor: cached silently, nothing downstream reacts.
    Noise { previous: f64 },
    Changed(SizeChange),
}

/// Per-key sizes and positions.
///
/// `known` holds authoritative sizes (measured or fixed), `cached` the current best guess for
/// every item the engine has resolved. Positions are list-relative. `valid_positions` counts the
/// leading items whose stored position is consistent with the sizes before them.
#[derive(Clone, Debug, Default)]
pub(crate) struct SizeStore {
    pub(crate) known: KeyMap<f64>,
    pub(crate) cached: KeyMap<f64>,
    pub(crate) averages: HashMap<Option<ItemType>, AverageSize>,
    pub(crate) positions: KeyMap<f64>,
    pub(crate) columns: KeyMap<usize>,
    pub(crate) total_size: f64,
    pub(crate) min_index_size_changed: Option<usize>,
    pub(crate) valid_positions: usize,
}

impl SizeStore {
    /// Resolves the main-axis size of one item.
    ///
    /// Order: known, cached (when `prefer_cached`), fixed, type average (when allowed), cached,
    /// estimate. Everything after the first step is written back to `cached`.
    pub(crate) fn resolve<T>(
        &mut self,
        options: &ListOptions<T>,
        key: &ItemKey,
        index: usize,
        item: &T,
        lookup: Lookup,
        averages_allowed: bool,
    ) -> f64 {
        if let Some(&size) = self.known.get(key) {
            return size;
        }
        if lookup.prefer_cached {
            if let Some(&size) = self.cached.get(key) {
                return size;
            }
        }

        let item_type = options.get_item_type.as_ref().map(|f| f(item, index));
        if let Some(fixed) = &options.get_fixed_item_size {
            if let Some(size) = fixed(index, item, item_type.as_deref()) {
                self.known.insert(Arc::clone(key), size);
                self.cached.insert(Arc::clone(key), size);
                return size;
            }
        }
        if lookup.use_average && averages_allowed {
            if let Some(average) = self.averages.get(&item_type).filter(|a| a.num > 0) {
                let size = average.avg;
                self.cached.insert(Arc::clone(key), size);
                return size;
            }
        }
        if let Some(&size) = self.cached.get(key) {
            return size;
        }

        let size = match &options.get_estimated_item_size {
            Some(estimate) => estimate(index, item, item_type.as_deref()),
            None => options.estimated_item_size.unwrap_or(DEFAULT_ITEM_SIZE),
        };
        self.cached.insert(Arc::clone(key), size);
        size
    }

    /// Stores a measurement. `cached` always ends up equal to the measured size.
    pub(crate) fn record_measurement(
        &mut self,
        key: &ItemKey,
        item_type: Option<ItemType>,
        size: f64,
        track_average: bool,
    ) -> Measured {
        let previous_known = self.known.insert(Arc::clone(key), size);
        if track_average {
            let average = self.averages.entry(item_type).or_default();
            match previous_known {
                Some(prev) if prev > 0.0 && average.num > 0 => {
                    average.avg += (size - prev) / f64::from(average.num);
                }
                _ => average.push(size),
            }
        }

        let previous = self.cached.insert(Arc::clone(key), size);
        match previous {
            Some(prev) if prev == size => Measured::Unchanged,
            Some(prev) if (size - prev).abs() < SIZE_EPSILON => Measured::Noise { previous: prev },
            _ => Measured::Changed(SizeChange { previous, size }),
        }
    }

    pub(crate) fn place(&mut self, key: &ItemKey, position: f64, column: usize) {
        self.positions.insert(Arc::clone(key), position);
        self.columns.insert(Arc::clone(key), column);
    }

    /// Best current size without resolving anything.
    pub(crate) fn current(&self, key: &str) -> Option<f64> {
        self.known.get(key).or_else(|| self.cached.get(key)).copied()
    }

    /// Marks positions after the row of `index` as stale.
    pub(crate) fn invalidate_after(&mut self, index: usize, columns: usize) {
        let row_end = (index / columns + 1) * columns;
        self.valid_positions = self.valid_positions.min(row_end);
    }

    /// Forgets everything tied to item identity. Averages survive.
    pub(crate) fn clear_items(&mut self) {
        self.known.clear();
        self.cached.clear();
        self.positions.clear();
        self.columns.clear();
        self.total_size = 0.0;
        self.min_index_size_changed = None;
        self.valid_positions = 0;
    }
}

impl<T> ListEngine<T> {
    pub(crate) fn lookup(&self) -> Lookup {
        Lookup {
            use_average: true,
            prefer_cached: self.optimizing_positions,
        }
    }

    pub(crate) fn item_type(&self, index: usize) -> Option<ItemType> {
        let item = self.data.get(index)?;
        self.options.get_item_type.as_ref().map(|f| f(item, index))
    }

    pub(crate) fn position_at(&self, index: usize) -> Option<f64> {
        let key = self.ids.key(index)?;
        self.store.positions.get(key).copied()
    }

    pub(crate) fn current_size_at(&self, index: usize) -> Option<f64> {
        let key = self.ids.key(index)?;
        self.store.current(key)
    }

    /// Resolves a size and keeps `total_size` and position validity in step with it.
    pub(crate) fn resolve_size(&mut self, index: usize, lookup: Lookup) -> f64 {
        let Some(key) = self.ids.key(index).cloned() else {
            return 0.0;
        };
        let before = self.store.cached.get(&key).copied();
        let size = self.store.resolve(
            &self.options,
            &key,
            index,
            &self.data[index],
            lookup,
            self.scrolling_to.is_none(),
        );
        let after = self.store.cached.get(&key).copied();
        if after != before {
            if let Some(after) = after {
                self.apply_size_delta(index, before, after);
                self.store
                    .invalidate_after(index, self.options.columns());
            }
        }
        size
    }

    /// Applies a cached-size change of one item to `total_size` (row maxima for multi column).
    fn apply_size_delta(&mut self, index: usize, before: Option<f64>, after: f64) {
        let columns = self.options.columns();
        let before = before.unwrap_or(0.0);
        if columns == 1 {
            self.store.total_size += after - before;
            return;
        }
        let row_start = index - index % columns;
        let row_end = (row_start + columns).min(self.data.len());
        let others = (row_start..row_end)
            .filter(|&i| i != index)
            .filter_map(|i| self.current_size_at(i))
            .fold(0.0, f64::max);
        self.store.total_size += others.max(after) - others.max(before);
    }

    /// Returns the main-axis size of the item at `index`, resolving it if needed.
    ///
    /// `use_average` lets unmeasured items take the running average of their type;
    /// `prefer_cached` returns an existing guess without consulting estimators.
    pub fn get_item_size(
        &mut self,
        index: usize,
        use_average: bool,
        prefer_cached: bool,
    ) -> Option<f64> {
        if index >= self.data.len() {
            return None;
        }
        Some(self.resolve_size(
            index,
            Lookup {
                use_average,
                prefer_cached,
            },
        ))
    }

    /// Records a measurement for the item at `index`.
    ///
    /// Returns `true` when the stored size changed.
    pub(crate) fn update_item_size(&mut self, index: usize, raw: f64) -> Result<bool> {
        let Some(key) = self.ids.key(index).cloned() else {
            return Ok(false);
        };
        if !raw.is_finite() || raw < 0.0 {
            return Err(Error::InvalidSize { key, size: raw });
        }
        let size = round_size(raw);
        let item_type = self.item_type(index);
        let track_average = self.options.get_fixed_item_size.is_none() && size > 0.0;

        let change = match self
            .store
            .record_measurement(&key, item_type, size, track_average)
        {
            Measured::Unchanged => return Ok(false),
            Measured::Noise { previous } => {
                self.apply_size_delta(index, Some(previous), size);
                return Ok(false);
            }
            Measured::Changed(change) => change,
        };

        self.apply_size_delta(index, change.previous, change.size);
        let columns = self.options.columns();
        self.store.invalidate_after(index, columns);
        self.store.min_index_size_changed = Some(
            self.store
                .min_index_size_changed
                .map_or(index, |min| min.min(index)),
        );
        self.skip_window = None;
        strace!(index, size, previous = ?change.previous, "item size changed");

        if let Some(cb) = &self.options.on_item_size_changed {
            cb(&ItemSizeChanged {
                size: change.size,
                previous: change.previous,
                index,
                item_key: &key,
                item_data: &self.data[index],
            });
        }
        Ok(true)
    }

    /// Recomputes every position, column and `total_size` from scratch.
    pub(crate) fn update_all_positions(&mut self) {
        let columns = self.options.columns();
        let lookup = self.lookup();
        let averages_allowed = self.scrolling_to.is_none();
        let mut top = 0.0;
        let mut row_max: f64 = 0.0;
        for (index, item) in self.data.iter().enumerate() {
            let column = index % columns;
            if column == 0 && index > 0 {
                top += row_max;
                row_max = 0.0;
            }
            let Some(key) = self.ids.key(index) else {
                break;
            };
            let size = self.store.resolve(
                &self.options,
                key,
                index,
                item,
                lookup,
                averages_allowed,
            );
            row_max = row_max.max(size);
            self.store.place(key, top, column);
        }
        self.store.total_size = top + row_max;
        self.store.valid_positions = self.data.len();
        self.store.min_index_size_changed = None;
        self.skip_window = None;
        strace!(
            count = self.data.len(),
            total_size = self.store.total_size,
            "positions recomputed"
        );
    }

    /// Makes the positions of all items up to and including `index` valid.
    pub(crate) fn update_positions_through(&mut self, index: usize) {
        let len = self.data.len();
        if len == 0 || index < self.store.valid_positions {
            return;
        }
        let columns = self.options.columns();
        let index = index.min(len - 1);
        let mut start = self.store.valid_positions.saturating_sub(1) / columns * columns;
        let mut top = match self.position_at(start) {
            Some(position) => position,
            None => {
                start = 0;
                0.0
            }
        };
        if start == 0 {
            top = 0.0;
        }

        let end = ((index / columns + 1) * columns).min(len);
        let lookup = self.lookup();
        let mut row_max: f64 = 0.0;
        for i in start..end {
            let column = i % columns;
            if column == 0 && i > start {
                top += row_max;
                row_max = 0.0;
            }
            let size = self.resolve_size(i, lookup);
            row_max = row_max.max(size);
            if let Some(key) = self.ids.key(i) {
                self.store.place(key, top, column);
            }
        }
        self.store.valid_positions = self.store.valid_positions.max(end);
    }
}
