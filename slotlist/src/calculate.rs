use crate::containers::Placement;
use crate::engine::ListEngine;
use crate::{ScrollDirection, StickyHeaderChange, ViewableRange, VisibleRange};

/// Share of the draw distance placed behind the viewport when the direction is known.
const BUFFER_BEHIND: f64 = 0.5;
/// Share of the draw distance placed ahead of the viewport when the direction is known.
const BUFFER_AHEAD: f64 = 1.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct CalcParams {
    /// Ignore the safe-skip window.
    pub(crate) force: bool,
    pub(crate) data_changed: bool,
}

impl CalcParams {
    pub(crate) const FORCED: Self = Self {
        force: true,
        data_changed: false,
    };
}

/// Open interval of effective scroll in which the last computed range is still exact.
///
/// Only valid for the scroll direction it was computed with, since buffers depend on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SkipWindow {
    pub(crate) lo: f64,
    pub(crate) hi: f64,
    pub(crate) direction: Option<ScrollDirection>,
}

impl SkipWindow {
    fn contains(&self, scroll: f64, direction: Option<ScrollDirection>) -> bool {
        self.direction == direction && self.lo < scroll && scroll < self.hi
    }
}

/// Splits the draw distance into (behind, ahead) of the viewport.
pub(crate) fn buffers(draw_distance: f64, direction: Option<ScrollDirection>) -> (f64, f64) {
    let distance = draw_distance.max(0.0);
    match direction {
        Some(ScrollDirection::Forward) => (distance * BUFFER_BEHIND, distance * BUFFER_AHEAD),
        Some(ScrollDirection::Backward) => (distance * BUFFER_AHEAD, distance * BUFFER_BEHIND),
        None => (distance, distance),
    }
}

struct Buffers {
    scroll: f64,
    before: f64,
    after: f64,
}

impl<T> ListEngine<T> {
    /// Scroll offset relative to the first item.
    pub(crate) fn effective_scroll(&self) -> f64 {
        self.tracker.scroll - self.options.top_inset()
    }

    pub(crate) fn calculate(&mut self, params: CalcParams) {
        let len = self.data.len();
        if len == 0 {
            self.reset_view();
            return;
        }
        if self.scroll_length <= 0.0 || self.pool.is_empty() {
            return;
        }

        let scroll = self.effective_scroll();
        let direction = self.tracker.direction();
        if !params.force && !params.data_changed {
            if let Some(window) = self.skip_window {
                if window.contains(scroll, direction) {
                    self.pin_active_sticky();
                    return;
                }
            }
        }

        let (before, after) = buffers(self.options.draw_distance, direction);
        let length = self.scroll_length;
        let top_buffered = scroll - before;
        let bottom = scroll + length;
        let bottom_buffered = bottom + after;
        let columns = self.options.columns();
        let lookup = self.lookup();

        // Walk back from the previous first buffered item while the row above still reaches
        // into the buffered area.
        let mut start = self
            .start_buffered_id
            .as_deref()
            .and_then(|key| self.ids.index_of(key))
            .unwrap_or(0)
            .min(len - 1);
        if let Some(changed) = self.store.min_index_size_changed.take() {
            start = start.min(changed);
        }
        start -= start % columns;
        if start >= self.store.valid_positions {
            self.update_positions_through(start);
        }
        while start > 0 {
            let prev = start - columns;
            let Some(top) = self.position_at(prev) else {
                break;
            };
            let row_size = (prev..start)
                .filter_map(|i| self.current_size_at(i))
                .fold(0.0, f64::max);
            if top + row_size > top_buffered {
                start = prev;
            } else {
                break;
            }
        }

        let mut top = match self.position_at(start) {
            Some(position) if start > 0 => position,
            _ => {
                start = 0;
                0.0
            }
        };
        let valid_at_start = self.store.valid_positions;
        let mut range = VisibleRange::default();
        let mut first_fully = None;
        let mut row_max: f64 = 0.0;
        let mut end = start;
        for i in start..len {
            let column = i % columns;
            if column == 0 && i > start {
                top += row_max;
                row_max = 0.0;
                if range.start_buffered.is_some() && top >= bottom_buffered {
                    if let Some(key) = self.ids.key(i) {
                        self.store.place(key, top, column);
                    }
                    end = i + 1;
                    break;
                }
            }
            let size = self.resolve_size(i, lookup);
            row_max = row_max.max(size);
            if let Some(key) = self.ids.key(i) {
                self.store.place(key, top, column);
            }
            end = i + 1;

            let item_bottom = top + size;
            if top < bottom && item_bottom > scroll {
                range.start_no_buffer.get_or_insert(i);
                range.end_no_buffer = Some(i);
            }
            if top < bottom_buffered && item_bottom > top_buffered {
                range.start_buffered.get_or_insert(i);
                range.end_buffered = Some(i);
            }
            if first_fully.is_none() && top >= scroll {
                first_fully = Some(i);
            }
        }
        if valid_at_start > start {
            self.store.valid_positions = self.store.valid_positions.max(end);
        }

        if columns > 1 {
            range.start_buffered = range.start_buffered.map(|i| i - i % columns);
            range.end_buffered = range
                .end_buffered
                .map(|i| (i - i % columns + columns - 1).min(len - 1));
        }
        if range.end_no_buffer.is_none() {
            range.start_no_buffer = None;
        }
        if range.end_buffered.is_none() {
            range.start_buffered = None;
        }
        debug_assert!(range.is_ordered());

        self.first_fully_on_screen = first_fully;
        self.ids_in_view = match (range.start_no_buffer, range.end_no_buffer) {
            (Some(first), Some(last)) => (first..=last)
                .filter_map(|i| self.ids.key(i).cloned())
                .collect(),
            _ => Vec::new(),
        };
        self.start_buffered_id = range
            .start_buffered
            .and_then(|i| self.ids.key(i).cloned());

        self.update_active_sticky(range);
        self.assign_containers(range);

        self.skip_window = self.compute_skip_window(
            range,
            first_fully,
            Buffers {
                scroll,
                before,
                after,
            },
            direction,
        );

        let changed = range != self.range;
        self.range = range;
        strace!(
            scroll,
            start_buffered = ?range.start_buffered,
            start = ?range.start_no_buffer,
            end = ?range.end_no_buffer,
            end_buffered = ?range.end_buffered,
            "items in view"
        );
        if changed {
            self.notify_viewable_range();
        }
    }

    fn reset_view(&mut self) {
        let changed = self.range != VisibleRange::default();
        self.range = VisibleRange::default();
        self.first_fully_on_screen = None;
        self.ids_in_view.clear();
        self.start_buffered_id = None;
        self.active_sticky = None;
        self.skip_window = None;
        self.pool.clear();
        if changed {
            self.notify_viewable_range();
        }
    }

    fn notify_viewable_range(&self) {
        let Some(cb) = &self.options.on_viewable_range_changed else {
            return;
        };
        let items = match (self.range.start_no_buffer, self.range.end_no_buffer) {
            (Some(first), Some(last)) => &self.data[first..=last],
            _ => &[],
        };
        cb(ViewableRange {
            range: self.range,
            items,
        });
    }

    fn update_active_sticky(&mut self, range: VisibleRange) {
        let len = self.data.len();
        let active = range.start_buffered.and_then(|start| {
            self.options
                .sticky_indices
                .iter()
                .copied()
                .filter(|&i| i <= start && i < len)
                .max()
        });
        if active == self.active_sticky {
            return;
        }
        self.active_sticky = active;
        sdebug!(index = ?active, "sticky header changed");
        if let (Some(index), Some(cb)) = (active, &self.options.on_sticky_header_change) {
            cb(StickyHeaderChange {
                index,
                item: &self.data[index],
            });
        }
    }

    /// Absolute render offset of the active sticky header: pinned to the viewport's leading
    /// edge and pushed up by the next sticky item.
    fn pinned_position(&self, index: usize) -> f64 {
        let inset = self.options.top_inset();
        let natural = self.position_at(index).unwrap_or(0.0) + inset;
        let mut pinned = natural.max(self.tracker.scroll);
        let next = self
            .options
            .sticky_indices
            .iter()
            .copied()
            .filter(|&i| i > index)
            .min();
        if let Some(next) = next {
            if let (Some(next_top), Some(size)) =
                (self.position_at(next), self.current_size_at(index))
            {
                pinned = pinned.min(next_top + inset - size).max(natural);
            }
        }
        pinned
    }

    fn pin_active_sticky(&mut self) {
        let Some(index) = self.active_sticky else {
            return;
        };
        let position = self.pinned_position(index);
        if let Some(key) = self.ids.key(index) {
            self.pool.set_position(key, position);
        }
    }

    fn placement(&self, index: usize) -> Option<Placement> {
        let key = self.ids.key(index)?;
        let columns = self.options.columns();
        let sticky = self.options.sticky_indices.contains(&index);
        let position = if self.active_sticky == Some(index) {
            self.pinned_position(index)
        } else {
            self.position_at(index)? + self.options.top_inset()
        };
        Some(Placement {
            key: key.clone(),
            index,
            position,
            column: self.store.columns.get(key).copied().unwrap_or(index % columns),
            sticky,
        })
    }

    fn assign_containers(&mut self, range: VisibleRange) {
        let (Some(first), Some(last)) = (range.start_buffered, range.end_buffered) else {
            self.pool.assign(&[]);
            return;
        };
        let mut placements = Vec::with_capacity(last - first + 2);
        if let Some(active) = self.active_sticky.filter(|&active| active < first) {
            placements.extend(self.placement(active));
        }
        placements.extend((first..=last).filter_map(|i| self.placement(i)));

        let grown = self.pool.assign(&placements);
        if grown > 0 {
            dev_warn!(
                self.warned.pool_grown,
                grown,
                slots = self.pool.len(),
                "container pool too small for the buffered range; growing"
            );
        }
    }

    /// Interval of effective scroll in which a recalculation would give the same range.
    fn compute_skip_window(
        &self,
        range: VisibleRange,
        first_fully: Option<usize>,
        buffers: Buffers,
        direction: Option<ScrollDirection>,
    ) -> Option<SkipWindow> {
        if self.options.columns() != 1 {
            return None;
        }
        let (Some(snb), Some(enb), Some(sb), Some(eb)) = (
            range.start_no_buffer,
            range.end_no_buffer,
            range.start_buffered,
            range.end_buffered,
        ) else {
            return None;
        };
        let len = self.data.len();
        let length = self.scroll_length;
        let Buffers {
            scroll,
            before,
            after,
        } = buffers;
        let top = |i: usize| self.position_at(i);
        let bottom = |i: usize| Some(self.position_at(i)? + self.current_size_at(i)?);

        let mut lo = f64::NEG_INFINITY;
        let mut hi = f64::INFINITY;

        hi = hi.min(bottom(snb)?);
        if snb > 0 {
            lo = lo.max(bottom(snb - 1)?);
        }
        lo = lo.max(top(enb)? - length);
        if enb + 1 < len {
            hi = hi.min(top(enb + 1)? - length);
        }
        hi = hi.min(bottom(sb)? + before);
        if sb > 0 {
            lo = lo.max(bottom(sb - 1)? + before);
        }
        lo = lo.max(top(eb)? - length - after);
        if eb + 1 < len {
            hi = hi.min(top(eb + 1)? - length - after);
        }
        match first_fully {
            Some(first) => {
                hi = hi.min(top(first)?);
                if first > 0 {
                    lo = lo.max(top(first - 1)?);
                }
            }
            None => lo = lo.max(top(len - 1)?),
        }

        (lo < scroll && scroll < hi).then_some(SkipWindow { lo, hi, direction })
    }
}
