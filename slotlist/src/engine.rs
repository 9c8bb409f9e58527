use std::sync::Arc;

use crate::calculate::{CalcParams, SkipWindow};
use crate::containers::ContainerPool;
use crate::error::{Error, Result};
use crate::key::KeyIndex;
use crate::mvcp::IgnoreBand;
use crate::options::ListOptions;
use crate::scroll::{ScrollSample, ScrollTracker};
use crate::scroll_to::{InitialAnchor, ScrollTarget};
use crate::sizes::SizeStore;
use crate::threshold::ThresholdState;
use crate::{
    AverageSize, Container, ItemKey, Load, SCROLL_TO_SETTLE_MS, ScrollEvent, Size,
    VisibleRange,
};

/// Work deferred to the next animation frame. Repeated requests coalesce.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PendingFrame {
    pub(crate) adjust: Option<f64>,
    pub(crate) recalculate: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct DevWarnings {
    pub(crate) pool_grown: bool,
    pub(crate) missing_key_extractor: bool,
}

/// A headless virtualized list.
///
/// The engine owns the data array and all layout state for one list. The host feeds it
/// viewport layouts, item measurements and scroll events, renders the slots returned by
/// [`ListEngine::containers`], and executes the scroll requests it emits through
/// `ListOptions::scroll_to_handler` / `scroll_adjust_handler`.
///
/// There is no internal clock: entry points take `now_ms`, deadlines are checked by
/// [`ListEngine::tick`], and deferred work runs in [`ListEngine::on_animation_frame`].
pub struct ListEngine<T> {
    pub(crate) options: ListOptions<T>,
    pub(crate) data: Vec<T>,
    pub(crate) ids: KeyIndex,
    pub(crate) store: SizeStore,
    pub(crate) tracker: ScrollTracker,
    pub(crate) pool: ContainerPool,

    pub(crate) scroll_length: f64,
    pub(crate) cross_length: f64,

    pub(crate) range: VisibleRange,
    pub(crate) first_fully_on_screen: Option<usize>,
    pub(crate) ids_in_view: Vec<ItemKey>,
    pub(crate) start_buffered_id: Option<ItemKey>,
    pub(crate) skip_window: Option<SkipWindow>,
    pub(crate) active_sticky: Option<usize>,

    pub(crate) end_reached: ThresholdState,
    pub(crate) start_reached: ThresholdState,
    pub(crate) at_end: bool,
    pub(crate) at_start: bool,

    pub(crate) scrolling_to: Option<ScrollTarget>,
    pub(crate) optimizing_positions: bool,
    pub(crate) initial_anchor: Option<InitialAnchor>,
    pub(crate) ignore_band: Option<IgnoreBand>,
    pub(crate) frame: PendingFrame,

    pub(crate) containers_did_layout: bool,
    pub(crate) initial_scroll_done: bool,
    pub(crate) scroll_processing: bool,
    pub(crate) anchor_offset: f64,

    pub(crate) created_ms: u64,
    pub(crate) now_ms: u64,
    pub(crate) warned: DevWarnings,
}

impl<T> ListEngine<T> {
    /// Creates an engine for `data`.
    ///
    /// Positions are seeded from estimates right away; nothing is visible until the first
    /// [`ListEngine::on_layout`]. With `initial_scroll_offset` the host should mount its scroll
    /// view at [`ListEngine::scroll`].
    pub fn new(options: ListOptions<T>, data: Vec<T>, now_ms: u64) -> Result<Self> {
        let ids = KeyIndex::build(&data, options.key_extractor.as_ref())?;
        let initial_scroll = options.initial_scroll_offset.unwrap_or(0.0);
        let mut engine = Self {
            options,
            data,
            ids,
            store: SizeStore::default(),
            tracker: ScrollTracker::default(),
            pool: ContainerPool::default(),
            scroll_length: 0.0,
            cross_length: 0.0,
            range: VisibleRange::default(),
            first_fully_on_screen: None,
            ids_in_view: Vec::new(),
            start_buffered_id: None,
            skip_window: None,
            active_sticky: None,
            end_reached: ThresholdState::default(),
            start_reached: ThresholdState::default(),
            at_end: false,
            at_start: true,
            scrolling_to: None,
            optimizing_positions: false,
            initial_anchor: None,
            ignore_band: None,
            frame: PendingFrame::default(),
            containers_did_layout: false,
            initial_scroll_done: false,
            scroll_processing: true,
            anchor_offset: 0.0,
            created_ms: now_ms,
            now_ms,
            warned: DevWarnings::default(),
        };
        engine.tracker.scroll = initial_scroll;
        engine.tracker.scroll_prev = initial_scroll;
        engine.tracker.scroll_pending = initial_scroll;
        engine.update_all_positions();
        sdebug!(
            count = engine.data.len(),
            total_size = engine.store.total_size,
            "list engine created"
        );
        Ok(engine)
    }

    pub fn options(&self) -> &ListOptions<T> {
        &self.options
    }

    /// Applies an option change and recomputes layout.
    ///
    /// Fails without touching the engine when the new key extractor yields duplicate keys.
    pub fn update_options(&mut self, f: impl FnOnce(&mut ListOptions<T>)) -> Result<()> {
        let mut next = self.options.clone();
        f(&mut next);
        let ids = KeyIndex::build(&self.data, next.key_extractor.as_ref())?;
        self.options = next;
        if ids.keys() != self.ids.keys() {
            self.ids = ids;
            let ids = &self.ids;
            self.pool.release_missing(|key| ids.contains(key));
        }

        self.update_all_positions();
        if self.scroll_length > 0.0 && !self.pool.is_empty() {
            self.allocate_containers(self.scroll_length);
        }
        self.calculate(CalcParams::FORCED);
        self.check_thresholds();
        Ok(())
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Replaces the data array.
    ///
    /// With `maintain_visible_content_position` the first visible item stays where it was on
    /// screen. Fails without touching the engine on duplicate keys.
    pub fn set_data(&mut self, data: Vec<T>) -> Result<()> {
        let ids = KeyIndex::build(&data, self.options.key_extractor.as_ref())?;
        let keyed = self.options.key_extractor.is_some();
        let was_at_end = self.at_end;
        let snapshot = if keyed { self.prepare_mvcp(true) } else { None };

        if !keyed && !self.data.is_empty() {
            dev_warn!(
                self.warned.missing_key_extractor,
                "data changed on a list without key_extractor; cached sizes are discarded"
            );
            self.store.clear_items();
            self.pool.clear();
            self.start_buffered_id = None;
        }

        self.data = data;
        self.ids = ids;
        let ids = &self.ids;
        self.pool.release_missing(|key| ids.contains(key));
        if self
            .start_buffered_id
            .as_deref()
            .is_some_and(|key| !self.ids.contains(key))
        {
            self.start_buffered_id = None;
        }
        if self.active_sticky.is_some_and(|index| index >= self.data.len()) {
            self.active_sticky = None;
        }

        self.update_all_positions();
        self.commit_mvcp(snapshot)?;
        if was_at_end && self.options.maintain_scroll_at_end.on_data_change {
            self.maintain_end()?;
        }
        self.calculate(CalcParams {
            force: true,
            data_changed: true,
        });
        self.check_thresholds();
        self.check_containers_layout();
        Ok(())
    }

    /// Viewport layout. The first non-zero layout allocates the container pool and applies the
    /// initial scroll.
    pub fn on_layout(&mut self, size: Size, now_ms: u64) -> Result<()> {
        self.now_ms = now_ms;
        let horizontal = self.options.horizontal;
        let length = size.main(horizontal);
        if !length.is_finite() || length < 0.0 {
            return Err(Error::InvalidViewport { size: length });
        }
        let previous = self.scroll_length;
        let was_at_end = self.at_end;
        self.scroll_length = length;
        self.cross_length = size.cross(horizontal);
        self.skip_window = None;
        if length <= 0.0 {
            return Ok(());
        }

        let first_layout = self.pool.is_empty();
        self.allocate_containers(length);
        if first_layout {
            self.apply_initial_scroll()?;
        }
        self.calculate(CalcParams::FORCED);
        self.check_thresholds();
        if !first_layout
            && previous != length
            && was_at_end
            && self.options.maintain_scroll_at_end.on_layout
        {
            self.maintain_end()?;
        }
        self.check_containers_layout();
        Ok(())
    }

    /// A native scroll event.
    pub fn on_scroll(&mut self, event: ScrollEvent, now_ms: u64) -> Result<()> {
        self.now_ms = now_ms;
        if !self.scroll_processing {
            return Ok(());
        }
        if event.content_size.is_zero() {
            strace!("scroll event without content size ignored");
            return Ok(());
        }

        let offset = event.content_offset.main(self.options.horizontal);
        if self.scrolling_to.is_none() {
            if let Some(band) = self.ignore_band {
                if band.ignores(offset) {
                    strace!(offset, "stale scroll echo ignored");
                    return Ok(());
                }
                self.ignore_band = None;
            }
        }

        self.tracker.record(offset, now_ms);
        self.calculate(CalcParams::default());
        self.check_thresholds();
        if let Some(cb) = &self.options.on_scroll {
            cb(&event);
        }

        let landed = self
            .scrolling_to
            .as_ref()
            .is_some_and(|target| (offset - target.offset).abs() < 1.0);
        if landed {
            self.finish_scroll_to()?;
        }
        Ok(())
    }

    /// The host scroll view stopped moving (end of momentum or of an animated scroll).
    pub fn on_scroll_end(&mut self, now_ms: u64) -> Result<()> {
        self.now_ms = now_ms;
        if self.scrolling_to.is_some() {
            self.finish_scroll_to()?;
        }
        Ok(())
    }

    /// Layout of one rendered item.
    pub fn on_item_layout(&mut self, key: &str, size: Size, now_ms: u64) -> Result<()> {
        self.now_ms = now_ms;
        let Some(index) = self.ids.index_of(key) else {
            strace!(key, "layout for unknown item ignored");
            return Ok(());
        };
        let was_at_end = self.at_end;
        let snapshot = self.prepare_mvcp(false);
        let changed = self.update_item_size(index, size.main(self.options.horizontal))?;
        if changed {
            // The pass may re-resolve averaged sizes above the anchor; commit after it.
            self.calculate(CalcParams::default());
            self.commit_mvcp(snapshot)?;
            self.calculate(CalcParams::default());
            self.check_thresholds();
            if was_at_end && self.options.maintain_scroll_at_end.on_item_layout {
                self.maintain_end()?;
            }
        }
        self.check_containers_layout();
        self.ensure_initial_anchor()?;
        Ok(())
    }

    /// Checks deadlines: the scroll-echo ignore band and non-animated scroll-to settling.
    pub fn tick(&mut self, now_ms: u64) -> Result<()> {
        self.now_ms = now_ms;
        if let Some(band) = self.ignore_band {
            // A real scroll event would have cleared the band already.
            if now_ms >= band.deadline_ms {
                self.ignore_band = None;
                strace!("ignore band expired");
                self.calculate(CalcParams::FORCED);
                self.check_thresholds();
            }
        }
        let settled = self.scrolling_to.as_ref().is_some_and(|target| {
            !target.animated && now_ms.saturating_sub(target.started_ms) >= SCROLL_TO_SETTLE_MS
        });
        if settled {
            self.finish_scroll_to()?;
        }
        Ok(())
    }

    /// The earliest `now_ms` at which [`ListEngine::tick`] has something to do.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        let band = self.ignore_band.map(|band| band.deadline_ms);
        let settle = self
            .scrolling_to
            .as_ref()
            .filter(|target| !target.animated)
            .map(|target| target.started_ms + SCROLL_TO_SETTLE_MS);
        match (band, settle) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn needs_animation_frame(&self) -> bool {
        self.frame.adjust.is_some()
            || self.frame.recalculate
            || (self.initial_anchor.is_some() && self.containers_did_layout)
    }

    /// Runs deferred work: coalesced scroll adjustments, forced recalculation, and the initial
    /// anchor correction loop.
    pub fn on_animation_frame(&mut self, now_ms: u64) -> Result<()> {
        self.now_ms = now_ms;
        let frame = std::mem::take(&mut self.frame);
        if let Some(delta) = frame.adjust {
            let handler = self
                .options
                .scroll_adjust_handler
                .clone()
                .ok_or(Error::MissingScrollAdjustHandler)?;
            strace!(delta, "deferred scroll adjust");
            handler(delta);
        }
        if frame.recalculate {
            self.calculate(CalcParams::FORCED);
            self.check_thresholds();
        }
        self.ensure_initial_anchor()?;
        Ok(())
    }

    /// Forced recalculation of the visible range and containers.
    pub fn recalculate(&mut self) {
        self.calculate(CalcParams::FORCED);
    }

    /// Recalculates unless the scroll position is inside the last safe-skip window.
    pub fn calculate_items_in_view(&mut self) {
        self.calculate(CalcParams::default());
    }

    /// Ignores scroll events while `false`.
    pub fn set_scroll_processing_enabled(&mut self, enabled: bool) {
        self.scroll_processing = enabled;
    }

    pub fn is_scroll_processing_enabled(&self) -> bool {
        self.scroll_processing
    }

    /// Offset from the viewport's leading edge used to pick the visible-content anchor.
    pub fn set_visible_content_anchor_offset(&mut self, offset: f64) {
        self.anchor_offset = offset;
    }

    pub fn update_visible_content_anchor_offset(&mut self, f: impl FnOnce(f64) -> f64) {
        self.anchor_offset = f(self.anchor_offset);
    }

    pub fn visible_content_anchor_offset(&self) -> f64 {
        self.anchor_offset
    }

    pub fn scroll(&self) -> f64 {
        self.tracker.scroll
    }

    /// Where the host scroll view is headed: the last programmatic target or the last offset.
    pub fn pending_scroll(&self) -> f64 {
        self.tracker.scroll_pending
    }

    pub fn scroll_length(&self) -> f64 {
        self.scroll_length
    }

    /// Viewport extent across the scroll axis.
    pub fn cross_length(&self) -> f64 {
        self.cross_length
    }

    /// Sum of item sizes (row maxima for multi column).
    pub fn total_size(&self) -> f64 {
        self.store.total_size
    }

    /// Scrollable content extent: items plus header, footer and padding.
    pub fn content_size(&self) -> f64 {
        self.store.total_size + self.options.top_inset() + self.options.bottom_inset()
    }

    pub fn visible_range(&self) -> VisibleRange {
        self.range
    }

    pub fn containers(&self) -> &[Container] {
        self.pool.slots()
    }

    /// Slot ids currently holding sticky headers.
    pub fn sticky_containers(&self) -> impl Iterator<Item = usize> + '_ {
        self.pool.sticky_slots()
    }

    pub fn active_sticky_index(&self) -> Option<usize> {
        self.active_sticky
    }

    /// Keys of the items strictly on screen.
    pub fn ids_in_view(&self) -> &[ItemKey] {
        &self.ids_in_view
    }

    pub fn first_fully_on_screen_index(&self) -> Option<usize> {
        self.first_fully_on_screen
    }

    pub fn end_reached(&self) -> Option<bool> {
        self.end_reached.reached
    }

    pub fn start_reached(&self) -> Option<bool> {
        self.start_reached.reached
    }

    pub fn is_at_end(&self) -> bool {
        self.at_end
    }

    pub fn is_at_start(&self) -> bool {
        self.at_start
    }

    pub fn containers_did_layout(&self) -> bool {
        self.containers_did_layout
    }

    pub fn key_at(&self, index: usize) -> Option<&ItemKey> {
        self.ids.key(index)
    }

    pub fn index_of_key(&self, key: &str) -> Option<usize> {
        self.ids.index_of(key)
    }

    /// Absolute offset of an item's leading edge, if its position has been computed.
    pub fn item_position(&self, index: usize) -> Option<f64> {
        self.position_at(index)
            .map(|position| position + self.options.top_inset())
    }

    /// Measured (or fixed) size of an item.
    pub fn known_size(&self, key: &str) -> Option<f64> {
        self.store.known.get(key).copied()
    }

    pub fn average_size(&self, item_type: Option<&str>) -> Option<AverageSize> {
        let item_type = item_type.map(Arc::from);
        self.store.averages.get(&item_type).copied()
    }

    pub fn scroll_history(&self) -> impl Iterator<Item = ScrollSample> + '_ {
        self.tracker.history().copied()
    }

    /// Units per millisecond, signed by direction.
    pub fn scroll_velocity(&self) -> f64 {
        self.tracker.velocity()
    }

    /// Offset of the in-flight programmatic scroll, if any.
    pub fn scroll_target(&self) -> Option<f64> {
        self.scrolling_to.as_ref().map(|target| target.offset)
    }

    pub(crate) fn maintain_end(&mut self) -> Result<()> {
        if self.data.is_empty() {
            return Ok(());
        }
        sdebug!("keeping list pinned to its end");
        self.scroll_to_end(Default::default())
    }

    /// Flags the containers as laid out once every item in view has a real size.
    pub(crate) fn check_containers_layout(&mut self) {
        if self.containers_did_layout || self.ids_in_view.is_empty() {
            return;
        }
        let measured = self
            .ids_in_view
            .iter()
            .all(|key| self.store.known.contains_key(key));
        if !measured {
            return;
        }
        self.containers_did_layout = true;
        let elapsed = self.now_ms.saturating_sub(self.created_ms);
        sdebug!(elapsed, "containers laid out");
        if let Some(cb) = &self.options.on_load {
            cb(Load {
                elapsed_time_in_ms: elapsed,
            });
        }
    }
}

impl<T> core::fmt::Debug for ListEngine<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListEngine")
            .field("options", &self.options)
            .field("len", &self.data.len())
            .field("scroll", &self.tracker.scroll)
            .field("scroll_length", &self.scroll_length)
            .field("total_size", &self.store.total_size)
            .field("range", &self.range)
            .field("containers", &self.pool.len())
            .field("scrolling_to", &self.scrolling_to)
            .finish_non_exhaustive()
    }
}
