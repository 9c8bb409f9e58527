use crate::calculate::CalcParams;
use crate::engine::ListEngine;
use crate::error::{Error, Result};
use crate::sizes::Lookup;
use crate::{ScrollRequest, ScrollToEndParams, ScrollToIndexParams, ScrollToOffsetParams};

const INITIAL_ANCHOR_TOLERANCE: f64 = 0.5;
const INITIAL_ANCHOR_SETTLED_TICKS: u32 = 2;
const INITIAL_ANCHOR_MAX_ATTEMPTS: u32 = 4;

/// An in-flight programmatic scroll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ScrollTarget {
    pub(crate) offset: f64,
    pub(crate) index: Option<usize>,
    pub(crate) animated: bool,
    pub(crate) started_ms: u64,
}

/// Correction loop that keeps the initial scroll index in place while real sizes arrive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct InitialAnchor {
    pub(crate) index: usize,
    pub(crate) view_offset: f64,
    pub(crate) view_position: f64,
    pub(crate) attempts: u32,
    pub(crate) settled_ticks: u32,
    pub(crate) last_delta: Option<f64>,
}

impl InitialAnchor {
    fn new(index: usize, view_offset: f64, view_position: f64) -> Self {
        Self {
            index,
            view_offset,
            view_position,
            attempts: 0,
            settled_ticks: 0,
            last_delta: None,
        }
    }
}

impl<T> ListEngine<T> {
    /// Scrolls so the item at `index` sits at `view_position` within the viewport.
    ///
    /// Out-of-range indexes are clamped. Unmeasured items before `index` are resolved first.
    pub fn scroll_to_index(&mut self, params: ScrollToIndexParams) -> Result<()> {
        let len = self.data.len();
        if len == 0 {
            return Ok(());
        }
        let index = params.index.min(len - 1);
        let view_position = params
            .view_position
            .unwrap_or(if index == len - 1 { 1.0 } else { 0.0 });
        let offset = self.offset_for_index(index, params.view_offset, view_position);
        self.scroll_to(ScrollTarget {
            offset,
            index: Some(index),
            animated: params.animated,
            started_ms: self.now_ms,
        })
    }

    pub fn scroll_to_offset(&mut self, params: ScrollToOffsetParams) -> Result<()> {
        let offset = self.clamp_offset(params.offset - params.view_offset);
        self.scroll_to(ScrollTarget {
            offset,
            index: None,
            animated: params.animated,
            started_ms: self.now_ms,
        })
    }

    /// Scrolls to the end of the content, footer and bottom padding included.
    pub fn scroll_to_end(&mut self, params: ScrollToEndParams) -> Result<()> {
        let len = self.data.len();
        if len == 0 {
            return Ok(());
        }
        self.scroll_to_index(ScrollToIndexParams {
            index: len - 1,
            animated: params.animated,
            view_offset: params.view_offset - self.options.bottom_inset(),
            view_position: Some(1.0),
        })
    }

    /// Scrolls the minimum distance needed to show the whole item. No-op when already visible.
    pub fn scroll_index_into_view(&mut self, index: usize, animated: bool) -> Result<()> {
        let len = self.data.len();
        if len == 0 {
            return Ok(());
        }
        let index = index.min(len - 1);
        self.update_positions_through(index);
        let Some(top) = self.item_position(index) else {
            return Ok(());
        };
        let size = self.resolve_size(index, self.lookup());
        let scroll = self.tracker.scroll;
        if top >= scroll && top + size <= scroll + self.scroll_length {
            return Ok(());
        }
        let view_position = if top < scroll { 0.0 } else { 1.0 };
        self.scroll_to_index(ScrollToIndexParams {
            index,
            animated,
            view_offset: 0.0,
            view_position: Some(view_position),
        })
    }

    pub fn scroll_item_into_view(&mut self, item: &T, animated: bool) -> Result<()>
    where
        T: PartialEq,
    {
        match self.data.iter().position(|candidate| candidate == item) {
            Some(index) => self.scroll_index_into_view(index, animated),
            None => Ok(()),
        }
    }

    pub(crate) fn offset_for_index(
        &mut self,
        index: usize,
        view_offset: f64,
        view_position: f64,
    ) -> f64 {
        self.update_positions_through(index);
        let position = self.position_at(index).unwrap_or(0.0) + self.options.top_inset();
        let size = self.resolve_size(
            index,
            Lookup {
                use_average: true,
                prefer_cached: true,
            },
        );
        let offset = position - view_offset - view_position * (self.scroll_length - size);
        self.clamp_offset(offset)
    }

    fn clamp_offset(&self, offset: f64) -> f64 {
        let max = (self.content_size() - self.scroll_length).max(0.0);
        offset.clamp(0.0, max)
    }

    fn scroll_to(&mut self, target: ScrollTarget) -> Result<()> {
        let handler = self
            .options
            .scroll_to_handler
            .clone()
            .ok_or(Error::MissingScrollToHandler)?;
        sdebug!(
            offset = target.offset,
            index = ?target.index,
            animated = target.animated,
            "scroll to"
        );
        self.tracker.clear_history();
        self.tracker.scroll_pending = target.offset;
        self.skip_window = None;
        self.ignore_band = None;
        self.optimizing_positions = true;
        self.scrolling_to = Some(target);
        if !target.animated {
            self.tracker.scroll = target.offset;
        }

        handler(ScrollRequest {
            offset: target.offset,
            animated: target.animated,
        });

        if !target.animated {
            self.calculate(CalcParams::FORCED);
            self.check_thresholds();
        }
        Ok(())
    }

    /// Ends the in-flight programmatic scroll and replaces approximations with real positions.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub(crate) fn finish_scroll_to(&mut self) -> Result<()> {
        let Some(target) = self.scrolling_to.take() else {
            return Ok(());
        };
        sdebug!(offset = target.offset, "scroll to finished");
        self.tracker.clear_history();
        self.optimizing_positions = false;
        self.initial_scroll_done = true;

        let snapshot = self.prepare_mvcp(false);
        self.update_all_positions();
        self.commit_mvcp(snapshot)?;
        self.calculate(CalcParams::FORCED);
        self.check_thresholds();
        Ok(())
    }

    /// Scroll applied on the first layout: `initial_scroll_at_end` or `initial_scroll_index`.
    pub(crate) fn apply_initial_scroll(&mut self) -> Result<()> {
        let len = self.data.len();
        let target = if len == 0 {
            None
        } else if self.options.initial_scroll_at_end {
            Some((len - 1, -self.options.bottom_inset(), 1.0))
        } else {
            self.options.initial_scroll_index.map(|index| {
                let index = index.min(len - 1);
                (index, 0.0, if index == len - 1 { 1.0 } else { 0.0 })
            })
        };
        let Some((index, view_offset, view_position)) = target else {
            self.initial_scroll_done = true;
            return Ok(());
        };

        self.initial_anchor = Some(InitialAnchor::new(index, view_offset, view_position));
        let offset = self.offset_for_index(index, view_offset, view_position);
        self.scroll_to(ScrollTarget {
            offset,
            index: Some(index),
            animated: false,
            started_ms: self.now_ms,
        })
    }

    /// One step of the initial anchor correction loop.
    ///
    /// Converges once the desired offset stays within tolerance for consecutive evaluations.
    /// Gives up after a bounded number of corrections or when a correction fails to shrink.
    pub(crate) fn ensure_initial_anchor(&mut self) -> Result<()> {
        let Some(mut anchor) = self.initial_anchor else {
            return Ok(());
        };
        if !self.containers_did_layout {
            return Ok(());
        }
        if anchor.index >= self.data.len() {
            self.initial_anchor = None;
            return Ok(());
        }
        self.update_positions_through(anchor.index);
        if self.position_at(anchor.index).is_none() {
            return Ok(());
        }

        let desired = self.offset_for_index(anchor.index, anchor.view_offset, anchor.view_position);
        let delta = desired - self.tracker.scroll;
        if delta.abs() <= INITIAL_ANCHOR_TOLERANCE {
            // Positions are still estimates while the initial scroll is in flight.
            if self.scrolling_to.is_none() {
                anchor.settled_ticks += 1;
            }
            if anchor.settled_ticks >= INITIAL_ANCHOR_SETTLED_TICKS {
                sdebug!(index = anchor.index, "initial anchor settled");
                self.initial_anchor = None;
            } else {
                self.initial_anchor = Some(anchor);
            }
            return Ok(());
        }

        anchor.settled_ticks = 0;
        if anchor.attempts >= INITIAL_ANCHOR_MAX_ATTEMPTS {
            sdebug!(index = anchor.index, delta, "initial anchor gave up");
            self.initial_anchor = None;
            return Ok(());
        }
        if anchor
            .last_delta
            .is_some_and(|last| delta.abs() >= last.abs())
        {
            sdebug!(index = anchor.index, delta, "initial anchor not converging");
            self.initial_anchor = None;
            return Ok(());
        }
        anchor.attempts += 1;
        anchor.last_delta = Some(delta);
        self.initial_anchor = Some(anchor);
        self.request_adjust(delta, false)
    }
}
