use crate::engine::ListEngine;
use crate::error::{Error, Result};
use crate::{ItemKey, MVCP_IGNORE_BAND_MS};

/// Adjustments at or below this magnitude are dropped.
const ADJUST_EPSILON: f64 = 0.1;

/// Scroll offsets that belong to a stale echo of a position from before an adjustment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct IgnoreBand {
    pub(crate) lt: Option<f64>,
    pub(crate) gt: Option<f64>,
    /// When the band lapses and the range is recomputed.
    pub(crate) deadline_ms: u64,
}

impl IgnoreBand {
    pub(crate) fn ignores(&self, scroll: f64) -> bool {
        self.lt.is_some_and(|lt| scroll < lt) || self.gt.is_some_and(|gt| scroll > gt)
    }
}

/// Anchor captured before a change that may move content.
///
/// Produced by [`ListEngine::prepare_mvcp`] and consumed by [`ListEngine::commit_mvcp`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MvcpSnapshot {
    pub key: ItemKey,
    /// List-relative position of the anchor when captured.
    pub position: f64,
    pub data_changed: bool,
}

impl<T> ListEngine<T> {
    /// Shifts the scroll position by `delta` and tells the host to follow.
    ///
    /// The host call is synchronous once containers have laid out and the initial scroll
    /// finished; before that, deltas accumulate until the next animation frame, which also
    /// recalculates. A negative delta never moves the scroll above the content start.
    /// `data_changed` only tags the trace event.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn request_adjust(&mut self, delta: f64, data_changed: bool) -> Result<()> {
        let delta = delta.max(-self.tracker.scroll.max(0.0));
        if delta.abs() <= ADJUST_EPSILON {
            return Ok(());
        }
        let sync = self.containers_did_layout && self.initial_scroll_done;
        let handler = if sync {
            Some(
                self.options
                    .scroll_adjust_handler
                    .clone()
                    .ok_or(Error::MissingScrollAdjustHandler)?,
            )
        } else {
            None
        };

        let scroll = self.tracker.scroll + delta;
        self.tracker.scroll = scroll;
        self.tracker.scroll_prev += delta;
        self.tracker.scroll_pending = scroll;
        self.tracker.clear_history();
        self.skip_window = None;

        let edge = scroll - delta / 2.0;
        self.ignore_band = Some(IgnoreBand {
            lt: (delta > 0.0).then_some(edge),
            gt: (delta < 0.0).then_some(edge),
            deadline_ms: self.now_ms + MVCP_IGNORE_BAND_MS,
        });

        match handler {
            Some(handler) => {
                sdebug!(delta, data_changed, scroll, "scroll adjust");
                handler(delta);
            }
            None => {
                self.frame.adjust = Some(self.frame.adjust.unwrap_or(0.0) + delta);
                self.frame.recalculate = true;
                strace!(delta, data_changed, "scroll adjust deferred to next frame");
            }
        }
        Ok(())
    }

    /// Captures the anchor item for visible-content-position maintenance.
    ///
    /// The anchor is the in-flight scroll target, otherwise the first item in view whose
    /// leading edge is at or past the viewport edge plus the anchor offset. Returns `None`
    /// when maintenance is disabled or no anchor exists.
    pub fn prepare_mvcp(&self, data_changed: bool) -> Option<MvcpSnapshot> {
        if !self.options.maintain_visible_content_position {
            return None;
        }
        let key = match self.scrolling_to.as_ref().and_then(|target| target.index) {
            Some(index) => self.ids.key(index)?.clone(),
            None => {
                if !self.containers_did_layout {
                    return None;
                }
                let edge = self.effective_scroll() + self.anchor_offset;
                self.ids_in_view
                    .iter()
                    .find(|key| {
                        self.store
                            .positions
                            .get(*key)
                            .is_some_and(|&position| position >= edge)
                    })
                    .or_else(|| self.ids_in_view.first())?
                    .clone()
            }
        };
        let position = *self.store.positions.get(&key)?;
        Some(MvcpSnapshot {
            key,
            position,
            data_changed,
        })
    }

    /// Moves the scroll position by however far the anchor moved since `prepare_mvcp`.
    pub fn commit_mvcp(&mut self, snapshot: Option<MvcpSnapshot>) -> Result<()> {
        let Some(snapshot) = snapshot else {
            return Ok(());
        };
        let Some(index) = self.ids.index_of(&snapshot.key) else {
            strace!(key = &*snapshot.key, "anchor item removed; no adjustment");
            return Ok(());
        };
        self.update_positions_through(index);
        let Some(position) = self.position_at(index) else {
            return Ok(());
        };

        let mut delta = position - snapshot.position;
        if delta > 0.0 {
            let max_scroll = (self.content_size() - self.scroll_length).max(0.0);
            delta = delta.min((max_scroll - self.tracker.scroll).max(0.0));
        }
        self.request_adjust(delta, snapshot.data_changed)
    }
}
