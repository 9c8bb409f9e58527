use std::collections::VecDeque;

use crate::{SCROLL_HISTORY_LEN, ScrollDirection};

/// Samples older than this do not contribute to velocity.
const VELOCITY_WINDOW_MS: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollSample {
    pub scroll: f64,
    pub time_ms: u64,
}

/// Raw scroll offset bookkeeping.
#[derive(Clone, Debug, Default)]
pub(crate) struct ScrollTracker {
    pub(crate) scroll: f64,
    pub(crate) scroll_prev: f64,
    /// Target of the last programmatic scroll, until its echo arrives.
    pub(crate) scroll_pending: f64,
    history: VecDeque<ScrollSample>,
}

impl ScrollTracker {
    pub(crate) fn record(&mut self, scroll: f64, now_ms: u64) {
        self.scroll_prev = self.scroll;
        self.scroll = scroll;
        self.scroll_pending = scroll;

        self.history.push_back(ScrollSample {
            scroll,
            time_ms: now_ms,
        });
        while self.history.len() > SCROLL_HISTORY_LEN {
            self.history.pop_front();
        }
    }

    pub(crate) fn clear_history(&mut self) {
        self.history.clear();
    }

    pub(crate) fn history(&self) -> impl Iterator<Item = &ScrollSample> + '_ {
        self.history.iter()
    }

    /// Direction of the last user-driven movement.
    ///
    /// `None` right after a programmatic jump or correction, since history is cleared then.
    pub(crate) fn direction(&self) -> Option<ScrollDirection> {
        if self.history.is_empty() || self.scroll == self.scroll_prev {
            return None;
        }
        if self.scroll > self.scroll_prev {
            Some(ScrollDirection::Forward)
        } else {
            Some(ScrollDirection::Backward)
        }
    }

    /// Units per millisecond over the recent samples that move in the same direction.
    pub(crate) fn velocity(&self) -> f64 {
        let Some(newest) = self.history.back() else {
            return 0.0;
        };
        let mut oldest = newest;
        let mut sign = 0.0;
        for sample in self.history.iter().rev().skip(1) {
            if newest.time_ms.saturating_sub(sample.time_ms) > VELOCITY_WINDOW_MS {
                break;
            }
            let diff = oldest.scroll - sample.scroll;
            let step = if diff > 0.0 {
                1.0
            } else if diff < 0.0 {
                -1.0
            } else {
                0.0
            };
            if sign != 0.0 && step != 0.0 && step != sign {
                break;
            }
            if step != 0.0 {
                sign = step;
            }
            oldest = sample;
        }
        let dt = newest.time_ms.saturating_sub(oldest.time_ms);
        if dt == 0 {
            return 0.0;
        }
        (newest.scroll - oldest.scroll) / dt as f64
    }
}
