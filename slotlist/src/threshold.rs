use crate::engine::ListEngine;
use crate::{AT_EDGE_FRACTION, EndReached, StartReached};

/// Once reached, a boundary resets only after moving this many thresholds away.
pub const THRESHOLD_RESET_FACTOR: f64 = 1.3;

/// What the list looked like the last time a boundary callback fired.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdSnapshot {
    pub scroll_position: f64,
    pub content_size: f64,
    pub data_length: usize,
    pub at_threshold: bool,
}

/// Inputs describing the current list, recorded into the snapshot when a callback fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdContext {
    pub scroll_position: f64,
    pub content_size: f64,
    pub data_length: usize,
}

/// Tri-state boundary flag plus the snapshot of the last firing.
///
/// `reached` is `None` until the first evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdState {
    pub reached: Option<bool>,
    pub snapshot: Option<ThresholdSnapshot>,
}

impl ThresholdState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Boundary-crossing detector with hysteresis.
///
/// `distance` is the signed distance to the boundary, `threshold` the absolute distance that
/// counts as "near". `at_threshold` forces the boundary to count as reached (content shorter
/// than the viewport). `on_reached` receives `distance` whenever the callback should fire.
pub fn check_threshold(
    state: &mut ThresholdState,
    distance: f64,
    at_threshold: bool,
    threshold: f64,
    context: ThresholdContext,
    on_reached: impl FnOnce(f64),
) {
    let abs = distance.abs();
    let within = at_threshold || (threshold > 0.0 && abs <= threshold);
    let snapshot = ThresholdSnapshot {
        scroll_position: context.scroll_position,
        content_size: context.content_size,
        data_length: context.data_length,
        at_threshold,
    };

    match state.reached {
        None => {
            if !within {
                state.reached = Some(false);
            } else if !at_threshold && distance >= 0.0 {
                // Mounted near the boundary: wait for the user to get there.
            } else {
                state.reached = Some(true);
                state.snapshot = Some(snapshot);
                on_reached(distance);
            }
        }
        Some(false) => {
            if within {
                state.reached = Some(true);
                state.snapshot = Some(snapshot);
                on_reached(distance);
            }
        }
        Some(true) => {
            let moved_away = if threshold > 0.0 {
                abs >= threshold * THRESHOLD_RESET_FACTOR
            } else {
                abs > 0.0
            };
            if !at_threshold && moved_away {
                state.reached = Some(false);
                state.snapshot = None;
                return;
            }
            if !within {
                return;
            }
            let changed = match state.snapshot {
                Some(prev) => {
                    prev.content_size != snapshot.content_size
                        || prev.data_length != snapshot.data_length
                        || prev.at_threshold != snapshot.at_threshold
                }
                None => true,
            };
            if changed {
                state.snapshot = Some(snapshot);
                on_reached(distance);
            }
        }
    }
}

impl<T> ListEngine<T> {
    /// Re-evaluates start/end reached and the at-start/at-end flags.
    pub(crate) fn check_thresholds(&mut self) {
        if self.scroll_length <= 0.0 {
            return;
        }
        let scroll = self.tracker.scroll;
        let length = self.scroll_length;
        let content_size = self.content_size();
        let distance_from_end = content_size - scroll - length;
        self.at_end = distance_from_end < AT_EDGE_FRACTION * length;
        self.at_start = scroll <= 0.0;

        let context = ThresholdContext {
            scroll_position: scroll,
            content_size,
            data_length: self.data.len(),
        };

        let on_end = self.options.on_end_reached.clone();
        check_threshold(
            &mut self.end_reached,
            distance_from_end,
            content_size < length,
            self.options.on_end_reached_threshold * length,
            context,
            |distance| {
                sdebug!(distance, "end reached");
                if let Some(cb) = on_end {
                    cb(EndReached {
                        distance_from_end: distance,
                    });
                }
            },
        );

        let on_start = self.options.on_start_reached.clone();
        check_threshold(
            &mut self.start_reached,
            scroll,
            false,
            self.options.on_start_reached_threshold * length,
            context,
            |distance| {
                sdebug!(distance, "start reached");
                if let Some(cb) = on_start {
                    cb(StartReached {
                        distance_from_start: distance,
                    });
                }
            },
        );
    }
}
