//! Host-loop driver for the `slotlist` crate.
//!
//! `slotlist` is UI-agnostic: it emits scroll requests and expects scroll events, layouts and
//! timer ticks back. This crate provides the framework-neutral pieces an adapter usually needs
//! around it:
//!
//! - [`Controller`], which owns an engine and stands in for the native scroll view (applies
//!   requested offsets, echoes them back asynchronously, runs deadlines and animation frames)
//! - [`Tween`] / [`Easing`] for animated scrolls
//!
//! No UI toolkit bindings live here.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod controller;
mod tween;

#[cfg(test)]
mod tests;

pub use controller::{Controller, DEFAULT_SCROLL_DURATION_MS, HostOp};
pub use tween::{Easing, Tween};
