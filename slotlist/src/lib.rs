//! A headless virtualized list engine with recycled rendering slots.
//!
//! For a host-loop driver (simulated scroll view, tweened scrolls), see the `slotlist-adapter`
//! crate.
//!
//! The engine keeps a position model for items whose sizes may be known, measured later,
//! estimated, or averaged per item type. From that model it computes which items are in view
//! (with a draw-distance buffer), assigns them to a bounded pool of reusable containers, keeps
//! the visible content stationary when sizes above it change, and detects when the list nears
//! its start or end.
//!
//! It is UI-agnostic. The host is expected to provide:
//! - viewport layouts and scroll events
//! - item layouts (measured sizes) for rendered containers
//! - a scroll-to and a scroll-by primitive (`ListOptions::scroll_to_handler`,
//!   `ListOptions::scroll_adjust_handler`)
//! - timer ticks and animation frames (`ListEngine::tick`, `ListEngine::on_animation_frame`)
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod calculate;
mod containers;
mod engine;
mod error;
mod key;
mod mvcp;
mod options;
mod scroll;
mod scroll_to;
mod sizes;
mod state;
mod threshold;
mod types;


pub use engine::ListEngine;
pub use error::{Error, Result};
pub use mvcp::MvcpSnapshot;
pub use options::{
    EstimatedItemSize, FixedItemSize, GetItemType, KeyExtractor, ListOptions,
    MaintainScrollAtEnd, OnEndReached, OnItemSizeChanged, OnLoad, OnScroll, OnStartReached,
    OnStickyHeaderChange, OnViewableRangeChanged, ScrollAdjustHandler, ScrollToHandler,
};
pub use scroll::ScrollSample;
pub use state::{ItemLayout, ListSnapshot};
pub use threshold::{
    THRESHOLD_RESET_FACTOR, ThresholdContext, ThresholdSnapshot, ThresholdState, check_threshold,
};
pub use types::{
    AT_EDGE_FRACTION, AverageSize, Container, DEFAULT_DRAW_DISTANCE, DEFAULT_ITEM_SIZE,
    EndReached, ItemKey, ItemSizeChanged, ItemType, Load, MVCP_IGNORE_BAND_MS, Point,
    SCROLL_HISTORY_LEN, SCROLL_TO_SETTLE_MS, ScrollDirection, ScrollEvent, ScrollRequest,
    ScrollToEndParams, ScrollToIndexParams, ScrollToOffsetParams, Size, StartReached,
    StickyHeaderChange, ViewableRange, VisibleRange,
};
