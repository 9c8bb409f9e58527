use std::sync::Arc;

/// Stable identity of a data item.
///
/// Produced by `ListOptions::key_extractor`; without one the decimal index is used.
pub type ItemKey = Arc<str>;

/// Type tag returned by `ListOptions::get_item_type`; average sizes are tracked per tag.
pub type ItemType = Arc<str>;

/// Estimate used when neither `estimated_item_size` nor `get_estimated_item_size` is configured.
pub const DEFAULT_ITEM_SIZE: f64 = 100.0;

/// Default `draw_distance`: extra main-axis space rendered around the viewport.
pub const DEFAULT_DRAW_DISTANCE: f64 = 250.0;

/// Lifetime of the echo-suppression band installed by a scroll adjustment.
pub const MVCP_IGNORE_BAND_MS: u64 = 100;

/// How long a non-animated programmatic scroll waits for its echo before it is considered done.
pub const SCROLL_TO_SETTLE_MS: u64 = 100;

/// Number of scroll samples kept for velocity.
pub const SCROLL_HISTORY_LEN: usize = 5;

/// Fraction of the viewport within which the list counts as "at the end" (and "at the start").
pub const AT_EDGE_FRACTION: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component along the scroll axis.
    pub fn main(self, horizontal: bool) -> f64 {
        if horizontal { self.x } else { self.y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent along the scroll axis.
    pub fn main(self, horizontal: bool) -> f64 {
        if horizontal { self.width } else { self.height }
    }

    /// Extent across the scroll axis.
    pub fn cross(self, horizontal: bool) -> f64 {
        if horizontal { self.height } else { self.width }
    }

    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// A native scroll event as reported by the host scroll view.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollEvent {
    pub content_offset: Point,
    pub content_size: Size,
    pub layout_measurement: Option<Size>,
}

impl ScrollEvent {
    /// A vertical scroll event at `offset` over content of the given height.
    pub fn vertical(offset: f64, content_height: f64) -> Self {
        Self {
            content_offset: Point::new(0.0, offset),
            content_size: Size::new(1.0, content_height),
            layout_measurement: None,
        }
    }
}

/// The four boundaries computed by the visible-range calculator.
///
/// When all four are present, `start_buffered <= start_no_buffer <= end_no_buffer <=
/// end_buffered`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start_no_buffer: Option<usize>,
    pub end_no_buffer: Option<usize>,
    pub start_buffered: Option<usize>,
    pub end_buffered: Option<usize>,
}

impl VisibleRange {
    pub fn is_empty(&self) -> bool {
        self.start_buffered.is_none() || self.end_buffered.is_none()
    }

    pub fn is_ordered(&self) -> bool {
        match (
            self.start_buffered,
            self.start_no_buffer,
            self.end_no_buffer,
            self.end_buffered,
        ) {
            (Some(sb), Some(snb), Some(enb), Some(eb)) => sb <= snb && snb <= enb && enb <= eb,
            _ => true,
        }
    }

    pub fn contains_buffered(&self, index: usize) -> bool {
        match (self.start_buffered, self.end_buffered) {
            (Some(start), Some(end)) => start <= index && index <= end,
            _ => false,
        }
    }

    pub fn contains_visible(&self, index: usize) -> bool {
        match (self.start_no_buffer, self.end_no_buffer) {
            (Some(start), Some(end)) => start <= index && index <= end,
            _ => false,
        }
    }
}

/// A reusable rendering slot.
///
/// `position` is the absolute main-axis offset the host should render the slot at (header and
/// top padding included). For the active sticky header it is the pinned offset.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Container {
    pub item_key: Option<ItemKey>,
    pub index: Option<usize>,
    pub position: f64,
    pub column: usize,
    pub sticky: bool,
}

impl Container {
    pub fn is_empty(&self) -> bool {
        self.item_key.is_none()
    }
}

/// Outbound request for the host scroll view to move.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollRequest {
    pub offset: f64,
    pub animated: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollToIndexParams {
    pub index: usize,
    pub animated: bool,
    /// Extra offset subtracted from the computed target.
    pub view_offset: f64,
    /// Where the item lands in the viewport: `0` leading edge, `1` trailing edge.
    ///
    /// Defaults to `1` for the last item and `0` otherwise.
    pub view_position: Option<f64>,
}

impl ScrollToIndexParams {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    pub fn view_offset(mut self, view_offset: f64) -> Self {
        self.view_offset = view_offset;
        self
    }

    pub fn view_position(mut self, view_position: f64) -> Self {
        self.view_position = Some(view_position);
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollToOffsetParams {
    pub offset: f64,
    pub animated: bool,
    pub view_offset: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollToEndParams {
    pub animated: bool,
    pub view_offset: f64,
}

/// Running average of measured sizes for one item type.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AverageSize {
    pub avg: f64,
    pub num: u32,
}

impl AverageSize {
    pub(crate) fn push(&mut self, size: f64) {
        self.avg += (size - self.avg) / f64::from(self.num + 1);
        self.num += 1;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndReached {
    pub distance_from_end: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartReached {
    pub distance_from_start: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Load {
    pub elapsed_time_in_ms: u64,
}

/// Payload of `on_item_size_changed`.
#[derive(Debug)]
pub struct ItemSizeChanged<'a, T> {
    pub size: f64,
    pub previous: Option<f64>,
    pub index: usize,
    pub item_key: &'a ItemKey,
    pub item_data: &'a T,
}

/// Payload of `on_sticky_header_change`.
#[derive(Debug)]
pub struct StickyHeaderChange<'a, T> {
    pub index: usize,
    pub item: &'a T,
}

/// Payload of `on_viewable_range_changed`.
///
/// `items` are the data items of `[start_no_buffer, end_no_buffer]`.
#[derive(Debug)]
pub struct ViewableRange<'a, T> {
    pub range: VisibleRange,
    pub items: &'a [T],
}
