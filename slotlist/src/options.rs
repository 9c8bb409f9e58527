use std::sync::Arc;

use crate::{
    DEFAULT_DRAW_DISTANCE, EndReached, ItemKey, ItemSizeChanged, ItemType, Load, ScrollEvent,
    ScrollRequest, StartReached, StickyHeaderChange, ViewableRange,
};

/// Produces the stable key of `item` at `index`.
pub type KeyExtractor<T> = Arc<dyn Fn(&T, usize) -> ItemKey + Send + Sync>;

/// Per-item size estimate. Receives the index, the item and its type tag (if any).
pub type EstimatedItemSize<T> = Arc<dyn Fn(usize, &T, Option<&str>) -> f64 + Send + Sync>;

/// Per-item fixed size. `Some(size)` is treated as an authoritative measurement.
pub type FixedItemSize<T> = Arc<dyn Fn(usize, &T, Option<&str>) -> Option<f64> + Send + Sync>;

pub type GetItemType<T> = Arc<dyn Fn(&T, usize) -> ItemType + Send + Sync>;

pub type OnItemSizeChanged<T> = Arc<dyn Fn(&ItemSizeChanged<'_, T>) + Send + Sync>;
pub type OnEndReached = Arc<dyn Fn(EndReached) + Send + Sync>;
pub type OnStartReached = Arc<dyn Fn(StartReached) + Send + Sync>;
pub type OnStickyHeaderChange<T> = Arc<dyn Fn(StickyHeaderChange<'_, T>) + Send + Sync>;
pub type OnViewableRangeChanged<T> = Arc<dyn Fn(ViewableRange<'_, T>) + Send + Sync>;
pub type OnLoad = Arc<dyn Fn(Load) + Send + Sync>;
pub type OnScroll = Arc<dyn Fn(&ScrollEvent) + Send + Sync>;

/// Host primitive: move the native scroll view.
pub type ScrollToHandler = Arc<dyn Fn(ScrollRequest) + Send + Sync>;

/// Host primitive: shift the native scroll view by a delta without animation.
pub type ScrollAdjustHandler = Arc<dyn Fn(f64) + Send + Sync>;

/// Which changes keep a list that sits at its end pinned to the end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaintainScrollAtEnd {
    pub on_layout: bool,
    pub on_item_layout: bool,
    pub on_data_change: bool,
}

impl MaintainScrollAtEnd {
    pub const ALL: Self = Self {
        on_layout: true,
        on_item_layout: true,
        on_data_change: true,
    };

    pub const NONE: Self = Self {
        on_layout: false,
        on_item_layout: false,
        on_data_change: false,
    };
}

impl From<bool> for MaintainScrollAtEnd {
    fn from(enabled: bool) -> Self {
        if enabled { Self::ALL } else { Self::NONE }
    }
}

/// Configuration for [`crate::ListEngine`].
///
/// Cheap to clone: closures live in `Arc`s so hosts can tweak a few fields and hand the options
/// back through `ListEngine::update_options`.
pub struct ListOptions<T> {
    pub key_extractor: Option<KeyExtractor<T>>,

    /// Uniform size estimate for items that have not been measured.
    pub estimated_item_size: Option<f64>,
    /// Per-item estimate; takes precedence over `estimated_item_size`.
    pub get_estimated_item_size: Option<EstimatedItemSize<T>>,
    pub get_fixed_item_size: Option<FixedItemSize<T>>,
    pub get_item_type: Option<GetItemType<T>>,

    /// Extra main-axis distance rendered around the viewport.
    pub draw_distance: f64,
    pub num_columns: usize,
    pub horizontal: bool,
    /// Indexes rendered as sticky headers.
    pub sticky_indices: Vec<usize>,

    pub header_size: f64,
    pub footer_size: f64,
    pub padding_top: f64,
    pub padding_bottom: f64,

    /// Multiplier applied to the number of slots needed to fill the viewport.
    pub initial_container_pool_ratio: f64,

    /// Keep the first visible item stationary when content above it changes size.
    pub maintain_visible_content_position: bool,
    pub maintain_scroll_at_end: MaintainScrollAtEnd,

    /// Fraction of the viewport length.
    pub on_end_reached_threshold: f64,
    /// Fraction of the viewport length.
    pub on_start_reached_threshold: f64,

    pub initial_scroll_index: Option<usize>,
    pub initial_scroll_offset: Option<f64>,
    pub initial_scroll_at_end: bool,

    pub on_item_size_changed: Option<OnItemSizeChanged<T>>,
    pub on_end_reached: Option<OnEndReached>,
    pub on_start_reached: Option<OnStartReached>,
    pub on_sticky_header_change: Option<OnStickyHeaderChange<T>>,
    pub on_viewable_range_changed: Option<OnViewableRangeChanged<T>>,
    pub on_load: Option<OnLoad>,
    pub on_scroll: Option<OnScroll>,

    pub scroll_to_handler: Option<ScrollToHandler>,
    pub scroll_adjust_handler: Option<ScrollAdjustHandler>,
}

impl<T> Clone for ListOptions<T> {
    fn clone(&self) -> Self {
        Self {
            key_extractor: self.key_extractor.clone(),
            estimated_item_size: self.estimated_item_size,
            get_estimated_item_size: self.get_estimated_item_size.clone(),
            get_fixed_item_size: self.get_fixed_item_size.clone(),
            get_item_type: self.get_item_type.clone(),
            draw_distance: self.draw_distance,
            num_columns: self.num_columns,
            horizontal: self.horizontal,
            sticky_indices: self.sticky_indices.clone(),
            header_size: self.header_size,
            footer_size: self.footer_size,
            padding_top: self.padding_top,
            padding_bottom: self.padding_bottom,
            initial_container_pool_ratio: self.initial_container_pool_ratio,
            maintain_visible_content_position: self.maintain_visible_content_position,
            maintain_scroll_at_end: self.maintain_scroll_at_end,
            on_end_reached_threshold: self.on_end_reached_threshold,
            on_start_reached_threshold: self.on_start_reached_threshold,
            initial_scroll_index: self.initial_scroll_index,
            initial_scroll_offset: self.initial_scroll_offset,
            initial_scroll_at_end: self.initial_scroll_at_end,
            on_item_size_changed: self.on_item_size_changed.clone(),
            on_end_reached: self.on_end_reached.clone(),
            on_start_reached: self.on_start_reached.clone(),
            on_sticky_header_change: self.on_sticky_header_change.clone(),
            on_viewable_range_changed: self.on_viewable_range_changed.clone(),
            on_load: self.on_load.clone(),
            on_scroll: self.on_scroll.clone(),
            scroll_to_handler: self.scroll_to_handler.clone(),
            scroll_adjust_handler: self.scroll_adjust_handler.clone(),
        }
    }
}

impl<T> Default for ListOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListOptions<T> {
    /// Options for a vertical single-column list keyed by index.
    pub fn new() -> Self {
        Self {
            key_extractor: None,
            estimated_item_size: None,
            get_estimated_item_size: None,
            get_fixed_item_size: None,
            get_item_type: None,
            draw_distance: DEFAULT_DRAW_DISTANCE,
            num_columns: 1,
            horizontal: false,
            sticky_indices: Vec::new(),
            header_size: 0.0,
            footer_size: 0.0,
            padding_top: 0.0,
            padding_bottom: 0.0,
            initial_container_pool_ratio: 2.0,
            maintain_visible_content_position: false,
            maintain_scroll_at_end: MaintainScrollAtEnd::NONE,
            on_end_reached_threshold: 0.5,
            on_start_reached_threshold: 0.5,
            initial_scroll_index: None,
            initial_scroll_offset: None,
            initial_scroll_at_end: false,
            on_item_size_changed: None,
            on_end_reached: None,
            on_start_reached: None,
            on_sticky_header_change: None,
            on_viewable_range_changed: None,
            on_load: None,
            on_scroll: None,
            scroll_to_handler: None,
            scroll_adjust_handler: None,
        }
    }

    /// Use stable keys so measurements follow items across inserts and reorders.
    pub fn with_key_extractor(
        mut self,
        key_extractor: impl Fn(&T, usize) -> ItemKey + Send + Sync + 'static,
    ) -> Self {
        self.key_extractor = Some(Arc::new(key_extractor));
        self
    }

    pub fn with_estimated_item_size(mut self, size: f64) -> Self {
        self.estimated_item_size = Some(size);
        self
    }

    pub fn with_get_estimated_item_size(
        mut self,
        f: impl Fn(usize, &T, Option<&str>) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.get_estimated_item_size = Some(Arc::new(f));
        self
    }

    pub fn with_get_fixed_item_size(
        mut self,
        f: impl Fn(usize, &T, Option<&str>) -> Option<f64> + Send + Sync + 'static,
    ) -> Self {
        self.get_fixed_item_size = Some(Arc::new(f));
        self
    }

    pub fn with_get_item_type(
        mut self,
        f: impl Fn(&T, usize) -> ItemType + Send + Sync + 'static,
    ) -> Self {
        self.get_item_type = Some(Arc::new(f));
        self
    }

    pub fn with_draw_distance(mut self, draw_distance: f64) -> Self {
        self.draw_distance = draw_distance;
        self
    }

    pub fn with_num_columns(mut self, num_columns: usize) -> Self {
        self.num_columns = num_columns;
        self
    }

    pub fn with_horizontal(mut self, horizontal: bool) -> Self {
        self.horizontal = horizontal;
        self
    }

    pub fn with_sticky_indices(mut self, sticky_indices: impl Into<Vec<usize>>) -> Self {
        self.sticky_indices = sticky_indices.into();
        self
    }

    pub fn with_header_size(mut self, header_size: f64) -> Self {
        self.header_size = header_size;
        self
    }

    pub fn with_footer_size(mut self, footer_size: f64) -> Self {
        self.footer_size = footer_size;
        self
    }

    pub fn with_padding(mut self, padding_top: f64, padding_bottom: f64) -> Self {
        self.padding_top = padding_top;
        self.padding_bottom = padding_bottom;
        self
    }

    pub fn with_initial_container_pool_ratio(mut self, ratio: f64) -> Self {
        self.initial_container_pool_ratio = ratio;
        self
    }

    pub fn with_maintain_visible_content_position(mut self, enabled: bool) -> Self {
        self.maintain_visible_content_position = enabled;
        self
    }

    pub fn with_maintain_scroll_at_end(mut self, config: impl Into<MaintainScrollAtEnd>) -> Self {
        self.maintain_scroll_at_end = config.into();
        self
    }

    pub fn with_on_end_reached_threshold(mut self, threshold: f64) -> Self {
        self.on_end_reached_threshold = threshold;
        self
    }

    pub fn with_on_start_reached_threshold(mut self, threshold: f64) -> Self {
        self.on_start_reached_threshold = threshold;
        self
    }

    pub fn with_initial_scroll_index(mut self, index: Option<usize>) -> Self {
        self.initial_scroll_index = index;
        self
    }

    pub fn with_initial_scroll_offset(mut self, offset: Option<f64>) -> Self {
        self.initial_scroll_offset = offset;
        self
    }

    pub fn with_initial_scroll_at_end(mut self, at_end: bool) -> Self {
        self.initial_scroll_at_end = at_end;
        self
    }

    pub fn with_on_item_size_changed(
        mut self,
        f: impl Fn(&ItemSizeChanged<'_, T>) + Send + Sync + 'static,
    ) -> Self {
        self.on_item_size_changed = Some(Arc::new(f));
        self
    }

    pub fn with_on_end_reached(mut self, f: impl Fn(EndReached) + Send + Sync + 'static) -> Self {
        self.on_end_reached = Some(Arc::new(f));
        self
    }

    pub fn with_on_start_reached(
        mut self,
        f: impl Fn(StartReached) + Send + Sync + 'static,
    ) -> Self {
        self.on_start_reached = Some(Arc::new(f));
        self
    }

    pub fn with_on_sticky_header_change(
        mut self,
        f: impl Fn(StickyHeaderChange<'_, T>) + Send + Sync + 'static,
    ) -> Self {
        self.on_sticky_header_change = Some(Arc::new(f));
        self
    }

    pub fn with_on_viewable_range_changed(
        mut self,
        f: impl Fn(ViewableRange<'_, T>) + Send + Sync + 'static,
    ) -> Self {
        self.on_viewable_range_changed = Some(Arc::new(f));
        self
    }

    pub fn with_on_load(mut self, f: impl Fn(Load) + Send + Sync + 'static) -> Self {
        self.on_load = Some(Arc::new(f));
        self
    }

    pub fn with_on_scroll(mut self, f: impl Fn(&ScrollEvent) + Send + Sync + 'static) -> Self {
        self.on_scroll = Some(Arc::new(f));
        self
    }

    pub fn with_scroll_to_handler(
        mut self,
        f: impl Fn(ScrollRequest) + Send + Sync + 'static,
    ) -> Self {
        self.scroll_to_handler = Some(Arc::new(f));
        self
    }

    pub fn with_scroll_adjust_handler(mut self, f: impl Fn(f64) + Send + Sync + 'static) -> Self {
        self.scroll_adjust_handler = Some(Arc::new(f));
        self
    }

    pub(crate) fn columns(&self) -> usize {
        self.num_columns.max(1)
    }

    /// Main-axis space before the first item.
    pub(crate) fn top_inset(&self) -> f64 {
        self.padding_top + self.header_size
    }

    /// Main-axis space after the last item.
    pub(crate) fn bottom_inset(&self) -> f64 {
        self.padding_bottom + self.footer_size
    }
}

impl<T> core::fmt::Debug for ListOptions<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListOptions")
            .field("keyed", &self.key_extractor.is_some())
            .field("estimated_item_size", &self.estimated_item_size)
            .field("draw_distance", &self.draw_distance)
            .field("num_columns", &self.num_columns)
            .field("horizontal", &self.horizontal)
            .field("sticky_indices", &self.sticky_indices)
            .field("header_size", &self.header_size)
            .field("footer_size", &self.footer_size)
            .field("padding_top", &self.padding_top)
            .field("padding_bottom", &self.padding_bottom)
            .field(
                "maintain_visible_content_position",
                &self.maintain_visible_content_position,
            )
            .field("maintain_scroll_at_end", &self.maintain_scroll_at_end)
            .field("on_end_reached_threshold", &self.on_end_reached_threshold)
            .field("on_start_reached_threshold", &self.on_start_reached_threshold)
            .field("initial_scroll_index", &self.initial_scroll_index)
            .field("initial_scroll_offset", &self.initial_scroll_offset)
            .field("initial_scroll_at_end", &self.initial_scroll_at_end)
            .finish_non_exhaustive()
    }
}
