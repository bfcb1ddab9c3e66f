//! Inputs and outputs of a layout computation.

use crate::geometry::{Line, Point, Rect, Size};
use crate::style::AvailableSpace;

/// Whether a layout call should produce final positions or only a size
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RunMode {
    /// Compute the node's size and write the final layout of its children
    PerformLayout,
    /// Only compute the node's size
    ComputeSize,
    /// The node is hidden (`Display::None` or inside a hidden subtree)
    PerformHiddenLayout,
}

/// Whether a node's own size styles apply to the call
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SizingMode {
    /// Ignore `size`, `min_size`, `max_size` and `aspect_ratio`, measuring only the content
    ContentSize,
    /// Apply the node's size styles
    InherentSize,
}

/// Constraints passed from a parent to a child
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayoutInput {
    pub run_mode: RunMode,
    pub sizing_mode: SizingMode,
    /// Border-box sizes the parent has already determined
    pub known_dimensions: Size<Option<f32>>,
    /// The containing block size percentages resolve against
    pub parent_size: Size<Option<f32>>,
    pub available_space: Size<AvailableSpace>,
}

impl LayoutInput {
    pub const HIDDEN: LayoutInput = LayoutInput {
        run_mode: RunMode::PerformHiddenLayout,
        sizing_mode: SizingMode::InherentSize,
        known_dimensions: Size::<Option<f32>>::NONE,
        parent_size: Size::<Option<f32>>::NONE,
        available_space: Size::<AvailableSpace>::MAX_CONTENT,
    };
}

/// What a layout call returns to the parent
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayoutOutput {
    /// Border-box size of the node
    pub size: Size<f32>,
    /// Size of the node's scrollable overflow
    pub content_size: Size<f32>,
    /// Offset of the first baseline from the node's top/left border edge
    pub first_baselines: Point<Option<f32>>,
}

impl LayoutOutput {
    pub const HIDDEN: LayoutOutput = LayoutOutput {
        size: Size::ZERO,
        content_size: Size::ZERO,
        first_baselines: Point::NONE,
    };

    pub fn from_outer_size(size: Size<f32>) -> Self {
        Self::from_sizes(size, Size::ZERO)
    }

    pub fn from_sizes(size: Size<f32>, content_size: Size<f32>) -> Self {
        Self {
            size,
            content_size,
            first_baselines: Point::NONE,
        }
    }

    pub fn with_first_baseline(mut self, baseline: Option<f32>) -> Self {
        self.first_baselines.y = baseline;
        self
    }
}

/// The final geometry of a node
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    /// Paint order; equal to the node's index among its siblings
    pub order: u32,
    /// Top-left corner of the border box, relative to the parent's border box
    pub location: Point<f32>,
    /// Border-box size
    pub size: Size<f32>,
    /// Size of the scrollable content, including overflowing descendants
    pub content_size: Size<f32>,
    /// Space reserved for scrollbars on each axis
    pub scrollbar_size: Size<f32>,
    pub border: Rect<f32>,
    pub padding: Rect<f32>,
    pub margin: Rect<f32>,
}

impl Layout {
    pub const fn new() -> Self {
        Self::with_order(0)
    }

    pub const fn with_order(order: u32) -> Self {
        Self {
            order,
            location: Point::ZERO,
            size: Size::ZERO,
            content_size: Size::ZERO,
            scrollbar_size: Size::ZERO,
            border: Rect::ZERO,
            padding: Rect::ZERO,
            margin: Rect::ZERO,
        }
    }

    /// Width of the content box
    pub fn content_box_width(&self) -> f32 {
        self.size.width
            - self.padding.horizontal_axis_sum()
            - self.border.horizontal_axis_sum()
            - self.scrollbar_size.width
    }

    /// Height of the content box
    pub fn content_box_height(&self) -> f32 {
        self.size.height
            - self.padding.vertical_axis_sum()
            - self.border.vertical_axis_sum()
            - self.scrollbar_size.height
    }
}

/// Per-algorithm diagnostic information about the last layout of a node
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DetailedLayoutInfo {
    Grid(Box<DetailedGridInfo>),
    None,
}

/// Track and item information for a grid container
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetailedGridInfo {
    pub rows: DetailedGridTracksInfo,
    pub columns: DetailedGridTracksInfo,
    pub items: Vec<DetailedGridItemsInfo>,
}

/// The tracks of one grid axis
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetailedGridTracksInfo {
    /// Implicit tracks created before the explicit grid
    pub negative_implicit_tracks: u16,
    pub explicit_tracks: u16,
    /// Implicit tracks created after the explicit grid
    pub positive_implicit_tracks: u16,
    /// Size of each gutter between consecutive tracks
    pub gutters: Vec<f32>,
    pub sizes: Vec<f32>,
}

/// Where a grid item ended up, as 1-based line numbers counted from the first implicit line
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetailedGridItemsInfo {
    pub row_start: u16,
    pub row_end: u16,
    pub column_start: u16,
    pub column_end: u16,
}

impl DetailedGridItemsInfo {
    pub fn rows(&self) -> Line<u16> {
        Line {
            start: self.row_start,
            end: self.row_end,
        }
    }

    pub fn columns(&self) -> Line<u16> {
        Line {
            start: self.column_start,
            end: self.column_end,
        }
    }
}
