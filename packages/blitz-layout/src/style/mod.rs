//! The style model: every property that parameterizes a layout algorithm.
//!
//! A [`Style`] is plain data. It is attached to a node when the node is created or replaced
//! wholesale with [`LayoutTree::set_style`](crate::LayoutTree::set_style).

mod alignment;
mod block;
mod dimension;
mod flex;
mod grid;

pub use alignment::{
    AlignContent, AlignItems, AlignSelf, JustifyContent, JustifyItems, JustifySelf,
};
pub use block::TextAlign;
pub use dimension::{
    Dimension, LengthPercentage, LengthPercentageAuto, MaybeResolve, ResolveOrZero,
};
pub use flex::{FlexDirection, FlexWrap};
pub use grid::{
    GridAutoFlow, GridPlacement, GridTemplateArea, GridTemplateComponent, GridTemplateRepetition,
    MaxTrackSizingFunction, MinTrackSizingFunction, RepetitionCount, TrackSizingFunction,
};

use crate::geometry::{Line, Point, Rect, Size};

/// Which layout algorithm a node uses for its children
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Display {
    #[default]
    Block,
    Flex,
    Grid,
    /// The node and its subtree are hidden and take up no space
    None,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    /// In flow, optionally offset by `inset`
    #[default]
    Relative,
    /// Out of flow, positioned against the parent's padding box
    Absolute,
}

/// Which box `size`, `min_size` and `max_size` refer to
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoxSizing {
    #[default]
    BorderBox,
    ContentBox,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Overflow {
    #[default]
    Visible,
    Clip,
    Hidden,
    /// Like `Hidden`, and also reserves space for a scrollbar
    Scroll,
}

impl Overflow {
    /// Whether this value establishes a scroll container
    #[inline]
    pub fn is_scroll_container(self) -> bool {
        matches!(self, Self::Hidden | Self::Scroll)
    }

    /// Scroll containers have an automatic minimum size of zero
    #[inline]
    pub(crate) fn maybe_into_automatic_min_size(self) -> Option<f32> {
        self.is_scroll_container().then_some(0.0)
    }
}

/// The layout-relevant style of a single node
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Style {
    pub display: Display,
    pub box_sizing: BoxSizing,
    pub position: Position,
    pub overflow: Point<Overflow>,
    /// Width of the scrollbar gutter reserved by `Overflow::Scroll`
    pub scrollbar_width: f32,
    pub inset: Rect<LengthPercentageAuto>,

    pub size: Size<Dimension>,
    pub min_size: Size<Dimension>,
    pub max_size: Size<Dimension>,
    /// Width divided by height
    pub aspect_ratio: Option<f32>,

    pub margin: Rect<LengthPercentageAuto>,
    pub padding: Rect<LengthPercentage>,
    pub border: Rect<LengthPercentage>,

    /// `None` behaves as `Stretch`
    pub align_items: Option<AlignItems>,
    /// `None` inherits the parent's `align_items`
    pub align_self: Option<AlignSelf>,
    pub justify_items: Option<AlignItems>,
    pub justify_self: Option<AlignSelf>,
    pub align_content: Option<AlignContent>,
    pub justify_content: Option<JustifyContent>,
    /// Gutter between rows (`height`) and between columns (`width`)
    pub gap: Size<LengthPercentage>,

    // Block
    pub text_align: TextAlign,
    /// Tables shrink to fit rather than stretching to the container width
    pub is_table: bool,
    /// Replaced content (images and the like) sizes from its measured or ratio-derived size
    /// instead of stretching
    pub is_replaced: bool,

    // Flexbox
    pub flex_direction: FlexDirection,
    pub flex_wrap: FlexWrap,
    pub flex_basis: Dimension,
    pub flex_grow: f32,
    pub flex_shrink: f32,

    // Grid container
    pub grid_template_rows: Vec<GridTemplateComponent>,
    pub grid_template_columns: Vec<GridTemplateComponent>,
    pub grid_auto_rows: Vec<TrackSizingFunction>,
    pub grid_auto_columns: Vec<TrackSizingFunction>,
    pub grid_auto_flow: GridAutoFlow,
    pub grid_template_areas: Vec<GridTemplateArea>,
    /// Names for each line between the top-level row components
    pub grid_template_row_names: Vec<Vec<String>>,
    pub grid_template_column_names: Vec<Vec<String>>,

    // Grid item
    pub grid_row: Line<GridPlacement>,
    pub grid_column: Line<GridPlacement>,
}

impl Style {
    pub const DEFAULT: Style = Style {
        display: Display::Block,
        box_sizing: BoxSizing::BorderBox,
        position: Position::Relative,
        overflow: Point {
            x: Overflow::Visible,
            y: Overflow::Visible,
        },
        scrollbar_width: 0.0,
        inset: Rect::<LengthPercentageAuto>::AUTO,
        size: Size::<Dimension>::AUTO,
        min_size: Size::<Dimension>::AUTO,
        max_size: Size::<Dimension>::AUTO,
        aspect_ratio: None,
        margin: Rect {
            left: LengthPercentageAuto::ZERO,
            right: LengthPercentageAuto::ZERO,
            top: LengthPercentageAuto::ZERO,
            bottom: LengthPercentageAuto::ZERO,
        },
        padding: Rect::<LengthPercentage>::length(0.0),
        border: Rect::<LengthPercentage>::length(0.0),
        align_items: None,
        align_self: None,
        justify_items: None,
        justify_self: None,
        align_content: None,
        justify_content: None,
        gap: Size {
            width: LengthPercentage::ZERO,
            height: LengthPercentage::ZERO,
        },
        text_align: TextAlign::Auto,
        is_table: false,
        is_replaced: false,
        flex_direction: FlexDirection::Row,
        flex_wrap: FlexWrap::NoWrap,
        flex_basis: Dimension::Auto,
        flex_grow: 0.0,
        flex_shrink: 1.0,
        grid_template_rows: Vec::new(),
        grid_template_columns: Vec::new(),
        grid_auto_rows: Vec::new(),
        grid_auto_columns: Vec::new(),
        grid_auto_flow: GridAutoFlow::Row,
        grid_template_areas: Vec::new(),
        grid_template_row_names: Vec::new(),
        grid_template_column_names: Vec::new(),
        grid_row: Line::<GridPlacement>::AUTO,
        grid_column: Line::<GridPlacement>::AUTO,
    };

    /// The gutter width reserved on each axis by scrolling overflow.
    ///
    /// A vertical scrollbar (overflow-y: scroll) takes up horizontal space and vice versa.
    pub(crate) fn scrollbar_gutter(&self) -> Size<f32> {
        let width = self.scrollbar_width.max(0.0);
        Size {
            width: if self.overflow.y == Overflow::Scroll { width } else { 0.0 },
            height: if self.overflow.x == Overflow::Scroll { width } else { 0.0 },
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Style::DEFAULT
    }
}

/// The space a parent offers a child along one axis
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AvailableSpace {
    /// A fixed amount of space
    Definite(f32),
    /// Size to the smallest size the content can take without overflowing
    MinContent,
    /// Size to the largest size the content wants
    MaxContent,
}

impl AvailableSpace {
    pub const ZERO: AvailableSpace = AvailableSpace::Definite(0.0);

    pub const fn is_definite(self) -> bool {
        matches!(self, Self::Definite(_))
    }

    pub fn into_option(self) -> Option<f32> {
        match self {
            Self::Definite(value) => Some(value),
            _ => None,
        }
    }

    pub fn unwrap_or(self, default: f32) -> f32 {
        self.into_option().unwrap_or(default)
    }

    /// Replace a definite value with `value` when it is `Some`
    pub fn maybe_set(self, value: Option<f32>) -> AvailableSpace {
        match value {
            Some(value) => Self::Definite(value),
            None => self,
        }
    }

    pub fn map_definite_value(self, f: impl FnOnce(f32) -> f32) -> AvailableSpace {
        match self {
            Self::Definite(value) => Self::Definite(f(value)),
            other => other,
        }
    }

    pub fn maybe_sub(self, rhs: f32) -> AvailableSpace {
        self.map_definite_value(|value| value - rhs)
    }

    /// Cache key equality: definite values compare numerically, the content-based
    /// constraints compare by kind.
    pub fn is_same_constraint(self, other: AvailableSpace) -> bool {
        match (self, other) {
            (Self::Definite(a), Self::Definite(b)) => a == b,
            (Self::MinContent, Self::MinContent) => true,
            (Self::MaxContent, Self::MaxContent) => true,
            _ => false,
        }
    }
}

impl From<f32> for AvailableSpace {
    fn from(value: f32) -> Self {
        Self::Definite(value)
    }
}

impl From<Option<f32>> for AvailableSpace {
    fn from(value: Option<f32>) -> Self {
        match value {
            Some(value) => Self::Definite(value),
            None => Self::MaxContent,
        }
    }
}

impl Size<AvailableSpace> {
    pub const MAX_CONTENT: Size<AvailableSpace> = Size {
        width: AvailableSpace::MaxContent,
        height: AvailableSpace::MaxContent,
    };

    pub const MIN_CONTENT: Size<AvailableSpace> = Size {
        width: AvailableSpace::MinContent,
        height: AvailableSpace::MinContent,
    };

    pub const fn from_definite(width: f32, height: f32) -> Self {
        Size {
            width: AvailableSpace::Definite(width),
            height: AvailableSpace::Definite(height),
        }
    }

    pub fn into_options(self) -> Size<Option<f32>> {
        Size {
            width: self.width.into_option(),
            height: self.height.into_option(),
        }
    }
}
