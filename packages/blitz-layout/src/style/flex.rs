//! Flex container properties.

use crate::geometry::AbsoluteAxis;

/// The direction of the main axis of a flex container
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
    RowReverse,
    ColumnReverse,
}

impl FlexDirection {
    #[inline]
    pub fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    #[inline]
    pub fn is_column(self) -> bool {
        matches!(self, Self::Column | Self::ColumnReverse)
    }

    #[inline]
    pub fn is_reverse(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }

    pub fn main_axis(self) -> AbsoluteAxis {
        if self.is_row() {
            AbsoluteAxis::Horizontal
        } else {
            AbsoluteAxis::Vertical
        }
    }

    pub fn cross_axis(self) -> AbsoluteAxis {
        self.main_axis().other_axis()
    }
}

/// Whether flex items are forced onto a single line or may wrap
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlexWrap {
    #[default]
    NoWrap,
    Wrap,
    WrapReverse,
}
