//! Box alignment properties shared by flexbox and grid.

/// Alignment of items along the cross axis (flexbox) or block/inline axis (grid).
///
/// Used for `align-items`, `align-self`, `justify-items` and `justify-self`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignItems {
    Start,
    End,
    FlexStart,
    FlexEnd,
    Center,
    Baseline,
    Stretch,
}

pub type AlignSelf = AlignItems;
pub type JustifyItems = AlignItems;
pub type JustifySelf = AlignItems;

/// Distribution of free space between lines (flexbox) or tracks (grid), and between
/// items along a flex line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignContent {
    Start,
    End,
    FlexStart,
    FlexEnd,
    Center,
    Stretch,
    SpaceBetween,
    SpaceEvenly,
    SpaceAround,
}

pub type JustifyContent = AlignContent;
