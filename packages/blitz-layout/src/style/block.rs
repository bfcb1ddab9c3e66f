//! Block container properties.

/// Legacy `text-align` values (`-webkit-left` etc.) that align block-level children.
///
/// `Auto` leaves children at the start edge.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextAlign {
    #[default]
    Auto,
    LegacyLeft,
    LegacyRight,
    LegacyCenter,
}
