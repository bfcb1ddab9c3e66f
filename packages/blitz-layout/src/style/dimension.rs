//! Length units and their resolution against a containing size.

use crate::geometry::{Rect, Size};

/// A length that is either an absolute value or a percentage of the containing block
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LengthPercentage {
    /// An absolute length in layout units
    Length(f32),
    /// A fraction of the containing size (`0.5` is 50%)
    Percent(f32),
}

impl LengthPercentage {
    pub const ZERO: Self = Self::Length(0.0);

    pub const fn length(value: f32) -> Self {
        Self::Length(value)
    }

    pub const fn percent(fraction: f32) -> Self {
        Self::Percent(fraction)
    }
}

/// Like [`LengthPercentage`] but also accepting `auto`
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LengthPercentageAuto {
    Length(f32),
    Percent(f32),
    Auto,
}

impl LengthPercentageAuto {
    pub const ZERO: Self = Self::Length(0.0);
    pub const AUTO: Self = Self::Auto;

    pub const fn length(value: f32) -> Self {
        Self::Length(value)
    }

    pub const fn percent(fraction: f32) -> Self {
        Self::Percent(fraction)
    }

    pub const fn auto() -> Self {
        Self::Auto
    }

    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl From<LengthPercentage> for LengthPercentageAuto {
    fn from(value: LengthPercentage) -> Self {
        match value {
            LengthPercentage::Length(v) => Self::Length(v),
            LengthPercentage::Percent(v) => Self::Percent(v),
        }
    }
}

/// A sizing value: a length, a percentage or `auto`
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dimension {
    Length(f32),
    Percent(f32),
    Auto,
}

impl Dimension {
    pub const ZERO: Self = Self::Length(0.0);
    pub const AUTO: Self = Self::Auto;

    pub const fn length(value: f32) -> Self {
        Self::Length(value)
    }

    pub const fn percent(fraction: f32) -> Self {
        Self::Percent(fraction)
    }

    pub const fn auto() -> Self {
        Self::Auto
    }

    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl From<LengthPercentage> for Dimension {
    fn from(value: LengthPercentage) -> Self {
        match value {
            LengthPercentage::Length(v) => Self::Length(v),
            LengthPercentage::Percent(v) => Self::Percent(v),
        }
    }
}

impl From<LengthPercentageAuto> for Dimension {
    fn from(value: LengthPercentageAuto) -> Self {
        match value {
            LengthPercentageAuto::Length(v) => Self::Length(v),
            LengthPercentageAuto::Percent(v) => Self::Percent(v),
            LengthPercentageAuto::Auto => Self::Auto,
        }
    }
}

impl Size<Dimension> {
    pub const AUTO: Size<Dimension> = Size {
        width: Dimension::Auto,
        height: Dimension::Auto,
    };

    pub const fn from_lengths(width: f32, height: f32) -> Self {
        Size {
            width: Dimension::Length(width),
            height: Dimension::Length(height),
        }
    }
}

impl Rect<LengthPercentage> {
    pub const fn length(value: f32) -> Self {
        Rect {
            left: LengthPercentage::Length(value),
            right: LengthPercentage::Length(value),
            top: LengthPercentage::Length(value),
            bottom: LengthPercentage::Length(value),
        }
    }
}

impl Rect<LengthPercentageAuto> {
    pub const AUTO: Rect<LengthPercentageAuto> = Rect {
        left: LengthPercentageAuto::Auto,
        right: LengthPercentageAuto::Auto,
        top: LengthPercentageAuto::Auto,
        bottom: LengthPercentageAuto::Auto,
    };
}

/// Resolve a style value against a context size that may be indefinite.
///
/// Percentages against an indefinite context resolve to `None` (treated as `auto`).
pub trait MaybeResolve<In, Out> {
    fn maybe_resolve(self, context: In) -> Out;
}

/// Resolve a style value, treating anything unresolvable as zero.
pub trait ResolveOrZero<In, Out> {
    fn resolve_or_zero(self, context: In) -> Out;
}

impl MaybeResolve<Option<f32>, Option<f32>> for LengthPercentage {
    fn maybe_resolve(self, context: Option<f32>) -> Option<f32> {
        match self {
            LengthPercentage::Length(length) => Some(length),
            LengthPercentage::Percent(percent) => context.map(|dim| dim * percent),
        }
    }
}

impl MaybeResolve<Option<f32>, Option<f32>> for LengthPercentageAuto {
    fn maybe_resolve(self, context: Option<f32>) -> Option<f32> {
        match self {
            LengthPercentageAuto::Length(length) => Some(length),
            LengthPercentageAuto::Percent(percent) => context.map(|dim| dim * percent),
            LengthPercentageAuto::Auto => None,
        }
    }
}

impl MaybeResolve<Option<f32>, Option<f32>> for Dimension {
    fn maybe_resolve(self, context: Option<f32>) -> Option<f32> {
        match self {
            Dimension::Length(length) => Some(length),
            Dimension::Percent(percent) => context.map(|dim| dim * percent),
            Dimension::Auto => None,
        }
    }
}

impl<In, Out, T: MaybeResolve<In, Out>> MaybeResolve<Size<In>, Size<Out>> for Size<T> {
    fn maybe_resolve(self, context: Size<In>) -> Size<Out> {
        Size {
            width: self.width.maybe_resolve(context.width),
            height: self.height.maybe_resolve(context.height),
        }
    }
}

impl ResolveOrZero<Option<f32>, f32> for LengthPercentage {
    fn resolve_or_zero(self, context: Option<f32>) -> f32 {
        self.maybe_resolve(context).unwrap_or(0.0)
    }
}

impl ResolveOrZero<Option<f32>, f32> for LengthPercentageAuto {
    fn resolve_or_zero(self, context: Option<f32>) -> f32 {
        self.maybe_resolve(context).unwrap_or(0.0)
    }
}

impl<In: Copy, Out, T: ResolveOrZero<In, Out>> ResolveOrZero<Size<In>, Size<Out>> for Size<T> {
    fn resolve_or_zero(self, context: Size<In>) -> Size<Out> {
        Size {
            width: self.width.resolve_or_zero(context.width),
            height: self.height.resolve_or_zero(context.height),
        }
    }
}

/// Edges resolve against the inline size of the containing block, as CSS margins and padding do.
impl<T: ResolveOrZero<Option<f32>, f32>> ResolveOrZero<Option<f32>, Rect<f32>> for Rect<T> {
    fn resolve_or_zero(self, context: Option<f32>) -> Rect<f32> {
        Rect {
            left: self.left.resolve_or_zero(context),
            right: self.right.resolve_or_zero(context),
            top: self.top.resolve_or_zero(context),
            bottom: self.bottom.resolve_or_zero(context),
        }
    }
}

impl Rect<LengthPercentageAuto> {
    /// Resolve each edge, keeping `auto` edges as `None`
    pub fn maybe_resolve_edges(self, context: Option<f32>) -> Rect<Option<f32>> {
        self.map(|edge| edge.maybe_resolve(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_need_a_definite_context() {
        assert_eq!(Dimension::percent(0.5).maybe_resolve(Some(200.0)), Some(100.0));
        assert_eq!(Dimension::percent(0.5).maybe_resolve(None), None);
        assert_eq!(Dimension::auto().maybe_resolve(Some(200.0)), None);
        assert_eq!(LengthPercentage::percent(0.25).resolve_or_zero(None), 0.0);
    }

    #[test]
    fn rect_edges_resolve_against_inline_size() {
        let padding = Rect {
            left: LengthPercentage::percent(0.1),
            right: LengthPercentage::length(3.0),
            top: LengthPercentage::percent(0.1),
            bottom: LengthPercentage::ZERO,
        };
        let resolved: Rect<f32> = padding.resolve_or_zero(Some(100.0));
        assert_eq!(resolved.left, 10.0);
        assert_eq!(resolved.top, 10.0);
        assert_eq!(resolved.right, 3.0);
    }
}
