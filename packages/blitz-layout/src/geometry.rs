//! Geometric primitives shared by the style model and the layout algorithms.

use core::ops::{Add, Sub};

use crate::style::FlexDirection;

/// One of the two physical axes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbsoluteAxis {
    /// The x axis
    Horizontal,
    /// The y axis
    Vertical,
}

impl AbsoluteAxis {
    #[inline]
    pub const fn other_axis(&self) -> Self {
        match *self {
            AbsoluteAxis::Horizontal => AbsoluteAxis::Vertical,
            AbsoluteAxis::Vertical => AbsoluteAxis::Horizontal,
        }
    }
}

/// A width and a height
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub fn map<R>(self, f: impl Fn(T) -> R) -> Size<R> {
        Size {
            width: f(self.width),
            height: f(self.height),
        }
    }

    pub fn zip_map<U, R>(self, other: Size<U>, f: impl Fn(T, U) -> R) -> Size<R> {
        Size {
            width: f(self.width, other.width),
            height: f(self.height, other.height),
        }
    }

    pub fn get(self, axis: AbsoluteAxis) -> T {
        match axis {
            AbsoluteAxis::Horizontal => self.width,
            AbsoluteAxis::Vertical => self.height,
        }
    }

    pub fn set(&mut self, axis: AbsoluteAxis, value: T) {
        match axis {
            AbsoluteAxis::Horizontal => self.width = value,
            AbsoluteAxis::Vertical => self.height = value,
        }
    }

    /// The value along the main axis of a flex container with the given direction
    pub fn main(self, direction: FlexDirection) -> T {
        if direction.is_row() { self.width } else { self.height }
    }

    /// The value along the cross axis of a flex container with the given direction
    pub fn cross(self, direction: FlexDirection) -> T {
        if direction.is_row() { self.height } else { self.width }
    }

    pub fn set_main(&mut self, direction: FlexDirection, value: T) {
        if direction.is_row() {
            self.width = value
        } else {
            self.height = value
        }
    }

    pub fn set_cross(&mut self, direction: FlexDirection, value: T) {
        if direction.is_row() {
            self.height = value
        } else {
            self.width = value
        }
    }

    /// Build a size from main and cross axis values
    pub fn from_main_cross(direction: FlexDirection, main: T, cross: T) -> Self {
        if direction.is_row() {
            Size { width: main, height: cross }
        } else {
            Size { width: cross, height: main }
        }
    }
}

impl Size<f32> {
    pub const ZERO: Size<f32> = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn max(self, rhs: Size<f32>) -> Size<f32> {
        Size {
            width: self.width.max(rhs.width),
            height: self.height.max(rhs.height),
        }
    }
}

impl Size<Option<f32>> {
    pub const NONE: Size<Option<f32>> = Size {
        width: None,
        height: None,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Size {
            width: Some(width),
            height: Some(height),
        }
    }

    /// Fill in any `None` with the value from `fallback`
    pub fn or(self, fallback: Size<Option<f32>>) -> Size<Option<f32>> {
        Size {
            width: self.width.or(fallback.width),
            height: self.height.or(fallback.height),
        }
    }

    /// Derive a missing axis from the other one using `aspect_ratio` (width / height)
    pub fn maybe_apply_aspect_ratio(self, aspect_ratio: Option<f32>) -> Size<Option<f32>> {
        match aspect_ratio {
            Some(ratio) if ratio > 0.0 && ratio.is_finite() => match (self.width, self.height) {
                (Some(width), None) => Size {
                    width: Some(width),
                    height: Some(width / ratio),
                },
                (None, Some(height)) => Size {
                    width: Some(height * ratio),
                    height: Some(height),
                },
                _ => self,
            },
            _ => self,
        }
    }

    pub fn unwrap_or(self, fallback: Size<f32>) -> Size<f32> {
        Size {
            width: self.width.unwrap_or(fallback.width),
            height: self.height.unwrap_or(fallback.height),
        }
    }
}

impl Add for Size<f32> {
    type Output = Size<f32>;

    fn add(self, rhs: Size<f32>) -> Size<f32> {
        Size {
            width: self.width + rhs.width,
            height: self.height + rhs.height,
        }
    }
}

impl Sub for Size<f32> {
    type Output = Size<f32>;

    fn sub(self, rhs: Size<f32>) -> Size<f32> {
        Size {
            width: self.width - rhs.width,
            height: self.height - rhs.height,
        }
    }
}

/// Four edge values, as used for margin, padding, border and inset
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect<T> {
    pub left: T,
    pub right: T,
    pub top: T,
    pub bottom: T,
}

impl<T> Rect<T> {
    pub fn map<R>(self, f: impl Fn(T) -> R) -> Rect<R> {
        Rect {
            left: f(self.left),
            right: f(self.right),
            top: f(self.top),
            bottom: f(self.bottom),
        }
    }

    pub fn horizontal_components(self) -> Line<T> {
        Line {
            start: self.left,
            end: self.right,
        }
    }

    pub fn vertical_components(self) -> Line<T> {
        Line {
            start: self.top,
            end: self.bottom,
        }
    }

    pub fn components(self, axis: AbsoluteAxis) -> Line<T> {
        match axis {
            AbsoluteAxis::Horizontal => self.horizontal_components(),
            AbsoluteAxis::Vertical => self.vertical_components(),
        }
    }
}

impl<T: Copy> Rect<T> {
    pub fn main_start(&self, direction: FlexDirection) -> T {
        if direction.is_row() { self.left } else { self.top }
    }

    pub fn main_end(&self, direction: FlexDirection) -> T {
        if direction.is_row() { self.right } else { self.bottom }
    }

    pub fn cross_start(&self, direction: FlexDirection) -> T {
        if direction.is_row() { self.top } else { self.left }
    }

    pub fn cross_end(&self, direction: FlexDirection) -> T {
        if direction.is_row() { self.bottom } else { self.right }
    }
}

impl Rect<f32> {
    pub const ZERO: Rect<f32> = Rect {
        left: 0.0,
        right: 0.0,
        top: 0.0,
        bottom: 0.0,
    };

    pub fn horizontal_axis_sum(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical_axis_sum(&self) -> f32 {
        self.top + self.bottom
    }

    pub fn sum_axes(&self) -> Size<f32> {
        Size {
            width: self.horizontal_axis_sum(),
            height: self.vertical_axis_sum(),
        }
    }

    pub fn axis_sum(&self, axis: AbsoluteAxis) -> f32 {
        match axis {
            AbsoluteAxis::Horizontal => self.horizontal_axis_sum(),
            AbsoluteAxis::Vertical => self.vertical_axis_sum(),
        }
    }

    pub fn main_axis_sum(&self, direction: FlexDirection) -> f32 {
        if direction.is_row() {
            self.horizontal_axis_sum()
        } else {
            self.vertical_axis_sum()
        }
    }

    pub fn cross_axis_sum(&self, direction: FlexDirection) -> f32 {
        if direction.is_row() {
            self.vertical_axis_sum()
        } else {
            self.horizontal_axis_sum()
        }
    }
}

impl Add for Rect<f32> {
    type Output = Rect<f32>;

    fn add(self, rhs: Rect<f32>) -> Rect<f32> {
        Rect {
            left: self.left + rhs.left,
            right: self.right + rhs.right,
            top: self.top + rhs.top,
            bottom: self.bottom + rhs.bottom,
        }
    }
}

/// A start and end value along a single axis
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line<T> {
    pub start: T,
    pub end: T,
}

impl<T> Line<T> {
    pub fn map<R>(self, f: impl Fn(T) -> R) -> Line<R> {
        Line {
            start: f(self.start),
            end: f(self.end),
        }
    }
}

impl Line<bool> {
    pub const FALSE: Line<bool> = Line {
        start: false,
        end: false,
    };
}

/// A 2-dimensional coordinate
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn map<R>(self, f: impl Fn(T) -> R) -> Point<R> {
        Point {
            x: f(self.x),
            y: f(self.y),
        }
    }

    pub fn get(self, axis: AbsoluteAxis) -> T {
        match axis {
            AbsoluteAxis::Horizontal => self.x,
            AbsoluteAxis::Vertical => self.y,
        }
    }
}

impl Point<f32> {
    pub const ZERO: Point<f32> = Point { x: 0.0, y: 0.0 };
}

impl Point<Option<f32>> {
    pub const NONE: Point<Option<f32>> = Point { x: None, y: None };
}

/// Arithmetic between values that may be indefinite (`None`).
///
/// An operation involving `None` on the right-hand side leaves the left-hand side untouched,
/// and an operation with `None` on the left-hand side stays `None`.
pub trait MaybeMath<In, Out> {
    fn maybe_min(self, rhs: In) -> Out;
    fn maybe_max(self, rhs: In) -> Out;
    fn maybe_clamp(self, min: In, max: In) -> Out;
    fn maybe_add(self, rhs: In) -> Out;
    fn maybe_sub(self, rhs: In) -> Out;
}

impl MaybeMath<Option<f32>, Option<f32>> for Option<f32> {
    fn maybe_min(self, rhs: Option<f32>) -> Option<f32> {
        match (self, rhs) {
            (Some(l), Some(r)) => Some(l.min(r)),
            (Some(l), None) => Some(l),
            (None, _) => None,
        }
    }

    fn maybe_max(self, rhs: Option<f32>) -> Option<f32> {
        match (self, rhs) {
            (Some(l), Some(r)) => Some(l.max(r)),
            (Some(l), None) => Some(l),
            (None, _) => None,
        }
    }

    fn maybe_clamp(self, min: Option<f32>, max: Option<f32>) -> Option<f32> {
        // min wins over max when they conflict
        self.maybe_min(max).maybe_max(min)
    }

    fn maybe_add(self, rhs: Option<f32>) -> Option<f32> {
        match (self, rhs) {
            (Some(l), Some(r)) => Some(l + r),
            (Some(l), None) => Some(l),
            (None, _) => None,
        }
    }

    fn maybe_sub(self, rhs: Option<f32>) -> Option<f32> {
        match (self, rhs) {
            (Some(l), Some(r)) => Some(l - r),
            (Some(l), None) => Some(l),
            (None, _) => None,
        }
    }
}

impl MaybeMath<f32, Option<f32>> for Option<f32> {
    fn maybe_min(self, rhs: f32) -> Option<f32> {
        self.map(|val| val.min(rhs))
    }

    fn maybe_max(self, rhs: f32) -> Option<f32> {
        self.map(|val| val.max(rhs))
    }

    fn maybe_clamp(self, min: f32, max: f32) -> Option<f32> {
        self.map(|val| val.min(max).max(min))
    }

    fn maybe_add(self, rhs: f32) -> Option<f32> {
        self.map(|val| val + rhs)
    }

    fn maybe_sub(self, rhs: f32) -> Option<f32> {
        self.map(|val| val - rhs)
    }
}

impl MaybeMath<Option<f32>, f32> for f32 {
    fn maybe_min(self, rhs: Option<f32>) -> f32 {
        match rhs {
            Some(val) => self.min(val),
            None => self,
        }
    }

    fn maybe_max(self, rhs: Option<f32>) -> f32 {
        match rhs {
            Some(val) => self.max(val),
            None => self,
        }
    }

    fn maybe_clamp(self, min: Option<f32>, max: Option<f32>) -> f32 {
        self.maybe_min(max).maybe_max(min)
    }

    fn maybe_add(self, rhs: Option<f32>) -> f32 {
        match rhs {
            Some(val) => self + val,
            None => self,
        }
    }

    fn maybe_sub(self, rhs: Option<f32>) -> f32 {
        match rhs {
            Some(val) => self - val,
            None => self,
        }
    }
}

impl<In, Out, T: MaybeMath<In, Out>> MaybeMath<Size<In>, Size<Out>> for Size<T> {
    fn maybe_min(self, rhs: Size<In>) -> Size<Out> {
        Size {
            width: self.width.maybe_min(rhs.width),
            height: self.height.maybe_min(rhs.height),
        }
    }

    fn maybe_max(self, rhs: Size<In>) -> Size<Out> {
        Size {
            width: self.width.maybe_max(rhs.width),
            height: self.height.maybe_max(rhs.height),
        }
    }

    fn maybe_clamp(self, min: Size<In>, max: Size<In>) -> Size<Out> {
        Size {
            width: self.width.maybe_clamp(min.width, max.width),
            height: self.height.maybe_clamp(min.height, max.height),
        }
    }

    fn maybe_add(self, rhs: Size<In>) -> Size<Out> {
        Size {
            width: self.width.maybe_add(rhs.width),
            height: self.height.maybe_add(rhs.height),
        }
    }

    fn maybe_sub(self, rhs: Size<In>) -> Size<Out> {
        Size {
            width: self.width.maybe_sub(rhs.width),
            height: self.height.maybe_sub(rhs.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maybe_math_leaves_lhs_when_rhs_is_indefinite() {
        assert_eq!(Some(5.0f32).maybe_min(None), Some(5.0));
        assert_eq!(None::<f32>.maybe_max(Some(3.0)), None);
        assert_eq!(5.0f32.maybe_clamp(Some(6.0), None), 6.0);
        assert_eq!(Some(10.0f32).maybe_clamp(Some(2.0), Some(4.0)), Some(4.0));
    }

    #[test]
    fn clamp_prefers_min_over_max() {
        assert_eq!(Some(10.0f32).maybe_clamp(Some(8.0), Some(4.0)), Some(8.0));
    }

    #[test]
    fn aspect_ratio_fills_missing_axis() {
        let size = Size {
            width: Some(50.0),
            height: None,
        };
        assert_eq!(size.maybe_apply_aspect_ratio(Some(2.0)), Size::new(50.0, 25.0));

        let size = Size {
            width: None,
            height: Some(30.0),
        };
        assert_eq!(size.maybe_apply_aspect_ratio(Some(2.0)), Size::new(60.0, 30.0));
        assert_eq!(Size::NONE.maybe_apply_aspect_ratio(Some(2.0)), Size::NONE);
    }
}
