//! Types shared by the stages of grid layout.
//!
//! Grid lines are stored "origin-zero": line `0` is the first line of the explicit grid and
//! implicit lines before it are negative. This keeps explicit placements stable while the
//! implicit grid grows in both directions.

use core::ops::Range;

use crate::compute::common::ResolvedBox;
use crate::geometry::{AbsoluteAxis, Line, Point, Rect};
use crate::style::{
    AlignItems, MaxTrackSizingFunction, MinTrackSizingFunction, Overflow, TrackSizingFunction,
};
use crate::tree::NodeId;

/// Furthest a grid line may sit from the start of the explicit grid, in either direction
pub(super) const GRID_LINE_LIMIT: i16 = 10_000;

/// Bring an origin-zero line computed in wide arithmetic back within the line limit
pub(super) fn clamp_line(line: i32) -> i16 {
    let limit = i32::from(GRID_LINE_LIMIT);
    line.clamp(-limit, limit) as i16
}

/// The area an item occupies, in origin-zero lines
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) struct GridArea {
    pub column: Line<i16>,
    pub row: Line<i16>,
}

impl GridArea {
    pub fn get(&self, axis: AbsoluteAxis) -> Line<i16> {
        match axis {
            AbsoluteAxis::Horizontal => self.column,
            AbsoluteAxis::Vertical => self.row,
        }
    }

    /// Build an area from lines along the auto-placement axes
    pub fn from_axes(primary_axis: AbsoluteAxis, primary: Line<i16>, secondary: Line<i16>) -> Self {
        match primary_axis {
            AbsoluteAxis::Horizontal => Self {
                column: primary,
                row: secondary,
            },
            AbsoluteAxis::Vertical => Self {
                column: secondary,
                row: primary,
            },
        }
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.row.start < other.row.end
            && self.row.end > other.row.start
            && self.column.start < other.column.end
            && self.column.end > other.column.start
    }
}

/// Number of tracks in each part of one axis of the grid
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) struct TrackCounts {
    pub negative_implicit: u16,
    pub explicit: u16,
    pub positive_implicit: u16,
}

impl TrackCounts {
    pub fn len(&self) -> usize {
        usize::from(self.negative_implicit)
            + usize::from(self.explicit)
            + usize::from(self.positive_implicit)
    }

    /// The origin-zero line the first track starts at
    pub fn first_line(&self) -> i16 {
        clamp_line(-i32::from(self.negative_implicit))
    }

    /// Index of the track that starts at `line`
    pub fn track_index(&self, line: i16) -> usize {
        (i32::from(line) - i32::from(self.first_line())).max(0) as usize
    }

    pub fn track_range(&self, lines: Line<i16>) -> Range<usize> {
        self.track_index(lines.start)..self.track_index(lines.end)
    }
}

/// One row or column
#[derive(Debug, Clone)]
pub(super) struct GridTrack {
    pub min: MinTrackSizingFunction,
    pub max: MaxTrackSizingFunction,
    /// An empty track from an `auto-fit` repetition
    pub is_collapsed: bool,
    pub base_size: f32,
    pub growth_limit: f32,
    /// Start edge relative to the container's content box
    pub offset: f32,
    /// Gutter between this track and the previous one
    pub gutter_before: f32,
}

impl GridTrack {
    pub fn new(sizing: TrackSizingFunction) -> Self {
        Self {
            min: sizing.min,
            max: sizing.max,
            is_collapsed: false,
            base_size: 0.0,
            growth_limit: 0.0,
            offset: 0.0,
            gutter_before: 0.0,
        }
    }

    pub fn collapsed() -> Self {
        Self {
            is_collapsed: true,
            ..Self::new(TrackSizingFunction::length(0.0))
        }
    }

    pub fn is_flexible(&self) -> bool {
        self.max.is_flexible()
    }

    /// The growth limit, or the base size while the limit is still infinite
    pub fn finite_growth_limit(&self) -> f32 {
        if self.growth_limit.is_finite() {
            self.growth_limit
        } else {
            self.base_size
        }
    }
}

/// An in-flow child of a grid container
#[derive(Debug)]
pub(super) struct GridItem {
    pub node: NodeId,
    pub order: u32,
    pub area: GridArea,
    /// Box model resolved against the container's content box
    pub resolved: ResolvedBox,
    pub overflow: Point<Overflow>,
    pub align_self: AlignItems,
    pub justify_self: AlignItems,
    pub relative_offset: Point<f32>,
    /// Margins after auto margins are resolved during alignment
    pub margin: Rect<f32>,
}

impl GridItem {
    pub fn margin_sum(&self, axis: AbsoluteAxis) -> f32 {
        self.resolved.margin_or_zero().axis_sum(axis)
    }

    /// Whether the item stretches to fill its grid area on `axis`
    pub fn stretches(&self, axis: AbsoluteAxis) -> bool {
        let (alignment, auto_start, auto_end) = match axis {
            AbsoluteAxis::Horizontal => (
                self.justify_self,
                self.resolved.margin.left.is_none(),
                self.resolved.margin.right.is_none(),
            ),
            AbsoluteAxis::Vertical => (
                self.align_self,
                self.resolved.margin.top.is_none(),
                self.resolved.margin.bottom.is_none(),
            ),
        };
        alignment == AlignItems::Stretch
            && !auto_start
            && !auto_end
            && self.resolved.size.get(axis).is_none()
            && self.resolved.aspect_ratio.is_none()
    }

    /// Whether the item is a scroll container on `axis`, which zeroes its automatic minimum
    pub fn scrolls(&self, axis: AbsoluteAxis) -> bool {
        match axis {
            AbsoluteAxis::Horizontal => self.overflow.x.is_scroll_container(),
            AbsoluteAxis::Vertical => self.overflow.y.is_scroll_container(),
        }
    }
}
