//! Grid container and grid item properties.

use crate::geometry::Line;
use crate::style::dimension::LengthPercentage;

/// The lower bound of a track's size in `minmax(min, max)`
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MinTrackSizingFunction {
    Length(f32),
    Percent(f32),
    MinContent,
    MaxContent,
    Auto,
}

impl MinTrackSizingFunction {
    /// Whether this function depends on the size of the items in the track
    pub fn is_intrinsic(self) -> bool {
        matches!(self, Self::MinContent | Self::MaxContent | Self::Auto)
    }

    /// Resolve a fixed length or percentage, `None` for content-based functions
    pub fn definite_value(self, parent_size: Option<f32>) -> Option<f32> {
        match self {
            Self::Length(length) => Some(length),
            Self::Percent(fraction) => parent_size.map(|size| size * fraction),
            _ => None,
        }
    }
}

/// The upper bound of a track's size in `minmax(min, max)`
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaxTrackSizingFunction {
    Length(f32),
    Percent(f32),
    MinContent,
    MaxContent,
    /// `fit-content(limit)`
    FitContent(LengthPercentage),
    Auto,
    /// A flexible share of the leftover space
    Fr(f32),
}

impl MaxTrackSizingFunction {
    pub fn is_intrinsic(self) -> bool {
        matches!(
            self,
            Self::MinContent | Self::MaxContent | Self::FitContent(_) | Self::Auto
        )
    }

    pub fn is_flexible(self) -> bool {
        matches!(self, Self::Fr(_))
    }

    pub fn flex_factor(self) -> f32 {
        match self {
            Self::Fr(flex) => flex.max(0.0),
            _ => 0.0,
        }
    }

    pub fn definite_value(self, parent_size: Option<f32>) -> Option<f32> {
        match self {
            Self::Length(length) => Some(length),
            Self::Percent(fraction) => parent_size.map(|size| size * fraction),
            _ => None,
        }
    }
}

/// The sizing function of a single track: `minmax(min, max)`
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackSizingFunction {
    pub min: MinTrackSizingFunction,
    pub max: MaxTrackSizingFunction,
}

impl TrackSizingFunction {
    pub const AUTO: Self = Self {
        min: MinTrackSizingFunction::Auto,
        max: MaxTrackSizingFunction::Auto,
    };

    pub const fn length(value: f32) -> Self {
        Self {
            min: MinTrackSizingFunction::Length(value),
            max: MaxTrackSizingFunction::Length(value),
        }
    }

    pub const fn percent(fraction: f32) -> Self {
        Self {
            min: MinTrackSizingFunction::Percent(fraction),
            max: MaxTrackSizingFunction::Percent(fraction),
        }
    }

    /// `<flex>` is shorthand for `minmax(auto, <flex>)`
    pub const fn fr(flex: f32) -> Self {
        Self {
            min: MinTrackSizingFunction::Auto,
            max: MaxTrackSizingFunction::Fr(flex),
        }
    }

    pub const fn min_content() -> Self {
        Self {
            min: MinTrackSizingFunction::MinContent,
            max: MaxTrackSizingFunction::MinContent,
        }
    }

    pub const fn max_content() -> Self {
        Self {
            min: MinTrackSizingFunction::MaxContent,
            max: MaxTrackSizingFunction::MaxContent,
        }
    }

    pub const fn fit_content(limit: LengthPercentage) -> Self {
        Self {
            min: MinTrackSizingFunction::Auto,
            max: MaxTrackSizingFunction::FitContent(limit),
        }
    }

    pub const fn minmax(min: MinTrackSizingFunction, max: MaxTrackSizingFunction) -> Self {
        Self { min, max }
    }
}

/// How many times a `repeat()` group is repeated
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RepetitionCount {
    /// As many repetitions as fit; empty repetitions keep their size
    AutoFill,
    /// As many repetitions as fit; empty repetitions collapse to zero
    AutoFit,
    Count(u16),
}

/// A `repeat(count, tracks)` group
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridTemplateRepetition {
    pub count: RepetitionCount,
    pub tracks: Vec<TrackSizingFunction>,
    /// Names of the lines inside the group, one entry per line (`tracks.len() + 1` entries)
    pub line_names: Vec<Vec<String>>,
}

/// One entry of `grid-template-rows` / `grid-template-columns`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridTemplateComponent {
    Single(TrackSizingFunction),
    Repeat(GridTemplateRepetition),
}

impl GridTemplateComponent {
    pub const AUTO: Self = Self::Single(TrackSizingFunction::AUTO);

    pub fn repeat(count: RepetitionCount, tracks: Vec<TrackSizingFunction>) -> Self {
        Self::Repeat(GridTemplateRepetition {
            count,
            tracks,
            line_names: Vec::new(),
        })
    }

    pub fn is_auto_repetition(&self) -> bool {
        matches!(
            self,
            Self::Repeat(GridTemplateRepetition {
                count: RepetitionCount::AutoFill | RepetitionCount::AutoFit,
                ..
            })
        )
    }
}

impl From<TrackSizingFunction> for GridTemplateComponent {
    fn from(value: TrackSizingFunction) -> Self {
        Self::Single(value)
    }
}

/// Placement of one edge of a grid item
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridPlacement {
    #[default]
    Auto,
    /// A 1-based line number; negative numbers count back from the last explicit line
    Line(i16),
    /// Span this many tracks from the opposite edge
    Span(u16),
    /// The nth line with the given name (`0` and `1` both mean the first);
    /// negative numbers count from the end
    NamedLine(String, i16),
}

impl GridPlacement {
    pub const fn line(index: i16) -> Self {
        Self::Line(index)
    }

    pub const fn span(count: u16) -> Self {
        Self::Span(count)
    }

    pub fn named(name: impl Into<String>, index: i16) -> Self {
        Self::NamedLine(name.into(), index)
    }

    pub fn is_definite(&self) -> bool {
        match self {
            Self::Line(line) => *line != 0,
            Self::NamedLine(..) => true,
            _ => false,
        }
    }
}

impl Line<GridPlacement> {
    pub const AUTO: Line<GridPlacement> = Line {
        start: GridPlacement::Auto,
        end: GridPlacement::Auto,
    };

    pub fn from_line_index(start: i16) -> Self {
        Line {
            start: GridPlacement::Line(start),
            end: GridPlacement::Auto,
        }
    }

    pub fn from_span(span: u16) -> Self {
        Line {
            start: GridPlacement::Span(span),
            end: GridPlacement::Auto,
        }
    }

    /// Place the item in the area with the given name
    pub fn area(name: &str) -> Self {
        Line {
            start: GridPlacement::NamedLine(name.to_owned(), 1),
            end: GridPlacement::NamedLine(name.to_owned(), 1),
        }
    }
}

/// A named rectangle from `grid-template-areas`, as 1-based line numbers
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridTemplateArea {
    pub name: String,
    pub row_start: u16,
    pub row_end: u16,
    pub column_start: u16,
    pub column_end: u16,
}

/// Controls the auto-placement algorithm
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridAutoFlow {
    #[default]
    Row,
    Column,
    RowDense,
    ColumnDense,
}

impl GridAutoFlow {
    pub fn is_dense(self) -> bool {
        matches!(self, Self::RowDense | Self::ColumnDense)
    }

    /// Whether auto-placement fills rows before adding new ones
    pub fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowDense)
    }
}
