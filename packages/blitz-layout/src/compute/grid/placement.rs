//! Placing grid items: resolving line numbers and names, then auto-placement.

use std::collections::HashMap;

use crate::geometry::{AbsoluteAxis, Line};
use crate::style::{GridAutoFlow, GridPlacement};

use super::explicit::LineNames;
use super::types::{GRID_LINE_LIMIT, GridArea, TrackCounts, clamp_line};

/// An item's placement along one axis once lines and names are resolved
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum AxisPlacement {
    Definite(Line<i16>),
    Auto { span: u16 },
}

impl AxisPlacement {
    fn span(self) -> i16 {
        match self {
            AxisPlacement::Definite(line) => line.end - line.start,
            AxisPlacement::Auto { span } => auto_span(span),
        }
    }
}

/// An automatic span as a line distance, never more than the line limit
fn auto_span(span: u16) -> i16 {
    i16::try_from(span).map_or(GRID_LINE_LIMIT, |span| span.min(GRID_LINE_LIMIT))
}

/// An item's placement along both axes
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) struct PlacementInput {
    pub column: AxisPlacement,
    pub row: AxisPlacement,
}

impl PlacementInput {
    fn get(&self, axis: AbsoluteAxis) -> AxisPlacement {
        match axis {
            AbsoluteAxis::Horizontal => self.column,
            AbsoluteAxis::Vertical => self.row,
        }
    }
}

/// Resolve a `grid-row` or `grid-column` value.
///
/// An end line equal to the start line spans one track, and an end line before the start line
/// swaps the two. When both edges are spans only the start span counts. Lines and spans are
/// pulled back within [`GRID_LINE_LIMIT`] of the explicit grid's start.
pub(super) fn resolve_axis_placement(
    placement: &Line<GridPlacement>,
    explicit_track_count: u16,
    line_names: &LineNames,
) -> AxisPlacement {
    let start = resolve_line(&placement.start, true, explicit_track_count, line_names);
    let end = resolve_line(&placement.end, false, explicit_track_count, line_names);
    let span_of = |placement: &GridPlacement| match placement {
        GridPlacement::Span(span) => i32::from((*span).max(1)),
        _ => 1,
    };

    let (start, end) = match (start, end) {
        (Some(start), Some(end)) if start == end => (start, start + 1),
        (Some(start), Some(end)) => (start.min(end), start.max(end)),
        (Some(start), None) => (start, start + span_of(&placement.end)),
        (None, Some(end)) => (end - span_of(&placement.start), end),
        (None, None) => {
            let span = match placement.start {
                GridPlacement::Span(_) => span_of(&placement.start),
                _ => span_of(&placement.end),
            };
            let clamped = span.min(i32::from(GRID_LINE_LIMIT));
            #[cfg(feature = "tracing")]
            if clamped != span {
                tracing::debug!("Grid span {span} clamped to {clamped}");
            }
            return AxisPlacement::Auto {
                span: clamped as u16,
            };
        }
    };
    AxisPlacement::Definite(clamp_lines(start, end))
}

/// Pull each line of a definite placement back inside the line limit. A placement squeezed
/// against the limit keeps at least one track.
fn clamp_lines(start: i32, end: i32) -> Line<i16> {
    let limit = i32::from(GRID_LINE_LIMIT);
    let clamped_end = end.clamp(1 - limit, limit);
    let clamped_start = start.clamp(-limit, clamped_end - 1);

    #[cfg(feature = "tracing")]
    if clamped_start != start || clamped_end != end {
        tracing::debug!(
            "Grid placement {start}..{end} clamped into the implicit-grid limit as {clamped_start}..{clamped_end}"
        );
    }

    Line {
        start: clamp_line(clamped_start),
        end: clamp_line(clamped_end),
    }
}

/// Resolve one edge to an origin-zero line, `None` for `auto` and spans
fn resolve_line(
    placement: &GridPlacement,
    is_start: bool,
    explicit_track_count: u16,
    line_names: &LineNames,
) -> Option<i32> {
    match placement {
        GridPlacement::Auto | GridPlacement::Span(_) | GridPlacement::Line(0) => None,
        GridPlacement::Line(line) if *line > 0 => Some(i32::from(*line) - 1),
        // -1 is the last explicit line
        GridPlacement::Line(line) => Some(i32::from(explicit_track_count) + 1 + i32::from(*line)),
        GridPlacement::NamedLine(name, index) => Some(resolve_named_line(
            name,
            *index,
            is_start,
            explicit_track_count,
            line_names,
        )),
    }
}

/// Find the nth line called `name`.
///
/// A name without an index first matches the implicit `-start`/`-end` lines of a template area.
/// When there are too few lines with the name, every implicit line past the explicit grid is
/// taken to carry it.
fn resolve_named_line(
    name: &str,
    index: i16,
    is_start: bool,
    explicit_track_count: u16,
    line_names: &LineNames,
) -> i32 {
    let edge = if is_start { "start" } else { "end" };
    let area_edge = line_names.get(&format!("{name}-{edge}"));
    let lines: &[i16] = match (index, area_edge) {
        (0 | 1, Some(lines)) => lines,
        _ => line_names.get(name).map(Vec::as_slice).unwrap_or(&[]),
    };

    let count = lines.len() as i32;
    let index = i32::from(index);
    if index >= 0 {
        let nth = index.max(1);
        match lines.get((nth - 1) as usize) {
            Some(line) => i32::from(*line),
            None => i32::from(explicit_track_count) + (nth - count),
        }
    } else {
        let nth = -index;
        if nth <= count {
            i32::from(lines[(count - nth) as usize])
        } else {
            -(nth - count)
        }
    }
}

/// The areas already claimed by placed items
#[derive(Debug, Default)]
struct CellOccupancy {
    areas: Vec<GridArea>,
}

impl CellOccupancy {
    fn is_free(&self, area: &GridArea) -> bool {
        !self.areas.iter().any(|occupied| occupied.overlaps(area))
    }

    fn mark(&mut self, area: GridArea) {
        self.areas.push(area);
    }
}

/// Place every item, returning one area per input in the same order.
///
/// With `GridAutoFlow::Row` the auto-placement cursor moves across columns and adds rows as
/// needed (the column axis is "primary"); `Column` swaps the two. Sparse placement never moves
/// the cursor backwards. Dense placement restarts from the first cell for every item, so with
/// several items that fit the same hole the earliest child in document order claims it.
pub(super) fn place_grid_items(
    inputs: &[PlacementInput],
    explicit_columns: u16,
    explicit_rows: u16,
    flow: GridAutoFlow,
) -> Vec<GridArea> {
    let primary_axis = if flow.is_row() {
        AbsoluteAxis::Horizontal
    } else {
        AbsoluteAxis::Vertical
    };
    let secondary_axis = primary_axis.other_axis();
    let is_dense = flow.is_dense();
    let explicit_primary = match primary_axis {
        AbsoluteAxis::Horizontal => explicit_columns,
        AbsoluteAxis::Vertical => explicit_rows,
    };
    let explicit_primary = clamp_line(i32::from(explicit_primary));

    let mut occupancy = CellOccupancy::default();
    let mut areas: Vec<Option<GridArea>> = vec![None; inputs.len()];

    // Items with a definite position on both axes
    for (index, input) in inputs.iter().enumerate() {
        if let (AxisPlacement::Definite(column), AxisPlacement::Definite(row)) = (input.column, input.row) {
            let area = GridArea { column, row };
            occupancy.mark(area);
            areas[index] = Some(area);
        }
    }

    let mut primary_min = inputs
        .iter()
        .filter_map(|input| match input.get(primary_axis) {
            AxisPlacement::Definite(line) => Some(line.start),
            AxisPlacement::Auto { .. } => None,
        })
        .fold(0, i16::min);

    // Items locked to a position on the secondary axis
    let mut cursors: HashMap<i16, i16> = HashMap::new();
    for (index, input) in inputs.iter().enumerate() {
        if areas[index].is_some() {
            continue;
        }
        let (AxisPlacement::Definite(secondary), AxisPlacement::Auto { span }) =
            (input.get(secondary_axis), input.get(primary_axis))
        else {
            continue;
        };
        let span = auto_span(span);
        let mut start = if is_dense {
            primary_min
        } else {
            cursors.get(&secondary.start).copied().unwrap_or(primary_min)
        };
        // Terminates once past every occupied area
        while !occupancy.is_free(&GridArea::from_axes(
            primary_axis,
            Line {
                start,
                end: start.saturating_add(span),
            },
            secondary,
        )) {
            start = start.saturating_add(1);
        }
        let area = GridArea::from_axes(
            primary_axis,
            Line {
                start,
                end: start.saturating_add(span),
            },
            secondary,
        );
        occupancy.mark(area);
        areas[index] = Some(area);
        cursors.insert(secondary.start, start.saturating_add(span));
    }

    // Extent of the implicit grid on the primary axis
    let mut primary_max = explicit_primary;
    for area in areas.iter().flatten() {
        let line = area.get(primary_axis);
        primary_min = primary_min.min(line.start);
        primary_max = primary_max.max(line.end);
    }
    for input in inputs {
        match input.get(primary_axis) {
            AxisPlacement::Definite(line) => primary_max = primary_max.max(line.end),
            AxisPlacement::Auto { span } => primary_max = primary_max.max(primary_min.saturating_add(auto_span(span))),
        }
    }
    let secondary_min = areas
        .iter()
        .flatten()
        .map(|area| area.get(secondary_axis).start)
        .fold(0, i16::min);

    // Everything else, in document order
    let mut cursor_primary = primary_min;
    let mut cursor_secondary = secondary_min;
    for (index, input) in inputs.iter().enumerate() {
        if areas[index].is_some() {
            continue;
        }
        let secondary_span = input.get(secondary_axis).span();
        let secondary_line = |start: i16| Line {
            start,
            end: start.saturating_add(secondary_span),
        };

        let area = match input.get(primary_axis) {
            AxisPlacement::Definite(primary) => {
                if is_dense {
                    cursor_secondary = secondary_min;
                } else if primary.start < cursor_primary {
                    cursor_secondary = cursor_secondary.saturating_add(1);
                }
                cursor_primary = primary.start;
                while !occupancy.is_free(&GridArea::from_axes(
                    primary_axis,
                    primary,
                    secondary_line(cursor_secondary),
                )) {
                    cursor_secondary = cursor_secondary.saturating_add(1);
                }
                GridArea::from_axes(primary_axis, primary, secondary_line(cursor_secondary))
            }
            AxisPlacement::Auto { span } => {
                let span = auto_span(span);
                if is_dense {
                    cursor_primary = primary_min;
                    cursor_secondary = secondary_min;
                }
                loop {
                    if cursor_primary.saturating_add(span) > primary_max {
                        cursor_secondary = cursor_secondary.saturating_add(1);
                        cursor_primary = primary_min;
                        continue;
                    }
                    let candidate = GridArea::from_axes(
                        primary_axis,
                        Line {
                            start: cursor_primary,
                            end: cursor_primary.saturating_add(span),
                        },
                        secondary_line(cursor_secondary),
                    );
                    if occupancy.is_free(&candidate) {
                        break candidate;
                    }
                    cursor_primary = cursor_primary.saturating_add(1);
                }
            }
        };
        occupancy.mark(area);
        areas[index] = Some(area);
    }

    areas.into_iter().flatten().collect()
}

/// Count the tracks of one axis once every item is placed
pub(super) fn count_tracks(areas: &[GridArea], axis: AbsoluteAxis, explicit: u16) -> TrackCounts {
    let first = areas
        .iter()
        .map(|area| area.get(axis).start)
        .fold(0, i16::min);
    let last = areas
        .iter()
        .map(|area| area.get(axis).end)
        .fold(clamp_line(i32::from(explicit)), i16::max);
    TrackCounts {
        negative_implicit: first.unsigned_abs(),
        explicit,
        positive_implicit: u16::try_from(i32::from(last) - i32::from(explicit)).unwrap_or(0),
    }
}
