//! The explicit grid: template tracks, `repeat()` expansion and named lines.

use std::collections::HashMap;

use crate::geometry::AbsoluteAxis;
use super::types::{GRID_LINE_LIMIT, clamp_line};
use crate::style::{
    GridTemplateArea, GridTemplateComponent, GridTemplateRepetition, RepetitionCount,
    TrackSizingFunction,
};

/// The origin-zero lines carrying each name, in ascending order
pub(super) type LineNames = HashMap<String, Vec<i16>>;

/// One axis of the explicit grid
#[derive(Debug, Default)]
pub(super) struct ExplicitAxis {
    pub tracks: Vec<TrackSizingFunction>,
    /// Whether each track came from an `auto-fit` repetition
    pub auto_fit: Vec<bool>,
    pub line_names: LineNames,
}

impl ExplicitAxis {
    pub fn track_count(&self) -> u16 {
        u16::try_from(self.tracks.len()).unwrap_or(u16::MAX)
    }

    /// Whether the explicit grid has reached the line limit
    fn is_full(&self) -> bool {
        self.tracks.len() >= GRID_LINE_LIMIT as usize
    }

    fn push_track(&mut self, track: TrackSizingFunction, is_auto_fit: bool) -> bool {
        if self.is_full() {
            return false;
        }
        self.tracks.push(track);
        self.auto_fit.push(is_auto_fit);
        true
    }
}

/// The parts of a container's style that define one axis of the explicit grid
pub(super) struct AxisTemplate<'a> {
    pub axis: AbsoluteAxis,
    pub components: &'a [GridTemplateComponent],
    /// Names of the lines between top-level components
    pub names: &'a [Vec<String>],
    pub areas: &'a [GridTemplateArea],
    pub auto_tracks: &'a [TrackSizingFunction],
}

/// Expand the template of one axis.
///
/// `inner_size` and `min_inner_size` are the container's content-box size and minimum size on
/// this axis, used to decide how many times an `auto-fill` or `auto-fit` group repeats.
pub(super) fn compute_explicit_axis(
    template: &AxisTemplate<'_>,
    inner_size: Option<f32>,
    min_inner_size: Option<f32>,
    gap: f32,
) -> ExplicitAxis {
    let auto_repetitions = auto_repetition_count(template.components, inner_size, min_inner_size, gap);

    let mut explicit = ExplicitAxis::default();
    let mut lines: Vec<Vec<String>> = vec![template.names.first().cloned().unwrap_or_default()];
    let mut seen_auto_repetition = false;

    for (index, component) in template.components.iter().enumerate() {
        match component {
            GridTemplateComponent::Single(track) => {
                if explicit.push_track(*track, false) {
                    lines.push(Vec::new());
                }
            }
            GridTemplateComponent::Repeat(repetition) => {
                let count = match repetition.count {
                    RepetitionCount::Count(count) => count,
                    RepetitionCount::AutoFill | RepetitionCount::AutoFit if !seen_auto_repetition => {
                        seen_auto_repetition = true;
                        auto_repetitions
                    }
                    // Only the first automatic repetition is honoured
                    RepetitionCount::AutoFill | RepetitionCount::AutoFit => 1,
                };
                let is_auto_fit = repetition.count == RepetitionCount::AutoFit;
                expand_repetition(repetition, count, is_auto_fit, &mut explicit, &mut lines);
            }
        }
        if let (Some(last), Some(names)) = (lines.last_mut(), template.names.get(index + 1)) {
            last.extend(names.iter().cloned());
        }
    }

    // Areas extend the explicit grid past the template
    let area_track_count = template
        .areas
        .iter()
        .map(|area| match template.axis {
            AbsoluteAxis::Horizontal => area.column_end,
            AbsoluteAxis::Vertical => area.row_end,
        })
        .max()
        .map_or(0, |end| usize::from(end.saturating_sub(1)))
        .min(GRID_LINE_LIMIT as usize);
    while explicit.tracks.len() < area_track_count {
        let index = explicit.tracks.len();
        let track = match template.auto_tracks {
            [] => TrackSizingFunction::AUTO,
            auto_tracks => auto_tracks[index % auto_tracks.len()],
        };
        explicit.push_track(track, false);
        lines.push(Vec::new());
    }

    for (line, names) in lines.into_iter().enumerate() {
        for name in names {
            let line = clamp_line(i32::try_from(line).unwrap_or(i32::MAX));
            explicit.line_names.entry(name).or_default().push(line);
        }
    }

    for area in template.areas {
        let (start, end) = match template.axis {
            AbsoluteAxis::Horizontal => (area.column_start, area.column_end),
            AbsoluteAxis::Vertical => (area.row_start, area.row_end),
        };
        explicit
            .line_names
            .entry(format!("{}-start", area.name))
            .or_default()
            .push(clamp_line(i32::from(start) - 1));
        explicit
            .line_names
            .entry(format!("{}-end", area.name))
            .or_default()
            .push(clamp_line(i32::from(end) - 1));
    }

    for lines in explicit.line_names.values_mut() {
        lines.sort_unstable();
        lines.dedup();
    }

    explicit
}

fn expand_repetition(
    repetition: &GridTemplateRepetition,
    count: u16,
    is_auto_fit: bool,
    explicit: &mut ExplicitAxis,
    lines: &mut Vec<Vec<String>>,
) {
    for _ in 0..count {
        if explicit.is_full() {
            #[cfg(feature = "tracing")]
            tracing::debug!("Explicit grid truncated at {GRID_LINE_LIMIT} tracks");
            return;
        }
        // The first line of each repetition coincides with the line before it
        if let (Some(last), Some(names)) = (lines.last_mut(), repetition.line_names.first()) {
            last.extend(names.iter().cloned());
        }
        for (index, track) in repetition.tracks.iter().enumerate() {
            if !explicit.push_track(*track, is_auto_fit) {
                return;
            }
            lines.push(repetition.line_names.get(index + 1).cloned().unwrap_or_default());
        }
    }
}

/// The size a track is assumed to have when fitting automatic repetitions
fn fixed_track_size(track: &TrackSizingFunction, inner_size: Option<f32>) -> Option<f32> {
    let min = track.min.definite_value(inner_size);
    let max = track.max.definite_value(inner_size);
    match (min, max) {
        (Some(min), Some(max)) => Some(max.max(min)),
        (min, max) => max.or(min),
    }
}

/// The number of repetitions of the first `auto-fill`/`auto-fit` group.
///
/// With a definite size this is the largest count that does not overflow it; with only a
/// minimum size it is the smallest count that reaches it. Always at least one.
fn auto_repetition_count(
    components: &[GridTemplateComponent],
    inner_size: Option<f32>,
    min_inner_size: Option<f32>,
    gap: f32,
) -> u16 {
    let Some(repetition) = components.iter().find_map(|component| match component {
        GridTemplateComponent::Repeat(repetition) if component.is_auto_repetition() => Some(repetition),
        _ => None,
    }) else {
        return 1;
    };
    if repetition.tracks.is_empty() {
        return 1;
    }

    let (space, round_up) = match (inner_size, min_inner_size) {
        (Some(size), _) => (size, false),
        (None, Some(min)) => (min, true),
        (None, None) => return 1,
    };
    let size_basis = Some(space);

    let mut repeated_sum = 0.0;
    for track in &repetition.tracks {
        match fixed_track_size(track, size_basis) {
            Some(size) => repeated_sum += size,
            None => return 1,
        }
    }

    let mut other_sum = 0.0;
    let mut other_count = 0usize;
    let mut seen_auto_repetition = false;
    for component in components {
        match component {
            GridTemplateComponent::Single(track) => {
                other_sum += fixed_track_size(track, size_basis).unwrap_or(0.0);
                other_count += 1;
            }
            GridTemplateComponent::Repeat(other) => {
                let count = match other.count {
                    RepetitionCount::Count(count) => count as usize,
                    _ if !seen_auto_repetition => {
                        seen_auto_repetition = true;
                        continue;
                    }
                    _ => 1,
                };
                for track in &other.tracks {
                    other_sum += fixed_track_size(track, size_basis).unwrap_or(0.0) * count as f32;
                }
                other_count += other.tracks.len() * count;
            }
        }
    }

    let per_repetition = repeated_sum + gap * repetition.tracks.len() as f32;
    if per_repetition <= 0.0 {
        return 1;
    }
    let fixed = other_sum + gap * (other_count as f32 - 1.0);
    let count = (space - fixed) / per_repetition;
    let count = if round_up { count.ceil() } else { count.floor() };

    let max_count = (GRID_LINE_LIMIT as usize / repetition.tracks.len()).max(1) as f32;
    count.clamp(1.0, max_count) as u16
}
