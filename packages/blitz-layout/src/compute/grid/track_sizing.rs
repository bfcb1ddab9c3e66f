//! The grid track sizing algorithm, run once per axis.
//!
//! Columns are sized first. Rows are sized second so that items can be measured at the width of
//! the columns they span.

use core::ops::Range;

use crate::geometry::{AbsoluteAxis, MaybeMath, Size};
use crate::style::{
    AlignContent, AvailableSpace, LengthPercentage, MaxTrackSizingFunction, MaybeResolve,
    MinTrackSizingFunction,
};
use crate::tree::{LayoutInput, LayoutPartialTree, RunMode, SizingMode};

use super::types::{GridItem, GridTrack, TrackCounts};

/// Everything the sizing of one axis depends on besides the tracks and items
pub(super) struct AxisSizing<'a> {
    pub axis: AbsoluteAxis,
    pub counts: TrackCounts,
    /// The container's content-box size on this axis, when definite
    pub inner_size: Option<f32>,
    /// Space the tracks may grow into when `inner_size` is not definite
    pub available_space: AvailableSpace,
    pub content_alignment: AlignContent,
    /// Already-sized tracks of the other axis, used to measure items at their area size
    pub other_axis: Option<(&'a [GridTrack], TrackCounts)>,
    /// The container's content-box size, which item percentages resolve against
    pub container_inner_size: Size<Option<f32>>,
}

impl AxisSizing<'_> {
    fn free_space_basis(&self) -> AvailableSpace {
        match self.inner_size {
            Some(size) => AvailableSpace::Definite(size),
            None => self.available_space,
        }
    }
}

/// The size of the tracks in `range` plus the gutters between them
pub(super) fn spanned_size(tracks: &[GridTrack], range: Range<usize>) -> f32 {
    tracks[range]
        .iter()
        .enumerate()
        .map(|(index, track)| {
            let gutter = if index == 0 { 0.0 } else { track.gutter_before };
            track.base_size + gutter
        })
        .sum()
}

fn inner_gutters(tracks: &[GridTrack], range: Range<usize>) -> f32 {
    tracks[range].iter().skip(1).map(|track| track.gutter_before).sum()
}

fn total_gutters(tracks: &[GridTrack]) -> f32 {
    tracks.iter().skip(1).map(|track| track.gutter_before).sum()
}

/// Outer size contributions of one item on the axis being sized
#[derive(Debug, Copy, Clone, Default)]
struct Contribution {
    /// Used for `auto` minimums: the min-content size unless the item sets a minimum
    minimum: f32,
    min_content: f32,
    max_content: f32,
}

/// Size every track of one axis, leaving the final size in `base_size`
pub(super) fn size_tracks(
    tree: &mut impl LayoutPartialTree,
    sizing: &AxisSizing<'_>,
    tracks: &mut [GridTrack],
    items: &[GridItem],
) {
    initialize_track_sizes(tracks, sizing.inner_size);

    let contributions: Vec<Option<Contribution>> = items
        .iter()
        .map(|item| {
            let range = sizing.counts.track_range(item.area.get(sizing.axis));
            let needs_measure = tracks[range].iter().any(|track| {
                track.min.is_intrinsic() || track.max.is_intrinsic() || track.is_flexible()
            });
            needs_measure.then(|| measure_contribution(tree, sizing, item))
        })
        .collect();

    resolve_intrinsic_track_sizes(sizing, tracks, items, &contributions);
    maximize_tracks(sizing, tracks);
    expand_flexible_tracks(sizing, tracks, items, &contributions);
    stretch_auto_tracks(sizing, tracks);

    #[cfg(feature = "tracing")]
    tracing::trace!(
        "Sized {:?} tracks: {:?}",
        sizing.axis,
        tracks.iter().map(|track| track.base_size).collect::<Vec<_>>()
    );
}

fn initialize_track_sizes(tracks: &mut [GridTrack], inner_size: Option<f32>) {
    for track in tracks.iter_mut() {
        if track.is_collapsed {
            track.base_size = 0.0;
            track.growth_limit = 0.0;
            continue;
        }
        track.base_size = track.min.definite_value(inner_size).unwrap_or(0.0).max(0.0);
        track.growth_limit = track
            .max
            .definite_value(inner_size)
            .map_or(f32::INFINITY, |limit| limit.max(0.0));
        if track.growth_limit < track.base_size {
            track.growth_limit = track.base_size;
        }
    }
}

fn measure_contribution(
    tree: &mut impl LayoutPartialTree,
    sizing: &AxisSizing<'_>,
    item: &GridItem,
) -> Contribution {
    let axis = sizing.axis;
    let other_axis = axis.other_axis();
    let margin = item.margin_sum(axis);

    let mut known_dimensions = Size::NONE;
    let mut other_available = AvailableSpace::MaxContent;
    if let Some((other_tracks, other_counts)) = sizing.other_axis {
        let area = spanned_size(other_tracks, other_counts.track_range(item.area.get(other_axis)));
        let space = (area - item.margin_sum(other_axis)).max(0.0);
        other_available = AvailableSpace::Definite(space);
        if item.stretches(other_axis) {
            known_dimensions.set(
                other_axis,
                Some(space.maybe_clamp(
                    item.resolved.min_size.get(other_axis),
                    item.resolved.max_size.get(other_axis),
                )),
            );
        }
    }

    let mut measure = |available_on_axis: AvailableSpace| {
        let mut available_space = Size::MAX_CONTENT;
        available_space.set(axis, available_on_axis);
        available_space.set(other_axis, other_available);
        let output = tree.compute_child_layout(
            item.node,
            LayoutInput {
                run_mode: RunMode::ComputeSize,
                sizing_mode: SizingMode::InherentSize,
                known_dimensions,
                parent_size: sizing.container_inner_size,
                available_space,
            },
        );
        output.size.get(axis) + margin
    };

    let min_content = measure(AvailableSpace::MinContent);
    let max_content = measure(AvailableSpace::MaxContent).max(min_content);
    let minimum = match item.resolved.min_size.get(axis) {
        Some(min) => min + margin,
        None if item.scrolls(axis) => margin,
        None => min_content,
    };

    Contribution {
        minimum,
        min_content,
        max_content,
    }
}

fn fit_content_limit(limit: LengthPercentage, inner_size: Option<f32>) -> f32 {
    limit.maybe_resolve(inner_size).unwrap_or(f32::INFINITY)
}

fn raise_growth_limit(track: &mut GridTrack, value: f32) {
    track.growth_limit = if track.growth_limit.is_infinite() {
        value
    } else {
        track.growth_limit.max(value)
    };
}

fn resolve_intrinsic_track_sizes(
    sizing: &AxisSizing<'_>,
    tracks: &mut [GridTrack],
    items: &[GridItem],
    contributions: &[Option<Contribution>],
) {
    let counts = sizing.counts;
    let spans_flexible = |tracks: &[GridTrack], range: Range<usize>| {
        tracks[range].iter().any(|track| track.is_flexible())
    };

    // Items spanning a single non-flexible track
    for (item, contribution) in items.iter().zip(contributions) {
        let Some(contribution) = contribution else { continue };
        let range = counts.track_range(item.area.get(sizing.axis));
        if range.len() != 1 {
            continue;
        }
        let track = &mut tracks[range.start];
        if track.is_flexible() || track.is_collapsed {
            continue;
        }

        match track.min {
            MinTrackSizingFunction::MinContent => {
                track.base_size = track.base_size.max(contribution.min_content)
            }
            MinTrackSizingFunction::MaxContent => {
                track.base_size = track.base_size.max(contribution.max_content)
            }
            MinTrackSizingFunction::Auto => track.base_size = track.base_size.max(contribution.minimum),
            MinTrackSizingFunction::Length(_) | MinTrackSizingFunction::Percent(_) => {}
        }
        match track.max {
            MaxTrackSizingFunction::MinContent => raise_growth_limit(track, contribution.min_content),
            MaxTrackSizingFunction::MaxContent | MaxTrackSizingFunction::Auto => {
                raise_growth_limit(track, contribution.max_content)
            }
            MaxTrackSizingFunction::FitContent(limit) => {
                let limit = fit_content_limit(limit, sizing.inner_size);
                raise_growth_limit(
                    track,
                    contribution.max_content.min(limit).max(contribution.min_content),
                )
            }
            MaxTrackSizingFunction::Length(_)
            | MaxTrackSizingFunction::Percent(_)
            | MaxTrackSizingFunction::Fr(_) => {}
        }
        if track.growth_limit < track.base_size {
            track.growth_limit = track.base_size;
        }
    }

    // Items spanning several tracks, none flexible, smallest spans first
    let mut spanning: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(index, item)| {
            let range = counts.track_range(item.area.get(sizing.axis));
            contributions[*index].is_some() && range.len() > 1 && !spans_flexible(tracks, range)
        })
        .map(|(index, _)| index)
        .collect();
    spanning.sort_by_key(|index| counts.track_range(items[*index].area.get(sizing.axis)).len());

    for index in spanning {
        let Some(contribution) = contributions[index] else { continue };
        let range = counts.track_range(items[index].area.get(sizing.axis));
        let gutters = inner_gutters(tracks, range.clone());

        distribute_to_base_sizes(tracks, range.clone(), contribution.minimum - gutters, |track| {
            track.min.is_intrinsic()
        });
        distribute_to_base_sizes(tracks, range.clone(), contribution.min_content - gutters, |track| {
            matches!(
                track.min,
                MinTrackSizingFunction::MinContent | MinTrackSizingFunction::MaxContent
            )
        });
        distribute_to_base_sizes(tracks, range.clone(), contribution.max_content - gutters, |track| {
            track.min == MinTrackSizingFunction::MaxContent
        });

        distribute_to_growth_limits(tracks, range.clone(), contribution.min_content - gutters, |track| {
            track.max.is_intrinsic()
        });
        distribute_to_growth_limits(tracks, range, contribution.max_content - gutters, |track| {
            matches!(
                track.max,
                MaxTrackSizingFunction::MaxContent
                    | MaxTrackSizingFunction::Auto
                    | MaxTrackSizingFunction::FitContent(_)
            )
        });
    }

    // Items spanning flexible tracks feed the minimum of those tracks, by flex factor
    for (item, contribution) in items.iter().zip(contributions) {
        let Some(contribution) = contribution else { continue };
        let range = counts.track_range(item.area.get(sizing.axis));
        if !spans_flexible(tracks, range.clone()) {
            continue;
        }
        let current: f32 = tracks[range.clone()].iter().map(|track| track.base_size).sum();
        let space = contribution.minimum - inner_gutters(tracks, range.clone()) - current;
        if space <= 0.0 {
            continue;
        }

        let eligible = |track: &GridTrack| {
            track.is_flexible() && track.min.is_intrinsic() && !track.is_collapsed
        };
        let eligible_count = tracks[range.clone()].iter().filter(|track| eligible(track)).count();
        if eligible_count == 0 {
            continue;
        }
        let flex_sum: f32 = tracks[range.clone()]
            .iter()
            .filter(|track| eligible(track))
            .map(|track| track.max.flex_factor())
            .sum();
        for track in tracks[range].iter_mut().filter(|track| eligible(track)) {
            let share = if flex_sum > 0.0 {
                space * track.max.flex_factor() / flex_sum
            } else {
                space / eligible_count as f32
            };
            track.base_size += share;
        }
    }

    for track in tracks.iter_mut() {
        if track.growth_limit.is_infinite() && !track.is_flexible() {
            track.growth_limit = track.base_size;
        }
        if track.growth_limit < track.base_size {
            track.growth_limit = track.base_size;
        }
    }
}

/// Grow the base sizes of the eligible tracks in `range` until they sum to `size`.
///
/// Space is shared equally and each track stops at its growth limit. Space left once every
/// track has reached its limit is shared equally past the limits.
fn distribute_to_base_sizes(
    tracks: &mut [GridTrack],
    range: Range<usize>,
    size: f32,
    eligible: impl Fn(&GridTrack) -> bool,
) {
    let current: f32 = tracks[range.clone()].iter().map(|track| track.base_size).sum();
    let mut space = size - current;
    if space <= 0.0 {
        return;
    }
    let eligible_tracks: Vec<usize> = range
        .filter(|index| eligible(&tracks[*index]) && !tracks[*index].is_collapsed)
        .collect();
    if eligible_tracks.is_empty() {
        return;
    }

    // Each round either exhausts the space or caps at least one more track
    for _ in 0..=eligible_tracks.len() {
        let growable: Vec<usize> = eligible_tracks
            .iter()
            .copied()
            .filter(|index| tracks[*index].base_size < tracks[*index].growth_limit)
            .collect();
        if growable.is_empty() || space <= f32::EPSILON {
            break;
        }
        let share = space / growable.len() as f32;
        for index in growable {
            let track = &mut tracks[index];
            let increase = share.min(track.growth_limit - track.base_size);
            track.base_size += increase;
            space -= increase;
        }
    }

    if space > f32::EPSILON {
        let share = space / eligible_tracks.len() as f32;
        for index in eligible_tracks {
            tracks[index].base_size += share;
        }
    }

    for track in &mut tracks[..] {
        if track.growth_limit < track.base_size {
            track.growth_limit = track.base_size;
        }
    }
}

/// Grow the growth limits of the eligible tracks in `range` until they sum to `size`
fn distribute_to_growth_limits(
    tracks: &mut [GridTrack],
    range: Range<usize>,
    size: f32,
    eligible: impl Fn(&GridTrack) -> bool,
) {
    let current: f32 = tracks[range.clone()]
        .iter()
        .map(GridTrack::finite_growth_limit)
        .sum();
    let space = size - current;
    if space <= 0.0 {
        return;
    }
    let eligible_tracks: Vec<usize> = range
        .filter(|index| eligible(&tracks[*index]) && !tracks[*index].is_collapsed)
        .collect();
    if eligible_tracks.is_empty() {
        return;
    }
    let share = space / eligible_tracks.len() as f32;
    for index in eligible_tracks {
        let track = &mut tracks[index];
        track.growth_limit = track.finite_growth_limit() + share;
    }
}

/// Grow every track towards its growth limit using the free space
fn maximize_tracks(sizing: &AxisSizing<'_>, tracks: &mut [GridTrack]) {
    match sizing.free_space_basis() {
        AvailableSpace::MinContent => {}
        AvailableSpace::MaxContent => {
            for track in tracks.iter_mut().filter(|track| track.growth_limit.is_finite()) {
                track.base_size = track.growth_limit;
            }
        }
        AvailableSpace::Definite(space) => {
            let used: f32 = tracks.iter().map(|track| track.base_size).sum::<f32>() + total_gutters(tracks);
            let mut free_space = space - used;
            for _ in 0..=tracks.len() {
                let growable: Vec<usize> = (0..tracks.len())
                    .filter(|index| {
                        let track = &tracks[*index];
                        !track.is_collapsed
                            && track.growth_limit.is_finite()
                            && track.base_size < track.growth_limit
                    })
                    .collect();
                if growable.is_empty() || free_space <= f32::EPSILON {
                    break;
                }
                let share = free_space / growable.len() as f32;
                for index in growable {
                    let track = &mut tracks[index];
                    let increase = share.min(track.growth_limit - track.base_size);
                    track.base_size += increase;
                    free_space -= increase;
                }
            }
        }
    }
}

/// The size of one `fr` given the space the tracks in `indices` must fill.
///
/// Flexible tracks whose base size already exceeds their share are treated as inflexible and
/// the share is recomputed. Every round removes at least one track, so the loop is bounded by
/// the number of tracks.
fn find_size_of_fr(tracks: &[GridTrack], indices: Range<usize>, space_to_fill: f32) -> f32 {
    let mut inflexible: Vec<bool> = tracks[indices.clone()]
        .iter()
        .map(|track| !track.is_flexible() || track.is_collapsed)
        .collect();

    let mut hypothetical_fr_size = 0.0;
    for _ in 0..=inflexible.len() {
        let tracks = &tracks[indices.clone()];
        let leftover: f32 = space_to_fill
            - tracks
                .iter()
                .zip(&inflexible)
                .filter(|(_, inflexible)| **inflexible)
                .map(|(track, _)| track.base_size)
                .sum::<f32>();
        let flex_sum: f32 = tracks
            .iter()
            .zip(&inflexible)
            .filter(|(_, inflexible)| !**inflexible)
            .map(|(track, _)| track.max.flex_factor())
            .sum::<f32>()
            .max(1.0);
        hypothetical_fr_size = leftover / flex_sum;

        let mut changed = false;
        for (track, inflexible) in tracks.iter().zip(inflexible.iter_mut()) {
            if !*inflexible && track.base_size > hypothetical_fr_size * track.max.flex_factor() {
                *inflexible = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    hypothetical_fr_size.max(0.0)
}

fn expand_flexible_tracks(
    sizing: &AxisSizing<'_>,
    tracks: &mut [GridTrack],
    items: &[GridItem],
    contributions: &[Option<Contribution>],
) {
    if !tracks.iter().any(|track| track.is_flexible() && !track.is_collapsed) {
        return;
    }

    let fr_size = match sizing.free_space_basis() {
        AvailableSpace::MinContent => return,
        AvailableSpace::Definite(space) => {
            find_size_of_fr(tracks, 0..tracks.len(), space - total_gutters(tracks))
        }
        AvailableSpace::MaxContent => {
            let from_tracks = tracks
                .iter()
                .filter(|track| track.is_flexible() && !track.is_collapsed)
                .map(|track| {
                    let factor = track.max.flex_factor();
                    if factor > 1.0 {
                        track.base_size / factor
                    } else {
                        track.base_size
                    }
                })
                .fold(0.0, f32::max);
            items
                .iter()
                .zip(contributions)
                .filter_map(|(item, contribution)| {
                    let contribution = (*contribution)?;
                    let range = sizing.counts.track_range(item.area.get(sizing.axis));
                    tracks[range.clone()]
                        .iter()
                        .any(GridTrack::is_flexible)
                        .then(|| {
                            let space = contribution.max_content - inner_gutters(tracks, range.clone());
                            find_size_of_fr(tracks, range, space)
                        })
                })
                .fold(from_tracks, f32::max)
        }
    };

    for track in tracks.iter_mut().filter(|track| track.is_flexible() && !track.is_collapsed) {
        track.base_size = track.base_size.max(fr_size * track.max.flex_factor());
        track.growth_limit = track.growth_limit.max(track.base_size);
    }
}

/// Share leftover definite space equally between `auto` tracks
fn stretch_auto_tracks(sizing: &AxisSizing<'_>, tracks: &mut [GridTrack]) {
    if sizing.content_alignment != AlignContent::Stretch {
        return;
    }
    let space = match sizing.free_space_basis() {
        AvailableSpace::Definite(space) => space,
        _ => return,
    };
    let used: f32 = tracks.iter().map(|track| track.base_size).sum::<f32>() + total_gutters(tracks);
    let free_space = space - used;
    let auto_tracks = tracks
        .iter()
        .filter(|track| track.max == MaxTrackSizingFunction::Auto && !track.is_collapsed)
        .count();
    if free_space <= 0.0 || auto_tracks == 0 {
        return;
    }
    let share = free_space / auto_tracks as f32;
    for track in tracks
        .iter_mut()
        .filter(|track| track.max == MaxTrackSizingFunction::Auto && !track.is_collapsed)
    {
        track.base_size += share;
    }
}
