//! CSS Grid layout.
//!
//! The steps run in order: expand the explicit grid, place items (growing the implicit grid),
//! size columns then rows, align the tracks within the container, and finally lay out each item
//! within its grid area.

mod alignment;
mod explicit;
mod placement;
mod track_sizing;
mod types;

use crate::geometry::{AbsoluteAxis, MaybeMath, Point, Rect, Size};
use crate::style::{
    AlignContent, AlignItems, AvailableSpace, MaxTrackSizingFunction, MinTrackSizingFunction,
    ResolveOrZero, TrackSizingFunction,
};
use crate::tree::{
    DetailedGridInfo, DetailedGridItemsInfo, DetailedGridTracksInfo, Layout, LayoutInput, LayoutOutput,
    LayoutPartialTree, NodeId, RunMode, SizingMode,
};

use super::common::{
    ChildKind, ResolvedBox, compute_content_size_contribution, hide_child, layout_absolute_child,
    resolve_relative_offset,
};

use self::alignment::{align_item_within_area, align_tracks};
use self::explicit::{AxisTemplate, ExplicitAxis, compute_explicit_axis};
use self::placement::{PlacementInput, count_tracks, place_grid_items, resolve_axis_placement};
use self::track_sizing::{AxisSizing, size_tracks};
use self::types::{GridArea, GridItem, GridTrack, TrackCounts};

pub(crate) fn compute_grid_layout(
    tree: &mut impl LayoutPartialTree,
    node: NodeId,
    inputs: LayoutInput,
) -> LayoutOutput {
    let style = tree.get_style(node);
    let resolved = ResolvedBox::resolve(style, inputs.parent_size);
    let known_dimensions = resolved.styled_known_dimensions(&inputs);

    if inputs.run_mode == RunMode::ComputeSize {
        if let Size {
            width: Some(width),
            height: Some(height),
        } = known_dimensions
        {
            return LayoutOutput::from_outer_size(Size { width, height });
        }
    }

    compute_inner(
        tree,
        node,
        LayoutInput {
            known_dimensions,
            ..inputs
        },
        resolved,
    )
}

fn compute_inner(
    tree: &mut impl LayoutPartialTree,
    node: NodeId,
    inputs: LayoutInput,
    resolved: ResolvedBox,
) -> LayoutOutput {
    let LayoutInput {
        known_dimensions,
        available_space,
        run_mode,
        sizing_mode,
        ..
    } = inputs;

    let (min_size, max_size) = match sizing_mode {
        SizingMode::InherentSize => (resolved.min_size, resolved.max_size),
        SizingMode::ContentSize => (Size::NONE, Size::NONE),
    };
    let padding_border = resolved.padding_border();
    let content_box_inset = resolved.content_box_inset();
    let margin = resolved.margin_or_zero();

    let non_negative = |size: Size<Option<f32>>| size.map(|size| size.map(|size| size.max(0.0)));
    let inner_size = non_negative(known_dimensions.maybe_sub(content_box_inset));
    let min_inner_size = non_negative(min_size.maybe_sub(content_box_inset));
    let max_inner_size = non_negative(max_size.maybe_sub(content_box_inset));
    let available_space = Size {
        width: match inner_size.width {
            Some(width) => AvailableSpace::Definite(width),
            None => available_space
                .width
                .maybe_sub(margin.horizontal_axis_sum())
                .maybe_sub(content_box_inset.width),
        },
        height: match inner_size.height {
            Some(height) => AvailableSpace::Definite(height),
            None => available_space
                .height
                .maybe_sub(margin.vertical_axis_sum())
                .maybe_sub(content_box_inset.height),
        },
    };

    let style = tree.get_style(node);
    let gap = style
        .gap
        .resolve_or_zero(inner_size)
        .map(|gap: f32| gap.max(0.0));
    let flow = style.grid_auto_flow;
    let align_items = style.align_items.unwrap_or(AlignItems::Stretch);
    let justify_items = style.justify_items.unwrap_or(AlignItems::Stretch);
    let align_content = style.align_content.unwrap_or(AlignContent::Stretch);
    let justify_content = style.justify_content.unwrap_or(AlignContent::Stretch);
    let auto_columns = style.grid_auto_columns.clone();
    let auto_rows = style.grid_auto_rows.clone();

    let explicit_columns = compute_explicit_axis(
        &AxisTemplate {
            axis: AbsoluteAxis::Horizontal,
            components: &style.grid_template_columns,
            names: &style.grid_template_column_names,
            areas: &style.grid_template_areas,
            auto_tracks: &style.grid_auto_columns,
        },
        inner_size.width.or(max_inner_size.width),
        min_inner_size.width,
        gap.width,
    );
    let explicit_rows = compute_explicit_axis(
        &AxisTemplate {
            axis: AbsoluteAxis::Vertical,
            components: &style.grid_template_rows,
            names: &style.grid_template_row_names,
            areas: &style.grid_template_areas,
            auto_tracks: &style.grid_auto_rows,
        },
        inner_size.height.or(max_inner_size.height),
        min_inner_size.height,
        gap.height,
    );

    // Place in-flow children
    let mut placements = Vec::new();
    let mut items = Vec::new();
    for (order, child) in tree.child_ids(node).enumerate() {
        let child_style = tree.get_style(child);
        if ChildKind::of(child_style) != ChildKind::InFlow {
            continue;
        }
        placements.push(PlacementInput {
            column: resolve_axis_placement(
                &child_style.grid_column,
                explicit_columns.track_count(),
                &explicit_columns.line_names,
            ),
            row: resolve_axis_placement(
                &child_style.grid_row,
                explicit_rows.track_count(),
                &explicit_rows.line_names,
            ),
        });
        let resolved = ResolvedBox::resolve(child_style, inner_size);
        items.push(GridItem {
            node: child,
            order: order as u32,
            area: GridArea {
                column: Default::default(),
                row: Default::default(),
            },
            resolved,
            overflow: child_style.overflow,
            align_self: child_style.align_self.unwrap_or(align_items),
            justify_self: child_style.justify_self.unwrap_or(justify_items),
            relative_offset: resolve_relative_offset(child_style.inset, inner_size),
            margin: resolved.margin_or_zero(),
        });
    }

    let areas = place_grid_items(
        &placements,
        explicit_columns.track_count(),
        explicit_rows.track_count(),
        flow,
    );
    for (item, area) in items.iter_mut().zip(&areas) {
        item.area = *area;
    }

    let column_counts = count_tracks(&areas, AbsoluteAxis::Horizontal, explicit_columns.track_count());
    let row_counts = count_tracks(&areas, AbsoluteAxis::Vertical, explicit_rows.track_count());
    let mut columns = build_tracks(
        AbsoluteAxis::Horizontal,
        column_counts,
        &explicit_columns,
        &auto_columns,
        &areas,
        inner_size.width,
        gap.width,
    );
    let mut rows = build_tracks(
        AbsoluteAxis::Vertical,
        row_counts,
        &explicit_rows,
        &auto_rows,
        &areas,
        inner_size.height,
        gap.height,
    );

    #[cfg(feature = "tracing")]
    tracing::trace!(
        "Grid layout for node {}: {} items in {}x{} tracks",
        node,
        items.len(),
        columns.len(),
        rows.len()
    );

    size_tracks(
        tree,
        &AxisSizing {
            axis: AbsoluteAxis::Horizontal,
            counts: column_counts,
            inner_size: inner_size.width,
            available_space: available_space.width,
            content_alignment: justify_content,
            other_axis: None,
            container_inner_size: inner_size,
        },
        &mut columns,
        &items,
    );

    let outer_width = known_dimensions.width.unwrap_or_else(|| {
        (track_sum(&columns) + content_box_inset.width)
            .maybe_clamp(min_size.width, max_size.width)
            .max(padding_border.horizontal_axis_sum())
    });
    let inner_width = (outer_width - content_box_inset.width).max(0.0);

    size_tracks(
        tree,
        &AxisSizing {
            axis: AbsoluteAxis::Vertical,
            counts: row_counts,
            inner_size: inner_size.height,
            available_space: available_space.height,
            content_alignment: align_content,
            other_axis: Some((&columns, column_counts)),
            container_inner_size: Size {
                width: Some(inner_width),
                height: inner_size.height,
            },
        },
        &mut rows,
        &items,
    );

    let outer_height = known_dimensions.height.unwrap_or_else(|| {
        (track_sum(&rows) + content_box_inset.height)
            .maybe_clamp(min_size.height, max_size.height)
            .max(padding_border.vertical_axis_sum())
    });
    let inner_height = (outer_height - content_box_inset.height).max(0.0);
    let container_size = Size {
        width: outer_width,
        height: outer_height,
    };

    if run_mode == RunMode::ComputeSize {
        return LayoutOutput::from_outer_size(container_size);
    }

    align_tracks(&mut columns, inner_width, justify_content);
    align_tracks(&mut rows, inner_height, align_content);

    let content_origin = Point {
        x: padding_border.left,
        y: padding_border.top,
    };
    let item_parent_size = Size {
        width: Some(inner_width),
        height: Some(inner_height),
    };

    let mut content_size = Size::ZERO;
    let mut first_baseline = None;
    for item in &mut items {
        let column_range = column_counts.track_range(item.area.column);
        let row_range = row_counts.track_range(item.area.row);
        let (area_x, area_width) = area_extent(&columns, column_range);
        let (area_y, area_height) = area_extent(&rows, row_range.clone());

        let margin = item.resolved.margin_or_zero();
        let area_size = Size {
            width: area_width,
            height: area_height,
        };
        let mut known_dimensions = item.resolved.clamped_size();
        for axis in [AbsoluteAxis::Horizontal, AbsoluteAxis::Vertical] {
            if known_dimensions.get(axis).is_none() && item.stretches(axis) {
                let stretched = (area_size.get(axis) - item.margin_sum(axis))
                    .maybe_clamp(item.resolved.min_size.get(axis), item.resolved.max_size.get(axis))
                    .max(0.0);
                known_dimensions.set(axis, Some(stretched));
            }
        }
        let known_dimensions = known_dimensions.maybe_apply_aspect_ratio(item.resolved.aspect_ratio);

        let output = tree.compute_child_layout(
            item.node,
            LayoutInput {
                run_mode: RunMode::PerformLayout,
                sizing_mode: SizingMode::InherentSize,
                known_dimensions,
                parent_size: item_parent_size,
                available_space: Size {
                    width: AvailableSpace::Definite((area_width - margin.horizontal_axis_sum()).max(0.0)),
                    height: AvailableSpace::Definite((area_height - margin.vertical_axis_sum()).max(0.0)),
                },
            },
        );
        let size = known_dimensions
            .unwrap_or(output.size)
            .maybe_clamp(item.resolved.min_size, item.resolved.max_size);

        let (offset_x, extra_left, extra_right) = align_item_within_area(
            area_width - size.width - margin.horizontal_axis_sum(),
            item.justify_self,
            item.resolved.margin.left.is_none(),
            item.resolved.margin.right.is_none(),
        );
        let (offset_y, extra_top, extra_bottom) = align_item_within_area(
            area_height - size.height - margin.vertical_axis_sum(),
            item.align_self,
            item.resolved.margin.top.is_none(),
            item.resolved.margin.bottom.is_none(),
        );
        item.margin = Rect {
            left: margin.left + extra_left,
            right: margin.right + extra_right,
            top: margin.top + extra_top,
            bottom: margin.bottom + extra_bottom,
        };

        let location = Point {
            x: content_origin.x + area_x + item.margin.left + offset_x + item.relative_offset.x,
            y: content_origin.y + area_y + item.margin.top + offset_y + item.relative_offset.y,
        };

        tree.set_unrounded_layout(
            item.node,
            &Layout {
                order: item.order,
                location,
                size,
                content_size: output.content_size,
                scrollbar_size: item.resolved.scrollbar_gutter,
                border: item.resolved.border,
                padding: item.resolved.padding,
                margin: item.margin,
            },
        );

        // Items are in document order, so the first one in the first row wins
        if row_range.start == 0 && first_baseline.is_none() {
            first_baseline = Some(location.y + output.first_baselines.y.unwrap_or(size.height));
        }

        content_size = content_size.max(compute_content_size_contribution(
            location,
            size,
            output.content_size,
            item.overflow,
        ));
    }

    for order in 0..tree.child_count(node) {
        let child = tree.get_child_id(node, order);
        match ChildKind::of(tree.get_style(child)) {
            ChildKind::InFlow => {}
            ChildKind::Hidden => hide_child(tree, child, order as u32),
            ChildKind::Absolute => {
                let contribution = layout_absolute_child(
                    tree,
                    child,
                    order as u32,
                    container_size,
                    resolved.border,
                    resolved.scrollbar_gutter,
                    content_origin,
                );
                content_size = content_size.max(contribution);
            }
        }
    }

    tree.set_detailed_grid_info(
        node,
        DetailedGridInfo {
            rows: tracks_info(row_counts, &rows),
            columns: tracks_info(column_counts, &columns),
            items: items
                .iter()
                .map(|item| {
                    let row_first = row_counts.first_line();
                    let column_first = column_counts.first_line();
                    DetailedGridItemsInfo {
                        row_start: line_number(item.area.row.start, row_first),
                        row_end: line_number(item.area.row.end, row_first),
                        column_start: line_number(item.area.column.start, column_first),
                        column_end: line_number(item.area.column.end, column_first),
                    }
                })
                .collect(),
        },
    );

    LayoutOutput::from_sizes(container_size, content_size).with_first_baseline(first_baseline)
}

/// One-based line number of an origin-zero `line` counted from the first track at `first`
fn line_number(line: i16, first: i16) -> u16 {
    u16::try_from(i32::from(line) - i32::from(first) + 1).unwrap_or(0)
}

/// Create the tracks of one axis, explicit tracks from the template and implicit tracks from
/// the `grid-auto-*` list.
///
/// Implicit tracks after the explicit grid cycle through the auto list from its start, tracks
/// before it cycle backwards from its end.
fn build_tracks(
    axis: AbsoluteAxis,
    counts: TrackCounts,
    explicit: &ExplicitAxis,
    auto_tracks: &[TrackSizingFunction],
    areas: &[GridArea],
    inner_size: Option<f32>,
    gap: f32,
) -> Vec<GridTrack> {
    let mut occupied = vec![false; counts.len()];
    for area in areas {
        for index in counts.track_range(area.get(axis)) {
            occupied[index] = true;
        }
    }

    let auto_track = |index: isize| match auto_tracks.len() {
        0 => TrackSizingFunction::AUTO,
        len => auto_tracks[index.rem_euclid(len as isize) as usize],
    };

    let mut tracks: Vec<GridTrack> = (0..counts.len())
        .map(|index| {
            let line = counts.first_line() as isize + index as isize;
            let explicit_count = explicit.tracks.len() as isize;
            let sizing = if line < 0 {
                auto_track(line)
            } else if line < explicit_count {
                if explicit.auto_fit[line as usize] && !occupied[index] {
                    return GridTrack::collapsed();
                }
                explicit.tracks[line as usize]
            } else {
                auto_track(line - explicit_count)
            };
            let mut track = GridTrack::new(sizing);
            // Percentages of an indefinite size behave as auto
            if inner_size.is_none() {
                if let MinTrackSizingFunction::Percent(_) = track.min {
                    track.min = MinTrackSizingFunction::Auto;
                }
                if let MaxTrackSizingFunction::Percent(_) = track.max {
                    track.max = MaxTrackSizingFunction::Auto;
                }
            }
            track
        })
        .collect();

    let mut seen_track = false;
    for track in &mut tracks {
        if track.is_collapsed {
            track.gutter_before = 0.0;
            continue;
        }
        track.gutter_before = if seen_track { gap } else { 0.0 };
        seen_track = true;
    }
    tracks
}

/// Sum of the track sizes and the gutters between them
fn track_sum(tracks: &[GridTrack]) -> f32 {
    tracks
        .iter()
        .map(|track| track.base_size + track.gutter_before)
        .sum()
}

/// Offset and size of the area covering `range`, after track alignment
fn area_extent(tracks: &[GridTrack], range: core::ops::Range<usize>) -> (f32, f32) {
    match (tracks.get(range.start), range.end.checked_sub(1).and_then(|last| tracks.get(last))) {
        (Some(first), Some(last)) if range.start < range.end => {
            (first.offset, last.offset + last.base_size - first.offset)
        }
        _ => (0.0, 0.0),
    }
}

fn tracks_info(counts: TrackCounts, tracks: &[GridTrack]) -> DetailedGridTracksInfo {
    DetailedGridTracksInfo {
        negative_implicit_tracks: counts.negative_implicit,
        explicit_tracks: counts.explicit,
        positive_implicit_tracks: counts.positive_implicit,
        gutters: tracks
            .windows(2)
            .map(|pair| pair[1].offset - (pair[0].offset + pair[0].base_size))
            .collect(),
        sizes: tracks.iter().map(|track| track.base_size).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Line;

    fn explicit(tracks: Vec<TrackSizingFunction>, auto_fit: bool) -> ExplicitAxis {
        ExplicitAxis {
            auto_fit: vec![auto_fit; tracks.len()],
            tracks,
            line_names: Default::default(),
        }
    }

    fn column_area(start: i16, end: i16) -> GridArea {
        GridArea {
            column: Line { start, end },
            row: Line { start: 0, end: 1 },
        }
    }

    #[test]
    fn implicit_tracks_cycle_through_the_auto_list() {
        let counts = TrackCounts {
            negative_implicit: 1,
            explicit: 1,
            positive_implicit: 3,
        };
        let auto = [TrackSizingFunction::length(1.0), TrackSizingFunction::length(2.0)];
        let tracks = build_tracks(
            AbsoluteAxis::Horizontal,
            counts,
            &explicit(vec![TrackSizingFunction::length(50.0)], false),
            &auto,
            &[column_area(-1, 4)],
            None,
            0.0,
        );
        let mins: Vec<MinTrackSizingFunction> = tracks.iter().map(|track| track.min).collect();
        assert_eq!(
            mins,
            vec![
                MinTrackSizingFunction::Length(2.0),
                MinTrackSizingFunction::Length(50.0),
                MinTrackSizingFunction::Length(1.0),
                MinTrackSizingFunction::Length(2.0),
                MinTrackSizingFunction::Length(1.0),
            ]
        );
    }

    #[test]
    fn empty_auto_fit_tracks_collapse_and_lose_their_gutter() {
        let counts = TrackCounts {
            negative_implicit: 0,
            explicit: 3,
            positive_implicit: 0,
        };
        let tracks = build_tracks(
            AbsoluteAxis::Horizontal,
            counts,
            &explicit(vec![TrackSizingFunction::length(10.0); 3], true),
            &[],
            &[column_area(0, 1)],
            Some(100.0),
            5.0,
        );
        assert!(!tracks[0].is_collapsed);
        assert!(tracks[1].is_collapsed && tracks[2].is_collapsed);
        assert_eq!(tracks[1].gutter_before, 0.0);
    }

    #[test]
    fn percentage_tracks_without_a_definite_size_become_auto() {
        let counts = TrackCounts {
            negative_implicit: 0,
            explicit: 1,
            positive_implicit: 0,
        };
        let tracks = build_tracks(
            AbsoluteAxis::Vertical,
            counts,
            &explicit(vec![TrackSizingFunction::percent(0.5)], false),
            &[],
            &[],
            None,
            0.0,
        );
        assert_eq!(tracks[0].min, MinTrackSizingFunction::Auto);
        assert_eq!(tracks[0].max, MaxTrackSizingFunction::Auto);
    }

    #[test]
    fn gutters_in_detailed_info_include_distributed_space() {
        let mut tracks = vec![
            GridTrack::new(TrackSizingFunction::length(10.0)),
            GridTrack::new(TrackSizingFunction::length(10.0)),
        ];
        tracks[0].base_size = 10.0;
        tracks[1].base_size = 10.0;
        tracks[1].offset = 30.0;
        let info = tracks_info(
            TrackCounts {
                negative_implicit: 0,
                explicit: 2,
                positive_implicit: 0,
            },
            &tracks,
        );
        assert_eq!(info.gutters, vec![20.0]);
        assert_eq!(info.sizes, vec![10.0, 10.0]);
    }
}
