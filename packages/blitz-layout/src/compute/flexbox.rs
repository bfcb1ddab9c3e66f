//! Flexbox layout.
//!
//! Follows the steps of the CSS Flexible Box Layout algorithm: determine the flex base size of
//! each item, break items into lines, resolve flexible lengths per line, size the cross axis and
//! finally align items and lines.

use core::ops::Range;

use crate::geometry::{MaybeMath, Point, Rect, Size};
use crate::style::{
    AlignContent, AlignItems, AlignSelf, AvailableSpace, BoxSizing, Dimension, FlexDirection, FlexWrap,
    JustifyContent, MaybeResolve, Overflow, ResolveOrZero,
};
use crate::tree::{Layout, LayoutInput, LayoutOutput, LayoutPartialTree, NodeId, RunMode, SizingMode};

use super::common::{
    ChildKind, ResolvedBox, apply_alignment_fallback, compute_alignment_offset,
    compute_content_size_contribution, hide_child, layout_absolute_child, resolve_relative_offset,
};

/// An in-flow child of a flex container and everything computed about it
struct FlexItem {
    node: NodeId,
    order: u32,
    resolved: ResolvedBox,
    /// Resolved `flex-basis`, `None` for `auto` or an unresolvable percentage
    style_flex_basis: Option<f32>,
    flex_grow: f32,
    flex_shrink: f32,
    align_self: AlignSelf,
    overflow: Point<Overflow>,
    relative_offset: Point<f32>,

    /// Used margins; auto margins are zero until free space is distributed
    margin: Rect<f32>,
    margin_is_auto: Rect<bool>,

    flex_basis: f32,
    /// Flex basis without padding and border, used to weight shrinking
    inner_flex_basis: f32,
    resolved_minimum_main_size: f32,
    hypothetical_inner_size: Size<f32>,
    hypothetical_outer_size: Size<f32>,
    target_size: Size<f32>,
    outer_target_size: Size<f32>,
    violation: f32,
    frozen: bool,

    /// Distance from the top of the margin box to the first baseline
    baseline: f32,
    /// Position of the margin box along the main axis, relative to the content box
    offset_main: f32,
    /// Position of the margin box within its line
    offset_cross: f32,
}

/// A run of items that are laid out together
struct FlexLine {
    items: Range<usize>,
    cross_size: f32,
    /// Position of the line relative to the content box
    offset_cross: f32,
}

/// Values that stay fixed for one run of the algorithm
struct AlgoConstants {
    dir: FlexDirection,
    is_row: bool,
    is_wrap: bool,
    is_wrap_reverse: bool,
    resolved: ResolvedBox,
    min_size: Size<Option<f32>>,
    max_size: Size<Option<f32>>,
    padding_border: Rect<f32>,
    content_box_inset: Size<f32>,
    gap: Size<f32>,
    align_items: AlignItems,
    align_content: AlignContent,
    justify_content: JustifyContent,
    node_outer_size: Size<Option<f32>>,
    node_inner_size: Size<Option<f32>>,
}

pub(crate) fn compute_flexbox_layout(
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

    compute_preliminary(
        tree,
        node,
        LayoutInput {
            known_dimensions,
            ..inputs
        },
        resolved,
    )
}

fn compute_preliminary(
    tree: &mut impl LayoutPartialTree,
    node: NodeId,
    inputs: LayoutInput,
    resolved: ResolvedBox,
) -> LayoutOutput {
    let LayoutInput {
        known_dimensions,
        available_space,
        run_mode,
        ..
    } = inputs;

    let constants = compute_constants(tree, node, &inputs, resolved);
    let dir = constants.dir;

    let mut items = generate_anonymous_flex_items(&*tree, node, &constants);
    let available_space = determine_available_space(known_dimensions, available_space, &constants);

    determine_flex_base_size(tree, &constants, available_space, &mut items);

    let mut lines = collect_flex_lines(&constants, available_space, &items);

    #[cfg(feature = "tracing")]
    tracing::trace!(
        "Flex layout for node {}: {} items in {} lines",
        node,
        items.len(),
        lines.len()
    );

    // Container main size
    let inner_main_size = determine_container_main_size(&constants, available_space, &lines, &items);
    let outer_main_size = inner_main_size + constants.content_box_inset.main(dir);

    for line in &lines {
        resolve_flexible_lengths(&constants, inner_main_size, &mut items[line.items.clone()]);
    }

    determine_hypothetical_cross_size(tree, &constants, available_space, inner_main_size, &mut items);
    calculate_cross_size(&constants, &mut lines, &items);
    handle_align_content_stretch(&constants, &mut lines);
    determine_used_cross_size(&constants, &lines, &mut items);
    distribute_remaining_free_space(&constants, inner_main_size, &lines, &mut items);
    align_flex_items_along_cross_axis(&constants, &lines, &mut items);

    // Container cross size
    let total_line_cross_size = lines.iter().map(|line| line.cross_size).sum::<f32>()
        + constants.gap.cross(dir) * lines.len().saturating_sub(1) as f32;
    let outer_cross_size = constants.node_outer_size.cross(dir).unwrap_or_else(|| {
        (total_line_cross_size + constants.content_box_inset.cross(dir))
            .maybe_clamp(constants.min_size.cross(dir), constants.max_size.cross(dir))
            .max(constants.padding_border.cross_axis_sum(dir))
    });
    let inner_cross_size = (outer_cross_size - constants.content_box_inset.cross(dir)).max(0.0);

    align_flex_lines_per_align_content(&constants, inner_cross_size, total_line_cross_size, &mut lines);

    let container_size = Size::from_main_cross(dir, outer_main_size, outer_cross_size);
    let first_baseline = container_first_baseline(&constants, &lines, &items);

    if run_mode == RunMode::ComputeSize {
        return LayoutOutput::from_outer_size(container_size).with_first_baseline(first_baseline);
    }

    let mut content_size = perform_final_layout(tree, &constants, inner_main_size, &lines, &items);

    let static_position = Point {
        x: constants.padding_border.left,
        y: constants.padding_border.top,
    };
    for order in 0..tree.child_count(node) {
        let child = tree.get_child_id(node, order);
        let kind = ChildKind::of(tree.get_style(child));
        match kind {
            ChildKind::InFlow => {}
            ChildKind::Hidden => hide_child(tree, child, order as u32),
            ChildKind::Absolute => {
                let contribution = layout_absolute_child(
                    tree,
                    child,
                    order as u32,
                    container_size,
                    constants.resolved.border,
                    constants.resolved.scrollbar_gutter,
                    static_position,
                );
                content_size = content_size.max(contribution);
            }
        }
    }

    LayoutOutput::from_sizes(container_size, content_size).with_first_baseline(first_baseline)
}

fn compute_constants(
    tree: &impl LayoutPartialTree,
    node: NodeId,
    inputs: &LayoutInput,
    resolved: ResolvedBox,
) -> AlgoConstants {
    let style = tree.get_style(node);
    let dir = style.flex_direction;

    let (min_size, max_size) = match inputs.sizing_mode {
        SizingMode::InherentSize => (resolved.min_size, resolved.max_size),
        SizingMode::ContentSize => (Size::NONE, Size::NONE),
    };
    let content_box_inset = resolved.content_box_inset();
    let node_outer_size = inputs.known_dimensions;
    let node_inner_size = node_outer_size
        .maybe_sub(content_box_inset)
        .map(|size| size.map(|size| size.max(0.0)));
    let gap = style
        .gap
        .resolve_or_zero(node_inner_size)
        .map(|gap: f32| gap.max(0.0));

    AlgoConstants {
        dir,
        is_row: dir.is_row(),
        is_wrap: style.flex_wrap != FlexWrap::NoWrap,
        is_wrap_reverse: style.flex_wrap == FlexWrap::WrapReverse,
        resolved,
        min_size,
        max_size,
        padding_border: resolved.padding_border(),
        content_box_inset,
        gap,
        align_items: style.align_items.unwrap_or(AlignItems::Stretch),
        align_content: style.align_content.unwrap_or(AlignContent::Stretch),
        justify_content: style.justify_content.unwrap_or(JustifyContent::FlexStart),
        node_outer_size,
        node_inner_size,
    }
}

fn generate_anonymous_flex_items(
    tree: &impl LayoutPartialTree,
    node: NodeId,
    constants: &AlgoConstants,
) -> Vec<FlexItem> {
    let dir = constants.dir;
    tree.child_ids(node)
        .enumerate()
        .filter_map(|(order, child)| {
            let style = tree.get_style(child);
            if ChildKind::of(style) != ChildKind::InFlow {
                return None;
            }

            let resolved = ResolvedBox::resolve(style, constants.node_inner_size);
            let box_sizing_adjustment = match style.box_sizing {
                BoxSizing::ContentBox => resolved.padding_border().main_axis_sum(dir),
                BoxSizing::BorderBox => 0.0,
            };
            let style_flex_basis = match style.flex_basis {
                Dimension::Auto => None,
                basis => basis
                    .maybe_resolve(constants.node_inner_size.main(dir))
                    .map(|basis| basis.max(0.0) + box_sizing_adjustment),
            };

            Some(FlexItem {
                node: child,
                order: order as u32,
                resolved,
                style_flex_basis,
                flex_grow: style.flex_grow.max(0.0),
                flex_shrink: style.flex_shrink.max(0.0),
                align_self: style.align_self.unwrap_or(constants.align_items),
                overflow: style.overflow,
                relative_offset: resolve_relative_offset(style.inset, constants.node_inner_size),
                margin: resolved.margin_or_zero(),
                margin_is_auto: resolved.margin.map(|margin| margin.is_none()),
                flex_basis: 0.0,
                inner_flex_basis: 0.0,
                resolved_minimum_main_size: 0.0,
                hypothetical_inner_size: Size::ZERO,
                hypothetical_outer_size: Size::ZERO,
                target_size: Size::ZERO,
                outer_target_size: Size::ZERO,
                violation: 0.0,
                frozen: false,
                baseline: 0.0,
                offset_main: 0.0,
                offset_cross: 0.0,
            })
        })
        .collect()
}

/// The space available to the items, inside the container's content box
fn determine_available_space(
    known_dimensions: Size<Option<f32>>,
    outer_available_space: Size<AvailableSpace>,
    constants: &AlgoConstants,
) -> Size<AvailableSpace> {
    let margin = constants.resolved.margin_or_zero();
    let inset = constants.content_box_inset;

    let width = match known_dimensions.width {
        Some(width) => AvailableSpace::Definite((width - inset.width).max(0.0)),
        None => outer_available_space
            .width
            .maybe_sub(margin.horizontal_axis_sum())
            .maybe_sub(inset.width),
    };
    let height = match known_dimensions.height {
        Some(height) => AvailableSpace::Definite((height - inset.height).max(0.0)),
        None => outer_available_space
            .height
            .maybe_sub(margin.vertical_axis_sum())
            .maybe_sub(inset.height),
    };
    Size { width, height }
}

/// The cross size an item is measured with before its own cross size is known
fn child_known_cross_size(constants: &AlgoConstants, item: &FlexItem) -> Option<f32> {
    let dir = constants.dir;
    item.resolved.size.cross(dir).or_else(|| {
        let stretches = item.align_self == AlignItems::Stretch
            && !item.margin_is_auto.cross_start(dir)
            && !item.margin_is_auto.cross_end(dir);
        if stretches && !constants.is_wrap {
            constants
                .node_inner_size
                .cross(dir)
                .map(|cross| (cross - item.margin.cross_axis_sum(dir)).max(0.0))
        } else {
            None
        }
    })
}

fn determine_flex_base_size(
    tree: &mut impl LayoutPartialTree,
    constants: &AlgoConstants,
    available_space: Size<AvailableSpace>,
    items: &mut [FlexItem],
) {
    let dir = constants.dir;
    let cross_available = match constants.node_inner_size.cross(dir) {
        Some(cross) => AvailableSpace::Definite(cross),
        None => available_space.cross(dir),
    };

    for item in items {
        let known_cross = child_known_cross_size(constants, item);
        let child_known_dimensions = Size::from_main_cross(dir, None, known_cross);
        let padding_border_main = item.resolved.padding_border().main_axis_sum(dir);

        let flex_basis = 'flex_basis: {
            if let Some(basis) = item.style_flex_basis {
                break 'flex_basis basis;
            }
            if let Some(main) = item.resolved.size.main(dir) {
                break 'flex_basis main;
            }
            if let (Some(ratio), Some(cross)) = (item.resolved.aspect_ratio, known_cross) {
                break 'flex_basis if constants.is_row { cross * ratio } else { cross / ratio };
            }

            let main_available = match available_space.main(dir) {
                AvailableSpace::MinContent => AvailableSpace::MinContent,
                _ => AvailableSpace::MaxContent,
            };
            let cross_available = cross_available.maybe_sub(item.margin.cross_axis_sum(dir));
            tree.compute_child_layout(
                item.node,
                LayoutInput {
                    run_mode: RunMode::ComputeSize,
                    sizing_mode: SizingMode::ContentSize,
                    known_dimensions: child_known_dimensions,
                    parent_size: constants.node_inner_size,
                    available_space: Size::from_main_cross(dir, main_available, cross_available),
                },
            )
            .size
            .main(dir)
        };

        item.flex_basis = flex_basis.max(padding_border_main);
        item.inner_flex_basis = item.flex_basis - padding_border_main;

        // Automatic minimum size: the content size suggestion capped by the specified size
        let overflow_main = if constants.is_row { item.overflow.x } else { item.overflow.y };
        item.resolved_minimum_main_size = match item.resolved.min_size.main(dir) {
            Some(min) => min,
            None => match overflow_main.maybe_into_automatic_min_size() {
                Some(min) => min,
                None => {
                    let min_content_main = tree
                        .compute_child_layout(
                            item.node,
                            LayoutInput {
                                run_mode: RunMode::ComputeSize,
                                sizing_mode: SizingMode::ContentSize,
                                known_dimensions: child_known_dimensions,
                                parent_size: constants.node_inner_size,
                                available_space: Size::from_main_cross(
                                    dir,
                                    AvailableSpace::MinContent,
                                    cross_available.maybe_sub(item.margin.cross_axis_sum(dir)),
                                ),
                            },
                        )
                        .size
                        .main(dir);
                    min_content_main
                        .maybe_min(item.resolved.size.main(dir))
                        .maybe_min(item.resolved.max_size.main(dir))
                }
            },
        }
        .max(padding_border_main);

        let hypothetical_inner_main = item
            .flex_basis
            .maybe_clamp(Some(item.resolved_minimum_main_size), item.resolved.max_size.main(dir));
        item.hypothetical_inner_size.set_main(dir, hypothetical_inner_main);
        item.hypothetical_outer_size
            .set_main(dir, hypothetical_inner_main + item.margin.main_axis_sum(dir));
    }
}

fn collect_flex_lines(
    constants: &AlgoConstants,
    available_space: Size<AvailableSpace>,
    items: &[FlexItem],
) -> Vec<FlexLine> {
    let new_line = |range: Range<usize>| FlexLine {
        items: range,
        cross_size: 0.0,
        offset_cross: 0.0,
    };
    if items.is_empty() {
        return Vec::new();
    }
    if !constants.is_wrap {
        return vec![new_line(0..items.len())];
    }

    let dir = constants.dir;
    match available_space.main(dir) {
        AvailableSpace::MaxContent => vec![new_line(0..items.len())],
        AvailableSpace::MinContent => (0..items.len()).map(|index| new_line(index..index + 1)).collect(),
        AvailableSpace::Definite(main_space) => {
            let gap = constants.gap.main(dir);
            let mut lines = Vec::new();
            let mut start = 0;
            let mut line_length = 0.0;
            for (index, item) in items.iter().enumerate() {
                let outer_main = item.hypothetical_outer_size.main(dir);
                if index > start && line_length + gap + outer_main > main_space {
                    lines.push(new_line(start..index));
                    start = index;
                    line_length = outer_main;
                } else if index == start {
                    line_length = outer_main;
                } else {
                    line_length += gap + outer_main;
                }
            }
            lines.push(new_line(start..items.len()));
            lines
        }
    }
}

fn determine_container_main_size(
    constants: &AlgoConstants,
    available_space: Size<AvailableSpace>,
    lines: &[FlexLine],
    items: &[FlexItem],
) -> f32 {
    let dir = constants.dir;
    if let Some(inner_main) = constants.node_inner_size.main(dir) {
        return inner_main;
    }

    let gap = constants.gap.main(dir);
    let longest_line = lines
        .iter()
        .map(|line| {
            let line_items = &items[line.items.clone()];
            line_items
                .iter()
                .map(|item| item.hypothetical_outer_size.main(dir))
                .sum::<f32>()
                + gap * line_items.len().saturating_sub(1) as f32
        })
        .fold(0.0, f32::max);

    // Wrapping containers fill the space they wrapped against
    let content_main = match available_space.main(dir) {
        AvailableSpace::Definite(space) if lines.len() > 1 => longest_line.max(space),
        _ => longest_line,
    };

    let inset = constants.content_box_inset.main(dir);
    let outer = (content_main + inset)
        .maybe_clamp(constants.min_size.main(dir), constants.max_size.main(dir))
        .max(constants.padding_border.main_axis_sum(dir));
    (outer - inset).max(0.0)
}

/// Resolve the target main size of every item on a line.
///
/// Each round of the loop freezes at least one item: either every item (no violation), or all
/// items whose clamp moved them in the direction of the total violation. The loop therefore runs
/// at most once per item.
fn resolve_flexible_lengths(constants: &AlgoConstants, inner_main_size: f32, line: &mut [FlexItem]) {
    let dir = constants.dir;
    let total_gap = constants.gap.main(dir) * line.len().saturating_sub(1) as f32;

    let used_flex_factor: f32 = total_gap
        + line
            .iter()
            .map(|item| item.hypothetical_outer_size.main(dir))
            .sum::<f32>();
    let growing = used_flex_factor < inner_main_size;

    // Size inflexible items
    for item in line.iter_mut() {
        let factor = if growing { item.flex_grow } else { item.flex_shrink };
        let hypothetical = item.hypothetical_inner_size.main(dir);
        item.frozen = factor == 0.0
            || (growing && item.flex_basis > hypothetical)
            || (!growing && item.flex_basis < hypothetical);
        if item.frozen {
            item.target_size.set_main(dir, hypothetical);
            item.outer_target_size
                .set_main(dir, hypothetical + item.margin.main_axis_sum(dir));
        }
    }

    let used_space = |line: &[FlexItem]| -> f32 {
        total_gap
            + line
                .iter()
                .map(|item| {
                    if item.frozen {
                        item.outer_target_size.main(dir)
                    } else {
                        item.flex_basis + item.margin.main_axis_sum(dir)
                    }
                })
                .sum::<f32>()
    };
    let initial_free_space = inner_main_size - used_space(line);

    for _ in 0..=line.len() {
        if line.iter().all(|item| item.frozen) {
            break;
        }

        let mut free_space = inner_main_size - used_space(line);
        let (sum_flex_grow, sum_flex_shrink) = line
            .iter()
            .filter(|item| !item.frozen)
            .fold((0.0, 0.0), |(grow, shrink), item| {
                (grow + item.flex_grow, shrink + item.flex_shrink)
            });

        // A total flex factor below one only takes that fraction of the free space
        let sum_factors = if growing { sum_flex_grow } else { sum_flex_shrink };
        if sum_factors < 1.0 {
            let scaled = initial_free_space * sum_factors;
            if scaled.abs() < free_space.abs() {
                free_space = scaled;
            }
        }

        if free_space.is_normal() {
            if growing && sum_flex_grow > 0.0 {
                for item in line.iter_mut().filter(|item| !item.frozen) {
                    let target = item.flex_basis + free_space * (item.flex_grow / sum_flex_grow);
                    item.target_size.set_main(dir, target);
                }
            } else if !growing && sum_flex_shrink > 0.0 {
                let sum_scaled_shrink: f32 = line
                    .iter()
                    .filter(|item| !item.frozen)
                    .map(|item| item.inner_flex_basis * item.flex_shrink)
                    .sum();
                for item in line.iter_mut().filter(|item| !item.frozen) {
                    let scaled_shrink = item.inner_flex_basis * item.flex_shrink;
                    let target = if sum_scaled_shrink > 0.0 {
                        item.flex_basis + free_space * (scaled_shrink / sum_scaled_shrink)
                    } else {
                        item.flex_basis
                    };
                    item.target_size.set_main(dir, target);
                }
            }
        } else {
            for item in line.iter_mut().filter(|item| !item.frozen) {
                item.target_size.set_main(dir, item.flex_basis);
            }
        }

        // Clamp to min and max, recording how far each item moved
        let mut total_violation = 0.0;
        for item in line.iter_mut().filter(|item| !item.frozen) {
            let target = item.target_size.main(dir);
            let clamped = target
                .maybe_clamp(Some(item.resolved_minimum_main_size), item.resolved.max_size.main(dir))
                .max(0.0);
            item.violation = clamped - target;
            item.target_size.set_main(dir, clamped);
            item.outer_target_size
                .set_main(dir, clamped + item.margin.main_axis_sum(dir));
            total_violation += item.violation;
        }

        for item in line.iter_mut().filter(|item| !item.frozen) {
            item.frozen = if total_violation > 0.0 {
                item.violation > 0.0
            } else if total_violation < 0.0 {
                item.violation < 0.0
            } else {
                true
            };
        }
    }
}

fn determine_hypothetical_cross_size(
    tree: &mut impl LayoutPartialTree,
    constants: &AlgoConstants,
    available_space: Size<AvailableSpace>,
    inner_main_size: f32,
    items: &mut [FlexItem],
) {
    let dir = constants.dir;
    let cross_available = match constants.node_inner_size.cross(dir) {
        Some(cross) => AvailableSpace::Definite(cross),
        None => available_space.cross(dir),
    };

    for item in items {
        let target_main = item.target_size.main(dir);
        let known_cross = item.resolved.clamped_size().cross(dir);
        let output = tree.compute_child_layout(
            item.node,
            LayoutInput {
                run_mode: RunMode::ComputeSize,
                sizing_mode: SizingMode::InherentSize,
                known_dimensions: Size::from_main_cross(dir, Some(target_main), known_cross),
                parent_size: constants.node_inner_size,
                available_space: Size::from_main_cross(
                    dir,
                    AvailableSpace::Definite(inner_main_size),
                    cross_available.maybe_sub(item.margin.cross_axis_sum(dir)),
                ),
            },
        );

        let cross = known_cross
            .unwrap_or(output.size.cross(dir))
            .maybe_clamp(item.resolved.min_size.cross(dir), item.resolved.max_size.cross(dir))
            .max(item.resolved.padding_border().cross_axis_sum(dir));
        item.hypothetical_inner_size.set_cross(dir, cross);
        item.hypothetical_outer_size
            .set_cross(dir, cross + item.margin.cross_axis_sum(dir));

        let baseline = if constants.is_row {
            output.first_baselines.y.unwrap_or(cross)
        } else {
            cross
        };
        item.baseline = baseline + item.margin.top;
    }
}

fn uses_baseline(constants: &AlgoConstants, item: &FlexItem) -> bool {
    constants.is_row
        && item.align_self == AlignItems::Baseline
        && !item.margin_is_auto.cross_start(constants.dir)
        && !item.margin_is_auto.cross_end(constants.dir)
}

fn calculate_cross_size(constants: &AlgoConstants, lines: &mut [FlexLine], items: &[FlexItem]) {
    let dir = constants.dir;
    let single_line = !constants.is_wrap;

    if let (true, Some(inner_cross)) = (single_line, constants.node_inner_size.cross(dir)) {
        for line in lines.iter_mut() {
            line.cross_size = inner_cross;
        }
        return;
    }

    for line in lines.iter_mut() {
        let line_items = &items[line.items.clone()];
        let max_baseline = line_items
            .iter()
            .filter(|item| uses_baseline(constants, item))
            .map(|item| item.baseline)
            .fold(0.0, f32::max);

        line.cross_size = line_items
            .iter()
            .map(|item| {
                if uses_baseline(constants, item) {
                    max_baseline - item.baseline + item.hypothetical_outer_size.cross(dir)
                } else {
                    item.hypothetical_outer_size.cross(dir)
                }
            })
            .fold(0.0, f32::max);

        if single_line {
            let inset = constants.content_box_inset.cross(dir);
            line.cross_size = line
                .cross_size
                .maybe_clamp(
                    constants.min_size.cross(dir).maybe_sub(inset),
                    constants.max_size.cross(dir).maybe_sub(inset),
                )
                .max(0.0);
        }
    }
}

fn handle_align_content_stretch(constants: &AlgoConstants, lines: &mut [FlexLine]) {
    if constants.align_content != AlignContent::Stretch || lines.is_empty() {
        return;
    }
    let dir = constants.dir;
    let Some(inner_cross) = constants.node_inner_size.cross(dir).or_else(|| {
        constants
            .min_size
            .cross(dir)
            .map(|min| (min - constants.content_box_inset.cross(dir)).max(0.0))
    }) else {
        return;
    };

    let total_gap = constants.gap.cross(dir) * (lines.len() - 1) as f32;
    let total_cross: f32 = lines.iter().map(|line| line.cross_size).sum::<f32>() + total_gap;
    let free_space = inner_cross - total_cross;
    if free_space > 0.0 {
        let extra = free_space / lines.len() as f32;
        for line in lines.iter_mut() {
            line.cross_size += extra;
        }
    }
}

fn determine_used_cross_size(constants: &AlgoConstants, lines: &[FlexLine], items: &mut [FlexItem]) {
    let dir = constants.dir;
    for line in lines {
        for item in &mut items[line.items.clone()] {
            let stretches = item.align_self == AlignItems::Stretch
                && !item.margin_is_auto.cross_start(dir)
                && !item.margin_is_auto.cross_end(dir)
                && item.resolved.size.cross(dir).is_none();

            let cross = if stretches {
                (line.cross_size - item.margin.cross_axis_sum(dir))
                    .maybe_clamp(item.resolved.min_size.cross(dir), item.resolved.max_size.cross(dir))
                    .max(item.resolved.padding_border().cross_axis_sum(dir))
            } else {
                item.hypothetical_inner_size.cross(dir)
            };
            item.target_size.set_cross(dir, cross);
            item.outer_target_size
                .set_cross(dir, cross + item.margin.cross_axis_sum(dir));
        }
    }
}

/// Resolve main-axis auto margins and apply `justify-content`
fn distribute_remaining_free_space(
    constants: &AlgoConstants,
    inner_main_size: f32,
    lines: &[FlexLine],
    items: &mut [FlexItem],
) {
    let dir = constants.dir;
    let gap = constants.gap.main(dir);

    for line in lines {
        let line_items = &mut items[line.items.clone()];
        let item_count = line_items.len();
        let used_space: f32 = gap * item_count.saturating_sub(1) as f32
            + line_items
                .iter()
                .map(|item| item.outer_target_size.main(dir))
                .sum::<f32>();
        let mut free_space = inner_main_size - used_space;

        let auto_margin_count: usize = line_items
            .iter()
            .map(|item| {
                usize::from(item.margin_is_auto.main_start(dir))
                    + usize::from(item.margin_is_auto.main_end(dir))
            })
            .sum();
        if free_space > 0.0 && auto_margin_count > 0 {
            let per_margin = free_space / auto_margin_count as f32;
            for item in line_items.iter_mut() {
                let mut margin = item.margin;
                if item.margin_is_auto.main_start(dir) {
                    set_main_start(&mut margin, dir, per_margin);
                }
                if item.margin_is_auto.main_end(dir) {
                    set_main_end(&mut margin, dir, per_margin);
                }
                item.margin = margin;
                item.outer_target_size
                    .set_main(dir, item.target_size.main(dir) + margin.main_axis_sum(dir));
            }
            free_space = 0.0;
        }

        let justify_content = apply_alignment_fallback(free_space, item_count, constants.justify_content);
        let is_reversed = dir.is_reverse();

        let mut cursor = 0.0;
        let visual_order: Box<dyn Iterator<Item = &mut FlexItem>> = if is_reversed {
            Box::new(line_items.iter_mut().rev())
        } else {
            Box::new(line_items.iter_mut())
        };
        for (index, item) in visual_order.enumerate() {
            cursor += compute_alignment_offset(
                free_space,
                item_count,
                gap,
                justify_content,
                is_reversed,
                index == 0,
            );
            item.offset_main = cursor;
            cursor += item.outer_target_size.main(dir);
        }
    }
}

fn set_main_start(margin: &mut Rect<f32>, dir: FlexDirection, value: f32) {
    if dir.is_row() {
        margin.left = value;
    } else {
        margin.top = value;
    }
}

fn set_main_end(margin: &mut Rect<f32>, dir: FlexDirection, value: f32) {
    if dir.is_row() {
        margin.right = value;
    } else {
        margin.bottom = value;
    }
}

fn set_cross_start(margin: &mut Rect<f32>, dir: FlexDirection, value: f32) {
    if dir.is_row() {
        margin.top = value;
    } else {
        margin.left = value;
    }
}

fn set_cross_end(margin: &mut Rect<f32>, dir: FlexDirection, value: f32) {
    if dir.is_row() {
        margin.bottom = value;
    } else {
        margin.right = value;
    }
}

/// Resolve cross-axis auto margins and apply `align-self` within each line
fn align_flex_items_along_cross_axis(
    constants: &AlgoConstants,
    lines: &[FlexLine],
    items: &mut [FlexItem],
) {
    let dir = constants.dir;
    for line in lines {
        let line_items = &mut items[line.items.clone()];
        let max_baseline = line_items
            .iter()
            .filter(|item| uses_baseline(constants, item))
            .map(|item| item.baseline)
            .fold(0.0, f32::max);

        for item in line_items.iter_mut() {
            let free_space = line.cross_size - item.outer_target_size.cross(dir);
            let auto_start = item.margin_is_auto.cross_start(dir);
            let auto_end = item.margin_is_auto.cross_end(dir);

            if auto_start || auto_end {
                let free_space = free_space.max(0.0);
                let mut margin = item.margin;
                match (auto_start, auto_end) {
                    (true, true) => {
                        set_cross_start(&mut margin, dir, free_space / 2.0);
                        set_cross_end(&mut margin, dir, free_space / 2.0);
                    }
                    (true, false) => set_cross_start(&mut margin, dir, free_space),
                    _ => set_cross_end(&mut margin, dir, free_space),
                }
                item.margin = margin;
                item.offset_cross = 0.0;
                continue;
            }

            item.offset_cross = match item.align_self {
                AlignItems::Start => 0.0,
                AlignItems::End => free_space,
                AlignItems::FlexStart => {
                    if constants.is_wrap_reverse {
                        free_space
                    } else {
                        0.0
                    }
                }
                AlignItems::FlexEnd => {
                    if constants.is_wrap_reverse {
                        0.0
                    } else {
                        free_space
                    }
                }
                AlignItems::Center => free_space / 2.0,
                AlignItems::Baseline if constants.is_row => max_baseline - item.baseline,
                AlignItems::Baseline => 0.0,
                AlignItems::Stretch => {
                    if constants.is_wrap_reverse {
                        free_space
                    } else {
                        0.0
                    }
                }
            };
        }
    }
}

/// Position lines along the cross axis per `align-content`
fn align_flex_lines_per_align_content(
    constants: &AlgoConstants,
    inner_cross_size: f32,
    total_line_cross_size: f32,
    lines: &mut [FlexLine],
) {
    let dir = constants.dir;
    let line_count = lines.len();
    if line_count == 0 {
        return;
    }

    let free_space = inner_cross_size - total_line_cross_size;
    let align_content = if constants.is_wrap {
        apply_alignment_fallback(free_space, line_count, constants.align_content)
    } else {
        AlignContent::FlexStart
    };
    let gap = constants.gap.cross(dir);
    let is_reversed = constants.is_wrap_reverse;

    let mut cursor = 0.0;
    let visual_order: Box<dyn Iterator<Item = &mut FlexLine>> = if is_reversed {
        Box::new(lines.iter_mut().rev())
    } else {
        Box::new(lines.iter_mut())
    };
    for (index, line) in visual_order.enumerate() {
        cursor += compute_alignment_offset(free_space, line_count, gap, align_content, is_reversed, index == 0);
        line.offset_cross = cursor;
        cursor += line.cross_size;
    }
}

/// Offset of the container's first baseline from its top border edge
fn container_first_baseline(constants: &AlgoConstants, lines: &[FlexLine], items: &[FlexItem]) -> Option<f32> {
    if !constants.is_row {
        return None;
    }
    let line = lines.iter().min_by(|a, b| a.offset_cross.total_cmp(&b.offset_cross))?;
    let item = items[line.items.clone()]
        .iter()
        .find(|item| uses_baseline(constants, item))
        .or_else(|| items[line.items.clone()].first())?;
    Some(constants.padding_border.top + line.offset_cross + item.offset_cross + item.baseline)
}

fn perform_final_layout(
    tree: &mut impl LayoutPartialTree,
    constants: &AlgoConstants,
    inner_main_size: f32,
    lines: &[FlexLine],
    items: &[FlexItem],
) -> Size<f32> {
    let dir = constants.dir;
    let content_origin = Point {
        x: constants.padding_border.left,
        y: constants.padding_border.top,
    };
    let mut content_size = Size::ZERO;

    for line in lines {
        for item in &items[line.items.clone()] {
            let size = item.target_size;
            let output = tree.compute_child_layout(
                item.node,
                LayoutInput {
                    run_mode: RunMode::PerformLayout,
                    sizing_mode: SizingMode::InherentSize,
                    known_dimensions: size.map(Some),
                    parent_size: constants.node_inner_size,
                    available_space: Size::from_main_cross(
                        dir,
                        AvailableSpace::Definite(inner_main_size),
                        AvailableSpace::Definite(line.cross_size),
                    ),
                },
            );

            let main = item.offset_main + item.margin.main_start(dir);
            let cross = line.offset_cross + item.offset_cross + item.margin.cross_start(dir);
            let location = if constants.is_row {
                Point {
                    x: content_origin.x + main,
                    y: content_origin.y + cross,
                }
            } else {
                Point {
                    x: content_origin.x + cross,
                    y: content_origin.y + main,
                }
            };
            let location = Point {
                x: location.x + item.relative_offset.x,
                y: location.y + item.relative_offset.y,
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
            content_size = content_size.max(compute_content_size_contribution(
                location,
                size,
                output.content_size,
                item.overflow,
            ));
        }
    }

    content_size
}

#[cfg(test)]
mod tests {
    use crate::geometry::Size;
    use crate::style::{Dimension, Display, FlexDirection, FlexWrap, Style};
    use crate::LayoutTree;

    fn item(width: f32, height: f32) -> Style {
        Style {
            size: Size::<Dimension>::from_lengths(width, height),
            flex_shrink: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn wrapping_starts_a_new_line_when_the_next_item_overflows() {
        let mut tree: LayoutTree = LayoutTree::new();
        let children: Vec<_> = (0..3).map(|_| tree.new_leaf(item(40.0, 10.0))).collect();
        let root = tree
            .new_with_children(
                Style {
                    display: Display::Flex,
                    flex_wrap: FlexWrap::Wrap,
                    size: Size {
                        width: Dimension::length(100.0),
                        height: Dimension::Auto,
                    },
                    ..Default::default()
                },
                &children,
            )
            .unwrap();
        tree.compute_layout(root, Size::MAX_CONTENT).unwrap();

        assert_eq!(tree.layout(children[1]).unwrap().location.x, 40.0);
        let third = tree.layout(children[2]).unwrap();
        assert_eq!((third.location.x, third.location.y), (0.0, 10.0));
        assert_eq!(tree.layout(root).unwrap().size.height, 20.0);
    }

    #[test]
    fn row_reverse_packs_from_the_end() {
        let mut tree: LayoutTree = LayoutTree::new();
        let first = tree.new_leaf(item(20.0, 10.0));
        let second = tree.new_leaf(item(30.0, 10.0));
        let root = tree
            .new_with_children(
                Style {
                    display: Display::Flex,
                    flex_direction: FlexDirection::RowReverse,
                    size: Size::<Dimension>::from_lengths(100.0, 10.0),
                    ..Default::default()
                },
                &[first, second],
            )
            .unwrap();
        tree.compute_layout(root, Size::MAX_CONTENT).unwrap();

        assert_eq!(tree.layout(first).unwrap().location.x, 80.0);
        assert_eq!(tree.layout(second).unwrap().location.x, 50.0);
    }

    #[test]
    fn items_stretch_to_the_line_cross_size() {
        let mut tree: LayoutTree = LayoutTree::new();
        let tall = tree.new_leaf(item(10.0, 40.0));
        let auto_height = tree.new_leaf(Style {
            size: Size {
                width: Dimension::length(10.0),
                height: Dimension::Auto,
            },
            ..Default::default()
        });
        let root = tree
            .new_with_children(
                Style {
                    display: Display::Flex,
                    ..Default::default()
                },
                &[tall, auto_height],
            )
            .unwrap();
        tree.compute_layout(root, Size::MAX_CONTENT).unwrap();

        assert_eq!(tree.layout(auto_height).unwrap().size.height, 40.0);
    }
}
