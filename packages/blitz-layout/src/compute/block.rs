//! Block layout: children stacked vertically in document order.
//!
//! Adjoining margins are not collapsed. Each in-flow child is placed at the running cursor
//! and advances it by its margin-box height.

use crate::geometry::{MaybeMath, Point, Rect, Size};
use crate::style::{AvailableSpace, Overflow, TextAlign};
use crate::tree::{Layout, LayoutInput, LayoutOutput, LayoutPartialTree, NodeId, RunMode, SizingMode};

use super::common::{
    ChildKind, ResolvedBox, compute_content_size_contribution, hide_child, layout_absolute_child,
    resolve_relative_offset,
};

/// An in-flow child of a block container
struct BlockItem {
    node: NodeId,
    order: u32,
    resolved: ResolvedBox,
    overflow: Point<Overflow>,
    /// Shrink to fit instead of stretching to the container width
    shrink_to_fit: bool,
    relative_offset: Point<f32>,
}

pub(crate) fn compute_block_layout(
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

    #[cfg(feature = "tracing")]
    tracing::trace!("Block layout for node {}", node);

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

    let style = tree.get_style(node);
    let text_align = style.text_align;
    let (min_size, max_size) = match sizing_mode {
        SizingMode::InherentSize => (resolved.min_size, resolved.max_size),
        SizingMode::ContentSize => (Size::NONE, Size::NONE),
    };
    let padding_border = resolved.padding_border();
    let content_box_inset = resolved.content_box_inset();
    let margin = resolved.margin_or_zero();

    // Children resolve percentages against the content box, which may be indefinite
    let content_box_size = known_dimensions
        .maybe_sub(content_box_inset)
        .map(|size| size.map(|size| size.max(0.0)));

    let items = generate_item_list(&*tree, node, content_box_size);

    let container_outer_width = known_dimensions.width.unwrap_or_else(|| {
        let available_width = available_space
            .width
            .maybe_sub(margin.horizontal_axis_sum())
            .maybe_sub(content_box_inset.width);
        let intrinsic_width =
            determine_content_based_container_width(tree, &items, available_width)
                + content_box_inset.width;
        intrinsic_width
            .maybe_clamp(min_size.width, max_size.width)
            .max(padding_border.horizontal_axis_sum())
    });
    let content_box_width = (container_outer_width - content_box_inset.width).max(0.0);

    // Percentages can resolve now that the width is known
    let items = generate_item_list(
        &*tree,
        node,
        Size {
            width: Some(content_box_width),
            height: content_box_size.height,
        },
    );

    let available_height = match known_dimensions.height {
        Some(height) => AvailableSpace::Definite((height - content_box_inset.height).max(0.0)),
        None => available_space
            .height
            .maybe_sub(margin.vertical_axis_sum())
            .maybe_sub(content_box_inset.height),
    };

    let content_origin = Point {
        x: padding_border.left,
        y: padding_border.top,
    };
    let flow = perform_final_layout_on_in_flow_children(
        tree,
        &items,
        content_box_width,
        content_box_size.height,
        available_height,
        content_origin,
        run_mode,
        text_align,
    );

    let intrinsic_outer_height = flow.cursor + padding_border.bottom + resolved.scrollbar_gutter.height;
    let container_outer_height = known_dimensions.height.unwrap_or_else(|| {
        intrinsic_outer_height
            .maybe_clamp(min_size.height, max_size.height)
            .max(padding_border.vertical_axis_sum())
    });
    let final_outer_size = Size {
        width: container_outer_width,
        height: container_outer_height,
    };

    if run_mode == RunMode::ComputeSize {
        return LayoutOutput::from_outer_size(final_outer_size)
            .with_first_baseline(flow.first_baseline);
    }

    let mut content_size = flow.content_size;
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
                    final_outer_size,
                    resolved.border,
                    resolved.scrollbar_gutter,
                    Point {
                        x: content_origin.x,
                        y: flow.static_y(order),
                    },
                );
                content_size = content_size.max(contribution);
            }
        }
    }

    LayoutOutput::from_sizes(final_outer_size, content_size).with_first_baseline(flow.first_baseline)
}

fn generate_item_list(
    tree: &impl LayoutPartialTree,
    node: NodeId,
    content_box_size: Size<Option<f32>>,
) -> Vec<BlockItem> {
    tree.child_ids(node)
        .enumerate()
        .filter_map(|(order, child)| {
            let style = tree.get_style(child);
            (ChildKind::of(style) == ChildKind::InFlow).then(|| BlockItem {
                node: child,
                order: order as u32,
                resolved: ResolvedBox::resolve(style, content_box_size),
                overflow: style.overflow,
                shrink_to_fit: style.is_table || style.is_replaced,
                relative_offset: resolve_relative_offset(style.inset, content_box_size),
            })
        })
        .collect()
}

/// The widest margin-box width among the children, used when the container width is auto
fn determine_content_based_container_width(
    tree: &mut impl LayoutPartialTree,
    items: &[BlockItem],
    available_width: AvailableSpace,
) -> f32 {
    let available_width = match available_width {
        AvailableSpace::Definite(width) => AvailableSpace::Definite(width.max(0.0)),
        other => other,
    };

    let mut max_child_width: f32 = 0.0;
    for item in items {
        let known_dimensions = item
            .resolved
            .clamped_size()
            .maybe_apply_aspect_ratio(item.resolved.aspect_ratio);

        let margin_sum = item.resolved.margin_or_zero().horizontal_axis_sum();
        let width = match known_dimensions.width {
            Some(width) => width,
            None => {
                let output = tree.compute_child_layout(
                    item.node,
                    LayoutInput {
                        run_mode: RunMode::ComputeSize,
                        sizing_mode: SizingMode::InherentSize,
                        known_dimensions,
                        parent_size: Size::NONE,
                        available_space: Size {
                            width: available_width.maybe_sub(margin_sum),
                            height: AvailableSpace::MinContent,
                        },
                    },
                );
                output.size.width
            }
        };
        let width = width.max(item.resolved.padding_border().horizontal_axis_sum()) + margin_sum;
        max_child_width = max_child_width.max(width);
    }
    max_child_width
}

struct FlowResult {
    /// Bottom of the last child's margin box
    cursor: f32,
    content_size: Size<f32>,
    first_baseline: Option<f32>,
    /// Top of the margin box of each in-flow child, by order
    positions: Vec<(u32, f32)>,
}

impl FlowResult {
    /// Where an out-of-flow child at `order` would have been placed
    fn static_y(&self, order: usize) -> f32 {
        self.positions
            .iter()
            .find(|(item_order, _)| *item_order as usize > order)
            .map(|(_, y)| *y)
            .unwrap_or(self.cursor)
    }
}

#[allow(clippy::too_many_arguments)]
fn perform_final_layout_on_in_flow_children(
    tree: &mut impl LayoutPartialTree,
    items: &[BlockItem],
    content_box_width: f32,
    content_box_height: Option<f32>,
    available_height: AvailableSpace,
    content_origin: Point<f32>,
    run_mode: RunMode,
    text_align: TextAlign,
) -> FlowResult {
    let parent_size = Size {
        width: Some(content_box_width),
        height: content_box_height,
    };

    let mut cursor = content_origin.y;
    let mut content_size = Size::ZERO;
    let mut first_baseline = None;
    let mut positions = Vec::with_capacity(items.len());

    for item in items {
        let resolved = &item.resolved;
        let non_auto_margin = resolved.margin_or_zero();
        let available_width = content_box_width - non_auto_margin.horizontal_axis_sum();

        let mut known_dimensions = resolved.clamped_size();
        if known_dimensions.width.is_none() && !item.shrink_to_fit {
            known_dimensions.width = Some(
                available_width
                    .maybe_clamp(resolved.min_size.width, resolved.max_size.width)
                    .max(resolved.padding_border().horizontal_axis_sum()),
            );
        }
        let known_dimensions = known_dimensions.maybe_apply_aspect_ratio(resolved.aspect_ratio);

        let output = tree.compute_child_layout(
            item.node,
            LayoutInput {
                run_mode,
                sizing_mode: SizingMode::InherentSize,
                known_dimensions,
                parent_size,
                available_space: Size {
                    width: AvailableSpace::Definite(available_width.max(0.0)),
                    height: available_height,
                },
            },
        );
        let size = known_dimensions.unwrap_or(output.size);

        // Auto margins absorb the leftover width, otherwise legacy text-align may shift the box
        let free_x = (content_box_width - size.width - non_auto_margin.horizontal_axis_sum()).max(0.0);
        let (margin_left, margin_right) = match (resolved.margin.left, resolved.margin.right) {
            (None, None) => (free_x / 2.0, free_x / 2.0),
            (None, Some(right)) => (free_x, right),
            (Some(left), None) => (left, free_x),
            (Some(left), Some(right)) => (left, right),
        };
        let text_align_offset = if resolved.margin.left.is_some() && resolved.margin.right.is_some() {
            match text_align {
                TextAlign::LegacyCenter => free_x / 2.0,
                TextAlign::LegacyRight => free_x,
                TextAlign::Auto | TextAlign::LegacyLeft => 0.0,
            }
        } else {
            0.0
        };
        let margin = Rect {
            left: margin_left,
            right: margin_right,
            top: non_auto_margin.top,
            bottom: non_auto_margin.bottom,
        };

        positions.push((item.order, cursor));
        let location = Point {
            x: content_origin.x + margin.left + text_align_offset + item.relative_offset.x,
            y: cursor + margin.top + item.relative_offset.y,
        };

        if first_baseline.is_none() {
            first_baseline = output.first_baselines.y.map(|baseline| location.y + baseline);
        }

        if run_mode == RunMode::PerformLayout {
            tree.set_unrounded_layout(
                item.node,
                &Layout {
                    order: item.order,
                    location,
                    size,
                    content_size: output.content_size,
                    scrollbar_size: resolved.scrollbar_gutter,
                    border: resolved.border,
                    padding: resolved.padding,
                    margin,
                },
            );
            content_size = content_size.max(compute_content_size_contribution(
                location,
                size,
                output.content_size,
                item.overflow,
            ));
        }

        cursor += margin.top + size.height + margin.bottom;
    }

    FlowResult {
        cursor,
        content_size,
        first_baseline,
        positions,
    }
}
