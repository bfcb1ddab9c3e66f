//! The layout algorithms and the glue that runs them over a tree.
//!
//! Every algorithm is a function from a node and a [`LayoutInput`] to a [`LayoutOutput`]. In
//! [`RunMode::PerformLayout`] it also writes the unrounded layout of each child through
//! [`LayoutPartialTree::set_unrounded_layout`]. Children are always laid out through
//! [`LayoutPartialTree::compute_child_layout`] so that the tree can serve them from cache.

mod block;
pub(crate) mod common;
mod flexbox;
mod grid;
mod round;

pub(crate) use block::compute_block_layout;
pub(crate) use flexbox::compute_flexbox_layout;
pub(crate) use grid::compute_grid_layout;
pub(crate) use round::round_layout;

use crate::geometry::{MaybeMath, Point, Size};
use crate::style::{AvailableSpace, Display, Style};
use crate::tree::{
    CacheTree, Layout, LayoutInput, LayoutOutput, LayoutPartialTree, NodeId, RunMode, SizingMode,
};

use self::common::ResolvedBox;

/// Serve a layout request from the node's cache, or compute and cache it
pub(crate) fn compute_cached_layout<Tree, ComputeFunction>(
    tree: &mut Tree,
    node: NodeId,
    inputs: LayoutInput,
    mut compute_uncached: ComputeFunction,
) -> LayoutOutput
where
    Tree: CacheTree + ?Sized,
    ComputeFunction: FnMut(&mut Tree, NodeId, LayoutInput) -> LayoutOutput,
{
    if let Some(cached) = tree.cache_get(node, &inputs) {
        #[cfg(feature = "tracing")]
        tracing::trace!("Cache hit for node {} ({:?})", node, inputs.run_mode);
        return cached;
    }

    let output = compute_uncached(tree, node, inputs);
    tree.cache_store(node, &inputs, output);
    output
}

/// Lay out `root` within `available_space` and record its own layout.
///
/// A block-level root fills the available width, as the initial containing block does.
pub(crate) fn compute_root_layout(
    tree: &mut impl LayoutPartialTree,
    root: NodeId,
    available_space: Size<AvailableSpace>,
) {
    let parent_size = available_space.into_options();
    let style = tree.get_style(root);
    let resolved = ResolvedBox::resolve(style, parent_size);

    let mut known_dimensions = Size::NONE;
    if style.display == Display::Block {
        let margin = resolved.margin_or_zero();
        known_dimensions.width = resolved
            .clamped_size()
            .width
            .or(parent_size
                .width
                .map(|width| width - margin.horizontal_axis_sum()))
            .maybe_clamp(resolved.min_size.width, resolved.max_size.width)
            .maybe_max(Some(resolved.padding_border().horizontal_axis_sum()));
    }

    let output = tree.compute_child_layout(
        root,
        LayoutInput {
            run_mode: RunMode::PerformLayout,
            sizing_mode: SizingMode::InherentSize,
            known_dimensions,
            parent_size,
            available_space,
        },
    );

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "Root {} laid out at {}x{}",
        root,
        output.size.width,
        output.size.height
    );

    tree.set_unrounded_layout(
        root,
        &Layout {
            order: 0,
            location: Point::ZERO,
            size: output.size,
            content_size: output.content_size,
            scrollbar_size: resolved.scrollbar_gutter,
            border: resolved.border,
            padding: resolved.padding,
            margin: resolved.margin_or_zero(),
        },
    );
}

/// Give every node in a hidden subtree an empty layout and drop its cached results
pub(crate) fn compute_hidden_layout<Tree>(tree: &mut Tree, node: NodeId) -> LayoutOutput
where
    Tree: LayoutPartialTree + CacheTree,
{
    tree.cache_clear(node);
    for order in 0..tree.child_count(node) {
        let child = tree.get_child_id(node, order);
        tree.set_unrounded_layout(child, &Layout::with_order(order as u32));
        tree.compute_child_layout(child, LayoutInput::HIDDEN);
    }
    LayoutOutput::HIDDEN
}

/// Size a node without children from its style, asking `measure_function` for the content
/// size when the style leaves an axis undetermined.
///
/// The measure function receives content-box sizes and is not called at all when both axes
/// are determined by the style or by the parent.
pub(crate) fn compute_leaf_layout(
    inputs: LayoutInput,
    style: &Style,
    mut measure_function: impl FnMut(Size<Option<f32>>, Size<AvailableSpace>) -> Size<f32>,
) -> LayoutOutput {
    let LayoutInput {
        known_dimensions,
        parent_size,
        available_space,
        sizing_mode,
        ..
    } = inputs;

    let resolved = ResolvedBox::resolve(style, parent_size);
    let margin = resolved.margin_or_zero();
    let padding_border = resolved.padding_border();
    let content_box_inset = resolved.content_box_inset();

    let (node_size, min_size, max_size, aspect_ratio) = match sizing_mode {
        SizingMode::ContentSize => (known_dimensions, Size::NONE, Size::NONE, None),
        SizingMode::InherentSize => (
            known_dimensions
                .or(resolved.min_max_definite_size())
                .or(resolved.clamped_size())
                .maybe_apply_aspect_ratio(resolved.aspect_ratio),
            resolved.min_size,
            resolved.max_size,
            resolved.aspect_ratio,
        ),
    };

    if let Size {
        width: Some(width),
        height: Some(height),
    } = node_size
    {
        let size = Size { width, height }
            .maybe_clamp(min_size, max_size)
            .max(padding_border.sum_axes());
        return LayoutOutput::from_sizes(size, size);
    }

    let available_space = Size {
        width: available_space
            .width
            .maybe_sub(margin.horizontal_axis_sum())
            .maybe_set(node_size.width)
            .map_definite_value(|size| {
                size.maybe_clamp(min_size.width, max_size.width) - content_box_inset.width
            }),
        height: available_space
            .height
            .maybe_sub(margin.vertical_axis_sum())
            .maybe_set(node_size.height)
            .map_definite_value(|size| {
                size.maybe_clamp(min_size.height, max_size.height) - content_box_inset.height
            }),
    };

    let content_known_dimensions = Size {
        width: node_size.width.map(|width| (width - content_box_inset.width).max(0.0)),
        height: node_size.height.map(|height| (height - content_box_inset.height).max(0.0)),
    };
    let measured_size = measure_function(content_known_dimensions, available_space);
    let measured_size = measured_size.map(|value| if value.is_finite() { value.max(0.0) } else { 0.0 });

    let clamped_size = node_size
        .unwrap_or(measured_size + content_box_inset)
        .maybe_clamp(min_size, max_size);
    let size = Size {
        width: clamped_size.width,
        height: match (node_size.height, aspect_ratio) {
            (None, Some(ratio)) => clamped_size.height.max(clamped_size.width / ratio),
            _ => clamped_size.height,
        },
    }
    .max(padding_border.sum_axes());

    LayoutOutput::from_sizes(size, measured_size + resolved.padding.sum_axes())
}
