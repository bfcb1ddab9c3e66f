//! The tree as seen by the algorithms during one layout pass.

use std::collections::HashMap;

use slab::Slab;

use crate::compute::{
    compute_block_layout, compute_cached_layout, compute_flexbox_layout, compute_grid_layout,
    compute_hidden_layout, compute_leaf_layout,
};
use crate::error::{LayoutResult, LayoutTreeError, MeasureError};
use crate::geometry::Size;
use crate::style::{AvailableSpace, Display, Style};
use crate::tree::{
    Cache, CacheTree, DetailedGridInfo, Layout, LayoutInput, LayoutOutput, LayoutPartialTree,
    NodeData, NodeFlags, NodeId, RunMode, TraverseTree,
};

/// The state of a node before the current pass first wrote to it
#[derive(Debug)]
struct NodeSnapshot {
    flags: NodeFlags,
    cache: Cache,
    unrounded_layout: Layout,
    grid_info: Option<Box<DetailedGridInfo>>,
}

impl NodeSnapshot {
    fn capture<NodeContext>(node: &NodeData<NodeContext>) -> Self {
        Self {
            flags: node.flags,
            cache: node.cache.clone(),
            unrounded_layout: node.unrounded_layout,
            grid_info: node.grid_info.clone(),
        }
    }

    fn restore<NodeContext>(self, node: &mut NodeData<NodeContext>) {
        node.flags = self.flags;
        node.cache = self.cache;
        node.unrounded_layout = self.unrounded_layout;
        node.grid_info = self.grid_info;
    }
}

/// Borrow of the arena plus the measure function for the duration of one pass.
///
/// Every write goes through [`TreeView::record`] first, so a pass that fails in a measure
/// function can put every node back the way it was.
pub(crate) struct TreeView<'t, NodeContext, MeasureFunction> {
    nodes: &'t mut Slab<NodeData<NodeContext>>,
    measure_function: MeasureFunction,
    journal: HashMap<NodeId, NodeSnapshot>,
    failure: Option<LayoutTreeError>,
}

impl<'t, NodeContext, MeasureFunction> TreeView<'t, NodeContext, MeasureFunction>
where
    MeasureFunction: FnMut(
        Size<Option<f32>>,
        Size<AvailableSpace>,
        NodeId,
        Option<&mut NodeContext>,
        &Style,
    ) -> Result<Size<f32>, MeasureError>,
{
    pub(crate) fn new(
        nodes: &'t mut Slab<NodeData<NodeContext>>,
        measure_function: MeasureFunction,
    ) -> Self {
        Self {
            nodes,
            measure_function,
            journal: HashMap::new(),
            failure: None,
        }
    }

    /// Commit the pass, or roll every touched node back if a measure function failed
    pub(crate) fn finish(self) -> LayoutResult<()> {
        let TreeView {
            nodes,
            journal,
            failure,
            ..
        } = self;

        match failure {
            None => Ok(()),
            Some(error) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Rolling back {} nodes after failed layout pass", journal.len());

                for (node, snapshot) in journal {
                    snapshot.restore(&mut nodes[node.index()]);
                }
                Err(error)
            }
        }
    }

    fn record(&mut self, node: NodeId) {
        let nodes = &*self.nodes;
        self.journal
            .entry(node)
            .or_insert_with(|| NodeSnapshot::capture(&nodes[node.index()]));
    }

    fn measure_leaf(&mut self, node: NodeId, inputs: LayoutInput) -> LayoutOutput {
        let TreeView {
            nodes,
            measure_function,
            failure,
            ..
        } = self;
        let NodeData { style, context, .. } = &mut nodes[node.index()];
        let style: &Style = style;

        compute_leaf_layout(inputs, style, |known_dimensions, available_space| {
            let Some(context) = context.as_mut() else {
                return Size::ZERO;
            };
            match measure_function(known_dimensions, available_space, node, Some(context), style) {
                Ok(size) => size,
                Err(source) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Measure function failed for node {}: {}", node, source);

                    *failure = Some(LayoutTreeError::Measure { node, source });
                    Size::ZERO
                }
            }
        })
    }
}

impl<NodeContext, MeasureFunction> TraverseTree for TreeView<'_, NodeContext, MeasureFunction> {
    type ChildIter<'a>
        = core::iter::Copied<core::slice::Iter<'a, NodeId>>
    where
        Self: 'a;

    fn child_ids(&self, parent: NodeId) -> Self::ChildIter<'_> {
        self.nodes[parent.index()].children.iter().copied()
    }

    fn child_count(&self, parent: NodeId) -> usize {
        self.nodes[parent.index()].children.len()
    }

    fn get_child_id(&self, parent: NodeId, index: usize) -> NodeId {
        self.nodes[parent.index()].children[index]
    }
}

impl<NodeContext, MeasureFunction> CacheTree for TreeView<'_, NodeContext, MeasureFunction>
where
    MeasureFunction: FnMut(
        Size<Option<f32>>,
        Size<AvailableSpace>,
        NodeId,
        Option<&mut NodeContext>,
        &Style,
    ) -> Result<Size<f32>, MeasureError>,
{
    fn cache_get(&self, node: NodeId, inputs: &LayoutInput) -> Option<LayoutOutput> {
        self.nodes[node.index()].cache.get(inputs)
    }

    fn cache_store(&mut self, node: NodeId, inputs: &LayoutInput, layout_output: LayoutOutput) {
        self.record(node);
        self.nodes[node.index()].cache.store(inputs, layout_output);
    }

    fn cache_clear(&mut self, node: NodeId) {
        self.record(node);
        self.nodes[node.index()].cache.clear();
    }
}

impl<NodeContext, MeasureFunction> LayoutPartialTree for TreeView<'_, NodeContext, MeasureFunction>
where
    MeasureFunction: FnMut(
        Size<Option<f32>>,
        Size<AvailableSpace>,
        NodeId,
        Option<&mut NodeContext>,
        &Style,
    ) -> Result<Size<f32>, MeasureError>,
{
    fn get_style(&self, node: NodeId) -> &Style {
        &self.nodes[node.index()].style
    }

    fn set_unrounded_layout(&mut self, node: NodeId, layout: &Layout) {
        self.record(node);
        let data = &mut self.nodes[node.index()];
        data.unrounded_layout = *layout;
        data.flags.remove(NodeFlags::DIRTY);
        data.flags.insert(NodeFlags::HAS_LAYOUT);
    }

    fn compute_child_layout(&mut self, node: NodeId, inputs: LayoutInput) -> LayoutOutput {
        // Once a measure function has failed the pass is discarded, so skip the remaining work
        if self.failure.is_some() {
            return LayoutOutput::HIDDEN;
        }

        let data = &self.nodes[node.index()];
        if inputs.run_mode == RunMode::PerformHiddenLayout || data.style.display == Display::None {
            return compute_hidden_layout(self, node);
        }

        compute_cached_layout(self, node, inputs, |tree, node, inputs| {
            let data = &tree.nodes[node.index()];
            let display_mode = data.style.display;
            let has_children = !data.children.is_empty();

            #[cfg(feature = "tracing")]
            tracing::trace!(
                "Laying out node {} ({:?}, {:?}, known {:?})",
                node,
                display_mode,
                inputs.run_mode,
                inputs.known_dimensions
            );

            match (display_mode, has_children) {
                (Display::Block, true) => compute_block_layout(tree, node, inputs),
                (Display::Flex, true) => compute_flexbox_layout(tree, node, inputs),
                (Display::Grid, true) => compute_grid_layout(tree, node, inputs),
                (Display::None, _) => compute_hidden_layout(tree, node),
                (_, false) => tree.measure_leaf(node, inputs),
            }
        })
    }

    fn set_detailed_grid_info(&mut self, node: NodeId, info: DetailedGridInfo) {
        self.record(node);
        self.nodes[node.index()].grid_info = Some(Box::new(info));
    }
}
