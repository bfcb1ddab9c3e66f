//! The interface the layout algorithms are written against.
//!
//! Algorithms never touch the arena directly. They see a node's children, read its style and
//! ask the tree to lay out a child, which lets the tree own caching, measurement and the
//! rollback of a failed pass.

use crate::style::Style;
use crate::tree::{DetailedGridInfo, Layout, LayoutInput, LayoutOutput, NodeId};

/// Read access to the child lists of a tree
pub trait TraverseTree {
    type ChildIter<'a>: Iterator<Item = NodeId>
    where
        Self: 'a;

    fn child_ids(&self, parent: NodeId) -> Self::ChildIter<'_>;

    fn child_count(&self, parent: NodeId) -> usize;

    fn get_child_id(&self, parent: NodeId, index: usize) -> NodeId;
}

/// Everything an algorithm needs to lay out one container
pub trait LayoutPartialTree: TraverseTree {
    fn get_style(&self, node: NodeId) -> &Style;

    /// Record the unrounded layout of a node, as determined by its parent
    fn set_unrounded_layout(&mut self, node: NodeId, layout: &Layout);

    /// Lay out (or size) a child, going through its cache
    fn compute_child_layout(&mut self, node: NodeId, inputs: LayoutInput) -> LayoutOutput;

    /// Record track information for a grid container
    fn set_detailed_grid_info(&mut self, _node: NodeId, _info: DetailedGridInfo) {}
}

/// Access to the per-node layout cache
pub trait CacheTree {
    fn cache_get(&self, node: NodeId, inputs: &LayoutInput) -> Option<LayoutOutput>;

    fn cache_store(&mut self, node: NodeId, inputs: &LayoutInput, layout_output: LayoutOutput);

    fn cache_clear(&mut self, node: NodeId);
}

/// Access needed by the rounding pass
pub trait RoundTree: TraverseTree {
    fn get_unrounded_layout(&self, node: NodeId) -> Layout;

    fn set_final_layout(&mut self, node: NodeId, layout: &Layout);
}
