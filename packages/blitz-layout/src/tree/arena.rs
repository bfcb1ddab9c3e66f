//! The node arena.

use core::ops::RangeBounds;

use slab::Slab;

use crate::compute::{compute_root_layout, round_layout};
use crate::error::{LayoutResult, LayoutTreeError, MeasureError};
use crate::geometry::Size;
use crate::style::{AvailableSpace, Style};
use crate::tree::{
    DetailedLayoutInfo, Layout, NodeData, NodeId, NodeKind, RoundTree, TraverseTree, TreeConfig,
    TreeView,
};

/// An arena of styled nodes and their computed layouts.
///
/// `NodeContext` is opaque data attached to leaves that need measuring (text runs, images and
/// the like). It is handed back to the measure function passed to
/// [`compute_layout_with_measure`](LayoutTree::compute_layout_with_measure).
pub struct LayoutTree<NodeContext = ()> {
    nodes: Slab<NodeData<NodeContext>>,
    config: TreeConfig,
    /// Bumped for every created node so that reused slots get fresh handles
    generation: u32,
}

impl<NodeContext> Default for LayoutTree<NodeContext> {
    fn default() -> Self {
        Self::new()
    }
}

impl<NodeContext> LayoutTree<NodeContext> {
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    /// Create a tree with room for `capacity` nodes before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            config: TreeConfig::default(),
            generation: 0,
        }
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Snap final layouts to whole pixels from the next computation onwards
    pub fn enable_rounding(&mut self) {
        self.config.use_rounding = true;
    }

    /// Report fractional layouts from the next computation onwards
    pub fn disable_rounding(&mut self) {
        self.config.use_rounding = false;
    }

    fn node(&self, id: NodeId) -> LayoutResult<&NodeData<NodeContext>> {
        self.nodes
            .get(id.index())
            .filter(|node| node.id == id)
            .ok_or(LayoutTreeError::not_found(id))
    }

    fn node_mut(&mut self, id: NodeId) -> LayoutResult<&mut NodeData<NodeContext>> {
        self.nodes
            .get_mut(id.index())
            .filter(|node| node.id == id)
            .ok_or(LayoutTreeError::not_found(id))
    }

    fn create_node(&mut self, style: Style, context: Option<NodeContext>) -> NodeId {
        self.generation = self.generation.wrapping_add(1);
        let entry = self.nodes.vacant_entry();
        let id = NodeId::new(entry.key(), self.generation);
        entry.insert(NodeData::new(id, style, context));
        id
    }

    // Node lifecycle

    pub fn new_leaf(&mut self, style: Style) -> NodeId {
        self.create_node(style, None)
    }

    /// Create a leaf whose size comes from the measure function
    pub fn new_leaf_with_context(&mut self, style: Style, context: NodeContext) -> NodeId {
        self.create_node(style, Some(context))
    }

    /// Create a node and adopt `children`, detaching them from any previous parent
    pub fn new_with_children(&mut self, style: Style, children: &[NodeId]) -> LayoutResult<NodeId> {
        for (index, &child) in children.iter().enumerate() {
            self.node(child)?;
            if children[..index].contains(&child) {
                return Err(LayoutTreeError::invalid_child(child, child));
            }
        }

        let id = self.create_node(style, None);
        for &child in children {
            self.detach_from_parent(child);
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes[id.index()].children = children.to_vec();
        Ok(id)
    }

    /// Drop every node
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Remove a node, detaching it from its parent.
    ///
    /// The node's children stay in the tree without a parent.
    pub fn remove(&mut self, node: NodeId) -> LayoutResult<NodeId> {
        let parent = self.node(node)?.parent;

        if let Some(parent) = parent {
            let parent_data = self.node_mut(parent)?;
            let Some(position) = parent_data.children.iter().position(|&child| child == node)
            else {
                return Err(LayoutTreeError::invalid_child(parent, node));
            };
            parent_data.children.remove(position);
            self.mark_dirty_unchecked(parent);
        }

        let removed = self.nodes.remove(node.index());
        for child in removed.children {
            if let Some(child) = self.nodes.get_mut(child.index()) {
                child.parent = None;
                child.mark_dirty();
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!("Removed node {}", node);

        Ok(node)
    }

    // Children

    /// Append `child` to `parent`, moving it from its current parent if it has one
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> LayoutResult<()> {
        self.check_adoptable(parent, child)?;
        self.detach_from_parent(child);

        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
        self.mark_dirty_unchecked(parent);
        Ok(())
    }

    pub fn insert_child_at_index(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> LayoutResult<()> {
        self.check_adoptable(parent, child)?;

        let mut child_count = self.nodes[parent.index()].children.len();
        if self.nodes[child.index()].parent == Some(parent) {
            child_count -= 1;
        }
        if index > child_count {
            return Err(LayoutTreeError::out_of_bounds(parent, index, child_count));
        }

        self.detach_from_parent(child);
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.insert(index, child);
        self.mark_dirty_unchecked(parent);
        Ok(())
    }

    /// Replace all children of `parent`. Previous children that are not in `children` are
    /// left without a parent.
    pub fn set_children(&mut self, parent: NodeId, children: &[NodeId]) -> LayoutResult<()> {
        for (index, &child) in children.iter().enumerate() {
            self.check_adoptable(parent, child)?;
            if children[..index].contains(&child) {
                return Err(LayoutTreeError::invalid_child(parent, child));
            }
        }

        let previous = core::mem::take(&mut self.nodes[parent.index()].children);
        for old_child in previous {
            self.nodes[old_child.index()].parent = None;
        }
        for &child in children {
            self.detach_from_parent(child);
            self.nodes[child.index()].parent = Some(parent);
        }
        self.nodes[parent.index()].children = children.to_vec();
        self.mark_dirty_unchecked(parent);
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> LayoutResult<NodeId> {
        self.node(child)?;
        let index = self
            .node(parent)?
            .children
            .iter()
            .position(|&id| id == child)
            .ok_or(LayoutTreeError::invalid_child(parent, child))?;
        self.remove_child_at_index(parent, index)
    }

    pub fn remove_child_at_index(&mut self, parent: NodeId, index: usize) -> LayoutResult<NodeId> {
        let child_count = self.node(parent)?.children.len();
        if index >= child_count {
            return Err(LayoutTreeError::out_of_bounds(parent, index, child_count));
        }

        let child = self.nodes[parent.index()].children.remove(index);
        self.nodes[child.index()].parent = None;
        self.mark_dirty_unchecked(parent);
        Ok(child)
    }

    /// Remove a range of children, returning them in order
    pub fn remove_children_range(
        &mut self,
        parent: NodeId,
        range: impl RangeBounds<usize>,
    ) -> LayoutResult<Vec<NodeId>> {
        use core::ops::Bound;

        let child_count = self.node(parent)?.children.len();
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.saturating_add(1),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => child_count,
        };
        if end > child_count {
            return Err(LayoutTreeError::out_of_bounds(parent, end, child_count));
        }
        if start > end {
            return Err(LayoutTreeError::out_of_bounds(parent, start, child_count));
        }

        let removed: Vec<NodeId> = self.nodes[parent.index()].children.drain(start..end).collect();
        for &child in &removed {
            self.nodes[child.index()].parent = None;
        }
        self.mark_dirty_unchecked(parent);
        Ok(removed)
    }

    /// Put `child` at `index`, returning the node it replaced
    pub fn replace_child_at_index(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> LayoutResult<NodeId> {
        self.check_adoptable(parent, child)?;
        let child_count = self.nodes[parent.index()].children.len();
        if index >= child_count {
            return Err(LayoutTreeError::out_of_bounds(parent, index, child_count));
        }

        let old_child = self.nodes[parent.index()].children[index];
        if old_child == child {
            return Ok(old_child);
        }
        if self.nodes[child.index()].parent == Some(parent) {
            // Moving a sibling into this slot would shift the index
            return Err(LayoutTreeError::invalid_child(parent, child));
        }

        self.detach_from_parent(child);
        self.nodes[parent.index()].children[index] = child;
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[old_child.index()].parent = None;
        self.mark_dirty_unchecked(parent);
        Ok(old_child)
    }

    /// Validate that `child` may be placed under `parent`
    fn check_adoptable(&self, parent: NodeId, child: NodeId) -> LayoutResult<()> {
        self.node(parent)?;
        self.node(child)?;

        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == child {
                return Err(LayoutTreeError::Cycle { parent, child });
            }
            ancestor = self.nodes[id.index()].parent;
        }
        Ok(())
    }

    /// Unlink `child` from its current parent, if any, and mark that parent dirty
    fn detach_from_parent(&mut self, child: NodeId) {
        let Some(old_parent) = self.nodes[child.index()].parent.take() else {
            return;
        };
        if let Some(parent_data) = self.nodes.get_mut(old_parent.index()) {
            parent_data.children.retain(|&id| id != child);
            self.mark_dirty_unchecked(old_parent);
        }
    }

    // Queries

    pub fn parent(&self, node: NodeId) -> LayoutResult<Option<NodeId>> {
        Ok(self.node(node)?.parent)
    }

    /// A copy of the node's child list
    pub fn children(&self, node: NodeId) -> LayoutResult<Vec<NodeId>> {
        Ok(self.node(node)?.children.clone())
    }

    pub fn child_count(&self, node: NodeId) -> LayoutResult<usize> {
        Ok(self.node(node)?.children.len())
    }

    pub fn child_at_index(&self, parent: NodeId, index: usize) -> LayoutResult<NodeId> {
        let children = &self.node(parent)?.children;
        children
            .get(index)
            .copied()
            .ok_or(LayoutTreeError::out_of_bounds(parent, index, children.len()))
    }

    /// Number of live nodes
    pub fn total_node_count(&self) -> usize {
        self.nodes.len()
    }

    // Style and context

    /// Replace the node's style and mark it dirty
    pub fn set_style(&mut self, node: NodeId, style: Style) -> LayoutResult<()> {
        self.node_mut(node)?.style = style;
        self.mark_dirty_unchecked(node);
        Ok(())
    }

    /// A copy of the node's style
    pub fn style(&self, node: NodeId) -> LayoutResult<Style> {
        Ok(self.node(node)?.style.clone())
    }

    /// Attach or detach measuring context, marking the node dirty
    pub fn set_node_context(
        &mut self,
        node: NodeId,
        context: Option<NodeContext>,
    ) -> LayoutResult<()> {
        self.node_mut(node)?.context = context;
        self.mark_dirty_unchecked(node);
        Ok(())
    }

    pub fn get_node_context(&self, node: NodeId) -> LayoutResult<Option<&NodeContext>> {
        Ok(self.node(node)?.context.as_ref())
    }

    pub fn get_node_context_mut(&mut self, node: NodeId) -> LayoutResult<Option<&mut NodeContext>> {
        Ok(self.node_mut(node)?.context.as_mut())
    }

    pub fn node_kind(&self, node: NodeId) -> LayoutResult<NodeKind> {
        Ok(self.node(node)?.kind())
    }

    // Dirty tracking

    /// Mark a node and all of its ancestors as needing layout
    pub fn mark_dirty(&mut self, node: NodeId) -> LayoutResult<()> {
        self.node(node)?;
        self.mark_dirty_unchecked(node);
        Ok(())
    }

    fn mark_dirty_unchecked(&mut self, node: NodeId) {
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(data) = self.nodes.get_mut(id.index()) else {
                break;
            };
            data.mark_dirty();
            current = data.parent;
        }
    }

    /// Whether the node needs layout
    pub fn dirty(&self, node: NodeId) -> LayoutResult<bool> {
        Ok(self.node(node)?.is_dirty())
    }

    // Computation

    /// Lay out the subtree rooted at `root`. Leaves with a context measure as zero.
    pub fn compute_layout(
        &mut self,
        root: NodeId,
        available_space: Size<AvailableSpace>,
    ) -> LayoutResult<()> {
        self.compute_layout_with_measure(root, available_space, |_, _, _, _, _| Ok(Size::ZERO))
    }

    /// Lay out the subtree rooted at `root`, sizing leaves that carry a context with
    /// `measure_function`.
    ///
    /// If the measure function fails, the error is returned and every node's cache and layout
    /// is left as it was before the call.
    pub fn compute_layout_with_measure<MeasureFunction>(
        &mut self,
        root: NodeId,
        available_space: Size<AvailableSpace>,
        measure_function: MeasureFunction,
    ) -> LayoutResult<()>
    where
        MeasureFunction: FnMut(
            Size<Option<f32>>,
            Size<AvailableSpace>,
            NodeId,
            Option<&mut NodeContext>,
            &Style,
        ) -> Result<Size<f32>, MeasureError>,
    {
        self.node(root)?;

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("compute_layout", root = %root).entered();

        let mut view = TreeView::new(&mut self.nodes, measure_function);
        compute_root_layout(&mut view, root, available_space);
        view.finish()?;

        let use_rounding = self.config.use_rounding;
        round_layout(self, root, use_rounding);
        Ok(())
    }

    // Results

    /// The final layout of a node, rounded if rounding is enabled
    pub fn layout(&self, node: NodeId) -> LayoutResult<&Layout> {
        Ok(&self.node(node)?.final_layout)
    }

    /// The fractional layout of a node, before rounding
    pub fn unrounded_layout(&self, node: NodeId) -> LayoutResult<&Layout> {
        Ok(&self.node(node)?.unrounded_layout)
    }

    /// Algorithm-specific information about the node's last layout
    pub fn detailed_layout_info(&self, node: NodeId) -> LayoutResult<DetailedLayoutInfo> {
        Ok(match &self.node(node)?.grid_info {
            Some(info) => DetailedLayoutInfo::Grid(info.clone()),
            None => DetailedLayoutInfo::None,
        })
    }
}

impl<NodeContext> TraverseTree for LayoutTree<NodeContext> {
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

impl<NodeContext> RoundTree for LayoutTree<NodeContext> {
    fn get_unrounded_layout(&self, node: NodeId) -> Layout {
        self.nodes[node.index()].unrounded_layout
    }

    fn set_final_layout(&mut self, node: NodeId, layout: &Layout) {
        self.nodes[node.index()].final_layout = *layout;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::style::Dimension;

    fn sized(width: f32, height: f32) -> Style {
        Style {
            size: Size::<Dimension>::from_lengths(width, height),
            ..Default::default()
        }
    }

    #[test]
    fn removed_handles_are_not_found() {
        let mut tree: LayoutTree = LayoutTree::new();
        let node = tree.new_leaf(Style::default());
        tree.remove(node).unwrap();

        let reused = tree.new_leaf(Style::default());
        assert_eq!(reused.index(), node.index(), "slot is reused");
        assert!(matches!(
            tree.style(node),
            Err(LayoutTreeError::NotFound { .. })
        ));
        assert!(tree.style(reused).is_ok());
    }

    #[test]
    fn reparenting_moves_the_child() {
        let mut tree: LayoutTree = LayoutTree::new();
        let child = tree.new_leaf(Style::default());
        let first = tree.new_with_children(Style::default(), &[child]).unwrap();
        let second = tree.new_leaf(Style::default());

        tree.add_child(second, child).unwrap();
        assert_eq!(tree.children(first).unwrap(), Vec::<NodeId>::new());
        assert_eq!(tree.children(second).unwrap(), vec![child]);
        assert_eq!(tree.parent(child).unwrap(), Some(second));
    }

    #[test]
    fn insert_checks_index_against_child_count() {
        let mut tree: LayoutTree = LayoutTree::new();
        let a = tree.new_leaf(Style::default());
        let parent = tree.new_with_children(Style::default(), &[a]).unwrap();
        let b = tree.new_leaf(Style::default());

        let error = tree.insert_child_at_index(parent, 2, b).unwrap_err();
        assert!(matches!(
            error,
            LayoutTreeError::OutOfBounds {
                index: 2,
                child_count: 1,
                ..
            }
        ));
        tree.insert_child_at_index(parent, 0, b).unwrap();
        assert_eq!(tree.children(parent).unwrap(), vec![b, a]);
    }

    #[test]
    fn remove_children_range_returns_removed_in_order() {
        let mut tree: LayoutTree = LayoutTree::new();
        let kids: Vec<_> = (0..4).map(|_| tree.new_leaf(Style::default())).collect();
        let parent = tree.new_with_children(Style::default(), &kids).unwrap();

        let removed = tree.remove_children_range(parent, 1..3).unwrap();
        assert_eq!(removed, vec![kids[1], kids[2]]);
        assert_eq!(tree.children(parent).unwrap(), vec![kids[0], kids[3]]);
        assert_eq!(tree.parent(kids[1]).unwrap(), None);
        assert!(tree.remove_children_range(parent, 0..5).is_err());
    }

    #[test]
    fn replace_child_returns_the_old_child() {
        let mut tree: LayoutTree = LayoutTree::new();
        let old = tree.new_leaf(Style::default());
        let parent = tree.new_with_children(Style::default(), &[old]).unwrap();
        let new = tree.new_leaf(Style::default());

        assert_eq!(tree.replace_child_at_index(parent, 0, new).unwrap(), old);
        assert_eq!(tree.parent(old).unwrap(), None);
        assert_eq!(tree.child_at_index(parent, 0).unwrap(), new);
    }

    #[test]
    fn node_kind_follows_children_and_context() {
        let mut tree: LayoutTree<&'static str> = LayoutTree::new();
        let plain = tree.new_leaf(Style::default());
        let measured = tree.new_leaf_with_context(Style::default(), "text");
        let container = tree.new_with_children(Style::default(), &[plain]).unwrap();

        assert_eq!(tree.node_kind(plain).unwrap(), NodeKind::Plain);
        assert_eq!(tree.node_kind(measured).unwrap(), NodeKind::Measured);
        assert_eq!(tree.node_kind(container).unwrap(), NodeKind::Container);

        tree.set_node_context(measured, None).unwrap();
        assert_eq!(tree.node_kind(measured).unwrap(), NodeKind::Plain);
    }

    #[test]
    fn style_is_returned_by_value() {
        let mut tree: LayoutTree = LayoutTree::new();
        let node = tree.new_leaf(sized(10.0, 10.0));
        let mut copy = tree.style(node).unwrap();
        copy.flex_grow = 5.0;
        assert_eq!(tree.style(node).unwrap().flex_grow, 0.0);
    }

    #[test]
    fn rounding_toggle_applies_to_next_computation() {
        let mut tree: LayoutTree = LayoutTree::new();
        let node = tree.new_leaf(sized(10.4, 10.6));
        tree.compute_layout(node, Size::MAX_CONTENT).unwrap();
        assert_eq!(tree.layout(node).unwrap().size, Size { width: 10.0, height: 11.0 });

        tree.disable_rounding();
        assert!(!tree.config().use_rounding);
        assert_eq!(tree.layout(node).unwrap().size.width, 10.0, "unchanged until recomputed");
        tree.compute_layout(node, Size::MAX_CONTENT).unwrap();
        assert_eq!(tree.layout(node).unwrap().size, Size { width: 10.4, height: 10.6 });
    }

    #[test]
    fn clear_drops_every_node() {
        let mut tree: LayoutTree = LayoutTree::with_capacity(4);
        let leaf = tree.new_leaf(Style::default());
        tree.new_with_children(Style::default(), &[leaf]).unwrap();
        assert_eq!(tree.total_node_count(), 2);
        tree.clear();
        assert_eq!(tree.total_node_count(), 0);
        assert!(tree.parent(leaf).is_err());
    }
}
