use core::fmt;

use bitflags::bitflags;

use crate::style::Style;
use crate::tree::{Cache, DetailedGridInfo, Layout};

/// A handle to a node in a [`LayoutTree`](crate::LayoutTree).
///
/// Handles carry a generation so that a handle to a removed node is never mistaken for a
/// newer node stored in the same slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(u64);

impl NodeId {
    pub const fn new(index: usize, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u32 as u64))
    }

    /// Slot in the arena
    pub const fn index(self) -> usize {
        (self.0 & 0xFFFF_FFFF) as usize
    }

    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }
}

impl From<NodeId> for u64 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl From<u64> for NodeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

/// How a node's size is determined
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A leaf sized from style alone
    Plain,
    /// A leaf with a context; its content size comes from the measure function
    Measured,
    /// A node with children, sized by its display algorithm
    Container,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct NodeFlags: u8 {
        /// Style or children changed since the last successful layout
        const DIRTY = 0b0000_0001;
        /// A layout has been computed at least once
        const HAS_LAYOUT = 0b0000_0010;
    }
}

/// Everything the arena stores for one node
#[derive(Debug)]
pub(crate) struct NodeData<NodeContext> {
    pub(crate) id: NodeId,
    pub(crate) style: Style,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) context: Option<NodeContext>,
    pub(crate) flags: NodeFlags,
    pub(crate) cache: Cache,
    pub(crate) unrounded_layout: Layout,
    pub(crate) final_layout: Layout,
    pub(crate) grid_info: Option<Box<DetailedGridInfo>>,
}

impl<NodeContext> NodeData<NodeContext> {
    pub(crate) fn new(id: NodeId, style: Style, context: Option<NodeContext>) -> Self {
        Self {
            id,
            style,
            parent: None,
            children: Vec::new(),
            context,
            flags: NodeFlags::DIRTY,
            cache: Cache::new(),
            unrounded_layout: Layout::new(),
            final_layout: Layout::new(),
            grid_info: None,
        }
    }

    pub(crate) fn kind(&self) -> NodeKind {
        if !self.children.is_empty() {
            NodeKind::Container
        } else if self.context.is_some() {
            NodeKind::Measured
        } else {
            NodeKind::Plain
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.flags.insert(NodeFlags::DIRTY);
        self.cache.clear();
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.flags.contains(NodeFlags::DIRTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_round_trips_index_and_generation() {
        let id = NodeId::new(42, 7);
        assert_eq!(id.index(), 42);
        assert_eq!(id.generation(), 7);
        assert_eq!(id.to_string(), "42v7");
        assert_ne!(id, NodeId::new(42, 8), "generations distinguish reused slots");
    }
}
