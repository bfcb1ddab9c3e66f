//! Snapping final layouts to whole pixels.
//!
//! Edges are rounded in absolute coordinates and sizes are derived from the rounded edges, so
//! adjacent boxes never open a gap or overlap and children never poke out of a rounded parent
//! because of independent rounding.

use crate::geometry::{Point, Rect, Size};
use crate::tree::{Layout, NodeId, RoundTree};

/// Write the final layout of every node under `root`.
///
/// With `use_rounding` off the unrounded layouts are copied unchanged.
pub(crate) fn round_layout(tree: &mut impl RoundTree, root: NodeId, use_rounding: bool) {
    if use_rounding {
        round_layout_inner(tree, root, Point::ZERO);
    } else {
        copy_layout(tree, root);
    }
}

fn round_layout_inner(tree: &mut impl RoundTree, node: NodeId, parent_position: Point<f32>) {
    let unrounded = tree.get_unrounded_layout(node);
    let x = parent_position.x + unrounded.location.x;
    let y = parent_position.y + unrounded.location.y;
    let width = unrounded.size.width;
    let height = unrounded.size.height;

    // The rounded distance between two absolute positions
    let span = |from: f32, to: f32| to.round() - from.round();

    let border = Rect {
        left: span(x, x + unrounded.border.left),
        right: span(x + width - unrounded.border.right, x + width),
        top: span(y, y + unrounded.border.top),
        bottom: span(y + height - unrounded.border.bottom, y + height),
    };
    let padding = Rect {
        left: span(x + unrounded.border.left, x + unrounded.border.left + unrounded.padding.left),
        right: span(
            x + width - unrounded.border.right - unrounded.padding.right,
            x + width - unrounded.border.right,
        ),
        top: span(y + unrounded.border.top, y + unrounded.border.top + unrounded.padding.top),
        bottom: span(
            y + height - unrounded.border.bottom - unrounded.padding.bottom,
            y + height - unrounded.border.bottom,
        ),
    };

    let layout = Layout {
        order: unrounded.order,
        location: Point {
            x: x.round() - parent_position.x.round(),
            y: y.round() - parent_position.y.round(),
        },
        size: Size {
            width: span(x, x + width),
            height: span(y, y + height),
        },
        content_size: Size {
            width: span(x, x + unrounded.content_size.width),
            height: span(y, y + unrounded.content_size.height),
        },
        scrollbar_size: Size {
            width: span(x + width - unrounded.scrollbar_size.width, x + width),
            height: span(y + height - unrounded.scrollbar_size.height, y + height),
        },
        border,
        padding,
        margin: unrounded.margin.map(f32::round),
    };
    tree.set_final_layout(node, &layout);

    let position = Point { x, y };
    for index in 0..tree.child_count(node) {
        let child = tree.get_child_id(node, index);
        round_layout_inner(tree, child, position);
    }
}

fn copy_layout(tree: &mut impl RoundTree, node: NodeId) {
    let layout = tree.get_unrounded_layout(node);
    tree.set_final_layout(node, &layout);
    for index in 0..tree.child_count(node) {
        let child = tree.get_child_id(node, index);
        copy_layout(tree, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TraverseTree;

    /// A root with children stored flat, enough to drive the rounding pass
    struct FlatTree {
        layouts: Vec<Layout>,
        finals: Vec<Layout>,
    }

    impl FlatTree {
        fn new(layouts: Vec<Layout>) -> Self {
            let finals = vec![Layout::new(); layouts.len()];
            Self { layouts, finals }
        }
    }

    fn node_at(index: usize) -> NodeId {
        NodeId::new(index, 0)
    }

    impl TraverseTree for FlatTree {
        type ChildIter<'a> = core::iter::Map<core::ops::Range<usize>, fn(usize) -> NodeId>;

        fn child_ids(&self, parent: NodeId) -> Self::ChildIter<'_> {
            let range = if parent.index() == 0 { 1..self.layouts.len() } else { 0..0 };
            range.map(node_at as fn(usize) -> NodeId)
        }

        fn child_count(&self, parent: NodeId) -> usize {
            if parent.index() == 0 { self.layouts.len() - 1 } else { 0 }
        }

        fn get_child_id(&self, _parent: NodeId, index: usize) -> NodeId {
            NodeId::new(index + 1, 0)
        }
    }

    impl RoundTree for FlatTree {
        fn get_unrounded_layout(&self, node: NodeId) -> Layout {
            self.layouts[node.index()]
        }

        fn set_final_layout(&mut self, node: NodeId, layout: &Layout) {
            self.finals[node.index()] = *layout;
        }
    }

    fn boxed(x: f32, width: f32) -> Layout {
        Layout {
            location: Point { x, y: 0.0 },
            size: Size { width, height: 10.0 },
            ..Layout::new()
        }
    }

    #[test]
    fn adjacent_boxes_share_their_rounded_edge() {
        let mut tree = FlatTree::new(vec![
            boxed(0.0, 100.0),
            boxed(0.0, 33.3),
            boxed(33.3, 33.3),
            boxed(66.6, 33.4),
        ]);
        round_layout(&mut tree, NodeId::new(0, 0), true);

        let finals = &tree.finals;
        for pair in finals[1..].windows(2) {
            assert_eq!(pair[0].location.x + pair[0].size.width, pair[1].location.x);
        }
        let last = finals[3];
        assert_eq!(last.location.x + last.size.width, 100.0);
    }

    #[test]
    fn sizes_follow_the_absolute_position() {
        let mut tree = FlatTree::new(vec![boxed(0.3, 100.0), boxed(0.4, 10.4)]);
        round_layout(&mut tree, NodeId::new(0, 0), true);
        // The child spans 0.7..11.1 in absolute terms
        assert_eq!(tree.finals[1].location.x, 1.0);
        assert_eq!(tree.finals[1].size.width, 10.0);
    }

    #[test]
    fn disabled_rounding_copies_the_fractional_layout() {
        let mut tree = FlatTree::new(vec![boxed(0.0, 100.5), boxed(0.25, 10.4)]);
        round_layout(&mut tree, NodeId::new(0, 0), false);
        assert_eq!(tree.finals[1], tree.layouts[1]);
    }
}
