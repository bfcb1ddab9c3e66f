//! Pixel snapping of final layouts

use blitz_layout::{Dimension, Display, LayoutTree, NodeId, Size, Style, TreeConfig};

fn thirds(tree: &mut LayoutTree) -> (NodeId, Vec<NodeId>) {
    let children: Vec<_> = (0..3)
        .map(|_| {
            tree.new_leaf(Style {
                flex_grow: 1.0,
                ..Default::default()
            })
        })
        .collect();
    let root = tree
        .new_with_children(
            Style {
                display: Display::Flex,
                size: Size::<Dimension>::from_lengths(100.0, 10.0),
                ..Default::default()
            },
            &children,
        )
        .unwrap();
    (root, children)
}

#[test]
fn test_rounded_siblings_tile_the_parent_exactly() {
    let mut tree: LayoutTree = LayoutTree::new();
    let (root, children) = thirds(&mut tree);
    tree.compute_layout(root, Size::MAX_CONTENT).unwrap();

    let widths: Vec<f32> = children
        .iter()
        .map(|&child| tree.layout(child).unwrap().size.width)
        .collect();
    assert_eq!(widths, vec![33.0, 34.0, 33.0]);

    let mut edge = 0.0;
    for &child in &children {
        let layout = tree.layout(child).unwrap();
        assert_eq!(layout.location.x, edge);
        edge += layout.size.width;
    }
    assert_eq!(edge, 100.0);
}

#[test]
fn test_unrounded_layout_keeps_the_fractions() {
    let mut tree: LayoutTree = LayoutTree::new();
    let (root, children) = thirds(&mut tree);
    tree.compute_layout(root, Size::MAX_CONTENT).unwrap();

    let unrounded = tree.unrounded_layout(children[1]).unwrap();
    assert!((unrounded.size.width - 100.0 / 3.0).abs() < 1e-4);
    assert!((unrounded.location.x - 100.0 / 3.0).abs() < 1e-4);
}

#[test]
fn test_rounding_can_be_disabled_per_tree() {
    let mut tree: LayoutTree = LayoutTree::with_config(TreeConfig {
        use_rounding: false,
    });
    let (root, children) = thirds(&mut tree);
    tree.compute_layout(root, Size::MAX_CONTENT).unwrap();

    for &child in &children {
        assert_eq!(
            tree.layout(child).unwrap(),
            tree.unrounded_layout(child).unwrap()
        );
    }
    assert!(tree.layout(children[0]).unwrap().size.width.fract() > 0.0);
}
