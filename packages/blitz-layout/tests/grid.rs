//! Grid layout through the public tree API

use blitz_layout::{
    AlignItems, DetailedLayoutInfo, Dimension, Display, GridAutoFlow, GridPlacement,
    GridTemplateArea, GridTemplateComponent, LayoutTree, LengthPercentage, Line, NodeId, Size,
    Style, TrackSizingFunction,
};

fn tracks(sizes: &[f32]) -> Vec<GridTemplateComponent> {
    sizes
        .iter()
        .map(|&size| GridTemplateComponent::Single(TrackSizingFunction::length(size)))
        .collect()
}

fn grid_container(width: f32, height: f32, template_columns: Vec<GridTemplateComponent>) -> Style {
    Style {
        display: Display::Grid,
        size: Size::<Dimension>::from_lengths(width, height),
        grid_template_columns: template_columns,
        ..Default::default()
    }
}

fn location(tree: &LayoutTree, node: NodeId) -> (f32, f32) {
    let layout = tree.layout(node).unwrap();
    (layout.location.x, layout.location.y)
}

fn grid_info(tree: &LayoutTree, node: NodeId) -> blitz_layout::DetailedGridInfo {
    match tree.detailed_layout_info(node).unwrap() {
        DetailedLayoutInfo::Grid(info) => *info,
        DetailedLayoutInfo::None => panic!("node {node} has no grid info"),
    }
}

#[test]
fn test_item_fills_its_explicit_column_and_the_stretched_row() {
    let mut tree: LayoutTree = LayoutTree::new();
    let child = tree.new_leaf(Style {
        grid_column: Line::<GridPlacement>::from_line_index(2),
        ..Default::default()
    });
    let root = tree
        .new_with_children(grid_container(150.0, 50.0, tracks(&[50.0, 100.0])), &[child])
        .unwrap();
    tree.compute_layout(root, Size::MAX_CONTENT).unwrap();

    let layout = tree.layout(child).unwrap();
    assert_eq!(layout.location.x, 50.0);
    assert_eq!(layout.size, Size { width: 100.0, height: 50.0 });
}

#[test]
fn test_spanning_item_covers_both_tracks() {
    let mut tree: LayoutTree = LayoutTree::new();
    let child = tree.new_leaf(Style {
        grid_column: Line::<GridPlacement>::from_span(2),
        ..Default::default()
    });
    let root = tree
        .new_with_children(grid_container(100.0, 20.0, tracks(&[50.0, 50.0])), &[child])
        .unwrap();
    tree.compute_layout(root, Size::MAX_CONTENT).unwrap();

    assert_eq!(tree.layout(child).unwrap().size.width, 100.0);
}

#[test]
fn test_row_span_covers_the_union_of_rows() {
    let mut tree: LayoutTree = LayoutTree::new();
    let child = tree.new_leaf(Style {
        grid_row: Line::<GridPlacement>::from_span(2),
        ..Default::default()
    });
    let root = tree
        .new_with_children(
            Style {
                grid_template_rows: tracks(&[50.0, 50.0]),
                ..grid_container(100.0, 100.0, tracks(&[100.0]))
            },
            &[child],
        )
        .unwrap();
    tree.compute_layout(root, Size::MAX_CONTENT).unwrap();

    assert_eq!(tree.layout(child).unwrap().size.height, 100.0);
}

#[test]
fn test_dense_flow_backfills_earlier_holes() {
    let mut tree: LayoutTree = LayoutTree::new();
    let item = |tree: &mut LayoutTree, span: u16| {
        tree.new_leaf(Style {
            grid_column: Line::<GridPlacement>::from_span(span),
            size: Size {
                width: Dimension::Auto,
                height: Dimension::length(10.0),
            },
            ..Default::default()
        })
    };
    let children = [
        item(&mut tree, 2),
        item(&mut tree, 2),
        item(&mut tree, 1),
        item(&mut tree, 1),
    ];
    let root = tree
        .new_with_children(
            Style {
                display: Display::Grid,
                size: Size {
                    width: Dimension::length(30.0),
                    height: Dimension::Auto,
                },
                grid_template_columns: tracks(&[10.0, 10.0, 10.0]),
                grid_auto_flow: GridAutoFlow::RowDense,
                ..Default::default()
            },
            &children,
        )
        .unwrap();
    tree.compute_layout(root, Size::MAX_CONTENT).unwrap();

    assert_eq!(location(&tree, children[1]), (0.0, 10.0));
    assert_eq!(location(&tree, children[2]), (20.0, 0.0));
    assert_eq!(location(&tree, children[3]), (20.0, 10.0));
}

#[test]
fn test_sparse_flow_never_backtracks() {
    let mut tree: LayoutTree = LayoutTree::new();
    let wide = tree.new_leaf(Style {
        grid_column: Line::<GridPlacement>::from_span(2),
        ..Default::default()
    });
    let wide_again = tree.new_leaf(Style {
        grid_column: Line::<GridPlacement>::from_span(2),
        ..Default::default()
    });
    let narrow = tree.new_leaf(Style::default());
    let root = tree
        .new_with_children(
            grid_container(30.0, 20.0, tracks(&[10.0, 10.0, 10.0])),
            &[wide, wide_again, narrow],
        )
        .unwrap();
    tree.compute_layout(root, Size::MAX_CONTENT).unwrap();

    let info = grid_info(&tree, root);
    assert_eq!(info.items[2].rows(), Line { start: 2, end: 3 });
    assert_eq!(info.items[2].columns(), Line { start: 3, end: 4 });
}

#[test]
fn test_negative_lines_create_implicit_tracks_before_the_grid() {
    let mut tree: LayoutTree = LayoutTree::new();
    let child = tree.new_leaf(Style {
        grid_column: Line::<GridPlacement>::from_line_index(-4),
        ..Default::default()
    });
    let root = tree
        .new_with_children(grid_container(150.0, 20.0, tracks(&[50.0, 50.0])), &[child])
        .unwrap();
    tree.compute_layout(root, Size::MAX_CONTENT).unwrap();

    let info = grid_info(&tree, root);
    assert_eq!(info.columns.negative_implicit_tracks, 1);
    assert_eq!(info.columns.explicit_tracks, 2);
    assert_eq!(info.columns.positive_implicit_tracks, 0);
    assert_eq!(info.columns.sizes, vec![50.0, 50.0, 50.0]);
    assert_eq!(info.items[0].columns(), Line { start: 1, end: 2 });
    assert_eq!(location(&tree, child), (0.0, 0.0));
}

#[test]
fn test_gaps_appear_between_tracks_in_detailed_info() {
    let mut tree: LayoutTree = LayoutTree::new();
    let first = tree.new_leaf(Style::default());
    let second = tree.new_leaf(Style::default());
    let root = tree
        .new_with_children(
            Style {
                gap: Size {
                    width: LengthPercentage::length(10.0),
                    height: LengthPercentage::ZERO,
                },
                ..grid_container(110.0, 20.0, tracks(&[50.0, 50.0]))
            },
            &[first, second],
        )
        .unwrap();
    tree.compute_layout(root, Size::MAX_CONTENT).unwrap();

    assert_eq!(location(&tree, second), (60.0, 0.0));
    let info = grid_info(&tree, root);
    assert_eq!(info.columns.gutters, vec![10.0]);
    assert_eq!(info.items[1].columns(), Line { start: 2, end: 3 });
    assert_eq!(info.rows.sizes, vec![20.0]);
}

#[test]
fn test_justify_items_center_within_the_area() {
    let mut tree: LayoutTree = LayoutTree::new();
    let child = tree.new_leaf(Style {
        size: Size {
            width: Dimension::length(20.0),
            height: Dimension::Auto,
        },
        ..Default::default()
    });
    let root = tree
        .new_with_children(
            Style {
                justify_items: Some(AlignItems::Center),
                ..grid_container(100.0, 50.0, tracks(&[100.0]))
            },
            &[child],
        )
        .unwrap();
    tree.compute_layout(root, Size::MAX_CONTENT).unwrap();

    assert_eq!(location(&tree, child), (40.0, 0.0));
    assert_eq!(tree.layout(child).unwrap().size.height, 50.0);
}

#[test]
fn test_fr_tracks_share_the_free_space() {
    let mut tree: LayoutTree = LayoutTree::new();
    let first = tree.new_leaf(Style::default());
    let second = tree.new_leaf(Style::default());
    let root = tree
        .new_with_children(
            grid_container(
                90.0,
                10.0,
                vec![
                    GridTemplateComponent::Single(TrackSizingFunction::fr(1.0)),
                    GridTemplateComponent::Single(TrackSizingFunction::fr(2.0)),
                ],
            ),
            &[first, second],
        )
        .unwrap();
    tree.compute_layout(root, Size::MAX_CONTENT).unwrap();

    assert_eq!(tree.layout(first).unwrap().size.width, 30.0);
    assert_eq!(location(&tree, second), (30.0, 0.0));
    assert_eq!(tree.layout(second).unwrap().size.width, 60.0);
}

#[test]
fn test_named_area_places_an_item() {
    let mut tree: LayoutTree = LayoutTree::new();
    let sidebar = tree.new_leaf(Style {
        grid_row: Line::<GridPlacement>::area("side"),
        grid_column: Line::<GridPlacement>::area("side"),
        ..Default::default()
    });
    let root = tree
        .new_with_children(
            Style {
                grid_template_rows: tracks(&[20.0, 20.0]),
                grid_template_areas: vec![GridTemplateArea {
                    name: "side".to_owned(),
                    row_start: 1,
                    row_end: 3,
                    column_start: 2,
                    column_end: 3,
                }],
                ..grid_container(100.0, 40.0, tracks(&[50.0, 50.0]))
            },
            &[sidebar],
        )
        .unwrap();
    tree.compute_layout(root, Size::MAX_CONTENT).unwrap();

    let layout = tree.layout(sidebar).unwrap();
    assert_eq!(location(&tree, sidebar), (50.0, 0.0));
    assert_eq!(layout.size, Size { width: 50.0, height: 40.0 });
}

#[test]
fn test_non_grid_nodes_report_no_detailed_info() {
    let mut tree: LayoutTree = LayoutTree::new();
    let leaf = tree.new_leaf(Style::default());
    tree.compute_layout(leaf, Size::MAX_CONTENT).unwrap();

    assert_eq!(
        tree.detailed_layout_info(leaf).unwrap(),
        DetailedLayoutInfo::None
    );
}

/// Lay out one item in a 100x100 grid and report where it landed
fn place_single_item(
    template_columns: Vec<GridTemplateComponent>,
    grid_column: Line<GridPlacement>,
) -> blitz_layout::DetailedGridInfo {
    let mut tree: LayoutTree = LayoutTree::new();
    let child = tree.new_leaf(Style {
        grid_column,
        ..Default::default()
    });
    let root = tree
        .new_with_children(grid_container(100.0, 100.0, template_columns), &[child])
        .unwrap();
    tree.compute_layout(root, Size::from_definite(100.0, 100.0))
        .unwrap();
    grid_info(&tree, root)
}

#[test]
fn test_huge_line_with_a_span_is_clamped_to_the_line_limit() {
    let info = place_single_item(
        Vec::new(),
        Line {
            start: GridPlacement::Line(i16::MAX),
            end: GridPlacement::Span(2),
        },
    );

    // Squeezed against the last allowed line, the item keeps one track
    assert_eq!(info.items[0].columns(), Line { start: 10_000, end: 10_001 });
    assert_eq!(info.items[0].rows(), Line { start: 1, end: 2 });
    assert_eq!(info.columns.explicit_tracks, 0);
    assert_eq!(info.columns.positive_implicit_tracks, 10_000);
}

#[test]
fn test_largest_span_covers_the_implicit_tracks_it_asks_for() {
    let mut tree: LayoutTree = LayoutTree::new();
    let child = tree.new_leaf(Style {
        grid_column: Line::<GridPlacement>::from_span(u16::MAX),
        ..Default::default()
    });
    let root = tree
        .new_with_children(grid_container(100.0, 100.0, Vec::new()), &[child])
        .unwrap();
    tree.compute_layout(root, Size::from_definite(100.0, 100.0))
        .unwrap();

    let info = grid_info(&tree, root);
    assert_eq!(info.items[0].columns(), Line { start: 1, end: 10_001 });
    assert_eq!(info.columns.positive_implicit_tracks, 10_000);
    assert!(tree.layout(child).unwrap().size.width > 99.0);
}

#[test]
fn test_far_negative_line_is_clamped_before_the_grid() {
    let info = place_single_item(
        tracks(&[50.0, 50.0]),
        Line::<GridPlacement>::from_line_index(i16::MIN),
    );

    assert_eq!(info.columns.negative_implicit_tracks, 10_000);
    assert_eq!(info.columns.explicit_tracks, 2);
    assert_eq!(info.items[0].columns(), Line { start: 1, end: 2 });
}

#[test]
fn test_missing_named_line_occurrences_fall_past_the_explicit_grid() {
    let mut tree: LayoutTree = LayoutTree::new();
    let child = tree.new_leaf(Style {
        grid_column: Line {
            start: GridPlacement::named("edge", 3),
            end: GridPlacement::Auto,
        },
        ..Default::default()
    });
    let root = tree
        .new_with_children(
            Style {
                grid_template_column_names: vec![
                    vec!["edge".to_owned()],
                    vec!["edge".to_owned()],
                    Vec::new(),
                ],
                ..grid_container(100.0, 100.0, tracks(&[50.0, 50.0]))
            },
            &[child],
        )
        .unwrap();
    tree.compute_layout(root, Size::from_definite(100.0, 100.0))
        .unwrap();

    // Two lines are called "edge", so the third is the first implicit line after the grid
    let info = grid_info(&tree, root);
    assert_eq!(info.items[0].columns(), Line { start: 4, end: 5 });
    assert_eq!(info.columns.positive_implicit_tracks, 2);
}

#[test]
fn test_extreme_named_line_indices_stay_within_the_line_limit() {
    let info = place_single_item(
        tracks(&[50.0, 50.0]),
        Line {
            start: GridPlacement::named("nowhere", i16::MAX),
            end: GridPlacement::Auto,
        },
    );
    assert_eq!(info.items[0].columns(), Line { start: 10_000, end: 10_001 });

    let info = place_single_item(
        tracks(&[50.0, 50.0]),
        Line {
            start: GridPlacement::named("nowhere", i16::MIN),
            end: GridPlacement::Auto,
        },
    );
    assert_eq!(info.columns.negative_implicit_tracks, 10_000);
    assert_eq!(info.items[0].columns(), Line { start: 1, end: 2 });
}
