//! Tree mutation, dirty tracking and measured leaves

use blitz_layout::{
    AvailableSpace, Dimension, LayoutTree, LayoutTreeError, MeasureError, NodeId, Size, Style,
};

/// A run of text measured as fixed-width glyphs
#[derive(Debug)]
struct TextRun {
    glyphs: usize,
    measured: usize,
}

impl TextRun {
    fn new(glyphs: usize) -> Self {
        Self { glyphs, measured: 0 }
    }
}

fn measure_text(
    known_dimensions: Size<Option<f32>>,
    available_space: Size<AvailableSpace>,
    _node: NodeId,
    context: Option<&mut TextRun>,
    _style: &Style,
) -> Result<Size<f32>, MeasureError> {
    let Some(run) = context else {
        return Ok(Size::ZERO);
    };
    run.measured += 1;
    let natural_width = run.glyphs as f32 * 10.0;
    let width = known_dimensions.width.unwrap_or(match available_space.width {
        AvailableSpace::Definite(space) => natural_width.min(space),
        AvailableSpace::MinContent => 10.0,
        AvailableSpace::MaxContent => natural_width,
    });
    let lines = (natural_width / width.max(10.0)).ceil().max(1.0);
    Ok(Size {
        width,
        height: known_dimensions.height.unwrap_or(lines * 10.0),
    })
}

/// Route the engine's logs to the test output, filtered by `RUST_LOG`
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sized(width: f32, height: f32) -> Style {
    Style {
        size: Size::<Dimension>::from_lengths(width, height),
        ..Default::default()
    }
}

#[test]
fn test_unknown_nodes_are_not_found() {
    let mut tree: LayoutTree = LayoutTree::new();
    let node = tree.new_leaf(Style::default());
    tree.remove(node).unwrap();

    assert!(matches!(
        tree.layout(node),
        Err(LayoutTreeError::NotFound { node: missing }) if missing == node
    ));
    assert!(matches!(
        tree.compute_layout(node, Size::MAX_CONTENT),
        Err(LayoutTreeError::NotFound { .. })
    ));
}

#[test]
fn test_child_index_out_of_bounds() {
    let mut tree: LayoutTree = LayoutTree::new();
    let child = tree.new_leaf(Style::default());
    let parent = tree.new_with_children(Style::default(), &[child]).unwrap();

    assert!(matches!(
        tree.child_at_index(parent, 1),
        Err(LayoutTreeError::OutOfBounds {
            index: 1,
            child_count: 1,
            ..
        })
    ));
    assert!(matches!(
        tree.remove_child_at_index(parent, 3),
        Err(LayoutTreeError::OutOfBounds { .. })
    ));
}

#[test]
fn test_removing_a_stranger_is_an_invalid_child() {
    let mut tree: LayoutTree = LayoutTree::new();
    let parent = tree.new_leaf(Style::default());
    let stranger = tree.new_leaf(Style::default());

    assert!(matches!(
        tree.remove_child(parent, stranger),
        Err(LayoutTreeError::InvalidChild { .. })
    ));
}

#[test]
fn test_adopting_an_ancestor_is_a_cycle() {
    let mut tree: LayoutTree = LayoutTree::new();
    let leaf = tree.new_leaf(Style::default());
    let middle = tree.new_with_children(Style::default(), &[leaf]).unwrap();
    let root = tree.new_with_children(Style::default(), &[middle]).unwrap();

    assert!(matches!(
        tree.add_child(leaf, root),
        Err(LayoutTreeError::Cycle { .. })
    ));
    assert!(matches!(
        tree.add_child(leaf, leaf),
        Err(LayoutTreeError::Cycle { .. })
    ));
    assert_eq!(tree.parent(root).unwrap(), None);
}

#[test]
fn test_changes_dirty_the_node_and_its_ancestors() {
    let mut tree: LayoutTree = LayoutTree::new();
    let leaf = tree.new_leaf(sized(10.0, 10.0));
    let sibling = tree.new_leaf(sized(10.0, 10.0));
    let middle = tree.new_with_children(Style::default(), &[leaf]).unwrap();
    let root = tree
        .new_with_children(Style::default(), &[middle, sibling])
        .unwrap();
    assert!(tree.dirty(root).unwrap());

    tree.compute_layout(root, Size::from_definite(100.0, 100.0))
        .unwrap();
    for node in [root, middle, leaf, sibling] {
        assert!(!tree.dirty(node).unwrap(), "node {node} is clean after layout");
    }

    tree.set_style(leaf, sized(20.0, 10.0)).unwrap();
    assert!(tree.dirty(leaf).unwrap());
    assert!(tree.dirty(middle).unwrap());
    assert!(tree.dirty(root).unwrap());
    assert!(!tree.dirty(sibling).unwrap());

    // Laying out an unrelated subtree leaves the dirty chain alone
    tree.compute_layout(sibling, Size::from_definite(100.0, 100.0))
        .unwrap();
    assert!(tree.dirty(leaf).unwrap());
    assert!(tree.dirty(root).unwrap());

    tree.compute_layout(root, Size::from_definite(100.0, 100.0))
        .unwrap();
    assert_eq!(tree.layout(leaf).unwrap().size.width, 20.0);
}

#[test]
fn test_layout_is_idempotent_and_cached() {
    init_tracing();
    let mut tree: LayoutTree<TextRun> = LayoutTree::new();
    let text = tree.new_leaf_with_context(Style::default(), TextRun::new(5));
    let root = tree.new_with_children(Style::default(), &[text]).unwrap();
    let viewport = Size::from_definite(200.0, 200.0);

    tree.compute_layout_with_measure(root, viewport, measure_text)
        .unwrap();
    let first = *tree.layout(text).unwrap();
    let calls = tree.get_node_context(text).unwrap().unwrap().measured;

    tree.compute_layout_with_measure(root, viewport, measure_text)
        .unwrap();
    assert_eq!(*tree.layout(text).unwrap(), first);
    assert_eq!(
        tree.get_node_context(text).unwrap().unwrap().measured,
        calls,
        "clean trees are served from the cache"
    );
}

#[test]
fn test_measured_leaf_wraps_to_the_available_width() {
    let mut tree: LayoutTree<TextRun> = LayoutTree::new();
    let text = tree.new_leaf_with_context(Style::default(), TextRun::new(10));
    let root = tree
        .new_with_children(
            Style {
                size: Size {
                    width: Dimension::length(50.0),
                    height: Dimension::Auto,
                },
                ..Default::default()
            },
            &[text],
        )
        .unwrap();
    tree.compute_layout_with_measure(root, Size::MAX_CONTENT, measure_text)
        .unwrap();

    // 100px of text in a 50px column takes two lines
    assert_eq!(tree.layout(text).unwrap().size, Size { width: 50.0, height: 20.0 });
    assert_eq!(tree.layout(root).unwrap().size.height, 20.0);
}

#[test]
fn test_leaves_without_context_are_never_measured() {
    let mut tree: LayoutTree<TextRun> = LayoutTree::new();
    let plain = tree.new_leaf(sized(10.0, 10.0));
    let mut calls = 0;
    tree.compute_layout_with_measure(plain, Size::MAX_CONTENT, |_, _, _, _, _| {
        calls += 1;
        Ok(Size::ZERO)
    })
    .unwrap();

    assert_eq!(calls, 0);
    assert_eq!(tree.layout(plain).unwrap().size, Size { width: 10.0, height: 10.0 });
}

#[test]
fn test_failed_measure_leaves_the_tree_untouched() {
    init_tracing();
    let mut tree: LayoutTree<TextRun> = LayoutTree::new();
    let text = tree.new_leaf_with_context(Style::default(), TextRun::new(3));
    let root = tree.new_with_children(Style::default(), &[text]).unwrap();
    let viewport = Size::from_definite(200.0, 200.0);

    tree.compute_layout_with_measure(root, viewport, measure_text)
        .unwrap();
    let text_before = *tree.layout(text).unwrap();
    let root_before = *tree.layout(root).unwrap();
    assert_eq!(text_before.size, Size { width: 200.0, height: 10.0 });

    tree.set_style(text, Style::default()).unwrap();
    let result = tree.compute_layout_with_measure(root, viewport, |_, _, _, _, _| {
        Err(MeasureError::new("font not loaded"))
    });

    match result {
        Err(LayoutTreeError::Measure { node, source }) => {
            assert_eq!(node, text);
            assert_eq!(source.to_string(), "font not loaded");
        }
        other => panic!("expected a measure error, got {other:?}"),
    }
    assert_eq!(*tree.layout(text).unwrap(), text_before);
    assert_eq!(*tree.layout(root).unwrap(), root_before);
    assert_eq!(*tree.unrounded_layout(text).unwrap(), text_before);
    assert!(tree.dirty(text).unwrap(), "failed passes do not clean nodes");
    assert!(tree.dirty(root).unwrap());

    // A later successful pass recovers
    tree.compute_layout_with_measure(root, viewport, measure_text)
        .unwrap();
    assert_eq!(*tree.layout(text).unwrap(), text_before);
    assert!(!tree.dirty(text).unwrap());
}

#[test]
fn test_set_children_orphans_the_previous_children() {
    let mut tree: LayoutTree = LayoutTree::new();
    let old = tree.new_leaf(Style::default());
    let kept = tree.new_leaf(Style::default());
    let new = tree.new_leaf(Style::default());
    let parent = tree.new_with_children(Style::default(), &[old, kept]).unwrap();

    tree.set_children(parent, &[kept, new]).unwrap();
    assert_eq!(tree.children(parent).unwrap(), vec![kept, new]);
    assert_eq!(tree.parent(old).unwrap(), None);
    assert_eq!(tree.parent(new).unwrap(), Some(parent));
    assert!(matches!(
        tree.set_children(parent, &[new, new]),
        Err(LayoutTreeError::InvalidChild { .. })
    ));
}

#[test]
fn test_enable_rounding_after_disabling() {
    let mut tree: LayoutTree = LayoutTree::new();
    let node = tree.new_leaf(sized(10.5, 10.5));
    tree.disable_rounding();
    tree.compute_layout(node, Size::MAX_CONTENT).unwrap();
    assert_eq!(tree.layout(node).unwrap().size.width, 10.5);

    tree.enable_rounding();
    tree.compute_layout(node, Size::MAX_CONTENT).unwrap();
    assert_eq!(tree.layout(node).unwrap().size.width, 11.0);
}

#[test]
fn test_context_can_be_edited_between_passes() {
    let mut tree: LayoutTree<TextRun> = LayoutTree::new();
    let text = tree.new_leaf_with_context(Style::default(), TextRun::new(2));
    let root = tree
        .new_with_children(
            Style {
                display: blitz_layout::Display::Flex,
                ..Default::default()
            },
            &[text],
        )
        .unwrap();
    tree.compute_layout_with_measure(root, Size::MAX_CONTENT, measure_text)
        .unwrap();
    assert_eq!(tree.layout(text).unwrap().size.width, 20.0);

    tree.get_node_context_mut(text).unwrap().unwrap().glyphs = 4;
    tree.mark_dirty(text).unwrap();
    tree.compute_layout_with_measure(root, Size::MAX_CONTENT, measure_text)
        .unwrap();
    assert_eq!(tree.layout(text).unwrap().size.width, 40.0);
}

#[test]
fn test_layout_runs_with_every_event_enabled() {
    use tracing_subscriber::util::SubscriberInitExt;

    let _guard = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
        .with_test_writer()
        .set_default();

    let mut tree: LayoutTree = LayoutTree::new();
    let far = tree.new_leaf(Style {
        grid_column: blitz_layout::Line::<blitz_layout::GridPlacement>::from_line_index(i16::MAX),
        ..Default::default()
    });
    let grid = tree
        .new_with_children(
            Style {
                display: blitz_layout::Display::Grid,
                ..sized(100.0, 50.0)
            },
            &[far],
        )
        .unwrap();
    let item = tree.new_leaf(Style {
        flex_grow: 1.0,
        ..Default::default()
    });
    let flex = tree
        .new_with_children(
            Style {
                display: blitz_layout::Display::Flex,
                ..Default::default()
            },
            &[item],
        )
        .unwrap();
    let root = tree.new_with_children(Style::default(), &[grid, flex]).unwrap();

    tree.compute_layout(root, Size::from_definite(100.0, 100.0))
        .unwrap();
    assert_eq!(tree.layout(grid).unwrap().size, Size { width: 100.0, height: 50.0 });
    assert_eq!(tree.layout(item).unwrap().size.width, 100.0);
}
