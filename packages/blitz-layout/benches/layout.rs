use std::hint::black_box;

use blitz_layout::{
    Dimension, Display, FlexWrap, GridTemplateComponent, LayoutTree, NodeId, RepetitionCount,
    Size, Style, TrackSizingFunction,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

/// A wrapping flex row of `count` fixed-size items, each holding a growing leaf
fn build_flex_tree(count: usize) -> (LayoutTree, NodeId) {
    let mut tree = LayoutTree::with_capacity(count * 2 + 1);
    let items: Vec<NodeId> = (0..count)
        .map(|index| {
            let leaf = tree.new_leaf(Style {
                flex_grow: 1.0,
                ..Default::default()
            });
            tree.new_with_children(
                Style {
                    display: Display::Flex,
                    size: Size::<Dimension>::from_lengths(20.0 + (index % 7) as f32, 16.0),
                    flex_grow: 1.0,
                    ..Default::default()
                },
                &[leaf],
            )
            .unwrap()
        })
        .collect();
    let root = tree
        .new_with_children(
            Style {
                display: Display::Flex,
                flex_wrap: FlexWrap::Wrap,
                ..Default::default()
            },
            &items,
        )
        .unwrap();
    (tree, root)
}

/// An auto-filled grid of `count` auto-placed items
fn build_grid_tree(count: usize) -> (LayoutTree, NodeId) {
    let mut tree = LayoutTree::with_capacity(count + 1);
    let items: Vec<NodeId> = (0..count).map(|_| tree.new_leaf(Style::default())).collect();
    let root = tree
        .new_with_children(
            Style {
                display: Display::Grid,
                grid_template_columns: vec![GridTemplateComponent::repeat(
                    RepetitionCount::AutoFill,
                    vec![TrackSizingFunction::length(40.0)],
                )],
                grid_auto_rows: vec![TrackSizingFunction::length(20.0)],
                ..Default::default()
            },
            &items,
        )
        .unwrap();
    (tree, root)
}

fn bench_flex(c: &mut Criterion) {
    let mut group = c.benchmark_group("flex_wrap");
    for count in [100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || build_flex_tree(count),
                |(mut tree, root)| {
                    tree.compute_layout(root, Size::from_definite(800.0, 600.0))
                        .unwrap();
                    black_box(tree.layout(root).unwrap().size)
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_auto_fill");
    for count in [100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || build_grid_tree(count),
                |(mut tree, root)| {
                    tree.compute_layout(root, Size::from_definite(800.0, 600.0))
                        .unwrap();
                    black_box(tree.layout(root).unwrap().size)
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_relayout(c: &mut Criterion) {
    let (mut tree, root) = build_flex_tree(1_000);
    tree.compute_layout(root, Size::from_definite(800.0, 600.0))
        .unwrap();
    let first = tree.child_at_index(root, 0).unwrap();
    let style = tree.style(first).unwrap();

    c.bench_function("relayout_after_one_change", |b| {
        b.iter(|| {
            tree.set_style(first, style.clone()).unwrap();
            tree.compute_layout(root, Size::from_definite(800.0, 600.0))
                .unwrap();
            black_box(tree.layout(first).unwrap().size)
        })
    });
}

criterion_group!(layout_benches, bench_flex, bench_grid, bench_relayout);
criterion_main!(layout_benches);
