// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Size;
use understory_direction_tree::{CommitLayout, Direction, DirectionTree, NodeId, Painter};

struct Boxes;

impl Painter<Size> for Boxes {
    type Error = ();

    fn size(&mut self, tree: &DirectionTree<Size>, node: NodeId) -> Result<Size, ()> {
        tree.value(node).copied().map_err(|_| ())
    }
}

const TURNS: [Direction; 4] = [
    Direction::Forward,
    Direction::Downward,
    Direction::Backward,
    Direction::Upward,
];

/// A complete tree with `fanout` children per node hanging off alternating sides.
fn gen_bushy(depth: usize, fanout: usize) -> (DirectionTree<Size>, NodeId, Vec<NodeId>) {
    let mut tree = DirectionTree::new();
    let root = tree.new_node(Size::new(40.0, 20.0));
    let mut level = vec![root];
    let mut all = vec![root];
    for d in 0..depth {
        let mut next = Vec::new();
        for &parent in &level {
            // Every side except the one leading back to the grandparent.
            let parent_side = tree.parent_direction(parent).unwrap();
            let sides = TURNS.into_iter().filter(|d| Some(*d) != parent_side);
            for (i, dir) in sides.take(fanout).enumerate() {
                let size = Size::new(20.0 + (i * 7) as f64, 10.0 + (d * 3) as f64);
                let child = tree.new_node(size);
                tree.connect(parent, dir, child).unwrap();
                next.push(child);
            }
        }
        all.extend_from_slice(&next);
        level = next;
    }
    (tree, root, all)
}

/// A chain of `n` creased nodes turning a corner at every step.
fn gen_spiral(n: usize) -> (DirectionTree<Size>, NodeId, NodeId) {
    let mut tree = DirectionTree::new();
    let root = tree.new_node(Size::new(24.0, 80.0));
    let mut tip = root;
    for i in 0..n {
        let child = tree.new_node(Size::new(24.0, 80.0));
        tree.crease(child).unwrap();
        tree.connect(tip, TURNS[i % TURNS.len()], child).unwrap();
        tip = child;
    }
    (tree, root, tip)
}

fn commit(tree: &mut DirectionTree<Size>, root: NodeId) {
    let mut layout = CommitLayout::new(tree, root, Boxes);
    while layout.crank().unwrap() {}
}

fn bench_full_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("commit_full");
    for &depth in &[3_usize, 5, 7] {
        let (tree, root, all) = gen_bushy(depth, 3);
        group.throughput(Throughput::Elements(all.len() as u64));
        group.bench_function(format!("bushy_depth_{depth}"), |b| {
            b.iter_batched(
                || tree_clone(&tree, root),
                |(mut tree, root)| {
                    commit(&mut tree, root);
                    black_box(tree)
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

/// Rebuild an uncommitted copy; `DirectionTree` is deliberately not `Clone`.
fn tree_clone(tree: &DirectionTree<Size>, root: NodeId) -> (DirectionTree<Size>, NodeId) {
    let mut copy = DirectionTree::new();
    let new_root = copy.new_node(*tree.value(root).unwrap());
    let mut stack = vec![(root, new_root)];
    while let Some((from, to)) = stack.pop() {
        let children: Vec<_> = tree.children(from).unwrap().collect();
        for (dir, child) in children {
            let copied = copy.new_node(*tree.value(child).unwrap());
            copy.connect(to, dir, copied).unwrap();
            stack.push((child, copied));
        }
    }
    (copy, new_root)
}

fn bench_incremental(c: &mut Criterion) {
    let mut group = c.benchmark_group("commit_incremental");

    let (mut tree, root, all) = gen_bushy(7, 3);
    commit(&mut tree, root);
    let leaf = *all.last().unwrap();
    group.bench_function("bushy_leaf_change", |b| {
        b.iter(|| {
            tree.layout_changed(leaf).unwrap();
            commit(&mut tree, root);
        });
    });

    for &n in &[16_usize, 128] {
        let (mut tree, root, tip) = gen_spiral(n);
        commit(&mut tree, root);
        group.bench_function(format!("spiral_tip_change_{n}"), |b| {
            b.iter(|| {
                tree.layout_changed(tip).unwrap();
                commit(&mut tree, root);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_full_commit, bench_incremental);
criterion_main!(benches);
