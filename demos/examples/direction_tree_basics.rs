// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Direction tree basics.
//!
//! Build a small tree, commit it, edit one leaf, recommit, and hit-test.
//!
//! Run:
//! - `cargo run -p understory_demos --example direction_tree_basics`
//! - `RUST_LOG=understory_direction_tree=trace cargo run -p understory_demos --example direction_tree_basics`

use kurbo::Size;
use tracing_subscriber::EnvFilter;
use understory_direction_tree::{
    Alignment, AxisOverlap, CommitLayout, Direction, DirectionTree, NodeId, Painter,
};

/// Nodes carry a label; sizes are derived from it.
struct Labels {
    gap: f64,
}

impl Painter<&'static str> for Labels {
    type Error = &'static str;

    fn size(&mut self, tree: &DirectionTree<&'static str>, node: NodeId) -> Result<Size, Self::Error> {
        let label = tree.value(node).map_err(|_| "stale node")?;
        Ok(Size::new(8.0 * label.len() as f64 + 8.0, 20.0))
    }

    fn separation(
        &mut self,
        _: &DirectionTree<&'static str>,
        _: NodeId,
        _: NodeId,
        _: Direction,
        _: AxisOverlap,
        line_thickness: f64,
    ) -> Result<f64, Self::Error> {
        Ok(self.gap + line_thickness)
    }

    fn paint(&mut self, tree: &DirectionTree<&'static str>, group_root: NodeId) -> bool {
        for node in tree.siblings(group_root).unwrap() {
            let layout = tree.layout(node).unwrap();
            println!(
                "  {:<8} at {:?} bounds {:?}",
                tree.value(node).unwrap(),
                layout.absolute_position(),
                layout.absolute_bounds()
            );
        }
        false
    }
}

fn commit(tree: &mut DirectionTree<&'static str>, root: NodeId) {
    let mut layout = CommitLayout::new(tree, root, Labels { gap: 6.0 });
    while layout.crank().expect("labels always measure") {}
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree = DirectionTree::new();
    let root = tree.new_node("root");
    let right = tree.new_node("right");
    let below = tree.new_node("below");
    let leaf = tree.new_node("leaf");
    tree.connect(root, Direction::Forward, right).unwrap();
    tree.connect(root, Direction::Downward, below).unwrap();
    tree.connect(right, Direction::Downward, leaf).unwrap();
    tree.set_alignment(root, Direction::Downward, Alignment::Negative)
        .unwrap();

    println!("first commit:");
    commit(&mut tree, root);
    println!(
        "extent size {:?}",
        tree.layout(root).unwrap().extent_size()
    );

    // A longer label pushes `below` clear of the leaf hanging off `right`.
    tree.set_value(leaf, "a much longer leaf").unwrap();
    println!("after relabeling the leaf:");
    commit(&mut tree, root);

    let leaf_center = tree.layout(leaf).unwrap().absolute_position();
    let hit = tree
        .node_under_coords(root, leaf_center.x, leaf_center.y, 1.0)
        .unwrap();
    println!("hit at leaf center: {:?}", hit.map(|n| *tree.value(n).unwrap()));
    assert_eq!(hit, Some(leaf), "hit-test should find the leaf");
}
