// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caret spiral.
//!
//! Grow a spiral of creased nodes with a caret and watch which paint groups each
//! incremental commit repaints.
//!
//! Run:
//! - `cargo run -p understory_demos --example caret_spiral`

use kurbo::Size;
use tracing_subscriber::EnvFilter;
use understory_direction_tree::{Caret, CommitLayout, Direction, DirectionTree, NodeId, Painter};

#[derive(Default)]
struct Counter {
    painted: Vec<NodeId>,
}

impl Painter<u32> for Counter {
    type Error = core::convert::Infallible;

    fn size(&mut self, _: &DirectionTree<u32>, _: NodeId) -> Result<Size, Self::Error> {
        Ok(Size::new(24.0, 80.0))
    }

    fn paint(&mut self, _: &DirectionTree<u32>, group_root: NodeId) -> bool {
        self.painted.push(group_root);
        false
    }
}

const TURNS: [Direction; 4] = [
    Direction::Forward,
    Direction::Downward,
    Direction::Backward,
    Direction::Upward,
];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree = DirectionTree::new();
    let mut caret = Caret::new(&mut tree, 0);
    let root = caret.node();
    let mut painter = Counter::default();

    for step in 1..=8_u32 {
        caret
            .spawn_move(TURNS[(step as usize - 1) % TURNS.len()], step)
            .unwrap();
        caret.crease().unwrap();

        painter.painted.clear();
        let mut layout = CommitLayout::new(caret.tree_mut(), root, &mut painter);
        let mut cranks = 1;
        while layout.crank().unwrap() {
            cranks += 1;
        }
        drop(layout);

        let tip = caret.tree().layout(caret.node()).unwrap();
        println!(
            "step {step}: {cranks} crank(s), painted {} group(s), tip at {:?}",
            painter.painted.len(),
            tip.absolute_position()
        );
    }
    let extent = caret.tree().layout(root).unwrap().extent_size();
    println!("spiral extent: {extent:?}");
}
