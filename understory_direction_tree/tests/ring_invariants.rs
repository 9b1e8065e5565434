// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Random edit sequences keep every siblings ring consistent with the paint groups.

use std::collections::HashSet;

use proptest::prelude::*;
use understory_direction_tree::{Direction, DirectionTree, LayoutPreference, NodeId};

#[derive(Clone, Debug)]
enum Edit {
    Connect(usize, usize, usize),
    Disconnect(usize, usize),
    Crease(usize),
    Uncrease(usize),
    Prefer(usize, usize),
}

const CHILD_DIRECTIONS: [Direction; 5] = [
    Direction::Forward,
    Direction::Backward,
    Direction::Upward,
    Direction::Downward,
    Direction::Inward,
];

const PREFERENCES: [LayoutPreference; 4] = [
    LayoutPreference::PreferHorizontal,
    LayoutPreference::PreferVertical,
    LayoutPreference::PreferParent,
    LayoutPreference::PreferPerpendicular,
];

const NODES: usize = 10;

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        3 => (0..NODES, 0..CHILD_DIRECTIONS.len(), 0..NODES).prop_map(|(p, d, c)| Edit::Connect(p, d, c)),
        1 => (0..NODES, 0..CHILD_DIRECTIONS.len()).prop_map(|(p, d)| Edit::Disconnect(p, d)),
        1 => (0..NODES).prop_map(Edit::Crease),
        1 => (0..NODES).prop_map(Edit::Uncrease),
        1 => (0..NODES, 0..PREFERENCES.len()).prop_map(|(n, p)| Edit::Prefer(n, p)),
    ]
}

fn apply(tree: &mut DirectionTree<()>, nodes: &[NodeId], edit: &Edit) {
    // Contract violations are expected here; only the resulting structure matters.
    let _ = match *edit {
        Edit::Connect(p, d, c) => tree.connect(nodes[p], CHILD_DIRECTIONS[d], nodes[c]),
        Edit::Disconnect(p, d) => tree.disconnect(nodes[p], CHILD_DIRECTIONS[d]).map(|_| ()),
        Edit::Crease(n) => tree.crease(nodes[n]),
        Edit::Uncrease(n) => tree.uncrease(nodes[n]),
        Edit::Prefer(n, p) => tree.set_layout_preference(nodes[n], PREFERENCES[p]),
    };
}

proptest! {
    #[test]
    fn rings_partition_the_nodes_by_paint_group(edits in prop::collection::vec(edit(), 0..40)) {
        let mut tree = DirectionTree::new();
        let nodes: Vec<NodeId> = (0..NODES).map(|_| tree.new_node(())).collect();
        for e in &edits {
            apply(&mut tree, &nodes, e);
        }

        let mut seen = HashSet::new();
        for &node in &nodes {
            let group = tree.paint_group(node).unwrap();
            prop_assert!(tree.is_paint_group_root(group).unwrap());
            let ring: Vec<NodeId> = tree.siblings(group).unwrap().collect();
            prop_assert_eq!(tree.verify(group).unwrap(), ring.len());
            prop_assert!(ring.contains(&node), "{:?} missing from its group's ring", node);
            prop_assert_eq!(ring[0], group);
            for member in &ring {
                prop_assert_eq!(tree.paint_group(*member).unwrap(), group);
            }
            seen.insert(node);
        }
        prop_assert_eq!(seen.len(), NODES);
    }

    #[test]
    fn links_stay_symmetric(edits in prop::collection::vec(edit(), 0..40)) {
        let mut tree = DirectionTree::new();
        let nodes: Vec<NodeId> = (0..NODES).map(|_| tree.new_node(())).collect();
        for e in &edits {
            apply(&mut tree, &nodes, e);
        }
        for &node in &nodes {
            for direction in Direction::ALL {
                if let Some(other) = tree.node_at(node, direction).unwrap() {
                    prop_assert_eq!(tree.node_at(other, direction.reverse()).unwrap(), Some(node));
                }
            }
            let parents = Direction::ALL
                .iter()
                .filter(|d| tree.parent_direction(node).unwrap() == Some(**d))
                .count();
            prop_assert!(parents <= 1);
            prop_assert_eq!(tree.is_root(node).unwrap(), parents == 0);
        }
    }
}
