// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A cursor for building trees one edge at a time.

use alloc::vec::Vec;

use crate::error::TreeError;
use crate::tree::DirectionTree;
use crate::types::{Alignment, Direction, NodeId};

/// A position in a [`DirectionTree`] plus a stack of saved positions.
///
/// ```
/// use understory_direction_tree::{Caret, Direction, DirectionTree};
///
/// let mut tree = DirectionTree::new();
/// let mut caret = Caret::new(&mut tree, "root");
/// caret.spawn_move(Direction::Forward, "a").unwrap();
/// caret.push();
/// caret.spawn_move(Direction::Downward, "a1").unwrap();
/// caret.pop().unwrap();
/// caret.spawn(Direction::Forward, "b").unwrap();
/// let root = caret.root().unwrap();
/// assert_eq!(*tree.value(root).unwrap(), "root");
/// ```
pub struct Caret<'t, V> {
    tree: &'t mut DirectionTree<V>,
    node: NodeId,
    stack: Vec<NodeId>,
}

impl<V> core::fmt::Debug for Caret<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Caret")
            .field("node", &self.node)
            .field("stack", &self.stack)
            .finish_non_exhaustive()
    }
}

impl<'t, V> Caret<'t, V> {
    /// Create a new root holding `value` and place the caret on it.
    pub fn new(tree: &'t mut DirectionTree<V>, value: V) -> Self {
        let node = tree.new_node(value);
        Self {
            tree,
            node,
            stack: Vec::new(),
        }
    }

    /// Place a caret on an existing node.
    pub fn at(tree: &'t mut DirectionTree<V>, node: NodeId) -> Result<Self, TreeError> {
        if !tree.is_alive(node) {
            return Err(TreeError::StaleNode);
        }
        Ok(Self {
            tree,
            node,
            stack: Vec::new(),
        })
    }

    /// The node under the caret.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The tree being built.
    pub fn tree(&self) -> &DirectionTree<V> {
        self.tree
    }

    /// Mutable access to the tree being built.
    pub fn tree_mut(&mut self) -> &mut DirectionTree<V> {
        self.tree
    }

    /// Create a node holding `value` and connect it in `direction`. The caret stays put.
    pub fn spawn(&mut self, direction: Direction, value: V) -> Result<NodeId, TreeError> {
        let child = self.tree.new_node(value);
        if let Err(err) = self.tree.connect(self.node, direction, child) {
            self.tree.remove(child)?;
            return Err(err);
        }
        Ok(child)
    }

    /// Like [`Caret::spawn`], then move onto the new node.
    pub fn spawn_move(&mut self, direction: Direction, value: V) -> Result<NodeId, TreeError> {
        self.node = self.spawn(direction, value)?;
        Ok(self.node)
    }

    /// Connect an existing root in `direction`.
    pub fn connect(&mut self, direction: Direction, child: NodeId) -> Result<(), TreeError> {
        self.tree.connect(self.node, direction, child)
    }

    /// Disconnect the child in `direction` and return it.
    pub fn disconnect(&mut self, direction: Direction) -> Result<NodeId, TreeError> {
        self.tree.disconnect(self.node, direction)
    }

    /// Follow the link in `direction`, parent link included.
    pub fn move_to(&mut self, direction: Direction) -> Result<NodeId, TreeError> {
        self.node = self
            .tree
            .node_at(self.node, direction)?
            .ok_or(TreeError::NoNeighbor(direction))?;
        Ok(self.node)
    }

    /// Save the current position.
    pub fn push(&mut self) {
        self.stack.push(self.node);
    }

    /// Return to the most recently saved position.
    pub fn pop(&mut self) -> Result<NodeId, TreeError> {
        let node = self.stack.pop().ok_or(TreeError::EmptyCaretStack)?;
        if !self.tree.is_alive(node) {
            return Err(TreeError::StaleNode);
        }
        self.node = node;
        Ok(node)
    }

    /// Crease the node under the caret.
    pub fn crease(&mut self) -> Result<(), TreeError> {
        self.tree.crease(self.node)
    }

    /// Uncrease the node under the caret.
    pub fn uncrease(&mut self) -> Result<(), TreeError> {
        self.tree.uncrease(self.node)
    }

    /// Set the alignment of the child in `direction`.
    pub fn align(&mut self, direction: Direction, alignment: Alignment) -> Result<(), TreeError> {
        self.tree.set_alignment(self.node, direction, alignment)
    }

    /// The root of the tree under the caret.
    pub fn root(&self) -> Result<NodeId, TreeError> {
        self.tree.root(self.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_keeps_position_and_spawn_move_follows() {
        let mut tree = DirectionTree::new();
        let mut caret = Caret::new(&mut tree, 0);
        let root = caret.node();
        let a = caret.spawn(Direction::Forward, 1).unwrap();
        assert_eq!(caret.node(), root);
        let b = caret.spawn_move(Direction::Downward, 2).unwrap();
        assert_eq!(caret.node(), b);
        assert_eq!(caret.move_to(Direction::Upward).unwrap(), root);
        assert_eq!(caret.move_to(Direction::Forward).unwrap(), a);
        assert_eq!(caret.root().unwrap(), root);
    }

    #[test]
    fn failed_spawn_leaves_no_node_behind() {
        let mut tree = DirectionTree::new();
        let mut caret = Caret::new(&mut tree, 0);
        caret.spawn(Direction::Forward, 1).unwrap();
        assert_eq!(
            caret.spawn(Direction::Forward, 2),
            Err(TreeError::Occupied(Direction::Forward))
        );
        assert_eq!(
            caret.spawn(Direction::Outward, 3),
            Err(TreeError::OutwardConnect)
        );
        let root = caret.root().unwrap();
        drop(caret);
        assert_eq!(tree.verify(root), Ok(2));
        assert_eq!(tree.children(root).unwrap().count(), 1);
    }

    #[test]
    fn stack_round_trips_and_reports_underflow() {
        let mut tree = DirectionTree::new();
        let mut caret = Caret::new(&mut tree, ());
        let root = caret.node();
        caret.push();
        caret.spawn_move(Direction::Upward, ()).unwrap();
        assert_eq!(caret.pop().unwrap(), root);
        assert_eq!(caret.pop(), Err(TreeError::EmptyCaretStack));
    }

    #[test]
    fn missing_links_are_errors() {
        let mut tree = DirectionTree::new();
        let mut caret = Caret::new(&mut tree, ());
        assert_eq!(
            caret.move_to(Direction::Backward),
            Err(TreeError::NoNeighbor(Direction::Backward))
        );
        assert_eq!(
            caret.disconnect(Direction::Forward),
            Err(TreeError::NoNeighbor(Direction::Forward))
        );
    }

    #[test]
    fn crease_and_align_apply_to_the_current_node() {
        let mut tree = DirectionTree::new();
        let mut caret = Caret::new(&mut tree, ());
        let child = caret.spawn(Direction::Forward, ()).unwrap();
        caret.align(Direction::Forward, Alignment::Positive).unwrap();
        caret.move_to(Direction::Forward).unwrap();
        caret.crease().unwrap();
        assert!(caret.tree().is_creased(child).unwrap());
        caret.uncrease().unwrap();
        assert!(!caret.tree().is_creased(child).unwrap());
    }
}
