// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: node storage, directional links, state, and dirty tracking.

use alloc::vec::Vec;

use crate::error::TreeError;
use crate::layout::Layout;
use crate::neighbor::Neighbor;
use crate::types::{
    Alignment, Axis, AxisOverlap, Direction, DirtyFlags, Fit, LayoutPreference, LayoutState,
    NodeId,
};

/// Caller-owned content of a node plus the settings that shape its layout.
#[derive(Clone, Debug)]
pub struct State<V> {
    pub(crate) value: V,
    pub(crate) fit: Fit,
    pub(crate) scale: f64,
    pub(crate) right_to_left: bool,
    pub(crate) preference: LayoutPreference,
}

impl<V> State<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            fit: Fit::default(),
            scale: 1.0,
            right_to_left: false,
            preference: LayoutPreference::default(),
        }
    }

    /// The node's payload.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// How the node absorbs its children's extents.
    pub fn fit(&self) -> Fit {
        self.fit
    }

    /// Scale of the node's subtree relative to its parent.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Whether forward and backward children are mirrored.
    pub fn right_to_left(&self) -> bool {
        self.right_to_left
    }

    /// Which axis the node lays out first.
    pub fn layout_preference(&self) -> LayoutPreference {
        self.preference
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<V> {
    generation: u32,
    pub(crate) state: State<V>,
    pub(crate) neighbors: [Option<Neighbor>; 6],
    /// Direction of the link to the parent, if any.
    pub(crate) parent: Option<Direction>,
    pub(crate) creased: bool,
    pub(crate) next: NodeId,
    pub(crate) prev: NodeId,
    /// Axis whose children currently come first in the siblings ring.
    pub(crate) ring_axis: Axis,
    pub(crate) layout: Layout,
}

impl<V> Node<V> {
    fn new(generation: u32, id: NodeId, value: V) -> Self {
        let state = State::new(value);
        let ring_axis = state.preference.resolve(None);
        Self {
            generation,
            state,
            neighbors: [None; 6],
            parent: None,
            creased: false,
            next: id,
            prev: id,
            ring_axis,
            layout: Layout::default(),
        }
    }

    pub(crate) fn neighbor(&self, direction: Direction) -> Option<&Neighbor> {
        direction.slot().and_then(|i| self.neighbors[i].as_ref())
    }

    pub(crate) fn neighbor_mut(&mut self, direction: Direction) -> Option<&mut Neighbor> {
        direction.slot().and_then(|i| self.neighbors[i].as_mut())
    }

    /// The child linked in `direction`, skipping the parent link.
    pub(crate) fn child(&self, direction: Direction) -> Option<NodeId> {
        if self.parent == Some(direction) {
            return None;
        }
        self.neighbor(direction).map(|n| n.node)
    }

    pub(crate) fn is_paint_group_root(&self) -> bool {
        self.creased || self.parent.is_none()
    }
}

/// An arena of directionally linked nodes.
///
/// Nodes are created detached, as roots of their own one-node paint group, and linked with
/// [`DirectionTree::connect`]. Every edit marks the affected nodes dirty; a
/// [`CommitLayout`](crate::CommitLayout) brings their [`Layout`] up to date.
pub struct DirectionTree<V> {
    nodes: Vec<Option<Node<V>>>, // slots
    generations: Vec<u32>,       // last generation per slot (persists across frees)
    free_list: Vec<usize>,
}

impl<V> Default for DirectionTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> core::fmt::Debug for DirectionTree<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("DirectionTree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

impl<V> DirectionTree<V> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Number of slots ever allocated; an upper bound on the size of any ring.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Create a detached node holding `value`.
    pub fn new_node(&mut self, value: V) -> NodeId {
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId indices are 32-bit."
            )]
            let id = NodeId::new(idx as u32, generation);
            self.nodes[idx] = Some(Node::new(generation, id, value));
            id
        } else {
            let generation = 1_u32;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId indices are 32-bit."
            )]
            let id = NodeId::new(self.nodes.len() as u32, generation);
            self.nodes.push(Some(Node::new(generation, id, value)));
            self.generations.push(generation);
            id
        }
    }

    /// Free a detached node and its whole subtree, including nested paint groups.
    ///
    /// Fails with [`TreeError::NotRoot`] if the node is still connected to a parent.
    pub fn remove(&mut self, root: NodeId) -> Result<(), TreeError> {
        if self.node(root)?.parent.is_some() {
            return Err(TreeError::NotRoot);
        }
        let mut stack = alloc::vec![root];
        while let Some(id) = stack.pop() {
            let node = self.slot(id);
            stack.extend(Direction::ALL.iter().filter_map(|d| node.child(*d)));
            self.nodes[id.idx()] = None;
            self.free_list.push(id.idx());
        }
        tracing::debug!(?root, "removed subtree");
        Ok(())
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node<V>, TreeError> {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .filter(|n| n.generation == id.1)
            .ok_or(TreeError::StaleNode)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<V>, TreeError> {
        self.nodes
            .get_mut(id.idx())
            .and_then(|n| n.as_mut())
            .filter(|n| n.generation == id.1)
            .ok_or(TreeError::StaleNode)
    }

    /// Access a node reached through a link; panics if the link is dangling.
    pub(crate) fn slot(&self, id: NodeId) -> &Node<V> {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Mutable form of [`DirectionTree::slot`].
    pub(crate) fn slot_mut(&mut self, id: NodeId) -> &mut Node<V> {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    // --- state ---

    /// The node's state.
    pub fn state(&self, id: NodeId) -> Result<&State<V>, TreeError> {
        Ok(&self.node(id)?.state)
    }

    /// The node's payload.
    pub fn value(&self, id: NodeId) -> Result<&V, TreeError> {
        Ok(&self.node(id)?.state.value)
    }

    /// The node's cached layout.
    pub fn layout(&self, id: NodeId) -> Result<&Layout, TreeError> {
        Ok(&self.node(id)?.layout)
    }

    /// Replace the node's payload and return the old one.
    pub fn set_value(&mut self, id: NodeId, value: V) -> Result<V, TreeError> {
        let old = core::mem::replace(&mut self.node_mut(id)?.state.value, value);
        self.mark_dirty(id);
        Ok(old)
    }

    /// Set how the node absorbs its children's extents.
    pub fn set_fit(&mut self, id: NodeId, fit: Fit) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.state.fit != fit {
            node.state.fit = fit;
            self.mark_dirty(id);
        }
        Ok(())
    }

    /// Set the node's scale relative to its parent.
    pub fn set_scale(&mut self, id: NodeId, scale: f64) -> Result<(), TreeError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(TreeError::InvalidScale(scale));
        }
        let node = self.node_mut(id)?;
        if node.state.scale != scale {
            node.state.scale = scale;
            self.mark_dirty(id);
        }
        Ok(())
    }

    /// Mirror forward and backward children of this node.
    pub fn set_right_to_left(&mut self, id: NodeId, right_to_left: bool) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.state.right_to_left != right_to_left {
            node.state.right_to_left = right_to_left;
            self.mark_dirty(id);
        }
        Ok(())
    }

    /// Choose which axis the node lays out first.
    ///
    /// Re-threads the siblings ring when the resolved axis changes.
    pub fn set_layout_preference(
        &mut self,
        id: NodeId,
        preference: LayoutPreference,
    ) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.state.preference == preference {
            return Ok(());
        }
        node.state.preference = preference;
        self.sync_ring_axis(id);
        self.mark_dirty(id);
        Ok(())
    }

    fn child_neighbor_mut(
        &mut self,
        id: NodeId,
        direction: Direction,
    ) -> Result<&mut Neighbor, TreeError> {
        let node = self.node_mut(id)?;
        if node.parent == Some(direction) {
            return Err(TreeError::ParentDirection(direction));
        }
        node.neighbor_mut(direction)
            .ok_or(TreeError::NoNeighbor(direction))
    }

    /// Set how the child in `direction` is aligned against this node.
    pub fn set_alignment(
        &mut self,
        id: NodeId,
        direction: Direction,
        alignment: Alignment,
    ) -> Result<(), TreeError> {
        let neighbor = self.child_neighbor_mut(id, direction)?;
        if neighbor.alignment != alignment {
            neighbor.alignment = alignment;
            self.mark_dirty(id);
        }
        Ok(())
    }

    /// Set whether the child in `direction` may overlap this node's axis.
    pub fn set_axis_overlap(
        &mut self,
        id: NodeId,
        direction: Direction,
        axis_overlap: AxisOverlap,
    ) -> Result<(), TreeError> {
        let neighbor = self.child_neighbor_mut(id, direction)?;
        if neighbor.axis_overlap != axis_overlap {
            neighbor.axis_overlap = axis_overlap;
            self.mark_dirty(id);
        }
        Ok(())
    }

    // --- navigation ---

    /// The neighbor slot in `direction`, parent link included.
    pub fn neighbor(&self, id: NodeId, direction: Direction) -> Result<Option<&Neighbor>, TreeError> {
        Ok(self.node(id)?.neighbor(direction))
    }

    /// The node linked in `direction`, parent link included.
    pub fn node_at(&self, id: NodeId, direction: Direction) -> Result<Option<NodeId>, TreeError> {
        Ok(self.node(id)?.neighbor(direction).map(|n| n.node))
    }

    /// Whether any node is linked in `direction`.
    pub fn has_node(&self, id: NodeId, direction: Direction) -> Result<bool, TreeError> {
        Ok(self.node(id)?.neighbor(direction).is_some())
    }

    /// Direction from this node to its parent.
    pub fn parent_direction(&self, id: NodeId) -> Result<Option<Direction>, TreeError> {
        Ok(self.node(id)?.parent)
    }

    /// The node's parent.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        let node = self.node(id)?;
        Ok(node.parent.and_then(|d| node.neighbor(d)).map(|n| n.node))
    }

    /// Whether the node has no parent.
    pub fn is_root(&self, id: NodeId) -> Result<bool, TreeError> {
        Ok(self.node(id)?.parent.is_none())
    }

    /// The root of the tree containing this node.
    pub fn root(&self, id: NodeId) -> Result<NodeId, TreeError> {
        self.node(id)?;
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            current = parent;
        }
        Ok(current)
    }

    /// Children of the node with the directions they hang off, in slot order.
    pub fn children(
        &self,
        id: NodeId,
    ) -> Result<impl Iterator<Item = (Direction, NodeId)> + '_, TreeError> {
        let node = self.node(id)?;
        Ok(Direction::ALL
            .into_iter()
            .filter_map(move |d| node.child(d).map(|c| (d, c))))
    }

    pub(crate) fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        let node = self.slot(id);
        node.parent.and_then(|d| node.neighbor(d)).map(|n| n.node)
    }

    // --- structure ---

    /// Link `child` to `parent` in `direction`.
    ///
    /// `child` must be a root, must not contain `parent`, and the slot must be free. Unless
    /// `child` is creased it joins `parent`'s paint group and siblings ring.
    pub fn connect(
        &mut self,
        parent: NodeId,
        direction: Direction,
        child: NodeId,
    ) -> Result<(), TreeError> {
        if direction == Direction::Outward {
            return Err(TreeError::OutwardConnect);
        }
        let slot = direction.slot().ok_or(TreeError::NullDirection)?;
        let reverse_slot = direction
            .reverse()
            .slot()
            .ok_or(TreeError::NullDirection)?;
        if self.node(parent)?.neighbors[slot].is_some() {
            return Err(TreeError::Occupied(direction));
        }
        let child_node = self.node(child)?;
        if child_node.parent.is_some() {
            return Err(TreeError::AlreadyParented);
        }
        if child_node.neighbors[reverse_slot].is_some() {
            return Err(TreeError::Occupied(direction.reverse()));
        }
        if self.root(parent)? == child {
            return Err(TreeError::WouldCycle);
        }

        // Both sides of the link are written before any other side effect.
        self.slot_mut(parent).neighbors[slot] = Some(Neighbor::new(child));
        let child_node = self.slot_mut(child);
        child_node.neighbors[reverse_slot] = Some(Neighbor::new(parent));
        child_node.parent = Some(direction.reverse());

        self.sync_ring_axis(child);
        if !self.slot(child).creased {
            self.insert_into_layout(parent, direction);
        }
        debug_assert!(self.verify(parent).is_ok(), "siblings ring broken by connect");
        self.mark_dirty(child);
        tracing::debug!(?parent, ?direction, ?child, "connected");
        Ok(())
    }

    /// Unlink the child in `direction` and return it as an independent root.
    pub fn disconnect(&mut self, parent: NodeId, direction: Direction) -> Result<NodeId, TreeError> {
        let slot = direction.slot().ok_or(TreeError::NullDirection)?;
        let node = self.node(parent)?;
        if node.parent == Some(direction) {
            return Err(TreeError::ParentDirection(direction));
        }
        let child = node.neighbors[slot]
            .ok_or(TreeError::NoNeighbor(direction))?
            .node;
        let reverse_slot = direction
            .reverse()
            .slot()
            .ok_or(TreeError::NullDirection)?;

        self.slot_mut(parent).neighbors[slot] = None;
        let child_node = self.slot_mut(child);
        child_node.neighbors[reverse_slot] = None;
        child_node.parent = None;

        if !self.slot(child).creased {
            self.remove_from_layout(child);
        }
        self.sync_ring_axis(child);
        debug_assert!(self.verify(parent).is_ok(), "siblings ring broken by disconnect");
        debug_assert!(self.verify(child).is_ok(), "siblings ring broken by disconnect");
        self.mark_dirty(parent);
        self.mark_dirty(child);
        tracing::debug!(?parent, ?direction, ?child, "disconnected");
        Ok(child)
    }

    /// Mark the node's layout stale.
    ///
    /// The node and every ancestor up to the root are marked `NeedsCommit`, so every paint
    /// group on the path is recommitted and no other group is. The node and all of its
    /// descendants report [`Layout::needs_absolute_pos`] until the next commit places them.
    pub fn layout_changed(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.node(id)?;
        self.mark_dirty(id);
        Ok(())
    }

    /// Mark `id` and its ancestors dirty, stopping at the first ancestor already dirty.
    ///
    /// Every node in `id`'s subtree, nested paint groups included, also needs a new absolute
    /// position.
    pub(crate) fn mark_dirty(&mut self, id: NodeId) {
        let mut stack = alloc::vec![id];
        while let Some(current) = stack.pop() {
            self.slot_mut(current)
                .layout
                .flags
                .insert(DirtyFlags::NEEDS_ABSOLUTE_POS);
            let node = self.slot(current);
            stack.extend(Direction::ALL.iter().filter_map(|d| node.child(*d)));
        }

        let mut current = id;
        let mut first = true;
        loop {
            let layout = &mut self.slot_mut(current).layout;
            if !first && layout.flags.contains(DirtyFlags::NEEDS_COMMIT) {
                break;
            }
            layout.flags.insert(DirtyFlags::NEEDS_COMMIT);
            layout.state = LayoutState::NeedsCommit;
            first = false;
            match self.parent_of(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
    }
}
