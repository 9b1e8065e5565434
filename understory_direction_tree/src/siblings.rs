// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The siblings ring: a circular, doubly linked list threading every member of a paint group.
//!
//! The ring visits a group in layout pre-order. Each node is followed by its inward child's
//! segment, then the segments of its preferred-axis children, then those of the other axis.
//! A creased child and everything below it form a separate ring.

use crate::error::TreeError;
use crate::tree::DirectionTree;
use crate::types::{Axis, Direction, NodeId, layout_order};

impl<V> DirectionTree<V> {
    /// Child in `direction` that shares `id`'s ring.
    pub(crate) fn linked_child(&self, id: NodeId, direction: Direction) -> Option<NodeId> {
        self.slot(id)
            .child(direction)
            .filter(|c| !self.slot(*c).creased)
    }

    /// Last node of `id`'s segment in its ring.
    pub(crate) fn tail(&self, id: NodeId) -> NodeId {
        let mut current = id;
        loop {
            let order = layout_order(self.slot(current).ring_axis);
            match order
                .iter()
                .rev()
                .find_map(|d| self.linked_child(current, *d))
            {
                Some(child) => current = child,
                None => return current,
            }
        }
    }

    /// Splice the (already linked) child in `direction` into `parent`'s ring.
    pub(crate) fn insert_into_layout(&mut self, parent: NodeId, direction: Direction) {
        let Some(child) = self.linked_child(parent, direction) else {
            return;
        };
        let order = layout_order(self.slot(parent).ring_axis);
        let position = order
            .iter()
            .position(|d| *d == direction)
            .unwrap_or(order.len());
        let predecessor = order[..position]
            .iter()
            .rev()
            .find_map(|d| self.linked_child(parent, *d))
            .map(|c| self.tail(c))
            .unwrap_or(parent);

        let child_last = self.slot(child).prev;
        let after = self.slot(predecessor).next;
        self.slot_mut(predecessor).next = child;
        self.slot_mut(child).prev = predecessor;
        self.slot_mut(child_last).next = after;
        self.slot_mut(after).prev = child_last;
    }

    /// Cut `child`'s segment out of its ring and close it into a ring of its own.
    pub(crate) fn remove_from_layout(&mut self, child: NodeId) {
        let last = self.tail(child);
        let before = self.slot(child).prev;
        let after = self.slot(last).next;
        if before == last {
            // Already its own ring.
            return;
        }
        self.slot_mut(before).next = after;
        self.slot_mut(after).prev = before;
        self.slot_mut(last).next = child;
        self.slot_mut(child).prev = last;
    }

    /// Bring `id`'s ring order in line with its resolved layout preference.
    pub(crate) fn sync_ring_axis(&mut self, id: NodeId) {
        let node = self.slot(id);
        let resolved = node.state.preference.resolve(node.parent);
        match (node.ring_axis, resolved) {
            (Axis::Horizontal, Axis::Vertical) => self.horz_to_vert(id),
            (Axis::Vertical, Axis::Horizontal) => self.vert_to_horz(id),
            _ => {}
        }
    }

    /// Re-thread `id`'s children so the vertical ones come first.
    pub(crate) fn horz_to_vert(&mut self, id: NodeId) {
        if self.slot(id).ring_axis == Axis::Horizontal {
            self.swap_axis_runs(id, Axis::Vertical);
        }
    }

    /// Re-thread `id`'s children so the horizontal ones come first.
    pub(crate) fn vert_to_horz(&mut self, id: NodeId) {
        if self.slot(id).ring_axis == Axis::Vertical {
            self.swap_axis_runs(id, Axis::Horizontal);
        }
    }

    /// First node and last node of the ring run holding `id`'s linked children on `axis`.
    fn axis_run(&self, id: NodeId, axis: Axis) -> Option<(NodeId, NodeId)> {
        let pair = [axis.negative(), axis.positive()];
        let first = pair.iter().find_map(|d| self.linked_child(id, *d))?;
        let last = pair.iter().rev().find_map(|d| self.linked_child(id, *d))?;
        Some((first, self.tail(last)))
    }

    fn swap_axis_runs(&mut self, id: NodeId, to: Axis) {
        let from = to.perpendicular();
        if let (Some((a_first, a_last)), Some((b_first, b_last))) =
            (self.axis_run(id, from), self.axis_run(id, to))
        {
            // [before][a_first..a_last][b_first..b_last][after] becomes
            // [before][b_first..b_last][a_first..a_last][after].
            let before = self.slot(a_first).prev;
            let after = self.slot(b_last).next;
            self.slot_mut(before).next = b_first;
            self.slot_mut(b_first).prev = before;
            self.slot_mut(b_last).next = a_first;
            self.slot_mut(a_first).prev = b_last;
            self.slot_mut(a_last).next = after;
            self.slot_mut(after).prev = a_last;
        }
        self.slot_mut(id).ring_axis = to;
    }

    /// Walk the ring from `id` and check that it closes with consistent back links.
    ///
    /// Returns the ring length.
    pub fn verify(&self, id: NodeId) -> Result<usize, TreeError> {
        self.node(id)?;
        let broken = |steps| TreeError::BrokenSiblings { node: id, steps };
        let mut current = id;
        for steps in 1..=self.capacity() {
            let next = self.slot(current).next;
            if !self.is_alive(next) || self.slot(next).prev != current {
                return Err(broken(steps));
            }
            if next == id {
                return Ok(steps);
            }
            current = next;
        }
        Err(broken(self.capacity()))
    }

    /// Members of `id`'s ring, starting at `id` and following the ring forward.
    pub fn siblings(&self, id: NodeId) -> Result<Siblings<'_, V>, TreeError> {
        self.node(id)?;
        Ok(Siblings {
            tree: self,
            start: id,
            next: Some(id),
            remaining: self.capacity(),
        })
    }

    /// Call `f` for each member of `id`'s ring, in ring order.
    pub fn for_each_node(
        &self,
        id: NodeId,
        mut f: impl FnMut(NodeId),
    ) -> Result<(), TreeError> {
        for node in self.siblings(id)? {
            f(node);
        }
        Ok(())
    }
}

/// Iterator over a siblings ring; see [`DirectionTree::siblings`].
pub struct Siblings<'a, V> {
    tree: &'a DirectionTree<V>,
    start: NodeId,
    next: Option<NodeId>,
    remaining: usize,
}

impl<V> Iterator for Siblings<'_, V> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.remaining = self.remaining.checked_sub(1)?;
        let following = self.tree.slot(current).next;
        self.next = (following != self.start).then_some(following);
        Some(current)
    }
}

impl<V> core::fmt::Debug for Siblings<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Siblings")
            .field("start", &self.start)
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}
