// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint groups: the unit of painting and of position propagation.
//!
//! A root is always a paint-group root. Creasing a node makes it the root of a nested group
//! holding itself and every uncreased descendant; its siblings ring is cut out of the parent's.

use alloc::vec::Vec;

use kurbo::Point;

use crate::error::TreeError;
use crate::tree::DirectionTree;
use crate::types::{Direction, LayoutState, NodeId};

impl<V> DirectionTree<V> {
    /// Make `id` the root of its own paint group. No-op if it already is creased.
    pub fn crease(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.node(id)?;
        if node.creased {
            return Ok(());
        }
        let has_parent = node.parent.is_some();
        if has_parent {
            self.remove_from_layout(id);
        }
        self.slot_mut(id).creased = true;
        debug_assert!(self.verify(id).is_ok(), "siblings ring broken by crease");
        self.mark_dirty(id);
        tracing::debug!(node = ?id, "creased");
        Ok(())
    }

    /// Fold a creased node back into its parent's paint group. No-op if it is not creased.
    pub fn uncrease(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.node(id)?;
        if !node.creased {
            return Ok(());
        }
        let parent_link = node.parent.and_then(|d| node.neighbor(d).map(|n| (d, n.node)));
        self.slot_mut(id).creased = false;
        if let Some((direction, parent)) = parent_link {
            self.insert_into_layout(parent, direction.reverse());
            debug_assert!(self.verify(parent).is_ok(), "siblings ring broken by uncrease");
        }
        self.mark_dirty(id);
        tracing::debug!(node = ?id, "uncreased");
        Ok(())
    }

    /// Whether the node is creased.
    pub fn is_creased(&self, id: NodeId) -> Result<bool, TreeError> {
        Ok(self.node(id)?.creased)
    }

    /// Whether the node roots a paint group: it is creased or has no parent.
    pub fn is_paint_group_root(&self, id: NodeId) -> Result<bool, TreeError> {
        Ok(self.node(id)?.is_paint_group_root())
    }

    /// The root of the paint group containing `id`.
    pub fn paint_group(&self, id: NodeId) -> Result<NodeId, TreeError> {
        self.node(id)?;
        Ok(self.group_root(id))
    }

    pub(crate) fn group_root(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while !self.slot(current).is_paint_group_root() {
            match self.parent_of(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }

    /// Creased children of any member of `group`'s ring, in ring order.
    pub(crate) fn nested_group_roots(&self, group: NodeId) -> Vec<NodeId> {
        let mut roots = Vec::new();
        for member in self.siblings(group).into_iter().flatten() {
            let node = self.slot(member);
            roots.extend(
                Direction::ALL
                    .iter()
                    .filter_map(|d| node.child(*d))
                    .filter(|c| self.slot(*c).creased),
            );
        }
        roots
    }

    /// Visit every paint group at or below `id`'s group, parents before nested groups.
    pub fn for_each_paint_group(
        &self,
        id: NodeId,
        mut f: impl FnMut(NodeId),
    ) -> Result<(), TreeError> {
        let mut stack = alloc::vec![self.paint_group(id)?];
        while let Some(group) = stack.pop() {
            f(group);
            stack.extend(self.nested_group_roots(group).into_iter().rev());
        }
        Ok(())
    }

    /// The node whose committed body contains `(x, y)` in a view scaled by `scale`.
    ///
    /// Searches every paint group below `root`'s group and returns the match painted last,
    /// so nested groups win over their ancestors. Nodes that were never committed are skipped.
    pub fn node_under_coords(
        &self,
        root: NodeId,
        x: f64,
        y: f64,
        scale: f64,
    ) -> Result<Option<NodeId>, TreeError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(TreeError::InvalidScale(scale));
        }
        let point = Point::new(x / scale, y / scale);
        let mut hit = None;
        self.for_each_paint_group(root, |group| {
            for member in self.siblings(group).into_iter().flatten() {
                let layout = &self.slot(member).layout;
                if layout.state == LayoutState::Null {
                    continue;
                }
                // Half-open like kurbo's Rect::contains.
                if layout.absolute_bounds().contains(point) {
                    hit = Some(member);
                }
            }
        })?;
        Ok(hit)
    }
}
