// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The resumable layout solver.
//!
//! A [`CommitLayout`] borrows the tree mutably and brings every dirty node up to date in three
//! passes, each driven by [`CommitLayout::crank`]:
//!
//! 1. **Extents**, children before parents. Nested dirty paint groups are committed before the
//!    group containing them, and each group's siblings ring is walked backwards, so every child
//!    is committed before its parent reads its extents.
//! 2. **Positions**, parents before children. Absolute centers and scales are derived from the
//!    offsets recorded on each parent's neighbor slots.
//! 3. **Paint**, once per paint group whose extents or placement changed.
//!
//! Each crank does a bounded amount of work ([`LayoutConfig::crank_budget`]) and returns
//! whether more remains.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use kurbo::{Point, Size, Vec2};
use understory_extent::Extent;

use crate::error::{CommitError, TreeError};
use crate::layout::Layout;
use crate::tree::DirectionTree;
use crate::types::{
    Alignment, Axis, AxisOverlap, Direction, DirtyFlags, Fit, LayoutState, NodeId, layout_order,
};

/// Callbacks the solver uses to measure, space, and paint nodes.
///
/// Every callback receives the tree by shared reference, so it can read node values and
/// committed layouts but cannot edit the tree mid-commit.
pub trait Painter<V> {
    /// Error reported by a callback; returned unmodified as [`CommitError::Callback`].
    type Error: core::fmt::Debug;

    /// The size of the node's own content, before any inward child is added.
    fn size(&mut self, tree: &DirectionTree<V>, node: NodeId) -> Result<Size, Self::Error>;

    /// Extra distance between `node` and the child `neighbor` in `direction`.
    ///
    /// For an inward child this is the padding around it inside the node's body.
    fn separation(
        &mut self,
        tree: &DirectionTree<V>,
        node: NodeId,
        neighbor: NodeId,
        direction: Direction,
        axis_overlap: AxisOverlap,
        line_thickness: f64,
    ) -> Result<f64, Self::Error> {
        let _ = (tree, node, neighbor, direction, axis_overlap, line_thickness);
        Ok(0.0)
    }

    /// Paint the group rooted at `group_root`. Return true to be painted again on a later crank.
    fn paint(&mut self, tree: &DirectionTree<V>, group_root: NodeId) -> bool {
        let _ = (tree, group_root);
        false
    }
}

impl<V, P: Painter<V> + ?Sized> Painter<V> for &mut P {
    type Error = P::Error;

    fn size(&mut self, tree: &DirectionTree<V>, node: NodeId) -> Result<Size, Self::Error> {
        (**self).size(tree, node)
    }

    fn separation(
        &mut self,
        tree: &DirectionTree<V>,
        node: NodeId,
        neighbor: NodeId,
        direction: Direction,
        axis_overlap: AxisOverlap,
        line_thickness: f64,
    ) -> Result<f64, Self::Error> {
        (**self).separation(tree, node, neighbor, direction, axis_overlap, line_thickness)
    }

    fn paint(&mut self, tree: &DirectionTree<V>, group_root: NodeId) -> bool {
        (**self).paint(tree, group_root)
    }
}

/// Knobs for a [`CommitLayout`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Units of work per [`CommitLayout::crank`]: node commits in the extents pass, nodes
    /// positioned in the positions pass, groups painted in the paint pass. At least 1.
    pub crank_budget: usize,
    /// Thickness of connecting lines, forwarded to [`Painter::separation`].
    pub line_thickness: f64,
    /// Absolute center of the tree root.
    pub root_position: Point,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            crank_budget: 64,
            line_thickness: 0.0,
            root_position: Point::ORIGIN,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Extents,
    Positions,
    Paint,
}

/// A resumable commit of one tree.
///
/// Dropping a `CommitLayout` part way leaves the remaining nodes dirty; a new one picks up
/// where it left off.
pub struct CommitLayout<'t, V, P> {
    tree: &'t mut DirectionTree<V>,
    root: NodeId,
    painter: P,
    config: LayoutConfig,
    phase: Phase,
    /// Extents worklist, popped from the end.
    nodes: Vec<NodeId>,
    /// Groups left to position, popped from the end.
    groups: Vec<NodeId>,
    paint: VecDeque<NodeId>,
    follow_ups: Vec<NodeId>,
}

impl<V, P> core::fmt::Debug for CommitLayout<'_, V, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CommitLayout")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("pending_nodes", &self.nodes.len())
            .field("pending_groups", &self.groups.len())
            .field("pending_paint", &self.paint.len())
            .field("follow_ups", &self.follow_ups.len())
            .finish_non_exhaustive()
    }
}

impl<'t, V, P: Painter<V>> CommitLayout<'t, V, P> {
    /// Prepare to commit the tree rooted at `root` with the default configuration.
    pub fn new(tree: &'t mut DirectionTree<V>, root: NodeId, painter: P) -> Self {
        Self::with_config(tree, root, painter, LayoutConfig::default())
    }

    /// Prepare to commit the tree rooted at `root`.
    pub fn with_config(
        tree: &'t mut DirectionTree<V>,
        root: NodeId,
        painter: P,
        config: LayoutConfig,
    ) -> Self {
        Self {
            tree,
            root,
            painter,
            config,
            phase: Phase::Idle,
            nodes: Vec::new(),
            groups: Vec::new(),
            paint: VecDeque::new(),
            follow_ups: Vec::new(),
        }
    }

    /// The tree being committed.
    pub fn tree(&self) -> &DirectionTree<V> {
        self.tree
    }

    /// The configuration in use.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// The painter.
    pub fn painter(&self) -> &P {
        &self.painter
    }

    /// Mutable access to the painter between cranks.
    pub fn painter_mut(&mut self) -> &mut P {
        &mut self.painter
    }

    /// Give the painter back.
    pub fn into_painter(self) -> P {
        self.painter
    }

    /// Do a bounded amount of work. Returns `Ok(true)` while more work remains.
    ///
    /// Once the tree is committed and no follow-up paints are queued this returns `Ok(false)`
    /// without invoking any callback. On a callback error the failing node stays dirty and the
    /// crank can be retried.
    pub fn crank(&mut self) -> Result<bool, CommitError<P::Error>> {
        let mut budget = self.config.crank_budget.max(1);
        loop {
            match self.phase {
                Phase::Idle => {
                    let root = self.tree.node(self.root)?;
                    if root.parent.is_some() {
                        return Err(TreeError::NotRoot.into());
                    }
                    if root.layout.state != LayoutState::Committed {
                        self.plan_extents();
                        tracing::debug!(root = ?self.root, nodes = self.nodes.len(), "commit started");
                        self.phase = Phase::Extents;
                    } else if !self.follow_ups.is_empty() {
                        self.paint.extend(self.follow_ups.drain(..));
                        self.phase = Phase::Paint;
                    } else {
                        return Ok(false);
                    }
                }
                Phase::Extents => {
                    while budget > 0 {
                        let Some(id) = self.nodes.pop() else {
                            break;
                        };
                        if let Err(err) = self.commit_node(id) {
                            self.nodes.push(id);
                            return Err(err);
                        }
                        budget -= 1;
                    }
                    if self.nodes.is_empty() {
                        self.start_positions();
                        self.phase = Phase::Positions;
                    }
                    if budget == 0 {
                        return Ok(true);
                    }
                }
                Phase::Positions => {
                    while budget > 0 {
                        let Some(group) = self.groups.pop() else {
                            break;
                        };
                        budget = budget.saturating_sub(self.position_group(group));
                    }
                    if self.groups.is_empty() {
                        self.phase = Phase::Paint;
                    }
                    if budget == 0 {
                        return Ok(true);
                    }
                }
                Phase::Paint => {
                    while budget > 0 {
                        let Some(group) = self.paint.pop_front() else {
                            break;
                        };
                        self.paint_group(group);
                        budget -= 1;
                    }
                    if self.paint.is_empty() {
                        self.phase = Phase::Idle;
                        tracing::debug!(root = ?self.root, follow_ups = self.follow_ups.len(), "commit finished");
                        return Ok(!self.follow_ups.is_empty());
                    }
                    return Ok(true);
                }
            }
        }
    }

    /// Crank until no work remains.
    ///
    /// Loops forever if the painter keeps asking to be painted again.
    pub fn run(&mut self) -> Result<(), CommitError<P::Error>> {
        while self.crank()? {}
        Ok(())
    }

    /// Queue every dirty node, nested groups before the group holding them and each ring
    /// walked backwards.
    fn plan_extents(&mut self) {
        let tree = &*self.tree;
        let mut order = Vec::new();
        let mut stack = alloc::vec![(self.root, false)];
        while let Some((group, expanded)) = stack.pop() {
            if expanded {
                let members: Vec<NodeId> = tree.siblings(group).into_iter().flatten().collect();
                order.extend(
                    members
                        .into_iter()
                        .rev()
                        .filter(|m| tree.slot(*m).layout.needs_commit()),
                );
            } else {
                stack.push((group, true));
                stack.extend(
                    tree.nested_group_roots(group)
                        .into_iter()
                        .filter(|n| tree.slot(*n).layout.needs_commit())
                        .map(|n| (n, false)),
                );
            }
        }
        order.reverse();
        self.nodes = order;
    }

    fn commit_node(&mut self, id: NodeId) -> Result<(), CommitError<P::Error>> {
        let layout = &mut self.tree.slot_mut(id).layout;
        // A dirty node is only ever `InCommit` if a plan queued it twice.
        if layout.state == LayoutState::InCommit && layout.needs_commit() {
            return Err(CommitError::Reentrant(id));
        }
        layout.state = LayoutState::InCommit;

        let measured = match measure(&*self.tree, &mut self.painter, &self.config, id) {
            Ok(measured) => measured,
            Err(err) => {
                tracing::warn!(node = ?id, error = ?err, "node commit failed");
                self.tree.slot_mut(id).layout.state = LayoutState::NeedsCommit;
                return Err(err);
            }
        };

        let node = self.tree.slot_mut(id);
        for neighbor in node.neighbors.iter_mut().flatten() {
            neighbor.clear_committed();
        }
        for placement in &measured.placements {
            if let Some(neighbor) = node.neighbor_mut(placement.direction) {
                neighbor.separation = placement.separation;
                neighbor.line_length = placement.line_length;
                neighbor.offset = placement.offset;
            }
        }
        let layout = &mut node.layout;
        layout.body = measured.body;
        layout.extents = measured.extents;
        layout.offsets = measured.offsets;
        layout.flags.remove(DirtyFlags::NEEDS_COMMIT);
        layout.flags.insert(DirtyFlags::NEEDS_ABSOLUTE_POS);
        let group = self.tree.group_root(id);
        self.tree
            .slot_mut(group)
            .layout
            .flags
            .insert(DirtyFlags::NEEDS_ABSOLUTE_POS | DirtyFlags::NEEDS_PAINT);
        tracing::trace!(node = ?id, body = ?measured.body, "node committed");
        Ok(())
    }

    fn start_positions(&mut self) {
        let root = self.root;
        if self.place(root) {
            self.tree.slot_mut(root).layout.flags.insert(DirtyFlags::NEEDS_PAINT);
        }
        self.groups.push(root);
    }

    /// Place every member of `group` after its root, queue the group for painting if needed,
    /// and queue nested groups that moved or changed. Returns the number of nodes placed.
    fn position_group(&mut self, group: NodeId) -> usize {
        let members: Vec<NodeId> = self.tree.siblings(group).into_iter().flatten().collect();
        for member in members.iter().skip(1) {
            self.place(*member);
        }
        if self
            .tree
            .slot(group)
            .layout
            .flags
            .contains(DirtyFlags::NEEDS_PAINT)
        {
            self.paint.push_back(group);
        }
        let mut nested = Vec::new();
        for root in self.tree.nested_group_roots(group) {
            let pending = self
                .tree
                .slot(root)
                .layout
                .flags
                .intersects(DirtyFlags::NEEDS_ABSOLUTE_POS | DirtyFlags::NEEDS_PAINT);
            let moved = self.place(root);
            if moved {
                self.tree.slot_mut(root).layout.flags.insert(DirtyFlags::NEEDS_PAINT);
            }
            if moved || pending {
                nested.push(root);
            }
        }
        let placed = members.len() + nested.len();
        self.groups.extend(nested.into_iter().rev());
        placed
    }

    /// Derive `id`'s absolute center and scale from its parent. Returns whether either changed.
    fn place(&mut self, id: NodeId) -> bool {
        let tree = &mut *self.tree;
        let node = tree.slot(id);
        let (position, scale) = match node.parent.zip(tree.parent_of(id)) {
            Some((direction, parent)) => {
                let parent = tree.slot(parent);
                let offset = parent
                    .neighbor(direction.reverse())
                    .map(|n| n.offset)
                    .unwrap_or(Vec2::ZERO);
                (
                    parent.layout.position + offset * parent.layout.scale,
                    parent.layout.scale * node.state.scale,
                )
            }
            None => (self.config.root_position, node.state.scale),
        };
        let layout = &mut tree.slot_mut(id).layout;
        let changed = layout.position != position || layout.scale != scale;
        layout.position = position;
        layout.scale = scale;
        layout.flags.remove(DirtyFlags::NEEDS_ABSOLUTE_POS);
        changed
    }

    fn paint_group(&mut self, group: NodeId) {
        let again = self.painter.paint(&*self.tree, group);
        let members: Vec<NodeId> = self.tree.siblings(group).into_iter().flatten().collect();
        for member in members {
            let layout = &mut self.tree.slot_mut(member).layout;
            if !layout.needs_commit() {
                layout.state = LayoutState::Committed;
            }
        }
        self.tree
            .slot_mut(group)
            .layout
            .flags
            .remove(DirtyFlags::NEEDS_PAINT);
        tracing::debug!(group = ?group, again, "paint group painted");
        if again {
            self.follow_ups.push(group);
        }
    }
}

/// Placement of one child, recorded on the parent's neighbor slot.
struct Placement {
    direction: Direction,
    separation: f64,
    line_length: f64,
    offset: Vec2,
}

struct Measured {
    body: Size,
    extents: [Extent; 4],
    offsets: [f64; 4],
    placements: Vec<Placement>,
}

/// Compute `id`'s body, extents, and child placements from its committed children.
fn measure<V, P: Painter<V>>(
    tree: &DirectionTree<V>,
    painter: &mut P,
    config: &LayoutConfig,
    id: NodeId,
) -> Result<Measured, CommitError<P::Error>> {
    let node = tree.slot(id);
    let content = painter.size(tree, id).map_err(CommitError::Callback)?;
    let mut placements = Vec::new();
    let mut body = content;

    if let Some((child_id, neighbor)) = node
        .child(Direction::Inward)
        .zip(node.neighbor(Direction::Inward))
    {
        let child = tree.slot(child_id);
        let k = child.state.scale;
        let size = child.layout.extent_size() * k;
        let padding = painter
            .separation(
                tree,
                id,
                child_id,
                Direction::Inward,
                neighbor.axis_overlap,
                config.line_thickness,
            )
            .map_err(CommitError::Callback)?;
        let (w, h) = (content.width, content.height);
        let (sw, sh) = (size.width + 2.0 * padding, size.height + 2.0 * padding);
        // Top-left corner of the child's bounding box, relative to the grown body's center.
        let (grown, corner) = match neighbor.alignment {
            Alignment::InwardVertical => {
                let grown = Size::new(w.max(sw), h + sh);
                let corner = Point::new(-size.width / 2.0, -grown.height / 2.0 + h + padding);
                (grown, corner)
            }
            Alignment::InwardHorizontal => {
                let grown = Size::new(w + sw, h.max(sh));
                let corner = Point::new(-grown.width / 2.0 + w + padding, -size.height / 2.0);
                (grown, corner)
            }
            _ => (
                Size::new(w.max(sw), h.max(sh)),
                Point::new(-size.width / 2.0, -size.height / 2.0),
            ),
        };
        let offset = Vec2::new(
            corner.x + child.layout.offsets[UPWARD] * k,
            corner.y + child.layout.offsets[FORWARD] * k,
        );
        placements.push(Placement {
            direction: Direction::Inward,
            separation: padding,
            line_length: 0.0,
            offset,
        });
        body = grown;
    }

    let mut own = Layout::default();
    own.seed_extents(body)?;
    let Layout {
        mut extents,
        mut offsets,
        ..
    } = own;

    for direction in layout_order(node.ring_axis).into_iter().skip(1) {
        let Some((child_id, neighbor)) = node.child(direction).zip(node.neighbor(direction))
        else {
            continue;
        };
        let horizontal = direction.axis() == Axis::Horizontal;
        let physical = if horizontal && node.state.right_to_left {
            direction.reverse()
        } else {
            direction
        };
        let (Some(near), Some(far)) = (
            physical.extent_index(),
            physical.reverse().extent_index(),
        ) else {
            continue;
        };
        let child = tree.slot(child_id);
        let k = child.state.scale;
        let facing = &child.layout.extents[far];
        let facing_offset = child.layout.offsets[far];

        let half = if horizontal {
            body.height / 2.0
        } else {
            body.width / 2.0
        };
        let along = match neighbor.alignment {
            Alignment::Negative => -half + facing_offset * k,
            Alignment::Positive => half - (facing.total_length() - facing_offset) * k,
            _ => 0.0,
        };
        let start = offsets[near] + along - facing_offset * k;
        let fitted = extents[near]
            .separation(facing, start, neighbor.axis_overlap.allows(), k)
            .inspect_err(|err| tracing::warn!(node = ?id, error = ?err, "separation failed"))?;
        let extra = painter
            .separation(
                tree,
                id,
                child_id,
                direction,
                neighbor.axis_overlap,
                config.line_thickness,
            )
            .map_err(CommitError::Callback)?;
        let separation = fitted + extra;

        let reach = physical.sign() * separation;
        let child_body = child.layout.body * k;
        let (offset, line_length) = if horizontal {
            (
                Vec2::new(reach, along),
                separation - body.width / 2.0 - child_body.width / 2.0,
            )
        } else {
            (
                Vec2::new(along, reach),
                separation - body.height / 2.0 - child_body.height / 2.0,
            )
        };
        placements.push(Placement {
            direction,
            separation,
            line_length: line_length.max(0.0),
            offset,
        });

        if node.state.fit == Fit::Naive {
            continue;
        }
        for (j, side) in Direction::PLANAR.into_iter().enumerate() {
            let given = &child.layout.extents[j];
            if given.is_empty() {
                continue;
            }
            // Forward/backward extents run along y, upward/downward along x.
            let shift = if j < 2 { offset.y } else { offset.x };
            let size_adjustment = match side {
                Direction::Forward => offset.x,
                Direction::Backward => -offset.x,
                Direction::Upward => -offset.y,
                _ => offset.y,
            };
            let length_adjustment = offsets[j] + shift - child.layout.offsets[j] * k;
            if node.state.fit == Fit::Loose {
                let mut simplified = given.clone();
                simplified.simplify();
                extents[j].combine_extent(&simplified, length_adjustment, size_adjustment, k)?;
            } else {
                extents[j].combine_extent(given, length_adjustment, size_adjustment, k)?;
            }
            if length_adjustment < 0.0 {
                offsets[j] -= length_adjustment;
            }
        }
    }

    Ok(Measured {
        body,
        extents,
        offsets,
        placements,
    })
}

const FORWARD: usize = 0;
const UPWARD: usize = 2;
