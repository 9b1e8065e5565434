// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One endpoint of a directional edge.

use kurbo::Vec2;

use crate::types::{Alignment, AxisOverlap, NodeId};

/// A neighbor slot: the linked node plus the edge's layout metadata.
///
/// The metadata on a parent's slot describes how the child is placed. The committed fields
/// (`separation`, `line_length`, `offset`) are written by
/// [`CommitLayout`](crate::CommitLayout) and are meaningful once the parent is committed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub(crate) node: NodeId,
    pub(crate) alignment: Alignment,
    pub(crate) axis_overlap: AxisOverlap,
    pub(crate) separation: f64,
    pub(crate) line_length: f64,
    pub(crate) offset: Vec2,
}

impl Neighbor {
    pub(crate) fn new(node: NodeId) -> Self {
        Self {
            node,
            alignment: Alignment::default(),
            axis_overlap: AxisOverlap::default(),
            separation: 0.0,
            line_length: 0.0,
            offset: Vec2::ZERO,
        }
    }

    /// The linked node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Perpendicular placement of the linked node.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Axis overlap policy for the linked node.
    pub fn axis_overlap(&self) -> AxisOverlap {
        self.axis_overlap
    }

    /// Committed center-to-center distance along the edge's axis.
    ///
    /// For an inward neighbor this is the padding around it.
    pub fn separation(&self) -> f64 {
        self.separation
    }

    /// Committed length of the connecting line, from body edge to body edge.
    pub fn line_length(&self) -> f64 {
        self.line_length
    }

    /// Committed offset of the linked node's center from this node's center, in this node's
    /// units.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub(crate) fn clear_committed(&mut self) {
        self.separation = 0.0;
        self.line_length = 0.0;
        self.offset = Vec2::ZERO;
    }
}
