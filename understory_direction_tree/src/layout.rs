// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node cached geometry.

use kurbo::{Point, Rect, Size};
use understory_extent::{Extent, ExtentError};

use crate::types::{Direction, DirtyFlags, LayoutState};

/// Cached layout of one node and its subtree.
///
/// Extents are measured from the node's center in the node's own units: the forward and
/// backward extents run top to bottom, the upward and downward extents run left to right, and
/// each extent's offset is the distance from its start to the node's center. Absolute values are
/// in tree coordinates.
#[derive(Clone, Debug)]
pub struct Layout {
    pub(crate) body: Size,
    pub(crate) extents: [Extent; 4],
    pub(crate) offsets: [f64; 4],
    pub(crate) position: Point,
    pub(crate) scale: f64,
    pub(crate) flags: DirtyFlags,
    pub(crate) state: LayoutState,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            body: Size::ZERO,
            extents: core::array::from_fn(|_| Extent::new()),
            offsets: [0.0; 4],
            position: Point::ORIGIN,
            scale: 1.0,
            flags: DirtyFlags::NEEDS_COMMIT | DirtyFlags::NEEDS_ABSOLUTE_POS,
            state: LayoutState::Null,
        }
    }
}

impl Layout {
    /// The subtree's extent in `direction`; `None` for inward, outward, and null.
    pub fn extents_at(&self, direction: Direction) -> Option<&Extent> {
        direction.extent_index().map(|i| &self.extents[i])
    }

    /// Distance from the start of the extent in `direction` to the node's center.
    pub fn extent_offset_at(&self, direction: Direction) -> Option<f64> {
        direction.extent_index().map(|i| self.offsets[i])
    }

    /// Width and height of the subtree's bounding box, in the node's units.
    pub fn extent_size(&self) -> Size {
        Size::new(
            self.extents[2].total_length(),
            self.extents[0].total_length(),
        )
    }

    /// The node's own box, including any inward child.
    pub fn body_size(&self) -> Size {
        self.body
    }

    /// Absolute position of the node's center.
    pub fn absolute_position(&self) -> Point {
        self.position
    }

    /// Product of the scales of the node and all its ancestors.
    pub fn absolute_scale(&self) -> f64 {
        self.scale
    }

    /// The node's body box in tree coordinates.
    pub fn absolute_bounds(&self) -> Rect {
        let half_w = self.body.width * self.scale / 2.0;
        let half_h = self.body.height * self.scale / 2.0;
        Rect::new(
            self.position.x - half_w,
            self.position.y - half_h,
            self.position.x + half_w,
            self.position.y + half_h,
        )
    }

    /// Whether the extents are stale.
    pub fn needs_commit(&self) -> bool {
        self.flags.contains(DirtyFlags::NEEDS_COMMIT)
    }

    /// Whether the absolute position is stale.
    pub fn needs_absolute_pos(&self) -> bool {
        self.flags.contains(DirtyFlags::NEEDS_ABSOLUTE_POS)
    }

    /// Current commit state.
    pub fn state(&self) -> LayoutState {
        self.state
    }

    /// Dirty bits.
    pub fn flags(&self) -> DirtyFlags {
        self.flags
    }

    /// Seed the four extents from a body box centered on the node.
    pub(crate) fn seed_extents(&mut self, body: Size) -> Result<(), ExtentError> {
        self.body = body;
        let (w, h) = (body.width, body.height);
        for (i, extent) in self.extents.iter_mut().enumerate() {
            extent.clear();
            // Forward/backward run along the height, upward/downward along the width.
            let (length, size) = if i < 2 { (h, w / 2.0) } else { (w, h / 2.0) };
            extent.append_ls(length, size)?;
            self.offsets[i] = length / 2.0;
        }
        Ok(())
    }
}
