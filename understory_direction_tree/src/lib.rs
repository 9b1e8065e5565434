// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_direction_tree --heading-base-level=0

//! Understory Direction Tree: incremental layout for directionally linked trees.
//!
//! Nodes are linked along six directions (forward, backward, upward, downward, inward, and
//! outward) and laid out so that every subtree's silhouette clears its neighbors'. It suits
//! diagram and graph editors where a node's children hang off its sides and an edit should
//! only re-lay out what it touched.
//!
//! - [`DirectionTree`]: arena of nodes and their directional links.
//! - [`CommitLayout`]: resumable solver that recomputes dirty nodes, positions them, and paints
//!   each changed paint group once.
//! - [`Painter`]: caller callbacks for measuring, spacing, and painting.
//! - [`Caret`]: a cursor for building trees edge by edge.
//!
//! ## Extents
//!
//! Every node keeps four [`Extent`](understory_extent::Extent)s describing how far its subtree
//! reaches forward, backward, upward, and downward. Children are placed by walking their
//! parent's silhouette against their own, then folded into the parent's silhouette.
//!
//! ## Paint groups
//!
//! A root and every [creased](DirectionTree::crease) node start a paint group. Each group's
//! members are threaded on a siblings ring in layout order; the solver paints a group as a
//! whole and only when one of its members changed or the group moved.
//!
//! ## Incremental commits
//!
//! Any edit marks the edited node and all of its ancestors dirty. A [`CommitLayout`] then
//! commits exactly those nodes, a bounded amount of work per [`CommitLayout::crank`].
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_direction_tree::{CommitLayout, Direction, DirectionTree, NodeId, Painter};
//!
//! struct Boxes;
//!
//! impl Painter<Size> for Boxes {
//!     type Error = ();
//!
//!     fn size(&mut self, tree: &DirectionTree<Size>, node: NodeId) -> Result<Size, ()> {
//!         tree.value(node).copied().map_err(|_| ())
//!     }
//! }
//!
//! let mut tree = DirectionTree::new();
//! let root = tree.new_node(Size::new(24.0, 80.0));
//! let child = tree.new_node(Size::new(24.0, 80.0));
//! tree.connect(root, Direction::Forward, child).unwrap();
//!
//! let mut commit = CommitLayout::new(&mut tree, root, Boxes);
//! while commit.crank().unwrap() {}
//!
//! let layout = tree.layout(child).unwrap();
//! assert_eq!(layout.absolute_position(), Point::new(24.0, 0.0));
//! assert_eq!(tree.layout(root).unwrap().extent_size(), Size::new(48.0, 80.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod caret;
mod commit;
mod error;
mod layout;
mod neighbor;
mod paint_group;
mod siblings;
mod tree;
mod types;

pub use caret::Caret;
pub use commit::{CommitLayout, LayoutConfig, Painter};
pub use error::{CommitError, TreeError};
pub use layout::Layout;
pub use neighbor::Neighbor;
pub use siblings::Siblings;
pub use tree::{DirectionTree, State};
pub use types::{
    Alignment, Axis, AxisOverlap, Direction, DirtyFlags, Fit, LayoutPreference, LayoutState,
    NodeId,
};

pub use understory_extent::{Extent, ExtentError, Fuzziness};
