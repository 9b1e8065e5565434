// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for tree editing and committing.

use understory_extent::ExtentError;

use crate::types::{Direction, NodeId};

/// Contract violations reported by tree operations.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// The handle refers to a removed node.
    #[error("node handle is stale")]
    StaleNode,
    /// The operation needs a direction, not `Direction::Null`.
    #[error("direction must not be null")]
    NullDirection,
    /// Children are connected inward; the outward slot only ever holds the containing node.
    #[error("cannot connect a child in the outward direction")]
    OutwardConnect,
    /// The slot is already occupied.
    #[error("a node is already connected {0:?}")]
    Occupied(Direction),
    /// The child already has a parent.
    #[error("the child is already connected to a parent")]
    AlreadyParented,
    /// The child is an ancestor of the parent.
    #[error("connecting would create a cycle")]
    WouldCycle,
    /// Nothing is connected in that direction.
    #[error("no node is connected {0:?}")]
    NoNeighbor(Direction),
    /// The direction is the node's link to its parent.
    #[error("{0:?} is the link to the parent")]
    ParentDirection(Direction),
    /// The node still has a parent.
    #[error("the node is not a root")]
    NotRoot,
    /// A caret pop found no saved position.
    #[error("the caret stack is empty")]
    EmptyCaretStack,
    /// A scale was zero, negative, or not finite.
    #[error("scale must be positive and finite, got {0}")]
    InvalidScale(f64),
    /// A siblings ring failed verification.
    #[error("siblings ring of {node:?} is broken after {steps} steps")]
    BrokenSiblings {
        /// Where the walk started.
        node: NodeId,
        /// Steps taken before the walk failed.
        steps: usize,
    },
}

/// Failures reported by [`CommitLayout::crank`](crate::CommitLayout::crank).
///
/// `E` is the painter's callback error.
#[derive(Debug, thiserror::Error)]
pub enum CommitError<E> {
    /// A tree contract was violated.
    #[error(transparent)]
    Tree(#[from] TreeError),
    /// An extent walk failed.
    #[error(transparent)]
    Extent(#[from] ExtentError),
    /// A painter callback failed; carried unmodified.
    #[error("layout callback failed: {0:?}")]
    Callback(E),
    /// A node was reached again while it was being committed.
    ///
    /// Callbacks only see the tree by shared reference and a commit plan queues each node
    /// once, so this is a guard against a corrupted plan rather than an outcome callers
    /// should expect.
    #[error("node {0:?} was re-entered during its own commit")]
    Reentrant(NodeId),
}
