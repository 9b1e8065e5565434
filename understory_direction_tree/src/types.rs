// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public value types: node identifiers, directions, axes, and per-node layout modes.

/// Identifier for a node in a [`DirectionTree`](crate::DirectionTree).
///
/// A small, copyable handle made of a slot index and a generation counter. It stays stable
/// while the node is alive and becomes stale when the node is
/// [removed](crate::DirectionTree::remove); a reused slot gets a higher generation, so stale
/// handles never alias a live node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// One of the six labeled orientations of an edge, or `Null`.
///
/// Screen convention: `Forward` is +x, `Downward` is +y. `Inward` points into a node's body
/// and `Outward` back out of it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    /// No direction.
    Null,
    /// Toward +x.
    Forward,
    /// Toward -x.
    Backward,
    /// Toward -y.
    Upward,
    /// Toward +y.
    Downward,
    /// Into the node's body.
    Inward,
    /// Out of the node's body, toward the node that contains it.
    Outward,
}

impl Direction {
    /// All non-null directions, in slot order.
    pub const ALL: [Self; 6] = [
        Self::Forward,
        Self::Backward,
        Self::Upward,
        Self::Downward,
        Self::Inward,
        Self::Outward,
    ];

    /// The four directions that carry an extent, in extent order.
    pub const PLANAR: [Self; 4] = [Self::Forward, Self::Backward, Self::Upward, Self::Downward];

    /// The opposite direction. `Null` is its own reverse.
    pub const fn reverse(self) -> Self {
        match self {
            Self::Null => Self::Null,
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
            Self::Upward => Self::Downward,
            Self::Downward => Self::Upward,
            Self::Inward => Self::Outward,
            Self::Outward => Self::Inward,
        }
    }

    /// The axis this direction lies on.
    pub const fn axis(self) -> Axis {
        match self {
            Self::Null => Axis::Null,
            Self::Forward | Self::Backward => Axis::Horizontal,
            Self::Upward | Self::Downward => Axis::Vertical,
            Self::Inward | Self::Outward => Axis::Z,
        }
    }

    /// Whether this is the positive direction of its axis.
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::Forward | Self::Downward | Self::Inward)
    }

    /// Whether this is the negative direction of its axis.
    pub const fn is_negative(self) -> bool {
        matches!(self, Self::Backward | Self::Upward | Self::Outward)
    }

    /// `+1.0` for positive directions, `-1.0` for negative ones, `0.0` for `Null`.
    pub const fn sign(self) -> f64 {
        if self.is_positive() {
            1.0
        } else if self.is_negative() {
            -1.0
        } else {
            0.0
        }
    }

    /// Neighbor slot index; `None` for `Null`.
    pub(crate) const fn slot(self) -> Option<usize> {
        match self {
            Self::Null => None,
            Self::Forward => Some(0),
            Self::Backward => Some(1),
            Self::Upward => Some(2),
            Self::Downward => Some(3),
            Self::Inward => Some(4),
            Self::Outward => Some(5),
        }
    }

    /// Extent index; `None` for directions without an extent.
    pub(crate) const fn extent_index(self) -> Option<usize> {
        match self {
            Self::Forward => Some(0),
            Self::Backward => Some(1),
            Self::Upward => Some(2),
            Self::Downward => Some(3),
            _ => None,
        }
    }
}

/// The axis of a [`Direction`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Axis {
    /// No axis.
    Null,
    /// Forward and backward.
    Horizontal,
    /// Upward and downward.
    Vertical,
    /// Inward and outward.
    Z,
}

impl Axis {
    /// The positive direction of this axis.
    pub const fn positive(self) -> Direction {
        match self {
            Self::Null => Direction::Null,
            Self::Horizontal => Direction::Forward,
            Self::Vertical => Direction::Downward,
            Self::Z => Direction::Inward,
        }
    }

    /// The negative direction of this axis.
    pub const fn negative(self) -> Direction {
        match self {
            Self::Null => Direction::Null,
            Self::Horizontal => Direction::Backward,
            Self::Vertical => Direction::Upward,
            Self::Z => Direction::Outward,
        }
    }

    /// The other planar axis. `Z` and `Null` map to themselves.
    pub const fn perpendicular(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
            other => other,
        }
    }
}

/// How a child is placed along the axis perpendicular to its direction.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Alignment {
    /// Unset; treated as centered.
    Null,
    /// No alignment; the child is centered.
    #[default]
    None,
    /// The child's leading edge lines up with the parent body's leading edge.
    Negative,
    /// The child is centered on the parent.
    Center,
    /// The child's trailing edge lines up with the parent body's trailing edge.
    Positive,
    /// An inward child sits below the parent's own content.
    InwardVertical,
    /// An inward child sits beside the parent's own content.
    InwardHorizontal,
}

/// Whether a child may overlap its parent's axis where only one of them is present.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum AxisOverlap {
    /// Unset; treated as allowed.
    Null,
    /// Portions present on only one side still push the child away.
    Prevented,
    /// Only portions present on both sides push the child away.
    #[default]
    Allowed,
}

impl AxisOverlap {
    /// Whether overlap is allowed.
    pub const fn allows(self) -> bool {
        !matches!(self, Self::Prevented)
    }
}

/// Precision and cost trade-off for how a node absorbs its children's extents.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Fit {
    /// Keep every run of every child's extents.
    #[default]
    Exact,
    /// Collapse each child's extents into single runs before folding them in.
    Loose,
    /// Do not fold children's extents in; the node's extents are its body box.
    Naive,
}

/// Which axis a node lays out, and orders its siblings ring, first.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum LayoutPreference {
    /// Backward/forward children first.
    #[default]
    PreferHorizontal,
    /// Upward/downward children first.
    PreferVertical,
    /// The axis of the link to the parent first.
    PreferParent,
    /// The axis perpendicular to the link to the parent first.
    PreferPerpendicular,
}

impl LayoutPreference {
    /// Resolve to a planar axis given the direction from the node to its parent.
    ///
    /// Without a planar parent link, `PreferParent` resolves to horizontal and
    /// `PreferPerpendicular` to vertical.
    pub const fn resolve(self, parent_direction: Option<Direction>) -> Axis {
        let parent_axis = match parent_direction {
            Some(d) => match d.axis() {
                Axis::Horizontal => Axis::Horizontal,
                Axis::Vertical => Axis::Vertical,
                _ => Axis::Null,
            },
            None => Axis::Null,
        };
        match self {
            Self::PreferHorizontal => Axis::Horizontal,
            Self::PreferVertical => Axis::Vertical,
            Self::PreferParent => match parent_axis {
                Axis::Null => Axis::Horizontal,
                axis => axis,
            },
            Self::PreferPerpendicular => match parent_axis {
                Axis::Null => Axis::Vertical,
                axis => axis.perpendicular(),
            },
        }
    }
}

/// Commit state of a node.
///
/// `Null → NeedsCommit → InCommit → Committed`; any later change returns to `NeedsCommit`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum LayoutState {
    /// Never laid out.
    #[default]
    Null,
    /// Changed since the last commit.
    NeedsCommit,
    /// Being committed right now.
    InCommit,
    /// Up to date.
    Committed,
}

bitflags::bitflags! {
    /// Per-node dirty bits.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        /// The node's extents are stale.
        const NEEDS_COMMIT       = 0b0000_0001;
        /// The node's absolute position is stale.
        const NEEDS_ABSOLUTE_POS = 0b0000_0010;
        /// The node is a paint-group root whose group has not been painted since it changed.
        const NEEDS_PAINT        = 0b0000_0100;
    }
}

/// Canonical child order for a node laying out `axis` first.
pub(crate) const fn layout_order(axis: Axis) -> [Direction; 5] {
    match axis {
        Axis::Vertical => [
            Direction::Inward,
            Direction::Upward,
            Direction::Downward,
            Direction::Backward,
            Direction::Forward,
        ],
        _ => [
            Direction::Inward,
            Direction::Backward,
            Direction::Forward,
            Direction::Upward,
            Direction::Downward,
        ],
    }
}
