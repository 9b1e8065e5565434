// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_extent --heading-base-level=0

//! Understory Extent: run-length encoded boundary profiles for tree layout.
//!
//! An [`Extent`] records how far a silhouette reaches in one direction as a function of the
//! position along the perpendicular axis. It is stored as a sequence of `(length, size)` runs,
//! where a NaN size marks a range that the silhouette does not cover.
//!
//! Layout engines keep four extents per subtree (one per facing direction) and use two walks:
//!
//! - [`Extent::separation`] finds the minimum distance between two facing silhouettes so that
//!   they do not overlap.
//! - [`Extent::combined_extent`] folds a child's silhouette into its parent's, producing the
//!   pointwise envelope.
//!
//! Runs are kept canonical (adjacent runs never share a size), and [`Extent::simplify`] trades
//! precision for a constant-size profile.
//!
//! # Example
//!
//! ```rust
//! use understory_extent::Extent;
//!
//! // Two boxes, each reaching 10 units toward the other across 10 units of height.
//! let mut a = Extent::new();
//! a.append_ls(10.0, 10.0).unwrap();
//! let b = a.clone();
//!
//! // Placed side by side, their centers must be 20 apart.
//! assert_eq!(a.separation(&b, 0.0, true, 1.0).unwrap(), 20.0);
//!
//! // Fold `b`, shifted 5 units down the profile and 2 units outward, into `a`.
//! a.combine_extent(&b, 5.0, 2.0, 1.0).unwrap();
//! assert_eq!(a.total_length(), 15.0);
//! assert_eq!(a.num_bounds(), 2);
//! ```
//!
//! ## Comparing extents
//!
//! [`Extent::equals`] compares run by run with a [`Fuzziness`] tolerance. When none is given,
//! the process-wide default from [`default_fuzziness`] is used; it can be replaced with
//! [`set_default_fuzziness`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod error;
pub mod extent;
pub mod fuzzy;

pub use error::ExtentError;
pub use extent::{Bound, BoundingValues, Extent};
pub use fuzzy::{
    DEFAULT_FUZZINESS, Fuzziness, default_fuzziness, fuzzy_equals, set_default_fuzziness,
};
