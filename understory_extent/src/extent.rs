// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Extent`] profile and its merge and separation walks.

use alloc::collections::VecDeque;
use core::cell::Cell;

use crate::error::{ExtentError, check_length, check_scale};
use crate::fuzzy::Fuzziness;

/// One run of an [`Extent`]: `length` units along the profile at distance `size`.
///
/// A NaN `size` marks a range where the profile is unconstrained.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bound {
    /// Length of the run along the profile. Always positive and finite.
    pub length: f64,
    /// Distance of the boundary from the owner's center, or NaN.
    pub size: f64,
}

/// Summary of an extent: total length and the range of its defined sizes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingValues {
    /// Sum of all run lengths.
    pub total_length: f64,
    /// Smallest defined size, or NaN if no size is defined.
    pub min_size: f64,
    /// Largest defined size, or NaN if no size is defined.
    pub max_size: f64,
}

/// A run-length encoded 1D boundary profile.
///
/// An extent describes how far a silhouette reaches in one direction, as a function of the
/// position along the perpendicular axis. Runs are kept canonical: adjacent runs never share
/// a size (two NaN sizes count as equal), so [`Extent::num_bounds`] is the number of distinct
/// steps in the profile.
#[derive(Clone, Debug, Default)]
pub struct Extent {
    bounds: VecDeque<Bound>,
    cached: Cell<Option<BoundingValues>>,
}

#[inline]
fn same_size(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Pointwise union of two sizes: the larger where both are defined, else whichever is.
#[inline]
fn envelope(a: f64, b: f64) -> f64 {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.max(b),
        (true, false) => b,
        _ => a,
    }
}

/// Cursor over one extent's runs, placed at `origin` and scaled by `scale`.
struct Track<'a> {
    bounds: &'a VecDeque<Bound>,
    origin: f64,
    scale: f64,
    idx: usize,
    run_end: f64,
}

impl<'a> Track<'a> {
    fn new(bounds: &'a VecDeque<Bound>, origin: f64, scale: f64) -> Self {
        let run_end = bounds
            .front()
            .map_or(origin, |b| origin + b.length * scale);
        Self {
            bounds,
            origin,
            scale,
            idx: 0,
            run_end,
        }
    }

    /// Size covering `pos` (NaN outside the profile) and the next boundary after it.
    ///
    /// Positions must be probed in non-decreasing order.
    fn probe(&mut self, pos: f64) -> (f64, f64) {
        if self.idx >= self.bounds.len() {
            return (f64::NAN, f64::INFINITY);
        }
        if pos < self.origin {
            return (f64::NAN, self.origin);
        }
        while pos >= self.run_end {
            self.idx += 1;
            let Some(b) = self.bounds.get(self.idx) else {
                return (f64::NAN, f64::INFINITY);
            };
            self.run_end += b.length * self.scale;
        }
        let size = self.bounds[self.idx].size;
        (size * self.scale, self.run_end)
    }
}

impl Extent {
    /// Create an empty extent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an extent from `(length, size)` runs, appended in order.
    pub fn from_runs(runs: &[(f64, f64)]) -> Result<Self, ExtentError> {
        let mut extent = Self::new();
        for &(length, size) in runs {
            extent.append_ls(length, size)?;
        }
        Ok(extent)
    }

    #[inline]
    fn invalidate(&self) {
        self.cached.set(None);
    }

    /// Remove every run.
    pub fn clear(&mut self) {
        self.bounds.clear();
        self.invalidate();
    }

    /// Number of runs.
    pub fn num_bounds(&self) -> usize {
        self.bounds.len()
    }

    /// Whether the extent has no runs.
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Length of the run at `index`.
    pub fn bound_length_at(&self, index: usize) -> Option<f64> {
        self.bounds.get(index).map(|b| b.length)
    }

    /// Size of the run at `index`.
    pub fn bound_size_at(&self, index: usize) -> Option<f64> {
        self.bounds.get(index).map(|b| b.size)
    }

    /// Iterate the runs from the start of the profile.
    pub fn iter(&self) -> impl Iterator<Item = Bound> + '_ {
        self.bounds.iter().copied()
    }

    /// Add a run at the far end of the profile.
    ///
    /// Zero-length runs are dropped. A run with the same size as the current last run is
    /// merged into it.
    pub fn append_ls(&mut self, length: f64, size: f64) -> Result<(), ExtentError> {
        if !check_length(length)? {
            return Ok(());
        }
        self.invalidate();
        if let Some(last) = self.bounds.back_mut()
            && same_size(last.size, size)
        {
            last.length += length;
            return Ok(());
        }
        self.bounds.push_back(Bound { length, size });
        Ok(())
    }

    /// Add a run at the near end of the profile.
    ///
    /// Zero-length runs are dropped. A run with the same size as the current first run is
    /// merged into it.
    pub fn prepend_ls(&mut self, length: f64, size: f64) -> Result<(), ExtentError> {
        if !check_length(length)? {
            return Ok(());
        }
        self.invalidate();
        if let Some(first) = self.bounds.front_mut()
            && same_size(first.size, size)
        {
            first.length += length;
            return Ok(());
        }
        self.bounds.push_front(Bound { length, size });
        Ok(())
    }

    /// Total length, smallest and largest defined size. Memoized until the next mutation.
    pub fn bounding_values(&self) -> BoundingValues {
        if let Some(values) = self.cached.get() {
            return values;
        }
        let mut values = BoundingValues {
            total_length: 0.0,
            min_size: f64::NAN,
            max_size: f64::NAN,
        };
        for b in &self.bounds {
            values.total_length += b.length;
            if b.size.is_nan() {
                continue;
            }
            values.min_size = if values.min_size.is_nan() {
                b.size
            } else {
                values.min_size.min(b.size)
            };
            values.max_size = if values.max_size.is_nan() {
                b.size
            } else {
                values.max_size.max(b.size)
            };
        }
        self.cached.set(Some(values));
        values
    }

    /// Sum of all run lengths.
    pub fn total_length(&self) -> f64 {
        self.bounding_values().total_length
    }

    /// Size of the run covering `offset`, or NaN outside the profile.
    pub fn size_at(&self, offset: f64) -> f64 {
        if offset < 0.0 {
            return f64::NAN;
        }
        let mut start = 0.0;
        for b in &self.bounds {
            if offset < start + b.length {
                return b.size;
            }
            start += b.length;
        }
        f64::NAN
    }

    /// Collapse the profile into a single run of its total length at its largest size.
    pub fn simplify(&mut self) {
        if self.bounds.len() <= 1 {
            return;
        }
        let values = self.bounding_values();
        self.bounds.clear();
        self.bounds.push_back(Bound {
            length: values.total_length,
            size: values.max_size,
        });
        self.invalidate();
    }

    /// Multiply every length and every defined size by `factor`.
    pub fn scale(&mut self, factor: f64) -> Result<(), ExtentError> {
        check_scale(factor)?;
        for b in &mut self.bounds {
            b.length *= factor;
            b.size *= factor;
        }
        self.invalidate();
        Ok(())
    }

    /// Add `delta` to every defined size.
    pub fn adjust_size(&mut self, delta: f64) {
        if delta == 0.0 {
            return;
        }
        for b in &mut self.bounds {
            b.size += delta;
        }
        self.invalidate();
    }

    /// Walk this extent and `given` in lockstep.
    ///
    /// `given` starts at `position_adjustment` in this extent's coordinates and is scaled by
    /// `given_scale`. `visit` receives the size of each profile over a window (NaN where a
    /// profile is unconstrained or absent) and the window's length. Windows cover the union
    /// of both profiles.
    fn walk(
        &self,
        given: &Self,
        position_adjustment: f64,
        given_scale: f64,
        visit: impl FnMut(f64, f64, f64) -> Result<(), ExtentError>,
    ) -> Result<(), ExtentError> {
        // Every step crosses at least one run boundary.
        let limit = 4 * (self.bounds.len() + given.bounds.len()) + 8;
        self.walk_bounded(given, position_adjustment, given_scale, limit, visit)
    }

    /// [`Extent::walk`] giving up with [`ExtentError::SeparationRunaway`] after `limit` steps.
    fn walk_bounded(
        &self,
        given: &Self,
        position_adjustment: f64,
        given_scale: f64,
        limit: usize,
        mut visit: impl FnMut(f64, f64, f64) -> Result<(), ExtentError>,
    ) -> Result<(), ExtentError> {
        let this_total = self.total_length();
        let given_total = given.total_length() * given_scale;
        let mut pos = position_adjustment.min(0.0);
        let end = this_total.max(position_adjustment + given_total);

        let mut this_track = Track::new(&self.bounds, 0.0, 1.0);
        let mut given_track = Track::new(&given.bounds, position_adjustment, given_scale);

        let mut iterations = 0;
        while pos < end {
            iterations += 1;
            if iterations > limit {
                return Err(ExtentError::SeparationRunaway { iterations: limit });
            }
            let (this_size, this_next) = this_track.probe(pos);
            let (given_size, given_next) = given_track.probe(pos);
            let next = this_next.min(given_next).min(end);
            if next > pos {
                visit(this_size, given_size, next - pos)?;
                pos = next;
            }
        }
        Ok(())
    }

    /// Minimum center-to-center distance that keeps this profile and `given` apart.
    ///
    /// The two profiles face each other: this extent's sizes reach toward `given`, and
    /// `given`'s sizes reach back. `given` is shifted along the profile so that its start sits
    /// at `position_adjustment` and is scaled by `given_scale`.
    ///
    /// Where both profiles are defined the required distance is the sum of the sizes. Where
    /// only one is defined, its size is required only when `allow_axis_overlap` is false; the
    /// same rule covers portions of either profile lying outside the other's range. The result
    /// is never negative.
    pub fn separation(
        &self,
        given: &Self,
        position_adjustment: f64,
        allow_axis_overlap: bool,
        given_scale: f64,
    ) -> Result<f64, ExtentError> {
        check_scale(given_scale)?;
        if position_adjustment.is_nan() {
            return Err(ExtentError::NanLength);
        }
        let mut separation = 0.0_f64;
        self.walk(
            given,
            position_adjustment,
            given_scale,
            |this_size, given_size, _| {
                let required = match (this_size.is_nan(), given_size.is_nan()) {
                    (false, false) => this_size + given_size,
                    (false, true) if !allow_axis_overlap => this_size,
                    (true, false) if !allow_axis_overlap => given_size,
                    _ => return Ok(()),
                };
                separation = separation.max(required);
                Ok(())
            },
        )?;
        Ok(separation)
    }

    /// Pointwise envelope of this profile and a shifted, scaled `given`.
    ///
    /// `given` is scaled by `scale` (lengths and sizes), its sizes are offset by
    /// `size_adjustment`, and it is placed so its start sits at `length_adjustment` in this
    /// extent's coordinates. The result starts at `min(0, length_adjustment)`; callers tracking
    /// an offset into the profile must add `-length_adjustment` when it is negative.
    pub fn combined_extent(
        &self,
        given: &Self,
        length_adjustment: f64,
        size_adjustment: f64,
        scale: f64,
    ) -> Result<Self, ExtentError> {
        check_scale(scale)?;
        if length_adjustment.is_nan() {
            return Err(ExtentError::NanLength);
        }
        if length_adjustment < 0.0 {
            // Swap roles so the merge always starts at a non-negative offset.
            let mut prepared = given.clone();
            prepared.scale(scale)?;
            prepared.adjust_size(size_adjustment);
            return prepared.combined_extent(self, -length_adjustment, 0.0, 1.0);
        }

        let mut shifted = given.clone();
        if scale != 1.0 {
            shifted.scale(scale)?;
        }
        shifted.adjust_size(size_adjustment);
        if !shifted.is_empty() {
            shifted.prepend_ls(length_adjustment, f64::NAN)?;
        }

        let mut result = Self::new();
        self.walk(&shifted, 0.0, 1.0, |this_size, given_size, length| {
            result.append_ls(length, envelope(this_size, given_size))
        })?;
        Ok(result)
    }

    /// In-place form of [`Extent::combined_extent`].
    pub fn combine_extent(
        &mut self,
        given: &Self,
        length_adjustment: f64,
        size_adjustment: f64,
        scale: f64,
    ) -> Result<(), ExtentError> {
        *self = self.combined_extent(given, length_adjustment, size_adjustment, scale)?;
        Ok(())
    }

    /// Compare two extents run by run.
    ///
    /// Run counts must match. Lengths are compared with the tolerance; sizes are equal when
    /// both are NaN or both are defined and within the tolerance.
    pub fn equals(&self, other: &Self, fuzziness: Option<Fuzziness>) -> bool {
        if self.bounds.len() != other.bounds.len() {
            return false;
        }
        let fuzz = fuzziness.unwrap_or_default();
        self.bounds.iter().zip(other.bounds.iter()).all(|(a, b)| {
            if !fuzz.eq(a.length, b.length) {
                return false;
            }
            match (a.size.is_nan(), b.size.is_nan()) {
                (true, true) => true,
                (false, false) => fuzz.eq(a.size, b.size),
                _ => false,
            }
        })
    }
}

impl PartialEq for Extent {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, Some(Fuzziness::EXACT))
    }
}
