// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fuzzy floating-point comparison.
//!
//! There are two levels of configuration:
//!
//! - A process-wide default epsilon, read with [`default_fuzziness`] and replaced with
//!   [`set_default_fuzziness`]. It is stored atomically and starts at [`DEFAULT_FUZZINESS`].
//! - A [`Fuzziness`] value that callers construct locally and pass to comparisons.
//!   [`Fuzziness::default`] snapshots the process-wide epsilon at construction time.

use core::sync::atomic::{AtomicU64, Ordering};

use crate::error::ExtentError;

/// Epsilon used when no other fuzziness has been configured.
pub const DEFAULT_FUZZINESS: f64 = 1e-6;

static GLOBAL_FUZZINESS: AtomicU64 = AtomicU64::new(DEFAULT_FUZZINESS.to_bits());

/// Returns the process-wide default epsilon.
pub fn default_fuzziness() -> f64 {
    f64::from_bits(GLOBAL_FUZZINESS.load(Ordering::Relaxed))
}

/// Replaces the process-wide default epsilon.
///
/// Existing [`Fuzziness`] values keep the epsilon they were built with.
pub fn set_default_fuzziness(epsilon: f64) -> Result<(), ExtentError> {
    if !epsilon.is_finite() || epsilon < 0.0 {
        return Err(ExtentError::InvalidFuzziness(epsilon));
    }
    GLOBAL_FUZZINESS.store(epsilon.to_bits(), Ordering::Relaxed);
    Ok(())
}

/// A locally chosen comparison tolerance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fuzziness(f64);

impl Fuzziness {
    /// Exact comparison.
    pub const EXACT: Self = Self(0.0);

    /// Create a tolerance of `epsilon`. Negative or non-finite values are rejected.
    pub fn new(epsilon: f64) -> Result<Self, ExtentError> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(ExtentError::InvalidFuzziness(epsilon));
        }
        Ok(Self(epsilon))
    }

    /// The epsilon of this tolerance.
    pub const fn epsilon(self) -> f64 {
        self.0
    }

    /// Whether `a` and `b` differ by no more than the epsilon.
    ///
    /// NaN is never equal to anything, including NaN.
    #[inline]
    pub fn eq(self, a: f64, b: f64) -> bool {
        if a == b {
            return true;
        }
        (a - b).abs() <= self.0
    }
}

impl Default for Fuzziness {
    fn default() -> Self {
        Self(default_fuzziness())
    }
}

/// Compare two numbers with an optional tolerance, falling back to the process-wide default.
pub fn fuzzy_equals(a: f64, b: f64, fuzziness: Option<Fuzziness>) -> bool {
    fuzziness.unwrap_or_default().eq(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_tolerance() {
        let f = Fuzziness::new(0.5).unwrap();
        assert!(f.eq(1.0, 1.4));
        assert!(!f.eq(1.0, 1.6));
        assert!(Fuzziness::EXACT.eq(2.0, 2.0));
        assert!(!Fuzziness::EXACT.eq(2.0, 2.0 + f64::EPSILON * 4.0));
    }

    #[test]
    fn nan_is_never_equal() {
        let f = Fuzziness::new(1.0).unwrap();
        assert!(!f.eq(f64::NAN, f64::NAN));
        assert!(!f.eq(f64::NAN, 0.0));
    }

    #[test]
    fn invalid_tolerance_is_rejected() {
        assert_eq!(
            Fuzziness::new(-1.0),
            Err(ExtentError::InvalidFuzziness(-1.0))
        );
        assert!(Fuzziness::new(f64::INFINITY).is_err());
    }

    #[test]
    fn explicit_override_wins() {
        assert!(fuzzy_equals(1.0, 1.0 + 1e-9, None));
        assert!(!fuzzy_equals(1.0, 1.1, None));
        assert!(fuzzy_equals(1.0, 1.1, Some(Fuzziness::new(0.2).unwrap())));
    }
}
