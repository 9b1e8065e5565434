// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for extent construction and queries.

/// Errors reported by [`Extent`](crate::Extent) operations.
///
/// Every variant is a caller contract violation except
/// [`ExtentError::SeparationRunaway`], which guards against malformed run data.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ExtentError {
    /// A run length was NaN.
    #[error("extent run length must not be NaN")]
    NanLength,
    /// A run length was negative.
    #[error("extent run length must not be negative, got {0}")]
    NegativeLength(f64),
    /// A run length was infinite.
    #[error("extent run length must be finite")]
    InfiniteLength,
    /// A scale factor was zero, negative, or not finite.
    #[error("extent scale must be positive and finite, got {0}")]
    InvalidScale(f64),
    /// A fuzziness epsilon was negative or not finite.
    #[error("fuzziness must be non-negative and finite, got {0}")]
    InvalidFuzziness(f64),
    /// A profile walk did not terminate within its iteration bound.
    #[error("extent walk exceeded {iterations} iterations")]
    SeparationRunaway {
        /// The iteration bound that was exceeded.
        iterations: usize,
    },
}

/// Validate a run length; `Ok(false)` means a zero-length run to be dropped.
pub(crate) fn check_length(length: f64) -> Result<bool, ExtentError> {
    if length.is_nan() {
        return Err(ExtentError::NanLength);
    }
    if length < 0.0 {
        return Err(ExtentError::NegativeLength(length));
    }
    if length.is_infinite() {
        return Err(ExtentError::InfiniteLength);
    }
    Ok(length > 0.0)
}

pub(crate) fn check_scale(scale: f64) -> Result<(), ExtentError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(ExtentError::InvalidScale(scale))
    }
}
