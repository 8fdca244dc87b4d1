//! Error types for coloreq-core.
//!
//! # Overview
//!
//! [`Error`] covers what can go wrong before any color math happens:
//! - working-buffer allocation
//! - image construction from raw data
//!
//! # Usage
//!
//! ```rust
//! use coloreq_core::{Error, Result};
//!
//! fn check(width: u32, height: u32) -> Result<()> {
//!     if width == 0 || height == 0 {
//!         return Err(Error::invalid_dimensions(width, height, "zero-sized image"));
//!     }
//!     Ok(())
//! }
//! assert!(check(0, 4).is_err());
//! ```
//!
//! # Used By
//!
//! - [`crate::image::RgbaImage`] - buffer construction
//! - [`crate::buffer`] - working memory
//! - `coloreq-ops`, `coloreq` - wrapped into their own error enums

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by core buffer handling.
#[derive(Debug, Error)]
pub enum Error {
    /// Memory allocation failed.
    ///
    /// Fatal for the current pipeline invocation. Partially filled working
    /// buffers are dropped and the caller decides whether to retry.
    #[error("failed to allocate {requested} bytes: {reason}")]
    AllocationFailed {
        /// Bytes requested
        requested: usize,
        /// Failure reason
        reason: String,
    },

    /// Invalid image dimensions.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Channel count differs from what the operation expects.
    #[error("channel mismatch: expected {expected}, got {got}")]
    ChannelMismatch {
        /// Expected channel count
        expected: usize,
        /// Actual channel count
        got: usize,
    },

    /// Raw data length does not match the declared dimensions.
    #[error("buffer size mismatch: expected {expected} values, got {got}")]
    BufferSize {
        /// Expected number of values
        expected: usize,
        /// Actual number of values
        got: usize,
    },
}

impl Error {
    /// Creates an [`Error::AllocationFailed`] error.
    #[inline]
    pub fn allocation_failed(requested: usize, reason: impl Into<String>) -> Self {
        Self::AllocationFailed {
            requested,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::allocation_failed(1024, "out of memory");
        assert_eq!(err.to_string(), "failed to allocate 1024 bytes: out of memory");

        let err = Error::BufferSize { expected: 16, got: 12 };
        assert!(err.to_string().contains("16"));
    }
}
