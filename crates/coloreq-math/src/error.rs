//! Error types for numeric routines.

use thiserror::Error;

/// Errors raised by the numeric routines of this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// The system matrix has no usable pivot.
    #[error("singular matrix: pivot {pivot:e} at column {column}")]
    Singular {
        /// Column where elimination failed
        column: usize,
        /// Magnitude of the best pivot found
        pivot: f64,
    },

    /// Matrix and vector sizes disagree.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
}

/// Result type for numeric routines.
pub type MathResult<T> = Result<T, MathError>;
