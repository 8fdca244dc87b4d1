//! Error types for image operations.

use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Buffer length disagrees with its dimensions.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Working buffer could not be allocated.
    #[error(transparent)]
    Core(#[from] coloreq_core::Error),
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
