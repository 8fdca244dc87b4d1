//! Error types for color conversions.

use thiserror::Error;

/// Errors raised while setting up color conversions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    /// A conversion matrix could not be inverted.
    #[error("singular matrix: {0}")]
    SingularMatrix(String),

    /// No working profile with this name exists.
    #[error("unknown working profile: {0}")]
    UnknownProfile(String),
}

/// Result type for color operations.
pub type ColorResult<T> = Result<T, ColorError>;
