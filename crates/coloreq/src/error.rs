//! Error types for the equalizer.

use thiserror::Error;

/// Result type for equalizer operations.
pub type GradeResult<T> = Result<T, GradeError>;

/// Errors raised while compiling parameters or running the pipeline.
#[derive(Debug, Error)]
pub enum GradeError {
    /// A parameter is out of range or not finite.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The node kernel system could not be solved.
    #[error("node interpolation failed: {0}")]
    Interpolation(#[from] coloreq_math::MathError),

    /// Filtering or resampling failed.
    #[error(transparent)]
    Ops(#[from] coloreq_ops::OpsError),

    /// Working buffer allocation or image construction failed.
    #[error(transparent)]
    Core(#[from] coloreq_core::Error),

    /// Color conversion setup failed.
    #[error(transparent)]
    Color(#[from] coloreq_color::ColorError),

    /// I/O error reading or writing a preset.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Preset is not valid YAML for [`crate::GradeParams`].
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
