//! # coloreq-ops
//!
//! Image operations on interleaved `f32` planes with any channel count.
//!
//! # Modules
//!
//! - [`blur`] - separable Gaussian blur, in place
//! - [`resample`] - bilinear resize between two buffers
//! - [`guided`] - fast guided filter driven by a 2-channel guide
//!
//! Every pass is parallel over rows with [`rayon`] and completes before
//! the function returns, so consecutive calls never overlap.
//!
//! # Example
//!
//! ```rust
//! use coloreq_ops::blur::gaussian_blur;
//!
//! let mut plane = vec![0.0f32; 16 * 16];
//! plane[8 * 16 + 8] = 1.0;
//! gaussian_blur(&mut plane, 16, 16, 1, 1.5).unwrap();
//! let total: f32 = plane.iter().sum();
//! assert!((total - 1.0).abs() < 1e-4);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod blur;
mod error;
pub mod guided;
pub mod resample;

pub use error::{OpsError, OpsResult};
pub use guided::GuidedFilter;

/// Checks that `len` equals `width * height * channels`.
pub(crate) fn check_len(
    what: &str,
    len: usize,
    width: usize,
    height: usize,
    channels: usize,
) -> OpsResult<()> {
    if width == 0 || height == 0 || channels == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "{what}: width, height and channels must be > 0"
        )));
    }
    let expected = width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| OpsError::InvalidDimensions(format!("{what}: dimensions overflow")))?;
    if len != expected {
        return Err(OpsError::SizeMismatch(format!(
            "{what}: expected {expected} values for {width}x{height}x{channels}, got {len}"
        )));
    }
    Ok(())
}
