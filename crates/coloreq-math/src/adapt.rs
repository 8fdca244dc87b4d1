//! Chromatic adaptation between white points.
//!
//! Working profiles whose white differs from D65 (ProPhoto at D50, ACES at
//! D60) are adapted with Bradford so every profile hands the UCS math
//! XYZ relative to D65.
//!
//! # Example
//!
//! ```rust
//! use coloreq_math::{adapt_matrix, BRADFORD, D50, D65};
//!
//! let m = adapt_matrix(BRADFORD, D50, D65).unwrap();
//! let w = m * D50;
//! assert!((w.x - D65.x).abs() < 1e-4);
//! assert!((w.z - D65.z).abs() < 1e-4);
//! ```

use crate::{Mat3, Vec3};

/// CIE D65 white (XYZ, Y = 1).
pub const D65: Vec3 = Vec3::new(0.95047, 1.0, 1.08883);

/// CIE D50 white (XYZ, Y = 1).
pub const D50: Vec3 = Vec3::new(0.96422, 1.0, 0.82521);

/// ACES white, approximately D60 (XYZ, Y = 1).
pub const D60: Vec3 = Vec3::new(0.95265, 1.0, 1.00883);

/// Bradford cone response matrix.
pub const BRADFORD: Mat3 = Mat3::from_rows([
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
]);

/// Converts an xy chromaticity to XYZ with Y = 1.
#[inline]
pub fn xy_to_xyz(x: f32, y: f32) -> Vec3 {
    Vec3::new(x / y, 1.0, (1.0 - x - y) / y)
}

/// Builds the matrix adapting XYZ from `src_white` to `dst_white`.
///
/// Computed as `M^-1 * diag(dst_cone / src_cone) * M`. Returns `None` if
/// `method` cannot be inverted.
pub fn adapt_matrix(method: Mat3, src_white: Vec3, dst_white: Vec3) -> Option<Mat3> {
    let method_inv = method.inverse()?;
    let src = method * src_white;
    let dst = method * dst_white;
    let scale = dst / src;
    Some(method_inv * Mat3::diagonal(scale.x, scale.y, scale.z) * method)
}
