//! 3x3 matrix type for color transformations.
//!
//! # Convention
//!
//! Row-major storage, column vectors:
//!
//! ```text
//! | m00 m01 m02 |   | x |   | m00*x + m01*y + m02*z |
//! | m10 m11 m12 | * | y | = | m10*x + m11*y + m12*z |
//! | m20 m21 m22 |   | z |   | m20*x + m21*y + m22*z |
//! ```

use crate::Vec3;
use std::ops::Mul;

/// A row-major 3x3 matrix.
///
/// # Example
///
/// ```rust
/// use coloreq_math::{Mat3, Vec3};
///
/// let m = Mat3::diagonal(2.0, 3.0, 4.0);
/// assert_eq!(m * Vec3::new(1.0, 1.0, 1.0), Vec3::new(2.0, 3.0, 4.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    /// Elements as `[row0, row1, row2]`
    pub m: [[f32; 3]; 3],
}

impl Mat3 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self::diagonal(1.0, 1.0, 1.0);

    /// Creates a matrix from rows.
    #[inline]
    pub const fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self { m: rows }
    }

    /// Creates a matrix whose columns are the given vectors.
    ///
    /// Used to stack primaries as columns when deriving RGB to XYZ.
    pub fn from_col_vecs(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self::from_rows([[c0.x, c1.x, c2.x], [c0.y, c1.y, c2.y], [c0.z, c1.z, c2.z]])
    }

    /// Diagonal matrix.
    #[inline]
    pub const fn diagonal(d0: f32, d1: f32, d2: f32) -> Self {
        Self::from_rows([[d0, 0.0, 0.0], [0.0, d1, 0.0], [0.0, 0.0, d2]])
    }

    /// Returns row `i` as a vector.
    #[inline]
    pub fn row(&self, i: usize) -> Vec3 {
        Vec3::from(self.m[i])
    }

    /// Computes the determinant.
    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Computes the inverse via the adjugate.
    ///
    /// Returns `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < 1e-10 || !det.is_finite() {
            return None;
        }
        let m = &self.m;
        let r = 1.0 / det;
        Some(Self::from_rows([
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * r,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * r,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * r,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * r,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * r,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * r,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * r,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * r,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * r,
            ],
        ]))
    }

    /// Applies the matrix to a plain `[f32; 3]`.
    #[inline]
    pub fn apply(&self, v: [f32; 3]) -> [f32; 3] {
        (*self * Vec3::from(v)).to_array()
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        Vec3::new(self.row(0).dot(v), self.row(1).dot(v), self.row(2).dot(v))
    }
}

impl Mul for Mat3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut out = [[0.0f32; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
            }
        }
        Self::from_rows(out)
    }
}
