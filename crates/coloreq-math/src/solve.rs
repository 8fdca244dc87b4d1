//! Dense linear solver.
//!
//! Gaussian elimination with partial pivoting in `f64`, meant for the small
//! (8x8) kernel systems of the hue-node interpolation. The matrix is given
//! row-major as a flat slice.
//!
//! # Example
//!
//! ```rust
//! use coloreq_math::solve_dense;
//!
//! // 2x + y = 5, x + 3y = 10
//! let x = solve_dense(&[2.0, 1.0, 1.0, 3.0], &[5.0, 10.0]).unwrap();
//! assert!((x[0] - 1.0).abs() < 1e-12);
//! assert!((x[1] - 3.0).abs() < 1e-12);
//! ```

use crate::{MathError, MathResult};
use tracing::trace;

/// Smallest pivot magnitude accepted, relative to the largest matrix entry.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Solves `A x = b` for square `A` (row-major, `n*n`).
///
/// Returns [`MathError::Singular`] when no pivot above tolerance exists.
pub fn solve_dense(a: &[f64], b: &[f64]) -> MathResult<Vec<f64>> {
    let n = b.len();
    if a.len() != n * n {
        return Err(MathError::DimensionMismatch(format!(
            "matrix has {} entries, expected {}x{}",
            a.len(),
            n,
            n
        )));
    }
    trace!(n, "solve_dense");

    let mut lu = a.to_vec();
    let mut x = b.to_vec();
    let scale = lu.iter().fold(0.0f64, |m, v| m.max(v.abs())).max(f64::MIN_POSITIVE);

    for col in 0..n {
        let (pivot_row, pivot) = (col..n)
            .map(|r| (r, lu[r * n + col].abs()))
            .fold((col, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
        if pivot <= PIVOT_TOLERANCE * scale {
            return Err(MathError::Singular { column: col, pivot });
        }
        if pivot_row != col {
            for k in 0..n {
                lu.swap(col * n + k, pivot_row * n + k);
            }
            x.swap(col, pivot_row);
        }

        let diag = lu[col * n + col];
        for r in col + 1..n {
            let f = lu[r * n + col] / diag;
            if f == 0.0 {
                continue;
            }
            for k in col..n {
                lu[r * n + k] -= f * lu[col * n + k];
            }
            x[r] -= f * x[col];
        }
    }

    // Back substitution
    for r in (0..n).rev() {
        let tail: f64 = (r + 1..n).map(|k| lu[r * n + k] * x[k]).sum();
        x[r] = (x[r] - tail) / lu[r * n + r];
    }
    Ok(x)
}
