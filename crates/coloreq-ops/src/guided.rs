//! Fast guided filter with a two-channel guide.
//!
//! The output is locally an affine function of the guide,
//! `out = A * guide + b`, with `A` (2x2) and `b` (2) estimated from
//! Gaussian-weighted local statistics:
//!
//! ```text
//! Σ = cov(guide, guide) + eps * I
//! A = cov(target, guide) * Σ^-1
//! b = mean(target) - A * mean(guide)
//! ```
//!
//! Statistics are gathered on a grid downsampled by [`scaling_factor`],
//! the coefficient maps are blurred once more and upsampled back. The
//! filtered value is then blended with the unfiltered one through a
//! per-pixel weight, so pixels of weight zero are left as they were.
//!
//! # Example
//!
//! ```rust
//! use coloreq_ops::GuidedFilter;
//!
//! let (w, h) = (8, 8);
//! let guide = vec![0.01f32; w * h * 2];
//! let mut target = vec![0.3f32; w * h * 2];
//! let weight = vec![1.0f32; w * h];
//!
//! let filter = GuidedFilter::new(3.0, 0.3, 1e-5).unwrap();
//! filter.apply(&guide, &mut target, &weight, w, h).unwrap();
//! assert!(target.iter().all(|v| (v - 0.3).abs() < 1e-5));
//! ```

use crate::blur::gaussian_blur;
use crate::resample::bilinear_resample;
use crate::{check_len, OpsError, OpsResult};
use coloreq_core::alloc_buffer;
use rayon::prelude::*;
use tracing::debug;

/// Determinant below which the local system is treated as singular.
const DET_FLOOR: f32 = 4.0 * f32::EPSILON;

/// Local statistics per pixel: means of u, v, p, q, then
/// uu, uv, vv, pu, pv, qu, qv.
const STATS: usize = 11;
/// Affine coefficients per pixel: a_pu, a_pv, a_qu, a_qv, b_p, b_q.
const COEFFS: usize = 6;

/// Integer downsampling factor for a blur of standard deviation `sigma`.
///
/// `clamp(floor(sigma - 1.5), 1, 4)`.
#[inline]
pub fn scaling_factor(sigma: f32) -> usize {
    (sigma - 1.5).floor().clamp(1.0, 4.0) as usize
}

/// Guided filter configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidedFilter {
    /// Requested radius, as a full-resolution standard deviation.
    pub sigma: f32,
    /// Lower bound of the downsampled blur sigma.
    pub min_gsigma: f32,
    /// Covariance regularisation added to the diagonal.
    pub eps: f32,
}

impl GuidedFilter {
    /// Validates and builds a filter.
    pub fn new(sigma: f32, min_gsigma: f32, eps: f32) -> OpsResult<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(OpsError::InvalidParameter(format!("guided filter sigma {sigma}")));
        }
        if !(min_gsigma.is_finite() && min_gsigma > 0.0) {
            return Err(OpsError::InvalidParameter(format!("guided filter min sigma {min_gsigma}")));
        }
        if !(eps.is_finite() && eps > 0.0) {
            return Err(OpsError::InvalidParameter(format!("guided filter eps {eps}")));
        }
        Ok(Self {
            sigma,
            min_gsigma,
            eps,
        })
    }

    /// Downsampling factor.
    #[inline]
    pub fn scaling(&self) -> usize {
        scaling_factor(self.sigma)
    }

    /// Blur sigma on the downsampled grid.
    #[inline]
    pub fn gsigma(&self) -> f32 {
        (0.5 * self.sigma / self.scaling() as f32).max(self.min_gsigma)
    }

    /// Filters `target` (2 channels) guided by `guide` (2 channels), in place.
    ///
    /// `weight` holds one blend factor in `[0, 1]` per pixel.
    pub fn apply(
        &self,
        guide: &[f32],
        target: &mut [f32],
        weight: &[f32],
        width: usize,
        height: usize,
    ) -> OpsResult<()> {
        check_len("guided guide", guide.len(), width, height, 2)?;
        check_len("guided target", target.len(), width, height, 2)?;
        check_len("guided weight", weight.len(), width, height, 1)?;

        let scaling = self.scaling();
        let gsigma = self.gsigma();
        let ds_w = (width / scaling).max(1);
        let ds_h = (height / scaling).max(1);
        debug!(width, height, sigma = self.sigma, scaling, gsigma, ds_w, ds_h, "guided filter");

        let ds_len = ds_w * ds_h * 2;
        let mut ds_guide = alloc_buffer(ds_len)?;
        let mut ds_target = alloc_buffer(ds_len)?;
        bilinear_resample(guide, width, height, &mut ds_guide, ds_w, ds_h, 2)?;
        bilinear_resample(target, width, height, &mut ds_target, ds_w, ds_h, 2)?;

        let mut stats = alloc_buffer(ds_w * ds_h * STATS)?;
        stats
            .par_chunks_exact_mut(STATS)
            .zip(ds_guide.par_chunks_exact(2))
            .zip(ds_target.par_chunks_exact(2))
            .for_each(|((s, g), t)| {
                let (u, v, p, q) = (g[0], g[1], t[0], t[1]);
                s.copy_from_slice(&[u, v, p, q, u * u, u * v, v * v, p * u, p * v, q * u, q * v]);
            });
        drop(ds_guide);
        drop(ds_target);
        gaussian_blur(&mut stats, ds_w, ds_h, STATS, gsigma)?;

        let mut coeffs = alloc_buffer(ds_w * ds_h * COEFFS)?;
        let eps = self.eps;
        coeffs
            .par_chunks_exact_mut(COEFFS)
            .zip(stats.par_chunks_exact(STATS))
            .for_each(|(out, s)| out.copy_from_slice(&local_coefficients(s, eps)));
        drop(stats);
        gaussian_blur(&mut coeffs, ds_w, ds_h, COEFFS, gsigma)?;

        let coeffs = if ds_w == width && ds_h == height {
            coeffs
        } else {
            let mut full = alloc_buffer(width * height * COEFFS)?;
            bilinear_resample(&coeffs, ds_w, ds_h, &mut full, width, height, COEFFS)?;
            full
        };

        target
            .par_chunks_exact_mut(2)
            .zip(guide.par_chunks_exact(2))
            .zip(coeffs.par_chunks_exact(COEFFS))
            .zip(weight.par_iter())
            .for_each(|(((t, g), c), &w)| {
                let filtered = [
                    c[0] * g[0] + c[1] * g[1] + c[4],
                    c[2] * g[0] + c[3] * g[1] + c[5],
                ];
                t[0] = w * filtered[0] + (1.0 - w) * t[0];
                t[1] = w * filtered[1] + (1.0 - w) * t[1];
            });
        Ok(())
    }
}

/// Affine coefficients from blurred local statistics.
///
/// Falls back to `A = 0`, `b = mean(target)` when the regularised
/// covariance is numerically singular.
fn local_coefficients(s: &[f32], eps: f32) -> [f32; COEFFS] {
    let (mu, mv, mp, mq) = (s[0], s[1], s[2], s[3]);
    let var_u = s[4] - mu * mu + eps;
    let cov_uv = s[5] - mu * mv;
    let var_v = s[6] - mv * mv + eps;
    let cov_pu = s[7] - mp * mu;
    let cov_pv = s[8] - mp * mv;
    let cov_qu = s[9] - mq * mu;
    let cov_qv = s[10] - mq * mv;

    let det = var_u * var_v - cov_uv * cov_uv;
    if det.abs() <= DET_FLOOR || !det.is_finite() {
        return [0.0, 0.0, 0.0, 0.0, mp, mq];
    }
    let inv = [var_v / det, -cov_uv / det, var_u / det];

    let a_pu = cov_pu * inv[0] + cov_pv * inv[1];
    let a_pv = cov_pu * inv[1] + cov_pv * inv[2];
    let a_qu = cov_qu * inv[0] + cov_qv * inv[1];
    let a_qv = cov_qu * inv[1] + cov_qv * inv[2];
    [
        a_pu,
        a_pv,
        a_qu,
        a_qv,
        mp - a_pu * mu - a_pv * mv,
        mq - a_qu * mu - a_qv * mv,
    ]
}
