//! Separable Gaussian blur.
//!
//! The horizontal pass runs over rows in parallel. The vertical pass
//! transposes the buffer, reuses the horizontal pass and transposes back,
//! so both passes write whole rows and never share output memory.
//! Borders are edge-clamped.

use crate::{check_len, OpsError, OpsResult};
use coloreq_core::alloc_buffer;
use rayon::prelude::*;
use tracing::trace;

/// Normalised 1D Gaussian kernel of radius `ceil(3 * sigma)`.
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (3.0 * sigma).ceil().max(1.0) as usize;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..=2 * radius)
        .map(|i| {
            let d = i as f32 - radius as f32;
            (-d * d / denom).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|w| *w /= sum);
    kernel
}

/// Blurs `buf` in place with standard deviation `sigma` (pixels).
///
/// A non-positive `sigma` leaves the buffer untouched.
///
/// # Errors
///
/// Dimension mismatch, non-finite sigma, or scratch allocation failure.
pub fn gaussian_blur(
    buf: &mut [f32],
    width: usize,
    height: usize,
    channels: usize,
    sigma: f32,
) -> OpsResult<()> {
    check_len("gaussian_blur", buf.len(), width, height, channels)?;
    if !sigma.is_finite() {
        return Err(OpsError::InvalidParameter(format!("blur sigma {sigma}")));
    }
    if sigma <= 0.0 {
        return Ok(());
    }
    let kernel = gaussian_kernel(sigma);
    trace!(width, height, channels, sigma, taps = kernel.len(), "gaussian_blur");

    let mut rows = alloc_buffer(buf.len())?;
    let mut cols = alloc_buffer(buf.len())?;

    blur_rows(buf, &mut rows, width, channels, &kernel);
    transpose(&rows, &mut cols, width, height, channels);
    blur_rows(&cols, &mut rows, height, channels, &kernel);
    transpose(&rows, buf, height, width, channels);
    Ok(())
}

fn blur_rows(src: &[f32], dst: &mut [f32], width: usize, channels: usize, kernel: &[f32]) {
    let radius = kernel.len() / 2;
    let stride = width * channels;
    dst.par_chunks_mut(stride)
        .zip(src.par_chunks(stride))
        .for_each(|(out, row)| {
            for x in 0..width {
                for c in 0..channels {
                    let mut sum = 0.0f32;
                    for (k, w) in kernel.iter().enumerate() {
                        let sx = (x + k).saturating_sub(radius).min(width - 1);
                        sum += w * row[sx * channels + c];
                    }
                    out[x * channels + c] = sum;
                }
            }
        });
}

/// Transposes a `width x height` image into `height x width`.
fn transpose(src: &[f32], dst: &mut [f32], width: usize, height: usize, channels: usize) {
    dst.par_chunks_mut(height * channels)
        .enumerate()
        .for_each(|(x, col)| {
            for y in 0..height {
                let s = (y * width + x) * channels;
                col[y * channels..(y + 1) * channels].copy_from_slice(&src[s..s + channels]);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_kernel_normalised() {
        let k = gaussian_kernel(2.0);
        assert_eq!(k.len(), 13);
        assert_abs_diff_eq!(k.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(k[0], k[12]);
    }

    #[test]
    fn test_constant_preserved() {
        let mut buf = vec![0.25f32; 20 * 10 * 3];
        gaussian_blur(&mut buf, 20, 10, 3, 2.5).unwrap();
        for v in buf {
            assert_abs_diff_eq!(v, 0.25, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_impulse_symmetric() {
        let (w, h) = (15, 9);
        let mut buf = vec![0.0f32; w * h];
        buf[4 * w + 7] = 1.0;
        gaussian_blur(&mut buf, w, h, 1, 1.0).unwrap();
        assert_abs_diff_eq!(buf[4 * w + 6], buf[4 * w + 8], epsilon = 1e-7);
        assert_abs_diff_eq!(buf[3 * w + 7], buf[5 * w + 7], epsilon = 1e-7);
        assert!(buf[4 * w + 7] > buf[4 * w + 8]);
    }

    #[test]
    fn test_channels_independent() {
        let mut buf: Vec<f32> = (0..8 * 8).flat_map(|_| [1.0, 0.0]).collect();
        gaussian_blur(&mut buf, 8, 8, 2, 1.0).unwrap();
        for px in buf.chunks(2) {
            assert_abs_diff_eq!(px[0], 1.0, epsilon = 1e-6);
            assert_abs_diff_eq!(px[1], 0.0);
        }
    }

    #[test]
    fn test_zero_sigma_noop() {
        let mut buf = vec![0.0, 1.0, 0.0, 1.0];
        gaussian_blur(&mut buf, 4, 1, 1, 0.0).unwrap();
        assert_eq!(buf, vec![0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_size_mismatch() {
        let mut buf = vec![0.0; 10];
        assert!(matches!(
            gaussian_blur(&mut buf, 4, 4, 1, 1.0),
            Err(OpsError::SizeMismatch(_))
        ));
    }
}
