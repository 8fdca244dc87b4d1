//! Bilinear resampling.
//!
//! Pixel centres are aligned: destination pixel `x` samples the source at
//! `(x + 0.5) * src_w / dst_w - 0.5`, clamped to the source edge. The same
//! routine serves both the downsampling and the upsampling of the guided
//! filter.

use crate::{check_len, OpsResult};
use rayon::prelude::*;
use tracing::trace;

/// Resizes `src` (`src_w x src_h`) into `dst` (`dst_w x dst_h`).
///
/// # Example
///
/// ```rust
/// use coloreq_ops::resample::bilinear_resample;
///
/// let src = vec![0.0, 1.0, 0.0, 1.0]; // 2x2, one channel
/// let mut dst = vec![0.0; 16];
/// bilinear_resample(&src, 2, 2, &mut dst, 4, 4, 1).unwrap();
/// assert_eq!(dst[0], 0.0);
/// assert_eq!(dst[3], 1.0);
/// ```
pub fn bilinear_resample(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    dst: &mut [f32],
    dst_w: usize,
    dst_h: usize,
    channels: usize,
) -> OpsResult<()> {
    check_len("bilinear_resample src", src.len(), src_w, src_h, channels)?;
    check_len("bilinear_resample dst", dst.len(), dst_w, dst_h, channels)?;
    trace!(src_w, src_h, dst_w, dst_h, channels, "bilinear_resample");

    if src_w == dst_w && src_h == dst_h {
        dst.copy_from_slice(src);
        return Ok(());
    }

    let taps_x: Vec<(usize, usize, f32)> = (0..dst_w).map(|x| taps(x, src_w, dst_w)).collect();
    let sx_stride = src_w * channels;

    dst.par_chunks_mut(dst_w * channels)
        .enumerate()
        .for_each(|(y, row)| {
            let (y0, y1, fy) = taps(y, src_h, dst_h);
            let r0 = &src[y0 * sx_stride..(y0 + 1) * sx_stride];
            let r1 = &src[y1 * sx_stride..(y1 + 1) * sx_stride];
            for (x, &(x0, x1, fx)) in taps_x.iter().enumerate() {
                for c in 0..channels {
                    let top = r0[x0 * channels + c] * (1.0 - fx) + r0[x1 * channels + c] * fx;
                    let bottom = r1[x0 * channels + c] * (1.0 - fx) + r1[x1 * channels + c] * fx;
                    row[x * channels + c] = top * (1.0 - fy) + bottom * fy;
                }
            }
        });
    Ok(())
}

/// Source neighbours and blend factor for destination coordinate `d`.
#[inline]
fn taps(d: usize, src_len: usize, dst_len: usize) -> (usize, usize, f32) {
    let pos = ((d as f32 + 0.5) * src_len as f32 / dst_len as f32 - 0.5)
        .clamp(0.0, (src_len - 1) as f32);
    let i0 = pos as usize;
    let i1 = (i0 + 1).min(src_len - 1);
    (i0, i1, pos - i0 as f32)
}
