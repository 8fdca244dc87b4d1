//! The per-image equalizer pipeline.
//!
//! ```text
//! RGB --> XYZ --> weight, UV, L*            (per pixel)
//!          weight blur                      (barrier)
//!          UV prefilter, self-guided        (barrier, optional)
//!          JCH --> HSB, table lookups       (per pixel)
//!          correction filter, UV-guided     (barrier, optional)
//!          apply, gamut map, HSB --> RGB    (per pixel)  | or mask render
//! ```
//!
//! Every pass runs to completion before the next starts. Working buffers
//! belong to one call and are dropped when it returns.

use std::sync::Arc;

use coloreq_color::{gamut_map, ucs, GamutCache, GamutLut, WorkingProfile};
use coloreq_core::{alloc_buffer, RgbaImage, CHANNELS};
use coloreq_ops::blur::gaussian_blur;
use coloreq_ops::GuidedFilter;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{GradeError, GradeResult};
use crate::grade::{CompiledGrade, Corrections};
use crate::mask::{render_mask, MaskKind};
use crate::weight::achromatic_weight;

/// Regularisation of the chromaticity prefilter.
pub const PREFILTER_EPS: f32 = 1e-5;
/// Smallest downsampled blur of the chromaticity prefilter.
pub const PREFILTER_MIN_GSIGMA: f32 = 0.3;
/// Regularisation of the correction filter.
pub const CORRECTION_EPS: f32 = 1e-6;
/// Smallest downsampled blur of the correction filter.
pub const CORRECTION_MIN_GSIGMA: f32 = 0.2;

/// Saturation correction strength.
const SATURATION_STRENGTH: f32 = 1.5;
/// Brightness correction strength.
const BRIGHTNESS_STRENGTH: f32 = 6.0;

/// What the pipeline writes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Graded color.
    #[default]
    Normal,
    /// Diagnostic mask of one quantity.
    Mask(MaskKind),
}

/// Per-invocation options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    /// Pixel scale of the image relative to full resolution. Filter radii
    /// are multiplied by it.
    pub scale: f32,
    /// Output mode.
    pub mode: RenderMode,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            mode: RenderMode::Normal,
        }
    }
}

/// Output stage, resolved once per call.
enum Finish {
    Color(Arc<GamutLut>),
    Mask(MaskKind),
}

/// Applies a [`CompiledGrade`] to images.
///
/// # Example
///
/// ```rust
/// use coloreq::{ColorEqualizer, GradeParams, PipelineOptions};
/// use coloreq_color::{GamutCache, WorkingProfile};
/// use coloreq_core::RgbaImage;
///
/// let grade = GradeParams::identity().compile().unwrap();
/// let eq = ColorEqualizer::new(grade, PipelineOptions::default()).unwrap();
/// let profile = WorkingProfile::srgb().unwrap();
/// let cache = GamutCache::new();
///
/// let image = RgbaImage::filled(4, 4, [0.5, 0.3, 0.2, 1.0]).unwrap();
/// let out = eq.process(&image, Some(&profile), &cache).unwrap();
/// assert!((out.pixel(1, 1)[0] - 0.5).abs() < 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct ColorEqualizer {
    grade: CompiledGrade,
    options: PipelineOptions,
}

impl ColorEqualizer {
    /// Pipeline for `grade` with `options`.
    pub fn new(grade: CompiledGrade, options: PipelineOptions) -> GradeResult<Self> {
        if !(options.scale.is_finite() && options.scale > 0.0) {
            return Err(GradeError::InvalidParameter(format!(
                "pipeline scale must be finite and > 0, got {}",
                options.scale
            )));
        }
        Ok(Self { grade, options })
    }

    /// The compiled grade.
    pub fn grade(&self) -> &CompiledGrade {
        &self.grade
    }

    /// The options.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Grades a copy of `image`.
    ///
    /// `image` holds linear RGB in `profile`'s primaries plus alpha. Without
    /// a profile the copy is returned unchanged.
    pub fn process(
        &self,
        image: &RgbaImage,
        profile: Option<&WorkingProfile>,
        gamut: &GamutCache,
    ) -> GradeResult<RgbaImage> {
        let mut out = image.try_clone()?;
        self.process_in_place(&mut out, profile, gamut)?;
        Ok(out)
    }

    /// Grades `image` in place.
    pub fn process_in_place(
        &self,
        image: &mut RgbaImage,
        profile: Option<&WorkingProfile>,
        gamut: &GamutCache,
    ) -> GradeResult<()> {
        let Some(profile) = profile else {
            warn!("no working profile available, image passed through");
            return Ok(());
        };

        let (width, height) = image.dimensions();
        let (w, h) = (width as usize, height as usize);
        let n = image.pixel_count();
        let grade = &self.grade;
        let scale = self.options.scale;
        let white = grade.white;
        debug!(
            width,
            height,
            profile = profile.name(),
            use_filter = grade.use_filter,
            mode = ?self.options.mode,
            "color equalizer start"
        );

        let finish = match self.options.mode {
            RenderMode::Normal => Finish::Color(gamut.get_or_build(profile)),
            RenderMode::Mask(kind) => Finish::Mask(kind),
        };

        let mut uv = alloc_buffer(n * 2)?;
        let mut lightness = alloc_buffer(n)?;
        let mut weights = alloc_buffer(n)?;
        let mut hue = alloc_buffer(n)?;
        let mut gains = alloc_buffer(n * 2)?;

        image
            .data()
            .par_chunks_exact(CHANNELS)
            .zip(uv.par_chunks_exact_mut(2))
            .zip(lightness.par_iter_mut())
            .zip(weights.par_iter_mut())
            .for_each(|(((px, uv), l), wt)| {
                let xyz = profile.rgb_to_xyz([px[0], px[1], px[2]]);
                *wt = achromatic_weight(xyz);
                uv.copy_from_slice(&ucs::xyz_to_uv(xyz));
                *l = ucs::y_to_lightness(xyz[1]);
            });

        gaussian_blur(&mut weights, w, h, 1, scale)?;

        if grade.use_filter {
            let mut guide = alloc_buffer(n * 2)?;
            guide.copy_from_slice(&uv);
            GuidedFilter::new(grade.chroma_size * scale, PREFILTER_MIN_GSIGMA, PREFILTER_EPS)?
                .apply(&guide, &mut uv, &weights, w, h)?;
        }

        // HSB goes into the RGB slots, alpha stays
        image
            .data_mut()
            .par_chunks_exact_mut(CHANNELS)
            .zip(uv.par_chunks_exact(2))
            .zip(lightness.par_iter())
            .zip(hue.par_iter_mut().zip(gains.par_chunks_exact_mut(2)))
            .for_each(|(((px, uv), &l), (hue_out, gain_out))| {
                let jch = ucs::uvl_to_jch(l, white, [uv[0], uv[1]]);
                let hsb = ucs::jch_to_hsb(jch);
                px[..3].copy_from_slice(&hsb);
                let c = if jch[1] > 0.0 {
                    grade.corrections(hsb[0], hsb[1])
                } else {
                    Corrections::NEUTRAL
                };
                *hue_out = c.hue;
                gain_out[0] = c.saturation;
                gain_out[1] = c.brightness;
            });
        drop(lightness);

        // Hue corrections are angular and stay unfiltered
        if grade.use_filter {
            GuidedFilter::new(grade.param_size * scale, CORRECTION_MIN_GSIGMA, CORRECTION_EPS)?
                .apply(&uv, &mut gains, &weights, w, h)?;
        }

        match finish {
            Finish::Color(lut) => apply_corrections(image.data_mut(), &hue, &gains, &lut, white, profile),
            Finish::Mask(kind) => render_mask(image.data_mut(), kind, &hue, &gains, &weights),
        }
        debug!(width, height, "color equalizer done");
        Ok(())
    }
}

/// Applies corrections to the HSB pixels of `data` and converts them back
/// to RGB.
fn apply_corrections(
    data: &mut [f32],
    hue: &[f32],
    gains: &[f32],
    lut: &GamutLut,
    white: f32,
    profile: &WorkingProfile,
) {
    data.par_chunks_exact_mut(CHANNELS)
        .zip(hue.par_iter())
        .zip(gains.par_chunks_exact(2))
        .for_each(|((px, &dh), g)| {
            let hsb = [
                px[0] + dh,
                (px[1] * (1.0 + SATURATION_STRENGTH * (g[0] - 1.0))).max(0.0),
                (px[2] * (1.0 + BRIGHTNESS_STRENGTH * g[1])).max(0.0),
            ];
            let hsb = gamut_map(hsb, lut, white);
            let rgb = profile.xyz_to_rgb(hsb_to_xyz(hsb, white));
            px[..3].copy_from_slice(&rgb);
        });
}

/// HSB back to XYZ, falling back to the neutral of the same lightness
/// when the chromaticity has no inverse.
fn hsb_to_xyz(hsb: [f32; 3], white: f32) -> [f32; 3] {
    let jch = ucs::hsb_to_jch(hsb);
    ucs::jch_to_xyz(jch, white)
        .unwrap_or_else(|| ucs::neutral_xyz(ucs::lightness_to_y(jch[0] * white)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GradeParams;
    use approx::assert_abs_diff_eq;

    fn srgb() -> WorkingProfile {
        WorkingProfile::srgb().unwrap()
    }

    #[test]
    fn rejects_bad_scale() {
        let grade = GradeParams::default().compile().unwrap();
        let options = PipelineOptions {
            scale: 0.0,
            ..PipelineOptions::default()
        };
        assert!(ColorEqualizer::new(grade, options).is_err());
    }

    #[test]
    fn hsb_inverse_round_trip() {
        let profile = srgb();
        let white = ucs::y_to_lightness(2.0);
        let xyz = profile.rgb_to_xyz([0.4, 0.25, 0.1]);
        let jch = ucs::uvl_to_jch(ucs::y_to_lightness(xyz[1]), white, ucs::xyz_to_uv(xyz));
        let back = hsb_to_xyz(ucs::jch_to_hsb(jch), white);
        for c in 0..3 {
            assert_abs_diff_eq!(back[c], xyz[c], epsilon = 1e-5);
        }
    }

    #[test]
    fn black_stays_black() {
        let grade = GradeParams::default().compile().unwrap();
        let eq = ColorEqualizer::new(grade, PipelineOptions::default()).unwrap();
        let image = RgbaImage::filled(8, 8, [0.0, 0.0, 0.0, 1.0]).unwrap();
        let out = eq.process(&image, Some(&srgb()), &GamutCache::new()).unwrap();
        for &v in out.data() {
            assert!(v.is_finite());
        }
        assert_abs_diff_eq!(out.pixel(3, 3)[1], 0.0, epsilon = 1e-6);
    }
}
