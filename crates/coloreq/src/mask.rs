//! Diagnostic mask rendering.
//!
//! Replaces the color output with a grey ramp of the pixel brightness,
//! tinted by the signed strength of one quantity: yellow where it is
//! positive, blue where it is negative.

use std::fmt;
use std::str::FromStr;

use coloreq_core::CHANNELS;
use rayon::prelude::*;

use crate::error::GradeError;

/// Quantity shown by a mask render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaskKind {
    /// Achromatic weight, centred on 0.5.
    #[default]
    Weight,
    /// Hue offset.
    Hue,
    /// Saturation gain minus one.
    Saturation,
    /// Brightness delta.
    Brightness,
}

impl MaskKind {
    /// All kinds.
    pub const ALL: [MaskKind; 4] = [
        MaskKind::Weight,
        MaskKind::Hue,
        MaskKind::Saturation,
        MaskKind::Brightness,
    ];

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            MaskKind::Weight => "weight",
            MaskKind::Hue => "hue",
            MaskKind::Saturation => "saturation",
            MaskKind::Brightness => "brightness",
        }
    }

    /// Signed tint strength for one pixel.
    #[inline]
    fn strength(self, hue: f32, saturation: f32, brightness: f32, weight: f32) -> f32 {
        match self {
            MaskKind::Weight => 0.5 * (weight - 0.5),
            MaskKind::Hue => 0.2 * hue,
            MaskKind::Saturation => saturation - 1.0,
            MaskKind::Brightness => 6.0 * brightness,
        }
    }
}

impl fmt::Display for MaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MaskKind {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        MaskKind::ALL
            .into_iter()
            .find(|kind| kind.name() == key)
            .ok_or_else(|| GradeError::InvalidParameter(format!("unknown mask kind '{s}'")))
    }
}

/// Tinted grey for brightness `val` and signed strength `corr`.
#[inline]
pub(crate) fn tint(val: f32, corr: f32) -> [f32; 3] {
    let neg = corr < 0.0;
    let c = corr.abs();
    [
        (if neg { val - c } else { val }).max(0.0),
        (val - c).max(0.0),
        (if neg { val } else { val - c }).max(0.0),
    ]
}

/// Overwrites the HSB pixels of `data` with the mask of `kind`.
///
/// `hue` has one entry per pixel, `gains` two (saturation gain, brightness
/// delta). Alpha is left alone.
pub(crate) fn render_mask(
    data: &mut [f32],
    kind: MaskKind,
    hue: &[f32],
    gains: &[f32],
    weights: &[f32],
) {
    let b_max = data
        .par_chunks_exact(CHANNELS)
        .map(|px| px[2])
        .reduce(|| 0.01, f32::max);
    let norm = 1.5 / b_max;

    data.par_chunks_exact_mut(CHANNELS)
        .zip(hue.par_iter())
        .zip(gains.par_chunks_exact(2))
        .zip(weights.par_iter())
        .for_each(|(((px, &h), g), &w)| {
            let val = px[2] * norm;
            let rgb = tint(val, kind.strength(h, g[0], g[1], w));
            px[..3].copy_from_slice(&rgb);
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tint_directions() {
        assert_eq!(tint(0.5, 0.0), [0.5, 0.5, 0.5]);
        // Positive: yellow
        assert_eq!(tint(0.5, 0.25), [0.5, 0.25, 0.25]);
        // Negative: blue
        assert_eq!(tint(0.5, -0.25), [0.25, 0.25, 0.5]);
        assert_eq!(tint(0.1, 0.5), [0.1, 0.0, 0.0]);
    }

    #[test]
    fn strengths() {
        assert_eq!(MaskKind::Weight.strength(0.0, 1.0, 0.0, 0.5), 0.0);
        assert_eq!(MaskKind::Hue.strength(1.0, 1.0, 0.0, 1.0), 0.2);
        assert_eq!(MaskKind::Saturation.strength(0.0, 1.5, 0.0, 1.0), 0.5);
        assert_eq!(MaskKind::Brightness.strength(0.0, 1.0, -0.1, 1.0), -0.6);
    }

    #[test]
    fn render_normalises_brightness() {
        let mut data = vec![0.0, 0.0, 0.2, 1.0, 0.0, 0.0, 0.4, 0.5];
        render_mask(&mut data, MaskKind::Saturation, &[0.0, 0.0], &[1.0, 0.0, 1.0, 0.0], &[1.0, 1.0]);
        assert!((data[0] - 0.75).abs() < 1e-6);
        assert!((data[4] - 1.5).abs() < 1e-6);
        assert_eq!(data[3], 1.0);
        assert_eq!(data[7], 0.5);
    }

    #[test]
    fn parse() {
        assert_eq!("Hue".parse::<MaskKind>().unwrap(), MaskKind::Hue);
        assert!("chroma".parse::<MaskKind>().is_err());
    }
}
