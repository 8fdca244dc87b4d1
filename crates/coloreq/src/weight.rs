//! Achromatic weighting.
//!
//! Near-grey pixels have an unstable hue, so their corrections are faded
//! out. The weight is a sigmoid of the relative spread of the compressed
//! XYZ components: close to 0 for neutrals, close to 1 for colorful pixels.

const SPREAD_EPS: f32 = 1e-6;
const SIGMOID_SLOPE: f32 = 20.0;
const SIGMOID_CENTER: f32 = 0.4;

/// Soft compression `a / (0.5 - 0.5a + a)`, mapping `[0, inf)` into `[0, 2)`.
#[inline]
pub fn compress(a: f32) -> f32 {
    let a = a.max(0.0);
    a / (0.5 - 0.5 * a + a)
}

/// Relative spread `(max - min) / max` of the compressed XYZ components.
///
/// Zero when either the maximum or the spread is negligible.
#[inline]
pub fn chroma_spread(xyz: [f32; 3]) -> f32 {
    let c = xyz.map(compress);
    let max = c[0].max(c[1]).max(c[2]);
    let min = c[0].min(c[1]).min(c[2]);
    let delta = max - min;
    if max.abs() > SPREAD_EPS && delta.abs() > SPREAD_EPS {
        delta / max
    } else {
        0.0
    }
}

/// Correction weight in `[0, 1]` for a pixel given in XYZ.
#[inline]
pub fn achromatic_weight(xyz: [f32; 3]) -> f32 {
    let spread = chroma_spread(xyz);
    let w = 1.0 / (1.0 + (-SIGMOID_SLOPE * (2.0 * spread - SIGMOID_CENTER)).exp());
    w.clamp(0.0, 1.0)
}
