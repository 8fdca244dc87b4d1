//! darktable UCS 22 conversions.
//!
//! Chromaticity is computed from xyY through a projective transform,
//! per-axis hyperbolic compression and a final 2x2 rotation, giving the
//! `U*'V*'` plane in which D65 sits at the origin and hue is
//! `atan2(V, U)`. Lightness `L*` is a compressive function of `Y` alone.
//!
//! The projective step suffers from cancellation around the white point,
//! so the xy <-> UV transforms run in `f64` and only hand `f32` values
//! back to the caller.
//!
//! # Reference
//!
//! Aurélien Pierre, "darktable UCS 22: a perceptually uniform color space
//! for image saturation and chroma editing" (2022).

use glam::{DMat2, DMat3, DVec2, DVec3};

/// D65 chromaticity used for black (empty xyY sum).
const D65_XY: [f64; 2] = [0.3127, 0.3290];

/// xy to (U, V, D), columns multiply (x, y, 1).
const M1: DMat3 = DMat3::from_cols(
    DVec3::new(-0.783941002840055, 0.745273540913283, 0.318707282433486),
    DVec3::new(0.277512987809202, -0.205375866083878, 2.16743692732158),
    DVec3::new(0.153836578598858, -0.165478376301988, 0.291320554395942),
);

const M1_INV: DMat3 = DMat3::from_cols(
    DVec3::new(-5.907097025231249, 5.334223351499549, -33.22442472591164),
    DVec3::new(-4.992907175621025, 5.483550494279739, -35.33555666229698),
    DVec3::new(0.28322554697810426, 0.29798914280715133, 0.9057420754016754),
);

/// Rotation of the compressed (U*, V*) plane.
const M2: DMat2 = DMat2::from_cols(
    DVec2::new(-1.124983854323892, 1.86323315098672),
    DVec2::new(-0.980483721769325, 1.971853092390862),
);

const M2_INV: DMat2 = DMat2::from_cols(
    DVec2::new(-5.037522385190728, 4.760029407436476),
    DVec2::new(-2.504856328185852, 2.8740129632392555),
);

/// Compression asymptotes of U* and V*.
const FACTORS: DVec2 = DVec2::new(1.39656225667, 1.4513954287);
/// Half-saturation constants of the compression.
const HALF_VALUES: DVec2 = DVec2::new(1.49217352929, 1.52488637914);

const L_STAR_MAX: f32 = 2.098883786377;
const L_STAR_HALF: f32 = 1.12426773749357;
const L_STAR_EXP: f32 = 0.631651345306265;
const L_STAR_EXP_INV: f32 = 1.5831518565279648;

const CHROMA_SCALE: f32 = 15.932993652962535;
const CHROMA_L_EXP: f32 = 0.6523997524738018;
const CHROMA_M2_EXP: f32 = 0.6007557017508491;
const CHROMA_M_EXP_INV: f32 = 0.8322850678616855;

const BRIGHTNESS_EXP: f32 = 1.33654221029386;

/// Upper bound of `L*` that still maps back to a finite luminance.
pub const MAX_LIGHTNESS: f32 = 2.098;

/// XYZ (D65) to `U*'V*'` chromaticity.
///
/// ```rust
/// use coloreq_color::ucs::xyz_to_uv;
///
/// let uv = xyz_to_uv([0.95047, 1.0, 1.08883]);
/// assert!(uv[0].hypot(uv[1]) < 1e-4);
/// ```
pub fn xyz_to_uv(xyz: [f32; 3]) -> [f32; 2] {
    let sum = xyz[0] as f64 + xyz[1] as f64 + xyz[2] as f64;
    let xy = if sum > 0.0 {
        [xyz[0] as f64 / sum, xyz[1] as f64 / sum]
    } else {
        D65_XY
    };
    xy_to_uv(xy)
}

fn xy_to_uv(xy: [f64; 2]) -> [f32; 2] {
    let uvd = M1 * DVec3::new(xy[0], xy[1], 1.0);
    let uv = DVec2::new(uvd.x, uvd.y) / uvd.z;
    let star = FACTORS * uv / (uv.abs() + HALF_VALUES);
    let prime = M2 * star;
    [prime.x as f32, prime.y as f32]
}

/// `U*'V*'` back to xy chromaticity.
///
/// Returns `None` outside the domain of the compression (beyond its
/// asymptotes) or when the projective division degenerates.
pub fn uv_to_xy(uv: [f32; 2]) -> Option<[f64; 2]> {
    let star = M2_INV * DVec2::new(uv[0] as f64, uv[1] as f64);
    let room = FACTORS - star.abs();
    if room.x <= 0.0 || room.y <= 0.0 {
        return None;
    }
    let plain = HALF_VALUES * star / room;
    let xyw = M1_INV * DVec3::new(plain.x, plain.y, 1.0);
    if xyw.z <= 0.0 {
        return None;
    }
    let (x, y) = (xyw.x / xyw.z, xyw.y / xyw.z);
    (y > 0.0 && x.is_finite()).then_some([x, y])
}

/// `U*'V*'` and luminance back to XYZ (D65).
pub fn uv_to_xyz(uv: [f32; 2], y_lum: f32) -> Option<[f32; 3]> {
    let [x, y] = uv_to_xy(uv)?;
    let big_y = y_lum as f64;
    Some([
        (big_y * x / y) as f32,
        y_lum,
        (big_y * (1.0 - x - y) / y) as f32,
    ])
}

/// XYZ of an achromatic (D65) color of luminance `y_lum`.
pub fn neutral_xyz(y_lum: f32) -> [f32; 3] {
    let [x, y] = D65_XY;
    let big_y = y_lum as f64;
    [(big_y * x / y) as f32, y_lum, (big_y * (1.0 - x - y) / y) as f32]
}

/// Luminance `Y` to UCS lightness `L*`.
#[inline]
pub fn y_to_lightness(y: f32) -> f32 {
    let y_hat = y.max(0.0).powf(L_STAR_EXP);
    L_STAR_MAX * y_hat / (y_hat + L_STAR_HALF)
}

/// UCS lightness `L*` back to luminance `Y`.
#[inline]
pub fn lightness_to_y(l: f32) -> f32 {
    let l = l.clamp(0.0, MAX_LIGHTNESS);
    (L_STAR_HALF * l / (L_STAR_MAX - l)).powf(L_STAR_EXP_INV)
}

/// Lightness and chromaticity to `[J, C, H]` relative to `white` lightness.
///
/// `H` is in radians, `[-π, π]`.
#[inline]
pub fn uvl_to_jch(l: f32, white: f32, uv: [f32; 2]) -> [f32; 3] {
    let m2 = uv[0] * uv[0] + uv[1] * uv[1];
    [
        l / white,
        CHROMA_SCALE * l.max(0.0).powf(CHROMA_L_EXP) * m2.powf(CHROMA_M2_EXP) / white,
        uv[1].atan2(uv[0]),
    ]
}

/// Colorfulness `M = |U*'V*'|` of a JCH triplet.
#[inline]
pub fn jch_colorfulness(jch: [f32; 3], white: f32) -> f32 {
    let l = jch[0] * white;
    if l <= 0.0 {
        return 0.0;
    }
    (jch[1] * white / (CHROMA_SCALE * l.powf(CHROMA_L_EXP))).max(0.0).powf(CHROMA_M_EXP_INV)
}

/// Chroma `C` reached by colorfulness `m` at relative lightness `j`.
#[inline]
pub fn chroma_from_colorfulness(j: f32, m: f32, white: f32) -> f32 {
    let l = (j * white).max(0.0);
    CHROMA_SCALE * l.powf(CHROMA_L_EXP) * (m * m).powf(CHROMA_M2_EXP) / white
}

/// `[J, C, H]` back to `(L*, uv)`.
#[inline]
pub fn jch_to_uvl(jch: [f32; 3], white: f32) -> (f32, [f32; 2]) {
    let m = jch_colorfulness(jch, white);
    let (sin, cos) = jch[2].sin_cos();
    (jch[0] * white, [m * cos, m * sin])
}

/// `[J, C, H]` back to XYZ (D65).
pub fn jch_to_xyz(jch: [f32; 3], white: f32) -> Option<[f32; 3]> {
    let (l, uv) = jch_to_uvl(jch, white);
    uv_to_xyz(uv, lightness_to_y(l))
}

/// `[J, C, H]` to `[H, S, B]`.
#[inline]
pub fn jch_to_hsb(jch: [f32; 3]) -> [f32; 3] {
    let b = jch[0] * (jch[1].max(0.0).powf(BRIGHTNESS_EXP) + 1.0);
    let s = if b > 0.0 { jch[1] / b } else { 0.0 };
    [jch[2], s, b]
}

/// `[H, S, B]` to `[J, C, H]`.
#[inline]
pub fn hsb_to_jch(hsb: [f32; 3]) -> [f32; 3] {
    let c = hsb[1] * hsb[2];
    [hsb[2] / (c.max(0.0).powf(BRIGHTNESS_EXP) + 1.0), c, hsb[0]]
}
