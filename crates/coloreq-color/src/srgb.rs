//! sRGB transfer function (IEC 61966-2-1).
//!
//! Used to linearise 8/16-bit sRGB-encoded pixels on load and to encode
//! the equalizer output on save. Negative inputs are mirrored so the
//! functions stay invertible on out-of-gamut data.

/// Decodes an sRGB-encoded value to linear light.
///
/// ```rust
/// use coloreq_color::srgb::eotf;
///
/// assert!((eotf(0.5) - 0.214).abs() < 0.001);
/// ```
#[inline]
pub fn eotf(v: f32) -> f32 {
    let a = v.abs();
    let l = if a <= 0.04045 {
        a / 12.92
    } else {
        ((a + 0.055) / 1.055).powf(2.4)
    };
    l.copysign(v)
}

/// Encodes linear light to sRGB.
#[inline]
pub fn oetf(l: f32) -> f32 {
    let a = l.abs();
    let v = if a <= 0.0031308 {
        a * 12.92
    } else {
        1.055 * a.powf(1.0 / 2.4) - 0.055
    };
    v.copysign(l)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_roundtrip() {
        for i in 0..=20 {
            let v = i as f32 / 20.0;
            assert_abs_diff_eq!(oetf(eotf(v)), v, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(eotf(0.0), 0.0);
        assert_abs_diff_eq!(eotf(1.0), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(oetf(-0.5), -oetf(0.5), epsilon = 1e-7);
    }
}
