//! Interpolation and angle helpers.

use std::f32::consts::PI;

/// Linear interpolation between `a` and `b`.
///
/// ```rust
/// use coloreq_math::lerp;
/// assert_eq!(lerp(0.0, 10.0, 0.25), 2.5);
/// ```
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wraps an angle in radians into `[-π, π)`.
///
/// ```rust
/// use coloreq_math::wrap_pi;
/// use std::f32::consts::PI;
///
/// assert!((wrap_pi(1.5 * PI) + 0.5 * PI).abs() < 1e-6);
/// assert_eq!(wrap_pi(PI), -PI);
/// ```
#[inline]
pub fn wrap_pi(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    // rem_euclid can round up to exactly 2π
    if wrapped >= PI { wrapped - 2.0 * PI } else { wrapped }
}
