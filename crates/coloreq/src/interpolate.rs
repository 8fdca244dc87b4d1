//! Periodic radial-basis interpolation of the node values.
//!
//! The kernel between two hues `a` and `b` is a wrapped Gaussian written as
//! a truncated Fourier series:
//!
//! ```text
//! K(d) = exp( sum_{l < m} exp(-l^2 / s) * cos(l * |d|) ),   m = ceil(3 * sqrt(s))
//! ```
//!
//! where `s` is the smoothing. The curve is the node mean plus a weighted
//! sum of kernels centred on the nodes. Weights come from solving the 8x8
//! system `K x = y - mean(y)`, which makes the curve pass exactly through
//! every node value and reduces to the mean when all nodes agree.

use std::f64::consts::PI;

use coloreq_color::HueLut;
use coloreq_math::solve_dense;
use tracing::trace;

use crate::error::{GradeError, GradeResult};
use crate::nodes::{node_angle, NODE_COUNT};

/// Builds hue curves from the eight node values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeInterpolator {
    smoothing: f64,
    hue_shift: f32,
    clip: bool,
}

impl NodeInterpolator {
    /// Interpolator for kernel smoothing `smoothing`, node shift in degrees.
    ///
    /// With `clip` set, curve values are clamped to be non-negative.
    pub fn new(smoothing: f64, hue_shift: f32, clip: bool) -> GradeResult<Self> {
        if !(smoothing.is_finite() && smoothing > 0.0) {
            return Err(GradeError::InvalidParameter(format!(
                "interpolation smoothing must be finite and > 0, got {smoothing}"
            )));
        }
        if !hue_shift.is_finite() {
            return Err(GradeError::InvalidParameter(format!("hue shift {hue_shift}")));
        }
        Ok(Self {
            smoothing,
            hue_shift,
            clip,
        })
    }

    /// Kernel smoothing.
    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    /// Fits the curve through `values`.
    pub fn fit(&self, values: &[f32; NODE_COUNT]) -> GradeResult<HueCurve> {
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(GradeError::InvalidParameter(format!("node value {bad}")));
        }

        let terms = (3.0 * self.smoothing.sqrt()).ceil().max(1.0) as usize;
        let series: Vec<f64> = (0..terms)
            .map(|l| (-((l * l) as f64) / self.smoothing).exp())
            .collect();
        let angles: [f64; NODE_COUNT] = std::array::from_fn(|k| node_angle(k, self.hue_shift));

        let mut system = Vec::with_capacity(NODE_COUNT * NODE_COUNT);
        for &a in &angles {
            for &b in &angles {
                system.push(kernel(&series, a - b));
            }
        }
        let mean = values.iter().map(|&v| v as f64).sum::<f64>() / NODE_COUNT as f64;
        let rhs: Vec<f64> = values.iter().map(|&v| v as f64 - mean).collect();
        let solved = solve_dense(&system, &rhs)?;

        let mut weights = [0.0f64; NODE_COUNT];
        weights.copy_from_slice(&solved);
        trace!(terms, mean, ?weights, "node curve fitted");

        Ok(HueCurve {
            series,
            angles,
            weights,
            mean,
            clip: self.clip,
        })
    }

    /// Fits and tabulates the curve.
    pub fn build_lut(&self, values: &[f32; NODE_COUNT]) -> GradeResult<HueLut> {
        Ok(self.fit(values)?.to_lut())
    }
}

fn kernel(series: &[f64], delta: f64) -> f64 {
    let d = delta.abs();
    series
        .iter()
        .enumerate()
        .map(|(l, &c)| c * (l as f64 * d).cos())
        .sum::<f64>()
        .exp()
}

/// A fitted, continuous, 2π-periodic hue curve.
#[derive(Debug, Clone, PartialEq)]
pub struct HueCurve {
    series: Vec<f64>,
    angles: [f64; NODE_COUNT],
    weights: [f64; NODE_COUNT],
    mean: f64,
    clip: bool,
}

impl HueCurve {
    /// Curve value at `hue` radians.
    pub fn evaluate(&self, hue: f32) -> f32 {
        let h = hue as f64;
        let value = self.mean
            + self
                .angles
                .iter()
                .zip(&self.weights)
                .map(|(&a, &w)| w * kernel(&self.series, h - a))
                .sum::<f64>();
        let value = value as f32;
        if self.clip { value.max(0.0) } else { value }
    }

    /// Node centres, radians.
    pub fn angles(&self) -> &[f64; NODE_COUNT] {
        &self.angles
    }

    /// Samples the curve at the 361 table hues.
    pub fn to_lut(&self) -> HueLut {
        HueLut::from_fn(|hue| self.evaluate(hue))
    }
}

/// Smoothing used for the saturation and brightness curves.
pub const GAIN_SMOOTHING: f64 = PI;

/// Smoothing of the hue-offset curve for the user's hue smoothing setting.
#[inline]
pub fn hue_smoothing(smoothing_hue: f32) -> f64 {
    PI / smoothing_hue as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use coloreq_color::LUT_SIZE;

    const WAVY: [f32; NODE_COUNT] = [1.4, 0.6, 1.1, 0.9, 1.8, 0.3, 1.0, 1.25];

    #[test]
    fn passes_through_nodes() {
        for smoothing in [GAIN_SMOOTHING, hue_smoothing(0.5), hue_smoothing(2.0)] {
            for shift in [0.0, -37.5, 12.0] {
                let interp = NodeInterpolator::new(smoothing, shift, false).unwrap();
                let curve = interp.fit(&WAVY).unwrap();
                for (k, &angle) in curve.angles().iter().enumerate() {
                    assert_abs_diff_eq!(curve.evaluate(angle as f32), WAVY[k], epsilon = 1e-4);
                }
            }
        }
    }

    #[test]
    fn constant_nodes_give_constant_curve() {
        let interp = NodeInterpolator::new(GAIN_SMOOTHING, 0.0, true).unwrap();
        let lut = interp.build_lut(&[1.0; NODE_COUNT]).unwrap();
        assert!(lut.values().iter().all(|&v| v == 1.0));

        let interp = NodeInterpolator::new(hue_smoothing(1.0), 0.0, false).unwrap();
        let lut = interp.build_lut(&[0.0; NODE_COUNT]).unwrap();
        assert!(lut.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn single_node_boost() {
        let mut values = [1.0; NODE_COUNT];
        values[0] = 1.2;
        let interp = NodeInterpolator::new(GAIN_SMOOTHING, 0.0, true).unwrap();
        let curve = interp.fit(&values).unwrap();

        assert_abs_diff_eq!(curve.evaluate(20f32.to_radians()), 1.2, epsilon = 1e-4);
        // Opposite node stays put
        assert_abs_diff_eq!(curve.evaluate(200f32.to_radians() - 2.0 * std::f32::consts::PI), 1.0, epsilon = 1e-4);
        // Between red and orange the boost fades
        let mid = curve.evaluate(42.5f32.to_radians());
        assert!(mid > 1.0 && mid < 1.2, "mid = {mid}");
    }

    #[test]
    fn table_is_periodic() {
        let interp = NodeInterpolator::new(GAIN_SMOOTHING, 5.0, true).unwrap();
        let lut = interp.build_lut(&WAVY).unwrap();
        assert_eq!(lut.values().len(), LUT_SIZE);
        assert_abs_diff_eq!(lut.get(0), lut.get(LUT_SIZE - 1), epsilon = 1e-4);
        assert_abs_diff_eq!(lut.lookup(3.1), lut.lookup(3.1 - 2.0 * std::f32::consts::PI), epsilon = 1e-3);
    }

    #[test]
    fn clipping_keeps_gains_non_negative() {
        let values = [2.0, 0.0, 2.0, 0.0, 2.0, 0.0, 2.0, 0.0];
        let clipped = NodeInterpolator::new(GAIN_SMOOTHING, 0.0, true)
            .unwrap()
            .build_lut(&values)
            .unwrap();
        assert!(clipped.min() >= 0.0);

        let offsets = [-0.3, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let free = NodeInterpolator::new(hue_smoothing(1.0), 0.0, false)
            .unwrap()
            .build_lut(&offsets)
            .unwrap();
        assert!(free.min() < 0.0);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(NodeInterpolator::new(0.0, 0.0, true).is_err());
        assert!(NodeInterpolator::new(f64::NAN, 0.0, true).is_err());
        assert!(NodeInterpolator::new(1.0, f32::INFINITY, true).is_err());
        let interp = NodeInterpolator::new(1.0, 0.0, true).unwrap();
        let mut values = [1.0; NODE_COUNT];
        values[3] = f32::NAN;
        assert!(matches!(interp.fit(&values), Err(GradeError::InvalidParameter(_))));
    }
}
