//! Hue-indexed lookup tables.
//!
//! A [`HueLut`] samples a periodic function of hue at every integer degree
//! from -180° to +180° inclusive (361 entries). The last entry duplicates
//! the first, so lookups interpolate linearly between neighbours without
//! special-casing the wrap.

use coloreq_math::{lerp, wrap_pi};

/// Number of entries of a hue table.
pub const LUT_SIZE: usize = 361;

/// 361-entry circular table over hue.
#[derive(Debug, Clone, PartialEq)]
pub struct HueLut {
    values: Vec<f32>,
}

impl HueLut {
    /// Samples `f(hue_radians)` at every integer degree.
    ///
    /// ```rust
    /// use coloreq_color::HueLut;
    ///
    /// let lut = HueLut::from_fn(|h| h.cos());
    /// assert!((lut.lookup(0.0) - 1.0).abs() < 1e-6);
    /// assert!((lut.get(0) - lut.get(360)).abs() < 1e-6);
    /// ```
    pub fn from_fn(f: impl Fn(f32) -> f32) -> Self {
        let values = (0..LUT_SIZE).map(|i| f(Self::hue_at(i))).collect();
        Self { values }
    }

    /// Table filled with a constant.
    pub fn constant(value: f32) -> Self {
        Self {
            values: vec![value; LUT_SIZE],
        }
    }

    /// Wraps precomputed samples. Returns `None` unless there are exactly
    /// [`LUT_SIZE`] of them.
    pub fn from_values(values: Vec<f32>) -> Option<Self> {
        (values.len() == LUT_SIZE).then_some(Self { values })
    }

    /// Hue in radians of entry `i`.
    #[inline]
    pub fn hue_at(i: usize) -> f32 {
        (i as f32 - 180.0).to_radians()
    }

    /// Entry `i`.
    #[inline]
    pub fn get(&self, i: usize) -> f32 {
        self.values[i]
    }

    /// All entries, index 0 at -180°.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Interpolated value at `hue` radians (any range).
    #[inline]
    pub fn lookup(&self, hue: f32) -> f32 {
        let pos = (wrap_pi(hue).to_degrees() + 180.0).clamp(0.0, 360.0);
        let i = (pos as usize).min(LUT_SIZE - 2);
        lerp(self.values[i], self.values[i + 1], pos - i as f32)
    }

    /// Smallest entry.
    pub fn min(&self) -> f32 {
        self.values.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Largest entry.
    pub fn max(&self) -> f32 {
        self.values.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }
}
