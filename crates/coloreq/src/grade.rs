//! Compiled grade: the three hue tables plus per-run constants.

use coloreq_color::{HueLut, LUT_SIZE};

/// Result of [`crate::GradeParams::compile`]. Immutable and shareable.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledGrade {
    pub(crate) hue: HueLut,
    pub(crate) saturation: HueLut,
    pub(crate) brightness: HueLut,
    pub(crate) white_level_linear: f32,
    pub(crate) white: f32,
    pub(crate) use_filter: bool,
    pub(crate) chroma_size: f32,
    pub(crate) param_size: f32,
}

/// One row of [`CompiledGrade::curves`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    /// Table hue, degrees in `[-180, 180]`.
    pub degrees: f32,
    /// Hue offset, degrees.
    pub hue: f32,
    /// Saturation gain.
    pub saturation: f32,
    /// Brightness gain.
    pub brightness: f32,
}

/// Per-pixel corrections looked up from the tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Corrections {
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
}

impl Corrections {
    pub const NEUTRAL: Corrections = Corrections {
        hue: 0.0,
        saturation: 1.0,
        brightness: 0.0,
    };
}

impl CompiledGrade {
    /// Hue offset table, radians.
    pub fn hue(&self) -> &HueLut {
        &self.hue
    }

    /// Saturation gain table.
    pub fn saturation(&self) -> &HueLut {
        &self.saturation
    }

    /// Brightness gain table.
    pub fn brightness(&self) -> &HueLut {
        &self.brightness
    }

    /// `2^white_level`.
    pub fn white_level_linear(&self) -> f32 {
        self.white_level_linear
    }

    /// UCS lightness of the white level.
    pub fn white(&self) -> f32 {
        self.white
    }

    /// Whether the guided filters run.
    pub fn use_filter(&self) -> bool {
        self.use_filter
    }

    /// Prefilter radius before scaling.
    pub fn chroma_size(&self) -> f32 {
        self.chroma_size
    }

    /// Correction filter radius before scaling.
    pub fn param_size(&self) -> f32 {
        self.param_size
    }

    /// The 361 table rows, hue offsets converted to degrees.
    pub fn curves(&self) -> impl Iterator<Item = CurveSample> + '_ {
        (0..LUT_SIZE).map(move |i| CurveSample {
            degrees: i as f32 - 180.0,
            hue: self.hue.get(i).to_degrees(),
            saturation: self.saturation.get(i),
            brightness: self.brightness.get(i),
        })
    }

    /// Corrections for a pixel of hue `h` and saturation `s`.
    ///
    /// The brightness entry is the delta `s * (gain - 1)`.
    #[inline]
    pub(crate) fn corrections(&self, h: f32, s: f32) -> Corrections {
        Corrections {
            hue: self.hue.lookup(h),
            saturation: self.saturation.lookup(h),
            brightness: s * (self.brightness.lookup(h) - 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{GradeParams, HueNode, NodeChannel};
    use approx::assert_abs_diff_eq;

    #[test]
    fn curves_cover_the_circle() {
        let mut params = GradeParams::default();
        params.set_node(NodeChannel::Hue, HueNode::Red, 15.0);
        let grade = params.compile().unwrap();
        let rows: Vec<_> = grade.curves().collect();
        assert_eq!(rows.len(), 361);
        assert_eq!(rows[0].degrees, -180.0);
        assert_eq!(rows[360].degrees, 180.0);
        // Red node sits at 20 degrees, table row 200
        assert_abs_diff_eq!(rows[200].hue, 15.0, epsilon = 1e-2);
        assert_abs_diff_eq!(rows[200].saturation, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn neutral_corrections() {
        let grade = GradeParams::default().compile().unwrap();
        let c = grade.corrections(0.7, 0.4);
        assert_eq!(c, super::Corrections::NEUTRAL);
    }
}
