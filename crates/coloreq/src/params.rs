//! User-facing grading parameters and YAML presets.
//!
//! # Example
//!
//! ```rust
//! use coloreq::{GradeParams, HueNode};
//!
//! let params = GradeParams::from_yaml_str(
//!     "white_level: 2.0\nsaturation: { red: 1.3, blue: 0.8 }\n",
//! )
//! .unwrap();
//! assert_eq!(params.saturation[HueNode::Red.index()], 1.3);
//! assert_eq!(params.saturation[HueNode::Green.index()], 1.0);
//! let grade = params.compile().unwrap();
//! assert!(grade.saturation().max() > 1.0);
//! ```

use std::fmt;
use std::ops::RangeInclusive;
use std::path::Path;
use std::str::FromStr;

use coloreq_color::ucs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GradeError, GradeResult};
use crate::grade::CompiledGrade;
use crate::interpolate::{hue_smoothing, NodeInterpolator, GAIN_SMOOTHING};
use crate::nodes::{self, HueNode, NODE_COUNT};

const SMOOTHING_HUE_RANGE: RangeInclusive<f32> = 0.05..=2.0;
const WHITE_LEVEL_RANGE: RangeInclusive<f32> = -2.0..=16.0;
const CHROMA_SIZE_RANGE: RangeInclusive<f32> = 1.0..=10.0;
const PARAM_SIZE_RANGE: RangeInclusive<f32> = 1.0..=128.0;
const HUE_SHIFT_RANGE: RangeInclusive<f32> = -23.0..=23.0;
const HUE_OFFSET_RANGE: RangeInclusive<f32> = -180.0..=180.0;
const GAIN_RANGE: RangeInclusive<f32> = 0.0..=2.0;

/// The three per-node channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeChannel {
    /// Hue offset, degrees.
    Hue,
    /// Saturation gain.
    Saturation,
    /// Brightness gain.
    Brightness,
}

impl NodeChannel {
    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            NodeChannel::Hue => "hue",
            NodeChannel::Saturation => "saturation",
            NodeChannel::Brightness => "brightness",
        }
    }
}

impl fmt::Display for NodeChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NodeChannel {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hue" => Ok(NodeChannel::Hue),
            "sat" | "saturation" => Ok(NodeChannel::Saturation),
            "bright" | "brightness" => Ok(NodeChannel::Brightness),
            _ => Err(GradeError::InvalidParameter(format!("unknown node channel '{s}'"))),
        }
    }
}

/// Grading parameters.
///
/// Missing fields take their defaults when deserialized; node arrays accept
/// either eight values in node order or a map keyed by node name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GradeParams {
    /// Hue curve smoothness, `0.05..=2`.
    pub smoothing_hue: f32,
    /// White level in EV, `-2..=16`.
    pub white_level: f32,
    /// Chromaticity prefilter radius, `1..=10`.
    pub chroma_size: f32,
    /// Correction filter radius, `1..=128`.
    pub param_size: f32,
    /// Runs both guided filters when set.
    pub use_filter: bool,
    /// Node placement shift in degrees, `-23..=23`.
    pub hue_shift: f32,
    /// Hue offsets in degrees, `-180..=180`.
    #[serde(
        serialize_with = "nodes::serialize_nodes",
        deserialize_with = "nodes::deserialize_offsets"
    )]
    pub hue: [f32; NODE_COUNT],
    /// Saturation gains, `0..=2`.
    #[serde(
        serialize_with = "nodes::serialize_nodes",
        deserialize_with = "nodes::deserialize_gains"
    )]
    pub saturation: [f32; NODE_COUNT],
    /// Brightness gains, `0..=2`.
    #[serde(
        serialize_with = "nodes::serialize_nodes",
        deserialize_with = "nodes::deserialize_gains"
    )]
    pub brightness: [f32; NODE_COUNT],
}

impl Default for GradeParams {
    fn default() -> Self {
        Self {
            smoothing_hue: 1.0,
            white_level: 1.0,
            chroma_size: 1.5,
            param_size: 1.0,
            use_filter: true,
            hue_shift: 0.0,
            hue: [0.0; NODE_COUNT],
            saturation: [1.0; NODE_COUNT],
            brightness: [1.0; NODE_COUNT],
        }
    }
}

impl GradeParams {
    /// Neutral parameters with filtering off. Output equals input.
    pub fn identity() -> Self {
        Self {
            use_filter: false,
            ..Self::default()
        }
    }

    /// Node values of one channel.
    pub fn channel(&self, channel: NodeChannel) -> &[f32; NODE_COUNT] {
        match channel {
            NodeChannel::Hue => &self.hue,
            NodeChannel::Saturation => &self.saturation,
            NodeChannel::Brightness => &self.brightness,
        }
    }

    /// Sets one node value.
    pub fn set_node(&mut self, channel: NodeChannel, node: HueNode, value: f32) {
        let values = match channel {
            NodeChannel::Hue => &mut self.hue,
            NodeChannel::Saturation => &mut self.saturation,
            NodeChannel::Brightness => &mut self.brightness,
        };
        values[node.index()] = value;
    }

    /// Checks every value against its range.
    pub fn validate(&self) -> GradeResult<()> {
        check("smoothing_hue", self.smoothing_hue, &SMOOTHING_HUE_RANGE)?;
        check("white_level", self.white_level, &WHITE_LEVEL_RANGE)?;
        check("chroma_size", self.chroma_size, &CHROMA_SIZE_RANGE)?;
        check("param_size", self.param_size, &PARAM_SIZE_RANGE)?;
        check("hue_shift", self.hue_shift, &HUE_SHIFT_RANGE)?;
        for node in HueNode::ALL {
            let i = node.index();
            check_node(NodeChannel::Hue, node, self.hue[i], &HUE_OFFSET_RANGE)?;
            check_node(NodeChannel::Saturation, node, self.saturation[i], &GAIN_RANGE)?;
            check_node(NodeChannel::Brightness, node, self.brightness[i], &GAIN_RANGE)?;
        }
        Ok(())
    }

    /// Parses a YAML preset.
    pub fn from_yaml_str(yaml: &str) -> GradeResult<Self> {
        let params: GradeParams = serde_yaml::from_str(yaml)?;
        params.validate()?;
        Ok(params)
    }

    /// Loads a YAML preset from disk.
    pub fn load_yaml(path: impl AsRef<Path>) -> GradeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading preset");
        Self::from_yaml_str(&content)
    }

    /// Serializes to YAML, nodes keyed by name.
    pub fn to_yaml_string(&self) -> GradeResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Builds the three hue tables and the white lightness.
    pub fn compile(&self) -> GradeResult<CompiledGrade> {
        self.validate()?;

        let hue_radians = self.hue.map(f32::to_radians);
        let hue = NodeInterpolator::new(hue_smoothing(self.smoothing_hue), self.hue_shift, false)?
            .build_lut(&hue_radians)?;
        let gains = NodeInterpolator::new(GAIN_SMOOTHING, self.hue_shift, true)?;
        let saturation = gains.build_lut(&self.saturation)?;
        let brightness = gains.build_lut(&self.brightness)?;

        let white_level_linear = self.white_level.exp2();
        let white = ucs::y_to_lightness(white_level_linear);
        debug!(white_level_linear, white, use_filter = self.use_filter, "grade compiled");

        Ok(CompiledGrade {
            hue,
            saturation,
            brightness,
            white_level_linear,
            white,
            use_filter: self.use_filter,
            chroma_size: self.chroma_size,
            param_size: self.param_size,
        })
    }
}

fn check(name: &str, value: f32, range: &RangeInclusive<f32>) -> GradeResult<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(GradeError::InvalidParameter(format!(
            "{name} = {value} outside {}..={}",
            range.start(),
            range.end()
        )))
    }
}

fn check_node(
    channel: NodeChannel,
    node: HueNode,
    value: f32,
    range: &RangeInclusive<f32>,
) -> GradeResult<()> {
    check(&format!("{channel}.{node}"), value, range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        GradeParams::default().validate().unwrap();
        let identity = GradeParams::identity();
        identity.validate().unwrap();
        assert!(!identity.use_filter);
        assert_eq!(identity.white_level, 1.0);
    }

    #[test]
    fn rejects_out_of_range() {
        let mut p = GradeParams::default();
        p.saturation[2] = 2.5;
        let err = p.validate().unwrap_err().to_string();
        assert!(err.contains("saturation.yellow"), "{err}");

        let p = GradeParams {
            white_level: f32::NAN,
            ..GradeParams::default()
        };
        assert!(p.validate().is_err());

        let p = GradeParams {
            hue_shift: 30.0,
            ..GradeParams::default()
        };
        assert!(p.compile().is_err());
    }

    #[test]
    fn yaml_list_and_map_forms() {
        let list = GradeParams::from_yaml_str(
            "hue: [10, 0, 0, 0, 0, 0, 0, -5]\nuse_filter: false\n",
        )
        .unwrap();
        assert_eq!(list.hue[0], 10.0);
        assert_eq!(list.hue[7], -5.0);
        assert!(!list.use_filter);
        assert_eq!(list.chroma_size, 1.5);

        let map = GradeParams::from_yaml_str("hue: { red: 10, magenta: -5 }\nuse_filter: false\n").unwrap();
        assert_eq!(list, map);

        let gains = GradeParams::from_yaml_str("brightness: { cyan: 0.5 }").unwrap();
        assert_eq!(gains.brightness[HueNode::Cyan.index()], 0.5);
        assert_eq!(gains.brightness[HueNode::Red.index()], 1.0);
    }

    #[test]
    fn yaml_rejects_bad_presets() {
        assert!(GradeParams::from_yaml_str("hue: [1, 2, 3]").is_err());
        assert!(GradeParams::from_yaml_str("saturation: { teal: 1.0 }").is_err());
        assert!(GradeParams::from_yaml_str("unknown_key: 1").is_err());
        assert!(matches!(
            GradeParams::from_yaml_str("param_size: 500"),
            Err(GradeError::InvalidParameter(_))
        ));
    }

    #[test]
    fn yaml_round_trip() {
        let mut p = GradeParams::default();
        p.set_node(NodeChannel::Saturation, HueNode::Blue, 0.7);
        p.set_node(NodeChannel::Hue, HueNode::Orange, -12.5);
        p.white_level = 3.0;
        let yaml = p.to_yaml_string().unwrap();
        assert!(yaml.contains("lavender"));
        assert_eq!(GradeParams::from_yaml_str(&yaml).unwrap(), p);
    }

    #[test]
    fn channel_names() {
        assert_eq!("sat".parse::<NodeChannel>().unwrap(), NodeChannel::Saturation);
        assert_eq!("Brightness".parse::<NodeChannel>().unwrap(), NodeChannel::Brightness);
        assert!("gamma".parse::<NodeChannel>().is_err());
    }

    #[test]
    fn compile_neutral_tables() {
        let grade = GradeParams::default().compile().unwrap();
        assert!(grade.hue().values().iter().all(|&v| v == 0.0));
        assert!(grade.saturation().values().iter().all(|&v| v == 1.0));
        assert!(grade.brightness().values().iter().all(|&v| v == 1.0));
        approx::assert_relative_eq!(grade.white_level_linear(), 2.0, epsilon = 1e-6);
    }
}
