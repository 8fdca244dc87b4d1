//! The eight hue nodes and their placement on the hue circle.
//!
//! Nodes sit 45° apart. Node `k` is centred on `k * 45° + 20° + hue_shift`,
//! so with no shift the red node lands on 20°, close to the hue of an sRGB
//! red primary in the UCS plane.
//!
//! Node arrays serialize as a map keyed by node name. They deserialize
//! from that map (missing nodes keep their neutral value) or from a plain
//! sequence of exactly eight values in node order.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::GradeError;

/// Number of hue nodes.
pub const NODE_COUNT: usize = 8;

/// Spacing between consecutive nodes, degrees.
pub const NODE_SPACING_DEG: f32 = 45.0;

/// Hue of node 0 before any user shift, degrees.
pub const NODE_ORIGIN_DEG: f32 = 20.0;

/// One of the eight hue nodes, in node order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HueNode {
    /// Node 0.
    Red,
    /// Node 1.
    Orange,
    /// Node 2.
    Yellow,
    /// Node 3.
    Green,
    /// Node 4.
    Cyan,
    /// Node 5.
    Blue,
    /// Node 6.
    Lavender,
    /// Node 7.
    Magenta,
}

impl HueNode {
    /// All nodes in order.
    pub const ALL: [HueNode; NODE_COUNT] = [
        HueNode::Red,
        HueNode::Orange,
        HueNode::Yellow,
        HueNode::Green,
        HueNode::Cyan,
        HueNode::Blue,
        HueNode::Lavender,
        HueNode::Magenta,
    ];

    /// Position in node order.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Node at `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            HueNode::Red => "red",
            HueNode::Orange => "orange",
            HueNode::Yellow => "yellow",
            HueNode::Green => "green",
            HueNode::Cyan => "cyan",
            HueNode::Blue => "blue",
            HueNode::Lavender => "lavender",
            HueNode::Magenta => "magenta",
        }
    }

    /// Centre of this node in radians for a shift in degrees.
    #[inline]
    pub fn angle(self, hue_shift_deg: f32) -> f64 {
        node_angle(self.index(), hue_shift_deg)
    }
}

impl fmt::Display for HueNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HueNode {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        HueNode::ALL
            .into_iter()
            .find(|node| node.name() == key)
            .or_else(|| key.parse::<usize>().ok().and_then(HueNode::from_index))
            .ok_or_else(|| GradeError::InvalidParameter(format!("unknown hue node '{s}'")))
    }
}

/// Centre of node `k` in radians: `(k * 45 + hue_shift + 20)` degrees.
#[inline]
pub fn node_angle(k: usize, hue_shift_deg: f32) -> f64 {
    (k as f64 * NODE_SPACING_DEG as f64 + hue_shift_deg as f64 + NODE_ORIGIN_DEG as f64)
        .to_radians()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NodeValues {
    List(Vec<f32>),
    Named(BTreeMap<HueNode, f32>),
}

fn deserialize_filled<'de, D>(deserializer: D, fill: f32) -> Result<[f32; NODE_COUNT], D::Error>
where
    D: Deserializer<'de>,
{
    match NodeValues::deserialize(deserializer)? {
        NodeValues::List(values) => {
            let len = values.len();
            values
                .try_into()
                .map_err(|_| D::Error::invalid_length(len, &"exactly 8 node values"))
        }
        NodeValues::Named(map) => {
            let mut out = [fill; NODE_COUNT];
            for (node, value) in map {
                out[node.index()] = value;
            }
            Ok(out)
        }
    }
}

/// Serializes a node array as `{red: .., orange: .., ...}`.
pub(crate) fn serialize_nodes<S>(values: &[f32; NODE_COUNT], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(HueNode::ALL.iter().map(|node| (node.name(), values[node.index()])))
}

/// Deserializes multiplicative node values. Missing nodes are 1.
pub(crate) fn deserialize_gains<'de, D>(deserializer: D) -> Result<[f32; NODE_COUNT], D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_filled(deserializer, 1.0)
}

/// Deserializes additive node values. Missing nodes are 0.
pub(crate) fn deserialize_offsets<'de, D>(deserializer: D) -> Result<[f32; NODE_COUNT], D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_filled(deserializer, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn names_round_trip() {
        for node in HueNode::ALL {
            assert_eq!(node.name().parse::<HueNode>().unwrap(), node);
            assert_eq!(HueNode::from_index(node.index()), Some(node));
        }
        assert_eq!("Cyan".parse::<HueNode>().unwrap(), HueNode::Cyan);
        assert_eq!("5".parse::<HueNode>().unwrap(), HueNode::Blue);
        assert!("teal".parse::<HueNode>().is_err());
        assert!("8".parse::<HueNode>().is_err());
    }

    #[test]
    fn angles() {
        assert_relative_eq!(HueNode::Red.angle(0.0), 20f64.to_radians(), epsilon = 1e-12);
        assert_relative_eq!(HueNode::Green.angle(0.0), 155f64.to_radians(), epsilon = 1e-12);
        assert_relative_eq!(HueNode::Magenta.angle(-10.0), 325f64.to_radians(), epsilon = 1e-12);
        for k in 1..NODE_COUNT {
            let step = node_angle(k, 7.0) - node_angle(k - 1, 7.0);
            assert_relative_eq!(step, std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
        }
    }
}
