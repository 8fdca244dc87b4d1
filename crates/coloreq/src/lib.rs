//! # coloreq
//!
//! Hue-dependent color equalizer.
//!
//! Eight hue nodes carry a hue offset, a saturation gain and a brightness
//! gain. Each channel is turned into a smooth periodic curve over hue by a
//! radial-basis fit, tabulated at every degree. Pixels are graded in the
//! darktable UCS 22 HSB space according to their own hue, with two guided
//! filters in the UV chromaticity plane keeping the corrections spatially
//! coherent and away from near-neutral pixels.
//!
//! # Modules
//!
//! - [`nodes`] - the eight hue nodes and their angles
//! - [`interpolate`] - periodic RBF fit of node values ([`NodeInterpolator`])
//! - [`params`] - [`GradeParams`] and YAML presets
//! - [`weight`] - achromatic weighting
//! - [`pipeline`] - [`ColorEqualizer`], the per-image pipeline
//!
//! # Example
//!
//! ```rust
//! use coloreq::{ColorEqualizer, GradeParams, HueNode, NodeChannel, PipelineOptions};
//! use coloreq_color::{GamutCache, WorkingProfile};
//! use coloreq_core::RgbaImage;
//!
//! let mut params = GradeParams::default();
//! params.set_node(NodeChannel::Saturation, HueNode::Red, 1.3);
//! let eq = ColorEqualizer::new(params.compile().unwrap(), PipelineOptions::default()).unwrap();
//!
//! let image = RgbaImage::filled(16, 16, [0.5, 0.2, 0.15, 1.0]).unwrap();
//! let cache = GamutCache::new();
//! let profile = WorkingProfile::srgb().unwrap();
//! let graded = eq.process(&image, Some(&profile), &cache).unwrap();
//! assert_eq!(graded.dimensions(), (16, 16));
//! ```
//!
//! # Dependencies
//!
//! - [`rayon`] - per-pixel passes
//! - [`serde`] / [`serde_yaml`] - presets
//! - `tracing` - pass-level diagnostics

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod grade;
pub mod interpolate;
mod mask;
pub mod nodes;
pub mod params;
pub mod pipeline;
pub mod weight;

pub use error::{GradeError, GradeResult};
pub use grade::{CompiledGrade, CurveSample};
pub use interpolate::{HueCurve, NodeInterpolator};
pub use mask::MaskKind;
pub use nodes::{HueNode, NODE_COUNT};
pub use params::{GradeParams, NodeChannel};
pub use pipeline::{ColorEqualizer, PipelineOptions, RenderMode};
