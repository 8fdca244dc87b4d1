//! # coloreq-color
//!
//! Color space adapter for the hue equalizer.
//!
//! Everything the equalizer needs to move a pixel between linear RGB and
//! the perceptual spaces it grades in:
//!
//! ```text
//! RGB --[profile]--> XYZ (D65) --> xyY --> UCS UV + L*
//!                                            |
//!                                            v
//!                                     JCH --> HSB
//! ```
//!
//! - [`ucs`] - darktable UCS 22 chromaticity, lightness, JCH and HSB
//! - [`WorkingProfile`] - RGB/XYZ matrices of the active working space
//! - [`HueLut`] - 361-entry circular table indexed by hue
//! - [`gamut`] - per-hue colorfulness ceiling, gamut mapping, profile-keyed cache
//! - [`srgb`] - sRGB transfer functions for 8/16-bit I/O
//!
//! # Example
//!
//! ```rust
//! use coloreq_color::{ucs, WorkingProfile};
//!
//! let profile = WorkingProfile::srgb().unwrap();
//! let xyz = profile.rgb_to_xyz([0.6, 0.3, 0.2]);
//! let uv = ucs::xyz_to_uv(xyz);
//! let l = ucs::y_to_lightness(xyz[1]);
//! let white = ucs::y_to_lightness(1.0);
//! let jch = ucs::uvl_to_jch(l, white, uv);
//! let hsb = ucs::jch_to_hsb(jch);
//!
//! let back = ucs::jch_to_xyz(ucs::hsb_to_jch(hsb), white).unwrap();
//! let rgb = profile.xyz_to_rgb(back);
//! assert!((rgb[0] - 0.6).abs() < 1e-4);
//! ```
//!
//! # Dependencies
//!
//! - [`glam`] - f64 2x2/3x3 algebra of the UCS projective transform
//! - [`rayon`] - parallel gamut boundary search
//!
//! # Used By
//!
//! - `coloreq` - per-pixel conversions of the equalizer pipeline

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod gamut;
mod hue_lut;
mod profile;
pub mod srgb;
pub mod ucs;

pub use error::*;
pub use gamut::{gamut_map, GamutCache, GamutLut};
pub use hue_lut::{HueLut, LUT_SIZE};
pub use profile::WorkingProfile;
