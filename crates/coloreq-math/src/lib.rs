//! # coloreq-math
//!
//! Math primitives for the hue equalizer.
//!
//! - [`Mat3`] / [`Vec3`] - 3x3 transforms for RGB and XYZ triplets
//! - Chromatic adaptation ([`adapt_matrix`], [`BRADFORD`], standard whites)
//! - Interpolation and angle helpers ([`lerp`], [`wrap_pi`])
//! - [`solve_dense`] - LU solver with partial pivoting for small dense systems
//!
//! # Design
//!
//! Matrices are **row-major** and multiply **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! # Usage
//!
//! ```rust
//! use coloreq_math::{Mat3, Vec3};
//!
//! let rgb_to_xyz = Mat3::from_rows([
//!     [0.4124564, 0.3575761, 0.1804375],
//!     [0.2126729, 0.7151522, 0.0721750],
//!     [0.0193339, 0.1191920, 0.9503041],
//! ]);
//! let xyz = rgb_to_xyz * Vec3::new(1.0, 1.0, 1.0);
//! assert!((xyz.y - 1.0).abs() < 1e-4);
//! ```
//!
//! # Used By
//!
//! - `coloreq-primaries` - RGB/XYZ matrix generation
//! - `coloreq-color` - working profiles, UCS inverse
//! - `coloreq` - node interpolation solve

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod adapt;
mod error;
mod interp;
mod mat3;
mod solve;
mod vec3;

pub use adapt::*;
pub use error::*;
pub use interp::*;
pub use mat3::*;
pub use solve::*;
pub use vec3::*;
