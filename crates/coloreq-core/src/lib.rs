//! # coloreq-core
//!
//! Core types shared by every crate of the hue equalizer workspace.
//!
//! - [`RgbaImage`] - linear float RGBA image, the unit of work of the pipeline
//! - [`alloc_buffer`] - fallible allocation of per-invocation working buffers
//! - [`Error`] - allocation and dimension failures
//!
//! ## Crate Structure
//!
//! ```text
//! coloreq-core (this crate)
//!    ^
//!    |
//!    +-- coloreq-math (matrices, solver)
//!    +-- coloreq-color (UCS conversions, gamut)
//!    +-- coloreq-ops (blur, resample, guided filter)
//!    +-- coloreq (equalizer engine)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod image;

pub use buffer::{alloc_buffer, alloc_filled};
pub use error::*;
pub use image::{RgbaImage, CHANNELS};
