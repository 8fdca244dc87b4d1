//! Working color profiles.
//!
//! A [`WorkingProfile`] carries the matrices between the RGB working space
//! of the image and CIE XYZ relative to D65, the reference white of the UCS
//! conversions. Profiles with another native white are Bradford-adapted.
//!
//! Profile equality is the invalidation key of the gamut cache.

use crate::{ColorError, ColorResult};
use coloreq_math::{adapt_matrix, xy_to_xyz, Mat3, BRADFORD};
use coloreq_primaries::{rgb_to_xyz_matrix, Primaries, D65_XY, SRGB};
use tracing::debug;

/// RGB working space with matrices to and from XYZ (D65).
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingProfile {
    name: String,
    rgb_to_xyz: Mat3,
    xyz_to_rgb: Mat3,
}

impl WorkingProfile {
    /// Builds a profile from primaries, adapting its white to D65.
    pub fn from_primaries(primaries: &Primaries) -> ColorResult<Self> {
        let native = rgb_to_xyz_matrix(primaries).ok_or_else(|| {
            ColorError::SingularMatrix(format!("{} primaries", primaries.name))
        })?;
        let rgb_to_xyz = if primaries.w == D65_XY {
            native
        } else {
            let d65 = xy_to_xyz(D65_XY.0, D65_XY.1);
            let cat = adapt_matrix(BRADFORD, primaries.white_xyz(), d65)
                .ok_or_else(|| ColorError::SingularMatrix("Bradford".into()))?;
            cat * native
        };
        debug!(profile = primaries.name, "working profile");
        Self::from_matrix(primaries.name, rgb_to_xyz)
    }

    /// Builds a profile from an explicit RGB to XYZ (D65) matrix.
    pub fn from_matrix(name: impl Into<String>, rgb_to_xyz: Mat3) -> ColorResult<Self> {
        let name = name.into();
        let xyz_to_rgb = rgb_to_xyz
            .inverse()
            .ok_or_else(|| ColorError::SingularMatrix(format!("{name} RGB to XYZ")))?;
        Ok(Self {
            name,
            rgb_to_xyz,
            xyz_to_rgb,
        })
    }

    /// Looks a profile up by name (`srgb`, `rec2020`, `display-p3`,
    /// `acescg`, `adobe-rgb`, `prophoto`).
    ///
    /// ```rust
    /// use coloreq_color::WorkingProfile;
    ///
    /// assert_eq!(WorkingProfile::by_name("Rec2020").unwrap().name(), "Rec.2020");
    /// assert!(WorkingProfile::by_name("cmyk").is_err());
    /// ```
    pub fn by_name(name: &str) -> ColorResult<Self> {
        let primaries =
            Primaries::by_name(name).ok_or_else(|| ColorError::UnknownProfile(name.into()))?;
        Self::from_primaries(&primaries)
    }

    /// The sRGB / Rec.709 linear profile.
    pub fn srgb() -> ColorResult<Self> {
        Self::from_primaries(&SRGB)
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Converts linear RGB to XYZ (D65).
    #[inline]
    pub fn rgb_to_xyz(&self, rgb: [f32; 3]) -> [f32; 3] {
        self.rgb_to_xyz.apply(rgb)
    }

    /// Converts XYZ (D65) to linear RGB.
    #[inline]
    pub fn xyz_to_rgb(&self, xyz: [f32; 3]) -> [f32; 3] {
        self.xyz_to_rgb.apply(xyz)
    }

    /// Matrix converting RGB of `self` into RGB of `other`.
    pub fn conversion_to(&self, other: &WorkingProfile) -> Mat3 {
        other.xyz_to_rgb * self.rgb_to_xyz
    }
}
