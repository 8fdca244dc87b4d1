//! # coloreq-primaries
//!
//! RGB primaries, white points and RGB/XYZ matrix derivation for the
//! working profiles the equalizer can operate in.
//!
//! # Example
//!
//! ```rust
//! use coloreq_primaries::{rgb_to_xyz_matrix, SRGB};
//!
//! let m = rgb_to_xyz_matrix(&SRGB).unwrap();
//! // Y row sums to 1 (white has unit luminance)
//! let y: f32 = m.m[1].iter().sum();
//! assert!((y - 1.0).abs() < 1e-4);
//! ```
//!
//! # Used By
//!
//! - `coloreq-color` - building `WorkingProfile` matrices

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

use coloreq_math::{xy_to_xyz, Mat3, Vec3};

/// Chromaticities of an RGB color space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primaries {
    /// Red primary (x, y)
    pub r: (f32, f32),
    /// Green primary (x, y)
    pub g: (f32, f32),
    /// Blue primary (x, y)
    pub b: (f32, f32),
    /// White point (x, y)
    pub w: (f32, f32),
    /// Display name
    pub name: &'static str,
}

impl Primaries {
    /// White point as XYZ (Y = 1).
    #[inline]
    pub fn white_xyz(&self) -> Vec3 {
        xy_to_xyz(self.w.0, self.w.1)
    }

    /// Looks up primaries by a case-insensitive short name.
    ///
    /// ```rust
    /// use coloreq_primaries::Primaries;
    ///
    /// assert_eq!(Primaries::by_name("ACEScg").unwrap().name, "ACES AP1");
    /// assert!(Primaries::by_name("nope").is_none());
    /// ```
    pub fn by_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let p = match key.as_str() {
            "srgb" | "rec709" | "bt709" => SRGB,
            "rec2020" | "bt2020" => REC2020,
            "displayp3" | "p3" => DISPLAY_P3,
            "acescg" | "ap1" | "acesap1" => ACES_AP1,
            "adobergb" | "adobe" => ADOBE_RGB,
            "prophoto" | "prophotorgb" => PROPHOTO_RGB,
            _ => return None,
        };
        Some(p)
    }
}

/// D65 white chromaticity.
pub const D65_XY: (f32, f32) = (0.31270, 0.32900);

/// D50 white chromaticity.
pub const D50_XY: (f32, f32) = (0.34567, 0.35850);

/// ACES white chromaticity (~D60).
pub const D60_XY: (f32, f32) = (0.32168, 0.33767);

/// sRGB / Rec.709 primaries.
pub const SRGB: Primaries = Primaries {
    r: (0.6400, 0.3300),
    g: (0.3000, 0.6000),
    b: (0.1500, 0.0600),
    w: D65_XY,
    name: "sRGB",
};

/// Rec.2020 primaries.
pub const REC2020: Primaries = Primaries {
    r: (0.7080, 0.2920),
    g: (0.1700, 0.7970),
    b: (0.1310, 0.0460),
    w: D65_XY,
    name: "Rec.2020",
};

/// Display P3 primaries.
pub const DISPLAY_P3: Primaries = Primaries {
    r: (0.6800, 0.3200),
    g: (0.2650, 0.6900),
    b: (0.1500, 0.0600),
    w: D65_XY,
    name: "Display P3",
};

/// ACES AP1 primaries (ACEScg).
pub const ACES_AP1: Primaries = Primaries {
    r: (0.7130, 0.2930),
    g: (0.1650, 0.8300),
    b: (0.1280, 0.0440),
    w: D60_XY,
    name: "ACES AP1",
};

/// Adobe RGB (1998) primaries.
pub const ADOBE_RGB: Primaries = Primaries {
    r: (0.6400, 0.3300),
    g: (0.2100, 0.7100),
    b: (0.1500, 0.0600),
    w: D65_XY,
    name: "Adobe RGB",
};

/// ProPhoto RGB primaries.
pub const PROPHOTO_RGB: Primaries = Primaries {
    r: (0.7347, 0.2653),
    g: (0.1596, 0.8404),
    b: (0.0366, 0.0001),
    w: D50_XY,
    name: "ProPhoto RGB",
};

/// Every profile known to [`Primaries::by_name`].
pub const ALL: [Primaries; 6] = [SRGB, REC2020, DISPLAY_P3, ACES_AP1, ADOBE_RGB, PROPHOTO_RGB];

/// Derives the RGB to XYZ matrix (native white) from primaries.
///
/// Primaries become the matrix columns, scaled so that RGB (1,1,1) maps to
/// the white point. Returns `None` for degenerate primaries.
pub fn rgb_to_xyz_matrix(primaries: &Primaries) -> Option<Mat3> {
    let r = xy_to_xyz(primaries.r.0, primaries.r.1);
    let g = xy_to_xyz(primaries.g.0, primaries.g.1);
    let b = xy_to_xyz(primaries.b.0, primaries.b.1);
    let s = Mat3::from_col_vecs(r, g, b).inverse()? * primaries.white_xyz();
    Some(Mat3::from_col_vecs(r * s.x, g * s.y, b * s.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_srgb_matrix() {
        let m = rgb_to_xyz_matrix(&SRGB).unwrap();
        assert_abs_diff_eq!(m.m[0][0], 0.4124, epsilon = 1e-3);
        assert_abs_diff_eq!(m.m[1][1], 0.7152, epsilon = 1e-3);
        assert_abs_diff_eq!(m.m[2][2], 0.9505, epsilon = 1e-3);
    }

    #[test]
    fn test_white_maps_to_white() {
        for p in ALL {
            let m = rgb_to_xyz_matrix(&p).unwrap();
            let w = m * Vec3::new(1.0, 1.0, 1.0);
            let expected = p.white_xyz();
            assert_abs_diff_eq!(w.x, expected.x, epsilon = 1e-4);
            assert_abs_diff_eq!(w.y, 1.0, epsilon = 1e-4);
            assert_abs_diff_eq!(w.z, expected.z, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_by_name_aliases() {
        assert_eq!(Primaries::by_name("Rec.709"), Some(SRGB));
        assert_eq!(Primaries::by_name("display-p3"), Some(DISPLAY_P3));
        assert_eq!(Primaries::by_name("ProPhoto"), Some(PROPHOTO_RGB));
    }
}
