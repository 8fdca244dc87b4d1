//! Gamut boundary of a working profile in the UCS plane.
//!
//! An RGB color is representable when none of its components is negative.
//! Since that condition depends on chromaticity only, the boundary reduces
//! to one number per hue: the largest colorfulness `M = |U*'V*'|` reachable
//! inside the profile. [`GamutLut`] tabulates it and [`gamut_map`] pulls
//! chroma back under it.
//!
//! Colors whose RGB is already non-negative are returned untouched, however
//! close they sit to the boundary. Only colors that actually leave the gamut
//! are pulled back, and for those the table is conservative: the boundary
//! is searched on a 1/8° grid and each entry keeps the minimum over its ±1°
//! neighbourhood, shrunk by a small margin, so linear interpolation between
//! entries never exceeds the true boundary.
//!
//! # Example
//!
//! ```rust
//! use coloreq_color::{gamut_map, GamutCache, WorkingProfile};
//!
//! let cache = GamutCache::new();
//! let profile = WorkingProfile::srgb().unwrap();
//! let lut = cache.get_or_build(&profile);
//!
//! // A wildly over-saturated HSB triplet comes back inside the gamut
//! let hsb = gamut_map([0.5, 10.0, 0.8], &lut, 1.0);
//! assert!(hsb[1] < 10.0);
//! ```

use crate::ucs::{
    chroma_from_colorfulness, hsb_to_jch, jch_colorfulness, jch_to_hsb, jch_to_xyz, uv_to_xyz,
    MAX_LIGHTNESS,
};
use crate::{HueLut, WorkingProfile, LUT_SIZE};
use rayon::prelude::*;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Boundary search samples per degree.
const SUBDIV: usize = 8;
/// Shrink factor applied to the tabulated boundary.
const MARGIN: f32 = 0.995;
/// Bisection steps of the boundary search.
const BISECT_STEPS: usize = 32;
/// Colorfulness beyond which the search gives up.
const SEARCH_LIMIT: f32 = 8.0;
/// Negative RGB still accepted as inside, relative to the largest component.
const INSIDE_TOLERANCE: f32 = 1e-5;

/// Per-hue colorfulness ceiling of one working profile.
#[derive(Debug, Clone, PartialEq)]
pub struct GamutLut {
    profile: WorkingProfile,
    ceiling: HueLut,
}

impl GamutLut {
    /// Searches the boundary of `profile` at every hue.
    pub fn build(profile: &WorkingProfile) -> Self {
        let samples = 360 * SUBDIV;
        let boundary: Vec<f32> = (0..samples)
            .into_par_iter()
            .map(|k| {
                let hue = (k as f32 / SUBDIV as f32 - 180.0).to_radians();
                boundary_at(profile, hue)
            })
            .collect();

        let values = (0..LUT_SIZE)
            .map(|i| {
                let center = i * SUBDIV;
                let lowest = (0..=2 * SUBDIV)
                    .map(|o| boundary[(center + samples + o - SUBDIV) % samples])
                    .fold(f32::INFINITY, f32::min);
                lowest * MARGIN
            })
            .collect();
        let ceiling = HueLut::from_values(values).unwrap_or_else(|| HueLut::constant(0.0));

        debug!(
            profile = profile.name(),
            min = ceiling.min(),
            max = ceiling.max(),
            "gamut LUT built"
        );
        Self {
            profile: profile.clone(),
            ceiling,
        }
    }

    /// Largest in-gamut colorfulness at `hue` radians.
    #[inline]
    pub fn max_colorfulness(&self, hue: f32) -> f32 {
        self.ceiling.lookup(hue)
    }

    /// Underlying table.
    pub fn table(&self) -> &HueLut {
        &self.ceiling
    }

    /// Name of the profile the table was built for.
    pub fn profile_name(&self) -> &str {
        self.profile.name()
    }

    /// Whether `jch` converts to RGB without negative components.
    pub fn contains(&self, jch: [f32; 3], white: f32) -> bool {
        let Some(xyz) = jch_to_xyz(jch, white) else {
            return false;
        };
        let rgb = self.profile.xyz_to_rgb(xyz);
        let peak = rgb.iter().fold(0.0f32, |a, &c| a.max(c.abs()));
        rgb.iter().all(|&c| c >= -INSIDE_TOLERANCE * peak)
    }
}

fn inside(profile: &WorkingProfile, hue: f32, m: f32) -> bool {
    let (sin, cos) = hue.sin_cos();
    match uv_to_xyz([m * cos, m * sin], 1.0) {
        Some(xyz) => profile.xyz_to_rgb(xyz).iter().all(|&c| c >= 0.0),
        None => false,
    }
}

fn boundary_at(profile: &WorkingProfile, hue: f32) -> f32 {
    let mut lo = 0.0f32;
    let mut hi = 1e-3f32;
    while inside(profile, hue, hi) {
        lo = hi;
        hi *= 2.0;
        if hi > SEARCH_LIMIT {
            return lo;
        }
    }
    for _ in 0..BISECT_STEPS {
        let mid = 0.5 * (lo + hi);
        if inside(profile, hue, mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Reduces the chroma of `hsb` until it fits under `lut`.
///
/// Hue is preserved. Brightness only changes when its lightness would map
/// to an infinite luminance. Colors already representable in the profile of
/// `lut` are returned unchanged.
pub fn gamut_map(hsb: [f32; 3], lut: &GamutLut, white: f32) -> [f32; 3] {
    let jch = hsb_to_jch(hsb);
    if jch[0] <= 0.0 {
        return [hsb[0], hsb[1], hsb[2].max(0.0)];
    }
    let j = jch[0].min(MAX_LIGHTNESS / white);
    if j == jch[0] && lut.contains(jch, white) {
        return hsb;
    }
    let m = jch_colorfulness([j, jch[1], jch[2]], white);
    let ceiling = lut.max_colorfulness(jch[2]);
    if m <= ceiling && j == jch[0] {
        return hsb;
    }
    let c = chroma_from_colorfulness(j, m.min(ceiling), white);
    jch_to_hsb([j, c, jch[2]])
}

/// Gamut table cache keyed by working profile.
///
/// Holds the table of the last profile seen. Any other profile replaces it;
/// the same profile gets the shared table back without recomputation.
#[derive(Debug, Default)]
pub struct GamutCache {
    entry: RwLock<Option<(WorkingProfile, Arc<GamutLut>)>>,
}

impl GamutCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table of `profile`, rebuilding it on a profile change.
    pub fn get_or_build(&self, profile: &WorkingProfile) -> Arc<GamutLut> {
        {
            let entry = self.entry.read().unwrap_or_else(PoisonError::into_inner);
            if let Some((key, lut)) = entry.as_ref() {
                if key == profile {
                    return Arc::clone(lut);
                }
            }
        }

        let mut entry = self.entry.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have rebuilt it meanwhile
        if let Some((key, lut)) = entry.as_ref() {
            if key == profile {
                return Arc::clone(lut);
            }
        }
        let lut = Arc::new(GamutLut::build(profile));
        *entry = Some((profile.clone(), Arc::clone(&lut)));
        lut
    }

    /// Drops the cached table.
    pub fn invalidate(&self) {
        *self.entry.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Profile the cached table belongs to.
    pub fn cached_profile(&self) -> Option<String> {
        let entry = self.entry.read().unwrap_or_else(PoisonError::into_inner);
        entry.as_ref().map(|(p, _)| p.name().to_string())
    }
}
