//! Linear float RGBA image.
//!
//! [`RgbaImage`] is the only image type the equalizer works with: four
//! interleaved `f32` channels per pixel, scene-linear RGB in the active
//! working profile, straight alpha. Alpha is never touched by color math.
//!
//! # Example
//!
//! ```rust
//! use coloreq_core::RgbaImage;
//!
//! let mut img = RgbaImage::filled(4, 2, [0.2, 0.3, 0.4, 1.0]).unwrap();
//! img.set_pixel(1, 1, [1.0, 0.0, 0.0, 0.5]);
//! assert_eq!(img.pixel(1, 1), [1.0, 0.0, 0.0, 0.5]);
//! assert_eq!(img.pixel_count(), 8);
//! ```

use crate::{Error, Result};
use rayon::prelude::*;

/// Number of interleaved channels.
pub const CHANNELS: usize = 4;

/// Interleaved RGBA `f32` image buffer.
#[derive(Clone, PartialEq)]
pub struct RgbaImage {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl RgbaImage {
    /// Creates a transparent black image.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, [0.0; 4])
    }

    /// Creates an image with every pixel set to `pixel`.
    pub fn filled(width: u32, height: u32, pixel: [f32; 4]) -> Result<Self> {
        let len = Self::checked_len(width, height)?;
        let mut data = crate::alloc_buffer(len)?;
        data.par_chunks_exact_mut(CHANNELS)
            .for_each(|px| px.copy_from_slice(&pixel));
        Ok(Self { width, height, data })
    }

    /// Wraps existing interleaved RGBA data.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        let expected = Self::checked_len(width, height)?;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Copies the image, reporting allocation failure instead of aborting.
    pub fn try_clone(&self) -> Result<Self> {
        let mut data = crate::alloc_buffer(self.data.len())?;
        data.copy_from_slice(&self.data);
        Ok(Self {
            width: self.width,
            height: self.height,
            data,
        })
    }

    /// Builds an image from interleaved RGB data, with opaque alpha.
    pub fn from_rgb(width: u32, height: u32, rgb: &[f32]) -> Result<Self> {
        let count = Self::checked_len(width, height)? / CHANNELS;
        if rgb.len() != count * 3 {
            return Err(Error::BufferSize {
                expected: count * 3,
                got: rgb.len(),
            });
        }
        let mut img = Self::new(width, height)?;
        img.data
            .par_chunks_exact_mut(CHANNELS)
            .zip(rgb.par_chunks_exact(3))
            .for_each(|(dst, src)| {
                dst[..3].copy_from_slice(src);
                dst[3] = 1.0;
            });
        Ok(img)
    }

    fn checked_len(width: u32, height: u32) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_dimensions(width, height, "zero-sized image"));
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(|| Error::invalid_dimensions(width, height, "size overflow"))
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width and height.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total pixel count.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw interleaved data.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable raw interleaved data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 4] {
        let i = self.index(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: [f32; 4]) {
        let i = self.index(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&pixel);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Applies `f` to every pixel in parallel.
    pub fn map_pixels<F>(&mut self, f: F)
    where
        F: Fn([f32; 4]) -> [f32; 4] + Sync + Send,
    {
        self.data.par_chunks_exact_mut(CHANNELS).for_each(|px| {
            let out = f([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&out);
        });
    }
}

impl std::fmt::Debug for RgbaImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbaImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_from_data_len_check() {
        assert!(RgbaImage::from_data(2, 2, vec![0.0; 16]).is_ok());
        let err = RgbaImage::from_data(2, 2, vec![0.0; 12]).unwrap_err();
        assert!(matches!(err, Error::BufferSize { expected: 16, got: 12 }));
    }

    #[test]
    fn test_try_clone() {
        let mut img = RgbaImage::filled(3, 2, [0.1, 0.2, 0.3, 1.0]).unwrap();
        img.set_pixel(2, 1, [0.9, 0.0, 0.4, 0.5]);
        let copy = img.try_clone().unwrap();
        assert_eq!(copy, img);
        assert_eq!(copy.pixel(2, 1), [0.9, 0.0, 0.4, 0.5]);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(RgbaImage::new(0, 3).is_err());
    }

    #[test]
    fn test_from_rgb_opaque() {
        let img = RgbaImage::from_rgb(2, 1, &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]).unwrap();
        assert_eq!(img.pixel(1, 0), [0.4, 0.5, 0.6, 1.0]);
        assert_abs_diff_eq!(img.pixel(0, 0)[3], 1.0);
    }

    #[test]
    fn test_map_pixels() {
        let mut img = RgbaImage::filled(3, 3, [0.5, 0.5, 0.5, 1.0]).unwrap();
        img.map_pixels(|p| [p[0] * 2.0, p[1], p[2], p[3]]);
        assert_eq!(img.pixel(2, 2), [1.0, 0.5, 0.5, 1.0]);
    }
}
