//! PNG reading and writing.
//!
//! Files are sRGB encoded. On read, 8 and 16-bit RGB, RGBA, grayscale and
//! grayscale+alpha images are decoded to linear RGBA `f32` (grayscale is
//! promoted to RGB, missing alpha becomes 1). Palette and low bit depth
//! images are expanded to 8 bits first. On write, color goes through the
//! sRGB OETF and is clamped to the encodable range.

use anyhow::{bail, Context, Result};
use coloreq_color::srgb;
use coloreq_core::RgbaImage;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

/// Sample depth of a PNG file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Eight,
    Sixteen,
}

impl Depth {
    pub fn from_bits(bits: u8) -> Result<Self> {
        match bits {
            8 => Ok(Depth::Eight),
            16 => Ok(Depth::Sixteen),
            n => bail!("unsupported PNG bit depth: {n} (use 8 or 16)"),
        }
    }

    fn max(self) -> f32 {
        match self {
            Depth::Eight => u8::MAX as f32,
            Depth::Sixteen => u16::MAX as f32,
        }
    }
}

/// A decoded PNG.
pub struct Decoded {
    pub image: RgbaImage,
    pub depth: Depth,
    pub has_alpha: bool,
}

/// Reads a PNG file into linear RGBA.
pub fn read(path: &Path) -> Result<Decoded> {
    let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .with_context(|| format!("Failed to decode: {}", path.display()))?;

    let buf_size = reader
        .output_buffer_size()
        .context("cannot determine output buffer size")?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .with_context(|| format!("Failed to decode: {}", path.display()))?;
    let bytes = &buf[..info.buffer_size()];

    let depth = match info.bit_depth {
        png::BitDepth::Eight => Depth::Eight,
        png::BitDepth::Sixteen => Depth::Sixteen,
        other => bail!("unsupported PNG bit depth: {other:?}"),
    };
    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => bail!("unsupported PNG color type: {other:?}"),
    };
    debug!(width = info.width, height = info.height, channels, ?depth, "png decoded");

    let samples = normalise(bytes, depth);
    let mut data = Vec::with_capacity(info.width as usize * info.height as usize * 4);
    for px in samples.chunks_exact(channels) {
        let (rgb, alpha) = match channels {
            1 => ([px[0]; 3], 1.0),
            2 => ([px[0]; 3], px[1]),
            3 => ([px[0], px[1], px[2]], 1.0),
            _ => ([px[0], px[1], px[2]], px[3]),
        };
        data.extend(rgb.map(srgb::eotf));
        data.push(alpha);
    }

    Ok(Decoded {
        image: RgbaImage::from_data(info.width, info.height, data)?,
        depth,
        has_alpha: channels % 2 == 0,
    })
}

/// Writes linear RGBA as an sRGB encoded PNG.
pub fn write(path: &Path, image: &RgbaImage, depth: Depth, alpha: bool) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create: {}", path.display()))?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(if alpha { png::ColorType::Rgba } else { png::ColorType::Rgb });
    encoder.set_depth(match depth {
        Depth::Eight => png::BitDepth::Eight,
        Depth::Sixteen => png::BitDepth::Sixteen,
    });
    encoder.set_compression(png::Compression::default());
    // Add sRGB chunk
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let mut png_writer = encoder
        .write_header()
        .with_context(|| format!("Failed to encode: {}", path.display()))?;

    let max = depth.max();
    let quantise = |v: f32| (v.clamp(0.0, 1.0) * max).round() as u16;
    let channels = if alpha { 4 } else { 3 };
    let bytes_per_sample = if depth == Depth::Sixteen { 2 } else { 1 };
    let mut bytes = Vec::with_capacity(image.pixel_count() * channels * bytes_per_sample);
    for px in image.data().chunks_exact(4) {
        let encoded = [srgb::oetf(px[0]), srgb::oetf(px[1]), srgb::oetf(px[2]), px[3]];
        for &v in &encoded[..channels] {
            let q = quantise(v);
            match depth {
                Depth::Eight => bytes.push(q as u8),
                Depth::Sixteen => bytes.extend_from_slice(&q.to_be_bytes()),
            }
        }
    }

    png_writer
        .write_image_data(&bytes)
        .with_context(|| format!("Failed to encode: {}", path.display()))?;
    png_writer
        .finish()
        .with_context(|| format!("Failed to finish: {}", path.display()))?;
    Ok(())
}

/// Samples to `[0, 1]`, big-endian for 16-bit.
fn normalise(bytes: &[u8], depth: Depth) -> Vec<f32> {
    let max = depth.max();
    match depth {
        Depth::Eight => bytes.iter().map(|&b| b as f32 / max).collect(),
        Depth::Sixteen => bytes
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]) as f32 / max)
            .collect(),
    }
}
