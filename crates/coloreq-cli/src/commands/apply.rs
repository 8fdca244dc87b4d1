//! Apply command
//!
//! Decodes a PNG, grades it in the chosen working profile and writes the
//! result (or a diagnostic mask).

use crate::png_io::{self, Depth};
use crate::ApplyArgs;
use anyhow::{Context, Result};
use coloreq::{ColorEqualizer, PipelineOptions, RenderMode};
use coloreq_color::{GamutCache, WorkingProfile};
use coloreq_core::RgbaImage;
use coloreq_math::Mat3;
use std::time::Instant;
use tracing::{info, trace};

pub fn run(args: ApplyArgs, verbose: bool) -> Result<()> {
    trace!(input = %args.input.display(), output = %args.output.display(), "apply::run");

    let params = super::grade_params(&args.grade)?;
    let grade = params.compile().context("Failed to compile grade")?;
    let mode = args.mask.map_or(RenderMode::Normal, RenderMode::Mask);
    let options = PipelineOptions {
        scale: args.scale,
        mode,
    };
    let equalizer = ColorEqualizer::new(grade, options)?;

    let profile = WorkingProfile::by_name(&args.profile)
        .with_context(|| format!("Unknown working profile: {}", args.profile))?;
    let srgb = WorkingProfile::srgb()?;

    let decoded = png_io::read(&args.input)?;
    let depth = match args.depth {
        Some(bits) => Depth::from_bits(bits)?,
        None => decoded.depth,
    };
    let mut image = decoded.image;
    let (w, h) = image.dimensions();
    info!(w, h, profile = profile.name(), ?mode, "Applying color equalizer");
    if verbose {
        println!("Grading {} ({}x{}) in {}", args.input.display(), w, h, profile.name());
    }

    let start = Instant::now();
    let reencode = profile != srgb;
    if reencode {
        convert(&mut image, &srgb.conversion_to(&profile));
    }
    equalizer.process_in_place(&mut image, Some(&profile), &GamutCache::new())?;
    if reencode && mode == RenderMode::Normal {
        convert(&mut image, &profile.conversion_to(&srgb));
    }
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "graded");

    png_io::write(&args.output, &image, depth, decoded.has_alpha)?;

    if verbose {
        println!("Wrote {} in {:.2?}", args.output.display(), start.elapsed());
    }
    Ok(())
}

/// Multiplies the RGB of every pixel by `m`.
fn convert(image: &mut RgbaImage, m: &Mat3) {
    image.map_pixels(|[r, g, b, a]| {
        let [r, g, b] = m.apply([r, g, b]);
        [r, g, b, a]
    });
}
