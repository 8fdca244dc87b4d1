//! coloreq - hue equalizer CLI
//!
//! Grades PNG images with eight hue nodes of hue, saturation and
//! brightness corrections.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use coloreq::{HueNode, MaskKind};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod png_io;

#[derive(Parser)]
#[command(name = "coloreq")]
#[command(author, version, about = "Hue-dependent color equalizer")]
#[command(long_about = "
Grades images per hue: eight nodes around the color wheel each carry a hue
offset, a saturation gain and a brightness gain, interpolated smoothly in
between and applied in a perceptual (darktable UCS 22) space.

Examples:
  coloreq apply in.png -o out.png --sat red=1.3 --sat blue=0.8
  coloreq apply in.png -o out.png --preset warm.yaml --profile rec2020
  coloreq apply in.png -o mask.png --sat green=1.5 --mask saturation
  coloreq curves --hue orange=-10 --step 15
  coloreq preset --bright cyan=0.7 -o cool.yaml
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a PNG image
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),

    /// Print the interpolated hue curves as CSV
    Curves(CurvesArgs),

    /// Write a YAML preset
    Preset(PresetArgs),
}

/// Grade parameters shared by every command.
#[derive(Args, Debug, Clone, Default)]
struct GradeArgs {
    /// YAML preset to start from (defaults otherwise)
    #[arg(short, long)]
    preset: Option<PathBuf>,

    /// Saturation gain of a node, 0..2 (repeatable)
    #[arg(long = "sat", value_name = "NODE=GAIN", value_parser = commands::parse_node_value)]
    saturation: Vec<(HueNode, f32)>,

    /// Brightness gain of a node, 0..2 (repeatable)
    #[arg(long = "bright", value_name = "NODE=GAIN", value_parser = commands::parse_node_value)]
    brightness: Vec<(HueNode, f32)>,

    /// Hue offset of a node in degrees, -180..180 (repeatable)
    #[arg(long = "hue", value_name = "NODE=DEGREES", value_parser = commands::parse_node_value, allow_hyphen_values = true)]
    hue: Vec<(HueNode, f32)>,

    /// Node placement shift in degrees, -23..23
    #[arg(long, allow_hyphen_values = true)]
    hue_shift: Option<f32>,

    /// Hue curve smoothness, 0.05..2
    #[arg(long)]
    smoothing_hue: Option<f32>,

    /// White level in EV, -2..16
    #[arg(long, allow_hyphen_values = true)]
    white_level: Option<f32>,

    /// Chromaticity prefilter radius, 1..10
    #[arg(long)]
    chroma_size: Option<f32>,

    /// Correction filter radius, 1..128
    #[arg(long)]
    param_size: Option<f32>,

    /// Disable both guided filters
    #[arg(long)]
    no_filter: bool,
}

#[derive(Args)]
struct ApplyArgs {
    /// Input PNG (sRGB encoded, 8 or 16 bit)
    input: PathBuf,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    grade: GradeArgs,

    /// Working profile: srgb, rec2020, display-p3, acescg, adobe-rgb, prophoto
    #[arg(long, default_value = "srgb")]
    profile: String,

    /// Filter radius scale (image size relative to full resolution)
    #[arg(long, default_value = "1.0")]
    scale: f32,

    /// Render a diagnostic mask: weight, hue, saturation, brightness
    #[arg(long)]
    mask: Option<MaskKind>,

    /// Output bit depth (8 or 16, default: same as input)
    #[arg(short = 'd', long)]
    depth: Option<u8>,
}

#[derive(Args)]
struct CurvesArgs {
    #[command(flatten)]
    grade: GradeArgs,

    /// Print every N-th degree
    #[arg(long, default_value = "1")]
    step: usize,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct PresetArgs {
    #[command(flatten)]
    grade: GradeArgs,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Apply(args) => commands::apply::run(args, cli.verbose),
        Commands::Curves(args) => commands::curves::run(args, cli.verbose),
        Commands::Preset(args) => commands::preset::run(args, cli.verbose),
    }
}
