//! Preset command
//!
//! Writes the effective parameters (preset plus overrides) as YAML.

use crate::PresetArgs;
use anyhow::{Context, Result};
use tracing::info;

pub fn run(args: PresetArgs, verbose: bool) -> Result<()> {
    let params = super::grade_params(&args.grade)?;
    let yaml = params.to_yaml_string().context("Failed to serialize preset")?;
    super::write_text(args.output.as_deref(), &yaml)?;

    if let Some(path) = &args.output {
        info!(path = %path.display(), "preset written");
        if verbose {
            eprintln!("Wrote preset to {}", path.display());
        }
    }
    Ok(())
}
