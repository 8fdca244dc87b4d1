//! Curves command
//!
//! Prints the interpolated hue, saturation and brightness tables as CSV.

use crate::CurvesArgs;
use anyhow::{bail, Context, Result};
use coloreq::CurveSample;
use std::fmt::Write;
use tracing::info;

pub fn run(args: CurvesArgs, verbose: bool) -> Result<()> {
    if args.step == 0 {
        bail!("--step must be at least 1");
    }
    let params = super::grade_params(&args.grade)?;
    let grade = params.compile().context("Failed to build hue curves")?;
    info!(step = args.step, "printing curves");

    let csv = format_csv(grade.curves().step_by(args.step));
    super::write_text(args.output.as_deref(), &csv)?;

    if verbose {
        eprintln!(
            "saturation {:.3}..{:.3}, brightness {:.3}..{:.3}",
            grade.saturation().min(),
            grade.saturation().max(),
            grade.brightness().min(),
            grade.brightness().max()
        );
    }
    Ok(())
}

fn format_csv(rows: impl Iterator<Item = CurveSample>) -> String {
    let mut csv = String::from("degrees,hue,saturation,brightness\n");
    for row in rows {
        // Writing to a String cannot fail
        let _ = writeln!(
            csv,
            "{},{:.4},{:.5},{:.5}",
            row.degrees, row.hue, row.saturation, row.brightness
        );
    }
    csv
}
