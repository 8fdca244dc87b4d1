//! CLI command implementations

pub mod apply;
pub mod curves;
pub mod preset;

use crate::GradeArgs;
use anyhow::{Context, Result};
use coloreq::{GradeParams, HueNode, NodeChannel};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Parses `NODE=VALUE`, e.g. `red=1.2` or `3=-10`.
pub fn parse_node_value(s: &str) -> Result<(HueNode, f32), String> {
    let (node, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NODE=VALUE, got '{s}'"))?;
    let node = node.parse::<HueNode>().map_err(|e| e.to_string())?;
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("invalid value in '{s}': {e}"))?;
    Ok((node, value))
}

/// Builds parameters from the preset and command-line overrides.
pub fn grade_params(args: &GradeArgs) -> Result<GradeParams> {
    let mut params = match &args.preset {
        Some(path) => GradeParams::load_yaml(path)
            .with_context(|| format!("Failed to load preset: {}", path.display()))?,
        None => GradeParams::default(),
    };

    let overrides = [
        (NodeChannel::Saturation, &args.saturation),
        (NodeChannel::Brightness, &args.brightness),
        (NodeChannel::Hue, &args.hue),
    ];
    for (channel, values) in overrides {
        for &(node, value) in values {
            debug!(%channel, %node, value, "node override");
            params.set_node(channel, node, value);
        }
    }

    if let Some(v) = args.hue_shift {
        params.hue_shift = v;
    }
    if let Some(v) = args.smoothing_hue {
        params.smoothing_hue = v;
    }
    if let Some(v) = args.white_level {
        params.white_level = v;
    }
    if let Some(v) = args.chroma_size {
        params.chroma_size = v;
    }
    if let Some(v) = args.param_size {
        params.param_size = v;
    }
    if args.no_filter {
        params.use_filter = false;
    }

    params.validate().context("Invalid grade parameters")?;
    Ok(params)
}

/// Writes `text` to `path`, or stdout when `None`.
pub fn write_text(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write: {}", path.display())),
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(text.as_bytes()).context("Failed to write to stdout")?;
            out.flush().context("Failed to write to stdout")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_values() {
        assert_eq!(parse_node_value("red=1.2").unwrap(), (HueNode::Red, 1.2));
        assert_eq!(parse_node_value("Lavender = -10").unwrap(), (HueNode::Lavender, -10.0));
        assert_eq!(parse_node_value("3=0.5").unwrap(), (HueNode::Green, 0.5));
        assert!(parse_node_value("red").is_err());
        assert!(parse_node_value("teal=1").is_err());
        assert!(parse_node_value("red=abc").is_err());
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let args = GradeArgs {
            saturation: vec![(HueNode::Red, 1.3)],
            hue: vec![(HueNode::Blue, -15.0)],
            white_level: Some(2.0),
            no_filter: true,
            ..GradeArgs::default()
        };
        let params = grade_params(&args).unwrap();
        assert_eq!(params.saturation[0], 1.3);
        assert_eq!(params.hue[HueNode::Blue.index()], -15.0);
        assert_eq!(params.white_level, 2.0);
        assert!(!params.use_filter);
    }

    #[test]
    fn overrides_are_validated() {
        let args = GradeArgs {
            brightness: vec![(HueNode::Cyan, 3.0)],
            ..GradeArgs::default()
        };
        assert!(grade_params(&args).is_err());
    }

    #[test]
    fn preset_then_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.yaml");
        std::fs::write(&path, "saturation: { red: 0.5, green: 1.5 }\n").unwrap();
        let args = GradeArgs {
            preset: Some(path),
            saturation: vec![(HueNode::Red, 1.1)],
            ..GradeArgs::default()
        };
        let params = grade_params(&args).unwrap();
        assert_eq!(params.saturation[HueNode::Red.index()], 1.1);
        assert_eq!(params.saturation[HueNode::Green.index()], 1.5);
    }
}
