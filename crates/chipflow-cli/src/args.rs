//! Command-line argument definitions for the Chipflow CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, the container width and logging verbosity.

use clap::Parser;

use chipflow::scene::check_width;

/// Command-line arguments for the Chipflow chip group renderer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input scene file
    #[arg(help = "Path to the input scene (TOML)")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Container width, overriding the one in the scene
    #[arg(short, long, value_parser = parse_width, allow_negative_numbers = true)]
    pub width: Option<f32>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

fn parse_width(value: &str) -> Result<f32, String> {
    let width: f32 = value
        .parse()
        .map_err(|err| format!("`{value}` is not a number: {err}"))?;
    check_width(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_override_is_parsed() {
        let args = Args::try_parse_from(["chipflow", "scene.toml", "--width", "240"]).unwrap();
        assert_eq!(args.width, Some(240.0));
    }

    #[test]
    fn test_invalid_width_overrides_are_rejected() {
        for width in ["-5", "nan", "inf", "wide"] {
            let result = Args::try_parse_from(["chipflow", "scene.toml", "--width", width]);
            assert!(result.is_err(), "width {width} accepted");
        }
    }
}
