//! CLI logic for the Chipflow chip group renderer.
//!
//! This module contains the core CLI logic: load configuration, read the
//! scene, run the layout loop and write the SVG.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use chipflow::{ChipGroupBuilder, ChipflowError};

/// Run the Chipflow CLI application
///
/// This function processes the input scene through the Chipflow pipeline
/// and writes the resulting SVG to the output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `ChipflowError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Scene errors
pub fn run(args: &Args) -> Result<(), ChipflowError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing scene"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = ChipGroupBuilder::new(app_config);
    let mut scene = builder.parse(&source)?;
    if let Some(width) = args.width {
        info!(width; "Overriding container width");
        scene = scene.with_width(width)?;
    }
    let svg = builder.render_svg(&scene)?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
