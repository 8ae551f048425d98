//! Command-line argument parsing for the exporter.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, Projection};

/// Export closed loops of spherical arcs as SVG outlines.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "arcsphere", about = "Export spherical arc loops as SVG outlines")]
pub struct CliArgs {
    /// RON block file to read.
    #[arg(long, short)]
    pub input: PathBuf,

    /// SVG file to write (stdout when omitted).
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Chart used to flatten the sphere.
    #[arg(long, value_enum)]
    pub projection: Option<Projection>,

    /// Side length of the output image.
    #[arg(long)]
    pub size: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(projection) = args.projection {
            self.outline.projection = projection;
        }
        if let Some(size) = args.size {
            self.svg.size = size;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
