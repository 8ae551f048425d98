//! `arcsphere`: export closed loops of spherical arcs as SVG outlines.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags:
//!
//! ```text
//! arcsphere --input demos/blocks.ron --output blocks.svg --projection equirectangular
//! ```

mod blocks;
mod error;

use std::path::Path;
use std::process::ExitCode;

use arcsphere_config::{CliArgs, Config, Projection, default_config_dir};
use arcsphere_geometry::ProjectionKind;
use arcsphere_outline::{ExportStats, SvgPathSink, SvgStyle, export_loops};
use clap::Parser;
use tracing::info;

use crate::blocks::BlockFile;
use crate::error::AppError;

fn projection_kind(projection: Projection) -> ProjectionKind {
    match projection {
        Projection::Octahedral => ProjectionKind::Octahedral,
        Projection::Equirectangular => ProjectionKind::Equirectangular,
    }
}

fn svg_style(config: &Config) -> SvgStyle {
    SvgStyle {
        fill: config.svg.fill.clone(),
        stroke: config.svg.stroke.clone(),
        stroke_width: config.svg.stroke_width,
    }
}

/// Read `input`, export every block and write the SVG document to `output`
/// (stdout when `None`).
fn export(config: &Config, input: &Path, output: Option<&Path>) -> Result<ExportStats, AppError> {
    let blocks = BlockFile::load(input)?;
    let (arcs, starts) = blocks.build_loops()?;

    let projector = projection_kind(config.outline.projection);
    let mut sink = SvgPathSink::with_style(config.svg.size, svg_style(config));
    let stats = export_loops(&arcs, &starts, &projector, &mut sink)?;
    info!(
        blocks = starts.len(),
        shapes = stats.shapes,
        segments = stats.segments,
        connectors = stats.connectors,
        projection = ?config.outline.projection,
        "exported blocks"
    );

    let document = sink.document();
    match output {
        Some(path) => {
            std::fs::write(path, document).map_err(|source| AppError::WriteOutput {
                path: path.to_path_buf(),
                source,
            })?;
            info!("Wrote {}", path.display());
        }
        None => print!("{document}"),
    }
    Ok(stats)
}

fn run(args: &CliArgs) -> Result<ExportStats, AppError> {
    // Resolve config directory
    let config_dir = match &args.config {
        Some(dir) => dir.clone(),
        None => default_config_dir()?,
    };

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(args);

    let log_dir = config_dir.join("logs");
    arcsphere_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    export(&config, &args.input, args.output.as_deref())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "export failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
