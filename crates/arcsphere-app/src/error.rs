//! Errors surfaced by the `arcsphere` binary.

use std::path::PathBuf;

use arcsphere_config::ConfigError;
use arcsphere_outline::OutlineError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read {}: {source}", path.display())]
    ReadBlocks {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    ParseBlocks {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("block {index} has {vertices} vertices, at least 3 are needed")]
    DegenerateBlock { index: usize, vertices: usize },

    #[error("failed to export outline: {0}")]
    Outline(#[from] OutlineError),

    #[error("failed to write {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
