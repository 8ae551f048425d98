//! Configuration for the arcsphere exporter.
//!
//! Settings persist to disk as RON and can be overridden from the command
//! line. Missing fields fall back to defaults and unknown fields are ignored,
//! so config files survive upgrades in both directions.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, OutlineConfig, Projection, SvgConfig, default_config_dir};
pub use error::ConfigError;
