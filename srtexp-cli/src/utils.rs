//! Utility functions for CLI operations.
//!
//! This module provides the pieces shared by every command: global options,
//! store loading, and output format selection.

use crate::error::CliError;
use clap::ValueEnum;
use srtexp::ConfigStore;
use std::path::PathBuf;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // verbose/quiet are consumed by the logger in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Configuration file to load.
    pub config: Option<PathBuf>,
}

/// Output format for commands that print structured data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// YAML document
    Yaml,
    /// Pretty-printed JSON
    Json,
}

/// Load the configuration named by the global options.
///
/// `SRTEXP_IP`, `SRTEXP_PORT_MIN` and `SRTEXP_PORT_MAX` are applied on top of
/// the file. The returned store is always loaded; problems are available
/// through `ConfigStore::failures`.
///
/// # Errors
///
/// Returns `InvalidArguments` if no configuration file was given.
pub fn load_store(global: &GlobalOptions) -> Result<ConfigStore, CliError> {
    let path = global.config.as_ref().ok_or_else(|| {
        CliError::InvalidArguments(
            "no configuration file given (use --config or SRTEXP_CONFIG)".to_string(),
        )
    })?;

    let mut store = ConfigStore::new().with_env_overrides();
    store.load_file(path);
    Ok(store)
}
