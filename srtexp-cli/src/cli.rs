//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{DumpCommand, LookupCommand, PortCommand, ValidateCommand};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect and validate SRT exporter configuration files.
#[derive(Parser)]
#[command(name = "srtexp")]
#[command(version, about = "Inspect SRT exporter configuration", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Configuration file to load
    #[arg(
        short,
        long,
        value_name = "PATH",
        global = true,
        env = "SRTEXP_CONFIG"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Print the resolved configuration
    Dump(DumpCommand),

    /// Report every problem found while loading the configuration
    Validate(ValidateCommand),

    /// Show the resolved settings for one object
    Lookup(LookupCommand),

    /// Print the listening port for one object
    Port(PortCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["srtexp", "port", "camA", "--config", "/tmp/x.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.yaml")));
        assert!(matches!(cli.command, Command::Port(_)));
    }
}
