//! Build script for srtexp-cli.
//!
//! This script generates the man page at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("srtexp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect SRT exporter configuration")
        .long_about(
            "Command-line tool for inspecting and validating SRT statistics exporter configuration files",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file to load")
                .value_name("PATH")
                .global(true)
                .env("SRTEXP_CONFIG"),
        )
        .subcommands(vec![
            Command::new("dump")
                .about("Print the resolved configuration")
                .long_about("Print the configuration after defaults, inheritance and port allocation"),
            Command::new("validate")
                .about("Report every problem found while loading the configuration")
                .long_about("Load a configuration file and list every entry or field that was skipped or replaced"),
            Command::new("lookup")
                .about("Show the resolved settings for one object")
                .long_about("Show address, collector mode, filter and exposed statistics for one object"),
            Command::new("port")
                .about("Print the listening port for one object")
                .long_about("Print the configured or allocated listening port for one object"),
        ])
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("srtexp.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
