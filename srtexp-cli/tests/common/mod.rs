//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers with a clean `SRTEXP_*` environment
//! - Configuration fixtures

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A configuration with explicit ports only, so no test depends on which
/// local ports happen to be free.
pub const SAMPLE_CONFIG: &str = r"
ip: 127.0.0.1
portMin: 47100
portMax: 47199
collector:
  mode: collect_periodically
  filterMode: SRT_COMMON
  labels:
    - name: site
      value: tokyo
objects:
  - name: camA
    port: 47150
    collector:
      filterMode: SRT_SOURCE
  - name: camB
    port: 47151
    collector:
      filterMode: blacklist
      variables: [msTimeStamp]
";

/// Test environment with an isolated directory for configuration files.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            temp_path,
        }
    }

    /// Get a command builder with every `SRTEXP_*` variable cleared.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("srtexp").expect("Failed to find srtexp binary");
        for key in [
            "SRTEXP_CONFIG",
            "SRTEXP_IP",
            "SRTEXP_PORT_MIN",
            "SRTEXP_PORT_MAX",
            "SRTEXP_LOG_MODE",
        ] {
            cmd.env_remove(key);
        }
        cmd
    }

    /// Get a command builder with `--config` pointing at `config`.
    pub fn command_with(&self, config: &Path) -> Command {
        let mut cmd = self.command();
        cmd.arg("--config").arg(config);
        cmd
    }

    /// Write a configuration file and return its path.
    pub fn write_config(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        std::fs::write(&path, contents).expect("Failed to write config file");
        path
    }

    /// Write [`SAMPLE_CONFIG`] and return its path.
    pub fn sample_config(&self) -> PathBuf {
        self.write_config("srtexp.yaml", SAMPLE_CONFIG)
    }
}
