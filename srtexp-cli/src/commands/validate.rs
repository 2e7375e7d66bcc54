//! Command to validate an srtexp configuration file.

use crate::error::CliError;
use crate::utils::{load_store, GlobalOptions};
use clap::Args;
use std::path::PathBuf;

/// Validate an srtexp configuration file.
///
/// Loading never fails, so validation means loading the file and listing
/// every entry or field the store had to skip or replace.
#[derive(Args)]
pub struct ValidateCommand {
    /// Configuration file to validate (defaults to --config)
    #[arg(value_name = "CONFIG_PATH")]
    pub config_path: Option<PathBuf>,
}

impl ValidateCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let options = GlobalOptions {
            config: self.config_path.or_else(|| global.config.clone()),
            ..global.clone()
        };
        let store = load_store(&options)?;

        let failures = store.failures();
        if failures.is_empty() {
            println!(
                "Configuration is valid ({} object(s))",
                store.objects().len()
            );
            return Ok(());
        }

        for failure in failures {
            println!("{failure}");
        }
        Err(CliError::SemanticFailure(format!(
            "{} problem(s) found",
            failures.len()
        )))
    }
}
