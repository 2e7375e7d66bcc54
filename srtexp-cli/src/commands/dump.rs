//! Dump command implementation.
//!
//! Prints the configuration as the store resolved it, after defaults,
//! inheritance and port allocation.

use crate::error::CliError;
use crate::utils::{load_store, GlobalOptions, OutputFormat};
use clap::Args;
use serde::Serialize;
use srtexp::{GlobalConfig, ObjectConfig};

/// Print the resolved configuration.
#[derive(Args)]
pub struct DumpCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "text", ignore_case = true)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct DumpView<'a> {
    global: &'a GlobalConfig,
    objects: &'a [ObjectConfig],
    failures: Vec<String>,
}

impl DumpCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let store = load_store(global)?;

        let view = DumpView {
            global: store.global(),
            objects: store.objects(),
            failures: store.failures().iter().map(ToString::to_string).collect(),
        };

        match self.format {
            OutputFormat::Text => print!("{}", store.dump_config()),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&view)?),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        }
        Ok(())
    }
}
