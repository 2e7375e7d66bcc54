//! Port command implementation.

use crate::error::CliError;
use crate::utils::{load_store, GlobalOptions};
use clap::Args;

/// Print the listening port for one object.
///
/// Unconfigured names get the first free port of the global range, which
/// is only a snapshot: nothing is reserved.
#[derive(Args)]
pub struct PortCommand {
    /// Object name
    #[arg(value_name = "NAME")]
    pub name: String,
}

impl PortCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let store = load_store(global)?;
        let port = store.server_port(&self.name)?;
        println!("{port}");
        Ok(())
    }
}
