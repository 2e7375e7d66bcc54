//! Lookup command implementation.
//!
//! Shows what the exporter would use for one object. Names without an entry
//! resolve to the global settings, as they do in the exporter, unless
//! `--strict` is given.

use crate::error::CliError;
use crate::utils::{load_store, GlobalOptions, OutputFormat};
use clap::Args;
use serde::Serialize;
use srtexp::{CollectorConfig, Port};
use std::net::IpAddr;

/// Show the resolved settings for one object.
#[derive(Args)]
pub struct LookupCommand {
    /// Object name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Fail if the object has no entry of its own
    #[arg(long)]
    pub strict: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text", ignore_case = true)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct LookupView<'a> {
    name: &'a str,
    configured: bool,
    ip: IpAddr,
    port: Port,
    collector: &'a CollectorConfig,
    exposed: Vec<&'a str>,
}

impl LookupCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let store = load_store(global)?;

        let configured = if self.strict {
            store.object_config(&self.name)?;
            true
        } else {
            store.find_object_config(&self.name).is_some()
        };

        let collector = store.collector_config(&self.name);
        let view = LookupView {
            name: &self.name,
            configured,
            ip: store.server_ip(&self.name),
            port: store.server_port(&self.name)?,
            collector,
            exposed: collector.exposed_variables(),
        };

        match self.format {
            OutputFormat::Text => print_text(&view),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&view)?),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        }
        Ok(())
    }
}

fn print_text(view: &LookupView<'_>) {
    let source = if view.configured {
        "configured"
    } else {
        "global defaults"
    };
    println!("{} ({source})", view.name);
    println!("  address: {}:{}", view.ip, view.port);
    println!("  mode: {}", view.collector.mode);
    match view.collector.preset {
        Some(preset) => println!("  filter: {} (preset {preset})", view.collector.filter_mode),
        None => println!("  filter: {}", view.collector.filter_mode),
    }
    for label in &view.collector.labels {
        println!("  label: {}={}", label.name, label.value);
    }
    println!("  exposed ({}):", view.exposed.len());
    for variable in &view.exposed {
        println!("    {variable}");
    }
}
