//! Configuration for srtexp exporter objects.
//!
//! A configuration document is a YAML mapping with a global section and a
//! list of named objects:
//!
//! ```yaml
//! ip: 0.0.0.0
//! portMin: 9100
//! portMax: 9199
//! collector:
//!   mode: collect_on_request
//!   filterMode: SRT_COMMON
//! objects:
//!   - name: camA
//!     port: 9150
//!     collector:
//!       filterMode: SRT_SOURCE
//!       labels:
//!         - name: site
//!           value: tokyo
//!   - name: camB          # port allocated from portMin..=portMax
//! ```
//!
//! # Resolution
//!
//! Object fields fall back to the global section, and global fields fall
//! back to compiled-in defaults. Loading never fails outright; problems are
//! logged and kept as [`LoadFailure`]s.
//!
//! # Examples
//!
//! ```
//! use srtexp::config::{CollectorMode, ConfigStore, Preset};
//! use srtexp::port::MockPortProbe;
//!
//! let mut store = ConfigStore::with_probe(MockPortProbe::empty());
//! store.load_str(r"
//! collector:
//!   mode: collect_periodically
//! objects:
//!   - name: camA
//!     collector:
//!       filterMode: SRT_SOURCE
//! ");
//!
//! let collector = store.collector_config("camA");
//! assert_eq!(collector.mode, CollectorMode::CollectPeriodically);
//! assert_eq!(collector.preset, Some(Preset::Source));
//! ```

pub mod collector;
pub mod environment;
pub mod loader;
pub mod node;
pub mod schema;
pub mod shared;
pub mod store;
pub mod variables;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

// Re-export key types at module root
pub use collector::{
    CollectorConfig, CollectorConfigBuilder, CollectorMode, FilterMode, FilterSelection, Label,
};
pub use environment::{EnvironmentConfig, ENV_IP, ENV_PORT_MAX, ENV_PORT_MIN};
pub use loader::ConfigLoader;
pub use node::ConfigNode;
pub use schema::{GlobalConfig, ObjectConfig, DEFAULT_IP, DEFAULT_PORT_MAX, DEFAULT_PORT_MIN};
pub use shared::SharedConfigStore;
pub use store::{ConfigStore, LoadFailure, StoreState};
pub use variables::{
    resolve_preset_name, resolve_variables, Preset, SRT_ALL_VARIABLES, SRT_COMMON_VARIABLES,
    SRT_DESTINATION_VARIABLES, SRT_SOURCE_VARIABLES,
};
