#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # srtexp
//!
//! Configuration core for an SRT statistics exporter.
//!
//! Each SRT connection ("object") is published on its own listening
//! address. This library loads the YAML configuration describing those
//! objects, allocates ports for objects that do not name one, and answers
//! per-object lookups with fallback to global settings.
//!
//! ## Core Types
//!
//! - [`ConfigStore`] and [`SharedConfigStore`]: load and look up configuration
//! - [`CollectorConfig`]: what an object publishes and when
//! - [`Port`], [`PortRange`] and [`PortAllocator`]: port validation and allocation
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: stderr backend for the `log` facade
//!
//! ## Examples
//!
//! ```
//! use srtexp::{ConfigStore, Port};
//! use srtexp::port::MockPortProbe;
//!
//! let mut store = ConfigStore::with_probe(MockPortProbe::empty());
//! store.load_str("objects:\n  - name: camA\n");
//!
//! assert_eq!(store.server_port("camA").unwrap(), Port::try_from(9100).unwrap());
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod port;

// Re-export key types at crate root for convenience
pub use config::{
    CollectorConfig, CollectorConfigBuilder, CollectorMode, ConfigStore, FilterMode, GlobalConfig,
    LoadFailure, ObjectConfig, Preset, SharedConfigStore, StoreState,
};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use port::{Port, PortAllocator, PortRange};
