//! Resolved configuration records.
//!
//! These are the outputs of resolution, not a mirror of the document: every
//! field is populated and validated.

use std::net::{IpAddr, Ipv4Addr};

use serde::Serialize;

use super::collector::CollectorConfig;
use crate::port::{Port, PortRange};

/// Default listening address for exporter objects.
pub const DEFAULT_IP: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Default lower bound of the object port range.
pub const DEFAULT_PORT_MIN: u16 = 9100;

/// Default upper bound of the object port range.
pub const DEFAULT_PORT_MAX: u16 = 9199;

/// Settings for objects without their own entry.
///
/// # Examples
///
/// ```
/// use srtexp::config::{GlobalConfig, DEFAULT_PORT_MIN, DEFAULT_PORT_MAX};
///
/// let global = GlobalConfig::default();
/// assert_eq!(global.ports.min().value(), DEFAULT_PORT_MIN);
/// assert_eq!(global.ports.max().value(), DEFAULT_PORT_MAX);
/// assert!(global.ip.is_unspecified());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalConfig {
    /// Listening address.
    pub ip: IpAddr,
    /// Range object ports are allocated from.
    pub ports: PortRange,
    /// Collector settings.
    pub collector: CollectorConfig,
}

impl GlobalConfig {
    /// The compiled-in default port range.
    #[must_use]
    pub const fn default_ports() -> PortRange {
        PortRange {
            min: Port(DEFAULT_PORT_MIN),
            max: Port(DEFAULT_PORT_MAX),
        }
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            ip: DEFAULT_IP,
            ports: Self::default_ports(),
            collector: CollectorConfig::default(),
        }
    }
}

/// Settings for one named exporter object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectConfig {
    /// Unique object name.
    pub name: String,
    /// Listening address.
    pub ip: IpAddr,
    /// Listening port.
    pub port: Port,
    /// Collector settings.
    pub collector: CollectorConfig,
}

impl ObjectConfig {
    /// Create an object config.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        ip: IpAddr,
        port: Port,
        collector: CollectorConfig,
    ) -> Self {
        Self {
            name: name.into(),
            ip,
            port,
            collector,
        }
    }
}
