//! Environment variable overrides for the global section.
//!
//! Supported variables:
//! - `SRTEXP_IP`: listening address
//! - `SRTEXP_PORT_MIN` / `SRTEXP_PORT_MAX`: allocation range bounds
//!
//! Overrides follow the same policy as the document: an invalid value is
//! reported and ignored, never fatal.

use std::env;
use std::net::IpAddr;

use crate::config::schema::GlobalConfig;
use crate::config::store::LoadFailure;
use crate::error::Error;
use crate::port::{Port, PortRange};

/// Listening address override.
pub const ENV_IP: &str = "SRTEXP_IP";

/// Port range lower bound override.
pub const ENV_PORT_MIN: &str = "SRTEXP_PORT_MIN";

/// Port range upper bound override.
pub const ENV_PORT_MAX: &str = "SRTEXP_PORT_MAX";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use srtexp::config::{EnvironmentConfig, GlobalConfig};
///
/// let mut global = GlobalConfig::default();
/// let failures = EnvironmentConfig::apply_overrides(&mut global);
/// for failure in failures {
///     eprintln!("{failure}");
/// }
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply `SRTEXP_*` overrides to `global`.
    ///
    /// Returns one failure per rejected variable. A range whose bounds end
    /// up inverted is rejected as a whole and the previous range is kept.
    pub fn apply_overrides(global: &mut GlobalConfig) -> Vec<LoadFailure> {
        let mut failures = Vec::new();

        if let Ok(value) = env::var(ENV_IP) {
            match value.trim().parse::<IpAddr>() {
                Ok(ip) => global.ip = ip,
                Err(e) => failures.push(LoadFailure::new(
                    ENV_IP,
                    Error::ConfigMalformed {
                        reason: format!("invalid address '{value}': {e}"),
                    },
                )),
            }
        }

        let min = Self::port_override(ENV_PORT_MIN, &mut failures).unwrap_or(global.ports.min());
        let max = Self::port_override(ENV_PORT_MAX, &mut failures).unwrap_or(global.ports.max());
        match PortRange::new(min, max) {
            Ok(range) => global.ports = range,
            Err(e) => failures.push(LoadFailure::new(ENV_PORT_MIN, e.into())),
        }

        for failure in &failures {
            log::warn!("ignoring environment override: {failure}");
        }
        failures
    }

    fn port_override(key: &str, failures: &mut Vec<LoadFailure>) -> Option<Port> {
        let value = env::var(key).ok()?;
        let parsed = value
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::ConfigMalformed {
                reason: format!("'{value}' is not a port number"),
            })
            .and_then(|n| Port::from_config_value(n).map_err(Error::from));

        parsed.map_err(|e| failures.push(LoadFailure::new(key, e))).ok()
    }
}
