//! Error types for the srtexp library.
//!
//! Most of these never escape a `Load`: the store records them as
//! [`LoadFailure`](crate::config::LoadFailure)s and degrades to defaults.
//! They surface directly only from `add_config`, port allocation, and the
//! strict parsing helpers.

use std::net::IpAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with an srtexp error.
///
/// # Examples
///
/// ```
/// use srtexp::{Error, Result};
///
/// fn example_operation() -> Result<u16> {
///     Ok(9100)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the srtexp library.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file is missing or could not be read.
    #[error("cannot read configuration {}: {reason}", path.display())]
    ConfigSourceUnreadable {
        /// The configuration file path.
        path: PathBuf,
        /// Why the read failed.
        reason: String,
    },

    /// The configuration document is not valid YAML or has the wrong shape.
    #[error("malformed configuration: {reason}")]
    ConfigMalformed {
        /// Description of the structural problem.
        reason: String,
    },

    /// A symbolic value was not recognized.
    #[error("unknown value '{value}' for '{field}'")]
    UnknownEnumValue {
        /// The document field holding the value.
        field: String,
        /// The unrecognized value.
        value: String,
    },

    /// Every port of the configured range is in use.
    #[error("no port available on {ip} in range {range}")]
    NoPortAvailable {
        /// The address the probe was bound against.
        ip: IpAddr,
        /// The exhausted range.
        range: crate::port::PortRange,
    },

    /// An object with this name is already configured.
    #[error("duplicate object name '{name}'")]
    DuplicateName {
        /// The conflicting name.
        name: String,
    },

    /// No object with this name is configured.
    #[error("object '{name}' not found")]
    NotFound {
        /// The name that was looked up.
        name: String,
    },

    /// An invalid port number was provided.
    #[error("invalid port {value}: {reason}")]
    InvalidPort {
        /// The invalid port value.
        value: i64,
        /// The reason the port is invalid.
        reason: String,
    },

    /// An invalid port range was specified.
    #[error("invalid port range {min}-{max}: {reason}")]
    InvalidPortRange {
        /// The minimum port in the range.
        min: u16,
        /// The maximum port in the range.
        max: u16,
        /// The reason the range is invalid.
        reason: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::ConfigMalformed {
            reason: err.to_string(),
        }
    }
}

impl From<crate::port::InvalidPortError> for Error {
    fn from(err: crate::port::InvalidPortError) -> Self {
        Self::InvalidPort {
            value: err.value,
            reason: err.reason,
        }
    }
}

impl From<crate::port::InvalidPortRangeError> for Error {
    fn from(err: crate::port::InvalidPortRangeError) -> Self {
        Self::InvalidPortRange {
            min: err.min.value(),
            max: err.max.value(),
            reason: err.reason,
        }
    }
}

impl Error {
    /// Check if the error is a lookup miss.
    ///
    /// # Examples
    ///
    /// ```
    /// use srtexp::Error;
    ///
    /// let err = Error::NotFound { name: "camA".into() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the error is a port-range exhaustion.
    ///
    /// Exhaustion is retryable: ports may free up before the next attempt.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NoPortAvailable { .. })
    }
}
