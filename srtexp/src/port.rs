//! Port and port range types for exporter listening ports.
//!
//! This module provides the validated port types used by the configuration
//! store, plus the probing and allocation logic in its submodules.

pub mod allocator;
pub mod probe;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use allocator::PortAllocator;
pub use probe::{MockPortProbe, PortProbe, SystemPortProbe};

/// A valid network port number (1-65535).
///
/// Port 0 is rejected: an exporter must listen on a concrete port.
///
/// # Examples
///
/// ```
/// use srtexp::Port;
///
/// let port = Port::try_from(9100).unwrap();
/// assert_eq!(port.value(), 9100);
///
/// assert!(Port::try_from(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(pub(crate) u16);

impl Port {
    /// The minimum valid port number.
    pub const MIN: u16 = 1;

    /// The maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Returns the underlying port number.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Validates an integer read from a configuration document.
    ///
    /// Documents carry plain integers, so negative and oversized values have
    /// to be rejected here rather than by the type system.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is outside `1..=65535`.
    ///
    /// # Examples
    ///
    /// ```
    /// use srtexp::Port;
    ///
    /// assert_eq!(Port::from_config_value(9100).unwrap().value(), 9100);
    /// assert!(Port::from_config_value(-1).is_err());
    /// assert!(Port::from_config_value(70000).is_err());
    /// ```
    pub fn from_config_value(value: i64) -> Result<Self, InvalidPortError> {
        match u16::try_from(value) {
            Ok(port) => Self::try_from(port).map_err(|mut err| {
                err.value = value;
                err
            }),
            Err(_) => Err(InvalidPortError {
                value,
                reason: format!("must be between {} and {}", Self::MIN, Self::MAX),
            }),
        }
    }
}

impl TryFrom<u16> for Port {
    type Error = InvalidPortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(InvalidPortError {
                value: 0,
                reason: "port 0 is invalid".into(),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for invalid port numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPortError {
    /// The invalid port value.
    pub value: i64,
    /// The reason the port is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidPortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid port {}: {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidPortError {}

/// The range of ports (inclusive on both ends) that exporter objects are
/// assigned from.
///
/// # Examples
///
/// ```
/// use srtexp::{Port, PortRange};
///
/// let min = Port::try_from(9100).unwrap();
/// let max = Port::try_from(9110).unwrap();
/// let range = PortRange::new(min, max).unwrap();
///
/// assert_eq!(range.len(), 11);
/// assert!(range.contains(Port::try_from(9105).unwrap()));
/// assert!(!range.contains(Port::try_from(9099).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortRange {
    pub(crate) min: Port,
    pub(crate) max: Port,
}

impl PortRange {
    /// Creates a new port range.
    ///
    /// # Errors
    ///
    /// Returns an error if `max` is less than `min`.
    pub fn new(min: Port, max: Port) -> Result<Self, InvalidPortRangeError> {
        if max < min {
            Err(InvalidPortRangeError {
                min,
                max,
                reason: "max must be greater than or equal to min".into(),
            })
        } else {
            Ok(Self { min, max })
        }
    }

    /// Returns the minimum port in the range.
    #[must_use]
    pub const fn min(&self) -> Port {
        self.min
    }

    /// Returns the maximum port in the range.
    #[must_use]
    pub const fn max(&self) -> Port {
        self.max
    }

    /// Returns `true` if the range contains the given port.
    #[must_use]
    pub const fn contains(&self, port: Port) -> bool {
        port.value() >= self.min.value() && port.value() <= self.max.value()
    }

    /// Returns the number of ports in the range (inclusive).
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.max.value() as u32 - self.min.value() as u32 + 1
    }

    /// Always `false`; a constructed range holds at least one port.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over all ports in this range, ascending.
    ///
    /// # Examples
    ///
    /// ```
    /// use srtexp::{Port, PortRange};
    ///
    /// let range = PortRange::new(
    ///     Port::try_from(9100).unwrap(),
    ///     Port::try_from(9102).unwrap(),
    /// ).unwrap();
    ///
    /// let ports: Vec<u16> = range.iter().map(Port::value).collect();
    /// assert_eq!(ports, vec![9100, 9101, 9102]);
    /// ```
    #[must_use]
    pub fn iter(self) -> PortRangeIter {
        PortRangeIter {
            next: Some(self.min.value()),
            max: self.max.value(),
        }
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

impl IntoIterator for PortRange {
    type Item = Port;
    type IntoIter = PortRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over ports in a `PortRange`.
#[derive(Debug)]
pub struct PortRangeIter {
    // `None` once exhausted; a plain counter would overflow past 65535.
    next: Option<u16>,
    max: u16,
}

impl Iterator for PortRangeIter {
    type Item = Port;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|p| *p <= self.max)?;
        self.next = current.checked_add(1);
        Some(Port(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(p) if p <= self.max => usize::from(self.max - p) + 1,
            _ => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PortRangeIter {}

/// Error type for invalid port ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPortRangeError {
    /// The minimum port.
    pub min: Port,
    /// The maximum port.
    pub max: Port,
    /// The reason the range is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidPortRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid port range {}-{}: {}",
            self.min, self.max, self.reason
        )
    }
}

impl std::error::Error for InvalidPortRangeError {}
