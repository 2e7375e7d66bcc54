//! Port allocation for exporter objects without an explicit port.
//!
//! The allocator scans the configured range upward from its minimum and
//! returns the first port its probe reports as bindable.

use std::net::IpAddr;

use crate::error::Error;
use crate::{Port, PortRange, Result};

use super::probe::{PortProbe, SystemPortProbe};

/// Stateless port allocator.
///
/// # Type Parameters
///
/// * `P` - The probe implementation (defaults to `SystemPortProbe`)
///
/// # Examples
///
/// ```
/// use srtexp::port::{MockPortProbe, PortAllocator};
/// use srtexp::Port;
///
/// let mut probe = MockPortProbe::empty();
/// probe.mark_occupied(Port::try_from(9100).unwrap());
///
/// let allocator = PortAllocator::new(probe);
/// let ip = "127.0.0.1".parse().unwrap();
/// let port = allocator
///     .allocate_between(ip, Port::try_from(9100).unwrap(), Port::try_from(9199).unwrap())
///     .unwrap();
/// assert_eq!(port.value(), 9101);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PortAllocator<P: PortProbe = SystemPortProbe> {
    probe: P,
}

impl<P: PortProbe> PortAllocator<P> {
    /// Create a new allocator around a probe.
    #[must_use]
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    /// Find the first bindable port of `range` on `ip`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoPortAvailable` if every port of the range is busy,
    /// or the probe's own error if it cannot test the address at all.
    pub fn allocate(&self, ip: IpAddr, range: PortRange) -> Result<Port> {
        self.allocate_excluding(ip, range, &[])
    }

    /// Like [`allocate`](Self::allocate), but never returns a port listed in
    /// `claimed`. Claimed ports are skipped without probing.
    ///
    /// # Errors
    ///
    /// Fails as [`allocate`](Self::allocate).
    pub fn allocate_excluding(
        &self,
        ip: IpAddr,
        range: PortRange,
        claimed: &[Port],
    ) -> Result<Port> {
        for port in range {
            if claimed.contains(&port) {
                log::trace!("port {port} is already assigned, skipping");
                continue;
            }
            if self.probe.is_available(ip, port)? {
                log::debug!("allocated port {port} on {ip} from range {range}");
                return Ok(port);
            }
            log::debug!("port {port} on {ip} is in use");
        }

        Err(Error::NoPortAvailable { ip, range })
    }

    /// Find the first bindable port between `min` and `max` inclusive.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPortRange` if `min > max`; the range is not
    /// scanned in that case. Otherwise fails as [`allocate`](Self::allocate).
    pub fn allocate_between(&self, ip: IpAddr, min: Port, max: Port) -> Result<Port> {
        let range = PortRange::new(min, max)?;
        self.allocate(ip, range)
    }
}
