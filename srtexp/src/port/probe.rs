//! Bind probes for port availability.
//!
//! A probe answers one question: can a listener bind `ip:port` right now?
//! The answer is transient. Nothing is reserved, so the exporter may still
//! lose the port to another process before it binds, and has to treat that
//! late failure as retryable.

use std::collections::HashSet;
use std::io;
use std::net::{IpAddr, SocketAddr, TcpListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::{Port, Result};

/// Trait for probing whether a port can be bound on an address.
///
/// # Examples
///
/// ```
/// use srtexp::port::{PortProbe, SystemPortProbe};
/// use srtexp::Port;
///
/// let probe = SystemPortProbe;
/// let ip = "127.0.0.1".parse().unwrap();
/// let port = Port::try_from(9100).unwrap();
///
/// match probe.is_available(ip, port) {
///     Ok(free) => println!("127.0.0.1:9100 free: {free}"),
///     Err(e) => eprintln!("probe failed: {e}"),
/// }
/// ```
pub trait PortProbe: Send + Sync {
    /// Returns `Ok(true)` if `ip:port` could be bound at call time.
    ///
    /// # Errors
    ///
    /// Returns an error when the probe cannot answer at all, e.g. the
    /// address does not belong to this host.
    fn is_available(&self, ip: IpAddr, port: Port) -> Result<bool>;
}

/// Production probe: binds a TCP listener and drops it immediately.
///
/// Unspecified addresses (`0.0.0.0`, `::`) are delegated to `port-selector`,
/// which checks the port across every local interface.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPortProbe;

impl PortProbe for SystemPortProbe {
    fn is_available(&self, ip: IpAddr, port: Port) -> Result<bool> {
        if ip.is_unspecified() {
            return Ok(port_selector::is_free(port.value()));
        }

        match TcpListener::bind(SocketAddr::new(ip, port.value())) {
            Ok(listener) => {
                drop(listener);
                Ok(true)
            }
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::AddrInUse | io::ErrorKind::PermissionDenied
                ) =>
            {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Mock probe with a configurable set of busy ports.
///
/// Clones share the probe counter, so a test can hand one clone to a store
/// and inspect the other afterwards.
///
/// # Examples
///
/// ```
/// use srtexp::port::{MockPortProbe, PortProbe};
/// use srtexp::Port;
///
/// let mut probe = MockPortProbe::empty();
/// probe.mark_occupied(Port::try_from(9100).unwrap());
///
/// let ip = "127.0.0.1".parse().unwrap();
/// assert!(!probe.is_available(ip, Port::try_from(9100).unwrap()).unwrap());
/// assert!(probe.is_available(ip, Port::try_from(9101).unwrap()).unwrap());
/// assert_eq!(probe.probe_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockPortProbe {
    occupied_ports: HashSet<Port>,
    unbindable_ips: HashSet<IpAddr>,
    probes: Arc<AtomicUsize>,
}

impl MockPortProbe {
    /// Create a mock probe with the given busy ports.
    #[must_use]
    pub fn new(occupied_ports: HashSet<Port>) -> Self {
        Self {
            occupied_ports,
            ..Self::default()
        }
    }

    /// Create a mock probe where every port is free.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Mark a port as busy on every address.
    pub fn mark_occupied(&mut self, port: Port) {
        self.occupied_ports.insert(port);
    }

    /// Mark a port as free again.
    pub fn mark_free(&mut self, port: Port) {
        self.occupied_ports.remove(&port);
    }

    /// Make every probe against `ip` fail, as for a non-local address.
    pub fn mark_unbindable(&mut self, ip: IpAddr) {
        self.unbindable_ips.insert(ip);
    }

    /// Number of probes performed so far, across all clones.
    #[must_use]
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

impl PortProbe for MockPortProbe {
    fn is_available(&self, ip: IpAddr, port: Port) -> Result<bool> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.unbindable_ips.contains(&ip) {
            return Err(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("cannot assign requested address {ip}"),
            )
            .into());
        }
        Ok(!self.occupied_ports.contains(&port))
    }
}
