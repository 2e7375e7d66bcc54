//! A thread-safe handle around [`ConfigStore`].
//!
//! Readers never observe a half-applied load: a reload resolves the new
//! document under a read lock and then swaps the result in under a short
//! write lock.

use std::net::IpAddr;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::collector::{CollectorConfig, CollectorMode};
use super::loader::ConfigLoader;
use super::store::ConfigStore;
use crate::error::Result;
use crate::port::{Port, PortProbe, SystemPortProbe};

/// Cloneable, shareable configuration store.
///
/// # Examples
///
/// ```
/// use srtexp::config::{ConfigStore, SharedConfigStore};
/// use srtexp::port::MockPortProbe;
///
/// let shared = SharedConfigStore::new(ConfigStore::with_probe(MockPortProbe::empty()));
/// let reader = shared.clone();
///
/// shared.load_str("objects:\n  - name: camA\n    port: 9150\n");
/// assert_eq!(reader.server_port("camA").unwrap().value(), 9150);
/// ```
#[derive(Debug)]
pub struct SharedConfigStore<P: PortProbe = SystemPortProbe> {
    inner: Arc<RwLock<ConfigStore<P>>>,
}

impl<P: PortProbe> Clone for SharedConfigStore<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for SharedConfigStore<SystemPortProbe> {
    fn default() -> Self {
        Self::new(ConfigStore::new())
    }
}

impl<P: PortProbe> SharedConfigStore<P> {
    /// Wrap a store for sharing.
    #[must_use]
    pub fn new(store: ConfigStore<P>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Borrow the store for several lookups against one consistent state.
    // A panic elsewhere cannot leave a store half-installed, so a poisoned
    // lock still guards a usable value.
    pub fn read(&self) -> RwLockReadGuard<'_, ConfigStore<P>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ConfigStore<P>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load a YAML configuration file, replacing the current state.
    pub fn load_file(&self, path: impl AsRef<Path>) {
        let source = ConfigLoader::load_file(path.as_ref());
        let resolved = self.read().resolve_source(source);
        self.write().install(resolved);
    }

    /// Load a YAML configuration document, replacing the current state.
    pub fn load_str(&self, contents: &str) {
        let source = ConfigLoader::parse_str(contents);
        let resolved = self.read().resolve_source(source);
        self.write().install(resolved);
    }

    /// Append an object entry. See [`ConfigStore::add_config`].
    ///
    /// # Errors
    ///
    /// Fails as [`ConfigStore::add_config`].
    pub fn add_config(
        &self,
        name: impl Into<String>,
        ip: IpAddr,
        port: Port,
        collector: Option<CollectorConfig>,
    ) -> Result<()> {
        self.write().add_config(name, ip, port, collector)
    }

    /// See [`ConfigStore::server_ip`].
    #[must_use]
    pub fn server_ip(&self, name: &str) -> IpAddr {
        self.read().server_ip(name)
    }

    /// See [`ConfigStore::server_port`].
    ///
    /// # Errors
    ///
    /// Fails as [`ConfigStore::server_port`].
    pub fn server_port(&self, name: &str) -> Result<Port> {
        self.read().server_port(name)
    }

    /// See [`ConfigStore::collector_mode`].
    #[must_use]
    pub fn collector_mode(&self, name: &str) -> CollectorMode {
        self.read().collector_mode(name)
    }

    /// Owned copy of [`ConfigStore::collector_config`].
    #[must_use]
    pub fn collector_config(&self, name: &str) -> CollectorConfig {
        self.read().collector_config(name).clone()
    }

    /// See [`ConfigStore::dump_config`].
    #[must_use]
    pub fn dump_config(&self) -> String {
        self.read().dump_config()
    }
}
