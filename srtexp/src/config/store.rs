//! The configuration store: global settings plus per-object entries.
//!
//! A load never fails. Whatever goes wrong is kept as narrow as possible:
//!
//! - an unreadable or malformed document yields the compiled-in defaults
//! - an invalid field yields its fallback: the compiled-in default for the
//!   global section, the global value for an object
//! - an object entry without a name, with a duplicate name, or whose port
//!   cannot be allocated is skipped
//!
//! Each of these is recorded as a [`LoadFailure`] and logged. A second load
//! replaces everything; nothing is merged with the previous state.

use std::fmt;
use std::net::IpAddr;
use std::path::Path;

use serde_yaml::Value;

use super::collector::{CollectorConfig, CollectorConfigBuilder, CollectorMode};
use super::environment::EnvironmentConfig;
use super::loader::ConfigLoader;
use super::node::ConfigNode;
use super::schema::{GlobalConfig, ObjectConfig};
use super::variables::resolve_variables;
use crate::error::{Error, Result};
use crate::port::{Port, PortAllocator, PortProbe, PortRange, SystemPortProbe};

/// Whether a store has been loaded yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreState {
    /// Only compiled-in defaults exist.
    #[default]
    Unloaded,
    /// A load ran, whether or not every part of it succeeded.
    Loaded,
}

/// A non-fatal problem recorded during a load.
#[derive(Debug)]
pub struct LoadFailure {
    /// What failed: an object name, a field path such as `camA.port`, the
    /// document, or an environment variable name.
    pub subject: String,
    /// Why it failed.
    pub error: Error,
}

impl LoadFailure {
    /// Create a load failure.
    #[must_use]
    pub fn new(subject: impl Into<String>, error: Error) -> Self {
        Self {
            subject: subject.into(),
            error,
        }
    }
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.error)
    }
}

/// Replacement state produced by a load, installed in one step.
#[derive(Debug)]
pub(crate) struct Resolved {
    global: GlobalConfig,
    objects: Vec<ObjectConfig>,
    failures: Vec<LoadFailure>,
}

/// Owns the global configuration and the per-object entries.
///
/// Lookups by object name fall back to the global configuration when no
/// entry matches.
///
/// # Type Parameters
///
/// * `P` - The port probe used for allocation (defaults to `SystemPortProbe`)
///
/// # Examples
///
/// ```
/// use srtexp::config::{ConfigStore, StoreState};
/// use srtexp::port::MockPortProbe;
///
/// let mut store = ConfigStore::with_probe(MockPortProbe::empty());
/// assert_eq!(store.state(), StoreState::Unloaded);
///
/// store.load_str(r"
/// ip: 127.0.0.1
/// portMin: 9100
/// portMax: 9199
/// objects:
///   - name: camA
///     port: 9150
///   - name: camB
/// ");
///
/// assert_eq!(store.state(), StoreState::Loaded);
/// assert_eq!(store.server_port("camA").unwrap().value(), 9150);
/// assert_eq!(store.server_port("camB").unwrap().value(), 9100);
/// assert_eq!(store.server_ip("unknown"), store.global().ip);
/// ```
#[derive(Debug)]
pub struct ConfigStore<P: PortProbe = SystemPortProbe> {
    allocator: PortAllocator<P>,
    env_overrides: bool,
    state: StoreState,
    global: GlobalConfig,
    objects: Vec<ObjectConfig>,
    failures: Vec<LoadFailure>,
}

impl ConfigStore<SystemPortProbe> {
    /// Create an unloaded store that probes real sockets.
    #[must_use]
    pub fn new() -> Self {
        Self::with_probe(SystemPortProbe)
    }
}

impl Default for ConfigStore<SystemPortProbe> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PortProbe> ConfigStore<P> {
    /// Create an unloaded store around a port probe.
    #[must_use]
    pub fn with_probe(probe: P) -> Self {
        Self {
            allocator: PortAllocator::new(probe),
            env_overrides: false,
            state: StoreState::Unloaded,
            global: GlobalConfig::default(),
            objects: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Apply `SRTEXP_*` environment overrides to the global section on
    /// every load.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        self.env_overrides = true;
        self
    }

    /// Returns the store's state.
    #[must_use]
    pub fn state(&self) -> StoreState {
        self.state
    }

    /// Returns the global configuration.
    #[must_use]
    pub fn global(&self) -> &GlobalConfig {
        &self.global
    }

    /// Returns all object entries in insertion order.
    #[must_use]
    pub fn objects(&self) -> &[ObjectConfig] {
        &self.objects
    }

    /// Returns the failures recorded by the last load.
    #[must_use]
    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    /// Load a YAML configuration file, replacing the current state.
    pub fn load_file(&mut self, path: impl AsRef<Path>) {
        let resolved = self.resolve_source(ConfigLoader::load_file(path.as_ref()));
        self.install(resolved);
    }

    /// Load a YAML configuration document, replacing the current state.
    pub fn load_str(&mut self, contents: &str) {
        let resolved = self.resolve_source(ConfigLoader::parse_str(contents));
        self.install(resolved);
    }

    /// Load an already parsed document, replacing the current state.
    pub fn load_node<N: ConfigNode + ?Sized>(&mut self, document: &N) {
        let resolved = self.resolve(document);
        self.install(resolved);
    }

    /// Append an object entry.
    ///
    /// Without an explicit collector the entry gets a copy of the global
    /// collector. An empty variable list is filled from the collector's
    /// preset.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateName` if `name` is already configured, or
    /// `Error::ConfigMalformed` if it is blank. The store is unchanged in
    /// both cases.
    pub fn add_config(
        &mut self,
        name: impl Into<String>,
        ip: IpAddr,
        port: Port,
        collector: Option<CollectorConfig>,
    ) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::ConfigMalformed {
                reason: "object name must not be empty".into(),
            });
        }
        if self.find_object_config(&name).is_some() {
            return Err(Error::DuplicateName { name });
        }

        let mut collector = collector.unwrap_or_else(|| self.global.collector.clone());
        if collector.variables.is_empty() {
            collector.variables = resolve_variables(None, collector.preset);
        }

        log::debug!("added object '{name}' on {ip}:{port}");
        self.objects.push(ObjectConfig::new(name, ip, port, collector));
        Ok(())
    }

    /// Find the entry for `name`, if one exists.
    #[must_use]
    pub fn find_object_config(&self, name: &str) -> Option<&ObjectConfig> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Get the entry for `name`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no entry matches.
    pub fn object_config(&self, name: &str) -> Result<&ObjectConfig> {
        self.find_object_config(name).ok_or_else(|| Error::NotFound {
            name: name.to_string(),
        })
    }

    /// Listening address for `name`, or the global address.
    #[must_use]
    pub fn server_ip(&self, name: &str) -> IpAddr {
        self.find_object_config(name)
            .map_or(self.global.ip, |object| object.ip)
    }

    /// Listening port for `name`.
    ///
    /// Unknown names get the first free port of the global range on the
    /// global address, skipping ports already assigned to objects.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoPortAvailable` if an unknown name finds the global
    /// range exhausted.
    pub fn server_port(&self, name: &str) -> Result<Port> {
        if let Some(object) = self.find_object_config(name) {
            return Ok(object.port);
        }
        allocate(
            &self.allocator,
            self.global.ip,
            self.global.ports,
            &self.objects,
        )
    }

    /// Collector mode for `name`, or the global mode.
    #[must_use]
    pub fn collector_mode(&self, name: &str) -> CollectorMode {
        self.collector_config(name).mode
    }

    /// Collector configuration for `name`, or the global one.
    #[must_use]
    pub fn collector_config(&self, name: &str) -> &CollectorConfig {
        self.find_object_config(name)
            .map_or(&self.global.collector, |object| &object.collector)
    }

    /// Human-readable rendering of the global section and every object.
    #[must_use]
    pub fn dump_config(&self) -> String {
        self.to_string()
    }

    pub(crate) fn resolve_source(&self, source: Result<Value>) -> Resolved {
        match source {
            Ok(document) => self.resolve(&document),
            Err(error) => {
                log::warn!("{error}; using default configuration");
                let mut resolved = self.resolve(&Value::Null);
                resolved
                    .failures
                    .insert(0, LoadFailure::new("document", error));
                resolved
            }
        }
    }

    pub(crate) fn resolve<N: ConfigNode + ?Sized>(&self, document: &N) -> Resolved {
        let mut failures = Vec::new();
        let mut global = resolve_global(document, &mut failures);
        if self.env_overrides {
            failures.extend(EnvironmentConfig::apply_overrides(&mut global));
        }

        let mut objects: Vec<ObjectConfig> = Vec::new();
        if let Some(entries) = document.child("objects") {
            match entries.items() {
                Some(entries) => {
                    for (index, entry) in entries.into_iter().enumerate() {
                        let resolved =
                            self.resolve_object(index, entry, &global, &objects, &mut failures);
                        match resolved {
                            Ok(object) => objects.push(object),
                            Err(failure) => {
                                log::warn!("skipping object: {failure}");
                                failures.push(failure);
                            }
                        }
                    }
                }
                None => failures.push(LoadFailure::new(
                    "objects",
                    Error::ConfigMalformed {
                        reason: "'objects' must be a list".into(),
                    },
                )),
            }
        }

        Resolved {
            global,
            objects,
            failures,
        }
    }

    pub(crate) fn install(&mut self, resolved: Resolved) {
        log::info!(
            "loaded configuration: {} object(s), {} failure(s)",
            resolved.objects.len(),
            resolved.failures.len()
        );
        self.global = resolved.global;
        self.objects = resolved.objects;
        self.failures = resolved.failures;
        self.state = StoreState::Loaded;
    }

    fn resolve_object<N: ConfigNode + ?Sized>(
        &self,
        index: usize,
        entry: &N,
        global: &GlobalConfig,
        taken: &[ObjectConfig],
        failures: &mut Vec<LoadFailure>,
    ) -> std::result::Result<ObjectConfig, LoadFailure> {
        let Some(name) = entry
            .scalar("name")
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
        else {
            return Err(LoadFailure::new(
                format!("objects[{index}]"),
                Error::ConfigMalformed {
                    reason: "object entry has no name".into(),
                },
            ));
        };
        if taken.iter().any(|o| o.name == name) {
            return Err(LoadFailure::new(name.clone(), Error::DuplicateName { name }));
        }

        let ip = parse_field(entry, "ip", &name, parse_ip, failures).unwrap_or(global.ip);

        let collector = build_collector(
            &CollectorConfigBuilder::with_base(global.collector.clone()),
            entry,
            &format!("{name}.collector"),
            failures,
        );

        let port = match parse_field(entry, "port", &name, parse_port, failures) {
            Some(port) => {
                if let Some(other) = taken.iter().find(|o| o.port == port) {
                    log::warn!("object '{name}' shares port {port} with '{}'", other.name);
                }
                port
            }
            None => allocate(&self.allocator, ip, global.ports, taken)
                .map_err(|e| LoadFailure::new(name.clone(), e))?,
        };

        log::debug!("resolved object '{name}' on {ip}:{port}");
        Ok(ObjectConfig::new(name, ip, port, collector))
    }
}

fn resolve_global<N: ConfigNode + ?Sized>(
    document: &N,
    failures: &mut Vec<LoadFailure>,
) -> GlobalConfig {
    let defaults = GlobalConfig::default();

    let ip = parse_field(document, "ip", "", parse_ip, failures).unwrap_or(defaults.ip);

    let min = parse_field(document, "portMin", "", parse_port, failures)
        .unwrap_or(defaults.ports.min());
    let max = parse_field(document, "portMax", "", parse_port, failures)
        .unwrap_or(defaults.ports.max());
    let ports = PortRange::new(min, max).unwrap_or_else(|e| {
        log::warn!("{e}, using {}", defaults.ports);
        failures.push(LoadFailure::new("portMin/portMax", e.into()));
        defaults.ports
    });

    let collector = build_collector(
        &CollectorConfigBuilder::new(),
        document,
        "collector",
        failures,
    );

    GlobalConfig {
        ip,
        ports,
        collector,
    }
}

// Ports already given to objects are skipped without probing.
fn allocate<P: PortProbe>(
    allocator: &PortAllocator<P>,
    ip: IpAddr,
    range: PortRange,
    taken: &[ObjectConfig],
) -> Result<Port> {
    let claimed: Vec<Port> = taken.iter().map(|o| o.port).collect();
    allocator.allocate_excluding(ip, range, &claimed)
}

// A present but invalid field is recorded under `owner.key` and yields `None`.
fn parse_field<N: ConfigNode + ?Sized, T>(
    node: &N,
    key: &str,
    owner: &str,
    parse: fn(&str) -> Result<T>,
    failures: &mut Vec<LoadFailure>,
) -> Option<T> {
    let child = node.child(key)?;
    let parsed = child.as_scalar().map_or_else(
        || {
            Err(Error::ConfigMalformed {
                reason: format!("'{key}' must be a single value"),
            })
        },
        |value| parse(&value),
    );
    match parsed {
        Ok(parsed) => Some(parsed),
        Err(error) => {
            let subject = if owner.is_empty() {
                key.to_string()
            } else {
                format!("{owner}.{key}")
            };
            log::warn!("ignoring '{subject}': {error}");
            failures.push(LoadFailure::new(subject, error));
            None
        }
    }
}

fn build_collector<N: ConfigNode + ?Sized>(
    builder: &CollectorConfigBuilder,
    node: &N,
    subject: &str,
    failures: &mut Vec<LoadFailure>,
) -> CollectorConfig {
    let mut problems = Vec::new();
    let collector = builder.build_reporting(node.child("collector"), &mut problems);
    failures.extend(problems.into_iter().map(|e| LoadFailure::new(subject, e)));
    collector
}

fn parse_ip(value: &str) -> Result<IpAddr> {
    value.trim().parse().map_err(|e| Error::ConfigMalformed {
        reason: format!("invalid address '{value}': {e}"),
    })
}

fn parse_port(value: &str) -> Result<Port> {
    let number = value
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::ConfigMalformed {
            reason: format!("'{value}' is not a port number"),
        })?;
    Ok(Port::from_config_value(number)?)
}

impl<P: PortProbe> fmt::Display for ConfigStore<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "global:")?;
        writeln!(f, "  ip: {}", self.global.ip)?;
        writeln!(f, "  ports: {}", self.global.ports)?;
        write_collector(f, &self.global.collector, 1)?;

        writeln!(f, "objects ({}):", self.objects.len())?;
        for object in &self.objects {
            writeln!(f, "  {}:", object.name)?;
            writeln!(f, "    ip: {}", object.ip)?;
            writeln!(f, "    port: {}", object.port)?;
            write_collector(f, &object.collector, 2)?;
        }
        Ok(())
    }
}

// `depth` is the nesting level of the `collector:` line, two spaces each.
fn write_collector(
    f: &mut fmt::Formatter<'_>,
    config: &CollectorConfig,
    depth: usize,
) -> fmt::Result {
    let outer = "  ".repeat(depth);
    let inner = "  ".repeat(depth + 1);
    writeln!(f, "{outer}collector:")?;
    writeln!(f, "{inner}mode: {}", config.mode)?;
    match config.preset {
        Some(preset) => writeln!(f, "{inner}filter: {} (preset {preset})", config.filter_mode)?,
        None => writeln!(f, "{inner}filter: {}", config.filter_mode)?,
    }
    writeln!(
        f,
        "{inner}variables ({}): {}",
        config.variables.len(),
        config.variables.join(", ")
    )?;
    if config.labels.is_empty() {
        writeln!(f, "{inner}labels: none")
    } else {
        let labels: Vec<String> = config
            .labels
            .iter()
            .map(|l| format!("{}={}", l.name, l.value))
            .collect();
        writeln!(f, "{inner}labels: {}", labels.join(", "))
    }
}
