//! Collector configuration: what an exporter object publishes and when.
//!
//! Every field has a defined fallback, and a malformed collector section
//! never fails a load. The builder degrades field by field:
//!
//! | field        | missing                | unrecognized           |
//! |--------------|------------------------|------------------------|
//! | `mode`       | default mode           | default mode           |
//! | `filterMode` | default filter         | default filter         |
//! | `variables`  | preset of `filterMode` | preset of `filterMode` |
//! | `labels`     | default labels         | entry skipped          |
//!
//! "Default" is the builder's base config: compiled-in defaults for the
//! global section, the global collector for object sections. Anything
//! unrecognized or skipped is reported by
//! [`CollectorConfigBuilder::build_reporting`].

use std::fmt;

use serde::Serialize;

use super::node::{normalize_symbol, ConfigNode};
use super::variables::{resolve_variables, Preset, SRT_ALL_VARIABLES};
use crate::error::{Error, Result};

/// When statistics are gathered for an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectorMode {
    /// Collect when the exporter is scraped.
    #[default]
    CollectOnRequest,
    /// Collect on a timer.
    CollectPeriodically,
    /// Accept statistics pushed by the connection.
    ReceivePassively,
}

impl CollectorMode {
    /// Parses a mode name or its numeric code (1-3).
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownEnumValue` for anything else.
    ///
    /// # Examples
    ///
    /// ```
    /// use srtexp::config::CollectorMode;
    ///
    /// assert_eq!(CollectorMode::parse("COLLECT_PERIODICALLY").unwrap(), CollectorMode::CollectPeriodically);
    /// assert_eq!(CollectorMode::parse("3").unwrap(), CollectorMode::ReceivePassively);
    /// assert!(CollectorMode::parse("sometimes").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self> {
        match normalize_symbol(value).as_str() {
            "collectonrequest" | "onrequest" | "request" | "1" => Ok(Self::CollectOnRequest),
            "collectperiodically" | "periodically" | "periodic" | "2" => {
                Ok(Self::CollectPeriodically)
            }
            "receivepassively" | "passively" | "passive" | "3" => Ok(Self::ReceivePassively),
            _ => Err(Error::UnknownEnumValue {
                field: "mode".into(),
                value: value.into(),
            }),
        }
    }
}

impl fmt::Display for CollectorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CollectOnRequest => write!(f, "collect_on_request"),
            Self::CollectPeriodically => write!(f, "collect_periodically"),
            Self::ReceivePassively => write!(f, "receive_passively"),
        }
    }
}

/// How the variable list is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Only listed variables are exposed.
    #[default]
    Whitelist,
    /// Every variable except the listed ones is exposed.
    Blacklist,
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whitelist => write!(f, "whitelist"),
            Self::Blacklist => write!(f, "blacklist"),
        }
    }
}

/// A `filterMode` value as written in a document: either an explicit mode
/// or the name of a preset.
///
/// # Examples
///
/// ```
/// use srtexp::config::{FilterMode, FilterSelection, Preset};
///
/// let selection = FilterSelection::parse("SRT_SOURCE").unwrap();
/// assert_eq!(selection.resolve(), (FilterMode::Whitelist, Some(Preset::Source)));
///
/// let selection = FilterSelection::parse("blacklist").unwrap();
/// assert_eq!(selection.resolve(), (FilterMode::Blacklist, None));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterSelection {
    /// An explicit filter mode.
    Mode(FilterMode),
    /// A preset; presets always filter as a whitelist.
    Preset(Preset),
}

impl FilterSelection {
    /// Parses a filter mode name, a preset name, or a numeric mode (1-2).
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownEnumValue` for anything else.
    pub fn parse(value: &str) -> Result<Self> {
        match normalize_symbol(value).as_str() {
            "whitelist" | "allowlist" | "1" => Ok(Self::Mode(FilterMode::Whitelist)),
            "blacklist" | "denylist" | "2" => Ok(Self::Mode(FilterMode::Blacklist)),
            _ => Preset::parse(value)
                .map(Self::Preset)
                .ok_or_else(|| Error::UnknownEnumValue {
                    field: "filterMode".into(),
                    value: value.into(),
                }),
        }
    }

    /// Returns the filter mode and the preset, if any, this selection stands
    /// for.
    #[must_use]
    pub const fn resolve(self) -> (FilterMode, Option<Preset>) {
        match self {
            Self::Mode(mode) => (mode, None),
            Self::Preset(preset) => (FilterMode::Whitelist, Some(preset)),
        }
    }
}

/// A name/value tag attached to an object's metrics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Label {
    /// Label name.
    pub name: String,
    /// Label value.
    pub value: String,
}

impl Label {
    /// Create a label.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Resolved collector settings for one exporter object.
///
/// `variables` is never empty for configs produced by this crate.
///
/// # Examples
///
/// ```
/// use srtexp::config::{CollectorConfig, CollectorMode, FilterMode, Preset};
///
/// let config = CollectorConfig::default();
/// assert_eq!(config.mode, CollectorMode::CollectOnRequest);
/// assert_eq!(config.filter_mode, FilterMode::Whitelist);
/// assert_eq!(config.preset, Some(Preset::Common));
/// assert!(config.exposes("msRTT"));
/// assert!(!config.exposes("msTimeStamp"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectorConfig {
    /// When statistics are gathered.
    pub mode: CollectorMode,
    /// How `variables` is applied.
    pub filter_mode: FilterMode,
    /// The preset the filter was selected by, if any.
    pub preset: Option<Preset>,
    /// Statistic variable names, in export order.
    pub variables: Vec<String>,
    /// Labels attached to every exported metric.
    pub labels: Vec<Label>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self::from_selection(
            CollectorMode::default(),
            FilterSelection::Preset(Preset::Common),
            None,
            Vec::new(),
        )
    }
}

impl CollectorConfig {
    /// Build a config from a filter selection, resolving the variable list
    /// from the selection's preset when `variables` is absent or empty.
    #[must_use]
    pub fn from_selection(
        mode: CollectorMode,
        selection: FilterSelection,
        variables: Option<Vec<String>>,
        labels: Vec<Label>,
    ) -> Self {
        let (filter_mode, preset) = selection.resolve();
        Self {
            mode,
            filter_mode,
            preset,
            variables: resolve_variables(variables, preset),
            labels,
        }
    }

    /// Returns `true` if the filter lets `variable` through.
    #[must_use]
    pub fn exposes(&self, variable: &str) -> bool {
        let listed = self.variables.iter().any(|v| v == variable);
        match self.filter_mode {
            FilterMode::Whitelist => listed,
            FilterMode::Blacklist => !listed,
        }
    }

    /// Returns the statistic names that apply, in export order.
    ///
    /// A whitelist yields its own list. A blacklist yields every SRT
    /// statistic that is not listed.
    #[must_use]
    pub fn exposed_variables(&self) -> Vec<&str> {
        match self.filter_mode {
            FilterMode::Whitelist => self.variables.iter().map(String::as_str).collect(),
            FilterMode::Blacklist => SRT_ALL_VARIABLES
                .iter()
                .copied()
                .filter(|v| self.exposes(v))
                .collect(),
        }
    }
}

/// Builds [`CollectorConfig`]s from document nodes over a base config.
///
/// # Examples
///
/// ```
/// use srtexp::config::{CollectorConfigBuilder, CollectorMode, Preset};
///
/// let node: serde_yaml::Value = serde_yaml::from_str(
///     "mode: collect_periodically\nfilterMode: SRT_DESTINATION\n",
/// ).unwrap();
///
/// let config = CollectorConfigBuilder::new().build(Some(&node));
/// assert_eq!(config.mode, CollectorMode::CollectPeriodically);
/// assert_eq!(config.variables, Preset::Destination.to_vec());
///
/// let fallback = CollectorConfigBuilder::new().build::<serde_yaml::Value>(None);
/// assert_eq!(fallback.mode, CollectorMode::CollectOnRequest);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CollectorConfigBuilder {
    base: CollectorConfig,
}

impl CollectorConfigBuilder {
    /// Create a builder over the compiled-in default collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder whose missing or invalid fields fall back to `base`.
    #[must_use]
    pub fn with_base(base: CollectorConfig) -> Self {
        Self { base }
    }

    /// Build a collector config from an optional node. Never fails.
    #[must_use]
    pub fn build<N: ConfigNode + ?Sized>(&self, node: Option<&N>) -> CollectorConfig {
        self.build_reporting(node, &mut Vec::new())
    }

    /// Like [`build`](Self::build), but pushes an error onto `problems` for
    /// every value that was skipped or replaced by the base.
    pub fn build_reporting<N: ConfigNode + ?Sized>(
        &self,
        node: Option<&N>,
        problems: &mut Vec<Error>,
    ) -> CollectorConfig {
        let Some(node) = node else {
            return self.base.clone();
        };

        let mode = match node.scalar("mode").map(|value| CollectorMode::parse(&value)) {
            Some(Ok(mode)) => mode,
            Some(Err(e)) => {
                log::warn!("{e}, using '{}'", self.base.mode);
                problems.push(e);
                self.base.mode
            }
            None => self.base.mode,
        };

        let selection = match node
            .scalar("filterMode")
            .map(|value| FilterSelection::parse(&value))
        {
            Some(Ok(selection)) => Some(selection),
            Some(Err(e)) => {
                log::warn!("{e}, using '{}'", self.base.filter_mode);
                problems.push(e);
                None
            }
            None => None,
        };

        let variables = Self::variables(node, problems);
        let (filter_mode, preset, variables) = match (selection, variables) {
            (Some(selection), variables) => {
                let (filter_mode, preset) = selection.resolve();
                (filter_mode, preset, resolve_variables(variables, preset))
            }
            (None, Some(variables)) => (self.base.filter_mode, self.base.preset, variables),
            (None, None) => (
                self.base.filter_mode,
                self.base.preset,
                self.base.variables.clone(),
            ),
        };

        let labels = if node.contains_key("labels") {
            Self::labels(node, problems).unwrap_or_else(|| self.base.labels.clone())
        } else {
            self.base.labels.clone()
        };

        CollectorConfig {
            mode,
            filter_mode,
            preset,
            variables,
            labels,
        }
    }

    // `None` unless the node has a non-empty `variables` sequence.
    fn variables<N: ConfigNode + ?Sized>(
        node: &N,
        problems: &mut Vec<Error>,
    ) -> Option<Vec<String>> {
        if !node.contains_key("variables") {
            return None;
        }
        let Some(items) = node.sequence("variables") else {
            log::warn!("'variables' is not a list, ignoring it");
            problems.push(Error::ConfigMalformed {
                reason: "'variables' must be a list".into(),
            });
            return None;
        };

        let variables: Vec<String> = items
            .into_iter()
            .filter_map(|item| item.as_scalar())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        (!variables.is_empty()).then_some(variables)
    }

    // Labels without a name are dropped; a missing value is empty.
    fn labels<N: ConfigNode + ?Sized>(node: &N, problems: &mut Vec<Error>) -> Option<Vec<Label>> {
        let Some(items) = node.sequence("labels") else {
            log::warn!("'labels' is not a list, ignoring it");
            problems.push(Error::ConfigMalformed {
                reason: "'labels' must be a list".into(),
            });
            return None;
        };

        let labels = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match item.scalar("name") {
                Some(name) if !name.trim().is_empty() => {
                    Some(Label::new(name, item.scalar("value").unwrap_or_default()))
                }
                _ => {
                    log::warn!("label #{index} has no name, skipping it");
                    problems.push(Error::ConfigMalformed {
                        reason: format!("label #{index} has no name"),
                    });
                    None
                }
            })
            .collect();
        Some(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::variables::{SRT_COMMON_VARIABLES, SRT_SOURCE_VARIABLES};
    use serde_yaml::Value;

    fn node(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_collector_mode_parse() {
        assert_eq!(
            CollectorMode::parse("collectOnRequest").unwrap(),
            CollectorMode::CollectOnRequest
        );
        assert_eq!(
            CollectorMode::parse("COLLECT_PERIODICALLY").unwrap(),
            CollectorMode::CollectPeriodically
        );
        assert_eq!(
            CollectorMode::parse("receive-passively").unwrap(),
            CollectorMode::ReceivePassively
        );
        assert_eq!(
            CollectorMode::parse("1").unwrap(),
            CollectorMode::CollectOnRequest
        );
        assert!(matches!(
            CollectorMode::parse("4"),
            Err(Error::UnknownEnumValue { .. })
        ));
    }

    #[test]
    fn test_filter_selection_parse() {
        assert_eq!(
            FilterSelection::parse("WHITELIST").unwrap(),
            FilterSelection::Mode(FilterMode::Whitelist)
        );
        assert_eq!(
            FilterSelection::parse("2").unwrap(),
            FilterSelection::Mode(FilterMode::Blacklist)
        );
        assert_eq!(
            FilterSelection::parse("srt_common").unwrap(),
            FilterSelection::Preset(Preset::Common)
        );
        assert!(FilterSelection::parse("greylist").is_err());
    }

    #[test]
    fn test_presets_resolve_to_whitelist_but_stay_distinct() {
        let source = FilterSelection::Preset(Preset::Source);
        let destination = FilterSelection::Preset(Preset::Destination);

        assert_eq!(source.resolve().0, FilterMode::Whitelist);
        assert_eq!(destination.resolve().0, FilterMode::Whitelist);
        assert_ne!(source, destination);
        assert_ne!(source, FilterSelection::Mode(FilterMode::Whitelist));
    }

    #[test]
    fn test_default_config() {
        let config = CollectorConfig::default();
        assert_eq!(config.mode, CollectorMode::CollectOnRequest);
        assert_eq!(config.filter_mode, FilterMode::Whitelist);
        assert_eq!(config.variables, SRT_COMMON_VARIABLES);
        assert!(config.labels.is_empty());
    }

    #[test]
    fn test_build_absent_node() {
        let config = CollectorConfigBuilder::new().build::<Value>(None);
        assert_eq!(config, CollectorConfig::default());
        assert!(!config.variables.is_empty());
    }

    #[test]
    fn test_build_empty_mapping() {
        let config = CollectorConfigBuilder::new().build(Some(&node("{}")));
        assert_eq!(config, CollectorConfig::default());
    }

    #[test]
    fn test_build_full_section() {
        let config = CollectorConfigBuilder::new().build(Some(&node(
            r"
mode: receive_passively
filterMode: blacklist
variables: [msTimeStamp, msRTT]
labels:
  - name: site
    value: tokyo
  - name: role
    value: ingest
",
        )));

        assert_eq!(config.mode, CollectorMode::ReceivePassively);
        assert_eq!(config.filter_mode, FilterMode::Blacklist);
        assert_eq!(config.preset, None);
        assert_eq!(config.variables, vec!["msTimeStamp", "msRTT"]);
        assert_eq!(
            config.labels,
            vec![Label::new("site", "tokyo"), Label::new("role", "ingest")]
        );
    }

    #[test]
    fn test_build_preset_without_variables() {
        let config = CollectorConfigBuilder::new().build(Some(&node("filterMode: SRT_SOURCE\n")));
        assert_eq!(config.filter_mode, FilterMode::Whitelist);
        assert_eq!(config.preset, Some(Preset::Source));
        assert_eq!(config.variables, SRT_SOURCE_VARIABLES);
    }

    #[test]
    fn test_build_explicit_variables_override_preset() {
        let config = CollectorConfigBuilder::new().build(Some(&node(
            "filterMode: SRT_SOURCE\nvariables: [msRTT, msRTT]\n",
        )));
        assert_eq!(config.preset, Some(Preset::Source));
        assert_eq!(config.variables, vec!["msRTT", "msRTT"]);
    }

    #[test]
    fn test_build_unknown_values_fall_back_per_field() {
        let config = CollectorConfigBuilder::new().build(Some(&node(
            "mode: sometimes\nfilterMode: greylist\nvariables: [msRTT]\n",
        )));
        assert_eq!(config.mode, CollectorMode::CollectOnRequest);
        assert_eq!(config.filter_mode, FilterMode::Whitelist);
        assert_eq!(config.variables, vec!["msRTT"]);
    }

    #[test]
    fn test_build_malformed_variables_fall_back_to_preset() {
        let config = CollectorConfigBuilder::new().build(Some(&node(
            "filterMode: destination\nvariables: msRTT\n",
        )));
        assert_eq!(config.variables, Preset::Destination.to_vec());

        let config = CollectorConfigBuilder::new().build(Some(&node("variables: ['', '  ']\n")));
        assert_eq!(config.variables, SRT_COMMON_VARIABLES);
    }

    #[test]
    fn test_build_labels_skip_unnamed() {
        let config = CollectorConfigBuilder::new().build(Some(&node(
            r"
labels:
  - value: orphan
  - name: ''
    value: blank
  - name: site
  - name: dc
    value: 7
",
        )));
        assert_eq!(
            config.labels,
            vec![Label::new("site", ""), Label::new("dc", "7")]
        );
    }

    #[test]
    fn test_build_reporting_lists_replaced_values() {
        let mut problems = Vec::new();
        let config = CollectorConfigBuilder::new().build_reporting(
            Some(&node(
                "mode: whenever\nfilterMode: greylist\nlabels:\n  - value: orphan\n",
            )),
            &mut problems,
        );

        assert_eq!(config.mode, CollectorMode::CollectOnRequest);
        assert_eq!(problems.len(), 3);
        assert!(matches!(
            &problems[0],
            Error::UnknownEnumValue { field, value } if field == "mode" && value == "whenever"
        ));
        assert!(matches!(
            &problems[1],
            Error::UnknownEnumValue { field, .. } if field == "filterMode"
        ));
        assert!(matches!(problems[2], Error::ConfigMalformed { .. }));
    }

    #[test]
    fn test_build_reporting_clean_section() {
        let mut problems = Vec::new();
        CollectorConfigBuilder::new().build_reporting(
            Some(&node(
                "mode: periodic\nfilterMode: SRT_SOURCE\nlabels:\n  - name: site\n",
            )),
            &mut problems,
        );
        assert!(problems.is_empty(), "{problems:?}");

        CollectorConfigBuilder::new().build_reporting::<Value>(None, &mut problems);
        assert!(problems.is_empty());
    }

    #[test]
    fn test_build_inherits_from_base() {
        let base = CollectorConfig::from_selection(
            CollectorMode::CollectPeriodically,
            FilterSelection::Preset(Preset::Source),
            None,
            vec![Label::new("site", "tokyo")],
        );
        let builder = CollectorConfigBuilder::with_base(base.clone());

        assert_eq!(builder.build::<Value>(None), base);

        let config = builder.build(Some(&node("mode: passive\n")));
        assert_eq!(config.mode, CollectorMode::ReceivePassively);
        assert_eq!(config.preset, Some(Preset::Source));
        assert_eq!(config.variables, SRT_SOURCE_VARIABLES);
        assert_eq!(config.labels, base.labels);

        let config = builder.build(Some(&node("labels: []\nmode: bogus\n")));
        assert_eq!(config.mode, CollectorMode::CollectPeriodically);
        assert!(config.labels.is_empty());
    }

    #[test]
    fn test_exposed_variables_blacklist() {
        let config = CollectorConfig::from_selection(
            CollectorMode::default(),
            FilterSelection::Mode(FilterMode::Blacklist),
            Some(vec!["msTimeStamp".to_string()]),
            Vec::new(),
        );
        let exposed = config.exposed_variables();
        assert_eq!(exposed.len(), SRT_ALL_VARIABLES.len() - 1);
        assert!(!exposed.contains(&"msTimeStamp"));
        assert!(config.exposes("msRTT"));
    }

    #[test]
    fn test_exposed_variables_whitelist_keeps_order() {
        let config =
            CollectorConfigBuilder::new().build(Some(&node("variables: [msRTT, pktSent]\n")));
        assert_eq!(config.exposed_variables(), vec!["msRTT", "pktSent"]);
        assert!(!config.exposes("byteSent"));
    }
}
