//! Preset statistic lists and variable list resolution.
//!
//! The names are the fields of SRT's `CBytePerfMon` statistics block as the
//! exporter publishes them. Lists are ordered and may share entries; they
//! are exporter field lists, not sets.

use std::fmt;

use serde::Serialize;

use super::node::normalize_symbol;

/// Statistics relevant on the sending side of a connection.
pub const SRT_SOURCE_VARIABLES: &[&str] = &[
    "pktSentTotal", "pktSndLossTotal", "pktSent", "pktSndLoss", "pktRetrans", "pktRecvACK",
    "pktRecvNAK", "byteSent", "byteRetrans", "byteSndDrop", "pktSndDrop", "mbpsSendRate",
    "usSndDuration", "msSndTsbPdDelay", "mbpsBandwidth", "msRTT",
];

/// Statistics relevant on the receiving side of a connection.
pub const SRT_DESTINATION_VARIABLES: &[&str] = &[
    "pktRecvTotal", "pktRcvLossTotal", "pktRecv", "pktRcvLoss", "pktRcvRetrans", "pktSentACK",
    "pktSentNAK", "byteRecv", "byteRcvDrop", "pktRcvDrop", "mbpsRecvRate", "usSndDuration",
    "msSndTsbPdDelay", "mbpsBandwidth", "msRTT",
];

/// Statistics for connections that both send and receive.
pub const SRT_COMMON_VARIABLES: &[&str] = &[
    "pktSentTotal", "pktSndLossTotal", "pktSent", "pktSndLoss", "pktRetrans", "pktRecvACK",
    "pktRecvNAK", "byteSent", "byteRetrans", "byteSndDrop", "pktSndDrop", "mbpsSendRate",
    "pktRecvTotal", "pktRcvLossTotal", "pktRecv", "pktRcvLoss", "pktRcvRetrans", "pktSentACK",
    "pktSentNAK", "byteRecv", "byteRcvDrop", "pktRcvDrop", "mbpsRecvRate", "usSndDuration",
    "msSndTsbPdDelay", "mbpsBandwidth", "msRTT",
];

/// Every statistic SRT reports.
pub const SRT_ALL_VARIABLES: &[&str] = &[
    "msTimeStamp", "pktSentTotal", "pktRecvTotal", "pktSndLossTotal", "pktRcvLossTotal",
    "pktRetransTotal", "pktSentACKTotal", "pktRecvACKTotal", "pktSentNAKTotal", "pktRecvNAKTotal",
    "usSndDurationTotal", "pktSndDropTotal", "pktRcvDropTotal", "pktRcvUndecryptTotal",
    "byteSentTotal", "byteRecvTotal", "byteRcvLossTotal", "byteRetransTotal", "byteSndDropTotal",
    "byteRcvDropTotal", "byteRcvUndecryptTotal", "pktSent", "pktRecv", "pktSndLoss", "pktRcvLoss",
    "pktRetrans", "pktRcvRetrans", "pktSentACK", "pktRecvACK", "pktSentNAK", "pktRecvNAK",
    "mbpsSendRate", "mbpsRecvRate", "usSndDuration", "pktReorderDistance", "pktRcvAvgBelatedTime",
    "pktRcvBelated", "pktSndDrop", "pktRcvDrop", "pktRcvUndecrypt", "byteSent", "byteRecv",
    "byteRcvLoss", "byteRetrans", "byteSndDrop", "byteRcvDrop", "byteRcvUndecrypt",
    "usPktSndPeriod", "pktFlowWindow", "pktCongestionWindow", "pktFlightSize", "msRTT",
    "mbpsBandwidth", "byteAvailSndBuf", "byteAvailRcvBuf", "mbpsMaxBW", "byteMSS", "byteSndBuf",
    "msSndBuf", "msSndTsbPdDelay", "pktRcvBuf", "byteRcvBuf", "msRcvBuf", "msRcvTsbPdDelay",
    "pktSndFilterExtraTotal", "pktRcvFilterExtraTotal", "pktRcvFilterSupplyTotal",
    "pktRcvFilterLossTotal", "pktSndFilterExtra", "pktRcvFilterExtra", "pktRcvFilterSupply",
    "pktRcvFilterLoss",
];

/// A named, fixed list of statistic variables.
///
/// # Examples
///
/// ```
/// use srtexp::config::Preset;
///
/// assert_eq!(Preset::parse("SRT_SOURCE"), Some(Preset::Source));
/// assert_eq!(Preset::Source.variables()[0], "pktSentTotal");
/// assert_eq!(Preset::parse("sideways"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Sender-side statistics.
    Source,
    /// Receiver-side statistics.
    Destination,
    /// Sender and receiver statistics.
    Common,
    /// Every statistic.
    All,
}

impl Preset {
    /// Returns the preset's variables in their defined order.
    #[must_use]
    pub const fn variables(self) -> &'static [&'static str] {
        match self {
            Self::Source => SRT_SOURCE_VARIABLES,
            Self::Destination => SRT_DESTINATION_VARIABLES,
            Self::Common => SRT_COMMON_VARIABLES,
            Self::All => SRT_ALL_VARIABLES,
        }
    }

    /// Returns an owned copy of the preset's variables.
    #[must_use]
    pub fn to_vec(self) -> Vec<String> {
        self.variables().iter().map(ToString::to_string).collect()
    }

    /// Parses a preset name, with or without the `SRT_` prefix.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let normalized = normalize_symbol(name);
        match normalized.strip_prefix("srt").unwrap_or(&normalized) {
            "source" => Some(Self::Source),
            "destination" => Some(Self::Destination),
            "common" => Some(Self::Common),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Destination => write!(f, "destination"),
            Self::Common => write!(f, "common"),
            Self::All => write!(f, "all"),
        }
    }
}

/// Resolves the variable list for a collector.
///
/// A non-empty explicit list wins and is kept verbatim, duplicates included.
/// Otherwise the preset's list is used; no preset means [`Preset::Common`].
/// The result is never empty.
///
/// # Examples
///
/// ```
/// use srtexp::config::{resolve_variables, Preset};
///
/// let explicit = vec!["msRTT".to_string(), "msRTT".to_string()];
/// assert_eq!(resolve_variables(Some(explicit.clone()), Some(Preset::Source)), explicit);
///
/// assert_eq!(resolve_variables(None, Some(Preset::Destination)), Preset::Destination.to_vec());
/// assert_eq!(resolve_variables(Some(vec![]), None), Preset::Common.to_vec());
/// ```
#[must_use]
pub fn resolve_variables(explicit: Option<Vec<String>>, preset: Option<Preset>) -> Vec<String> {
    match explicit {
        Some(list) if !list.is_empty() => list,
        _ => preset.unwrap_or(Preset::Common).to_vec(),
    }
}

/// Resolves a preset by name, falling back to [`Preset::Common`] for names
/// it does not know.
#[must_use]
pub fn resolve_preset_name(name: &str) -> Vec<String> {
    let preset = Preset::parse(name).unwrap_or_else(|| {
        log::warn!("unknown variable preset '{name}', using '{}'", Preset::Common);
        Preset::Common
    });
    preset.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_preset_sizes() {
        assert_eq!(SRT_SOURCE_VARIABLES.len(), 16);
        assert_eq!(SRT_DESTINATION_VARIABLES.len(), 15);
        assert_eq!(SRT_COMMON_VARIABLES.len(), 27);
        assert_eq!(SRT_ALL_VARIABLES.len(), 72);
    }

    #[test]
    fn test_presets_are_subsets_of_all() {
        let all: HashSet<&str> = SRT_ALL_VARIABLES.iter().copied().collect();
        for preset in [Preset::Source, Preset::Destination, Preset::Common] {
            for var in preset.variables() {
                assert!(all.contains(var), "{var} from {preset} missing in all");
            }
        }
    }

    #[test]
    fn test_common_covers_source_and_destination() {
        let common: HashSet<&str> = SRT_COMMON_VARIABLES.iter().copied().collect();
        assert!(SRT_SOURCE_VARIABLES.iter().all(|v| common.contains(v)));
        assert!(SRT_DESTINATION_VARIABLES.iter().all(|v| common.contains(v)));
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!(Preset::parse("source"), Some(Preset::Source));
        assert_eq!(Preset::parse("SRT_DESTINATION"), Some(Preset::Destination));
        assert_eq!(Preset::parse("srt-common"), Some(Preset::Common));
        assert_eq!(Preset::parse("All"), Some(Preset::All));
        assert_eq!(Preset::parse("whitelist"), None);
        assert_eq!(Preset::parse(""), None);
    }

    #[test]
    fn test_resolve_source_preset_order() {
        let resolved = resolve_variables(None, Some(Preset::Source));
        assert_eq!(resolved, SRT_SOURCE_VARIABLES);
    }

    #[test]
    fn test_resolve_explicit_keeps_duplicates_and_order() {
        let explicit = vec![
            "msRTT".to_string(),
            "pktSent".to_string(),
            "msRTT".to_string(),
        ];
        assert_eq!(resolve_variables(Some(explicit.clone()), None), explicit);
    }

    #[test]
    fn test_resolve_defaults_to_common() {
        assert_eq!(resolve_variables(None, None), SRT_COMMON_VARIABLES);
        assert_eq!(resolve_variables(Some(Vec::new()), None), SRT_COMMON_VARIABLES);
    }

    #[test]
    fn test_resolve_preset_name_unknown_falls_back() {
        assert_eq!(resolve_preset_name("bogus"), SRT_COMMON_VARIABLES);
        assert_eq!(resolve_preset_name("SRT_ALL"), SRT_ALL_VARIABLES);
    }
}
