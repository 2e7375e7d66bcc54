//! Read access to a parsed configuration tree.
//!
//! Resolution only needs four questions answered of a document node, so it
//! depends on this trait rather than on a particular parser. The YAML
//! implementation for `serde_yaml::Value` is the one the store uses.

use serde_yaml::Value;

/// Minimal read capability over a tree-shaped configuration document.
///
/// # Examples
///
/// ```
/// use srtexp::config::ConfigNode;
///
/// let doc: serde_yaml::Value = serde_yaml::from_str("ip: 127.0.0.1\nportMin: 9100\n").unwrap();
/// assert!(doc.contains_key("ip"));
/// assert_eq!(doc.scalar("portMin").as_deref(), Some("9100"));
/// assert!(doc.sequence("objects").is_none());
/// ```
pub trait ConfigNode {
    /// Returns `true` if this node is a mapping holding `key`, even with a
    /// null value.
    fn contains_key(&self, key: &str) -> bool;

    /// Returns the non-null child at `key`.
    fn child(&self, key: &str) -> Option<&Self>;

    /// Returns this node rendered as a scalar string, or `None` for
    /// mappings, sequences and nulls.
    fn as_scalar(&self) -> Option<String>;

    /// Returns the items of this node if it is a sequence.
    fn items(&self) -> Option<Vec<&Self>>;

    /// Returns the scalar at `key`.
    fn scalar(&self, key: &str) -> Option<String> {
        self.child(key).and_then(Self::as_scalar)
    }

    /// Returns the sequence at `key`.
    fn sequence(&self, key: &str) -> Option<Vec<&Self>> {
        self.child(key).and_then(Self::items)
    }
}

impl ConfigNode for Value {
    fn contains_key(&self, key: &str) -> bool {
        self.as_mapping().is_some_and(|m| m.contains_key(key))
    }

    fn child(&self, key: &str) -> Option<&Self> {
        self.get(key).filter(|v| !v.is_null())
    }

    fn as_scalar(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Tagged(tagged) => tagged.value.as_scalar(),
            Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
        }
    }

    fn items(&self) -> Option<Vec<&Self>> {
        match self {
            Value::Sequence(seq) => Some(seq.iter().collect()),
            Value::Tagged(tagged) => tagged.value.items(),
            _ => None,
        }
    }
}

/// Canonical form of a symbolic value: lowercase with `_`, `-` and spaces
/// removed, so `COLLECT_ON_REQUEST`, `collect-on-request` and
/// `collectOnRequest` compare equal.
pub(crate) fn normalize_symbol(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
