//! Reading and parsing configuration documents.
//!
//! The loader only turns bytes into a YAML tree; resolution of that tree is
//! the store's job. Both failure kinds it reports are non-fatal to the
//! store, which falls back to defaults.

use std::fs;
use std::path::Path;

use serde_yaml::Value;

use crate::error::{Error, Result};

/// Loads configuration documents.
///
/// # Examples
///
/// ```
/// use srtexp::config::{ConfigLoader, ConfigNode};
///
/// let doc = ConfigLoader::parse_str("ip: 127.0.0.1\nportMin: 9100\nportMax: 9110\n").unwrap();
/// assert_eq!(doc.scalar("portMax").as_deref(), Some("9110"));
///
/// assert!(ConfigLoader::parse_str("- not\n- a mapping\n").is_err());
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Read and parse a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigSourceUnreadable` if the file cannot be read,
    /// or `Error::ConfigMalformed` if it is not a YAML mapping.
    pub fn load_file(path: &Path) -> Result<Value> {
        let contents = fs::read_to_string(path).map_err(|e| Error::ConfigSourceUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::parse_str(&contents).map_err(|e| match e {
            Error::ConfigMalformed { reason } => Error::ConfigMalformed {
                reason: format!("{}: {reason}", path.display()),
            },
            other => other,
        })
    }

    /// Parse a YAML configuration document.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigMalformed` if the text is not valid YAML or its
    /// root is not a mapping. An empty document counts as malformed.
    pub fn parse_str(contents: &str) -> Result<Value> {
        let value: Value = serde_yaml::from_str(contents)?;
        match value {
            Value::Mapping(_) => Ok(value),
            Value::Null => Err(Error::ConfigMalformed {
                reason: "document is empty".into(),
            }),
            _ => Err(Error::ConfigMalformed {
                reason: "document root must be a mapping".into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigNode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load_file(Path::new("/nonexistent/path/srtexp.yaml"));
        assert!(matches!(result, Err(Error::ConfigSourceUnreadable { .. })));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad.yaml");
        fs::write(&config_path, "invalid: yaml: syntax:").unwrap();

        let err = ConfigLoader::load_file(&config_path).unwrap_err();
        assert!(matches!(err, Error::ConfigMalformed { .. }));
        assert!(format!("{err}").contains("bad.yaml"));
    }

    #[test]
    fn test_load_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("srtexp.yaml");
        fs::write(&config_path, "ip: 127.0.0.1\nobjects: []\n").unwrap();

        let doc = ConfigLoader::load_file(&config_path).unwrap();
        assert_eq!(doc.scalar("ip").as_deref(), Some("127.0.0.1"));
        assert_eq!(doc.sequence("objects").map(|o| o.len()), Some(0));
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(matches!(
            ConfigLoader::parse_str(""),
            Err(Error::ConfigMalformed { .. })
        ));
        assert!(matches!(
            ConfigLoader::parse_str("# only a comment\n"),
            Err(Error::ConfigMalformed { .. })
        ));
    }

    #[test]
    fn test_parse_scalar_root() {
        let err = ConfigLoader::parse_str("just text").unwrap_err();
        assert!(format!("{err}").contains("mapping"));
    }
}
