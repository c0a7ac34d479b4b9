use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::doc::options::ExtensionRegistry;

/// Configuration for building the documentation model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Scalar type table to load instead of the builtin one
    #[serde(default)]
    pub scalars: Option<PathBuf>,

    /// Custom option names copied verbatim into option maps
    #[serde(default)]
    pub passthrough_extensions: Vec<String>,

    /// Whether JSON output is pretty-printed
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scalars: None,
            passthrough_extensions: Vec::new(),
            pretty: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    /// Transformers for the configured custom options
    pub fn extension_registry(&self) -> ExtensionRegistry {
        ExtensionRegistry::passthrough(self.passthrough_extensions.iter().cloned())
    }
}

/// Error type for configuration operations
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "I/O error: {}", err),
            ConfigError::Parse(err) => write!(f, "Parse error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_from_empty_object() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.pretty);
        assert!(config.scalars.is_none());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("protodoc.json");

        let config = Config {
            scalars: Some(PathBuf::from("tables/scalars.json")),
            passthrough_extensions: vec!["acme.owner".to_string()],
            pretty: false,
        };
        config.to_file(&path).unwrap();

        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = Config::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ \"pretty\": 3 }").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_extension_registry() {
        let config = Config {
            passthrough_extensions: vec!["acme.owner".to_string(), "acme.team".to_string()],
            ..Config::default()
        };
        let registry = config.extension_registry();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("acme.team"));
    }
}
