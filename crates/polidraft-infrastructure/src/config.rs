//! Client configuration loaded from `~/.config/polidraft/config.toml`.

use crate::paths::PolidraftPaths;
use polidraft_core::error::{PolidraftError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings controlling how the client reaches the backend.
///
/// All fields are optional; an absent file yields the defaults, which
/// resolve to the development loopback address downstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Explicit backend endpoint; wins over everything else.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Reverse-proxy origin used when no endpoint is configured.
    #[serde(default)]
    pub proxy_origin: Option<String>,
    /// Per-request timeout in seconds; absent means unbounded.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Coworker id sent with people searches.
    #[serde(default)]
    pub coworker_id: Option<i64>,
}

impl ClientConfig {
    /// Loads the configuration from the default location.
    ///
    /// A missing file yields the defaults; a malformed file is an error.
    pub fn load() -> Result<Self> {
        Self::load_from(PolidraftPaths::config_file()?)
    }

    /// Loads the configuration from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        toml::from_str(&content).map_err(|e| {
            PolidraftError::config(format!("failed to parse {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ClientConfig::load_from(dir.path().join("config.toml")).unwrap();
        assert!(config.endpoint.is_none());
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "endpoint = \"https://api.example.com\"\n").unwrap();

        let config = ClientConfig::load_from(&path).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("https://api.example.com"));
        assert!(config.proxy_origin.is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "endpoint = [broken").unwrap();
        assert!(ClientConfig::load_from(&path).is_err());
    }
}
