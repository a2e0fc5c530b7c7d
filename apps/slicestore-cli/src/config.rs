//! CLI configuration.
//!
//! Read from JSON:
//! - Linux: `~/.config/slicestore/config.json`
//! - Windows: `%APPDATA%\slicestore\config.json`
//!
//! Every field is optional; command-line flags take precedence.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use slicestore_reassembly::{DEFAULT_FETCH_TIMEOUT, FetchOptions};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-slice timeout in seconds; 0 disables it.
    pub fetch_timeout_secs: Option<u64>,
    /// Maximum slices fetched at once; 0 or absent means no limit.
    pub max_concurrent_fetches: Option<usize>,
    /// Directory reconstructed files are written to.
    pub output_dir: Option<PathBuf>,
    /// Base URL objects are fetched from when using a JSON listing.
    pub fetch_url: Option<String>,
}

impl Config {
    /// Loads configuration from `explicit`, or from the default location.
    ///
    /// An explicit file must exist and parse. A broken default file is
    /// ignored with a warning.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }

        let path = config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        match Self::read(&path) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config, using defaults"
                );
                Ok(Self::default())
            }
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Fetch options from this config, overridden by command-line values.
    pub fn fetch_options(
        &self,
        timeout_secs: Option<u64>,
        max_concurrent: Option<usize>,
    ) -> FetchOptions {
        let timeout = match timeout_secs.or(self.fetch_timeout_secs) {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(DEFAULT_FETCH_TIMEOUT),
        };
        FetchOptions {
            timeout,
            max_concurrent: max_concurrent.or(self.max_concurrent_fetches),
        }
    }
}

fn config_path() -> anyhow::Result<PathBuf> {
    Ok(config_base_dir()?.join("slicestore").join("config.json"))
}

fn config_base_dir() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var("APPDATA").context("APPDATA is not set")?;
        Ok(PathBuf::from(appdata))
    }

    #[cfg(not(target_os = "windows"))]
    {
        if let Some(dir) = std::env::var("XDG_CONFIG_HOME").ok().filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        let home = std::env::var("HOME").context("HOME is not set")?;
        Ok(PathBuf::from(home).join(".config"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"fetch_timeout_secs": 5, "output_dir": "/tmp/out"}"#).unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.fetch_timeout_secs, Some(5));
        assert_eq!(config.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(config.max_concurrent_fetches, None);
        assert_eq!(config.fetch_url, None);
    }

    #[test]
    fn explicit_config_must_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(Config::load(Some(path.as_path())).is_err());
        assert!(Config::load(Some(dir.path().join("absent.json").as_path())).is_err());
    }

    #[test]
    fn default_fetch_options() {
        let options = Config::default().fetch_options(None, None);
        assert_eq!(options, FetchOptions::default());
    }

    #[test]
    fn flags_override_config() {
        let config = Config {
            fetch_timeout_secs: Some(30),
            max_concurrent_fetches: Some(8),
            ..Config::default()
        };

        let options = config.fetch_options(None, None);
        assert_eq!(options.timeout, Some(Duration::from_secs(30)));
        assert_eq!(options.max_concurrent, Some(8));

        let options = config.fetch_options(Some(0), Some(2));
        assert_eq!(options.timeout, None);
        assert_eq!(options.max_concurrent, Some(2));
    }
}
