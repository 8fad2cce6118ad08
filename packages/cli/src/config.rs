//! TOML configuration for the feed watcher.
//!
//! Everything is optional: command-line flags override file values, and
//! built-in defaults cover the rest.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Default HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors loading the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML of the expected shape.
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level config file shape.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Data source settings.
    #[serde(default)]
    pub source: SourceSection,
    /// Feed scheduling settings.
    #[serde(default)]
    pub feed: FeedSection,
}

/// `[source]` section.
#[derive(Debug, Default, Deserialize)]
pub struct SourceSection {
    /// Incident API endpoint.
    pub api_url: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
}

/// `[feed]` section.
#[derive(Debug, Default, Deserialize)]
pub struct FeedSection {
    /// Period between automatic refreshes, in seconds.
    pub refresh_interval_secs: Option<u64>,
}

/// Loads and parses the TOML config file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed.
pub fn load(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_config() {
        let config: FileConfig = toml::from_str(
            r#"
            [source]
            api_url = "https://incidents.example.com/v1/incidents"
            request_timeout_secs = 10

            [feed]
            refresh_interval_secs = 120
            "#,
        )
        .unwrap();
        assert_eq!(
            config.source.api_url.as_deref(),
            Some("https://incidents.example.com/v1/incidents")
        );
        assert_eq!(config.source.request_timeout_secs, Some(10));
        assert_eq!(config.feed.refresh_interval_secs, Some(120));
    }

    #[test]
    fn empty_config_is_valid() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.source.api_url.is_none());
        assert!(config.feed.refresh_interval_secs.is_none());
    }
}
