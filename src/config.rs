//! # Configuration
//!
//! Layered configuration for the Solr connection and logging. Values are
//! resolved in order: built-in defaults, an optional TOML file, then
//! `SOLR_ENGINE__*` environment variables (for example
//! `SOLR_ENGINE__SOLR__BASE_URL`).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "SOLR_ENGINE";

const APP_NAME: &str = "solr-engine";
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Solr connection settings
    pub solr: SolrConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Connection settings for the Solr server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolrConfig {
    /// Base URL of the Solr web app, without the core name
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8983/solr".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: format!("{APP_NAME}/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl SolrConfig {
    /// Configuration pointing at the given base URL, defaults elsewhere
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level filter, overridden by `RUST_LOG`
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Command-line overrides applied on top of the loaded configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

impl Config {
    /// Location of the per-user configuration file, if the platform has one
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
    }

    /// Load layered configuration.
    ///
    /// An explicit `path` must exist. Without one, the per-user file is read
    /// when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                if let Some(default_path) = Self::default_config_path() {
                    builder = builder.add_source(config::File::from(default_path).required(false));
                }
            }
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single TOML file, without environment layering
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| Error::Parse {
            context: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Parse {
            context: "config".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply command-line overrides
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref base_url) = overrides.base_url {
            self.solr.base_url.clone_from(base_url);
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.solr.timeout_secs = timeout_secs;
        }
        if let Some(ref level) = overrides.log_level {
            self.logging.level.clone_from(level);
        }
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.solr.base_url).map_err(|e| {
            Error::invalid_input("solr.base_url", format!("not a valid URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_input(
                "solr.base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.solr.timeout_secs == 0 {
            return Err(Error::invalid_input(
                "solr.timeout_secs",
                "timeout must be greater than 0",
            ));
        }
        if self.solr.connect_timeout_secs == 0 {
            return Err(Error::invalid_input(
                "solr.connect_timeout_secs",
                "timeout must be greater than 0",
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::invalid_input(
                "logging.level",
                format!("expected one of {}", LOG_LEVELS.join(", ")),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.solr.base_url, "http://127.0.0.1:8983/solr");
        assert_eq!(config.solr.timeout(), Duration::from_secs(30));
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = Config::default();
        config.solr.base_url = "ftp://solr.internal".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));

        let mut config = Config::default();
        config.solr.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));

        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        config.apply_overrides(&ConfigOverrides {
            base_url: Some("http://solr:8983/solr".to_string()),
            timeout_secs: None,
            log_level: Some("debug".to_string()),
            log_format: Some(LogFormat::Json),
        });

        assert_eq!(config.solr.base_url, "http://solr:8983/solr");
        assert_eq!(config.solr.timeout_secs, 30);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }
}
