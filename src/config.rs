//! Application configuration.

use crate::catalog::Model;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable overriding [`TabletoeConfig::table_source`].
pub const TABLE_SOURCE_ENV: &str = "TABLETOE_TABLE_SOURCE";

/// Configuration for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct TabletoeConfig {
    /// Where decision tables come from: an `http(s)://` base URL or a local directory.
    #[serde(default = "default_table_source")]
    table_source: String,

    /// Pause before the AI commits its move, in milliseconds.
    #[serde(default = "default_thinking_delay_ms")]
    thinking_delay_ms: u64,

    /// Model loaded at startup.
    #[serde(default)]
    default_model: Model,
}

#[instrument]
fn default_table_source() -> String {
    "tables".to_string()
}

#[instrument]
fn default_thinking_delay_ms() -> u64 {
    500
}

impl Default for TabletoeConfig {
    fn default() -> Self {
        Self {
            table_source: default_table_source(),
            thinking_delay_ms: default_thinking_delay_ms(),
            default_model: Model::default(),
        }
    }
}

impl TabletoeConfig {
    /// Creates a configuration from explicit values.
    #[instrument(skip(table_source))]
    pub fn new(table_source: impl Into<String>, thinking_delay_ms: u64, default_model: Model) -> Self {
        Self {
            table_source: table_source.into(),
            thinking_delay_ms,
            default_model,
        }
    }

    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(table_source = %config.table_source, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, defaults otherwise, then applies the environment override.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };
        Ok(config.with_table_source_override(std::env::var(TABLE_SOURCE_ENV).ok()))
    }

    /// Replaces the table source when `source` is set and non-empty.
    #[instrument(skip(self))]
    pub fn with_table_source_override(mut self, source: Option<String>) -> Self {
        if let Some(source) = source.filter(|s| !s.trim().is_empty()) {
            info!(%source, "Overriding table source");
            self.table_source = source;
        }
        self
    }

    /// Thinking delay as a [`Duration`].
    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TabletoeConfig::default();
        assert_eq!(config.table_source(), "tables");
        assert_eq!(config.thinking_delay(), Duration::from_millis(500));
        assert_eq!(*config.default_model(), Model::Normal);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TabletoeConfig = toml::from_str("default_model = \"advanced\"").unwrap();
        assert_eq!(*config.default_model(), Model::Advanced);
        assert_eq!(*config.thinking_delay_ms(), 500);
    }

    #[test]
    fn test_override_ignores_blank() {
        let config = TabletoeConfig::default()
            .with_table_source_override(Some("  ".to_string()))
            .with_table_source_override(None);
        assert_eq!(config.table_source(), "tables");

        let config = config.with_table_source_override(Some("https://example.com/q".to_string()));
        assert_eq!(config.table_source(), "https://example.com/q");
    }
}
