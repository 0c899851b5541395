//! # Bridge Configuration
//!
//! Optional TOML file tuning the session and the log output. Every key has a
//! default, so an empty file (or no file at all) is valid.
//!
//! ## Example: TOML Configuration
//!
//! ```toml
//! [session]
//! timeout = 300
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! The session timeout is read as an untyped value and coerced by
//! [`sanitize_timeout`]; a malformed value never reaches the HTTP client.

// src/config.rs - Single configuration file
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Uploads can take minutes over a slow link.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Main configuration struct for the session and logging sections.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Session-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionSection {
    /// Request timeout in seconds. Kept untyped until sanitized.
    #[serde(default)]
    pub timeout: Option<toml::Value>,
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Effective request timeout: the CLI value wins over the file value.
    pub fn timeout(&self, cli_override: Option<&str>) -> Duration {
        match cli_override {
            Some(raw) => sanitize_timeout(&TimeoutInput::Text(raw)),
            None => match &self.session.timeout {
                Some(value) => sanitize_timeout(&TimeoutInput::Toml(value)),
                None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            },
        }
    }

    /// Effective log level: the CLI value wins over the file value.
    pub fn log_level(&self, cli_override: Option<&str>) -> tracing::Level {
        let raw = cli_override.unwrap_or(&self.logging.level);
        raw.parse().unwrap_or(tracing::Level::INFO)
    }
}

/// An untyped timeout as handed over by an upstream caller.
#[derive(Debug, Clone, Copy)]
pub enum TimeoutInput<'a> {
    Text(&'a str),
    Toml(&'a toml::Value),
}

/// Coerce a timeout into a positive duration, falling back to
/// [`DEFAULT_TIMEOUT_SECS`] for anything that is not a positive number.
pub fn sanitize_timeout(input: &TimeoutInput<'_>) -> Duration {
    let secs = match input {
        TimeoutInput::Text(raw) => raw.trim().parse::<f64>().ok(),
        TimeoutInput::Toml(toml::Value::Integer(i)) => Some(*i as f64),
        TimeoutInput::Toml(toml::Value::Float(f)) => Some(*f),
        TimeoutInput::Toml(toml::Value::String(s)) => s.trim().parse::<f64>().ok(),
        TimeoutInput::Toml(_) => None,
    };
    match secs {
        Some(secs) if secs > 0.0 && secs <= u32::MAX as f64 => Duration::from_secs_f64(secs),
        _ => {
            tracing::warn!(
                "Invalid timeout value {:?}, using default of {}s",
                input,
                DEFAULT_TIMEOUT_SECS
            );
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        }
    }
}

fn default_log_level() -> String { "info".to_string() }

/// Load configuration from a TOML file at the given path.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::error!("Failed to parse config TOML: {}", e);
                Err(ConfigError::Toml(e))
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file '{}': {}", path, e);
            Err(ConfigError::Io(e))
        }
    }
}
