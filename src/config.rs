//! Runtime configuration for the tracker and its overdue sweeper.
//!
//! Configuration is read from a JSON document or from `TRACKER_*`
//! environment variables. Missing values fall back to the defaults below;
//! present but malformed values are rejected.

use crate::task::domain::OverdueReentryPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the `PostgreSQL` connection URL.
pub const DATABASE_URL_VAR: &str = "TRACKER_DATABASE_URL";
/// Environment variable holding the `tracing` filter directive.
pub const LOG_FILTER_VAR: &str = "TRACKER_LOG";
/// Environment variable selecting `pretty` or `json` log output.
pub const LOG_FORMAT_VAR: &str = "TRACKER_LOG_FORMAT";
/// Environment variable holding the sweep interval in seconds.
pub const SWEEP_INTERVAL_VAR: &str = "TRACKER_SWEEP_INTERVAL_SECS";
/// Environment variable selecting the overdue re-entry policy.
pub const OVERDUE_REENTRY_VAR: &str = "TRACKER_OVERDUE_REENTRY";

const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Returns the configuration representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for LogFormat {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::invalid(LOG_FORMAT_VAR, value)),
        }
    }
}

/// Overdue sweep settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Seconds between periodic sweeps.
    pub interval_secs: u64,
    /// Treatment of reopened overdue tasks.
    pub reentry: OverdueReentryPolicy,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            reentry: OverdueReentryPolicy::default(),
        }
    }
}

impl SweepConfig {
    /// Returns the interval as a [`Duration`].
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Top-level tracker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// `PostgreSQL` connection URL; absent when only in-memory adapters are
    /// used.
    pub database_url: Option<String>,
    /// `tracing` filter directive, for example `info,poruchenie=debug`.
    pub log_filter: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Overdue sweep settings.
    pub sweep: SweepConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            log_format: LogFormat::default(),
            sweep: SweepConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Parses configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] when the document is malformed or
    /// [`ConfigError::Invalid`] when a value fails validation.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is present but
    /// malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through a variable lookup function.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is present but
    /// malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = read(DATABASE_URL_VAR) {
            config.database_url = Some(url);
        }
        if let Some(filter) = read(LOG_FILTER_VAR) {
            config.log_filter = filter;
        }
        if let Some(format) = read(LOG_FORMAT_VAR) {
            config.log_format = LogFormat::try_from(format.as_str())?;
        }
        if let Some(secs) = read(SWEEP_INTERVAL_VAR) {
            config.sweep.interval_secs = secs
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid(SWEEP_INTERVAL_VAR, &secs))?;
        }
        if let Some(policy) = read(OVERDUE_REENTRY_VAR) {
            config.sweep.reentry = OverdueReentryPolicy::try_from(policy.as_str())
                .map_err(|_| ConfigError::invalid(OVERDUE_REENTRY_VAR, &policy))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Returns the database URL, required by the `PostgreSQL` adapters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when no URL is configured.
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::Missing(DATABASE_URL_VAR))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep.interval_secs == 0 {
            return Err(ConfigError::invalid(SWEEP_INTERVAL_VAR, "0"));
        }
        Ok(())
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value is present but unusable.
    #[error("invalid value for {key}: {value:?}")]
    Invalid {
        /// Setting name.
        key: &'static str,
        /// Offending value.
        value: String,
    },
    /// A required value is absent.
    #[error("missing required setting {0}")]
    Missing(&'static str),
    /// The JSON document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    fn invalid(key: &'static str, value: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            value: value.into(),
        }
    }
}
