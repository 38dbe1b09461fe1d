//! Application settings
//!
//! This module provides typed configuration loaded once from environment
//! variables at startup and passed by reference to the helpers that need it.

use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DYNAMO_DB_CONFIG_VAR, LOGGING_LEVEL_VAR, SENTRY_DSN_VAR};

/// Errors raised while reading configuration from the environment.
///
/// All of these surface at [`Settings::load`] time; nothing is deferred to
/// the first AWS call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("unrecognized logging level {0:?} (expected DEBUG, INFO, WARNING, ERROR or CRITICAL)")]
    InvalidLogLevel(String),

    #[error("invalid DYNAMO_DB_CONFIG value: {0}")]
    InvalidDynamoConfig(#[from] serde_json::Error),
}

/// Logging severity accepted in `LOGGING_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// The most verbose `tracing` level this severity lets through.
    ///
    /// `tracing` has no CRITICAL; it collapses onto ERROR.
    pub fn as_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Error | LogLevel::Critical => tracing::Level::ERROR,
        }
    }

    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

/// DynamoDB connection parameters, parsed from the `DYNAMO_DB_CONFIG`
/// JSON blob. All four keys are required when the variable is set.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DynamoDbConfig {
    pub region_name: String,
    pub endpoint_url: String,
    #[serde(skip_serializing)]
    pub aws_access_key_id: String,
    #[serde(skip_serializing)]
    pub aws_secret_access_key: String,
}

/// Main application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Process-wide logging severity.
    pub log_level: LogLevel,

    /// Sentry DSN; `None` disables error reporting.
    pub sentry_dsn: Option<String>,

    /// Explicit DynamoDB connection config; `None` uses the ambient
    /// AWS credential/region chain.
    pub dynamodb: Option<DynamoDbConfig>,
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// A `.env` file is loaded first if present (ignored in deployed
    /// environments, handy locally).
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// `Settings::load` passes `env::var`; tests pass a map so they never
    /// mutate the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let log_level = match lookup(LOGGING_LEVEL_VAR) {
            Some(raw) => raw.parse()?,
            None => LogLevel::default(),
        };

        let sentry_dsn = lookup(SENTRY_DSN_VAR).filter(|dsn| !dsn.trim().is_empty());

        let dynamodb = match lookup(DYNAMO_DB_CONFIG_VAR).filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => Some(serde_json::from_str(&raw)?),
            None => None,
        };

        Ok(Self {
            log_level,
            sentry_dsn,
            dynamodb,
        })
    }
}

/// Look up an environment variable, failing with a configuration error
/// when it is absent.
pub fn require_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

/// Look up an environment variable with a default.
pub fn var_or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}
