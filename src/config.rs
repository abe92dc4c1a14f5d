//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::GroupId;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Ledger snapshot to report on
    pub snapshot_path: PathBuf,

    /// Environment (development, production)
    pub environment: String,

    /// Log output format
    pub log_format: LogFormat,

    /// Restrict the report to a single group
    pub report_group_id: Option<GroupId>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let snapshot_path = lookup("LEDGER_SNAPSHOT_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingEnv("LEDGER_SNAPSHOT_PATH"))?;

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let log_format = match lookup("LOG_FORMAT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue("LOG_FORMAT"))?,
            None if environment == "production" => LogFormat::Json,
            None => LogFormat::Pretty,
        };

        let report_group_id = lookup("REPORT_GROUP_ID")
            .map(|value| {
                value
                    .trim()
                    .parse()
                    .map(GroupId)
                    .map_err(|_| ConfigError::InvalidValue("REPORT_GROUP_ID"))
            })
            .transpose()?;

        Ok(Self {
            snapshot_path,
            environment,
            log_format,
            report_group_id,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
