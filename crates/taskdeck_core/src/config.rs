//! Runtime configuration.
//!
//! # Responsibility
//! - Resolve database path, log target, log level and storage key.
//! - Layer defaults, then `TASKDECK_*` environment variables, then explicit
//!   overrides from the caller (CLI flags).
//!
//! # Invariants
//! - `log_level` is always a normalized level name.
//! - `storage_key` is never empty.

use crate::logging::{default_log_level, normalize_level};
use crate::storage::DEFAULT_STORAGE_KEY;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "TASKDECK_DB";
pub const ENV_LOG_DIR: &str = "TASKDECK_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "TASKDECK_LOG_LEVEL";
pub const ENV_STORAGE_KEY: &str = "TASKDECK_STORAGE_KEY";

const DEFAULT_DB_FILE_NAME: &str = "taskdeck.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    EmptyStorageKey,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::EmptyStorageKey => write!(f, "storage key must not be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Effective runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Rolling-file log directory; `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
    pub log_level: &'static str,
    pub storage_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_dir: None,
            log_level: default_log_level(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Optional values that take precedence over a lower layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub storage_key: Option<String>,
}

impl ConfigOverrides {
    /// Reads `TASKDECK_*` variables through `lookup`.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            db_path: read(ENV_DB_PATH).map(PathBuf::from),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
            log_level: read(ENV_LOG_LEVEL),
            storage_key: read(ENV_STORAGE_KEY),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

impl AppConfig {
    /// Applies `overrides` on top of this configuration.
    pub fn merge(mut self, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(db_path) = overrides.db_path {
            self.db_path = db_path;
        }
        if let Some(log_dir) = overrides.log_dir {
            self.log_dir = Some(log_dir);
        }
        if let Some(level) = overrides.log_level {
            self.log_level = normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?;
        }
        if let Some(key) = overrides.storage_key {
            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigError::EmptyStorageKey);
            }
            self.storage_key = key.to_string();
        }
        Ok(self)
    }

    /// Defaults, then environment, then `cli` overrides.
    pub fn resolve(cli: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::default().merge(ConfigOverrides::from_env())?.merge(cli)
    }
}
