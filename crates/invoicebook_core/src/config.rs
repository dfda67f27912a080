//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve database location, logging, and strict-mode settings.
//! - Keep defaults usable with no environment at all.
//!
//! # Invariants
//! - Blank variables count as unset.
//! - Logging stays off unless a log directory is configured.

use crate::logging::{default_log_level, init_logging};
use crate::repo::record_store::{RecordStore, StoreOptions};
use crate::repo::StoreResult;
use crate::storage::SqliteKeyValueStorage;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "INVOICEBOOK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "INVOICEBOOK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "INVOICEBOOK_LOG_DIR";
pub const ENV_STRICT: &str = "INVOICEBOOK_STRICT";

const DEFAULT_DB_FILE_NAME: &str = "invoicebook.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBool { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBool { key, value } => write!(
                f,
                "`{key}` must be one of 1|0|true|false|yes|no|on|off, got `{value}`"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub strict_validation: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_level: default_log_level().to_string(),
            log_dir: None,
            strict_validation: false,
        }
    }
}

impl AppConfig {
    /// Reads `INVOICEBOOK_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        if let Some(raw) = read(ENV_STRICT) {
            config.strict_validation = parse_bool(ENV_STRICT, &raw)?;
        }
        Ok(config)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            strict_validation: self.strict_validation,
        }
    }

    /// Starts file logging when a directory is configured.
    ///
    /// Returns `Ok(false)` when logging is left off.
    pub fn init_logging(&self) -> Result<bool, String> {
        match &self.log_dir {
            Some(dir) => init_logging(&self.log_level, dir).map(|()| true),
            None => Ok(false),
        }
    }

    /// Opens the SQLite-backed store at `db_path`.
    pub fn open_store(&self) -> StoreResult<RecordStore<SqliteKeyValueStorage>> {
        RecordStore::open_file(&self.db_path, self.store_options())
    }
}

fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: raw.to_string(),
        }),
    }
}
