//! Runtime configuration resolved from the process environment.
//!
//! # Invariants
//! - Blank or missing variables fall back to defaults.
//! - An invalid log level falls back to the build-mode default.

use crate::logging::default_log_level;
use std::path::PathBuf;

/// SQLite file holding the key-value store.
pub const ENV_DB_PATH: &str = "TASKMINDER_DB_PATH";
/// One of `trace|debug|info|warn|error`.
pub const ENV_LOG_LEVEL: &str = "TASKMINDER_LOG_LEVEL";

const DEFAULT_DB_FILE_NAME: &str = "taskminder.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
}

impl CoreConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves config through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = non_blank(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let log_level = non_blank(ENV_LOG_LEVEL)
            .and_then(|value| crate::logging::normalize_level(&value).ok())
            .unwrap_or_else(default_log_level);

        Self { db_path, log_level }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
