//! Runtime configuration for hosts embedding the note core.
//!
//! # Responsibility
//! - Resolve store path and logging settings from the environment.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never fails; missing values fall back to defaults.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "QUICKNOTE_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "QUICKNOTE_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "QUICKNOTE_LOG_DIR";
pub const DEFAULT_DB_FILE_NAME: &str = "quicknote.sqlite3";

/// Resolved settings for opening the store and starting logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Reads `QUICKNOTE_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, e.g. a fixed map in tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_ENV, DEFAULT_DB_FILE_NAME, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = CoreConfig::default();
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (DB_PATH_ENV, "/var/lib/quicknote/notes.db"),
            (LOG_LEVEL_ENV, "warn"),
            (LOG_DIR_ENV, "/var/log/quicknote"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/var/lib/quicknote/notes.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/quicknote")));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config =
            CoreConfig::from_lookup(lookup_from(&[(DB_PATH_ENV, "   "), (LOG_DIR_ENV, "")]));
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.log_dir, None);
    }
}
