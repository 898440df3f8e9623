//! Session configuration for the task core.
//!
//! Every field is optional; unset fields fall back to defaults. Values come
//! from a JSON document, from `TASKFLOW_*` environment variables, or both
//! (environment wins).

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, LoggingConfig};
use crate::repo::task_persistence::DEFAULT_SLOT_KEY;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "TASKFLOW_DB_PATH";
pub const ENV_SLOT_KEY: &str = "TASKFLOW_SLOT_KEY";
pub const ENV_LOG_LEVEL: &str = "TASKFLOW_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASKFLOW_LOG_DIR";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid taskflow config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Task core configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskflowConfig {
    /// SQLite file holding the slot store. `None` keeps data in memory only.
    pub db_path: Option<PathBuf>,
    /// Slot name (defaults to `taskflow-tasks`).
    pub slot_key: Option<String>,
    /// Log level (defaults per build mode).
    pub log_level: Option<String>,
    /// Absolute log directory. File logging is off when unset.
    pub log_dir: Option<PathBuf>,
}

impl TaskflowConfig {
    /// Parses a JSON config document. Unknown keys are ignored.
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Defaults overridden by process environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies `TASKFLOW_*` overrides resolved through `lookup`.
    ///
    /// Blank values are treated as unset.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = read(ENV_DB_PATH) {
            self.db_path = Some(PathBuf::from(path));
        }
        if let Some(key) = read(ENV_SLOT_KEY) {
            self.slot_key = Some(key);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            self.log_level = Some(level);
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        self
    }

    pub fn slot_key(&self) -> &str {
        self.slot_key.as_deref().unwrap_or(DEFAULT_SLOT_KEY)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    /// Logging settings, present only when a log directory is configured.
    pub fn logging(&self) -> Option<LoggingConfig> {
        self.log_dir
            .as_deref()
            .map(|dir| LoggingConfig::new(self.log_level(), dir))
    }

    /// Opens the configured slot database with migrations applied.
    pub fn open_connection(&self) -> DbResult<Connection> {
        match self.db_path.as_deref() {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskflowConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_SLOT_KEY};
    use std::collections::HashMap;
    use std::path::Path;

    #[test]
    fn defaults_use_standard_slot_and_no_logging() {
        let config = TaskflowConfig::default();
        assert_eq!(config.slot_key(), "taskflow-tasks");
        assert!(config.logging().is_none());
        assert!(config.db_path().is_none());
    }

    #[test]
    fn json_document_fills_known_fields_and_ignores_others() {
        let config = TaskflowConfig::from_json_str(
            r#"{"db_path":"/tmp/tasks.db","slot_key":"work-tasks","theme":"dark"}"#,
        )
        .expect("config should parse");
        assert_eq!(config.db_path(), Some(Path::new("/tmp/tasks.db")));
        assert_eq!(config.slot_key(), "work-tasks");
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(TaskflowConfig::from_json_str("{db_path:").is_err());
    }

    #[test]
    fn overrides_win_and_blank_values_are_ignored() {
        let env = HashMap::from([
            (ENV_SLOT_KEY, "from-env".to_string()),
            (ENV_DB_PATH, "   ".to_string()),
            (ENV_LOG_DIR, "/var/log/taskflow".to_string()),
        ]);
        let base = TaskflowConfig {
            db_path: Some("/data/tasks.db".into()),
            slot_key: Some("from-file".to_string()),
            ..TaskflowConfig::default()
        };

        let config = base.with_overrides(|name| env.get(name).cloned());

        assert_eq!(config.slot_key(), "from-env");
        assert_eq!(config.db_path(), Some(Path::new("/data/tasks.db")));
        let logging = config.logging().expect("log dir set");
        assert_eq!(logging.log_dir, Path::new("/var/log/taskflow"));
    }
}
