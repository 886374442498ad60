//! Environment driven gateway configuration.
//!
//! # Invariants
//! - Blank variables count as unset.
//! - The process-wide config is resolved once and never reloaded.

use conreal_core::{default_log_level, init_logging as init_logging_inner, LoggingError};
use std::path::PathBuf;
use std::sync::OnceLock;

pub const DB_PATH_VAR: &str = "CONREAL_DB_PATH";
pub const SUBREDDIT_VAR: &str = "CONREAL_SUBREDDIT";
pub const LOG_LEVEL_VAR: &str = "CONREAL_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "CONREAL_LOG_DIR";

const DB_FILE_NAME: &str = "conreal.sqlite3";
pub const DEFAULT_SUBREDDIT: &str = "conrealmonitor_dev";

static GLOBAL_CONFIG: OnceLock<ApiConfig> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// SQLite file opened on every handler call.
    pub db_path: PathBuf,
    /// Community used when the platform does not name one.
    pub subreddit: String,
    pub log_level: String,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl ApiConfig {
    /// Defaults with an explicit database file.
    pub fn with_db_path(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            subreddit: DEFAULT_SUBREDDIT.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; used by [`ApiConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME));
        let mut config = Self::with_db_path(db_path);
        if let Some(subreddit) = read(SUBREDDIT_VAR) {
            config.subreddit = subreddit;
        }
        if let Some(level) = read(LOG_LEVEL_VAR) {
            config.log_level = level;
        }
        config.log_dir = read(LOG_DIR_VAR).map(PathBuf::from);
        config
    }

    /// Process-wide config read from the environment on first use.
    pub fn global() -> &'static ApiConfig {
        GLOBAL_CONFIG.get_or_init(Self::from_env)
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns `Ok(false)` when logging is not configured.
    pub fn start_logging(&self) -> Result<bool, LoggingError> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(false);
        };
        init_logging_inner(&self.log_level, &log_dir.to_string_lossy())?;
        Ok(true)
    }
}
