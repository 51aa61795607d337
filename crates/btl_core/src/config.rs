//! Runtime configuration for storage and logging locations.
//!
//! # Responsibility
//! - Resolve the tasks file, log directory and log level.
//! - Apply environment overrides on top of home-directory defaults.
//!
//! # Invariants
//! - Blank environment values are ignored.
//! - Without a home directory, the data directory falls back to the working directory.

use crate::logging::default_log_level;
use std::path::{Path, PathBuf};

pub const DATA_DIR_NAME: &str = ".task-tracker";
pub const DATA_FILE_NAME: &str = "tasks.json";
pub const LOG_DIR_NAME: &str = "logs";

pub const ENV_DATA_FILE: &str = "BTL_DATA_FILE";
pub const ENV_LOG_DIR: &str = "BTL_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "BTL_LOG_LEVEL";

/// Resolved tracker configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub data_file: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    /// Set when no home directory was found and the fallback directory is used.
    pub home_fallback: bool,
}

impl TrackerConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Self {
        let fallback = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::resolve(dirs::home_dir(), &fallback, |key| std::env::var(key).ok())
    }

    /// Resolves configuration from explicit inputs.
    ///
    /// `env` is consulted for `BTL_DATA_FILE`, `BTL_LOG_DIR` and `BTL_LOG_LEVEL`.
    pub fn resolve<F>(home: Option<PathBuf>, fallback_dir: &Path, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let home_fallback = home.is_none();
        let base = home.unwrap_or_else(|| fallback_dir.to_path_buf());
        let data_dir = base.join(DATA_DIR_NAME);

        let data_file = lookup(ENV_DATA_FILE)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(DATA_FILE_NAME));
        let log_dir = lookup(ENV_LOG_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(LOG_DIR_NAME));
        let log_level = lookup(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());

        Self {
            data_file,
            log_dir,
            log_level,
            home_fallback,
        }
    }
}
