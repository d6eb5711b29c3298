use std::path::PathBuf;
use std::time::Duration;

use common::prelude::ServiceLimits;

use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// Port for the API HTTP server
    pub api_port: u16,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,

    // messaging limits
    pub max_content_length: usize,
    pub storage_timeout: Duration,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Runtime configuration for the on-disk state
    pub fn from_app_state(state: &AppState) -> Self {
        Self {
            api_port: state.config.api_port,
            sqlite_path: Some(state.db_path.clone()),
            max_content_length: state.config.max_content_length,
            storage_timeout: Duration::from_secs(state.config.storage_timeout_secs),
            log_level: tracing::Level::INFO,
            log_dir: Some(state.log_dir.clone()),
        }
    }

    pub fn limits(&self) -> ServiceLimits {
        ServiceLimits {
            max_content_length: self.max_content_length,
            storage_timeout: self.storage_timeout,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let limits = ServiceLimits::default();
        Self {
            api_port: 5001,
            sqlite_path: None,
            max_content_length: limits.max_content_length,
            storage_timeout: limits.storage_timeout,
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}
