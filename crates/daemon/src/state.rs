use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use common::service::{DEFAULT_MAX_CONTENT_LENGTH, DEFAULT_STORAGE_TIMEOUT};

pub const APP_NAME: &str = "sealpost";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";
pub const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the HTTP API
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Maximum message length, in characters
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,
    /// Seconds a single storage call may take before it is abandoned
    #[serde(default = "default_storage_timeout_secs")]
    pub storage_timeout_secs: u64,
}

fn default_api_port() -> u16 {
    5001
}

fn default_max_content_length() -> usize {
    DEFAULT_MAX_CONTENT_LENGTH
}

fn default_storage_timeout_secs() -> u64 {
    DEFAULT_STORAGE_TIMEOUT.as_secs()
}

impl AppConfig {
    /// Reject values that would make the service refuse every request
    pub fn validate(&self) -> Result<(), StateError> {
        if self.max_content_length == 0 {
            return Err(StateError::InvalidConfig(
                "max_content_length must be at least 1".to_string(),
            ));
        }
        if self.storage_timeout_secs == 0 {
            return Err(StateError::InvalidConfig(
                "storage_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            max_content_length: default_max_content_length(),
            storage_timeout_secs: default_storage_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the sealpost directory (~/.sealpost)
    pub app_dir: PathBuf,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Directory for rolling log files
    pub log_dir: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the sealpost directory path (custom or default ~/.sealpost)
    pub fn app_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    pub fn exists(custom_path: Option<PathBuf>) -> Result<bool, StateError> {
        let app_dir = Self::app_dir(custom_path)?;
        Ok(app_dir.exists())
    }

    /// Initialize a new state directory. Refuses to touch an existing one
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let app_dir = Self::app_dir(custom_path)?;

        if app_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        let config = config.unwrap_or_default();
        config.validate()?;

        fs::create_dir_all(&app_dir)?;

        let log_dir = app_dir.join(LOG_DIR_NAME);
        fs::create_dir_all(&log_dir)?;

        let config_path = app_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        // schema is applied by the service on first connect
        let db_path = app_dir.join(DB_FILE_NAME);
        fs::write(&db_path, "")?;

        Ok(Self {
            app_dir,
            db_path,
            config_path,
            log_dir,
            config,
        })
    }

    /// Load existing state from the sealpost directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let app_dir = Self::app_dir(custom_path)?;

        if !app_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let db_path = app_dir.join(DB_FILE_NAME);
        let config_path = app_dir.join(CONFIG_FILE_NAME);
        let log_dir = app_dir.join(LOG_DIR_NAME);

        if !db_path.exists() {
            return Err(StateError::MissingFile(DB_FILE_NAME.to_string()));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;
        config.validate()?;

        Ok(Self {
            app_dir,
            db_path,
            config_path,
            log_dir,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("sealpost directory not initialized. Run 'sealpost init' first")]
    NotInitialized,

    #[error("sealpost directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("invalid config.toml: {0}")]
    InvalidConfig(String),

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("state");

        let config = AppConfig {
            api_port: 6001,
            max_content_length: 250,
            storage_timeout_secs: 2,
        };
        let state = AppState::init(Some(dir.clone()), Some(config.clone())).unwrap();
        assert!(state.db_path.exists());
        assert!(state.log_dir.is_dir());

        let loaded = AppState::load(Some(dir)).unwrap();
        assert_eq!(loaded.config, config);
        assert_eq!(loaded.db_path, state.db_path);
    }

    #[test]
    fn test_init_refuses_existing_dir() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().to_path_buf();

        assert!(matches!(
            AppState::init(Some(dir), None),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_load_requires_init() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("missing");

        assert!(matches!(
            AppState::load(Some(dir)),
            Err(StateError::NotInitialized)
        ));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str("api_port = 7000").unwrap();
        assert_eq!(config.api_port, 7000);
        assert_eq!(config.max_content_length, 1000);
        assert_eq!(config.storage_timeout_secs, 5);
    }

    #[test]
    fn test_load_rejects_zero_limits() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("state");
        let state = AppState::init(Some(dir.clone()), None).unwrap();

        for bad in ["max_content_length = 0", "storage_timeout_secs = 0"] {
            fs::write(&state.config_path, bad).unwrap();
            assert!(matches!(
                AppState::load(Some(dir.clone())),
                Err(StateError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_init_rejects_zero_limits() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("state");
        let config = AppConfig {
            storage_timeout_secs: 0,
            ..Default::default()
        };

        assert!(matches!(
            AppState::init(Some(dir.clone()), Some(config)),
            Err(StateError::InvalidConfig(_))
        ));
        assert!(!dir.exists());
    }
}
