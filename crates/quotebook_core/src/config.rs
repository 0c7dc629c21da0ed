//! File-based configuration with per-field defaults.
//!
//! # Responsibility
//! - Locate and parse `config.toml`.
//! - Provide defaults for every setting so a missing file is not an error.
//!
//! # Invariants
//! - `QUOTEBOOK_CONFIG` overrides the platform config directory.
//! - An unreadable or malformed file is an error, never silently ignored.

use crate::logging::default_log_level;
use crate::model::quote::Quote;
use crate::sync::PayloadMode;
use serde::Deserialize;
use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "QUOTEBOOK_CONFIG";
const APP_DIR_NAME: &str = "quotebook";
const DB_FILE_NAME: &str = "quotebook.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config file {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse TOML from {}: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotebookConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl QuotebookConfig {
    /// Loads from the resolved config path, or defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let path = resolve_config_path();
        if path.exists() {
            return Self::load_from(&path);
        }
        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

/// Resolves the config path: env override, then platform config dir.
pub fn resolve_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }
    if let Some(base) = dirs::config_dir() {
        return base.join(APP_DIR_NAME).join("config.toml");
    }
    env::temp_dir().join(APP_DIR_NAME).join("config.toml")
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn data_root() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(env::temp_dir)
        .join(APP_DIR_NAME)
}

fn default_db_path() -> PathBuf {
    data_root().join(DB_FILE_NAME)
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Must be absolute; see [`crate::logging::init_logging`].
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: default_log_dir(),
        }
    }
}

fn default_level() -> String {
    default_log_level().to_string()
}

fn default_log_dir() -> PathBuf {
    data_root().join("logs")
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Publish every added quote to `endpoint`.
    #[serde(default)]
    pub post_on_add: bool,
    #[serde(default)]
    pub payload_mode: PayloadMode,
    /// Max quotes taken from a decoded payload.
    #[serde(default = "default_payload_limit")]
    pub payload_limit: usize,
    /// Quotes treated as the server's copy in `substitute` mode.
    #[serde(default = "default_server_quotes")]
    pub server_quotes: Vec<Quote>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            interval_secs: default_interval_secs(),
            timeout_secs: default_timeout_secs(),
            post_on_add: false,
            payload_mode: PayloadMode::default(),
            payload_limit: default_payload_limit(),
            server_quotes: default_server_quotes(),
        }
    }
}

fn default_endpoint() -> String {
    "https://jsonplaceholder.typicode.com/posts".to_string()
}

fn default_interval_secs() -> u64 {
    60
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_payload_limit() -> usize {
    5
}

fn default_server_quotes() -> Vec<Quote> {
    [
        ("Believe in yourself.", "Inspiration"),
        ("Simplicity is the soul of efficiency.", "Tech"),
        ("Progress, not perfection.", "Motivation"),
    ]
    .into_iter()
    .map(|(text, category)| Quote {
        text: text.to_string(),
        category: category.to_string(),
    })
    .collect()
}
