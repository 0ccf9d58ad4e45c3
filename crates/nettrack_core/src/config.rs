//! Tracker configuration.
//!
//! # Responsibility
//! - Load TOML configuration with every field defaulted.
//! - Apply `NETTRACK_*` environment overrides.
//!
//! # Invariants
//! - A loaded configuration has passed `validate()`.

use crate::logging::default_log_level;
use crate::model::FollowupPolicy;
use crate::store::DEFAULT_NAMESPACE;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "NETTRACK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "NETTRACK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "NETTRACK_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "nettrack.sqlite3";
const DEFAULT_HISTORY_CAPACITY: usize = 50;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config syntax: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub followup: FollowupPolicy,
}

/// Where and how the record document is stored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file. Falls back to the system temp directory when unset.
    pub db_path: Option<PathBuf>,
    /// Key the document is stored under.
    pub namespace: String,
    /// Prior states reachable by undo.
    pub history_capacity: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// File logging settings. Logging stays off when `dir` is unset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

impl TrackerConfig {
    /// Parses and validates TOML text.
    pub fn from_toml_str(raw: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Loads `path` when given, otherwise defaults; then applies environment
    /// overrides and validates again.
    pub fn resolve(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies `NETTRACK_*` overrides read through `lookup`. Blank values are
    /// ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        if let Some(path) = read(ENV_DB_PATH) {
            self.storage.db_path = Some(PathBuf::from(path));
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            self.logging.dir = Some(PathBuf::from(dir));
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.storage.namespace.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.namespace cannot be empty".to_string(),
            ));
        }
        if self.followup.default_interval_days == 0 {
            return Err(ConfigError::Invalid(
                "followup.default_interval_days must be positive".to_string(),
            ));
        }
        if let Some((tag, _)) = self
            .followup
            .tag_intervals
            .iter()
            .find(|(_, days)| **days == 0)
        {
            return Err(ConfigError::Invalid(format!(
                "followup.tag_intervals.{tag} must be positive"
            )));
        }
        Ok(())
    }

    /// Effective database path.
    pub fn db_path(&self) -> PathBuf {
        self.storage
            .db_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
    }
}
