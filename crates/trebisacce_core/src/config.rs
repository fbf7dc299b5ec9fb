//! Runtime settings for the console core.
//!
//! # Responsibility
//! - Load TOML settings with defaults for every field.
//! - Resolve the settings file from `TREBISACCE_CONFIG` when no path is given.
//!
//! # Invariants
//! - `latency.min_ms <= latency.max_ms` after loading.

use crate::logging::default_log_level;
use crate::repo::latency::Latency;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable naming the settings file.
pub const CONFIG_ENV_VAR: &str = "TREBISACCE_CONFIG";

const DEFAULT_DB_FILE: &str = "trebisacce.db";
const DEFAULT_CURRENCY: &str = "ARS";

/// Settings error.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    InvalidLatency { min_ms: u64, max_ms: u64 },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::InvalidLatency { min_ms, max_ms } => write!(
                f,
                "latency.min_ms ({min_ms}) must not exceed latency.max_ms ({max_ms})"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidLatency { .. } => None,
        }
    }
}

/// Simulated latency window in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl From<LatencyConfig> for Latency {
    fn from(value: LatencyConfig) -> Self {
        Latency::between_ms(value.min_ms, value.max_ms)
    }
}

/// Top-level settings document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file holding the key-value store.
    pub db_path: PathBuf,
    /// Absolute directory for rotated log files. Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
    /// Write demo rows the first time a list is read.
    pub seed_demo_data: bool,
    /// Currency assigned to new accounts that do not name one.
    pub default_currency: String,
    pub latency: LatencyConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            log_dir: None,
            log_level: default_log_level().to_string(),
            seed_demo_data: true,
            default_currency: DEFAULT_CURRENCY.to_string(),
            latency: LatencyConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, else the file named by `TREBISACCE_CONFIG`,
    /// else defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(value) if !value.is_empty() => Self::load(Path::new(&value)),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_env_or_default() -> Result<Self, ConfigError> {
        Self::resolve(None)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.latency.min_ms > self.latency.max_ms {
            return Err(ConfigError::InvalidLatency {
                min_ms: self.latency.min_ms,
                max_ms: self.latency.max_ms,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use std::io::Write;
    use std::path::PathBuf;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let file = write_config("db_path = \"/tmp/console.db\"\n");
        let config = AppConfig::load(file.path()).unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/console.db"));
        assert!(config.seed_demo_data);
        assert_eq!(config.default_currency, "ARS");
        assert_eq!(config.latency.max_ms, 0);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn latency_window_is_parsed() {
        let file = write_config("seed_demo_data = false\n[latency]\nmin_ms = 300\nmax_ms = 500\n");
        let config = AppConfig::load(file.path()).unwrap();

        assert!(!config.seed_demo_data);
        assert_eq!(config.latency.min_ms, 300);
        assert_eq!(config.latency.max_ms, 500);
    }

    #[test]
    fn reversed_latency_window_is_rejected() {
        let file = write_config("[latency]\nmin_ms = 500\nmax_ms = 300\n");
        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidLatency {
                min_ms: 500,
                max_ms: 300
            }
        ));
    }

    #[test]
    fn malformed_toml_reports_path() {
        let file = write_config("db_path = [\n");
        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("failed to parse config"));
    }
}
