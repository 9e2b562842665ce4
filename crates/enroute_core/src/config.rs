//! Core configuration.
//!
//! # Responsibility
//! - Describe which storage backend to open, how to log and the default
//!   sample-seeding request.
//! - Load it from a JSON file where every field is optional.
//!
//! # Invariants
//! - Unknown fields are rejected so typos do not silently fall back to defaults.
//! - `validate()` runs on every load path.

use crate::logging::{default_log_level, normalize_level};
use crate::repo::sample::SampleRequest;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config JSON: {err}"),
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

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Key-value backend selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    #[default]
    Memory,
    Sqlite {
        path: PathBuf,
    },
}

impl StorageConfig {
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite { .. } => "sqlite",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    /// File logging is skipped when unset. Must be absolute when set.
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

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub sample: SampleRequest,
}

impl CoreConfig {
    /// Reads and validates the JSON config at `path`.
    ///
    /// # Errors
    /// - Returns `Io` when the file cannot be read.
    /// - Returns `Parse` / `Invalid` as for [`CoreConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parses and validates a JSON config document.
    ///
    /// # Errors
    /// - Returns `Parse` for malformed JSON or unknown fields.
    /// - Returns `Invalid` when [`CoreConfig::validate`] fails.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        normalize_level(&self.logging.level)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;

        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logging.dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }

        if let StorageConfig::Sqlite { path } = &self.storage {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(
                    "storage.path cannot be empty for the sqlite backend".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, StorageConfig};
    use std::path::PathBuf;

    #[test]
    fn empty_document_yields_defaults() {
        let config = CoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.storage, StorageConfig::Memory);
        assert_eq!(config.sample.bookings, 8);
        assert_eq!(config.sample.payouts, 3);
    }

    #[test]
    fn parses_sqlite_backend_and_sample_overrides() {
        let config = CoreConfig::from_json_str(
            r#"{
                "storage": { "backend": "sqlite", "path": "/tmp/enroute.sqlite3" },
                "logging": { "level": "WARN" },
                "sample": { "bookings": 10, "payouts": 0, "replace": true }
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.storage,
            StorageConfig::Sqlite {
                path: PathBuf::from("/tmp/enroute.sqlite3")
            }
        );
        assert_eq!(config.sample.bookings, 10);
        assert!(config.sample.replace);
    }

    #[test]
    fn rejects_unknown_fields_and_bad_values() {
        let unknown = CoreConfig::from_json_str(r#"{ "storge": {} }"#).unwrap_err();
        assert!(matches!(unknown, ConfigError::Parse(_)));

        let level = CoreConfig::from_json_str(r#"{ "logging": { "level": "loud" } }"#).unwrap_err();
        assert!(matches!(level, ConfigError::Invalid(_)));

        let dir = CoreConfig::from_json_str(r#"{ "logging": { "dir": "logs" } }"#).unwrap_err();
        assert!(dir.to_string().contains("absolute"));
    }
}
