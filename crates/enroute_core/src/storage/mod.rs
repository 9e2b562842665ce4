//! Key-value persistence adapter.
//!
//! # Responsibility
//! - Define the text key-value contract used by every store (`KeyValueStore`).
//! - Layer JSON encoding with best-effort semantics on top (`Persistence`).
//!
//! # Invariants
//! - `Persistence::read` never fails: unreadable or malformed content is
//!   reported as absent and the caller-provided fallback is returned.
//! - `Persistence::write` never fails: backend errors are logged and dropped.
//!   In-memory copies held by callers may diverge from persisted state until
//!   the next successful write.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

mod memory;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by key-value backends and by [`Persistence::try_write`].
#[derive(Debug)]
pub enum StorageError {
    /// Write would grow the store past its byte quota.
    QuotaExceeded {
        key: String,
        required_bytes: usize,
        quota_bytes: usize,
    },
    Sqlite(rusqlite::Error),
    /// The SQLite file was written by a newer schema than this build knows.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    Encode(serde_json::Error),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded {
                key,
                required_bytes,
                quota_bytes,
            } => write!(
                f,
                "storage quota exceeded writing `{key}`: {required_bytes} bytes needed, quota is {quota_bytes}"
            ),
            Self::Sqlite(err) => write!(f, "sqlite storage failed: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "storage file has schema version {db_version}; this build reads up to {latest_supported}"
            ),
            Self::Encode(err) => write!(f, "failed to encode value: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::QuotaExceeded { .. } | Self::UnsupportedSchemaVersion { .. } => None,
            Self::Sqlite(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Text key-value backend, shaped after browser local storage.
///
/// Methods take `&self`; backends use interior mutability so one backend can
/// be shared by several stores through [`Persistence`].
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// Shared JSON view over one [`KeyValueStore`].
#[derive(Clone)]
pub struct Persistence {
    backend: Rc<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Rc::new(backend),
        }
    }

    /// Wraps a backend the caller keeps a handle to (tests poke raw text this way).
    pub fn from_shared(backend: Rc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Volatile persistence, mainly for tests and throwaway sessions.
    pub fn in_memory() -> Self {
        Self::new(MemoryKeyValueStore::new())
    }

    /// Reads and decodes `key`, returning `fallback` for every failure mode.
    pub fn read<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        self.read_existing(key).unwrap_or(fallback)
    }

    /// Reads and decodes `key`.
    ///
    /// Returns `None` when the key is absent, blank, unreadable, or holds
    /// content that does not decode into `T`.
    pub fn read_existing<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!("event=kv_read module=storage status=error key={key} error={err}");
                return None;
            }
        };
        if raw.trim().is_empty() {
            return None;
        }

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(
                    "event=kv_read module=storage status=malformed key={key} bytes={} error={err}",
                    raw.len()
                );
                None
            }
        }
    }

    /// Encodes and stores `value` under `key`; failures are logged and dropped.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(err) = self.try_write(key, value) {
            warn!("event=kv_write module=storage status=error key={key} error={err}");
        }
    }

    /// Encodes and stores `value` under `key`, surfacing any failure.
    pub fn try_write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let encoded = serde_json::to_string(value)?;
        self.backend.set_item(key, &encoded)?;
        debug!(
            "event=kv_write module=storage status=ok key={key} bytes={}",
            encoded.len()
        );
        Ok(())
    }

    /// Removes `key`; failures are logged and dropped.
    pub fn remove(&self, key: &str) {
        if let Err(err) = self.backend.remove_item(key) {
            warn!("event=kv_remove module=storage status=error key={key} error={err}");
        }
    }
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}
