//! SQLite bootstrap for the file-backed key-value adapter.
//!
//! Connections are opened, given a busy timeout and migrated here; failures
//! surface as [`StorageError`](crate::storage::StorageError) so callers see one
//! error type per backend.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - No key-value access happens before migrations succeed.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
