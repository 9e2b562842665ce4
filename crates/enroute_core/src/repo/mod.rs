//! Record stores over the key-value persistence adapter.
//!
//! # Responsibility
//! - Keep one JSON array per record kind under its fixed key.
//! - Publish the kind's change event after every mutation.
//!
//! # Invariants
//! - Store operations never return errors; persistence failures are logged
//!   by `Persistence` and otherwise ignored.
//! - The activities store never holds two equivalent activities.

pub mod record_store;
pub mod sample;
pub mod seed;
