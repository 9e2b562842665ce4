//! Use-case services composed over the record stores.
//!
//! # Responsibility
//! - Wire stores, persistence and the event bus into one catalog handle.
//! - Provide read-side helpers views use after re-fetching (search, paging,
//!   dashboard aggregates).

pub mod catalog;
pub mod insights;
pub mod newsletter;
pub mod search;
