//! Core of the Enroute activity catalog.
//!
//! A local record store with change notification: activities, bookings and
//! payouts are normalized, deduplicated, persisted as JSON arrays in a
//! key-value backend, and announced on an in-process event bus so every
//! mounted view can re-fetch.

pub mod config;
pub mod db;
pub mod dedupe;
pub mod events;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use config::{ConfigError, CoreConfig, LoggingConfig, StorageConfig};
pub use dedupe::{dedupe, identity_key, Identified};
pub use events::{EventBus, Subscription, ACTIVITIES_CHANGED, BOOKINGS_CHANGED, PAYOUTS_CHANGED};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::activity::{normalize_activity, placeholder_image_url, Activity, ActivityInput};
pub use model::booking::{normalize_booking, Booking, BookingInput};
pub use model::payout::{normalize_payout, Payout, PayoutInput, PayoutStatus};
pub use model::RecordKind;
pub use repo::record_store::{RecordStore, StoredRecord};
pub use repo::sample::SampleRequest;
pub use service::catalog::Catalog;
pub use service::newsletter::{NewsletterError, NewsletterList};
pub use service::search::{paginate, search_activities, ActivityQuery, Page, SortKey};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, Persistence, SqliteKeyValueStore, StorageError,
    StorageResult,
};

/// Minimal health-check API for host wiring.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
