//! Catalog: the three record stores sharing one persistence handle and bus.
//!
//! # Invariants
//! - All stores of one catalog read and write the same backend.
//! - Every mutation publishes on the catalog's bus, so subscribers registered
//!   through any store or through `bus()` observe it.

use crate::config::{CoreConfig, StorageConfig};
use crate::events::EventBus;
use crate::model::activity::Activity;
use crate::model::booking::Booking;
use crate::model::payout::Payout;
use crate::model::RecordKind;
use crate::repo::record_store::RecordStore;
use crate::repo::sample::SampleRequest;
use crate::storage::{Persistence, SqliteKeyValueStore, StorageResult};
use log::info;
use rand::Rng;

pub struct Catalog {
    persistence: Persistence,
    bus: EventBus,
    activities: RecordStore<Activity>,
    bookings: RecordStore<Booking>,
    payouts: RecordStore<Payout>,
}

impl Catalog {
    pub fn new(persistence: Persistence, bus: EventBus) -> Self {
        Self {
            activities: RecordStore::new(persistence.clone(), bus.clone()),
            bookings: RecordStore::new(persistence.clone(), bus.clone()),
            payouts: RecordStore::new(persistence.clone(), bus.clone()),
            persistence,
            bus,
        }
    }

    /// Catalog over volatile storage with a private bus.
    pub fn in_memory() -> Self {
        Self::new(Persistence::in_memory(), EventBus::new())
    }

    /// Opens the backend selected by `config.storage`.
    ///
    /// # Errors
    /// - Returns an error when the SQLite file cannot be opened or migrated.
    pub fn open(config: &CoreConfig) -> StorageResult<Self> {
        let persistence = match &config.storage {
            StorageConfig::Memory => Persistence::in_memory(),
            StorageConfig::Sqlite { path } => Persistence::new(SqliteKeyValueStore::open(path)?),
        };
        info!(
            "event=catalog_open module=service status=ok backend={}",
            config.storage.backend_name()
        );
        Ok(Self::new(persistence, EventBus::new()))
    }

    pub fn activities(&self) -> &RecordStore<Activity> {
        &self.activities
    }

    pub fn bookings(&self) -> &RecordStore<Booking> {
        &self.bookings
    }

    pub fn payouts(&self) -> &RecordStore<Payout> {
        &self.payouts
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    /// Generates sample bookings and payouts per `request`.
    pub fn seed_sample(&self, request: &SampleRequest) {
        self.seed_sample_with_rng(&mut rand::thread_rng(), request);
    }

    /// Same as [`Catalog::seed_sample`] with a caller-provided RNG.
    ///
    /// Bookings link to activities from `activities().list()`, which seeds the
    /// demo set on first use. Both change events fire even for zero counts.
    pub fn seed_sample_with_rng(&self, rng: &mut impl Rng, request: &SampleRequest) {
        let activities = self.activities.list();
        self.bookings
            .seed_sample(rng, &activities, request.bookings, request.replace);
        self.payouts
            .seed_sample(rng, request.payouts, request.replace);
    }

    /// Resolves a booking's weak activity reference.
    ///
    /// Returns `None` when the booking has no `activity_id` or the activity no
    /// longer exists.
    pub fn activity_for(&self, booking: &Booking) -> Option<Activity> {
        let activity_id = booking.activity_id.as_deref()?;
        self.activities.get(activity_id)
    }

    /// Drops every stored record and publishes all change events.
    ///
    /// The next activities `list()` writes the demo seed again.
    pub fn reset_all(&self) {
        for kind in RecordKind::ALL {
            self.persistence.remove(kind.storage_key());
        }
        info!("event=catalog_reset module=service status=ok");
        for kind in RecordKind::ALL {
            self.bus.publish(kind.change_event());
        }
    }
}
