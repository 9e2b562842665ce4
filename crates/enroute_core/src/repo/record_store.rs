//! Generic record store.

use crate::dedupe::{dedupe, Identified};
use crate::events::{EventBus, Subscription};
use crate::model::activity::{normalize_activity, Activity, ActivityInput};
use crate::model::booking::{normalize_booking, Booking, BookingInput};
use crate::model::payout::{normalize_payout, Payout, PayoutInput};
use crate::model::RecordKind;
use crate::repo::seed::demo_activities;
use crate::storage::Persistence;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::marker::PhantomData;

/// Per-kind behavior plugged into [`RecordStore`].
pub trait StoredRecord: Identified + Clone + Serialize + DeserializeOwned {
    /// Loose input accepted by `add`; also the fallback shape for stored
    /// elements that do not decode as `Self`.
    type Input: DeserializeOwned;

    const KIND: RecordKind;

    fn normalize(input: &Self::Input, now: DateTime<Utc>) -> Self;

    /// Converts one stored array element that failed the canonical decode.
    ///
    /// Returns `None` when the element cannot be read even as loose input.
    fn from_loose(value: &Value, now: DateTime<Utc>) -> Option<Self> {
        <Self::Input as Deserialize<'_>>::deserialize(value)
            .ok()
            .map(|input| Self::normalize(&input, now))
    }

    /// Records persisted and returned when nothing valid is stored yet.
    fn initial_seed() -> Option<Vec<Self>> {
        None
    }

    /// Places `record` into `records`. Returns `false` when the record was
    /// rejected and `records` is unchanged. Default: newest first.
    fn insert(records: &mut Vec<Self>, record: Self) -> bool {
        records.insert(0, record);
        true
    }
}

/// One record collection persisted under `R::KIND.storage_key()`.
pub struct RecordStore<R: StoredRecord> {
    persistence: Persistence,
    bus: EventBus,
    _record: PhantomData<fn() -> R>,
}

impl<R: StoredRecord> RecordStore<R> {
    pub fn new(persistence: Persistence, bus: EventBus) -> Self {
        Self {
            persistence,
            bus,
            _record: PhantomData,
        }
    }

    pub fn kind(&self) -> RecordKind {
        R::KIND
    }

    /// Returns the persisted records.
    ///
    /// When nothing usable is stored (absent key, invalid JSON or a value that
    /// is not an array) a kind with an initial seed persists and returns it;
    /// other kinds return an empty list. A stored empty list is returned as is.
    ///
    /// Array elements that do not match the canonical shape are read as loose
    /// input and normalized; elements unreadable even that way are dropped.
    /// Either repair is written back so later reads see stable ids.
    pub fn list(&self) -> Vec<R> {
        let key = R::KIND.storage_key();
        if let Some(stored) = self.persistence.read_existing::<Vec<Value>>(key) {
            return self.recover(stored);
        }

        match R::initial_seed() {
            Some(seed) => {
                info!(
                    "event=store_seed module=store kind={} count={}",
                    R::KIND.as_str(),
                    seed.len()
                );
                self.persistence.write(key, &seed);
                seed
            }
            None => Vec::new(),
        }
    }

    /// Normalizes `input`, stores it and publishes the change event.
    ///
    /// A record rejected by the kind's insert policy is still returned, but
    /// nothing is written and no event fires.
    pub fn add(&self, input: &R::Input) -> R {
        let record = R::normalize(input, Utc::now());
        let mut records = self.list();

        if !R::insert(&mut records, record.clone()) {
            debug!(
                "event=store_add module=store kind={} status=duplicate key={}",
                R::KIND.as_str(),
                record.identity_key()
            );
            return record;
        }

        self.persistence.write(R::KIND.storage_key(), &records);
        info!(
            "event=store_add module=store kind={} status=ok count={}",
            R::KIND.as_str(),
            records.len()
        );
        self.notify();
        record
    }

    /// Persists an empty list and publishes the change event.
    pub fn clear(&self) {
        self.replace_all(&[]);
        info!("event=store_clear module=store kind={}", R::KIND.as_str());
    }

    /// Registers `handler` for this store's change event.
    pub fn subscribe(&self, handler: impl Fn() + 'static) -> Subscription {
        self.bus.subscribe(R::KIND.change_event(), handler)
    }

    fn recover(&self, stored: Vec<Value>) -> Vec<R> {
        let now = Utc::now();
        let total = stored.len();
        let mut repaired = 0;
        let mut records = Vec::with_capacity(total);
        for value in &stored {
            match R::deserialize(value) {
                Ok(record) => records.push(record),
                Err(_) => {
                    repaired += 1;
                    records.extend(R::from_loose(value, now));
                }
            }
        }

        if repaired > 0 {
            warn!(
                "event=store_repair module=store kind={} repaired={repaired} dropped={}",
                R::KIND.as_str(),
                total - records.len()
            );
            self.persistence.write(R::KIND.storage_key(), &records);
        }
        records
    }

    pub(crate) fn replace_all(&self, records: &[R]) {
        self.persistence.write(R::KIND.storage_key(), records);
        self.notify();
    }

    fn notify(&self) {
        self.bus.publish(R::KIND.change_event());
    }
}

impl RecordStore<Activity> {
    pub fn get(&self, id: &str) -> Option<Activity> {
        self.list().into_iter().find(|activity| activity.id == id)
    }

    /// Distinct non-empty categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.list()
            .into_iter()
            .map(|activity| activity.category)
            .filter(|category| !category.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl StoredRecord for Activity {
    type Input = ActivityInput;

    const KIND: RecordKind = RecordKind::Activities;

    fn normalize(input: &ActivityInput, now: DateTime<Utc>) -> Self {
        normalize_activity(input, now)
    }

    fn initial_seed() -> Option<Vec<Self>> {
        Some(demo_activities())
    }

    /// Appends unless an equivalent activity is already stored.
    fn insert(records: &mut Vec<Self>, record: Self) -> bool {
        if records.iter().any(|existing| existing.is_equivalent(&record)) {
            return false;
        }
        records.push(record);
        *records = dedupe(std::mem::take(records));
        true
    }
}

impl StoredRecord for Booking {
    type Input = BookingInput;

    const KIND: RecordKind = RecordKind::Bookings;

    fn normalize(input: &BookingInput, now: DateTime<Utc>) -> Self {
        normalize_booking(input, now)
    }
}

impl StoredRecord for Payout {
    type Input = PayoutInput;

    const KIND: RecordKind = RecordKind::Payouts;

    fn normalize(input: &PayoutInput, now: DateTime<Utc>) -> Self {
        normalize_payout(input, now)
    }
}
