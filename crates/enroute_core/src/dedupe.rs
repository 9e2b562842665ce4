//! Identity keys and first-occurrence deduplication.
//!
//! The identity key of a record is its id when one is present, otherwise the
//! composite `"{name}|{price}"`. `|` does not occur in generated ids, and a
//! price renders as JSON would print it (`1200`, `1.5`).

use crate::model::activity::{Activity, ActivityInput};
use crate::model::booking::Booking;
use crate::model::coerce::non_negative;
use crate::model::payout::Payout;
use crate::model::timestamp::to_iso_millis;
use std::collections::HashSet;

const KEY_SEPARATOR: char = '|';

/// Anything that can be keyed for deduplication.
pub trait Identified {
    /// Explicit id, if the record carries one.
    fn record_id(&self) -> Option<&str>;

    /// Composite fallback used when no id is present.
    fn signature(&self) -> String;

    fn identity_key(&self) -> String {
        match self.record_id() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => self.signature(),
        }
    }
}

/// Free-function form of [`Identified::identity_key`].
pub fn identity_key(record: &impl Identified) -> String {
    record.identity_key()
}

/// Keeps the first occurrence of every identity key, preserving input order.
pub fn dedupe<T: Identified>(records: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.identity_key()))
        .collect()
}

fn composite(name: &str, number: f64) -> String {
    format!("{name}{KEY_SEPARATOR}{number}")
}

impl Identified for Activity {
    fn record_id(&self) -> Option<&str> {
        Some(self.id.as_str())
    }

    fn signature(&self) -> String {
        composite(&self.name, self.price)
    }
}

impl Identified for ActivityInput {
    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn signature(&self) -> String {
        let name = self.name.as_deref().unwrap_or_default().trim();
        composite(name, non_negative(self.price.as_ref()))
    }
}

impl Identified for Booking {
    fn record_id(&self) -> Option<&str> {
        Some(self.id.as_str())
    }

    fn signature(&self) -> String {
        format!(
            "{}{KEY_SEPARATOR}{}",
            composite(&self.activity_name, self.amount),
            to_iso_millis(&self.date)
        )
    }
}

impl Identified for Payout {
    fn record_id(&self) -> Option<&str> {
        Some(self.id.as_str())
    }

    fn signature(&self) -> String {
        format!(
            "{}{KEY_SEPARATOR}{}",
            composite(self.status.as_str(), self.amount),
            to_iso_millis(&self.date)
        )
    }
}
