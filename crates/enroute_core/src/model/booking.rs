//! Booking record and its normalizer.
//!
//! `activity_id` is a weak reference: it may name an activity that no longer
//! exists, and nothing checks it on write. Resolve it with
//! `Catalog::activity_for`.

use super::coerce::{loose_number, non_blank, non_negative};
use super::id::{deserialize_loose_id, keep_or_generate};
use super::timestamp::{iso_millis, parse_loose_timestamp, timestamp_or_now};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_ACTIVITY_NAME: &str = "Activity";
pub const DEFAULT_CUSTOMER_NAME: &str = "Customer";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    #[serde(default)]
    pub activity_id: Option<String>,
    pub activity_name: String,
    pub customer_name: String,
    pub quantity: u32,
    pub amount: f64,
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,
}

impl Booking {
    /// Calendar day of the booking (UTC).
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingInput {
    #[serde(deserialize_with = "deserialize_loose_id")]
    pub id: Option<String>,
    pub activity_id: Option<String>,
    #[serde(alias = "activity")]
    pub activity_name: Option<String>,
    pub customer_name: Option<String>,
    pub quantity: Option<Value>,
    pub amount: Option<Value>,
    pub date: Option<Value>,
    /// Wall-clock time (`HH:MM`) completing a date-only `date`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl BookingInput {
    pub fn for_activity(activity_id: impl Into<String>, activity_name: impl Into<String>) -> Self {
        Self {
            activity_id: Some(activity_id.into()),
            activity_name: Some(activity_name.into()),
            ..Self::default()
        }
    }

    pub fn with_customer(mut self, customer_name: impl Into<String>) -> Self {
        self.customer_name = Some(customer_name.into());
        self
    }

    pub fn with_quantity(mut self, quantity: impl Into<Value>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }

    pub fn with_amount(mut self, amount: impl Into<Value>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<Value>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }
}

/// Builds a canonical booking; quantity is at least 1 and a missing or
/// unparsable date becomes `now`.
pub fn normalize_booking(input: &BookingInput, now: DateTime<Utc>) -> Booking {
    Booking {
        id: keep_or_generate(input.id.as_deref(), now),
        activity_id: non_blank(input.activity_id.as_deref()).map(str::to_string),
        activity_name: non_blank(input.activity_name.as_deref())
            .unwrap_or(DEFAULT_ACTIVITY_NAME)
            .to_string(),
        customer_name: non_blank(input.customer_name.as_deref())
            .unwrap_or(DEFAULT_CUSTOMER_NAME)
            .to_string(),
        quantity: coerce_quantity(input.quantity.as_ref()),
        amount: non_negative(input.amount.as_ref()),
        date: booking_date(input, now),
    }
}

/// `date` joined with `time` when both are text, else `date` alone.
fn booking_date(input: &BookingInput, now: DateTime<Utc>) -> DateTime<Utc> {
    if let (Some(Value::String(day)), Some(time)) =
        (input.date.as_ref(), non_blank(input.time.as_deref()))
    {
        let joined = Value::String(format!("{}T{}", day.trim(), time.trim()));
        if let Some(date) = parse_loose_timestamp(&joined) {
            return date;
        }
    }
    timestamp_or_now(input.date.as_ref(), now)
}

fn coerce_quantity(value: Option<&Value>) -> u32 {
    let Some(quantity) = loose_number(value).map(f64::trunc) else {
        return 1;
    };
    if quantity < 1.0 {
        1
    } else {
        // Float-to-int `as` saturates at u32::MAX.
        quantity as u32
    }
}
