//! Payout record and its normalizer.

use super::coerce::non_negative;
use super::id::{deserialize_loose_id, keep_or_generate};
use super::timestamp::{iso_millis, timestamp_or_now};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    Paid,
    Pending,
    #[default]
    Scheduled,
}

impl PayoutStatus {
    pub const ALL: [PayoutStatus; 3] = [Self::Paid, Self::Pending, Self::Scheduled];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
        }
    }

    /// Case-insensitive parse; `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "paid" => Some(Self::Paid),
            "pending" => Some(Self::Pending),
            "scheduled" => Some(Self::Scheduled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub id: String,
    pub amount: f64,
    #[serde(default)]
    pub status: PayoutStatus,
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoutInput {
    #[serde(deserialize_with = "deserialize_loose_id")]
    pub id: Option<String>,
    pub amount: Option<Value>,
    pub status: Option<String>,
    pub date: Option<Value>,
}

impl PayoutInput {
    pub fn of_amount(amount: impl Into<Value>) -> Self {
        Self {
            amount: Some(amount.into()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<Value>) -> Self {
        self.date = Some(date.into());
        self
    }
}

/// Builds a canonical payout; unknown statuses fall back to `scheduled`.
pub fn normalize_payout(input: &PayoutInput, now: DateTime<Utc>) -> Payout {
    Payout {
        id: keep_or_generate(input.id.as_deref(), now),
        amount: non_negative(input.amount.as_ref()),
        status: input
            .status
            .as_deref()
            .and_then(PayoutStatus::parse)
            .unwrap_or_default(),
        date: timestamp_or_now(input.date.as_ref(), now),
    }
}
