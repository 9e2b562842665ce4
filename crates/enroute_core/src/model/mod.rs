//! Canonical records and the normalizers that produce them.
//!
//! # Responsibility
//! - Define the persisted shapes of activities, bookings and payouts.
//! - Turn loosely-shaped caller input into canonical records, coercing
//!   instead of rejecting.
//!
//! # Invariants
//! - Normalization never fails; bad input degrades to documented defaults.
//! - Persisted field names are camelCase (`imageUrl`, `activityId`, ...).

pub mod activity;
pub mod booking;
pub(crate) mod coerce;
pub mod id;
pub mod payout;
pub mod timestamp;

/// The three record collections kept by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    Activities,
    Bookings,
    Payouts,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [Self::Activities, Self::Bookings, Self::Payouts];

    /// Fixed persistence key holding this kind's JSON array.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Activities => "lap_activities",
            Self::Bookings => "lap_bookings",
            Self::Payouts => "lap_payouts",
        }
    }

    /// Payload-less event published after every mutation of this kind.
    pub fn change_event(self) -> &'static str {
        match self {
            Self::Activities => crate::events::ACTIVITIES_CHANGED,
            Self::Bookings => crate::events::BOOKINGS_CHANGED,
            Self::Payouts => crate::events::PAYOUTS_CHANGED,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activities => "activities",
            Self::Bookings => "bookings",
            Self::Payouts => "payouts",
        }
    }
}
