//! Synthetic bookings and payouts for demos.
//!
//! Sample dates sit at 12:00 UTC on a day drawn uniformly from a window
//! around today: bookings -7..=13 days, payouts -14..=13 days.

use crate::model::activity::Activity;
use crate::model::booking::{Booking, DEFAULT_ACTIVITY_NAME};
use crate::model::payout::{Payout, PayoutStatus};
use crate::repo::record_store::RecordStore;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const SAMPLE_CUSTOMERS: [&str; 6] = [
    "A. Sharma",
    "R. Iyer",
    "K. Singh",
    "P. Gupta",
    "N. Rao",
    "S. Das",
];
pub const BOOKING_DAY_OFFSETS: RangeInclusive<i64> = -7..=13;
pub const PAYOUT_DAY_OFFSETS: RangeInclusive<i64> = -14..=13;
const SAMPLE_QUANTITIES: RangeInclusive<u32> = 1..=4;
const SAMPLE_PAYOUT_AMOUNTS: RangeInclusive<u32> = 2000..=9999;
const SAMPLE_HOUR: i64 = 12;

/// How many sample records to generate and whether to discard existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SampleRequest {
    pub bookings: usize,
    pub payouts: usize,
    pub replace: bool,
}

impl Default for SampleRequest {
    fn default() -> Self {
        Self {
            bookings: 8,
            payouts: 3,
            replace: false,
        }
    }
}

/// Generates `count` bookings linked to random entries of `activities`.
///
/// With no activities to link, bookings carry no `activity_id` and a zero
/// amount.
pub fn sample_bookings(
    rng: &mut impl Rng,
    activities: &[Activity],
    count: usize,
    now: DateTime<Utc>,
) -> Vec<Booking> {
    let millis = now.timestamp_millis();
    let mut bookings = Vec::with_capacity(count);
    for index in 0..count {
        let activity = activities.choose(rng);
        let quantity = rng.gen_range(SAMPLE_QUANTITIES);
        let offset_days = rng.gen_range(BOOKING_DAY_OFFSETS);
        let customer = SAMPLE_CUSTOMERS.choose(rng).copied().unwrap_or_default();

        bookings.push(Booking {
            id: format!("{millis}_{index}_b"),
            activity_id: activity.map(|activity| activity.id.clone()),
            activity_name: activity
                .map_or(DEFAULT_ACTIVITY_NAME, |activity| activity.name.as_str())
                .to_string(),
            customer_name: customer.to_string(),
            quantity,
            amount: f64::from(quantity) * activity.map_or(0.0, |activity| activity.price),
            date: midday_after(now, offset_days),
        });
    }
    bookings
}

/// Generates `count` payouts with random amounts and statuses.
pub fn sample_payouts(rng: &mut impl Rng, count: usize, now: DateTime<Utc>) -> Vec<Payout> {
    let millis = now.timestamp_millis();
    let mut payouts = Vec::with_capacity(count);
    for index in 0..count {
        let amount = rng.gen_range(SAMPLE_PAYOUT_AMOUNTS);
        let offset_days = rng.gen_range(PAYOUT_DAY_OFFSETS);
        let status = PayoutStatus::ALL
            .choose(rng)
            .copied()
            .unwrap_or_default();

        payouts.push(Payout {
            id: format!("{millis}_{index}_p"),
            amount: f64::from(amount),
            status,
            date: midday_after(now, offset_days),
        });
    }
    payouts
}

fn midday_after(now: DateTime<Utc>, offset_days: i64) -> DateTime<Utc> {
    let day = now.date_naive() + Duration::days(offset_days);
    (day.and_time(NaiveTime::MIN) + Duration::hours(SAMPLE_HOUR)).and_utc()
}

/// Newest-generated first, then the records already stored.
fn stack_on<T>(mut generated: Vec<T>, existing: Vec<T>) -> Vec<T> {
    generated.reverse();
    generated.extend(existing);
    generated
}

impl RecordStore<Booking> {
    /// Adds `count` sample bookings, or replaces the list when `replace`.
    ///
    /// Always persists and publishes, even when `count` is zero.
    pub fn seed_sample(
        &self,
        rng: &mut impl Rng,
        activities: &[Activity],
        count: usize,
        replace: bool,
    ) -> Vec<Booking> {
        let generated = sample_bookings(rng, activities, count, Utc::now());
        let existing = if replace { Vec::new() } else { self.list() };
        self.replace_all(&stack_on(generated.clone(), existing));
        info!(
            "event=store_seed_sample module=store kind=bookings count={count} replace={replace}"
        );
        generated
    }
}

impl RecordStore<Payout> {
    /// Adds `count` sample payouts, or replaces the list when `replace`.
    ///
    /// Always persists and publishes, even when `count` is zero.
    pub fn seed_sample(&self, rng: &mut impl Rng, count: usize, replace: bool) -> Vec<Payout> {
        let generated = sample_payouts(rng, count, Utc::now());
        let existing = if replace { Vec::new() } else { self.list() };
        self.replace_all(&stack_on(generated.clone(), existing));
        info!(
            "event=store_seed_sample module=store kind=payouts count={count} replace={replace}"
        );
        generated
    }
}
