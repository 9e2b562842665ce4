//! Dashboard aggregates over fetched records.

use crate::model::activity::Activity;
use crate::model::booking::Booking;
use crate::model::payout::Payout;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};

pub const TRENDING_WINDOW_DAYS: i64 = 30;
const CALENDAR_CELLS: usize = 42;

/// Highest-rated activities first; ties keep store order.
pub fn featured(activities: &[Activity], limit: usize) -> Vec<Activity> {
    let mut ranked = activities.to_vec();
    ranked.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    ranked.truncate(limit);
    ranked
}

/// Activities ranked by quantity booked for dates in the trailing
/// [`TRENDING_WINDOW_DAYS`], then by rating.
pub fn trending(
    activities: &[Activity],
    bookings: &[Booking],
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<Activity> {
    let since = now - Duration::days(TRENDING_WINDOW_DAYS);
    let mut booked: HashMap<&str, u64> = HashMap::new();
    for booking in bookings.iter().filter(|booking| booking.date >= since) {
        if let Some(activity_id) = booking.activity_id.as_deref() {
            *booked.entry(activity_id).or_default() += u64::from(booking.quantity);
        }
    }

    let mut ranked: Vec<(u64, &Activity)> = activities
        .iter()
        .map(|activity| (booked.get(activity.id.as_str()).copied().unwrap_or(0), activity))
        .collect();
    ranked.sort_by(|(count_a, a), (count_b, b)| {
        count_b
            .cmp(count_a)
            .then_with(|| b.rating.total_cmp(&a.rating))
    });
    ranked
        .into_iter()
        .take(limit)
        .map(|(_, activity)| activity.clone())
        .collect()
}

/// Categories with activity counts, most common first; ties keep first-seen order.
pub fn top_categories(activities: &[Activity], limit: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for category in activities
        .iter()
        .map(|activity| activity.category.as_str())
        .filter(|category| !category.is_empty())
    {
        match counts.iter_mut().find(|(name, _)| name.as_str() == category) {
            Some((_, count)) => *count += 1,
            None => counts.push((category.to_string(), 1)),
        }
    }
    counts.sort_by(|(_, a), (_, b)| b.cmp(a));
    counts.truncate(limit);
    counts
}

/// Bookings grouped by UTC day, preserving list order within a day.
pub fn bookings_by_day(bookings: &[Booking]) -> BTreeMap<NaiveDate, Vec<Booking>> {
    let mut by_day: BTreeMap<NaiveDate, Vec<Booking>> = BTreeMap::new();
    for booking in bookings {
        by_day.entry(booking.day()).or_default().push(booking.clone());
    }
    by_day
}

/// One day in a month calendar view.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// `false` for leading/trailing days of neighbouring months.
    pub in_month: bool,
    pub bookings: Vec<Booking>,
}

/// Six Sunday-first weeks covering the month containing `month`.
pub fn month_grid(
    month: NaiveDate,
    by_day: &BTreeMap<NaiveDate, Vec<Booking>>,
) -> Vec<CalendarCell> {
    let first = month - Duration::days(i64::from(month.day0()));
    let start = first - Duration::days(i64::from(first.weekday().num_days_from_sunday()));

    start
        .iter_days()
        .take(CALENDAR_CELLS)
        .map(|date| CalendarCell {
            date,
            in_month: date.month() == first.month() && date.year() == first.year(),
            bookings: by_day.get(&date).cloned().unwrap_or_default(),
        })
        .collect()
}

pub fn total_payout(payouts: &[Payout]) -> f64 {
    payouts.iter().map(|payout| payout.amount).sum()
}
