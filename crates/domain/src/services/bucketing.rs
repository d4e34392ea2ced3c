//! Hour-of-day histogram and daily event series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use shared::time::{format_day_key, format_day_label, format_hour_label};

use super::EvaluationClock;
use crate::models::{DailyEventCount, HourlyActivity, ProximityEvent, ProximityEventType};

/// Number of buckets in the hour-of-day histogram.
pub const HOURS_PER_DAY: usize = 24;

/// Dense 24-bucket histogram of events by local hour of day.
///
/// Untimed events are left out. Events of unknown type count toward
/// `total` only.
pub fn hourly_activity<'a, I>(events: I, clock: &EvaluationClock) -> Vec<HourlyActivity>
where
    I: IntoIterator<Item = &'a ProximityEvent>,
{
    let mut buckets: Vec<HourlyActivity> = (0..HOURS_PER_DAY as u32)
        .map(|hour| HourlyActivity {
            hour: format_hour_label(hour),
            enters: 0,
            exits: 0,
            total: 0,
        })
        .collect();

    for event in events {
        let Some(created_at) = event.created_at else {
            continue;
        };
        let bucket = &mut buckets[clock.local_hour(created_at) as usize];
        match event.event_type {
            ProximityEventType::Enter => bucket.enters += 1,
            ProximityEventType::Exit => bucket.exits += 1,
            ProximityEventType::Unknown => {}
        }
        bucket.total += 1;
    }

    buckets
}

/// Sparse per-day counts keyed by local calendar day, ascending.
pub fn daily_event_counts<'a, I>(events: I, clock: &EvaluationClock) -> Vec<DailyEventCount>
where
    I: IntoIterator<Item = &'a ProximityEvent>,
{
    // ISO keys order the same as the dates they encode.
    let mut days: BTreeMap<String, (NaiveDate, usize)> = BTreeMap::new();

    for event in events {
        let Some(created_at) = event.created_at else {
            continue;
        };
        let date = clock.local_date(created_at);
        days.entry(format_day_key(date)).or_insert((date, 0)).1 += 1;
    }

    days.into_iter()
        .map(|(full_date, (date, events))| DailyEventCount {
            date: format_day_label(date),
            events,
            full_date,
        })
        .collect()
}
