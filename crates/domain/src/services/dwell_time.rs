//! Enter/exit pairing and dwell-time estimation.
//!
//! Each enter is matched with the earliest exit of the same device at the
//! same location that is strictly later and not yet taken by an earlier
//! enter. Enters are swept in chronological order (input order on ties), so
//! a per-device two-pointer walk over sorted exits yields exactly that
//! greedy matching.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::trace;
use uuid::Uuid;

use super::AnalyticsSnapshot;
use crate::models::{Location, ProximityEvent, ProximityEventType, TimeAnalysis};

/// Minutes each event contributes to the time-outside heuristic.
pub const OUTSIDE_MINUTES_PER_EVENT: i64 = 60;

/// A matched enter/exit pair.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub enter: &'a ProximityEvent,
    pub exit: &'a ProximityEvent,
    /// Whole minutes between enter and exit, truncated.
    pub minutes: i64,
}

#[derive(Debug, Clone, Copy)]
struct Timed<'a> {
    index: usize,
    at: DateTime<Utc>,
    event: &'a ProximityEvent,
}

#[derive(Default)]
struct DeviceCrossings<'a> {
    enters: Vec<Timed<'a>>,
    exits: Vec<Timed<'a>>,
}

/// Pair enters with exits among the events of a single location.
///
/// Events without a timestamp take no part in pairing. Events without a
/// device are paired with each other.
pub fn match_visits<'a>(location_events: &[&'a ProximityEvent]) -> Vec<Visit<'a>> {
    let mut by_device: BTreeMap<Option<Uuid>, DeviceCrossings<'a>> = BTreeMap::new();

    for (index, event) in location_events.iter().copied().enumerate() {
        let Some(at) = event.created_at else {
            trace!(event_id = %event.id, "Skipping untimed event in pairing");
            continue;
        };
        let timed = Timed { index, at, event };
        let crossings = by_device.entry(event.device_id).or_default();
        match event.event_type {
            ProximityEventType::Enter => crossings.enters.push(timed),
            ProximityEventType::Exit => crossings.exits.push(timed),
            ProximityEventType::Unknown => {}
        }
    }

    let mut visits = Vec::new();
    for crossings in by_device.values_mut() {
        crossings.enters.sort_by_key(|t| (t.at, t.index));
        crossings.exits.sort_by_key(|t| (t.at, t.index));

        let mut next_exit = 0;
        for enter in &crossings.enters {
            // Exits at or before this enter can't match any later enter either.
            while next_exit < crossings.exits.len() && crossings.exits[next_exit].at <= enter.at {
                next_exit += 1;
            }
            let Some(exit) = crossings.exits.get(next_exit) else {
                break;
            };
            visits.push(Visit {
                enter: enter.event,
                exit: exit.event,
                minutes: exit.at.signed_duration_since(enter.at).num_minutes(),
            });
            next_exit += 1;
        }
    }

    visits
}

/// Estimate time inside and outside for every location with events.
///
/// Output follows the order of `snapshot.locations`; locations without
/// events are left out, as are events whose location is unknown.
pub fn compute_time_analysis(snapshot: &AnalyticsSnapshot<'_>) -> Vec<TimeAnalysis> {
    let grouped = snapshot.events_by_location();

    snapshot
        .locations
        .iter()
        .filter_map(|location| {
            let events = grouped.get(&location.id)?;
            Some(analyze_location(location, events))
        })
        .collect()
}

fn analyze_location(location: &Location, events: &[&ProximityEvent]) -> TimeAnalysis {
    let visits = match_visits(events);
    let matched = visits.len() as i64;
    let time_inside: i64 = visits.iter().map(|v| v.minutes).sum();
    let total_events = events.len();

    // Heuristic only: not derived from any measured absence.
    let time_outside = if matched > 0 {
        (total_events as i64 * OUTSIDE_MINUTES_PER_EVENT - time_inside).max(0)
    } else {
        0
    };

    let average_stay = if matched > 0 {
        time_inside as f64 / matched as f64
    } else {
        0.0
    };

    TimeAnalysis {
        location: location.name.clone(),
        time_inside,
        time_outside,
        total_events,
        average_stay,
    }
}
