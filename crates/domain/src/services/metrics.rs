//! Summary counters over a snapshot.

use super::occupancy::{is_active, is_occupied};
use super::{AnalyticsSnapshot, EvaluationClock};
use crate::models::{
    AnalyticsMetrics, DeviceStats, EventDistribution, EventStats, LocationStats, ProximityEvent,
};

/// Chart palette, assigned by location index.
pub const EVENT_COLORS: [&str; 6] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#06b6d4",
];

/// Default number of events returned in [`EventStats::recent_events`].
pub const DEFAULT_RECENT_EVENTS_LIMIT: usize = 5;

/// `enters / exits`, or `enters` when there are no exits.
pub fn enter_exit_ratio(enters: usize, exits: usize) -> f64 {
    if exits > 0 {
        enters as f64 / exits as f64
    } else {
        enters as f64
    }
}

fn count_by_type(events: &[ProximityEvent]) -> (usize, usize) {
    events.iter().fold((0, 0), |(enters, exits), event| {
        (
            enters + usize::from(event.is_enter()),
            exits + usize::from(event.is_exit()),
        )
    })
}

fn count_today(events: &[ProximityEvent], clock: &EvaluationClock) -> usize {
    let today = clock.today_window();
    events
        .iter()
        .filter_map(|event| event.created_at)
        .filter(|at| today.contains(*at))
        .count()
}

fn count_occupied(snapshot: &AnalyticsSnapshot<'_>) -> usize {
    let grouped = snapshot.events_by_location();
    snapshot
        .locations
        .iter()
        .filter(|location| {
            grouped
                .get(&location.id)
                .is_some_and(|events| is_occupied(events.iter().copied()))
        })
        .count()
}

fn count_active_devices(snapshot: &AnalyticsSnapshot<'_>, clock: &EvaluationClock) -> usize {
    let grouped = snapshot.events_by_device();
    snapshot
        .devices
        .iter()
        .filter(|device| {
            grouped
                .get(&device.id)
                .is_some_and(|events| is_active(events.iter().copied(), clock))
        })
        .count()
}

/// Headline counters for the dashboard.
pub fn compute_metrics(snapshot: &AnalyticsSnapshot<'_>, clock: &EvaluationClock) -> AnalyticsMetrics {
    let (total_enters, total_exits) = count_by_type(snapshot.events);

    AnalyticsMetrics {
        today_events: count_today(snapshot.events, clock),
        active_devices: count_active_devices(snapshot, clock),
        occupied_locations: count_occupied(snapshot),
        total_locations: snapshot.locations.len(),
        total_enters,
        total_exits,
        enter_exit_ratio: enter_exit_ratio(total_enters, total_exits),
    }
}

/// Counts over an event list plus its `recent_limit` newest timed events.
pub fn compute_event_stats(
    events: &[ProximityEvent],
    clock: &EvaluationClock,
    recent_limit: usize,
) -> EventStats {
    let (enter_events, exit_events) = count_by_type(events);

    let mut timed: Vec<&ProximityEvent> = events
        .iter()
        .filter(|event| event.created_at.is_some())
        .collect();
    timed.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    EventStats {
        total_events: events.len(),
        today_events: count_today(events, clock),
        enter_events,
        exit_events,
        recent_events: timed.into_iter().take(recent_limit).cloned().collect(),
    }
}

pub fn compute_location_stats(snapshot: &AnalyticsSnapshot<'_>) -> LocationStats {
    let grouped = snapshot.events_by_location();
    let total_locations = snapshot.locations.len();
    let active_locations = snapshot.locations.iter().filter(|l| l.is_active).count();
    let locations_with_events = snapshot
        .locations
        .iter()
        .filter(|l| grouped.contains_key(&l.id))
        .count();

    LocationStats {
        total_locations,
        active_locations,
        inactive_locations: total_locations - active_locations,
        locations_with_events,
        occupied_locations: count_occupied(snapshot),
    }
}

pub fn compute_device_stats(snapshot: &AnalyticsSnapshot<'_>, clock: &EvaluationClock) -> DeviceStats {
    let total_devices = snapshot.devices.len();
    let active_devices = count_active_devices(snapshot, clock);

    DeviceStats {
        total_devices,
        active_devices,
        inactive_devices: total_devices - active_devices,
    }
}

/// Event count per location for pie charts.
///
/// Colors follow the location's position in the supplied list, so a
/// location keeps its color when a neighbour has no events.
pub fn event_distribution(snapshot: &AnalyticsSnapshot<'_>) -> Vec<EventDistribution> {
    let grouped = snapshot.events_by_location();

    snapshot
        .locations
        .iter()
        .enumerate()
        .filter_map(|(index, location)| {
            let value = grouped.get(&location.id).map_or(0, Vec::len);
            (value > 0).then(|| EventDistribution {
                name: location.name.clone(),
                value,
                color: EVENT_COLORS[index % EVENT_COLORS.len()].to_string(),
            })
        })
        .collect()
}
