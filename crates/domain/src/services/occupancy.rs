//! Point-in-time occupancy and activity state.
//!
//! State is derived with most-recent-event-wins semantics: the timed event
//! with the greatest `created_at` decides. Ties go to the earliest event in
//! input order.

use shared::time::format_datetime_label;

use super::{AnalyticsSnapshot, EvaluationClock};
use crate::models::{DeviceActivity, DeviceStatus, LocationStatus, ProximityEvent};

/// `last_active` label for devices with no timed event.
pub const NEVER_ACTIVE_LABEL: &str = "never";

/// Most recent timed event; untimed events never win.
pub fn latest_event<'a, I>(events: I) -> Option<&'a ProximityEvent>
where
    I: IntoIterator<Item = &'a ProximityEvent>,
{
    let mut latest: Option<&'a ProximityEvent> = None;
    for event in events {
        let Some(at) = event.created_at else {
            continue;
        };
        match latest.and_then(|current| current.created_at) {
            Some(best) if at <= best => {}
            _ => latest = Some(event),
        }
    }
    latest
}

/// A location is occupied iff its most recent event is an enter.
pub fn is_occupied<'a, I>(events: I) -> bool
where
    I: IntoIterator<Item = &'a ProximityEvent>,
{
    latest_event(events).is_some_and(ProximityEvent::is_enter)
}

/// A device is active iff its most recent event happened in the last 24 hours.
pub fn is_active<'a, I>(events: I, clock: &EvaluationClock) -> bool
where
    I: IntoIterator<Item = &'a ProximityEvent>,
{
    latest_event(events)
        .and_then(|event| event.created_at)
        .is_some_and(|at| clock.is_recent(at))
}

/// Number of timed events in the trailing 24 hours.
pub fn recent_events_count<'a, I>(events: I, clock: &EvaluationClock) -> usize
where
    I: IntoIterator<Item = &'a ProximityEvent>,
{
    events
        .into_iter()
        .filter_map(|event| event.created_at)
        .filter(|at| clock.is_recent(*at))
        .count()
}

/// Occupancy and freshness for every supplied location, in input order.
pub fn resolve_location_status(
    snapshot: &AnalyticsSnapshot<'_>,
    clock: &EvaluationClock,
) -> Vec<LocationStatus> {
    let grouped = snapshot.events_by_location();

    snapshot
        .locations
        .iter()
        .map(|location| {
            let events = grouped.get(&location.id).map(Vec::as_slice).unwrap_or_default();
            let latest = latest_event(events.iter().copied());

            LocationStatus {
                location_id: location.id,
                name: location.name.clone(),
                is_active: location.is_active,
                is_currently_occupied: latest.is_some_and(ProximityEvent::is_enter),
                recent_events_count: recent_events_count(events.iter().copied(), clock),
                last_event_time: latest.and_then(|event| event.created_at),
            }
        })
        .collect()
}

/// Activity summary per device, busiest first.
pub fn resolve_device_activity(
    snapshot: &AnalyticsSnapshot<'_>,
    clock: &EvaluationClock,
) -> Vec<DeviceActivity> {
    let grouped = snapshot.events_by_device();

    let mut activity: Vec<DeviceActivity> = snapshot
        .devices
        .iter()
        .map(|device| {
            let events = grouped.get(&device.id).map(Vec::as_slice).unwrap_or_default();
            let latest = latest_event(events.iter().copied());
            let last_active_at = latest.and_then(|event| event.created_at);

            let status = if last_active_at.is_some_and(|at| clock.is_recent(at)) {
                DeviceStatus::Active
            } else {
                DeviceStatus::Inactive
            };

            DeviceActivity {
                device_id: device.id,
                device: device.name.clone(),
                events: events.len(),
                last_active: last_active_at
                    .map(|at| format_datetime_label(at, clock.offset()))
                    .unwrap_or_else(|| NEVER_ACTIVE_LABEL.to_string()),
                last_active_at,
                status,
                current_location: latest
                    .filter(|event| event.is_enter())
                    .map(|event| event.home_location_name.clone()),
            }
        })
        .collect();

    // Stable: devices with equal counts keep input order.
    activity.sort_by(|a, b| b.events.cmp(&a.events));
    activity
}
