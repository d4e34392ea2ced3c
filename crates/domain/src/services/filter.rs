//! Event list filtering for the events table.

use std::collections::HashMap;

use uuid::Uuid;

use super::metrics::compute_event_stats;
use super::{AnalyticsSnapshot, EvaluationClock};
use crate::models::{EventFilter, EventSearchResponse, ProximityEvent};

/// Events matching every criterion set on `filter`, in input order.
///
/// `search` matches case-insensitively against the location name carried
/// on the event and the name of its device, when the device is known.
pub fn filter_events(snapshot: &AnalyticsSnapshot<'_>, filter: &EventFilter) -> Vec<ProximityEvent> {
    let device_names: HashMap<Uuid, &str> = snapshot
        .devices
        .iter()
        .map(|device| (device.id, device.name.as_str()))
        .collect();
    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    snapshot
        .events
        .iter()
        .filter(|event| filter.event_type.map_or(true, |t| event.event_type == t))
        .filter(|event| filter.location_id.map_or(true, |id| event.home_location_id == id))
        .filter(|event| filter.device_id.map_or(true, |id| event.device_id == Some(id)))
        .filter(|event| {
            let Some(needle) = needle.as_deref() else {
                return true;
            };
            let device_name = event
                .device_id
                .and_then(|id| device_names.get(&id).copied())
                .unwrap_or_default();
            event.home_location_name.to_lowercase().contains(needle)
                || device_name.to_lowercase().contains(needle)
        })
        .cloned()
        .collect()
}

/// Filtered events plus statistics over the filtered set.
pub fn search_events(
    snapshot: &AnalyticsSnapshot<'_>,
    filter: &EventFilter,
    clock: &EvaluationClock,
    recent_limit: usize,
) -> EventSearchResponse {
    let events = filter_events(snapshot, filter);
    let stats = compute_event_stats(&events, clock, recent_limit);
    EventSearchResponse { events, stats }
}
