//! Domain services for geofence analytics.
//!
//! Services contain the aggregation logic that derives analytics views from
//! an immutable [`AnalyticsSnapshot`]. Every service is a pure function of
//! the snapshot and an [`EvaluationClock`]; nothing is cached between passes.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{AnalyticsRequest, Device, Location, ProximityEvent};

pub mod bucketing;
pub mod clock;
pub mod dashboard;
pub mod dwell_time;
pub mod filter;
pub mod metrics;
pub mod occupancy;
pub mod trends;

pub use bucketing::{daily_event_counts, hourly_activity};
pub use clock::EvaluationClock;
pub use dashboard::build_dashboard;
pub use dwell_time::{compute_time_analysis, match_visits, Visit};
pub use filter::{filter_events, search_events};
pub use metrics::{
    compute_device_stats, compute_event_stats, compute_location_stats, compute_metrics,
    enter_exit_ratio, event_distribution,
};
pub use occupancy::{latest_event, resolve_device_activity, resolve_location_status};
pub use trends::{change_percentage, compare_periods, filter_by_range, RangeWindows};

/// Borrowed view over the reference tables and event log of one pass.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsSnapshot<'a> {
    pub locations: &'a [Location],
    pub devices: &'a [Device],
    pub events: &'a [ProximityEvent],
}

impl<'a> AnalyticsSnapshot<'a> {
    pub fn new(
        locations: &'a [Location],
        devices: &'a [Device],
        events: &'a [ProximityEvent],
    ) -> Self {
        Self {
            locations,
            devices,
            events,
        }
    }

    /// Events grouped by `home_location_id`, each group in input order.
    pub fn events_by_location(&self) -> HashMap<Uuid, Vec<&'a ProximityEvent>> {
        let mut grouped: HashMap<Uuid, Vec<&'a ProximityEvent>> = HashMap::new();
        for event in self.events {
            grouped.entry(event.home_location_id).or_default().push(event);
        }
        grouped
    }

    /// Events grouped by `device_id`, each group in input order.
    ///
    /// Events without a device are left out.
    pub fn events_by_device(&self) -> HashMap<Uuid, Vec<&'a ProximityEvent>> {
        let mut grouped: HashMap<Uuid, Vec<&'a ProximityEvent>> = HashMap::new();
        for event in self.events {
            if let Some(device_id) = event.device_id {
                grouped.entry(device_id).or_default().push(event);
            }
        }
        grouped
    }
}

impl<'a> From<&'a AnalyticsRequest> for AnalyticsSnapshot<'a> {
    fn from(request: &'a AnalyticsRequest) -> Self {
        Self::new(&request.locations, &request.devices, &request.events)
    }
}
