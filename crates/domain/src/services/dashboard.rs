//! Single-pass dashboard bundle.

use tracing::debug;

use super::{
    bucketing::hourly_activity, dwell_time::compute_time_analysis, metrics, occupancy,
    trends::filter_by_range, AnalyticsSnapshot, EvaluationClock,
};
use crate::models::{DashboardAnalytics, DateRange};

/// Compute every dashboard view from one snapshot and one clock.
pub fn build_dashboard(
    snapshot: &AnalyticsSnapshot<'_>,
    clock: &EvaluationClock,
    range: DateRange,
    recent_limit: usize,
) -> DashboardAnalytics {
    let dashboard = DashboardAnalytics {
        generated_at: clock.now(),
        metrics: metrics::compute_metrics(snapshot, clock),
        event_stats: metrics::compute_event_stats(snapshot.events, clock, recent_limit),
        location_stats: metrics::compute_location_stats(snapshot),
        device_stats: metrics::compute_device_stats(snapshot, clock),
        time_analysis: compute_time_analysis(snapshot),
        activity: hourly_activity(snapshot.events, clock),
        devices: occupancy::resolve_device_activity(snapshot, clock),
        distribution: metrics::event_distribution(snapshot),
        locations: occupancy::resolve_location_status(snapshot, clock),
        range: filter_by_range(snapshot.events, range, clock),
    };

    debug!(
        locations = snapshot.locations.len(),
        devices = snapshot.devices.len(),
        events = snapshot.events.len(),
        range = %range,
        "Built dashboard analytics"
    );

    dashboard
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    #[test]
    fn test_dashboard_for_empty_snapshot() {
        let snapshot = AnalyticsSnapshot::new(&[], &[], &[]);
        let clock = EvaluationClock::utc(at(2025, 7, 5, 15, 0));
        let dashboard = build_dashboard(&snapshot, &clock, DateRange::default(), 5);

        assert_eq!(dashboard.generated_at, clock.now());
        assert_eq!(dashboard.metrics.total_locations, 0);
        assert!(dashboard.time_analysis.is_empty());
        assert_eq!(dashboard.activity.len(), 24);
        assert!(dashboard.devices.is_empty());
        assert!(dashboard.distribution.is_empty());
        assert!(dashboard.locations.is_empty());
        assert_eq!(dashboard.range.total_events, 0);
        assert!(dashboard.range.daily_events.is_empty());
    }

    #[test]
    fn test_dashboard_hogar_scenario() {
        let hogar = location("Hogar");
        let phone = device("Dispositivo");
        let events = vec![
            enter(&phone, &hogar, at(2025, 7, 5, 14, 22)),
            enter(&phone, &hogar, at(2025, 7, 5, 14, 23)),
        ];
        let locations = vec![hogar];
        let devices = vec![phone];
        let snapshot = AnalyticsSnapshot::new(&locations, &devices, &events);
        let clock = EvaluationClock::utc(at(2025, 7, 5, 15, 0));

        let dashboard = build_dashboard(&snapshot, &clock, DateRange::Last7Days, 5);
        assert_eq!(dashboard.metrics.today_events, 2);
        assert_eq!(dashboard.metrics.occupied_locations, 1);
        assert_eq!(dashboard.metrics.active_devices, 1);
        assert_eq!(dashboard.time_analysis.len(), 1);
        assert_eq!(dashboard.time_analysis[0].total_events, 2);
        assert_eq!(dashboard.time_analysis[0].average_stay, 0.0);
        assert_eq!(dashboard.activity[14].enters, 2);
        assert!(dashboard.locations[0].is_currently_occupied);
        assert_eq!(dashboard.devices[0].current_location.as_deref(), Some("Hogar"));
        assert_eq!(dashboard.distribution[0].value, 2);
        assert_eq!(dashboard.range.total_events, 2);
        assert_eq!(dashboard.range.daily_events[0].full_date, "2025-07-05");
        assert_eq!(dashboard.event_stats.recent_events.len(), 2);
    }

    #[test]
    fn test_dashboard_treats_far_future_timestamp_as_missing() {
        use crate::models::AnalyticsRequest;
        use chrono::FixedOffset;

        let hogar = location("Hogar");
        let phone = device("Dispositivo");
        let request: AnalyticsRequest = serde_json::from_value(serde_json::json!({
            "locations": [hogar],
            "devices": [phone],
            "events": [{
                "id": uuid::Uuid::new_v4(),
                "type": "enter",
                "device_id": phone.id,
                "home_location_id": hogar.id,
                "home_location_name": "Hogar",
                "created_at": 8_210_266_876_799_999_i64
            }]
        }))
        .unwrap();
        assert!(request.events[0].created_at.is_none());

        let snapshot = AnalyticsSnapshot::from(&request);
        let clock = EvaluationClock::new(
            at(2025, 7, 5, 15, 0),
            FixedOffset::east_opt(14 * 3600).unwrap(),
        );
        let dashboard = build_dashboard(&snapshot, &clock, DateRange::AllTime, 5);

        assert_eq!(dashboard.metrics.total_enters, 1);
        assert_eq!(dashboard.metrics.today_events, 0);
        assert!(dashboard.activity.iter().all(|hour| hour.total == 0));
        assert!(!dashboard.locations[0].is_currently_occupied);
    }
}
