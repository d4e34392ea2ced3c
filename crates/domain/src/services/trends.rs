//! Date-range restriction and period-over-period comparison.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use super::bucketing::daily_event_counts;
use super::EvaluationClock;
use crate::models::{DateRange, FilteredAnalytics, ProximityEvent, TimeWindow, TrendComparison};

/// Current window of a range and the window immediately preceding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeWindows {
    pub current: TimeWindow,
    pub previous: TimeWindow,
}

impl RangeWindows {
    /// Resolve the windows of `range` against the pass clock.
    ///
    /// The current window runs from the start of the local day `N` days ago
    /// to the end of the local day containing `now`. `AllTime` starts at the
    /// Unix epoch. The previous window ends one nanosecond before the current
    /// one starts and spans `N` days (365 for `AllTime`).
    pub fn resolve(range: DateRange, clock: &EvaluationClock) -> Self {
        let today = clock.today();
        let end = clock.day_end(today);

        let start = match range.days() {
            Some(days) => clock.day_start(clock.days_before(today, days)),
            None => DateTime::<Utc>::UNIX_EPOCH,
        };

        let previous_first_day =
            clock.days_before(clock.local_date(start), range.comparison_days());
        let previous = TimeWindow::new(
            clock.day_start(previous_first_day),
            start - TimeDelta::nanoseconds(1),
        );

        Self {
            current: TimeWindow::new(start, end),
            previous,
        }
    }
}

/// Relative change from `previous` to `current` in percent; 0 without a baseline.
pub fn change_percentage(current: usize, previous: usize) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    (current as f64 - previous as f64) / previous as f64 * 100.0
}

pub fn compare_periods(current: usize, previous: usize) -> TrendComparison {
    let change = change_percentage(current, previous);
    TrendComparison {
        current_period: current,
        previous_period: previous,
        change_percentage: change,
        is_increasing: change > 0.0,
    }
}

fn count_within(events: &[ProximityEvent], window: &TimeWindow) -> usize {
    events
        .iter()
        .filter_map(|event| event.created_at)
        .filter(|at| window.contains(*at))
        .count()
}

/// Restrict events to `range` and compare against the preceding window.
///
/// `AllTime` keeps every event, untimed ones included. Bounded ranges keep
/// only timed events inside the current window.
pub fn filter_by_range(
    events: &[ProximityEvent],
    range: DateRange,
    clock: &EvaluationClock,
) -> FilteredAnalytics {
    let windows = RangeWindows::resolve(range, clock);

    let current: Vec<ProximityEvent> = match range {
        DateRange::AllTime => events.to_vec(),
        _ => events
            .iter()
            .filter(|event| {
                event
                    .created_at
                    .is_some_and(|at| windows.current.contains(at))
            })
            .cloned()
            .collect(),
    };
    let previous_count = count_within(events, &windows.previous);

    debug!(
        range = %range,
        current = current.len(),
        previous = previous_count,
        "Filtered events by range"
    );

    FilteredAnalytics {
        date_range: range,
        total_events: current.len(),
        start_date: windows.current.start,
        end_date: windows.current.end,
        previous_period: windows.previous,
        trends: compare_periods(current.len(), previous_count),
        daily_events: daily_event_counts(&current, clock),
        events: current,
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::models::ProximityEventType;

    #[test]
    fn test_change_percentage() {
        assert_eq!(change_percentage(15, 10), 50.0);
        assert_eq!(change_percentage(5, 10), -50.0);
        assert_eq!(change_percentage(3, 0), 0.0);
        assert_eq!(change_percentage(0, 0), 0.0);
    }

    #[test]
    fn test_compare_periods_direction() {
        let up = compare_periods(15, 10);
        assert_eq!(up.change_percentage, 50.0);
        assert!(up.is_increasing);

        let no_baseline = compare_periods(3, 0);
        assert_eq!(no_baseline.change_percentage, 0.0);
        assert!(!no_baseline.is_increasing);

        let flat = compare_periods(4, 4);
        assert!(!flat.is_increasing);
    }

    #[test]
    fn test_windows_are_contiguous() {
        let clock = EvaluationClock::utc(at(2025, 7, 5, 15, 0));
        for range in [
            DateRange::Last7Days,
            DateRange::Last30Days,
            DateRange::Last90Days,
            DateRange::AllTime,
        ] {
            let windows = RangeWindows::resolve(range, &clock);
            assert_eq!(
                windows.previous.end + TimeDelta::nanoseconds(1),
                windows.current.start
            );
            assert!(windows.previous.start < windows.previous.end);
        }
    }

    #[test]
    fn test_seven_day_windows() {
        let clock = EvaluationClock::utc(at(2025, 7, 5, 15, 0));
        let windows = RangeWindows::resolve(DateRange::Last7Days, &clock);
        assert_eq!(windows.current.start, at(2025, 6, 28, 0, 0));
        assert_eq!(
            windows.current.end,
            at(2025, 7, 6, 0, 0) - TimeDelta::nanoseconds(1)
        );
        assert_eq!(windows.previous.start, at(2025, 6, 21, 0, 0));
    }

    #[test]
    fn test_all_time_starts_at_epoch() {
        let clock = EvaluationClock::utc(at(2025, 7, 5, 15, 0));
        let windows = RangeWindows::resolve(DateRange::AllTime, &clock);
        assert_eq!(windows.current.start, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(windows.previous.start, at(1969, 1, 1, 0, 0));
    }

    #[test]
    fn test_filter_by_range_trend_increase() {
        let hogar = location("Hogar");
        let phone = device("Phone");
        let now = at(2025, 7, 5, 15, 0);
        let clock = EvaluationClock::utc(now);

        let mut events = Vec::new();
        for i in 0..15 {
            events.push(enter(&phone, &hogar, now - TimeDelta::hours(i)));
        }
        for i in 0..10 {
            events.push(exit(&phone, &hogar, at(2025, 6, 22, 10, 0) + TimeDelta::hours(i)));
        }
        // Older than both windows
        events.push(exit(&phone, &hogar, at(2025, 1, 1, 10, 0)));
        events.push(event(ProximityEventType::Enter, Some(&phone), &hogar, None));

        let filtered = filter_by_range(&events, DateRange::Last7Days, &clock);
        assert_eq!(filtered.total_events, 15);
        assert_eq!(filtered.events.len(), 15);
        assert_eq!(filtered.trends.current_period, 15);
        assert_eq!(filtered.trends.previous_period, 10);
        assert_eq!(filtered.trends.change_percentage, 50.0);
        assert!(filtered.trends.is_increasing);
        assert_eq!(filtered.daily_events.iter().map(|d| d.events).sum::<usize>(), 15);
    }

    #[test]
    fn test_filter_by_range_without_baseline() {
        let hogar = location("Hogar");
        let phone = device("Phone");
        let now = at(2025, 7, 5, 15, 0);
        let events = vec![
            enter(&phone, &hogar, now),
            exit(&phone, &hogar, now - TimeDelta::days(1)),
            enter(&phone, &hogar, now - TimeDelta::days(2)),
        ];

        let filtered = filter_by_range(&events, DateRange::Last30Days, &EvaluationClock::utc(now));
        assert_eq!(filtered.trends.current_period, 3);
        assert_eq!(filtered.trends.previous_period, 0);
        assert_eq!(filtered.trends.change_percentage, 0.0);
        assert!(!filtered.trends.is_increasing);
    }

    #[test]
    fn test_all_time_keeps_untimed_events() {
        let hogar = location("Hogar");
        let phone = device("Phone");
        let now = at(2025, 7, 5, 15, 0);
        let events = vec![
            enter(&phone, &hogar, at(2001, 1, 1, 0, 0)),
            event(ProximityEventType::Exit, Some(&phone), &hogar, None),
        ];

        let filtered = filter_by_range(&events, DateRange::parse("bogus"), &EvaluationClock::utc(now));
        assert_eq!(filtered.date_range, DateRange::AllTime);
        assert_eq!(filtered.total_events, 2);
        // Untimed events have no day
        assert_eq!(filtered.daily_events.len(), 1);
    }

    #[test]
    fn test_window_boundary_inclusive() {
        let hogar = location("Hogar");
        let phone = device("Phone");
        let now = at(2025, 7, 5, 15, 0);
        let events = vec![
            enter(&phone, &hogar, at(2025, 6, 28, 0, 0)),
            exit(&phone, &hogar, at(2025, 6, 28, 0, 0) - TimeDelta::nanoseconds(1)),
        ];

        let filtered = filter_by_range(&events, DateRange::Last7Days, &EvaluationClock::utc(now));
        assert_eq!(filtered.trends.current_period, 1);
        assert_eq!(filtered.trends.previous_period, 1);
    }
}
