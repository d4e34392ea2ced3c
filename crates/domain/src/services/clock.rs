//! Reference time for an analytics pass.
//!
//! Every computation in one pass reads "now" and the evaluator's local
//! offset from the same [`EvaluationClock`], so 24-hour activity checks,
//! "today" counters and range boundaries never disagree with each other.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Offset, TimeDelta, Timelike, Utc};
use shared::time::{end_of_day, local_date, start_of_day};

use crate::models::TimeWindow;

/// Hours after which a device or event no longer counts as recent.
pub const RECENT_ACTIVITY_HOURS: i64 = 24;

/// Fixed `now` and local offset shared by one aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationClock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl EvaluationClock {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Clock evaluated in UTC.
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now, Utc.fix())
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Local calendar date of `now`.
    pub fn today(&self) -> NaiveDate {
        local_date(self.now, self.offset)
    }

    /// Local calendar date of an arbitrary instant.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        local_date(instant, self.offset)
    }

    /// Local hour of day (0-23) of an instant.
    pub fn local_hour(&self, instant: DateTime<Utc>) -> u32 {
        instant.with_timezone(&self.offset).hour()
    }

    pub fn day_start(&self, date: NaiveDate) -> DateTime<Utc> {
        start_of_day(date, self.offset)
    }

    pub fn day_end(&self, date: NaiveDate) -> DateTime<Utc> {
        end_of_day(date, self.offset)
    }

    /// The current local calendar day, inclusive on both ends.
    pub fn today_window(&self) -> TimeWindow {
        let today = self.today();
        TimeWindow::new(self.day_start(today), self.day_end(today))
    }

    /// Local date `days` calendar days before `date`, saturating at the minimum date.
    pub fn days_before(&self, date: NaiveDate, days: u64) -> NaiveDate {
        date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
    }

    /// True when `now - instant` is under 24 hours.
    ///
    /// Instants after `now` count as recent.
    pub fn is_recent(&self, instant: DateTime<Utc>) -> bool {
        self.now.signed_duration_since(instant) < TimeDelta::hours(RECENT_ACTIVITY_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn madrid_summer() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    #[test]
    fn test_today_uses_local_offset() {
        // 23:30 UTC is already the next day at UTC+2
        let now = Utc.with_ymd_and_hms(2025, 7, 5, 23, 30, 0).unwrap();
        let clock = EvaluationClock::new(now, madrid_summer());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 7, 6).unwrap());

        let utc_clock = EvaluationClock::utc(now);
        assert_eq!(utc_clock.today(), NaiveDate::from_ymd_opt(2025, 7, 5).unwrap());
    }

    #[test]
    fn test_local_hour() {
        let now = Utc.with_ymd_and_hms(2025, 7, 5, 12, 0, 0).unwrap();
        let clock = EvaluationClock::new(now, madrid_summer());
        let instant = Utc.with_ymd_and_hms(2025, 7, 5, 22, 15, 0).unwrap();
        assert_eq!(clock.local_hour(instant), 0);
    }

    #[test]
    fn test_today_window_bounds() {
        let now = Utc.with_ymd_and_hms(2025, 7, 5, 12, 0, 0).unwrap();
        let clock = EvaluationClock::utc(now);
        let window = clock.today_window();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 7, 5, 0, 0, 0).unwrap());
        assert!(window.contains(Utc.with_ymd_and_hms(2025, 7, 5, 23, 59, 59).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2025, 7, 6, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_is_recent_boundary() {
        let now = Utc.with_ymd_and_hms(2025, 7, 5, 12, 0, 0).unwrap();
        let clock = EvaluationClock::utc(now);
        assert!(clock.is_recent(now - TimeDelta::hours(23)));
        assert!(!clock.is_recent(now - TimeDelta::hours(24)));
        assert!(clock.is_recent(now + TimeDelta::minutes(5)));
    }

    #[test]
    fn test_days_before() {
        let clock = EvaluationClock::utc(Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap());
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        assert_eq!(clock.days_before(date, 7), NaiveDate::from_ymd_opt(2025, 2, 24).unwrap());
    }
}
