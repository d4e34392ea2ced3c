//! Analytics domain models.
//!
//! Request payloads carrying an input snapshot, and the derived views the
//! analytics services produce from it. All views serialize with camelCase
//! keys for the dashboard's chart and table components.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{Device, Location, ProximityEvent, ProximityEventType};

// ============================================================================
// Date range selection
// ============================================================================

/// Caller-selected analysis window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DateRange {
    #[default]
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
    #[serde(rename = "all")]
    AllTime,
}

impl DateRange {
    /// Baseline length used when comparing "all time" against a previous period.
    pub const ALL_TIME_BASELINE_DAYS: u64 = 365;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Last7Days => "7d",
            Self::Last30Days => "30d",
            Self::Last90Days => "90d",
            Self::AllTime => "all",
        }
    }

    /// Parse a range token. Unrecognized tokens fall back to `AllTime`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "7d" => Self::Last7Days,
            "30d" => Self::Last30Days,
            "90d" => Self::Last90Days,
            _ => Self::AllTime,
        }
    }

    /// Window length in days, or `None` for an unbounded window.
    pub fn days(&self) -> Option<u64> {
        match self {
            Self::Last7Days => Some(7),
            Self::Last30Days => Some(30),
            Self::Last90Days => Some(90),
            Self::AllTime => None,
        }
    }

    /// Length of the previous period used for trend comparison.
    pub fn comparison_days(&self) -> u64 {
        self.days().unwrap_or(Self::ALL_TIME_BASELINE_DAYS)
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inclusive time window `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Input snapshot plus evaluation parameters for one analytics pass.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRequest {
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub events: Vec<ProximityEvent>,
    /// Range token; falls back to the configured default when absent.
    #[serde(default)]
    pub range: Option<DateRange>,
    /// Reference time for the pass; the server clock when absent.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    /// Evaluator's local offset; the configured offset when absent.
    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_utc_offset_minutes"))]
    pub utc_offset_minutes: Option<i32>,
    /// Only used by event search.
    #[serde(default)]
    #[validate(nested)]
    pub filter: Option<EventFilter>,
}

/// Event list filter used by event search.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
    #[serde(rename = "type", default)]
    pub event_type: Option<ProximityEventType>,
    #[serde(default)]
    pub location_id: Option<Uuid>,
    #[serde(default)]
    pub device_id: Option<Uuid>,
    /// Case-insensitive match on location name or device name.
    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_search_text"))]
    pub search: Option<String>,
}

// ============================================================================
// Summary metrics
// ============================================================================

/// Headline counters for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsMetrics {
    pub today_events: usize,
    pub active_devices: usize,
    pub occupied_locations: usize,
    pub total_locations: usize,
    pub total_enters: usize,
    pub total_exits: usize,
    pub enter_exit_ratio: f64,
}

/// Event list statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub total_events: usize,
    pub today_events: usize,
    pub enter_events: usize,
    pub exit_events: usize,
    /// Most recent timed events, newest first.
    pub recent_events: Vec<ProximityEvent>,
}

/// Location list statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationStats {
    pub total_locations: usize,
    pub active_locations: usize,
    pub inactive_locations: usize,
    pub locations_with_events: usize,
    pub occupied_locations: usize,
}

/// Device list statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStats {
    pub total_devices: usize,
    pub active_devices: usize,
    pub inactive_devices: usize,
}

// ============================================================================
// Per-entity breakdowns
// ============================================================================

/// Dwell-time estimate for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAnalysis {
    pub location: String,
    /// Sum of matched enter/exit durations, in minutes.
    pub time_inside: i64,
    /// Heuristic: `max(0, total_events * 60 - time_inside)`; not a measurement.
    pub time_outside: i64,
    pub total_events: usize,
    /// Mean matched stay in minutes; 0 without matched pairs.
    pub average_stay: f64,
}

/// One hour-of-day histogram bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyActivity {
    /// `"HH:00"`
    pub hour: String,
    pub enters: usize,
    pub exits: usize,
    pub total: usize,
}

/// Activity status of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Active,
    Inactive,
}

/// Activity summary for one device.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceActivity {
    pub device_id: Uuid,
    pub device: String,
    pub events: usize,
    /// `dd/MM/yyyy HH:mm` in the evaluator's offset, or `"never"`.
    pub last_active: String,
    pub last_active_at: Option<DateTime<Utc>>,
    pub status: DeviceStatus,
    /// Location the device is inside, when its latest event is an enter.
    pub current_location: Option<String>,
}

/// Share of events at one location, for pie charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDistribution {
    pub name: String,
    pub value: usize,
    pub color: String,
}

/// Point-in-time state of one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationStatus {
    pub location_id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub is_currently_occupied: bool,
    /// Events in the trailing 24 hours.
    pub recent_events_count: usize,
    pub last_event_time: Option<DateTime<Utc>>,
}

// ============================================================================
// Range view and trends
// ============================================================================

/// Event count for one local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyEventCount {
    /// `dd/MM`
    pub date: String,
    pub events: usize,
    /// `yyyy-MM-dd`
    pub full_date: String,
}

/// Current-vs-previous period comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendComparison {
    pub current_period: usize,
    pub previous_period: usize,
    pub change_percentage: f64,
    pub is_increasing: bool,
}

/// Events restricted to a date range, with trend and daily series.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredAnalytics {
    pub date_range: DateRange,
    pub events: Vec<ProximityEvent>,
    pub total_events: usize,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub previous_period: TimeWindow,
    pub trends: TrendComparison,
    pub daily_events: Vec<DailyEventCount>,
}

/// Result of an event search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSearchResponse {
    pub events: Vec<ProximityEvent>,
    pub stats: EventStats,
}

/// Every view computed in a single pass with one reference time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAnalytics {
    pub generated_at: DateTime<Utc>,
    pub metrics: AnalyticsMetrics,
    pub event_stats: EventStats,
    pub location_stats: LocationStats,
    pub device_stats: DeviceStats,
    pub time_analysis: Vec<TimeAnalysis>,
    pub activity: Vec<HourlyActivity>,
    pub devices: Vec<DeviceActivity>,
    pub distribution: Vec<EventDistribution>,
    pub locations: Vec<LocationStatus>,
    pub range: FilteredAnalytics,
}
