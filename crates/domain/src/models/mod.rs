//! Domain models for geofence analytics.

pub mod analytics;
pub mod device;
pub mod location;
pub mod proximity_event;

pub use analytics::{
    AnalyticsMetrics, AnalyticsRequest, DailyEventCount, DashboardAnalytics, DateRange,
    DeviceActivity, DeviceStats, DeviceStatus, EventDistribution, EventFilter,
    EventSearchResponse, EventStats, FilteredAnalytics, HourlyActivity, LocationStats,
    LocationStatus, TimeAnalysis, TimeWindow, TrendComparison,
};
pub use device::Device;
pub use location::Location;
pub use proximity_event::{ProximityEvent, ProximityEventType};
