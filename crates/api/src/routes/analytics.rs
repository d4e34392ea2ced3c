//! Analytics routes.
//!
//! Every endpoint takes a snapshot (locations, devices, events) in the
//! request body and runs one aggregation pass over it with a single
//! evaluation clock.

use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use tracing::debug;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::middleware::record_analytics_pass;
use domain::models::{
    AnalyticsMetrics, AnalyticsRequest, DashboardAnalytics, DateRange, DeviceActivity,
    EventDistribution, EventSearchResponse, FilteredAnalytics, HourlyActivity, LocationStatus,
    TimeAnalysis,
};
use domain::services::{self, AnalyticsSnapshot, EvaluationClock};
use shared::time::{is_supported_instant, MAX_SUPPORTED_YEAR, MIN_SUPPORTED_YEAR};

/// Build the analytics router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", post(get_dashboard))
        .route("/metrics", post(get_metrics))
        .route("/time-analysis", post(get_time_analysis))
        .route("/activity", post(get_hourly_activity))
        .route("/devices", post(get_device_activity))
        .route("/distribution", post(get_event_distribution))
        .route("/occupancy", post(get_location_status))
        .route("/trends", post(get_trends))
        .route("/events/search", post(search_events))
}

/// Clock and range resolved for one request.
struct Pass {
    clock: EvaluationClock,
    range: DateRange,
}

/// Check request limits and resolve the pass clock.
///
/// Request values win over configured defaults; `now` is read once here.
fn begin_pass(
    state: &AppState,
    request: &AnalyticsRequest,
    view: &'static str,
) -> Result<Pass, ApiError> {
    let analytics = &state.config.analytics;

    if request.events.len() > analytics.max_events {
        return Err(ApiError::PayloadTooLarge(format!(
            "At most {} events per request, got {}",
            analytics.max_events,
            request.events.len()
        )));
    }

    let offset = request
        .utc_offset_minutes
        .and_then(shared::time::offset_from_minutes)
        .unwrap_or_else(|| analytics.offset());
    let now = match request.now {
        Some(now) if !is_supported_instant(now) => {
            return Err(ApiError::validation(format!(
                "now must fall between years {} and {}",
                MIN_SUPPORTED_YEAR, MAX_SUPPORTED_YEAR
            )));
        }
        Some(now) => now,
        None => Utc::now(),
    };
    let range = request.range.unwrap_or_else(|| analytics.range());

    debug!(
        view,
        locations = request.locations.len(),
        devices = request.devices.len(),
        events = request.events.len(),
        %now,
        %range,
        "Starting analytics pass"
    );
    record_analytics_pass(view, request.events.len());

    Ok(Pass {
        clock: EvaluationClock::new(now, offset),
        range,
    })
}

/// Full dashboard bundle.
///
/// POST /api/v1/analytics/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AnalyticsRequest>,
) -> Result<Json<DashboardAnalytics>, ApiError> {
    let pass = begin_pass(&state, &request, "dashboard")?;
    let snapshot = AnalyticsSnapshot::from(&request);

    Ok(Json(services::build_dashboard(
        &snapshot,
        &pass.clock,
        pass.range,
        state.config.analytics.recent_events_limit,
    )))
}

/// Summary counters.
///
/// POST /api/v1/analytics/metrics
pub async fn get_metrics(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AnalyticsRequest>,
) -> Result<Json<AnalyticsMetrics>, ApiError> {
    let pass = begin_pass(&state, &request, "metrics")?;
    let snapshot = AnalyticsSnapshot::from(&request);

    Ok(Json(services::compute_metrics(&snapshot, &pass.clock)))
}

/// Per-location dwell-time estimates.
///
/// POST /api/v1/analytics/time-analysis
pub async fn get_time_analysis(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AnalyticsRequest>,
) -> Result<Json<Vec<TimeAnalysis>>, ApiError> {
    begin_pass(&state, &request, "time_analysis")?;
    let snapshot = AnalyticsSnapshot::from(&request);

    Ok(Json(services::compute_time_analysis(&snapshot)))
}

/// Hour-of-day histogram.
///
/// POST /api/v1/analytics/activity
pub async fn get_hourly_activity(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AnalyticsRequest>,
) -> Result<Json<Vec<HourlyActivity>>, ApiError> {
    let pass = begin_pass(&state, &request, "activity")?;

    Ok(Json(services::hourly_activity(&request.events, &pass.clock)))
}

/// Per-device activity, busiest first.
///
/// POST /api/v1/analytics/devices
pub async fn get_device_activity(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AnalyticsRequest>,
) -> Result<Json<Vec<DeviceActivity>>, ApiError> {
    let pass = begin_pass(&state, &request, "devices")?;
    let snapshot = AnalyticsSnapshot::from(&request);

    Ok(Json(services::resolve_device_activity(&snapshot, &pass.clock)))
}

/// Event share per location.
///
/// POST /api/v1/analytics/distribution
pub async fn get_event_distribution(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AnalyticsRequest>,
) -> Result<Json<Vec<EventDistribution>>, ApiError> {
    begin_pass(&state, &request, "distribution")?;
    let snapshot = AnalyticsSnapshot::from(&request);

    Ok(Json(services::event_distribution(&snapshot)))
}

/// Occupancy and recent activity per location.
///
/// POST /api/v1/analytics/occupancy
pub async fn get_location_status(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AnalyticsRequest>,
) -> Result<Json<Vec<LocationStatus>>, ApiError> {
    let pass = begin_pass(&state, &request, "occupancy")?;
    let snapshot = AnalyticsSnapshot::from(&request);

    Ok(Json(services::resolve_location_status(&snapshot, &pass.clock)))
}

/// Range view with trend comparison and daily series.
///
/// POST /api/v1/analytics/trends
pub async fn get_trends(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AnalyticsRequest>,
) -> Result<Json<FilteredAnalytics>, ApiError> {
    let pass = begin_pass(&state, &request, "trends")?;

    Ok(Json(services::filter_by_range(
        &request.events,
        pass.range,
        &pass.clock,
    )))
}

/// Filtered event list with statistics.
///
/// POST /api/v1/analytics/events/search
pub async fn search_events(
    State(state): State<AppState>,
    ValidatedJson(mut request): ValidatedJson<AnalyticsRequest>,
) -> Result<Json<EventSearchResponse>, ApiError> {
    let pass = begin_pass(&state, &request, "events_search")?;
    let filter = request.filter.take().unwrap_or_default();
    let snapshot = AnalyticsSnapshot::from(&request);

    Ok(Json(services::search_events(
        &snapshot,
        &filter,
        &pass.clock,
        state.config.analytics.recent_events_limit,
    )))
}
