//! Health check endpoint handlers.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub analytics: AnalyticsDefaults,
}

/// Defaults applied to requests that leave them out.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AnalyticsDefaults {
    pub default_range: String,
    pub utc_offset_minutes: i32,
    pub max_events: usize,
}

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Full health check endpoint.
///
/// The engine has no backing store, so a running process is healthy.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let analytics = &state.config.analytics;

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        analytics: AnalyticsDefaults {
            default_range: analytics.range().to_string(),
            utc_offset_minutes: analytics.utc_offset_minutes,
            max_events: analytics.max_events,
        },
    })
}

/// Liveness probe endpoint.
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
pub async fn ready() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ready".to_string(),
    })
}
