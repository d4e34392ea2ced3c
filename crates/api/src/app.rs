use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{Config, SecurityConfig};
use crate::error::ApiError;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{analytics, health};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origin = if security.cors_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins: Vec<_> = security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("No route for this path".to_string())
}

pub fn create_app(config: Config) -> Router {
    let config = Arc::new(config);
    let state = AppState {
        config: config.clone(),
    };

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let analytics_routes = Router::new()
        .nest("/api/v1/analytics", analytics::router())
        .layer(DefaultBodyLimit::max(config.server.max_body_size));

    Router::new()
        .merge(public_routes)
        .merge(analytics_routes)
        .fallback(not_found)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors_layer(&config.security))
        .with_state(state)
}
