//! Common test utilities for integration tests.
//!
//! Builds the router with an in-memory configuration and assembles request
//! snapshots as JSON.

// Not every helper is used by every test binary.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use fake::{faker::name::en::Name, Fake};
use geofence_analytics_api::{
    app::create_app,
    config::{AnalyticsConfig, Config, LoggingConfig, SecurityConfig, ServerConfig},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

/// Fixed reference time used by most tests.
pub const NOW: &str = "2025-07-05T15:00:00Z";

/// Test configuration.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
            max_body_size: 10 * 1024 * 1024,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            cors_origins: vec![],
        },
        analytics: AnalyticsConfig {
            utc_offset_minutes: 0,
            default_range: "7d".to_string(),
            recent_events_limit: 5,
            max_events: 1_000,
        },
    }
}

/// Create a test application router.
pub fn create_test_app(config: Config) -> Router {
    create_app(config)
}

/// POST a JSON body and return the status and parsed response body.
pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// GET a path and return the status and raw body.
pub async fn get_text(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&body).into_owned())
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

/// A location in a test snapshot.
#[derive(Debug, Clone)]
pub struct TestLocation {
    pub id: Uuid,
    pub name: String,
}

/// A device in a test snapshot.
#[derive(Debug, Clone)]
pub struct TestDevice {
    pub id: Uuid,
    pub name: String,
}

/// Builder for analytics request bodies.
#[derive(Debug, Default)]
pub struct TestSnapshot {
    locations: Vec<Value>,
    devices: Vec<Value>,
    events: Vec<Value>,
}

impl TestSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&mut self, name: &str) -> TestLocation {
        let id = Uuid::new_v4();
        self.locations.push(json!({
            "id": id,
            "name": name,
            "address": null,
            "latitude": 40.4168,
            "longitude": -3.7038,
            "radius": 100.0,
            "is_active": true,
            "profile_id": null
        }));
        TestLocation {
            id,
            name: name.to_string(),
        }
    }

    /// Device with a generated display name.
    pub fn device(&mut self) -> TestDevice {
        let id = Uuid::new_v4();
        let name: String = Name().fake();
        self.devices.push(json!({
            "id": id,
            "name": name,
            "type": "smartphone",
            "profile_id": null
        }));
        TestDevice { id, name }
    }

    /// Append an event; `created_at` is passed through verbatim.
    pub fn event(
        &mut self,
        event_type: &str,
        device: &TestDevice,
        location: &TestLocation,
        created_at: Value,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.events.push(json!({
            "id": id,
            "type": event_type,
            "device_id": device.id,
            "home_location_id": location.id,
            "home_location_name": location.name,
            "distance": 12.5,
            "created_at": created_at
        }));
        id
    }

    pub fn enter(&mut self, device: &TestDevice, location: &TestLocation, at: &str) -> Uuid {
        self.event("enter", device, location, json!(at))
    }

    pub fn exit(&mut self, device: &TestDevice, location: &TestLocation, at: &str) -> Uuid {
        self.event("exit", device, location, json!(at))
    }

    /// Request body evaluated at [`NOW`] in UTC.
    pub fn body(&self) -> Value {
        json!({
            "locations": self.locations,
            "devices": self.devices,
            "events": self.events,
            "now": NOW,
            "utcOffsetMinutes": 0
        })
    }
}
