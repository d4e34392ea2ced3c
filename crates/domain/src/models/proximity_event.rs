//! Proximity event domain model.
//!
//! A proximity event records a device crossing the boundary of a location's
//! geofence. Events are immutable facts supplied by the data layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Boundary crossing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProximityEventType {
    Enter,
    Exit,
    /// Any token the data layer sent that is neither `enter` nor `exit`.
    Unknown,
}

impl ProximityEventType {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Exit => "exit",
            Self::Unknown => "unknown",
        }
    }

    /// Parse from string (case-insensitive). Unrecognized tokens map to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "enter" => Self::Enter,
            "exit" => Self::Exit,
            _ => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for ProximityEventType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

impl std::fmt::Display for ProximityEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single enter/exit record for a device at a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityEvent {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub event_type: ProximityEventType,
    #[serde(default)]
    pub device_id: Option<Uuid>,
    pub home_location_id: Uuid,
    /// Copy of the location name at the time of the event.
    #[serde(default)]
    pub home_location_name: String,
    /// Distance from the geofence boundary in meters.
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    /// `None` when the data layer sent nothing or something unparseable.
    #[serde(
        default,
        deserialize_with = "shared::time::deserialize_lenient_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl ProximityEvent {
    pub fn is_enter(&self) -> bool {
        self.event_type == ProximityEventType::Enter
    }

    pub fn is_exit(&self) -> bool {
        self.event_type == ProximityEventType::Exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_as_str() {
        assert_eq!(ProximityEventType::Enter.as_str(), "enter");
        assert_eq!(ProximityEventType::Exit.as_str(), "exit");
        assert_eq!(ProximityEventType::Unknown.as_str(), "unknown");
    }

    #[test]
    fn test_event_type_parse() {
        assert_eq!(ProximityEventType::parse("enter"), ProximityEventType::Enter);
        assert_eq!(ProximityEventType::parse("EXIT"), ProximityEventType::Exit);
        assert_eq!(ProximityEventType::parse("dwell"), ProximityEventType::Unknown);
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "enter",
            "latitude": 40.4168,
            "longitude": -3.7038,
            "distance": 12.5,
            "home_location_id": "660e8400-e29b-41d4-a716-446655440001",
            "home_location_name": "Hogar",
            "device_id": null,
            "user_id": null,
            "created_at": "2025-07-05T14:22:49.123Z"
        }"#;

        let event: ProximityEvent = serde_json::from_str(json).unwrap();
        assert!(event.is_enter());
        assert!(!event.is_exit());
        assert!(event.device_id.is_none());
        assert_eq!(event.home_location_name, "Hogar");
        assert!(event.created_at.is_some());
    }

    #[test]
    fn test_event_with_malformed_fields_still_deserializes() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "wander",
            "home_location_id": "660e8400-e29b-41d4-a716-446655440001",
            "created_at": "not-a-timestamp"
        }"#;

        let event: ProximityEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, ProximityEventType::Unknown);
        assert!(event.created_at.is_none());
        assert_eq!(event.distance, 0.0);
    }

    #[test]
    fn test_event_serialization_uses_type_key() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "exit",
            "home_location_id": "660e8400-e29b-41d4-a716-446655440001"
        }"#;
        let event: ProximityEvent = serde_json::from_str(json).unwrap();
        let out = serde_json::to_string(&event).unwrap();
        assert!(out.contains("\"type\":\"exit\""));
        assert!(out.contains("\"created_at\":null"));
    }
}
