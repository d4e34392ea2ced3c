//! Location domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named geofenced place owned by a user profile.
///
/// Supplied by the data layer as read-only reference data; the analytics
/// services never modify it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Geofence radius in meters.
    pub radius: f64,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    #[serde(default)]
    pub profile_id: Option<Uuid>,
}

fn default_is_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_deserialization_from_data_layer() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "name": "Hogar",
            "address": "Calle Mayor 1",
            "latitude": 40.4168,
            "longitude": -3.7038,
            "radius": 150,
            "is_active": false,
            "profile_id": "660e8400-e29b-41d4-a716-446655440001",
            "created_at": "2025-07-01T10:00:00Z"
        }"#;

        let location: Location = serde_json::from_str(json).unwrap();
        assert_eq!(location.name, "Hogar");
        assert_eq!(location.radius, 150.0);
        assert!(!location.is_active);
        assert!(location.profile_id.is_some());
    }

    #[test]
    fn test_location_defaults() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "name": "Oficina",
            "latitude": 0.0,
            "longitude": 0.0,
            "radius": 50
        }"#;

        let location: Location = serde_json::from_str(json).unwrap();
        assert!(location.is_active);
        assert!(location.address.is_none());
        assert!(location.profile_id.is_none());
    }
}
