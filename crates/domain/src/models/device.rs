//! Device domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tracked device belonging to a user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type", default)]
    pub device_type: String,
    #[serde(default)]
    pub profile_id: Option<Uuid>,
}
