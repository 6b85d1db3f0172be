//! Wire formats of the tracking endpoints.

use serde::{Deserialize, Serialize};

use crate::error::TrackingError;
use crate::location::{EntityPosition, LocationSnapshot, Role};

/// One position as returned by `GET /track/live`.
#[derive(Debug, Deserialize)]
struct WirePosition {
    lat: f64,
    lng: f64,
    #[serde(default)]
    timestamp: Option<String>,
}

/// Body of `GET /track/live`.
///
/// Absent keys mean the entity has not reported yet. The backend answers
/// `{"status": "empty", "detail": ...}` when neither has; the extra keys are
/// ignored and the result is an empty snapshot.
#[derive(Debug, Deserialize)]
struct LiveResponse {
    #[serde(default)]
    rider: Option<WirePosition>,
    #[serde(default)]
    driver: Option<WirePosition>,
}

impl WirePosition {
    fn into_position(self, role: Role) -> EntityPosition {
        EntityPosition::new(role, self.lat, self.lng, self.timestamp.unwrap_or_default())
    }
}

/// Decode a `GET /track/live` body into a snapshot.
pub fn parse_live_response(body: &[u8]) -> Result<LocationSnapshot, TrackingError> {
    let response: LiveResponse =
        serde_json::from_slice(body).map_err(|e| TrackingError::Decode(e.to_string()))?;

    Ok(LocationSnapshot::new(
        response.rider.map(|p| p.into_position(Role::Rider)),
        response.driver.map(|p| p.into_position(Role::Driver)),
    ))
}

/// Body of `POST /track/location`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationReport {
    pub pin: String,
    pub role: Role,
    pub lat: f64,
    pub lng: f64,
}

/// Extract the user-facing message from a non-2xx body.
///
/// Prefers `detail`, then `message`. Non-string details (validation error
/// lists) are rendered as compact JSON. Returns `None` when the body has
/// neither.
pub fn error_message_from_body(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;

    ["detail", "message"]
        .iter()
        .filter_map(|key| value.get(key))
        .find(|v| !v.is_null())
        .map(|v| match v.as_str() {
            Some(s) => s.to_string(),
            None => v.to_string(),
        })
}
