//! Render projection: snapshot to map description.
//!
//! The map itself is drawn by an external renderer. This module only derives
//! what that renderer consumes:
//!
//! ```text
//! LocationSnapshot ──► MapView { center, zoom, markers: [Marker] }
//! ```
//!
//! Derivation is pure and cheap, so it is recomputed on every render.

use serde::Serialize;

use crate::geo::Coordinate;
use crate::location::{format_local_time, EntityPosition, LocationSnapshot, Role};

/// Center used when neither entity has reported (central Dallas).
pub const DEFAULT_FALLBACK_CENTER: Coordinate = Coordinate::new(32.7767, -96.7970);

/// Default map zoom level.
pub const DEFAULT_MAP_ZOOM: u8 = 12;

/// Projection settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    /// Center shown when the snapshot is empty.
    pub fallback_center: Coordinate,
    /// Zoom level handed to the renderer.
    pub zoom: u8,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fallback_center: DEFAULT_FALLBACK_CENTER,
            zoom: DEFAULT_MAP_ZOOM,
        }
    }
}

/// One map marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub role: Role,
    pub lat: f64,
    pub lng: f64,
    pub timestamp: String,
}

impl Marker {
    /// Popup text: role heading, coordinates and last update time.
    pub fn popup_lines(&self) -> Vec<String> {
        vec![
            self.role.label().to_string(),
            format!("Lat: {}", self.lat),
            format!("Lng: {}", self.lng),
            format!("Time: {}", format_local_time(&self.timestamp)),
        ]
    }
}

impl From<&EntityPosition> for Marker {
    fn from(position: &EntityPosition) -> Self {
        Self {
            role: position.role,
            lat: position.lat,
            lng: position.lng,
            timestamp: position.timestamp.clone(),
        }
    }
}

/// Map state for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
    pub markers: Vec<Marker>,
}

impl MapView {
    /// Derive the map state from a snapshot.
    ///
    /// The map centers on the rider when known, otherwise on the driver,
    /// otherwise on the configured fallback. Markers are emitted for present
    /// roles only, driver first.
    pub fn from_snapshot(snapshot: &LocationSnapshot, config: &ProjectionConfig) -> Self {
        let center = snapshot
            .rider()
            .or_else(|| snapshot.driver())
            .map(EntityPosition::coordinate)
            .unwrap_or(config.fallback_center);

        Self {
            center,
            zoom: config.zoom,
            markers: snapshot.positions().map(Marker::from).collect(),
        }
    }

    /// Map state with no markers, centered on the fallback.
    pub fn empty(config: &ProjectionConfig) -> Self {
        Self::from_snapshot(&LocationSnapshot::empty(), config)
    }

    /// Marker for a role, if present.
    pub fn marker(&self, role: Role) -> Option<&Marker> {
        self.markers.iter().find(|m| m.role == role)
    }
}
