//! Geographic coordinates and great-circle distance.
//!
//! Distances are in statute miles, matching what riders are shown.

use serde::{Deserialize, Serialize};

use crate::error::TrackingError;

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude in degrees.
pub const MIN_LNG: f64 = -180.0;

/// Maximum valid longitude in degrees.
pub const MAX_LNG: f64 = 180.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Create a coordinate without validation.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Create a coordinate, rejecting out-of-range or non-finite values.
    pub fn validated(lat: f64, lng: f64) -> Result<Self, TrackingError> {
        let coord = Self::new(lat, lng);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(TrackingError::InvalidCoordinate { lat, lng })
        }
    }

    /// Whether both components are finite and inside their ranges.
    pub fn is_valid(&self) -> bool {
        (MIN_LAT..=MAX_LAT).contains(&self.lat) && (MIN_LNG..=MAX_LNG).contains(&self.lng)
    }

    /// Great-circle distance to `other` in miles.
    pub fn distance_miles(&self, other: &Coordinate) -> f64 {
        haversine_miles(*self, *other)
    }
}

/// Great-circle distance between two coordinates using the haversine formula.
///
/// Symmetric, zero for identical inputs and increasing with the angular
/// separation of the two points.
///
/// # Examples
///
/// ```
/// use ridetrack::geo::{haversine_miles, Coordinate};
///
/// let dallas = Coordinate::new(32.7767, -96.7970);
/// assert_eq!(haversine_miles(dallas, dallas), 0.0);
/// ```
pub fn haversine_miles(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);

    // Rounding can push h a hair outside [0, 1] for antipodal points
    let h = h.clamp(0.0, 1.0);

    EARTH_RADIUS_MILES * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}
