//! Data types for tracked positions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::{haversine_miles, Coordinate};

/// Which side of the ride a position belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Rider,
    Driver,
}

impl Role {
    /// All roles in marker display order.
    pub const ALL: [Role; 2] = [Role::Driver, Role::Rider];

    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Rider => "rider",
            Role::Driver => "driver",
        }
    }

    /// Heading used in marker popups.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Rider => "RIDER",
            Role::Driver => "DRIVER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest reported position of one entity.
///
/// Produced by the backend and never modified locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityPosition {
    pub role: Role,
    pub lat: f64,
    pub lng: f64,
    /// ISO-8601 timestamp as sent by the backend.
    pub timestamp: String,
}

impl EntityPosition {
    /// Create a new position.
    pub fn new(role: Role, lat: f64, lng: f64, timestamp: impl Into<String>) -> Self {
        Self {
            role,
            lat,
            lng,
            timestamp: timestamp.into(),
        }
    }

    /// The position as a coordinate.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Latest known positions for one ride, at most one per role.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    rider: Option<EntityPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    driver: Option<EntityPosition>,
}

impl LocationSnapshot {
    /// An empty snapshot ("no data yet").
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from optional positions.
    ///
    /// The role stored on each position is normalized to the slot it is
    /// placed in.
    pub fn new(rider: Option<EntityPosition>, driver: Option<EntityPosition>) -> Self {
        Self {
            rider: rider.map(|p| EntityPosition {
                role: Role::Rider,
                ..p
            }),
            driver: driver.map(|p| EntityPosition {
                role: Role::Driver,
                ..p
            }),
        }
    }

    /// Builder-style setter used by tests and the wire decoder.
    pub fn with(mut self, position: EntityPosition) -> Self {
        match position.role {
            Role::Rider => self.rider = Some(position),
            Role::Driver => self.driver = Some(position),
        }
        self
    }

    /// Position for a role, if the backend reported one.
    pub fn get(&self, role: Role) -> Option<&EntityPosition> {
        match role {
            Role::Rider => self.rider.as_ref(),
            Role::Driver => self.driver.as_ref(),
        }
    }

    pub fn rider(&self) -> Option<&EntityPosition> {
        self.rider.as_ref()
    }

    pub fn driver(&self) -> Option<&EntityPosition> {
        self.driver.as_ref()
    }

    /// Present positions in marker order (driver first, then rider).
    pub fn positions(&self) -> impl Iterator<Item = &EntityPosition> {
        Role::ALL.into_iter().filter_map(move |role| self.get(role))
    }

    /// Number of roles with a position.
    pub fn len(&self) -> usize {
        self.positions().count()
    }

    pub fn is_empty(&self) -> bool {
        self.rider.is_none() && self.driver.is_none()
    }

    /// Distance between rider and driver in miles.
    ///
    /// Defined only when both positions are present.
    pub fn distance_miles(&self) -> Option<f64> {
        match (&self.rider, &self.driver) {
            (Some(rider), Some(driver)) => {
                Some(haversine_miles(rider.coordinate(), driver.coordinate()))
            }
            _ => None,
        }
    }
}
