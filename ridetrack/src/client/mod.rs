//! Backend tracking API client.
//!
//! The [`TrackingClient`] trait is the seam between the tracker and the
//! network, so tests can drive the poller with scripted responses.
//!
//! # Endpoints
//!
//! | Method | Path              | Body / Query                 |
//! |--------|-------------------|------------------------------|
//! | GET    | `/track/live`     | `?pin=<digits>`              |
//! | POST   | `/track/location` | `{pin, role, lat, lng}`      |

mod http;
#[cfg(test)]
pub(crate) mod scripted;
mod wire;

use std::future::Future;

use crate::error::TrackingError;
use crate::geo::Coordinate;
use crate::location::{LocationSnapshot, Role};
use crate::pin::SessionPin;

pub use http::{ReqwestTrackingClient, DEFAULT_REQUEST_TIMEOUT};
pub use wire::{error_message_from_body, parse_live_response, LocationReport};

/// Operations against the backend tracking API.
pub trait TrackingClient: Send + Sync + 'static {
    /// Fetch the latest rider/driver positions for a ride.
    fn fetch_live(
        &self,
        pin: &SessionPin,
    ) -> impl Future<Output = Result<LocationSnapshot, TrackingError>> + Send;

    /// Report a position for one side of a ride.
    fn report_location(
        &self,
        pin: &SessionPin,
        role: Role,
        at: Coordinate,
    ) -> impl Future<Output = Result<(), TrackingError>> + Send;
}
