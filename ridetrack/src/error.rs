//! Tracking error types.

use std::time::Duration;

use thiserror::Error;

/// Message shown for any failure that is not a server-reported error.
pub const NETWORK_FAILURE_MESSAGE: &str = "Unable to fetch live locations.";

/// Message shown when the PIN is missing or not numeric.
pub const INVALID_IDENTIFIER_MESSAGE: &str = "Missing or invalid PIN.";

/// Errors that can occur while tracking a ride.
///
/// None of these are fatal: the poller records the error in the view and
/// tries again on its next cycle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackingError {
    /// The PIN failed numeric validation. No request was made.
    #[error("Missing or invalid PIN: {0:?}")]
    InvalidIdentifier(String),

    /// A coordinate is outside the valid latitude/longitude range.
    #[error("Invalid coordinate: lat {lat}, lng {lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    /// The request could not complete (connectivity, TLS, etc.).
    #[error("Request failed: {0}")]
    NetworkFailure(String),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl TrackingError {
    /// The message shown in the error banner.
    ///
    /// Server errors carry the backend's `detail` verbatim; transport level
    /// failures collapse to a generic retry-eligible message.
    pub fn user_message(&self) -> String {
        match self {
            TrackingError::InvalidIdentifier(_) => INVALID_IDENTIFIER_MESSAGE.to_string(),
            TrackingError::InvalidCoordinate { .. } => self.to_string(),
            TrackingError::Server { message, .. } => message.clone(),
            TrackingError::NetworkFailure(_)
            | TrackingError::Timeout(_)
            | TrackingError::Decode(_) => NETWORK_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Whether the polling loop will recover from this error on its own.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            TrackingError::InvalidIdentifier(_) | TrackingError::InvalidCoordinate { .. }
        )
    }
}
