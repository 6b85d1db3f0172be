//! HTTP implementation of the tracking client using reqwest.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use tracing::debug;

use super::wire::{error_message_from_body, parse_live_response, LocationReport};
use super::TrackingClient;
use crate::error::TrackingError;
use crate::geo::Coordinate;
use crate::location::{LocationSnapshot, Role};
use crate::pin::SessionPin;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

const LIVE_PATH: &str = "/track/live";
const REPORT_PATH: &str = "/track/location";

/// Tracking client talking to the real backend.
#[derive(Debug, Clone)]
pub struct ReqwestTrackingClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ReqwestTrackingClient {
    /// Creates a client with the default timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Backend root, e.g. `https://api.example.com`
    pub fn new(base_url: impl Into<String>) -> Result<Self, TrackingError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a client with a custom timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TrackingError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ridetrack/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                TrackingError::NetworkFailure(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Backend root without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn map_send_error(&self, e: reqwest::Error) -> TrackingError {
        if e.is_timeout() {
            TrackingError::Timeout(self.timeout)
        } else {
            TrackingError::NetworkFailure(e.to_string())
        }
    }

    /// Read the body, turning non-2xx statuses into `Server` errors.
    async fn read_body(&self, response: Response) -> Result<Vec<u8>, TrackingError> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            return Err(server_error(status, &body));
        }

        Ok(body.to_vec())
    }
}

fn server_error(status: StatusCode, body: &[u8]) -> TrackingError {
    let message = error_message_from_body(body)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "Request failed".to_string());

    TrackingError::Server {
        status: status.as_u16(),
        message,
    }
}

impl TrackingClient for ReqwestTrackingClient {
    async fn fetch_live(&self, pin: &SessionPin) -> Result<LocationSnapshot, TrackingError> {
        debug!(pin = %pin, "GET {}", LIVE_PATH);

        let response = self
            .client
            .get(self.url(LIVE_PATH))
            .query(&[("pin", pin.as_str())])
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let body = self.read_body(response).await?;
        parse_live_response(&body)
    }

    async fn report_location(
        &self,
        pin: &SessionPin,
        role: Role,
        at: Coordinate,
    ) -> Result<(), TrackingError> {
        pin.ensure_reportable()?;
        let at = Coordinate::validated(at.lat, at.lng)?;

        let report = LocationReport {
            pin: pin.as_str().to_string(),
            role,
            lat: at.lat,
            lng: at.lng,
        };
        let payload =
            serde_json::to_vec(&report).map_err(|e| TrackingError::Decode(e.to_string()))?;

        debug!(pin = %pin, role = %role, lat = at.lat, lng = at.lng, "POST {}", REPORT_PATH);

        let response = self
            .client
            .post(self.url(REPORT_PATH))
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        self.read_body(response).await.map(|_| ())
    }
}
