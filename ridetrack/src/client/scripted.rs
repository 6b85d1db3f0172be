//! Scripted tracking client for tests.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use super::TrackingClient;
use crate::error::TrackingError;
use crate::geo::Coordinate;
use crate::location::{LocationSnapshot, Role};
use crate::pin::SessionPin;

/// One scripted answer, optionally delayed.
#[derive(Debug, Clone)]
pub struct ScriptedResponse {
    pub delay: Duration,
    pub result: Result<LocationSnapshot, TrackingError>,
}

impl ScriptedResponse {
    pub fn ok(snapshot: LocationSnapshot) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(snapshot),
        }
    }

    pub fn err(error: TrackingError) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(error),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Answers `fetch_live` from a per-PIN queue.
///
/// The last queued response for a PIN repeats forever.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    scripts: Mutex<HashMap<String, VecDeque<ScriptedResponse>>>,
    requests: Mutex<Vec<(String, Instant)>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for a PIN.
    pub fn push(&self, pin: &str, response: ScriptedResponse) {
        self.scripts
            .lock()
            .entry(pin.to_string())
            .or_default()
            .push_back(response);
    }

    /// PINs requested so far, in order.
    pub fn requested_pins(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .map(|(pin, _)| pin.clone())
            .collect()
    }

    /// Instants at which requests started.
    pub fn request_times(&self) -> Vec<Instant> {
        self.requests.lock().iter().map(|(_, at)| *at).collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn next_response(&self, pin: &str) -> ScriptedResponse {
        let mut scripts = self.scripts.lock();
        match scripts.get_mut(pin) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => ScriptedResponse::err(TrackingError::NetworkFailure(format!(
                "no script for pin {}",
                pin
            ))),
        }
    }
}

impl TrackingClient for ScriptedClient {
    async fn fetch_live(&self, pin: &SessionPin) -> Result<LocationSnapshot, TrackingError> {
        self.requests
            .lock()
            .push((pin.as_str().to_string(), Instant::now()));

        let response = self.next_response(pin.as_str());
        if !response.delay.is_zero() {
            tokio::time::sleep(response.delay).await;
        }
        response.result
    }

    async fn report_location(
        &self,
        pin: &SessionPin,
        _role: Role,
        at: Coordinate,
    ) -> Result<(), TrackingError> {
        pin.ensure_reportable()?;
        Coordinate::validated(at.lat, at.lng).map(|_| ())
    }
}
