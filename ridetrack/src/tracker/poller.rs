//! Poll loop for one PIN and one generation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::state::TrackingView;
use crate::client::TrackingClient;
use crate::error::TrackingError;
use crate::location::LocationSnapshot;
use crate::pin::SessionPin;

/// Everything a poll task needs, captured at start.
pub(crate) struct Poller<C: TrackingClient> {
    pub client: Arc<C>,
    pub pin: SessionPin,
    pub generation: u64,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub state: Arc<watch::Sender<TrackingView>>,
}

impl<C: TrackingClient> Poller<C> {
    /// Poll until cancelled.
    ///
    /// The first cycle runs immediately. After every cycle, successful or
    /// not, the next one is scheduled `poll_interval` later. Cancellation
    /// abandons both an in-flight fetch and a pending sleep.
    pub async fn run(self, cancellation: CancellationToken) {
        debug!(pin = %self.pin, generation = self.generation, "Poller starting");

        loop {
            let outcome = tokio::select! {
                biased;

                _ = cancellation.cancelled() => break,

                outcome = self.fetch() => outcome,
            };

            self.apply(outcome);

            tokio::select! {
                biased;

                _ = cancellation.cancelled() => break,

                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        debug!(pin = %self.pin, generation = self.generation, "Poller stopped");
    }

    /// One bounded fetch.
    async fn fetch(&self) -> Result<LocationSnapshot, TrackingError> {
        match tokio::time::timeout(self.request_timeout, self.client.fetch_live(&self.pin)).await {
            Ok(result) => result,
            Err(_) => Err(TrackingError::Timeout(self.request_timeout)),
        }
    }

    /// Apply a cycle result if this poller's generation is still current.
    fn apply(&self, outcome: Result<LocationSnapshot, TrackingError>) {
        let generation = self.generation;

        let applied = match outcome {
            Ok(snapshot) => {
                let roles = snapshot.len();
                let applied = self
                    .state
                    .send_if_modified(|view| view.apply_success(generation, snapshot));
                if applied {
                    debug!(pin = %self.pin, roles, "Live locations updated");
                }
                applied
            }
            Err(error) => {
                let message = error.to_string();
                let applied = self
                    .state
                    .send_if_modified(|view| view.apply_failure(generation, error));
                if applied {
                    warn!(pin = %self.pin, error = %message, "Live location fetch failed");
                }
                applied
            }
        };

        if !applied {
            debug!(
                pin = %self.pin,
                generation,
                "Discarding result from superseded poll cycle"
            );
        }
    }
}
