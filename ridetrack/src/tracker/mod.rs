//! Live tracking controller.
//!
//! [`LiveTracker`] owns the lifecycle of the poller for one view: it starts
//! polling when a valid PIN arrives, restarts on PIN change and stops on an
//! invalid PIN or teardown. State is published through a `watch` channel
//! that doubles as the single-writer location store.
//!
//! # Example
//!
//! ```ignore
//! use ridetrack::client::ReqwestTrackingClient;
//! use ridetrack::tracker::{LiveTracker, TrackerConfig};
//!
//! let client = ReqwestTrackingClient::new("https://api.example.com")?;
//! let mut tracker = LiveTracker::new(client, TrackerConfig::default());
//!
//! tracker.set_pin(Some("0042"))?;
//! let mut updates = tracker.subscribe();
//! while updates.changed().await.is_ok() {
//!     let view = updates.borrow_and_update().clone();
//!     println!("{:?}", view.map_view(&tracker.config().projection));
//! }
//! ```

mod config;
mod poller;
mod state;

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::client::TrackingClient;
use crate::error::TrackingError;
use crate::pin::SessionPin;
use crate::projection::MapView;

pub use config::{TrackerConfig, DEFAULT_POLL_INTERVAL};
pub use state::{Notice, TrackerStatus, TrackingView};

use poller::Poller;

/// The running poll task, if any.
struct ActivePoll {
    cancellation: CancellationToken,
    handle: JoinHandle<()>,
}

/// Live tracking controller for one view.
///
/// At most one poll task runs per tracker. Methods that start polling spawn
/// onto the current tokio runtime and must be called from within one.
pub struct LiveTracker<C: TrackingClient> {
    client: Arc<C>,
    config: TrackerConfig,
    state: Arc<watch::Sender<TrackingView>>,
    active: Option<ActivePoll>,
}

impl<C: TrackingClient> LiveTracker<C> {
    /// Creates an idle tracker.
    pub fn new(client: C, config: TrackerConfig) -> Self {
        Self::with_shared_client(Arc::new(client), config)
    }

    /// Creates an idle tracker around a shared client.
    pub fn with_shared_client(client: Arc<C>, config: TrackerConfig) -> Self {
        let (state, _) = watch::channel(TrackingView::default());
        Self {
            client,
            config,
            state: Arc::new(state),
            active: None,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Supply or change the PIN.
    ///
    /// - Valid and different from the current PIN: cancels the current poll
    ///   task and starts a new one. The first fetch happens immediately.
    /// - Valid and equal to the PIN already being polled: no-op.
    /// - Missing or invalid: stops polling and surfaces
    ///   [`TrackingError::InvalidIdentifier`] in the view without making any
    ///   request. The error is also returned.
    pub fn set_pin(&mut self, raw: Option<&str>) -> Result<(), TrackingError> {
        let parsed = SessionPin::parse(raw.unwrap_or_default());

        let pin = match parsed {
            Ok(pin) => pin,
            Err(error) => {
                self.cancel_active();
                self.state.send_modify(|view| view.reject(error.clone()));
                info!(raw = ?raw, "Rejected tracking PIN, polling stopped");
                return Err(error);
            }
        };

        let already_polling = self.active.is_some() && {
            let view = self.state.borrow();
            view.pin() == Some(&pin) && view.status().is_active()
        };
        if already_polling {
            return Ok(());
        }

        self.start(pin);
        Ok(())
    }

    /// Stop polling. Any in-flight request is abandoned; its result, if it
    /// still arrives, is discarded.
    pub fn stop(&mut self) {
        let was_active = self.active.is_some();
        self.cancel_active();
        self.state.send_modify(TrackingView::halt);
        if was_active {
            info!("Live tracking stopped");
        }
    }

    /// Stop polling and wait for the poll task to exit.
    pub async fn shutdown(mut self) {
        let handle = self.active.take().map(|active| {
            active.cancellation.cancel();
            active.handle
        });
        self.state.send_modify(TrackingView::halt);

        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    /// Current view.
    pub fn view(&self) -> TrackingView {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> TrackerStatus {
        self.state.borrow().status()
    }

    /// Map state derived from the current view.
    pub fn map_view(&self) -> MapView {
        self.state.borrow().map_view(&self.config.projection)
    }

    /// Subscribe to view changes.
    pub fn subscribe(&self) -> watch::Receiver<TrackingView> {
        self.state.subscribe()
    }

    fn start(&mut self, pin: SessionPin) {
        self.cancel_active();

        // Bump the generation before the new task exists, so nothing from
        // the previous task can be applied after this point.
        let mut generation = 0;
        self.state.send_modify(|view| generation = view.begin(pin.clone()));

        info!(pin = %pin, generation, "Live tracking started");

        let cancellation = CancellationToken::new();
        let poller = Poller {
            client: Arc::clone(&self.client),
            pin,
            generation,
            poll_interval: self.config.poll_interval,
            request_timeout: self.config.request_timeout,
            state: Arc::clone(&self.state),
        };
        let handle = tokio::spawn(poller.run(cancellation.clone()));

        self.active = Some(ActivePoll {
            cancellation,
            handle,
        });
    }

    fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancellation.cancel();
            // The task exits at its next await point; it is not awaited here
            // so stopping stays synchronous.
            drop(active.handle);
        }
    }
}

impl<C: TrackingClient> Drop for LiveTracker<C> {
    fn drop(&mut self) {
        if self.active.is_some() {
            self.cancel_active();
            self.state.send_modify(TrackingView::halt);
        }
    }
}
