//! Tracker state machine and the view published to subscribers.
//!
//! # State Machine
//!
//! ```text
//! Idle ──[valid PIN]──► Polling ──[cycle fails]──► Error
//!                          ▲                         │
//!                          └──────[cycle succeeds]───┘
//!
//! any ──[invalid PIN | stop | drop]──► Stopped
//! Stopped ──[valid PIN]──► Polling
//! ```
//!
//! Every start and stop bumps the generation. A poll cycle carries the
//! generation it was started in and its result is applied only while that
//! generation is still current, so late answers for a superseded PIN are
//! dropped.

use std::fmt;

use crate::error::TrackingError;
use crate::location::LocationSnapshot;
use crate::pin::SessionPin;
use crate::projection::{MapView, ProjectionConfig};

/// Lifecycle state of a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerStatus {
    /// No PIN supplied yet.
    Idle,
    /// Polling; the last cycle (if any) succeeded.
    Polling,
    /// Polling; the last cycle failed. The next cycle retries.
    Error,
    /// Polling stopped (invalid PIN or teardown).
    Stopped,
}

impl TrackerStatus {
    /// Short label for status bars.
    pub fn display_status(&self) -> &'static str {
        match self {
            TrackerStatus::Idle => "Waiting for PIN",
            TrackerStatus::Polling => "Live",
            TrackerStatus::Error => "Retrying",
            TrackerStatus::Stopped => "Stopped",
        }
    }

    /// Whether a poll task is running in this state.
    pub fn is_active(&self) -> bool {
        matches!(self, TrackerStatus::Polling | TrackerStatus::Error)
    }
}

/// A user-facing notice derived from the view.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// First cycle for the current PIN has not completed.
    Loading,
    /// Error banner text.
    Error(String),
    /// Rider/driver separation in miles.
    Distance(f64),
    /// Polling works but nobody has reported for this PIN.
    NoLocationYet(SessionPin),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Loading => write!(f, "Loading live locations…"),
            Notice::Error(message) => write!(f, "{}", message),
            Notice::Distance(miles) => write!(f, "Driver is {:.2} miles from Rider", miles),
            Notice::NoLocationYet(pin) => write!(
                f,
                "No live location yet for PIN {}. Try again in a moment.",
                pin
            ),
        }
    }
}

/// Point-in-time view of a tracker.
///
/// Published through a `watch` channel on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingView {
    generation: u64,
    pin: Option<SessionPin>,
    status: TrackerStatus,
    snapshot: LocationSnapshot,
    distance_miles: Option<f64>,
    error: Option<TrackingError>,
    loading: bool,
    cycles_completed: u64,
    consecutive_failures: u32,
}

impl Default for TrackingView {
    fn default() -> Self {
        Self {
            generation: 0,
            pin: None,
            status: TrackerStatus::Idle,
            snapshot: LocationSnapshot::empty(),
            distance_miles: None,
            error: None,
            loading: false,
            cycles_completed: 0,
            consecutive_failures: 0,
        }
    }
}

impl TrackingView {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pin(&self) -> Option<&SessionPin> {
        self.pin.as_ref()
    }

    pub fn status(&self) -> TrackerStatus {
        self.status
    }

    pub fn snapshot(&self) -> &LocationSnapshot {
        &self.snapshot
    }

    /// Rider/driver distance; `Some` iff both are in the snapshot.
    pub fn distance_miles(&self) -> Option<f64> {
        self.distance_miles
    }

    pub fn error(&self) -> Option<&TrackingError> {
        self.error.as_ref()
    }

    /// Error banner text, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(TrackingError::user_message)
    }

    /// True until the first cycle for the current PIN completes.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Cycles applied for the current PIN (successful or not).
    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Map state for the renderer.
    pub fn map_view(&self, config: &ProjectionConfig) -> MapView {
        MapView::from_snapshot(&self.snapshot, config)
    }

    /// User-facing notices, in display order.
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();

        if self.loading {
            notices.push(Notice::Loading);
        }
        if let Some(message) = self.error_message().filter(|_| !self.loading) {
            notices.push(Notice::Error(message));
        }
        if let Some(miles) = self.distance_miles {
            notices.push(Notice::Distance(miles));
        }
        if let Some(pin) = &self.pin {
            if !self.loading && self.error.is_none() && self.snapshot.is_empty() {
                notices.push(Notice::NoLocationYet(pin.clone()));
            }
        }

        notices
    }

    // ------------------------------------------------------------------
    // Transitions (called by the tracker and poller under the watch lock)
    // ------------------------------------------------------------------

    /// Start polling a new PIN. Returns the new generation.
    pub(crate) fn begin(&mut self, pin: SessionPin) -> u64 {
        self.generation += 1;
        self.pin = Some(pin);
        self.status = TrackerStatus::Polling;
        self.snapshot = LocationSnapshot::empty();
        self.distance_miles = None;
        self.error = None;
        self.loading = true;
        self.cycles_completed = 0;
        self.consecutive_failures = 0;
        self.generation
    }

    /// Stop because the identifier is missing or invalid.
    pub(crate) fn reject(&mut self, error: TrackingError) {
        self.generation += 1;
        self.pin = None;
        self.status = TrackerStatus::Stopped;
        self.snapshot = LocationSnapshot::empty();
        self.distance_miles = None;
        self.error = Some(error);
        self.loading = false;
    }

    /// Stop on teardown. The last snapshot is kept for display.
    pub(crate) fn halt(&mut self) {
        self.generation += 1;
        self.status = TrackerStatus::Stopped;
        self.loading = false;
    }

    fn accepts(&self, generation: u64) -> bool {
        generation == self.generation && self.status.is_active()
    }

    /// Apply a successful cycle. Returns false if the cycle is stale.
    pub(crate) fn apply_success(&mut self, generation: u64, snapshot: LocationSnapshot) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        self.distance_miles = snapshot.distance_miles();
        self.snapshot = snapshot;
        self.error = None;
        self.status = TrackerStatus::Polling;
        self.loading = false;
        self.cycles_completed += 1;
        self.consecutive_failures = 0;
        true
    }

    /// Apply a failed cycle. Returns false if the cycle is stale.
    pub(crate) fn apply_failure(&mut self, generation: u64, error: TrackingError) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        self.snapshot = LocationSnapshot::empty();
        self.distance_miles = None;
        self.error = Some(error);
        self.status = TrackerStatus::Error;
        self.loading = false;
        self.cycles_completed += 1;
        self.consecutive_failures += 1;
        true
    }
}
