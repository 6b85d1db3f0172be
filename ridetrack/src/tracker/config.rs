//! Tracker configuration.

use std::time::Duration;

use crate::client::DEFAULT_REQUEST_TIMEOUT;
use crate::projection::ProjectionConfig;

/// Default delay between the end of one poll cycle and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration for a [`LiveTracker`](super::LiveTracker).
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Delay between poll cycles.
    pub poll_interval: Duration,

    /// Upper bound for a single fetch. A fetch exceeding it fails the cycle.
    pub request_timeout: Duration,

    /// Map projection settings.
    pub projection: ProjectionConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            projection: ProjectionConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the projection settings.
    pub fn with_projection(mut self, projection: ProjectionConfig) -> Self {
        self.projection = projection;
        self
    }
}
