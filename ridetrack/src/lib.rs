//! RideTrack - live rider/driver tracking for the ride-booking backend
//!
//! This library polls the backend's live-tracking endpoint for a ride PIN,
//! keeps the latest rider and driver positions, derives the distance between
//! them and projects everything into a map description for a renderer.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          LiveTracker                              │
//! │                                                                   │
//! │  set_pin ──► Poller ──► TrackingClient ──► GET /track/live        │
//! │                │                                                  │
//! │                ▼                                                  │
//! │         TrackingView (watch) ──► LocationSnapshot ──► distance    │
//! │                │                                                  │
//! │                ▼                                                  │
//! │             MapView { center, zoom, markers }                     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod geo;
pub mod location;
pub mod logging;
pub mod pin;
pub mod projection;
pub mod tracker;

pub use error::TrackingError;

/// Crate version, reported by the CLI banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
