//! CLI command implementations.

pub mod config;
pub mod distance;
pub mod live;
pub mod report;
