//! Location store for the tracked entities.
//!
//! Holds the latest known position of the rider and the driver for one ride.
//! A [`LocationSnapshot`] mirrors exactly one backend response: every
//! successful poll replaces it wholesale, so a role missing from the latest
//! response is missing from the snapshot too.

mod model;
mod timestamp;

pub use model::{EntityPosition, LocationSnapshot, Role};
pub use timestamp::format_local_time;
