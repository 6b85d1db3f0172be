//! Display formatting for backend timestamps.

use chrono::{DateTime, Local, NaiveDateTime};

/// Format a backend timestamp as a local wall-clock time (`HH:MM:SS`).
///
/// Offset-aware timestamps are converted to the local zone. Naive ones (the
/// backend omits the offset when its column has no zone) are shown as-is.
/// Anything unparseable is returned unchanged so the user still sees it.
pub fn format_local_time(timestamp: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return parsed.with_timezone(&Local).format("%H:%M:%S").to_string();
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format("%H:%M:%S").to_string();
    }

    timestamp.to_string()
}
