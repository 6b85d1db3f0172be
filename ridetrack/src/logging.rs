//! Logging setup.
//!
//! Logs always go to stderr. When a log directory is configured, a daily
//! rolling file is written as well through a non-blocking writer. `RUST_LOG`
//! overrides the default filter.

use std::path::{Path, PathBuf};

use thiserror::Error;
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Prefix of the rolling log file name.
pub const LOG_FILE_PREFIX: &str = "ridetrack.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Keeps the file writer alive. Dropping it flushes pending lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Default filter when `RUST_LOG` is unset.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "ridetrack=debug,ridetrack_cli=debug"
    } else {
        "ridetrack=info,ridetrack_cli=info"
    }
}

/// Install the global subscriber.
pub fn init_logging(verbose: bool, log_dir: Option<&Path>) -> Result<LoggingGuard, LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(LocalTime::new(format_description!(
            "[hour]:[minute]:[second]"
        )));

    let (file_layer, file_guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDirectory {
                path: dir.to_path_buf(),
                source,
            })?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(LoggingGuard { _file: file_guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(false), "ridetrack=info,ridetrack_cli=info");
        assert!(default_directives(true).contains("ridetrack=debug"));
    }

    #[test]
    fn test_directives_parse() {
        for verbose in [false, true] {
            assert!(default_directives(verbose)
                .parse::<EnvFilter>()
                .is_ok());
        }
    }

    #[test]
    fn test_unwritable_log_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let result = init_logging(false, Some(&blocker.join("logs")));
        assert!(matches!(result, Err(LoggingError::CreateDirectory { .. })));
    }
}
