//! CLI error type.

use std::fmt;

use ridetrack::config::ConfigError;
use ridetrack::logging::LoggingError;
use ridetrack::TrackingError;

/// Errors surfaced to the user by the CLI.
#[derive(Debug)]
pub enum CliError {
    /// Configuration is missing or invalid.
    Config(String),
    /// A tracking operation failed.
    Tracking(TrackingError),
    /// Logging could not be set up.
    Logging(String),
    /// The async runtime or signal handling could not be set up.
    Runtime(String),
    /// Output could not be produced.
    Output(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Tracking(e) => write!(f, "{}", e.user_message()),
            CliError::Logging(msg) => write!(f, "Logging error: {}", msg),
            CliError::Runtime(msg) => write!(f, "Runtime error: {}", msg),
            CliError::Output(msg) => write!(f, "Output error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<TrackingError> for CliError {
    fn from(e: TrackingError) -> Self {
        CliError::Tracking(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e.to_string())
    }
}
