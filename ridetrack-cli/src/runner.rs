//! Shared setup for commands that talk to the backend.

use std::path::PathBuf;

use ridetrack::client::ReqwestTrackingClient;
use ridetrack::config::{config_file_path, normalize_base_url, ConfigFile, API_BASE_URL_ENV};
use ridetrack::logging::{init_logging, LoggingGuard};
use tokio::runtime::Runtime;
use tracing::info;

use crate::error::CliError;

/// Options accepted by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub api_base: Option<String>,
    pub verbose: bool,
}

impl GlobalOptions {
    /// The configuration file in effect.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config_file_path)
    }
}

/// Resolve configuration: file, then environment, then CLI flags.
pub fn resolve_config(options: &GlobalOptions) -> Result<ConfigFile, CliError> {
    resolve_config_with(options, |name| std::env::var(name).ok())
}

fn resolve_config_with(
    options: &GlobalOptions,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ConfigFile, CliError> {
    let mut config = ConfigFile::load_from(&options.config_path())?.with_overrides_from(env);

    if let Some(url) = options.api_base.as_deref().filter(|u| !u.trim().is_empty()) {
        config.backend.api_base_url = Some(normalize_base_url(url));
    }

    Ok(config)
}

/// Loaded configuration plus the logging guard for the command's lifetime.
pub struct CliRunner {
    config: ConfigFile,
    config_path: PathBuf,
    _logging: LoggingGuard,
}

impl CliRunner {
    pub fn new(options: &GlobalOptions) -> Result<Self, CliError> {
        let config = resolve_config(options)?;
        let logging = init_logging(options.verbose, config.logging.directory.as_deref())?;

        Ok(Self {
            config,
            config_path: options.config_path(),
            _logging: logging,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        info!(
            command,
            version = ridetrack::VERSION,
            config = %self.config_path.display(),
            "RideTrack starting"
        );
    }

    /// HTTP client for the configured backend.
    pub fn client(&self) -> Result<ReqwestTrackingClient, CliError> {
        let base_url = self.config.backend.api_base_url.as_deref().ok_or_else(|| {
            CliError::Config(format!(
                "No backend URL configured. Set backend.api_base_url in config.ini, \
                 export {} or use --api-base",
                API_BASE_URL_ENV
            ))
        })?;

        ReqwestTrackingClient::with_timeout(base_url, self.config.request_timeout())
            .map_err(CliError::from)
    }

    /// Multi-threaded runtime for async commands.
    pub fn runtime(&self) -> Result<Runtime, CliError> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::Runtime(format!("Failed to start async runtime: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_overrides_env_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[backend]\napi_base_url = https://file.example\n").unwrap();

        let options = GlobalOptions {
            config: Some(path.clone()),
            api_base: Some("http://flag.example/".to_string()),
            verbose: false,
        };
        let config =
            resolve_config_with(&options, |_| Some("https://env.example".to_string())).unwrap();
        assert_eq!(
            config.backend.api_base_url.as_deref(),
            Some("http://flag.example")
        );

        let options = GlobalOptions {
            api_base: None,
            ..options
        };
        let config =
            resolve_config_with(&options, |_| Some("https://env.example".to_string())).unwrap();
        assert_eq!(
            config.backend.api_base_url.as_deref(),
            Some("https://env.example")
        );

        let config = resolve_config_with(&options, |_| None).unwrap();
        assert_eq!(
            config.backend.api_base_url.as_deref(),
            Some("https://file.example")
        );
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[tracking]\npoll_interval_secs = often\n").unwrap();

        let options = GlobalOptions {
            config: Some(path),
            ..GlobalOptions::default()
        };
        assert!(matches!(
            resolve_config_with(&options, |_| None),
            Err(CliError::Config(_))
        ));
    }
}
