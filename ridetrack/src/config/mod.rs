//! Configuration file handling.
//!
//! Settings live in `~/.config/ridetrack/config.ini` (platform config dir).
//! A missing file means defaults. The backend URL can be overridden with the
//! `RIDETRACK_API_BASE_URL` environment variable; CLI flags override both.
//!
//! ```ini
//! [backend]
//! api_base_url = https://api.example.com
//! request_timeout_secs = 8
//!
//! [tracking]
//! poll_interval_secs = 5
//!
//! [map]
//! fallback_lat = 32.7767
//! fallback_lng = -96.7970
//! zoom = 12
//!
//! [logging]
//! directory = /var/log/ridetrack
//! ```

mod keys;

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::client::DEFAULT_REQUEST_TIMEOUT;
use crate::geo::Coordinate;
use crate::projection::{ProjectionConfig, DEFAULT_FALLBACK_CENTER, DEFAULT_MAP_ZOOM};
use crate::tracker::{TrackerConfig, DEFAULT_POLL_INTERVAL};

pub use keys::ConfigKey;

/// Environment variable overriding `backend.api_base_url`.
pub const API_BASE_URL_ENV: &str = "RIDETRACK_API_BASE_URL";

/// Configuration file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid INI.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// A key holds a value of the wrong shape.
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// `[backend]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendSettings {
    /// Backend root URL, trailing slashes removed.
    pub api_base_url: Option<String>,
    pub request_timeout_secs: u64,
}

/// `[tracking]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSettings {
    pub poll_interval_secs: u64,
}

/// `[map]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub fallback_lat: f64,
    pub fallback_lng: f64,
    pub zoom: u8,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoggingSettings {
    /// Directory for rolling log files. Logs go to stderr only when unset.
    pub directory: Option<PathBuf>,
}

/// Parsed configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub backend: BackendSettings,
    pub tracking: TrackingSettings,
    pub map: MapSettings,
    pub logging: LoggingSettings,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            backend: BackendSettings {
                api_base_url: None,
                request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            },
            tracking: TrackingSettings {
                poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            },
            map: MapSettings {
                fallback_lat: DEFAULT_FALLBACK_CENTER.lat,
                fallback_lng: DEFAULT_FALLBACK_CENTER.lng,
                zoom: DEFAULT_MAP_ZOOM,
            },
            logging: LoggingSettings::default(),
        }
    }
}

/// Default configuration file location.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ridetrack")
        .join(CONFIG_FILE_NAME)
}

/// Remove trailing slashes so paths can be appended directly.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

impl ConfigFile {
    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::load_from(&config_file_path())?.with_env_overrides())
    }

    /// Load from a specific file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini_str(&content)
    }

    /// Parse INI text.
    pub fn from_ini_str(content: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let mut config = Self::default();

        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                let value = value.trim();
                if !value.is_empty() {
                    key.set(&mut config, value)?;
                }
            }
        }

        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.backend.api_base_url = Some(normalize_base_url(&url));
        }
        self
    }

    /// Serialize to INI text.
    pub fn to_ini_string(&self) -> String {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }

        let mut out = Vec::new();
        // Writing into a Vec cannot fail
        let _ = ini.write_to(&mut out);
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Write to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Write to a file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, self.to_ini_string()).map_err(io_err)
    }

    /// Tracker settings derived from this file.
    pub fn to_tracker_config(&self) -> TrackerConfig {
        TrackerConfig::default()
            .with_poll_interval(Duration::from_secs(self.tracking.poll_interval_secs))
            .with_request_timeout(self.request_timeout())
            .with_projection(ProjectionConfig {
                fallback_center: Coordinate::new(self.map.fallback_lat, self.map.fallback_lng),
                zoom: self.map.zoom,
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.request_timeout_secs)
    }
}

/// Parse a value, mapping failures to [`ConfigError::InvalidValue`].
pub(crate) fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_tracker_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.to_tracker_config(), TrackerConfig::default());
        assert!(config.backend.api_base_url.is_none());
    }

    #[test]
    fn test_parse_full_file() {
        let config = ConfigFile::from_ini_str(
            r#"
[backend]
api_base_url = https://api.example.com/
request_timeout_secs = 3

[tracking]
poll_interval_secs = 2

[map]
fallback_lat = 40.7128
fallback_lng = -74.0060
zoom = 14

[logging]
directory = /tmp/ridetrack-logs
"#,
        )
        .unwrap();

        assert_eq!(
            config.backend.api_base_url.as_deref(),
            Some("https://api.example.com")
        );
        let tracker = config.to_tracker_config();
        assert_eq!(tracker.poll_interval, Duration::from_secs(2));
        assert_eq!(tracker.request_timeout, Duration::from_secs(3));
        assert_eq!(
            tracker.projection.fallback_center,
            Coordinate::new(40.7128, -74.0060)
        );
        assert_eq!(tracker.projection.zoom, 14);
        assert_eq!(
            config.logging.directory,
            Some(PathBuf::from("/tmp/ridetrack-logs"))
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ConfigFile::from_ini_str("[tracking]\npoll_interval_secs = 10\n").unwrap();
        assert_eq!(config.tracking.poll_interval_secs, 10);
        assert_eq!(config.backend.request_timeout_secs, 8);
        assert_eq!(config.map.zoom, 12);
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let err = ConfigFile::from_ini_str("[tracking]\npoll_interval_secs = soon\n").unwrap_err();
        match err {
            ConfigError::InvalidValue { key, value, .. } => {
                assert_eq!(key, "tracking.poll_interval_secs");
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_env_override_wins() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(API_BASE_URL_ENV, "http://localhost:8000//")]);
        let config = ConfigFile::from_ini_str("[backend]\napi_base_url = https://file.example\n")
            .unwrap()
            .with_overrides_from(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(
            config.backend.api_base_url.as_deref(),
            Some("http://localhost:8000")
        );
    }

    #[test]
    fn test_blank_env_override_is_ignored() {
        let config = ConfigFile::default().with_overrides_from(|_| Some("  ".to_string()));
        assert!(config.backend.api_base_url.is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = ConfigFile::default();
        config.backend.api_base_url = Some("https://api.example.com".to_string());
        config.map.zoom = 9;
        config.save_to(&path).unwrap();

        let reloaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }
}
