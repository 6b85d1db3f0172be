//! Addressable configuration keys (`section.key`).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{normalize_base_url, parse_value, ConfigError, ConfigFile};
use crate::geo::{MAX_LAT, MAX_LNG, MIN_LAT, MIN_LNG};

/// A single configuration setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    BackendApiBaseUrl,
    BackendRequestTimeoutSecs,
    TrackingPollIntervalSecs,
    MapFallbackLat,
    MapFallbackLng,
    MapZoom,
    LoggingDirectory,
}

impl ConfigKey {
    /// All keys, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::BackendApiBaseUrl,
            ConfigKey::BackendRequestTimeoutSecs,
            ConfigKey::TrackingPollIntervalSecs,
            ConfigKey::MapFallbackLat,
            ConfigKey::MapFallbackLng,
            ConfigKey::MapZoom,
            ConfigKey::LoggingDirectory,
        ]
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::BackendApiBaseUrl | ConfigKey::BackendRequestTimeoutSecs => "backend",
            ConfigKey::TrackingPollIntervalSecs => "tracking",
            ConfigKey::MapFallbackLat | ConfigKey::MapFallbackLng | ConfigKey::MapZoom => "map",
            ConfigKey::LoggingDirectory => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::BackendApiBaseUrl => "api_base_url",
            ConfigKey::BackendRequestTimeoutSecs => "request_timeout_secs",
            ConfigKey::TrackingPollIntervalSecs => "poll_interval_secs",
            ConfigKey::MapFallbackLat => "fallback_lat",
            ConfigKey::MapFallbackLng => "fallback_lng",
            ConfigKey::MapZoom => "zoom",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Full dotted name, e.g. `backend.api_base_url`.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as a string. Unset optional values are empty.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::BackendApiBaseUrl => config.backend.api_base_url.clone().unwrap_or_default(),
            ConfigKey::BackendRequestTimeoutSecs => config.backend.request_timeout_secs.to_string(),
            ConfigKey::TrackingPollIntervalSecs => config.tracking.poll_interval_secs.to_string(),
            ConfigKey::MapFallbackLat => config.map.fallback_lat.to_string(),
            ConfigKey::MapFallbackLng => config.map.fallback_lng.to_string(),
            ConfigKey::MapZoom => config.map.zoom.to_string(),
            ConfigKey::LoggingDirectory => config
                .logging
                .directory
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Validate and store a value.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let name = self.name();
        let value = value.trim();

        match self {
            ConfigKey::BackendApiBaseUrl => {
                config.backend.api_base_url = if value.is_empty() {
                    None
                } else {
                    Some(normalize_base_url(value))
                };
            }
            ConfigKey::BackendRequestTimeoutSecs => {
                config.backend.request_timeout_secs = positive_secs(&name, value)?;
            }
            ConfigKey::TrackingPollIntervalSecs => {
                config.tracking.poll_interval_secs = positive_secs(&name, value)?;
            }
            ConfigKey::MapFallbackLat => {
                let lat: f64 = parse_value(&name, value)?;
                check_range(&name, value, lat, MIN_LAT, MAX_LAT)?;
                config.map.fallback_lat = lat;
            }
            ConfigKey::MapFallbackLng => {
                let lng: f64 = parse_value(&name, value)?;
                check_range(&name, value, lng, MIN_LNG, MAX_LNG)?;
                config.map.fallback_lng = lng;
            }
            ConfigKey::MapZoom => {
                config.map.zoom = parse_value(&name, value)?;
            }
            ConfigKey::LoggingDirectory => {
                config.logging.directory = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
        }

        Ok(())
    }
}

fn positive_secs(key: &str, value: &str) -> Result<u64, ConfigError> {
    let secs: u64 = parse_value(key, value)?;
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be at least 1 second".to_string(),
        });
    }
    Ok(secs)
}

fn check_range(key: &str, value: &str, n: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if n.is_finite() && (min..=max).contains(&n) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: format!("must be between {} and {}", min, max),
        })
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: s.to_string(),
                value: String::new(),
                reason: "unknown configuration key".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
        }
        assert!("backend.nope".parse::<ConfigKey>().is_err());
    }

    #[test]
    fn test_set_base_url_trims_slashes() {
        let mut config = ConfigFile::default();
        ConfigKey::BackendApiBaseUrl
            .set(&mut config, "http://localhost:8000/")
            .unwrap();
        assert_eq!(
            ConfigKey::BackendApiBaseUrl.get(&config),
            "http://localhost:8000"
        );

        ConfigKey::BackendApiBaseUrl.set(&mut config, "").unwrap();
        assert!(config.backend.api_base_url.is_none());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = ConfigFile::default();
        assert!(ConfigKey::TrackingPollIntervalSecs
            .set(&mut config, "0")
            .is_err());
        assert_eq!(config.tracking.poll_interval_secs, 5);
    }

    #[test]
    fn test_fallback_latitude_range() {
        let mut config = ConfigFile::default();
        assert!(ConfigKey::MapFallbackLat.set(&mut config, "91").is_err());
        ConfigKey::MapFallbackLat.set(&mut config, "-33.86").unwrap();
        assert_eq!(config.map.fallback_lat, -33.86);
    }

    #[test]
    fn test_zoom_must_fit_u8() {
        let mut config = ConfigFile::default();
        assert!(ConfigKey::MapZoom.set(&mut config, "300").is_err());
    }
}
