//! Ride PIN parsing.
//!
//! A PIN is the numeric session identifier correlating a rider and a driver.
//! The backend stores PINs as digit strings, so leading zeros are significant:
//! `0042` and `42` are different rides.
//!
//! Examples:
//! - `0042` (valid)
//! - `123456` (valid)
//! - `-1`, `12a`, ` 42` and the empty string (invalid)

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::TrackingError;

/// Shortest PIN the backend accepts on location reports.
pub const MIN_REPORT_PIN_LEN: usize = 4;

/// Longest PIN the backend accepts on location reports.
pub const MAX_REPORT_PIN_LEN: usize = 6;

/// Query parameter carrying the PIN in share links.
pub const PIN_QUERY_PARAM: &str = "pin";

fn pin_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Digits only, no sign, no whitespace
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]+$").unwrap())
}

/// A validated ride PIN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionPin(String);

impl SessionPin {
    /// Parse a raw PIN string.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::InvalidIdentifier`] unless the input is a
    /// non-empty run of ASCII digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use ridetrack::pin::SessionPin;
    ///
    /// let pin = SessionPin::parse("0042").unwrap();
    /// assert_eq!(pin.as_str(), "0042");
    /// assert!(SessionPin::parse("42a").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, TrackingError> {
        if pin_pattern().is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(TrackingError::InvalidIdentifier(raw.to_string()))
        }
    }

    /// Extract the PIN from a share link such as `https://host/live?pin=0042`.
    pub fn from_share_link(link: &str) -> Result<Self, TrackingError> {
        let url = reqwest::Url::parse(link)
            .map_err(|_| TrackingError::InvalidIdentifier(link.to_string()))?;

        let raw = url
            .query_pairs()
            .find(|(key, _)| key == PIN_QUERY_PARAM)
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| TrackingError::InvalidIdentifier(link.to_string()))?;

        Self::parse(&raw)
    }

    /// The PIN as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the stricter length rule applied to location reports.
    pub fn ensure_reportable(&self) -> Result<(), TrackingError> {
        let len = self.0.len();
        if (MIN_REPORT_PIN_LEN..=MAX_REPORT_PIN_LEN).contains(&len) {
            Ok(())
        } else {
            Err(TrackingError::InvalidIdentifier(self.0.clone()))
        }
    }
}

impl FromStr for SessionPin {
    type Err = TrackingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SessionPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_leading_zeros() {
        let pin = SessionPin::parse("0042").unwrap();
        assert_eq!(pin.as_str(), "0042");
        assert_eq!(pin.to_string(), "0042");
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        for raw in ["", "abc", "12a", "-1", "+7", " 42", "42 ", "4.2", "٤٢"] {
            assert_eq!(
                SessionPin::parse(raw),
                Err(TrackingError::InvalidIdentifier(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_str() {
        let pin: SessionPin = "7".parse().unwrap();
        assert_eq!(pin.as_str(), "7");
    }

    #[test]
    fn test_from_share_link() {
        let pin = SessionPin::from_share_link("https://rides.example.com/live?pin=0042").unwrap();
        assert_eq!(pin.as_str(), "0042");

        let pin =
            SessionPin::from_share_link("http://localhost:3000/live?theme=dark&pin=123456").unwrap();
        assert_eq!(pin.as_str(), "123456");
    }

    #[test]
    fn test_from_share_link_missing_or_invalid() {
        assert!(SessionPin::from_share_link("https://rides.example.com/live").is_err());
        assert!(SessionPin::from_share_link("https://rides.example.com/live?pin=12x").is_err());
        assert!(SessionPin::from_share_link("not a url").is_err());
    }

    #[test]
    fn test_ensure_reportable() {
        assert!(SessionPin::parse("0042").unwrap().ensure_reportable().is_ok());
        assert!(SessionPin::parse("123456").unwrap().ensure_reportable().is_ok());
        assert!(SessionPin::parse("123").unwrap().ensure_reportable().is_err());
        assert!(SessionPin::parse("1234567").unwrap().ensure_reportable().is_err());
    }
}
