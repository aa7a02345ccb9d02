//! Common types, enums, and error definitions for the dashboard client

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Error types for dashboard operations
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server reported error: {0}")]
    Api(String),

    #[error("Invalid data format: {0}")]
    InvalidData(String),

    #[error("Missing required input: {0}")]
    MissingInput(&'static str),
}

/// Temperature unit preference
///
/// Process-wide, in-memory only. Defaults to Celsius on startup; the backend
/// always delivers Celsius values and conversion happens at display time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    Celsius,
    Fahrenheit,
}

impl UnitPreference {
    /// Parse a unit preference from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "celsius" | "metric" | "c" => Some(UnitPreference::Celsius),
            "fahrenheit" | "imperial" | "f" => Some(UnitPreference::Fahrenheit),
            _ => None,
        }
    }

    /// Display suffix for temperatures in this unit
    pub fn label(self) -> &'static str {
        match self {
            UnitPreference::Celsius => "°C",
            UnitPreference::Fahrenheit => "°F",
        }
    }

    /// The other unit
    pub fn toggled(self) -> Self {
        match self {
            UnitPreference::Celsius => UnitPreference::Fahrenheit,
            UnitPreference::Fahrenheit => UnitPreference::Celsius,
        }
    }
}

impl Default for UnitPreference {
    fn default() -> Self {
        UnitPreference::Celsius
    }
}

impl fmt::Display for UnitPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitPreference::Celsius => write!(f, "celsius"),
            UnitPreference::Fahrenheit => write!(f, "fahrenheit"),
        }
    }
}

/// A place the dashboard is currently showing
///
/// Selected via city search or a favorite click; not persisted on its own
/// beyond the favorites list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
}

impl Location {
    pub fn new(city: impl Into<String>, lat: f64, lon: f64, timezone: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            lat,
            lon,
            timezone: timezone.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.4}, {:.4}, {})",
            self.city, self.lat, self.lon, self.timezone
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_preference_parsing() {
        assert_eq!(
            UnitPreference::from_str("celsius"),
            Some(UnitPreference::Celsius)
        );
        assert_eq!(
            UnitPreference::from_str("Fahrenheit"),
            Some(UnitPreference::Fahrenheit)
        );
        assert_eq!(
            UnitPreference::from_str("f"),
            Some(UnitPreference::Fahrenheit)
        );
        assert_eq!(UnitPreference::from_str("kelvin"), None);
    }

    #[test]
    fn test_unit_preference_toggle() {
        assert_eq!(UnitPreference::Celsius.toggled(), UnitPreference::Fahrenheit);
        assert_eq!(UnitPreference::Fahrenheit.toggled(), UnitPreference::Celsius);
    }

    #[test]
    fn test_unit_preference_default() {
        assert_eq!(UnitPreference::default(), UnitPreference::Celsius);
    }

    #[test]
    fn test_unit_labels() {
        assert_eq!(UnitPreference::Celsius.label(), "°C");
        assert_eq!(UnitPreference::Fahrenheit.label(), "°F");
    }

    #[test]
    fn test_unit_preference_serde() {
        let json = serde_json::to_string(&UnitPreference::Fahrenheit).unwrap();
        assert_eq!(json, "\"fahrenheit\"");
        let parsed: UnitPreference = serde_json::from_str("\"celsius\"").unwrap();
        assert_eq!(parsed, UnitPreference::Celsius);
    }

    #[test]
    fn test_location_display() {
        let loc = Location::new("Sydney", -33.8688, 151.2093, "Australia/Sydney");
        let text = loc.to_string();
        assert!(text.contains("Sydney"));
        assert!(text.contains("Australia/Sydney"));
    }
}
