//! WMO weather code mapping
//!
//! Maps the integer weather codes delivered by the backend (WMO code table)
//! to human-readable condition text and to one of three page background
//! categories. Both mappings are total over `i32`.

use std::fmt;

/// Human-readable condition text for a WMO weather code
///
/// Codes outside the fixed table map to `"Unknown"`.
pub fn condition_label(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

/// Page background category derived from the weather code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundCategory {
    Sunny,
    Rainy,
    Cloudy,
}

impl BackgroundCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            BackgroundCategory::Sunny => "sunny",
            BackgroundCategory::Rainy => "rainy",
            BackgroundCategory::Cloudy => "cloudy",
        }
    }
}

impl fmt::Display for BackgroundCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bucket a weather code into a background category
///
/// Codes 0-2 are sunny, the drizzle/rain/thunder range 51-99 is rainy, and
/// everything else is cloudy. The snow codes inside 51-99 deliberately fall
/// into cloudy rather than a snow category of their own.
pub fn background_category(code: i32) -> BackgroundCategory {
    match code {
        0 | 1 | 2 => BackgroundCategory::Sunny,
        71 | 73 | 75 | 77 | 85 | 86 => BackgroundCategory::Cloudy,
        51..=99 => BackgroundCategory::Rainy,
        _ => BackgroundCategory::Cloudy,
    }
}
