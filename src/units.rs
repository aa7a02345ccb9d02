//! Temperature unit conversion and display formatting
//!
//! The backend delivers every temperature in Celsius. Conversion to the
//! active unit preference happens here, at display time, from the stored
//! Celsius value. Text output rounds to one decimal place; chart series are
//! converted without rounding.

use crate::types::UnitPreference;

/// Convert a Celsius value to the display unit
///
/// Identity for Celsius; `c * 9/5 + 32` for Fahrenheit. NaN propagates.
pub fn convert(celsius: f64, units: UnitPreference) -> f64 {
    match units {
        UnitPreference::Celsius => celsius,
        UnitPreference::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
    }
}

/// Format a Celsius value for text display, one decimal place plus unit label
pub fn format_temp(celsius: f64, units: UnitPreference) -> String {
    format!("{:.1}{}", convert(celsius, units), units.label())
}

/// Convert a Celsius series for charting, unrounded
pub fn convert_series(values: &[f64], units: UnitPreference) -> Vec<f64> {
    values.iter().map(|&v| convert(v, units)).collect()
}
