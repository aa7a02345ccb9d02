//! Alert threshold checks
//!
//! Compares the latest reading against the stored [`AlertConfig`]. The
//! temperature reading arrives in Celsius and is converted exactly once, to
//! the unit the config was saved in; the current display preference plays no
//! part in the comparison. Precipitation is always millimetres.

use crate::prefs::AlertConfig;
use crate::types::UnitPreference;
use crate::units;

/// A threshold exceeded by the latest reading
#[derive(Debug, Clone, PartialEq)]
pub enum ThresholdBreach {
    Temperature {
        reading: f64,
        limit: f64,
        units: UnitPreference,
    },
    Rain {
        reading: f64,
        limit: f64,
    },
}

impl ThresholdBreach {
    /// Notification text for this breach
    pub fn message(&self) -> String {
        match self {
            ThresholdBreach::Temperature {
                reading,
                limit,
                units,
            } => format!(
                "Temperature alert: {:.1}{} exceeds your {:.1}{} threshold",
                reading,
                units.label(),
                limit,
                units.label()
            ),
            ThresholdBreach::Rain { reading, limit } => format!(
                "Rain alert: {:.1} mm exceeds your {:.1} mm threshold",
                reading, limit
            ),
        }
    }
}

/// Check the current reading against stored thresholds
///
/// With no stored config this never produces a breach. Temperature and rain
/// are compared independently; both may breach in the same check.
pub fn check(temp_c: f64, precip_mm: f64, config: Option<&AlertConfig>) -> Vec<ThresholdBreach> {
    let Some(config) = config else {
        return Vec::new();
    };

    let mut breaches = Vec::new();

    let reading = units::convert(temp_c, config.units);
    if reading > config.max_temp {
        breaches.push(ThresholdBreach::Temperature {
            reading,
            limit: config.max_temp,
            units: config.units,
        });
    }

    if precip_mm > config.max_rain {
        breaches.push(ThresholdBreach::Rain {
            reading: precip_mm,
            limit: config.max_rain,
        });
    }

    breaches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn celsius_config(max_temp: f64, max_rain: f64) -> AlertConfig {
        AlertConfig {
            max_temp,
            max_rain,
            units: UnitPreference::Celsius,
        }
    }

    #[test]
    fn test_no_config_never_alerts() {
        assert!(check(55.0, 500.0, None).is_empty());
        assert!(check(f64::NAN, f64::NAN, None).is_empty());
    }

    #[test]
    fn test_temperature_breach_only() {
        let config = celsius_config(25.0, 5.0);
        let breaches = check(26.0, 0.0, Some(&config));
        assert_eq!(breaches.len(), 1);
        assert_eq!(
            breaches[0],
            ThresholdBreach::Temperature {
                reading: 26.0,
                limit: 25.0,
                units: UnitPreference::Celsius,
            }
        );
    }

    #[test]
    fn test_rain_breach_only() {
        let config = celsius_config(25.0, 5.0);
        let breaches = check(20.0, 7.5, Some(&config));
        assert_eq!(breaches.len(), 1);
        assert!(matches!(breaches[0], ThresholdBreach::Rain { .. }));
    }

    #[test]
    fn test_both_breach_in_one_check() {
        let config = celsius_config(25.0, 5.0);
        let breaches = check(30.0, 10.0, Some(&config));
        assert_eq!(breaches.len(), 2);
    }

    #[test]
    fn test_at_threshold_does_not_breach() {
        let config = celsius_config(25.0, 5.0);
        assert!(check(25.0, 5.0, Some(&config)).is_empty());
    }

    #[test]
    fn test_fahrenheit_config_converts_once() {
        // 26°C reads as 78.8°F against a 77°F limit
        let config = AlertConfig {
            max_temp: 77.0,
            max_rain: 5.0,
            units: UnitPreference::Fahrenheit,
        };
        let breaches = check(26.0, 0.0, Some(&config));
        assert_eq!(breaches.len(), 1);
        match &breaches[0] {
            ThresholdBreach::Temperature { reading, .. } => {
                assert!((reading - 78.8).abs() < 1e-9);
            }
            other => panic!("unexpected breach: {:?}", other),
        }
    }

    #[test]
    fn test_breach_messages() {
        let config = celsius_config(25.0, 5.0);
        let breaches = check(26.0, 7.0, Some(&config));
        assert!(breaches[0].message().contains("26.0°C"));
        assert!(breaches[1].message().contains("7.0 mm"));
    }
}
