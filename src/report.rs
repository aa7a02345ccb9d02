//! Downloadable forecast summary
//!
//! Renders a [`ForecastSeries`] as the plain-text artifact offered for
//! download: one line per day, temperatures in the active display unit,
//! precipitation as received (millimetres).

use crate::conditions::condition_label;
use crate::gateway::ForecastSeries;
use crate::types::UnitPreference;
use crate::units;

/// Render the forecast as one `"<date>: Max .., Min .., Precip .. mm, Condition: ..\n"` line per day
pub fn forecast_report(series: &ForecastSeries, units: UnitPreference) -> String {
    let mut out = String::new();
    for i in 0..series.len() {
        out.push_str(&format!(
            "{}: Max {}, Min {}, Precip {} mm, Condition: {}\n",
            series.time[i],
            units::format_temp(series.temperature_2m_max[i], units),
            units::format_temp(series.temperature_2m_min[i], units),
            series.precipitation_sum[i],
            condition_label(series.weather_code[i]),
        ));
    }
    out
}
