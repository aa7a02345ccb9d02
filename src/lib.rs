//! Weather Dashboard Client
//!
//! This library implements the client side of the weather-companion
//! dashboard: it talks to the backend HTTP API, keeps explicit application
//! state, renders results into the named regions of a display surface, draws
//! line charts with a single-live-instance lifecycle, and persists favorites
//! and alert thresholds locally.
//!
//! # Modules
//!
//! - `gateway`: typed HTTP operations against the backend endpoints
//! - `display`: display surfaces and the dashboard render orchestration
//! - `conditions`: WMO weather-code to text/background mapping
//! - `units`: Celsius/Fahrenheit conversion and formatting
//! - `prefs`: file-backed favorites and alert thresholds
//! - `alerts`: threshold checks against the latest reading
//! - `chart`: chart handles and surfaces
//! - `report`: downloadable forecast summary
//! - `state`: current location and unit preference
//! - `types`: common types and error definitions

pub mod alerts;
pub mod chart;
pub mod conditions;
pub mod display;
pub mod gateway;
pub mod prefs;
pub mod report;
pub mod state;
pub mod types;
pub mod units;

pub use alerts::{check as check_alerts, ThresholdBreach};
pub use chart::{ChartHandle, ChartSpec, ChartSurface, Dataset};
pub use conditions::{background_category, condition_label, BackgroundCategory};
pub use display::{Dashboard, DisplaySurface, MemorySurface, Region, TerminalSurface};
pub use gateway::{
    CurrentConditions, DashboardClient, ForecastSeries, MoodEntry, SearchResult, TrendSeries,
    WeatherBundle, WeatherSnapshot,
};
pub use prefs::{AlertConfig, Favorite, PreferenceStore};
pub use report::forecast_report;
pub use state::AppState;
pub use types::{DashboardError, Location, Result, UnitPreference};
