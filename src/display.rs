//! Display synchronization
//!
//! Takes fetched payloads and updates the named regions of a display
//! surface, triggering dependent fetches (trend chart, city image) and alert
//! checks along the way. The surface itself is a trait so the whole render
//! path can run against an in-memory implementation in tests; the binary
//! plugs in a terminal-backed one.
//!
//! Two-state render machine for weather payloads: the server reports fetch
//! failures inline, so a payload either renders the error message into the
//! weather region and stops, or renders the full view and fans out.
//!
//! In-flight requests are never cancelled. A reply that arrives after the
//! user has moved on is still applied: last response wins.

use crate::alerts;
use crate::chart::{ChartSpec, ChartSurface, Dataset};
use crate::conditions::{background_category, condition_label, BackgroundCategory};
use crate::gateway::{CurrentConditions, DashboardClient, WeatherBundle};
use crate::prefs::{AlertConfig, PreferenceStore};
use crate::report;
use crate::state::AppState;
use crate::types::{DashboardError, Result};
use crate::units;
use log::info;
use std::collections::HashMap;

/// Named regions of the dashboard view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Weather,
    Suggestions,
    CalendarAlerts,
    CommuteResult,
    BestTimes,
    Favorites,
    CityImage,
}

impl Region {
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Weather => "weather",
            Region::Suggestions => "suggestions",
            Region::CalendarAlerts => "calendar-alerts",
            Region::CommuteResult => "commute-result",
            Region::BestTimes => "best-times",
            Region::Favorites => "favorites",
            Region::CityImage => "city-image",
        }
    }
}

/// A render target for the dashboard
///
/// `notify` is the blocking-notification channel: threshold breaches,
/// validation complaints, and server-reported errors all land there.
pub trait DisplaySurface {
    fn set_text(&mut self, region: Region, text: &str);
    fn set_background(&mut self, category: BackgroundCategory);
    fn notify(&mut self, message: &str);
}

/// Records every render into memory; the test surface
#[derive(Debug, Default)]
pub struct MemorySurface {
    regions: HashMap<Region, String>,
    background: Option<BackgroundCategory>,
    notifications: Vec<String>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, region: Region) -> Option<&str> {
        self.regions.get(&region).map(String::as_str)
    }

    pub fn background(&self) -> Option<BackgroundCategory> {
        self.background
    }

    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }
}

impl DisplaySurface for MemorySurface {
    fn set_text(&mut self, region: Region, text: &str) {
        self.regions.insert(region, text.to_string());
    }

    fn set_background(&mut self, category: BackgroundCategory) {
        self.background = Some(category);
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }
}

/// Prints straight to stdout; the binary's render target
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl TerminalSurface {
    pub fn new() -> Self {
        Self
    }
}

impl DisplaySurface for TerminalSurface {
    fn set_text(&mut self, region: Region, text: &str) {
        println!("--- {} ---", region.as_str());
        println!("{}", text);
    }

    fn set_background(&mut self, category: BackgroundCategory) {
        println!("[background: {}]", category);
    }

    fn notify(&mut self, message: &str) {
        println!("(!) {}", message);
    }
}

/// The dashboard itself: state, gateway, preference store, and render target
pub struct Dashboard<S: DisplaySurface> {
    client: DashboardClient,
    prefs: PreferenceStore,
    state: AppState,
    surface: S,
    trend_chart: ChartSurface,
    mood_chart: ChartSurface,
    last_reading: Option<CurrentConditions>,
}

impl<S: DisplaySurface> Dashboard<S> {
    pub fn new(client: DashboardClient, prefs: PreferenceStore, surface: S) -> Self {
        Self {
            client,
            prefs,
            state: AppState::new(),
            surface,
            trend_chart: ChartSurface::new(),
            mood_chart: ChartSurface::new(),
            last_reading: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn trend_chart(&self) -> &ChartSurface {
        &self.trend_chart
    }

    pub fn mood_chart(&self) -> &ChartSurface {
        &self.mood_chart
    }

    /// Stored alert thresholds, for populating the settings view
    pub fn alert_settings(&self) -> Option<AlertConfig> {
        self.prefs.load_alerts()
    }

    /// Resolve a city by name, make it current, and refresh the view
    pub async fn select_city(&mut self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            self.surface.notify("Please enter a city");
            return Ok(());
        }
        match self.client.search_city(name).await {
            Ok(result) => {
                if let Some(url) = &result.image_url {
                    self.surface.set_text(Region::CityImage, url);
                }
                self.state.set_location(result.location());
                self.refresh_weather().await
            }
            Err(DashboardError::Api(message)) => {
                self.surface.notify(&message);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Fetch weather for the current location and synchronize the view
    ///
    /// On a successful render this fans out to the dependent fetches: the
    /// trend chart and the city image.
    pub async fn refresh_weather(&mut self) -> Result<()> {
        let location = match self.state.location() {
            Some(location) => location.clone(),
            None => {
                self.surface.notify("Please enter a location");
                return Ok(());
            }
        };

        let bundle = self.client.fetch_weather(&location).await?;
        if self.update_display(&bundle) {
            self.refresh_trends().await?;
            self.refresh_city_image(&location.city).await;
        }
        Ok(())
    }

    /// Render a decoded weather payload into the view
    ///
    /// Returns whether the payload rendered successfully; an inline server
    /// error renders into the weather region and stops there.
    pub fn update_display(&mut self, bundle: &WeatherBundle) -> bool {
        match &bundle.weather {
            Err(message) => {
                self.surface
                    .set_text(Region::Weather, &format!("Error: {}", message));
                false
            }
            Ok(snapshot) => {
                let units_pref = self.state.unit_preference();
                let current = &snapshot.current;
                let text = format!(
                    "Temperature: {}\nFeels Like: {}\nPrecipitation: {} mm\nCondition: {}",
                    units::format_temp(current.temperature_2m, units_pref),
                    units::format_temp(current.apparent_temperature, units_pref),
                    current.precipitation,
                    condition_label(current.weather_code),
                );
                self.surface.set_text(Region::Weather, &text);
                self.surface
                    .set_text(Region::Suggestions, &bundle.suggestions.join("\n"));
                self.surface
                    .set_background(background_category(current.weather_code));

                // Threshold checks always run on the raw Celsius reading
                for breach in alerts::check(
                    current.temperature_2m,
                    current.precipitation,
                    self.prefs.load_alerts().as_ref(),
                ) {
                    self.surface.notify(&breach.message());
                }

                self.last_reading = Some(current.clone());
                true
            }
        }
    }

    /// Fetch the trend series and redraw the trend chart
    pub async fn refresh_trends(&mut self) -> Result<()> {
        let location = match self.state.location() {
            Some(location) => location.clone(),
            None => return Ok(()),
        };
        match self.client.fetch_trends(&location).await {
            Ok(series) => {
                let units_pref = self.state.unit_preference();
                let spec = ChartSpec {
                    labels: series.time.clone(),
                    datasets: vec![Dataset::new(
                        format!("Mean temperature ({})", units_pref.label()),
                        units::convert_series(&series.temperature_2m_mean, units_pref),
                    )],
                };
                let handle = self.trend_chart.draw(spec);
                info!("trend chart redrawn: {}", handle);
                Ok(())
            }
            Err(DashboardError::Api(message)) => {
                self.surface.notify(&message);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn refresh_city_image(&mut self, city: &str) {
        if let Some(url) = self.client.city_image(city).await {
            self.surface.set_text(Region::CityImage, &url);
        }
    }

    /// Flip the display unit and re-render weather and trends
    ///
    /// Favorites and alert settings are not re-fetched.
    pub async fn switch_units(&mut self) -> Result<()> {
        let units_pref = self.state.toggle_units();
        info!("display units now {}", units_pref);
        if self.state.location().is_none() {
            return Ok(());
        }
        self.refresh_weather().await
    }

    /// Save the current location as a favorite
    pub fn save_favorite(&mut self) -> Result<()> {
        let location = match self.state.location() {
            Some(location) => location.clone(),
            None => {
                self.surface.notify("Please enter a city");
                return Ok(());
            }
        };
        if self.prefs.add_favorite(location.into())? {
            self.surface.notify("Favorite added!");
        }
        Ok(())
    }

    /// Render the saved favorites list
    pub fn show_favorites(&mut self) {
        let favorites = self.prefs.load_favorites();
        let text = if favorites.is_empty() {
            "No favorites".to_string()
        } else {
            favorites
                .iter()
                .map(|f| f.city.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        };
        self.surface.set_text(Region::Favorites, &text);
    }

    /// Make a saved favorite the current location and refresh the view
    pub async fn select_favorite(&mut self, city: &str) -> Result<()> {
        let favorite = self
            .prefs
            .load_favorites()
            .into_iter()
            .find(|f| f.city == city);
        match favorite {
            Some(favorite) => {
                self.state.set_location(favorite.into());
                self.refresh_weather().await
            }
            None => {
                self.surface.notify(&format!("No favorite named {}", city));
                Ok(())
            }
        }
    }

    /// Persist alert thresholds under the active unit preference
    pub fn set_alert_thresholds(&mut self, max_temp: f64, max_rain: f64) -> Result<()> {
        self.prefs
            .set_alerts(max_temp, max_rain, self.state.unit_preference())?;
        self.surface.notify("Alert thresholds saved");
        Ok(())
    }

    /// Cross-check upcoming calendar events against rain at a location
    pub async fn check_calendar(&mut self, location: &str) -> Result<()> {
        if location.trim().is_empty() {
            self.surface.notify("Please enter a location");
            return Ok(());
        }
        match self.client.check_calendar(location).await {
            Ok(alerts) => {
                let text = if alerts.is_empty() {
                    "No rain alerts".to_string()
                } else {
                    alerts.join("\n")
                };
                self.surface.set_text(Region::CalendarAlerts, &text);
                Ok(())
            }
            Err(DashboardError::Api(message)) => {
                self.surface.notify(&message);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Fetch and render the commute advisory for a departure time
    pub async fn commute_alert(&mut self, time: &str, location: &str) -> Result<()> {
        if location.trim().is_empty() || time.trim().is_empty() {
            self.surface.notify("Please enter location and time");
            return Ok(());
        }
        match self.client.commute_alert(time, location).await {
            Ok(alert) => {
                self.surface.set_text(Region::CommuteResult, &alert);
                Ok(())
            }
            Err(DashboardError::Api(message)) => {
                self.surface.notify(&message);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Fetch and render the best hours for an activity on a date
    pub async fn best_times(&mut self, activity: &str, date: &str, location: &str) -> Result<()> {
        if location.trim().is_empty() || date.trim().is_empty() || activity.trim().is_empty() {
            self.surface
                .notify("Please enter activity, date, and location");
            return Ok(());
        }
        match self.client.best_times(activity, date, location).await {
            Ok(times) => {
                let text = if times.is_empty() {
                    "No suitable times".to_string()
                } else {
                    times.join("\n")
                };
                self.surface.set_text(Region::BestTimes, &text);
                Ok(())
            }
            Err(DashboardError::Api(message)) => {
                self.surface.notify(&message);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Record a mood reading against the last rendered conditions
    pub async fn save_mood(&mut self, mood_input: &str) -> Result<()> {
        let reading = match self.last_reading.clone() {
            Some(reading) => reading,
            None => {
                self.surface.notify("Get weather first!");
                return Ok(());
            }
        };
        let mood = match mood_input.trim().parse::<u8>() {
            Ok(mood @ 1..=10) => mood,
            _ => {
                self.surface
                    .notify("Mood must be a number between 1 and 10");
                return Ok(());
            }
        };
        match self
            .client
            .save_mood(
                mood,
                reading.temperature_2m,
                condition_label(reading.weather_code),
            )
            .await
        {
            Ok(()) => {
                self.surface.notify("Mood saved!");
                Ok(())
            }
            Err(DashboardError::Api(message)) => {
                self.surface.notify(&message);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Fetch the mood history and redraw the mood chart
    pub async fn show_mood_history(&mut self) -> Result<()> {
        let moods = self.client.get_moods().await?;
        let labels: Vec<String> = moods.iter().map(|m| m.recorded_at.clone()).collect();
        let scores: Vec<f64> = moods
            .iter()
            .map(|m| m.mood.parse().unwrap_or(f64::NAN))
            .collect();
        let temps: Vec<f64> = moods
            .iter()
            .map(|m| m.temp.parse().unwrap_or(f64::NAN))
            .collect();
        let handle = self.mood_chart.draw(ChartSpec {
            labels,
            datasets: vec![
                Dataset::new("Mood", scores),
                Dataset::new("Temperature (°C)", temps),
            ],
        });
        info!("mood chart redrawn: {}", handle);
        Ok(())
    }

    /// Save a favorite on the server (alternate, server-backed favorites)
    pub async fn add_favorite_remote(&mut self, city: &str) -> Result<()> {
        if city.trim().is_empty() {
            self.surface.notify("Please enter a city");
            return Ok(());
        }
        match self.client.add_favorite_remote(city).await {
            Ok(()) => {
                self.surface.notify("Favorite added!");
                Ok(())
            }
            Err(DashboardError::Api(message)) => {
                self.surface.notify(&message);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Render the server-backed favorites list
    pub async fn show_favorites_remote(&mut self) -> Result<()> {
        match self.client.get_favorites_remote().await {
            Ok(favorites) => {
                let text = if favorites.is_empty() {
                    "No favorites".to_string()
                } else {
                    favorites.join("\n")
                };
                self.surface.set_text(Region::Favorites, &text);
                Ok(())
            }
            Err(DashboardError::Api(message)) => {
                self.surface.notify(&message);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Build the downloadable forecast summary for the current location
    pub async fn forecast_summary(&mut self) -> Result<Option<String>> {
        let location = match self.state.location() {
            Some(location) => location.clone(),
            None => {
                self.surface.notify("Please enter a location");
                return Ok(None);
            }
        };
        match self.client.fetch_forecast(&location).await {
            Ok(series) => Ok(Some(report::forecast_report(
                &series,
                self.state.unit_preference(),
            ))),
            Err(DashboardError::Api(message)) => {
                self.surface.notify(&message);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::WeatherSnapshot;
    use crate::types::UnitPreference;

    fn dashboard() -> (tempfile::TempDir, Dashboard<MemorySurface>) {
        let dir = tempfile::tempdir().unwrap();
        let client = DashboardClient::new("http://127.0.0.1:9", Some(0));
        let prefs = PreferenceStore::new(dir.path());
        (dir, Dashboard::new(client, prefs, MemorySurface::new()))
    }

    fn bundle(temp: f64, feels: f64, precip: f64, code: i32, suggestions: &[&str]) -> WeatherBundle {
        WeatherBundle {
            weather: Ok(WeatherSnapshot {
                current: CurrentConditions {
                    temperature_2m: temp,
                    apparent_temperature: feels,
                    precipitation: precip,
                    weather_code: code,
                },
            }),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_render_success_celsius() {
        let (_dir, mut dash) = dashboard();
        assert!(dash.update_display(&bundle(20.0, 18.0, 0.0, 1, &["Wear a hat"])));

        let weather = dash.surface().text(Region::Weather).unwrap();
        assert!(weather.contains("Temperature: 20.0°C"));
        assert!(weather.contains("Feels Like: 18.0°C"));
        assert!(weather.contains("Condition: Mainly clear"));
        assert_eq!(dash.surface().background(), Some(BackgroundCategory::Sunny));
        assert_eq!(dash.surface().text(Region::Suggestions), Some("Wear a hat"));
        assert!(dash.surface().notifications().is_empty());
    }

    #[test]
    fn test_render_success_fahrenheit() {
        let (_dir, mut dash) = dashboard();
        dash.state_mut().set_unit_preference(UnitPreference::Fahrenheit);
        dash.update_display(&bundle(20.0, 18.0, 0.0, 1, &[]));

        let weather = dash.surface().text(Region::Weather).unwrap();
        assert!(weather.contains("Temperature: 68.0°F"));
        assert!(weather.contains("Feels Like: 64.4°F"));
    }

    #[test]
    fn test_render_error_state() {
        let (_dir, mut dash) = dashboard();
        let bundle = WeatherBundle {
            weather: Err("Failed to fetch weather data".to_string()),
            suggestions: vec![],
        };
        assert!(!dash.update_display(&bundle));
        assert_eq!(
            dash.surface().text(Region::Weather),
            Some("Error: Failed to fetch weather data")
        );
        assert!(dash.surface().background().is_none());
    }

    #[test]
    fn test_rainy_background() {
        let (_dir, mut dash) = dashboard();
        dash.update_display(&bundle(12.0, 10.0, 2.5, 63, &[]));
        assert_eq!(dash.surface().background(), Some(BackgroundCategory::Rainy));
    }

    #[test]
    fn test_no_alert_config_no_notifications() {
        let (_dir, mut dash) = dashboard();
        dash.update_display(&bundle(55.0, 60.0, 400.0, 0, &[]));
        assert!(dash.surface().notifications().is_empty());
    }

    #[test]
    fn test_temperature_breach_notifies_once() {
        let (_dir, mut dash) = dashboard();
        dash.set_alert_thresholds(25.0, 5.0).unwrap();
        dash.update_display(&bundle(26.0, 25.0, 0.0, 0, &[]));

        let temp_alerts = dash
            .surface()
            .notifications()
            .iter()
            .filter(|n| n.contains("Temperature alert"))
            .count();
        let rain_alerts = dash
            .surface()
            .notifications()
            .iter()
            .filter(|n| n.contains("Rain alert"))
            .count();
        assert_eq!(temp_alerts, 1);
        assert_eq!(rain_alerts, 0);
    }

    #[test]
    fn test_alert_settings_roundtrip() {
        let (_dir, mut dash) = dashboard();
        assert!(dash.alert_settings().is_none());
        dash.set_alert_thresholds(25.0, 5.0).unwrap();
        let config = dash.alert_settings().unwrap();
        assert_eq!(config.max_temp, 25.0);
        assert_eq!(config.units, UnitPreference::Celsius);
    }

    #[test]
    fn test_show_favorites_empty_and_populated() {
        let (_dir, mut dash) = dashboard();
        dash.show_favorites();
        assert_eq!(dash.surface().text(Region::Favorites), Some("No favorites"));

        dash.state_mut().set_location(crate::types::Location::new(
            "Sydney",
            -33.87,
            151.21,
            "Australia/Sydney",
        ));
        dash.save_favorite().unwrap();
        dash.save_favorite().unwrap();
        dash.show_favorites();
        assert_eq!(dash.surface().text(Region::Favorites), Some("Sydney"));

        // only the first save notifies
        let added = dash
            .surface()
            .notifications()
            .iter()
            .filter(|n| n.contains("Favorite added"))
            .count();
        assert_eq!(added, 1);
    }

    #[tokio::test]
    async fn test_input_validation_blocks_requests() {
        // points at a closed port: any request slipping past validation fails loudly
        let (_dir, mut dash) = dashboard();

        dash.select_city("").await.unwrap();
        dash.check_calendar("  ").await.unwrap();
        dash.commute_alert("", "Sydney").await.unwrap();
        dash.best_times("", "2024-01-01", "Sydney").await.unwrap();
        dash.add_favorite_remote("").await.unwrap();
        dash.save_mood("7").await.unwrap();

        assert_eq!(dash.surface().notifications().len(), 6);
        assert!(dash.surface().notifications()[5].contains("Get weather first"));
    }

    #[tokio::test]
    async fn test_mood_range_validation() {
        let (_dir, mut dash) = dashboard();
        dash.update_display(&bundle(20.0, 18.0, 0.0, 1, &[]));

        dash.save_mood("0").await.unwrap();
        dash.save_mood("11").await.unwrap();
        dash.save_mood("happy").await.unwrap();

        let complaints = dash
            .surface()
            .notifications()
            .iter()
            .filter(|n| n.contains("between 1 and 10"))
            .count();
        assert_eq!(complaints, 3);
    }

    #[tokio::test]
    async fn test_refresh_without_location_notifies() {
        let (_dir, mut dash) = dashboard();
        dash.refresh_weather().await.unwrap();
        assert_eq!(dash.surface().notifications().len(), 1);
    }
}
