//! Remote data gateway for the weather-companion backend
//!
//! One operation per backend endpoint. Each builds a GET with query
//! parameters or a POST with a JSON body, awaits the JSON reply, and decodes
//! it into an explicit success-or-error schema at this boundary, so rendering
//! code never inspects raw payloads. Server-reported errors become
//! [`DashboardError::Api`] without touching any other component's state.
//!
//! The weather, trend, and forecast fetches keep a short-lived response cache
//! keyed by rounded coordinates. The city-image lookup is deliberately
//! forgiving: every failure is logged and collapsed to `None`, because an
//! image must never block weather display.

use crate::types::{DashboardError, Location, Result};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A backend reply that is either the expected payload or `{"error": ...}`
///
/// Variant order matters: the error shape is tried first so that payload
/// types which tolerate unknown fields cannot swallow an error reply.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Reply<T> {
    Err { error: String },
    Ok(T),
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Err { error } => Err(DashboardError::Api(error)),
        }
    }
}

/// Current conditions block of a `/weather` reply
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentConditions {
    pub temperature_2m: f64,
    pub apparent_temperature: f64,
    pub precipitation: f64,
    pub weather_code: i32,
}

/// Successful `/weather` payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct WeatherEnvelope {
    weather: Reply<WeatherSnapshot>,
    #[serde(default)]
    suggestions: Vec<String>,
}

/// Decoded `/weather` reply
///
/// The server reports fetch failures inline, as an error string in place of
/// the snapshot; suggestions are delivered either way and rendered verbatim.
#[derive(Debug, Clone)]
pub struct WeatherBundle {
    pub weather: std::result::Result<WeatherSnapshot, String>,
    pub suggestions: Vec<String>,
}

/// Daily mean-temperature history, index-aligned with `time`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrendSeries {
    pub time: Vec<String>,
    pub temperature_2m_mean: Vec<f64>,
}

impl TrendSeries {
    fn validate(self) -> Result<Self> {
        if self.time.len() != self.temperature_2m_mean.len() {
            return Err(DashboardError::InvalidData(format!(
                "trend series misaligned: {} times, {} values",
                self.time.len(),
                self.temperature_2m_mean.len()
            )));
        }
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
struct TrendEnvelope {
    daily: TrendSeries,
}

/// Seven-day forecast, all columns index-aligned with `time`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastSeries {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    pub precipitation_sum: Vec<f64>,
    pub weather_code: Vec<i32>,
}

impl ForecastSeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    fn validate(self) -> Result<Self> {
        let n = self.time.len();
        if self.temperature_2m_max.len() != n
            || self.temperature_2m_min.len() != n
            || self.precipitation_sum.len() != n
            || self.weather_code.len() != n
        {
            return Err(DashboardError::InvalidData(format!(
                "forecast series misaligned: {} days, {}/{}/{}/{} values",
                n,
                self.temperature_2m_max.len(),
                self.temperature_2m_min.len(),
                self.precipitation_sum.len(),
                self.weather_code.len()
            )));
        }
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
struct ForecastEnvelope {
    daily: ForecastSeries,
}

/// `/search_city` match; the backend resolves the image alongside the lookup
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl SearchResult {
    pub fn location(&self) -> Location {
        Location::new(self.city.clone(), self.lat, self.lon, self.timezone.clone())
    }
}

#[derive(Debug, Deserialize)]
struct CityImageReply {
    image_url: String,
}

#[derive(Debug, Deserialize)]
struct CalendarReply {
    alerts: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CommuteReply {
    alert: String,
}

#[derive(Debug, Deserialize)]
struct BestTimesReply {
    best_times: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AckReply {}

#[derive(Debug, Deserialize)]
struct MoodsReply {
    moods: Vec<(String, String, String)>,
}

#[derive(Debug, Deserialize)]
struct FavoritesReply {
    favorites: Vec<String>,
}

/// One saved mood reading: when, the 1-10 score, and the temperature at save time
#[derive(Debug, Clone, PartialEq)]
pub struct MoodEntry {
    pub recorded_at: String,
    pub mood: String,
    pub temp: String,
}

#[derive(Debug, Clone)]
struct Cached<T> {
    data: T,
    fetched_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct ResponseCache {
    weather: HashMap<(i64, i64), Cached<WeatherBundle>>,
    trends: HashMap<(i64, i64), Cached<TrendSeries>>,
    forecast: HashMap<(i64, i64), Cached<ForecastSeries>>,
}

fn cache_key(location: &Location) -> (i64, i64) {
    (
        (location.lat * 10_000.0).round() as i64,
        (location.lon * 10_000.0).round() as i64,
    )
}

fn fresh<T: Clone>(entry: Option<&Cached<T>>, max_age_secs: i64) -> Option<T> {
    let cached = entry?;
    let age = Utc::now()
        .signed_duration_since(cached.fetched_at)
        .num_seconds();
    if age < max_age_secs {
        debug!("cache hit (age {}s, max {}s)", age, max_age_secs);
        Some(cached.data.clone())
    } else {
        None
    }
}

/// HTTP client for the dashboard backend
pub struct DashboardClient {
    base_url: String,
    client: reqwest::Client,
    cache: Arc<RwLock<ResponseCache>>,
    cache_duration_secs: i64,
}

impl DashboardClient {
    /// Create a client for the backend at `base_url`
    ///
    /// # Arguments
    /// * `cache_duration_secs` - How long to serve cached weather/trend/
    ///   forecast replies (default: 600 seconds; 0 disables caching)
    pub fn new(base_url: impl Into<String>, cache_duration_secs: Option<i64>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            cache: Arc::new(RwLock::new(ResponseCache::default())),
            cache_duration_secs: cache_duration_secs.unwrap_or(600),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn coord_query(location: &Location) -> [(&'static str, String); 3] {
        [
            ("lat", location.lat.to_string()),
            ("lon", location.lon.to_string()),
            ("timezone", location.timezone.clone()),
        ]
    }

    /// Fetch current weather and suggestions for a location
    pub async fn fetch_weather(&self, location: &Location) -> Result<WeatherBundle> {
        let key = cache_key(location);
        {
            let cache = self.cache.read().await;
            if let Some(bundle) = fresh(cache.weather.get(&key), self.cache_duration_secs) {
                return Ok(bundle);
            }
        }

        debug!("GET /weather for {}", location);
        let envelope: WeatherEnvelope = self
            .client
            .get(self.url("/weather"))
            .query(&Self::coord_query(location))
            .send()
            .await?
            .json()
            .await?;

        let bundle = WeatherBundle {
            weather: match envelope.weather {
                Reply::Ok(snapshot) => Ok(snapshot),
                Reply::Err { error } => Err(error),
            },
            suggestions: envelope.suggestions,
        };

        // Error replies are not worth caching
        if bundle.weather.is_ok() {
            let mut cache = self.cache.write().await;
            cache.weather.insert(
                key,
                Cached {
                    data: bundle.clone(),
                    fetched_at: Utc::now(),
                },
            );
        }

        Ok(bundle)
    }

    /// Fetch the past-week daily mean-temperature series
    pub async fn fetch_trends(&self, location: &Location) -> Result<TrendSeries> {
        let key = cache_key(location);
        {
            let cache = self.cache.read().await;
            if let Some(series) = fresh(cache.trends.get(&key), self.cache_duration_secs) {
                return Ok(series);
            }
        }

        debug!("GET /trends for {}", location);
        let reply: Reply<TrendEnvelope> = self
            .client
            .get(self.url("/trends"))
            .query(&Self::coord_query(location))
            .send()
            .await?
            .json()
            .await?;
        let series = reply.into_result()?.daily.validate()?;

        let mut cache = self.cache.write().await;
        cache.trends.insert(
            key,
            Cached {
                data: series.clone(),
                fetched_at: Utc::now(),
            },
        );
        Ok(series)
    }

    /// Fetch the seven-day forecast series
    pub async fn fetch_forecast(&self, location: &Location) -> Result<ForecastSeries> {
        let key = cache_key(location);
        {
            let cache = self.cache.read().await;
            if let Some(series) = fresh(cache.forecast.get(&key), self.cache_duration_secs) {
                return Ok(series);
            }
        }

        debug!("GET /forecast for {}", location);
        let reply: Reply<ForecastEnvelope> = self
            .client
            .get(self.url("/forecast"))
            .query(&Self::coord_query(location))
            .send()
            .await?
            .json()
            .await?;
        let series = reply.into_result()?.daily.validate()?;

        let mut cache = self.cache.write().await;
        cache.forecast.insert(
            key,
            Cached {
                data: series.clone(),
                fetched_at: Utc::now(),
            },
        );
        Ok(series)
    }

    /// Resolve a city name to coordinates
    pub async fn search_city(&self, city: &str) -> Result<SearchResult> {
        debug!("GET /search_city?city={}", city);
        let reply: Reply<SearchResult> = self
            .client
            .get(self.url("/search_city"))
            .query(&[("city", city)])
            .send()
            .await?
            .json()
            .await?;
        reply.into_result()
    }

    /// Look up a skyline image for a city
    ///
    /// Failures of any kind are logged and swallowed.
    pub async fn city_image(&self, city: &str) -> Option<String> {
        let response = match self
            .client
            .get(self.url("/city_image"))
            .query(&[("city", city)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!("city image request failed: {}", err);
                return None;
            }
        };

        match response.json::<Reply<CityImageReply>>().await {
            Ok(Reply::Ok(reply)) => Some(reply.image_url),
            Ok(Reply::Err { error }) => {
                warn!("city image lookup: {}", error);
                None
            }
            Err(err) => {
                warn!("city image reply not understood: {}", err);
                None
            }
        }
    }

    /// Ask the backend to cross-check upcoming calendar events against rain
    pub async fn check_calendar(&self, location: &str) -> Result<Vec<String>> {
        debug!("POST /check_calendar for {}", location);
        let reply: Reply<CalendarReply> = self
            .client
            .post(self.url("/check_calendar"))
            .json(&serde_json::json!({ "location": location }))
            .send()
            .await?
            .json()
            .await?;
        Ok(reply.into_result()?.alerts)
    }

    /// Fetch the commute advisory for a departure time
    pub async fn commute_alert(&self, time: &str, location: &str) -> Result<String> {
        debug!("POST /commute_alert for {} at {}", location, time);
        let reply: Reply<CommuteReply> = self
            .client
            .post(self.url("/commute_alert"))
            .json(&serde_json::json!({ "time": time, "location": location }))
            .send()
            .await?
            .json()
            .await?;
        Ok(reply.into_result()?.alert)
    }

    /// Fetch the best hours for an activity on a date
    pub async fn best_times(
        &self,
        activity: &str,
        date: &str,
        location: &str,
    ) -> Result<Vec<String>> {
        debug!("POST /best_times: {} on {} at {}", activity, date, location);
        let reply: Reply<BestTimesReply> = self
            .client
            .post(self.url("/best_times"))
            .json(&serde_json::json!({
                "activity": activity,
                "date": date,
                "location": location,
            }))
            .send()
            .await?
            .json()
            .await?;
        Ok(reply.into_result()?.best_times)
    }

    /// Record a mood reading alongside the current conditions
    pub async fn save_mood(&self, mood: u8, temp_c: f64, condition: &str) -> Result<()> {
        debug!("POST /save_mood: {} at {:.1}°C", mood, temp_c);
        let reply: Reply<AckReply> = self
            .client
            .post(self.url("/save_mood"))
            .json(&serde_json::json!({
                "mood": mood,
                "temp": temp_c,
                "condition": condition,
            }))
            .send()
            .await?
            .json()
            .await?;
        reply.into_result()?;
        Ok(())
    }

    /// Fetch the saved mood history
    pub async fn get_moods(&self) -> Result<Vec<MoodEntry>> {
        debug!("GET /get_moods");
        let reply: MoodsReply = self
            .client
            .get(self.url("/get_moods"))
            .send()
            .await?
            .json()
            .await?;
        Ok(reply
            .moods
            .into_iter()
            .map(|(recorded_at, mood, temp)| MoodEntry {
                recorded_at,
                mood,
                temp,
            })
            .collect())
    }

    /// Save a favorite on the server (alternate, server-backed favorites)
    pub async fn add_favorite_remote(&self, city: &str) -> Result<()> {
        debug!("POST /add_favorite: {}", city);
        let reply: Reply<AckReply> = self
            .client
            .post(self.url("/add_favorite"))
            .json(&serde_json::json!({ "city": city }))
            .send()
            .await?
            .json()
            .await?;
        reply.into_result()?;
        Ok(())
    }

    /// List server-backed favorites
    pub async fn get_favorites_remote(&self) -> Result<Vec<String>> {
        debug!("GET /get_favorites");
        let reply: Reply<FavoritesReply> = self
            .client
            .get(self.url("/get_favorites"))
            .send()
            .await?
            .json()
            .await?;
        Ok(reply.into_result()?.favorites)
    }

    /// Drop every cached reply
    pub async fn clear_cache(&self) {
        let mut cache = self.cache.write().await;
        cache.weather.clear();
        cache.trends.clear();
        cache.forecast.clear();
        debug!("response cache cleared");
    }

    /// Cached entry counts: (weather, trends, forecast)
    pub async fn cache_stats(&self) -> (usize, usize, usize) {
        let cache = self.cache.read().await;
        (
            cache.weather.len(),
            cache.trends.len(),
            cache.forecast.len(),
        )
    }
}
