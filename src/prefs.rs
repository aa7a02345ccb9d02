//! Local preference store
//!
//! Persists the two pieces of state that outlive a render cycle: the
//! favorites list and the alert threshold configuration. Each lives under its
//! own file in the store directory (`favorites.json`, `alerts.json`),
//! pretty-printed so fixtures stay human-diffable. All operations are
//! synchronous and local.
//!
//! Read-modify-write sequences are not atomic across concurrent processes;
//! that race is a documented limitation.

use crate::types::{Location, Result, UnitPreference};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A user-saved location shortcut
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
}

impl From<Location> for Favorite {
    fn from(loc: Location) -> Self {
        Self {
            city: loc.city,
            lat: loc.lat,
            lon: loc.lon,
            timezone: loc.timezone,
        }
    }
}

impl From<Favorite> for Location {
    fn from(fav: Favorite) -> Self {
        Location::new(fav.city, fav.lat, fav.lon, fav.timezone)
    }
}

/// User-configured alert thresholds
///
/// Singleton; overwritten wholesale on every save. `units` records the unit
/// preference that was active when the thresholds were saved, and is the unit
/// `max_temp` is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(rename = "maxTemp")]
    pub max_temp: f64,
    #[serde(rename = "maxRain")]
    pub max_rain: f64,
    pub units: UnitPreference,
}

/// File-backed preference store
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    dir: PathBuf,
}

impl PreferenceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn favorites_path(&self) -> PathBuf {
        self.dir.join("favorites.json")
    }

    fn alerts_path(&self) -> PathBuf {
        self.dir.join("alerts.json")
    }

    /// Read the favorites list; missing or unreadable file yields an empty list
    pub fn load_favorites(&self) -> Vec<Favorite> {
        read_or_default(&self.favorites_path())
    }

    /// Append a favorite unless one with the same city already exists
    ///
    /// The duplicate check is a case-sensitive exact match on `city`.
    /// Returns whether the favorite was added.
    pub fn add_favorite(&self, fav: Favorite) -> Result<bool> {
        let mut favorites = self.load_favorites();
        if favorites.iter().any(|f| f.city == fav.city) {
            debug!("favorite {} already saved, skipping", fav.city);
            return Ok(false);
        }
        favorites.push(fav);
        self.write(&self.favorites_path(), &favorites)?;
        Ok(true)
    }

    /// Read the alert configuration, if one has been saved
    pub fn load_alerts(&self) -> Option<AlertConfig> {
        let path = self.alerts_path();
        if !path.exists() {
            return None;
        }
        read_or_default::<Option<AlertConfig>>(&path)
    }

    /// Overwrite the alert configuration wholesale
    pub fn set_alerts(&self, max_temp: f64, max_rain: f64, units: UnitPreference) -> Result<()> {
        let config = AlertConfig {
            max_temp,
            max_rain,
            units,
        };
        self.write(&self.alerts_path(), &config)
    }

    fn write<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let payload = serde_json::to_vec_pretty(value)?;
        fs::write(path, payload)?;
        debug!("wrote {}", path.display());
        Ok(())
    }
}

fn read_or_default<T: Default + for<'de> Deserialize<'de>>(path: &Path) -> T {
    match fs::read(path) {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(err) => {
                warn!("failed to parse {}: {}", path.display(), err);
                T::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => T::default(),
        Err(err) => {
            warn!("failed to read {}: {}", path.display(), err);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, PreferenceStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(dir.path());
        (dir, store)
    }

    fn sydney() -> Favorite {
        Favorite {
            city: "Sydney".to_string(),
            lat: -33.8688,
            lon: 151.2093,
            timezone: "Australia/Sydney".to_string(),
        }
    }

    #[test]
    fn test_empty_store() {
        let (_dir, store) = store();
        assert!(store.load_favorites().is_empty());
        assert!(store.load_alerts().is_none());
    }

    #[test]
    fn test_add_favorite_roundtrip() {
        let (_dir, store) = store();
        assert!(store.add_favorite(sydney()).unwrap());
        let favorites = store.load_favorites();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0], sydney());
    }

    #[test]
    fn test_add_favorite_is_idempotent() {
        let (_dir, store) = store();
        assert!(store.add_favorite(sydney()).unwrap());
        assert!(!store.add_favorite(sydney()).unwrap());
        assert!(!store.add_favorite(sydney()).unwrap());
        assert_eq!(store.load_favorites().len(), 1);
    }

    #[test]
    fn test_duplicate_check_is_case_sensitive() {
        let (_dir, store) = store();
        let mut lowercase = sydney();
        lowercase.city = "sydney".to_string();
        assert!(store.add_favorite(sydney()).unwrap());
        assert!(store.add_favorite(lowercase).unwrap());
        assert_eq!(store.load_favorites().len(), 2);
    }

    #[test]
    fn test_alerts_overwritten_wholesale() {
        let (_dir, store) = store();
        store
            .set_alerts(25.0, 5.0, UnitPreference::Celsius)
            .unwrap();
        store
            .set_alerts(80.0, 2.0, UnitPreference::Fahrenheit)
            .unwrap();
        let config = store.load_alerts().unwrap();
        assert_eq!(config.max_temp, 80.0);
        assert_eq!(config.max_rain, 2.0);
        assert_eq!(config.units, UnitPreference::Fahrenheit);
    }

    #[test]
    fn test_persisted_format_is_human_diffable() {
        let (dir, store) = store();
        store
            .set_alerts(25.0, 5.0, UnitPreference::Celsius)
            .unwrap();
        let raw = fs::read_to_string(dir.path().join("alerts.json")).unwrap();
        assert!(raw.contains('\n'));
        assert!(raw.contains("\"maxTemp\": 25.0"));
        assert!(raw.contains("\"units\": \"celsius\""));
    }

    #[test]
    fn test_corrupt_favorites_file_yields_empty() {
        let (dir, store) = store();
        fs::write(dir.path().join("favorites.json"), b"not json").unwrap();
        assert!(store.load_favorites().is_empty());
    }
}
