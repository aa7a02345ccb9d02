//! Application state for the dashboard
//!
//! The current location and unit preference were free-floating globals in
//! earlier incarnations of this client; here they live in an explicit state
//! object with a small mutation API so the display logic can be exercised in
//! isolation.

use crate::types::{Location, UnitPreference};
use log::debug;

#[derive(Debug, Clone, Default)]
pub struct AppState {
    location: Option<Location>,
    units: UnitPreference,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn set_location(&mut self, location: Location) {
        debug!("current location -> {}", location);
        self.location = Some(location);
    }

    pub fn unit_preference(&self) -> UnitPreference {
        self.units
    }

    pub fn set_unit_preference(&mut self, units: UnitPreference) {
        self.units = units;
    }

    /// Flip the unit preference and return the new value
    pub fn toggle_units(&mut self) -> UnitPreference {
        self.units = self.units.toggled();
        debug!("unit preference -> {}", self.units);
        self.units
    }
}
