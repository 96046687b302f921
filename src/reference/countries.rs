//! Country reference table: coordinates and diesel price per country.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SimError};

/// Built-in country table, embedded at compile time.
const BUILTIN_COUNTRIES_JSON: &str = include_str!("../../data/countries.json");

/// A site location with the local diesel price.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Location {
    /// Latitude in degrees (positive = north).
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in degrees (positive = east).
    #[serde(rename = "lon")]
    pub longitude: f64,
    /// Diesel price in USD per liter.
    #[serde(rename = "diesel_price")]
    pub diesel_price_per_liter: f64,
}

impl Location {
    /// Creates a validated location.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidLocation`] if the coordinates are not finite
    /// or fall outside ±90° latitude / ±180° longitude.
    pub fn new(latitude: f64, longitude: f64, diesel_price_per_liter: f64) -> Result<Self> {
        let location = Self {
            latitude,
            longitude,
            diesel_price_per_liter,
        };
        location.validate()?;
        Ok(location)
    }

    /// Checks that the coordinates describe a point on Earth.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidLocation`] for out-of-range coordinates.
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(SimError::InvalidLocation(format!(
                "latitude {} is outside [-90, 90]",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(SimError::InvalidLocation(format!(
                "longitude {} is outside [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// Read-only lookup of country name to [`Location`].
///
/// Built once at start-up and passed around by reference; there is no way to
/// mutate it after construction.
#[derive(Debug, Clone)]
pub struct CountryCatalog {
    countries: BTreeMap<String, Location>,
}

impl CountryCatalog {
    /// Loads the embedded country table.
    ///
    /// # Errors
    ///
    /// Fails only if the embedded data is malformed.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_COUNTRIES_JSON)
    }

    /// Parses a country table shaped as `{"Name": {"lat", "lon", "diesel_price"}}`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Catalog`] on malformed JSON and
    /// [`SimError::InvalidLocation`] if an entry has impossible coordinates.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let countries: BTreeMap<String, Location> = serde_json::from_str(json)?;
        for (name, location) in &countries {
            location.validate().map_err(|e| {
                SimError::InvalidLocation(format!("country \"{name}\": {e}"))
            })?;
        }
        tracing::debug!(count = countries.len(), "loaded country catalog");
        Ok(Self { countries })
    }

    /// Reads a country table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be read, otherwise as
    /// [`CountryCatalog::from_json_str`].
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Resolves a country by name.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidLocation`] if the country is unknown.
    pub fn get(&self, name: &str) -> Result<&Location> {
        self.countries.get(name).ok_or_else(|| {
            SimError::InvalidLocation(format!("unknown country \"{name}\""))
        })
    }

    /// Country names in alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}
