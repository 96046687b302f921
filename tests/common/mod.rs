//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use hybrid_sim::reference::{CountryCatalog, GeneratorCatalog};
use hybrid_sim::sim::types::GeneratorConfig;

/// Fuel rate used by the fixture generator (L/kWh).
pub const FUEL_RATE: f64 = 0.25;

/// 100 kW generator at 30 % minimum loading (30 kW floor).
pub fn default_generator() -> GeneratorConfig {
    GeneratorConfig::from_pct(100.0, 30.0, FUEL_RATE).expect("fixture generator is valid")
}

/// Built-in country and generator catalogs.
pub fn catalogs() -> (CountryCatalog, GeneratorCatalog) {
    (
        CountryCatalog::builtin().expect("builtin countries parse"),
        GeneratorCatalog::builtin(),
    )
}

/// Midnight UTC on the June solstice 2024.
pub fn solstice() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap()
}

/// A small deterministic PV/load grid that walks through every dispatch case.
///
/// Returns `(pv, load)` with 7 x 7 = 49 hours.
pub fn case_grid() -> (Vec<f64>, Vec<f64>) {
    let levels = [0.0, 10.0, 25.0, 30.0, 45.0, 80.0, 120.0];
    let mut pv = Vec::new();
    let mut load = Vec::new();
    for &p in &levels {
        for &l in &levels {
            pv.push(p);
            load.push(l);
        }
    }
    (pv, load)
}
