//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use crate::sim::clock::HOURS_PER_DAY;
use crate::sim::economics::ProjectCosts;
use crate::sim::types::DispatchPolicy;

/// Longest horizon a scenario may simulate (days).
pub const MAX_DAYS: usize = 365;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Site, horizon, and seed.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// PV array parameters.
    #[serde(default)]
    pub pv: PvConfig,
    /// Load profile source.
    #[serde(default)]
    pub load: LoadConfig,
    /// Diesel generator parameters.
    #[serde(default)]
    pub generator: GeneratorSettings,
    /// Investment figures for the ROI calculation.
    #[serde(default)]
    pub economics: EconomicsConfig,
    /// Dispatch policy selection.
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Site, horizon, and seed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Country name, resolved against the country catalog.
    pub country: String,
    /// First simulated day (UTC midnight), `YYYY-MM-DD`.
    pub start_date: NaiveDate,
    /// Number of days to simulate (1 to [`MAX_DAYS`]).
    pub days: usize,
    /// Seed for the random load profile; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            country: "Kenya".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 21).unwrap_or_default(),
            days: 3,
            seed: Some(42),
        }
    }
}

/// PV array parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PvConfig {
    /// Whether PV participates in dispatch.
    pub enabled: bool,
    /// Installed capacity (kWp).
    pub kw_peak: f64,
    /// Derating factor applied to clear-sky output.
    pub efficiency: f64,
}

impl Default for PvConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            kw_peak: 100.0,
            efficiency: 1.0,
        }
    }
}

/// Where the hourly load comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Uniform draws between `min_kw` and `max_kw`.
    #[default]
    Random,
    /// `hourly_kw` repeated every day.
    Pattern,
    /// Values read from `csv_path`.
    Csv,
}

/// Load profile source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    pub mode: LoadMode,
    /// Lower bound for random mode (kW).
    pub min_kw: f64,
    /// Upper bound for random mode (kW).
    pub max_kw: f64,
    /// 24 hourly values for pattern mode (kW).
    pub hourly_kw: Vec<f64>,
    /// Headerless single-column CSV for csv mode.
    pub csv_path: Option<PathBuf>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            mode: LoadMode::Random,
            min_kw: 30.0,
            max_kw: 70.0,
            hourly_kw: vec![50.0; HOURS_PER_DAY],
            csv_path: None,
        }
    }
}

/// Diesel generator parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorSettings {
    /// Model name, resolved against the generator catalog for its fuel rate.
    pub model: String,
    /// Rated capacity (kW).
    pub capacity_kw: f64,
    /// Minimum loading (% of capacity, 0-100).
    pub min_loading_pct: f64,
    /// Overrides the catalog fuel rate (L/kWh).
    pub fuel_l_per_kwh: Option<f64>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            model: "Cummins C100D5".to_string(),
            capacity_kw: 100.0,
            min_loading_pct: 30.0,
            fuel_l_per_kwh: None,
        }
    }
}

/// Investment figures for the ROI calculation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomicsConfig {
    /// PV CAPEX (USD).
    pub capex_usd: f64,
    /// Annual OPEX (USD/year).
    pub opex_usd_per_year: f64,
    /// Project lifetime (years).
    pub lifetime_years: f64,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            capex_usd: 10_000.0,
            opex_usd_per_year: 500.0,
            lifetime_years: 10.0,
        }
    }
}

impl EconomicsConfig {
    pub fn costs(&self) -> ProjectCosts {
        ProjectCosts {
            capex_usd: self.capex_usd,
            opex_usd_per_year: self.opex_usd_per_year,
            lifetime_years: self.lifetime_years,
        }
    }
}

/// Dispatch policy selection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    pub policy: DispatchPolicy,
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.days"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl ScenarioConfig {
    /// Returns the baseline scenario: 100 kWp PV, 100 kW generator at 30 %
    /// minimum loading, random 30-70 kW load in Kenya.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the high-solar preset: oversized PV array at a sunny site.
    pub fn high_solar() -> Self {
        Self {
            simulation: SimulationConfig {
                country: "Australia".to_string(),
                start_date: NaiveDate::from_ymd_opt(2024, 12, 21).unwrap_or_default(),
                ..SimulationConfig::default()
            },
            pv: PvConfig {
                kw_peak: 250.0,
                ..PvConfig::default()
            },
            generator: GeneratorSettings {
                model: "CAT DE110E2".to_string(),
                capacity_kw: 110.0,
                ..GeneratorSettings::default()
            },
            economics: EconomicsConfig {
                capex_usd: 25_000.0,
                opex_usd_per_year: 1_000.0,
                lifetime_years: 15.0,
            },
            ..Self::default()
        }
    }

    /// Returns the night-heavy preset: fixed daily pattern peaking after sunset.
    pub fn night_heavy() -> Self {
        let hourly_kw = (0..HOURS_PER_DAY)
            .map(|h| if (7..18).contains(&h) { 25.0 } else { 65.0 })
            .collect();
        Self {
            simulation: SimulationConfig {
                country: "Nigeria".to_string(),
                days: 7,
                ..SimulationConfig::default()
            },
            load: LoadConfig {
                mode: LoadMode::Pattern,
                hourly_kw,
                ..LoadConfig::default()
            },
            generator: GeneratorSettings {
                min_loading_pct: 40.0,
                ..GeneratorSettings::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "high_solar", "night_heavy"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "high_solar" => Ok(Self::high_solar()),
            "night_heavy" => Ok(Self::night_heavy()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// Relative `load.csv_path` values are resolved against the scenario
    /// file's directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        let mut cfg = Self::from_toml_str(&content)?;
        if let (Some(csv), Some(dir)) = (&cfg.load.csv_path, path.parent()) {
            if csv.is_relative() {
                cfg.load.csv_path = Some(dir.join(csv));
            }
        }
        Ok(cfg)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// UTC midnight of the first simulated day.
    pub fn start_datetime(&self) -> DateTime<Utc> {
        self.simulation.start_date.and_time(NaiveTime::MIN).and_utc()
    }

    /// Number of simulated hours.
    pub fn total_hours(&self) -> usize {
        HOURS_PER_DAY.saturating_mul(self.simulation.days)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. Country and
    /// generator model names are checked later against the catalogs.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut check = |ok: bool, field: &str, message: &str| {
            if !ok {
                errors.push(ConfigError {
                    field: field.into(),
                    message: message.into(),
                });
            }
        };

        let s = &self.simulation;
        check(
            (1..=MAX_DAYS).contains(&s.days),
            "simulation.days",
            "must be in [1, 365]",
        );
        check(
            !s.country.trim().is_empty(),
            "simulation.country",
            "must not be empty",
        );

        let pv = &self.pv;
        check(
            pv.kw_peak.is_finite() && pv.kw_peak >= 0.0,
            "pv.kw_peak",
            "must be >= 0",
        );
        check(
            pv.efficiency.is_finite() && (0.0..=1.0).contains(&pv.efficiency),
            "pv.efficiency",
            "must be in [0.0, 1.0]",
        );

        let load = &self.load;
        match load.mode {
            LoadMode::Random => {
                check(load.min_kw >= 0.0, "load.min_kw", "must be >= 0");
                check(
                    load.min_kw <= load.max_kw,
                    "load.min_kw",
                    "must be <= load.max_kw",
                );
            }
            LoadMode::Pattern => {
                check(
                    load.hourly_kw.len() == HOURS_PER_DAY,
                    "load.hourly_kw",
                    "must have exactly 24 values",
                );
                check(
                    load.hourly_kw.iter().all(|kw| *kw >= 0.0),
                    "load.hourly_kw",
                    "values must be >= 0",
                );
            }
            LoadMode::Csv => {
                check(
                    load.csv_path.is_some(),
                    "load.csv_path",
                    "required when load.mode = \"csv\"",
                );
            }
        }

        let g = &self.generator;
        check(g.capacity_kw > 0.0, "generator.capacity_kw", "must be > 0");
        check(
            (0.0..=100.0).contains(&g.min_loading_pct),
            "generator.min_loading_pct",
            "must be in [0, 100]",
        );
        if let Some(rate) = g.fuel_l_per_kwh {
            check(rate >= 0.0, "generator.fuel_l_per_kwh", "must be >= 0");
        }
        check(
            g.fuel_l_per_kwh.is_some() || !g.model.trim().is_empty(),
            "generator.model",
            "must not be empty unless generator.fuel_l_per_kwh is set",
        );

        let e = &self.economics;
        check(e.capex_usd >= 0.0, "economics.capex_usd", "must be >= 0");
        check(
            e.opex_usd_per_year >= 0.0,
            "economics.opex_usd_per_year",
            "must be >= 0",
        );
        check(
            e.lifetime_years > 0.0,
            "economics.lifetime_years",
            "must be > 0",
        );

        errors
    }
}
