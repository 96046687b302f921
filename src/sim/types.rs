//! Core simulation types: generator parameters and dispatch records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Immutable per-run generator parameters.
///
/// The minimum load in kW is always derived from capacity and fraction, never
/// stored, so it cannot drift when either one changes.
///
/// # Examples
///
/// ```
/// use hybrid_sim::sim::types::GeneratorConfig;
///
/// let generator = GeneratorConfig::from_pct(100.0, 30.0, 0.25).unwrap();
/// assert_eq!(generator.min_load_kw(), 30.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Rated capacity (kW).
    pub capacity_kw: f64,
    /// Minimum loading as a fraction of capacity (0.0 to 1.0).
    pub min_loading_fraction: f64,
    /// Fuel consumption in liters per kWh delivered.
    pub fuel_l_per_kwh: f64,
}

impl GeneratorConfig {
    /// Creates a generator configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidInput`] for a negative capacity or fuel rate,
    /// or a fraction outside `[0, 1]`.
    pub fn new(capacity_kw: f64, min_loading_fraction: f64, fuel_l_per_kwh: f64) -> Result<Self> {
        if !capacity_kw.is_finite() || capacity_kw < 0.0 {
            return Err(SimError::InvalidInput(format!(
                "generator capacity must be a non-negative number, got {capacity_kw}"
            )));
        }
        if !(0.0..=1.0).contains(&min_loading_fraction) {
            return Err(SimError::InvalidInput(format!(
                "minimum loading fraction must be in [0, 1], got {min_loading_fraction}"
            )));
        }
        if !fuel_l_per_kwh.is_finite() || fuel_l_per_kwh < 0.0 {
            return Err(SimError::InvalidInput(format!(
                "fuel rate must be a non-negative number, got {fuel_l_per_kwh}"
            )));
        }
        Ok(Self {
            capacity_kw,
            min_loading_fraction,
            fuel_l_per_kwh,
        })
    }

    /// Creates a generator configuration from a minimum loading percentage (0 to 100).
    ///
    /// # Errors
    ///
    /// As [`GeneratorConfig::new`].
    pub fn from_pct(capacity_kw: f64, min_loading_pct: f64, fuel_l_per_kwh: f64) -> Result<Self> {
        Self::new(capacity_kw, min_loading_pct / 100.0, fuel_l_per_kwh)
    }

    /// Minimum output in kW whenever the generator runs.
    pub fn min_load_kw(&self) -> f64 {
        self.capacity_kw * self.min_loading_fraction
    }
}

/// How the per-hour split between PV and generator is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// The established three-case policy, arithmetic kept exactly as-is.
    ///
    /// In ample sun the reported generator output is `min_load - pv_used` and
    /// can go negative; in limited sun the reported output subtracts the raw
    /// PV while diesel subtracts the PV actually used.
    #[default]
    Documented,
    /// Same branches, but the generator always delivers `load - pv_used`,
    /// which keeps it at or above its floor whenever load exceeds the floor,
    /// and diesel is always `output * fuel rate`.
    FloorRespecting,
}

impl fmt::Display for DispatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Documented => write!(f, "documented"),
            Self::FloorRespecting => write!(f, "floor_respecting"),
        }
    }
}

/// Which branch of the dispatch policy applied in an hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchCase {
    /// Load at or below the generator floor: generator alone serves the load.
    LoadBelowFloor,
    /// Load above the floor and PV above the floor.
    AmpleSun,
    /// Load above the floor and PV at or below the floor.
    LimitedSun,
}

impl DispatchCase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoadBelowFloor => "load_below_floor",
            Self::AmpleSun => "ample_sun",
            Self::LimitedSun => "limited_sun",
        }
    }
}

/// Dispatch decision for one hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyDispatch {
    /// PV energy used to serve load (kW).
    pub pv_used_kw: f64,
    /// Generator output (kW).
    pub gen_output_kw: f64,
    /// Diesel burned this hour (liters).
    pub diesel_liters: f64,
    /// Load, passed through unchanged (kW).
    pub load_kw: f64,
    /// Branch of the policy that produced this decision.
    pub case: DispatchCase,
}

/// Parallel hourly series produced by one simulation run.
///
/// All series have the same length as the inputs. A result is never mutated
/// after it is built; the next run produces a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchResult {
    pub pv_used_kw: Vec<f64>,
    pub gen_output_kw: Vec<f64>,
    pub diesel_liters: Vec<f64>,
    pub total_load_kw: Vec<f64>,
    pub cases: Vec<DispatchCase>,
}

impl DispatchResult {
    pub(crate) fn with_capacity(hours: usize) -> Self {
        Self {
            pv_used_kw: Vec::with_capacity(hours),
            gen_output_kw: Vec::with_capacity(hours),
            diesel_liters: Vec::with_capacity(hours),
            total_load_kw: Vec::with_capacity(hours),
            cases: Vec::with_capacity(hours),
        }
    }

    pub(crate) fn push(&mut self, hour: HourlyDispatch) {
        self.pv_used_kw.push(hour.pv_used_kw);
        self.gen_output_kw.push(hour.gen_output_kw);
        self.diesel_liters.push(hour.diesel_liters);
        self.total_load_kw.push(hour.load_kw);
        self.cases.push(hour.case);
    }

    /// Number of simulated hours.
    pub fn hours(&self) -> usize {
        self.total_load_kw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_load_kw.is_empty()
    }

    /// Decision for hour `i`, if in range.
    pub fn hour(&self, i: usize) -> Option<HourlyDispatch> {
        Some(HourlyDispatch {
            pv_used_kw: *self.pv_used_kw.get(i)?,
            gen_output_kw: *self.gen_output_kw.get(i)?,
            diesel_liters: *self.diesel_liters.get(i)?,
            load_kw: *self.total_load_kw.get(i)?,
            case: *self.cases.get(i)?,
        })
    }

    /// Iterates hour by hour.
    pub fn iter(&self) -> impl Iterator<Item = HourlyDispatch> + '_ {
        (0..self.hours()).filter_map(|i| self.hour(i))
    }

    /// Total diesel burned over the horizon (liters).
    pub fn total_diesel_liters(&self) -> f64 {
        self.diesel_liters.iter().sum()
    }
}

impl fmt::Display for HourlyDispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "load={:>7.2} kW | pv={:>7.2} kW  gen={:>7.2} kW | diesel={:>6.2} L ({})",
            self.load_kw,
            self.pv_used_kw,
            self.gen_output_kw,
            self.diesel_liters,
            self.case.as_str(),
        )
    }
}
