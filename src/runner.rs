//! Wires a scenario, the reference catalogs, and the simulator into one run.

use chrono::{DateTime, Utc};

use crate::config::{LoadMode, ScenarioConfig};
use crate::devices::baseload::{
    load_profile_from_csv_path, pattern_load_profile, random_load_profile,
};
use crate::devices::solar::pv_output_series;
use crate::error::{Result, SimError};
use crate::reference::{CountryCatalog, GeneratorCatalog, Location};
use crate::sim::clock::Clock;
use crate::sim::dispatch::simulate;
use crate::sim::economics::{SavingsReport, compare_with_baseline};
use crate::sim::kpi::EnergySummary;
use crate::sim::types::{DispatchResult, GeneratorConfig};

/// Everything produced by one scenario run.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Resolved site.
    pub location: Location,
    /// Resolved generator parameters.
    pub generator: GeneratorConfig,
    /// Wall-clock time of each hour.
    pub timestamps: Vec<DateTime<Utc>>,
    /// PV output available each hour, before dispatch (kW).
    pub pv_output_kw: Vec<f64>,
    /// Hourly dispatch.
    pub result: DispatchResult,
    pub summary: EnergySummary,
    pub savings: SavingsReport,
}

/// Builds the hourly load series for a scenario.
///
/// # Errors
///
/// Propagates load-profile errors; a csv scenario without a path is
/// [`SimError::InvalidInput`].
pub fn build_load_profile(cfg: &ScenarioConfig) -> Result<Vec<f64>> {
    let days = cfg.simulation.days;
    let load = &cfg.load;
    match load.mode {
        LoadMode::Random => {
            random_load_profile(days, load.min_kw, load.max_kw, cfg.simulation.seed)
        }
        LoadMode::Pattern => pattern_load_profile(days, &load.hourly_kw),
        LoadMode::Csv => {
            let path = load.csv_path.as_deref().ok_or_else(|| {
                SimError::InvalidInput("load.csv_path is required in csv mode".to_string())
            })?;
            load_profile_from_csv_path(path, days)
        }
    }
}

/// Resolves the generator configuration, preferring an explicit fuel rate
/// over the catalog entry.
///
/// # Errors
///
/// Returns [`SimError::InvalidInput`] for an unknown model or impossible
/// parameters.
pub fn resolve_generator(
    cfg: &ScenarioConfig,
    generators: &GeneratorCatalog,
) -> Result<GeneratorConfig> {
    let g = &cfg.generator;
    let rate = match g.fuel_l_per_kwh {
        Some(rate) => rate,
        None => generators.fuel_rate(&g.model)?,
    };
    GeneratorConfig::from_pct(g.capacity_kw, g.min_loading_pct, rate)
}

/// Runs a full scenario: PV estimate, load profile, dispatch, baseline
/// comparison, and summary.
///
/// # Errors
///
/// Returns the first validation failure encountered; nothing is computed
/// past it.
pub fn run_scenario(
    cfg: &ScenarioConfig,
    countries: &CountryCatalog,
    generators: &GeneratorCatalog,
) -> Result<SimulationReport> {
    let location = *countries.get(&cfg.simulation.country)?;
    let generator = resolve_generator(cfg, generators)?;
    let start = cfg.start_datetime();
    let days = cfg.simulation.days;

    tracing::info!(
        country = %cfg.simulation.country,
        %start,
        days,
        pv_kw_peak = cfg.pv.kw_peak,
        generator_kw = generator.capacity_kw,
        min_load_kw = generator.min_load_kw(),
        "running scenario"
    );

    let pv_output_kw = pv_output_series(&location, cfg.pv.kw_peak, cfg.pv.efficiency, start, days)?;
    let load_kw = build_load_profile(cfg)?;
    let policy = cfg.dispatch.policy;

    let result = simulate(&pv_output_kw, &load_kw, &generator, cfg.pv.enabled, policy)?;
    let savings = compare_with_baseline(
        &pv_output_kw,
        &load_kw,
        &generator,
        policy,
        &result,
        location.diesel_price_per_liter,
        days,
        &cfg.economics.costs(),
    )?;
    let summary = EnergySummary::from_result(&result, generator.capacity_kw);
    let timestamps = Clock::for_days(start, days)?.timestamps();

    Ok(SimulationReport {
        location,
        generator,
        timestamps,
        pv_output_kw,
        result,
        summary,
        savings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadMode;

    fn catalogs() -> (CountryCatalog, GeneratorCatalog) {
        (
            CountryCatalog::builtin().expect("builtin countries"),
            GeneratorCatalog::builtin(),
        )
    }

    #[test]
    fn same_scenario_and_seed_is_deterministic() {
        let (countries, generators) = catalogs();
        let cfg = ScenarioConfig::baseline();
        let a = run_scenario(&cfg, &countries, &generators).expect("run a");
        let b = run_scenario(&cfg, &countries, &generators).expect("run b");
        assert_eq!(a.result, b.result);
        assert_eq!(a.savings, b.savings);
    }

    #[test]
    fn all_series_share_length() {
        let (countries, generators) = catalogs();
        let report = run_scenario(&ScenarioConfig::night_heavy(), &countries, &generators)
            .expect("night_heavy should run");
        let hours = 24 * 7;
        assert_eq!(report.timestamps.len(), hours);
        assert_eq!(report.pv_output_kw.len(), hours);
        assert_eq!(report.result.hours(), hours);
    }

    #[test]
    fn unknown_country_is_invalid_location() {
        let (countries, generators) = catalogs();
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.country = "Atlantis".to_string();
        let err = run_scenario(&cfg, &countries, &generators).unwrap_err();
        assert!(matches!(err, SimError::InvalidLocation(_)));
    }

    #[test]
    fn oversized_horizon_fails_without_panicking() {
        let (countries, generators) = catalogs();
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.days = usize::MAX / 10;
        assert!(!cfg.validate().is_empty());
        let err = run_scenario(&cfg, &countries, &generators).unwrap_err();
        assert!(matches!(err, SimError::InvalidInput(_)));
    }

    #[test]
    fn fuel_rate_override_wins() {
        let (_, generators) = catalogs();
        let mut cfg = ScenarioConfig::baseline();
        cfg.generator.model = "not in catalog".to_string();
        cfg.generator.fuel_l_per_kwh = Some(0.3);
        let generator = resolve_generator(&cfg, &generators).expect("override should resolve");
        assert_eq!(generator.fuel_l_per_kwh, 0.3);
    }

    #[test]
    fn short_pattern_fails_before_dispatch() {
        let (countries, generators) = catalogs();
        let mut cfg = ScenarioConfig::baseline();
        cfg.load.mode = LoadMode::Pattern;
        cfg.load.hourly_kw = vec![50.0; 23];
        let err = run_scenario(&cfg, &countries, &generators).unwrap_err();
        assert!(matches!(err, SimError::InvalidInput(_)));
    }
}
