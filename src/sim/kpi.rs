//! Post-hoc energy summary computed from a dispatch result.

use std::fmt;

use super::types::{DispatchCase, DispatchResult};

/// Tolerance for the supply-versus-load comparison (kW).
const COVERAGE_EPS_KW: f64 = 1e-9;

/// Aggregate indicators derived from a complete simulation run.
///
/// Hourly samples are treated as one-hour energy blocks, so a kW sample is
/// also the kWh delivered in that hour.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergySummary {
    /// Total load served (kWh).
    pub total_load_kwh: f64,
    /// PV energy used (kWh).
    pub pv_energy_kwh: f64,
    /// Generator energy (kWh).
    pub gen_energy_kwh: f64,
    /// Diesel consumed (liters).
    pub diesel_liters: f64,
    /// PV share of total load (%).
    pub pv_share_pct: f64,
    /// Generator share of total load (%).
    pub gen_share_pct: f64,
    /// Hours where the load was at or below the generator floor.
    pub load_below_floor_hours: usize,
    /// Hours with PV above the generator floor.
    pub ample_sun_hours: usize,
    /// Hours with PV at or below the generator floor.
    pub limited_sun_hours: usize,
    /// Hours where PV used plus generator output fell short of the load.
    pub uncovered_hours: usize,
    /// Hours where PV used exceeded the generator's rated capacity.
    pub undersized_generator_hours: usize,
    /// Hours with negative generator output.
    pub negative_gen_hours: usize,
}

impl EnergySummary {
    /// Computes the summary from a dispatch result.
    ///
    /// # Arguments
    ///
    /// * `result` - Complete dispatch result
    /// * `generator_capacity_kw` - Rated generator capacity, for the undersized check
    pub fn from_result(result: &DispatchResult, generator_capacity_kw: f64) -> Self {
        if result.is_empty() {
            return Self::default();
        }

        let mut summary = Self::default();
        for hour in result.iter() {
            summary.total_load_kwh += hour.load_kw;
            summary.pv_energy_kwh += hour.pv_used_kw;
            summary.gen_energy_kwh += hour.gen_output_kw;
            summary.diesel_liters += hour.diesel_liters;

            match hour.case {
                DispatchCase::LoadBelowFloor => summary.load_below_floor_hours += 1,
                DispatchCase::AmpleSun => summary.ample_sun_hours += 1,
                DispatchCase::LimitedSun => summary.limited_sun_hours += 1,
            }

            if hour.pv_used_kw + hour.gen_output_kw < hour.load_kw - COVERAGE_EPS_KW {
                summary.uncovered_hours += 1;
            }
            if hour.pv_used_kw > generator_capacity_kw {
                summary.undersized_generator_hours += 1;
            }
            if hour.gen_output_kw < 0.0 {
                summary.negative_gen_hours += 1;
            }
        }

        if summary.total_load_kwh > 0.0 {
            summary.pv_share_pct = 100.0 * summary.pv_energy_kwh / summary.total_load_kwh;
            summary.gen_share_pct = 100.0 * summary.gen_energy_kwh / summary.total_load_kwh;
        }
        summary
    }
}

impl fmt::Display for EnergySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Energy Summary ---")?;
        writeln!(f, "Total load:            {:.2} kWh", self.total_load_kwh)?;
        writeln!(
            f,
            "PV energy used:        {:.2} kWh ({:.1}%)",
            self.pv_energy_kwh, self.pv_share_pct
        )?;
        writeln!(
            f,
            "Generator energy:      {:.2} kWh ({:.1}%)",
            self.gen_energy_kwh, self.gen_share_pct
        )?;
        writeln!(f, "Diesel consumed:       {:.2} L", self.diesel_liters)?;
        writeln!(
            f,
            "Dispatch cases:        below_floor={} ample_sun={} limited_sun={}",
            self.load_below_floor_hours, self.ample_sun_hours, self.limited_sun_hours
        )?;
        writeln!(f, "Uncovered load hours:  {}", self.uncovered_hours)?;
        writeln!(f, "Undersized gen hours:  {}", self.undersized_generator_hours)?;
        write!(f, "Negative gen hours:    {}", self.negative_gen_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::dispatch::simulate;
    use crate::sim::types::{DispatchPolicy, GeneratorConfig};
    use approx::assert_abs_diff_eq;

    fn run(pv: &[f64], load: &[f64], policy: DispatchPolicy) -> DispatchResult {
        let generator = GeneratorConfig::from_pct(100.0, 30.0, 0.25).unwrap();
        simulate(pv, load, &generator, true, policy).unwrap()
    }

    #[test]
    fn totals_and_shares() {
        // hour 0: below floor, gen 20
        // hour 1: limited sun, pv 10, gen 50
        let result = run(&[50.0, 10.0], &[20.0, 60.0], DispatchPolicy::Documented);
        let summary = EnergySummary::from_result(&result, 100.0);
        assert_abs_diff_eq!(summary.total_load_kwh, 80.0);
        assert_abs_diff_eq!(summary.pv_energy_kwh, 10.0);
        assert_abs_diff_eq!(summary.gen_energy_kwh, 70.0);
        assert_abs_diff_eq!(summary.diesel_liters, 17.5);
        assert_abs_diff_eq!(summary.pv_share_pct, 12.5);
        assert_eq!(summary.load_below_floor_hours, 1);
        assert_eq!(summary.limited_sun_hours, 1);
        assert_eq!(summary.uncovered_hours, 0);
    }

    #[test]
    fn documented_anomaly_shows_as_uncovered_and_negative() {
        let result = run(&[50.0], &[80.0], DispatchPolicy::Documented);
        let summary = EnergySummary::from_result(&result, 100.0);
        assert_eq!(summary.ample_sun_hours, 1);
        assert_eq!(summary.negative_gen_hours, 1);
        assert_eq!(summary.uncovered_hours, 1);
    }

    #[test]
    fn floor_respecting_covers_load() {
        let result = run(&[50.0, 90.0], &[80.0, 100.0], DispatchPolicy::FloorRespecting);
        let summary = EnergySummary::from_result(&result, 100.0);
        assert_eq!(summary.negative_gen_hours, 0);
        assert_eq!(summary.uncovered_hours, 0);
    }

    #[test]
    fn undersized_generator_counted() {
        let result = run(&[150.0], &[200.0], DispatchPolicy::FloorRespecting);
        let summary = EnergySummary::from_result(&result, 100.0);
        assert_eq!(summary.undersized_generator_hours, 1);
    }

    #[test]
    fn empty_result() {
        let summary = EnergySummary::from_result(&DispatchResult::default(), 100.0);
        assert_eq!(summary, EnergySummary::default());
    }
}
