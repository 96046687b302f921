//! Hour-by-hour energy balance between PV and a diesel generator.
//!
//! Every hour is decided independently from the PV available, the load, and
//! the generator floor (`capacity * min_loading_fraction`). There is no state
//! carried between hours, so the same inputs always give the same outputs.

use super::types::{
    DispatchCase, DispatchPolicy, DispatchResult, GeneratorConfig, HourlyDispatch,
};
use crate::error::{Result, SimError};

/// Decides one hour.
///
/// # Arguments
///
/// * `pv_kw` - PV power available this hour (already zero if PV is disabled)
/// * `load_kw` - Load to serve
/// * `generator` - Generator parameters
/// * `policy` - Dispatch policy
pub fn dispatch_hour(
    pv_kw: f64,
    load_kw: f64,
    generator: &GeneratorConfig,
    policy: DispatchPolicy,
) -> HourlyDispatch {
    let min_load = generator.min_load_kw();
    let rate = generator.fuel_l_per_kwh;

    if load_kw <= min_load {
        return HourlyDispatch {
            pv_used_kw: 0.0,
            gen_output_kw: load_kw,
            diesel_liters: load_kw * rate,
            load_kw,
            case: DispatchCase::LoadBelowFloor,
        };
    }

    let pv_used = pv_kw.min(load_kw - min_load);
    let case = if pv_kw > min_load {
        DispatchCase::AmpleSun
    } else {
        DispatchCase::LimitedSun
    };

    let (gen_output, diesel) = match (policy, case) {
        (DispatchPolicy::Documented, DispatchCase::AmpleSun) => {
            let gen_output = min_load - pv_used;
            (gen_output, gen_output * rate)
        }
        (DispatchPolicy::Documented, _) => (load_kw - pv_kw, (load_kw - pv_used) * rate),
        (DispatchPolicy::FloorRespecting, _) => {
            let gen_output = load_kw - pv_used;
            (gen_output, gen_output * rate)
        }
    };

    HourlyDispatch {
        pv_used_kw: pv_used,
        gen_output_kw: gen_output,
        diesel_liters: diesel,
        load_kw,
        case,
    }
}

/// Runs the dispatch policy over two equal-length hourly series.
///
/// # Errors
///
/// Returns [`SimError::ShapeMismatch`] if `pv_output_kw` and `load_kw` differ
/// in length.
pub fn simulate(
    pv_output_kw: &[f64],
    load_kw: &[f64],
    generator: &GeneratorConfig,
    pv_enabled: bool,
    policy: DispatchPolicy,
) -> Result<DispatchResult> {
    if pv_output_kw.len() != load_kw.len() {
        return Err(SimError::ShapeMismatch {
            pv: pv_output_kw.len(),
            load: load_kw.len(),
        });
    }

    let mut result = DispatchResult::with_capacity(load_kw.len());
    for (&pv, &load) in pv_output_kw.iter().zip(load_kw) {
        let pv = if pv_enabled { pv } else { 0.0 };
        result.push(dispatch_hour(pv, load, generator, policy));
    }

    let negative_hours = result.gen_output_kw.iter().filter(|&&kw| kw < 0.0).count();
    if negative_hours > 0 {
        tracing::warn!(
            negative_hours,
            %policy,
            "generator output went negative; pv exceeded the floor headroom"
        );
    }
    tracing::debug!(hours = result.hours(), pv_enabled, %policy, "dispatch complete");
    Ok(result)
}

/// Runs the documented policy with the generator described by its raw
/// parameters, the minimum loading given in percent (0 to 100).
///
/// # Errors
///
/// Returns [`SimError::ShapeMismatch`] for series of different length and
/// [`SimError::InvalidInput`] for impossible generator parameters.
pub fn simulate_energy_balance(
    pv_output_kw: &[f64],
    load_kw: &[f64],
    diesel_per_kwh: f64,
    generator_capacity_kw: f64,
    min_loading_pct: f64,
    pv_enabled: bool,
) -> Result<DispatchResult> {
    let generator =
        GeneratorConfig::from_pct(generator_capacity_kw, min_loading_pct, diesel_per_kwh)?;
    simulate(
        pv_output_kw,
        load_kw,
        &generator,
        pv_enabled,
        DispatchPolicy::Documented,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const RATE: f64 = 0.25;

    fn generator() -> GeneratorConfig {
        GeneratorConfig::from_pct(100.0, 30.0, RATE).unwrap()
    }

    #[test]
    fn load_below_floor_ignores_pv() {
        let h = dispatch_hour(50.0, 20.0, &generator(), DispatchPolicy::Documented);
        assert_eq!(h.case, DispatchCase::LoadBelowFloor);
        assert_eq!(h.pv_used_kw, 0.0);
        assert_eq!(h.gen_output_kw, 20.0);
        assert_abs_diff_eq!(h.diesel_liters, 20.0 * RATE);
    }

    #[test]
    fn load_equal_to_floor_is_below_floor_case() {
        let h = dispatch_hour(50.0, 30.0, &generator(), DispatchPolicy::Documented);
        assert_eq!(h.case, DispatchCase::LoadBelowFloor);
        assert_eq!(h.gen_output_kw, 30.0);
    }

    #[test]
    fn ample_sun_documented_goes_negative() {
        let h = dispatch_hour(50.0, 80.0, &generator(), DispatchPolicy::Documented);
        assert_eq!(h.case, DispatchCase::AmpleSun);
        assert_eq!(h.pv_used_kw, 50.0);
        assert_eq!(h.gen_output_kw, -20.0);
        assert_abs_diff_eq!(h.diesel_liters, -20.0 * RATE);
    }

    #[test]
    fn ample_sun_floor_respecting_holds_floor() {
        let h = dispatch_hour(50.0, 80.0, &generator(), DispatchPolicy::FloorRespecting);
        assert_eq!(h.pv_used_kw, 50.0);
        assert_eq!(h.gen_output_kw, 30.0);
        assert_abs_diff_eq!(h.diesel_liters, 30.0 * RATE);
    }

    #[test]
    fn ample_sun_pv_capped_by_headroom() {
        // headroom = 45 - 30 = 15
        let h = dispatch_hour(60.0, 45.0, &generator(), DispatchPolicy::Documented);
        assert_eq!(h.pv_used_kw, 15.0);
        assert_eq!(h.gen_output_kw, 15.0);
    }

    #[test]
    fn limited_sun_documented_arithmetic() {
        // pv=20 <= floor, headroom = 40 - 30 = 10 -> pv_used = 10
        let h = dispatch_hour(20.0, 40.0, &generator(), DispatchPolicy::Documented);
        assert_eq!(h.case, DispatchCase::LimitedSun);
        assert_eq!(h.pv_used_kw, 10.0);
        assert_eq!(h.gen_output_kw, 20.0);
        assert_abs_diff_eq!(h.diesel_liters, 30.0 * RATE);
    }

    #[test]
    fn limited_sun_consistent_when_pv_fits() {
        let h = dispatch_hour(10.0, 60.0, &generator(), DispatchPolicy::Documented);
        assert_eq!(h.pv_used_kw, 10.0);
        assert_eq!(h.gen_output_kw, 50.0);
        assert_abs_diff_eq!(h.diesel_liters, h.gen_output_kw * RATE);
    }

    #[test]
    fn limited_sun_floor_respecting_uses_pv_used() {
        let h = dispatch_hour(20.0, 40.0, &generator(), DispatchPolicy::FloorRespecting);
        assert_eq!(h.gen_output_kw, 30.0);
        assert_abs_diff_eq!(h.diesel_liters, 30.0 * RATE);
    }

    #[test]
    fn mismatched_lengths_fail() {
        let err = simulate(
            &[1.0; 24],
            &[1.0; 23],
            &generator(),
            true,
            DispatchPolicy::Documented,
        )
        .unwrap_err();
        assert!(matches!(err, SimError::ShapeMismatch { pv: 24, load: 23 }));
    }

    #[test]
    fn empty_series_is_empty_result() {
        let result = simulate(&[], &[], &generator(), true, DispatchPolicy::Documented).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn pv_disabled_generator_serves_everything() {
        let pv = [0.0, 80.0, 10.0, 50.0];
        let load = [20.0, 80.0, 40.0, 100.0];
        let result = simulate(&pv, &load, &generator(), false, DispatchPolicy::Documented).unwrap();
        assert_eq!(result.pv_used_kw, vec![0.0; 4]);
        assert_eq!(result.gen_output_kw, load.to_vec());
        assert_eq!(result.total_load_kw, load.to_vec());
    }

    #[test]
    fn percentage_entry_point_matches_config() {
        let pv = [0.0, 50.0, 20.0];
        let load = [20.0, 80.0, 40.0];
        let a = simulate_energy_balance(&pv, &load, RATE, 100.0, 30.0, true).unwrap();
        let b = simulate(&pv, &load, &generator(), true, DispatchPolicy::Documented).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_percentage_rejected() {
        let err = simulate_energy_balance(&[1.0], &[1.0], RATE, 100.0, 150.0, true).unwrap_err();
        assert!(matches!(err, SimError::InvalidInput(_)));
    }
}
