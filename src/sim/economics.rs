//! Diesel-only baseline comparison and project economics.

use std::fmt;

use super::dispatch::simulate;
use super::types::{DispatchPolicy, DispatchResult, GeneratorConfig};
use crate::error::{Result, SimError};

/// Days per year used to annualise savings.
const DAYS_PER_YEAR: f64 = 365.0;

/// Cost side of the PV investment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectCosts {
    /// Up-front PV cost (USD).
    pub capex_usd: f64,
    /// Yearly operating cost (USD/year).
    pub opex_usd_per_year: f64,
    /// Project lifetime (years).
    pub lifetime_years: f64,
}

impl ProjectCosts {
    /// CAPEX plus OPEX over the whole lifetime.
    pub fn total_cost_usd(&self) -> f64 {
        self.capex_usd + self.opex_usd_per_year * self.lifetime_years
    }
}

/// Savings of the hybrid run against the diesel-only baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct SavingsReport {
    /// Diesel burned with PV disabled (liters).
    pub baseline_diesel_liters: f64,
    /// Diesel burned in the actual run (liters).
    pub actual_diesel_liters: f64,
    /// `baseline - actual` (liters).
    pub diesel_saved_liters: f64,
    /// Savings over the simulated horizon (USD).
    pub usd_saved: f64,
    /// Savings extrapolated linearly to one year (USD/year).
    pub annualized_savings_usd: f64,
    /// Return on investment over the lifetime (%); `None` when the project costs nothing.
    pub roi_pct: Option<f64>,
    /// Years to recover CAPEX; infinite when there are no savings.
    pub payback_years: f64,
}

impl SavingsReport {
    /// Computes savings from already-simulated baseline and actual runs.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidInput`] if `days` is zero.
    pub fn from_runs(
        baseline: &DispatchResult,
        actual: &DispatchResult,
        diesel_price_per_liter: f64,
        days: usize,
        costs: &ProjectCosts,
    ) -> Result<Self> {
        if days == 0 {
            return Err(SimError::InvalidInput(
                "cannot annualise savings over zero days".to_string(),
            ));
        }

        let baseline_diesel_liters = baseline.total_diesel_liters();
        let actual_diesel_liters = actual.total_diesel_liters();
        let diesel_saved_liters = baseline_diesel_liters - actual_diesel_liters;
        let usd_saved = diesel_saved_liters * diesel_price_per_liter;
        let annualized_savings_usd = annualize(usd_saved, days);

        Ok(Self {
            baseline_diesel_liters,
            actual_diesel_liters,
            diesel_saved_liters,
            usd_saved,
            annualized_savings_usd,
            roi_pct: roi_pct(annualized_savings_usd, costs),
            payback_years: payback_years(costs.capex_usd, annualized_savings_usd),
        })
    }
}

/// Linear extrapolation of savings over `days` to a full year.
pub fn annualize(usd_saved: f64, days: usize) -> f64 {
    usd_saved * DAYS_PER_YEAR / days as f64
}

/// Lifetime ROI in percent, `None` when total cost is zero.
pub fn roi_pct(annualized_savings_usd: f64, costs: &ProjectCosts) -> Option<f64> {
    let total_cost = costs.total_cost_usd();
    if total_cost == 0.0 {
        return None;
    }
    Some((annualized_savings_usd * costs.lifetime_years - total_cost) / total_cost * 100.0)
}

/// Years to recover CAPEX from annual savings; infinite when savings are not positive.
pub fn payback_years(capex_usd: f64, annualized_savings_usd: f64) -> f64 {
    if annualized_savings_usd > 0.0 {
        capex_usd / annualized_savings_usd
    } else {
        f64::INFINITY
    }
}

/// Runs the diesel-only baseline for the same load and generator and
/// compares it with `actual`.
///
/// # Errors
///
/// Returns [`SimError::ShapeMismatch`] if the series lengths differ and
/// [`SimError::InvalidInput`] if `days` is zero.
#[expect(clippy::too_many_arguments)]
pub fn compare_with_baseline(
    pv_output_kw: &[f64],
    load_kw: &[f64],
    generator: &GeneratorConfig,
    policy: DispatchPolicy,
    actual: &DispatchResult,
    diesel_price_per_liter: f64,
    days: usize,
    costs: &ProjectCosts,
) -> Result<SavingsReport> {
    let baseline = simulate(pv_output_kw, load_kw, generator, false, policy)?;
    let report = SavingsReport::from_runs(&baseline, actual, diesel_price_per_liter, days, costs)?;
    tracing::info!(
        baseline_l = report.baseline_diesel_liters,
        actual_l = report.actual_diesel_liters,
        saved_l = report.diesel_saved_liters,
        "baseline comparison complete"
    );
    Ok(report)
}

impl fmt::Display for SavingsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Savings & ROI ---")?;
        writeln!(f, "Baseline diesel:       {:.2} L", self.baseline_diesel_liters)?;
        writeln!(f, "Actual diesel:         {:.2} L", self.actual_diesel_liters)?;
        writeln!(f, "Diesel saved:          {:.2} L", self.diesel_saved_liters)?;
        writeln!(f, "USD saved:             ${:.2}", self.usd_saved)?;
        writeln!(f, "Annual USD savings:    ${:.2}", self.annualized_savings_usd)?;
        match self.roi_pct {
            Some(roi) => writeln!(f, "ROI:                   {roi:.2}%")?,
            None => writeln!(f, "ROI:                   n/a")?,
        }
        if self.payback_years.is_finite() {
            write!(f, "Payback period:        {:.2} years", self.payback_years)
        } else {
            write!(f, "Payback period:        never")
        }
    }
}
