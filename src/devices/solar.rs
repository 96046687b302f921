use chrono::{DateTime, Local, Utc};
use spa_sra::spa::{Function, Input, SpaData};

use crate::error::{Result, SimError};
use crate::reference::Location;
use crate::sim::clock::Clock;

/// Haurwitz clear-sky coefficient (W/m²).
const HAURWITZ_SCALE: f64 = 1098.0;
/// Haurwitz extinction term.
const HAURWITZ_EXTINCTION: f64 = 0.057;

/// Annual mean surface pressure used for refraction (mbar).
const PRESSURE_MBAR: f64 = 1013.25;
/// Annual mean air temperature used for refraction (°C).
const TEMPERATURE_C: f64 = 12.0;

/// Clear-sky global horizontal irradiance for a fixed site.
///
/// Solar position comes from NREL's SPA; irradiance uses the Haurwitz model,
/// which depends on the solar zenith angle only.
#[derive(Debug, Clone, Copy)]
pub struct ClearSkyModel {
    latitude_deg: f64,
    longitude_deg: f64,
}

impl ClearSkyModel {
    /// Creates a model for the given coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidLocation`] for non-finite or out-of-range
    /// coordinates.
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Result<Self> {
        if !latitude_deg.is_finite() || !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(SimError::InvalidLocation(format!(
                "latitude {latitude_deg} is outside [-90, 90]"
            )));
        }
        if !longitude_deg.is_finite() || !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(SimError::InvalidLocation(format!(
                "longitude {longitude_deg} is outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
        })
    }

    /// Creates a model for a catalog location.
    ///
    /// # Errors
    ///
    /// As [`ClearSkyModel::new`].
    pub fn for_location(location: &Location) -> Result<Self> {
        Self::new(location.latitude, location.longitude)
    }

    /// Topocentric solar zenith angle in degrees at `time`, refraction
    /// included. Values above 90 mean the sun is below the horizon.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::SolarPosition`] if SPA rejects its inputs, e.g. a
    /// year outside -2000..=6000.
    pub fn zenith_deg(&self, time: DateTime<Utc>) -> Result<f64> {
        let mut input = Input::from_date_time(time.with_timezone(&Local));
        input.latitude = self.latitude_deg;
        input.longitude = self.longitude_deg;
        input.pressure = PRESSURE_MBAR;
        input.temperature = TEMPERATURE_C;
        input.elevation = 0.0;
        input.slope = 0.0;
        input.azm_rotation = 0.0;
        input.function = Function::SpaZa;

        let mut spa = SpaData::new(input);
        spa.spa_calculate()
            .map_err(|e| SimError::SolarPosition(e.to_string()))?;
        Ok(spa.spa_za.zenith)
    }

    /// Clear-sky GHI in W/m² at `time`; zero when the sun is down.
    ///
    /// # Errors
    ///
    /// As [`ClearSkyModel::zenith_deg`].
    pub fn ghi_w_m2(&self, time: DateTime<Utc>) -> Result<f64> {
        let cos_z = self.zenith_deg(time)?.to_radians().cos();
        if cos_z <= 0.0 {
            return Ok(0.0);
        }
        Ok((HAURWITZ_SCALE * cos_z * (-HAURWITZ_EXTINCTION / cos_z).exp()).max(0.0))
    }
}

/// A PV array whose output follows clear-sky irradiance.
///
/// Output scales linearly with irradiance: 1000 W/m² on the array yields the
/// rated `kw_peak` times `efficiency`. No soiling, temperature, or inverter
/// losses are modelled beyond that single derating factor.
#[derive(Debug, Clone)]
pub struct SolarPv {
    /// Installed capacity in kWp.
    pub kw_peak: f64,

    /// Derating factor applied to the ideal output (1.0 = none).
    pub efficiency: f64,

    /// Irradiance model for the site.
    model: ClearSkyModel,
}

impl SolarPv {
    /// Creates a PV array at a site.
    ///
    /// # Arguments
    ///
    /// * `kw_peak` - Installed capacity in kWp
    /// * `efficiency` - Derating factor applied to the clear-sky output
    /// * `model` - Clear-sky model for the site
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidInput`] for a negative or non-finite
    /// capacity or efficiency.
    pub fn new(kw_peak: f64, efficiency: f64, model: ClearSkyModel) -> Result<Self> {
        if !kw_peak.is_finite() || kw_peak < 0.0 {
            return Err(SimError::InvalidInput(format!(
                "pv capacity must be a non-negative number, got {kw_peak}"
            )));
        }
        if !efficiency.is_finite() || efficiency < 0.0 {
            return Err(SimError::InvalidInput(format!(
                "pv efficiency must be a non-negative number, got {efficiency}"
            )));
        }
        Ok(Self {
            kw_peak,
            efficiency,
            model,
        })
    }

    /// Instantaneous output in kW at `time`.
    ///
    /// # Errors
    ///
    /// As [`ClearSkyModel::zenith_deg`].
    pub fn output_kw(&self, time: DateTime<Utc>) -> Result<f64> {
        Ok(self.model.ghi_w_m2(time)? * self.kw_peak * self.efficiency / 1000.0)
    }

    /// Output sampled at every step of `clock`.
    ///
    /// # Errors
    ///
    /// As [`ClearSkyModel::zenith_deg`].
    pub fn series_kw(&self, clock: &Clock) -> Result<Vec<f64>> {
        clock
            .timestamps()
            .into_iter()
            .map(|time| self.output_kw(time))
            .collect()
    }
}

/// Hourly clear-sky PV output (kW) for `days` days starting at `start`.
///
/// # Errors
///
/// Returns [`SimError::InvalidLocation`] for impossible coordinates,
/// [`SimError::InvalidInput`] for a negative capacity or efficiency or an
/// unindexable horizon, and [`SimError::SolarPosition`] if SPA fails.
pub fn pv_output_series(
    location: &Location,
    kw_peak: f64,
    efficiency: f64,
    start: DateTime<Utc>,
    days: usize,
) -> Result<Vec<f64>> {
    let clock = Clock::for_days(start, days)?;
    let pv = SolarPv::new(kw_peak, efficiency, ClearSkyModel::for_location(location)?)?;
    pv.series_kw(&clock)
}
