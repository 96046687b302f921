use std::fs::File;
use std::io::Read;
use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::devices::types::{Device, DeviceContext};
use crate::error::{Result, SimError};
use crate::sim::clock::{HOURS_PER_DAY, horizon_hours};

/// A load that draws every hour independently and uniformly from the
/// half-open band `[min_kw, max_kw)`. A zero-width band yields `min_kw`.
///
/// Without a seed the generator is seeded from OS entropy, so two runs differ.
/// Pass a seed whenever a run has to be reproduced.
///
/// # Examples
///
/// ```
/// use hybrid_sim::devices::baseload::RandomLoad;
/// use hybrid_sim::devices::Device;
///
/// let mut load = RandomLoad::new(30.0, 70.0, Some(42)).unwrap();
/// let profile = load.profile_kw(48);
/// assert!(profile.iter().all(|kw| (30.0..70.0).contains(kw)));
/// ```
#[derive(Debug, Clone)]
pub struct RandomLoad {
    /// Lower bound of the band in kilowatts
    pub min_kw: f64,

    /// Upper bound of the band in kilowatts
    pub max_kw: f64,

    /// Random number generator for the hourly draws
    rng: StdRng,
}

impl RandomLoad {
    /// Creates a random load.
    ///
    /// # Arguments
    ///
    /// * `min_kw` - Lower bound of the band in kilowatts
    /// * `max_kw` - Upper bound of the band in kilowatts
    /// * `seed` - Optional seed for reproducible draws
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidInput`] if the band is empty, negative, or
    /// not finite.
    pub fn new(min_kw: f64, max_kw: f64, seed: Option<u64>) -> Result<Self> {
        if !min_kw.is_finite() || !max_kw.is_finite() || min_kw < 0.0 || min_kw > max_kw {
            return Err(SimError::InvalidInput(format!(
                "random load band must satisfy 0 <= min <= max, got [{min_kw}, {max_kw}]"
            )));
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            min_kw,
            max_kw,
            rng,
        })
    }
}

impl Device for RandomLoad {
    fn power_kw(&mut self, _context: &DeviceContext) -> f64 {
        if self.min_kw < self.max_kw {
            self.rng.random_range(self.min_kw..self.max_kw)
        } else {
            self.min_kw
        }
    }
}

/// A load that repeats a fixed 24-hour pattern every day.
#[derive(Debug, Clone)]
pub struct PatternLoad {
    hourly_kw: [f64; HOURS_PER_DAY],
}

impl PatternLoad {
    /// Creates a pattern load from exactly 24 hourly values.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidInput`] if `hourly_kw` does not have 24
    /// entries or any entry is negative or not finite.
    pub fn new(hourly_kw: &[f64]) -> Result<Self> {
        let pattern: [f64; HOURS_PER_DAY] = hourly_kw.try_into().map_err(|_| {
            SimError::InvalidInput(format!(
                "daily load pattern needs exactly {HOURS_PER_DAY} values, got {}",
                hourly_kw.len()
            ))
        })?;
        check_non_negative(&pattern)?;
        Ok(Self { hourly_kw: pattern })
    }
}

impl Device for PatternLoad {
    fn power_kw(&mut self, context: &DeviceContext) -> f64 {
        self.hourly_kw[context.timestep % HOURS_PER_DAY]
    }
}

/// Hourly load for `days` days drawn uniformly from `[min_kw, max_kw)`.
///
/// # Errors
///
/// As [`RandomLoad::new`], plus [`SimError::InvalidInput`] for a horizon
/// too long to index.
pub fn random_load_profile(
    days: usize,
    min_kw: f64,
    max_kw: f64,
    seed: Option<u64>,
) -> Result<Vec<f64>> {
    let hours = horizon_hours(days)?;
    let mut load = RandomLoad::new(min_kw, max_kw, seed)?;
    Ok(load.profile_kw(hours))
}

/// Repeats a 24-value daily pattern for `days` days.
///
/// # Errors
///
/// As [`PatternLoad::new`], plus [`SimError::InvalidInput`] for a horizon
/// too long to index.
pub fn pattern_load_profile(days: usize, hourly_kw: &[f64]) -> Result<Vec<f64>> {
    let hours = horizon_hours(days)?;
    let mut load = PatternLoad::new(hourly_kw)?;
    Ok(load.profile_kw(hours))
}

/// Reads an hourly load series from a headerless single-column CSV.
///
/// Only the first column of each record is used.
///
/// # Errors
///
/// Returns [`SimError::InvalidInput`] if a value does not parse, is negative,
/// or the file does not hold exactly `24 * days` values, and
/// [`SimError::Csv`] if the CSV itself is malformed.
pub fn load_profile_from_csv(reader: impl Read, days: usize) -> Result<Vec<f64>> {
    let expected = horizon_hours(days)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut series = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let raw = record.get(0).unwrap_or("").trim();
        let kw: f64 = raw.parse().map_err(|_| {
            SimError::InvalidInput(format!("row {}: \"{raw}\" is not a number", row + 1))
        })?;
        series.push(kw);
    }

    if series.len() != expected {
        return Err(SimError::InvalidInput(format!(
            "load file has {} values, expected {expected} ({days} days x {HOURS_PER_DAY} h)",
            series.len()
        )));
    }
    check_non_negative(&series)?;
    Ok(series)
}

/// Reads an hourly load series from a CSV file on disk.
///
/// # Errors
///
/// Returns [`SimError::Io`] if the file cannot be opened, otherwise as
/// [`load_profile_from_csv`].
pub fn load_profile_from_csv_path(path: &Path, days: usize) -> Result<Vec<f64>> {
    let file = File::open(path)?;
    load_profile_from_csv(file, days)
}

fn check_non_negative(values: &[f64]) -> Result<()> {
    match values
        .iter()
        .position(|kw| !kw.is_finite() || *kw < 0.0)
    {
        Some(i) => Err(SimError::InvalidInput(format!(
            "load value at hour {i} must be a non-negative number, got {}",
            values[i]
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_day(kw: f64) -> Vec<f64> {
        vec![kw; HOURS_PER_DAY]
    }

    #[test]
    fn random_profile_length_and_band() {
        let profile = random_load_profile(3, 30.0, 70.0, Some(7)).unwrap();
        assert_eq!(profile.len(), 72);
        assert!(profile.iter().all(|kw| (30.0..70.0).contains(kw)));
    }

    #[test]
    fn zero_width_band_is_constant() {
        let profile = random_load_profile(1, 45.0, 45.0, Some(3)).unwrap();
        assert!(profile.iter().all(|&kw| kw == 45.0));
    }

    #[test]
    fn oversized_horizon_rejected_before_sampling() {
        let err = random_load_profile(usize::MAX / 10, 30.0, 70.0, Some(1)).unwrap_err();
        assert!(matches!(err, SimError::InvalidInput(_)));
        let err = pattern_load_profile(usize::MAX / 10, &flat_day(40.0)).unwrap_err();
        assert!(matches!(err, SimError::InvalidInput(_)));
    }

    #[test]
    fn random_profile_deterministic_with_seed() {
        let a = random_load_profile(2, 30.0, 70.0, Some(42)).unwrap();
        let b = random_load_profile(2, 30.0, 70.0, Some(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn random_profile_differs_across_seeds() {
        let a = random_load_profile(1, 30.0, 70.0, Some(1)).unwrap();
        let b = random_load_profile(1, 30.0, 70.0, Some(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn random_band_inverted_rejected() {
        assert!(matches!(
            RandomLoad::new(70.0, 30.0, None),
            Err(SimError::InvalidInput(_))
        ));
    }

    #[test]
    fn pattern_repeats_daily() {
        let pattern: Vec<f64> = (0..24).map(f64::from).collect();
        let profile = pattern_load_profile(3, &pattern).unwrap();
        assert_eq!(profile.len(), 72);
        assert_eq!(&profile[..24], pattern.as_slice());
        assert_eq!(&profile[48..], pattern.as_slice());
    }

    #[test]
    fn pattern_with_23_values_is_invalid_input() {
        let err = pattern_load_profile(1, &vec![50.0; 23]).unwrap_err();
        assert!(matches!(err, SimError::InvalidInput(_)));
    }

    #[test]
    fn pattern_with_25_values_is_invalid_input() {
        assert!(PatternLoad::new(&vec![50.0; 25]).is_err());
    }

    #[test]
    fn pattern_negative_value_rejected() {
        let mut day = flat_day(40.0);
        day[5] = -1.0;
        assert!(PatternLoad::new(&day).is_err());
    }

    #[test]
    fn csv_profile_parses_single_column() {
        let text: String = (0..48).map(|h| format!("{}\n", 30 + h % 10)).collect();
        let profile = load_profile_from_csv(text.as_bytes(), 2).unwrap();
        assert_eq!(profile.len(), 48);
        assert_eq!(profile[0], 30.0);
        assert_eq!(profile[13], 33.0);
    }

    #[test]
    fn csv_profile_wrong_length_rejected() {
        let text = "50\n".repeat(23);
        let err = load_profile_from_csv(text.as_bytes(), 1).unwrap_err();
        assert!(matches!(err, SimError::InvalidInput(_)));
    }

    #[test]
    fn csv_profile_non_numeric_rejected() {
        let mut text = "50\n".repeat(23);
        text.push_str("lots\n");
        let err = load_profile_from_csv(text.as_bytes(), 1).unwrap_err();
        assert!(err.to_string().contains("row 24"));
    }
}
