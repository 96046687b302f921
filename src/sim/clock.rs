use chrono::{DateTime, TimeDelta, Utc};

use crate::error::{Result, SimError};

/// Hours in one simulated day.
pub const HOURS_PER_DAY: usize = 24;

/// An hourly simulation clock over a fixed horizon.
///
/// Step `i` of every series in a run refers to the wall-clock hour
/// `start + i hours`. The `Clock` hands out step indices and maps them back
/// to timestamps.
///
/// # Examples
///
/// ```
/// use hybrid_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(3);
/// let mut steps = Vec::new();
///
/// clock.run(|step| steps.push(step));
/// assert_eq!(steps, vec![0, 1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    /// Timestamp of step 0
    start: DateTime<Utc>,
    /// Next step to hand out
    current: usize,
    /// Total steps in the horizon
    total: usize,
}

impl Clock {
    /// Creates a clock of `total` hourly steps anchored at the Unix epoch.
    pub fn new(total: usize) -> Self {
        Self::starting_at(DateTime::<Utc>::UNIX_EPOCH, total)
    }

    /// Creates a clock of `total` hourly steps starting at `start`.
    pub fn starting_at(start: DateTime<Utc>, total: usize) -> Self {
        Self {
            start,
            current: 0,
            total,
        }
    }

    /// Creates a clock covering `days` whole days.
    ///
    /// # Errors
    ///
    /// As [`horizon_hours`].
    pub fn for_days(start: DateTime<Utc>, days: usize) -> Result<Self> {
        Ok(Self::starting_at(start, horizon_hours(days)?))
    }

    /// Total number of steps in the horizon.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Advances the clock by one step.
    ///
    /// # Returns
    ///
    /// * `Some(step)` - The current step number (starting from 0) before advancing
    /// * `None` - If the clock has reached its total steps
    pub fn tick(&mut self) -> Option<usize> {
        if self.current < self.total {
            let step = self.current;
            self.current += 1;
            Some(step)
        } else {
            None
        }
    }

    /// Runs a function for each remaining step in the clock.
    pub fn run(&mut self, mut f: impl FnMut(usize)) {
        while let Some(step) = self.tick() {
            f(step);
        }
    }

    /// Wall-clock time of a step.
    pub fn timestamp(&self, step: usize) -> DateTime<Utc> {
        timestamp_at(self.start, step)
    }

    /// Timestamps of every step in the horizon.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        (0..self.total).map(|step| self.timestamp(step)).collect()
    }
}

/// Number of hourly steps in `days` days.
///
/// # Errors
///
/// Returns [`SimError::InvalidInput`] if the hour count does not fit in a `usize`.
pub fn horizon_hours(days: usize) -> Result<usize> {
    days.checked_mul(HOURS_PER_DAY).ok_or_else(|| {
        SimError::InvalidInput(format!("{days} days is too long a horizon"))
    })
}

/// Wall-clock time of hourly step `step` counted from `start`.
pub fn timestamp_at(start: DateTime<Utc>, step: usize) -> DateTime<Utc> {
    let hours = i64::try_from(step).unwrap_or(i64::MAX);
    start + TimeDelta::hours(hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_tick() {
        let mut clock = Clock::new(2);
        assert_eq!(clock.tick(), Some(0));
        assert_eq!(clock.tick(), Some(1));
        assert_eq!(clock.tick(), None);
    }

    #[test]
    fn test_empty_clock() {
        let mut clock = Clock::new(0);
        assert_eq!(clock.tick(), None);

        let mut was_called = false;
        clock.run(|_| was_called = true);
        assert!(!was_called);
    }

    #[test]
    fn for_days_covers_whole_days() {
        let start = Utc.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap();
        let clock = Clock::for_days(start, 3).unwrap();
        assert_eq!(clock.total(), 72);
    }

    #[test]
    fn oversized_horizon_is_invalid_input() {
        let start = Utc.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap();
        assert!(matches!(
            Clock::for_days(start, usize::MAX / 10),
            Err(SimError::InvalidInput(_))
        ));
        assert_eq!(horizon_hours(365).ok(), Some(8760));
    }

    #[test]
    fn timestamps_are_hourly() {
        let start = Utc.with_ymd_and_hms(2024, 12, 31, 22, 0, 0).unwrap();
        let clock = Clock::starting_at(start, 4);
        let stamps = clock.timestamps();
        assert_eq!(stamps.len(), 4);
        assert_eq!(stamps[0], start);
        assert_eq!(
            stamps[3],
            Utc.with_ymd_and_hms(2025, 1, 1, 1, 0, 0).unwrap()
        );
    }
}
