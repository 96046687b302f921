//! Common types and traits for hourly profile sources.

use crate::sim::clock::Clock;

/// Contextual information passed to devices when sampling a timestep.
/// # Fields
/// * `timestep` - Hour index from the start of the simulation horizon
#[derive(Debug, Clone, Copy)]
pub struct DeviceContext {
    pub timestep: usize,
}

impl DeviceContext {
    /// Creates a new DeviceContext for the given timestep.
    pub fn new(timestep: usize) -> Self {
        Self { timestep }
    }
}

/// Trait defining a device that produces an hourly power profile.
///
/// The load profiles implement this so every load mode is sampled the same
/// way.
pub trait Device {
    /// Returns the power value at the specified time step.
    ///
    /// Values are positive magnitudes: generation for producers, demand for
    /// loads.
    ///
    /// # Arguments
    ///
    /// * `context` - Contextual information about the timestep being sampled
    ///
    /// # Returns
    ///
    /// Power in kilowatts (kW) at the specified time step
    fn power_kw(&mut self, context: &DeviceContext) -> f64;

    /// Samples `steps` consecutive timesteps starting at 0.
    fn profile_kw(&mut self, steps: usize) -> Vec<f64> {
        let mut profile = Vec::with_capacity(steps);
        Clock::new(steps).run(|t| profile.push(self.power_kw(&DeviceContext::new(t))));
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ramp;

    impl Device for Ramp {
        fn power_kw(&mut self, context: &DeviceContext) -> f64 {
            context.timestep as f64
        }
    }

    #[test]
    fn profile_samples_each_step_in_order() {
        assert_eq!(Ramp.profile_kw(4), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn empty_profile() {
        assert!(Ramp.profile_kw(0).is_empty());
    }
}
