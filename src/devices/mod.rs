//! Hourly profile sources feeding the dispatch simulator.

/// Random, daily-pattern, and file-based load profiles.
pub mod baseload;
/// Clear-sky irradiance and PV output model.
pub mod solar;
pub mod types;

// Re-export the main types for convenience
pub use baseload::{PatternLoad, RandomLoad};
pub use solar::{ClearSkyModel, SolarPv};
pub use types::Device;
pub use types::DeviceContext;
