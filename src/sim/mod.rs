/// Hourly simulation clock and timestamp axis.
pub mod clock;
/// Per-hour PV/generator energy balance.
pub mod dispatch;
pub mod economics;
pub mod kpi;
pub mod types;

pub use dispatch::{dispatch_hour, simulate, simulate_energy_balance};
