//! Output surfaces for simulation results.

/// CSV export of hourly results.
pub mod export;
