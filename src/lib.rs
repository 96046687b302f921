//! PV + diesel generator hybrid energy-balance simulator.

pub mod config;
pub mod devices;
pub mod error;
pub mod io;
pub mod reference;
pub mod runner;
/// Dispatch policy, baseline economics, and energy summary.
pub mod sim;

pub use error::{Result, SimError};
