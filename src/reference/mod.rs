//! Fixed reference data loaded once at start-up.

/// Country coordinates and diesel prices.
pub mod countries;
/// Generator model fuel rates.
pub mod generators;

pub use countries::{CountryCatalog, Location};
pub use generators::GeneratorCatalog;
