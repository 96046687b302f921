//! Error types shared by the estimator, load generator, and dispatch simulator.

use thiserror::Error;

/// Failures detected while validating simulation inputs.
///
/// All variants are raised before any computation starts. None of them are
/// retryable: the simulation is deterministic, so the caller must change the
/// inputs.
#[derive(Debug, Error)]
pub enum SimError {
    /// PV output and load series have different lengths.
    #[error("series length mismatch: pv output has {pv} samples, load has {load}")]
    ShapeMismatch { pv: usize, load: usize },

    /// A caller-supplied value is malformed (e.g. a 23-value daily pattern).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Coordinates are out of range or a country cannot be resolved.
    #[error("invalid location: {0}")]
    InvalidLocation(String),

    /// The solar position algorithm rejected its inputs.
    #[error("solar position: {0}")]
    SolarPosition(String),

    /// Reference data could not be parsed.
    #[error("invalid reference data: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = SimError> = std::result::Result<T, E>;
