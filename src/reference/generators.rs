//! Generator model catalog: fuel consumption per delivered kWh.

use std::collections::BTreeMap;

use crate::error::{Result, SimError};

/// Fuel rates (L/kWh) of the built-in generator models.
const BUILTIN_MODELS: &[(&str, f64)] = &[
    ("Cummins C100D5", 0.244),
    ("CAT DE110E2", 0.250),
    ("Perkins 1104A-44TG2", 0.265),
    ("FG Wilson P110-3", 0.248),
    ("Doosan D1146T", 0.258),
];

/// Read-only lookup of generator model name to fuel rate.
#[derive(Debug, Clone)]
pub struct GeneratorCatalog {
    models: BTreeMap<String, f64>,
}

impl GeneratorCatalog {
    /// Catalog with the built-in models.
    pub fn builtin() -> Self {
        Self {
            models: BUILTIN_MODELS
                .iter()
                .map(|&(name, rate)| (name.to_string(), rate))
                .collect(),
        }
    }

    /// Fuel rate for a model in liters per kWh delivered.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidInput`] if the model is not in the catalog.
    pub fn fuel_rate(&self, model: &str) -> Result<f64> {
        self.models.get(model).copied().ok_or_else(|| {
            SimError::InvalidInput(format!(
                "unknown generator model \"{model}\", available: {}",
                self.names().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    /// Model names in alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rates() {
        let catalog = GeneratorCatalog::builtin();
        assert_eq!(catalog.fuel_rate("Cummins C100D5").ok(), Some(0.244));
        assert_eq!(catalog.fuel_rate("Perkins 1104A-44TG2").ok(), Some(0.265));
        assert_eq!(catalog.names().count(), 5);
    }

    #[test]
    fn unknown_model_lists_available() {
        let err = GeneratorCatalog::builtin().fuel_rate("Acme 9000").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Acme 9000"));
        assert!(msg.contains("Doosan D1146T"));
    }
}
