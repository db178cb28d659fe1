//! Simulation configuration.
//!
//! A [`SimulationConfig`] describes a batch of independent trajectories: the
//! initial array dimensions, the horizon, the generator set and the seed of
//! the first run. It can be written to and read from JSON so that a batch is
//! fully reproducible from its configuration file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::base::Nucleotide;
use crate::errors::BuilderError;
use crate::evolution::{generators_to_json, EventGenerator};
use crate::genome::CrisprArray;

fn default_placeholder() -> Nucleotide {
    Nucleotide::N
}

fn default_num_runs() -> usize {
    1
}

fn default_min_line_length() -> usize {
    3
}

fn default_max_gap_length() -> usize {
    5
}

/// The master configuration of a simulation batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seed of the first run; run `i` uses `base_seed + i`.
    #[serde(default)]
    pub base_seed: u64,
    /// Horizon of every trajectory.
    pub end_time: f64,
    /// Number of repeats in the initial array.
    pub array_length: usize,
    /// Length of every repeat in the initial array.
    pub repeat_length: usize,
    /// Number of independent runs.
    #[serde(default = "default_num_runs")]
    pub num_runs: usize,
    /// Symbol the initial array is filled with.
    #[serde(default = "default_placeholder")]
    pub placeholder: Nucleotide,
    pub generators: Vec<EventGenerator>,
    /// Minimum length of a mismatch line that counts toward a pattern.
    #[serde(default = "default_min_line_length")]
    pub min_line_length: usize,
    /// Largest gap between mismatch lines that still joins them into a group.
    #[serde(default = "default_max_gap_length")]
    pub max_gap_length: usize,
    /// Free-form description stored with the results.
    #[serde(default)]
    pub meta: String,
}

impl SimulationConfig {
    /// Check the invariants a batch needs before any trajectory starts.
    pub fn validate(&self) -> Result<(), BuilderError> {
        if !self.end_time.is_finite() || self.end_time <= 0.0 {
            return Err(BuilderError::InvalidParameter(format!(
                "end_time must be finite and positive, got {}",
                self.end_time
            )));
        }
        if self.array_length == 0 {
            return Err(BuilderError::InvalidParameter(
                "array_length must be at least 1".into(),
            ));
        }
        if self.repeat_length == 0 {
            return Err(BuilderError::InvalidParameter(
                "repeat_length must be at least 1".into(),
            ));
        }
        if self.generators.is_empty() {
            return Err(BuilderError::MissingRequired("generators"));
        }
        if self.base_seed.checked_add(self.num_runs as u64).is_none() {
            return Err(BuilderError::InvalidParameter(format!(
                "base_seed {} + num_runs {} overflows",
                self.base_seed, self.num_runs
            )));
        }
        Ok(())
    }

    /// The initial array every run starts from.
    pub fn initial_array(&self) -> CrisprArray {
        CrisprArray::filled(self.array_length, self.repeat_length, self.placeholder)
    }

    /// Seeds of all runs, in order.
    pub fn seeds(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.num_runs as u64).map(move |i| self.base_seed + i)
    }

    /// Summary of the batch for storage next to its results.
    pub fn simulation_info(&self) -> serde_json::Value {
        serde_json::json!({
            "base_seed": self.base_seed,
            "end_time": self.end_time,
            "array_length": self.array_length,
            "repeat_length": self.repeat_length,
            "event_generators": generators_to_json(&self.generators),
            "num_runs": self.num_runs,
            "meta": self.meta,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, BuilderError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| BuilderError::InvalidParameter(format!("config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, BuilderError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BuilderError::InvalidParameter(format!("config: {e}")))
    }

    /// Read and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BuilderError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            BuilderError::InvalidParameter(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&text)
    }
}
