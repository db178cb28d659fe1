//! Builder pattern for creating simulation configurations.
//!
//! Provides a fluent API for assembling a [`SimulationConfig`] with sensible
//! defaults and validation.

use crate::base::Nucleotide;
pub use crate::errors::BuilderError;
use crate::evolution::{
    DeletionParameters, EventGenerator, InsertionDeletionParameters, InsertionParameters,
    MutationParameters, Rate,
};
use crate::simulation::SimulationConfig;

/// Builder for constructing [`SimulationConfig`] instances with a fluent API.
///
/// # Examples
///
/// ```
/// use crisprmut_sim::simulation::SimulationBuilder;
/// use crisprmut_sim::evolution::{DeletionParameters, Rate};
///
/// let config = SimulationBuilder::new()
///     .end_time(10.0)
///     .array_dimensions(20, 30)
///     .mutation_rate_per_base(1e-3)
///     .deletion(DeletionParameters::default(), Rate::PerRepeat(0.01))
///     .num_runs(100)
///     .seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(config.generators.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct SimulationBuilder {
    end_time: Option<f64>,
    array_length: Option<usize>,
    repeat_length: Option<usize>,
    num_runs: Option<usize>,
    base_seed: u64,
    placeholder: Option<Nucleotide>,
    min_line_length: Option<usize>,
    max_gap_length: Option<usize>,
    meta: String,

    generators: Vec<EventGenerator>,
    // First generator error, reported from build()
    error: Option<BuilderError>,
}

impl SimulationBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the horizon of each trajectory (required).
    pub fn end_time(mut self, end_time: f64) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Set the initial array length and repeat length (required).
    pub fn array_dimensions(mut self, array_length: usize, repeat_length: usize) -> Self {
        self.array_length = Some(array_length);
        self.repeat_length = Some(repeat_length);
        self
    }

    /// Set the number of runs (default: 1).
    pub fn num_runs(mut self, num_runs: usize) -> Self {
        self.num_runs = Some(num_runs);
        self
    }

    /// Set the seed of the first run (default: 0).
    pub fn seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    /// Set the filler symbol of the initial array (default: `N`).
    pub fn placeholder(mut self, placeholder: Nucleotide) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Set the pattern classification thresholds (defaults: 3 and 5).
    pub fn pattern_thresholds(mut self, min_line_length: usize, max_gap_length: usize) -> Self {
        self.min_line_length = Some(min_line_length);
        self.max_gap_length = Some(max_gap_length);
        self
    }

    pub fn meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = meta.into();
        self
    }

    /// Add an already built generator.
    pub fn generator(mut self, generator: EventGenerator) -> Self {
        self.generators.push(generator);
        self
    }

    fn push(mut self, generator: Result<EventGenerator, crate::errors::ParameterError>) -> Self {
        match generator {
            Ok(g) => self.generators.push(g),
            Err(e) => {
                if self.error.is_none() {
                    self.error = Some(e.into());
                }
            }
        }
        self
    }

    /// Add a point mutation generator with a per-base rate.
    pub fn mutation_rate_per_base(self, rate: f64) -> Self {
        self.push(EventGenerator::mutation(
            MutationParameters::default(),
            Rate::PerBase(rate),
        ))
    }

    pub fn mutation(self, params: MutationParameters, rate: Rate) -> Self {
        self.push(EventGenerator::mutation(params, rate))
    }

    pub fn insertion(self, params: InsertionParameters, rate: Rate) -> Self {
        self.push(EventGenerator::insertion(params, rate))
    }

    pub fn deletion(self, params: DeletionParameters, rate: Rate) -> Self {
        self.push(EventGenerator::deletion(params, rate))
    }

    pub fn insertion_deletion(self, params: InsertionDeletionParameters, rate: Rate) -> Self {
        self.push(EventGenerator::insertion_deletion(params, rate))
    }

    /// Build the configuration.
    ///
    /// # Errors
    /// `MissingRequired` for an unset horizon, array dimensions or an empty
    /// generator set, `Parameters` for the first invalid generator, and
    /// `InvalidParameter` for values that fail [`SimulationConfig::validate`].
    pub fn build(self) -> Result<SimulationConfig, BuilderError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let end_time = self.end_time.ok_or(BuilderError::MissingRequired("end_time"))?;
        let array_length = self
            .array_length
            .ok_or(BuilderError::MissingRequired("array_length (via array_dimensions)"))?;
        let repeat_length = self
            .repeat_length
            .ok_or(BuilderError::MissingRequired("repeat_length (via array_dimensions)"))?;

        let config = SimulationConfig {
            base_seed: self.base_seed,
            end_time,
            array_length,
            repeat_length,
            num_runs: self.num_runs.unwrap_or(1),
            placeholder: self.placeholder.unwrap_or(Nucleotide::N),
            generators: self.generators,
            min_line_length: self.min_line_length.unwrap_or(3),
            max_gap_length: self.max_gap_length.unwrap_or(5),
            meta: self.meta,
        };
        config.validate()?;
        Ok(config)
    }
}
