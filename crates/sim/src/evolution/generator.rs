//! The closed set of event generators driven by the engine.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::deletion::{DeletionGenerator, DeletionParameters};
use super::events::{CrisprEvent, EventKind};
use super::insertion::{InsertionGenerator, InsertionParameters};
use super::insertion_deletion::{InsertionDeletionGenerator, InsertionDeletionParameters};
use super::mutation::{MutationGenerator, MutationParameters};
use super::rate::Rate;
use crate::errors::{ParameterError, SimulationError};
use crate::genome::CrisprArray;

/// One of the four generator kinds.
///
/// Generators hold only their validated parameters and rate, so a single
/// instance can be shared by reference across any number of trajectories.
///
/// In configuration files a generator is written as
/// `{"kind": "Deletion", "parameters": {...}, "rate": {"per_repeat": 0.01}}`
/// and is validated while it is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeneratorConfig", into = "GeneratorConfig")]
pub enum EventGenerator {
    Mutation(MutationGenerator),
    Insertion(InsertionGenerator),
    Deletion(DeletionGenerator),
    InsertionDeletion(InsertionDeletionGenerator),
}

impl EventGenerator {
    pub fn mutation(params: MutationParameters, rate: impl Into<Rate>) -> Result<Self, ParameterError> {
        MutationGenerator::new(params, rate.into()).map(Self::Mutation)
    }

    pub fn insertion(
        params: InsertionParameters,
        rate: impl Into<Rate>,
    ) -> Result<Self, ParameterError> {
        InsertionGenerator::new(params, rate.into()).map(Self::Insertion)
    }

    pub fn deletion(params: DeletionParameters, rate: impl Into<Rate>) -> Result<Self, ParameterError> {
        DeletionGenerator::new(params, rate.into()).map(Self::Deletion)
    }

    pub fn insertion_deletion(
        params: InsertionDeletionParameters,
        rate: impl Into<Rate>,
    ) -> Result<Self, ParameterError> {
        InsertionDeletionGenerator::new(params, rate.into()).map(Self::InsertionDeletion)
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::Mutation(_) => EventKind::Mutation,
            Self::Insertion(_) => EventKind::Insertion,
            Self::Deletion(_) => EventKind::Deletion,
            Self::InsertionDeletion(_) => EventKind::InsertionDeletion,
        }
    }

    /// Type name used in generator summaries, e.g. `"DeletionGenerator"`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mutation(_) => MutationGenerator::NAME,
            Self::Insertion(_) => InsertionGenerator::NAME,
            Self::Deletion(_) => DeletionGenerator::NAME,
            Self::InsertionDeletion(_) => InsertionDeletionGenerator::NAME,
        }
    }

    pub fn rate_spec(&self) -> &Rate {
        match self {
            Self::Mutation(g) => g.rate_spec(),
            Self::Insertion(g) => g.rate_spec(),
            Self::Deletion(g) => g.rate_spec(),
            Self::InsertionDeletion(g) => g.rate_spec(),
        }
    }

    /// Instantaneous rate; zero when the generator cannot fire on `array`.
    #[inline]
    pub fn rate(&self, current_time: f64, array: &CrisprArray) -> f64 {
        match self {
            Self::Mutation(g) => g.rate(current_time, array),
            Self::Insertion(g) => g.rate(current_time, array),
            Self::Deletion(g) => g.rate(current_time, array),
            Self::InsertionDeletion(g) => g.rate(current_time, array),
        }
    }

    /// Sample a concrete event. Only meaningful after `rate` returned a
    /// positive value for the same array.
    #[inline]
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        current_time: f64,
        array: &CrisprArray,
    ) -> Result<CrisprEvent, SimulationError> {
        match self {
            Self::Mutation(g) => g.generate(rng, current_time, array),
            Self::Insertion(g) => g.generate(rng, current_time, array),
            Self::Deletion(g) => g.generate(rng, current_time, array),
            Self::InsertionDeletion(g) => g.generate(rng, current_time, array),
        }
    }

    /// The raw parameters as JSON.
    pub fn parameters_json(&self) -> Value {
        let value = match self {
            Self::Mutation(g) => serde_json::to_value(g.parameters()),
            Self::Insertion(g) => serde_json::to_value(g.parameters()),
            Self::Deletion(g) => serde_json::to_value(g.parameters()),
            Self::InsertionDeletion(g) => serde_json::to_value(g.parameters()),
        };
        // Parameter structs hold only numbers, booleans and unit enums.
        value.unwrap_or(Value::Null)
    }

    /// `{type, parameters, rate}` summary of this generator.
    pub fn summary_json(&self) -> Value {
        serde_json::json!({
            "type": self.name(),
            "parameters": self.parameters_json(),
            "rate": self.rate_spec().to_json_value(),
        })
    }
}

/// Summaries of a generator set, in order.
pub fn generators_to_json(generators: &[EventGenerator]) -> Value {
    Value::Array(generators.iter().map(EventGenerator::summary_json).collect())
}

/// Wire form of an [`EventGenerator`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub kind: EventKind,
    #[serde(default)]
    pub parameters: Value,
    pub rate: Rate,
}

fn parse_params<T: serde::de::DeserializeOwned>(
    generator: &'static str,
    parameters: Value,
) -> Result<T, ParameterError> {
    let parameters = match parameters {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(parameters).map_err(|e| ParameterError::invalid(generator, e.to_string()))
}

impl TryFrom<GeneratorConfig> for EventGenerator {
    type Error = ParameterError;

    fn try_from(config: GeneratorConfig) -> Result<Self, Self::Error> {
        let GeneratorConfig {
            kind,
            parameters,
            rate,
        } = config;
        match kind {
            EventKind::Mutation => {
                Self::mutation(parse_params(MutationGenerator::NAME, parameters)?, rate)
            }
            EventKind::Insertion => {
                Self::insertion(parse_params(InsertionGenerator::NAME, parameters)?, rate)
            }
            EventKind::Deletion => {
                Self::deletion(parse_params(DeletionGenerator::NAME, parameters)?, rate)
            }
            EventKind::InsertionDeletion => Self::insertion_deletion(
                parse_params(InsertionDeletionGenerator::NAME, parameters)?,
                rate,
            ),
        }
    }
}

impl From<EventGenerator> for GeneratorConfig {
    fn from(generator: EventGenerator) -> Self {
        Self {
            kind: generator.kind(),
            parameters: generator.parameters_json(),
            rate: generator.rate_spec().clone(),
        }
    }
}
