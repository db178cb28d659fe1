//! Point mutations.
//!
//! A mutation overwrites a single base somewhere in the array with one of the
//! four DNA bases. The target repeat and the base within it are both chosen
//! uniformly, so every position in the array is equally likely to be hit.
//! Unless `allow_same_base` is set the current symbol is excluded from the
//! candidates, which makes every mutation observable.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::events::CrisprEvent;
use super::rate::Rate;
use super::sampling::uniform_inclusive;
use crate::base::Nucleotide;
use crate::errors::{ParameterError, SimulationError};
use crate::genome::CrisprArray;

/// Parameters of [`MutationGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MutationParameters {
    /// Allow the new base to equal the current one.
    pub allow_same_base: bool,
}

/// Samples point substitutions.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationGenerator {
    params: MutationParameters,
    rate: Rate,
}

impl MutationGenerator {
    pub const NAME: &'static str = "MutationGenerator";

    pub fn new(params: MutationParameters, rate: Rate) -> Result<Self, ParameterError> {
        rate.validate(Self::NAME)?;
        Ok(Self { params, rate })
    }

    pub fn parameters(&self) -> &MutationParameters {
        &self.params
    }

    pub fn rate_spec(&self) -> &Rate {
        &self.rate
    }

    /// Zero when the array holds no bases.
    pub fn rate(&self, current_time: f64, array: &CrisprArray) -> f64 {
        if array.is_empty() || array.repeat_length() == 0 {
            return 0.0;
        }
        self.rate.evaluate(current_time, array)
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        current_time: f64,
        array: &CrisprArray,
    ) -> Result<CrisprEvent, SimulationError> {
        let len = array.len();
        let repeat_index =
            uniform_inclusive(rng, 0, len as i64 - 1, Self::NAME, "repeat", len)?;
        let repeat = &array[repeat_index];
        let base_index =
            uniform_inclusive(rng, 0, repeat.len() as i64 - 1, Self::NAME, "base", len)?;
        let current = repeat.as_slice()[base_index];

        let mut choices = [Nucleotide::A; 4];
        let mut n = 0;
        for base in Nucleotide::DNA {
            if self.params.allow_same_base || base != current {
                choices[n] = base;
                n += 1;
            }
        }
        let new_base = choices[rng.random_range(0..n)];

        Ok(CrisprEvent::mutation(current_time, repeat_index, base_index, new_base))
    }
}
