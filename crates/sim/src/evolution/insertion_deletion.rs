//! Combined insertion and deletion.
//!
//! One event duplicates a repeat and removes another, leaving the array
//! length unchanged. Both halves are sampled against the same array state;
//! the deletion index is shifted past the insertion only when the event is
//! applied.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::deletion::DeletionWindow;
use super::events::CrisprEvent;
use super::insertion::{check_lambda_factor, exponential_distance, Anchor, Randomize};
use super::rate::Rate;
use super::sampling::uniform_inclusive;
use crate::errors::{ParameterError, SimulationError};
use crate::genome::CrisprArray;

/// Parameters of [`InsertionDeletionGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InsertionDeletionParameters {
    pub insertion_anchor: Anchor,
    pub insertion_randomize: Randomize,
    pub insertion_exp_lambda_factor: f64,
    pub leader_offset: i64,
    pub distal_offset: i64,
    pub split_offset: i64,
}

impl Default for InsertionDeletionParameters {
    fn default() -> Self {
        Self {
            insertion_anchor: Anchor::Proximal,
            insertion_randomize: Randomize::None,
            insertion_exp_lambda_factor: 0.1,
            leader_offset: 0,
            distal_offset: 0,
            split_offset: -1,
        }
    }
}

/// Samples insertion-deletion pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertionDeletionGenerator {
    params: InsertionDeletionParameters,
    window: DeletionWindow,
    rate: Rate,
}

impl InsertionDeletionGenerator {
    pub const NAME: &'static str = "InsertionDeletionGenerator";

    pub fn new(params: InsertionDeletionParameters, rate: Rate) -> Result<Self, ParameterError> {
        let window = DeletionWindow::from_raw(
            Self::NAME,
            params.leader_offset,
            params.distal_offset,
            params.split_offset,
        )?;
        check_lambda_factor(Self::NAME, params.insertion_exp_lambda_factor)?;
        rate.validate(Self::NAME)?;
        Ok(Self {
            params,
            window,
            rate,
        })
    }

    pub fn parameters(&self) -> &InsertionDeletionParameters {
        &self.params
    }

    pub fn rate_spec(&self) -> &Rate {
        &self.rate
    }

    /// Zero when `leader_offset + distal_offset >= len`.
    pub fn rate(&self, current_time: f64, array: &CrisprArray) -> f64 {
        if self.window.leader_offset + self.window.distal_offset >= array.len() {
            return 0.0;
        }
        self.rate.evaluate(current_time, array)
    }

    /// Sample the insertion like [`InsertionGenerator`](super::InsertionGenerator),
    /// except that distal insertions never land at index 0 (uniform draws
    /// start at 1 and the exponential floor is 1). The deletion side is drawn
    /// like [`DeletionGenerator`](super::DeletionGenerator) with a block
    /// length of one.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        current_time: f64,
        array: &CrisprArray,
    ) -> Result<CrisprEvent, SimulationError> {
        let len = array.len();
        if len == 0 {
            return Err(SimulationError::NoEligibleTarget {
                generator: Self::NAME,
                what: "template repeat",
                array_length: 0,
            });
        }
        let p = &self.params;
        let insertion_index = match (p.insertion_randomize, p.insertion_anchor) {
            (Randomize::None, Anchor::Proximal) => 0,
            (Randomize::None, Anchor::Distal) => len,
            (Randomize::Uniform, Anchor::Proximal) => {
                uniform_inclusive(rng, 0, len as i64 - 1, Self::NAME, "insertion index", len)?
            }
            (Randomize::Uniform, Anchor::Distal) => {
                uniform_inclusive(rng, 1, len as i64, Self::NAME, "insertion index", len)?
            }
            (Randomize::Exponential, anchor) => {
                let d = exponential_distance(rng, p.insertion_exp_lambda_factor, len, Self::NAME)?;
                match anchor {
                    Anchor::Proximal => d.min(len - 1),
                    Anchor::Distal => len.saturating_sub(d).max(1),
                }
            }
        };
        let copy_index = match p.insertion_anchor {
            Anchor::Proximal => insertion_index,
            Anchor::Distal => insertion_index - 1,
        };

        let (deletion_repeat_index, deletion_split_index) =
            self.window.sample(rng, array, Self::NAME)?;

        Ok(CrisprEvent::insertion_deletion(
            current_time,
            copy_index,
            insertion_index,
            deletion_repeat_index,
            deletion_split_index,
        ))
    }
}
