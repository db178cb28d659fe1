//! Repeat deletions.
//!
//! Deletions remove one or more whole repeats, optionally splicing the
//! surviving halves of the two repeats that border the gap (a split
//! deletion). Repeats within `leader_offset` of the proximal end and
//! `distal_offset` of the distal end are protected, and the last repeat can
//! never be the first one removed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::events::CrisprEvent;
use super::rate::Rate;
use super::sampling::{geometric_mean_alpha, uniform_inclusive};
use crate::errors::{ParameterError, SimulationError};
use crate::genome::CrisprArray;

/// Parameters of [`DeletionGenerator`].
///
/// Offsets are signed so that configuration files can use `-1` to disable
/// splitting; they are validated when the generator is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeletionParameters {
    /// Repeats at the proximal end protected from deletion.
    pub leader_offset: i64,
    /// Repeats at the distal end protected from deletion.
    pub distal_offset: i64,
    /// Smallest base index a split may cut at; `-1` disables splitting.
    pub split_offset: i64,
    /// Mean of the geometric block length distribution, at least 1.
    pub mean_block_deletion_length: f64,
}

impl Default for DeletionParameters {
    fn default() -> Self {
        Self {
            leader_offset: 0,
            distal_offset: 0,
            split_offset: -1,
            mean_block_deletion_length: 1.0,
        }
    }
}

/// Validated offsets shared by deletion and insertion-deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DeletionWindow {
    pub leader_offset: usize,
    pub distal_offset: usize,
    pub split_offset: Option<usize>,
}

impl DeletionWindow {
    pub fn from_raw(
        generator: &'static str,
        leader_offset: i64,
        distal_offset: i64,
        split_offset: i64,
    ) -> Result<Self, ParameterError> {
        if leader_offset < 0 {
            return Err(ParameterError::invalid(
                generator,
                format!("leader_offset must be non-negative, got {leader_offset}"),
            ));
        }
        if distal_offset < 0 {
            return Err(ParameterError::invalid(
                generator,
                format!("distal_offset must be non-negative, got {distal_offset}"),
            ));
        }
        if split_offset < -1 {
            return Err(ParameterError::invalid(
                generator,
                format!("split_offset must be >= -1, got {split_offset}"),
            ));
        }
        Ok(Self {
            leader_offset: leader_offset as usize,
            distal_offset: distal_offset as usize,
            split_offset: usize::try_from(split_offset).ok(),
        })
    }

    /// Draw the first deleted repeat from `[leader, len - distal - 2]`, then
    /// a split point from `[split_offset, repeat_len - 1]` if splitting is
    /// enabled and the repeat is long enough.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        array: &CrisprArray,
        generator: &'static str,
    ) -> Result<(usize, Option<usize>), SimulationError> {
        let len = array.len();
        let repeat_index = uniform_inclusive(
            rng,
            self.leader_offset as i64,
            len as i64 - self.distal_offset as i64 - 2,
            generator,
            "deletion target",
            len,
        )?;

        let split_index = match self.split_offset {
            Some(offset) => {
                let repeat_len = array[repeat_index].len();
                if repeat_len > 0 && offset < repeat_len {
                    Some(rng.random_range(offset..=repeat_len - 1))
                } else {
                    None
                }
            }
            None => None,
        };
        Ok((repeat_index, split_index))
    }
}

/// Samples block and split deletions.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletionGenerator {
    params: DeletionParameters,
    window: DeletionWindow,
    rate: Rate,
}

impl DeletionGenerator {
    pub const NAME: &'static str = "DeletionGenerator";

    pub fn new(params: DeletionParameters, rate: Rate) -> Result<Self, ParameterError> {
        let window = DeletionWindow::from_raw(
            Self::NAME,
            params.leader_offset,
            params.distal_offset,
            params.split_offset,
        )?;
        let mean = params.mean_block_deletion_length;
        if !mean.is_finite() || mean < 1.0 {
            return Err(ParameterError::invalid(
                Self::NAME,
                format!("mean_block_deletion_length must be finite and at least 1.0, got {mean}"),
            ));
        }
        rate.validate(Self::NAME)?;
        Ok(Self {
            params,
            window,
            rate,
        })
    }

    pub fn parameters(&self) -> &DeletionParameters {
        &self.params
    }

    pub fn rate_spec(&self) -> &Rate {
        &self.rate
    }

    /// Zero unless `len - distal_offset - 2 > leader_offset`.
    pub fn rate(&self, current_time: f64, array: &CrisprArray) -> f64 {
        let len = array.len() as i64;
        if len - self.window.distal_offset as i64 - 2 <= self.window.leader_offset as i64 {
            return 0.0;
        }
        self.rate.evaluate(current_time, array)
    }

    /// Sample a deletion. The block length is geometric with mean
    /// `mean_block_deletion_length`, clamped so the block stays clear of the
    /// protected distal repeats (and, for splits, of the splice partner).
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        current_time: f64,
        array: &CrisprArray,
    ) -> Result<CrisprEvent, SimulationError> {
        let len = array.len();
        let (repeat_index, split_index) = self.window.sample(rng, array, Self::NAME)?;

        let reserved = self.window.distal_offset + usize::from(split_index.is_some());
        let max_block = len - repeat_index - reserved;

        let block = geometric_mean_alpha(rng, self.params.mean_block_deletion_length).min(max_block);

        Ok(CrisprEvent::deletion(current_time, repeat_index, split_index, block))
    }
}
