//! Errors raised while extracting or restoring array statistics.

use crisprmut_sim::errors::{ArrayError, BuilderError, SequenceError, SimulationError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// The array is not a valid input, e.g. its repeats differ in length.
    #[error(transparent)]
    Array(#[from] ArrayError),

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Config(#[from] BuilderError),

    /// A pattern code outside `1..=6`.
    #[error("Invalid pattern code {0}")]
    InvalidPattern(u8),

    /// A text column of a flat record could not be decoded.
    #[error("Invalid record field '{field}': {reason}")]
    Record { field: &'static str, reason: String },
}
