//! Error types shared across the simulation crate.
//!
//! Validation errors are raised by the checked APIs at the point where a
//! precondition is violated and are never corrected silently.

use thiserror::Error;

/// Errors raised when constructing or editing a [`Repeat`](crate::base::Repeat).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// A character is not one of the 15 IUPAC nucleotide symbols.
    #[error("Invalid symbol in sequence: '{0}'")]
    InvalidSymbol(char),

    /// An index is outside the valid range of the sequence.
    #[error("Index {index} out of bounds (len = {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A range has its lower bound above its upper bound.
    #[error("Invalid range [{lo}, {hi}) for sequence of length {len}")]
    InvalidRange { lo: usize, hi: usize, len: usize },
}

/// Errors raised by the validated mutation API of
/// [`CrisprArray`](crate::genome::CrisprArray).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayError {
    /// A repeat, base or insertion index is outside its legal range.
    #[error("{what} index {index} out of bounds (len = {len})")]
    IndexOutOfBounds {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// A deletion was requested on an array without repeats.
    #[error("Cannot delete from an empty array")]
    EmptyArray,

    /// Block deletions must remove at least one repeat.
    #[error("Block deletion length must be at least 1, got {0}")]
    InvalidBlockLength(usize),

    /// `repeat_index + block_length` runs past the end of the array.
    #[error("Block deletion of {block_length} repeats at {repeat_index} exceeds array length {len}")]
    BlockExceedsBounds {
        repeat_index: usize,
        block_length: usize,
        len: usize,
    },

    /// A split deletion needs one repeat beyond the deleted block to splice against.
    #[error("Split deletion target {target} out of bounds (len = {len})")]
    SplitTargetOutOfBounds { target: usize, len: usize },

    /// The array's repeats do not all share one length.
    #[error("Repeat {index} has length {found}, expected {expected}")]
    RaggedArray {
        index: usize,
        found: usize,
        expected: usize,
    },

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error("Array JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for ArrayError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

/// Raised when an event generator is configured with invalid parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("Invalid parameters for {generator}: {reason}")]
    InvalidParameters {
        generator: &'static str,
        reason: String,
    },
}

impl ParameterError {
    pub(crate) fn invalid(generator: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            generator,
            reason: reason.into(),
        }
    }
}

/// Errors that abort a single simulation trajectory.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// The trajectory was started without any event generator.
    #[error("No event generators provided for simulation")]
    NoGenerators,

    /// The horizon must be strictly positive.
    #[error("End time must be greater than 0, got {0}")]
    NonPositiveHorizon(f64),

    /// A rate specification produced a negative or non-finite rate.
    #[error("Generator {generator} reported invalid rate {rate}")]
    InvalidRate { generator: &'static str, rate: f64 },

    /// A generator was asked to sample from an empty index range.
    #[error("Generator {generator} has no eligible {what} in an array of {array_length} repeats")]
    NoEligibleTarget {
        generator: &'static str,
        what: &'static str,
        array_length: usize,
    },

    #[error(transparent)]
    Array(#[from] ArrayError),

    #[error(transparent)]
    Parameters(#[from] ParameterError),
}

/// Errors that can occur while building a simulation configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuilderError {
    /// A required parameter is missing
    #[error("Missing required parameter: {0}")]
    MissingRequired(&'static str),

    /// An invalid parameter value was provided
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Parameters(#[from] ParameterError),
}
