//! Commonly used imports for convenience.
//!
//! ```
//! use crisprmut_sim::prelude::*;
//!
//! let array = CrisprArray::from_strs(&["ACGT", "ACGA"]).unwrap();
//! assert_eq!(array.repeat_length(), 4);
//! ```

pub use crate::base::{Nucleotide, Repeat};
pub use crate::errors::{ArrayError, BuilderError, ParameterError, SimulationError};
pub use crate::evolution::{
    Anchor, CrisprEvent, DeletionParameters, EventAction, EventGenerator, EventKind,
    InsertionDeletionParameters, InsertionParameters, MutationParameters, Randomize, Rate,
};
pub use crate::genome::CrisprArray;
pub use crate::simulation::{SimulationBuilder, SimulationConfig, Trajectory, TrajectoryState};
