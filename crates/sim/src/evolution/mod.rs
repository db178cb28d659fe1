//! Events and the generators that sample them.
//!
//! This module implements the four edit processes acting on a CRISPR array:
//! - **Mutation**: single-base substitutions
//! - **Insertion**: duplication of a repeat next to its template
//! - **Deletion**: block and split deletions of whole repeats
//! - **InsertionDeletion**: a duplication and a deletion in one event
//!
//! Each generator reports a state-dependent rate and, when chosen by the
//! engine, samples a concrete [`CrisprEvent`].

pub mod deletion;
pub mod events;
pub mod generator;
pub mod insertion;
pub mod insertion_deletion;
pub mod mutation;
pub mod rate;
pub mod sampling;

pub use deletion::{DeletionGenerator, DeletionParameters};
pub use events::{
    events_to_columns, CrisprEvent, DeletionAction, EventAction, EventColumns, EventKind,
    InsertionAction, InsertionDeletionAction, MutationAction,
};
pub use generator::{generators_to_json, EventGenerator, GeneratorConfig};
pub use insertion::{Anchor, InsertionGenerator, InsertionParameters, Randomize};
pub use insertion_deletion::{InsertionDeletionGenerator, InsertionDeletionParameters};
pub use mutation::{MutationGenerator, MutationParameters};
pub use rate::{Rate, RateFn};
pub use sampling::geometric_mean_alpha;
