//! # CRISPR array mutation simulator
//!
//! `crisprmut_sim` models a CRISPR array as an ordered list of equal-length
//! repeats and evolves it in continuous time. Four kinds of event act on the
//! array: point mutations, repeat duplications, block or split deletions,
//! and combined insertion-deletions. Each kind is produced by an
//! [`EventGenerator`](evolution::EventGenerator) with a state-dependent
//! rate, and a [`Trajectory`](simulation::Trajectory) races those rates to
//! pick the next event.

pub mod base;
pub mod errors;
pub mod evolution;
pub mod genome;
pub mod prelude;
pub mod simulation;

pub use base::{Nucleotide, Repeat};
pub use genome::CrisprArray;
