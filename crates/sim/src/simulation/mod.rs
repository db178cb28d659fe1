//! Simulation engine and batch configuration.
//!
//! - `Trajectory`: one continuous-time run of the event race over an array.
//! - `SimulationConfig`: a reproducible description of a batch of runs.
//! - `SimulationBuilder`: fluent builder for `SimulationConfig` with
//!   defaults and validation.

pub mod builder;
pub mod configs;
pub mod engine;

pub use builder::SimulationBuilder;
pub use configs::SimulationConfig;
pub use engine::{Trajectory, TrajectoryState};
