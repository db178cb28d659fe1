//! Shared default values for simulation configuration.
//! These values are used by the `init` command (via clap) and by `run`/`stats`.

pub const OUTPUT_CONFIG: &str = "simulation.json";
pub const OUTPUT_RESULTS: &str = "results.jsonl";

pub const END_TIME: f64 = 100.0;
pub const ARRAY_LENGTH: usize = 20;
pub const REPEAT_LENGTH: usize = 36;
pub const NUM_RUNS: usize = 100;
pub const BASE_SEED: u64 = 0;

// Generators
pub const MUTATION_RATE: f64 = 1e-4; // per base
pub const INSERTION_RATE: f64 = 0.05; // constant
pub const DELETION_RATE: f64 = 5e-3; // per repeat
pub const INDEL_RATE: f64 = 0.0; // per repeat, disabled
pub const MEAN_BLOCK_DELETION_LENGTH: f64 = 1.5;
pub const LEADER_OFFSET: i64 = 1;
pub const SPLIT_OFFSET: i64 = -1;

// Pattern classification
pub const MIN_LINE_LENGTH: usize = 3;
pub const MAX_GAP_LENGTH: usize = 5;
