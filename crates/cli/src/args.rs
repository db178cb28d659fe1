use clap::Args;
use std::path::PathBuf;

use crate::defaults;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Output configuration path
    #[arg(short, long, default_value = defaults::OUTPUT_CONFIG)]
    pub output: PathBuf,

    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,

    /// Simulated time of every run
    #[arg(short = 'T', long, default_value_t = defaults::END_TIME)]
    pub end_time: f64,

    /// Number of repeats in the initial array
    #[arg(short = 'l', long, default_value_t = defaults::ARRAY_LENGTH)]
    pub array_length: usize,

    /// Length of every repeat
    #[arg(short = 'r', long, default_value_t = defaults::REPEAT_LENGTH)]
    pub repeat_length: usize,

    /// Number of independent runs
    #[arg(short = 'n', long, default_value_t = defaults::NUM_RUNS)]
    pub num_runs: usize,

    /// Seed of the first run; run i uses seed + i
    #[arg(short, long, default_value_t = defaults::BASE_SEED)]
    pub seed: u64,

    /// Point mutation rate per base (0 disables)
    #[arg(long, default_value_t = defaults::MUTATION_RATE)]
    pub mutation_rate: f64,

    /// Insertion rate, constant over the array (0 disables)
    #[arg(long, default_value_t = defaults::INSERTION_RATE)]
    pub insertion_rate: f64,

    /// Insert next to the distal copy instead of the proximal one
    #[arg(long)]
    pub distal_insertion: bool,

    /// Deletion rate per repeat (0 disables)
    #[arg(long, default_value_t = defaults::DELETION_RATE)]
    pub deletion_rate: f64,

    /// Mean length of a deleted block, in repeats (>= 1)
    #[arg(long, default_value_t = defaults::MEAN_BLOCK_DELETION_LENGTH)]
    pub mean_block_deletion_length: f64,

    /// Insertion-deletion rate per repeat (0 disables)
    #[arg(long, default_value_t = defaults::INDEL_RATE)]
    pub indel_rate: f64,

    /// Repeats at the leader end that are never deleted
    #[arg(long, default_value_t = defaults::LEADER_OFFSET)]
    pub leader_offset: i64,

    /// Repeats at the distal end that are never deleted
    #[arg(long, default_value_t = 0)]
    pub distal_offset: i64,

    /// First split point of split deletions (-1 disables splitting)
    #[arg(long, default_value_t = defaults::SPLIT_OFFSET, allow_hyphen_values = true)]
    pub split_offset: i64,

    /// Minimum mismatch line length counted as a pattern
    #[arg(long, default_value_t = defaults::MIN_LINE_LENGTH)]
    pub min_line_length: usize,

    /// Largest gap joining mismatch lines into one group
    #[arg(long, default_value_t = defaults::MAX_GAP_LENGTH)]
    pub max_gap_length: usize,

    /// Free-form description stored with the configuration
    #[arg(long, default_value = "")]
    pub meta: String,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Configuration file written by `init`
    #[arg(short, long, default_value = defaults::OUTPUT_CONFIG)]
    pub config: PathBuf,

    /// Results file, one JSON line per run
    #[arg(short, long, default_value = defaults::OUTPUT_RESULTS)]
    pub output: PathBuf,

    /// Overwrite existing results
    #[arg(long)]
    pub force: bool,

    /// Override the configured base seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the configured number of runs
    #[arg(short = 'n', long)]
    pub num_runs: Option<usize>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Array JSON: a list of repeat strings
    #[arg(short, long)]
    pub input: PathBuf,

    /// Seed for consensus tie-breaking
    #[arg(short, long, default_value_t = defaults::BASE_SEED)]
    pub seed: u64,

    #[arg(long, default_value_t = defaults::MIN_LINE_LENGTH)]
    pub min_line_length: usize,

    #[arg(long, default_value_t = defaults::MAX_GAP_LENGTH)]
    pub max_gap_length: usize,

    /// Print the flat record (diffs and patterns as JSON text)
    #[arg(long, conflicts_with = "summary")]
    pub flat: bool,

    /// Print a human-readable summary instead of JSON
    #[arg(long)]
    pub summary: bool,

    /// Identifier used with --flat
    #[arg(long, default_value = "0")]
    pub id: String,
}
