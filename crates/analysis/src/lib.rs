//! # CRISPR array statistics
//!
//! `crisprmut_analysis` summarises arrays produced by `crisprmut_sim`: the
//! consensus repeat, mutation diffs and mismatch patterns, plus a driver for
//! a single seeded run that ends in those statistics.

pub mod analysis;
pub mod errors;

pub use analysis::{
    all_stats, consensus, reconstruct_array, run_single, ArrayStats, ArrayStatsRecord,
    CrisprArrayRecord, Pattern,
};
pub use errors::StatsError;
