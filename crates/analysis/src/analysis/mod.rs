//! Statistics of finished CRISPR arrays
//!
//! This module provides:
//! - Consensus repeats with reproducible tie-breaking
//! - Mutation diffs against the consensus and both array ends
//! - Classification of consensus mismatches into six patterns
//! - Flat records for persistence and array reconstruction

pub mod consensus;
pub mod patterns;
pub mod run;
pub mod stats;

pub use consensus::consensus;
pub use patterns::{MismatchLine, Pattern};
pub use run::run_single;
pub use stats::{all_stats, reconstruct_array, ArrayStats, ArrayStatsRecord, CrisprArrayRecord};
