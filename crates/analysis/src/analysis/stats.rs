//! Summary statistics of a finished array.
//!
//! [`all_stats`] makes a single column-major pass over the array and records
//! three mutation diffs at once: against the consensus, against the most
//! proximal repeat and against the most distal repeat. Consensus mismatch
//! lines found on the way are classified into [`Pattern`]s.

use crisprmut_sim::base::Repeat;
use crisprmut_sim::evolution::MutationAction;
use crisprmut_sim::genome::CrisprArray;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::str::FromStr;

use super::consensus::consensus;
use super::patterns::{classify_column, MismatchLine, Pattern};
use crate::errors::StatsError;

/// Statistics of one array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayStats {
    pub consensus_repeat: String,
    pub array_length: usize,
    pub repeat_length: usize,
    pub mutation_count_consensus: usize,
    pub mutation_count_proximal: usize,
    pub mutation_count_distal: usize,
    pub mutation_diff_consensus: Vec<MutationAction>,
    pub mutation_diff_proximal: Vec<MutationAction>,
    pub mutation_diff_distal: Vec<MutationAction>,
    pub patterns: BTreeSet<Pattern>,
}

impl ArrayStats {
    /// Statistics of an array without repeats.
    pub fn empty() -> Self {
        Self {
            consensus_repeat: String::new(),
            array_length: 0,
            repeat_length: 0,
            mutation_count_consensus: 0,
            mutation_count_proximal: 0,
            mutation_count_distal: 0,
            mutation_diff_consensus: Vec::new(),
            mutation_diff_proximal: Vec::new(),
            mutation_diff_distal: Vec::new(),
            patterns: BTreeSet::new(),
        }
    }

    /// Flatten into a record whose diff lists and pattern set are JSON text.
    pub fn to_record(&self) -> Result<ArrayStatsRecord, StatsError> {
        fn text<T: Serialize>(field: &'static str, value: &T) -> Result<String, StatsError> {
            serde_json::to_string(value).map_err(|e| StatsError::Record {
                field,
                reason: e.to_string(),
            })
        }

        Ok(ArrayStatsRecord {
            consensus_repeat: self.consensus_repeat.clone(),
            array_length: self.array_length,
            repeat_length: self.repeat_length,
            mutation_count_consensus: self.mutation_count_consensus,
            mutation_count_proximal: self.mutation_count_proximal,
            mutation_count_distal: self.mutation_count_distal,
            mutation_diff_consensus: text("mutation_diff_consensus", &self.mutation_diff_consensus)?,
            mutation_diff_proximal: text("mutation_diff_proximal", &self.mutation_diff_proximal)?,
            mutation_diff_distal: text("mutation_diff_distal", &self.mutation_diff_distal)?,
            patterns: text("patterns", &self.patterns)?,
        })
    }

    /// Rebuild statistics from a flat record.
    pub fn from_record(record: &ArrayStatsRecord) -> Result<Self, StatsError> {
        fn parse<T: serde::de::DeserializeOwned>(
            field: &'static str,
            text: &str,
        ) -> Result<T, StatsError> {
            serde_json::from_str(text).map_err(|e| StatsError::Record {
                field,
                reason: e.to_string(),
            })
        }

        Ok(Self {
            consensus_repeat: record.consensus_repeat.clone(),
            array_length: record.array_length,
            repeat_length: record.repeat_length,
            mutation_count_consensus: record.mutation_count_consensus,
            mutation_count_proximal: record.mutation_count_proximal,
            mutation_count_distal: record.mutation_count_distal,
            mutation_diff_consensus: parse("mutation_diff_consensus", &record.mutation_diff_consensus)?,
            mutation_diff_proximal: parse("mutation_diff_proximal", &record.mutation_diff_proximal)?,
            mutation_diff_distal: parse("mutation_diff_distal", &record.mutation_diff_distal)?,
            patterns: parse("patterns", &record.patterns)?,
        })
    }
}

impl Default for ArrayStats {
    fn default() -> Self {
        Self::empty()
    }
}

/// Flat form of [`ArrayStats`]: scalars stay scalars, the diff lists and the
/// pattern set become JSON text. Patterns are written sorted, e.g. `"[1,4]"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayStatsRecord {
    pub consensus_repeat: String,
    pub array_length: usize,
    pub repeat_length: usize,
    pub mutation_count_consensus: usize,
    pub mutation_count_proximal: usize,
    pub mutation_count_distal: usize,
    pub mutation_diff_consensus: String,
    pub mutation_diff_proximal: String,
    pub mutation_diff_distal: String,
    pub patterns: String,
}

/// Compute all statistics of `array` in one pass.
///
/// `rng` breaks consensus ties. An empty array yields [`ArrayStats::empty`].
///
/// # Errors
/// `StatsError::Array` if the repeats are not all the same length.
pub fn all_stats<R: Rng + ?Sized>(
    array: &CrisprArray,
    rng: &mut R,
    min_line_length: usize,
    max_gap_length: usize,
) -> Result<ArrayStats, StatsError> {
    if array.is_empty() {
        return Ok(ArrayStats::empty());
    }
    let consensus = consensus(array, rng)?;
    let array_length = array.len();
    let repeat_length = array.repeat_length();

    let mut stats = ArrayStats {
        consensus_repeat: consensus.to_string(),
        array_length,
        repeat_length,
        ..ArrayStats::empty()
    };

    let repeats = array.repeats();
    let first = repeats[0].as_slice();
    let last = repeats[array_length - 1].as_slice();
    let mut lines: Vec<MismatchLine> = Vec::new();

    for (j, &expected) in consensus.iter().enumerate() {
        lines.clear();
        let mut line_start: Option<usize> = None;

        for (i, repeat) in repeats.iter().enumerate() {
            let symbol = repeat.as_slice()[j];
            let diff = MutationAction {
                repeat_index: i,
                base_index: j,
                new_base: symbol,
            };

            if symbol != expected {
                stats.mutation_diff_consensus.push(diff);
                if line_start.is_none() {
                    line_start = Some(i);
                }
            } else if let Some(start) = line_start.take() {
                lines.push(MismatchLine::new(start, i - start));
            }
            if symbol != first[j] {
                stats.mutation_diff_proximal.push(diff);
            }
            if symbol != last[j] {
                stats.mutation_diff_distal.push(diff);
            }
        }
        if let Some(start) = line_start {
            lines.push(MismatchLine::new(start, array_length - start));
        }

        stats.patterns.extend(classify_column(
            &lines,
            j,
            repeat_length,
            array_length,
            min_line_length,
            max_gap_length,
        ));
    }

    stats.mutation_count_consensus = stats.mutation_diff_consensus.len();
    stats.mutation_count_proximal = stats.mutation_diff_proximal.len();
    stats.mutation_count_distal = stats.mutation_diff_distal.len();
    Ok(stats)
}

/// Rebuild an array from its statistics: `array_length` copies of the
/// consensus with the consensus diffs applied.
///
/// Only consensus-relative information survives, so this is the exact
/// inverse of [`all_stats`] for any array whose consensus had no ties.
pub fn reconstruct_array(stats: &ArrayStats) -> Result<CrisprArray, StatsError> {
    let consensus = Repeat::from_str(&stats.consensus_repeat)?;
    let mut array = CrisprArray::from_repeats(vec![consensus; stats.array_length]);
    for diff in &stats.mutation_diff_consensus {
        array.apply_mutation(diff.repeat_index, diff.base_index, diff.new_base)?;
    }
    Ok(array)
}

/// One named array together with its statistics; the row shape of a
/// results dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisprArrayRecord {
    pub id: String,
    #[serde(default)]
    pub cas_type: String,
    pub stats: ArrayStats,
}

impl CrisprArrayRecord {
    pub fn new(id: impl Into<String>, cas_type: impl Into<String>, stats: ArrayStats) -> Self {
        Self {
            id: id.into(),
            cas_type: cas_type.into(),
            stats,
        }
    }

    /// Compute the statistics of `array` with default pattern thresholds.
    pub fn from_array<R: Rng + ?Sized>(
        id: impl Into<String>,
        cas_type: impl Into<String>,
        array: &CrisprArray,
        rng: &mut R,
    ) -> Result<Self, StatsError> {
        let stats = all_stats(array, rng, 3, 5)?;
        Ok(Self::new(id, cas_type, stats))
    }

    pub fn to_array(&self) -> Result<CrisprArray, StatsError> {
        reconstruct_array(&self.stats)
    }

    /// `id` and `cas_type` merged with the flat stats record into one map.
    pub fn as_flat(&self) -> Result<Map<String, Value>, StatsError> {
        let record = self.stats.to_record()?;
        let mut flat = match serde_json::to_value(record) {
            Ok(Value::Object(map)) => map,
            Ok(_) => Map::new(),
            Err(e) => {
                return Err(StatsError::Record {
                    field: "stats",
                    reason: e.to_string(),
                })
            }
        };
        flat.insert("id".into(), Value::String(self.id.clone()));
        flat.insert("cas_type".into(), Value::String(self.cas_type.clone()));
        Ok(flat)
    }
}
