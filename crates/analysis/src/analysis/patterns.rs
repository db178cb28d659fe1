//! Geometric classification of consensus mismatches.
//!
//! Within one column, a *mismatch line* is a maximal run of consecutive
//! repeats whose symbol differs from the consensus. Lines separated by at
//! most `max_gap_length` matching repeats form a group, and every group is
//! classified independently:
//!
//! | group                                   | pattern                          |
//! |-----------------------------------------|----------------------------------|
//! | one line, `len >= min`, touching an end | [`Pattern::AnchoredLine`]        |
//! | one line, `len >= min`, interior        | [`Pattern::FloatingLine`]        |
//! | two lines, at least one `len >= min`    | [`Pattern::SplitLine`]           |
//! | three or more lines, first column       | [`Pattern::DottedProximal`]      |
//! | three or more lines, last column        | [`Pattern::DottedDistal`]        |
//! | three or more lines, other columns      | [`Pattern::Dotted`]              |
//!
//! Groups matching no row contribute nothing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::StatsError;

/// The six mismatch patterns, serialised as their integer codes `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Pattern {
    AnchoredLine = 1,
    FloatingLine = 2,
    SplitLine = 3,
    Dotted = 4,
    DottedProximal = 5,
    DottedDistal = 6,
}

impl Pattern {
    pub const ALL: [Pattern; 6] = [
        Self::AnchoredLine,
        Self::FloatingLine,
        Self::SplitLine,
        Self::Dotted,
        Self::DottedProximal,
        Self::DottedDistal,
    ];

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::AnchoredLine => "anchored line",
            Self::FloatingLine => "floating line",
            Self::SplitLine => "split line",
            Self::Dotted => "dotted",
            Self::DottedProximal => "dotted at proximal",
            Self::DottedDistal => "dotted at distal",
        }
    }
}

impl TryFrom<u8> for Pattern {
    type Error = StatsError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get((code as usize).wrapping_sub(1))
            .copied()
            .ok_or(StatsError::InvalidPattern(code))
    }
}

impl From<Pattern> for u8 {
    fn from(pattern: Pattern) -> u8 {
        pattern.code()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.name())
    }
}

/// A run of `length` consecutive mismatching repeats starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MismatchLine {
    pub start: usize,
    pub length: usize,
}

impl MismatchLine {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Index of the last repeat in the line.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.length - 1
    }
}

/// Split lines (ordered by start) into groups; a new group begins wherever
/// the gap to the previous line exceeds `max_gap_length`.
pub fn group_lines(lines: &[MismatchLine], max_gap_length: usize) -> Vec<Vec<MismatchLine>> {
    let mut groups: Vec<Vec<MismatchLine>> = Vec::new();
    for &line in lines {
        match groups.last_mut() {
            Some(group) => {
                let prev = group[group.len() - 1];
                let gap = line.start - (prev.start + prev.length);
                if gap <= max_gap_length {
                    group.push(line);
                } else {
                    groups.push(vec![line]);
                }
            }
            None => groups.push(vec![line]),
        }
    }
    groups
}

/// Classify one group of lines found in `column`.
pub fn classify_group(
    group: &[MismatchLine],
    column: usize,
    repeat_length: usize,
    array_length: usize,
    min_line_length: usize,
) -> Option<Pattern> {
    match group {
        [] => None,
        [line] => {
            if line.length < min_line_length {
                None
            } else if line.start == 0 || line.end() == array_length - 1 {
                Some(Pattern::AnchoredLine)
            } else {
                Some(Pattern::FloatingLine)
            }
        }
        [a, b] => (a.length >= min_line_length || b.length >= min_line_length)
            .then_some(Pattern::SplitLine),
        _ => Some(if column == 0 {
            Pattern::DottedProximal
        } else if column + 1 == repeat_length {
            Pattern::DottedDistal
        } else {
            Pattern::Dotted
        }),
    }
}

/// Patterns present in one column, given its mismatch lines.
pub fn classify_column(
    lines: &[MismatchLine],
    column: usize,
    repeat_length: usize,
    array_length: usize,
    min_line_length: usize,
    max_gap_length: usize,
) -> impl Iterator<Item = Pattern> {
    group_lines(lines, max_gap_length)
        .into_iter()
        .filter_map(move |group| {
            classify_group(&group, column, repeat_length, array_length, min_line_length)
        })
}
