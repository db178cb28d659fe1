//! Event records produced by the generators and consumed by the array.
//!
//! An event is an immutable `{time, action}` pair. The action is a closed sum
//! over the four kinds of edit, each with its own payload. Split indices are
//! `Option<usize>` in Rust and `-1` on the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::base::Nucleotide;
use crate::errors::ArrayError;

/// Stable names of the four event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Mutation,
    Insertion,
    Deletion,
    InsertionDeletion,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        Self::Mutation,
        Self::Insertion,
        Self::Deletion,
        Self::InsertionDeletion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Mutation => "Mutation",
            Self::Insertion => "Insertion",
            Self::Deletion => "Deletion",
            Self::InsertionDeletion => "InsertionDeletion",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for EventKind {
    type Err = ArrayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| ArrayError::Json(format!("unknown event kind '{s}'")))
    }
}

/// Serde adapter for split indices: `None` <-> `-1`. Any negative value
/// read back disables the split.
pub(crate) mod split_sentinel {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<usize>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(i) => s.serialize_i64(*i as i64),
            None => s.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
        let raw = i64::deserialize(d)?;
        Ok(usize::try_from(raw).ok())
    }
}

fn one() -> usize {
    1
}

/// Overwrite one base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationAction {
    pub repeat_index: usize,
    pub base_index: usize,
    pub new_base: Nucleotide,
}

/// Insert a copy of the repeat at `copy_index` at `insertion_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertionAction {
    pub copy_index: usize,
    pub insertion_index: usize,
}

/// Remove `block_deletion_length` repeats starting at `repeat_index`,
/// optionally splicing across the gap at `split_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionAction {
    pub repeat_index: usize,
    #[serde(with = "split_sentinel", default)]
    pub split_index: Option<usize>,
    #[serde(default = "one")]
    pub block_deletion_length: usize,
}

impl DeletionAction {
    /// Single-repeat block deletion.
    pub fn single(repeat_index: usize) -> Self {
        Self {
            repeat_index,
            split_index: None,
            block_deletion_length: 1,
        }
    }
}

/// An insertion followed by a single-repeat deletion. `deletion_repeat_index`
/// refers to the array before the insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertionDeletionAction {
    pub copy_index: usize,
    pub insertion_index: usize,
    pub deletion_repeat_index: usize,
    #[serde(with = "split_sentinel", default)]
    pub deletion_split_index: Option<usize>,
}

impl InsertionDeletionAction {
    /// Deletion target after the insertion has shifted the array.
    #[inline]
    pub fn shifted_deletion_index(&self) -> usize {
        if self.deletion_repeat_index >= self.insertion_index {
            self.deletion_repeat_index + 1
        } else {
            self.deletion_repeat_index
        }
    }
}

/// The kind-specific payload of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    Mutation(MutationAction),
    Insertion(InsertionAction),
    Deletion(DeletionAction),
    InsertionDeletion(InsertionDeletionAction),
}

impl EventAction {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Mutation(_) => EventKind::Mutation,
            Self::Insertion(_) => EventKind::Insertion,
            Self::Deletion(_) => EventKind::Deletion,
            Self::InsertionDeletion(_) => EventKind::InsertionDeletion,
        }
    }

    /// The payload as a JSON object with the wire field names.
    pub fn to_json_value(&self) -> Result<Value, ArrayError> {
        let value = match self {
            Self::Mutation(a) => serde_json::to_value(a)?,
            Self::Insertion(a) => serde_json::to_value(a)?,
            Self::Deletion(a) => serde_json::to_value(a)?,
            Self::InsertionDeletion(a) => serde_json::to_value(a)?,
        };
        Ok(value)
    }

    /// Decode a payload given its kind.
    pub fn from_json_value(kind: EventKind, value: Value) -> Result<Self, ArrayError> {
        let action = match kind {
            EventKind::Mutation => Self::Mutation(serde_json::from_value(value)?),
            EventKind::Insertion => Self::Insertion(serde_json::from_value(value)?),
            EventKind::Deletion => Self::Deletion(serde_json::from_value(value)?),
            EventKind::InsertionDeletion => {
                Self::InsertionDeletion(serde_json::from_value(value)?)
            }
        };
        Ok(action)
    }
}

fn fmt_split(split: Option<usize>) -> i64 {
    split.map_or(-1, |s| s as i64)
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mutation(a) => write!(
                f,
                "repeat_index={}, base_index={}, new_base={}",
                a.repeat_index, a.base_index, a.new_base
            ),
            Self::Insertion(a) => write!(
                f,
                "copy_index={}, insertion_index={}",
                a.copy_index, a.insertion_index
            ),
            Self::Deletion(a) => write!(
                f,
                "repeat_index={}, split_index={}, block_deletion_length={}",
                a.repeat_index,
                fmt_split(a.split_index),
                a.block_deletion_length
            ),
            Self::InsertionDeletion(a) => write!(
                f,
                "copy_index={}, insertion_index={}, deletion_repeat_index={}, deletion_split_index={}",
                a.copy_index,
                a.insertion_index,
                a.deletion_repeat_index,
                fmt_split(a.deletion_split_index)
            ),
        }
    }
}

/// A timestamped edit of a [`CrisprArray`](crate::genome::CrisprArray).
///
/// Serialized as `{"kind": ..., "time": ..., "actions": {...}}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EventRow", into = "EventRow")]
pub struct CrisprEvent {
    pub time: f64,
    pub action: EventAction,
}

#[derive(Serialize, Deserialize)]
struct EventRow {
    kind: EventKind,
    time: f64,
    actions: Value,
}

impl TryFrom<EventRow> for CrisprEvent {
    type Error = ArrayError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Self {
            time: row.time,
            action: EventAction::from_json_value(row.kind, row.actions)?,
        })
    }
}

impl From<CrisprEvent> for EventRow {
    fn from(event: CrisprEvent) -> Self {
        Self {
            kind: event.kind(),
            time: event.time,
            // Payloads are plain structs of integers and one symbol.
            actions: event.action.to_json_value().unwrap_or(Value::Null),
        }
    }
}

impl CrisprEvent {
    pub fn new(time: f64, action: EventAction) -> Self {
        Self { time, action }
    }

    pub fn mutation(time: f64, repeat_index: usize, base_index: usize, new_base: Nucleotide) -> Self {
        Self::new(
            time,
            EventAction::Mutation(MutationAction {
                repeat_index,
                base_index,
                new_base,
            }),
        )
    }

    pub fn insertion(time: f64, copy_index: usize, insertion_index: usize) -> Self {
        Self::new(
            time,
            EventAction::Insertion(InsertionAction {
                copy_index,
                insertion_index,
            }),
        )
    }

    pub fn deletion(
        time: f64,
        repeat_index: usize,
        split_index: Option<usize>,
        block_deletion_length: usize,
    ) -> Self {
        Self::new(
            time,
            EventAction::Deletion(DeletionAction {
                repeat_index,
                split_index,
                block_deletion_length,
            }),
        )
    }

    pub fn insertion_deletion(
        time: f64,
        copy_index: usize,
        insertion_index: usize,
        deletion_repeat_index: usize,
        deletion_split_index: Option<usize>,
    ) -> Self {
        Self::new(
            time,
            EventAction::InsertionDeletion(InsertionDeletionAction {
                copy_index,
                insertion_index,
                deletion_repeat_index,
                deletion_split_index,
            }),
        )
    }

    #[inline]
    pub fn kind(&self) -> EventKind {
        self.action.kind()
    }

    /// `(kind, time, actions_json)` as stored by persistence layers.
    pub fn to_row(&self) -> Result<(String, f64, String), ArrayError> {
        let actions = serde_json::to_string(&self.action.to_json_value()?)?;
        Ok((self.kind().name().to_string(), self.time, actions))
    }

    /// Inverse of [`CrisprEvent::to_row`].
    pub fn from_row(kind: &str, time: f64, actions: &str) -> Result<Self, ArrayError> {
        let kind: EventKind = kind.parse()?;
        let value: Value = serde_json::from_str(actions)?;
        Ok(Self::new(time, EventAction::from_json_value(kind, value)?))
    }
}

impl fmt::Display for CrisprEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}({})", self.time, self.kind(), self.action)
    }
}

/// Column-oriented view of an event list, one entry per event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventColumns {
    pub index: Vec<usize>,
    pub event_id: Vec<String>,
    pub time: Vec<f64>,
    pub actions: Vec<Value>,
}

/// Transpose events into [`EventColumns`].
pub fn events_to_columns(events: &[CrisprEvent]) -> Result<EventColumns, ArrayError> {
    let mut columns = EventColumns {
        index: (0..events.len()).collect(),
        event_id: Vec::with_capacity(events.len()),
        time: Vec::with_capacity(events.len()),
        actions: Vec::with_capacity(events.len()),
    };
    for event in events {
        columns.event_id.push(event.kind().name().to_string());
        columns.time.push(event.time);
        columns.actions.push(event.action.to_json_value()?);
    }
    Ok(columns)
}
