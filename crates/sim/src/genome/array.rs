use crate::base::{Nucleotide, Repeat};
use crate::errors::ArrayError;
use crate::evolution::{
    CrisprEvent, DeletionAction, EventAction, InsertionAction, InsertionDeletionAction,
    MutationAction,
};
use std::fmt;
use std::str::FromStr;

/// A CRISPR array: an ordered list of repeats, indexed from the proximal
/// (leader) end at 0 to the distal end at `len() - 1`.
///
/// Edits come in two flavours. The public `apply_*` methods check every
/// argument and report the first violated precondition as an [`ArrayError`],
/// leaving the array untouched on failure. The crate-private `*_unchecked`
/// methods skip those checks and are only called by the simulation engine
/// with actions a generator has just sampled against this same array.
///
/// # Examples
///
/// ```rust
/// # use crisprmut_sim::genome::CrisprArray;
/// # use crisprmut_sim::base::Nucleotide;
/// let mut array = CrisprArray::from_strs(&["AAAA", "CCCC", "GGGG"]).unwrap();
/// array.apply_insertion(0, 0).unwrap();
/// assert_eq!(array.len(), 4);
/// array.apply_deletion(1, Some(2), 1).unwrap();
/// assert_eq!(array.to_string(), "[AAAA, AACC, GGGG]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CrisprArray {
    repeats: Vec<Repeat>,
}

impl CrisprArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial array of `array_length` repeats, each `repeat_length` copies of
    /// `placeholder`.
    pub fn filled(array_length: usize, repeat_length: usize, placeholder: Nucleotide) -> Self {
        let template = Repeat::uniform(placeholder, repeat_length);
        Self {
            repeats: vec![template; array_length],
        }
    }

    pub fn from_repeats(repeats: Vec<Repeat>) -> Self {
        Self { repeats }
    }

    /// Parse every repeat from text, failing on the first invalid symbol.
    pub fn from_strs<S: AsRef<str>>(repeats: &[S]) -> Result<Self, ArrayError> {
        let repeats = repeats
            .iter()
            .map(|s| Repeat::from_str(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { repeats })
    }

    /// Parse a JSON list of repeat strings.
    pub fn from_json(json: &str) -> Result<Self, ArrayError> {
        let raw: Vec<String> = serde_json::from_str(json)?;
        Self::from_strs(&raw)
    }

    /// Serialize as a JSON list of repeat strings.
    pub fn to_json(&self) -> Result<String, ArrayError> {
        Ok(serde_json::to_string(&self.to_strings())?)
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.repeats.iter().map(Repeat::to_string).collect()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.repeats.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.repeats.is_empty()
    }

    /// Length of the first repeat, 0 for an empty array.
    #[inline]
    pub fn repeat_length(&self) -> usize {
        self.repeats.first().map_or(0, Repeat::len)
    }

    /// Total number of bases over all repeats.
    pub fn total_bases(&self) -> usize {
        self.repeats.iter().map(Repeat::len).sum()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Repeat> {
        self.repeats.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Repeat> {
        self.repeats.iter()
    }

    pub fn repeats(&self) -> &[Repeat] {
        &self.repeats
    }

    pub fn contains(&self, repeat: &Repeat) -> bool {
        self.repeats.contains(repeat)
    }

    pub fn push(&mut self, repeat: Repeat) {
        self.repeats.push(repeat);
    }

    /// Insert a repeat before `index`; `index == len` appends.
    pub fn insert(&mut self, index: usize, repeat: Repeat) -> Result<(), ArrayError> {
        if index > self.len() {
            return Err(self.out_of_bounds("insertion", index, self.len() + 1));
        }
        self.repeats.insert(index, repeat);
        Ok(())
    }

    /// Remove repeats `[lo, hi)`.
    pub fn remove_range(&mut self, lo: usize, hi: usize) -> Result<(), ArrayError> {
        if hi > self.len() {
            return Err(self.out_of_bounds("repeat", hi, self.len() + 1));
        }
        if lo > hi {
            return Err(self.out_of_bounds("repeat", lo, hi + 1));
        }
        self.repeats.drain(lo..hi);
        Ok(())
    }

    /// Check that every repeat has the length of the first one.
    pub fn check_uniform(&self) -> Result<(), ArrayError> {
        let expected = self.repeat_length();
        match self.repeats.iter().position(|r| r.len() != expected) {
            Some(index) => Err(ArrayError::RaggedArray {
                index,
                found: self.repeats[index].len(),
                expected,
            }),
            None => Ok(()),
        }
    }

    fn out_of_bounds(&self, what: &'static str, index: usize, len: usize) -> ArrayError {
        ArrayError::IndexOutOfBounds { what, index, len }
    }

    // ------------------------------------------------------------------
    // Validated edits
    // ------------------------------------------------------------------

    /// Overwrite one base.
    pub fn apply_mutation(
        &mut self,
        repeat_index: usize,
        base_index: usize,
        new_base: Nucleotide,
    ) -> Result<(), ArrayError> {
        let len = self.len();
        let repeat = self
            .repeats
            .get_mut(repeat_index)
            .ok_or(ArrayError::IndexOutOfBounds {
                what: "repeat",
                index: repeat_index,
                len,
            })?;
        if base_index >= repeat.len() {
            return Err(ArrayError::IndexOutOfBounds {
                what: "base",
                index: base_index,
                len: repeat.len(),
            });
        }
        repeat.set_unchecked(base_index, new_base);
        Ok(())
    }

    /// Insert a copy of the repeat at `copy_index` at `insertion_index`,
    /// shifting everything at or after `insertion_index` one slot distal-ward.
    pub fn apply_insertion(
        &mut self,
        copy_index: usize,
        insertion_index: usize,
    ) -> Result<(), ArrayError> {
        if insertion_index > self.len() {
            return Err(self.out_of_bounds("insertion", insertion_index, self.len() + 1));
        }
        if copy_index >= self.len() {
            return Err(self.out_of_bounds("copy", copy_index, self.len()));
        }
        self.insertion_unchecked(copy_index, insertion_index);
        Ok(())
    }

    /// Delete `block_length` repeats starting at `repeat_index`.
    ///
    /// With `split_index` set, the repeat at `repeat_index` is replaced by
    /// `self[repeat_index][..split] + self[repeat_index + block_length][split..]`
    /// and the `block_length` repeats after it are removed, so the array
    /// shrinks by `block_length` in both modes.
    pub fn apply_deletion(
        &mut self,
        repeat_index: usize,
        split_index: Option<usize>,
        block_length: usize,
    ) -> Result<(), ArrayError> {
        self.check_deletion(repeat_index, split_index, block_length)?;
        self.deletion_unchecked(repeat_index, split_index, block_length);
        Ok(())
    }

    fn check_deletion(
        &self,
        repeat_index: usize,
        split_index: Option<usize>,
        block_length: usize,
    ) -> Result<(), ArrayError> {
        let len = self.len();
        if len == 0 {
            return Err(ArrayError::EmptyArray);
        }
        if repeat_index >= len {
            return Err(self.out_of_bounds("repeat", repeat_index, len));
        }
        if block_length < 1 {
            return Err(ArrayError::InvalidBlockLength(block_length));
        }
        match split_index {
            None => {
                if repeat_index + block_length > len {
                    return Err(ArrayError::BlockExceedsBounds {
                        repeat_index,
                        block_length,
                        len,
                    });
                }
            }
            Some(split) => {
                let repeat_len = self.repeats[repeat_index].len();
                if split > repeat_len {
                    return Err(self.out_of_bounds("split", split, repeat_len + 1));
                }
                let target = repeat_index + block_length;
                if target > len - 1 {
                    return Err(ArrayError::SplitTargetOutOfBounds { target, len });
                }
            }
        }
        Ok(())
    }

    /// Insert, then delete a single repeat. The deletion index refers to the
    /// array before the insertion and is shifted by one when it lies at or
    /// after `insertion_index`. On error the array is left as it was.
    pub fn apply_insertion_deletion(
        &mut self,
        copy_index: usize,
        insertion_index: usize,
        deletion_repeat_index: usize,
        deletion_split_index: Option<usize>,
    ) -> Result<(), ArrayError> {
        self.apply_insertion(copy_index, insertion_index)?;

        let action = InsertionDeletionAction {
            copy_index,
            insertion_index,
            deletion_repeat_index,
            deletion_split_index,
        };
        let shifted = action.shifted_deletion_index();
        if let Err(e) = self.check_deletion(shifted, deletion_split_index, 1) {
            self.repeats.remove(insertion_index);
            return Err(e);
        }
        self.deletion_unchecked(shifted, deletion_split_index, 1);
        Ok(())
    }

    /// Validated dispatch of one event to the matching edit.
    pub fn apply_event(&mut self, event: &CrisprEvent) -> Result<(), ArrayError> {
        match event.action {
            EventAction::Mutation(MutationAction {
                repeat_index,
                base_index,
                new_base,
            }) => self.apply_mutation(repeat_index, base_index, new_base),
            EventAction::Insertion(InsertionAction {
                copy_index,
                insertion_index,
            }) => self.apply_insertion(copy_index, insertion_index),
            EventAction::Deletion(DeletionAction {
                repeat_index,
                split_index,
                block_deletion_length,
            }) => self.apply_deletion(repeat_index, split_index, block_deletion_length),
            EventAction::InsertionDeletion(a) => self.apply_insertion_deletion(
                a.copy_index,
                a.insertion_index,
                a.deletion_repeat_index,
                a.deletion_split_index,
            ),
        }
    }

    /// Apply events in order, stopping at the first error.
    pub fn apply_events<'a, I>(&mut self, events: I) -> Result<(), ArrayError>
    where
        I: IntoIterator<Item = &'a CrisprEvent>,
    {
        events.into_iter().try_for_each(|e| self.apply_event(e))
    }

    // ------------------------------------------------------------------
    // Unchecked edits, engine only
    // ------------------------------------------------------------------

    pub(crate) fn apply_event_unchecked(&mut self, event: &CrisprEvent) {
        match event.action {
            EventAction::Mutation(a) => {
                self.repeats[a.repeat_index].set_unchecked(a.base_index, a.new_base)
            }
            EventAction::Insertion(a) => self.insertion_unchecked(a.copy_index, a.insertion_index),
            EventAction::Deletion(a) => {
                self.deletion_unchecked(a.repeat_index, a.split_index, a.block_deletion_length)
            }
            EventAction::InsertionDeletion(a) => {
                self.insertion_unchecked(a.copy_index, a.insertion_index);
                self.deletion_unchecked(a.shifted_deletion_index(), a.deletion_split_index, 1);
            }
        }
    }

    #[inline]
    fn insertion_unchecked(&mut self, copy_index: usize, insertion_index: usize) {
        let copy = self.repeats[copy_index].clone();
        self.repeats.insert(insertion_index, copy);
    }

    #[inline]
    fn deletion_unchecked(
        &mut self,
        repeat_index: usize,
        split_index: Option<usize>,
        block_length: usize,
    ) {
        match split_index {
            None => {
                self.repeats.drain(repeat_index..repeat_index + block_length);
            }
            Some(split) => {
                let spliced =
                    self.repeats[repeat_index].splice_at(&self.repeats[repeat_index + block_length], split);
                self.repeats[repeat_index] = spliced;
                self.repeats
                    .drain(repeat_index + 1..=repeat_index + block_length);
            }
        }
    }
}

impl fmt::Display for CrisprArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, repeat) in self.repeats.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{repeat}")?;
        }
        write!(f, "]")
    }
}

impl std::ops::Index<usize> for CrisprArray {
    type Output = Repeat;

    fn index(&self, index: usize) -> &Repeat {
        &self.repeats[index]
    }
}

impl<'a> IntoIterator for &'a CrisprArray {
    type Item = &'a Repeat;
    type IntoIter = std::slice::Iter<'a, Repeat>;

    fn into_iter(self) -> Self::IntoIter {
        self.repeats.iter()
    }
}

impl FromIterator<Repeat> for CrisprArray {
    fn from_iter<I: IntoIterator<Item = Repeat>>(iter: I) -> Self {
        Self {
            repeats: iter.into_iter().collect(),
        }
    }
}

impl<S: AsRef<str>> PartialEq<[S]> for CrisprArray {
    fn eq(&self, other: &[S]) -> bool {
        self.len() == other.len()
            && self
                .repeats
                .iter()
                .zip(other)
                .all(|(r, s)| *r == *s.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SequenceError;

    fn arr(repeats: &[&str]) -> CrisprArray {
        CrisprArray::from_strs(repeats).unwrap()
    }

    #[test]
    fn test_filled() {
        let a = CrisprArray::filled(3, 4, Nucleotide::N);
        assert_eq!(a.len(), 3);
        assert_eq!(a.repeat_length(), 4);
        assert!(a == ["NNNN", "NNNN", "NNNN"][..]);
    }

    #[test]
    fn test_from_strs_invalid() {
        assert_eq!(
            CrisprArray::from_strs(&["ACGT", "ACXT"]),
            Err(ArrayError::Sequence(SequenceError::InvalidSymbol('X')))
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let a = arr(&["ACGT", "TGCA"]);
        let json = a.to_json().unwrap();
        assert_eq!(json, r#"["ACGT","TGCA"]"#);
        assert_eq!(CrisprArray::from_json(&json).unwrap(), a);
        assert!(CrisprArray::from_json("not json").is_err());
    }

    #[test]
    fn test_contains_and_index() {
        let a = arr(&["ACGT", "TGCA"]);
        assert!(a.contains(&Repeat::from_str("tgca").unwrap()));
        assert!(!a.contains(&Repeat::from_str("A").unwrap()));
        assert_eq!(a[1].to_string(), "TGCA");
        assert!(a.get(2).is_none());
    }

    #[test]
    fn test_insert_and_remove_range() {
        let mut a = arr(&["AAAA", "CCCC"]);
        a.insert(1, Repeat::from_str("GGGG").unwrap()).unwrap();
        assert!(a == ["AAAA", "GGGG", "CCCC"][..]);
        a.remove_range(0, 2).unwrap();
        assert!(a == ["CCCC"][..]);
        assert!(a.remove_range(0, 2).is_err());
        assert!(a.insert(3, Repeat::new()).is_err());
    }

    #[test]
    fn test_check_uniform() {
        assert!(arr(&["AAAA", "CCCC"]).check_uniform().is_ok());
        assert_eq!(
            arr(&["AAAA", "CCC"]).check_uniform(),
            Err(ArrayError::RaggedArray {
                index: 1,
                found: 3,
                expected: 4
            })
        );
    }

    #[test]
    fn test_apply_mutation() {
        let mut a = arr(&["AAAA", "CCCC"]);
        a.apply_mutation(1, 2, Nucleotide::T).unwrap();
        assert!(a == ["AAAA", "CCTC"][..]);

        assert!(matches!(
            a.apply_mutation(2, 0, Nucleotide::T),
            Err(ArrayError::IndexOutOfBounds { what: "repeat", .. })
        ));
        assert!(matches!(
            a.apply_mutation(0, 4, Nucleotide::T),
            Err(ArrayError::IndexOutOfBounds { what: "base", .. })
        ));
    }

    #[test]
    fn test_apply_insertion() {
        let mut a = arr(&["AAAA", "CCCC", "GGGG"]);
        // Proximal: copy sits at the insertion point
        a.apply_insertion(0, 0).unwrap();
        assert!(a == ["AAAA", "AAAA", "CCCC", "GGGG"][..]);

        // Distal: copy of the last repeat appended
        a.apply_insertion(3, 4).unwrap();
        assert!(a == ["AAAA", "AAAA", "CCCC", "GGGG", "GGGG"][..]);

        assert!(matches!(
            a.apply_insertion(0, 6),
            Err(ArrayError::IndexOutOfBounds { what: "insertion", .. })
        ));
        assert!(matches!(
            a.apply_insertion(5, 0),
            Err(ArrayError::IndexOutOfBounds { what: "copy", .. })
        ));
    }

    #[test]
    fn test_apply_block_deletion() {
        let mut a = arr(&["AAAA", "CCCC", "GGGG", "TTTT"]);
        a.apply_deletion(1, None, 2).unwrap();
        assert!(a == ["AAAA", "TTTT"][..]);

        assert_eq!(
            a.apply_deletion(1, None, 2),
            Err(ArrayError::BlockExceedsBounds {
                repeat_index: 1,
                block_length: 2,
                len: 2
            })
        );
        assert_eq!(a.apply_deletion(0, None, 0), Err(ArrayError::InvalidBlockLength(0)));
        assert!(matches!(
            a.apply_deletion(2, None, 1),
            Err(ArrayError::IndexOutOfBounds { what: "repeat", .. })
        ));
    }

    #[test]
    fn test_apply_deletion_empty() {
        let mut a = CrisprArray::new();
        assert_eq!(a.apply_deletion(0, None, 1), Err(ArrayError::EmptyArray));
    }

    #[test]
    fn test_apply_split_deletion() {
        let mut a = arr(&["AAAAAA", "CCCCCC", "GGGGGG", "TTTTTT"]);
        a.apply_deletion(0, Some(2), 2).unwrap();
        assert!(a == ["AAGGGG", "TTTTTT"][..]);
        assert_eq!(a.repeat_length(), 6);
        assert!(a.check_uniform().is_ok());
    }

    #[test]
    fn test_split_deletion_boundaries() {
        let mut a = arr(&["AAAA", "CCCC", "GGGG"]);
        // Split at the full length keeps the whole left repeat
        a.apply_deletion(1, Some(4), 1).unwrap();
        assert!(a == ["AAAA", "CCCC"][..]);

        // Cannot target the last repeat
        assert_eq!(
            a.apply_deletion(1, Some(1), 1),
            Err(ArrayError::SplitTargetOutOfBounds { target: 2, len: 2 })
        );
        assert!(matches!(
            a.apply_deletion(0, Some(5), 1),
            Err(ArrayError::IndexOutOfBounds { what: "split", .. })
        ));
    }

    #[test]
    fn test_split_deletion_length_change() {
        let mut a = CrisprArray::filled(10, 5, Nucleotide::A);
        a.apply_deletion(2, Some(3), 3).unwrap();
        assert_eq!(a.len(), 7);
    }

    #[test]
    fn test_apply_insertion_deletion_shift() {
        // Deletion at or after the insertion point is shifted by one
        let mut a = arr(&["AAAA", "CCCC", "GGGG", "TTTT"]);
        a.apply_insertion_deletion(0, 0, 2, None).unwrap();
        assert!(a == ["AAAA", "AAAA", "CCCC", "TTTT"][..]);

        // Deletion before the insertion point is not shifted
        let mut b = arr(&["AAAA", "CCCC", "GGGG", "TTTT"]);
        b.apply_insertion_deletion(3, 4, 1, None).unwrap();
        assert!(b == ["AAAA", "GGGG", "TTTT", "TTTT"][..]);
    }

    #[test]
    fn test_apply_insertion_deletion_split() {
        let mut a = arr(&["AAAA", "CCCC", "GGGG"]);
        a.apply_insertion_deletion(0, 0, 1, Some(2)).unwrap();
        assert!(a == ["AAAA", "AAAA", "CCGG"][..]);
    }

    #[test]
    fn test_apply_insertion_deletion_rolls_back() {
        let mut a = arr(&["AAAA", "CCCC"]);
        let before = a.clone();
        // Shifted split target runs past the end
        assert!(a.apply_insertion_deletion(0, 0, 1, Some(1)).is_err());
        assert_eq!(a, before);
    }

    #[test]
    fn test_apply_events_dispatch() {
        let mut a = CrisprArray::filled(3, 4, Nucleotide::N);
        let events = vec![
            CrisprEvent::mutation(0.1, 0, 0, Nucleotide::G),
            CrisprEvent::insertion(0.2, 0, 0),
            CrisprEvent::deletion(0.3, 3, None, 1),
            CrisprEvent::insertion_deletion(0.4, 1, 1, 2, None),
        ];
        a.apply_events(&events).unwrap();
        assert!(a == ["GNNN", "GNNN", "GNNN"][..]);
    }

    #[test]
    fn test_unchecked_matches_validated() {
        let events = vec![
            CrisprEvent::mutation(0.1, 1, 2, Nucleotide::C),
            CrisprEvent::insertion(0.2, 3, 4),
            CrisprEvent::deletion(0.3, 0, Some(1), 2),
            CrisprEvent::insertion_deletion(0.4, 0, 0, 1, Some(3)),
        ];
        let mut checked = arr(&["AAAA", "CCCC", "GGGG", "TTTT"]);
        let mut unchecked = checked.clone();
        checked.apply_events(&events).unwrap();
        for e in &events {
            unchecked.apply_event_unchecked(e);
        }
        assert_eq!(checked, unchecked);
    }

    #[test]
    fn test_display() {
        assert_eq!(arr(&["AC", "GT"]).to_string(), "[AC, GT]");
        assert_eq!(CrisprArray::new().to_string(), "[]");
    }
}
