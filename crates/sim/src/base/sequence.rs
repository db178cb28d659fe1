use super::Nucleotide;
use crate::errors::SequenceError;
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// One repeat unit of a CRISPR array: a mutable run of IUPAC symbols.
///
/// Every element is a valid [`Nucleotide`] by construction, so equality is
/// value based and case-insensitive with respect to the text the repeat was
/// parsed from. Parsing goes through [`FromStr`] or [`Repeat::from_chars`];
/// [`Repeat::from_nucleotides`] takes an already validated buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Repeat(Vec<Nucleotide>);

impl Repeat {
    /// Create a new, empty `Repeat`.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create a repeat of `len` copies of `symbol`.
    ///
    /// ```rust
    /// # use crisprmut_sim::base::{Nucleotide, Repeat};
    /// let filler = Repeat::uniform(Nucleotide::N, 4);
    /// assert_eq!(filler.to_string(), "NNNN");
    /// ```
    pub fn uniform(symbol: Nucleotide, len: usize) -> Self {
        Self(vec![symbol; len])
    }

    /// Wrap a buffer of symbols. No validation is needed since every
    /// `Nucleotide` is valid.
    pub fn from_nucleotides(nucleotides: Vec<Nucleotide>) -> Self {
        Self(nucleotides)
    }

    /// Wrap raw bytes that the caller already knows to be uppercase IUPAC
    /// symbols. Any other byte is mapped to `N`.
    pub(crate) fn from_symbols_unchecked(bytes: &[u8]) -> Self {
        Self(
            bytes
                .iter()
                .map(|&b| Nucleotide::from_ascii(b).unwrap_or(Nucleotide::N))
                .collect(),
        )
    }

    /// Validate and collect characters, failing on the first one outside the
    /// alphabet.
    pub fn from_chars<I: IntoIterator<Item = char>>(chars: I) -> Result<Self, SequenceError> {
        chars
            .into_iter()
            .map(Nucleotide::from_char)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the symbol at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<Nucleotide, SequenceError> {
        self.0.get(index).copied().ok_or(SequenceError::IndexOutOfBounds {
            index,
            len: self.len(),
        })
    }

    /// Overwrite the symbol at `index`.
    #[inline]
    pub fn set(&mut self, index: usize, symbol: Nucleotide) -> Result<(), SequenceError> {
        let len = self.len();
        self.0
            .get_mut(index)
            .map(|slot| *slot = symbol)
            .ok_or(SequenceError::IndexOutOfBounds { index, len })
    }

    /// Overwrite a symbol without a range check beyond the slice's own.
    ///
    /// Reserved for the engine's generate-then-apply path, where the index
    /// comes from a generator that just sampled it against this repeat.
    #[inline(always)]
    pub(crate) fn set_unchecked(&mut self, index: usize, symbol: Nucleotide) {
        self.0[index] = symbol;
    }

    /// Insert `symbol` before `index`; `index == len` appends.
    pub fn insert(&mut self, index: usize, symbol: Nucleotide) -> Result<(), SequenceError> {
        if index > self.len() {
            return Err(SequenceError::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }
        self.0.insert(index, symbol);
        Ok(())
    }

    /// Remove `[lo, hi)`. An empty range is a no-op.
    pub fn delete_range(&mut self, lo: usize, hi: usize) -> Result<(), SequenceError> {
        let len = self.len();
        if lo > len {
            return Err(SequenceError::IndexOutOfBounds { index: lo, len });
        }
        if hi > len {
            return Err(SequenceError::IndexOutOfBounds { index: hi, len });
        }
        if lo > hi {
            return Err(SequenceError::InvalidRange { lo, hi, len });
        }
        self.0.drain(lo..hi);
        Ok(())
    }

    /// Replace `[lo, hi)` with `replacement`, which may have a different length.
    pub fn replace_range(
        &mut self,
        lo: usize,
        hi: usize,
        replacement: &[Nucleotide],
    ) -> Result<(), SequenceError> {
        let len = self.len();
        if lo > hi || hi > len {
            return Err(SequenceError::InvalidRange { lo, hi, len });
        }
        self.0.splice(lo..hi, replacement.iter().copied());
        Ok(())
    }

    /// Splice `self[..split]` with `other[split..]`.
    ///
    /// Both halves are clamped to the respective lengths, mirroring slice
    /// semantics for a split point at or past the end.
    pub fn splice_at(&self, other: &Repeat, split: usize) -> Repeat {
        let head = &self.0[..split.min(self.len())];
        let tail = &other.0[split.min(other.len())..];
        let mut joined = Vec::with_capacity(head.len() + tail.len());
        joined.extend_from_slice(head);
        joined.extend_from_slice(tail);
        Repeat(joined)
    }

    /// Copy of `[lo, hi)`.
    pub fn slice(&self, lo: usize, hi: usize) -> Result<Repeat, SequenceError> {
        let len = self.len();
        if lo > hi || hi > len {
            return Err(SequenceError::InvalidRange { lo, hi, len });
        }
        Ok(Repeat(self.0[lo..hi].to_vec()))
    }

    /// Validated concatenation with raw text.
    pub fn concat_str(&self, rhs: &str) -> Result<Repeat, SequenceError> {
        let tail = Repeat::from_str(rhs)?;
        Ok(self + &tail)
    }

    /// True if `needle` occurs as a contiguous run.
    pub fn contains_subsequence(&self, needle: &Repeat) -> bool {
        needle.is_empty() || self.0.windows(needle.len()).any(|w| w == needle.as_slice())
    }

    #[inline]
    pub fn as_slice(&self) -> &[Nucleotide] {
        &self.0
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Nucleotide> {
        self.0.iter()
    }

    pub fn push(&mut self, symbol: Nucleotide) {
        self.0.push(symbol);
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &nuc in &self.0 {
            write!(f, "{}", nuc.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for Repeat {
    type Err = SequenceError;

    /// Parse text such as `"acgtN"`; case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_chars(s.chars())
    }
}

impl PartialEq<str> for Repeat {
    fn eq(&self, other: &str) -> bool {
        self.len() == other.len()
            && self
                .0
                .iter()
                .zip(other.bytes())
                .all(|(n, b)| n.to_ascii() == b.to_ascii_uppercase())
    }
}

impl PartialEq<&str> for Repeat {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Add<&Repeat> for &Repeat {
    type Output = Repeat;

    fn add(self, rhs: &Repeat) -> Repeat {
        let mut joined = Vec::with_capacity(self.len() + rhs.len());
        joined.extend_from_slice(&self.0);
        joined.extend_from_slice(&rhs.0);
        Repeat(joined)
    }
}

impl AddAssign<&Repeat> for Repeat {
    fn add_assign(&mut self, rhs: &Repeat) {
        self.0.extend_from_slice(&rhs.0);
    }
}

impl<'a> IntoIterator for &'a Repeat {
    type Item = &'a Nucleotide;
    type IntoIter = std::slice::Iter<'a, Nucleotide>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Nucleotide> for Repeat {
    fn from_iter<I: IntoIterator<Item = Nucleotide>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rep(s: &str) -> Repeat {
        Repeat::from_str(s).unwrap()
    }

    #[test]
    fn test_repeat_from_str_valid() {
        let r = rep("ACGTN");
        assert_eq!(r.len(), 5);
        assert_eq!(r.to_string(), "ACGTN");
    }

    #[test]
    fn test_repeat_from_str_lowercase() {
        assert_eq!(rep("acgt").to_string(), "ACGT");
        assert_eq!(rep("acgt"), rep("ACGT"));
    }

    #[test]
    fn test_repeat_from_str_invalid() {
        assert_eq!(Repeat::from_str("ACXT"), Err(SequenceError::InvalidSymbol('X')));
        assert_eq!(Repeat::from_str("AC T"), Err(SequenceError::InvalidSymbol(' ')));
    }

    #[test]
    fn test_repeat_from_str_empty() {
        assert!(rep("").is_empty());
    }

    #[test]
    fn test_repeat_get_and_set() {
        let mut r = rep("ACGT");
        assert_eq!(r.get(2), Ok(Nucleotide::G));
        r.set(1, Nucleotide::T).unwrap();
        assert_eq!(r.to_string(), "ATGT");

        assert_eq!(
            r.get(4),
            Err(SequenceError::IndexOutOfBounds { index: 4, len: 4 })
        );
        assert_eq!(
            r.set(10, Nucleotide::A),
            Err(SequenceError::IndexOutOfBounds { index: 10, len: 4 })
        );
    }

    #[test]
    fn test_repeat_insert_bounds() {
        let mut r = rep("ACT");
        r.insert(2, Nucleotide::G).unwrap();
        assert_eq!(r.to_string(), "ACGT");
        r.insert(4, Nucleotide::N).unwrap();
        assert_eq!(r.to_string(), "ACGTN");
        assert!(r.insert(6, Nucleotide::A).is_err());
    }

    #[test]
    fn test_repeat_delete_range() {
        let mut r = rep("ACGTAC");
        r.delete_range(1, 3).unwrap();
        assert_eq!(r.to_string(), "ATAC");

        // Empty range is a no-op
        r.delete_range(2, 2).unwrap();
        assert_eq!(r.to_string(), "ATAC");

        assert!(r.delete_range(3, 2).is_err());
        assert!(r.delete_range(0, 5).is_err());
        assert!(r.delete_range(5, 5).is_err());
    }

    #[test]
    fn test_repeat_replace_range() {
        let mut r = rep("AAAA");
        r.replace_range(1, 3, rep("CGT").as_slice()).unwrap();
        assert_eq!(r.to_string(), "ACGTA");
        assert!(r.replace_range(4, 9, &[]).is_err());
    }

    #[test]
    fn test_repeat_splice_at() {
        let a = rep("AAAAAA");
        let b = rep("CCCCCC");
        assert_eq!(a.splice_at(&b, 2).to_string(), "AACCCC");
        assert_eq!(a.splice_at(&b, 0).to_string(), "CCCCCC");
        assert_eq!(a.splice_at(&b, 6).to_string(), "AAAAAA");
    }

    #[test]
    fn test_repeat_concat() {
        let a = rep("AC");
        let b = rep("gt");
        assert_eq!((&a + &b).to_string(), "ACGT");

        let mut c = a.clone();
        c += &b;
        assert_eq!(c, rep("ACGT"));

        assert_eq!(a.concat_str("nn").unwrap().to_string(), "ACNN");
        assert_eq!(a.concat_str("X"), Err(SequenceError::InvalidSymbol('X')));
    }

    #[test]
    fn test_repeat_equality_with_text() {
        let r = rep("ACGT");
        assert!(r == "acgt");
        assert!(r == "ACGT");
        assert!(r != "ACG");
        assert!(r != "ACGA");
    }

    #[test]
    fn test_repeat_contains_subsequence() {
        let r = rep("ACGTTG");
        assert!(r.contains_subsequence(&rep("GTT")));
        assert!(r.contains_subsequence(&rep("")));
        assert!(!r.contains_subsequence(&rep("TGA")));
    }

    #[test]
    fn test_repeat_slice() {
        let r = rep("ACGTAC");
        assert_eq!(r.slice(1, 4).unwrap().to_string(), "CGT");
        assert!(r.slice(0, 0).unwrap().is_empty());
        assert!(r.slice(4, 2).is_err());
        assert!(r.slice(0, 7).is_err());
    }

    #[test]
    fn test_repeat_from_symbols_unchecked() {
        assert_eq!(Repeat::from_symbols_unchecked(b"ACGN").to_string(), "ACGN");
    }

    #[test]
    fn test_repeat_set_unchecked() {
        let mut r = Repeat::uniform(Nucleotide::N, 3);
        r.set_unchecked(2, Nucleotide::C);
        assert_eq!(r.to_string(), "NNC");
    }

    #[test]
    fn test_repeat_error_display() {
        let msg = format!("{}", SequenceError::InvalidSymbol('X'));
        assert!(msg.contains("Invalid symbol"));
        assert!(msg.contains('X'));

        let msg = format!("{}", SequenceError::IndexOutOfBounds { index: 10, len: 5 });
        assert!(msg.contains("10"));
        assert!(msg.contains("out of bounds"));
    }
}
