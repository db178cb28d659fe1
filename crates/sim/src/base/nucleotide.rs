use core::fmt;

use serde::{Deserialize, Serialize};
use crate::errors::SequenceError;

/// One IUPAC nucleotide symbol.
///
/// `Nucleotide` covers the four DNA bases plus the eleven ambiguity codes and
/// is backed by a single byte. The discriminants follow the order of
/// [`Nucleotide::IUPAC`] (`ACGTRYSWKMBDHVN`), which is also the order in which
/// tied symbols are listed when a consensus is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Nucleotide {
    A = 0,
    C = 1,
    G = 2,
    T = 3,
    /// A or G
    R = 4,
    /// C or T
    Y = 5,
    /// G or C
    S = 6,
    /// A or T
    W = 7,
    /// G or T
    K = 8,
    /// A or C
    M = 9,
    /// not A
    B = 10,
    /// not C
    D = 11,
    /// not G
    H = 12,
    /// not T
    V = 13,
    /// any base
    N = 14,
}

impl Nucleotide {
    /// Number of symbols in the alphabet.
    pub const COUNT: usize = 15;

    /// The full alphabet in index order.
    pub const IUPAC: [Nucleotide; Self::COUNT] = [
        Self::A,
        Self::C,
        Self::G,
        Self::T,
        Self::R,
        Self::Y,
        Self::S,
        Self::W,
        Self::K,
        Self::M,
        Self::B,
        Self::D,
        Self::H,
        Self::V,
        Self::N,
    ];

    /// The unambiguous DNA bases, the only symbols point mutations produce.
    pub const DNA: [Nucleotide; 4] = [Self::A, Self::C, Self::G, Self::T];

    /// Convert from the compact index (0-14).
    #[inline(always)]
    pub const fn from_index(idx: u8) -> Option<Self> {
        if (idx as usize) < Self::COUNT {
            Some(Self::IUPAC[idx as usize])
        } else {
            None
        }
    }

    /// Convert to the compact index (0-14).
    #[inline(always)]
    pub const fn to_index(self) -> u8 {
        self as u8
    }

    /// Convert from an ASCII byte, accepting lowercase. Returns `None` for
    /// bytes outside the IUPAC alphabet.
    #[inline]
    pub const fn from_ascii(byte: u8) -> Option<Self> {
        match byte.to_ascii_uppercase() {
            b'A' => Some(Self::A),
            b'C' => Some(Self::C),
            b'G' => Some(Self::G),
            b'T' => Some(Self::T),
            b'R' => Some(Self::R),
            b'Y' => Some(Self::Y),
            b'S' => Some(Self::S),
            b'W' => Some(Self::W),
            b'K' => Some(Self::K),
            b'M' => Some(Self::M),
            b'B' => Some(Self::B),
            b'D' => Some(Self::D),
            b'H' => Some(Self::H),
            b'V' => Some(Self::V),
            b'N' => Some(Self::N),
            _ => None,
        }
    }

    /// Convert from a `char`, failing with `InvalidSymbol` for anything that
    /// is not a single IUPAC symbol.
    #[inline]
    pub fn from_char(c: char) -> Result<Self, SequenceError> {
        if !c.is_ascii() {
            return Err(SequenceError::InvalidSymbol(c));
        }
        Self::from_ascii(c as u8).ok_or(SequenceError::InvalidSymbol(c))
    }

    /// Parse a string that must hold exactly one symbol.
    pub fn from_symbol_str(s: &str) -> Result<Self, SequenceError> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            (Some(_), Some(c)) => Err(SequenceError::InvalidSymbol(c)),
            (None, _) => Err(SequenceError::InvalidSymbol('\0')),
        }
    }

    /// Uppercase ASCII byte for this symbol.
    #[inline(always)]
    pub const fn to_ascii(self) -> u8 {
        b"ACGTRYSWKMBDHVN"[self as usize]
    }

    /// Uppercase `char` for this symbol.
    #[inline(always)]
    pub const fn to_char(self) -> char {
        self.to_ascii() as char
    }

    /// True for the eleven ambiguity codes.
    #[inline(always)]
    pub const fn is_ambiguous(self) -> bool {
        (self as u8) > 3
    }
}

impl TryFrom<u8> for Nucleotide {
    type Error = SequenceError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_ascii(byte).ok_or(SequenceError::InvalidSymbol(byte as char))
    }
}

impl TryFrom<char> for Nucleotide {
    type Error = SequenceError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::from_char(c)
    }
}

impl From<Nucleotide> for char {
    #[inline(always)]
    fn from(nuc: Nucleotide) -> char {
        nuc.to_char()
    }
}

impl fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

// Serialized as the one-character symbol, the form used in event payloads.
impl Serialize for Nucleotide {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.to_char())
    }
}

impl<'de> Deserialize<'de> for Nucleotide {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_symbol_str(&s).map_err(serde::de::Error::custom)
    }
}
