//! The CRISPR array, the mutable structure every event edits.

mod array;

pub use array::CrisprArray;
