//! Base symbols and the repeat unit built from them.

mod nucleotide;
mod sequence;

pub use nucleotide::Nucleotide;
pub use sequence::Repeat;
