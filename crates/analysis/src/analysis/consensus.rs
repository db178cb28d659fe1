//! Per-column majority vote over the repeats of an array.

use crisprmut_sim::base::{Nucleotide, Repeat};
use crisprmut_sim::genome::CrisprArray;
use rand::Rng;

use crate::errors::StatsError;

/// Symbol counts of one column, indexed by [`Nucleotide::to_index`].
pub fn column_counts(array: &CrisprArray, column: usize) -> [usize; Nucleotide::COUNT] {
    let mut counts = [0usize; Nucleotide::COUNT];
    for repeat in array.iter() {
        if let Some(&symbol) = repeat.as_slice().get(column) {
            counts[symbol.to_index() as usize] += 1;
        }
    }
    counts
}

/// The consensus repeat of `array`.
///
/// Each column takes its most frequent symbol. When several symbols share
/// the maximum count, one of them is chosen uniformly with `rng`; a column
/// with a unique maximum consumes no randomness. An empty array has an
/// empty consensus.
///
/// # Errors
/// `StatsError::Array` if the repeats are not all the same length.
pub fn consensus<R: Rng + ?Sized>(array: &CrisprArray, rng: &mut R) -> Result<Repeat, StatsError> {
    array.check_uniform()?;

    let consensus = (0..array.repeat_length())
        .map(|j| {
            let counts = column_counts(array, j);
            let max = counts.iter().copied().max().unwrap_or(0);
            let tied: Vec<Nucleotide> = Nucleotide::IUPAC
                .iter()
                .copied()
                .filter(|n| counts[n.to_index() as usize] == max)
                .collect();
            match tied.len() {
                1 => tied[0],
                n => tied[rng.random_range(0..n)],
            }
        })
        .collect();
    Ok(consensus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_consensus_majority() {
        let array =
            CrisprArray::from_strs(&["ACGT", "ACGA", "TCGA", "ACCA", "AGGA"]).unwrap();
        for seed in 0..10 {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            assert_eq!(consensus(&array, &mut rng).unwrap(), "ACGA");
        }
    }

    #[test]
    fn test_consensus_tie_uses_rng() {
        let array = CrisprArray::from_strs(&["A", "C"]).unwrap();
        let mut seen = std::collections::HashSet::new();
        for seed in 0..64 {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            let c = consensus(&array, &mut rng).unwrap();
            assert!(c == "A" || c == "C");
            seen.insert(c.to_string());
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_consensus_reproducible() {
        let array = CrisprArray::from_strs(&["AC", "GT", "RY"]).unwrap();
        let mut a = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut b = Xoshiro256PlusPlus::seed_from_u64(42);
        assert_eq!(
            consensus(&array, &mut a).unwrap(),
            consensus(&array, &mut b).unwrap()
        );
    }

    #[test]
    fn test_consensus_empty_and_ragged() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        assert!(consensus(&CrisprArray::new(), &mut rng).unwrap().is_empty());

        let ragged = CrisprArray::from_strs(&["ACGT", "AC"]).unwrap();
        assert!(matches!(
            consensus(&ragged, &mut rng),
            Err(StatsError::Array(_))
        ));
    }

    #[test]
    fn test_column_counts() {
        let array = CrisprArray::from_strs(&["AN", "AN", "CN"]).unwrap();
        let counts = column_counts(&array, 0);
        assert_eq!(counts[Nucleotide::A.to_index() as usize], 2);
        assert_eq!(counts[Nucleotide::C.to_index() as usize], 1);
        assert_eq!(column_counts(&array, 1)[Nucleotide::N.to_index() as usize], 3);
    }
}
