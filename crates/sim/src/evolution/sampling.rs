//! Small sampling helpers shared by the generators.

use rand::Rng;

use crate::errors::SimulationError;

/// Number of Bernoulli trials up to and including the first success, with
/// success probability `1 / alpha`. Always at least 1; the mean is `alpha`.
#[inline]
pub fn geometric_mean_alpha<R: Rng + ?Sized>(rng: &mut R, alpha: f64) -> usize {
    let p = 1.0 / alpha;
    let mut k = 1;
    while rng.random::<f64>() > p {
        k += 1;
    }
    k
}

/// Uniform draw from the inclusive range `[lo, hi]`, failing with
/// `NoEligibleTarget` when the range is empty.
#[inline]
pub(crate) fn uniform_inclusive<R: Rng + ?Sized>(
    rng: &mut R,
    lo: i64,
    hi: i64,
    generator: &'static str,
    what: &'static str,
    array_length: usize,
) -> Result<usize, SimulationError> {
    if lo > hi || lo < 0 {
        return Err(SimulationError::NoEligibleTarget {
            generator,
            what,
            array_length,
        });
    }
    Ok(rng.random_range(lo as usize..=hi as usize))
}
