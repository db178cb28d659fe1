//! Repeat insertions (duplications).
//!
//! An insertion copies an existing repeat and places the copy next to its
//! template. Where the insertion happens is governed by an anchor (which end
//! of the array insertions are biased toward) and a randomization mode.

use rand::Rng;
use rand_distr::{Distribution, Exp};
use serde::{Deserialize, Serialize};

use super::events::CrisprEvent;
use super::rate::Rate;
use super::sampling::uniform_inclusive;
use crate::errors::{ParameterError, SimulationError};
use crate::genome::CrisprArray;

/// End of the array that insertions are measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Leader end, index 0.
    #[default]
    Proximal,
    /// Far end, index `len`.
    Distal,
}

/// How far from the anchor the insertion lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Randomize {
    /// Always at the anchor.
    #[default]
    None,
    /// Uniform over the array.
    Uniform,
    /// Exponentially distributed distance from the anchor.
    Exponential,
}

/// Parameters of [`InsertionGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InsertionParameters {
    pub anchor: Anchor,
    pub randomize: Randomize,
    /// Exponential distance rate per repeat; the distribution's rate is
    /// `exp_lambda_factor * array_length`.
    pub exp_lambda_factor: f64,
}

impl Default for InsertionParameters {
    fn default() -> Self {
        Self {
            anchor: Anchor::Proximal,
            randomize: Randomize::None,
            exp_lambda_factor: 0.1,
        }
    }
}

pub(crate) fn check_lambda_factor(
    generator: &'static str,
    factor: f64,
) -> Result<(), ParameterError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(ParameterError::invalid(
            generator,
            format!("exp_lambda_factor must be finite and positive, got {factor}"),
        ));
    }
    Ok(())
}

/// Draw `int(Exp(factor * len))`, saturating for very large draws.
pub(crate) fn exponential_distance<R: Rng + ?Sized>(
    rng: &mut R,
    factor: f64,
    len: usize,
    generator: &'static str,
) -> Result<usize, SimulationError> {
    let exp = Exp::new(factor * len as f64).map_err(|e| {
        SimulationError::Parameters(ParameterError::invalid(generator, e.to_string()))
    })?;
    Ok(exp.sample(rng) as usize)
}

/// Samples repeat duplications.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertionGenerator {
    params: InsertionParameters,
    rate: Rate,
}

impl InsertionGenerator {
    pub const NAME: &'static str = "InsertionGenerator";

    pub fn new(params: InsertionParameters, rate: Rate) -> Result<Self, ParameterError> {
        check_lambda_factor(Self::NAME, params.exp_lambda_factor)?;
        rate.validate(Self::NAME)?;
        Ok(Self { params, rate })
    }

    pub fn parameters(&self) -> &InsertionParameters {
        &self.params
    }

    pub fn rate_spec(&self) -> &Rate {
        &self.rate
    }

    /// Zero for an empty array, since there is no template to copy.
    pub fn rate(&self, current_time: f64, array: &CrisprArray) -> f64 {
        if array.is_empty() {
            return 0.0;
        }
        self.rate.evaluate(current_time, array)
    }

    /// Sample an insertion.
    ///
    /// | randomize     | proximal              | distal                  |
    /// |---------------|-----------------------|-------------------------|
    /// | `none`        | 0                     | `len`                   |
    /// | `uniform`     | `[0, len-1]`          | `[0, len]`              |
    /// | `exponential` | `min(d, len-1)`       | `max(0, len-d)`         |
    ///
    /// The copy is taken from the insertion index for proximal anchors and
    /// from the repeat just before it for distal ones, wrapping to the last
    /// repeat when a distal insertion lands at index 0.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        current_time: f64,
        array: &CrisprArray,
    ) -> Result<CrisprEvent, SimulationError> {
        let len = array.len();
        if len == 0 {
            return Err(SimulationError::NoEligibleTarget {
                generator: Self::NAME,
                what: "template repeat",
                array_length: 0,
            });
        }
        let p = &self.params;
        let insertion_index = match (p.randomize, p.anchor) {
            (Randomize::None, Anchor::Proximal) => 0,
            (Randomize::None, Anchor::Distal) => len,
            (Randomize::Uniform, Anchor::Proximal) => {
                uniform_inclusive(rng, 0, len as i64 - 1, Self::NAME, "insertion index", len)?
            }
            (Randomize::Uniform, Anchor::Distal) => {
                uniform_inclusive(rng, 0, len as i64, Self::NAME, "insertion index", len)?
            }
            (Randomize::Exponential, anchor) => {
                let d = exponential_distance(rng, p.exp_lambda_factor, len, Self::NAME)?;
                match anchor {
                    Anchor::Proximal => d.min(len - 1),
                    Anchor::Distal => len.saturating_sub(d),
                }
            }
        };
        let copy_index = match p.anchor {
            Anchor::Proximal => insertion_index,
            Anchor::Distal => insertion_index.checked_sub(1).unwrap_or(len - 1),
        };

        Ok(CrisprEvent::insertion(current_time, copy_index, insertion_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Nucleotide;
    use crate::evolution::EventAction;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn generator(anchor: Anchor, randomize: Randomize) -> InsertionGenerator {
        InsertionGenerator::new(
            InsertionParameters {
                anchor,
                randomize,
                exp_lambda_factor: 0.1,
            },
            Rate::Constant(1.0),
        )
        .unwrap()
    }

    fn indices(event: &CrisprEvent) -> (usize, usize) {
        match event.action {
            EventAction::Insertion(a) => (a.copy_index, a.insertion_index),
            other => panic!("expected insertion, got {other:?}"),
        }
    }

    #[test]
    fn test_insertion_fixed_anchor() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let array = CrisprArray::filled(5, 4, Nucleotide::N);

        let e = generator(Anchor::Proximal, Randomize::None)
            .generate(&mut rng, 1.0, &array)
            .unwrap();
        assert_eq!(indices(&e), (0, 0));

        let e = generator(Anchor::Distal, Randomize::None)
            .generate(&mut rng, 1.0, &array)
            .unwrap();
        assert_eq!(indices(&e), (4, 5));
    }

    #[test]
    fn test_insertion_uniform_ranges() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let array = CrisprArray::filled(5, 4, Nucleotide::N);
        let proximal = generator(Anchor::Proximal, Randomize::Uniform);
        let distal = generator(Anchor::Distal, Randomize::Uniform);

        for _ in 0..500 {
            let (c, i) = indices(&proximal.generate(&mut rng, 0.0, &array).unwrap());
            assert!(i <= 4);
            assert_eq!(c, i);

            let (c, i) = indices(&distal.generate(&mut rng, 0.0, &array).unwrap());
            assert!(i <= 5);
            if i == 0 {
                assert_eq!(c, 4);
            } else {
                assert_eq!(c, i - 1);
            }
        }
    }

    #[test]
    fn test_insertion_exponential_bias() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let array = CrisprArray::filled(50, 4, Nucleotide::N);
        let proximal = generator(Anchor::Proximal, Randomize::Exponential);
        let distal = generator(Anchor::Distal, Randomize::Exponential);

        let n = 2000;
        let mut prox_sum = 0;
        let mut dist_sum = 0;
        for _ in 0..n {
            let (_, i) = indices(&proximal.generate(&mut rng, 0.0, &array).unwrap());
            assert!(i <= 49);
            prox_sum += i;
            let (_, i) = indices(&distal.generate(&mut rng, 0.0, &array).unwrap());
            assert!(i <= 50);
            dist_sum += i;
        }
        // Mean distance is 1 / (0.1 * 50) = 0.2 repeats, so nearly all land at the anchor
        assert!((prox_sum as f64 / n as f64) < 1.0);
        assert!((dist_sum as f64 / n as f64) > 49.0);
    }

    #[test]
    fn test_insertion_generated_events_apply() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        for anchor in [Anchor::Proximal, Anchor::Distal] {
            for randomize in [Randomize::None, Randomize::Uniform, Randomize::Exponential] {
                let g = generator(anchor, randomize);
                let mut array = CrisprArray::filled(3, 4, Nucleotide::N);
                for _ in 0..20 {
                    let e = g.generate(&mut rng, 0.0, &array).unwrap();
                    array.apply_event(&e).unwrap();
                }
                assert_eq!(array.len(), 23);
            }
        }
    }

    #[test]
    fn test_insertion_rate_and_empty() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let g = generator(Anchor::Proximal, Randomize::None);
        let empty = CrisprArray::new();
        assert_eq!(g.rate(0.0, &empty), 0.0);
        assert!(g.generate(&mut rng, 0.0, &empty).is_err());
    }

    #[test]
    fn test_insertion_invalid_lambda() {
        for factor in [0.0, -1.0, f64::NAN] {
            let params = InsertionParameters {
                exp_lambda_factor: factor,
                ..Default::default()
            };
            assert!(InsertionGenerator::new(params, Rate::Constant(1.0)).is_err());
        }
    }

    #[test]
    fn test_insertion_parameters_serde() {
        let params: InsertionParameters =
            serde_json::from_str(r#"{"anchor": "distal", "randomize": "exponential"}"#).unwrap();
        assert_eq!(params.anchor, Anchor::Distal);
        assert_eq!(params.randomize, Randomize::Exponential);
        assert_eq!(params.exp_lambda_factor, 0.1);
        assert!(serde_json::from_str::<InsertionParameters>(r#"{"anchr": "distal"}"#).is_err());
    }
}
