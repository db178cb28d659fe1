//! Continuous-time simulation of a single array.
//!
//! Each step races one exponential clock per generator. A generator with
//! rate `r > 0` draws a waiting time from `Exp(r)`; a generator with rate 0
//! draws nothing and cannot win. The strictly smallest waiting time wins,
//! time advances by it, and the winner's sampled event is applied. Rates
//! are recomputed every step because they depend on the array.
//!
//! A trajectory ends when the next event would fall past the horizon, when
//! no generator can fire, or when a generator reports an error.

use log::{debug, trace, warn};
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::errors::SimulationError;
use crate::evolution::{CrisprEvent, EventGenerator};
use crate::genome::CrisprArray;

/// Lifecycle of a [`Trajectory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrajectoryState {
    Running,
    Terminal,
}

/// One simulation run over a borrowed set of generators.
///
/// `Trajectory` is an iterator over the applied events. Each item is the
/// event that was just applied to the array, or the error that aborted the
/// run, after which the iterator is exhausted.
///
/// # Examples
///
/// ```rust
/// # use crisprmut_sim::prelude::*;
/// let generators = vec![
///     EventGenerator::mutation(MutationParameters::default(), Rate::PerBase(0.01)).unwrap(),
/// ];
/// let array = CrisprArray::filled(10, 30, Nucleotide::N);
/// let mut trajectory = Trajectory::new(42, 5.0, array, &generators).unwrap();
/// let n = trajectory.run_to_end().unwrap();
/// assert_eq!(trajectory.state(), TrajectoryState::Terminal);
/// assert!(n > 0);
/// ```
pub struct Trajectory<'g, R: Rng = Xoshiro256PlusPlus> {
    generators: &'g [EventGenerator],
    array: CrisprArray,
    rng: R,
    end_time: f64,
    current_time: f64,
    state: TrajectoryState,
    events_applied: usize,
}

impl<'g> Trajectory<'g, Xoshiro256PlusPlus> {
    /// Start a trajectory with a Xoshiro256++ RNG seeded from `seed`.
    pub fn new(
        seed: u64,
        end_time: f64,
        array: CrisprArray,
        generators: &'g [EventGenerator],
    ) -> Result<Self, SimulationError> {
        Self::with_rng(
            Xoshiro256PlusPlus::seed_from_u64(seed),
            end_time,
            array,
            generators,
        )
    }
}

impl<'g, R: Rng> Trajectory<'g, R> {
    /// Start a trajectory with a caller-supplied RNG.
    ///
    /// # Errors
    /// `NoGenerators` if `generators` is empty, `NonPositiveHorizon` if
    /// `end_time <= 0` (or is NaN).
    pub fn with_rng(
        rng: R,
        end_time: f64,
        array: CrisprArray,
        generators: &'g [EventGenerator],
    ) -> Result<Self, SimulationError> {
        if generators.is_empty() {
            return Err(SimulationError::NoGenerators);
        }
        if end_time.is_nan() || end_time <= 0.0 {
            return Err(SimulationError::NonPositiveHorizon(end_time));
        }
        debug!(
            "Starting trajectory: end_time={end_time}, array_length={}, repeat_length={}, generators={}",
            array.len(),
            array.repeat_length(),
            generators.len()
        );
        Ok(Self {
            generators,
            array,
            rng,
            end_time,
            current_time: 0.0,
            state: TrajectoryState::Running,
            events_applied: 0,
        })
    }

    pub fn state(&self) -> TrajectoryState {
        self.state
    }

    /// Time of the last applied event, 0 before the first.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn array(&self) -> &CrisprArray {
        &self.array
    }

    pub fn events_applied(&self) -> usize {
        self.events_applied
    }

    pub fn into_array(self) -> CrisprArray {
        self.array
    }

    /// Release the array together with the RNG, so that downstream sampling
    /// continues the same random stream.
    pub fn into_parts(self) -> (CrisprArray, R) {
        (self.array, self.rng)
    }

    fn terminate(&mut self) {
        if self.state == TrajectoryState::Running {
            debug!(
                "Trajectory finished at t={} after {} events, array_length={}",
                self.current_time,
                self.events_applied,
                self.array.len()
            );
        }
        self.state = TrajectoryState::Terminal;
    }

    /// Race all generators once and return the winner's index and waiting
    /// time, or `None` if every rate is zero.
    fn race(&mut self) -> Result<Option<(usize, f64)>, SimulationError> {
        let mut winner: Option<(usize, f64)> = None;
        for (k, generator) in self.generators.iter().enumerate() {
            let rate = generator.rate(self.current_time, &self.array);
            if !rate.is_finite() || rate < 0.0 {
                return Err(SimulationError::InvalidRate {
                    generator: generator.name(),
                    rate,
                });
            }
            if rate > 0.0 {
                let delta = Exp::new(rate)
                    .map_err(|_| SimulationError::InvalidRate {
                        generator: generator.name(),
                        rate,
                    })?
                    .sample(&mut self.rng);
                if winner.map_or(true, |(_, best)| delta < best) {
                    winner = Some((k, delta));
                }
            }
        }
        Ok(winner)
    }

    /// Advance by one event.
    ///
    /// Returns `None` once the trajectory is terminal.
    pub fn step(&mut self) -> Option<Result<CrisprEvent, SimulationError>> {
        if self.state == TrajectoryState::Terminal {
            return None;
        }
        if self.current_time >= self.end_time {
            self.terminate();
            return None;
        }

        let (k, delta) = match self.race() {
            Ok(Some(w)) => w,
            Ok(None) => {
                if self.events_applied == 0 {
                    warn!("No generator can fire on the initial array; trajectory is empty");
                } else {
                    debug!("All rates dropped to zero at t={}", self.current_time);
                }
                self.terminate();
                return None;
            }
            Err(e) => {
                self.terminate();
                return Some(Err(e));
            }
        };

        let next_time = self.current_time + delta;
        if next_time > self.end_time {
            self.terminate();
            return None;
        }
        self.current_time = next_time;

        let event = match self.generators[k].generate(&mut self.rng, next_time, &self.array) {
            Ok(event) => event,
            Err(e) => {
                self.terminate();
                return Some(Err(e));
            }
        };
        self.array.apply_event_unchecked(&event);
        self.events_applied += 1;
        trace!("{event}");

        Some(Ok(event))
    }

    /// Exhaust the trajectory without keeping events; returns the number of
    /// events applied in total.
    pub fn run_to_end(&mut self) -> Result<usize, SimulationError> {
        while let Some(result) = self.step() {
            result?;
        }
        Ok(self.events_applied)
    }
}

impl<R: Rng> Iterator for Trajectory<'_, R> {
    type Item = Result<CrisprEvent, SimulationError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Nucleotide;
    use crate::evolution::{DeletionParameters, InsertionParameters, MutationParameters, Rate};

    fn mutation_only(rate: f64) -> Vec<EventGenerator> {
        vec![EventGenerator::mutation(MutationParameters::default(), rate).unwrap()]
    }

    #[test]
    fn test_trajectory_rejects_empty_generators() {
        let array = CrisprArray::filled(5, 5, Nucleotide::N);
        assert_eq!(
            Trajectory::new(1, 1.0, array, &[]).err(),
            Some(SimulationError::NoGenerators)
        );
    }

    #[test]
    fn test_trajectory_rejects_non_positive_horizon() {
        let generators = mutation_only(1.0);
        for t in [0.0, -1.0] {
            let array = CrisprArray::filled(5, 5, Nucleotide::N);
            assert_eq!(
                Trajectory::new(1, t, array, &generators).err(),
                Some(SimulationError::NonPositiveHorizon(t))
            );
        }
    }

    #[test]
    fn test_trajectory_times_increase_within_horizon() {
        let generators = mutation_only(10.0);
        let array = CrisprArray::filled(5, 5, Nucleotide::N);
        let trajectory = Trajectory::new(42, 3.0, array, &generators).unwrap();

        let mut last = 0.0;
        let mut count = 0;
        for event in trajectory {
            let event = event.unwrap();
            assert!(event.time > last);
            assert!(event.time <= 3.0);
            last = event.time;
            count += 1;
        }
        // Poisson(30) events expected
        assert!(count > 10 && count < 60, "count {count}");
    }

    #[test]
    fn test_trajectory_zero_rates_terminate_early() {
        let generators = vec![
            EventGenerator::deletion(DeletionParameters::default(), Rate::Constant(1.0)).unwrap(),
        ];
        let array = CrisprArray::filled(6, 3, Nucleotide::N);
        let mut trajectory = Trajectory::new(7, 1e9, array, &generators).unwrap();
        trajectory.run_to_end().unwrap();
        assert_eq!(trajectory.state(), TrajectoryState::Terminal);
        // Deletions stop once len - 2 <= 0
        assert!(trajectory.array().len() <= 2);
        assert!(trajectory.current_time() < 1e9);
    }

    #[test]
    fn test_trajectory_reports_invalid_custom_rate() {
        let generators = vec![
            EventGenerator::mutation(MutationParameters::default(), Rate::custom(|_, _| f64::NAN))
                .unwrap(),
        ];
        let array = CrisprArray::filled(3, 3, Nucleotide::N);
        let mut trajectory = Trajectory::new(1, 1.0, array, &generators).unwrap();
        assert!(matches!(
            trajectory.next(),
            Some(Err(SimulationError::InvalidRate { .. }))
        ));
        assert!(trajectory.next().is_none());
    }

    #[test]
    fn test_trajectory_deterministic() {
        let generators = vec![
            EventGenerator::mutation(MutationParameters::default(), Rate::PerBase(0.01)).unwrap(),
            EventGenerator::insertion(InsertionParameters::default(), Rate::Constant(0.5)).unwrap(),
            EventGenerator::deletion(DeletionParameters::default(), Rate::PerRepeat(0.05)).unwrap(),
        ];
        let run = |seed| {
            let array = CrisprArray::filled(10, 8, Nucleotide::N);
            let trajectory = Trajectory::new(seed, 20.0, array, &generators).unwrap();
            trajectory.collect::<Result<Vec<_>, _>>().unwrap()
        };
        assert_eq!(run(3), run(3));
        assert_ne!(run(3), run(4));
    }

    #[test]
    fn test_step_after_terminal() {
        let generators = mutation_only(0.0);
        let array = CrisprArray::filled(3, 3, Nucleotide::N);
        let mut trajectory = Trajectory::new(1, 1.0, array, &generators).unwrap();
        assert!(trajectory.step().is_none());
        assert_eq!(trajectory.state(), TrajectoryState::Terminal);
        assert!(trajectory.step().is_none());
        assert_eq!(trajectory.events_applied(), 0);
    }
}
