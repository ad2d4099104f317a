//! Variation operators.
//!
//! Operators are typed by the variable encoding they act on, so pairing a
//! real-coded crossover with a binary solution is a compile error rather
//! than a runtime failure.
//!
//! # Encodings
//!
//! - [`binary`]: bit-flip mutation; single-point crossover (any encoding)
//! - [`real`]: SBX crossover and polynomial mutation with variable bounds
//! - [`permutation`]: OX and PMX crossover; swap, insert and inversion mutation
//!
//! All probabilities are validated when the operator is constructed.

pub mod binary;
pub mod permutation;
pub mod real;

use crate::error::{EvoError, EvoResult};
use crate::solution::Solution;
use rand::Rng;

pub use binary::{BitFlipMutation, SinglePointCrossover};
pub use permutation::{
    InsertMutation, InversionMutation, OrderCrossover, PmxCrossover, SwapMutation,
};
pub use real::{PolynomialMutation, SbxCrossover};

/// Recombines parents into offspring.
pub trait Crossover<V>: Send + Sync {
    /// Parents consumed per call.
    fn number_of_parents(&self) -> usize {
        2
    }

    /// Produces offspring from `parents`. The offspring are unevaluated
    /// copies whose variables have been recombined.
    fn execute<R: Rng>(&self, parents: &[&Solution<V>], rng: &mut R) -> Vec<Solution<V>>;
}

/// Perturbs a solution in place.
pub trait Mutation<V>: Send + Sync {
    fn execute<R: Rng>(&self, solution: &mut Solution<V>, rng: &mut R);
}

/// Leaves solutions untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoMutation;

impl<V> Mutation<V> for NoMutation {
    fn execute<R: Rng>(&self, _solution: &mut Solution<V>, _rng: &mut R) {}
}

/// Checks that `value` is a probability.
pub(crate) fn probability(name: &str, value: f64) -> EvoResult<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(EvoError::InvalidConfig(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

/// Checks that a distribution index is finite and non-negative.
pub(crate) fn distribution_index(name: &str, value: f64) -> EvoResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(EvoError::InvalidConfig(format!(
            "{name} must be a non-negative number, got {value}"
        )))
    }
}

/// Picks a random segment `[start, end]` within `0..n` where `start <= end`.
pub(crate) fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
