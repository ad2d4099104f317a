//! Operators for bit-string encodings.

use super::{Crossover, Mutation};
use crate::error::EvoResult;
use crate::solution::Solution;
use rand::Rng;

/// Flips each bit independently with a fixed probability.
///
/// The customary rate is `1 / number_of_bits`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitFlipMutation {
    probability: f64,
}

impl BitFlipMutation {
    /// # Errors
    /// [`EvoError::InvalidConfig`](crate::EvoError::InvalidConfig) if
    /// `probability` is outside `[0, 1]`.
    pub fn new(probability: f64) -> EvoResult<Self> {
        Ok(Self {
            probability: super::probability("bit-flip probability", probability)?,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Mutation<bool> for BitFlipMutation {
    fn execute<R: Rng>(&self, solution: &mut Solution<bool>, rng: &mut R) {
        for bit in solution.variables_mut() {
            if rng.random::<f64>() < self.probability {
                *bit = !*bit;
            }
        }
    }
}

/// Swaps the tails of two parents after a random cut point.
///
/// Encoding-agnostic: works for any variable type, though it breaks
/// permutations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinglePointCrossover {
    probability: f64,
}

impl SinglePointCrossover {
    /// # Errors
    /// [`EvoError::InvalidConfig`](crate::EvoError::InvalidConfig) if
    /// `probability` is outside `[0, 1]`.
    pub fn new(probability: f64) -> EvoResult<Self> {
        Ok(Self {
            probability: super::probability("single-point crossover probability", probability)?,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl<V: Clone + Send + Sync> Crossover<V> for SinglePointCrossover {
    /// # Panics
    /// Panics unless exactly two parents of equal length are given.
    fn execute<R: Rng>(&self, parents: &[&Solution<V>], rng: &mut R) -> Vec<Solution<V>> {
        assert_eq!(parents.len(), 2, "single-point crossover takes two parents");
        let (p1, p2) = (parents[0], parents[1]);
        let n = p1.number_of_variables();
        assert_eq!(n, p2.number_of_variables(), "parents must have equal length");

        let mut c1 = p1.clone();
        let mut c2 = p2.clone();
        if n > 1 && rng.random::<f64>() < self.probability {
            let point = rng.random_range(1..n);
            c1.variables_mut()[point..].clone_from_slice(&p2.variables()[point..]);
            c2.variables_mut()[point..].clone_from_slice(&p1.variables()[point..]);
        }
        vec![c1, c2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn bits(v: &[bool]) -> Solution<bool> {
        Solution::new(v.to_vec(), 1, 0)
    }

    #[test]
    fn test_bit_flip_rate_bounds() {
        assert!(BitFlipMutation::new(1.5).is_err());
        assert!(BitFlipMutation::new(-0.1).is_err());
    }

    #[test]
    fn test_bit_flip_all_and_none() {
        let mut rng = create_rng(42);
        let mut s = bits(&[true, false, true, false]);
        BitFlipMutation::new(1.0).unwrap().execute(&mut s, &mut rng);
        assert_eq!(s.variables(), &[false, true, false, true]);
        BitFlipMutation::new(0.0).unwrap().execute(&mut s, &mut rng);
        assert_eq!(s.variables(), &[false, true, false, true]);
    }

    #[test]
    fn test_bit_flip_expected_count() {
        let mut rng = create_rng(7);
        let op = BitFlipMutation::new(0.1).unwrap();
        let mut s = bits(&vec![false; 10_000]);
        op.execute(&mut s, &mut rng);
        let flipped = s.variables().iter().filter(|&&b| b).count();
        assert!((800..1200).contains(&flipped), "flipped {flipped}");
    }

    #[test]
    fn test_single_point_preserves_alleles() {
        let mut rng = create_rng(3);
        let op = SinglePointCrossover::new(1.0).unwrap();
        let a = bits(&[true; 16]);
        let b = bits(&[false; 16]);
        for _ in 0..50 {
            let children = Crossover::execute(&op, &[&a, &b], &mut rng);
            assert_eq!(children.len(), 2);
            for i in 0..16 {
                // Each position holds one true and one false across the pair.
                assert_ne!(children[0].variables()[i], children[1].variables()[i]);
            }
            assert!(children[0].variables()[0]);
            assert!(!children[0].variables()[15]);
        }
    }

    #[test]
    fn test_single_point_zero_probability_copies() {
        let mut rng = create_rng(3);
        let op = SinglePointCrossover::new(0.0).unwrap();
        let a = bits(&[true, true, true]);
        let b = bits(&[false, false, false]);
        let children = Crossover::execute(&op, &[&a, &b], &mut rng);
        assert_eq!(children[0].variables(), a.variables());
        assert_eq!(children[1].variables(), b.variables());
    }
}
