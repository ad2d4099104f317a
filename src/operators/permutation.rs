//! Operators for permutation encodings.
//!
//! Variables are `usize` values forming a permutation of `0..n`. Every
//! operator here maps valid permutations to valid permutations.
//!
//! # Crossover
//!
//! - [`OrderCrossover`] (OX): Davis (1985), preserves relative order
//! - [`PmxCrossover`] (PMX): Goldberg & Lingle (1985), preserves absolute position
//!
//! # Mutation
//!
//! - [`SwapMutation`]: exchange two random positions, O(1)
//! - [`InsertMutation`]: move one element to a random position, O(n)
//! - [`InversionMutation`]: reverse a random segment (2-opt move), O(n)
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use super::{random_segment, Crossover, Mutation};
use crate::error::EvoResult;
use crate::solution::Solution;
use rand::Rng;

const UNSET: usize = usize::MAX;

/// Order crossover (OX).
///
/// Copies a random segment from one parent and fills the remaining
/// positions with the other parent's elements in their original order,
/// starting after the segment and wrapping around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderCrossover {
    probability: f64,
}

impl OrderCrossover {
    pub fn new(probability: f64) -> EvoResult<Self> {
        Ok(Self {
            probability: super::probability("OX probability", probability)?,
        })
    }
}

impl Crossover<usize> for OrderCrossover {
    /// # Panics
    /// Panics unless two parents of equal length are given.
    fn execute<R: Rng>(
        &self,
        parents: &[&Solution<usize>],
        rng: &mut R,
    ) -> Vec<Solution<usize>> {
        recombine(parents, self.probability, rng, ox_child)
    }
}

/// Partially mapped crossover (PMX).
///
/// Copies a random segment from one parent; elements of the other parent's
/// segment that were displaced are placed by following the segment mapping
/// until a free position outside the segment is found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PmxCrossover {
    probability: f64,
}

impl PmxCrossover {
    pub fn new(probability: f64) -> EvoResult<Self> {
        Ok(Self {
            probability: super::probability("PMX probability", probability)?,
        })
    }
}

impl Crossover<usize> for PmxCrossover {
    /// # Panics
    /// Panics unless two parents of equal length are given.
    fn execute<R: Rng>(
        &self,
        parents: &[&Solution<usize>],
        rng: &mut R,
    ) -> Vec<Solution<usize>> {
        recombine(parents, self.probability, rng, pmx_child)
    }
}

/// Shared driver: picks one segment and builds both children with `build`.
fn recombine<R, F>(
    parents: &[&Solution<usize>],
    probability: f64,
    rng: &mut R,
    build: F,
) -> Vec<Solution<usize>>
where
    R: Rng,
    F: Fn(&[usize], &[usize], usize, usize) -> Vec<usize>,
{
    assert_eq!(parents.len(), 2, "permutation crossover takes two parents");
    let (p1, p2) = (parents[0], parents[1]);
    let n = p1.number_of_variables();
    assert_eq!(n, p2.number_of_variables(), "parents must have equal length");

    let mut c1 = p1.clone();
    let mut c2 = p2.clone();
    if n < 2 || rng.random::<f64>() >= probability {
        return vec![c1, c2];
    }

    let (start, end) = random_segment(n, rng);
    let a = build(p1.variables(), p2.variables(), start, end);
    let b = build(p2.variables(), p1.variables(), start, end);
    c1.variables_mut().copy_from_slice(&a);
    c2.variables_mut().copy_from_slice(&b);
    vec![c1, c2]
}

/// One OX child: segment from `template`, the rest from `donor`.
fn ox_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let mut child = vec![UNSET; n];
    let mut taken = vec![false; n];

    for i in start..=end {
        child[i] = template[i];
        taken[template[i]] = true;
    }

    let mut pos = (end + 1) % n;
    for offset in 0..n {
        let value = donor[(end + 1 + offset) % n];
        if !taken[value] {
            child[pos] = value;
            pos = (pos + 1) % n;
        }
    }
    child
}

/// One PMX child: segment from `template`, mapped and filled from `donor`.
fn pmx_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let mut child = vec![UNSET; n];
    let mut placed = vec![false; n];
    let mut donor_position = vec![0usize; n];
    for (i, &v) in donor.iter().enumerate() {
        donor_position[v] = i;
    }

    for i in start..=end {
        child[i] = template[i];
        placed[template[i]] = true;
    }

    for i in start..=end {
        let value = donor[i];
        if placed[value] {
            continue;
        }
        let mut pos = i;
        loop {
            pos = donor_position[template[pos]];
            if pos < start || pos > end {
                child[pos] = value;
                placed[value] = true;
                break;
            }
        }
    }

    for (slot, &value) in child.iter_mut().zip(donor) {
        if *slot == UNSET {
            *slot = value;
        }
    }
    child
}

macro_rules! permutation_mutation {
    ($(#[$doc:meta])* $name:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name {
            probability: f64,
        }

        impl $name {
            /// `probability` is the chance the move is applied at all.
            pub fn new(probability: f64) -> EvoResult<Self> {
                Ok(Self {
                    probability: super::probability($label, probability)?,
                })
            }
        }
    };
}

permutation_mutation!(
    /// Exchanges two random positions.
    SwapMutation,
    "swap mutation probability"
);
permutation_mutation!(
    /// Removes one element and reinserts it at a random position.
    InsertMutation,
    "insert mutation probability"
);
permutation_mutation!(
    /// Reverses a random segment.
    InversionMutation,
    "inversion mutation probability"
);

impl Mutation<usize> for SwapMutation {
    fn execute<R: Rng>(&self, solution: &mut Solution<usize>, rng: &mut R) {
        let perm = solution.variables_mut();
        let n = perm.len();
        if n < 2 || rng.random::<f64>() >= self.probability {
            return;
        }
        let i = rng.random_range(0..n);
        let j = rng.random_range(0..n);
        perm.swap(i, j);
    }
}

impl Mutation<usize> for InsertMutation {
    fn execute<R: Rng>(&self, solution: &mut Solution<usize>, rng: &mut R) {
        let perm = solution.variables_mut();
        let n = perm.len();
        if n < 2 || rng.random::<f64>() >= self.probability {
            return;
        }
        let from = rng.random_range(0..n);
        let to = rng.random_range(0..n);
        if from < to {
            perm[from..=to].rotate_left(1);
        } else {
            perm[to..=from].rotate_right(1);
        }
    }
}

impl Mutation<usize> for InversionMutation {
    fn execute<R: Rng>(&self, solution: &mut Solution<usize>, rng: &mut R) {
        let perm = solution.variables_mut();
        let n = perm.len();
        if n < 2 || rng.random::<f64>() >= self.probability {
            return;
        }
        let (start, end) = random_segment(n, rng);
        perm[start..=end].reverse();
    }
}
