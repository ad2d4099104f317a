//! Offspring production from selected parents.

use crate::operators::{Crossover, Mutation};
use crate::solution::Solution;
use rand::Rng;

/// Turns a group of parents into offspring.
///
/// The runner calls [`vary`](Variation::vary) with exactly
/// [`parents_per_call`](Variation::parents_per_call) parents and keeps
/// calling until it has collected enough offspring.
pub trait Variation<V>: Send + Sync {
    fn parents_per_call(&self) -> usize;

    fn vary<R: Rng>(&self, parents: &[&Solution<V>], rng: &mut R) -> Vec<Solution<V>>;
}

/// Crossover followed by mutation of every child.
#[derive(Debug, Clone)]
pub struct CrossoverAndMutation<C, M> {
    crossover: C,
    mutation: M,
}

impl<C, M> CrossoverAndMutation<C, M> {
    pub fn new(crossover: C, mutation: M) -> Self {
        Self {
            crossover,
            mutation,
        }
    }

    pub fn crossover(&self) -> &C {
        &self.crossover
    }

    pub fn mutation(&self) -> &M {
        &self.mutation
    }
}

impl<V, C, M> Variation<V> for CrossoverAndMutation<C, M>
where
    C: Crossover<V>,
    M: Mutation<V>,
{
    fn parents_per_call(&self) -> usize {
        self.crossover.number_of_parents()
    }

    fn vary<R: Rng>(&self, parents: &[&Solution<V>], rng: &mut R) -> Vec<Solution<V>> {
        let mut children = self.crossover.execute(parents, rng);
        for child in &mut children {
            self.mutation.execute(child, rng);
        }
        children
    }
}

/// Copies one parent and mutates it; the usual variation of an
/// evolution strategy.
#[derive(Debug, Clone)]
pub struct MutationOnly<M> {
    mutation: M,
}

impl<M> MutationOnly<M> {
    pub fn new(mutation: M) -> Self {
        Self { mutation }
    }
}

impl<V, M> Variation<V> for MutationOnly<M>
where
    V: Clone,
    M: Mutation<V>,
{
    fn parents_per_call(&self) -> usize {
        1
    }

    fn vary<R: Rng>(&self, parents: &[&Solution<V>], rng: &mut R) -> Vec<Solution<V>> {
        parents
            .iter()
            .map(|&parent| {
                let mut child = parent.clone();
                self.mutation.execute(&mut child, rng);
                child
            })
            .collect()
    }
}
