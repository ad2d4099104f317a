//! Survivor selection.
//!
//! Elitist strategies rank the candidates and admit whole fronts while they
//! fit. The first front that does not fit is truncated one member at a
//! time: the member with the lowest density score is dropped and the scores
//! of the rest are recomputed before the next removal.

use super::selection::FitnessTable;
use crate::comparator::DominanceComparator;
use crate::density::{worst_index, DensityEstimator};
use crate::error::{EvoError, EvoResult};
use crate::ranking::Ranking;
use crate::solution::{objective_matrix, Solution};

/// How the next population is formed from parents and offspring.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Replacement {
    /// Offspring replace the parents; the best `elites` parents survive.
    Generational {
        /// Parents carried over unchanged.
        elites: usize,
    },

    /// Survivors are chosen from parents and offspring together.
    ///
    /// With one offspring per generation and hypervolume contribution this
    /// is SMS-EMOA; with as many offspring as parents and crowding distance
    /// it is NSGA-II.
    MuPlusLambda {
        /// Scores members of the truncated front.
        density: DensityEstimator,
    },

    /// Survivors are chosen from the offspring only.
    MuCommaLambda {
        /// Scores members of the truncated front.
        density: DensityEstimator,
    },
}

impl Default for Replacement {
    fn default() -> Self {
        Replacement::MuPlusLambda {
            density: DensityEstimator::CrowdingDistance,
        }
    }
}

impl Replacement {
    /// Short name for log output.
    pub fn name(&self) -> &'static str {
        match self {
            Replacement::Generational { .. } => "generational",
            Replacement::MuPlusLambda { .. } => "mu+lambda",
            Replacement::MuCommaLambda { .. } => "mu,lambda",
        }
    }

    /// Builds the next population of `size` members.
    ///
    /// `table` must describe `population`.
    ///
    /// # Errors
    /// [`EvoError::InsufficientPopulation`] if there are too few candidates
    /// to fill `size` slots; density estimator errors.
    pub fn replace<V>(
        &self,
        population: Vec<Solution<V>>,
        offspring: Vec<Solution<V>>,
        table: &FitnessTable,
        size: usize,
        comparator: &DominanceComparator,
    ) -> EvoResult<Vec<Solution<V>>> {
        match *self {
            Replacement::Generational { elites } => {
                generational(population, offspring, table, elites, size)
            }
            Replacement::MuPlusLambda { density } => {
                let mut union = population;
                union.extend(offspring);
                truncate(union, size, density, comparator)
            }
            Replacement::MuCommaLambda { density } => {
                truncate(offspring, size, density, comparator)
            }
        }
    }
}

fn generational<V>(
    population: Vec<Solution<V>>,
    offspring: Vec<Solution<V>>,
    table: &FitnessTable,
    elites: usize,
    size: usize,
) -> EvoResult<Vec<Solution<V>>> {
    let elites = elites.min(size).min(population.len());
    let needed = size - elites;
    if offspring.len() < needed {
        return Err(EvoError::InsufficientPopulation {
            what: "generational replacement",
            requested: needed,
            available: offspring.len(),
        });
    }

    let keep = table.order();
    let mut slots: Vec<Option<Solution<V>>> = population.into_iter().map(Some).collect();
    let mut next: Vec<Solution<V>> = keep[..elites]
        .iter()
        .map(|&i| slots[i].take().expect("elite indices are distinct"))
        .collect();
    next.extend(offspring.into_iter().take(needed));
    Ok(next)
}

/// Reduces `candidates` to `size` members by front rank and density.
///
/// Survivors come out front by front, in candidate order within a front.
/// Hypervolume contributions are normalized against all candidates.
///
/// # Errors
/// [`EvoError::InsufficientPopulation`] if fewer than `size` candidates are
/// given; ranking and density estimator errors.
pub fn truncate<V>(
    candidates: Vec<Solution<V>>,
    size: usize,
    density: DensityEstimator,
    comparator: &DominanceComparator,
) -> EvoResult<Vec<Solution<V>>> {
    if candidates.len() < size {
        return Err(EvoError::InsufficientPopulation {
            what: "truncation",
            requested: size,
            available: candidates.len(),
        });
    }
    if candidates.len() == size {
        return Ok(candidates);
    }

    let ranking = Ranking::compute(&candidates, comparator)?;
    let reference = objective_matrix(&candidates);
    let mut selected: Vec<usize> = Vec::with_capacity(size);

    for front in ranking.fronts() {
        if selected.len() + front.len() <= size {
            selected.extend_from_slice(front);
            if selected.len() == size {
                break;
            }
            continue;
        }

        let mut remaining = front.clone();
        while selected.len() + remaining.len() > size {
            let objectives: Vec<Vec<f64>> =
                remaining.iter().map(|&i| reference[i].clone()).collect();
            let scores = density.estimate_with_reference(&objectives, &reference)?;
            let worst = worst_index(&scores).expect("truncated front is non-empty");
            remaining.remove(worst);
        }
        selected.extend(remaining);
        break;
    }

    let mut slots: Vec<Option<Solution<V>>> = candidates.into_iter().map(Some).collect();
    Ok(selected
        .into_iter()
        .map(|i| slots[i].take().expect("fronts are disjoint"))
        .collect())
}
