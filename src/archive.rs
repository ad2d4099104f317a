//! Capacity-bounded archive of mutually non-dominated solutions.
//!
//! # Insertion rules
//!
//! 1. A candidate dominated by any member is rejected.
//! 2. Members dominated by the candidate are removed.
//! 3. A candidate whose objective vector equals a member's is rejected.
//! 4. Otherwise the candidate is appended; if the archive now exceeds its
//!    capacity, the member with the lowest density score is evicted.
//!
//! Ties for the lowest score evict the most recently added member.

use crate::comparator::{Dominance, DominanceComparator};
use crate::density::{worst_index, DensityEstimator};
use crate::error::{EvoError, EvoResult};
use crate::solution::{objective_matrix, Solution};

/// Non-dominated archive holding at most `capacity` solutions.
///
/// # Example
///
/// ```
/// use u_evo::{BoundedArchive, DensityEstimator, Solution};
///
/// let mut archive = BoundedArchive::new(2, DensityEstimator::CrowdingDistance).unwrap();
/// for objectives in [[1.0, 4.0], [4.0, 1.0], [5.0, 5.0]] {
///     let mut s: Solution<f64> = Solution::new(vec![0.0], 2, 0);
///     s.objectives_mut().copy_from_slice(&objectives);
///     archive.add(s).unwrap();
/// }
/// // (5, 5) was dominated and never entered.
/// assert_eq!(archive.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct BoundedArchive<V> {
    capacity: usize,
    estimator: DensityEstimator,
    comparator: DominanceComparator,
    members: Vec<Solution<V>>,
}

impl<V: Clone> BoundedArchive<V> {
    /// Creates an empty archive.
    ///
    /// # Errors
    /// [`EvoError::InvalidConfig`] if `capacity` is zero or the estimator's
    /// parameters are out of range.
    pub fn new(capacity: usize, estimator: DensityEstimator) -> EvoResult<Self> {
        if capacity == 0 {
            return Err(EvoError::InvalidConfig(
                "archive capacity must be at least 1".into(),
            ));
        }
        estimator.validate()?;
        Ok(Self {
            capacity,
            estimator,
            comparator: DominanceComparator::new(),
            members: Vec::with_capacity(capacity + 1),
        })
    }

    /// Replaces the dominance comparator.
    pub fn with_comparator(mut self, comparator: DominanceComparator) -> Self {
        self.comparator = comparator;
        self
    }

    /// Offers `candidate` to the archive.
    ///
    /// Returns `true` if the candidate is a member afterwards.
    ///
    /// # Errors
    /// [`EvoError::DimensionMismatch`] if the candidate's objective count
    /// differs from the members'; estimator errors on overflow.
    pub fn add(&mut self, candidate: Solution<V>) -> EvoResult<bool> {
        if let Some(first) = self.members.first() {
            if first.number_of_objectives() != candidate.number_of_objectives() {
                return Err(EvoError::DimensionMismatch {
                    expected: first.number_of_objectives(),
                    found: candidate.number_of_objectives(),
                });
            }
        }

        let mut i = 0;
        while i < self.members.len() {
            match self.comparator.compare(&candidate, &self.members[i]) {
                Dominance::Right => return Ok(false),
                Dominance::Left => {
                    self.members.remove(i);
                }
                Dominance::Neither => {
                    if self.members[i].objectives() == candidate.objectives() {
                        return Ok(false);
                    }
                    i += 1;
                }
            }
        }

        self.members.push(candidate);
        if self.members.len() <= self.capacity {
            return Ok(true);
        }

        let scores = self.estimator.estimate(&objective_matrix(&self.members))?;
        let worst = worst_index(&scores).expect("archive over capacity is non-empty");
        let candidate_index = self.members.len() - 1;
        self.members.remove(worst);
        Ok(worst != candidate_index)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn estimator(&self) -> DensityEstimator {
        self.estimator
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Current members in insertion order.
    pub fn solutions(&self) -> &[Solution<V>] {
        &self.members
    }

    pub fn into_solutions(self) -> Vec<Solution<V>> {
        self.members
    }
}
