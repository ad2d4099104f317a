//! Fast non-dominated sorting.
//!
//! Partitions a population into Pareto fronts: front 0 holds the solutions
//! no other solution dominates, front 1 those dominated only by front 0,
//! and so on.
//!
//! # Algorithm (Deb et al., 2002)
//!
//! 1. For each pair of solutions, determine dominance
//! 2. Solutions dominated by no other belong to front 0
//! 3. Remove front 0, repeat to find subsequent fronts
//!
//! # Complexity
//!
//! O(m · n²) comparisons for n solutions with m objectives.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II",
//!   IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use crate::comparator::{dominance_cmp, Dominance, DominanceComparator};
use crate::error::{EvoError, EvoResult};
use crate::solution::Solution;

/// Pareto ranks and fronts of a population.
///
/// `ranks[i]` is the front index of population member `i`; `fronts[k]`
/// lists the members of front `k` in ascending population order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking {
    ranks: Vec<usize>,
    fronts: Vec<Vec<usize>>,
}

impl Ranking {
    /// Ranks solutions with `comparator`.
    ///
    /// # Errors
    /// [`EvoError::Empty`] for an empty population,
    /// [`EvoError::DimensionMismatch`] if objective counts differ.
    pub fn compute<V>(
        population: &[Solution<V>],
        comparator: &DominanceComparator,
    ) -> EvoResult<Self> {
        let first = population.first().ok_or(EvoError::Empty {
            what: "population",
        })?;
        check_dimensions(
            first.number_of_objectives(),
            population.iter().map(|s| s.number_of_objectives()),
        )?;
        Ok(sort_by(population.len(), |i, j| {
            comparator.compare(&population[i], &population[j])
        }))
    }

    /// Ranks raw objective vectors by plain Pareto dominance.
    ///
    /// # Example
    ///
    /// ```
    /// use u_evo::Ranking;
    ///
    /// let objectives = vec![
    ///     vec![1.0, 5.0],
    ///     vec![3.0, 3.0],
    ///     vec![5.0, 1.0],
    ///     vec![4.0, 4.0], // dominated by (3, 3)
    /// ];
    /// let ranking = Ranking::from_objectives(&objectives).unwrap();
    /// assert_eq!(ranking.ranks(), &[0, 0, 0, 1]);
    /// assert_eq!(ranking.front(1), &[3]);
    /// ```
    pub fn from_objectives(objectives: &[Vec<f64>]) -> EvoResult<Self> {
        let first = objectives.first().ok_or(EvoError::Empty {
            what: "objective set",
        })?;
        check_dimensions(first.len(), objectives.iter().map(Vec::len))?;
        Ok(sort_by(objectives.len(), |i, j| {
            dominance_cmp(&objectives[i], &objectives[j])
        }))
    }

    /// Number of fronts.
    pub fn number_of_fronts(&self) -> usize {
        self.fronts.len()
    }

    /// Members of front `index`.
    ///
    /// # Panics
    /// Panics if `index >= number_of_fronts()`.
    pub fn front(&self, index: usize) -> &[usize] {
        &self.fronts[index]
    }

    pub fn fronts(&self) -> &[Vec<usize>] {
        &self.fronts
    }

    /// Front index of population member `index`.
    pub fn rank(&self, index: usize) -> usize {
        self.ranks[index]
    }

    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    /// Number of ranked solutions.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

fn check_dimensions(expected: usize, lengths: impl Iterator<Item = usize>) -> EvoResult<()> {
    for found in lengths {
        if found != expected {
            return Err(EvoError::DimensionMismatch { expected, found });
        }
    }
    Ok(())
}

/// Core sort over `n` items with a pairwise dominance oracle.
fn sort_by<F>(n: usize, cmp: F) -> Ranking
where
    F: Fn(usize, usize) -> Dominance,
{
    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];
    let mut front_0 = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            match cmp(i, j) {
                Dominance::Left => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }

        // Every pair involving i has been compared by now.
        if domination_count[i] == 0 {
            front_0.push(i);
        }
    }

    let mut fronts = vec![front_0];
    loop {
        let current = fronts
            .last()
            .expect("fronts is initialized with front_0; never empty");
        let mut next_front = Vec::new();

        for &i in current {
            for &j in &dominated_by[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len();
                    next_front.push(j);
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        next_front.sort_unstable();
        fronts.push(next_front);
    }

    Ranking { ranks, fronts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::dominates;
    use proptest::prelude::*;

    fn rank(objs: &[Vec<f64>]) -> Ranking {
        Ranking::from_objectives(objs).unwrap()
    }

    #[test]
    fn test_single_solution() {
        let result = rank(&[vec![1.0, 2.0]]);
        assert_eq!(result.ranks(), &[0]);
        assert_eq!(result.number_of_fronts(), 1);
        assert_eq!(result.front(0), &[0]);
    }

    #[test]
    fn test_clear_dominance_chain() {
        let result = rank(&[vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0]]);
        assert_eq!(result.ranks(), &[0, 1, 2]);
        assert_eq!(result.number_of_fronts(), 3);
    }

    #[test]
    fn test_mixed_fronts() {
        let result = rank(&[
            vec![1.0, 5.0],
            vec![3.0, 3.0],
            vec![5.0, 1.0],
            vec![4.0, 4.0], // dominated by (3,3)
            vec![6.0, 6.0], // dominated by (4,4) as well
        ]);
        assert_eq!(result.ranks(), &[0, 0, 0, 1, 2]);
        assert_eq!(result.front(0), &[0, 1, 2]);
    }

    #[test]
    fn test_duplicates_share_a_front() {
        let result = rank(&[vec![2.0, 2.0], vec![2.0, 2.0], vec![2.0, 2.0]]);
        assert!(result.ranks().iter().all(|&r| r == 0));
    }

    #[test]
    fn test_three_objectives_all_nondominated() {
        let result = rank(&[
            vec![1.0, 5.0, 3.0],
            vec![3.0, 1.0, 5.0],
            vec![5.0, 3.0, 1.0],
            vec![4.0, 4.0, 4.0],
        ]);
        assert!(result.ranks().iter().all(|&r| r == 0));
    }

    #[test]
    fn test_empty_is_error() {
        assert!(matches!(
            Ranking::from_objectives(&[]),
            Err(EvoError::Empty { .. })
        ));
    }

    #[test]
    fn test_mismatched_dimensions_is_error() {
        let err = Ranking::from_objectives(&[vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert!(matches!(
            err,
            EvoError::DimensionMismatch {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_constraint_handling_reorders_fronts() {
        let mut good_but_infeasible: Solution<f64> = Solution::new(vec![0.0], 2, 1);
        good_but_infeasible
            .objectives_mut()
            .copy_from_slice(&[0.0, 0.0]);
        good_but_infeasible.set_constraint(0, -1.0);
        let mut feasible: Solution<f64> = Solution::new(vec![0.0], 2, 1);
        feasible.objectives_mut().copy_from_slice(&[1.0, 1.0]);

        let population = vec![good_but_infeasible, feasible];
        let ranking = Ranking::compute(&population, &DominanceComparator::new()).unwrap();
        assert_eq!(ranking.ranks(), &[1, 0]);

        let ranking =
            Ranking::compute(&population, &DominanceComparator::without_constraints()).unwrap();
        assert_eq!(ranking.ranks(), &[0, 1]);
    }

    fn objective_sets() -> impl Strategy<Value = Vec<Vec<f64>>> {
        (1usize..4).prop_flat_map(|m| {
            prop::collection::vec(prop::collection::vec(0u8..6, m), 1..30).prop_map(|rows| {
                rows.into_iter()
                    .map(|r| r.into_iter().map(f64::from).collect())
                    .collect()
            })
        })
    }

    proptest! {
        #[test]
        fn prop_fronts_partition_population(objs in objective_sets()) {
            let ranking = rank(&objs);
            let mut seen = vec![false; objs.len()];
            for (k, front) in ranking.fronts().iter().enumerate() {
                prop_assert!(!front.is_empty());
                for &i in front {
                    prop_assert!(!seen[i]);
                    seen[i] = true;
                    prop_assert_eq!(ranking.rank(i), k);
                }
            }
            prop_assert!(seen.into_iter().all(|s| s));
        }

        #[test]
        fn prop_no_member_dominated_within_its_front(objs in objective_sets()) {
            let ranking = rank(&objs);
            for front in ranking.fronts() {
                for &i in front {
                    for &j in front {
                        prop_assert!(!dominates(&objs[i], &objs[j]));
                    }
                }
            }
        }

        #[test]
        fn prop_every_later_member_dominated_by_previous_front(objs in objective_sets()) {
            let ranking = rank(&objs);
            for k in 1..ranking.number_of_fronts() {
                for &j in ranking.front(k) {
                    let covered = ranking
                        .front(k - 1)
                        .iter()
                        .any(|&i| dominates(&objs[i], &objs[j]));
                    prop_assert!(covered);
                }
            }
        }
    }
}
