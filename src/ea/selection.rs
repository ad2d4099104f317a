//! Parent selection for the evolutionary loop.
//!
//! Selection works on population indices. Rank and crowding distance are
//! kept in a [`FitnessTable`] next to the population instead of on the
//! solutions themselves, and rebuilt after every replacement.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective GA: NSGA-II"

use crate::comparator::DominanceComparator;
use crate::density::crowding_distance;
use crate::error::EvoResult;
use crate::ranking::Ranking;
use crate::solution::Solution;
use rand::Rng;
use std::cmp::Ordering;

/// Dominance rank and crowding distance of every population member.
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessTable {
    ranking: Ranking,
    crowding: Vec<f64>,
}

impl FitnessTable {
    /// Ranks `population` and computes crowding distance per front.
    ///
    /// # Errors
    /// Propagates [`Ranking::compute`] errors.
    pub fn compute<V>(
        population: &[Solution<V>],
        comparator: &DominanceComparator,
    ) -> EvoResult<Self> {
        let ranking = Ranking::compute(population, comparator)?;
        let mut crowding = vec![0.0; population.len()];
        for front in ranking.fronts() {
            let objectives: Vec<Vec<f64>> = front
                .iter()
                .map(|&i| population[i].objectives().to_vec())
                .collect();
            for (&i, d) in front.iter().zip(crowding_distance(&objectives)) {
                crowding[i] = d;
            }
        }
        Ok(Self { ranking, crowding })
    }

    pub fn len(&self) -> usize {
        self.crowding.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crowding.is_empty()
    }

    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    pub fn rank(&self, index: usize) -> usize {
        self.ranking.rank(index)
    }

    pub fn crowding_distance(&self, index: usize) -> f64 {
        self.crowding[index]
    }

    /// Indices of the first front.
    pub fn first_front(&self) -> &[usize] {
        self.ranking.front(0)
    }

    /// Crowded comparison: lower rank wins, then larger crowding distance.
    /// `Less` means `a` is preferred.
    pub fn crowded_cmp(&self, a: usize, b: usize) -> Ordering {
        self.rank(a)
            .cmp(&self.rank(b))
            .then_with(|| self.crowding[b].total_cmp(&self.crowding[a]))
    }

    /// All indices, best first; equal members keep population order.
    pub fn order(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.sort_by(|&a, &b| self.crowded_cmp(a, b));
        indices
    }
}

/// Parent selection strategy.
///
/// # Examples
///
/// ```
/// use u_evo::ea::Selection;
///
/// // Binary tournament on the crowded comparison (NSGA-II)
/// let sel = Selection::Tournament(2);
///
/// // Uniform random mating (SMS-EMOA)
/// let sel = Selection::Random;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Pick `k` members at random and keep the best by crowded comparison.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Uniform choice with replacement.
    Random,

    /// Linear ranking over the crowded order; the best member gets weight
    /// `n`, the worst weight 1.
    ///
    /// Reference: Baker (1985), "Adaptive Selection Methods for Genetic
    /// Algorithms"
    ///
    /// # Complexity
    /// O(n log n) per selection
    Rank,

    /// Fitness-proportionate selection on the single objective.
    ///
    /// Only defined for single-objective problems; the runner rejects it
    /// otherwise.
    ///
    /// # Complexity
    /// O(n) per selection
    Roulette,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(2)
    }
}

impl Selection {
    /// Selects one parent index.
    ///
    /// # Panics
    /// Panics if `population` is empty or `table` does not describe it.
    pub fn select<V, R: Rng>(
        &self,
        population: &[Solution<V>],
        table: &FitnessTable,
        rng: &mut R,
    ) -> usize {
        assert!(!population.is_empty(), "cannot select from empty population");
        assert_eq!(population.len(), table.len(), "fitness table is stale");

        match self {
            Selection::Tournament(k) => tournament(table, *k, rng),
            Selection::Random => rng.random_range(0..population.len()),
            Selection::Rank => rank(table, rng),
            Selection::Roulette => roulette(population, rng),
        }
    }

    /// Draws `size` parent indices with replacement.
    pub fn mating_pool<V, R: Rng>(
        &self,
        population: &[Solution<V>],
        table: &FitnessTable,
        size: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        (0..size)
            .map(|_| self.select(population, table, rng))
            .collect()
    }
}

fn tournament<R: Rng>(table: &FitnessTable, k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = table.len();

    let mut best = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if table.crowded_cmp(idx, best) == Ordering::Less {
            best = idx;
        }
    }
    best
}

fn rank<R: Rng>(table: &FitnessTable, rng: &mut R) -> usize {
    let n = table.len();
    if n == 1 {
        return 0;
    }

    let order = table.order();
    let total = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (position, &index) in order.iter().enumerate() {
        cumulative += (n - position) as f64;
        if cumulative > threshold {
            return index;
        }
    }
    order[n - 1]
}

/// Weight of member `i` is `max - f_i + epsilon` on the first objective.
fn roulette<V, R: Rng>(population: &[Solution<V>], rng: &mut R) -> usize {
    let n = population.len();
    if n == 1 {
        return 0;
    }

    let values: Vec<f64> = population.iter().map(|s| s.objectives()[0]).collect();
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let epsilon = 1e-10;
    let weights: Vec<f64> = values
        .iter()
        .map(|&v| {
            let w = max - v + epsilon;
            if w.is_finite() && w > 0.0 {
                w
            } else {
                epsilon
            }
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }
    n - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn population(objectives: &[&[f64]]) -> Vec<Solution<u8>> {
        objectives
            .iter()
            .map(|o| {
                let mut s = Solution::new(vec![], o.len(), 0);
                s.objectives_mut().copy_from_slice(o);
                s
            })
            .collect()
    }

    fn bi_objective() -> Vec<Solution<u8>> {
        population(&[
            &[1.0, 4.0],
            &[2.0, 2.0],
            &[4.0, 1.0],
            &[3.0, 3.0],
            &[5.0, 5.0],
        ])
    }

    fn table(pop: &[Solution<u8>]) -> FitnessTable {
        FitnessTable::compute(pop, &DominanceComparator::new()).unwrap()
    }

    #[test]
    fn test_fitness_table_ranks_and_crowding() {
        let pop = bi_objective();
        let t = table(&pop);
        assert_eq!(t.first_front(), &[0, 1, 2]);
        assert_eq!(t.rank(3), 1);
        assert_eq!(t.rank(4), 2);
        assert!(t.crowding_distance(0).is_infinite());
        assert!(t.crowding_distance(2).is_infinite());
        // (4 - 1) / 3 + (4 - 1) / 3
        assert!((t.crowding_distance(1) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_crowded_order() {
        let pop = bi_objective();
        let t = table(&pop);
        assert_eq!(t.order(), vec![0, 2, 1, 3, 4]);
        assert_eq!(t.crowded_cmp(1, 3), Ordering::Less);
        assert_eq!(t.crowded_cmp(0, 2), Ordering::Equal);
    }

    #[test]
    fn test_tournament_prefers_better() {
        let pop = bi_objective();
        let t = table(&pop);
        let mut rng = create_rng(42);
        let mut counts = [0usize; 5];
        for _ in 0..2000 {
            counts[Selection::Tournament(3).select(&pop, &t, &mut rng)] += 1;
        }
        assert!(counts[0] > counts[3], "counts {counts:?}");
        assert!(counts[3] > counts[4], "counts {counts:?}");
    }

    #[test]
    fn test_tournament_size_one_is_random() {
        let pop = bi_objective();
        let t = table(&pop);
        let mut rng = create_rng(7);
        let mut seen = [false; 5];
        for _ in 0..200 {
            seen[Selection::Tournament(1).select(&pop, &t, &mut rng)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_rank_selection_bias() {
        let pop = bi_objective();
        let t = table(&pop);
        let mut rng = create_rng(42);
        let mut counts = [0usize; 5];
        for _ in 0..3000 {
            counts[Selection::Rank.select(&pop, &t, &mut rng)] += 1;
        }
        // Weights 5 (idx 0) vs 1 (idx 4).
        assert!(counts[0] > 2 * counts[4], "counts {counts:?}");
    }

    #[test]
    fn test_roulette_single_objective() {
        let pop = population(&[&[10.0], &[0.0], &[5.0]]);
        let t = table(&pop);
        let mut rng = create_rng(42);
        let mut counts = [0usize; 3];
        for _ in 0..3000 {
            counts[Selection::Roulette.select(&pop, &t, &mut rng)] += 1;
        }
        assert!(counts[1] > counts[2]);
        // The worst member only carries the epsilon weight.
        assert!(counts[0] < 5, "counts {counts:?}");
    }

    #[test]
    fn test_mating_pool_size() {
        let pop = bi_objective();
        let t = table(&pop);
        let mut rng = create_rng(3);
        let pool = Selection::Random.mating_pool(&pop, &t, 12, &mut rng);
        assert_eq!(pool.len(), 12);
        assert!(pool.iter().all(|&i| i < pop.len()));
    }

    #[test]
    fn test_single_member_population() {
        let pop = population(&[&[1.0, 1.0]]);
        let t = table(&pop);
        let mut rng = create_rng(1);
        for sel in [
            Selection::Tournament(2),
            Selection::Random,
            Selection::Rank,
            Selection::Roulette,
        ] {
            assert_eq!(sel.select(&pop, &t, &mut rng), 0);
        }
    }

    #[test]
    #[should_panic(expected = "empty population")]
    fn test_empty_population_panics() {
        let pop = bi_objective();
        let t = table(&pop);
        let mut rng = create_rng(1);
        Selection::Random.select::<u8, _>(&[], &t, &mut rng);
    }
}
