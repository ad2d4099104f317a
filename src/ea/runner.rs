//! Evolutionary loop execution.
//!
//! [`EaRunner`] drives the loop:
//! initialization → evaluation → {selection → variation → evaluation →
//! replacement} until a stopping condition holds.

use super::config::EaConfig;
use super::selection::{FitnessTable, Selection};
use super::variation::Variation;
use crate::comparator::DominanceComparator;
use crate::error::{EvoError, EvoResult};
use crate::evaluator::Evaluator;
use crate::hypervolume::minimum_values;
use crate::random::rng_from_seed;
use crate::solution::{objective_matrix, Problem, Solution};
use log::{debug, info, warn};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Snapshot taken after initialization and after every generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// 0 for the initial population.
    pub generation: usize,
    /// Evaluations spent so far.
    pub evaluations: usize,
    /// Size of the first front.
    pub front_size: usize,
    /// Per-objective minimum over the population.
    pub ideal_point: Vec<f64>,
}

/// Result of a run.
#[derive(Debug, Clone)]
pub struct EaResult<V> {
    /// Final population.
    pub population: Vec<Solution<V>>,

    /// Indices of the final population's first front.
    pub front: Vec<usize>,

    /// Total number of evaluations.
    pub evaluations: usize,

    /// Total number of generations executed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Wall-clock time of the run.
    pub computing_time: Duration,

    /// One entry per generation, initial population first.
    pub history: Vec<GenerationStats>,
}

impl<V> EaResult<V> {
    /// Members of the final first front.
    pub fn non_dominated(&self) -> Vec<&Solution<V>> {
        self.front.iter().map(|&i| &self.population[i]).collect()
    }

    /// First-front member with the lowest first objective. For a
    /// single-objective problem this is the best solution found.
    pub fn best(&self) -> Option<&Solution<V>> {
        self.front
            .iter()
            .map(|&i| &self.population[i])
            .min_by(|a, b| a.objectives()[0].total_cmp(&b.objectives()[0]))
    }
}

/// Executes the evolutionary loop.
///
/// # Usage
///
/// ```
/// use rand::Rng;
/// use u_evo::ea::{CrossoverAndMutation, EaConfig, EaRunner};
/// use u_evo::operators::{BitFlipMutation, SinglePointCrossover};
/// use u_evo::{Problem, ProblemError, Solution};
///
/// struct OneMax;
///
/// impl Problem for OneMax {
///     type Variable = bool;
///     fn number_of_variables(&self) -> usize { 16 }
///     fn number_of_objectives(&self) -> usize { 1 }
///     fn create_solution<R: Rng>(&self, rng: &mut R) -> Solution<bool> {
///         Solution::new((0..16).map(|_| rng.random_bool(0.5)).collect(), 1, 0)
///     }
///     fn evaluate(&self, s: &mut Solution<bool>) -> Result<(), ProblemError> {
///         let ones = s.variables().iter().filter(|&&b| b).count();
///         s.set_objective(0, -(ones as f64));
///         Ok(())
///     }
/// }
///
/// let variation = CrossoverAndMutation::new(
///     SinglePointCrossover::new(0.9).unwrap(),
///     BitFlipMutation::new(1.0 / 16.0).unwrap(),
/// );
/// let config = EaConfig::nsga2(10)
///     .with_max_evaluations(2_000)
///     .with_parallel(false)
///     .with_seed(1);
/// let result = EaRunner::run(&OneMax, &variation, &config).unwrap();
/// assert!(result.best().unwrap().objectives()[0] <= -12.0);
/// ```
pub struct EaRunner;

impl EaRunner {
    /// Runs the loop with an RNG seeded from `config.seed`.
    ///
    /// # Errors
    /// [`EvoError::InvalidConfig`] for an invalid configuration or a
    /// strategy that does not fit the problem; evaluation errors abort the
    /// run.
    pub fn run<P, X>(
        problem: &P,
        variation: &X,
        config: &EaConfig,
    ) -> EvoResult<EaResult<P::Variable>>
    where
        P: Problem,
        X: Variation<P::Variable>,
    {
        Self::run_with_cancel(problem, variation, config, None)
    }

    /// Runs the loop with an optional cancellation token.
    ///
    /// If the flag is set, the run stops at the next generation boundary
    /// and returns the population as it stands.
    pub fn run_with_cancel<P, X>(
        problem: &P,
        variation: &X,
        config: &EaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> EvoResult<EaResult<P::Variable>>
    where
        P: Problem,
        X: Variation<P::Variable>,
    {
        let mut rng = rng_from_seed(config.seed);
        Self::run_with_rng(problem, variation, config, &mut rng, cancel)
    }

    /// Runs the loop drawing every random decision from `rng`.
    /// `config.seed` is ignored.
    pub fn run_with_rng<P, X, R>(
        problem: &P,
        variation: &X,
        config: &EaConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> EvoResult<EaResult<P::Variable>>
    where
        P: Problem,
        X: Variation<P::Variable>,
        R: Rng,
    {
        config.validate()?;
        let objectives = problem.number_of_objectives();
        if objectives == 0 {
            return Err(EvoError::InvalidConfig(
                "problem must have at least one objective".into(),
            ));
        }
        if config.selection == Selection::Roulette && objectives != 1 {
            return Err(EvoError::InvalidConfig(format!(
                "roulette selection needs a single objective, problem has {objectives}"
            )));
        }
        let parents_per_call = variation.parents_per_call();
        if parents_per_call == 0 {
            return Err(EvoError::InvalidConfig(
                "variation must consume at least one parent".into(),
            ));
        }

        let evaluator = match (config.parallel, config.worker_threads) {
            (false, _) => Evaluator::sequential(),
            (true, Some(threads)) => Evaluator::parallel(threads)?,
            (true, None) => Evaluator::parallel_default()?,
        };
        let comparator =
            DominanceComparator::new().with_constraint_handling(config.constraint_handling);

        info!(
            "{}: population {}, offspring {}, selection {:?}, replacement {}, {} evaluation thread(s)",
            problem.name(),
            config.population_size,
            config.offspring_size,
            config.selection,
            config.replacement.name(),
            evaluator.threads()
        );

        let start = Instant::now();

        // 1. Initialize and evaluate
        let mut population: Vec<Solution<P::Variable>> = (0..config.population_size)
            .map(|_| problem.create_solution(rng))
            .collect();
        for s in &population {
            if s.number_of_objectives() != objectives {
                return Err(EvoError::DimensionMismatch {
                    expected: objectives,
                    found: s.number_of_objectives(),
                });
            }
        }
        evaluator.evaluate(problem, &mut population)?;
        let mut evaluations = population.len();
        let mut table = FitnessTable::compute(&population, &comparator)?;

        let mut history = vec![stats(0, evaluations, &population, &table)];
        let mut generations = 0usize;
        let mut cancelled = false;

        // 2. Evolutionary loop
        loop {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if stopping_condition_reached(config, evaluations, generations, start) {
                break;
            }

            let offspring_count = config.offspring_size;
            let mut offspring: Vec<Solution<P::Variable>> = Vec::with_capacity(offspring_count);
            while offspring.len() < offspring_count {
                let pool =
                    config
                        .selection
                        .mating_pool(&population, &table, parents_per_call, rng);
                let parents: Vec<&Solution<P::Variable>> =
                    pool.iter().map(|&i| &population[i]).collect();
                let children = variation.vary(&parents, rng);
                if children.is_empty() {
                    return Err(EvoError::InvalidConfig(
                        "variation produced no offspring".into(),
                    ));
                }
                let room = offspring_count - offspring.len();
                offspring.extend(children.into_iter().take(room));
            }

            evaluator.evaluate(problem, &mut offspring)?;
            evaluations += offspring.len();

            population = config.replacement.replace(
                population,
                offspring,
                &table,
                config.population_size,
                &comparator,
            )?;
            table = FitnessTable::compute(&population, &comparator)?;
            generations += 1;

            let snapshot = stats(generations, evaluations, &population, &table);
            debug!(
                "generation {}: {} evaluations, first front {}",
                generations, evaluations, snapshot.front_size
            );
            history.push(snapshot);
            problem.on_generation(generations, evaluations);
        }

        let computing_time = start.elapsed();
        if cancelled {
            warn!(
                "{}: cancelled after {} generations ({} evaluations)",
                problem.name(),
                generations,
                evaluations
            );
        }
        let front = table.first_front().to_vec();
        info!(
            "{}: finished after {} generations, {} evaluations in {:.3}s; first front {}",
            problem.name(),
            generations,
            evaluations,
            computing_time.as_secs_f64(),
            front.len()
        );

        Ok(EaResult {
            population,
            front,
            evaluations,
            generations,
            cancelled,
            computing_time,
            history,
        })
    }
}

fn stopping_condition_reached(
    config: &EaConfig,
    evaluations: usize,
    generations: usize,
    start: Instant,
) -> bool {
    config.max_evaluations.is_some_and(|max| evaluations >= max)
        || config.max_generations.is_some_and(|max| generations >= max)
        || config
            .time_limit_ms
            .is_some_and(|ms| start.elapsed().as_millis() >= u128::from(ms))
}

fn stats<V>(
    generation: usize,
    evaluations: usize,
    population: &[Solution<V>],
    table: &FitnessTable,
) -> GenerationStats {
    GenerationStats {
        generation,
        evaluations,
        front_size: table.first_front().len(),
        ideal_point: minimum_values(&objective_matrix(population)),
    }
}
