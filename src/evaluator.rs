//! Population evaluation, sequential or on a bounded worker pool.
//!
//! Evaluation is the only place where problem code runs, and usually the
//! most expensive step of a generation. Results are written back in place,
//! so the output order always equals the input order regardless of which
//! worker finished first.

use crate::error::{EvoError, EvoResult};
use crate::solution::{Problem, Solution};
use rayon::prelude::*;

/// Evaluates solutions against a [`Problem`].
///
/// # Examples
///
/// ```
/// use u_evo::Evaluator;
///
/// let sequential = Evaluator::sequential();
/// assert!(!sequential.is_parallel());
///
/// let pooled = Evaluator::parallel(2).unwrap();
/// assert_eq!(pooled.threads(), 2);
/// ```
#[derive(Debug)]
pub struct Evaluator {
    pool: Option<rayon::ThreadPool>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::sequential()
    }
}

impl Evaluator {
    /// Evaluates on the calling thread.
    pub fn sequential() -> Self {
        Self { pool: None }
    }

    /// Evaluates on a dedicated pool of `threads` workers.
    ///
    /// # Errors
    /// [`EvoError::InvalidConfig`] if `threads` is zero,
    /// [`EvoError::WorkerPool`] if the pool cannot be spawned.
    pub fn parallel(threads: usize) -> EvoResult<Self> {
        if threads == 0 {
            return Err(EvoError::InvalidConfig(
                "worker thread count must be at least 1".into(),
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("u-evo-eval-{i}"))
            .build()
            .map_err(|e| EvoError::WorkerPool(e.to_string()))?;
        Ok(Self { pool: Some(pool) })
    }

    /// Evaluates on a pool sized to the number of logical CPUs.
    pub fn parallel_default() -> EvoResult<Self> {
        let threads = std::thread::available_parallelism().map_or(1, |n| n.get());
        Self::parallel(threads)
    }

    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// Worker count; 1 when sequential.
    pub fn threads(&self) -> usize {
        self.pool
            .as_ref()
            .map_or(1, rayon::ThreadPool::current_num_threads)
    }

    /// Evaluates a single solution on the calling thread. `index` is the
    /// solution's position in the caller's batch and is reported on failure.
    pub fn evaluate_one<P: Problem>(
        &self,
        problem: &P,
        solution: &mut Solution<P::Variable>,
        index: usize,
    ) -> EvoResult<()> {
        problem
            .evaluate(solution)
            .map_err(|source| EvoError::Evaluation { index, source })
    }

    /// Evaluates every solution in place.
    ///
    /// All solutions are attempted even if one fails; the reported error is
    /// the one with the lowest index.
    pub fn evaluate<P: Problem>(
        &self,
        problem: &P,
        solutions: &mut [Solution<P::Variable>],
    ) -> EvoResult<()> {
        let outcomes: Vec<_> = match &self.pool {
            None => solutions.iter_mut().map(|s| problem.evaluate(s)).collect(),
            Some(pool) => pool.install(|| {
                solutions
                    .par_iter_mut()
                    .map(|s| problem.evaluate(s))
                    .collect()
            }),
        };

        match outcomes
            .into_iter()
            .enumerate()
            .find_map(|(index, r)| r.err().map(|e| (index, e)))
        {
            Some((index, source)) => Err(EvoError::Evaluation { index, source }),
            None => Ok(()),
        }
    }
}
