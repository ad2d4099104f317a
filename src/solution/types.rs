//! Solution representation and the problem contract.
//!
//! A [`Solution`] owns three fixed-length vectors: decision variables,
//! objective values and constraint values. The lengths are set when the
//! solution is created and cannot change afterwards; only the values can.
//!
//! All objectives are **minimized**. A constraint value below zero is a
//! violation; the further below zero, the worse.

use crate::error::ProblemError;
use rand::Rng;

/// A candidate solution.
///
/// Rank, density and other per-generation annotations are not stored on the
/// solution; strategies keep them in side tables indexed by population
/// position (see [`Ranking`](crate::ranking::Ranking)).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution<V> {
    variables: Vec<V>,
    objectives: Vec<f64>,
    constraints: Vec<f64>,
}

impl<V> Solution<V> {
    /// Creates an unevaluated solution.
    ///
    /// Objectives start at `f64::INFINITY` (worst possible) and constraints
    /// at `0.0` (satisfied) until the problem evaluates the solution.
    pub fn new(variables: Vec<V>, number_of_objectives: usize, number_of_constraints: usize) -> Self {
        Self {
            variables,
            objectives: vec![f64::INFINITY; number_of_objectives],
            constraints: vec![0.0; number_of_constraints],
        }
    }

    /// Decision variables.
    pub fn variables(&self) -> &[V] {
        &self.variables
    }

    /// Mutable access to decision variable values. The length is fixed.
    pub fn variables_mut(&mut self) -> &mut [V] {
        &mut self.variables
    }

    /// Objective values.
    pub fn objectives(&self) -> &[f64] {
        &self.objectives
    }

    /// Mutable access to objective values. The length is fixed.
    pub fn objectives_mut(&mut self) -> &mut [f64] {
        &mut self.objectives
    }

    /// Sets objective `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn set_objective(&mut self, index: usize, value: f64) {
        self.objectives[index] = value;
    }

    /// Constraint values; negative means violated.
    pub fn constraints(&self) -> &[f64] {
        &self.constraints
    }

    /// Mutable access to constraint values. The length is fixed.
    pub fn constraints_mut(&mut self) -> &mut [f64] {
        &mut self.constraints
    }

    /// Sets constraint `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn set_constraint(&mut self, index: usize, value: f64) {
        self.constraints[index] = value;
    }

    pub fn number_of_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn number_of_objectives(&self) -> usize {
        self.objectives.len()
    }

    pub fn number_of_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Sum of the magnitudes of all violated constraints.
    ///
    /// Zero for a feasible solution, positive otherwise.
    pub fn overall_constraint_violation(&self) -> f64 {
        self.constraints
            .iter()
            .filter(|&&c| c < 0.0)
            .map(|&c| -c)
            .sum()
    }

    /// Number of violated constraints.
    pub fn number_of_violated_constraints(&self) -> usize {
        self.constraints.iter().filter(|&&c| c < 0.0).count()
    }

    /// Whether no constraint is violated.
    pub fn is_feasible(&self) -> bool {
        self.number_of_violated_constraints() == 0
    }
}

/// A population is an ordered sequence of solutions. Order matters for
/// tie-breaking and reproducibility.
pub type Population<V> = Vec<Solution<V>>;

/// Defines an optimization problem.
///
/// The problem creates random solutions and evaluates them. It must be
/// `Send + Sync` because the [`Evaluator`](crate::evaluator::Evaluator) may
/// call [`evaluate`](Problem::evaluate) from several worker threads at once.
///
/// # Implementing
///
/// ```
/// use rand::Rng;
/// use u_evo::{Problem, ProblemError, Solution};
///
/// struct Schaffer;
///
/// impl Problem for Schaffer {
///     type Variable = f64;
///
///     fn number_of_variables(&self) -> usize { 1 }
///     fn number_of_objectives(&self) -> usize { 2 }
///
///     fn create_solution<R: Rng>(&self, rng: &mut R) -> Solution<f64> {
///         Solution::new(vec![rng.random_range(-10.0..10.0)], 2, 0)
///     }
///
///     fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), ProblemError> {
///         let x = solution.variables()[0];
///         solution.set_objective(0, x * x);
///         solution.set_objective(1, (x - 2.0) * (x - 2.0));
///         Ok(())
///     }
/// }
/// ```
pub trait Problem: Send + Sync {
    /// Decision variable type.
    type Variable: Clone + Send + Sync;

    /// Human-readable name used in log output.
    fn name(&self) -> &str {
        "problem"
    }

    fn number_of_variables(&self) -> usize;

    fn number_of_objectives(&self) -> usize;

    fn number_of_constraints(&self) -> usize {
        0
    }

    /// Creates a random, unevaluated solution with the problem's dimensions.
    fn create_solution<R: Rng>(&self, rng: &mut R) -> Solution<Self::Variable>;

    /// Computes objectives (and constraints) of `solution` in place.
    ///
    /// Must not depend on anything but the solution's variables: the
    /// evaluator may run several calls concurrently.
    fn evaluate(&self, solution: &mut Solution<Self::Variable>) -> Result<(), ProblemError>;

    /// Called after every generation with the generation number and the
    /// number of evaluations spent so far. Default: no-op.
    fn on_generation(&self, _generation: usize, _evaluations: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_solution_is_unevaluated() {
        let s: Solution<f64> = Solution::new(vec![0.5, 0.25], 2, 1);
        assert_eq!(s.number_of_variables(), 2);
        assert_eq!(s.number_of_objectives(), 2);
        assert_eq!(s.number_of_constraints(), 1);
        assert!(s.objectives().iter().all(|o| o.is_infinite()));
        assert!(s.is_feasible());
    }

    #[test]
    fn test_constraint_violation_sums_negative_values() {
        let mut s: Solution<bool> = Solution::new(vec![true], 1, 3);
        s.set_constraint(0, -1.5);
        s.set_constraint(1, 2.0);
        s.set_constraint(2, -0.5);
        assert!((s.overall_constraint_violation() - 2.0).abs() < 1e-12);
        assert_eq!(s.number_of_violated_constraints(), 2);
        assert!(!s.is_feasible());
    }

    #[test]
    fn test_zero_constraint_is_satisfied() {
        let mut s: Solution<bool> = Solution::new(vec![false], 1, 1);
        s.set_constraint(0, 0.0);
        assert!(s.is_feasible());
        assert_eq!(s.overall_constraint_violation(), 0.0);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a: Solution<usize> = Solution::new(vec![0, 1, 2], 1, 0);
        a.set_objective(0, 3.0);
        let mut b = a.clone();
        b.variables_mut()[0] = 9;
        b.set_objective(0, 1.0);
        assert_eq!(a.variables(), &[0, 1, 2]);
        assert_eq!(a.objectives(), &[3.0]);
    }
}
