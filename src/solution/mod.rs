//! Solutions, populations and the problem contract.

mod types;

pub use types::{Population, Problem, Solution};

/// Extracts the objective vectors of `solutions`, preserving order.
pub fn objective_matrix<V>(solutions: &[Solution<V>]) -> Vec<Vec<f64>> {
    solutions.iter().map(|s| s.objectives().to_vec()).collect()
}
