//! Population-based multi-objective evolutionary optimization.
//!
//! Users define a problem by implementing [`Problem`]; the library supplies
//! the machinery that turns evaluated populations into good Pareto front
//! approximations:
//!
//! - **Dominance**: Pareto comparison with optional constraint handling
//!   ([`DominanceComparator`]).
//! - **Ranking**: fast non-dominated sorting into fronts ([`Ranking`]).
//! - **Density**: crowding distance and exclusive hypervolume contribution
//!   ([`DensityEstimator`]).
//! - **Hypervolume**: exact WFG computation of the hypervolume indicator and
//!   per-point contributions ([`hypervolume`]).
//! - **Archive**: bounded non-dominated archive ([`BoundedArchive`]).
//! - **Evaluation**: sequential or on a worker pool ([`Evaluator`]).
//! - **Evolutionary loop**: one driver composed of selection, variation and
//!   replacement strategies; NSGA-II, SMS-EMOA and GA variants are presets
//!   ([`ea`]).
//! - **Operators**: binary, real-coded and permutation variation
//!   ([`operators`]).
//! - **Output**: VAR/FUN text dump ([`SolutionListOutput`]).
//!
//! All objectives are minimized. Maximization objectives must be negated by
//! the problem.
//!
//! # Randomness
//!
//! Every random decision is drawn from an RNG passed in by the caller or
//! created from [`EaConfig::seed`](ea::EaConfig::seed); there is no global
//! generator. Two runs with the same seed produce identical populations.

pub mod archive;
pub mod comparator;
pub mod density;
pub mod ea;
pub mod error;
pub mod evaluator;
pub mod hypervolume;
pub mod operators;
pub mod output;
pub mod random;
pub mod ranking;
pub mod solution;

pub use archive::BoundedArchive;
pub use comparator::{dominance_cmp, dominates, Dominance, DominanceComparator};
pub use density::{crowding_distance, DensityEstimator};
pub use ea::{EaConfig, EaResult, EaRunner, GenerationStats, Replacement, Selection};
pub use error::{EvoError, EvoResult, ProblemError};
pub use evaluator::Evaluator;
pub use hypervolume::{hypervolume, hypervolume_contributions, Hypervolume};
pub use output::{SolutionListOutput, VariableFormat};
pub use ranking::Ranking;
pub use solution::{Population, Problem, Solution};
