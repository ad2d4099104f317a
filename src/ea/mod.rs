//! Evolutionary loop built from interchangeable strategies.
//!
//! An algorithm is a bundle of strategies held by an [`EaConfig`]:
//! a [`Selection`] for mating, a [`Variation`] turning parents into
//! offspring, and a [`Replacement`] choosing survivors. [`EaRunner`] is the
//! single loop driver for all of them.
//!
//! | Algorithm | Selection | Offspring | Replacement |
//! |---|---|---|---|
//! | NSGA-II | `Tournament(2)` | μ | `MuPlusLambda` + crowding distance |
//! | SMS-EMOA | `Random` | 1 | `MuPlusLambda` + hypervolume contribution |
//! | Generational GA | `Tournament(2)` | μ − elites | `Generational { elites }` |
//! | Steady-state GA | `Tournament(2)` | 1 | `MuPlusLambda` + crowding distance |
//! | (μ,λ) | `Random` | λ | `MuCommaLambda` |
//!
//! # References
//!
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*
//! - Beume, Naujoks & Emmerich (2007), *SMS-EMOA: Multiobjective selection
//!   based on dominated hypervolume*

mod config;
mod replacement;
mod runner;
mod selection;
mod variation;

pub use crate::operators::{Crossover, Mutation};
pub use config::EaConfig;
pub use replacement::{truncate, Replacement};
pub use runner::{EaResult, EaRunner, GenerationStats};
pub use selection::{FitnessTable, Selection};
pub use variation::{CrossoverAndMutation, MutationOnly, Variation};
