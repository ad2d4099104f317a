//! Evolutionary loop configuration.
//!
//! [`EaConfig`] holds the strategy bundle and every parameter that controls
//! the loop. An algorithm such as NSGA-II or SMS-EMOA is a preset of this
//! struct rather than a separate type.

use super::replacement::Replacement;
use super::selection::Selection;
use crate::density::DensityEstimator;
use crate::error::{EvoError, EvoResult};

/// Configuration for [`EaRunner`](super::EaRunner).
///
/// # Defaults
///
/// ```
/// use u_evo::ea::EaConfig;
///
/// let config = EaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_evaluations, Some(25_000));
/// ```
///
/// # Presets and builders
///
/// ```
/// use u_evo::ea::{EaConfig, Selection};
///
/// let config = EaConfig::sms_emoa(100)
///     .with_max_evaluations(20_000)
///     .with_seed(7);
/// assert_eq!(config.offspring_size, 1);
/// assert!(config.validate().is_ok());
///
/// let config = EaConfig::nsga2(50).with_selection(Selection::Tournament(3));
/// assert_eq!(config.offspring_size, 50);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EaConfig {
    /// Number of solutions kept between generations.
    pub population_size: usize,

    /// Number of offspring produced and evaluated per generation.
    pub offspring_size: usize,

    /// Parent selection strategy.
    pub selection: Selection,

    /// Survivor selection strategy.
    pub replacement: Replacement,

    /// Stop once this many evaluations have been spent, initial population
    /// included.
    pub max_evaluations: Option<usize>,

    /// Stop after this many generations.
    pub max_generations: Option<usize>,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked at the start of each generation, so the run may exceed the
    /// limit by up to one generation's worth of work.
    pub time_limit_ms: Option<u64>,

    /// Whether feasibility and constraint violation take precedence over
    /// Pareto dominance.
    pub constraint_handling: bool,

    /// Whether to evaluate on a worker pool.
    pub parallel: bool,

    /// Worker pool size; `None` uses the number of logical CPUs.
    pub worker_threads: Option<usize>,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            offspring_size: 100,
            selection: Selection::default(),
            replacement: Replacement::default(),
            max_evaluations: Some(25_000),
            max_generations: None,
            time_limit_ms: None,
            constraint_handling: true,
            parallel: true,
            worker_threads: None,
            seed: None,
        }
    }
}

impl EaConfig {
    /// NSGA-II: binary tournament, as many offspring as parents, μ+λ
    /// truncation by crowding distance.
    pub fn nsga2(population_size: usize) -> Self {
        Self {
            population_size,
            offspring_size: population_size,
            selection: Selection::Tournament(2),
            replacement: Replacement::MuPlusLambda {
                density: DensityEstimator::CrowdingDistance,
            },
            ..Self::default()
        }
    }

    /// SMS-EMOA: random mating, one offspring per generation, removal of
    /// the member with the smallest hypervolume contribution.
    pub fn sms_emoa(population_size: usize) -> Self {
        Self {
            population_size,
            offspring_size: 1,
            selection: Selection::Random,
            replacement: Replacement::MuPlusLambda {
                density: DensityEstimator::hypervolume_contribution(),
            },
            ..Self::default()
        }
    }

    /// Generational GA keeping the two best parents.
    pub fn generational_ga(population_size: usize) -> Self {
        let elites = if population_size > 2 { 2 } else { 0 };
        Self {
            population_size,
            offspring_size: population_size - elites,
            selection: Selection::Tournament(2),
            replacement: Replacement::Generational { elites },
            ..Self::default()
        }
    }

    /// Steady-state GA: one offspring per generation competing with the
    /// population.
    pub fn steady_state_ga(population_size: usize) -> Self {
        Self {
            population_size,
            offspring_size: 1,
            selection: Selection::Tournament(2),
            replacement: Replacement::MuPlusLambda {
                density: DensityEstimator::CrowdingDistance,
            },
            ..Self::default()
        }
    }

    /// (μ,λ): survivors are drawn from `lambda` offspring only.
    pub fn mu_comma_lambda(mu: usize, lambda: usize) -> Self {
        Self {
            population_size: mu,
            offspring_size: lambda,
            selection: Selection::Random,
            replacement: Replacement::MuCommaLambda {
                density: DensityEstimator::CrowdingDistance,
            },
            ..Self::default()
        }
    }

    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_offspring_size(mut self, n: usize) -> Self {
        self.offspring_size = n;
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Equivalent to `.with_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k))
    }

    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacement = replacement;
        self
    }

    pub fn with_max_evaluations(mut self, n: usize) -> Self {
        self.max_evaluations = Some(n);
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = Some(n);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn with_constraint_handling(mut self, enabled: bool) -> Self {
        self.constraint_handling = enabled;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the worker pool size and enables parallel evaluation.
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self.parallel = true;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`EvoError::InvalidConfig`] describing the first invalid parameter.
    pub fn validate(&self) -> EvoResult<()> {
        let invalid = |msg: &str| -> EvoResult<()> { Err(EvoError::InvalidConfig(msg.into())) };

        if self.population_size < 2 {
            return invalid("population_size must be at least 2");
        }
        if self.offspring_size == 0 {
            return invalid("offspring_size must be at least 1");
        }
        if self.max_evaluations.is_none()
            && self.max_generations.is_none()
            && self.time_limit_ms.is_none()
        {
            return invalid("no stopping condition: set max_evaluations, max_generations or time_limit_ms");
        }
        if self.max_evaluations == Some(0) {
            return invalid("max_evaluations must be positive or None");
        }
        if self.max_generations == Some(0) {
            return invalid("max_generations must be positive or None");
        }
        if self.time_limit_ms == Some(0) {
            return invalid("time_limit_ms must be positive or None");
        }
        if self.worker_threads == Some(0) {
            return invalid("worker_threads must be positive or None");
        }
        if self.selection == Selection::Tournament(0) {
            return invalid("tournament size must be at least 1");
        }
        let density = match self.replacement {
            Replacement::Generational { elites } => {
                if elites >= self.population_size {
                    return invalid("elites fill the entire population");
                }
                if self.offspring_size < self.population_size - elites {
                    return invalid("generational replacement needs population_size - elites offspring");
                }
                None
            }
            Replacement::MuCommaLambda { density } => {
                if self.offspring_size < self.population_size {
                    return invalid("mu,lambda replacement needs offspring_size >= population_size");
                }
                Some(density)
            }
            Replacement::MuPlusLambda { density } => Some(density),
        };
        match density {
            Some(density) => density.validate(),
            None => Ok(()),
        }
    }
}
