//! Operators for real-coded encodings.
//!
//! # References
//!
//! - Deb & Agrawal (1995), "Simulated Binary Crossover for Continuous Search Space"
//! - Deb & Goyal (1996), "A Combined Genetic Adaptive Search (GeneAS) for
//!   Engineering Design"

use super::{Crossover, Mutation};
use crate::error::{EvoError, EvoResult};
use crate::solution::Solution;
use rand::Rng;

const EPS: f64 = 1.0e-14;

fn check_bounds(bounds: &[(f64, f64)]) -> EvoResult<()> {
    for (i, &(lo, hi)) in bounds.iter().enumerate() {
        if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
            return Err(EvoError::InvalidConfig(format!(
                "bounds of variable {i} are invalid: [{lo}, {hi}]"
            )));
        }
    }
    Ok(())
}

/// Simulated binary crossover (SBX).
///
/// Each variable pair is recombined with probability 0.5 when the parents
/// differ; children are clamped to the variable bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct SbxCrossover {
    probability: f64,
    distribution_index: f64,
    bounds: Vec<(f64, f64)>,
}

impl SbxCrossover {
    /// `bounds[i]` is the `(lower, upper)` range of variable `i`.
    ///
    /// # Errors
    /// [`EvoError::InvalidConfig`] for an out-of-range probability, a
    /// negative distribution index or inverted bounds.
    pub fn new(
        probability: f64,
        distribution_index: f64,
        bounds: Vec<(f64, f64)>,
    ) -> EvoResult<Self> {
        check_bounds(&bounds)?;
        Ok(Self {
            probability: super::probability("SBX probability", probability)?,
            distribution_index: super::distribution_index(
                "SBX distribution index",
                distribution_index,
            )?,
            bounds,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn distribution_index(&self) -> f64 {
        self.distribution_index
    }

    fn spread_factor(&self, beta: f64, u: f64) -> f64 {
        let exponent = self.distribution_index + 1.0;
        let alpha = 2.0 - beta.powf(-exponent);
        if u <= 1.0 / alpha {
            (u * alpha).powf(1.0 / exponent)
        } else {
            (1.0 / (2.0 - u * alpha)).powf(1.0 / exponent)
        }
    }
}

impl Crossover<f64> for SbxCrossover {
    /// # Panics
    /// Panics unless two parents are given whose length matches the bounds.
    fn execute<R: Rng>(&self, parents: &[&Solution<f64>], rng: &mut R) -> Vec<Solution<f64>> {
        assert_eq!(parents.len(), 2, "SBX takes two parents");
        let (p1, p2) = (parents[0], parents[1]);
        assert_eq!(
            p1.number_of_variables(),
            self.bounds.len(),
            "parent length must match the variable bounds"
        );
        assert_eq!(p2.number_of_variables(), self.bounds.len(), "parents must have equal length");

        let mut c1 = p1.clone();
        let mut c2 = p2.clone();
        if rng.random::<f64>() > self.probability {
            return vec![c1, c2];
        }

        for (i, &(lower, upper)) in self.bounds.iter().enumerate() {
            let x1 = p1.variables()[i];
            let x2 = p2.variables()[i];
            let (v1, v2) = if rng.random::<f64>() <= 0.5 {
                if (x1 - x2).abs() > EPS {
                    let (y1, y2) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
                    let u = rng.random::<f64>();

                    let betaq = self.spread_factor(1.0 + 2.0 * (y1 - lower) / (y2 - y1), u);
                    let a = (0.5 * (y1 + y2 - betaq * (y2 - y1))).clamp(lower, upper);

                    let betaq = self.spread_factor(1.0 + 2.0 * (upper - y2) / (y2 - y1), u);
                    let b = (0.5 * (y1 + y2 + betaq * (y2 - y1))).clamp(lower, upper);

                    if rng.random::<f64>() <= 0.5 {
                        (b, a)
                    } else {
                        (a, b)
                    }
                } else {
                    (x1, x2)
                }
            } else {
                (x2, x1)
            };
            c1.variables_mut()[i] = v1;
            c2.variables_mut()[i] = v2;
        }
        vec![c1, c2]
    }
}

/// Polynomial mutation.
///
/// Each variable mutates with the given probability; the perturbation is
/// drawn from a polynomial distribution and kept within bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialMutation {
    probability: f64,
    distribution_index: f64,
    bounds: Vec<(f64, f64)>,
}

impl PolynomialMutation {
    /// # Errors
    /// [`EvoError::InvalidConfig`] for an out-of-range probability, a
    /// negative distribution index or inverted bounds.
    pub fn new(
        probability: f64,
        distribution_index: f64,
        bounds: Vec<(f64, f64)>,
    ) -> EvoResult<Self> {
        check_bounds(&bounds)?;
        Ok(Self {
            probability: super::probability("polynomial mutation probability", probability)?,
            distribution_index: super::distribution_index(
                "polynomial mutation distribution index",
                distribution_index,
            )?,
            bounds,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Mutation<f64> for PolynomialMutation {
    /// # Panics
    /// Panics if the solution length does not match the bounds.
    fn execute<R: Rng>(&self, solution: &mut Solution<f64>, rng: &mut R) {
        assert_eq!(
            solution.number_of_variables(),
            self.bounds.len(),
            "solution length must match the variable bounds"
        );
        let exponent = self.distribution_index + 1.0;
        let power = 1.0 / exponent;

        for (x, &(lower, upper)) in solution.variables_mut().iter_mut().zip(&self.bounds) {
            if rng.random::<f64>() > self.probability {
                continue;
            }
            if lower == upper {
                *x = lower;
                continue;
            }
            let width = upper - lower;
            let delta1 = (*x - lower) / width;
            let delta2 = (upper - *x) / width;
            let u = rng.random::<f64>();
            let deltaq = if u <= 0.5 {
                let xy = 1.0 - delta1;
                let val = 2.0 * u + (1.0 - 2.0 * u) * xy.powf(exponent);
                val.powf(power) - 1.0
            } else {
                let xy = 1.0 - delta2;
                let val = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * xy.powf(exponent);
                1.0 - val.powf(power)
            };
            *x = (*x + deltaq * width).clamp(lower, upper);
        }
    }
}
