//! Diversity estimation within a front.
//!
//! A [`DensityEstimator`] scores each member of a front; **higher scores
//! mean more valuable** (more isolated, or a larger exclusive
//! hypervolume). Survivor selection removes the lowest score first.

mod crowding;

pub use crowding::crowding_distance;

use crate::error::{EvoError, EvoResult};
use crate::hypervolume::{hypervolume_contributions, DEFAULT_OFFSET};

/// Strategy used to break ties inside a front.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DensityEstimator {
    /// NSGA-II crowding distance.
    #[default]
    CrowdingDistance,

    /// SMS-EMOA exclusive hypervolume contribution.
    ///
    /// `offset` pushes the implicit reference point beyond the worst
    /// normalized values so that boundary points keep a positive score.
    HypervolumeContribution {
        /// Distance added beyond the worst value, in objective units.
        offset: f64,
    },
}

impl DensityEstimator {
    /// Hypervolume contribution with [`DEFAULT_OFFSET`].
    pub fn hypervolume_contribution() -> Self {
        DensityEstimator::HypervolumeContribution {
            offset: DEFAULT_OFFSET,
        }
    }

    /// Short name for log output.
    pub fn name(&self) -> &'static str {
        match self {
            DensityEstimator::CrowdingDistance => "crowding-distance",
            DensityEstimator::HypervolumeContribution { .. } => "hypervolume-contribution",
        }
    }

    /// Checks the estimator's parameters.
    ///
    /// # Errors
    /// [`EvoError::InvalidConfig`] if a hypervolume offset is negative or
    /// not finite.
    pub fn validate(&self) -> EvoResult<()> {
        match *self {
            DensityEstimator::CrowdingDistance => Ok(()),
            DensityEstimator::HypervolumeContribution { offset } => {
                if offset.is_finite() && offset >= 0.0 {
                    Ok(())
                } else {
                    Err(EvoError::InvalidConfig(format!(
                        "hypervolume offset must be a non-negative number, got {offset}"
                    )))
                }
            }
        }
    }

    /// Scores `front` against itself.
    pub fn estimate(&self, front: &[Vec<f64>]) -> EvoResult<Vec<f64>> {
        self.estimate_with_reference(front, front)
    }

    /// Scores `front`, normalizing against `reference` where the estimator
    /// normalizes at all. Crowding distance ignores `reference`.
    pub fn estimate_with_reference(
        &self,
        front: &[Vec<f64>],
        reference: &[Vec<f64>],
    ) -> EvoResult<Vec<f64>> {
        match *self {
            DensityEstimator::CrowdingDistance => Ok(crowding_distance(front)),
            DensityEstimator::HypervolumeContribution { offset } => {
                hypervolume_contributions(front, reference, offset)
            }
        }
    }
}

/// Position of the lowest score; ties go to the highest position.
///
/// Returns `None` for an empty slice.
pub fn worst_index(scores: &[f64]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .min_by(|(i, a), (j, b)| a.total_cmp(b).then(j.cmp(i)))
        .map(|(i, _)| i)
}
