//! Exact hypervolume computation.
//!
//! The hypervolume of a front is the volume of objective space it dominates,
//! bounded by a reference point. It is the only unary quality measure that is
//! strictly monotone with Pareto dominance, which is why it drives SMS-EMOA
//! survivor selection.
//!
//! # Functions
//!
//! - [`hypervolume`]: exact volume of a minimization front w.r.t. a reference point
//! - [`hypervolume_contributions`]: per-point exclusive volume in normalized space
//! - [`Hypervolume`]: reusable quality indicator
//!
//! The engine is the WFG algorithm: points are sorted by their last
//! objective and the volume is accumulated slice by slice, with closed-form
//! inclusion–exclusion for sets of up to four points.

mod transform;
mod wfg;

pub use transform::{invert, maximum_values, minimum_values, normalize};

use crate::error::{EvoError, EvoResult};
use crate::solution::{objective_matrix, Solution};
use transform::span;

/// Default distance added beyond the worst value when a reference point is
/// derived from a front.
pub const DEFAULT_OFFSET: f64 = 100.0;

/// Exact hypervolume of a minimization front with respect to
/// `reference_point`.
///
/// Points that do not strictly dominate the reference point in every
/// objective contribute nothing.
///
/// # Errors
/// [`EvoError::Empty`] for an empty front or reference point,
/// [`EvoError::DimensionMismatch`] if a point's length differs from the
/// reference point's, [`EvoError::NonFinite`] for NaN or infinite values.
///
/// # Example
///
/// ```
/// use u_evo::hypervolume::hypervolume;
///
/// let front = vec![vec![1.0, 5.0], vec![5.0, 1.0]];
/// let hv = hypervolume(&front, &[6.0, 6.0]).unwrap();
/// assert!((hv - 9.0).abs() < 1e-12);
/// ```
pub fn hypervolume(front: &[Vec<f64>], reference_point: &[f64]) -> EvoResult<f64> {
    if reference_point.is_empty() {
        return Err(EvoError::Empty {
            what: "reference point",
        });
    }
    if reference_point.iter().any(|r| !r.is_finite()) {
        return Err(EvoError::NonFinite {
            what: "reference point",
        });
    }
    validate_front(front, reference_point.len())?;

    let points: Vec<Vec<f64>> = front
        .iter()
        .filter_map(|p| {
            let shifted: Vec<f64> = p
                .iter()
                .zip(reference_point)
                .map(|(&x, &r)| r - x)
                .collect();
            shifted.iter().all(|&v| v > 0.0).then_some(shifted)
        })
        .collect();
    Ok(wfg::volume(points))
}

/// Exclusive hypervolume contribution of every point of `front`.
///
/// Both fronts are minimization fronts. Coordinates are normalized with the
/// per-objective extremes of `reference_front`, inverted into maximization
/// space, and shifted by `offset / (max - min)` so that boundary points
/// also receive a positive contribution. Result `i` is the total volume
/// minus the volume without point `i`; higher means more valuable.
///
/// # Errors
/// Same as [`hypervolume`], applied to both fronts;
/// [`EvoError::InvalidConfig`] for a negative `offset`.
pub fn hypervolume_contributions(
    front: &[Vec<f64>],
    reference_front: &[Vec<f64>],
    offset: f64,
) -> EvoResult<Vec<f64>> {
    let first = reference_front.first().ok_or(EvoError::Empty {
        what: "reference front",
    })?;
    let m = first.len();
    validate_front(reference_front, m)?;
    validate_front(front, m)?;
    if !offset.is_finite() {
        return Err(EvoError::NonFinite { what: "offset" });
    }
    if offset < 0.0 {
        return Err(EvoError::InvalidConfig(format!(
            "hypervolume offset must be non-negative, got {offset}"
        )));
    }

    let minimum = minimum_values(reference_front);
    let maximum = maximum_values(reference_front);
    let shifts: Vec<f64> = minimum
        .iter()
        .zip(&maximum)
        .map(|(&lo, &hi)| offset / span(lo, hi))
        .collect();

    let mut points = invert(&normalize(front, &minimum, &maximum));
    for point in &mut points {
        for (x, shift) in point.iter_mut().zip(&shifts) {
            *x += shift;
        }
    }
    Ok(wfg::contributions(&points))
}

fn validate_front(front: &[Vec<f64>], m: usize) -> EvoResult<()> {
    if front.is_empty() {
        return Err(EvoError::Empty { what: "front" });
    }
    for point in front {
        if point.len() != m {
            return Err(EvoError::DimensionMismatch {
                expected: m,
                found: point.len(),
            });
        }
        if point.iter().any(|x| !x.is_finite()) {
            return Err(EvoError::NonFinite { what: "front" });
        }
    }
    Ok(())
}

/// Hypervolume quality indicator with a fixed reference point.
///
/// # Example
///
/// ```
/// use u_evo::Hypervolume;
///
/// let reference_front = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
/// let indicator = Hypervolume::from_reference_front(&reference_front, 1.0).unwrap();
/// assert_eq!(indicator.reference_point(), &[2.0, 2.0]);
///
/// let hv = indicator.compute(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
/// assert!((hv - 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Hypervolume {
    reference_point: Vec<f64>,
}

impl Hypervolume {
    /// Indicator bounded by `reference_point`.
    pub fn new(reference_point: Vec<f64>) -> EvoResult<Self> {
        if reference_point.is_empty() {
            return Err(EvoError::Empty {
                what: "reference point",
            });
        }
        if reference_point.iter().any(|r| !r.is_finite()) {
            return Err(EvoError::NonFinite {
                what: "reference point",
            });
        }
        Ok(Self { reference_point })
    }

    /// Indicator whose reference point is the per-objective maximum of
    /// `reference_front` plus `offset`.
    pub fn from_reference_front(reference_front: &[Vec<f64>], offset: f64) -> EvoResult<Self> {
        let first = reference_front.first().ok_or(EvoError::Empty {
            what: "reference front",
        })?;
        validate_front(reference_front, first.len())?;
        let reference_point = maximum_values(reference_front)
            .into_iter()
            .map(|x| x + offset)
            .collect();
        Self::new(reference_point)
    }

    pub fn reference_point(&self) -> &[f64] {
        &self.reference_point
    }

    /// Hypervolume of an objective matrix.
    pub fn compute(&self, front: &[Vec<f64>]) -> EvoResult<f64> {
        hypervolume(front, &self.reference_point)
    }

    /// Hypervolume of the objective vectors of `solutions`.
    pub fn compute_solutions<V>(&self, solutions: &[Solution<V>]) -> EvoResult<f64> {
        self.compute(&objective_matrix(solutions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_two_point_front() {
        let hv = hypervolume(&[vec![1.0, 5.0], vec![5.0, 1.0]], &[6.0, 6.0]).unwrap();
        assert!((hv - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_point_3d() {
        let hv = hypervolume(&[vec![1.0, 2.0, 3.0]], &[6.0, 6.0, 6.0]).unwrap();
        assert!((hv - 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_outside_reference_contributes_nothing() {
        let hv = hypervolume(&[vec![1.0, 1.0], vec![7.0, 0.0]], &[6.0, 6.0]).unwrap();
        assert!((hv - 25.0).abs() < 1e-12);

        let hv = hypervolume(&[vec![6.0, 1.0]], &[6.0, 6.0]).unwrap();
        assert_eq!(hv, 0.0);
    }

    #[test]
    fn test_adding_dominated_point_keeps_volume() {
        let base = vec![
            vec![1.0, 4.0, 2.0],
            vec![2.0, 1.0, 4.0],
            vec![4.0, 2.0, 1.0],
            vec![3.0, 3.0, 3.0],
            vec![2.0, 3.0, 2.5],
        ];
        let reference = [5.0, 5.0, 5.0];
        let before = hypervolume(&base, &reference).unwrap();

        let mut extended = base.clone();
        extended.push(vec![4.0, 4.0, 4.0]);
        let after = hypervolume(&extended, &reference).unwrap();
        assert!((before - after).abs() < 1e-9);
    }

    #[test]
    fn test_known_4d_value() {
        // Unit-simplex corners against reference 2: each corner box is
        // 1 * 2 * 2 * 2 = 8, pairwise overlaps 1 * 1 * 2 * 2 = 4, and so on.
        let front = vec![
            vec![1.0, 0.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0],
            vec![0.0, 0.0, 0.0, 1.0],
            vec![1.0, 1.0, 1.0, 1.0],
        ];
        let hv = hypervolume(&front, &[2.0; 4]).unwrap();
        // 4*8 - 6*4 + 4*2 - 1 = 15
        assert!((hv - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            hypervolume(&[], &[1.0, 1.0]),
            Err(EvoError::Empty { .. })
        ));
        assert!(matches!(
            hypervolume(&[vec![1.0]], &[1.0, 1.0]),
            Err(EvoError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            hypervolume(&[vec![f64::NAN, 1.0]], &[2.0, 2.0]),
            Err(EvoError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_contributions_favour_isolated_points() {
        let front = vec![
            vec![0.0, 1.0],
            vec![0.45, 0.55],
            vec![0.5, 0.5],
            vec![1.0, 0.0],
        ];
        let c = hypervolume_contributions(&front, &front, 1.0).unwrap();
        // The two near-duplicates in the middle add least.
        assert!(c[1] < c[0] && c[1] < c[3]);
        assert!(c[2] < c[0] && c[2] < c[3]);
    }

    #[test]
    fn test_degenerate_reference_front() {
        let front = vec![vec![1.0, 1.0], vec![1.0, 1.0]];
        let c = hypervolume_contributions(&front, &front, DEFAULT_OFFSET).unwrap();
        assert!(c.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_negative_offset_rejected() {
        let front = vec![vec![0.0, 1.0], vec![0.5, 0.5], vec![1.0, 0.0]];
        assert!(matches!(
            hypervolume_contributions(&front, &front, -2.0),
            Err(EvoError::InvalidConfig(_))
        ));
        let c = hypervolume_contributions(&front, &front, 0.0).unwrap();
        assert!(c.iter().all(|&x| x >= 0.0));
    }

    #[test]
    fn test_indicator_from_reference_front() {
        let indicator =
            Hypervolume::from_reference_front(&[vec![1.0, 3.0], vec![2.0, 1.0]], 1.0).unwrap();
        assert_eq!(indicator.reference_point(), &[3.0, 4.0]);
    }

    fn front_strategy(m: usize) -> impl Strategy<Value = Vec<Vec<f64>>> {
        prop::collection::vec(prop::collection::vec(0u8..10, m), 1..12).prop_map(|rows| {
            rows.into_iter()
                .map(|r| r.into_iter().map(f64::from).collect())
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_adding_a_point_never_decreases_volume(
            front in front_strategy(3),
            extra in prop::collection::vec(0u8..10, 3),
        ) {
            let reference = [10.0; 3];
            let before = hypervolume(&front, &reference).unwrap();
            let mut extended = front.clone();
            extended.push(extra.into_iter().map(f64::from).collect());
            let after = hypervolume(&extended, &reference).unwrap();
            prop_assert!(after >= before - 1e-9);
        }

        #[test]
        fn prop_contributions_bounded_by_total(front in front_strategy(3)) {
            let c = hypervolume_contributions(&front, &front, 1.0).unwrap();
            let lo = minimum_values(&front);
            let hi = maximum_values(&front);
            let shifts: Vec<f64> = lo.iter().zip(&hi).map(|(&l, &h)| 1.0 / span(l, h)).collect();
            let mut points = invert(&normalize(&front, &lo, &hi));
            for p in &mut points {
                for (x, s) in p.iter_mut().zip(&shifts) {
                    *x += s;
                }
            }
            let total = wfg::volume(points);
            prop_assert!(c.iter().all(|&x| x >= -1e-9));
            prop_assert!(c.iter().sum::<f64>() <= total + 1e-9);
        }
    }
}
