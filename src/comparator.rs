//! Pareto dominance with constraint handling.
//!
//! # Rules
//!
//! 1. With constraint handling enabled, a feasible solution beats an
//!    infeasible one, and of two infeasible solutions the one with the
//!    smaller overall violation wins.
//! 2. Otherwise `a` dominates `b` when it is no worse in every objective and
//!    strictly better in at least one (minimization).
//! 3. Identical objective vectors are mutually non-dominated.

use crate::solution::Solution;

/// Dominance comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

impl Dominance {
    /// Signed form: `-1` left wins, `0` neither, `1` right wins.
    pub fn signum(self) -> i8 {
        match self {
            Dominance::Left => -1,
            Dominance::Neither => 0,
            Dominance::Right => 1,
        }
    }

    /// Result of comparing the operands in swapped order.
    pub fn reverse(self) -> Self {
        match self {
            Dominance::Left => Dominance::Right,
            Dominance::Right => Dominance::Left,
            Dominance::Neither => Dominance::Neither,
        }
    }
}

/// Pareto comparison of two objective vectors (minimization).
///
/// # Panics
/// Panics if the vectors have different lengths.
pub fn dominance_cmp(a: &[f64], b: &[f64]) -> Dominance {
    assert_eq!(
        a.len(),
        b.len(),
        "objective vectors must have the same length"
    );

    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Whether `a` Pareto-dominates `b`.
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    dominance_cmp(a, b) == Dominance::Left
}

/// Compares solutions by feasibility first (when enabled), then by Pareto
/// dominance of their objective vectors.
///
/// # Examples
///
/// ```
/// use u_evo::{Dominance, DominanceComparator, Solution};
///
/// let mut a: Solution<f64> = Solution::new(vec![0.0], 2, 1);
/// let mut b: Solution<f64> = Solution::new(vec![0.0], 2, 1);
/// a.objectives_mut().copy_from_slice(&[5.0, 5.0]);
/// b.objectives_mut().copy_from_slice(&[1.0, 1.0]);
/// b.set_constraint(0, -1.0);
///
/// // `a` is worse in both objectives but feasible.
/// assert_eq!(DominanceComparator::new().compare(&a, &b), Dominance::Left);
/// assert_eq!(
///     DominanceComparator::without_constraints().compare(&a, &b),
///     Dominance::Right
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DominanceComparator {
    constraint_handling: bool,
}

impl Default for DominanceComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl DominanceComparator {
    /// Comparator with constraint handling enabled.
    pub fn new() -> Self {
        Self {
            constraint_handling: true,
        }
    }

    /// Comparator that ignores constraints.
    pub fn without_constraints() -> Self {
        Self {
            constraint_handling: false,
        }
    }

    /// Enables or disables constraint handling.
    pub fn with_constraint_handling(mut self, enabled: bool) -> Self {
        self.constraint_handling = enabled;
        self
    }

    pub fn constraint_handling(&self) -> bool {
        self.constraint_handling
    }

    /// Compares `a` against `b`.
    ///
    /// # Panics
    /// Panics if the solutions have different numbers of objectives.
    pub fn compare<V>(&self, a: &Solution<V>, b: &Solution<V>) -> Dominance {
        if self.constraint_handling {
            let by_violation = violation_cmp(
                a.overall_constraint_violation(),
                b.overall_constraint_violation(),
            );
            if by_violation != Dominance::Neither {
                return by_violation;
            }
        }
        dominance_cmp(a.objectives(), b.objectives())
    }
}

/// Feasible beats infeasible; among infeasible, smaller violation wins.
fn violation_cmp(va: f64, vb: f64) -> Dominance {
    match (va > 0.0, vb > 0.0) {
        (false, false) => Dominance::Neither,
        (false, true) => Dominance::Left,
        (true, false) => Dominance::Right,
        (true, true) => {
            if va < vb {
                Dominance::Left
            } else if vb < va {
                Dominance::Right
            } else {
                Dominance::Neither
            }
        }
    }
}
