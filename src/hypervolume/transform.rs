//! Front transformations used before computing contributions.

/// Per-objective maximum over `front`.
///
/// `front` must be non-empty and rectangular.
pub fn maximum_values(front: &[Vec<f64>]) -> Vec<f64> {
    fold_columns(front, f64::NEG_INFINITY, f64::max)
}

/// Per-objective minimum over `front`.
///
/// `front` must be non-empty and rectangular.
pub fn minimum_values(front: &[Vec<f64>]) -> Vec<f64> {
    fold_columns(front, f64::INFINITY, f64::min)
}

fn fold_columns(front: &[Vec<f64>], init: f64, f: fn(f64, f64) -> f64) -> Vec<f64> {
    let m = front.first().map_or(0, Vec::len);
    (0..m)
        .map(|j| front.iter().map(|p| p[j]).fold(init, f))
        .collect()
}

/// Range used for normalization; a degenerate objective counts as width 1.
pub(crate) fn span(minimum: f64, maximum: f64) -> f64 {
    let width = maximum - minimum;
    if width > 0.0 {
        width
    } else {
        1.0
    }
}

/// Maps every coordinate to `(x - min) / (max - min)`.
pub fn normalize(front: &[Vec<f64>], minimum: &[f64], maximum: &[f64]) -> Vec<Vec<f64>> {
    front
        .iter()
        .map(|p| {
            p.iter()
                .zip(minimum.iter().zip(maximum))
                .map(|(&x, (&lo, &hi))| (x - lo) / span(lo, hi))
                .collect()
        })
        .collect()
}

/// Maps normalized coordinates to `1 - x`, clamping values outside `[0, 1]`.
pub fn invert(front: &[Vec<f64>]) -> Vec<Vec<f64>> {
    front
        .iter()
        .map(|p| {
            p.iter()
                .map(|&x| {
                    if x > 1.0 {
                        0.0
                    } else if x < 0.0 {
                        1.0
                    } else {
                        1.0 - x
                    }
                })
                .collect()
        })
        .collect()
}
