//! Crowding distance.
//!
//! # Algorithm (Deb et al., 2002)
//!
//! For each objective:
//! 1. Sort solutions by objective value
//! 2. Assign infinity to boundary solutions
//! 3. For interior solutions, add the normalized gap between neighbours
//!
//! # Complexity
//!
//! O(m · n log n) for n solutions with m objectives.

/// Crowding distance of every point in `front`.
///
/// Higher means more isolated. Points at the minimum or maximum of any
/// objective get `f64::INFINITY`; with two points or fewer every point is a
/// boundary point. Objectives with zero range add nothing to interior
/// points. Ties in an objective keep their population order, so the
/// result is deterministic.
///
/// # Example
///
/// ```
/// use u_evo::density::crowding_distance;
///
/// let distances = crowding_distance(&[
///     vec![1.0, 5.0],
///     vec![3.0, 3.0],
///     vec![5.0, 1.0],
/// ]);
/// assert!(distances[0].is_infinite());
/// assert!(distances[2].is_infinite());
/// assert!((distances[1] - 2.0).abs() < 1e-12);
/// ```
pub fn crowding_distance(front: &[Vec<f64>]) -> Vec<f64> {
    let n = front.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = front[0].len();
    let mut distances = vec![0.0f64; n];

    #[allow(clippy::needless_range_loop)] // obj_idx is a column index into 2D data
    for obj_idx in 0..m {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| {
            front[a][obj_idx]
                .total_cmp(&front[b][obj_idx])
                .then(a.cmp(&b))
        });

        distances[indices[0]] = f64::INFINITY;
        distances[indices[n - 1]] = f64::INFINITY;

        let min_val = front[indices[0]][obj_idx];
        let max_val = front[indices[n - 1]][obj_idx];
        let range = max_val - min_val;

        if range > 0.0 {
            for i in 1..(n - 1) {
                let prev = front[indices[i - 1]][obj_idx];
                let next = front[indices[i + 1]][obj_idx];
                distances[indices[i]] += (next - prev) / range;
            }
        }
    }

    distances
}
