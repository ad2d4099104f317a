//! WFG exact hypervolume kernel.
//!
//! Works in **maximization** space relative to the origin: the inclusive
//! volume of a point is the product of its coordinates. Callers translate
//! minimization fronts into this space before calling [`volume`].
//!
//! The recursion slices the front by its last objective. Each level of the
//! recursion needs a scratch front to hold the points bounded by the current
//! pivot; those buffers are allocated once per top-level call (one per
//! level, `m - 2` in total) and handed down as a shrinking slice, so nested
//! and concurrent computations never share mutable state.
//!
//! # References
//!
//! - While, Bradstreet & Barone (2012), "A Fast Way of Calculating Exact
//!   Hypervolumes", IEEE Transactions on Evolutionary Computation, 16(1)

use std::cmp::Ordering;

/// A point set with a logical length; points beyond `len` are scratch.
#[derive(Debug)]
struct Front {
    points: Vec<Vec<f64>>,
    len: usize,
}

impl Front {
    fn scratch(capacity: usize, dims: usize) -> Self {
        Self {
            points: vec![vec![0.0; dims]; capacity],
            len: 0,
        }
    }
}

#[inline]
fn beats(x: f64, y: f64) -> bool {
    x > y
}

#[inline]
fn worse(x: f64, y: f64) -> f64 {
    if beats(x, y) {
        y
    } else {
        x
    }
}

/// Hypervolume dominated by `points` relative to the origin.
///
/// Every point must have the same dimension and finite, positive
/// coordinates.
pub(crate) fn volume(points: Vec<Vec<f64>>) -> f64 {
    let Some(first) = points.first() else {
        return 0.0;
    };
    let m = first.len();
    if m == 0 {
        return 0.0;
    }
    if m == 1 {
        return points.iter().map(|p| p[0]).fold(0.0, f64::max);
    }

    let capacity = points.len();
    let mut front = Front {
        len: points.len(),
        points,
    };
    let mut pool: Vec<Front> = (0..m - 2)
        .map(|_| Front::scratch(capacity, m))
        .collect();
    hv(&mut front, &mut pool, m, 0)
}

/// Volume each point adds exclusively: `total - volume(points \ {i})`.
pub(crate) fn contributions(points: &[Vec<f64>]) -> Vec<f64> {
    use rayon::prelude::*;

    let total = volume(points.to_vec());
    (0..points.len())
        .into_par_iter()
        .map(|i| {
            let rest: Vec<Vec<f64>> = points
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, p)| p.clone())
                .collect();
            total - volume(rest)
        })
        .collect()
}

fn hv(ps: &mut Front, pool: &mut [Front], n: usize, safe: usize) -> f64 {
    match ps.len {
        0 => return 0.0,
        1 => return inclhv(&ps.points[0], n),
        2 => return inclhv2(&ps.points[0], &ps.points[1], n),
        3 => return inclhv3(&ps.points[0], &ps.points[1], &ps.points[2], n),
        4 => {
            return inclhv4(
                &ps.points[0],
                &ps.points[1],
                &ps.points[2],
                &ps.points[3],
                n,
            )
        }
        _ => {}
    }

    let len = ps.len;
    ps.points[..len].sort_by(|p, q| greater_first(p, q, n));

    if n == 2 {
        return hv2(&ps.points[..len]);
    }

    if n == 3 && safe > 0 {
        // The first `safe` points share the top third coordinate and are
        // already mutually non-dominated in the first two.
        let mut volume = ps.points[0][2] * hv2(&ps.points[..safe]);
        let mut sum = 0.0;
        for i in safe..len {
            sum += ps.points[i][2] * exclhv(ps, pool, i, 2);
        }
        volume += sum;
        volume
    } else {
        let mut volume = inclhv4(
            &ps.points[0],
            &ps.points[1],
            &ps.points[2],
            &ps.points[3],
            n,
        );
        for i in 4..len {
            let height = ps.points[i][n - 1];
            volume += height * exclhv(ps, pool, i, n - 1);
        }
        volume
    }
}

/// Exclusive volume of `ps[p]` relative to `ps[0..p]`, in `n` dimensions.
fn exclhv(ps: &Front, pool: &mut [Front], p: usize, n: usize) -> f64 {
    let (level, deeper) = pool
        .split_first_mut()
        .expect("scratch pool holds one front per recursion level");
    let safe = make_dominated_bit(ps, p, level, n);
    inclhv(&ps.points[p], n) - hv(level, deeper, n, safe)
}

/// Orders by the last coordinate descending, ties broken by the next
/// coordinate down, and so on.
fn greater_first(p: &[f64], q: &[f64], n: usize) -> Ordering {
    for i in (0..n).rev() {
        if beats(p[i], q[i]) {
            return Ordering::Less;
        }
        if beats(q[i], p[i]) {
            return Ordering::Greater;
        }
    }
    Ordering::Equal
}

/// Writes the non-dominated subset of `ps[0..p]`, each point limited by
/// `ps[p]`, into `fs`. Returns how many leading points of `fs` already sit
/// at the pivot's height in dimension `n - 1` (the "safe" prefix).
fn make_dominated_bit(ps: &Front, p: usize, fs: &mut Front, n: usize) -> usize {
    if p == 0 {
        fs.len = 0;
        return 0;
    }

    let last = n - 1;
    let pivot = &ps.points[p];

    // Points strictly below the pivot in the last dimension go to the upper
    // end; the rest are clipped to the pivot's height and fill from below.
    let mut l = 0usize;
    let mut u = p;
    for i in (0..p).rev() {
        let src = &ps.points[i];
        let slot = if beats(pivot[last], src[last]) {
            u -= 1;
            u
        } else {
            l += 1;
            l - 1
        };
        let dst = &mut fs.points[slot];
        dst[last] = worse(pivot[last], src[last]);
        for j in 0..last {
            dst[j] = worse(pivot[j], src[j]);
        }
    }

    // Points at the pivot's height only need checking in n - 1 dimensions.
    fs.len = 1;
    for i in 1..l {
        let mut j = 0;
        while j < fs.len {
            match dominates_2way(&fs.points[i], &fs.points[j], n - 2) {
                TwoWay::Neither => j += 1,
                TwoWay::Left => {
                    fs.points.swap(j, i);
                    prune_after(fs, j, n - 1, n - 2);
                    j = fs.len + 1;
                }
                TwoWay::Right | TwoWay::Equal => j = fs.len + 1,
            }
        }
        if j == fs.len {
            let len = fs.len;
            fs.points.swap(len, i);
            fs.len += 1;
        }
    }

    let safe = l.min(fs.len);
    for i in l..p {
        let mut j = 0;
        while j < safe {
            if dominates_1way(&fs.points[j], &fs.points[i], n - 2) {
                j = fs.len + 1;
            } else {
                j += 1;
            }
        }
        while j < fs.len {
            match dominates_2way(&fs.points[i], &fs.points[j], n - 1) {
                TwoWay::Neither => j += 1,
                TwoWay::Left => {
                    fs.points.swap(j, i);
                    prune_after(fs, j, n - 1, n - 1);
                    j = fs.len + 1;
                }
                TwoWay::Right | TwoWay::Equal => j = fs.len + 1,
            }
        }
        if j == fs.len {
            let len = fs.len;
            fs.points.swap(len, i);
            fs.len += 1;
        }
    }

    safe
}

/// After a new point lands at `j`, drops kept points it dominates: first
/// from the tail (checked over `0..=tail_k`), then the rest over `0..=k`.
fn prune_after(fs: &mut Front, j: usize, tail_k: usize, k: usize) {
    while j < fs.len - 1 && dominates_1way(&fs.points[j], &fs.points[fs.len - 1], tail_k) {
        fs.len -= 1;
    }
    let mut m = j + 1;
    while m < fs.len {
        if dominates_1way(&fs.points[j], &fs.points[m], k) {
            fs.len -= 1;
            let len = fs.len;
            fs.points.swap(m, len);
        } else {
            m += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TwoWay {
    Left,
    Right,
    Equal,
    Neither,
}

/// Dominance of `p` against `q` over dimensions `0..=k`.
fn dominates_2way(p: &[f64], q: &[f64], k: usize) -> TwoWay {
    for i in (0..=k).rev() {
        if beats(p[i], q[i]) {
            if (0..i).rev().any(|j| beats(q[j], p[j])) {
                return TwoWay::Neither;
            }
            return TwoWay::Left;
        } else if beats(q[i], p[i]) {
            if (0..i).rev().any(|j| beats(p[j], q[j])) {
                return TwoWay::Neither;
            }
            return TwoWay::Right;
        }
    }
    TwoWay::Equal
}

/// Whether `p` weakly dominates `q` over dimensions `0..=k`.
fn dominates_1way(p: &[f64], q: &[f64], k: usize) -> bool {
    !(0..=k).rev().any(|i| beats(q[i], p[i]))
}

fn inclhv(p: &[f64], n: usize) -> f64 {
    p[..n].iter().product()
}

/// Running-maximum sweep over points sorted by the second coordinate
/// descending; dominated points add nothing.
fn hv2(points: &[Vec<f64>]) -> f64 {
    let mut volume = 0.0;
    let mut reach = 0.0;
    for p in points {
        if p[0] > reach {
            volume += p[1] * (p[0] - reach);
            reach = p[0];
        }
    }
    volume
}

fn inclhv2(p: &[f64], q: &[f64], n: usize) -> f64 {
    let mut vp = 1.0;
    let mut vq = 1.0;
    let mut vpq = 1.0;
    for i in 0..n {
        vp *= p[i];
        vq *= q[i];
        vpq *= worse(p[i], q[i]);
    }
    vp + vq - vpq
}

fn inclhv3(p: &[f64], q: &[f64], r: &[f64], n: usize) -> f64 {
    let (mut vp, mut vq, mut vr) = (1.0, 1.0, 1.0);
    let (mut vpq, mut vpr, mut vqr, mut vpqr) = (1.0, 1.0, 1.0, 1.0);
    for i in 0..n {
        vp *= p[i];
        vq *= q[i];
        vr *= r[i];
        if beats(p[i], q[i]) {
            if beats(q[i], r[i]) {
                vpq *= q[i];
                vpr *= r[i];
                vqr *= r[i];
                vpqr *= r[i];
            } else {
                vpq *= q[i];
                vpr *= worse(p[i], r[i]);
                vqr *= q[i];
                vpqr *= q[i];
            }
        } else if beats(p[i], r[i]) {
            vpq *= p[i];
            vpr *= r[i];
            vqr *= r[i];
            vpqr *= r[i];
        } else {
            vpq *= p[i];
            vpr *= p[i];
            vqr *= worse(q[i], r[i]);
            vpqr *= p[i];
        }
    }
    vp + vq + vr - vpq - vpr - vqr + vpqr
}

fn inclhv4(p: &[f64], q: &[f64], r: &[f64], s: &[f64], n: usize) -> f64 {
    let (mut vp, mut vq, mut vr, mut vs) = (1.0, 1.0, 1.0, 1.0);
    let (mut vpq, mut vpr, mut vps, mut vqr, mut vqs, mut vrs) = (1.0, 1.0, 1.0, 1.0, 1.0, 1.0);
    let (mut vpqr, mut vpqs, mut vprs, mut vqrs) = (1.0, 1.0, 1.0, 1.0);
    let mut vpqrs = 1.0;
    for i in 0..n {
        let (pi, qi, ri, si) = (p[i], q[i], r[i], s[i]);
        vp *= pi;
        vq *= qi;
        vr *= ri;
        vs *= si;
        if beats(pi, qi) {
            if beats(qi, ri) {
                if beats(ri, si) {
                    vpq *= qi;
                    vpr *= ri;
                    vps *= si;
                    vqr *= ri;
                    vqs *= si;
                    vrs *= si;
                    vpqr *= ri;
                    vpqs *= si;
                    vprs *= si;
                    vqrs *= si;
                    vpqrs *= si;
                } else {
                    let z1 = worse(qi, si);
                    vpq *= qi;
                    vpr *= ri;
                    vps *= worse(pi, si);
                    vqr *= ri;
                    vqs *= z1;
                    vrs *= ri;
                    vpqr *= ri;
                    vpqs *= z1;
                    vprs *= ri;
                    vqrs *= ri;
                    vpqrs *= ri;
                }
            } else if beats(qi, si) {
                vpq *= qi;
                vpr *= worse(pi, ri);
                vps *= si;
                vqr *= qi;
                vqs *= si;
                vrs *= si;
                vpqr *= qi;
                vpqs *= si;
                vprs *= si;
                vqrs *= si;
                vpqrs *= si;
            } else {
                let z1 = worse(pi, ri);
                vpq *= qi;
                vpr *= z1;
                vps *= worse(pi, si);
                vqr *= qi;
                vqs *= qi;
                vrs *= worse(ri, si);
                vpqr *= qi;
                vpqs *= qi;
                vprs *= worse(z1, si);
                vqrs *= qi;
                vpqrs *= qi;
            }
        } else if beats(qi, ri) {
            if beats(pi, si) {
                let z1 = worse(pi, ri);
                let z2 = worse(ri, si);
                vpq *= pi;
                vpr *= z1;
                vps *= si;
                vqr *= ri;
                vqs *= si;
                vrs *= z2;
                vpqr *= z1;
                vpqs *= si;
                vprs *= z2;
                vqrs *= z2;
                vpqrs *= z2;
            } else {
                let z1 = worse(pi, ri);
                let z2 = worse(ri, si);
                vpq *= pi;
                vpr *= z1;
                vps *= pi;
                vqr *= ri;
                vqs *= worse(qi, si);
                vrs *= z2;
                vpqr *= z1;
                vpqs *= pi;
                vprs *= z1;
                vqrs *= z2;
                vpqrs *= z1;
            }
        } else if beats(pi, si) {
            vpq *= pi;
            vpr *= pi;
            vps *= si;
            vqr *= qi;
            vqs *= si;
            vrs *= si;
            vpqr *= pi;
            vpqs *= si;
            vprs *= si;
            vqrs *= si;
            vpqrs *= si;
        } else {
            let z1 = worse(qi, si);
            vpq *= pi;
            vpr *= pi;
            vps *= pi;
            vqr *= qi;
            vqs *= z1;
            vrs *= worse(ri, si);
            vpqr *= pi;
            vpqs *= pi;
            vprs *= pi;
            vqrs *= z1;
            vpqrs *= pi;
        }
    }
    vp + vq + vr + vs - vpq - vpr - vps - vqr - vqs - vrs + vpqr + vpqs + vprs + vqrs - vpqrs
}
