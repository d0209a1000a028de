//! Planar convex hull (Akl–Toussaint filter with per-edge pruning).
//!
//! The extreme points along eight directions (x, y, x + y and x − y, both ways) form
//! a convex octagon, listed counter-clockwise from the leftmost point:
//!
//! ```text
//!            max y
//!   min(x−y) ┌───┐ max(x+y)
//!    min x   │   │   max x
//!   min(x+y) └───┘ max(x−y)
//!            min y
//! ```
//!
//! Every other point is either inside the octagon or in the pocket outside exactly
//! one of its edges. Each pocket is sorted along its edge and pruned to a convex
//! chain, and the chains are spliced between the extremes.

use std::iter::once;

use tracing::debug;

use crate::core::point_set::PointSet;
use crate::geometry::algorithms::convex_hull::{
    ComputedHull, ConvexFace, ConvexHullConstructionError, HullStatistics,
};
use crate::geometry::util::distance;

/// Directions whose maxima are the octagon extremes, counter-clockwise from min x.
const OCTAGON_DIRECTIONS: [[f64; 2]; 8] = [
    [-1.0, 0.0],
    [-1.0, -1.0],
    [0.0, -1.0],
    [1.0, -1.0],
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 1.0],
    [-1.0, 1.0],
];

#[inline]
fn xy(points: &PointSet, index: usize) -> [f64; 2] {
    let p = points.point(index);
    [p[0], p[1]]
}

/// Distance of `m` to the right of the directed line `a → c`. For a
/// counter-clockwise ring, positive means outside.
fn outside_distance(a: [f64; 2], c: [f64; 2], m: [f64; 2]) -> f64 {
    let (dx, dy) = (c[0] - a[0], c[1] - a[1]);
    dy.mul_add(m[0] - a[0], -(dx * (m[1] - a[1]))) / dx.hypot(dy)
}

/// Position of `m` along the direction `a → c` (unnormalized).
fn projection(a: [f64; 2], c: [f64; 2], m: [f64; 2]) -> f64 {
    (c[0] - a[0]).mul_add(m[0] - a[0], (c[1] - a[1]) * (m[1] - a[1]))
}

/// Octagon extremes in counter-clockwise order, without consecutive repeats.
///
/// The min-x extreme is the lowest of the leftmost points; other ties keep the first
/// point encountered.
fn octagon_extremes(points: &PointSet) -> Vec<usize> {
    let mut ring = Vec::with_capacity(OCTAGON_DIRECTIONS.len());
    for (k, u) in OCTAGON_DIRECTIONS.iter().enumerate() {
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (i, p) in points.iter().enumerate() {
            let score = u[0].mul_add(p[0], u[1] * p[1]);
            let better = if k == 0 {
                i == 0 || points.lexicographic_cmp(i, best).is_lt()
            } else {
                score > best_score
            };
            if better {
                best = i;
                best_score = score;
            }
        }
        ring.push(best);
    }

    ring.dedup_by(|a, b| points.point(*a) == points.point(*b));
    while let [first, .., last] = ring[..]
        && points.point(first) == points.point(last)
    {
        ring.pop();
    }
    ring
}

/// Repeatedly removes ring entries that are not strictly convex: those within
/// `tolerance` of the chord between their neighbors and projecting inside it.
fn drop_flat_extremes(points: &PointSet, ring: &mut Vec<usize>, tolerance: f64) {
    let mut changed = true;
    while changed && ring.len() >= 3 {
        changed = false;
        let mut i = 0;
        while i < ring.len() && ring.len() >= 3 {
            let n = ring.len();
            let previous = xy(points, ring[(i + n - 1) % n]);
            let next = xy(points, ring[(i + 1) % n]);
            let p = xy(points, ring[i]);
            let t = projection(previous, next, p);
            let within = t > 0.0 && t < projection(previous, next, next);
            if within && outside_distance(previous, next, p) <= tolerance {
                ring.remove(i);
                changed = true;
            } else {
                i += 1;
            }
        }
    }
}

/// Widens a two-extreme ring with the points deviating most on either side of it.
fn widen_segment(points: &PointSet, ring: &mut Vec<usize>, tolerance: f64) {
    let (a, b) = (ring[0], ring[1]);
    let (pa, pb) = (xy(points, a), xy(points, b));
    let mut right: Option<(usize, f64)> = None;
    let mut left: Option<(usize, f64)> = None;
    for i in 0..points.len() {
        let distance = outside_distance(pa, pb, xy(points, i));
        if distance > tolerance && right.is_none_or(|(_, best)| distance > best) {
            right = Some((i, distance));
        }
        if -distance > tolerance && left.is_none_or(|(_, best)| -distance > best) {
            left = Some((i, -distance));
        }
    }

    ring.clear();
    ring.push(a);
    ring.extend(right.map(|(i, _)| i));
    ring.push(b);
    ring.extend(left.map(|(i, _)| i));
}

/// Inserts `candidate` into the projection-sorted `pocket` of edge `a → b`, unless it
/// lies inside the chord of its would-be neighbors.
fn insert_candidate(
    points: &PointSet,
    pocket: &mut Vec<(f64, usize)>,
    (a, b): (usize, usize),
    candidate: usize,
    tolerance: f64,
) {
    let (pa, pb, p) = (xy(points, a), xy(points, b), xy(points, candidate));
    let t = projection(pa, pb, p);
    let k = pocket.partition_point(|&(s, _)| s <= t);
    let previous = if k == 0 { a } else { pocket[k - 1].1 };
    let next = pocket.get(k).map_or(b, |&(_, v)| v);
    if outside_distance(xy(points, previous), xy(points, next), p) > tolerance {
        pocket.insert(k, (t, candidate));
    }
}

/// Convex chain from `a` through the pocket to `b`, without `b`.
fn prune_pocket(
    points: &PointSet,
    pocket: &[(f64, usize)],
    (a, b): (usize, usize),
    tolerance: f64,
) -> Vec<usize> {
    let mut chain = vec![a];
    for v in pocket.iter().map(|&(_, v)| v).chain(once(b)) {
        while let [.., before, last] = chain[..] {
            let (before, last) = (xy(points, before), xy(points, last));
            if outside_distance(before, xy(points, v), last) > tolerance {
                break;
            }
            chain.pop();
        }
        chain.push(v);
    }
    chain.pop();
    chain
}

/// Faces of a counter-clockwise ring: face `i` runs from `ring[i]` to `ring[i + 1]`.
fn ring_faces(points: &PointSet, ring: &[usize]) -> Vec<ConvexFace> {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            let (pa, pb) = (xy(points, a), xy(points, b));
            let (dx, dy) = (pb[0] - pa[0], pb[1] - pa[1]);
            let length = dx.hypot(dy);
            let normal = vec![dy / length, -dx / length];
            let offset = -normal[0].mul_add(pa[0], normal[1] * pa[1]);
            // Slot 0 is opposite `a`: the next edge shares `b`
            ConvexFace::new(vec![a, b], vec![(i + 1) % n, (i + n - 1) % n], normal, offset)
        })
        .collect()
}

/// Computes the hull of a two-dimensional point set.
///
/// The result lists the hull as a counter-clockwise ring of edges starting at the
/// lowest of the leftmost points. Collinear input yields the two endpoints joined by
/// a pair of opposite faces.
pub(crate) fn compute_planar_hull(
    points: &PointSet,
    tolerance: f64,
) -> Result<ComputedHull, ConvexHullConstructionError> {
    debug!(points = points.len(), tolerance, "building planar convex hull");

    let mut ring = octagon_extremes(points);
    drop_flat_extremes(points, &mut ring, tolerance);

    if ring.len() < 2 {
        return Err(ConvexHullConstructionError::GeometricDegeneracy {
            message: "all input points coincide".to_string(),
        });
    }
    if ring.len() == 2 {
        let separation = distance(points.point(ring[0]), points.point(ring[1]));
        if separation <= tolerance {
            return Err(ConvexHullConstructionError::GeometricDegeneracy {
                message: "all input points coincide within tolerance".to_string(),
            });
        }
        widen_segment(points, &mut ring, tolerance);
    }

    let extremes = ring.len();
    if extremes > 2 {
        let mut is_extreme = vec![false; points.len()];
        for &v in &ring {
            is_extreme[v] = true;
        }

        let mut pockets: Vec<Vec<(f64, usize)>> = vec![Vec::new(); extremes];
        for candidate in 0..points.len() {
            if is_extreme[candidate] {
                continue;
            }
            let p = xy(points, candidate);
            for (e, pocket) in pockets.iter_mut().enumerate() {
                let edge = (ring[e], ring[(e + 1) % extremes]);
                if outside_distance(xy(points, edge.0), xy(points, edge.1), p) > tolerance {
                    insert_candidate(points, pocket, edge, candidate, tolerance);
                    break;
                }
            }
        }

        let mut spliced = Vec::with_capacity(extremes);
        for (e, pocket) in pockets.iter().enumerate() {
            let edge = (ring[e], ring[(e + 1) % extremes]);
            spliced.extend(prune_pocket(points, pocket, edge, tolerance));
        }
        ring = spliced;
    }

    let start = (0..ring.len())
        .min_by(|&i, &j| points.lexicographic_cmp(ring[i], ring[j]))
        .unwrap_or(0);
    ring.rotate_left(start);

    let faces = ring_faces(points, &ring);
    let statistics = HullStatistics {
        processed_vertices: ring.len().saturating_sub(extremes),
        faces_created: faces.len(),
        ..HullStatistics::default()
    };
    debug!(
        vertices = ring.len(),
        extremes, "planar convex hull complete"
    );

    Ok(ComputedHull {
        faces,
        singular_vertices: Vec::new(),
        statistics,
    })
}
