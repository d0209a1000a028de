//! Choice of the first `d + 1` hull vertices.
//!
//! Candidates are the extreme points along every axis. Starting from the candidate
//! pair of greatest separation, the point of greatest height above the affine hull of
//! the points chosen so far is added until the simplex is full. The height of `p` is
//! the norm of the residual of `p - s₀` after projecting out an orthonormal basis of
//! the chosen edges:
//!
//! ```text
//! r = (p - s₀) - Σ ⟨p - s₀, qᵢ⟩ qᵢ        height(p) = ‖r‖
//! ```
//!
//! When no candidate rises more than the tolerance above the current affine hull the
//! search widens to the whole point set; when no point does, the input lies in a
//! lower-dimensional flat.

use std::cmp::Ordering;

use rand::{SeedableRng, rngs::StdRng, seq::index::sample};

use crate::core::collections::{FastHashSet, SimplexVertexBuffer, fast_hash_set_with_capacity};
use crate::core::point_set::PointSet;
use crate::geometry::algorithms::convex_hull::ConvexHullConstructionError;
use crate::geometry::util::{distance, hypot};

/// Orders `i` against `j` by coordinate `axis`, then lexicographically. Identical
/// points compare equal.
fn axis_cmp(points: &PointSet, axis: usize, i: usize, j: usize) -> Ordering {
    points.point(i)[axis]
        .total_cmp(&points.point(j)[axis])
        .then_with(|| points.lexicographic_cmp(i, j))
}

/// Extreme points along every axis, in axis order, deduplicated.
///
/// Ties along an axis go to the lexicographically smallest (for the minimum) or
/// greatest (for the maximum) point, so every entry is a vertex of the hull. Among
/// identical points the lowest index wins.
#[must_use]
pub fn axis_extremes(points: &PointSet) -> Vec<usize> {
    let mut seen = fast_hash_set_with_capacity(2 * points.dimension());
    let mut extremes = Vec::with_capacity(2 * points.dimension());
    for axis in 0..points.dimension() {
        let (mut min, mut max) = (0, 0);
        for i in 1..points.len() {
            if axis_cmp(points, axis, i, min).is_lt() {
                min = i;
            }
            if axis_cmp(points, axis, i, max).is_gt() {
                max = i;
            }
        }
        for index in [min, max] {
            if seen.insert(index) {
                extremes.push(index);
            }
        }
    }
    extremes
}

fn candidate_pool(points: &PointSet, seed: u64) -> Vec<usize> {
    let dimension = points.dimension();
    let mut candidates = axis_extremes(points);
    let wanted = (2 * (dimension + 1)).min(points.len());
    if candidates.len() >= dimension + 1 || candidates.len() >= wanted {
        return candidates;
    }

    // Pad with a deterministic sample of the other points.
    let chosen: FastHashSet<usize> = candidates.iter().copied().collect();
    let rest: Vec<usize> = (0..points.len()).filter(|i| !chosen.contains(i)).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    let amount = (wanted - candidates.len()).min(rest.len());
    let mut picked: Vec<usize> = sample(&mut rng, rest.len(), amount)
        .into_iter()
        .map(|i| rest[i])
        .collect();
    picked.sort_unstable();
    candidates.extend(picked);
    candidates
}

/// Orthonormal basis of the edge vectors `sᵢ - s₀` of a partial simplex.
struct EdgeBasis {
    vectors: Vec<Vec<f64>>,
    residual: Vec<f64>,
}

impl EdgeBasis {
    fn new(dimension: usize) -> Self {
        Self {
            vectors: Vec::with_capacity(dimension),
            residual: Vec::with_capacity(dimension),
        }
    }

    /// Height of `point` above the affine hull of `origin` and the basis. The
    /// residual is kept for [`Self::push_residual`].
    fn height(&mut self, origin: &[f64], point: &[f64]) -> f64 {
        self.residual.clear();
        self.residual
            .extend(point.iter().zip(origin).map(|(x, o)| x - o));
        // Modified Gram–Schmidt, run twice to recover the orthogonality lost to rounding
        for _ in 0..2 {
            for q in &self.vectors {
                let c: f64 = q.iter().zip(&self.residual).map(|(a, b)| a * b).sum();
                for (r, x) in self.residual.iter_mut().zip(q) {
                    *r -= c * x;
                }
            }
        }
        hypot(&self.residual)
    }

    /// Adds the residual of the last [`Self::height`] call, scaled to unit length.
    fn push_residual(&mut self, height: f64) {
        self.vectors
            .push(self.residual.iter().map(|r| r / height).collect());
    }
}

/// Candidate of greatest height; heights within `tolerance` of each other go to the
/// lexicographically greater point, then to the lower index.
fn best_candidate(
    points: &PointSet,
    simplex: &[usize],
    basis: &mut EdgeBasis,
    candidates: impl Iterator<Item = usize>,
    tolerance: f64,
) -> Option<(usize, f64)> {
    let origin = points.point(simplex[0]);
    let mut best: Option<(usize, f64)> = None;
    for candidate in candidates {
        if simplex.contains(&candidate) {
            continue;
        }
        let height = basis.height(origin, points.point(candidate));
        let better = best.is_none_or(|(current, h)| {
            height > h + tolerance
                || (height >= h - tolerance
                    && points
                        .lexicographic_cmp(candidate, current)
                        .then_with(|| current.cmp(&candidate))
                        .is_gt())
        });
        if better {
            best = Some((candidate, height));
        }
    }
    best
}

/// Finds `d + 1` affinely independent points spanning a simplex of non-negligible
/// volume.
///
/// # Errors
///
/// Returns [`ConvexHullConstructionError::GeometricDegeneracy`] when all points
/// coincide within `tolerance` or lie in a lower-dimensional flat.
pub fn find_initial_simplex(
    points: &PointSet,
    tolerance: f64,
    seed: u64,
) -> Result<SimplexVertexBuffer, ConvexHullConstructionError> {
    let dimension = points.dimension();
    let candidates = candidate_pool(points, seed);

    let mut pair: Option<(usize, usize, f64)> = None;
    for (k, &a) in candidates.iter().enumerate() {
        for &b in &candidates[k + 1..] {
            let separation = distance(points.point(a), points.point(b));
            if pair.is_none_or(|(_, _, s)| separation > s) {
                pair = Some((a, b, separation));
            }
        }
    }
    let (a, b) = match pair {
        Some((a, b, separation)) if separation > tolerance => (a, b),
        _ => {
            return Err(ConvexHullConstructionError::GeometricDegeneracy {
                message: "all input points coincide".to_string(),
            });
        }
    };

    let mut simplex = SimplexVertexBuffer::new();
    simplex.push(a.min(b));
    simplex.push(a.max(b));
    let origin = points.point(simplex[0]);
    let mut basis = EdgeBasis::new(dimension);
    let height = basis.height(origin, points.point(simplex[1]));
    basis.push_residual(height);

    let mut widened = false;
    while simplex.len() <= dimension {
        let mut best = if widened {
            None
        } else {
            best_candidate(points, &simplex, &mut basis, candidates.iter().copied(), tolerance)
                .filter(|&(_, height)| height > tolerance)
        };
        if best.is_none() && !widened {
            tracing::warn!(
                dimension,
                chosen = simplex.len(),
                "initial simplex candidates are flat; searching all points"
            );
            widened = true;
        }
        if widened {
            best = best_candidate(points, &simplex, &mut basis, 0..points.len(), tolerance)
                .filter(|&(_, height)| height > tolerance);
        }

        let Some((vertex, _)) = best else {
            return Err(ConvexHullConstructionError::GeometricDegeneracy {
                message: format!(
                    "input spans only {} of {dimension} dimensions",
                    simplex.len() - 1
                ),
            });
        };
        let height = basis.height(origin, points.point(vertex));
        basis.push_residual(height);
        simplex.push(vertex);
    }

    Ok(simplex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::plane::simplex_volume;

    #[test]
    fn test_axis_extremes_are_deduplicated() {
        let points = PointSet::new(&[[0.0, 0.0], [1.0, 1.0], [0.5, 0.2]]).unwrap();
        assert_eq!(axis_extremes(&points), vec![0, 1]);
    }

    #[test]
    fn test_axis_extreme_ties_pick_corners() {
        // (2, 4) is the midpoint of the top edge and comes before both top corners
        let points = PointSet::new(&[
            [2.0, 4.0],
            [0.0, 0.0],
            [4.0, 0.0],
            [0.0, 4.0],
            [4.0, 4.0],
            [0.0, 0.0],
        ])
        .unwrap();
        let extremes = axis_extremes(&points);
        assert!(!extremes.contains(&0), "{extremes:?}");
        assert!(!extremes.contains(&5), "duplicates keep the lowest index");
        assert_eq!(extremes, vec![1, 4]);
    }

    #[test]
    fn test_edge_basis_height_is_exact_for_collinear_points() {
        let points = PointSet::new(&[[0.0, 0.0], [0.1, 0.3], [0.2, 0.6], [0.7, 2.1]]).unwrap();
        let mut basis = EdgeBasis::new(2);
        let origin = points.point(0);
        let height = basis.height(origin, points.point(3));
        basis.push_residual(height);
        for v in 1..3 {
            assert!(basis.height(origin, points.point(v)) < 1e-15);
        }
    }

    #[test]
    fn test_exactly_collinear_points_are_degenerate() {
        for points in [
            vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]],
            vec![[0.0, 0.0], [0.1, 0.3], [0.2, 0.6], [0.7, 2.1]],
        ] {
            let points = PointSet::new(&points).unwrap();
            let tolerance = 1e-10 * points.extent();
            assert!(matches!(
                find_initial_simplex(&points, tolerance, 0),
                Err(ConvexHullConstructionError::GeometricDegeneracy { .. })
            ));
        }
    }

    #[test]
    fn test_flat_tetrahedron_is_resolved() {
        // Apex raised h above the centroid of a tilted base triangle
        for h in [1e-8, 3e-9, 1e-9] {
            let apex = [1.0 / 3.0, 0.2 - 0.8 * h, 0.8 / 3.0 + 0.6 * h];
            let points =
                PointSet::new(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.6, 0.8], apex]).unwrap();
            let tolerance = 1e-10 * points.extent();
            let mut simplex = find_initial_simplex(&points, tolerance, 0).unwrap().to_vec();
            simplex.sort_unstable();
            assert_eq!(simplex, vec![0, 1, 2, 3], "apex height {h}");
        }
    }

    #[test]
    fn test_simplex_of_square_pyramid_has_volume() {
        let points = PointSet::new(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.5, 0.5, 1.0],
            [0.5, 0.5, 0.2],
        ])
        .unwrap();
        let simplex = find_initial_simplex(&points, 1e-10, 0).unwrap();
        assert_eq!(simplex.len(), 4);
        let refs: Vec<&[f64]> = simplex.iter().map(|&i| points.point(i)).collect();
        assert!(simplex_volume(&refs) > 0.1);
    }

    #[test]
    fn test_flat_candidates_widen_to_all_points() {
        // Every axis extreme lies in the plane y = z; only the interior point 4 leaves it.
        let points = PointSet::new(&[
            [-1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, -1.0, -1.0],
            [0.0, 1.0, 1.0],
            [0.0, 0.5, -0.5],
        ])
        .unwrap();
        let simplex = find_initial_simplex(&points, 1e-10, 0).unwrap();
        assert!(simplex.contains(&4), "the off-plane point must be found");

        let flat = PointSet::new(&[
            [-1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, -1.0, -1.0],
            [0.0, 1.0, 1.0],
            [0.2, 0.5, 0.5],
        ])
        .unwrap();
        assert!(matches!(
            find_initial_simplex(&flat, 1e-10, 0),
            Err(ConvexHullConstructionError::GeometricDegeneracy { .. })
        ));
    }

    #[test]
    fn test_coincident_points_are_degenerate() {
        let points = PointSet::new(&[[1.0, 2.0], [1.0, 2.0], [1.0, 2.0]]).unwrap();
        assert!(matches!(
            find_initial_simplex(&points, 0.0, 0),
            Err(ConvexHullConstructionError::GeometricDegeneracy { .. })
        ));
    }

    #[test]
    fn test_collinear_points_in_3d_are_degenerate() {
        let points: Vec<[f64; 3]> = (0..10)
            .map(|i| {
                let t = f64::from(i);
                [t, 2.0 * t, -t]
            })
            .collect();
        let points = PointSet::new(&points).unwrap();
        assert!(matches!(
            find_initial_simplex(&points, 1e-9, 0),
            Err(ConvexHullConstructionError::GeometricDegeneracy { .. })
        ));
    }
}
