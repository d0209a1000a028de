//! Geometric predicates for d-dimensional geometry calculations.
//!
//! Points are plain coordinate slices. Every predicate decides its sign against a
//! tolerance derived from Hadamard's bound on the determinant involved, so results
//! are independent of the scale of the input.

use std::cmp::Ordering;

use thiserror::Error;

use crate::geometry::matrix::determinant_of;
use crate::geometry::util::distance;

/// Relative tolerance applied to Hadamard's bound when classifying a determinant sign.
pub const PREDICATE_RELATIVE_TOLERANCE: f64 = 1e-12;

/// Represents the position of a point relative to a circumsphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InSphere {
    /// The point is outside the circumsphere
    OUTSIDE,
    /// The point is on the boundary of the circumsphere (within numerical tolerance)
    BOUNDARY,
    /// The point is inside the circumsphere
    INSIDE,
}

impl std::fmt::Display for InSphere {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OUTSIDE => write!(f, "OUTSIDE"),
            Self::BOUNDARY => write!(f, "BOUNDARY"),
            Self::INSIDE => write!(f, "INSIDE"),
        }
    }
}

/// Represents the orientation of a simplex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// The simplex has negative orientation (determinant < 0)
    NEGATIVE,
    /// The simplex is degenerate (determinant ≈ 0)
    DEGENERATE,
    /// The simplex has positive orientation (determinant > 0)
    POSITIVE,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NEGATIVE => write!(f, "NEGATIVE"),
            Self::DEGENERATE => write!(f, "DEGENERATE"),
            Self::POSITIVE => write!(f, "POSITIVE"),
        }
    }
}

/// Errors raised by the predicates when their input is malformed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PredicateError {
    /// Wrong number of simplex points for the dimension.
    #[error("Expected {expected} simplex points in dimension {dimension}, got {actual}")]
    InvalidSimplex {
        /// Number of points supplied.
        actual: usize,
        /// Number of points required (`dimension + 1`).
        expected: usize,
        /// Dimension of the points.
        dimension: usize,
    },
    /// A point does not match the dimension of the first simplex point.
    #[error("Point {index} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        /// Index of the offending point (the test point is last).
        index: usize,
        /// Dimension of the first simplex point.
        expected: usize,
        /// Dimension of the offending point.
        found: usize,
    },
    /// The simplex has no volume, so its circumsphere is undefined.
    #[error("Degenerate simplex: circumsphere containment is undefined")]
    DegenerateSimplex,
}

fn check_simplex(simplex: &[&[f64]], extra: Option<&[f64]>) -> Result<usize, PredicateError> {
    let dimension = simplex.first().map_or(0, |p| p.len());
    if simplex.len() != dimension + 1 {
        return Err(PredicateError::InvalidSimplex {
            actual: simplex.len(),
            expected: dimension + 1,
            dimension,
        });
    }
    for (index, p) in simplex.iter().copied().chain(extra).enumerate() {
        if p.len() != dimension {
            return Err(PredicateError::DimensionMismatch {
                index,
                expected: dimension,
                found: p.len(),
            });
        }
    }
    Ok(dimension)
}

/// Sign of a determinant with the given Hadamard bound, as an [`Orientation`].
fn classify(det: f64, bound: f64) -> Orientation {
    let tolerance = PREDICATE_RELATIVE_TOLERANCE * bound;
    if det > tolerance {
        Orientation::POSITIVE
    } else if det < -tolerance {
        Orientation::NEGATIVE
    } else {
        Orientation::DEGENERATE
    }
}

/// Hadamard's bound `Π ‖row_i‖` of a row-major `k×k` matrix.
fn hadamard_bound(k: usize, entries: &[f64]) -> f64 {
    entries
        .chunks_exact(k)
        .map(|row| row.iter().map(|v| v * v).sum::<f64>().sqrt())
        .product()
}

/// Determine the orientation of a simplex using the determinant of its coordinate matrix.
///
/// For a d-dimensional simplex with points `p₀, ..., p_d`, the orientation is the sign
/// of the edge determinant:
///
/// ```text
/// |  p₁ - p₀  |
/// |  p₂ - p₀  |
/// |   ...     |
/// |  p_d - p₀ |
/// ```
///
/// so a counter-clockwise triangle and a right-handed tetrahedron are both `POSITIVE`.
///
/// # Errors
///
/// Returns [`PredicateError`] if the simplex does not have `dimension + 1` points of
/// equal dimension.
///
/// # Example
///
/// ```
/// use hyperhull::geometry::predicates::{simplex_orientation, Orientation};
///
/// let simplex: [&[f64]; 3] = [&[0.0, 0.0], &[1.0, 0.0], &[0.0, 1.0]];
/// assert_eq!(simplex_orientation(&simplex).unwrap(), Orientation::POSITIVE);
/// ```
pub fn simplex_orientation(simplex: &[&[f64]]) -> Result<Orientation, PredicateError> {
    let dimension = check_simplex(simplex, None)?;
    let origin = simplex[0];

    let mut entries = Vec::with_capacity(dimension * dimension);
    for p in &simplex[1..] {
        entries.extend(p.iter().zip(origin).map(|(a, b)| a - b));
    }
    let det = determinant_of(dimension, |r, c| entries[r * dimension + c]);
    Ok(classify(det, hadamard_bound(dimension, &entries)))
}

/// Orientation of the triangle `a, b, c` in the plane: `POSITIVE` for a left turn
/// (counter-clockwise), `NEGATIVE` for a right turn.
///
/// # Example
///
/// ```
/// use hyperhull::geometry::predicates::{orientation_2d, Orientation};
///
/// assert_eq!(orientation_2d([0.0, 0.0], [1.0, 0.0], [1.0, 1.0]), Orientation::POSITIVE);
/// assert_eq!(orientation_2d([0.0, 0.0], [1.0, 0.0], [2.0, 0.0]), Orientation::DEGENERATE);
/// ```
#[must_use]
pub fn orientation_2d(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Orientation {
    let (ux, uy) = (b[0] - a[0], b[1] - a[1]);
    let (vx, vy) = (c[0] - a[0], c[1] - a[1]);
    let det = ux.mul_add(vy, -(uy * vx));
    classify(det, ux.hypot(uy) * vx.hypot(vy))
}

/// Circumsphere containment test.
///
/// Uses the lifted determinant with rows `[x, ‖x‖², 1]`, interpreted against the
/// simplex orientation so the result does not depend on vertex order.
///
/// # Errors
///
/// Returns [`PredicateError`] if the simplex is malformed or degenerate.
///
/// # Example
///
/// ```
/// use hyperhull::geometry::predicates::{insphere, InSphere};
///
/// let simplex: [&[f64]; 4] = [
///     &[0.0, 0.0, 0.0],
///     &[1.0, 0.0, 0.0],
///     &[0.0, 1.0, 0.0],
///     &[0.0, 0.0, 1.0],
/// ];
/// assert_eq!(insphere(&simplex, &[2.0, 2.0, 2.0]).unwrap(), InSphere::OUTSIDE);
/// assert_eq!(insphere(&simplex, &[0.25, 0.25, 0.25]).unwrap(), InSphere::INSIDE);
/// ```
pub fn insphere(simplex: &[&[f64]], test_point: &[f64]) -> Result<InSphere, PredicateError> {
    let dimension = check_simplex(simplex, Some(test_point))?;

    if simplex.iter().any(|p| *p == test_point) {
        return Ok(InSphere::BOUNDARY);
    }

    let sign = match simplex_orientation(simplex)? {
        Orientation::DEGENERATE => return Err(PredicateError::DegenerateSimplex),
        Orientation::POSITIVE => 1.0,
        Orientation::NEGATIVE => -1.0,
    };

    // Translate to the first vertex: row 0 becomes [0, 0, 1] and the determinant
    // reduces to the (d+1)-matrix of the remaining rows [x - x₀, ‖x - x₀‖²].
    // Coordinates are divided by the longest edge at x₀ so the lifted column stays
    // commensurate with the others at any scale; the sign is unchanged.
    let origin = simplex[0];
    let scale = simplex[1..]
        .iter()
        .map(|p| distance(p, origin))
        .fold(0.0_f64, f64::max);
    let k = dimension + 1;
    let mut entries = Vec::with_capacity(k * k);
    for p in simplex[1..].iter().copied().chain(std::iter::once(test_point)) {
        let mut squared = 0.0;
        for (a, b) in p.iter().zip(origin) {
            let t = (a - b) / scale;
            entries.push(t);
            squared += t * t;
        }
        entries.push(squared);
    }
    // Relative to the edge-matrix orientation, the reduced determinant is negative
    // for points inside the circumsphere in every dimension.
    let det = determinant_of(k, |r, c| entries[r * k + c]);

    Ok(match classify(-sign * det, hadamard_bound(k, &entries)) {
        Orientation::POSITIVE => InSphere::INSIDE,
        Orientation::NEGATIVE => InSphere::OUTSIDE,
        Orientation::DEGENERATE => InSphere::BOUNDARY,
    })
}

/// Lexicographic comparison of two points (first coordinate first), using the IEEE
/// total order on each coordinate.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use hyperhull::geometry::predicates::lexicographic_cmp;
///
/// assert_eq!(lexicographic_cmp(&[0.0, 5.0], &[1.0, 0.0]), Ordering::Less);
/// assert_eq!(lexicographic_cmp(&[1.0, 1.0], &[1.0, 0.0]), Ordering::Greater);
/// ```
#[must_use]
pub fn lexicographic_cmp(a: &[f64], b: &[f64]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_display() {
        assert_eq!(format!("{}", Orientation::POSITIVE), "POSITIVE");
        assert_eq!(format!("{}", InSphere::BOUNDARY), "BOUNDARY");
    }

    #[test]
    fn test_simplex_orientation_flips_with_vertex_swap() {
        let a: [&[f64]; 4] = [
            &[0.0, 0.0, 0.0],
            &[1.0, 0.0, 0.0],
            &[0.0, 1.0, 0.0],
            &[0.0, 0.0, 1.0],
        ];
        let b: [&[f64]; 4] = [a[1], a[0], a[2], a[3]];
        assert_eq!(simplex_orientation(&a).unwrap(), Orientation::POSITIVE);
        assert_eq!(simplex_orientation(&b).unwrap(), Orientation::NEGATIVE);

        let flat: [&[f64]; 4] = [a[0], a[1], a[2], &[1.0, 1.0, 0.0]];
        assert_eq!(simplex_orientation(&flat).unwrap(), Orientation::DEGENERATE);
    }

    #[test]
    fn test_simplex_orientation_rejects_malformed_input() {
        let short: [&[f64]; 2] = [&[0.0, 0.0], &[1.0, 0.0]];
        assert!(matches!(
            simplex_orientation(&short),
            Err(PredicateError::InvalidSimplex { expected: 3, .. })
        ));

        let ragged: [&[f64]; 3] = [&[0.0, 0.0], &[1.0, 0.0, 0.0], &[0.0, 1.0]];
        assert!(matches!(
            simplex_orientation(&ragged),
            Err(PredicateError::DimensionMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn test_insphere_independent_of_vertex_order_2d() {
        let ccw: [&[f64]; 3] = [&[0.0, 0.0], &[1.0, 0.0], &[0.0, 1.0]];
        let cw: [&[f64]; 3] = [&[0.0, 0.0], &[0.0, 1.0], &[1.0, 0.0]];
        for simplex in [ccw, cw] {
            assert_eq!(insphere(&simplex, &[0.4, 0.4]).unwrap(), InSphere::INSIDE);
            assert_eq!(insphere(&simplex, &[1.0, 1.0]).unwrap(), InSphere::BOUNDARY);
            assert_eq!(insphere(&simplex, &[2.0, 2.0]).unwrap(), InSphere::OUTSIDE);
            assert_eq!(insphere(&simplex, &[0.0, 1.0]).unwrap(), InSphere::BOUNDARY);
        }
    }

    #[test]
    fn test_insphere_4d_and_scale_invariance() {
        for scale in [1e-9, 1e-6, 1.0, 1e6, 1e9] {
            let points: Vec<Vec<f64>> = (0..5)
                .map(|i| (0..4).map(|j| if i == j + 1 { scale } else { 0.0 }).collect())
                .collect();
            let simplex: Vec<&[f64]> = points.iter().map(Vec::as_slice).collect();
            let inside = vec![0.2 * scale; 4];
            let outside = vec![2.0 * scale; 4];
            assert_eq!(insphere(&simplex, &inside).unwrap(), InSphere::INSIDE);
            assert_eq!(insphere(&simplex, &outside).unwrap(), InSphere::OUTSIDE);
        }
    }

    #[test]
    fn test_insphere_degenerate_simplex() {
        let flat: [&[f64]; 3] = [&[0.0, 0.0], &[1.0, 0.0], &[2.0, 0.0]];
        assert_eq!(
            insphere(&flat, &[0.5, 0.5]),
            Err(PredicateError::DegenerateSimplex)
        );
    }

    #[test]
    fn test_orientation_2d_is_scale_invariant() {
        for scale in [1e-9, 1.0, 1e9] {
            assert_eq!(
                orientation_2d([0.0, 0.0], [scale, 0.0], [scale, scale]),
                Orientation::POSITIVE
            );
            assert_eq!(
                orientation_2d([0.0, 0.0], [scale, scale], [scale, 0.0]),
                Orientation::NEGATIVE
            );
        }
    }

    #[test]
    fn test_lexicographic_cmp_total_order() {
        assert_eq!(lexicographic_cmp(&[0.0, 1.0], &[0.0, 1.0]), Ordering::Equal);
        assert_eq!(lexicographic_cmp(&[-0.0], &[0.0]), Ordering::Less);
        assert_eq!(lexicographic_cmp(&[0.0], &[0.0, 1.0]), Ordering::Less);
    }
}
