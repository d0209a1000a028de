//! Hyperplanes through hull faces.
//!
//! A face of a d-dimensional hull is a (d-1)-simplex spanned by `d` points. Its
//! supporting hyperplane is written `normal · x + offset = 0` with a unit `normal`.
//!
//! The raw (unnormalized) normal is the generalized cross product of the edge vectors
//! `v₁ - v₀, ..., v_{d-1} - v₀`:
//!
//! ```text
//! nᵢ = (-1)ⁱ · det(E without column i)
//! ```
//!
//! which equals `det(Aᵢ)`, with `Aᵢ` the face's coordinate matrix translated to `v₀`
//! and column `i` replaced by ones. Dimensions 1 to 4 use unrolled closed forms of the
//! same expression; higher dimensions evaluate the minors through
//! [`determinant_of`](crate::geometry::matrix::determinant_of).

use crate::core::collections::{NormalBuffer, SmallBuffer};
use crate::geometry::matrix::determinant_of;
use crate::geometry::util::hypot;

/// Points of one face or simplex, borrowed from a point set.
pub type SimplexPoints<'a> = SmallBuffer<&'a [f64], 9>;

/// Writes the raw normal of the face spanned by `vertices` into `normal`.
///
/// `vertices` must hold `d` points of dimension `d`.
///
/// # Examples
///
/// ```
/// use hyperhull::core::collections::NormalBuffer;
/// use hyperhull::geometry::plane::raw_normal;
///
/// let mut normal = NormalBuffer::new();
/// raw_normal(&[&[0.0, 0.0, 0.0], &[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]], &mut normal);
/// assert_eq!(normal.as_slice(), &[0.0, 0.0, 1.0]);
/// ```
pub fn raw_normal(vertices: &[&[f64]], normal: &mut NormalBuffer) {
    normal.clear();
    match vertices {
        [_] => normal.push(1.0),
        [a, b] => {
            normal.push(b[1] - a[1]);
            normal.push(a[0] - b[0]);
        }
        [a, b, c] => {
            let (ux, uy, uz) = (b[0] - a[0], b[1] - a[1], b[2] - a[2]);
            let (vx, vy, vz) = (c[0] - a[0], c[1] - a[1], c[2] - a[2]);
            normal.push(uy.mul_add(vz, -(uz * vy)));
            normal.push(uz.mul_add(vx, -(ux * vz)));
            normal.push(ux.mul_add(vy, -(uy * vx)));
        }
        [a, b, c, d] => {
            let e = [
                [b[0] - a[0], b[1] - a[1], b[2] - a[2], b[3] - a[3]],
                [c[0] - a[0], c[1] - a[1], c[2] - a[2], c[3] - a[3]],
                [d[0] - a[0], d[1] - a[1], d[2] - a[2], d[3] - a[3]],
            ];
            let det3 = |i: usize, j: usize, k: usize| {
                e[0][i] * e[1][j].mul_add(e[2][k], -(e[1][k] * e[2][j]))
                    - e[0][j] * e[1][i].mul_add(e[2][k], -(e[1][k] * e[2][i]))
                    + e[0][k] * e[1][i].mul_add(e[2][j], -(e[1][j] * e[2][i]))
            };
            normal.push(det3(1, 2, 3));
            normal.push(-det3(0, 2, 3));
            normal.push(det3(0, 1, 3));
            normal.push(-det3(0, 1, 2));
        }
        _ => raw_normal_general(vertices, normal),
    }
}

/// General-dimension raw normal; [`raw_normal`] agrees with it in every dimension.
pub fn raw_normal_general(vertices: &[&[f64]], normal: &mut NormalBuffer) {
    normal.clear();
    let dimension = vertices.len();
    let Some(origin) = vertices.first() else {
        return;
    };
    let rows = dimension - 1;
    let mut edges = Vec::with_capacity(rows * dimension);
    for v in &vertices[1..] {
        edges.extend(v.iter().zip(origin.iter()).map(|(x, o)| x - o));
    }

    for i in 0..dimension {
        let minor = determinant_of(rows, |r, c| {
            let column = if c < i { c } else { c + 1 };
            edges[r * dimension + column]
        });
        normal.push(if i % 2 == 0 { minor } else { -minor });
    }
}

/// Normalizes `normal` in place; returns `false` if the result is not finite (the
/// face is degenerate).
pub fn normalize(normal: &mut [f64]) -> bool {
    let norm = hypot(normal);
    for n in normal.iter_mut() {
        *n /= norm;
    }
    normal.iter().all(|n| n.is_finite())
}

/// Orientation of a supporting hyperplane relative to an interior point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneOrientation {
    /// Offset such that `normal · x + offset = 0` on the plane.
    pub offset: f64,
    /// Whether the normal had to be negated to point away from the interior point.
    pub flipped: bool,
}

/// Computes the offset of the plane with unit `normal` through `anchor`, flipping both
/// when `interior` lies on the positive side.
///
/// # Examples
///
/// ```
/// use hyperhull::geometry::plane::orient_plane;
///
/// let mut normal = [0.0, 1.0];
/// let plane = orient_plane(&mut normal, &[0.0, 2.0], &[0.0, 5.0]);
/// assert_eq!(normal, [0.0, -1.0]);
/// assert_eq!(plane.offset, 2.0);
/// assert!(plane.flipped);
/// ```
pub fn orient_plane(normal: &mut [f64], anchor: &[f64], interior: &[f64]) -> PlaneOrientation {
    let mut offset = -dot(normal, anchor);
    let flipped = dot(normal, interior) + offset > 0.0;
    if flipped {
        for n in normal.iter_mut() {
            *n = -*n;
        }
        offset = -offset;
    }
    PlaneOrientation { offset, flipped }
}

/// Signed distance of `point` from the plane `normal · x + offset = 0`; positive
/// values are on the side the normal points to.
#[inline]
#[must_use]
pub fn signed_distance(normal: &[f64], offset: f64, point: &[f64]) -> f64 {
    dot(normal, point) + offset
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// `n!` as a float.
#[must_use]
pub fn factorial(n: usize) -> f64 {
    (2..=n).fold(1.0, |acc, k| acc * k as f64)
}

/// Volume of the simplex spanned by `d + 1` points in `d` dimensions:
/// `|det(pᵢ - p₀)| / d!`.
///
/// # Examples
///
/// ```
/// use hyperhull::geometry::plane::simplex_volume;
///
/// let tetrahedron: [&[f64]; 4] = [
///     &[0.0, 0.0, 0.0],
///     &[1.0, 0.0, 0.0],
///     &[0.0, 1.0, 0.0],
///     &[0.0, 0.0, 1.0],
/// ];
/// assert!((simplex_volume(&tetrahedron) - 1.0 / 6.0).abs() < 1e-15);
/// ```
#[must_use]
pub fn simplex_volume(vertices: &[&[f64]]) -> f64 {
    let Some(origin) = vertices.first() else {
        return 0.0;
    };
    let dimension = origin.len();
    let det = determinant_of(dimension, |r, c| vertices[r + 1][c] - origin[c]);
    det.abs() / factorial(dimension)
}
