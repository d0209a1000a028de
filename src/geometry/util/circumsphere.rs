//! Circumsphere calculations for simplices.

use crate::geometry::matrix::solve;

use super::CircumcenterError;
use super::norms::{distance, squared_norm};

/// Calculate the circumcenter of a set of points forming a simplex.
///
/// The circumcenter `C` of a simplex `x₀, ..., x_d` solves the perpendicular-bisector
/// system
///
/// ```text
/// (xᵢ - x₀) · y = ‖xᵢ - x₀‖²,   i = 1..d
/// C = x₀ + y / 2
/// ```
///
/// Using the approach from:
///
/// Lévy, Bruno, and Yang Liu.
/// "Lp Centroidal Voronoi Tessellation and Its Applications."
/// ACM Transactions on Graphics 29, no. 4 (July 26, 2010): 119:1-119:11.
///
/// # Errors
///
/// Returns [`CircumcenterError`] if the input is empty, does not hold `dimension + 1`
/// points, or is degenerate.
///
/// # Examples
///
/// ```
/// use hyperhull::geometry::util::circumcenter;
///
/// let simplex: [&[f64]; 3] = [&[0.0, 0.0], &[2.0, 0.0], &[0.0, 2.0]];
/// let center = circumcenter(&simplex).unwrap();
/// assert!((center[0] - 1.0).abs() < 1e-12);
/// assert!((center[1] - 1.0).abs() < 1e-12);
/// ```
pub fn circumcenter(points: &[&[f64]]) -> Result<Vec<f64>, CircumcenterError> {
    let origin = *points.first().ok_or(CircumcenterError::EmptyPointSet)?;
    let dimension = origin.len();
    if points.len() != dimension + 1 || points.iter().any(|p| p.len() != dimension) {
        return Err(CircumcenterError::InvalidSimplex {
            actual: points.len(),
            expected: dimension + 1,
            dimension,
        });
    }

    let mut a = Vec::with_capacity(dimension * dimension);
    let mut b = Vec::with_capacity(dimension);
    for p in &points[1..] {
        let start = a.len();
        a.extend(p.iter().zip(origin).map(|(x, o)| x - o));
        b.push(squared_norm(&a[start..]));
    }

    let y = solve(dimension, &a, &b)?;
    Ok(origin.iter().zip(&y).map(|(o, t)| o + 0.5 * t).collect())
}

/// Distance from `center` to the first point of the simplex.
#[must_use]
pub fn circumradius_with_center(points: &[&[f64]], center: &[f64]) -> f64 {
    points.first().map_or(0.0, |p| distance(p, center))
}

/// Calculate the circumradius of a set of points forming a simplex.
///
/// # Errors
///
/// Returns an error if the circumcenter calculation fails. See [`circumcenter`] for details.
///
/// # Examples
///
/// ```
/// use hyperhull::geometry::util::circumradius;
///
/// let simplex: [&[f64]; 4] = [
///     &[0.0, 0.0, 0.0],
///     &[1.0, 0.0, 0.0],
///     &[0.0, 1.0, 0.0],
///     &[0.0, 0.0, 1.0],
/// ];
/// let radius = circumradius(&simplex).unwrap();
/// assert!((radius - 0.75_f64.sqrt()).abs() < 1e-12);
/// ```
pub fn circumradius(points: &[&[f64]]) -> Result<f64, CircumcenterError> {
    let center = circumcenter(points)?;
    Ok(circumradius_with_center(points, &center))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_circumcenter_equidistant_in_4d() {
        let points: [&[f64]; 5] = [
            &[0.3, 0.1, -0.2, 1.0],
            &[1.5, 0.2, 0.0, 0.4],
            &[-0.4, 1.1, 0.3, 0.0],
            &[0.2, -0.7, 1.2, 0.5],
            &[0.0, 0.4, 0.1, -1.3],
        ];
        let center = circumcenter(&points).unwrap();
        let r0 = distance(points[0], &center);
        for p in &points[1..] {
            assert_relative_eq!(distance(p, &center), r0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_circumcenter_errors() {
        assert_eq!(circumcenter(&[]), Err(CircumcenterError::EmptyPointSet));

        let short: [&[f64]; 2] = [&[0.0, 0.0], &[1.0, 0.0]];
        assert!(matches!(
            circumcenter(&short),
            Err(CircumcenterError::InvalidSimplex { expected: 3, .. })
        ));

        let collinear: [&[f64]; 3] = [&[0.0, 0.0], &[1.0, 0.0], &[2.0, 0.0]];
        assert!(matches!(
            circumcenter(&collinear),
            Err(CircumcenterError::MatrixInversionFailed(_))
        ));
    }
}
