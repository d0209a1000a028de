//! Random point generation functions.
//!
//! All generators take an explicit seed so tests and benchmarks are reproducible.

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::RandomPointGenerationError;
use super::norms::hypot;

/// Generate `n_points` points with coordinates drawn uniformly from `range`.
///
/// # Errors
///
/// Returns [`RandomPointGenerationError`] if `dimension` is zero or the range is empty
/// or not finite.
///
/// # Examples
///
/// ```
/// use hyperhull::geometry::util::generate_random_points_seeded;
///
/// let points1 = generate_random_points_seeded(100, 3, (-5.0, 5.0), 42).unwrap();
/// let points2 = generate_random_points_seeded(100, 3, (-5.0, 5.0), 42).unwrap();
/// assert_eq!(points1, points2);
///
/// let points3 = generate_random_points_seeded(100, 3, (-5.0, 5.0), 123).unwrap();
/// assert_ne!(points1, points3);
/// ```
pub fn generate_random_points_seeded(
    n_points: usize,
    dimension: usize,
    range: (f64, f64),
    seed: u64,
) -> Result<Vec<Vec<f64>>, RandomPointGenerationError> {
    if dimension == 0 {
        return Err(RandomPointGenerationError::InvalidDimension { dimension });
    }
    if !(range.0.is_finite() && range.1.is_finite()) || range.0 >= range.1 {
        return Err(RandomPointGenerationError::InvalidRange {
            min: range.0,
            max: range.1,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..n_points)
        .map(|_| {
            (0..dimension)
                .map(|_| rng.random_range(range.0..range.1))
                .collect()
        })
        .collect())
}

/// Generate `n_points` points uniformly distributed on the sphere of the given
/// `radius` centered at the origin.
///
/// Directions are drawn by rejection sampling in the unit ball and normalized, so
/// every returned point lies on the sphere up to rounding.
///
/// # Errors
///
/// Returns [`RandomPointGenerationError`] if `dimension` is zero or `radius` is not
/// finite and positive.
///
/// # Examples
///
/// ```
/// use hyperhull::geometry::util::{generate_points_on_sphere_seeded, hypot};
///
/// let points = generate_points_on_sphere_seeded(50, 3, 2.0, 7).unwrap();
/// assert!(points.iter().all(|p| (hypot(p) - 2.0).abs() < 1e-12));
/// ```
pub fn generate_points_on_sphere_seeded(
    n_points: usize,
    dimension: usize,
    radius: f64,
    seed: u64,
) -> Result<Vec<Vec<f64>>, RandomPointGenerationError> {
    if dimension == 0 {
        return Err(RandomPointGenerationError::InvalidDimension { dimension });
    }
    if !radius.is_finite() || radius <= 0.0 {
        return Err(RandomPointGenerationError::InvalidRadius { radius });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(n_points);
    let mut direction = vec![0.0; dimension];
    while points.len() < n_points {
        for c in &mut direction {
            *c = rng.random_range(-1.0..=1.0);
        }
        let norm = hypot(&direction);
        // Outside the unit ball or too close to the center to normalize reliably
        if norm > 1.0 || norm < 1e-3 {
            continue;
        }
        points.push(direction.iter().map(|c| radius * c / norm).collect());
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_points_seeded_respects_range() {
        let points = generate_random_points_seeded(200, 4, (-1.0, 3.0), 1).unwrap();
        assert_eq!(points.len(), 200);
        for p in &points {
            assert_eq!(p.len(), 4);
            assert!(p.iter().all(|c| (-1.0..3.0).contains(c)));
        }
    }

    #[test]
    fn test_generators_reject_invalid_parameters() {
        assert!(matches!(
            generate_random_points_seeded(10, 0, (0.0, 1.0), 1),
            Err(RandomPointGenerationError::InvalidDimension { dimension: 0 })
        ));
        assert!(matches!(
            generate_random_points_seeded(10, 2, (1.0, 1.0), 1),
            Err(RandomPointGenerationError::InvalidRange { .. })
        ));
        assert!(matches!(
            generate_points_on_sphere_seeded(10, 3, -1.0, 1),
            Err(RandomPointGenerationError::InvalidRadius { .. })
        ));
    }

    #[test]
    fn test_sphere_points_in_one_dimension() {
        let points = generate_points_on_sphere_seeded(20, 1, 1.5, 3).unwrap();
        assert!(points.iter().all(|p| (p[0].abs() - 1.5).abs() < 1e-12));
    }
}
