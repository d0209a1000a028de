//! Vector norm and distance computations.

/// Sum of squared coordinates.
///
/// # Examples
///
/// ```
/// use hyperhull::geometry::util::squared_norm;
///
/// assert_eq!(squared_norm(&[3.0, 4.0]), 25.0);
/// assert_eq!(squared_norm(&[1.0, 2.0, 2.0]), 9.0);
/// ```
#[inline]
#[must_use]
pub fn squared_norm(coords: &[f64]) -> f64 {
    coords.iter().map(|x| x * x).sum()
}

/// Euclidean norm computed by scaling with the largest magnitude first, which avoids
/// overflow and underflow of the intermediate squares.
///
/// # Examples
///
/// ```
/// use hyperhull::geometry::util::hypot;
///
/// assert_eq!(hypot(&[3.0, 4.0]), 5.0);
/// assert_eq!(hypot(&[1.0, 2.0, 2.0]), 3.0);
/// assert_eq!(hypot(&[]), 0.0);
/// ```
#[must_use]
pub fn hypot(coords: &[f64]) -> f64 {
    match coords {
        [] => 0.0,
        [x] => x.abs(),
        [x, y] => x.hypot(*y),
        _ => {
            let max_abs = coords.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
            if max_abs == 0.0 {
                return 0.0;
            }
            let scaled: f64 = coords
                .iter()
                .map(|x| {
                    let s = x / max_abs;
                    s * s
                })
                .sum();
            max_abs * scaled.sqrt()
        }
    }
}

/// Euclidean distance between two points of equal dimension.
#[must_use]
pub fn distance(a: &[f64], b: &[f64]) -> f64 {
    let diff: Vec<f64> = a.iter().zip(b).map(|(x, y)| x - y).collect();
    hypot(&diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hypot_avoids_overflow() {
        let big = [1e200, 1e200, 1e200];
        assert_relative_eq!(hypot(&big), 3.0_f64.sqrt() * 1e200, max_relative = 1e-12);
        assert!(squared_norm(&big).is_infinite());

        let tiny = [1e-200, 1e-200, 1e-200, 1e-200];
        assert_relative_eq!(hypot(&tiny), 2e-200, max_relative = 1e-12);
    }

    #[test]
    fn test_distance() {
        assert_relative_eq!(distance(&[1.0, 1.0, 1.0], &[2.0, 3.0, 3.0]), 3.0);
        assert_relative_eq!(distance(&[-1.0], &[2.0]), 3.0);
    }
}
