//! Matrix operations.
//!
//! Determinants of runtime-sized square matrices are dispatched to stack-allocated
//! `la-stack` matrices up to [`MAX_STACK_MATRIX_DIM`], and to heap-allocated `nalgebra`
//! matrices beyond. Linear solves go through `nalgebra`'s LU decomposition.

use la_stack::{LaError, Matrix as LaMatrix};
use nalgebra as na;
use thiserror::Error;

/// Stack-matrix dispatch limit.
///
/// Face normals of a d-dimensional hull need `(d-1)×(d-1)` minors and simplex volumes
/// need `d×d` determinants, so hulls up to 8D (and Delaunay triangulations up to 7D)
/// never leave the stack.
pub const MAX_STACK_MATRIX_DIM: usize = 8;

/// Internal linear algebra matrix type used by this crate for fixed-size operations.
pub type Matrix<const D: usize> = LaMatrix<D>;

/// Error type for matrix operations.
///
/// # Examples
///
/// ```rust
/// use hyperhull::geometry::matrix::MatrixError;
///
/// let err = MatrixError::SingularMatrix;
/// assert!(matches!(err, MatrixError::SingularMatrix));
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    /// Matrix is singular.
    #[error("Matrix is singular!")]
    SingularMatrix,
    /// Buffer sizes do not describe a `size×size` system.
    #[error("Expected a {size}x{size} system, got {entries} matrix entries and {rhs} right-hand side entries")]
    DimensionMismatch {
        /// Requested system size.
        size: usize,
        /// Number of matrix entries supplied.
        entries: usize,
        /// Number of right-hand side entries supplied.
        rhs: usize,
    },
}

/// Dispatch a runtime `k` (matrix dimension) to a stack-allocated `la_stack::Matrix<k>`.
///
/// Callers check `k` against [`MAX_STACK_MATRIX_DIM`] first.
macro_rules! with_la_stack_matrix {
    ($k:expr, |$m:ident| $body:block) => {{
        match $k {
            1 => {
                let mut $m = $crate::geometry::matrix::Matrix::<1>::zero();
                $body
            }
            2 => {
                let mut $m = $crate::geometry::matrix::Matrix::<2>::zero();
                $body
            }
            3 => {
                let mut $m = $crate::geometry::matrix::Matrix::<3>::zero();
                $body
            }
            4 => {
                let mut $m = $crate::geometry::matrix::Matrix::<4>::zero();
                $body
            }
            5 => {
                let mut $m = $crate::geometry::matrix::Matrix::<5>::zero();
                $body
            }
            6 => {
                let mut $m = $crate::geometry::matrix::Matrix::<6>::zero();
                $body
            }
            7 => {
                let mut $m = $crate::geometry::matrix::Matrix::<7>::zero();
                $body
            }
            8 => {
                let mut $m = $crate::geometry::matrix::Matrix::<8>::zero();
                $body
            }
            k => unreachable!(
                "unsupported stack matrix size: {k} (max {max})",
                max = $crate::geometry::matrix::MAX_STACK_MATRIX_DIM
            ),
        }
    }};
}

#[inline]
pub(crate) fn matrix_set<const D: usize>(m: &mut Matrix<D>, r: usize, c: usize, value: f64) {
    let ok = m.set(r, c, value);
    debug_assert!(ok, "matrix index out of bounds: ({r}, {c}) for {D}x{D}");
}

/// Compute an LU-based determinant, returning 0.0 for singular matrices.
///
/// # Examples
///
/// ```rust
/// use hyperhull::geometry::matrix::{determinant, Matrix};
///
/// let m = Matrix::<2>::zero();
/// assert_eq!(determinant(&m), 0.0);
/// ```
#[inline]
#[must_use]
pub fn determinant<const D: usize>(m: &Matrix<D>) -> f64 {
    match m.det(0.0) {
        Ok(det) => det,
        Err(LaError::Singular { .. }) => 0.0,
        Err(LaError::NonFinite { .. }) => f64::NAN,
    }
}

/// Determinant of the `k×k` matrix whose entry `(row, col)` is `entry(row, col)`.
///
/// The empty matrix (`k == 0`) has determinant 1. Non-finite entries yield NaN.
///
/// # Examples
///
/// ```rust
/// use hyperhull::geometry::matrix::determinant_of;
///
/// // diag(1, 2, 3)
/// let det = determinant_of(3, |r, c| if r == c { (r + 1) as f64 } else { 0.0 });
/// assert!((det - 6.0).abs() < 1e-12);
///
/// // Same matrix on the heap path
/// let big = determinant_of(10, |r, c| if r == c { 2.0 } else { 0.0 });
/// assert!((big - 1024.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn determinant_of(k: usize, mut entry: impl FnMut(usize, usize) -> f64) -> f64 {
    if k == 0 {
        return 1.0;
    }
    if k <= MAX_STACK_MATRIX_DIM {
        return with_la_stack_matrix!(k, |m| {
            for r in 0..k {
                for c in 0..k {
                    matrix_set(&mut m, r, c, entry(r, c));
                }
            }
            determinant(&m)
        });
    }

    let matrix = na::DMatrix::from_fn(k, k, |r, c| entry(r, c));
    if matrix.iter().any(|v| !v.is_finite()) {
        return f64::NAN;
    }
    matrix.determinant()
}

/// Solves the `size×size` system `a · x = b`, with `a` given row-major.
///
/// # Errors
///
/// Returns [`MatrixError::DimensionMismatch`] if the buffers do not match `size`, and
/// [`MatrixError::SingularMatrix`] if the system has no unique finite solution.
///
/// # Examples
///
/// ```rust
/// use hyperhull::geometry::matrix::solve;
///
/// let x = solve(2, &[2.0, 0.0, 0.0, 4.0], &[2.0, 2.0]).unwrap();
/// assert_eq!(x, vec![1.0, 0.5]);
/// ```
pub fn solve(size: usize, a: &[f64], b: &[f64]) -> Result<Vec<f64>, MatrixError> {
    if a.len() != size * size || b.len() != size {
        return Err(MatrixError::DimensionMismatch {
            size,
            entries: a.len(),
            rhs: b.len(),
        });
    }

    let matrix = na::DMatrix::from_row_slice(size, size, a);
    let rhs = na::DVector::from_column_slice(b);
    let solution = matrix.lu().solve(&rhs).ok_or(MatrixError::SingularMatrix)?;
    if solution.iter().any(|v| !v.is_finite()) {
        return Err(MatrixError::SingularMatrix);
    }
    Ok(solution.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    macro_rules! gen_determinant_dispatch_tests {
        ($d:literal) => {
            pastey::paste! {
                #[test]
                fn [<determinant_of_scaled_identity_ $d d>]() {
                    let det = determinant_of($d, |r, c| if r == c { 2.0 } else { 0.0 });
                    assert_relative_eq!(det, 2.0_f64.powi($d), epsilon = 1e-9);
                }

                #[test]
                fn [<determinant_of_rank_deficient_ $d d>]() {
                    // Two equal rows
                    let det = determinant_of($d, |r, c| {
                        let r = if r == 1 { 0 } else { r };
                        ((r * 7 + c * 3) % 5) as f64 + if r == c { 1.0 } else { 0.0 }
                    });
                    assert_relative_eq!(det, 0.0, epsilon = 1e-9);
                }
            }
        };
    }

    gen_determinant_dispatch_tests!(2);
    gen_determinant_dispatch_tests!(3);
    gen_determinant_dispatch_tests!(4);
    gen_determinant_dispatch_tests!(8);
    gen_determinant_dispatch_tests!(9);
    gen_determinant_dispatch_tests!(12);

    #[test]
    fn determinant_of_stack_and_heap_paths_agree() {
        let entry = |r: usize, c: usize| ((r * 31 + c * 17) % 11) as f64 - 5.0 + f64::from(u8::from(r == c)) * 3.0;

        let stack = determinant_of(MAX_STACK_MATRIX_DIM, entry);
        let heap = na::DMatrix::from_fn(MAX_STACK_MATRIX_DIM, MAX_STACK_MATRIX_DIM, entry).determinant();
        assert_relative_eq!(stack, heap, epsilon = 1e-6, max_relative = 1e-9);
    }

    #[test]
    fn determinant_of_non_finite_is_nan() {
        assert!(determinant_of(3, |_, _| f64::NAN).is_nan());
        assert!(determinant_of(10, |r, c| if r == c { f64::INFINITY } else { 0.0 }).is_nan());
    }

    #[test]
    fn solve_rejects_singular_and_mismatched_systems() {
        assert_eq!(
            solve(2, &[1.0, 2.0, 2.0, 4.0], &[1.0, 1.0]),
            Err(MatrixError::SingularMatrix)
        );
        assert!(matches!(
            solve(3, &[1.0; 4], &[1.0; 3]),
            Err(MatrixError::DimensionMismatch { size: 3, .. })
        ));
    }
}
