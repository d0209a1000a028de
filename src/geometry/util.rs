//! Geometric utility functions for d-dimensional geometry calculations.
//!
//! This module contains utility functions for computing norms and circumsphere
//! properties of simplices, and seeded point generators used by tests and benchmarks.

use thiserror::Error;

use crate::geometry::matrix::MatrixError;

mod circumsphere;
mod norms;
mod point_generation;

pub use circumsphere::*;
pub use norms::*;
pub use point_generation::*;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised while computing a circumcenter or circumradius.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CircumcenterError {
    /// No points were supplied.
    #[error("Cannot compute the circumcenter of an empty point set")]
    EmptyPointSet,
    /// The number of points does not match `dimension + 1`.
    #[error("Invalid simplex: expected {expected} points in dimension {dimension}, got {actual}")]
    InvalidSimplex {
        /// Number of points supplied.
        actual: usize,
        /// Number of points required.
        expected: usize,
        /// Dimension of the first point.
        dimension: usize,
    },
    /// The simplex is degenerate so the bisector system has no unique solution.
    #[error("Matrix inversion failed: {0}")]
    MatrixInversionFailed(#[from] MatrixError),
}

/// Errors raised by the point generators.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RandomPointGenerationError {
    /// The coordinate range is empty or not finite.
    #[error("Invalid coordinate range: min {min} must be finite and less than max {max}")]
    InvalidRange {
        /// Lower end of the range.
        min: f64,
        /// Upper end of the range.
        max: f64,
    },
    /// Points need at least one coordinate.
    #[error("Invalid dimension {dimension}: points need at least one coordinate")]
    InvalidDimension {
        /// The requested dimension.
        dimension: usize,
    },
    /// The sphere radius is not finite and positive.
    #[error("Invalid radius {radius}: must be finite and positive")]
    InvalidRadius {
        /// The requested radius.
        radius: f64,
    },
}
