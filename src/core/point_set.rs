//! Dimensioned point storage.
//!
//! A [`PointSet`] keeps every coordinate of every input point in one flat buffer,
//! addressed as `coordinates[point * dimension + axis]`. Points are identified by their
//! input index for the lifetime of a computation, and the set is never mutated after
//! construction: derived sets (such as the paraboloid lift used for Delaunay
//! triangulations) are new values.

use std::cmp::Ordering;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::predicates::lexicographic_cmp;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised while validating input points.
///
/// # Examples
///
/// ```rust
/// use hyperhull::core::point_set::{PointSet, PointSetError};
///
/// let points: Vec<Vec<f64>> = vec![];
/// assert!(matches!(PointSet::new(&points), Err(PointSetError::EmptyInput)));
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum PointSetError {
    /// No points were supplied.
    #[error("Cannot build a point set from an empty input")]
    EmptyInput,
    /// The first point has no coordinates.
    #[error("Invalid dimension {dimension}: points need at least one coordinate")]
    InvalidDimension {
        /// The dimension inferred from the first point.
        dimension: usize,
    },
    /// A point does not have the dimension inferred from the first point.
    #[error("Point {index} has {found} coordinates, expected {expected}")]
    NonUniformDimension {
        /// Index of the offending point.
        index: usize,
        /// Dimension inferred from the first point.
        expected: usize,
        /// Number of coordinates of the offending point.
        found: usize,
    },
    /// A coordinate is NaN or infinite.
    #[error("Point {index} has a non-finite coordinate {value} on axis {axis}")]
    NonFiniteCoordinate {
        /// Index of the offending point.
        index: usize,
        /// Axis of the offending coordinate.
        axis: usize,
        /// The offending value.
        value: f64,
    },
    /// A flat coordinate buffer is not a whole number of points.
    #[error("Flat buffer of length {length} is not a multiple of dimension {dimension}")]
    FlatBufferLength {
        /// Length of the supplied buffer.
        length: usize,
        /// Requested dimension.
        dimension: usize,
    },
}

// =============================================================================
// POINT SET
// =============================================================================

/// Axis-aligned bounding box of a point set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum coordinate along each axis.
    pub min: Vec<f64>,
    /// Maximum coordinate along each axis.
    pub max: Vec<f64>,
}

impl BoundingBox {
    /// Length of the longest side.
    #[must_use]
    pub fn extent(&self) -> f64 {
        self.min
            .iter()
            .zip(&self.max)
            .map(|(lo, hi)| hi - lo)
            .fold(0.0, f64::max)
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Vec<f64> {
        self.min
            .iter()
            .zip(&self.max)
            .map(|(lo, hi)| 0.5 * (lo + hi))
            .collect()
    }
}

/// An immutable, ordered set of points of uniform dimension.
///
/// # Examples
///
/// ```rust
/// use hyperhull::core::point_set::PointSet;
///
/// let set = PointSet::new(&[[0.0, 0.0], [2.0, 1.0], [1.0, 3.0]]).unwrap();
/// assert_eq!(set.dimension(), 2);
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.point(1), &[2.0, 1.0]);
/// assert_eq!(set.extent(), 3.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    dimension: usize,
    coordinates: Vec<f64>,
}

impl PointSet {
    /// Builds a point set from a slice of coordinate sequences.
    ///
    /// The dimension is inferred from the first point.
    ///
    /// # Errors
    ///
    /// Returns [`PointSetError`] if the input is empty, the first point has no
    /// coordinates, points disagree on their dimension, or any coordinate is not finite.
    pub fn new<P: AsRef<[f64]>>(points: &[P]) -> Result<Self, PointSetError> {
        let first = points.first().ok_or(PointSetError::EmptyInput)?;
        let dimension = first.as_ref().len();
        if dimension == 0 {
            return Err(PointSetError::InvalidDimension { dimension });
        }

        let mut coordinates = Vec::with_capacity(points.len() * dimension);
        for (index, point) in points.iter().enumerate() {
            let point = point.as_ref();
            if point.len() != dimension {
                return Err(PointSetError::NonUniformDimension {
                    index,
                    expected: dimension,
                    found: point.len(),
                });
            }
            coordinates.extend_from_slice(point);
        }

        Self::from_flat(dimension, coordinates)
    }

    /// Builds a point set from a flat coordinate buffer.
    ///
    /// # Errors
    ///
    /// Returns [`PointSetError`] if `dimension` is zero, the buffer is empty or not a
    /// whole number of points, or any coordinate is not finite.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hyperhull::core::point_set::PointSet;
    ///
    /// let set = PointSet::from_flat(3, vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(set.len(), 2);
    /// assert!(PointSet::from_flat(3, vec![0.0; 4]).is_err());
    /// ```
    pub fn from_flat(dimension: usize, coordinates: Vec<f64>) -> Result<Self, PointSetError> {
        if dimension == 0 {
            return Err(PointSetError::InvalidDimension { dimension });
        }
        if coordinates.is_empty() {
            return Err(PointSetError::EmptyInput);
        }
        if coordinates.len() % dimension != 0 {
            return Err(PointSetError::FlatBufferLength {
                length: coordinates.len(),
                dimension,
            });
        }
        if let Some(position) = coordinates.iter().position(|c| !c.is_finite()) {
            return Err(PointSetError::NonFiniteCoordinate {
                index: position / dimension,
                axis: position % dimension,
                value: coordinates[position],
            });
        }

        Ok(Self {
            dimension,
            coordinates,
        })
    }

    /// Number of coordinates per point.
    #[inline]
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of points.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.coordinates.len() / self.dimension
    }

    /// Always `false` for a constructed set; present for API symmetry with `len`.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Coordinates of point `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[inline]
    #[must_use]
    pub fn point(&self, index: usize) -> &[f64] {
        let start = index * self.dimension;
        &self.coordinates[start..start + self.dimension]
    }

    /// The flat coordinate buffer.
    #[must_use]
    pub fn as_flat(&self) -> &[f64] {
        &self.coordinates
    }

    /// Iterates over the points in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.coordinates.chunks_exact(self.dimension)
    }

    /// Axis-aligned bounding box of all points.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        let mut min = self.point(0).to_vec();
        let mut max = min.clone();
        for point in self.iter().skip(1) {
            for (axis, &c) in point.iter().enumerate() {
                min[axis] = min[axis].min(c);
                max[axis] = max[axis].max(c);
            }
        }
        BoundingBox { min, max }
    }

    /// Longest side of the bounding box.
    #[must_use]
    pub fn extent(&self) -> f64 {
        self.bounding_box().extent()
    }

    /// Lexicographic comparison of points `a` and `b` (first coordinate first).
    #[must_use]
    pub fn lexicographic_cmp(&self, a: usize, b: usize) -> Ordering {
        lexicographic_cmp(self.point(a), self.point(b))
    }

    /// Lifts the points onto the paraboloid one dimension up.
    ///
    /// Each point is translated to the bounding-box center (this does not change
    /// the Delaunay triangulation) and gets an extra coordinate equal to its squared
    /// norm. When `jitter` is positive, the lifted coordinate is perturbed by a
    /// deterministic uniform offset in `±jitter * scale`, where `scale` is the larger
    /// of the input extent and the largest lifted height. Offsets are drawn from a
    /// generator seeded with `seed`, which breaks cospherical ties.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hyperhull::core::point_set::PointSet;
    ///
    /// let set = PointSet::new(&[[0.0, 0.0], [2.0, 0.0], [0.0, 2.0]]).unwrap();
    /// let lifted = set.lifted(0.0, 0);
    /// assert_eq!(lifted.dimension(), 3);
    /// // Centered at (1, 1): the first point becomes (-1, -1, 2)
    /// assert_eq!(lifted.point(0), &[-1.0, -1.0, 2.0]);
    /// ```
    #[must_use]
    pub fn lifted(&self, jitter: f64, seed: u64) -> Self {
        let dimension = self.dimension + 1;
        let center = self.bounding_box().center();
        let mut coordinates = Vec::with_capacity(self.len() * dimension);
        let mut lifted_max = 0.0_f64;

        for point in self.iter() {
            let mut squared = 0.0;
            for (c, m) in point.iter().zip(&center) {
                let t = c - m;
                coordinates.push(t);
                squared += t * t;
            }
            coordinates.push(squared);
            lifted_max = lifted_max.max(squared);
        }

        if jitter > 0.0 {
            let scale = jitter * self.extent().max(lifted_max);
            let mut rng = StdRng::seed_from_u64(seed);
            for height in coordinates.iter_mut().skip(dimension - 1).step_by(dimension) {
                *height += scale * rng.random_range(-1.0..=1.0);
            }
        }

        Self {
            dimension,
            coordinates,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
