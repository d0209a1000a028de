//! Convex hulls of n-dimensional point sets.
//!
//! [`ConvexHull`] runs either the incremental horizon/cone algorithm (any dimension)
//! or the planar octagon-filter algorithm (2D only) and stores the result as a list
//! of [`ConvexFace`]s. Every face is a (d-1)-simplex given by `d` indices into the
//! stored point set, a unit outward normal, a plane offset and the indices of its `d`
//! neighbors: neighbor `i` shares every vertex of the face except `vertices[i]`.
//!
//! For `d >= 2` the vertex order of a face is such that the generalized cross
//! product of its edges points outward: planar faces run counter-clockwise around the
//! hull and 3D triangles are counter-clockwise seen from outside.
//!
//! # Examples
//!
//! ```rust
//! use hyperhull::geometry::algorithms::convex_hull::ConvexHull;
//!
//! let points = [
//!     [0.0, 0.0, 0.0],
//!     [1.0, 0.0, 0.0],
//!     [0.0, 1.0, 0.0],
//!     [0.0, 0.0, 1.0],
//!     [0.1, 0.1, 0.1],
//! ];
//! let hull = ConvexHull::new(&points).unwrap();
//! assert_eq!(hull.hull_vertices(), &[0, 1, 2, 3]);
//! assert_eq!(hull.face_count(), 4);
//! assert!(hull.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::algorithms::{incremental, planar};
use crate::core::options::{HullAlgorithm, HullOptions};
use crate::core::point_set::{PointSet, PointSetError};
use crate::geometry::plane::{SimplexPoints, signed_distance, simplex_volume};

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur during convex hull construction.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum ConvexHullConstructionError {
    /// The input points were rejected.
    #[error("Invalid input points: {0}")]
    InvalidPoints(#[from] PointSetError),
    /// Fewer than `dimension + 1` points were supplied.
    #[error(
        "Insufficient points for a {dimension}D convex hull: need at least {required}, got {found}"
    )]
    InsufficientPoints {
        /// Dimension of the input.
        dimension: usize,
        /// Minimum number of points, `dimension + 1`.
        required: usize,
        /// Number of points supplied.
        found: usize,
    },
    /// The input has no full-dimensional simplex (coincident points, or all points in a
    /// lower-dimensional flat).
    #[error("Geometric degeneracy encountered during convex hull construction: {message}")]
    GeometricDegeneracy {
        /// Description of the degeneracy.
        message: String,
    },
    /// The configured plane-distance tolerance is not finite and positive.
    #[error("Invalid plane distance tolerance: {value}")]
    InvalidTolerance {
        /// The rejected tolerance.
        value: f64,
    },
    /// The requested algorithm does not support the input dimension.
    #[error("The {algorithm} algorithm does not support {dimension}D input")]
    UnsupportedAlgorithm {
        /// The requested algorithm.
        algorithm: HullAlgorithm,
        /// Dimension of the input.
        dimension: usize,
    },
}

/// Errors reported by [`ConvexHull::validate`] and the point queries.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum ConvexHullValidationError {
    /// An input point lies outside a face by more than the tolerance.
    #[error("Point {point} lies {distance} outside face {face_index}")]
    PointOutsideFace {
        /// Index of the face.
        face_index: usize,
        /// Index of the offending point.
        point: usize,
        /// Signed distance of the point from the face plane.
        distance: f64,
    },
    /// Face `face_index` lists `neighbor` as adjacent but not the other way round.
    #[error("Face {face_index} lists {neighbor} as a neighbor, but {neighbor} does not list it back")]
    AsymmetricAdjacency {
        /// Index of the face.
        face_index: usize,
        /// Index of the neighbor.
        neighbor: usize,
    },
    /// Two adjacent faces do not share exactly `dimension - 1` vertices.
    #[error("Faces {face_index} and {neighbor} share {shared} vertices, expected {expected}")]
    InvalidSharedVertexCount {
        /// Index of the face.
        face_index: usize,
        /// Index of the neighbor.
        neighbor: usize,
        /// Number of shared vertices.
        shared: usize,
        /// Expected number of shared vertices, `dimension - 1`.
        expected: usize,
    },
    /// A face does not have `dimension` distinct vertices.
    #[error("Face {face_index} has {actual} distinct vertices, expected {expected}")]
    InvalidFaceVertexCount {
        /// Index of the face.
        face_index: usize,
        /// Number of distinct vertices found.
        actual: usize,
        /// Expected number of vertices, `dimension`.
        expected: usize,
    },
    /// A query point has the wrong number of coordinates.
    #[error("Dimension mismatch: expected {expected} coordinates, got {found}")]
    DimensionMismatch {
        /// Dimension of the hull.
        expected: usize,
        /// Number of coordinates supplied.
        found: usize,
    },
}

// =============================================================================
// RESULT TYPES
// =============================================================================

/// One face of a convex hull.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvexFace {
    vertices: Vec<usize>,
    adjacency: Vec<usize>,
    normal: Vec<f64>,
    offset: f64,
}

impl ConvexFace {
    pub(crate) const fn new(
        vertices: Vec<usize>,
        adjacency: Vec<usize>,
        normal: Vec<f64>,
        offset: f64,
    ) -> Self {
        Self {
            vertices,
            adjacency,
            normal,
            offset,
        }
    }

    /// The `dimension` point indices of the face.
    #[must_use]
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Face indices of the neighbors; entry `i` is opposite `vertices()[i]`.
    #[must_use]
    pub fn adjacency(&self) -> &[usize] {
        &self.adjacency
    }

    /// Unit outward normal.
    #[must_use]
    pub fn normal(&self) -> &[f64] {
        &self.normal
    }

    /// Plane offset: `normal · x + offset = 0` on the face.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Signed distance of `point` from the face plane, positive outside.
    #[must_use]
    pub fn distance(&self, point: &[f64]) -> f64 {
        signed_distance(&self.normal, self.offset, point)
    }
}

/// Counters collected while building a hull.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HullStatistics {
    /// Points added to the hull by the main loop (after the initial simplex).
    pub processed_vertices: usize,
    /// Points set aside because they sat on a degenerate cone.
    pub singular_vertices: usize,
    /// Degenerate cones encountered.
    pub singular_events: usize,
    /// Faces allocated.
    pub faces_created: usize,
    /// Faces returned to the pool.
    pub faces_recycled: usize,
    /// Beyond buffers allocated fresh.
    pub buffers_created: usize,
    /// Beyond buffers reused from the pool.
    pub buffers_reused: usize,
    /// Cones committed.
    pub cones_committed: usize,
}

/// Faces, singular points and counters produced by one of the hull algorithms.
#[derive(Clone, Debug, Default)]
pub(crate) struct ComputedHull {
    pub(crate) faces: Vec<ConvexFace>,
    pub(crate) singular_vertices: Vec<usize>,
    pub(crate) statistics: HullStatistics,
}

// =============================================================================
// CONVEX HULL
// =============================================================================

/// The convex hull of a point set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConvexHull {
    points: PointSet,
    vertices: Vec<usize>,
    faces: Vec<ConvexFace>,
    singular_vertices: Vec<usize>,
    tolerance: f64,
    algorithm: HullAlgorithm,
    statistics: HullStatistics,
}

impl ConvexHull {
    /// Computes the hull of `points` with default options.
    ///
    /// # Errors
    ///
    /// See [`ConvexHull::from_point_set`].
    pub fn new<P: AsRef<[f64]>>(points: &[P]) -> Result<Self, ConvexHullConstructionError> {
        Self::with_options(points, &HullOptions::default())
    }

    /// Computes the hull of `points` with the given options.
    ///
    /// # Errors
    ///
    /// Returns [`ConvexHullConstructionError::InvalidPoints`] for empty, non-uniform or
    /// non-finite input, and otherwise the errors of [`ConvexHull::from_point_set`].
    pub fn with_options<P: AsRef<[f64]>>(
        points: &[P],
        options: &HullOptions,
    ) -> Result<Self, ConvexHullConstructionError> {
        Self::from_point_set(PointSet::new(points)?, options)
    }

    /// Computes the hull of an already validated point set.
    ///
    /// # Errors
    ///
    /// - [`ConvexHullConstructionError::InvalidTolerance`] if the configured tolerance is
    ///   not finite and positive.
    /// - [`ConvexHullConstructionError::UnsupportedAlgorithm`] if
    ///   [`HullAlgorithm::Planar`] is requested for non-2D input.
    /// - [`ConvexHullConstructionError::InsufficientPoints`] for fewer than
    ///   `dimension + 1` points.
    /// - [`ConvexHullConstructionError::GeometricDegeneracy`] if the points do not span
    ///   the space.
    pub fn from_point_set(
        points: PointSet,
        options: &HullOptions,
    ) -> Result<Self, ConvexHullConstructionError> {
        let dimension = points.dimension();
        let tolerance = options.effective_tolerance(&points).ok_or(
            ConvexHullConstructionError::InvalidTolerance {
                value: options.plane_distance_tolerance.unwrap_or(f64::NAN),
            },
        )?;

        let algorithm = match (options.algorithm, dimension) {
            (HullAlgorithm::Auto | HullAlgorithm::Planar, 2) => HullAlgorithm::Planar,
            (HullAlgorithm::Planar, _) => {
                return Err(ConvexHullConstructionError::UnsupportedAlgorithm {
                    algorithm: HullAlgorithm::Planar,
                    dimension,
                });
            }
            _ => HullAlgorithm::Incremental,
        };

        if points.len() < dimension + 1 {
            return Err(ConvexHullConstructionError::InsufficientPoints {
                dimension,
                required: dimension + 1,
                found: points.len(),
            });
        }

        let computed = match algorithm {
            HullAlgorithm::Planar => planar::compute_planar_hull(&points, tolerance)?,
            _ => incremental::compute_hull(&points, tolerance, options.jitter_seed)?,
        };

        let mut vertices: Vec<usize> = computed
            .faces
            .iter()
            .flat_map(|face| face.vertices.iter().copied())
            .collect();
        vertices.sort_unstable();
        vertices.dedup();

        Ok(Self {
            points,
            vertices,
            faces: computed.faces,
            singular_vertices: computed.singular_vertices,
            tolerance,
            algorithm,
            statistics: computed.statistics,
        })
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Dimension of the input points.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.points.dimension()
    }

    /// The stored input points.
    #[must_use]
    pub const fn points(&self) -> &PointSet {
        &self.points
    }

    /// Indices of the points on the hull, sorted ascending.
    #[must_use]
    pub fn hull_vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Coordinates of the hull vertices, in the order of [`Self::hull_vertices`].
    pub fn vertex_points(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.vertices.iter().map(|&v| self.points.point(v))
    }

    /// The hull faces.
    #[must_use]
    pub fn faces(&self) -> &[ConvexFace] {
        &self.faces
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// The face at `index`, if any.
    #[must_use]
    pub fn get_face(&self, index: usize) -> Option<&ConvexFace> {
        self.faces.get(index)
    }

    /// Points that were dropped because they lay on degenerate cones, sorted ascending.
    #[must_use]
    pub fn singular_vertices(&self) -> &[usize] {
        &self.singular_vertices
    }

    /// The effective plane-distance tolerance.
    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The algorithm that produced the hull (never [`HullAlgorithm::Auto`]).
    #[must_use]
    pub const fn algorithm(&self) -> HullAlgorithm {
        self.algorithm
    }

    /// Construction counters.
    #[must_use]
    pub const fn statistics(&self) -> HullStatistics {
        self.statistics
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    fn check_dimension(&self, point: &[f64]) -> Result<(), ConvexHullValidationError> {
        if point.len() == self.dimension() {
            Ok(())
        } else {
            Err(ConvexHullValidationError::DimensionMismatch {
                expected: self.dimension(),
                found: point.len(),
            })
        }
    }

    /// Indices of the faces whose plane `point` lies above by more than the tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`ConvexHullValidationError::DimensionMismatch`] if `point` has the wrong
    /// number of coordinates.
    pub fn find_visible_faces(&self, point: &[f64]) -> Result<Vec<usize>, ConvexHullValidationError> {
        self.check_dimension(point)?;
        Ok(self
            .faces
            .iter()
            .enumerate()
            .filter(|(_, face)| face.distance(point) > self.tolerance)
            .map(|(i, _)| i)
            .collect())
    }

    /// Whether `point` lies outside the hull by more than the tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`ConvexHullValidationError::DimensionMismatch`] if `point` has the wrong
    /// number of coordinates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hyperhull::geometry::algorithms::convex_hull::ConvexHull;
    ///
    /// let hull = ConvexHull::new(&[[0.0, 0.0], [2.0, 0.0], [0.0, 2.0]]).unwrap();
    /// assert!(!hull.is_point_outside(&[0.5, 0.5]).unwrap());
    /// assert!(hull.is_point_outside(&[2.0, 2.0]).unwrap());
    /// assert!(hull.is_point_outside(&[1.0]).is_err());
    /// ```
    pub fn is_point_outside(&self, point: &[f64]) -> Result<bool, ConvexHullValidationError> {
        self.check_dimension(point)?;
        Ok(self
            .faces
            .iter()
            .any(|face| face.distance(point) > self.tolerance))
    }

    /// Hull volume: the sum, over faces, of the simplices spanned by each face and the
    /// centroid of the hull vertices. In 1D this is the segment length, in 2D the area.
    #[must_use]
    pub fn volume(&self) -> f64 {
        let dimension = self.dimension();
        if self.vertices.is_empty() {
            return 0.0;
        }
        let mut centroid = vec![0.0; dimension];
        for point in self.vertex_points() {
            for (c, x) in centroid.iter_mut().zip(point) {
                *c += x;
            }
        }
        let count = self.vertices.len() as f64;
        for c in &mut centroid {
            *c /= count;
        }

        self.faces
            .iter()
            .map(|face| {
                let mut simplex: SimplexPoints<'_> =
                    face.vertices.iter().map(|&v| self.points.point(v)).collect();
                simplex.push(&centroid);
                simplex_volume(&simplex)
            })
            .sum()
    }

    /// Checks the structure of the hull.
    ///
    /// Verifies that every face has `dimension` distinct vertices, that adjacency is
    /// mutual, that neighbors share `dimension - 1` vertices and that no input point lies
    /// outside any face by more than the tolerance.
    ///
    /// A planar hull of collinear points is a two-sided segment whose faces share both
    /// endpoints; the shared-vertex check is skipped for it.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConvexHullValidationError`] found.
    pub fn validate(&self) -> Result<(), ConvexHullValidationError> {
        let dimension = self.dimension();
        let segment = dimension == 2 && self.faces.len() == 2;

        for (face_index, face) in self.faces.iter().enumerate() {
            let mut distinct = face.vertices.clone();
            distinct.sort_unstable();
            distinct.dedup();
            if distinct.len() != dimension || face.vertices.len() != dimension {
                return Err(ConvexHullValidationError::InvalidFaceVertexCount {
                    face_index,
                    actual: distinct.len(),
                    expected: dimension,
                });
            }

            for &neighbor in &face.adjacency {
                let Some(other) = self.faces.get(neighbor) else {
                    return Err(ConvexHullValidationError::AsymmetricAdjacency {
                        face_index,
                        neighbor,
                    });
                };
                if !other.adjacency.contains(&face_index) {
                    return Err(ConvexHullValidationError::AsymmetricAdjacency {
                        face_index,
                        neighbor,
                    });
                }
                let shared = face
                    .vertices
                    .iter()
                    .filter(|v| other.vertices.contains(v))
                    .count();
                if !segment && shared != dimension - 1 {
                    return Err(ConvexHullValidationError::InvalidSharedVertexCount {
                        face_index,
                        neighbor,
                        shared,
                        expected: dimension - 1,
                    });
                }
            }

            for (point, coords) in self.points.iter().enumerate() {
                let distance = face.distance(coords);
                if distance > self.tolerance {
                    return Err(ConvexHullValidationError::PointOutsideFace {
                        face_index,
                        point,
                        distance,
                    });
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
