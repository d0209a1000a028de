//! Delaunay triangulations by lifting to a paraboloid.
//!
//! Each input point `p` is lifted to `(p, ‖p‖²)` one dimension up. The lower faces of
//! the convex hull of the lifted points (those whose outward normal points down in the
//! extra coordinate) project back onto the Delaunay cells of the input.
//!
//! Cospherical inputs (a square, a regular grid) have several Delaunay
//! triangulations, and their lifted hull has coplanar faces. A tiny deterministic
//! jitter of the lifted coordinate ([`HullOptions::lift_jitter`]) picks one of them.
//!
//! # Examples
//!
//! ```rust
//! use hyperhull::core::delaunay_triangulation::DelaunayTriangulation;
//!
//! let dt = DelaunayTriangulation::new(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]).unwrap();
//! assert_eq!(dt.number_of_cells(), 2);
//! assert!(dt.validate_neighbors().is_ok());
//! assert!(dt.validate_delaunay().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::options::{HullAlgorithm, HullOptions};
use crate::core::point_set::{PointSet, PointSetError};
use crate::geometry::algorithms::convex_hull::{
    ConvexHull, ConvexHullConstructionError, HullStatistics,
};
use crate::geometry::plane::SimplexPoints;
use crate::geometry::predicates::{
    InSphere, Orientation, PredicateError, insphere, simplex_orientation,
};
use crate::geometry::util::{CircumcenterError, circumcenter};

/// Lifted hull faces whose normal's last coordinate is below `-LOWER_FACE_EPSILON`
/// are Delaunay cells; vertical faces are not.
pub const LOWER_FACE_EPSILON: f64 = 1e-12;

/// Jitter seeds tried, starting at [`HullOptions::jitter_seed`], before a degenerate
/// lifted hull is reported.
pub const LIFT_ATTEMPTS: u64 = 4;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while building a Delaunay triangulation.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum DelaunayError {
    /// The input points were rejected.
    #[error("Invalid input points: {0}")]
    InvalidPoints(#[from] PointSetError),
    /// Fewer than `dimension + 1` points were supplied.
    #[error(
        "Insufficient points for a {dimension}D triangulation: need at least {required}, got {found}"
    )]
    InsufficientPoints {
        /// Dimension of the input.
        dimension: usize,
        /// Minimum number of points, `dimension + 1`.
        required: usize,
        /// Number of points supplied.
        found: usize,
    },
    /// The input points do not span their space.
    #[error("Degenerate input for Delaunay triangulation: {message}")]
    GeometricDegeneracy {
        /// Description of the degeneracy.
        message: String,
    },
    /// The lifted convex hull could not be built.
    #[error("Lifted convex hull failed: {0}")]
    Hull(#[from] ConvexHullConstructionError),
}

/// Errors reported by the validation methods of [`DelaunayTriangulation`].
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum DelaunayValidationError {
    /// An input point lies strictly inside the circumsphere of a cell.
    #[error("Point {point} lies inside the circumsphere of cell {cell}")]
    EmptyCircumsphereViolation {
        /// Index of the cell.
        cell: usize,
        /// Index of the offending point.
        point: usize,
    },
    /// Cell `cell` lists `neighbor` but not the other way round.
    #[error("Cell {cell} lists {neighbor} as a neighbor, but {neighbor} does not list it back")]
    AsymmetricNeighbors {
        /// Index of the cell.
        cell: usize,
        /// Index of the neighbor.
        neighbor: usize,
    },
    /// A neighbor does not contain the facet it is listed across.
    #[error("Cell {neighbor} does not contain the facet of cell {cell} opposite slot {slot}")]
    MismatchedFacet {
        /// Index of the cell.
        cell: usize,
        /// Adjacency slot of the cell.
        slot: usize,
        /// Index of the neighbor.
        neighbor: usize,
    },
    /// The circumcenter of a cell could not be computed.
    #[error("Circumcenter computation failed: {0}")]
    Circumcenter(#[from] CircumcenterError),
    /// A cell is degenerate.
    #[error("Predicate evaluation failed: {0}")]
    Predicate(#[from] PredicateError),
}

// =============================================================================
// CELLS
// =============================================================================

/// A d-simplex of a Delaunay triangulation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelaunayCell {
    vertices: Vec<usize>,
    adjacency: Vec<Option<usize>>,
}

impl DelaunayCell {
    /// The `dimension + 1` point indices, positively oriented.
    #[must_use]
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Neighbor cells; entry `i` is opposite `vertices()[i]`, `None` on the
    /// triangulation boundary.
    #[must_use]
    pub fn adjacency(&self) -> &[Option<usize>] {
        &self.adjacency
    }

    /// Indices of the neighboring cells.
    pub fn neighbors(&self) -> impl Iterator<Item = usize> + '_ {
        self.adjacency.iter().flatten().copied()
    }

    /// Whether the cell has a facet on the triangulation boundary.
    #[must_use]
    pub fn is_boundary(&self) -> bool {
        self.adjacency.iter().any(Option::is_none)
    }
}

// =============================================================================
// TRIANGULATION
// =============================================================================

/// Delaunay triangulation of a point set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DelaunayTriangulation {
    points: PointSet,
    cells: Vec<DelaunayCell>,
    statistics: HullStatistics,
}

impl DelaunayTriangulation {
    /// Triangulates `points` with default options.
    ///
    /// # Errors
    ///
    /// See [`DelaunayTriangulation::from_point_set`].
    pub fn new<P: AsRef<[f64]>>(points: &[P]) -> Result<Self, DelaunayError> {
        Self::with_options(points, &HullOptions::default())
    }

    /// Triangulates `points` with the given options.
    ///
    /// # Errors
    ///
    /// Returns [`DelaunayError::InvalidPoints`] for empty, non-uniform or non-finite
    /// input, and otherwise the errors of [`DelaunayTriangulation::from_point_set`].
    pub fn with_options<P: AsRef<[f64]>>(
        points: &[P],
        options: &HullOptions,
    ) -> Result<Self, DelaunayError> {
        Self::from_point_set(PointSet::new(points)?, options)
    }

    /// Triangulates an already validated point set.
    ///
    /// The lifted hull always uses the incremental algorithm; the `algorithm` option
    /// is ignored. The plane-distance tolerance applies to the lifted points.
    ///
    /// # Errors
    ///
    /// - [`DelaunayError::InsufficientPoints`] for fewer than `dimension + 1` points.
    /// - [`DelaunayError::GeometricDegeneracy`] when the points do not span the space,
    ///   or when cospherical points are triangulated without jitter.
    /// - [`DelaunayError::Hull`] for an invalid tolerance.
    pub fn from_point_set(points: PointSet, options: &HullOptions) -> Result<Self, DelaunayError> {
        let dimension = points.dimension();
        if points.len() < dimension + 1 {
            return Err(DelaunayError::InsufficientPoints {
                dimension,
                required: dimension + 1,
                found: points.len(),
            });
        }
        if options.effective_tolerance(&points).is_none() {
            return Err(ConvexHullConstructionError::InvalidTolerance {
                value: options.plane_distance_tolerance.unwrap_or(f64::NAN),
            }
            .into());
        }

        if points.len() == dimension + 1 {
            return Self::single_simplex(points);
        }

        let hull = Self::lifted_hull(&points, options)?;

        // Lower faces become cells; every other face is dropped
        let mut cell_of_face = vec![None; hull.face_count()];
        let mut kept = Vec::new();
        for (index, face) in hull.faces().iter().enumerate() {
            if face.normal()[dimension] < -LOWER_FACE_EPSILON {
                cell_of_face[index] = Some(kept.len());
                kept.push(index);
            }
        }

        let cells: Vec<DelaunayCell> = kept
            .iter()
            .map(|&index| {
                let face = &hull.faces()[index];
                let mut vertices = face.vertices().to_vec();
                let mut adjacency: Vec<Option<usize>> =
                    face.adjacency().iter().map(|&n| cell_of_face[n]).collect();
                // Lower faces project with orientation sign (-1)^(d+1)
                if dimension % 2 == 0 {
                    vertices.swap(0, 1);
                    adjacency.swap(0, 1);
                }
                DelaunayCell {
                    vertices,
                    adjacency,
                }
            })
            .collect();

        if cells.is_empty() {
            return Err(DelaunayError::GeometricDegeneracy {
                message: "lifted hull has no lower faces".to_string(),
            });
        }

        tracing::debug!(
            dimension,
            points = points.len(),
            cells = cells.len(),
            lifted_faces = hull.face_count(),
            "Delaunay triangulation complete"
        );

        Ok(Self {
            points,
            cells,
            statistics: hull.statistics(),
        })
    }

    /// Convex hull of the lifted points.
    ///
    /// A jittered lift can still leave a cospherical subset flat within the
    /// tolerance; the lift is then redrawn with the next seed, up to
    /// [`LIFT_ATTEMPTS`] times. An unjittered lift is deterministic and gets one try.
    fn lifted_hull(points: &PointSet, options: &HullOptions) -> Result<ConvexHull, DelaunayError> {
        let attempts = if options.lift_jitter > 0.0 { LIFT_ATTEMPTS } else { 1 };
        let mut attempt = 0;
        loop {
            let seed = options.jitter_seed.wrapping_add(attempt);
            let lifted_options = HullOptions {
                algorithm: HullAlgorithm::Incremental,
                jitter_seed: seed,
                ..*options
            };
            let lifted = points.lifted(options.lift_jitter, seed);
            match ConvexHull::from_point_set(lifted, &lifted_options) {
                Ok(hull) => return Ok(hull),
                Err(ConvexHullConstructionError::GeometricDegeneracy { message }) => {
                    attempt += 1;
                    if attempt >= attempts {
                        return Err(DelaunayError::GeometricDegeneracy { message });
                    }
                    tracing::debug!(seed, attempt, %message, "degenerate lift; redrawing jitter");
                }
                Err(other) => return Err(DelaunayError::Hull(other)),
            }
        }
    }

    /// Exactly `dimension + 1` points: the triangulation is their simplex.
    fn single_simplex(points: PointSet) -> Result<Self, DelaunayError> {
        let orientation = {
            let simplex: SimplexPoints<'_> = points.iter().collect();
            simplex_orientation(&simplex).map_err(|e| DelaunayError::GeometricDegeneracy {
                message: e.to_string(),
            })?
        };

        let mut vertices: Vec<usize> = (0..points.len()).collect();
        match orientation {
            Orientation::POSITIVE => {}
            Orientation::NEGATIVE => vertices.swap(0, 1),
            Orientation::DEGENERATE => {
                return Err(DelaunayError::GeometricDegeneracy {
                    message: "the points span a degenerate simplex".to_string(),
                });
            }
        }

        let cell = DelaunayCell {
            adjacency: vec![None; vertices.len()],
            vertices,
        };
        Ok(Self {
            points,
            cells: vec![cell],
            statistics: HullStatistics::default(),
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

    /// The cells.
    #[must_use]
    pub fn cells(&self) -> &[DelaunayCell] {
        &self.cells
    }

    /// Number of cells.
    #[must_use]
    pub fn number_of_cells(&self) -> usize {
        self.cells.len()
    }

    /// Coordinates of the vertices of cell `index`.
    #[must_use]
    pub fn cell_points(&self, index: usize) -> Option<SimplexPoints<'_>> {
        self.cells
            .get(index)
            .map(|cell| cell.vertices.iter().map(|&v| self.points.point(v)).collect())
    }

    /// Circumcenter of cell `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CircumcenterError::EmptyPointSet`] for an out-of-range index, and
    /// [`CircumcenterError::MatrixInversionFailed`] for a flat cell.
    pub fn circumcenter(&self, index: usize) -> Result<Vec<f64>, CircumcenterError> {
        let points = self.cell_points(index).ok_or(CircumcenterError::EmptyPointSet)?;
        circumcenter(&points)
    }

    /// Input points that are not a vertex of any cell (duplicates and points set
    /// aside on degenerate configurations), sorted ascending.
    #[must_use]
    pub fn unused_points(&self) -> Vec<usize> {
        let mut used = vec![false; self.points.len()];
        for cell in &self.cells {
            for &v in &cell.vertices {
                used[v] = true;
            }
        }
        used.iter()
            .enumerate()
            .filter(|&(_, &u)| !u)
            .map(|(v, _)| v)
            .collect()
    }

    /// Counters of the lifted hull computation.
    #[must_use]
    pub const fn statistics(&self) -> HullStatistics {
        self.statistics
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Checks that neighbor relations are mutual and that each neighbor shares the
    /// facet it is listed across.
    ///
    /// # Errors
    ///
    /// Returns the first [`DelaunayValidationError`] found.
    pub fn validate_neighbors(&self) -> Result<(), DelaunayValidationError> {
        for (index, cell) in self.cells.iter().enumerate() {
            for (slot, neighbor) in cell.adjacency.iter().enumerate() {
                let Some(neighbor) = *neighbor else {
                    continue;
                };
                let Some(other) = self.cells.get(neighbor) else {
                    return Err(DelaunayValidationError::AsymmetricNeighbors {
                        cell: index,
                        neighbor,
                    });
                };
                if !other.adjacency.contains(&Some(index)) {
                    return Err(DelaunayValidationError::AsymmetricNeighbors {
                        cell: index,
                        neighbor,
                    });
                }
                let facet_shared = cell
                    .vertices
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != slot)
                    .all(|(_, v)| other.vertices.contains(v));
                if !facet_shared || other.vertices.contains(&cell.vertices[slot]) {
                    return Err(DelaunayValidationError::MismatchedFacet {
                        cell: index,
                        slot,
                        neighbor,
                    });
                }
            }
        }
        Ok(())
    }

    /// Checks the empty-circumsphere property: no input point lies strictly inside the
    /// circumsphere of any cell.
    ///
    /// # Errors
    ///
    /// Returns [`DelaunayValidationError::EmptyCircumsphereViolation`] for the first
    /// violation, or [`DelaunayValidationError::Predicate`] for a flat cell.
    pub fn validate_delaunay(&self) -> Result<(), DelaunayValidationError> {
        for (index, cell) in self.cells.iter().enumerate() {
            let simplex: SimplexPoints<'_> =
                cell.vertices.iter().map(|&v| self.points.point(v)).collect();
            for (point, coords) in self.points.iter().enumerate() {
                if cell.vertices.contains(&point) {
                    continue;
                }
                if insphere(&simplex, coords)? == InSphere::INSIDE {
                    return Err(DelaunayValidationError::EmptyCircumsphereViolation {
                        cell: index,
                        point,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::HullOptionsBuilder;
    use crate::geometry::util::generate_random_points_seeded;
    use approx::assert_relative_eq;

    #[test]
    fn test_square_splits_into_two_triangles() {
        let dt =
            DelaunayTriangulation::new(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]).unwrap();
        assert_eq!(dt.number_of_cells(), 2);
        for cell in dt.cells() {
            assert!(cell.is_boundary());
            assert_eq!(cell.neighbors().count(), 1);
        }
        dt.validate_neighbors().unwrap();
        dt.validate_delaunay().unwrap();
        assert!(dt.unused_points().is_empty());
    }

    #[test]
    fn test_square_triangulates_for_every_jitter_seed() {
        let square = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        for seed in 0..16 {
            let options = HullOptionsBuilder::default()
                .jitter_seed(seed)
                .build()
                .unwrap();
            let dt = DelaunayTriangulation::with_options(&square, &options)
                .unwrap_or_else(|e| panic!("seed {seed}: {e}"));
            assert_eq!(dt.number_of_cells(), 2, "seed {seed}");
            dt.validate_neighbors().unwrap();
            dt.validate_delaunay().unwrap();
        }
    }

    #[test]
    fn test_single_simplex_keeps_its_points() {
        let tetrahedron = [
            [0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
        ];
        let dt = DelaunayTriangulation::new(&tetrahedron).unwrap();
        assert_eq!(dt.points().len(), 4);
        assert_eq!(dt.number_of_cells(), 1);
        let simplex = dt.cell_points(0).unwrap();
        assert_eq!(simplex_orientation(&simplex).unwrap(), Orientation::POSITIVE);
    }

    #[test]
    fn test_square_without_jitter_is_degenerate() {
        let options = HullOptionsBuilder::default()
            .lift_jitter(0.0)
            .build()
            .unwrap();
        assert!(matches!(
            DelaunayTriangulation::with_options(
                &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
                &options
            ),
            Err(DelaunayError::GeometricDegeneracy { .. })
        ));
    }

    #[test]
    fn test_single_simplex() {
        let dt = DelaunayTriangulation::new(&[[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]]).unwrap();
        assert_eq!(dt.number_of_cells(), 1);
        let cell = &dt.cells()[0];
        assert_eq!(cell.adjacency(), &[None, None, None]);
        let points = dt.cell_points(0).unwrap();
        assert_eq!(simplex_orientation(&points).unwrap(), Orientation::POSITIVE);

        let center = dt.circumcenter(0).unwrap();
        assert_relative_eq!(center[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(center[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_cells_are_positively_oriented() {
        for dimension in 1..=3 {
            let points = generate_random_points_seeded(30, dimension, (-5.0, 5.0), 17).unwrap();
            let dt = DelaunayTriangulation::new(&points).unwrap();
            for index in 0..dt.number_of_cells() {
                let simplex = dt.cell_points(index).unwrap();
                assert_eq!(
                    simplex_orientation(&simplex).unwrap(),
                    Orientation::POSITIVE,
                    "{dimension}D cell {index}"
                );
            }
            dt.validate_neighbors().unwrap();
            dt.validate_delaunay().unwrap();
        }
    }

    #[test]
    fn test_one_dimensional_triangulation_is_a_path() {
        let dt = DelaunayTriangulation::new(&[[0.0], [2.0], [1.0], [5.0]]).unwrap();
        assert_eq!(dt.number_of_cells(), 3);
        let mut cells: Vec<Vec<usize>> = dt.cells().iter().map(|c| c.vertices().to_vec()).collect();
        cells.sort();
        assert_eq!(cells, vec![vec![0, 2], vec![1, 3], vec![2, 1]]);
    }

    #[test]
    fn test_error_paths() {
        assert!(matches!(
            DelaunayTriangulation::new(&[[0.0, 0.0], [1.0, 1.0]]),
            Err(DelaunayError::InsufficientPoints {
                dimension: 2,
                required: 3,
                found: 2
            })
        ));
        assert!(matches!(
            DelaunayTriangulation::new(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]),
            Err(DelaunayError::GeometricDegeneracy { .. })
        ));
        assert!(matches!(
            DelaunayTriangulation::new(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]]),
            Err(DelaunayError::GeometricDegeneracy { .. })
        ));
        let bad = HullOptions {
            plane_distance_tolerance: Some(f64::NAN),
            ..HullOptions::default()
        };
        assert!(matches!(
            DelaunayTriangulation::with_options(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]], &bad),
            Err(DelaunayError::Hull(
                ConvexHullConstructionError::InvalidTolerance { .. }
            ))
        ));
        let dt = DelaunayTriangulation::new(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).unwrap();
        assert_eq!(dt.circumcenter(3), Err(CircumcenterError::EmptyPointSet));
    }
}
