//! Voronoi meshes derived from Delaunay triangulations.
//!
//! Each Delaunay cell contributes one Voronoi vertex, its circumcenter, and each pair
//! of adjacent cells one Voronoi edge. The Voronoi region of an input point is
//! spanned by the circumcenters of the cells incident to it; regions of points on the
//! convex hull are unbounded.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::collections::FastHashMap;
use crate::core::delaunay_triangulation::{DelaunayError, DelaunayTriangulation};
use crate::core::options::HullOptions;
use crate::geometry::util::CircumcenterError;

/// Errors that can occur while building a Voronoi mesh.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum VoronoiError {
    /// The underlying Delaunay triangulation failed.
    #[error("Delaunay triangulation failed: {0}")]
    Delaunay(#[from] DelaunayError),
    /// A Delaunay cell has no circumcenter.
    #[error("Cell {cell} has no circumcenter: {source}")]
    Circumcenter {
        /// Index of the Delaunay cell.
        cell: usize,
        /// The underlying error.
        #[source]
        source: CircumcenterError,
    },
}

/// An edge between two Voronoi vertices; `source < target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoronoiEdge {
    /// First Voronoi vertex.
    pub source: usize,
    /// Second Voronoi vertex.
    pub target: usize,
}

/// Voronoi vertices, edges and per-point regions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoronoiMesh {
    dimension: usize,
    vertices: Vec<Vec<f64>>,
    edges: Vec<VoronoiEdge>,
    regions: Vec<Vec<usize>>,
    unbounded: Vec<bool>,
}

impl VoronoiMesh {
    /// Builds the Voronoi mesh of `points` with default options.
    ///
    /// # Errors
    ///
    /// Returns [`VoronoiError::Delaunay`] if the points cannot be triangulated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hyperhull::core::voronoi::VoronoiMesh;
    ///
    /// let mesh = VoronoiMesh::new(&[[0.0, 0.0], [4.0, 0.0], [0.0, 4.0], [4.0, 4.0], [2.0, 1.0]])
    ///     .unwrap();
    /// assert_eq!(mesh.vertices().len(), 4);
    /// assert_eq!(mesh.edges().len(), 4);
    /// // The center point has a bounded region
    /// assert!(!mesh.is_unbounded(4));
    /// ```
    pub fn new<P: AsRef<[f64]>>(points: &[P]) -> Result<Self, VoronoiError> {
        Self::with_options(points, &HullOptions::default())
    }

    /// Builds the Voronoi mesh of `points` with the given options.
    ///
    /// # Errors
    ///
    /// Returns [`VoronoiError::Delaunay`] if the points cannot be triangulated.
    pub fn with_options<P: AsRef<[f64]>>(
        points: &[P],
        options: &HullOptions,
    ) -> Result<Self, VoronoiError> {
        let triangulation = DelaunayTriangulation::with_options(points, options)?;
        Self::from_triangulation(&triangulation)
    }

    /// Builds the Voronoi mesh dual to `triangulation`.
    ///
    /// # Errors
    ///
    /// Returns [`VoronoiError::Circumcenter`] if a cell is flat.
    pub fn from_triangulation(triangulation: &DelaunayTriangulation) -> Result<Self, VoronoiError> {
        let vertices = (0..triangulation.number_of_cells())
            .map(|cell| {
                triangulation
                    .circumcenter(cell)
                    .map_err(|source| VoronoiError::Circumcenter { cell, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut edges = Vec::new();
        let mut incident: FastHashMap<usize, Vec<usize>> = FastHashMap::default();
        let mut unbounded = vec![false; triangulation.points().len()];
        for (index, cell) in triangulation.cells().iter().enumerate() {
            edges.extend(
                cell.neighbors()
                    .filter(|&neighbor| index < neighbor)
                    .map(|neighbor| VoronoiEdge {
                        source: index,
                        target: neighbor,
                    }),
            );
            for (slot, &vertex) in cell.vertices().iter().enumerate() {
                incident.entry(vertex).or_default().push(index);
                // A boundary facet leaves every point on it with an unbounded region
                if cell.adjacency()[slot].is_none() {
                    for (other_slot, &other) in cell.vertices().iter().enumerate() {
                        if other_slot != slot {
                            unbounded[other] = true;
                        }
                    }
                }
            }
        }

        let regions = (0..triangulation.points().len())
            .map(|point| incident.remove(&point).unwrap_or_default())
            .collect();

        tracing::debug!(
            vertices = vertices.len(),
            edges = edges.len(),
            "Voronoi mesh complete"
        );

        Ok(Self {
            dimension: triangulation.dimension(),
            vertices,
            edges,
            regions,
            unbounded,
        })
    }

    /// Dimension of the mesh.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Voronoi vertices; vertex `i` is the circumcenter of Delaunay cell `i`.
    #[must_use]
    pub fn vertices(&self) -> &[Vec<f64>] {
        &self.vertices
    }

    /// Voronoi edges, one per pair of adjacent Delaunay cells.
    #[must_use]
    pub fn edges(&self) -> &[VoronoiEdge] {
        &self.edges
    }

    /// Voronoi vertices of the region of input point `point`, ascending; empty for
    /// points outside the triangulation or out of range.
    #[must_use]
    pub fn region(&self, point: usize) -> &[usize] {
        self.regions.get(point).map_or(&[], Vec::as_slice)
    }

    /// Whether the region of `point` is unbounded (the point is on the convex hull).
    #[must_use]
    pub fn is_unbounded(&self, point: usize) -> bool {
        self.unbounded.get(point).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::util::{distance, generate_random_points_seeded};

    #[test]
    fn test_voronoi_vertices_are_equidistant_from_cell_vertices() {
        let points = generate_random_points_seeded(25, 2, (0.0, 10.0), 5).unwrap();
        let dt = DelaunayTriangulation::new(&points).unwrap();
        let mesh = VoronoiMesh::from_triangulation(&dt).unwrap();
        assert_eq!(mesh.vertices().len(), dt.number_of_cells());

        for (cell, center) in dt.cells().iter().zip(mesh.vertices()) {
            let radii: Vec<f64> = cell
                .vertices()
                .iter()
                .map(|&v| distance(center, dt.points().point(v)))
                .collect();
            for r in &radii {
                assert!((r - radii[0]).abs() < 1e-8 * radii[0].max(1.0));
            }
        }
    }

    #[test]
    fn test_edges_match_interior_facets() {
        let points = generate_random_points_seeded(20, 3, (-1.0, 1.0), 8).unwrap();
        let dt = DelaunayTriangulation::new(&points).unwrap();
        let mesh = VoronoiMesh::from_triangulation(&dt).unwrap();
        let interior_facets: usize = dt.cells().iter().map(|c| c.neighbors().count()).sum();
        assert_eq!(mesh.edges().len() * 2, interior_facets);
        for edge in mesh.edges() {
            assert!(edge.source < edge.target);
        }
    }

    #[test]
    fn test_regions_and_boundedness() {
        let mesh =
            VoronoiMesh::new(&[[0.0, 0.0], [4.0, 0.0], [0.0, 4.0], [4.0, 4.0], [2.0, 1.0]]).unwrap();
        assert_eq!(mesh.region(4).len(), 4);
        for corner in 0..4 {
            assert!(mesh.is_unbounded(corner));
            assert_eq!(mesh.region(corner).len(), 2);
        }
        assert!(mesh.region(99).is_empty());
        assert!(!mesh.is_unbounded(99));
    }

    #[test]
    fn test_errors_propagate_from_triangulation() {
        assert!(matches!(
            VoronoiMesh::new(&[[0.0, 0.0], [1.0, 1.0]]),
            Err(VoronoiError::Delaunay(DelaunayError::InsufficientPoints { .. }))
        ));
    }
}
