//! # hyperhull
//!
//! This is a library for computing convex hulls of n-dimensional point sets, together
//! with the Delaunay triangulations and Voronoi meshes that can be derived from them.
//!
//! # Features
//!
//! - d-dimensional convex hulls via incremental horizon/cone construction
//! - A dedicated 2D hull (Akl–Toussaint octagon filter followed by pocket pruning)
//! - d-dimensional Delaunay triangulations via the lifting map
//! - Voronoi meshes dual to Delaunay triangulations
//! - Serialization/Deserialization with [serde](https://serde.rs)
//!
//! # Basic Usage
//!
//! Points are plain coordinate slices; every input point keeps its index, and hull faces
//! refer to input points by that index.
//!
//! ```rust
//! use hyperhull::prelude::*;
//!
//! let points = vec![
//!     [0.0, 0.0, 0.0],
//!     [1.0, 0.0, 0.0],
//!     [0.0, 1.0, 0.0],
//!     [0.0, 0.0, 1.0],
//!     [0.2, 0.2, 0.2], // interior
//! ];
//!
//! let hull = ConvexHull::new(&points).unwrap();
//! assert_eq!(hull.dimension(), 3);
//! assert_eq!(hull.face_count(), 4);
//! assert_eq!(hull.hull_vertices(), &[0, 1, 2, 3]);
//! assert!(hull.validate().is_ok());
//!
//! // Point queries against the finished hull
//! assert!(hull.is_point_outside(&[1.0, 1.0, 1.0]).unwrap());
//! assert!(!hull.is_point_outside(&[0.1, 0.1, 0.1]).unwrap());
//! ```
//!
//! # Delaunay Triangulation
//!
//! Lifting every point onto the paraboloid `x_{d+1} = |x|²` and keeping the lower faces
//! of the lifted hull yields the Delaunay triangulation.
//!
//! ```rust
//! use hyperhull::prelude::*;
//!
//! let points = vec![[0.0, 0.0], [3.0, 0.0], [0.0, 3.0], [3.0, 3.0], [1.0, 1.2]];
//! let dt = DelaunayTriangulation::new(&points).unwrap();
//!
//! assert_eq!(dt.number_of_cells(), 4);
//! assert!(dt.validate_neighbors().is_ok());
//! assert!(dt.validate_delaunay().is_ok());
//! ```
//!
//! # Options
//!
//! [`HullOptions`](core::options::HullOptions) selects the algorithm, the plane distance
//! tolerance and the jitter applied to lifted coordinates:
//!
//! ```rust
//! use hyperhull::prelude::*;
//!
//! let options = HullOptionsBuilder::default()
//!     .algorithm(HullAlgorithm::Incremental)
//!     .plane_distance_tolerance(1e-9)
//!     .build()
//!     .unwrap();
//!
//! let hull = ConvexHull::with_options(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]], &options).unwrap();
//! assert_eq!(hull.algorithm(), HullAlgorithm::Incremental);
//! assert_eq!(hull.tolerance(), 1e-9);
//! ```
//!
//! # Logging
//!
//! Construction progress is reported through [`tracing`](https://docs.rs/tracing) at
//! `debug` and `trace` level. Install any subscriber to see it, for example
//! `tracing_subscriber::fmt().with_env_filter("hyperhull=debug").init()`.

// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// The `core` module contains the point storage, the hull construction algorithms and the
/// structures derived from hulls.
///
/// It includes [`PointSet`](point_set::PointSet), the face and pool bookkeeping used by
/// the incremental algorithm, [`DelaunayTriangulation`](delaunay_triangulation::DelaunayTriangulation)
/// and [`VoronoiMesh`](voronoi::VoronoiMesh).
pub mod core {
    /// Hull construction algorithms
    pub mod algorithms {
        /// Incremental horizon/cone construction in any dimension
        pub mod incremental;
        /// Initial simplex selection
        pub mod initial_simplex;
        /// Akl–Toussaint filtering and pocket pruning in 2D
        pub mod planar;
    }
    /// High-performance collection types optimized for hull construction
    pub mod collections;
    pub mod connector;
    pub mod delaunay_triangulation;
    pub mod face;
    pub mod face_list;
    pub mod options;
    pub mod point_set;
    pub mod pool;
    pub mod util;
    pub mod voronoi;
    // Re-export the `core` modules.
    pub use delaunay_triangulation::*;
    pub use options::*;
    pub use point_set::*;
    pub use util::*;
    pub use voronoi::*;
    // Note: collections and the construction bookkeeping are not re-exported here
    // Import specific types via prelude or use crate::core::collections::
}

/// Contains geometric predicates, hyperplane helpers and the convex hull itself.
///
/// All routines operate on `&[f64]` coordinate slices so they work in any dimension.
pub mod geometry {
    /// Geometric algorithms on point sets
    pub mod algorithms {
        /// Convex hulls of d-dimensional point sets
        pub mod convex_hull;
        pub use convex_hull::*;
    }
    pub mod matrix;
    /// Hyperplanes through simplices
    pub mod plane;
    pub mod predicates;
    /// Geometric utility functions for d-dimensional geometry calculations
    pub mod util;
    pub use algorithms::*;
    pub use matrix::*;
    pub use plane::*;
    pub use predicates::*;
    pub use util::*;
}

/// A prelude module that re-exports commonly used types.
/// This makes it easier to import the most commonly used items from the crate.
pub mod prelude {
    // Re-export from core
    pub use crate::core::{delaunay_triangulation::*, options::*, point_set::*, voronoi::*};

    // Re-export commonly used collection types from core::collections
    pub use crate::core::collections::{
        FastHashMap, FastHashSet, SmallBuffer, fast_hash_map_with_capacity,
        fast_hash_set_with_capacity,
    };

    // Re-export from geometry
    pub use crate::geometry::{
        algorithms::*,
        predicates::{InSphere, Orientation, insphere, orientation_2d, simplex_orientation},
        util::*,
    };
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{
        core::{
            delaunay_triangulation::DelaunayTriangulation, options::HullOptions,
            point_set::PointSet, voronoi::VoronoiMesh,
        },
        geometry::algorithms::convex_hull::ConvexHull,
        is_normal,
    };

    // =============================================================================
    // TYPE SAFETY TESTS
    // =============================================================================

    #[test]
    fn normal_types() {
        assert!(is_normal::<PointSet>());
        assert!(is_normal::<ConvexHull>());
        assert!(is_normal::<DelaunayTriangulation>());
        assert!(is_normal::<VoronoiMesh>());
        assert!(is_normal::<HullOptions>());
    }

    #[test]
    fn test_prelude_collections_exports() {
        use crate::prelude::*;

        let mut map: FastHashMap<u64, usize> = FastHashMap::default();
        map.insert(123, 456);
        assert_eq!(map.get(&123), Some(&456));

        let mut set: FastHashSet<u64> = FastHashSet::default();
        set.insert(789);
        assert!(set.contains(&789));

        let mut buffer: SmallBuffer<i32, 8> = SmallBuffer::new();
        buffer.push(42);
        assert_eq!(buffer.len(), 1);

        let map_with_cap = fast_hash_map_with_capacity::<u64, usize>(100);
        assert!(map_with_cap.capacity() >= 100);

        let set_with_cap = fast_hash_set_with_capacity::<u64>(50);
        assert!(set_with_cap.capacity() >= 50);
    }

    #[test]
    fn test_prelude_geometry_exports() {
        use crate::prelude::*;

        let hull = ConvexHull::new(&[[0.0, 0.0], [2.0, 0.0], [0.0, 2.0]]).unwrap();
        assert_eq!(hull.face_count(), 3);
        assert_eq!(
            orientation_2d([0.0, 0.0], [1.0, 0.0], [0.0, 1.0]),
            Orientation::POSITIVE
        );
        let center = circumcenter(&[&[0.0, 0.0][..], &[2.0, 0.0], &[0.0, 2.0]]).unwrap();
        assert!((center[0] - 1.0).abs() < 1e-12 && (center[1] - 1.0).abs() < 1e-12);
    }
}
