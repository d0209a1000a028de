//! Serde round trips for the public result types.

use approx::assert_relative_eq;
use hyperhull::core::delaunay_triangulation::DelaunayTriangulation;
use hyperhull::core::options::{HullAlgorithm, HullOptions, HullOptionsBuilder};
use hyperhull::core::point_set::PointSet;
use hyperhull::core::voronoi::VoronoiMesh;
use hyperhull::geometry::algorithms::convex_hull::ConvexHull;
use hyperhull::geometry::util::generate_random_points_seeded;

#[test]
fn test_options_round_trip() {
    let options = HullOptionsBuilder::default()
        .algorithm(HullAlgorithm::Incremental)
        .plane_distance_tolerance(1e-7)
        .lift_jitter(0.0)
        .jitter_seed(42)
        .build()
        .unwrap();

    let json = serde_json::to_string(&options).unwrap();
    let restored: HullOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, options);
}

#[test]
fn test_point_set_round_trip() {
    let points = PointSet::new(&[[0.5, -1.25], [3.0, 4.0], [-2.0, 0.0]]).unwrap();
    let json = serde_json::to_string(&points).unwrap();
    let restored: PointSet = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.dimension(), 2);
    assert_eq!(restored.as_flat(), points.as_flat());
}

#[test]
fn test_convex_hull_round_trip() {
    let points = generate_random_points_seeded(60, 3, (-5.0, 5.0), 9).unwrap();
    let hull = ConvexHull::new(&points).unwrap();

    let json = serde_json::to_string(&hull).unwrap();
    let restored: ConvexHull = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.hull_vertices(), hull.hull_vertices());
    assert_eq!(restored.face_count(), hull.face_count());
    assert_eq!(restored.algorithm(), hull.algorithm());
    assert_eq!(restored.statistics(), hull.statistics());
    for (a, b) in restored.faces().iter().zip(hull.faces()) {
        assert_eq!(a.vertices(), b.vertices());
        assert_eq!(a.adjacency(), b.adjacency());
        assert_relative_eq!(a.offset(), b.offset(), epsilon = 1e-12);
    }
    assert_relative_eq!(restored.volume(), hull.volume(), epsilon = 1e-9);
    restored.validate().unwrap();
}

#[test]
fn test_delaunay_and_voronoi_round_trip() {
    let points = generate_random_points_seeded(30, 2, (0.0, 10.0), 2).unwrap();
    let dt = DelaunayTriangulation::new(&points).unwrap();

    let json = serde_json::to_string(&dt).unwrap();
    let restored: DelaunayTriangulation = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.cells(), dt.cells());
    restored.validate_neighbors().unwrap();

    let mesh = VoronoiMesh::from_triangulation(&restored).unwrap();
    let json = serde_json::to_string(&mesh).unwrap();
    let restored_mesh: VoronoiMesh = serde_json::from_str(&json).unwrap();
    assert_eq!(restored_mesh.edges(), mesh.edges());
    for point in 0..points.len() {
        assert_eq!(restored_mesh.region(point), mesh.region(point));
        assert_eq!(restored_mesh.is_unbounded(point), mesh.is_unbounded(point));
    }
}
