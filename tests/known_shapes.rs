//! Convex hulls of shapes with known combinatorics.
//!
//! Simplices, hypercubes, cross-polytopes and sphere samples across dimensions, checked
//! against their closed-form face counts and volumes.

use approx::assert_relative_eq;
use hyperhull::core::options::{HullAlgorithm, HullOptionsBuilder};
use hyperhull::geometry::algorithms::convex_hull::ConvexHull;
use hyperhull::geometry::util::{generate_points_on_sphere_seeded, generate_random_points_seeded};

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

// =============================================================================
// SHAPE GENERATORS
// =============================================================================

/// Origin plus the unit vectors.
fn standard_simplex(dimension: usize) -> Vec<Vec<f64>> {
    let mut points = vec![vec![0.0; dimension]];
    for axis in 0..dimension {
        let mut p = vec![0.0; dimension];
        p[axis] = 1.0;
        points.push(p);
    }
    points
}

/// Corners of the unit hypercube, in binary counting order.
fn hypercube(dimension: usize) -> Vec<Vec<f64>> {
    (0..1usize << dimension)
        .map(|bits| {
            (0..dimension)
                .map(|axis| if bits >> axis & 1 == 1 { 1.0 } else { 0.0 })
                .collect()
        })
        .collect()
}

/// `±e_i` for every axis.
fn cross_polytope(dimension: usize) -> Vec<Vec<f64>> {
    let mut points = Vec::new();
    for axis in 0..dimension {
        for sign in [1.0, -1.0] {
            let mut p = vec![0.0; dimension];
            p[axis] = sign;
            points.push(p);
        }
    }
    points
}

fn factorial(n: usize) -> f64 {
    (1..=n).map(|k| k as f64).product()
}

// =============================================================================
// SIMPLICES
// =============================================================================

#[test]
fn test_standard_simplices() {
    init_tracing();
    for dimension in 1..=6 {
        let points = standard_simplex(dimension);
        let hull = ConvexHull::new(&points).unwrap();
        assert_eq!(hull.face_count(), dimension + 1, "{dimension}D simplex");
        assert_eq!(hull.hull_vertices().len(), dimension + 1);
        assert_relative_eq!(hull.volume(), 1.0 / factorial(dimension), epsilon = 1e-12);
        hull.validate().unwrap();
    }
}

#[test]
fn test_simplex_with_interior_points() {
    init_tracing();
    for dimension in 2..=5 {
        let mut points = standard_simplex(dimension);
        // Scaled copies of random points in the unit box stay inside the simplex
        let interior = generate_random_points_seeded(50, dimension, (0.0, 1.0), 3).unwrap();
        for p in interior {
            let sum: f64 = p.iter().sum();
            points.push(p.iter().map(|x| 0.9 * x / sum.max(1.0)).collect());
        }
        let hull = ConvexHull::new(&points).unwrap();
        assert_eq!(
            hull.hull_vertices(),
            (0..=dimension).collect::<Vec<_>>().as_slice()
        );
        assert_eq!(hull.face_count(), dimension + 1);
    }
}

// =============================================================================
// HYPERCUBES
// =============================================================================

#[test]
fn test_hypercubes() {
    init_tracing();
    for dimension in 2..=4 {
        let mut points = hypercube(dimension);
        points.push(vec![0.5; dimension]);
        let hull = ConvexHull::new(&points).unwrap();

        assert_eq!(hull.hull_vertices().len(), 1 << dimension, "{dimension}D cube");
        assert!(!hull.hull_vertices().contains(&(1 << dimension)));
        assert_relative_eq!(hull.volume(), 1.0, epsilon = 1e-10);
        hull.validate().unwrap();

        for face in hull.faces() {
            let axis_aligned = face.normal().iter().filter(|n| n.abs() > 0.5).count();
            assert_eq!(axis_aligned, 1, "{dimension}D cube normal: {:?}", face.normal());
        }
    }
}

#[test]
fn test_square_face_count_per_algorithm() {
    for algorithm in [HullAlgorithm::Planar, HullAlgorithm::Incremental] {
        let options = HullOptionsBuilder::default()
            .algorithm(algorithm)
            .build()
            .unwrap();
        let hull = ConvexHull::with_options(&hypercube(2), &options).unwrap();
        assert_eq!(hull.face_count(), 4, "{algorithm}");
        assert_eq!(hull.algorithm(), algorithm);
    }
}

// =============================================================================
// CROSS-POLYTOPES
// =============================================================================

#[test]
fn test_cross_polytopes() {
    init_tracing();
    for dimension in 2..=5 {
        let hull = ConvexHull::new(&cross_polytope(dimension)).unwrap();
        assert_eq!(hull.face_count(), 1 << dimension, "{dimension}D cross-polytope");
        assert_eq!(hull.hull_vertices().len(), 2 * dimension);
        assert_relative_eq!(
            hull.volume(),
            f64::from(1u32 << dimension) / factorial(dimension),
            epsilon = 1e-10
        );

        let expected = 1.0 / (dimension as f64).sqrt();
        for face in hull.faces() {
            for n in face.normal() {
                assert_relative_eq!(n.abs(), expected, epsilon = 1e-12);
            }
            assert_relative_eq!(face.offset(), -expected, epsilon = 1e-12);
        }
    }
}

// =============================================================================
// SPHERES
// =============================================================================

#[test]
fn test_sphere_points_are_all_extreme() {
    init_tracing();
    let points = generate_points_on_sphere_seeded(200, 3, 5.0, 11).unwrap();
    let hull = ConvexHull::new(&points).unwrap();

    assert_eq!(hull.hull_vertices().len(), 200);
    // A triangulated sphere with V vertices has 2V - 4 faces
    assert_eq!(hull.face_count(), 2 * 200 - 4);
    assert!(hull.singular_vertices().is_empty());
    hull.validate().unwrap();

    let ball = 4.0 / 3.0 * std::f64::consts::PI * 125.0;
    assert!(hull.volume() < ball);
    assert!(hull.volume() > 0.9 * ball);
}

#[test]
fn test_circle_points_planar() {
    let points = generate_points_on_sphere_seeded(500, 2, 1.0, 4).unwrap();
    let hull = ConvexHull::new(&points).unwrap();
    assert_eq!(hull.algorithm(), HullAlgorithm::Planar);
    assert_eq!(hull.hull_vertices().len(), 500);
    assert_eq!(hull.face_count(), 500);
    assert_relative_eq!(hull.volume(), std::f64::consts::PI, epsilon = 1e-2);
}

#[test]
fn test_large_random_cloud_4d() {
    init_tracing();
    let points = generate_random_points_seeded(400, 4, (-10.0, 10.0), 21).unwrap();
    let hull = ConvexHull::new(&points).unwrap();
    hull.validate().unwrap();

    let stats = hull.statistics();
    // Interior points never become the furthest point of a face
    assert!(stats.processed_vertices + 5 <= 400);
    assert!(stats.processed_vertices + 5 >= hull.hull_vertices().len());
    assert!(stats.faces_recycled > 0);
    assert!(hull.volume() <= 20.0_f64.powi(4));
}
