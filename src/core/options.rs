//! Configuration of hull, triangulation and Voronoi computations.

use serde::{Deserialize, Serialize};

use crate::core::point_set::PointSet;

/// Relative plane-distance tolerance used when none is configured.
///
/// The effective tolerance is this value times the longest side of the input's
/// bounding box, so the default behaves identically for inputs at any scale.
pub const DEFAULT_PLANE_DISTANCE_TOLERANCE: f64 = 1e-10;

/// Default relative jitter applied to lifted heights for Delaunay triangulations.
pub const DEFAULT_LIFT_JITTER: f64 = 1e-8;

/// Which hull algorithm to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HullAlgorithm {
    /// The planar algorithm in 2D, the incremental algorithm otherwise.
    #[default]
    Auto,
    /// The incremental horizon/cone algorithm, in any dimension.
    Incremental,
    /// The 2D octagon-filter algorithm; only valid for two-dimensional input.
    Planar,
}

impl std::fmt::Display for HullAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Incremental => write!(f, "incremental"),
            Self::Planar => write!(f, "planar"),
        }
    }
}

/// Options shared by [`ConvexHull`](crate::geometry::algorithms::convex_hull::ConvexHull),
/// [`DelaunayTriangulation`](crate::core::delaunay_triangulation::DelaunayTriangulation)
/// and [`VoronoiMesh`](crate::core::voronoi::VoronoiMesh).
///
/// # Examples
///
/// ```rust
/// use hyperhull::core::options::{HullAlgorithm, HullOptions, HullOptionsBuilder};
///
/// let options = HullOptionsBuilder::default()
///     .plane_distance_tolerance(1e-9)
///     .algorithm(HullAlgorithm::Incremental)
///     .build()
///     .unwrap();
/// assert_eq!(options.plane_distance_tolerance, Some(1e-9));
///
/// // Invalid tolerances are rejected at build time
/// assert!(HullOptionsBuilder::default().plane_distance_tolerance(-1.0).build().is_err());
///
/// assert_eq!(HullOptions::default().algorithm, HullAlgorithm::Auto);
/// ```
#[derive(Builder, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[builder(default, build_fn(validate = "Self::validate"))]
pub struct HullOptions {
    /// Absolute plane-distance tolerance; `None` derives it from the input extent.
    #[builder(setter(strip_option))]
    pub plane_distance_tolerance: Option<f64>,
    /// Algorithm selection.
    pub algorithm: HullAlgorithm,
    /// Relative jitter added to lifted heights (Delaunay only); `0` disables it.
    pub lift_jitter: f64,
    /// Seed of the jitter and of the initial-simplex sampling.
    pub jitter_seed: u64,
}

impl Default for HullOptions {
    fn default() -> Self {
        Self {
            plane_distance_tolerance: None,
            algorithm: HullAlgorithm::Auto,
            lift_jitter: DEFAULT_LIFT_JITTER,
            jitter_seed: 0,
        }
    }
}

impl HullOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(Some(tolerance)) = self.plane_distance_tolerance
            && !(tolerance.is_finite() && tolerance > 0.0)
        {
            return Err(format!(
                "plane_distance_tolerance must be finite and positive, got {tolerance}"
            ));
        }
        if let Some(jitter) = self.lift_jitter
            && !(jitter.is_finite() && jitter >= 0.0)
        {
            return Err(format!(
                "lift_jitter must be finite and non-negative, got {jitter}"
            ));
        }
        Ok(())
    }
}

impl HullOptions {
    /// The tolerance to use for `points`: the configured value, or
    /// [`DEFAULT_PLANE_DISTANCE_TOLERANCE`] times the input extent.
    ///
    /// Returns `None` when a configured tolerance is not finite and positive (options
    /// built without the builder are not validated).
    ///
    /// An input of coincident points has zero extent and therefore a zero default
    /// tolerance; the algorithms report it as degenerate.
    #[must_use]
    pub fn effective_tolerance(&self, points: &PointSet) -> Option<f64> {
        match self.plane_distance_tolerance {
            Some(tolerance) if tolerance.is_finite() && tolerance > 0.0 => Some(tolerance),
            Some(_) => None,
            None => Some(DEFAULT_PLANE_DISTANCE_TOLERANCE * points.extent()),
        }
    }
}
