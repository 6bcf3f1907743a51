//! Delaunay triangulation adapter
//!
//! Thin contract over the external triangulator. The half-edge convention
//! is delaunator's: `triangles[s]` is the point id where side `s` begins,
//! `halfedges[s]` is the opposite side or [`delaunator::EMPTY`] on the hull,
//! and the three sides of triangle `t` occupy slots `3t, 3t+1, 3t+2`.

use delaunator::{triangulate, Point};
use glam::DVec2;

use crate::error::{MapError, Result};

/// Raw triangulator output before ghost closure
///
/// Unpaired sides (`halfedges[s] == EMPTY`) form the convex hull in
/// traversal order.
#[derive(Debug, Clone)]
pub struct TriangleSoup {
    /// Point id at which each side begins
    pub triangles: Vec<usize>,
    /// Opposite side of each side, or `EMPTY` on the hull
    pub halfedges: Vec<usize>,
}

impl TriangleSoup {
    /// Number of sides (three per triangle)
    #[inline]
    pub fn num_sides(&self) -> usize {
        self.triangles.len()
    }

    /// Number of triangles
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len() / 3
    }
}

/// Triangulate a point set
///
/// # Errors
///
/// Returns `TriangulationFailed` when the triangulator produces no
/// triangles (fewer than three points, or all points collinear).
pub fn triangulate_points(points: &[DVec2]) -> Result<TriangleSoup> {
    let input: Vec<Point> = points.iter().map(|p| Point { x: p.x, y: p.y }).collect();
    let triangulation = triangulate(&input);

    if triangulation.triangles.is_empty() {
        return Err(MapError::TriangulationFailed(format!(
            "no triangles from {} input points",
            points.len()
        )));
    }

    Ok(TriangleSoup {
        triangles: triangulation.triangles,
        halfedges: triangulation.halfedges,
    })
}
