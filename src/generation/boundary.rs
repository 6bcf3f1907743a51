//! Boundary point placement
//!
//! Two rings of points frame the map rectangle:
//!
//! - **Interior** boundary points sit just inside each edge, inset on a
//!   slight arc that bulges toward the middle of the edge. Downstream
//!   point-filling expects every point strictly inside the bounds, and the
//!   arc keeps the triangulator from producing long thin triangles hugging
//!   the edges.
//! - **Exterior** boundary points sit outside each edge so that polygons of
//!   edge regions are closed by real triangles instead of ghosts.
//!
//! The interior ring must be the prefix of the point array handed to the
//! triangulator; its length is the boundary-region count of the mesh.

use glam::DVec2;

use crate::config::Bounds;

/// Depth of the inward arc at the corners of each edge
const CURVATURE: f64 = 1.0;

/// Minimum inset from the rectangle edge, so points are strictly inside
const EDGE_OFFSET: f64 = 1e-4;

/// Inset from the edge at parameter `t` in [0, 1) along it
///
/// Largest at the ends of the edge, `EDGE_OFFSET` at the middle.
#[inline]
fn inset(t: f64) -> f64 {
    EDGE_OFFSET + CURVATURE * 4.0 * (t - 0.5) * (t - 0.5)
}

/// Generate evenly spaced points just inside each edge of the rectangle
///
/// The number of points along the top and bottom edges is
/// `ceil((width - 2*curvature) / spacing)` each, and along the left and
/// right edges `ceil((height - 2*curvature) / spacing)` each.
///
/// The returned points must be passed to the triangulator as the prefix of
/// its point array; their count is the mesh's boundary-region count.
pub fn interior_boundary_points(bounds: &Bounds, spacing: f64) -> Vec<DVec2> {
    let w = ((bounds.width - 2.0 * CURVATURE) / spacing).ceil().max(0.0) as usize;
    let h = ((bounds.height - 2.0 * CURVATURE) / spacing).ceil().max(0.0) as usize;
    let mut points = Vec::with_capacity(2 * (w + h));

    for q in 0..w {
        let t = q as f64 / w as f64;
        let dx = (bounds.width - 2.0 * CURVATURE) * t;
        let dy = inset(t);
        // top edge left-to-right, bottom edge right-to-left
        points.push(DVec2::new(bounds.left + CURVATURE + dx, bounds.top + dy));
        points.push(DVec2::new(
            bounds.right() - CURVATURE - dx,
            bounds.bottom() - dy,
        ));
    }
    for q in 0..h {
        let t = q as f64 / h as f64;
        let dy = (bounds.height - 2.0 * CURVATURE) * t;
        let dx = inset(t);
        // left edge bottom-to-top, right edge top-to-bottom
        points.push(DVec2::new(bounds.left + dx, bounds.bottom() - CURVATURE - dy));
        points.push(DVec2::new(bounds.right() - dx, bounds.top + CURVATURE + dy));
    }

    points
}

/// Generate evenly spaced points just outside each edge of the rectangle
///
/// Each edge gets samples every `spacing`, phase-shifted by `spacing / 2`
/// along the edge and pushed out by `spacing / sqrt(2)`, plus one point at
/// each outer corner.
pub fn exterior_boundary_points(bounds: &Bounds, spacing: f64) -> Vec<DVec2> {
    let out = spacing / std::f64::consts::SQRT_2;
    let w = ((bounds.width - spacing / 2.0) / spacing).ceil().max(0.0) as usize;
    let h = ((bounds.height - spacing / 2.0) / spacing).ceil().max(0.0) as usize;
    let mut points = Vec::with_capacity(2 * (w + h) + 4);

    points.push(DVec2::new(bounds.left - out, bounds.top - out));
    points.push(DVec2::new(bounds.right() + out, bounds.top - out));
    points.push(DVec2::new(bounds.left - out, bounds.bottom() + out));
    points.push(DVec2::new(bounds.right() + out, bounds.bottom() + out));

    for q in 0..w {
        let dx = spacing / 2.0 + spacing * q as f64;
        points.push(DVec2::new(bounds.left + dx, bounds.top - out));
        points.push(DVec2::new(bounds.right() - dx, bounds.bottom() + out));
    }
    for q in 0..h {
        let dy = spacing / 2.0 + spacing * q as f64;
        points.push(DVec2::new(bounds.left - out, bounds.bottom() - dy));
        points.push(DVec2::new(bounds.right() + out, bounds.top + dy));
    }

    points
}
