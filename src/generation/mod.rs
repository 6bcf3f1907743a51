//! Mesh generation pipeline
//!
//! Assembles the point set (interior boundary ring first, then exterior
//! ring, then jittered interior fill), hands it to the triangulator, closes
//! the result with the ghost structure, and builds the dual mesh.

mod boundary;
mod delaunay;
mod ghost;
mod points;

pub use boundary::{exterior_boundary_points, interior_boundary_points};
pub use delaunay::{triangulate_points, TriangleSoup};
pub use ghost::{add_ghost_structure, ClosedTriangulation};
pub use points::interior_points;

use glam::DVec2;

use crate::config::MapConfig;
use crate::error::Result;
use crate::mesh::DualMesh;

/// Assemble the full point set for a configuration
///
/// Returns the points and the boundary-prefix length. The interior
/// boundary ring is always the prefix, which is what makes
/// [`DualMesh::is_boundary_r`] meaningful.
pub fn generate_points(config: &MapConfig) -> (Vec<DVec2>, usize) {
    let mut all = interior_boundary_points(&config.bounds, config.spacing);
    let num_boundary = all.len();
    all.extend(exterior_boundary_points(&config.bounds, config.spacing));
    all.extend(interior_points(
        &config.bounds,
        config.spacing,
        config.jitter,
        config.seed,
    ));
    (all, num_boundary)
}

/// Build a ghost-closed dual mesh from a configuration
///
/// # Errors
///
/// Returns `TriangulationFailed` if the triangulator produces no output
/// (only possible for degenerate bounds/spacing combinations).
pub fn build_mesh(config: &MapConfig) -> Result<DualMesh> {
    let (all_points, num_boundary) = generate_points(config);
    let soup = triangulate_points(&all_points)?;
    let closed = add_ghost_structure(all_points.len(), &soup);
    Ok(DualMesh::new(all_points, num_boundary, closed))
}
