//! Engine-agnostic drawing output
//!
//! The map core produces flat coordinate arrays keyed by iteration over
//! solid regions, sides, and triangles; the surface behind [`DrawSurface`]
//! is otherwise opaque. Nothing here retains state between calls.

use crate::mesh::DualMesh;
use crate::terrain::TerrainMap;

/// RGBA color
pub type Color = [f32; 4];

/// Width multiplier applied to the square root of side flow
const RIVER_WIDTH_SCALE: f32 = 2.0;

/// Drawing operations an external surface must provide
pub trait DrawSurface {
    /// Draw a dot at a position
    fn draw_point(&mut self, color: Color, radius: f32, x: f64, y: f64);
    /// Draw a line segment between two positions
    fn draw_line_segment(&mut self, color: Color, width: f32, x1: f64, y1: f64, x2: f64, y2: f64);
    /// Draw a filled polygon from flat `[x0, y0, x1, y1, ...]` coordinates
    fn draw_polygon(&mut self, color: Color, coords: &[f64]);
}

/// Trait for mapping terrain values to colors
pub trait ColorMapper {
    /// Map a region's elevation and rainfall to an RGBA color
    fn map_color(&self, elevation: f32, rainfall: f32) -> Color;
}

/// Default color mapper: water by depth, land by rainfall, peaks gray
#[derive(Debug, Clone, Copy, Default)]
pub struct BiomeColorMapper;

impl ColorMapper for BiomeColorMapper {
    fn map_color(&self, elevation: f32, rainfall: f32) -> Color {
        if elevation < -0.3 {
            [0.1, 0.2, 0.6, 1.0] // deep water
        } else if elevation < 0.0 {
            [0.2, 0.4, 0.8, 1.0] // shallow water
        } else if elevation > 0.6 {
            [0.6, 0.6, 0.6, 1.0] // bare peaks
        } else if rainfall > 0.4 {
            [0.1, 0.5, 0.2, 1.0] // forest
        } else if rainfall > 0.15 {
            [0.4, 0.7, 0.3, 1.0] // grassland
        } else {
            [0.8, 0.7, 0.4, 1.0] // dry land
        }
    }
}

/// Fill `out` with the dual polygon of region `r` as flat x,y pairs
///
/// The polygon's vertices are the centers of the triangles around the
/// region, in circulation order. The buffer is cleared first so it can be
/// reused across calls without reallocating.
pub fn region_polygon(mesh: &DualMesh, r: usize, out: &mut Vec<f64>) {
    out.clear();
    for t in mesh.t_around_r(r) {
        let p = mesh.pos_of_t(t);
        out.push(p.x);
        out.push(p.y);
    }
}

/// Draw every solid region as its dual polygon
pub fn paint_regions<S: DrawSurface, C: ColorMapper>(
    surface: &mut S,
    mesh: &DualMesh,
    terrain: &TerrainMap,
    mapper: &C,
) {
    let mut coords = Vec::new();
    for r in 0..mesh.num_solid_regions() {
        region_polygon(mesh, r, &mut coords);
        if coords.len() >= 6 {
            let color = mapper.map_color(terrain.elevation_r[r], terrain.rainfall_r[r]);
            surface.draw_polygon(color, &coords);
        }
    }
}

/// Draw river segments along sides carrying flow
///
/// A river segment runs between the centers of the two triangles sharing
/// the side, with width growing as the square root of the accumulated
/// flow. Only land-to-land sides are drawn; flow into the ocean is not a
/// river.
pub fn paint_rivers<S: DrawSurface>(
    surface: &mut S,
    mesh: &DualMesh,
    terrain: &TerrainMap,
    color: Color,
) {
    for s in 0..mesh.num_solid_sides() {
        let flow = terrain.flow_s[s];
        if flow <= 0.0 {
            continue;
        }
        let t_inner = mesh.t_inner(s);
        let t_outer = mesh.t_outer(s);
        if terrain.elevation_t[t_inner] < 0.0 || terrain.elevation_t[t_outer] < 0.0 {
            continue;
        }
        let from = mesh.pos_of_t(t_inner);
        let to = mesh.pos_of_t(t_outer);
        let width = RIVER_WIDTH_SCALE * flow.sqrt();
        surface.draw_line_segment(color, width, from.x, from.y, to.x, to.y);
    }
}

/// Draw a dot at every solid region's position
pub fn paint_region_points<S: DrawSurface>(
    surface: &mut S,
    mesh: &DualMesh,
    color: Color,
    radius: f32,
) {
    for r in 0..mesh.num_solid_regions() {
        let p = mesh.pos_of_r(r);
        surface.draw_point(color, radius, p.x, p.y);
    }
}
