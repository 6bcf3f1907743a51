//! Structural invariant checks
//!
//! Invariants that must hold for a ghost-closed mesh:
//! - opposite-of-opposite returns the same side
//! - a side's begin region is its opposite's end region
//! - a side's inner triangle is its opposite's outer triangle
//! - advancing within a triangle and crossing to the opposite side land on
//!   sides beginning at the same region
//! - every side circulating a region begins at that region, and the
//!   circulation is bounded (the ghost region is exempt from the bound)
//!
//! Pre-closure triangulator output gets a weaker involution check plus an
//! advisory histogram of skinny triangles.

use delaunator::EMPTY;
use glam::DVec2;

use super::DualMesh;
use crate::error::{MapError, Result};
use crate::generation::TriangleSoup;

/// Step bound for a single region circulation (except the ghost region)
const MAX_REGION_DEGREE: usize = 100;

impl DualMesh {
    /// Check every structural invariant of the closed mesh
    ///
    /// # Errors
    ///
    /// Returns `InvalidMesh` naming the offending side or region id and the
    /// relation that failed.
    pub fn validate(&self) -> Result<()> {
        if self.num_sides() % 3 != 0 {
            return Err(MapError::InvalidMesh(format!(
                "side count {} is not a multiple of 3",
                self.num_sides()
            )));
        }

        for s in 0..self.num_sides() {
            let opposite = self.s_opposite(s);
            if opposite >= self.num_sides() {
                return Err(MapError::InvalidMesh(format!(
                    "side {}: opposite {} out of range",
                    s, opposite
                )));
            }
            if self.s_opposite(opposite) != s {
                return Err(MapError::InvalidMesh(format!(
                    "side {}: opposite({}) = {}, not an involution",
                    s,
                    opposite,
                    self.s_opposite(opposite)
                )));
            }
            if self.r_begin(s) != self.r_end(opposite) {
                return Err(MapError::InvalidMesh(format!(
                    "side {}: begins at region {} but its opposite {} ends at region {}",
                    s,
                    self.r_begin(s),
                    opposite,
                    self.r_end(opposite)
                )));
            }
            if self.t_inner(s) != self.t_outer(opposite) {
                return Err(MapError::InvalidMesh(format!(
                    "side {}: inner triangle {} != outer triangle {} of opposite {}",
                    s,
                    self.t_inner(s),
                    self.t_outer(opposite),
                    opposite
                )));
            }
            if self.r_begin(self.s_next(s)) != self.r_begin(opposite) {
                return Err(MapError::InvalidMesh(format!(
                    "side {}: next begins at region {} but opposite {} begins at region {}",
                    s,
                    self.r_begin(self.s_next(s)),
                    opposite,
                    self.r_begin(opposite)
                )));
            }
        }

        for t in 0..self.num_triangles() {
            for s in self.s_around_t(t) {
                if self.t_inner(s) != t {
                    return Err(MapError::InvalidMesh(format!(
                        "triangle {}: side {} reports inner triangle {}",
                        t,
                        s,
                        self.t_inner(s)
                    )));
                }
            }
        }

        for r in 0..self.num_regions() {
            let mut steps = 0;
            for s in self.s_around_r(r) {
                if self.r_begin(s) != r {
                    return Err(MapError::InvalidMesh(format!(
                        "region {}: circulated side {} begins at region {}",
                        r,
                        s,
                        self.r_begin(s)
                    )));
                }
                steps += 1;
                if !self.is_ghost_r(r) && steps > MAX_REGION_DEGREE {
                    return Err(MapError::InvalidMesh(format!(
                        "region {}: circulation exceeded {} steps from entry side {}",
                        r, MAX_REGION_DEGREE, self.s_of_r[r]
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Check the involution on raw triangulator output
///
/// Before ghost closure, `halfedges[s]` may be `EMPTY`; wherever it is not,
/// it must point back.
///
/// # Errors
///
/// Returns `InvalidMesh` with the offending side ids.
pub fn validate_triangle_soup(soup: &TriangleSoup) -> Result<()> {
    let num_sides = soup.num_sides();
    if num_sides % 3 != 0 {
        return Err(MapError::InvalidMesh(format!(
            "side count {} is not a multiple of 3",
            num_sides
        )));
    }
    for s in 0..num_sides {
        let opposite = soup.halfedges[s];
        if opposite == EMPTY {
            continue;
        }
        if opposite >= num_sides {
            return Err(MapError::InvalidMesh(format!(
                "side {}: opposite {} out of range",
                s, opposite
            )));
        }
        if soup.halfedges[opposite] != s {
            return Err(MapError::InvalidMesh(format!(
                "side {}: halfedges[{}] = {}, not an involution",
                s, opposite, soup.halfedges[opposite]
            )));
        }
    }
    Ok(())
}

/// Histogram of triangles by smallest interior angle below 30 degrees
///
/// Six 5-degree bins: `[0, 5)`, `[5, 10)`, ..., `[25, 30)`. Advisory only;
/// skinny triangles degrade the dual polygons but break nothing.
pub fn skinny_triangle_histogram(points: &[DVec2], soup: &TriangleSoup) -> [usize; 6] {
    let mut bins = [0usize; 6];
    for t in 0..soup.num_triangles() {
        let a = points[soup.triangles[3 * t]];
        let b = points[soup.triangles[3 * t + 1]];
        let c = points[soup.triangles[3 * t + 2]];
        let min_angle = corner_angle(a, b, c)
            .min(corner_angle(b, c, a))
            .min(corner_angle(c, a, b));
        if min_angle < 30.0 {
            bins[(min_angle / 5.0) as usize] += 1;
        }
    }
    bins
}

/// Interior angle at `apex` of the triangle `(apex, p, q)`, in degrees
fn corner_angle(apex: DVec2, p: DVec2, q: DVec2) -> f64 {
    let u = p - apex;
    let v = q - apex;
    let cos = (u.dot(v) / (u.length() * v.length())).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Bounds, MapConfigBuilder};
    use crate::generation::{build_mesh, triangulate_points};
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generated_mesh_validates() {
        let config = MapConfigBuilder::new()
            .seed(42)
            .bounds(Bounds::new(0.0, 0.0, 500.0, 500.0))
            .spacing(50.0)
            .unwrap()
            .build()
            .unwrap();
        let mesh = build_mesh(&config).unwrap();
        mesh.validate().unwrap();
    }

    /// Fixed 29-point set, X-jittered by a sub-unit amount
    #[test]
    fn test_fixed_points_involution() {
        #[rustfmt::skip]
        let base: [(f64, f64); 29] = [
            (155.0, 386.0), (236.0, 100.0), (252.0, 311.0), (568.0, 558.0),
            (722.0, 306.0), (93.0, 704.0), (415.0, 521.0), (864.0, 840.0),
            (677.0, 128.0), (516.0, 246.0), (997.0, 493.0), (314.0, 915.0),
            (468.0, 745.0), (43.0, 145.0), (868.0, 434.0), (584.0, 917.0),
            (172.0, 565.0), (750.0, 665.0), (993.0, 66.0), (41.0, 909.0),
            (336.0, 699.0), (622.0, 409.0), (886.0, 168.0), (259.0, 493.0),
            (122.0, 255.0), (487.0, 62.0), (754.0, 533.0), (660.0, 785.0),
            (912.0, 601.0),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(29);
        let points: Vec<DVec2> = base
            .iter()
            .map(|&(x, y)| DVec2::new(x + rng.gen::<f64>(), y))
            .collect();

        let soup = triangulate_points(&points).unwrap();
        validate_triangle_soup(&soup).unwrap();
    }

    /// 250 random points in a 1000 x 1000 box
    #[test]
    fn test_random_points_involution() {
        let mut rng = ChaCha8Rng::seed_from_u64(250);
        let points: Vec<DVec2> = (0..250)
            .map(|_| DVec2::new(rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0)))
            .collect();

        let soup = triangulate_points(&points).unwrap();
        validate_triangle_soup(&soup).unwrap();
    }

    #[test]
    fn test_broken_involution_detected() {
        let points = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(100.0, 0.0),
            DVec2::new(100.0, 100.0),
            DVec2::new(0.0, 100.0),
        ];
        let mut soup = triangulate_points(&points).unwrap();
        // unpair one side of an interior edge; its partner still points here
        let s = (0..soup.num_sides())
            .find(|&s| soup.halfedges[s] != EMPTY)
            .unwrap();
        soup.halfedges[s] = EMPTY;
        assert!(validate_triangle_soup(&soup).is_err());
    }

    #[test]
    fn test_skinny_histogram_counts_thin_triangles() {
        // A long flat quad: every triangulation of it contains a triangle
        // with a smallest angle well below 30 degrees
        let points = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(100.0, 0.0),
            DVec2::new(50.0, 5.0),
            DVec2::new(50.0, -5.0),
        ];
        let soup = triangulate_points(&points).unwrap();
        let bins = skinny_triangle_histogram(&points, &soup);
        let skinny: usize = bins.iter().sum();
        assert!(skinny >= 1, "thin triangle not counted: {:?}", bins);
        assert!(skinny <= soup.num_triangles());
    }

    #[test]
    fn test_skinny_histogram_ignores_well_shaped_triangles() {
        // Near-equilateral: smallest angle is about 60 degrees
        let points = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(100.0, 0.0),
            DVec2::new(50.0, 86.0),
        ];
        let soup = triangulate_points(&points).unwrap();
        let bins = skinny_triangle_histogram(&points, &soup);
        assert_eq!(bins.iter().sum::<usize>(), 0, "histogram: {:?}", bins);
    }

    #[test]
    fn test_corner_angle_right_triangle() {
        let apex = DVec2::new(0.0, 0.0);
        let p = DVec2::new(1.0, 0.0);
        let q = DVec2::new(0.0, 1.0);
        assert!((corner_angle(apex, p, q) - 90.0).abs() < 1e-9);
    }
}
