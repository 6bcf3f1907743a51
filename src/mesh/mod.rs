//! Dual mesh over a ghost-closed triangulation
//!
//! The mesh is a cyclic index graph: regions (input points), triangles, and
//! sides (directed half-edges) are dense integer ids into flat arrays owned
//! by one [`DualMesh`] value. The same arrays expose the primal triangle
//! mesh (vertices at regions, faces at triangles) and its dual polygon mesh
//! (vertices at triangle centers, faces around regions).
//!
//! Side ids obey a fixed algebra: the three sides of triangle `t` occupy
//! slots `3t, 3t+1, 3t+2`, so `t_of`, `s_next`, and `s_prev` are pure
//! arithmetic. After ghost closure every side has an opposite, so the
//! region circulators always terminate by returning to their entry side.
//!
//! Out-of-range ids are programming errors and panic on slice indexing.

pub mod validate;

use delaunator::EMPTY;
use glam::DVec2;

use crate::generation::ClosedTriangulation;

/// Distance a ghost triangle's center is pushed out past its hull side
///
/// Visual offset only; nothing downstream depends on the magnitude.
const GHOST_CENTER_OFFSET: f64 = 10.0;

/// Half-edge mesh exposing a triangle mesh and its dual polygon mesh
///
/// Built once from ghost-closed triangulation arrays, then immutable.
///
/// # Example
///
/// ```rust
/// use islandmap::{generation, MapConfigBuilder};
///
/// let config = MapConfigBuilder::new().seed(42).build().unwrap();
/// let mesh = generation::build_mesh(&config).unwrap();
/// for s in 0..mesh.num_sides() {
///     assert_eq!(mesh.s_opposite(mesh.s_opposite(s)), s);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DualMesh {
    num_boundary_regions: usize,
    num_solid_sides: usize,
    /// Region positions; the ghost region's entry is NaN
    positions_r: Vec<DVec2>,
    /// Triangle centers: centroids, or synthesized just outside the hull
    positions_t: Vec<DVec2>,
    /// Region at which each side begins
    triangles: Vec<usize>,
    /// Opposite side of each side
    halfedges: Vec<usize>,
    /// Representative incoming side per region, the circulator entry point
    s_of_r: Vec<usize>,
}

impl DualMesh {
    /// Build a mesh from points and a ghost-closed triangulation
    ///
    /// `num_boundary_regions` is the length of the boundary prefix of
    /// `points` (see [`crate::generation::interior_boundary_points`]). The
    /// ghost region is appended here with an undefined (NaN) position.
    pub fn new(
        points: Vec<DVec2>,
        num_boundary_regions: usize,
        closed: ClosedTriangulation,
    ) -> Self {
        let mut positions_r = points;
        positions_r.push(DVec2::NAN);

        let mut mesh = Self {
            num_boundary_regions,
            num_solid_sides: closed.num_solid_sides,
            positions_r,
            positions_t: Vec::new(),
            triangles: closed.triangles,
            halfedges: closed.halfedges,
            s_of_r: Vec::new(),
        };
        mesh.update();
        mesh
    }

    /// Recompute the derived index and triangle centers
    fn update(&mut self) {
        let num_sides = self.triangles.len();

        // Entry side per region: any incoming side works after closure, but
        // an incoming side whose successor is unpaired makes the pre-closure
        // walk start where it can cover every real edge before stopping.
        self.s_of_r = vec![EMPTY; self.positions_r.len()];
        for s in 0..num_sides {
            let endpoint = self.triangles[Self::next_side(s)];
            if self.s_of_r[endpoint] == EMPTY || self.halfedges[s] == EMPTY {
                self.s_of_r[endpoint] = s;
            }
        }

        self.positions_t = (0..num_sides / 3)
            .map(|t| {
                let a = self.positions_r[self.triangles[3 * t]];
                let b = self.positions_r[self.triangles[3 * t + 1]];
                if 3 * t < self.num_solid_sides {
                    let c = self.positions_r[self.triangles[3 * t + 2]];
                    (a + b + c) / 3.0
                } else {
                    // ghost triangle: just outside the open boundary side
                    let d = b - a;
                    let outward = DVec2::new(d.y, -d.x).normalize();
                    (a + b) / 2.0 + outward * GHOST_CENTER_OFFSET
                }
            })
            .collect();
    }

    #[inline]
    fn next_side(s: usize) -> usize {
        if s % 3 == 2 {
            s - 2
        } else {
            s + 1
        }
    }

    // --- counts ---

    /// Total number of sides (a multiple of 3)
    #[inline]
    pub fn num_sides(&self) -> usize {
        self.triangles.len()
    }

    /// Number of sides belonging to solid triangles
    #[inline]
    pub fn num_solid_sides(&self) -> usize {
        self.num_solid_sides
    }

    /// Total number of triangles, ghosts included
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Number of solid triangles
    #[inline]
    pub fn num_solid_triangles(&self) -> usize {
        self.num_solid_sides / 3
    }

    /// Total number of regions, ghost included
    #[inline]
    pub fn num_regions(&self) -> usize {
        self.positions_r.len()
    }

    /// Number of real regions
    ///
    /// Counts on a ghost-closed mesh (the only kind this type constructs);
    /// the ghost region is the final id.
    #[inline]
    pub fn num_solid_regions(&self) -> usize {
        self.positions_r.len() - 1
    }

    /// Number of boundary regions (the prefix of the input points)
    #[inline]
    pub fn num_boundary_regions(&self) -> usize {
        self.num_boundary_regions
    }

    // --- side/triangle algebra ---

    /// Triangle that side `s` belongs to
    #[inline]
    pub fn t_of(&self, s: usize) -> usize {
        s / 3
    }

    /// Next side counterclockwise within the same triangle
    #[inline]
    pub fn s_next(&self, s: usize) -> usize {
        Self::next_side(s)
    }

    /// Previous side within the same triangle
    #[inline]
    pub fn s_prev(&self, s: usize) -> usize {
        if s % 3 == 0 {
            s + 2
        } else {
            s - 1
        }
    }

    /// Opposite half-edge of side `s`
    #[inline]
    pub fn s_opposite(&self, s: usize) -> usize {
        self.halfedges[s]
    }

    /// Region at which side `s` begins
    #[inline]
    pub fn r_begin(&self, s: usize) -> usize {
        self.triangles[s]
    }

    /// Region at which side `s` ends
    #[inline]
    pub fn r_end(&self, s: usize) -> usize {
        self.triangles[Self::next_side(s)]
    }

    /// Triangle on this side of the edge
    #[inline]
    pub fn t_inner(&self, s: usize) -> usize {
        s / 3
    }

    /// Triangle on the other side of the edge
    #[inline]
    pub fn t_outer(&self, s: usize) -> usize {
        self.halfedges[s] / 3
    }

    // --- positions ---

    /// Position of region `r`
    ///
    /// Total over the id range; the ghost region yields NaN, so check
    /// [`is_ghost_r`](Self::is_ghost_r) before feeding the result into
    /// arithmetic.
    #[inline]
    pub fn pos_of_r(&self, r: usize) -> DVec2 {
        self.positions_r[r]
    }

    /// Center of triangle `t`
    #[inline]
    pub fn pos_of_t(&self, t: usize) -> DVec2 {
        self.positions_t[t]
    }

    // --- predicates ---

    /// Whether side `s` was synthesized by ghost closure
    #[inline]
    pub fn is_ghost_s(&self, s: usize) -> bool {
        s >= self.num_solid_sides
    }

    /// Whether triangle `t` was synthesized by ghost closure
    #[inline]
    pub fn is_ghost_t(&self, t: usize) -> bool {
        3 * t >= self.num_solid_sides
    }

    /// Whether `r` is the ghost region
    #[inline]
    pub fn is_ghost_r(&self, r: usize) -> bool {
        r == self.positions_r.len() - 1
    }

    /// Whether side `s` represents an actual hull edge
    ///
    /// Only the first side of each ghost triangle runs along the hull; the
    /// other two connect to the ghost region.
    #[inline]
    pub fn is_boundary_s(&self, s: usize) -> bool {
        self.is_ghost_s(s) && s % 3 == 0
    }

    /// Whether region `r` is in the boundary prefix of the input points
    #[inline]
    pub fn is_boundary_r(&self, r: usize) -> bool {
        r < self.num_boundary_regions
    }

    // --- triangle circulators ---

    /// The three sides of triangle `t`
    #[inline]
    pub fn s_around_t(&self, t: usize) -> [usize; 3] {
        [3 * t, 3 * t + 1, 3 * t + 2]
    }

    /// The three corner regions of triangle `t`
    #[inline]
    pub fn r_around_t(&self, t: usize) -> [usize; 3] {
        [
            self.triangles[3 * t],
            self.triangles[3 * t + 1],
            self.triangles[3 * t + 2],
        ]
    }

    /// The three triangles sharing an edge with triangle `t`
    #[inline]
    pub fn t_around_t(&self, t: usize) -> [usize; 3] {
        [
            self.t_outer(3 * t),
            self.t_outer(3 * t + 1),
            self.t_outer(3 * t + 2),
        ]
    }

    // --- region circulators ---

    /// Incoming sides ending at region `r`, in circulation order
    ///
    /// All three region circulators share this walk. It is allocation-free
    /// and, on a closed mesh, yields exactly degree(r) sides before
    /// returning to its entry side. The `EMPTY` stop is a legacy path for
    /// meshes inspected before closure.
    fn walk_r(&self, r: usize) -> RegionWalk<'_> {
        let start = self.s_of_r[r];
        RegionWalk {
            mesh: self,
            start,
            incoming: start,
            finished: start == EMPTY,
        }
    }

    /// Outgoing sides starting at region `r`
    pub fn s_around_r(&self, r: usize) -> impl Iterator<Item = usize> + '_ {
        self.walk_r(r).map(move |incoming| self.halfedges[incoming])
    }

    /// Neighboring regions of region `r`
    pub fn r_around_r(&self, r: usize) -> impl Iterator<Item = usize> + '_ {
        self.walk_r(r).map(move |incoming| self.triangles[incoming])
    }

    /// Triangles incident to region `r`
    ///
    /// These are the vertices of `r`'s dual polygon, in circulation order.
    pub fn t_around_r(&self, r: usize) -> impl Iterator<Item = usize> + '_ {
        self.walk_r(r).map(|incoming| incoming / 3)
    }
}

/// Iterator over the incoming sides of one region
///
/// Walks `incoming -> s_next -> halfedges` until it returns to the entry
/// side (or hits an unpaired side on a pre-closure mesh).
#[derive(Clone)]
struct RegionWalk<'a> {
    mesh: &'a DualMesh,
    start: usize,
    incoming: usize,
    finished: bool,
}

impl Iterator for RegionWalk<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.finished {
            return None;
        }
        let current = self.incoming;
        let outgoing = DualMesh::next_side(current);
        let next = self.mesh.halfedges[outgoing];
        if next == EMPTY || next == self.start {
            self.finished = true;
        } else {
            self.incoming = next;
        }
        Some(current)
    }
}
