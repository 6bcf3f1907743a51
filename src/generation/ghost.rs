//! Ghost structure closing the triangulation boundary
//!
//! The triangulator leaves every hull side without an opposite. This module
//! appends one synthetic ghost region plus one ghost triangle per hull side
//! so that afterwards `halfedges[halfedges[s]] == s` holds for every side
//! and every circulation is closed. Consecutive ghost triangles are stitched
//! together along their third sides, making all sides incident to the ghost
//! region one continuous circulation around the map.

use delaunator::EMPTY;

use crate::generation::delaunay::TriangleSoup;

/// Triangulation arrays after ghost closure
///
/// The solid prefix is a verbatim copy of the triangulator output except
/// that former hull sides now point at their ghost opposites.
#[derive(Debug, Clone)]
pub struct ClosedTriangulation {
    /// Region id at which each side begins
    pub triangles: Vec<usize>,
    /// Opposite side of each side; never `EMPTY`
    pub halfedges: Vec<usize>,
    /// Length of the solid prefix; sides at or past it are ghosts
    pub num_solid_sides: usize,
}

#[inline]
fn s_next(s: usize) -> usize {
    if s % 3 == 2 {
        s - 2
    } else {
        s + 1
    }
}

/// Close every unpaired half-edge with a ghost triangle
///
/// The ghost region gets id `num_points`. For the `i`-th hull side `s`
/// (walking the hull by following each side's end region), ghost triangle
/// `i` occupies side slots `[3i, 3i+2]` past the solid prefix:
/// slot 0 runs back along the hull side (and is paired with it), slot 1
/// runs from the hull side's begin region to the ghost region, and slot 2
/// returns from the ghost region, paired with slot 1 of the next ghost
/// triangle around the hull.
pub fn add_ghost_structure(num_points: usize, soup: &TriangleSoup) -> ClosedTriangulation {
    let num_solid_sides = soup.num_sides();

    let mut num_unpaired = 0;
    let mut s_start = EMPTY;
    // hull side starting at each region, for walking the hull in order
    let mut unpaired_by_region = vec![EMPTY; num_points];
    for s in 0..num_solid_sides {
        if soup.halfedges[s] == EMPTY {
            num_unpaired += 1;
            unpaired_by_region[soup.triangles[s]] = s;
            s_start = s;
        }
    }

    let r_ghost = num_points;
    let num_sides = num_solid_sides + 3 * num_unpaired;

    let mut triangles = vec![0usize; num_sides];
    let mut halfedges = vec![EMPTY; num_sides];
    triangles[..num_solid_sides].copy_from_slice(&soup.triangles);
    halfedges[..num_solid_sides].copy_from_slice(&soup.halfedges);

    let mut s = s_start;
    for i in 0..num_unpaired {
        let s_ghost = num_solid_sides + 3 * i;

        // pair the hull side with the ghost side running the other way
        halfedges[s] = s_ghost;
        halfedges[s_ghost] = s;
        triangles[s_ghost] = triangles[s_next(s)];
        triangles[s_ghost + 1] = triangles[s];
        triangles[s_ghost + 2] = r_ghost;

        // stitch this ghost triangle to the next one around the hull
        let opposite = num_solid_sides + (3 * i + 4) % (3 * num_unpaired);
        halfedges[s_ghost + 2] = opposite;
        halfedges[opposite] = s_ghost + 2;

        s = unpaired_by_region[triangles[s_next(s)]];
    }

    ClosedTriangulation {
        triangles,
        halfedges,
        num_solid_sides,
    }
}
