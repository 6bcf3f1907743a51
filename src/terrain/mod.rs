//! Terrain pipeline over the dual mesh
//!
//! Deterministic, ordering-sensitive sweeps layered on a closed mesh:
//! triangle elevation from fractal noise and an island mask, region
//! elevation by averaging, a wind-ordered moisture sweep, a priority-flood
//! downslope assignment, and reverse-order flow accumulation for rivers.
//!
//! Everything is a pure function of mesh + seed + parameters. The three
//! orderings are load-bearing: rainfall must visit regions by ascending
//! wind priority, the flood must pop triangles from a min-heap keyed by
//! elevation (ties by id), and flow must walk the flood order in reverse.

mod noise;

pub use noise::{fractal_noise, NoiseSource, SimplexNoise};

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::config::MapConfig;
use crate::mesh::DualMesh;

/// Map coordinates are divided by this before sampling elevation noise
const NOISE_DOMAIN_SCALE: f64 = 1000.0;

/// Triangles below this elevation seed the downslope flood
const OCEAN_SEED_ELEVATION: f32 = -0.1;

/// Per-element terrain state over one mesh
///
/// Arrays are indexed by the id kind their suffix names: `_t` by triangle,
/// `_r` by region, `_s` by side. All are pre-sized from the mesh counts at
/// construction.
///
/// # Example
///
/// ```rust
/// use islandmap::terrain::{SimplexNoise, TerrainMap};
/// use islandmap::{generation, MapConfigBuilder};
///
/// let config = MapConfigBuilder::new().seed(287).build().unwrap();
/// let mesh = generation::build_mesh(&config).unwrap();
/// let terrain = TerrainMap::generate(&mesh, &SimplexNoise::new(config.seed), &config);
/// assert_eq!(terrain.elevation_r.len(), mesh.num_regions());
/// ```
#[derive(Debug, Clone)]
pub struct TerrainMap {
    /// Elevation per triangle in [-1, 1]; ghost triangles stay 0
    pub elevation_t: Vec<f32>,
    /// Elevation per region, averaged from incident triangles
    pub elevation_r: Vec<f32>,
    /// Humidity per region after the wind sweep
    pub humidity_r: Vec<f32>,
    /// Rainfall per region after the wind sweep
    pub rainfall_r: Vec<f32>,
    /// Moisture per triangle, averaged from its corner regions
    pub moisture_t: Vec<f32>,
    /// Outgoing side toward each triangle's downstream neighbor
    ///
    /// `None` marks an ocean sink: a flood seed with no lower neighbor.
    pub s_downslope_t: Vec<Option<usize>>,
    /// Triangles in flood pre-order; flow walks this in reverse
    pub t_order: Vec<usize>,
    /// Accumulated flow per triangle
    pub flow_t: Vec<f32>,
    /// Accumulated flow per side, for river drawing
    pub flow_s: Vec<f32>,
    /// Regions sorted by ascending wind priority (ties by id)
    pub wind_order_r: Vec<usize>,
    /// Scalar projection of each region on the wind direction
    ///
    /// NaN for the ghost region, which therefore sorts last and is never
    /// anyone's upwind neighbor.
    pub wind_priority_r: Vec<f32>,
}

impl TerrainMap {
    /// Allocate zeroed terrain arrays sized for a mesh
    pub fn new(mesh: &DualMesh) -> Self {
        let num_t = mesh.num_triangles();
        let num_r = mesh.num_regions();
        Self {
            elevation_t: vec![0.0; num_t],
            elevation_r: vec![0.0; num_r],
            humidity_r: vec![0.0; num_r],
            rainfall_r: vec![0.0; num_r],
            moisture_t: vec![0.0; num_t],
            s_downslope_t: vec![None; num_t],
            t_order: Vec::with_capacity(num_t),
            flow_t: vec![0.0; num_t],
            flow_s: vec![0.0; mesh.num_sides()],
            wind_order_r: Vec::with_capacity(num_r),
            wind_priority_r: vec![f32::NAN; num_r],
        }
    }

    /// Run the whole pipeline
    pub fn generate<N: NoiseSource>(mesh: &DualMesh, noise: &N, config: &MapConfig) -> Self {
        let mut map = Self::new(mesh);
        map.assign_wind_order(mesh, config.wind_angle_deg);
        map.assign_triangle_elevation(mesh, noise, config);
        map.assign_region_elevation(mesh);
        map.assign_rainfall(mesh, config);
        map.assign_downslope(mesh);
        map.assign_moisture(mesh);
        map.assign_flow(mesh, config);
        map
    }

    /// Sort regions by their projection on the wind direction
    ///
    /// The rainfall sweep visits regions in this order so that every upwind
    /// neighbor is finished before a region is processed.
    pub fn assign_wind_order(&mut self, mesh: &DualMesh, wind_angle_deg: f32) {
        let theta = (wind_angle_deg as f64).to_radians();
        let (sin, cos) = theta.sin_cos();

        for r in 0..mesh.num_regions() {
            self.wind_priority_r[r] = if mesh.is_ghost_r(r) {
                f32::NAN
            } else {
                let pos = mesh.pos_of_r(r);
                (pos.x * cos + pos.y * sin) as f32
            };
        }

        self.wind_order_r.clear();
        self.wind_order_r.extend(0..mesh.num_regions());
        let priority = &self.wind_priority_r;
        self.wind_order_r
            .sort_by(|&a, &b| priority[a].total_cmp(&priority[b]).then(a.cmp(&b)));
    }

    /// Assign elevation to every solid triangle
    ///
    /// Samples the desired-elevation field at the triangle center, distorts
    /// the coastline, and clamps to [-1, 1]. Ghost triangles keep 0.
    pub fn assign_triangle_elevation<N: NoiseSource>(
        &mut self,
        mesh: &DualMesh,
        noise: &N,
        config: &MapConfig,
    ) {
        for t in 0..mesh.num_solid_triangles() {
            let pos = mesh.pos_of_t(t);
            let nx = (pos.x / NOISE_DOMAIN_SCALE) as f32;
            let ny = (pos.y / NOISE_DOMAIN_SCALE) as f32;
            let mut e = desired_elevation(noise, nx, ny, config);
            e += config.noisy_coastlines * (1.0 - e * e * e * e);
            self.elevation_t[t] = e.clamp(-1.0, 1.0);
        }
    }

    /// Average triangle elevations onto regions
    ///
    /// A region touching any underwater triangle is forced just below sea
    /// level if its average lands on or above it, so no spurious land
    /// pixels stick out of the water.
    pub fn assign_region_elevation(&mut self, mesh: &DualMesh) {
        for r in 0..mesh.num_regions() {
            let mut sum = 0.0;
            let mut count = 0usize;
            let mut touches_water = false;
            for t in mesh.t_around_r(r) {
                let e = self.elevation_t[t];
                sum += e;
                count += 1;
                if e < 0.0 {
                    touches_water = true;
                }
            }
            let mut e = if count > 0 { sum / count as f32 } else { 0.0 };
            if touches_water && e >= 0.0 {
                e = -0.001;
            }
            self.elevation_r[r] = e;
        }
    }

    /// Sweep humidity and rainfall across regions from upwind to downwind
    ///
    /// Each region starts from the mean humidity of its already-visited
    /// upwind neighbors. Boundary regions are an oceanic humidity source,
    /// water adds evaporation, and humidity above the orographic threshold
    /// `1 - elevation` falls out as extra rain.
    pub fn assign_rainfall(&mut self, mesh: &DualMesh, config: &MapConfig) {
        for i in 0..self.wind_order_r.len() {
            let r = self.wind_order_r[i];
            if mesh.is_ghost_r(r) {
                continue;
            }

            let mut count = 0usize;
            let mut sum = 0.0;
            for r_neighbor in mesh.r_around_r(r) {
                // NaN priority (the ghost) never compares below, so the
                // ghost region is never counted as upwind
                if self.wind_priority_r[r_neighbor] < self.wind_priority_r[r] {
                    count += 1;
                    sum += self.humidity_r[r_neighbor];
                }
            }

            let mut humidity = 0.0;
            let mut rainfall = 0.0;
            if count > 0 {
                humidity = sum / count as f32;
                rainfall += config.raininess * humidity;
            }
            if mesh.is_boundary_r(r) {
                humidity = 1.0;
            }
            if self.elevation_r[r] < 0.0 {
                humidity += config.evaporation * -self.elevation_r[r];
            }
            let threshold = 1.0 - self.elevation_r[r];
            if humidity > threshold {
                let excess = humidity - threshold;
                rainfall += config.raininess * config.rain_shadow * excess;
                humidity -= excess;
            }
            self.rainfall_r[r] = rainfall;
            self.humidity_r[r] = humidity;
        }
    }

    /// Assign every triangle a downslope side by priority flood
    ///
    /// Deep-water triangles seed a min-heap keyed by elevation (ties by
    /// triangle id). Popping in ascending order and pointing each newly
    /// reached neighbor back at the triangle that reached it yields a
    /// drainage tree rooted at the ocean minima; `t_order` records the
    /// visit order.
    pub fn assign_downslope(&mut self, mesh: &DualMesh) {
        let num_t = mesh.num_triangles();
        let mut visited = vec![false; num_t];
        let mut queue: BinaryHeap<Reverse<(OrderedFloat<f32>, usize)>> = BinaryHeap::new();

        self.t_order.clear();
        self.s_downslope_t.iter_mut().for_each(|s| *s = None);

        for t in 0..num_t {
            if self.elevation_t[t] < OCEAN_SEED_ELEVATION {
                let mut best_s = None;
                let mut best_e = self.elevation_t[t];
                for s in mesh.s_around_t(t) {
                    let e = self.elevation_t[mesh.t_outer(s)];
                    if e < best_e {
                        best_e = e;
                        best_s = Some(s);
                    }
                }
                self.s_downslope_t[t] = best_s;
                visited[t] = true;
                self.t_order.push(t);
                queue.push(Reverse((OrderedFloat(self.elevation_t[t]), t)));
            }
        }

        while let Some(Reverse((_, t_current))) = queue.pop() {
            for s in mesh.s_around_t(t_current) {
                let t_neighbor = mesh.t_outer(s);
                if !visited[t_neighbor] {
                    visited[t_neighbor] = true;
                    // point back downhill toward the triangle that reached it
                    self.s_downslope_t[t_neighbor] = Some(mesh.s_opposite(s));
                    self.t_order.push(t_neighbor);
                    queue.push(Reverse((
                        OrderedFloat(self.elevation_t[t_neighbor]),
                        t_neighbor,
                    )));
                }
            }
        }
    }

    /// Average region rainfall onto triangles
    pub fn assign_moisture(&mut self, mesh: &DualMesh) {
        for t in 0..mesh.num_triangles() {
            let [a, b, c] = mesh.r_around_t(t);
            self.moisture_t[t] =
                (self.rainfall_r[a] + self.rainfall_r[b] + self.rainfall_r[c]) / 3.0;
        }
    }

    /// Accumulate flow down the drainage tree
    ///
    /// Land triangles seed flow from squared moisture; walking the flood
    /// order in reverse adds each tributary into its downstream neighbor
    /// and into the connecting side. A downstream triangle left higher
    /// than its land tributary is lowered to it, filling lakes in reverse.
    pub fn assign_flow(&mut self, mesh: &DualMesh, config: &MapConfig) {
        for t in 0..mesh.num_triangles() {
            self.flow_t[t] = if self.elevation_t[t] >= 0.0 {
                config.flow * self.moisture_t[t] * self.moisture_t[t]
            } else {
                0.0
            };
        }
        self.flow_s.iter_mut().for_each(|f| *f = 0.0);

        for i in (0..self.t_order.len()).rev() {
            let t_tributary = self.t_order[i];
            if let Some(s_flow) = self.s_downslope_t[t_tributary] {
                let t_downstream = mesh.t_outer(s_flow);
                self.flow_t[t_downstream] += self.flow_t[t_tributary];
                self.flow_s[s_flow] += self.flow_t[t_tributary];
                if self.elevation_t[t_downstream] > self.elevation_t[t_tributary]
                    && self.elevation_t[t_tributary] >= 0.0
                {
                    self.elevation_t[t_downstream] = self.elevation_t[t_tributary];
                }
            }
        }
    }
}

/// Desired elevation at a point of the noise domain
///
/// Fractal noise shaped by an island mask, with ridges carved into land by
/// the same noise sampled at double frequency.
fn desired_elevation<N: NoiseSource>(noise: &N, nx: f32, ny: f32, config: &MapConfig) -> f32 {
    let mut e = fractal_noise(noise, nx, ny, config.octaves);

    let d = nx.abs().max(ny.abs());
    e = 0.5 * (e + config.island * (0.75 - 2.0 * d * d));
    e = e.clamp(-1.0, 1.0);

    if e > 0.0 {
        let m = noise.noise2d(nx * 2.0, ny * 2.0);
        let ridged = (5.0 * e).min(1.0) * (1.0 - m.abs() / 0.5);
        e = e.max((3.0 * e).min(ridged));
    }
    e
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Bounds, MapConfigBuilder};
    use crate::generation::build_mesh;

    fn reference_config() -> MapConfig {
        MapConfigBuilder::new()
            .seed(287)
            .bounds(Bounds::new(-500.0, -500.0, 1000.0, 1000.0))
            .spacing(50.0)
            .unwrap()
            .wind_angle_deg(0.0)
            .build()
            .unwrap()
    }

    fn generate(config: &MapConfig) -> (DualMesh, TerrainMap) {
        let mesh = build_mesh(config).unwrap();
        let noise = SimplexNoise::new(config.seed);
        let terrain = TerrainMap::generate(&mesh, &noise, config);
        (mesh, terrain)
    }

    /// FNV-style fold over elevations rounded to 4 decimals
    fn elevation_hash(terrain: &TerrainMap) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        for &e in &terrain.elevation_r {
            let q = (e * 10000.0).round() as i64;
            h ^= q as u64;
            h = h.wrapping_mul(0x0000_0100_0000_01b3);
        }
        h
    }

    /// Repeated runs with the same configuration reproduce exactly
    #[test]
    fn test_deterministic_terrain() {
        let config = reference_config();
        let (_, a) = generate(&config);
        let (_, b) = generate(&config);

        assert_eq!(elevation_hash(&a), elevation_hash(&b));
        assert_eq!(a.elevation_r, b.elevation_r);
        assert_eq!(a.rainfall_r, b.rainfall_r);
        assert_eq!(a.flow_s, b.flow_s);
    }

    #[test]
    fn test_wind_order_sorted_by_priority() {
        let config = reference_config();
        let (mesh, terrain) = generate(&config);

        // wind angle 0 projects onto x
        for r in 0..mesh.num_regions() - 1 {
            let expected = mesh.pos_of_r(r).x as f32;
            assert_eq!(terrain.wind_priority_r[r], expected);
        }
        for pair in terrain.wind_order_r.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(
                !(terrain.wind_priority_r[b] < terrain.wind_priority_r[a]),
                "wind order not ascending at regions {} and {}",
                a,
                b
            );
        }
        // ghost sorts last
        assert_eq!(
            *terrain.wind_order_r.last().unwrap(),
            mesh.num_regions() - 1
        );
    }

    #[test]
    fn test_elevations_clamped() {
        let config = reference_config();
        let (_, terrain) = generate(&config);
        for &e in &terrain.elevation_t {
            assert!((-1.0..=1.0).contains(&e));
        }
    }

    #[test]
    fn test_map_has_land_and_water() {
        let config = reference_config();
        let (mesh, terrain) = generate(&config);
        let land = (0..mesh.num_solid_triangles())
            .filter(|&t| terrain.elevation_t[t] >= 0.0)
            .count();
        let water = mesh.num_solid_triangles() - land;
        assert!(land > 0, "all water");
        assert!(water > 0, "all land");
    }

    #[test]
    fn test_water_tie_forced_below_sea_level() {
        let config = reference_config();
        let (mesh, terrain) = generate(&config);
        for r in 0..mesh.num_regions() {
            let touches_water = mesh.t_around_r(r).any(|t| terrain.elevation_t[t] < 0.0);
            if touches_water {
                assert!(
                    terrain.elevation_r[r] < 0.0,
                    "region {} touches water but has elevation {}",
                    r,
                    terrain.elevation_r[r]
                );
            }
        }
    }

    #[test]
    fn test_boundary_regions_are_humidity_sources() {
        let config = reference_config();
        let (mesh, terrain) = generate(&config);
        // Underwater boundary regions hold the full oceanic humidity plus
        // evaporation; boundary land may lose some to orographic rain.
        for r in 0..mesh.num_boundary_regions() {
            if terrain.elevation_r[r] < 0.0 {
                assert!(
                    terrain.humidity_r[r] >= 1.0,
                    "boundary region {} has humidity {}",
                    r,
                    terrain.humidity_r[r]
                );
            }
        }
        for r in 0..mesh.num_regions() {
            assert!(terrain.rainfall_r[r] >= 0.0);
        }
    }

    /// Downslope totality: the flood visits every triangle exactly once,
    /// sinks are water, and every downslope side leaves its own triangle.
    #[test]
    fn test_downslope_totality() {
        let config = reference_config();
        let (mesh, terrain) = generate(&config);

        assert_eq!(terrain.t_order.len(), mesh.num_triangles());
        let mut seen = vec![false; mesh.num_triangles()];
        for &t in &terrain.t_order {
            assert!(!seen[t], "triangle {} flooded twice", t);
            seen[t] = true;
        }

        for t in 0..mesh.num_triangles() {
            match terrain.s_downslope_t[t] {
                Some(s) => assert_eq!(mesh.t_inner(s), t, "downslope side of {} is not its own", t),
                None => assert!(
                    terrain.elevation_t[t] < OCEAN_SEED_ELEVATION,
                    "sink triangle {} is not deep water",
                    t
                ),
            }
        }
    }

    /// Walking downslope from land never ascends and reaches the ocean.
    #[test]
    fn test_flow_descends_to_ocean() {
        let config = reference_config();
        let (mesh, terrain) = generate(&config);

        for t_start in 0..mesh.num_solid_triangles() {
            if terrain.elevation_t[t_start] < 0.0 {
                continue;
            }
            let mut t = t_start;
            let mut steps = 0;
            while terrain.elevation_t[t] >= 0.0 {
                let s = terrain.s_downslope_t[t]
                    .unwrap_or_else(|| panic!("land triangle {} has no downslope", t));
                let t_next = mesh.t_outer(s);
                assert!(
                    terrain.elevation_t[t_next] <= terrain.elevation_t[t],
                    "ascent from {} ({}) to {} ({})",
                    t,
                    terrain.elevation_t[t],
                    t_next,
                    terrain.elevation_t[t_next]
                );
                t = t_next;
                steps += 1;
                assert!(steps <= mesh.num_triangles(), "walk from {} loops", t_start);
            }
        }
    }

    /// Flow conservation on a synthetic cone: every triangle's flow equals
    /// its own seed plus the flow of its tributaries.
    #[test]
    fn test_flow_conservation_on_cone() {
        let config = MapConfigBuilder::new()
            .seed(7)
            .bounds(Bounds::new(0.0, 0.0, 500.0, 500.0))
            .spacing(50.0)
            .unwrap()
            .build()
            .unwrap();
        let mesh = build_mesh(&config).unwrap();
        let mut terrain = TerrainMap::new(&mesh);

        // single peak at the center descending to deep water at the rim
        let center = glam::DVec2::new(250.0, 250.0);
        let max_d = 250.0 * std::f64::consts::SQRT_2;
        for t in 0..mesh.num_triangles() {
            let d = (mesh.pos_of_t(t) - center).length() / max_d;
            terrain.elevation_t[t] = (0.9 - 1.8 * d as f32).clamp(-1.0, 1.0);
        }
        terrain.assign_downslope(&mesh);
        for m in terrain.moisture_t.iter_mut() {
            *m = 1.0;
        }
        terrain.assign_flow(&mesh, &config);

        // independent bottom-up recomputation over the drainage tree
        let mut expected: Vec<f32> = (0..mesh.num_triangles())
            .map(|t| {
                if terrain.elevation_t[t] >= 0.0 {
                    config.flow
                } else {
                    0.0
                }
            })
            .collect();
        for i in (0..terrain.t_order.len()).rev() {
            let t = terrain.t_order[i];
            if let Some(s) = terrain.s_downslope_t[t] {
                expected[mesh.t_outer(s)] += expected[t];
            }
        }
        for t in 0..mesh.num_triangles() {
            assert!(
                (terrain.flow_t[t] - expected[t]).abs() < 1e-3,
                "triangle {}: flow {} != expected {}",
                t,
                terrain.flow_t[t],
                expected[t]
            );
        }
    }

    #[test]
    fn test_moisture_is_mean_of_corner_rainfall() {
        let config = reference_config();
        let (mesh, terrain) = generate(&config);
        for t in 0..mesh.num_triangles() {
            let [a, b, c] = mesh.r_around_t(t);
            let mean =
                (terrain.rainfall_r[a] + terrain.rainfall_r[b] + terrain.rainfall_r[c]) / 3.0;
            assert_eq!(terrain.moisture_t[t], mean);
        }
    }

    #[test]
    fn test_flow_sides_feed_rivers() {
        let config = reference_config();
        let (mesh, terrain) = generate(&config);
        // every positive side flow sits on a downslope side of its triangle
        for s in 0..mesh.num_sides() {
            if terrain.flow_s[s] > 0.0 {
                assert_eq!(terrain.s_downslope_t[mesh.t_inner(s)], Some(s));
            }
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let config_a = reference_config();
        let config_b = MapConfig {
            seed: 999,
            ..config_a
        };

        let (_, a) = generate(&config_a);
        let (_, b) = generate(&config_b);
        assert_ne!(a.elevation_r, b.elevation_r);
    }
}
