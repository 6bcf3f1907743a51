//! Dual-mesh island map generation
//!
//! A standalone library that builds a dual mesh (triangle mesh plus its
//! polygon dual) from a planar Delaunay triangulation and runs a
//! deterministic procedural-terrain pipeline on it: elevation, rainfall,
//! rivers. Engine-agnostic; drawing goes through a caller-provided surface.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use islandmap::*;
//!
//! // Generate a map
//! let config = MapConfigBuilder::new()
//!     .seed(287)
//!     .spacing(50.0).unwrap()
//!     .build().unwrap();
//!
//! let map = IslandMap::generate(config).unwrap();
//!
//! // Walk the dual mesh
//! let mesh = map.mesh();
//! for r in 0..mesh.num_solid_regions() {
//!     let degree = mesh.s_around_r(r).count();
//!     assert!(degree >= 2);
//! }
//!
//! // Rivers carry accumulated flow
//! let big_rivers = map.terrain().flow_s.iter().filter(|&&f| f > 0.1).count();
//! println!("{} strong river sides", big_rivers);
//! ```
//!
//! # Structure
//!
//! The mesh side of the crate closes the triangulation boundary with a
//! synthetic ghost region so that every half-edge has an opposite and every
//! circulation terminates. The terrain side layers ordering-sensitive
//! sweeps on top: a wind-ordered moisture sweep, a priority-flood downslope
//! assignment, and reverse-order flow accumulation.
//!
//! # Features
//!
//! - `serde`: serialization support for the configuration types

// Modules
pub mod config;
pub mod error;
pub mod generation;
pub mod map;
pub mod mesh;
pub mod render;
pub mod terrain;

// Re-export core types for convenience
pub use config::{Bounds, MapConfig, MapConfigBuilder};
pub use error::{MapError, Result};
pub use map::IslandMap;
pub use mesh::DualMesh;
pub use render::{BiomeColorMapper, Color, ColorMapper, DrawSurface};
pub use terrain::{NoiseSource, SimplexNoise, TerrainMap};

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
