//! Map configuration and builder
//!
//! This module provides configuration types for deterministic island map
//! generation. The same configuration always produces the identical map.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// Axis-aligned rectangle the map is generated inside
///
/// Interior boundary points hug the inside of this rectangle; exterior
/// boundary points sit just outside it so that edge polygons are closed by
/// real triangles.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Left edge (minimum x)
    pub left: f64,
    /// Top edge (minimum y)
    pub top: f64,
    /// Width (must be positive)
    pub width: f64,
    /// Height (must be positive)
    pub height: f64,
}

impl Bounds {
    /// Create a rectangle from its top-left corner and extent
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge (maximum x)
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge (maximum y)
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether a point lies inside the rectangle (edges inclusive)
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

impl Default for Bounds {
    /// A 1000 x 1000 rectangle centered on the origin
    ///
    /// Centering keeps the elevation-noise domain symmetric, which is what
    /// the island mask assumes.
    fn default() -> Self {
        Self::new(-500.0, -500.0, 1000.0, 1000.0)
    }
}

/// Configuration for deterministic island map generation
///
/// The same configuration (seed, bounds, spacing, wind angle, terrain
/// parameters) always produces byte-identical elevation, rainfall, and flow
/// arrays.
///
/// # Serialization
///
/// Only the configuration is serialized (with the `serde` feature), not the
/// generated mesh or terrain. A map is regenerated from its configuration.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    /// Random seed for point jitter and terrain noise
    pub seed: u64,

    /// Rectangle the map is generated inside
    pub bounds: Bounds,

    /// Target spacing between neighboring points
    pub spacing: f64,

    /// Jitter strength for interior points, as a fraction of spacing
    ///
    /// 0.0 places points on a plain grid; 0.5 (default) breaks up the grid
    /// pattern well without letting points collide.
    pub jitter: f64,

    /// Prevailing wind direction in degrees
    ///
    /// 0 blows along +x; 90 blows along +y. The rainfall sweep visits
    /// regions from upwind to downwind of this direction.
    pub wind_angle_deg: f32,

    /// Number of fractal noise octaves for elevation
    pub octaves: usize,

    /// Island mask strength (how strongly elevation is pushed up near the
    /// noise-domain origin and down far from it)
    pub island: f32,

    /// Amplitude of coastline distortion applied to triangle elevation
    pub noisy_coastlines: f32,

    /// Fraction of humidity that falls as rainfall each step
    pub raininess: f32,

    /// Humidity gained over water per unit of depth
    pub evaporation: f32,

    /// Fraction of orographic excess that falls as extra rain
    pub rain_shadow: f32,

    /// Base river flow per unit of squared moisture
    pub flow: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfigBuilder::new().build().unwrap()
    }
}

/// Builder for creating [`MapConfig`] with validation
///
/// # Example
///
/// ```rust
/// use islandmap::{Bounds, MapConfigBuilder};
///
/// let config = MapConfigBuilder::new()
///     .seed(287)
///     .bounds(Bounds::new(0.0, 0.0, 1000.0, 1000.0))
///     .spacing(50.0)
///     .unwrap()
///     .wind_angle_deg(0.0)
///     .build()
///     .unwrap();
/// assert_eq!(config.spacing, 50.0);
/// ```
#[derive(Debug, Clone)]
pub struct MapConfigBuilder {
    seed: Option<u64>,
    bounds: Bounds,
    spacing: f64,
    jitter: f64,
    wind_angle_deg: f32,
    octaves: usize,
    island: f32,
    noisy_coastlines: f32,
    raininess: f32,
    evaporation: f32,
    rain_shadow: f32,
    flow: f32,
}

impl MapConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: random (generated at `build()` time)
    /// - bounds: 1000 x 1000 centered on the origin
    /// - spacing: 50.0
    /// - jitter: 0.5
    /// - wind_angle_deg: 0.0
    /// - octaves: 5, island: 0.5, noisy_coastlines: 0.01,
    ///   raininess: 0.9, evaporation: 0.5, rain_shadow: 0.5, flow: 0.2
    pub fn new() -> Self {
        Self {
            seed: None,
            bounds: Bounds::default(),
            spacing: 50.0,
            jitter: 0.5,
            wind_angle_deg: 0.0,
            octaves: 5,
            island: 0.5,
            noisy_coastlines: 0.01,
            raininess: 0.9,
            evaporation: 0.5,
            rain_shadow: 0.5,
            flow: 0.2,
        }
    }

    /// Set the random seed
    ///
    /// Using the same seed with the same other parameters reproduces the
    /// map exactly.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the map rectangle
    ///
    /// The bounds are not validated here; `build()` rejects non-positive
    /// extents and bounds too small for the chosen spacing.
    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the target point spacing
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the spacing is not strictly positive.
    pub fn spacing(mut self, spacing: f64) -> Result<Self> {
        if spacing <= 0.0 {
            return Err(MapError::InvalidConfig(format!(
                "spacing must be positive (got {})",
                spacing
            )));
        }
        self.spacing = spacing;
        Ok(self)
    }

    /// Set the jitter strength as a fraction of spacing
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the fraction is outside [0, 1].
    pub fn jitter(mut self, jitter: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&jitter) {
            return Err(MapError::InvalidConfig(format!(
                "jitter must be in [0, 1] (got {})",
                jitter
            )));
        }
        self.jitter = jitter;
        Ok(self)
    }

    /// Set the prevailing wind direction in degrees
    pub fn wind_angle_deg(mut self, degrees: f32) -> Self {
        self.wind_angle_deg = degrees;
        self
    }

    /// Set the number of elevation noise octaves
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if octaves is 0 or more than 10.
    pub fn octaves(mut self, octaves: usize) -> Result<Self> {
        if octaves == 0 || octaves > 10 {
            return Err(MapError::InvalidConfig(format!(
                "octaves must be in [1, 10] (got {})",
                octaves
            )));
        }
        self.octaves = octaves;
        Ok(self)
    }

    /// Set the island mask strength
    pub fn island(mut self, island: f32) -> Self {
        self.island = island;
        self
    }

    /// Set the coastline distortion amplitude
    pub fn noisy_coastlines(mut self, amount: f32) -> Self {
        self.noisy_coastlines = amount;
        self
    }

    /// Set the raininess factor
    pub fn raininess(mut self, raininess: f32) -> Self {
        self.raininess = raininess;
        self
    }

    /// Set the evaporation factor
    pub fn evaporation(mut self, evaporation: f32) -> Self {
        self.evaporation = evaporation;
        self
    }

    /// Set the rain shadow factor
    pub fn rain_shadow(mut self, rain_shadow: f32) -> Self {
        self.rain_shadow = rain_shadow;
        self
    }

    /// Set the base flow factor
    pub fn flow(mut self, flow: f32) -> Self {
        self.flow = flow;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the bounds have a non-positive extent or
    /// are too small to fit boundary points at the chosen spacing.
    pub fn build(self) -> Result<MapConfig> {
        if self.bounds.width <= 0.0 || self.bounds.height <= 0.0 {
            return Err(MapError::InvalidConfig(format!(
                "bounds must have positive extent (got {} x {})",
                self.bounds.width, self.bounds.height
            )));
        }
        if self.bounds.width <= 4.0 * self.spacing || self.bounds.height <= 4.0 * self.spacing {
            return Err(MapError::InvalidConfig(format!(
                "bounds {} x {} too small for spacing {}",
                self.bounds.width, self.bounds.height, self.spacing
            )));
        }

        let seed = self.seed.unwrap_or_else(rand::random);

        Ok(MapConfig {
            seed,
            bounds: self.bounds,
            spacing: self.spacing,
            jitter: self.jitter,
            wind_angle_deg: self.wind_angle_deg,
            octaves: self.octaves,
            island: self.island,
            noisy_coastlines: self.noisy_coastlines,
            raininess: self.raininess,
            evaporation: self.evaporation,
            rain_shadow: self.rain_shadow,
            flow: self.flow,
        })
    }
}

impl Default for MapConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = MapConfigBuilder::new().build().unwrap();
        assert_eq!(config.bounds, Bounds::default());
        assert_eq!(config.spacing, 50.0);
        assert_eq!(config.octaves, 5);
        assert_eq!(config.raininess, 0.9);
        let _seed = config.seed; // random, just verify it was set
    }

    #[test]
    fn test_builder_custom() {
        let config = MapConfigBuilder::new()
            .seed(287)
            .bounds(Bounds::new(0.0, 0.0, 500.0, 800.0))
            .spacing(25.0)
            .unwrap()
            .wind_angle_deg(90.0)
            .island(0.8)
            .build()
            .unwrap();

        assert_eq!(config.seed, 287);
        assert_eq!(config.bounds.width, 500.0);
        assert_eq!(config.spacing, 25.0);
        assert_eq!(config.wind_angle_deg, 90.0);
        assert_eq!(config.island, 0.8);
    }

    #[test]
    fn test_invalid_spacing() {
        assert!(MapConfigBuilder::new().spacing(0.0).is_err());
        assert!(MapConfigBuilder::new().spacing(-3.0).is_err());
    }

    #[test]
    fn test_invalid_jitter() {
        assert!(MapConfigBuilder::new().jitter(-0.1).is_err());
        assert!(MapConfigBuilder::new().jitter(1.5).is_err());
    }

    #[test]
    fn test_invalid_octaves() {
        assert!(MapConfigBuilder::new().octaves(0).is_err());
        assert!(MapConfigBuilder::new().octaves(11).is_err());
    }

    #[test]
    fn test_bounds_too_small_for_spacing() {
        let result = MapConfigBuilder::new()
            .bounds(Bounds::new(0.0, 0.0, 100.0, 100.0))
            .build();
        assert!(result.is_err(), "default spacing 50 cannot fill a 100 x 100 box");
    }

    #[test]
    fn test_bounds_helpers() {
        let bounds = Bounds::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(bounds.right(), 110.0);
        assert_eq!(bounds.bottom(), 70.0);
        assert!(bounds.contains(10.0, 20.0));
        assert!(bounds.contains(110.0, 70.0));
        assert!(!bounds.contains(110.1, 50.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = MapConfigBuilder::new().seed(42).build().unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let restored: MapConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
