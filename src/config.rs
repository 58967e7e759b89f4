//! Simulation configuration files.
//!
//! A [`SimulationConfig`] describes everything a [`Simulation`](crate::Simulation)
//! needs: population size, boundary polygon and grid resolution, spawn
//! settings, timing and flocking parameters. It round-trips through JSON;
//! every field is optional and falls back to [`SimulationConfig::default`].
//!
//! ```json
//! {
//!     "capacity": 500,
//!     "grid_width": 320,
//!     "grid_height": 240,
//!     "polygon": [[10, 10], [310, 10], [310, 230], [10, 230]],
//!     "enclosure": true,
//!     "spawn_area": { "min": [100, 80], "max": [220, 160] },
//!     "seed": 7,
//!     "clock": { "fixed_fps": 60 },
//!     "params": { "avoiding": 0.8, "detection_angle": 240 }
//! }
//! ```

use crate::error::Result;
use crate::params::FlockingParams;
use crate::spawn::SpawnArea;
use crate::time::ClockConfig;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Full description of a simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of particle slots.
    pub capacity: usize,
    /// SDF grid width in cells (world units).
    pub grid_width: usize,
    /// SDF grid height in cells (world units).
    pub grid_height: usize,
    /// Boundary polygon, implicitly closed.
    pub polygon: Vec<Vec2>,
    /// Keep particles inside the polygon (`true`) or outside it (`false`).
    pub enclosure: bool,
    /// Rectangle spawn positions are drawn from.
    pub spawn_area: SpawnArea,
    /// Seed for spawn randomness.
    pub seed: u64,
    /// Visual scale written into every particle's basis.
    pub scale: f32,
    /// Fixed-rate and pre-process settings.
    pub clock: ClockConfig,
    /// Flocking constants.
    pub params: FlockingParams,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capacity: 256,
            grid_width: 256,
            grid_height: 256,
            polygon: vec![
                Vec2::new(16.0, 16.0),
                Vec2::new(240.0, 16.0),
                Vec2::new(240.0, 240.0),
                Vec2::new(16.0, 240.0),
            ],
            enclosure: true,
            spawn_area: SpawnArea::new(Vec2::splat(64.0), Vec2::splat(192.0)),
            seed: 0,
            scale: 1.0,
            clock: ClockConfig::default(),
            params: FlockingParams::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the number of particle slots.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the boundary polygon and grid resolution.
    pub fn with_boundary(mut self, polygon: Vec<Vec2>, width: usize, height: usize) -> Self {
        self.polygon = polygon;
        self.grid_width = width;
        self.grid_height = height;
        self
    }

    /// Choose whether the polygon encloses the particles.
    pub fn with_enclosure(mut self, enclosure: bool) -> Self {
        self.enclosure = enclosure;
        self
    }

    /// Set the spawn rectangle.
    pub fn with_spawn_area(mut self, area: SpawnArea) -> Self {
        self.spawn_area = area;
        self
    }

    /// Set the spawn seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the visual scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set timing.
    pub fn with_clock(mut self, clock: ClockConfig) -> Self {
        self.clock = clock;
        self
    }

    /// Set flocking parameters.
    pub fn with_params(mut self, params: FlockingParams) -> Self {
        self.params = params;
        self
    }
}
