//! # boidfield - flocking inside signed distance fields
//!
//! CPU boid simulation where a population of agents avoids, aligns with and
//! clumps toward its neighbors while an arbitrary polygon, baked into a
//! signed distance field, keeps it in (or out of) a region.
//!
//! ## Quick Start
//!
//! ```ignore
//! use boidfield::prelude::*;
//!
//! let config = SimulationConfig::default()
//!     .with_capacity(400)
//!     .with_boundary(
//!         vec![
//!             Vec2::new(10.0, 10.0),
//!             Vec2::new(500.0, 40.0),
//!             Vec2::new(470.0, 380.0),
//!             Vec2::new(30.0, 350.0),
//!         ],
//!         512,
//!         400,
//!     )
//!     .with_params(FlockingParams::default().with_avoiding(0.8));
//!
//! let mut sim = Simulation::new(config)?;
//! loop {
//!     sim.advance(frame_delta)?;
//!     upload(bytemuck::cast_slice(&sim.instances()));
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Boundary
//!
//! [`SdfGrid::build`] samples the signed distance to a closed polygon on an
//! integer grid. Negative values are inside the polygon. The integrator
//! treats negative values as penetration, so a raw grid makes the polygon an
//! obstacle; [`SdfGrid::inverted`] turns it into an enclosure.
//!
//! ### Particles
//!
//! A [`ParticleStore`] is a fixed-capacity array of [`Particle`] records.
//! Particles are never removed, only toggled inactive.
//!
//! ### Stepping
//!
//! [`Integrator::step`] advances every active particle once using an
//! immutable [`FlockingParams`]. The neighbor scan is `O(N²)`; enable the
//! `parallel` feature to spread it over rayon's thread pool.
//!
//! ## Feature Overview
//!
//! | Concern | Types |
//! |---------|-------|
//! | Boundary | [`SdfGrid`] |
//! | Storage | [`ParticleStore`], [`Particle`], [`ParticleInstance`] |
//! | Update | [`Integrator`], [`FlockingParams`], [`StepStats`] |
//! | Spawning | [`Seeder`], [`SpawnArea`], [`SpawnJitter`] |
//! | Timing | [`StepClock`](time::StepClock) |
//! | Host facade | [`Simulation`], [`SimulationConfig`] |

mod config;
mod error;
mod integrator;
mod params;
mod particle;
mod sdf;
mod simulation;
mod spawn;
mod store;
pub mod time;

pub use bytemuck;
pub use config::SimulationConfig;
pub use error::{ErrorKind, Result, SimulationError};
pub use glam::{Mat2, Vec2, Vec4};
pub use integrator::{Integrator, StepStats};
pub use params::FlockingParams;
pub use particle::{Particle, ParticleInstance};
pub use sdf::SdfGrid;
pub use simulation::Simulation;
pub use spawn::{Seeder, SpawnArea, SpawnJitter};
pub use store::ParticleStore;

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use boidfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::SimulationConfig;
    pub use crate::error::{Result, SimulationError};
    pub use crate::integrator::{Integrator, StepStats};
    pub use crate::params::FlockingParams;
    pub use crate::particle::{Particle, ParticleInstance};
    pub use crate::sdf::SdfGrid;
    pub use crate::simulation::Simulation;
    pub use crate::spawn::{Seeder, SpawnArea};
    pub use crate::store::ParticleStore;
    pub use crate::time::{ClockConfig, StepClock};
    pub use crate::{Mat2, Vec2, Vec4};
}
