//! Host-facing simulation object.
//!
//! [`Simulation`] bundles a particle store, a shared boundary field,
//! flocking parameters, the spawn seeder and a step clock behind the small
//! set of calls a host actually needs.
//!
//! ```ignore
//! let mut sim = Simulation::new(SimulationConfig::default().with_capacity(500))?;
//!
//! // Each frame:
//! sim.advance(frame_delta)?;
//! let bytes: &[u8] = bytemuck::cast_slice(&sim.instances());
//! ```

use crate::config::SimulationConfig;
use crate::error::{Result, SimulationError};
use crate::integrator::{Integrator, StepStats};
use crate::params::FlockingParams;
use crate::particle::{Particle, ParticleInstance};
use crate::sdf::SdfGrid;
use crate::spawn::{Seeder, SpawnArea};
use crate::store::ParticleStore;
use crate::time::{ClockConfig, StepClock};
use glam::Vec2;
use std::sync::Arc;
use tracing::{debug, warn};

/// A flock confined by a polygon boundary.
#[derive(Debug)]
pub struct Simulation {
    store: ParticleStore,
    sdf: Arc<SdfGrid>,
    params: FlockingParams,
    integrator: Integrator,
    seeder: Seeder,
    clock: StepClock,
    spawn_area: SpawnArea,
    scale: f32,
    enclosure: bool,
}

impl Simulation {
    /// Build the boundary field, size the store and spawn every particle.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.params.validate()?;
        config.clock.validate()?;
        let sdf = build_boundary(
            &config.polygon,
            config.grid_width,
            config.grid_height,
            config.enclosure,
        )?;
        let store = ParticleStore::new(config.capacity)?;

        let mut sim = Self {
            store,
            sdf: Arc::new(sdf),
            params: config.params,
            integrator: Integrator::new(),
            seeder: Seeder::new(config.seed),
            clock: StepClock::from_config(config.clock),
            spawn_area: config.spawn_area,
            scale: config.scale,
            enclosure: config.enclosure,
        };
        sim.restart();
        Ok(sim)
    }

    /// Respawn every particle from the configured seed.
    ///
    /// Deterministic: two restarts produce identical particle fields.
    pub fn restart(&mut self) {
        self.store.reset_all();
        self.seeder.reseed();
        for p in self.store.particles_mut() {
            self.seeder.seed_particle(self.spawn_area).apply(p, self.scale);
        }
        self.integrator.reset();
        self.clock.reset();
        debug!(
            particles = self.store.len(),
            seed = self.seeder.seed(),
            "restarted simulation"
        );
    }

    /// Deactivate every particle without respawning.
    pub fn reset_all(&mut self) {
        self.store.reset_all();
        self.integrator.reset();
        self.clock.reset();
    }

    /// Change the number of particle slots and respawn.
    pub fn resize(&mut self, capacity: usize) -> Result<()> {
        self.store.resize(capacity)?;
        self.restart();
        Ok(())
    }

    /// Run one integrator step of length `delta`.
    pub fn step(&mut self, delta: f32) -> Result<StepStats> {
        self.integrator
            .step(self.store.particles_mut(), &self.sdf, delta, &self.params)
    }

    /// Run however many steps the clock produces for this frame.
    ///
    /// Returns the number of steps taken.
    pub fn advance(&mut self, frame_delta: f32) -> Result<usize> {
        let deltas = self.clock.advance(frame_delta);
        for &dt in &deltas {
            self.step(dt)?;
        }
        Ok(deltas.len())
    }

    /// Replace the boundary with a new polygon.
    ///
    /// The new field is built before anything is swapped, so a rejected
    /// polygon keeps the old boundary. Fails with a precondition error while
    /// any handle from [`sdf_handle`](Self::sdf_handle) is still alive.
    pub fn rebuild_boundary(
        &mut self,
        polygon: &[Vec2],
        width: usize,
        height: usize,
    ) -> Result<()> {
        let grid = build_boundary(polygon, width, height, self.enclosure)?;
        match Arc::get_mut(&mut self.sdf) {
            Some(slot) => {
                *slot = grid;
                Ok(())
            }
            None => {
                warn!(
                    readers = Arc::strong_count(&self.sdf) - 1,
                    "boundary rebuild rejected while field is shared"
                );
                Err(SimulationError::BoundaryInUse)
            }
        }
    }

    /// Validate and install new flocking parameters.
    pub fn set_params(&mut self, params: FlockingParams) -> Result<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    /// Validate and install new timing settings.
    ///
    /// Carried time is dropped and pre-processing runs again on the next
    /// [`advance`](Self::advance).
    pub fn set_clock(&mut self, config: ClockConfig) -> Result<()> {
        config.validate()?;
        self.clock = StepClock::from_config(config);
        Ok(())
    }

    /// Shared read-only handle to the boundary field.
    pub fn sdf_handle(&self) -> Arc<SdfGrid> {
        Arc::clone(&self.sdf)
    }

    /// Current boundary field.
    #[inline]
    pub fn sdf(&self) -> &SdfGrid {
        &self.sdf
    }

    /// Current flocking parameters.
    #[inline]
    pub fn params(&self) -> &FlockingParams {
        &self.params
    }

    /// All particle records.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        self.store.particles()
    }

    /// Mutable particle records, for hosts that place or toggle particles.
    #[inline]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        self.store.particles_mut()
    }

    /// Host instance data, inactive slots zeroed.
    pub fn instances(&self) -> Vec<ParticleInstance> {
        self.store.instances()
    }

    /// Underlying store.
    #[inline]
    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    /// Simulated seconds since the last restart.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.integrator.elapsed()
    }
}

fn build_boundary(
    polygon: &[Vec2],
    width: usize,
    height: usize,
    enclosure: bool,
) -> Result<SdfGrid> {
    let grid = SdfGrid::build(polygon, width, height)?;
    Ok(if enclosure { grid.inverted() } else { grid })
}
