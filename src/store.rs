//! Fixed-capacity particle storage.

use crate::error::{Result, SimulationError};
use crate::particle::{Particle, ParticleInstance};

/// Contiguous array of [`Particle`] records.
///
/// Capacity is chosen up front and only changes through [`resize`](Self::resize).
/// Indices stay stable for the lifetime of the store.
#[derive(Clone, Debug)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    /// Create a store of `capacity` zeroed records.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity < 1 {
            return Err(SimulationError::InvalidCapacity(capacity));
        }
        Ok(Self {
            particles: vec![Particle::ZEROED; capacity],
        })
    }

    /// Reallocate to exactly `capacity` zeroed records.
    ///
    /// All previous state is discarded. A capacity of zero is rejected and
    /// leaves the store as it was.
    pub fn resize(&mut self, capacity: usize) -> Result<()> {
        if capacity < 1 {
            return Err(SimulationError::InvalidCapacity(capacity));
        }
        self.particles = vec![Particle::ZEROED; capacity];
        Ok(())
    }

    /// Put every record back into the canonical inactive state.
    pub fn reset_all(&mut self) {
        self.particles.fill(Particle::inactive());
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Always false: a store holds at least one record.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Number of currently active records.
    pub fn active_count(&self) -> usize {
        self.particles.iter().filter(|p| p.active).count()
    }

    /// Read-only view of all records.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable view of all records.
    #[inline]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Active records with their stable indices.
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &Particle)> {
        self.particles.iter().enumerate().filter(|(_, p)| p.active)
    }

    /// Instance data for every slot, inactive slots zeroed.
    pub fn instances(&self) -> Vec<ParticleInstance> {
        self.particles.iter().map(Particle::to_instance).collect()
    }
}
