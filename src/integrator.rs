//! Per-step flocking update.
//!
//! Each call to [`Integrator::step`] advances every active particle once:
//!
//! 1. **Boundary** - sample the SDF. Penetrating particles (`value < 0`) are
//!    pushed back onto the surface and given a corrective impulse; particles
//!    within `boundary_range` feel a quadratic repulsion along the gradient.
//! 2. **Neighbors** - every other active particle inside the detection
//!    circle and the forward cone contributes a weight
//!    `(1 - dist/range)² * (1 - |angle|/half_angle)` to avoidance and to the
//!    local centroid / average velocity.
//! 3. **Clumping & aligning** - steer toward the weighted centroid and the
//!    weighted average velocity. The averages include the particle itself
//!    with weight 1, which damps the pull on sparse groups.
//! 4. **Integration** - semi-implicit Euler followed by linear drag.
//! 5. **Orientation & animation** - rendering hints derived from the
//!    smoothed velocity.
//!
//! The step is read-then-commit: every new record is computed from the state
//! at the start of the call, then all records are written back together. The
//! read phase is a pure per-particle map and runs on rayon when the
//! `parallel` feature is enabled.

use crate::error::{Result, SimulationError};
use crate::params::FlockingParams;
use crate::particle::Particle;
use crate::sdf::SdfGrid;
use glam::{Mat2, Vec2};
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const THIRD: f32 = 1.0 / 3.0;

/// Summary of one step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Particles that were updated.
    pub active: usize,
    /// Neighbor pairs that passed both the range and the cone cut.
    pub interactions: usize,
}

/// Drives the flocking update.
///
/// Holds no simulation state beyond an elapsed-time counter.
#[derive(Clone, Debug, Default)]
pub struct Integrator {
    elapsed: f64,
}

/// Kinematic snapshot of an active particle, packed for the neighbor scan.
#[derive(Clone, Copy)]
struct Body {
    index: usize,
    position: Vec2,
    velocity: Vec2,
}

impl Integrator {
    /// New integrator with zero elapsed time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total simulated time in seconds.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Zero the elapsed counter.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Advance all active particles by `delta`.
    ///
    /// `delta` must be finite and positive and `params` must validate;
    /// otherwise nothing is modified and an invalid-argument error is
    /// returned.
    pub fn step(
        &mut self,
        particles: &mut [Particle],
        sdf: &SdfGrid,
        delta: f32,
        params: &FlockingParams,
    ) -> Result<StepStats> {
        if !delta.is_finite() || delta <= 0.0 {
            return Err(SimulationError::InvalidDelta(delta));
        }
        params.validate()?;

        let bodies = snapshot(particles);

        #[cfg(feature = "parallel")]
        let updated = plan_parallel(particles, &bodies, sdf, delta, params);
        #[cfg(not(feature = "parallel"))]
        let updated = plan_serial(particles, &bodies, sdf, delta, params);

        let stats = commit(particles, updated);

        self.elapsed += f64::from(delta);
        trace!(
            active = stats.active,
            interactions = stats.interactions,
            delta,
            "flocking step"
        );
        Ok(stats)
    }
}

fn snapshot(particles: &[Particle]) -> Vec<Body> {
    particles
        .iter()
        .enumerate()
        .filter(|(_, p)| p.active)
        .map(|(index, p)| Body {
            index,
            position: p.position,
            velocity: p.velocity,
        })
        .collect()
}

/// New record for every body, in snapshot order.
type Plan = Vec<(usize, Particle, usize)>;

#[cfg_attr(feature = "parallel", allow(dead_code))]
fn plan_serial(
    particles: &[Particle],
    bodies: &[Body],
    sdf: &SdfGrid,
    delta: f32,
    params: &FlockingParams,
) -> Plan {
    bodies
        .iter()
        .map(|body| {
            let (next, seen) =
                update_particle(&particles[body.index], body.index, bodies, sdf, delta, params);
            (body.index, next, seen)
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn plan_parallel(
    particles: &[Particle],
    bodies: &[Body],
    sdf: &SdfGrid,
    delta: f32,
    params: &FlockingParams,
) -> Plan {
    bodies
        .par_iter()
        .map(|body| {
            let (next, seen) =
                update_particle(&particles[body.index], body.index, bodies, sdf, delta, params);
            (body.index, next, seen)
        })
        .collect()
}

/// Write a plan back into the store.
fn commit(particles: &mut [Particle], plan: Plan) -> StepStats {
    let mut stats = StepStats {
        active: plan.len(),
        interactions: 0,
    };
    for (index, next, seen) in plan {
        particles[index] = next;
        stats.interactions += seen;
    }
    stats
}

/// Compute the next state of one particle from the start-of-step snapshot.
///
/// Returns the new record and the number of neighbors that influenced it.
fn update_particle(
    particle: &Particle,
    index: usize,
    bodies: &[Body],
    sdf: &SdfGrid,
    delta: f32,
    params: &FlockingParams,
) -> (Particle, usize) {
    let mut p = *particle;
    let mut force = Vec2::ZERO;

    // Boundary
    let (value, gradient) = sdf.sample(p.position);
    if value < 0.0 {
        let depth = -value;
        p.position += gradient * depth;
        p.velocity += gradient * depth / (2.0 * delta);
    } else if value < params.boundary_range {
        let gap = params.boundary_range - value;
        force += params.boundary_force * gap * gap * gradient;
    }

    // Neighbors
    let mut sum_position = p.position;
    let mut sum_velocity = p.velocity;
    let mut normalization = 1.0_f32;
    let mut seen = 0;

    let range = params.detection_range;
    if range > 0.0 {
        let range_sq = range * range;
        let half_angle = params.half_detection_angle();

        for other in bodies {
            if other.index == index {
                continue;
            }

            let dir = other.position - p.position;
            let sqr_dist = dir.length_squared();
            if sqr_dist > range_sq {
                continue;
            }

            // atan2(0, 0) is 0: a particle at rest sees in every direction.
            let angle = p.velocity.perp_dot(dir).atan2(p.velocity.dot(dir)).abs();
            if angle > half_angle {
                continue;
            }

            let dist = sqr_dist.sqrt();
            let factor_dist = 1.0 - dist / range;
            let factor_angle = if half_angle > 0.0 {
                1.0 - angle / half_angle
            } else {
                1.0
            };
            let factor = factor_dist * factor_dist * factor_angle;
            debug_assert!(factor >= 0.0, "negative neighbor weight {}", factor);

            sum_position += factor * other.position;
            sum_velocity += factor * other.velocity;
            normalization += factor;

            force -= params.avoiding * factor * dir;
            seen += 1;
        }
    }

    // Clumping & aligning
    let centroid = sum_position / normalization;
    let heading = sum_velocity / normalization;
    force += params.clumping * (centroid - p.position);
    force += params.aligning * (heading - p.velocity);

    // Integration
    let velocity_before = p.velocity;
    p.velocity += delta * force;
    p.position += delta * p.velocity;
    p.velocity -= delta * params.linear_drag * p.velocity;

    // Orientation & animation
    let smoothed = (velocity_before + p.velocity) * 0.5;
    let vn = smoothed.length();
    if vn > 0.0 {
        p.basis = orientation_basis(-smoothed / vn, p.scale);
    }
    p.time_accum += vn / 1000.0 * params.animation_speed;
    p.animation_phase = animation_phase(p.time_accum);
    p.custom[2] = p.animation_phase;

    (p, seen)
}

/// Basis with `forward` as the y axis and its clockwise perpendicular as the
/// x axis, both scaled.
fn orientation_basis(forward: Vec2, scale: f32) -> Mat2 {
    let tangent = Vec2::new(forward.y, -forward.x);
    Mat2::from_cols(tangent * scale, forward * scale)
}

/// Map the animation clock into `[1/3, 2/3)`.
fn animation_phase(time_accum: f32) -> f32 {
    let phase = time_accum.rem_euclid(THIRD) + THIRD;
    // rem_euclid may round up to the modulus itself
    if phase >= 2.0 * THIRD {
        THIRD
    } else {
        phase
    }
}
