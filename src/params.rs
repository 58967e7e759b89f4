//! Flocking parameters.
//!
//! [`FlockingParams`] is an immutable value handed to every integrator step.
//! All fields are independent; the only validation is that each is finite
//! and, where a negative value has no physical meaning, non-negative.
//!
//! ```ignore
//! let params = FlockingParams::default()
//!     .with_detection(80.0, 240.0)
//!     .with_avoiding(1.5)
//!     .with_boundary(40.0, 0.2);
//! ```

use crate::error::{Result, SimulationError};
use serde::{Deserialize, Serialize};

/// Tunable constants of the flocking model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockingParams {
    /// Distance from the boundary at which the repulsive force starts.
    pub boundary_range: f32,
    /// Strength of the quadratic boundary repulsion.
    pub boundary_force: f32,
    /// Neighbors farther than this are ignored.
    pub detection_range: f32,
    /// Total width of the forward-facing detection cone, in degrees.
    pub detection_angle: f32,
    /// Push away from visible neighbors.
    pub avoiding: f32,
    /// Pull toward the local average velocity.
    pub aligning: f32,
    /// Pull toward the local centroid.
    pub clumping: f32,
    /// Fraction of velocity removed per unit time.
    pub linear_drag: f32,
    /// How fast speed advances the animation clock.
    pub animation_speed: f32,
}

impl Default for FlockingParams {
    fn default() -> Self {
        Self {
            boundary_range: 32.0,
            boundary_force: 0.5,
            detection_range: 64.0,
            detection_angle: 270.0,
            avoiding: 0.5,
            aligning: 0.5,
            clumping: 0.1,
            linear_drag: 0.1,
            animation_speed: 1.0,
        }
    }
}

impl FlockingParams {
    /// Set boundary range and force together.
    pub fn with_boundary(mut self, range: f32, force: f32) -> Self {
        self.boundary_range = range;
        self.boundary_force = force;
        self
    }

    /// Set detection range and cone angle (degrees).
    pub fn with_detection(mut self, range: f32, angle_degrees: f32) -> Self {
        self.detection_range = range;
        self.detection_angle = angle_degrees;
        self
    }

    /// Set avoidance strength.
    pub fn with_avoiding(mut self, strength: f32) -> Self {
        self.avoiding = strength;
        self
    }

    /// Set alignment strength.
    pub fn with_aligning(mut self, strength: f32) -> Self {
        self.aligning = strength;
        self
    }

    /// Set clumping strength.
    pub fn with_clumping(mut self, strength: f32) -> Self {
        self.clumping = strength;
        self
    }

    /// Set linear drag.
    pub fn with_linear_drag(mut self, drag: f32) -> Self {
        self.linear_drag = drag;
        self
    }

    /// Set animation speed.
    pub fn with_animation_speed(mut self, speed: f32) -> Self {
        self.animation_speed = speed;
        self
    }

    /// Half of the detection cone in radians.
    #[inline]
    pub fn half_detection_angle(&self) -> f32 {
        self.detection_angle.to_radians() * 0.5
    }

    /// Check that every value is usable.
    ///
    /// Ranges, the cone angle, the boundary force and drag must be
    /// non-negative. Strengths may be negative (a negative `avoiding` turns
    /// avoidance into attraction) but must be finite.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("boundary_range", self.boundary_range),
            ("boundary_force", self.boundary_force),
            ("detection_range", self.detection_range),
            ("detection_angle", self.detection_angle),
            ("linear_drag", self.linear_drag),
        ];
        let finite = [
            ("avoiding", self.avoiding),
            ("aligning", self.aligning),
            ("clumping", self.clumping),
            ("animation_speed", self.animation_speed),
        ];

        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::InvalidParameter { name, value });
            }
        }
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SimulationError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}
