//! Particle records and the host-facing instance view.
//!
//! A [`Particle`] is a plain fixed-size record. The simulation never creates
//! or destroys them, it only flips `active`. Hosts that want to upload
//! particles into their own buffers convert each record with
//! [`Particle::to_instance`] and cast the result with `bytemuck`.

use bytemuck::{Pod, Zeroable};
use glam::{Mat2, Vec2, Vec4};

/// State of a single boid.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct Particle {
    /// World position.
    pub position: Vec2,
    /// World velocity. Also the facing direction used by the detection cone.
    pub velocity: Vec2,
    /// Orientation basis: `x_axis` is the tangent, `y_axis` the forward axis,
    /// both scaled by `scale`. Rendering hint only.
    pub basis: Mat2,
    /// Visual size multiplier applied to `basis`.
    pub scale: f32,
    /// Inactive particles are skipped by every computation.
    pub active: bool,
    /// Animation cycle position, kept in `[1/3, 2/3)` once stepped.
    pub animation_phase: f32,
    /// Speed-driven clock feeding `animation_phase`.
    pub time_accum: f32,
    /// RGBA color, passed through untouched.
    pub color: Vec4,
    /// Host payload. `custom[2]` mirrors `animation_phase` after each step.
    pub custom: [f32; 4],
    /// Per-particle seed assigned at spawn.
    pub seed: u32,
    /// Rotation jitter in `[0, 1)`.
    pub angle_rand: f32,
    /// Scale jitter in `[0, 1)`.
    pub scale_rand: f32,
    /// Hue rotation jitter in `[0, 1)`.
    pub hue_rand: f32,
    /// Animation offset jitter in `[0, 1)`.
    pub anim_offset_rand: f32,
}

impl Particle {
    /// An all-zero, inactive record.
    pub const ZEROED: Self = Self {
        position: Vec2::ZERO,
        velocity: Vec2::ZERO,
        basis: Mat2::ZERO,
        scale: 0.0,
        active: false,
        animation_phase: 0.0,
        time_accum: 0.0,
        color: Vec4::ZERO,
        custom: [0.0; 4],
        seed: 0,
        angle_rand: 0.0,
        scale_rand: 0.0,
        hue_rand: 0.0,
        anim_offset_rand: 0.0,
    };

    /// Canonical inactive state used by resets: identity basis, unit scale,
    /// opaque white, everything else zero.
    pub fn inactive() -> Self {
        Self {
            basis: Mat2::IDENTITY,
            scale: 1.0,
            color: Vec4::ONE,
            ..Self::ZEROED
        }
    }

    /// Flattened transform for hosts: two rows of a 2×3 affine matrix.
    ///
    /// Layout is `[x_axis.x, y_axis.x, 0, origin.x]` and
    /// `[x_axis.y, y_axis.y, 0, origin.y]`.
    pub fn transform_rows(&self) -> [[f32; 4]; 2] {
        let x = self.basis.x_axis;
        let y = self.basis.y_axis;
        [
            [x.x, y.x, 0.0, self.position.x],
            [x.y, y.y, 0.0, self.position.y],
        ]
    }

    /// Instance data for this particle, zeroed when inactive.
    pub fn to_instance(&self) -> ParticleInstance {
        if !self.active {
            return ParticleInstance::zeroed();
        }
        let rows = self.transform_rows();
        ParticleInstance {
            row0: rows[0],
            row1: rows[1],
            color: color_to_rgba8(self.color),
            custom: self.custom,
        }
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::ZEROED
    }
}

/// Plain-old-data instance record for host rendering buffers.
///
/// 13 × 4 bytes: the transform rows, an RGBA8 color and the custom payload.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ParticleInstance {
    /// First transform row.
    pub row0: [f32; 4],
    /// Second transform row.
    pub row1: [f32; 4],
    /// Color packed as RGBA8.
    pub color: [u8; 4],
    /// Custom payload.
    pub custom: [f32; 4],
}

fn color_to_rgba8(c: Vec4) -> [u8; 4] {
    let q = |v: f32| (v * 255.0).clamp(0.0, 255.0) as u8;
    [q(c.x), q(c.y), q(c.z), q(c.w)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_instance_is_zeroed() {
        let mut p = Particle::inactive();
        p.position = Vec2::new(3.0, 4.0);
        p.custom = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(p.to_instance(), ParticleInstance::zeroed());
    }

    #[test]
    fn test_active_instance_layout() {
        let p = Particle {
            active: true,
            position: Vec2::new(5.0, -2.0),
            custom: [0.0, 0.5, 0.4, 1.0],
            ..Particle::inactive()
        };
        let inst = p.to_instance();
        assert_eq!(inst.row0, [1.0, 0.0, 0.0, 5.0]);
        assert_eq!(inst.row1, [0.0, 1.0, 0.0, -2.0]);
        assert_eq!(inst.color, [255, 255, 255, 255]);
        assert_eq!(inst.custom, p.custom);
    }

    #[test]
    fn test_instance_size_and_cast() {
        assert_eq!(std::mem::size_of::<ParticleInstance>(), 13 * 4);
        let instances = [ParticleInstance::zeroed(); 3];
        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        assert_eq!(bytes.len(), 3 * 52);
    }

    #[test]
    fn test_color_quantization_clamps() {
        assert_eq!(color_to_rgba8(Vec4::new(-1.0, 0.5, 2.0, 1.0)), [0, 127, 255, 255]);
    }
}
