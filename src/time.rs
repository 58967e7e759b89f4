//! Frame-to-step timing.
//!
//! Hosts call the simulation with whatever frame delta they have. A
//! [`StepClock`] turns that into the sequence of integrator deltas to run:
//! either the frame delta itself, or a number of fixed-size substeps with the
//! remainder carried to the next frame.
//!
//! # Example
//!
//! ```ignore
//! use boidfield::time::StepClock;
//!
//! let mut clock = StepClock::new().with_fixed_fps(Some(60));
//!
//! // In your game loop:
//! for dt in clock.advance(frame_delta) {
//!     integrator.step(particles, &sdf, dt, &params)?;
//! }
//! ```

use crate::error::{Result, SimulationError};
use serde::{Deserialize, Serialize};

/// Upper bound on a single frame delta in fixed-rate mode.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Frame delta substituted for non-positive input in fixed-rate mode.
pub const MIN_FRAME_DELTA: f32 = 0.001;

/// Rate used for pre-processing when no fixed rate is configured.
pub const DEFAULT_PRE_PROCESS_FPS: u32 = 30;

/// Highest accepted fixed simulation rate.
pub const MAX_FIXED_FPS: u32 = 1000;

/// Longest accepted pre-process time in seconds.
pub const MAX_PRE_PROCESS_TIME: f32 = 60.0;

/// Timing settings for a [`StepClock`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Fixed simulation rate. `None` steps once per frame with the frame delta.
    pub fixed_fps: Option<u32>,
    /// Simulated seconds to run before the first frame after a restart.
    pub pre_process_time: f32,
}

impl ClockConfig {
    /// Check that the rate and pre-process time are finite and in range.
    pub fn validate(&self) -> Result<()> {
        if let Some(fps) = self.fixed_fps {
            if fps > MAX_FIXED_FPS {
                return Err(SimulationError::InvalidParameter {
                    name: "fixed_fps",
                    value: fps as f32,
                });
            }
        }
        let t = self.pre_process_time;
        if !t.is_finite() || !(0.0..=MAX_PRE_PROCESS_TIME).contains(&t) {
            return Err(SimulationError::InvalidParameter {
                name: "pre_process_time",
                value: t,
            });
        }
        Ok(())
    }
}

/// Converts frame deltas into integrator deltas.
#[derive(Clone, Debug)]
pub struct StepClock {
    config: ClockConfig,
    /// Unconsumed time in fixed-rate mode.
    remainder: f32,
    /// Total simulated seconds handed out.
    elapsed: f64,
    /// Frames seen since the last reset.
    frame_count: u64,
    /// Whether pre-processing still has to run.
    pending_pre_process: bool,
}

impl StepClock {
    /// Clock that steps once per frame with no pre-processing.
    pub fn new() -> Self {
        Self::from_config(ClockConfig::default())
    }

    /// Clock with explicit settings.
    pub fn from_config(config: ClockConfig) -> Self {
        Self {
            config,
            remainder: 0.0,
            elapsed: 0.0,
            frame_count: 0,
            pending_pre_process: true,
        }
    }

    /// Set the fixed simulation rate. `Some(0)` is treated as `None`; rates
    /// above [`MAX_FIXED_FPS`] clamp to it.
    pub fn with_fixed_fps(mut self, fps: Option<u32>) -> Self {
        self.config.fixed_fps = fps.filter(|f| *f > 0).map(|f| f.min(MAX_FIXED_FPS));
        self
    }

    /// Set the pre-process time in seconds, clamped to
    /// `[0, MAX_PRE_PROCESS_TIME]`. NaN becomes 0.
    pub fn with_pre_process_time(mut self, seconds: f32) -> Self {
        self.config.pre_process_time = if seconds.is_nan() {
            0.0
        } else {
            seconds.clamp(0.0, MAX_PRE_PROCESS_TIME)
        };
        self
    }

    /// Current settings.
    #[inline]
    pub fn config(&self) -> ClockConfig {
        self.config
    }

    /// Total simulated seconds handed out since the last reset.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Frames seen since the last reset.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Fixed substep length, if a fixed rate is configured.
    #[inline]
    pub fn fixed_delta(&self) -> Option<f32> {
        self.config
            .fixed_fps
            .filter(|f| *f > 0)
            .map(|f| 1.0 / f.min(MAX_FIXED_FPS) as f32)
    }

    /// Number of pre-process substeps of length `frame_time`.
    ///
    /// Counts every substep taken while the remaining time is still
    /// non-negative, so an exact multiple gets one extra step.
    fn pre_process_steps(&self, frame_time: f32) -> usize {
        let t = self.config.pre_process_time;
        if t.is_nan() || t <= 0.0 {
            return 0;
        }
        let t = t.min(MAX_PRE_PROCESS_TIME);
        (t / frame_time).floor() as usize + 1
    }

    /// Forget carried time and counters; pre-processing runs again.
    pub fn reset(&mut self) {
        self.remainder = 0.0;
        self.elapsed = 0.0;
        self.frame_count = 0;
        self.pending_pre_process = true;
    }

    /// Deltas to integrate for a frame of length `frame_delta`.
    ///
    /// The first call after construction or [`reset`](Self::reset) prepends
    /// the pre-process substeps. Without a fixed rate a non-positive or
    /// non-finite frame delta yields no frame step.
    pub fn advance(&mut self, frame_delta: f32) -> Vec<f32> {
        let mut steps = Vec::new();

        if self.pending_pre_process {
            self.pending_pre_process = false;
            let frame_time = self
                .fixed_delta()
                .unwrap_or(1.0 / DEFAULT_PRE_PROCESS_FPS as f32);
            let count = self.pre_process_steps(frame_time);
            steps.resize(count, frame_time);
        }

        match self.fixed_delta() {
            Some(frame_time) => {
                let clamped = if frame_delta.is_nan() || frame_delta <= 0.0 {
                    MIN_FRAME_DELTA
                } else {
                    frame_delta.min(MAX_FRAME_DELTA)
                };
                let mut todo = self.remainder + clamped;
                while todo >= frame_time {
                    steps.push(frame_time);
                    todo -= frame_time;
                }
                self.remainder = todo;
            }
            None => {
                if frame_delta.is_finite() && frame_delta > 0.0 {
                    steps.push(frame_delta);
                }
            }
        }

        self.frame_count += 1;
        self.elapsed += steps.iter().map(|d| f64::from(*d)).sum::<f64>();
        steps
    }
}

impl Default for StepClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_rate_passes_delta_through() {
        let mut clock = StepClock::new();
        assert_eq!(clock.advance(0.016), vec![0.016]);
        assert_eq!(clock.advance(0.0), Vec::<f32>::new());
        assert_eq!(clock.advance(-1.0), Vec::<f32>::new());
        assert_eq!(clock.frame(), 3);
    }

    #[test]
    fn test_fixed_rate_carries_remainder() {
        let mut clock = StepClock::new().with_fixed_fps(Some(20));
        // 0.075s -> one 0.05s step, 0.025 carried
        assert_eq!(clock.advance(0.075), vec![0.05]);
        // 0.025 + 0.03 -> one step, 0.005 carried
        assert_eq!(clock.advance(0.03), vec![0.05]);
        // 0.005 + 0.01 -> nothing yet
        assert!(clock.advance(0.01).is_empty());
        assert!((clock.elapsed() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_fixed_rate_clamps_long_frames() {
        let mut clock = StepClock::new().with_fixed_fps(Some(100));
        // 5s frame is treated as 0.1s
        let steps = clock.advance(5.0);
        assert!(steps.len() <= 10 && steps.len() >= 9);
    }

    #[test]
    fn test_fixed_rate_non_positive_frame() {
        let mut clock = StepClock::new().with_fixed_fps(Some(1000));
        let steps = clock.advance(0.0);
        assert!(steps.len() <= 1);
    }

    #[test]
    fn test_pre_process_runs_once() {
        let mut clock = StepClock::new().with_pre_process_time(0.05);
        let first = clock.advance(0.016);
        // two 1/30s substeps cover 0.05s, then the frame itself
        assert_eq!(first.len(), 3);
        assert_eq!(clock.advance(0.016).len(), 1);

        clock.reset();
        assert_eq!(clock.advance(0.016).len(), 3);
    }

    #[test]
    fn test_pre_process_count_matches_remaining_time() {
        // 0.1s at 10 fps: steps at 0.1 and 0.0 remaining
        let mut clock = StepClock::new()
            .with_fixed_fps(Some(10))
            .with_pre_process_time(0.1);
        assert_eq!(clock.advance(0.0).len(), 2);
    }

    #[test]
    fn test_huge_pre_process_time_is_bounded() {
        let mut clock = StepClock::new()
            .with_fixed_fps(Some(30))
            .with_pre_process_time(1.0e9);
        assert_eq!(clock.config().pre_process_time, MAX_PRE_PROCESS_TIME);
        let steps = clock.advance(0.016);
        assert!(steps.len() <= (MAX_PRE_PROCESS_TIME * 30.0) as usize + 2);

        let mut clock = StepClock::from_config(ClockConfig {
            fixed_fps: Some(u32::MAX),
            pre_process_time: f32::INFINITY,
        });
        let steps = clock.advance(0.1);
        let cap = (MAX_PRE_PROCESS_TIME * MAX_FIXED_FPS as f32) as usize + MAX_FIXED_FPS as usize;
        assert!(steps.len() <= cap + 2);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(ClockConfig::default().validate().is_ok());

        for config in [
            ClockConfig {
                fixed_fps: Some(MAX_FIXED_FPS + 1),
                pre_process_time: 0.0,
            },
            ClockConfig {
                fixed_fps: None,
                pre_process_time: f32::INFINITY,
            },
            ClockConfig {
                fixed_fps: None,
                pre_process_time: f32::NAN,
            },
            ClockConfig {
                fixed_fps: None,
                pre_process_time: -1.0,
            },
            ClockConfig {
                fixed_fps: Some(60),
                pre_process_time: 1.0e9,
            },
        ] {
            let err = config.validate().unwrap_err();
            assert!(matches!(err, SimulationError::InvalidParameter { .. }));
        }
    }

    #[test]
    fn test_zero_fps_means_variable() {
        let clock = StepClock::new().with_fixed_fps(Some(0));
        assert_eq!(clock.fixed_delta(), None);
    }
}
