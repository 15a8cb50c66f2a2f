//! Motion smoothing for the parallax rig
//!
//! Raw input is jittery. Each frame the smoothed value moves a fixed fraction
//! of the way toward the target, which gives a cinematic lag without any
//! integration. When orientation mode has no usable signal the target is an
//! idle drift built from two sinusoids of elapsed time, so the scene never
//! sits dead still.

use crate::core::config::ParallaxConfig;
use crate::foundation::math::{Vec2, Vec3};
use crate::input::{InputMode, InputSampler};

/// Process-wide parallax state, owned by the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxState {
    /// Value `current` converges toward
    pub target: Vec2,
    /// Smoothed value
    pub current: Vec2,
    /// Whether the pointer drives the target
    pub is_pointer_mode: bool,
    /// Whether a usable orientation event has arrived
    pub has_orientation_signal: bool,
}

/// Exponential smoother with idle-drift fallback
#[derive(Debug, Clone)]
pub struct MotionSmoother {
    config: ParallaxConfig,
    state: ParallaxState,
}

impl MotionSmoother {
    /// Create a smoother at rest
    pub fn new(config: &ParallaxConfig, mode: InputMode) -> Self {
        Self {
            config: config.clone(),
            state: ParallaxState {
                target: Vec2::zeros(),
                current: Vec2::zeros(),
                is_pointer_mode: mode == InputMode::Pointer,
                has_orientation_signal: false,
            },
        }
    }

    /// Current state
    pub fn state(&self) -> &ParallaxState {
        &self.state
    }

    /// Idle drift target at time `elapsed`
    pub fn drift(&self, elapsed: f32) -> Vec2 {
        let frequency = self.config.drift_frequency;
        let amplitude = self.config.drift_amplitude;
        Vec2::new(
            (elapsed * frequency.x).sin() * amplitude.x,
            (elapsed * frequency.y).cos() * amplitude.y,
        )
    }

    /// Advance one frame: pick the target, then move `current` toward it
    pub fn step(&mut self, elapsed: f32, input: &InputSampler) {
        self.state.has_orientation_signal = input.has_orientation_signal();
        if input.wants_drift() {
            self.state.target = self.drift(elapsed);
        } else if let Some(target) = input.target() {
            self.state.target = target;
        }

        let smoothing = self.config.smoothing;
        self.state.current += (self.state.target - self.state.current) * smoothing;
    }

    /// Smoothed value scaled by strength with the Y axis inverted
    pub fn offset(&self) -> Vec2 {
        let strength = self.config.strength;
        Vec2::new(self.state.current.x * strength, -self.state.current.y * strength)
    }

    /// World-group Euler rotation for a frame's parallax offset
    ///
    /// The offset is mapped back to smoothed input units first, so the tilt
    /// does not change with `strength`.
    pub fn world_rotation(&self, offset: Vec2) -> Vec3 {
        let tilt = self.config.world_tilt;
        let strength = self.config.strength;
        let smoothed = Vec2::new(offset.x / strength, -offset.y / strength);
        Vec3::new(smoothed.y * tilt.y, smoothed.x * tilt.x, 0.0)
    }
}
