//! Input sampling
//!
//! Turns raw pointer or device-orientation events into a normalized parallax
//! target in roughly `[-1, 1]` per axis. The source is chosen once at startup
//! and never re-evaluated. Malformed events never fail: bad pointer events
//! are ignored, and a missing or non-finite tilt axis reads as level.

use crate::core::config::{InputConfig, InputModePreference};
use crate::foundation::math::Vec2;

/// Which signal drives the parallax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Pointer position over the viewport
    Pointer,
    /// Device tilt
    Orientation,
}

impl InputMode {
    /// Resolve the preference against touch-capability detection
    pub fn select(preference: InputModePreference, touch_capable: bool) -> Self {
        match preference {
            InputModePreference::Pointer => Self::Pointer,
            InputModePreference::Orientation => Self::Orientation,
            InputModePreference::Auto if touch_capable => Self::Orientation,
            InputModePreference::Auto => Self::Pointer,
        }
    }
}

/// Normalizes raw events into a parallax target
#[derive(Debug, Clone)]
pub struct InputSampler {
    mode: InputMode,
    viewport: (u32, u32),
    orientation_range: f32,
    target: Option<Vec2>,
    orientation_disabled: bool,
    has_orientation_signal: bool,
}

impl InputSampler {
    /// Create a sampler for a `width` x `height` viewport
    pub fn new(mode: InputMode, config: &InputConfig, width: u32, height: u32) -> Self {
        log::info!("Input sampler using {:?} mode", mode);
        Self {
            mode,
            viewport: (width, height),
            orientation_range: config.orientation_range_degrees,
            target: None,
            orientation_disabled: false,
            has_orientation_signal: false,
        }
    }

    /// Selected mode
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Last accepted target, `None` until a usable event arrives
    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    /// Whether a usable orientation event has ever arrived
    pub fn has_orientation_signal(&self) -> bool {
        self.has_orientation_signal
    }

    /// Whether the device reported that it has no orientation sensor
    pub fn orientation_disabled(&self) -> bool {
        self.orientation_disabled
    }

    /// Whether the smoother should synthesize an idle drift instead of following a target
    pub fn wants_drift(&self) -> bool {
        self.mode == InputMode::Orientation && (self.orientation_disabled || !self.has_orientation_signal)
    }

    /// Update the viewport used to normalize pointer coordinates
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    /// Pointer moved to viewport pixel `(x, y)`
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if self.mode != InputMode::Pointer {
            return;
        }
        let (width, height) = self.viewport;
        if width == 0 || height == 0 || !x.is_finite() || !y.is_finite() {
            log::trace!("Ignoring pointer event ({x}, {y}) for viewport {width}x{height}");
            return;
        }
        self.target = Some(Vec2::new(
            2.0 * x / width as f32 - 1.0,
            2.0 * y / height as f32 - 1.0,
        ));
    }

    /// Device orientation changed; either tilt axis may be absent
    ///
    /// Both axes absent means the device has no sensor and disables
    /// orientation for the session. A single absent axis counts as zero.
    pub fn orientation_changed(&mut self, gamma: Option<f32>, beta: Option<f32>) {
        if self.mode != InputMode::Orientation || self.orientation_disabled {
            return;
        }
        if gamma.is_none() && beta.is_none() {
            log::info!("Device reports no orientation data; falling back to idle drift");
            self.orientation_disabled = true;
            self.has_orientation_signal = false;
            return;
        }

        let level = |axis: Option<f32>| axis.filter(|value| value.is_finite()).unwrap_or(0.0);
        let range = self.orientation_range;
        self.target = Some(Vec2::new(level(gamma) / range, level(beta) / range - 1.0));
        self.has_orientation_signal = true;
    }
}
