//! Time management utilities
//!
//! All time-dependent motion in the backdrop is a pure function of a single
//! elapsed value read once per frame. [`Clock`] is the seam: production code
//! reads the wall clock, tests and replays drive a [`ManualClock`].

use std::time::Instant;

/// Monotonically increasing elapsed-time source, in seconds
pub trait Clock {
    /// Seconds elapsed since the clock started
    fn elapsed(&self) -> f32;
}

/// Wall-clock time since construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Start a new clock at zero
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Clock advanced explicitly by the caller
///
/// Never moves backwards: `set` with an earlier time is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: f32,
}

impl ManualClock {
    /// Create a clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to an absolute time
    pub fn set(&mut self, seconds: f32) {
        if seconds >= self.now {
            self.now = seconds;
        }
    }

    /// Advance by a delta in seconds
    pub fn advance(&mut self, seconds: f32) {
        self.set(self.now + seconds.max(0.0));
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> f32 {
        self.now
    }
}

/// Frame statistics accumulated from successive elapsed readings
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTimer {
    last_elapsed: Option<f32>,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl FrameTimer {
    /// Create a new timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame observed at `elapsed` seconds and return its delta
    pub fn tick(&mut self, elapsed: f32) -> f32 {
        self.delta_time = self
            .last_elapsed
            .map_or(0.0, |last| (elapsed - last).max(0.0));
        self.total_time = elapsed;
        self.last_elapsed = Some(elapsed);
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since the first frame
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}
