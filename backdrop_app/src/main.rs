//! Headless backdrop demo
//!
//! Drives the backdrop against the recording backend for a fixed number of
//! simulated 60 Hz frames, wandering a synthetic pointer across the viewport,
//! and logs what the scene did.
//!
//! ```text
//! backdrop_headless [config.toml|config.ron] [frames]
//! ```

use backdrop_engine::config::{Config, ConfigError};
use backdrop_engine::prelude::*;
use rand::Rng;
use thiserror::Error;

const FRAME_STEP: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: u64 = 1200;
const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

#[derive(Error, Debug)]
enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backdrop error: {0}")]
    Backdrop(#[from] BackdropError),

    #[error("Invalid frame count '{0}'")]
    FrameCount(String),
}

/// Pointer that wanders toward random points of the viewport
struct WanderingPointer {
    position: Vec2,
    goal: Vec2,
}

impl WanderingPointer {
    fn new(width: u32, height: u32) -> Self {
        let center = Vec2::new(width as f32 * 0.5, height as f32 * 0.5);
        Self { position: center, goal: center }
    }

    fn step<R: Rng>(&mut self, rng: &mut R, width: u32, height: u32) -> Vec2 {
        if (self.goal - self.position).norm() < 4.0 {
            self.goal = Vec2::new(rng.gen_range(0.0..width as f32), rng.gen_range(0.0..height as f32));
        }
        let jitter = Vec2::new(rng.gen_range(-1.5..1.5), rng.gen_range(-1.5..1.5));
        self.position += (self.goal - self.position) * 0.08 + jitter;
        self.position
    }
}

fn main() -> Result<(), AppError> {
    let mut args = std::env::args().skip(1);

    let config = match args.next() {
        Some(path) => BackdropConfig::load_from_file(&path)?,
        None => BackdropConfig::default(),
    };
    let frames = match args.next() {
        Some(count) => count.parse::<u64>().map_err(|_| AppError::FrameCount(count))?,
        None => DEFAULT_FRAMES,
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str()))
        .format_timestamp_millis()
        .init();
    log::info!("Starting headless backdrop for {} frames", frames);

    let mut loader = FileFontLoader::new();
    let mut backdrop = Backdrop::new(config, RecordingBackend::new(), &mut loader, false, Viewport::new(WIDTH, HEIGHT))?;

    let mut rng = rand::thread_rng();
    let mut pointer = WanderingPointer::new(WIDTH, HEIGHT);
    let mut clock = ManualClock::new();
    let mut timer = FrameTimer::new();
    let wall = SystemClock::new();
    let (mut width, mut height) = (WIDTH, HEIGHT);

    for frame in 0..frames {
        if frame == frames / 2 {
            (width, height) = (HEIGHT, WIDTH);
            log::info!("Rotating viewport to {}x{}", width, height);
            backdrop.handle_event(BackdropEvent::Resized(Viewport::new(width, height)))?;
        }

        let at = pointer.step(&mut rng, width, height);
        backdrop.handle_event(BackdropEvent::PointerMoved { x: at.x, y: at.y })?;

        let stats = backdrop.frame(&clock)?;
        timer.tick(stats.elapsed);

        if stats.became_ready {
            log::info!(
                "Ready at {:.2}s, logo {}",
                stats.elapsed,
                if backdrop.logo_present() { "present" } else { "absent" }
            );
        }
        if stats.frame % 120 == 0 {
            log::info!(
                "Frame {} t={:.2}s offset=({:.3}, {:.3}) shooting stars={}",
                stats.frame, stats.elapsed, stats.offset.x, stats.offset.y, stats.active_shooting_stars
            );
        }

        clock.advance(FRAME_STEP);
    }

    let spawned = backdrop.starfield().shooting_stars().spawned_total();
    let rings = backdrop.accents().rings().len();
    let backend = backdrop.into_backend();
    let wall_seconds = wall.elapsed();
    log::info!(
        "Finished {} frames ({:.1} simulated fps) in {:.3}s wall time",
        timer.frame_count(),
        timer.average_fps(),
        wall_seconds
    );
    log::info!(
        "Rendered {} frames, {} live entities, {} shooting stars spawned, {} retired",
        backend.render_count(),
        backend.live_count(),
        spawned,
        backend.destroyed_count()
    );
    log::info!("Created {} vertices in total, {} accent rings", backend.vertex_count(), rings);

    Ok(())
}
