//! Frame orchestrator
//!
//! [`Backdrop`] owns every piece of per-frame state: the seeded RNG, the
//! input sampler, the motion smoother, the shooting-star schedule and the
//! logo load. Each tick reads the parallax offset once, before any transform
//! changes, and hands that same value to every consumer.

use rand::{rngs::StdRng, SeedableRng};
use thiserror::Error;

use crate::assets::{AssetLoader, FontData};
use crate::config::ConfigError;
use crate::core::config::{BackdropConfig, SphereFieldConfig};
use crate::foundation::math::{Transform, Vec2, Vec3};
use crate::foundation::time::Clock;
use crate::input::{InputMode, InputSampler};
use crate::render::{Camera, EntityHandle, RenderBackend, RenderError, SphereTexturePainter};
use crate::scene::spheres::{self, SphereField};
use crate::scene::{Accents, LogoElement, MotionSmoother, ParallaxState, Stage, Starfield};

/// Backdrop errors
#[derive(Error, Debug)]
pub enum BackdropError {
    /// Configuration rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend call failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Output surface size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in logical pixels
    pub width: u32,
    /// Height in logical pixels
    pub height: u32,
    /// Device pixels per logical pixel
    pub pixel_ratio: f32,
}

impl Viewport {
    /// Viewport at a pixel ratio of 1
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, pixel_ratio: 1.0 }
    }
}

/// Events fed in by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackdropEvent {
    /// Pointer moved to viewport pixel `(x, y)`
    PointerMoved {
        /// Horizontal pixel
        x: f32,
        /// Vertical pixel
        y: f32,
    },
    /// Device orientation reading; both axes absent means no sensor
    OrientationChanged {
        /// Left-right tilt in degrees
        gamma: Option<f32>,
        /// Front-back tilt in degrees
        beta: Option<f32>,
    },
    /// Output surface resized
    Resized(Viewport),
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Clock time of the frame
    pub elapsed: f32,
    /// Parallax offset every consumer saw this frame
    pub offset: Vec2,
    /// Shooting stars alive after the update
    pub active_shooting_stars: usize,
    /// Whether the ready signal fired during this frame
    pub became_ready: bool,
}

/// The animated backdrop
pub struct Backdrop<B: RenderBackend> {
    config: BackdropConfig,
    backend: B,
    rng: StdRng,
    camera: Camera,
    world: EntityHandle,
    stage: Stage,
    accents: Accents,
    starfield: Starfield,
    spheres: SphereField,
    logo: LogoElement,
    input: InputSampler,
    smoother: MotionSmoother,
    frames: u64,
}

impl<B: RenderBackend> Backdrop<B> {
    /// Build the whole scene and start the logo load
    ///
    /// `touch_capable` selects orientation input when the config leaves the
    /// mode on auto.
    pub fn new<L>(
        config: BackdropConfig,
        mut backend: B,
        loader: &mut L,
        touch_capable: bool,
        viewport: Viewport,
    ) -> Result<Self, BackdropError>
    where
        L: AssetLoader + ?Sized,
    {
        config.validate()?;
        log::info!("Building backdrop for {}x{} viewport", viewport.width, viewport.height);

        let mut rng = match config.seed {
            Some(seed) => {
                log::debug!("Using fixed seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };

        let pixel_ratio = viewport.pixel_ratio.min(config.scene.max_pixel_ratio);
        backend.resize(viewport.width, viewport.height, pixel_ratio)?;
        let camera = Camera::from_config(&config.scene.camera, viewport.width, viewport.height);
        let stage = Stage::install(&mut backend, &config.scene)?;

        let world = backend.create_group()?;
        backend.attach(world, None)?;

        let accents = Accents::build(&mut backend, world, &config.accents, &mut rng)?;
        let starfield = Starfield::build(&mut backend, world, &config.starfield, &config.shooting_stars, &mut rng)?;

        let mut painter = texture_painter(&config.spheres);
        log::debug!("Sphere labels {}", if painter.has_font() { "lettered" } else { "left blank" });
        let spheres = SphereField::build(
            &mut backend,
            world,
            &spheres::catalog(),
            &mut rng,
            &mut painter,
            &config.spheres,
        )?;

        let logo = LogoElement::start(loader, &config.logo);

        let mode = InputMode::select(config.input.mode, touch_capable);
        let input = InputSampler::new(mode, &config.input, viewport.width, viewport.height);
        let smoother = MotionSmoother::new(&config.parallax, mode);

        log::info!("Backdrop initialized");
        Ok(Self {
            config,
            backend,
            rng,
            camera,
            world,
            stage,
            accents,
            starfield,
            spheres,
            logo,
            input,
            smoother,
            frames: 0,
        })
    }

    /// Feed a host event
    pub fn handle_event(&mut self, event: BackdropEvent) -> Result<(), BackdropError> {
        match event {
            BackdropEvent::PointerMoved { x, y } => self.input.pointer_moved(x, y),
            BackdropEvent::OrientationChanged { gamma, beta } => self.input.orientation_changed(gamma, beta),
            BackdropEvent::Resized(viewport) => {
                log::debug!("Viewport resized to {}x{}", viewport.width, viewport.height);
                self.camera.set_viewport(viewport.width, viewport.height);
                let pixel_ratio = viewport.pixel_ratio.min(self.config.scene.max_pixel_ratio);
                self.backend.resize(viewport.width, viewport.height, pixel_ratio)?;
                self.input.resize(viewport.width, viewport.height);
            }
        }
        Ok(())
    }

    /// Run one frame at clock time `elapsed`
    pub fn tick(&mut self, elapsed: f32) -> Result<FrameStats, BackdropError> {
        let became_ready = self.logo.poll(&mut self.backend, self.world, elapsed);

        let offset = self.smoother.offset();

        self.starfield.update(&mut self.backend, elapsed, &mut self.rng)?;
        self.spheres.update(&mut self.backend, elapsed, offset)?;
        self.logo.update(&mut self.backend, elapsed)?;

        let rotation = self.smoother.world_rotation(offset);
        self.backend
            .set_transform(self.world, &Transform::from_position_rotation(Vec3::zeros(), rotation))?;
        self.smoother.step(elapsed, &self.input);
        self.accents.update(&mut self.backend)?;

        self.backend.render(&self.camera)?;
        self.frames += 1;

        Ok(FrameStats {
            frame: self.frames,
            elapsed,
            offset,
            active_shooting_stars: self.starfield.shooting_stars().active_count(),
            became_ready,
        })
    }

    /// Read `clock` once and run a frame
    pub fn frame<C: Clock + ?Sized>(&mut self, clock: &C) -> Result<FrameStats, BackdropError> {
        self.tick(clock.elapsed())
    }

    /// Active configuration
    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    /// Rendering backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consume the backdrop and return its backend
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Camera used for rendering
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Root group every animated element hangs under
    pub fn world(&self) -> EntityHandle {
        self.world
    }

    /// Lighting installed at startup
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Parallax state
    pub fn parallax(&self) -> &ParallaxState {
        self.smoother.state()
    }

    /// Parallax offset the next frame will use
    pub fn parallax_offset(&self) -> Vec2 {
        self.smoother.offset()
    }

    /// Selected input mode
    pub fn input_mode(&self) -> InputMode {
        self.input.mode()
    }

    /// Grid floor and rings
    pub fn accents(&self) -> &Accents {
        &self.accents
    }

    /// Starfield layer
    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    /// Shooting stars alive right now
    pub fn active_shooting_stars(&self) -> usize {
        self.starfield.shooting_stars().active_count()
    }

    /// Sphere field
    pub fn spheres(&self) -> &SphereField {
        &self.spheres
    }

    /// Whether the logo exists
    pub fn logo_present(&self) -> bool {
        self.logo.is_present()
    }

    /// Logo element
    pub fn logo(&self) -> &LogoElement {
        &self.logo
    }

    /// Whether the ready signal has fired
    pub fn is_ready(&self) -> bool {
        self.logo.is_ready()
    }

    /// Frames rendered so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

fn texture_painter(config: &SphereFieldConfig) -> SphereTexturePainter {
    let Some(path) = &config.label_font else {
        return SphereTexturePainter::new(config.texture_size);
    };

    match FontData::from_file(path).and_then(|font| SphereTexturePainter::new(config.texture_size).with_font(&font)) {
        Ok(painter) => painter,
        Err(e) => {
            log::warn!("Sphere labels disabled, font {} unusable: {}", path, e);
            SphereTexturePainter::new(config.texture_size)
        }
    }
}
