//! Logo element
//!
//! An optional extruded-text mesh with an additive glow plane behind it. The
//! font arrives asynchronously; [`LogoElement`] bounds the wait with a
//! deadline, fires its ready signal exactly once whichever way the load ends,
//! and leaves the logo absent for the session if anything goes wrong.

use crate::assets::{AssetLoader, FontData, ReadySignal, TimedLoad};
use crate::core::config::LogoConfig;
use crate::foundation::math::{utils, Transform, Vec3};
use crate::render::{EntityHandle, Geometry, Material, RenderBackend, RenderResult, Surface};

/// A built logo
#[derive(Debug, Clone)]
pub struct Logo {
    config: LogoConfig,
    mesh: EntityHandle,
    glow: Option<EntityHandle>,
}

impl Logo {
    /// Extrude the logo text from `font` and attach it under `parent`
    pub fn build<B>(backend: &mut B, parent: EntityHandle, font: FontData, config: &LogoConfig) -> RenderResult<Self>
    where
        B: RenderBackend + ?Sized,
    {
        let mesh = backend.create_primitive(
            Geometry::ExtrudedText {
                text: config.text.clone(),
                font,
                size: config.size,
                depth: config.depth,
                bevel_thickness: config.bevel_thickness,
                bevel_size: config.bevel_size,
                bevel_segments: config.bevel_segments,
                curve_segments: config.curve_segments,
                centered: true,
            },
            Material::Standard {
                color: utils::rgb_from_hex(config.color),
                texture: None,
                metalness: 0.95,
                roughness: 0.15,
                env_map_intensity: 1.0,
            },
            Surface::default(),
        )?;
        backend.set_transform(mesh, &Transform::from_position_rotation(config.position, config.base_rotation))?;
        backend.attach(mesh, Some(parent))?;

        let glow = if config.glow {
            let glyphs = config.text.chars().count().max(1) as f32;
            let plane = backend.create_primitive(
                Geometry::Plane {
                    width: config.size * glyphs * 1.6,
                    height: config.size * 2.0,
                },
                Material::Basic { color: utils::rgb_from_hex(config.glow_color) },
                Surface::additive(config.glow_opacity_base),
            )?;
            let behind = config.position - Vec3::new(0.0, 0.0, config.depth + 0.5);
            backend.set_transform(plane, &Transform::from_position(behind))?;
            backend.attach(plane, Some(parent))?;
            Some(plane)
        } else {
            None
        };

        log::info!("Logo '{}' built{}", config.text, if glow.is_some() { " with glow" } else { "" });
        Ok(Self {
            config: config.clone(),
            mesh,
            glow,
        })
    }

    /// Text mesh handle
    pub fn mesh(&self) -> EntityHandle {
        self.mesh
    }

    /// Glow plane handle, if enabled
    pub fn glow(&self) -> Option<EntityHandle> {
        self.glow
    }

    /// Mesh rotation at time `elapsed`: a slow sway about Y around the base pose
    pub fn rotation(&self, elapsed: f32) -> Vec3 {
        let sway = (elapsed * self.config.sway_frequency).sin() * self.config.sway_amplitude;
        self.config.base_rotation + Vec3::new(0.0, sway, 0.0)
    }

    /// Glow opacity at time `elapsed`
    pub fn glow_opacity(&self, elapsed: f32) -> f32 {
        self.config.glow_opacity_base + self.config.glow_opacity_amplitude * (elapsed * self.config.glow_frequency).sin()
    }

    /// Oscillate the mesh and pulse the glow
    pub fn update<B>(&self, backend: &mut B, elapsed: f32) -> RenderResult<()>
    where
        B: RenderBackend + ?Sized,
    {
        backend.set_transform(
            self.mesh,
            &Transform::from_position_rotation(self.config.position, self.rotation(elapsed)),
        )?;
        if let Some(glow) = self.glow {
            backend.set_opacity(glow, self.glow_opacity(elapsed))?;
        }
        Ok(())
    }
}

enum LogoState {
    Loading(TimedLoad<FontData>),
    Present(Logo),
    Absent,
}

/// Owns the logo through loading and for the rest of the session
pub struct LogoElement {
    config: LogoConfig,
    state: LogoState,
    ready: ReadySignal,
}

impl LogoElement {
    /// Begin loading the logo font
    ///
    /// The load deadline is measured from the first [`LogoElement::poll`], so
    /// it follows whatever clock the frame loop runs on.
    pub fn start<L>(loader: &mut L, config: &LogoConfig) -> Self
    where
        L: AssetLoader + ?Sized,
    {
        let state = if config.enabled {
            log::debug!("Loading logo font from {}", config.font_path);
            LogoState::Loading(TimedLoad::new(loader.load_font(&config.font_path), config.load_timeout))
        } else {
            log::info!("Logo disabled");
            LogoState::Absent
        };

        Self {
            config: config.clone(),
            state,
            ready: ReadySignal::new(),
        }
    }

    /// Settle the load if its result or deadline has arrived
    ///
    /// Returns `true` only on the call that fires the ready signal.
    pub fn poll<B>(&mut self, backend: &mut B, parent: EntityHandle, elapsed: f32) -> bool
    where
        B: RenderBackend + ?Sized,
    {
        if let LogoState::Loading(load) = &mut self.state {
            let Some(outcome) = load.poll(elapsed) else {
                return false;
            };

            self.state = match outcome.map_err(|e| e.to_string()).and_then(|font| {
                Logo::build(backend, parent, font, &self.config).map_err(|e| e.to_string())
            }) {
                Ok(logo) => LogoState::Present(logo),
                Err(e) => {
                    log::warn!("Logo unavailable, continuing without it: {}", e);
                    LogoState::Absent
                }
            };
        }

        let fired = self.ready.fire();
        if fired {
            log::info!("Backdrop ready (logo {})", if self.is_present() { "present" } else { "absent" });
        }
        fired
    }

    /// Animate the logo if it exists
    pub fn update<B>(&self, backend: &mut B, elapsed: f32) -> RenderResult<()>
    where
        B: RenderBackend + ?Sized,
    {
        match &self.state {
            LogoState::Present(logo) => logo.update(backend, elapsed),
            LogoState::Loading(_) | LogoState::Absent => Ok(()),
        }
    }

    /// The built logo
    pub fn logo(&self) -> Option<&Logo> {
        match &self.state {
            LogoState::Present(logo) => Some(logo),
            LogoState::Loading(_) | LogoState::Absent => None,
        }
    }

    /// Whether the logo exists
    pub fn is_present(&self) -> bool {
        self.logo().is_some()
    }

    /// Whether the font load is still outstanding
    pub fn is_loading(&self) -> bool {
        matches!(self.state, LogoState::Loading(_))
    }

    /// Whether the ready signal has fired
    pub fn is_ready(&self) -> bool {
        self.ready.is_fired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetError, AssetSender, PendingAsset};
    use crate::render::RecordingBackend;
    use approx::assert_relative_eq;

    /// Loader that hands out whatever outcome it was primed with
    struct ScriptedLoader {
        outcome: Option<Result<FontData, AssetError>>,
        held: Vec<AssetSender<FontData>>,
    }

    impl ScriptedLoader {
        fn completing(outcome: Result<FontData, AssetError>) -> Self {
            Self { outcome: Some(outcome), held: Vec::new() }
        }

        fn stalled() -> Self {
            Self { outcome: None, held: Vec::new() }
        }
    }

    impl AssetLoader for ScriptedLoader {
        fn load_font(&mut self, _path: &str) -> PendingAsset<FontData> {
            match self.outcome.take() {
                Some(outcome) => PendingAsset::ready(outcome),
                None => {
                    let (sender, pending) = PendingAsset::channel();
                    self.held.push(sender);
                    pending
                }
            }
        }
    }

    fn font() -> FontData {
        FontData::new("test", vec![0u8; 8])
    }

    #[test]
    fn test_successful_load_builds_logo_and_glow() {
        let mut backend = RecordingBackend::new();
        let world = backend.create_group().unwrap();
        let mut loader = ScriptedLoader::completing(Ok(font()));
        let config = LogoConfig { glow: true, ..LogoConfig::default() };
        let mut element = LogoElement::start(&mut loader, &config);

        assert!(element.is_loading());
        assert!(element.poll(&mut backend, world, 0.1));
        assert!(element.is_present());
        assert!(element.is_ready());

        let logo = element.logo().unwrap();
        let glow = logo.glow().unwrap();
        assert_eq!(backend.children_of(Some(world)).len(), 2);
        assert!(backend.entity(glow).unwrap().surface.additive);
        assert!(!element.poll(&mut backend, world, 0.2));
    }

    #[test]
    fn test_failed_load_leaves_logo_absent() {
        let mut backend = RecordingBackend::new();
        let world = backend.create_group().unwrap();
        let failure = Err(AssetError::Parse("bad font".to_string()));
        let mut loader = ScriptedLoader::completing(failure);
        let mut element = LogoElement::start(&mut loader, &LogoConfig::default());

        assert!(element.poll(&mut backend, world, 0.0));
        assert!(!element.is_present());
        assert!(element.is_ready());
        assert!(backend.children_of(Some(world)).is_empty());
        element.update(&mut backend, 1.0).unwrap();
    }

    #[test]
    fn test_stalled_load_times_out_and_fires_once() {
        let mut backend = RecordingBackend::new();
        let world = backend.create_group().unwrap();
        let mut loader = ScriptedLoader::stalled();
        let config = LogoConfig::default();
        let mut element = LogoElement::start(&mut loader, &config);

        // The first poll anchors the deadline.
        assert!(!element.poll(&mut backend, world, 1.0));
        assert!(!element.poll(&mut backend, world, 3.0));
        assert!(!element.is_ready());
        assert!(element.poll(&mut backend, world, 1.0 + config.load_timeout));
        assert!(!element.is_present());

        // A late delivery after the deadline changes nothing.
        loader.held.pop().unwrap().complete(Ok(font()));
        assert!(!element.poll(&mut backend, world, 10.0));
        assert!(!element.is_present());
    }

    #[test]
    fn test_deadline_follows_a_clock_that_starts_late() {
        let mut backend = RecordingBackend::new();
        let world = backend.create_group().unwrap();
        let mut loader = ScriptedLoader::stalled();
        let mut element = LogoElement::start(&mut loader, &LogoConfig::default());

        assert!(!element.poll(&mut backend, world, 100.0));
        loader.held.pop().unwrap().complete(Ok(font()));
        assert!(element.poll(&mut backend, world, 100.016));
        assert!(element.is_present());
    }

    #[test]
    fn test_disabled_logo_is_ready_immediately() {
        let mut backend = RecordingBackend::new();
        let world = backend.create_group().unwrap();
        let config = LogoConfig { enabled: false, ..LogoConfig::default() };
        let mut element = LogoElement::start(&mut ScriptedLoader::stalled(), &config);
        assert!(!element.is_loading());
        assert!(element.poll(&mut backend, world, 0.0));
        assert!(!element.is_present());
    }

    #[test]
    fn test_rotation_sways_around_base() {
        let mut backend = RecordingBackend::new();
        let world = backend.create_group().unwrap();
        let config = LogoConfig { glow: true, ..LogoConfig::default() };
        let logo = Logo::build(&mut backend, world, font(), &config).unwrap();

        assert_relative_eq!(logo.rotation(0.0), Vec3::new(0.0, -0.15, 0.0));
        for step in 0..200 {
            let t = step as f32 * 0.21;
            let sway = logo.rotation(t) - config.base_rotation;
            assert_eq!(sway.x, 0.0);
            assert!(sway.y.abs() <= config.sway_amplitude + 1e-6);
            assert_eq!(sway.z, 0.0);
        }

        logo.update(&mut backend, 2.0).unwrap();
        let glow = backend.entity(logo.glow().unwrap()).unwrap();
        assert_relative_eq!(glow.opacity, logo.glow_opacity(2.0));
        let mesh = backend.entity(logo.mesh()).unwrap();
        assert_relative_eq!(mesh.transform.rotation, logo.rotation(2.0));
    }
}
