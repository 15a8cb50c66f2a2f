//! Sphere field
//!
//! A fixed catalog of labeled, procedurally textured spheres. Each one bobs
//! on a small Lissajous-like path, spins slowly, and is pushed by the parallax
//! offset in proportion to its depth so farther spheres travel further.

use rand::Rng;

use crate::core::config::SphereFieldConfig;
use crate::foundation::math::{constants, Rgb, Transform, Vec2, Vec3};
use crate::render::{
    EntityHandle, Geometry, Material, RenderBackend, RenderResult, SphereTexturePainter, Surface,
};

/// Static layout record for one sphere
#[derive(Debug, Clone, PartialEq)]
pub struct SphereConfig {
    /// Rest position
    pub position: Vec3,
    /// Sphere radius
    pub radius: f32,
    /// Texture hue as a fraction of the color wheel
    pub hue: f32,
    /// Label lettered on the texture
    pub label: String,
}

impl SphereConfig {
    fn new(x: f32, y: f32, z: f32, radius: f32, hue_degrees: f32, label: &str) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            radius,
            hue: hue_degrees / 360.0,
            label: label.to_string(),
        }
    }
}

/// The reference layout: four loose rows of spheres across the viewport
pub fn catalog() -> Vec<SphereConfig> {
    vec![
        SphereConfig::new(-8.0, 7.0, -2.0, 2.0, 260.0, "Nova"),
        SphereConfig::new(-2.0, 8.5, -1.0, 2.5, 220.0, "Horizon"),
        SphereConfig::new(5.0, 7.5, -3.0, 1.8, 290.0, "Drift"),
        SphereConfig::new(10.0, 6.0, -2.0, 1.5, 195.0, "Flux"),
        SphereConfig::new(-11.0, 3.0, 1.0, 2.8, 275.0, "Lumina"),
        SphereConfig::new(-4.0, 4.0, 2.0, 3.0, 310.0, "Prism"),
        SphereConfig::new(4.0, 3.5, 1.0, 3.2, 245.0, "Aether"),
        SphereConfig::new(9.0, 2.0, -1.0, 2.2, 180.0, "Orbit"),
        SphereConfig::new(-12.0, 0.0, 0.0, 2.5, 265.0, "Solace"),
        SphereConfig::new(-6.5, -1.0, 3.0, 2.0, 230.0, "Echo"),
        SphereConfig::new(6.5, 0.0, 2.0, 2.3, 300.0, "Zenith"),
        SphereConfig::new(12.0, -1.0, -1.0, 1.8, 200.0, "Pulse"),
        SphereConfig::new(-9.0, -4.0, -1.0, 2.2, 320.0, "Ember"),
        SphereConfig::new(-3.0, -4.5, 1.0, 3.0, 255.0, "Vertex"),
        SphereConfig::new(3.0, -5.0, 0.0, 2.8, 240.0, "Radiant"),
        SphereConfig::new(8.0, -4.0, -2.0, 2.0, 185.0, "Shift"),
        SphereConfig::new(-7.0, -8.0, -3.0, 1.5, 210.0, "Cipher"),
        SphereConfig::new(0.0, -8.5, -2.0, 1.8, 270.0, "Warp"),
        SphereConfig::new(7.0, -7.0, -1.0, 2.0, 285.0, "Nimbus"),
        SphereConfig::new(13.0, -6.0, -4.0, 1.2, 205.0, "Fragment"),
    ]
}

/// Per-sphere animation state, randomized once at creation
#[derive(Debug, Clone, PartialEq)]
pub struct SphereState {
    /// Rest position copied from the catalog
    pub base_position: Vec3,
    /// Angular speed of the bob
    pub float_speed: f32,
    /// Upper bound on the bob's distance from rest
    pub float_amplitude: f32,
    /// Bob phase
    pub phase: f32,
    /// Spin added every frame
    pub rotation_speed: f32,
    /// Accumulated spin
    pub rotation: Vec3,
}

/// Horizontal bob as a fraction of the vertical one
const BOB_X_RATIO: f32 = 0.4;
/// Sideways spin as a fraction of the spin about Y
const SPIN_X_RATIO: f32 = 0.3;

/// Bob offset at time `elapsed`; its length never exceeds `float_amplitude`
///
/// The path is a slow horizontal cosine over a faster vertical sine. Both
/// axes are scaled together so the diagonal peak stays inside the amplitude.
pub fn float_offset(elapsed: f32, state: &SphereState) -> Vec3 {
    let amplitude = state.float_amplitude / (1.0 + BOB_X_RATIO * BOB_X_RATIO).sqrt();
    let speed = state.float_speed;
    Vec3::new(
        (elapsed * speed * 0.6 + state.phase + 0.8).cos() * amplitude * BOB_X_RATIO,
        (elapsed * speed + state.phase).sin() * amplitude,
        0.0,
    )
}

/// Parallax multiplier for a sphere at depth `z`
///
/// Farther spheres (negative `z`) get more than 1, nearer ones less, never
/// below zero.
pub fn depth_factor(z: f32, gain: f32) -> f32 {
    (1.0 - gain * z).max(0.0)
}

fn displaced(state: &SphereState, elapsed: f32, offset: Vec2, depth_gain: f32) -> Vec3 {
    let depth = depth_factor(state.base_position.z, depth_gain);
    state.base_position + float_offset(elapsed, state) + Vec3::new(offset.x, offset.y, 0.0) * depth
}

/// All catalog spheres, paired with their animation state
#[derive(Debug, Clone)]
pub struct SphereField {
    spheres: Vec<(EntityHandle, SphereState)>,
    depth_gain: f32,
}

impl SphereField {
    /// Create one textured sphere per catalog entry under `parent`
    pub fn build<B, R>(
        backend: &mut B,
        parent: EntityHandle,
        catalog: &[SphereConfig],
        rng: &mut R,
        painter: &mut SphereTexturePainter,
        config: &SphereFieldConfig,
    ) -> RenderResult<Self>
    where
        B: RenderBackend + ?Sized,
        R: Rng + ?Sized,
    {
        let mut spheres = Vec::with_capacity(catalog.len());

        for entry in catalog {
            let texture = painter.texture_for(backend, &entry.label, entry.hue, rng)?;
            let entity = backend.create_primitive(
                Geometry::Sphere {
                    radius: entry.radius,
                    width_segments: config.width_segments,
                    height_segments: config.height_segments,
                },
                Material::Standard {
                    color: Rgb::new(1.0, 1.0, 1.0),
                    texture: Some(texture),
                    metalness: config.metalness,
                    roughness: config.roughness,
                    env_map_intensity: config.env_map_intensity,
                },
                Surface::default(),
            )?;
            backend.set_transform(entity, &Transform::from_position(entry.position))?;
            backend.attach(entity, Some(parent))?;

            let state = SphereState {
                base_position: entry.position,
                phase: rng.gen::<f32>() * constants::TAU,
                float_speed: config.float_speed.sample(rng),
                float_amplitude: config.float_amplitude.sample(rng),
                rotation_speed: config.rotation_speed.sample(rng),
                rotation: Vec3::zeros(),
            };
            log::trace!("Sphere '{}' phase {:.2} speed {:.2}", entry.label, state.phase, state.float_speed);
            spheres.push((entity, state));
        }

        log::info!("Sphere field built with {} spheres", spheres.len());
        Ok(Self {
            spheres,
            depth_gain: config.depth_gain,
        })
    }

    /// Number of spheres
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    /// Whether the field has no spheres
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// Animation state in catalog order
    pub fn states(&self) -> impl Iterator<Item = &SphereState> {
        self.spheres.iter().map(|(_, state)| state)
    }

    /// Entity handles in catalog order
    pub fn handles(&self) -> impl Iterator<Item = EntityHandle> + '_ {
        self.spheres.iter().map(|(entity, _)| *entity)
    }

    /// Position of a sphere at time `elapsed` under parallax `offset`
    pub fn position_at(&self, state: &SphereState, elapsed: f32, offset: Vec2) -> Vec3 {
        displaced(state, elapsed, offset, self.depth_gain)
    }

    /// Move and spin every sphere for this frame
    pub fn update<B>(&mut self, backend: &mut B, elapsed: f32, offset: Vec2) -> RenderResult<()>
    where
        B: RenderBackend + ?Sized,
    {
        let depth_gain = self.depth_gain;
        for (entity, state) in &mut self.spheres {
            state.rotation.y += state.rotation_speed;
            state.rotation.x += state.rotation_speed * SPIN_X_RATIO;

            let position = displaced(state, elapsed, offset, depth_gain);
            backend.set_transform(*entity, &Transform::from_position_rotation(position, state.rotation))?;
        }
        Ok(())
    }
}
