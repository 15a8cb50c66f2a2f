//! Scene accents
//!
//! A faint line grid far below the scene and a few thin additive torus rings
//! floating behind the spheres. The rings start at a random tilt and turn by
//! a fixed amount every frame, like the sphere spin.

use rand::Rng;

use crate::core::config::AccentConfig;
use crate::foundation::math::{constants, utils, Transform, Vec3};
use crate::render::{EntityHandle, Geometry, Material, RenderBackend, RenderResult, Surface};

/// One floating ring
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    /// Torus entity
    pub entity: EntityHandle,
    /// Fixed transform apart from rotation
    pub position: Vec3,
    /// Uniform scale
    pub scale: f32,
    /// Rotation added every frame
    pub angular_step: Vec3,
    /// Accumulated rotation
    pub rotation: Vec3,
}

impl Ring {
    fn transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.rotation,
            scale: Vec3::repeat(self.scale),
        }
    }
}

/// Grid floor and rings
#[derive(Debug, Clone)]
pub struct Accents {
    grid: Option<EntityHandle>,
    rings: Vec<Ring>,
}

impl Accents {
    /// Create the grid and rings under `parent`
    pub fn build<B, R>(backend: &mut B, parent: EntityHandle, config: &AccentConfig, rng: &mut R) -> RenderResult<Self>
    where
        B: RenderBackend + ?Sized,
        R: Rng + ?Sized,
    {
        let grid = if config.grid.enabled {
            let grid = backend.create_primitive(
                Geometry::Grid {
                    size: config.grid.size,
                    divisions: config.grid.divisions,
                },
                Material::Line { color: utils::rgb_from_hex(config.grid.color) },
                Surface {
                    opacity: config.grid.opacity,
                    transparent: true,
                    additive: false,
                    depth_write: false,
                },
            )?;
            backend.set_transform(grid, &Transform::from_position(Vec3::new(0.0, config.grid.height, 0.0)))?;
            backend.attach(grid, Some(parent))?;
            Some(grid)
        } else {
            None
        };

        let mut rings = Vec::with_capacity(config.rings.len());
        for placement in &config.rings {
            let entity = backend.create_primitive(
                Geometry::Torus {
                    radius: config.ring_radius,
                    tube: config.ring_tube,
                    radial_segments: config.ring_radial_segments,
                    tubular_segments: config.ring_tubular_segments,
                },
                Material::Basic { color: utils::rgb_from_hex(config.ring_color) },
                Surface::additive(config.ring_opacity),
            )?;

            let ring = Ring {
                entity,
                position: placement.position,
                scale: placement.scale,
                angular_step: Vec3::new(
                    placement.speed * config.ring_spin.x,
                    placement.speed * config.ring_spin.y,
                    0.0,
                ),
                rotation: Vec3::new(
                    rng.gen::<f32>() * constants::PI,
                    0.0,
                    rng.gen::<f32>() * constants::PI,
                ),
            };
            backend.set_transform(entity, &ring.transform())?;
            backend.attach(entity, Some(parent))?;
            rings.push(ring);
        }

        log::info!(
            "Accents built: {} rings{}",
            rings.len(),
            if grid.is_some() { " over a grid floor" } else { "" }
        );
        Ok(Self { grid, rings })
    }

    /// Grid handle, if enabled
    pub fn grid(&self) -> Option<EntityHandle> {
        self.grid
    }

    /// Rings in placement order
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// Turn every ring by its per-frame step
    pub fn update<B>(&mut self, backend: &mut B) -> RenderResult<()>
    where
        B: RenderBackend + ?Sized,
    {
        for ring in &mut self.rings {
            ring.rotation += ring.angular_step;
            backend.set_transform(ring.entity, &ring.transform())?;
        }
        Ok(())
    }
}
