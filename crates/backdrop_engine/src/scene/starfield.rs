//! Starfield layer
//!
//! Two static point clouds on spherical shells: a large field of small cool
//! white stars and a handful of larger violet and cyan "nebula" stars. Each
//! point draws its tint from a weighted palette. Both rotate slowly as a pure
//! function of elapsed time; the bright layer also pulses its opacity. The
//! layer owns the shooting-star manager and forwards each update to it.

use rand::Rng;

use super::shooting_stars::ShootingStarManager;
use crate::core::config::{FloatRange, ShootingStarConfig, StarfieldConfig, TintVariant};
use crate::foundation::math::{constants, Rgb, Transform, Vec3};
use crate::render::{EntityHandle, Geometry, Material, RenderBackend, RenderResult, Surface};

/// Uniform point on a spherical shell between the radii of `radius`
///
/// The polar angle comes from `acos(2u - 1)`; sampling it uniformly would
/// cluster points at the poles.
pub fn sample_shell_point<R: Rng + ?Sized>(rng: &mut R, radius: &FloatRange) -> Vec3 {
    let r = radius.sample(rng);
    let theta = rng.gen::<f32>() * constants::TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Pick a tint family by weight, then sample each channel inside it
pub fn sample_tint<R: Rng + ?Sized>(rng: &mut R, palette: &[TintVariant]) -> Rgb {
    let total: f32 = palette.iter().map(|variant| variant.weight).sum();
    let mut roll = rng.gen::<f32>() * total;
    let variant = palette
        .iter()
        .find(|variant| {
            roll -= variant.weight;
            roll < 0.0
        })
        .or_else(|| palette.last());

    match variant {
        Some(variant) => Rgb::new(variant.red.sample(rng), variant.green.sample(rng), variant.blue.sample(rng)),
        None => Rgb::new(1.0, 1.0, 1.0),
    }
}

fn point_layer<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    radius: &FloatRange,
    palette: &[TintVariant],
) -> Geometry {
    let mut positions = Vec::with_capacity(count);
    let mut colors = Vec::with_capacity(count);
    for _ in 0..count {
        positions.push(sample_shell_point(rng, radius));
        colors.push(sample_tint(rng, palette));
    }
    Geometry::Points { positions, colors: Some(colors) }
}

/// Both star layers plus the shooting stars that streak across them
#[derive(Debug, Clone)]
pub struct Starfield {
    config: StarfieldConfig,
    stars: EntityHandle,
    bright: EntityHandle,
    shooting_stars: ShootingStarManager,
}

impl Starfield {
    /// Generate both point layers and attach them under `parent`
    pub fn build<B, R>(
        backend: &mut B,
        parent: EntityHandle,
        config: &StarfieldConfig,
        shooting: &ShootingStarConfig,
        rng: &mut R,
    ) -> RenderResult<Self>
    where
        B: RenderBackend + ?Sized,
        R: Rng + ?Sized,
    {
        let stars = backend.create_primitive(
            point_layer(rng, config.star_count, &config.star_radius, &config.star_palette),
            Material::Points {
                color: Rgb::new(1.0, 1.0, 1.0),
                size: config.star_point_size,
                size_attenuation: true,
                vertex_colors: true,
            },
            Surface::additive(config.star_opacity),
        )?;
        backend.attach(stars, Some(parent))?;

        let bright = backend.create_primitive(
            point_layer(rng, config.bright_count, &config.bright_radius, &config.bright_palette),
            Material::Points {
                color: Rgb::new(1.0, 1.0, 1.0),
                size: config.bright_point_size,
                size_attenuation: true,
                vertex_colors: true,
            },
            Surface::additive(config.bright_opacity_base),
        )?;
        backend.attach(bright, Some(parent))?;

        log::info!(
            "Starfield built: {} stars, {} bright stars",
            config.star_count,
            config.bright_count
        );

        Ok(Self {
            config: config.clone(),
            stars,
            bright,
            shooting_stars: ShootingStarManager::new(shooting, parent, rng),
        })
    }

    /// Far layer rotation at time `elapsed`
    pub fn star_rotation(&self, elapsed: f32) -> Vec3 {
        let rate = self.config.star_rotation_rate;
        Vec3::new(rate.x * elapsed, rate.y * elapsed, 0.0)
    }

    /// Bright layer rotation at time `elapsed`
    pub fn bright_rotation(&self, elapsed: f32) -> Vec3 {
        Vec3::new(0.0, self.config.bright_rotation_rate * elapsed, 0.0)
    }

    /// Bright layer opacity at time `elapsed`
    pub fn bright_opacity(&self, elapsed: f32) -> f32 {
        let config = &self.config;
        config.bright_opacity_base + config.bright_opacity_amplitude * (elapsed * config.bright_pulse_frequency).sin()
    }

    /// Shooting-star manager
    pub fn shooting_stars(&self) -> &ShootingStarManager {
        &self.shooting_stars
    }

    /// Far layer handle
    pub fn stars(&self) -> EntityHandle {
        self.stars
    }

    /// Bright layer handle
    pub fn bright(&self) -> EntityHandle {
        self.bright
    }

    /// Rotate both layers, pulse the bright one, then advance the shooting stars
    pub fn update<B, R>(&mut self, backend: &mut B, elapsed: f32, rng: &mut R) -> RenderResult<()>
    where
        B: RenderBackend + ?Sized,
        R: Rng + ?Sized,
    {
        backend.set_transform(
            self.stars,
            &Transform::from_position_rotation(Vec3::zeros(), self.star_rotation(elapsed)),
        )?;
        backend.set_transform(
            self.bright,
            &Transform::from_position_rotation(Vec3::zeros(), self.bright_rotation(elapsed)),
        )?;
        backend.set_opacity(self.bright, self.bright_opacity(elapsed))?;

        self.shooting_stars.update(backend, elapsed, rng)
    }
}
