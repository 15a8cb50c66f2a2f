//! Shooting star lifecycle
//!
//! Stars move through Spawned → Aging → Retired. A single global spawn time
//! gates creation; every update ages each active star, fades it along a
//! bell-shaped curve, slides its trail rigidly along its direction, and
//! retires it once `age / max_life` reaches 1. Retired stars are detached,
//! destroyed and dropped in the same pass, so the active set never holds a
//! dead handle.

use rand::Rng;

use crate::core::config::{AgingPolicy, ShootingStarConfig};
use crate::foundation::math::{utils, Transform, Vec2, Vec3};
use crate::render::{EntityHandle, Geometry, Material, RenderBackend, RenderResult, Surface};

/// One active shooting star
#[derive(Debug, Clone, PartialEq)]
pub struct ShootingStar {
    /// Trail line owned by this star
    pub entity: EntityHandle,
    /// Accumulated age
    pub age: f32,
    /// Age at which the star retires
    pub max_life: f32,
    /// Travel direction in the XY plane
    pub direction: Vec2,
    /// Rigid translation applied to the whole trail
    pub offset: Vec3,
}

impl ShootingStar {
    /// Normalized age in `[0, 1)` while active
    pub fn progress(&self) -> f32 {
        self.age / self.max_life
    }
}

/// Opacity at a given progress: linear fade-in, linear fade-out, zero outside `(0, 1)`
pub fn opacity_at(progress: f32, config: &ShootingStarConfig) -> f32 {
    if progress <= 0.0 || progress >= 1.0 {
        return 0.0;
    }
    let fade_in = (progress / config.fade_in_end).min(1.0);
    let fade_out = 1.0 - ((progress - config.fade_out_start) / (1.0 - config.fade_out_start)).max(0.0);
    fade_in * fade_out.max(0.0) * config.peak_opacity
}

/// Spawns, ages and retires shooting stars
#[derive(Debug, Clone)]
pub struct ShootingStarManager {
    config: ShootingStarConfig,
    parent: EntityHandle,
    next_spawn_time: f32,
    last_elapsed: Option<f32>,
    active: Vec<ShootingStar>,
    spawned_total: u64,
}

impl ShootingStarManager {
    /// Create an empty manager whose stars hang under `parent`
    pub fn new<R: Rng + ?Sized>(config: &ShootingStarConfig, parent: EntityHandle, rng: &mut R) -> Self {
        let next_spawn_time = config.first_spawn.sample(rng);
        log::debug!("First shooting star scheduled at {:.2}s", next_spawn_time);
        Self {
            config: config.clone(),
            parent,
            next_spawn_time,
            last_elapsed: None,
            active: Vec::new(),
            spawned_total: 0,
        }
    }

    /// Stars currently alive
    pub fn active(&self) -> &[ShootingStar] {
        &self.active
    }

    /// Number of stars currently alive
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Clock time after which the next star spawns
    pub fn next_spawn_time(&self) -> f32 {
        self.next_spawn_time
    }

    /// Stars spawned since creation
    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    /// Advance the lifecycle to clock time `elapsed`
    pub fn update<B, R>(&mut self, backend: &mut B, elapsed: f32, rng: &mut R) -> RenderResult<()>
    where
        B: RenderBackend + ?Sized,
        R: Rng + ?Sized,
    {
        if elapsed > self.next_spawn_time {
            self.spawn(backend, rng)?;
            self.next_spawn_time = elapsed + self.config.spawn_interval.sample(rng);
            log::trace!("Next shooting star at {:.2}s", self.next_spawn_time);
        }

        let age_step = match self.config.aging {
            AgingPolicy::FrameQuantum => self.config.frame_quantum,
            AgingPolicy::DeltaTime => self.last_elapsed.map_or(0.0, |last| (elapsed - last).max(0.0)),
        };
        self.last_elapsed = Some(elapsed);

        // Travel is tuned per quantum; scale it when aging by real time.
        let travel = self.config.speed * age_step / self.config.frame_quantum;

        for index in (0..self.active.len()).rev() {
            let star = &mut self.active[index];
            star.age += age_step;
            let progress = star.progress();

            if progress >= 1.0 {
                let retired = self.active.remove(index);
                backend.detach(retired.entity)?;
                backend.destroy_primitive(retired.entity)?;
                log::debug!("Retired shooting star after {:.2}s", retired.age);
                continue;
            }

            star.offset += Vec3::new(star.direction.x, star.direction.y, 0.0) * travel;
            backend.set_opacity(star.entity, opacity_at(progress, &self.config))?;
            backend.set_transform(star.entity, &Transform::from_position(star.offset))?;
        }

        Ok(())
    }

    fn spawn<B, R>(&mut self, backend: &mut B, rng: &mut R) -> RenderResult<()>
    where
        B: RenderBackend + ?Sized,
        R: Rng + ?Sized,
    {
        let config = &self.config;
        let start = Vec3::new(
            config.spawn_x.sample(rng),
            config.spawn_y.sample(rng),
            config.spawn_z.sample(rng),
        );
        let direction = Vec2::new(config.direction_x.sample(rng), config.direction_y.sample(rng));
        let max_life = config.max_life.sample(rng);
        let color = if rng.gen::<f32>() < config.accent_chance {
            config.accent_trail_color
        } else {
            config.trail_color
        };

        let step = Vec3::new(direction.x, direction.y, 0.0) * config.trail_spacing;
        let points = (0..config.trail_points)
            .map(|i| start + step * i as f32)
            .collect();

        let entity = backend.create_primitive(
            Geometry::LineStrip { points },
            Material::Line { color: utils::rgb_from_hex(color) },
            Surface {
                depth_write: true,
                ..Surface::additive(0.0)
            },
        )?;
        backend.attach(entity, Some(self.parent))?;

        self.active.push(ShootingStar {
            entity,
            age: 0.0,
            max_life,
            direction,
            offset: Vec3::zeros(),
        });
        self.spawned_total += 1;
        log::debug!(
            "Spawned shooting star at ({:.1}, {:.1}, {:.1}) living {:.2}s",
            start.x, start.y, start.z, max_life
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::FloatRange;
    use crate::render::RecordingBackend;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn setup(config: &ShootingStarConfig) -> (RecordingBackend, ShootingStarManager, StdRng) {
        let mut backend = RecordingBackend::new();
        let parent = backend.create_group().unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let manager = ShootingStarManager::new(config, parent, &mut rng);
        (backend, manager, rng)
    }

    #[test]
    fn test_opacity_curve_endpoints_and_peak() {
        let config = ShootingStarConfig::default();
        assert_eq!(opacity_at(0.0, &config), 0.0);
        assert_eq!(opacity_at(1.0, &config), 0.0);
        assert_eq!(opacity_at(1.5, &config), 0.0);
        assert_relative_eq!(opacity_at(config.fade_in_end, &config), config.peak_opacity);
        assert_relative_eq!(opacity_at(config.fade_out_start, &config), config.peak_opacity);
        assert!(opacity_at(0.1, &config) < config.peak_opacity);
        assert!(opacity_at(0.9, &config) < config.peak_opacity);
    }

    #[test]
    fn test_opacity_is_continuous() {
        let config = ShootingStarConfig::default();
        let steps = 10_000;
        let mut previous = opacity_at(0.0, &config);
        for i in 1..=steps {
            let value = opacity_at(i as f32 / steps as f32, &config);
            assert!((value - previous).abs() < 0.01, "jump at step {i}");
            previous = value;
        }
    }

    #[test]
    fn test_spawns_once_and_reschedules() {
        let config = ShootingStarConfig::default();
        let (mut backend, mut manager, mut rng) = setup(&config);
        let first = manager.next_spawn_time();
        assert!(config.first_spawn.contains(first));

        manager.update(&mut backend, first - 0.01, &mut rng).unwrap();
        assert_eq!(manager.active_count(), 0);

        let now = first + 0.01;
        manager.update(&mut backend, now, &mut rng).unwrap();
        assert_eq!(manager.active_count(), 1);
        let gap = manager.next_spawn_time() - now;
        assert!(config.spawn_interval.contains(gap));

        manager.update(&mut backend, now + 0.016, &mut rng).unwrap();
        assert_eq!(manager.active_count(), 1);
        assert_eq!(manager.spawned_total(), 1);
    }

    #[test]
    fn test_retires_at_or_before_max_life() {
        let config = ShootingStarConfig::default();
        let (mut backend, mut manager, mut rng) = setup(&config);
        let mut now = manager.next_spawn_time() + 0.001;
        manager.update(&mut backend, now, &mut rng).unwrap();
        let star = manager.active()[0].clone();
        assert!(backend.is_live(star.entity));

        let mut updates = 1;
        while manager.active_count() > 0 {
            for active in manager.active() {
                assert!(active.age < active.max_life);
            }
            now += 0.016;
            manager.update(&mut backend, now, &mut rng).unwrap();
            updates += 1;
            assert!(updates < 1000);
        }

        assert!(!backend.is_live(star.entity));
        assert_eq!(backend.destroyed_count(), 1);
        let expected = (star.max_life / config.frame_quantum).ceil() as i32;
        assert!((updates - expected).abs() <= 1);
    }

    #[test]
    fn test_trail_moves_rigidly_along_direction() {
        let config = ShootingStarConfig::default();
        let (mut backend, mut manager, mut rng) = setup(&config);
        let now = manager.next_spawn_time() + 0.001;
        manager.update(&mut backend, now, &mut rng).unwrap();
        manager.update(&mut backend, now + 0.016, &mut rng).unwrap();

        let star = &manager.active()[0];
        let expected = Vec3::new(star.direction.x, star.direction.y, 0.0) * config.speed * 2.0;
        assert_relative_eq!(star.offset, expected, epsilon = 1e-5);
        let recorded = backend.entity(star.entity).unwrap();
        assert_relative_eq!(recorded.transform.position, expected, epsilon = 1e-5);
        assert!(recorded.opacity > 0.0);
        assert!(star.direction.x > 0.0 && star.direction.y < 0.0);
    }

    #[test]
    fn test_trail_colors_come_from_palette() {
        let config = ShootingStarConfig {
            spawn_interval: FloatRange::new(0.0, 0.0),
            first_spawn: FloatRange::new(0.0, 0.0),
            ..ShootingStarConfig::default()
        };
        let (mut backend, mut manager, mut rng) = setup(&config);
        let usual = crate::foundation::math::utils::rgb_from_hex(config.trail_color);
        let accent = crate::foundation::math::utils::rgb_from_hex(config.accent_trail_color);

        let mut now = 0.0;
        let mut accents = 0;
        for _ in 0..40 {
            now += 0.016;
            manager.update(&mut backend, now, &mut rng).unwrap();
            let newest = manager.active().last().unwrap();
            match &backend.entity(newest.entity).unwrap().kind {
                crate::render::recording::RecordedKind::Primitive { material: Material::Line { color }, .. } => {
                    assert!(*color == usual || *color == accent);
                    accents += usize::from(*color == accent);
                }
                other => panic!("unexpected trail {other:?}"),
            }
        }
        assert!(accents > 0 && accents < 40);
    }

    #[test]
    fn test_delta_time_aging_follows_clock() {
        let config = ShootingStarConfig {
            aging: AgingPolicy::DeltaTime,
            first_spawn: FloatRange::new(1.0, 1.0),
            max_life: FloatRange::new(2.0, 2.0),
            ..ShootingStarConfig::default()
        };
        let (mut backend, mut manager, mut rng) = setup(&config);
        manager.update(&mut backend, 1.5, &mut rng).unwrap();
        assert_eq!(manager.active_count(), 1);
        manager.update(&mut backend, 2.5, &mut rng).unwrap();
        assert_relative_eq!(manager.active()[0].age, 1.0);
        manager.update(&mut backend, 3.5, &mut rng).unwrap();
        assert_eq!(manager.active_count(), 0);
    }

    #[test]
    fn test_concurrent_stars_retire_without_skipping() {
        let config = ShootingStarConfig {
            spawn_interval: FloatRange::new(0.05, 0.05),
            first_spawn: FloatRange::new(0.0, 0.0),
            max_life: FloatRange::new(0.1, 0.1),
            ..ShootingStarConfig::default()
        };
        let (mut backend, mut manager, mut rng) = setup(&config);
        let mut now = 0.0;
        for _ in 0..200 {
            now += 0.016;
            manager.update(&mut backend, now, &mut rng).unwrap();
            for star in manager.active() {
                assert!(backend.is_live(star.entity));
                assert!(star.progress() < 1.0);
            }
        }
        let live_lines = backend.live_count() - 1;
        assert_eq!(live_lines, manager.active_count());
        assert_eq!(backend.destroyed_count(), manager.spawned_total() - manager.active_count() as u64);
    }
}
