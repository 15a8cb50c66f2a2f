//! Whole-backdrop scenarios
//!
//! Each scenario builds a seeded backdrop over the recording backend and
//! drives it with a manual clock.

use crate::assets::{AssetError, AssetLoader, AssetSender, FontData, PendingAsset};
use crate::core::config::{BackdropConfig, StarfieldConfig};
use crate::foundation::math::Vec2;
use crate::foundation::time::{Clock, ManualClock};
use crate::input::InputMode;
use crate::render::RecordingBackend;
use crate::{Backdrop, BackdropEvent, Viewport};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const WIDTH: u32 = 1280;
    const HEIGHT: u32 = 720;

    /// Loader whose single font request resolves to a fixed outcome, or never
    struct TestLoader {
        outcome: Option<Result<FontData, AssetError>>,
        stalled: Vec<AssetSender<FontData>>,
    }

    impl TestLoader {
        fn succeeding() -> Self {
            Self { outcome: Some(Ok(FontData::new("logo", vec![1, 2, 3]))), stalled: Vec::new() }
        }

        fn failing() -> Self {
            let error = std::io::Error::new(std::io::ErrorKind::NotFound, "logo.ttf");
            Self { outcome: Some(Err(AssetError::Io(error))), stalled: Vec::new() }
        }

        fn stalled() -> Self {
            Self { outcome: None, stalled: Vec::new() }
        }
    }

    impl AssetLoader for TestLoader {
        fn load_font(&mut self, _path: &str) -> PendingAsset<FontData> {
            match self.outcome.take() {
                Some(outcome) => PendingAsset::ready(outcome),
                None => {
                    let (sender, pending) = PendingAsset::channel();
                    self.stalled.push(sender);
                    pending
                }
            }
        }
    }

    fn test_config() -> BackdropConfig {
        let mut config = BackdropConfig::default().with_seed(42);
        config.starfield = StarfieldConfig {
            star_count: 300,
            bright_count: 20,
            ..StarfieldConfig::default()
        };
        config.spheres.texture_size = 16;
        config.logo.glow = true;
        config
    }

    fn backdrop(loader: &mut TestLoader, touch_capable: bool) -> Backdrop<RecordingBackend> {
        Backdrop::new(
            test_config(),
            RecordingBackend::new(),
            loader,
            touch_capable,
            Viewport::new(WIDTH, HEIGHT),
        )
        .unwrap()
    }

    #[test]
    fn test_scenario_a_spheres_stay_within_float_bound_without_input() {
        let mut backdrop = backdrop(&mut TestLoader::failing(), false);
        assert_eq!(backdrop.input_mode(), InputMode::Pointer);

        let mut clock = ManualClock::new();
        for _ in 0..120 {
            let stats = backdrop.frame(&clock).unwrap();
            assert_eq!(stats.offset, Vec2::zeros());

            for (handle, state) in backdrop.spheres().handles().zip(backdrop.spheres().states()) {
                let position = backdrop.backend().entity(handle).unwrap().transform.position;
                let drift = (position - state.base_position).norm();
                assert!(drift <= state.float_amplitude + 1e-5, "sphere drifted {drift}");
            }
            clock.advance(1.0 / 60.0);
        }
    }

    #[test]
    fn test_scenario_b_centered_pointer_converges_to_zero() {
        let mut backdrop = backdrop(&mut TestLoader::failing(), false);
        let mut clock = ManualClock::new();

        backdrop.handle_event(BackdropEvent::PointerMoved { x: WIDTH as f32, y: 0.0 }).unwrap();
        for _ in 0..100 {
            clock.advance(1.0 / 60.0);
            backdrop.frame(&clock).unwrap();
        }
        assert!(backdrop.parallax().current.x > 0.9);

        backdrop
            .handle_event(BackdropEvent::PointerMoved { x: WIDTH as f32 / 2.0, y: HEIGHT as f32 / 2.0 })
            .unwrap();
        assert_eq!(backdrop.parallax().target, Vec2::new(1.0, -1.0));

        let mut previous = backdrop.parallax().current.norm();
        for _ in 0..600 {
            clock.advance(1.0 / 60.0);
            backdrop.frame(&clock).unwrap();
            let distance = backdrop.parallax().current.norm();
            assert!(distance <= previous);
            previous = distance;
        }
        assert_eq!(backdrop.parallax().target, Vec2::zeros());
        assert_abs_diff_eq!(backdrop.parallax().current, Vec2::zeros(), epsilon = 1e-4);
    }

    #[test]
    fn test_scenario_c_shooting_star_spawns_then_retires() {
        let mut backdrop = backdrop(&mut TestLoader::failing(), false);
        let spawn_at = backdrop.starfield().shooting_stars().next_spawn_time();
        let live_before = backdrop.backend().live_count();

        let mut clock = ManualClock::new();
        clock.set(spawn_at - 0.5);
        assert_eq!(backdrop.frame(&clock).unwrap().active_shooting_stars, 0);

        clock.set(spawn_at + 0.001);
        assert_eq!(backdrop.frame(&clock).unwrap().active_shooting_stars, 1);
        assert_eq!(backdrop.backend().live_count(), live_before + 1);

        let star = backdrop.starfield().shooting_stars().active()[0].clone();
        let mut frames = 0;
        while backdrop.active_shooting_stars() > 0 {
            clock.advance(0.016);
            let stats = backdrop.frame(&clock).unwrap();
            assert!(stats.active_shooting_stars <= 1);
            frames += 1;
            assert!(frames <= 200, "star outlived its life");
        }

        assert_eq!(backdrop.active_shooting_stars(), 0);
        assert!(!backdrop.backend().is_live(star.entity));
        assert_eq!(backdrop.backend().live_count(), live_before);
    }

    #[test]
    fn test_scenario_d_logo_failure_keeps_frame_loop_running() {
        let mut backdrop = backdrop(&mut TestLoader::failing(), false);
        let mut clock = ManualClock::new();

        let first = backdrop.frame(&clock).unwrap();
        assert!(first.became_ready);
        assert!(backdrop.is_ready());
        assert!(!backdrop.logo_present());

        for _ in 1..1000 {
            clock.advance(1.0 / 60.0);
            let stats = backdrop.frame(&clock).unwrap();
            assert!(!stats.became_ready);
        }
        assert_eq!(backdrop.frame_count(), 1000);
        assert_eq!(backdrop.backend().render_count(), 1000);
        assert!(!backdrop.logo_present());
    }

    #[test]
    fn test_stalled_logo_load_forces_ready_after_timeout() {
        let mut loader = TestLoader::stalled();
        let mut backdrop = backdrop(&mut loader, false);
        let timeout = backdrop.config().logo.load_timeout;
        let mut clock = ManualClock::new();

        let mut fired_at = None;
        for _ in 0..400 {
            clock.advance(1.0 / 60.0);
            if backdrop.frame(&clock).unwrap().became_ready {
                assert!(fired_at.is_none(), "ready fired twice");
                fired_at = Some(clock.elapsed());
            }
        }

        let fired_at = fired_at.unwrap();
        assert!(fired_at >= timeout && fired_at < timeout + 0.05);
        assert!(!backdrop.logo_present());
        assert_eq!(loader.stalled.len(), 1);
    }

    #[test]
    fn test_logo_wait_counts_from_first_frame_on_late_clock() {
        let mut loader = TestLoader::stalled();
        let mut backdrop = backdrop(&mut loader, false);

        let first = backdrop.tick(100.0).unwrap();
        assert!(!first.became_ready);

        loader.stalled.pop().unwrap().complete(Ok(FontData::new("logo", vec![1, 2, 3])));
        let second = backdrop.tick(100.016).unwrap();
        assert!(second.became_ready);
        assert!(backdrop.logo_present());
    }

    #[test]
    fn test_late_clock_still_times_out_after_full_wait() {
        let mut backdrop = backdrop(&mut TestLoader::stalled(), false);
        let timeout = backdrop.config().logo.load_timeout;

        assert!(!backdrop.tick(100.0).unwrap().became_ready);
        assert!(!backdrop.tick(100.0 + timeout - 0.1).unwrap().became_ready);
        assert!(backdrop.tick(100.0 + timeout).unwrap().became_ready);
        assert!(!backdrop.logo_present());
    }

    #[test]
    fn test_loaded_logo_hangs_under_world_group() {
        let mut backdrop = backdrop(&mut TestLoader::succeeding(), false);
        backdrop.tick(0.0).unwrap();
        assert!(backdrop.logo_present());

        let logo = backdrop.logo().logo().unwrap();
        let children = backdrop.backend().children_of(Some(backdrop.world()));
        assert!(children.contains(&logo.mesh()));
        assert!(children.contains(&logo.glow().unwrap()));
    }

    #[test]
    fn test_orientation_mode_drifts_until_signal() {
        let mut backdrop = backdrop(&mut TestLoader::failing(), true);
        assert_eq!(backdrop.input_mode(), InputMode::Orientation);

        let mut clock = ManualClock::new();
        for _ in 0..120 {
            clock.advance(1.0 / 60.0);
            backdrop.frame(&clock).unwrap();
        }
        assert!(backdrop.parallax().current.norm() > 0.0);
        assert!(!backdrop.parallax().has_orientation_signal);

        backdrop
            .handle_event(BackdropEvent::OrientationChanged { gamma: Some(0.0), beta: Some(45.0) })
            .unwrap();
        for _ in 0..600 {
            clock.advance(1.0 / 60.0);
            backdrop.frame(&clock).unwrap();
        }
        assert!(backdrop.parallax().has_orientation_signal);
        assert_abs_diff_eq!(backdrop.parallax().current, Vec2::zeros(), epsilon = 1e-4);
    }

    #[test]
    fn test_single_axis_tilt_drives_target() {
        let mut backdrop = backdrop(&mut TestLoader::failing(), true);
        backdrop
            .handle_event(BackdropEvent::OrientationChanged { gamma: Some(22.5), beta: None })
            .unwrap();
        backdrop.tick(0.0).unwrap();

        assert!(backdrop.parallax().has_orientation_signal);
        assert_eq!(backdrop.parallax().target, Vec2::new(0.5, -1.0));
    }

    #[test]
    fn test_accent_rings_turn_every_frame() {
        let mut backdrop = backdrop(&mut TestLoader::failing(), false);
        let before: Vec<_> = backdrop.accents().rings().iter().map(|ring| ring.rotation).collect();

        let mut clock = ManualClock::new();
        for _ in 0..60 {
            clock.advance(1.0 / 60.0);
            backdrop.frame(&clock).unwrap();
        }

        let children = backdrop.backend().children_of(Some(backdrop.world()));
        assert!(children.contains(&backdrop.accents().grid().unwrap()));
        for (ring, initial) in backdrop.accents().rings().iter().zip(before) {
            assert!(children.contains(&ring.entity));
            assert_abs_diff_eq!(ring.rotation - initial, ring.angular_step * 60.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_world_rotation_uses_offset_read_before_updates() {
        let mut backdrop = backdrop(&mut TestLoader::failing(), false);
        backdrop.handle_event(BackdropEvent::PointerMoved { x: 0.0, y: 0.0 }).unwrap();

        let mut clock = ManualClock::new();
        for _ in 0..30 {
            clock.advance(1.0 / 60.0);
            let expected = backdrop.parallax_offset();
            let stats = backdrop.frame(&clock).unwrap();
            assert_eq!(stats.offset, expected);

            let world = backdrop.backend().entity(backdrop.world()).unwrap();
            let parallax = &backdrop.config().parallax;
            let pitch = -expected.y / parallax.strength * parallax.world_tilt.y;
            let yaw = expected.x / parallax.strength * parallax.world_tilt.x;
            assert_abs_diff_eq!(world.transform.rotation.x, pitch, epsilon = 1e-6);
            assert_abs_diff_eq!(world.transform.rotation.y, yaw, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_resize_updates_camera_and_backend() {
        let mut backdrop = backdrop(&mut TestLoader::failing(), false);
        backdrop
            .handle_event(BackdropEvent::Resized(Viewport { width: 800, height: 800, pixel_ratio: 3.0 }))
            .unwrap();

        assert_abs_diff_eq!(backdrop.camera().aspect, 1.0);
        assert_eq!(backdrop.backend().viewport(), (800, 800, 2.0));

        backdrop.handle_event(BackdropEvent::PointerMoved { x: 800.0, y: 800.0 }).unwrap();
        backdrop.tick(0.0).unwrap();
        assert_eq!(backdrop.parallax().target, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_same_seed_builds_same_scene() {
        let a = backdrop(&mut TestLoader::failing(), false);
        let b = backdrop(&mut TestLoader::failing(), false);
        assert_eq!(
            a.spheres().states().cloned().collect::<Vec<_>>(),
            b.spheres().states().cloned().collect::<Vec<_>>()
        );
        assert_eq!(
            a.starfield().shooting_stars().next_spawn_time(),
            b.starfield().shooting_stars().next_spawn_time()
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = test_config();
        config.parallax.smoothing = 1.5;
        let result = Backdrop::new(
            config,
            RecordingBackend::new(),
            &mut TestLoader::failing(),
            false,
            Viewport::new(WIDTH, HEIGHT),
        );
        assert!(matches!(result, Err(crate::BackdropError::Config(_))));
    }
}
