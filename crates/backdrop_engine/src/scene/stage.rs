//! Background, fog, lighting rig and environment bake

use crate::core::config::{LightConfig, SceneConfig};
use crate::foundation::math::utils;
use crate::render::{EnvironmentDesc, LightDesc, RenderBackend, RenderResult};

/// Near plane of the environment bake cameras
const BAKE_NEAR: f32 = 0.1;
/// Far plane of the environment bake cameras
const BAKE_FAR: f32 = 100.0;

impl From<&LightConfig> for LightDesc {
    fn from(light: &LightConfig) -> Self {
        Self {
            kind: light.kind,
            color: utils::rgb_from_hex(light.color),
            intensity: light.intensity,
            position: light.position,
            range: light.range,
        }
    }
}

/// What was installed into the backend's scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    /// Lights added to the scene
    pub light_count: usize,
    /// Lights used for the environment bake
    pub environment_light_count: usize,
    /// Whether distance fog was enabled
    pub fog: bool,
}

impl Stage {
    /// Set the clear color and fog, add the scene lights and bake the environment map
    pub fn install<B>(backend: &mut B, config: &SceneConfig) -> RenderResult<Self>
    where
        B: RenderBackend + ?Sized,
    {
        let background = utils::rgb_from_hex(config.background);
        backend.set_background(background, config.exposure)?;
        if let Some(fog) = &config.fog {
            backend.set_fog(utils::rgb_from_hex(fog.color), fog.density)?;
        }

        for light in &config.lights {
            backend.add_light(&LightDesc::from(light))?;
        }

        let environment = EnvironmentDesc {
            background,
            lights: config.environment_lights.iter().map(LightDesc::from).collect(),
            sigma: 0.0,
            near: BAKE_NEAR,
            far: BAKE_FAR,
        };
        backend.bake_environment(&environment)?;

        log::info!(
            "Stage installed: {} lights, environment baked from {}",
            config.lights.len(),
            environment.lights.len()
        );
        Ok(Self {
            light_count: config.lights.len(),
            environment_light_count: environment.lights.len(),
            fog: config.fog.is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::LightKind;
    use crate::render::RecordingBackend;
    use approx::assert_relative_eq;

    #[test]
    fn test_install_default_rig() {
        let mut backend = RecordingBackend::new();
        let stage = Stage::install(&mut backend, &SceneConfig::default()).unwrap();

        assert_eq!(stage.light_count, 5);
        assert_eq!(stage.environment_light_count, 4);
        assert!(stage.fog);

        let kinds: Vec<_> = backend.lights().iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LightKind::Ambient,
                LightKind::Directional,
                LightKind::Directional,
                LightKind::Point,
                LightKind::Point
            ]
        );
        let accent = &backend.lights()[4];
        assert_eq!(accent.range, Some(40.0));
        assert_relative_eq!(accent.color, utils::rgb_from_hex(0x44ddff));

        let (background, exposure) = backend.background().unwrap();
        assert_relative_eq!(background.z, 14.0 / 255.0, epsilon = 1e-6);
        assert_relative_eq!(exposure, 1.2);

        let (fog_color, density) = backend.fog().unwrap();
        assert_relative_eq!(fog_color, background);
        assert_relative_eq!(density, 0.008);

        let environment = backend.environment().unwrap();
        assert_eq!(environment.lights.len(), 4);
        assert_relative_eq!(environment.far, BAKE_FAR);
    }

    #[test]
    fn test_fog_is_optional() {
        let mut backend = RecordingBackend::new();
        let config = SceneConfig { fog: None, ..SceneConfig::default() };
        let stage = Stage::install(&mut backend, &config).unwrap();
        assert!(!stage.fog);
        assert!(backend.fog().is_none());
    }
}
