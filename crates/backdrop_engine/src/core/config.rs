//! # Backdrop Configuration
//!
//! Every tunable of the backdrop lives here, grouped per subsystem. Defaults
//! reproduce the reference look; files in TOML or RON may override any subset
//! of fields thanks to `#[serde(default)]` on every group.
//!
//! ## Configuration Categories
//!
//! - **Scene**: background, fog, camera, lighting rig, environment bake
//! - **Accents**: grid floor and floating rings
//! - **Starfield**: the two static point layers
//! - **Shooting stars**: spawn schedule, lifetime and fade curve
//! - **Spheres**: animation ranges, texture and material parameters
//! - **Parallax**: smoothing, strength and idle drift
//! - **Logo**: extruded text, oscillation, glow, load timeout
//! - **Input**: pointer/orientation mode preference

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::foundation::math::{Vec2, Vec3};

/// Half-open `[min, max)` range sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    /// Inclusive lower bound
    pub min: f32,
    /// Exclusive upper bound
    pub max: f32,
}

impl FloatRange {
    /// Create a range
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draw a value uniformly; a degenerate range always yields `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }

    /// Whether `value` lies in the range, treating a degenerate range as `[min, min]`
    pub fn contains(&self, value: f32) -> bool {
        if self.max > self.min {
            value >= self.min && value < self.max
        } else {
            (value - self.min).abs() <= f32::EPSILON
        }
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigError::Invalid(format!("{name}: bounds must be finite")));
        }
        if self.max < self.min {
            return Err(ConfigError::Invalid(format!(
                "{name}: max ({}) is below min ({})",
                self.max, self.min
            )));
        }
        Ok(())
    }
}

/// Light categories understood by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightKind {
    /// Uniform ambient term
    Ambient,
    /// Infinitely distant light shining from `position` toward the origin
    Directional,
    /// Point light at `position`
    Point,
}

/// One light of the scene rig or of the environment bake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    /// Light category
    pub kind: LightKind,
    /// Color as `0xRRGGBB`
    pub color: u32,
    /// Intensity multiplier
    pub intensity: f32,
    /// Position (direction source for directional lights)
    pub position: Vec3,
    /// Falloff distance for point lights
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<f32>,
}

impl LightConfig {
    fn ambient(color: u32, intensity: f32) -> Self {
        Self { kind: LightKind::Ambient, color, intensity, position: Vec3::zeros(), range: None }
    }

    fn directional(color: u32, intensity: f32, position: Vec3) -> Self {
        Self { kind: LightKind::Directional, color, intensity, position, range: None }
    }

    fn point(color: u32, intensity: f32, range: f32, position: Vec3) -> Self {
        Self { kind: LightKind::Point, color, intensity, position, range: Some(range) }
    }
}

/// Exponential-squared distance fog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FogConfig {
    /// Fog color as `0xRRGGBB`
    pub color: u32,
    /// Density coefficient
    pub density: f32,
}

/// Perspective camera parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Camera position; it looks at the origin
    pub position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, 30.0),
        }
    }
}

/// Scene-wide presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Clear color as `0xRRGGBB`
    pub background: u32,
    /// Distance fog; none when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fog: Option<FogConfig>,
    /// Camera parameters
    pub camera: CameraConfig,
    /// Tone-mapping exposure
    pub exposure: f32,
    /// Upper bound applied to the device pixel ratio
    pub max_pixel_ratio: f32,
    /// Lights added to the scene
    pub lights: Vec<LightConfig>,
    /// Lights of the throwaway scene baked into the environment map
    pub environment_lights: Vec<LightConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: 0x05020e,
            fog: Some(FogConfig { color: 0x05020e, density: 0.008 }),
            camera: CameraConfig::default(),
            exposure: 1.2,
            max_pixel_ratio: 2.0,
            lights: vec![
                LightConfig::ambient(0x1a1028, 0.6),
                // Key, fill, rim, then the cyan accent from below
                LightConfig::directional(0xd4c4ff, 0.9, Vec3::new(10.0, 12.0, 10.0)),
                LightConfig::directional(0x4455aa, 0.4, Vec3::new(-8.0, -5.0, 5.0)),
                LightConfig::point(0x9966ff, 0.6, 60.0, Vec3::new(0.0, 15.0, -10.0)),
                LightConfig::point(0x44ddff, 0.3, 40.0, Vec3::new(-10.0, -12.0, 5.0)),
            ],
            environment_lights: vec![
                LightConfig::point(0xc4b5fd, 2.0, 100.0, Vec3::new(10.0, 10.0, 10.0)),
                LightConfig::point(0x4466cc, 1.2, 100.0, Vec3::new(-10.0, -5.0, -10.0)),
                LightConfig::point(0x8844cc, 0.8, 100.0, Vec3::new(0.0, -10.0, 5.0)),
                LightConfig::point(0x22ccff, 0.5, 100.0, Vec3::new(5.0, 8.0, -15.0)),
            ],
        }
    }
}

impl SceneConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid("camera fov must lie in (0, 180)".to_string()));
        }
        if camera.near <= 0.0 || camera.far <= camera.near {
            return Err(ConfigError::Invalid("camera planes must satisfy 0 < near < far".to_string()));
        }
        if self.max_pixel_ratio <= 0.0 {
            return Err(ConfigError::Invalid("max pixel ratio must be positive".to_string()));
        }
        if let Some(fog) = &self.fog {
            if !(fog.density >= 0.0) {
                return Err(ConfigError::Invalid("scene.fog.density must be non-negative".to_string()));
            }
        }
        Ok(())
    }
}

/// Grid floor drawn under the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Whether to draw the grid
    pub enabled: bool,
    /// Edge length of the square grid
    pub size: f32,
    /// Cells per edge
    pub divisions: u32,
    /// Line color as `0xRRGGBB`
    pub color: u32,
    /// Line opacity
    pub opacity: f32,
    /// Height of the grid plane
    pub height: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 200.0,
            divisions: 60,
            color: 0x6633cc,
            opacity: 0.06,
            height: -18.0,
        }
    }
}

/// Placement and spin of one accent ring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingPlacement {
    /// Ring centre
    pub position: Vec3,
    /// Uniform scale
    pub scale: f32,
    /// Spin multiplier applied to [`AccentConfig::ring_spin`]
    pub speed: f32,
}

impl RingPlacement {
    fn new(x: f32, y: f32, z: f32, scale: f32, speed: f32) -> Self {
        Self { position: Vec3::new(x, y, z), scale, speed }
    }
}

/// Decorative grid floor and floating torus rings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccentConfig {
    /// Grid floor
    pub grid: GridConfig,
    /// One ring per placement
    pub rings: Vec<RingPlacement>,
    /// Torus radius before scaling
    pub ring_radius: f32,
    /// Torus tube radius before scaling
    pub ring_tube: f32,
    /// Tessellation around the tube
    pub ring_radial_segments: u32,
    /// Tessellation along the ring
    pub ring_tubular_segments: u32,
    /// Ring color as `0xRRGGBB`
    pub ring_color: u32,
    /// Ring opacity
    pub ring_opacity: f32,
    /// Rotation added per frame about (x, y), scaled by each ring's speed
    pub ring_spin: Vec2,
}

impl Default for AccentConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            rings: vec![
                RingPlacement::new(-15.0, 5.0, -8.0, 2.5, 0.3),
                RingPlacement::new(12.0, -6.0, -10.0, 1.8, 0.4),
                RingPlacement::new(8.0, 9.0, -6.0, 3.0, 0.25),
                RingPlacement::new(-10.0, -8.0, -12.0, 2.0, 0.35),
            ],
            ring_radius: 0.8,
            ring_tube: 0.02,
            ring_radial_segments: 16,
            ring_tubular_segments: 64,
            ring_color: 0xc4b5fd,
            ring_opacity: 0.15,
            ring_spin: Vec2::new(0.005, 0.003),
        }
    }
}

impl AccentConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.enabled && (self.grid.size <= 0.0 || self.grid.divisions == 0) {
            return Err(ConfigError::Invalid("accents.grid needs a positive size and divisions".to_string()));
        }
        if self.ring_radius <= 0.0 || self.ring_tube <= 0.0 {
            return Err(ConfigError::Invalid("accents ring radii must be positive".to_string()));
        }
        if self.rings.iter().any(|ring| ring.scale <= 0.0) {
            return Err(ConfigError::Invalid("accents ring scale must be positive".to_string()));
        }
        Ok(())
    }
}

/// One weighted tint family for a point layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TintVariant {
    /// Relative probability of this family
    pub weight: f32,
    /// Red channel range
    pub red: FloatRange,
    /// Green channel range
    pub green: FloatRange,
    /// Blue channel range
    pub blue: FloatRange,
}

impl TintVariant {
    const fn new(weight: f32, red: (f32, f32), green: (f32, f32), blue: (f32, f32)) -> Self {
        Self {
            weight,
            red: FloatRange::new(red.0, red.1),
            green: FloatRange::new(green.0, green.1),
            blue: FloatRange::new(blue.0, blue.1),
        }
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if !(self.weight > 0.0) {
            return Err(ConfigError::Invalid(format!("{name}: weight must be positive")));
        }
        self.red.validate(name)?;
        self.green.validate(name)?;
        self.blue.validate(name)
    }
}

fn validate_palette(palette: &[TintVariant], name: &str) -> Result<(), ConfigError> {
    if palette.is_empty() {
        return Err(ConfigError::Invalid(format!("{name} needs at least one tint")));
    }
    palette.iter().try_for_each(|variant| variant.validate(name))
}

/// Static star layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Number of distant stars
    pub star_count: usize,
    /// Shell radii for distant stars
    pub star_radius: FloatRange,
    /// Cool white, blue-white and lavender tints for distant stars
    pub star_palette: Vec<TintVariant>,
    /// Material point size for distant stars
    pub star_point_size: f32,
    /// Distant layer opacity
    pub star_opacity: f32,
    /// Distant layer angular rates (x, y) in radians per second
    pub star_rotation_rate: Vec2,
    /// Number of bright nebula stars
    pub bright_count: usize,
    /// Shell radii for bright stars
    pub bright_radius: FloatRange,
    /// Lavender, violet and cyan tints for bright stars
    pub bright_palette: Vec<TintVariant>,
    /// Material point size for bright stars
    pub bright_point_size: f32,
    /// Bright layer angular rate about Y
    pub bright_rotation_rate: f32,
    /// Bright layer resting opacity
    pub bright_opacity_base: f32,
    /// Bright layer pulse amplitude
    pub bright_opacity_amplitude: f32,
    /// Bright layer pulse angular frequency
    pub bright_pulse_frequency: f32,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            star_count: 2500,
            star_radius: FloatRange::new(120.0, 300.0),
            star_palette: vec![
                TintVariant::new(0.6, (0.9, 1.0), (0.9, 1.0), (1.0, 1.0)),
                TintVariant::new(0.25, (0.6, 0.8), (0.7, 0.9), (1.0, 1.0)),
                TintVariant::new(0.15, (0.7, 0.85), (0.55, 0.7), (0.95, 1.0)),
            ],
            star_point_size: 0.7,
            star_opacity: 0.85,
            star_rotation_rate: Vec2::new(0.0015, 0.004),
            bright_count: 80,
            bright_radius: FloatRange::new(80.0, 200.0),
            bright_palette: vec![
                TintVariant::new(0.4, (0.6, 0.8), (0.45, 0.65), (0.9, 1.0)),
                TintVariant::new(0.3, (0.4, 0.6), (0.15, 0.3), (0.7, 1.0)),
                TintVariant::new(0.3, (0.15, 0.3), (0.6, 0.9), (0.85, 1.0)),
            ],
            bright_point_size: 4.0,
            bright_rotation_rate: 0.002,
            bright_opacity_base: 0.35,
            bright_opacity_amplitude: 0.15,
            bright_pulse_frequency: 0.4,
        }
    }
}

impl StarfieldConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.star_radius.validate("starfield.star_radius")?;
        self.bright_radius.validate("starfield.bright_radius")?;
        validate_palette(&self.star_palette, "starfield.star_palette")?;
        validate_palette(&self.bright_palette, "starfield.bright_palette")?;
        if self.star_radius.min < 0.0 || self.bright_radius.min < 0.0 {
            return Err(ConfigError::Invalid("starfield radii must be non-negative".to_string()));
        }
        if self.star_count == 0 || self.bright_count == 0 {
            return Err(ConfigError::Invalid("starfield layers need at least one star".to_string()));
        }
        Ok(())
    }
}

/// How shooting stars accumulate age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AgingPolicy {
    /// Fixed quantum per update, so lifetime depends on frame rate
    #[default]
    FrameQuantum,
    /// Real elapsed delta between updates
    DeltaTime,
}

/// Shooting star spawn schedule and lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootingStarConfig {
    /// Delay between spawns
    pub spawn_interval: FloatRange,
    /// Time of the first spawn
    pub first_spawn: FloatRange,
    /// Lifetime of a star
    pub max_life: FloatRange,
    /// Age added per update under [`AgingPolicy::FrameQuantum`]
    pub frame_quantum: f32,
    /// Trail displacement per quantum along the direction
    pub speed: f32,
    /// Number of points in the trail line
    pub trail_points: usize,
    /// Spacing between trail points, in direction units
    pub trail_spacing: f32,
    /// Progress at which the fade-in completes
    pub fade_in_end: f32,
    /// Progress at which the fade-out begins
    pub fade_out_start: f32,
    /// Opacity at full visibility
    pub peak_opacity: f32,
    /// Spawn region along X
    pub spawn_x: FloatRange,
    /// Spawn region along Y
    pub spawn_y: FloatRange,
    /// Spawn region along Z
    pub spawn_z: FloatRange,
    /// Rightward direction component
    pub direction_x: FloatRange,
    /// Downward direction component
    pub direction_y: FloatRange,
    /// Usual trail color as `0xRRGGBB`
    pub trail_color: u32,
    /// Occasional trail color as `0xRRGGBB`
    pub accent_trail_color: u32,
    /// Probability that a star uses the accent color
    pub accent_chance: f32,
    /// Aging policy
    pub aging: AgingPolicy,
}

impl Default for ShootingStarConfig {
    fn default() -> Self {
        Self {
            spawn_interval: FloatRange::new(4.0, 12.0),
            first_spawn: FloatRange::new(2.0, 6.0),
            max_life: FloatRange::new(1.2, 2.0),
            frame_quantum: 0.016,
            speed: 0.6,
            trail_points: 25,
            trail_spacing: 0.7,
            fade_in_end: 0.2,
            fade_out_start: 0.4,
            peak_opacity: 0.7,
            spawn_x: FloatRange::new(-40.0, 40.0),
            spawn_y: FloatRange::new(20.0, 40.0),
            spawn_z: FloatRange::new(-25.0, -15.0),
            direction_x: FloatRange::new(0.5, 1.0),
            direction_y: FloatRange::new(-0.6, -0.3),
            trail_color: 0xc4b5fd,
            accent_trail_color: 0x66ddff,
            accent_chance: 0.4,
            aging: AgingPolicy::FrameQuantum,
        }
    }
}

impl ShootingStarConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.spawn_interval.validate("shooting_stars.spawn_interval")?;
        self.first_spawn.validate("shooting_stars.first_spawn")?;
        self.max_life.validate("shooting_stars.max_life")?;
        self.spawn_x.validate("shooting_stars.spawn_x")?;
        self.spawn_y.validate("shooting_stars.spawn_y")?;
        self.spawn_z.validate("shooting_stars.spawn_z")?;
        self.direction_x.validate("shooting_stars.direction_x")?;
        self.direction_y.validate("shooting_stars.direction_y")?;
        if self.max_life.min <= 0.0 {
            return Err(ConfigError::Invalid("shooting_stars.max_life must be positive".to_string()));
        }
        if self.frame_quantum <= 0.0 {
            return Err(ConfigError::Invalid("shooting_stars.frame_quantum must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.accent_chance) {
            return Err(ConfigError::Invalid("shooting_stars.accent_chance must lie in [0, 1]".to_string()));
        }
        if self.trail_points < 2 {
            return Err(ConfigError::Invalid("shooting_stars.trail_points must be at least 2".to_string()));
        }
        if !(0.0 < self.fade_in_end && self.fade_in_end <= self.fade_out_start && self.fade_out_start < 1.0) {
            return Err(ConfigError::Invalid(
                "shooting_stars fade points must satisfy 0 < fade_in_end <= fade_out_start < 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sphere animation ranges, texture and material settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereFieldConfig {
    /// Bobbing angular frequency
    pub float_speed: FloatRange,
    /// Bobbing amplitude
    pub float_amplitude: FloatRange,
    /// Rotation increment per frame, in radians
    pub rotation_speed: FloatRange,
    /// Parallax gain lost per unit of depth toward the camera
    pub depth_gain: f32,
    /// Edge length of generated textures in pixels
    pub texture_size: u32,
    /// Sphere tessellation around the equator
    pub width_segments: u32,
    /// Sphere tessellation pole to pole
    pub height_segments: u32,
    /// Standard material metalness
    pub metalness: f32,
    /// Standard material roughness
    pub roughness: f32,
    /// Environment map contribution
    pub env_map_intensity: f32,
    /// Font used to letter sphere labels; labels are skipped without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_font: Option<String>,
}

impl Default for SphereFieldConfig {
    fn default() -> Self {
        Self {
            float_speed: FloatRange::new(0.25, 0.5),
            float_amplitude: FloatRange::new(0.1, 0.25),
            rotation_speed: FloatRange::new(0.0004, 0.0012),
            depth_gain: 0.15,
            texture_size: 512,
            width_segments: 64,
            height_segments: 64,
            metalness: 0.15,
            roughness: 0.05,
            env_map_intensity: 0.8,
            label_font: None,
        }
    }
}

impl SphereFieldConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.float_speed.validate("spheres.float_speed")?;
        self.float_amplitude.validate("spheres.float_amplitude")?;
        self.rotation_speed.validate("spheres.rotation_speed")?;
        if self.float_amplitude.min < 0.0 || self.rotation_speed.min < 0.0 {
            return Err(ConfigError::Invalid(
                "spheres amplitude and rotation speed must be non-negative".to_string(),
            ));
        }
        if !self.depth_gain.is_finite() {
            return Err(ConfigError::Invalid("spheres.depth_gain must be finite".to_string()));
        }
        if self.texture_size < 16 {
            return Err(ConfigError::Invalid("spheres.texture_size must be at least 16".to_string()));
        }
        Ok(())
    }
}

/// Motion smoothing and idle drift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    /// Fraction of the remaining distance covered each frame, in (0, 1)
    pub smoothing: f32,
    /// Scale applied to the smoothed value to form the parallax offset
    pub strength: f32,
    /// World-group rotation per unit of smoothed input: x turns about Y, y tilts about X
    pub world_tilt: Vec2,
    /// Idle drift angular frequencies (x, y)
    pub drift_frequency: Vec2,
    /// Idle drift amplitudes (x, y)
    pub drift_amplitude: Vec2,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.04,
            strength: 2.0,
            world_tilt: Vec2::new(0.05, 0.03),
            drift_frequency: Vec2::new(0.25, 0.18),
            drift_amplitude: Vec2::new(0.25, 0.18),
        }
    }
}

impl ParallaxConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.smoothing > 0.0 && self.smoothing < 1.0) {
            return Err(ConfigError::Invalid("parallax.smoothing must lie in (0, 1)".to_string()));
        }
        if !(self.strength > 0.0) {
            return Err(ConfigError::Invalid("parallax.strength must be positive".to_string()));
        }
        Ok(())
    }
}

/// Extruded text logo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoConfig {
    /// Whether to attempt building the logo at all
    pub enabled: bool,
    /// Text to extrude
    pub text: String,
    /// Font file fetched asynchronously
    pub font_path: String,
    /// Glyph height in world units
    pub size: f32,
    /// Extrusion depth
    pub depth: f32,
    /// Bevel thickness
    pub bevel_thickness: f32,
    /// Bevel size
    pub bevel_size: f32,
    /// Bevel tessellation
    pub bevel_segments: u32,
    /// Outline curve tessellation
    pub curve_segments: u32,
    /// Logo centre
    pub position: Vec3,
    /// Rest orientation in radians
    pub base_rotation: Vec3,
    /// Sway amplitude about Y, in radians
    pub sway_amplitude: f32,
    /// Sway angular frequency
    pub sway_frequency: f32,
    /// Logo surface color as `0xRRGGBB`
    pub color: u32,
    /// Whether to place a glow plane behind the text
    pub glow: bool,
    /// Glow color as `0xRRGGBB`
    pub glow_color: u32,
    /// Glow resting opacity
    pub glow_opacity_base: f32,
    /// Glow pulse amplitude
    pub glow_opacity_amplitude: f32,
    /// Glow pulse angular frequency
    pub glow_frequency: f32,
    /// Seconds after which the load is abandoned and the scene reports ready
    pub load_timeout: f32,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            text: "CH".to_string(),
            font_path: "resources/fonts/logo.ttf".to_string(),
            size: 3.0,
            depth: 0.8,
            bevel_thickness: 0.1,
            bevel_size: 0.05,
            bevel_segments: 5,
            curve_segments: 12,
            position: Vec3::new(0.0, 0.0, 2.0),
            base_rotation: Vec3::new(0.0, -0.15, 0.0),
            sway_amplitude: 0.05,
            sway_frequency: 0.3,
            color: 0x888899,
            glow: false,
            glow_color: 0xc4b5fd,
            glow_opacity_base: 0.25,
            glow_opacity_amplitude: 0.1,
            glow_frequency: 0.8,
            load_timeout: 5.0,
        }
    }
}

impl LogoConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.load_timeout <= 0.0 {
            return Err(ConfigError::Invalid("logo.load_timeout must be positive".to_string()));
        }
        if self.enabled && self.text.trim().is_empty() {
            return Err(ConfigError::Invalid("logo.text cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Which input source drives the parallax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InputModePreference {
    /// Orientation on touch-capable devices, pointer otherwise
    #[default]
    Auto,
    /// Always sample the pointer
    Pointer,
    /// Always sample device orientation
    Orientation,
}

/// Input sampling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Mode preference
    pub mode: InputModePreference,
    /// Tilt in degrees that maps to a full-scale target
    pub orientation_range_degrees: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mode: InputModePreference::Auto,
            orientation_range_degrees: 45.0,
        }
    }
}

/// Complete backdrop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    /// Presentation settings
    pub scene: SceneConfig,
    /// Grid floor and rings
    pub accents: AccentConfig,
    /// Static star layers
    pub starfield: StarfieldConfig,
    /// Shooting stars
    pub shooting_stars: ShootingStarConfig,
    /// Floating spheres
    pub spheres: SphereFieldConfig,
    /// Motion smoothing
    pub parallax: ParallaxConfig,
    /// Logo element
    pub logo: LogoConfig,
    /// Input sampling
    pub input: InputConfig,
    /// Seed for all visual randomness; entropy when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            scene: SceneConfig::default(),
            accents: AccentConfig::default(),
            starfield: StarfieldConfig::default(),
            shooting_stars: ShootingStarConfig::default(),
            spheres: SphereFieldConfig::default(),
            parallax: ParallaxConfig::default(),
            logo: LogoConfig::default(),
            input: InputConfig::default(),
            seed: None,
            log_level: "info".to_string(),
        }
    }
}

impl BackdropConfig {
    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scene.validate()?;
        self.accents.validate()?;
        self.starfield.validate()?;
        self.shooting_stars.validate()?;
        self.spheres.validate()?;
        self.parallax.validate()?;
        self.logo.validate()?;
        if self.input.orientation_range_degrees <= 0.0 {
            return Err(ConfigError::Invalid("input.orientation_range_degrees must be positive".to_string()));
        }
        Ok(())
    }
}

impl Config for BackdropConfig {}
