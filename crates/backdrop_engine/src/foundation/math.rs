//! Math utilities and types
//!
//! Provides the small set of math types the animation layer needs. Everything
//! is a thin alias over `nalgebra` so backends can consume the values directly.

pub use nalgebra::{Vector2, Vector3, Matrix4, Rotation3, UnitQuaternion};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Linear RGB color with components in `[0, 1]`
pub type Rgb = Vec3;

/// Transform representing position, Euler rotation, and scale
///
/// Rotation is stored as Euler angles in radians because every animated
/// element in the backdrop drives individual axes (spin about Y, tilt about X)
/// rather than composing orientations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Euler rotation in radians (x, y, z)
    pub rotation: Vec3,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and Euler rotation
    pub fn from_position_rotation(position: Vec3, rotation: Vec3) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Rotation as a unit quaternion
    pub fn orientation(&self) -> Quat {
        Quat::from_euler_angles(self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.orientation().to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Rgb};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Unpack a `0xRRGGBB` color into linear components
    pub fn rgb_from_hex(hex: u32) -> Rgb {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Rgb::new(channel(16), channel(8), channel(0))
    }

    /// Convert HSL (all components in `[0, 1]`) to RGB
    pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Rgb {
        if saturation <= 0.0 {
            return Rgb::new(lightness, lightness, lightness);
        }

        let q = if lightness < 0.5 {
            lightness * (1.0 + saturation)
        } else {
            lightness + saturation - lightness * saturation
        };
        let p = 2.0 * lightness - q;
        let h = hue.rem_euclid(1.0);

        let channel = |mut t: f32| {
            if t < 0.0 {
                t += 1.0;
            }
            if t > 1.0 {
                t -= 1.0;
            }
            if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            }
        };

        Rgb::new(channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0))
    }
}
