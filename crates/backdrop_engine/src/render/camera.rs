//! # Perspective Camera
//!
//! The backdrop camera is fixed in place and looks at the origin; only its
//! aspect ratio changes, on viewport resize. Projection math itself belongs to
//! the backend, so the camera carries parameters rather than matrices.

use crate::core::config::CameraConfig;
use crate::foundation::math::{utils, Vec3};

/// Perspective camera parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera looking at the origin
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Build from configuration for a `width` x `height` viewport
    pub fn from_config(config: &CameraConfig, width: u32, height: u32) -> Self {
        let mut camera = Self::perspective(config.position, config.fov_degrees, 1.0, config.near, config.far);
        camera.set_viewport(width, height);
        camera
    }

    /// Recompute the aspect ratio for a new viewport
    ///
    /// A zero-height viewport keeps the previous aspect.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if height == 0 {
            log::trace!("Ignoring zero-height viewport for camera aspect");
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Forward direction (normalized)
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }
}
