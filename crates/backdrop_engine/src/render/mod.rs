//! # Rendering Seam
//!
//! The backdrop never talks to a graphics API directly. Everything it draws
//! goes through [`RenderBackend`], which owns the scene graph, GPU resources,
//! projection and the environment bake. This module defines that contract and
//! the plain-data descriptions passed across it.
//!
//! ## Architecture
//!
//! ```text
//! Backdrop (orchestrator) → components → RenderBackend
//!                                         |
//!                         create / attach / set_transform / render
//! ```
//!
//! [`RecordingBackend`] is a headless implementation that stores every call,
//! used by the demo application and by tests.

pub mod camera;
pub mod recording;
pub mod texture;

pub use camera::Camera;
pub use recording::{RecordedEntity, RecordingBackend};
pub use texture::{SphereTexturePainter, TextureImage};

pub use crate::foundation::collections::{EntityHandle, TextureHandle};

use crate::assets::FontData;
use crate::core::config::LightKind;
use crate::foundation::math::{Rgb, Transform, Vec3};
use thiserror::Error;

/// Result type for backend operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Backend errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Handle does not refer to a live entity
    #[error("Unknown or destroyed entity handle: {0:?}")]
    UnknownHandle(EntityHandle),

    /// Texture handle does not refer to a live texture
    #[error("Unknown texture handle: {0:?}")]
    UnknownTexture(TextureHandle),

    /// Geometry could not be built
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Backend-specific failure
    #[error("Backend failure: {0}")]
    Backend(String),
}

/// Shape data for a primitive
#[derive(Debug, Clone)]
pub enum Geometry {
    /// Point cloud
    Points {
        /// Point positions
        positions: Vec<Vec3>,
        /// Optional per-point colors
        colors: Option<Vec<Rgb>>,
    },

    /// Open polyline
    LineStrip {
        /// Ordered vertices
        points: Vec<Vec3>,
    },

    /// UV sphere
    Sphere {
        /// Sphere radius
        radius: f32,
        /// Segments around the equator
        width_segments: u32,
        /// Segments pole to pole
        height_segments: u32,
    },

    /// Text outlines extruded into a solid
    ExtrudedText {
        /// Text to extrude
        text: String,
        /// Parsed font the outlines come from
        font: FontData,
        /// Glyph height
        size: f32,
        /// Extrusion depth
        depth: f32,
        /// Bevel thickness
        bevel_thickness: f32,
        /// Bevel size
        bevel_size: f32,
        /// Bevel tessellation
        bevel_segments: u32,
        /// Curve tessellation
        curve_segments: u32,
        /// Recenter the geometry on its bounding box
        centered: bool,
    },

    /// Flat quad facing +Z
    Plane {
        /// Width along X
        width: f32,
        /// Height along Y
        height: f32,
    },

    /// Square line grid in the XZ plane, centred on the origin
    Grid {
        /// Edge length
        size: f32,
        /// Cells per edge
        divisions: u32,
    },

    /// Ring with a circular cross-section in the XY plane
    Torus {
        /// Distance from the centre to the middle of the tube
        radius: f32,
        /// Tube radius
        tube: f32,
        /// Segments around the tube
        radial_segments: u32,
        /// Segments along the ring
        tubular_segments: u32,
    },
}

impl Geometry {
    /// Number of vertices a backend must upload, where it is known up front
    pub fn vertex_count(&self) -> Option<usize> {
        match self {
            Self::Points { positions, .. } => Some(positions.len()),
            Self::LineStrip { points } => Some(points.len()),
            Self::Plane { .. } => Some(4),
            Self::Sphere { width_segments, height_segments, .. } => {
                Some(((*width_segments + 1) * (*height_segments + 1)) as usize)
            }
            // Two endpoints per line, divisions + 1 lines per direction
            Self::Grid { divisions, .. } => Some(((*divisions + 1) * 4) as usize),
            Self::Torus { radial_segments, tubular_segments, .. } => {
                Some(((*radial_segments + 1) * (*tubular_segments + 1)) as usize)
            }
            Self::ExtrudedText { .. } => None,
        }
    }
}

/// Surface description for a primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Sized, optionally vertex-colored points
    Points {
        /// Base color
        color: Rgb,
        /// World-space point size
        size: f32,
        /// Scale points with distance
        size_attenuation: bool,
        /// Use per-point colors
        vertex_colors: bool,
    },

    /// Unlit line
    Line {
        /// Line color
        color: Rgb,
    },

    /// Physically based surface
    Standard {
        /// Albedo color
        color: Rgb,
        /// Albedo texture
        texture: Option<TextureHandle>,
        /// Metalness
        metalness: f32,
        /// Roughness
        roughness: f32,
        /// Environment map contribution
        env_map_intensity: f32,
    },

    /// Unlit flat color
    Basic {
        /// Color
        color: Rgb,
    },
}

/// Blending and visibility flags shared by every material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    /// Initial opacity
    pub opacity: f32,
    /// Alpha blending enabled
    pub transparent: bool,
    /// Additive blending instead of alpha-over
    pub additive: bool,
    /// Write to the depth buffer
    pub depth_write: bool,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            transparent: false,
            additive: false,
            depth_write: true,
        }
    }
}

impl Surface {
    /// Transparent additive surface that leaves depth untouched, used for glows and stars
    pub fn additive(opacity: f32) -> Self {
        Self {
            opacity,
            transparent: true,
            additive: true,
            depth_write: false,
        }
    }
}

/// A light handed to the backend
#[derive(Debug, Clone, PartialEq)]
pub struct LightDesc {
    /// Light category
    pub kind: LightKind,
    /// Linear color
    pub color: Rgb,
    /// Intensity multiplier
    pub intensity: f32,
    /// Position or direction source
    pub position: Vec3,
    /// Falloff distance for point lights
    pub range: Option<f32>,
}

/// Scene baked into a prefiltered environment map
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentDesc {
    /// Clear color of the bake scene
    pub background: Rgb,
    /// Lights of the bake scene
    pub lights: Vec<LightDesc>,
    /// Blur amount applied by the prefilter
    pub sigma: f32,
    /// Near plane of the bake cameras
    pub near: f32,
    /// Far plane of the bake cameras
    pub far: f32,
}

/// Rendering backend contract
///
/// Implementations own every GPU resource. Handles stay valid until
/// [`RenderBackend::destroy_primitive`]; any later use must fail with
/// [`RenderError::UnknownHandle`].
pub trait RenderBackend {
    /// Create an empty transform node
    fn create_group(&mut self) -> RenderResult<EntityHandle>;

    /// Create a renderable primitive, not yet attached to the scene
    fn create_primitive(&mut self, geometry: Geometry, material: Material, surface: Surface) -> RenderResult<EntityHandle>;

    /// Upload an RGBA texture
    fn create_texture(&mut self, image: &TextureImage) -> RenderResult<TextureHandle>;

    /// Attach `child` under `parent`, or under the scene root when `parent` is `None`
    fn attach(&mut self, child: EntityHandle, parent: Option<EntityHandle>) -> RenderResult<()>;

    /// Remove an entity from its parent; it stays alive
    fn detach(&mut self, handle: EntityHandle) -> RenderResult<()>;

    /// Release an entity's geometry and material; the handle becomes invalid
    fn destroy_primitive(&mut self, handle: EntityHandle) -> RenderResult<()>;

    /// Replace an entity's local transform
    fn set_transform(&mut self, handle: EntityHandle, transform: &Transform) -> RenderResult<()>;

    /// Replace an entity's material opacity
    fn set_opacity(&mut self, handle: EntityHandle, opacity: f32) -> RenderResult<()>;

    /// Add a light to the scene
    fn add_light(&mut self, light: &LightDesc) -> RenderResult<()>;

    /// Set clear color and tone-mapping exposure
    fn set_background(&mut self, color: Rgb, exposure: f32) -> RenderResult<()>;

    /// Enable exponential-squared distance fog
    fn set_fog(&mut self, color: Rgb, density: f32) -> RenderResult<()>;

    /// Bake and install the scene environment map
    fn bake_environment(&mut self, environment: &EnvironmentDesc) -> RenderResult<()>;

    /// Resize output buffers
    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) -> RenderResult<()>;

    /// Draw one frame
    fn render(&mut self, camera: &Camera) -> RenderResult<()>;
}
