//! Headless backend that records scene state instead of drawing
//!
//! Used by the demo application and tests to observe exactly what the
//! animation layer asked for: which entities exist, where they hang in the
//! scene graph, their latest transform and opacity, and how many frames were
//! rendered.

use slotmap::SlotMap;

use super::{
    Camera, EntityHandle, EnvironmentDesc, Geometry, LightDesc, Material, RenderBackend,
    RenderError, RenderResult, Surface, TextureHandle, TextureImage,
};
use crate::foundation::collections::HandleMap;
use crate::foundation::math::{Rgb, Transform};

/// What an entity is
#[derive(Debug, Clone)]
pub enum RecordedKind {
    /// Transform-only node
    Group,
    /// Drawable primitive
    Primitive {
        /// Geometry as created
        geometry: Geometry,
        /// Material as created
        material: Material,
    },
}

/// Recorded state of one entity
#[derive(Debug, Clone)]
pub struct RecordedEntity {
    /// Entity category
    pub kind: RecordedKind,
    /// Whether the entity is in the scene graph
    pub attached: bool,
    /// Parent node, `None` for the scene root
    pub parent: Option<EntityHandle>,
    /// Latest local transform
    pub transform: Transform,
    /// Blending flags as created
    pub surface: Surface,
    /// Latest opacity
    pub opacity: f32,
}

/// Headless [`RenderBackend`]
#[derive(Debug, Default)]
pub struct RecordingBackend {
    entities: HandleMap<RecordedEntity>,
    textures: SlotMap<TextureHandle, (u32, u32)>,
    lights: Vec<LightDesc>,
    background: Option<(Rgb, f32)>,
    fog: Option<(Rgb, f32)>,
    environment: Option<EnvironmentDesc>,
    viewport: (u32, u32, f32),
    render_count: u64,
    destroyed_count: u64,
    vertex_count: usize,
}

impl RecordingBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a live entity
    pub fn entity(&self, handle: EntityHandle) -> Option<&RecordedEntity> {
        self.entities.get(handle)
    }

    /// Whether a handle is still live
    pub fn is_live(&self, handle: EntityHandle) -> bool {
        self.entities.contains_key(handle)
    }

    /// Number of live entities, groups included
    pub fn live_count(&self) -> usize {
        self.entities.len()
    }

    /// Live entities currently attached under `parent`
    pub fn children_of(&self, parent: Option<EntityHandle>) -> Vec<EntityHandle> {
        self.entities
            .iter()
            .filter(|(_, entity)| entity.attached && entity.parent == parent)
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Number of primitives released so far
    pub fn destroyed_count(&self) -> u64 {
        self.destroyed_count
    }

    /// Number of textures uploaded
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Lights added so far
    pub fn lights(&self) -> &[LightDesc] {
        &self.lights
    }

    /// Background color and exposure
    pub fn background(&self) -> Option<(Rgb, f32)> {
        self.background
    }

    /// Fog color and density
    pub fn fog(&self) -> Option<(Rgb, f32)> {
        self.fog
    }

    /// Vertices of every primitive created so far, where the count is known up front
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Last environment bake request
    pub fn environment(&self) -> Option<&EnvironmentDesc> {
        self.environment.as_ref()
    }

    /// Last viewport (width, height, pixel ratio)
    pub fn viewport(&self) -> (u32, u32, f32) {
        self.viewport
    }

    /// Frames rendered so far
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    fn entity_mut(&mut self, handle: EntityHandle) -> RenderResult<&mut RecordedEntity> {
        self.entities.get_mut(handle).ok_or(RenderError::UnknownHandle(handle))
    }

    fn insert(&mut self, kind: RecordedKind, surface: Surface) -> EntityHandle {
        self.entities.insert(RecordedEntity {
            kind,
            attached: false,
            parent: None,
            transform: Transform::identity(),
            surface,
            opacity: surface.opacity,
        })
    }
}

impl RenderBackend for RecordingBackend {
    fn create_group(&mut self) -> RenderResult<EntityHandle> {
        Ok(self.insert(RecordedKind::Group, Surface::default()))
    }

    fn create_primitive(&mut self, geometry: Geometry, material: Material, surface: Surface) -> RenderResult<EntityHandle> {
        let vertices = geometry.vertex_count();
        match (&geometry, vertices) {
            (Geometry::LineStrip { .. }, Some(count)) if count < 2 => {
                return Err(RenderError::InvalidGeometry("line strip needs two points".to_string()));
            }
            (_, Some(0)) => return Err(RenderError::InvalidGeometry("geometry has no vertices".to_string())),
            _ => {}
        }
        if let Material::Standard { texture: Some(texture), .. } = &material {
            if !self.textures.contains_key(*texture) {
                return Err(RenderError::UnknownTexture(*texture));
            }
        }
        self.vertex_count += vertices.unwrap_or(0);
        Ok(self.insert(RecordedKind::Primitive { geometry, material }, surface))
    }

    fn create_texture(&mut self, image: &TextureImage) -> RenderResult<TextureHandle> {
        Ok(self.textures.insert((image.width(), image.height())))
    }

    fn attach(&mut self, child: EntityHandle, parent: Option<EntityHandle>) -> RenderResult<()> {
        if let Some(parent) = parent {
            if !self.entities.contains_key(parent) {
                return Err(RenderError::UnknownHandle(parent));
            }
        }
        let entity = self.entity_mut(child)?;
        entity.attached = true;
        entity.parent = parent;
        Ok(())
    }

    fn detach(&mut self, handle: EntityHandle) -> RenderResult<()> {
        let entity = self.entity_mut(handle)?;
        entity.attached = false;
        entity.parent = None;
        Ok(())
    }

    fn destroy_primitive(&mut self, handle: EntityHandle) -> RenderResult<()> {
        self.entities.remove(handle).ok_or(RenderError::UnknownHandle(handle))?;
        self.destroyed_count += 1;
        Ok(())
    }

    fn set_transform(&mut self, handle: EntityHandle, transform: &Transform) -> RenderResult<()> {
        self.entity_mut(handle)?.transform = *transform;
        Ok(())
    }

    fn set_opacity(&mut self, handle: EntityHandle, opacity: f32) -> RenderResult<()> {
        self.entity_mut(handle)?.opacity = opacity;
        Ok(())
    }

    fn add_light(&mut self, light: &LightDesc) -> RenderResult<()> {
        self.lights.push(light.clone());
        Ok(())
    }

    fn set_background(&mut self, color: Rgb, exposure: f32) -> RenderResult<()> {
        self.background = Some((color, exposure));
        Ok(())
    }

    fn set_fog(&mut self, color: Rgb, density: f32) -> RenderResult<()> {
        self.fog = Some((color, density));
        Ok(())
    }

    fn bake_environment(&mut self, environment: &EnvironmentDesc) -> RenderResult<()> {
        self.environment = Some(environment.clone());
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) -> RenderResult<()> {
        self.viewport = (width, height, pixel_ratio);
        Ok(())
    }

    fn render(&mut self, _camera: &Camera) -> RenderResult<()> {
        self.render_count += 1;
        log::trace!("Recorded frame {} with {} live entities", self.render_count, self.entities.len());
        Ok(())
    }
}
