//! Specialized collection types

pub use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable key for a renderable primitive or group owned by a backend
    pub struct EntityHandle;

    /// Stable key for a texture uploaded to a backend
    pub struct TextureHandle;
}

/// Handle-based map using slot map for stable references
pub type HandleMap<T> = SlotMap<EntityHandle, T>;
