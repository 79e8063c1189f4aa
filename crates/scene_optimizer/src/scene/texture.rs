//! Texture identity registry
//!
//! Materials reference textures by stable identity only; pixel content is
//! never inspected or hashed. The registry is an explicit, caller-owned
//! instance with caller-controlled lifetime rather than a process-wide cache,
//! so two registries never alias each other's handles.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable identity of a registered texture
    ///
    /// Fingerprints hash this handle, not the texture's content.
    pub struct TextureHandle;
}

/// Descriptive metadata for a registered texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Human-readable name, usually the source path
    pub name: String,
    /// Width in texels
    pub width: u32,
    /// Height in texels
    pub height: u32,
}

impl TextureDesc {
    /// Create a texture description
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }
}

/// Caller-owned registry assigning stable identities to textures
#[derive(Debug, Default)]
pub struct TextureRegistry {
    textures: SlotMap<TextureHandle, TextureDesc>,
}

impl TextureRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture and return its stable handle
    pub fn register(&mut self, desc: TextureDesc) -> TextureHandle {
        self.textures.insert(desc)
    }

    /// Look up a texture description by handle
    pub fn get(&self, handle: TextureHandle) -> Option<&TextureDesc> {
        self.textures.get(handle)
    }

    /// Remove a texture, invalidating its handle
    pub fn remove(&mut self, handle: TextureHandle) -> Option<TextureDesc> {
        self.textures.remove(handle)
    }

    /// Number of registered textures
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
