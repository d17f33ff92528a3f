//! Scene-owned textures

use crate::assets::ImageData;

slotmap::new_key_type! {
    /// Stable reference to a texture owned by a [`Scene`](super::Scene)
    pub struct TextureHandle;
}

/// Texture attached to a scene
#[derive(Debug, Clone)]
pub struct Texture {
    /// Name the texture was requested under (as written in the source material)
    pub name: String,
    /// Decoded pixel data
    pub image: ImageData,
}

impl Texture {
    /// Create a texture
    pub fn new(name: impl Into<String>, image: ImageData) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }
}
