//! Output scene container

use std::sync::Arc;

use slotmap::SlotMap;

use super::lighting::Light;
use super::material::LayeredMaterial;
use super::mesh::Mesh;
use super::texture::{Texture, TextureHandle};

/// Imported scene: meshes, the materials they share, lights and textures
#[derive(Debug, Default)]
pub struct Scene {
    meshes: Vec<Mesh>,
    materials: Vec<Arc<LayeredMaterial>>,
    emissive_materials: Vec<Arc<LayeredMaterial>>,
    lights: Vec<Light>,
    textures: SlotMap<TextureHandle, Texture>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a mesh
    pub fn attach_mesh(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }

    /// Attach a light
    pub fn attach_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Add a material, returning its index
    ///
    /// Adding a material instance that is already present returns the existing
    /// index.
    pub fn add_material(&mut self, material: &Arc<LayeredMaterial>) -> usize {
        if let Some(index) = self.materials.iter().position(|m| Arc::ptr_eq(m, material)) {
            return index;
        }
        self.materials.push(Arc::clone(material));
        self.materials.len() - 1
    }

    /// Record a material in the emissive set (no-op if already recorded)
    pub fn track_emissive(&mut self, material: &Arc<LayeredMaterial>) {
        if !self.emissive_materials.iter().any(|m| Arc::ptr_eq(m, material)) {
            self.emissive_materials.push(Arc::clone(material));
        }
    }

    /// Attach a texture, returning its handle
    pub fn attach_texture(&mut self, texture: Texture) -> TextureHandle {
        self.textures.insert(texture)
    }

    /// Handle of a texture previously attached under `name`
    pub fn find_texture(&self, name: &str) -> Option<TextureHandle> {
        self.textures
            .iter()
            .find(|(_, texture)| texture.name == name)
            .map(|(handle, _)| handle)
    }

    /// Texture by handle
    pub fn texture(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.get(handle)
    }

    /// Meshes in attachment order
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Distinct materials referenced by the meshes
    pub fn materials(&self) -> &[Arc<LayeredMaterial>] {
        &self.materials
    }

    /// Materials with an active emission layer
    pub fn emissive_materials(&self) -> &[Arc<LayeredMaterial>] {
        &self.emissive_materials
    }

    /// Lights in attachment order
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Number of attached textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}
