//! Vendor-neutral scene record produced by the parser backends
//!
//! The record mirrors what general-purpose scene parsers expose: meshes as
//! parallel vertex arrays plus polygon faces, and materials as a bag of typed
//! properties queried by key with texture slots grouped by usage. It is read by
//! the translator and discarded after the import call.

use std::collections::BTreeMap;

use crate::foundation::math::{Vec2, Vec3};

/// Well-known material property keys
pub mod keys {
    /// Material name (string)
    pub const NAME: &str = "?mat.name";
    /// Diffuse color
    pub const COLOR_DIFFUSE: &str = "$clr.diffuse";
    /// Specular color
    pub const COLOR_SPECULAR: &str = "$clr.specular";
    /// Ambient color
    pub const COLOR_AMBIENT: &str = "$clr.ambient";
    /// Emissive color
    pub const COLOR_EMISSIVE: &str = "$clr.emissive";
    /// Transparent/transmission filter color
    pub const COLOR_TRANSPARENT: &str = "$clr.transparent";
    /// Reflective color
    pub const COLOR_REFLECTIVE: &str = "$clr.reflective";
    /// Specular exponent
    pub const SHININESS: &str = "$mat.shininess";
    /// Opacity (1 = opaque)
    pub const OPACITY: &str = "$mat.opacity";
    /// Reflectivity scalar
    pub const REFLECTIVITY: &str = "$mat.reflectivity";
    /// Index of refraction
    pub const REFRACTI: &str = "$mat.refracti";
}

/// Typed material property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Scalar
    Float(f32),
    /// RGB color
    Color(Vec3),
    /// Text
    String(String),
}

/// Usage category of a texture slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextureUsage {
    /// Diffuse/base color
    Diffuse,
    /// Specular color
    Specular,
    /// Ambient color
    Ambient,
    /// Emitted color
    Emissive,
    /// Tangent-space normal map
    Normals,
    /// Height/bump map
    Height,
    /// Specular exponent
    Shininess,
    /// Opacity/transparency
    Opacity,
}

/// Material record of the foreign scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForeignMaterial {
    properties: BTreeMap<String, PropertyValue>,
    textures: BTreeMap<TextureUsage, Vec<String>>,
}

impl ForeignMaterial {
    /// Create a material carrying only a name
    pub fn named(name: impl Into<String>) -> Self {
        let mut material = Self::default();
        material.set_string(keys::NAME, name);
        material
    }

    /// Material name; empty when the record has none
    pub fn name(&self) -> &str {
        self.string(keys::NAME).unwrap_or_default()
    }

    /// Raw property by key
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Color property; absent if missing or not a color
    pub fn color(&self, key: &str) -> Option<Vec3> {
        match self.properties.get(key) {
            Some(PropertyValue::Color(color)) => Some(*color),
            _ => None,
        }
    }

    /// Scalar property; absent if missing or not a scalar
    pub fn float(&self, key: &str) -> Option<f32> {
        match self.properties.get(key) {
            Some(PropertyValue::Float(value)) => Some(*value),
            _ => None,
        }
    }

    /// String property; absent if missing or not a string
    pub fn string(&self, key: &str) -> Option<&str> {
        match self.properties.get(key) {
            Some(PropertyValue::String(value)) => Some(value),
            _ => None,
        }
    }

    /// File name in texture slot `index` of `usage`
    pub fn texture(&self, usage: TextureUsage, index: usize) -> Option<&str> {
        self.textures
            .get(&usage)
            .and_then(|slots| slots.get(index))
            .map(String::as_str)
    }

    /// Number of texture slots of `usage`
    pub fn texture_count(&self, usage: TextureUsage) -> usize {
        self.textures.get(&usage).map_or(0, Vec::len)
    }

    /// Set a scalar property
    pub fn set_float(&mut self, key: &str, value: f32) -> &mut Self {
        self.properties.insert(key.to_string(), PropertyValue::Float(value));
        self
    }

    /// Set a color property
    pub fn set_color(&mut self, key: &str, value: Vec3) -> &mut Self {
        self.properties.insert(key.to_string(), PropertyValue::Color(value));
        self
    }

    /// Set a string property
    pub fn set_string(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.properties
            .insert(key.to_string(), PropertyValue::String(value.into()));
        self
    }

    /// Append a texture slot of `usage`
    pub fn add_texture(&mut self, usage: TextureUsage, file_name: impl Into<String>) -> &mut Self {
        self.textures.entry(usage).or_default().push(file_name.into());
        self
    }

    /// Whether two records are identical apart from their names
    pub fn same_content(&self, other: &Self) -> bool {
        let without_name = |m: &Self| {
            m.properties
                .iter()
                .filter(|(key, _)| key.as_str() != keys::NAME)
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect::<Vec<_>>()
        };
        self.textures == other.textures && without_name(self) == without_name(other)
    }
}

/// Polygon face as indices into the mesh's vertex arrays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    /// Vertex indices (three after triangulation)
    pub indices: Vec<u32>,
}

impl Face {
    /// Triangle face
    pub fn triangle(a: u32, b: u32, c: u32) -> Self {
        Self {
            indices: vec![a, b, c],
        }
    }
}

/// Mesh record of the foreign scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForeignMesh {
    /// Mesh name
    pub name: String,
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Vertex normals; empty when the source has none
    pub normals: Vec<Vec3>,
    /// Texture coordinate channels, each parallel to `positions`
    pub uv_channels: Vec<Vec<Vec2>>,
    /// Faces
    pub faces: Vec<Face>,
    /// Index into [`ForeignScene::materials`]
    pub material_index: usize,
}

impl ForeignMesh {
    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Whether normals are present for every vertex
    pub fn has_normals(&self) -> bool {
        !self.positions.is_empty() && self.normals.len() == self.positions.len()
    }

    /// Texture coordinates of `channel`, if present for every vertex
    pub fn uv_channel(&self, channel: usize) -> Option<&[Vec2]> {
        self.uv_channels
            .get(channel)
            .filter(|uvs| uvs.len() == self.positions.len())
            .map(Vec::as_slice)
    }
}

/// Scene record handed over by a parser backend
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForeignScene {
    /// Meshes
    pub meshes: Vec<ForeignMesh>,
    /// Materials referenced by index from the meshes
    pub materials: Vec<ForeignMaterial>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_queries() {
        let mut material = ForeignMaterial::named("Brick");
        material
            .set_color(keys::COLOR_DIFFUSE, Vec3::new(0.5, 0.2, 0.1))
            .set_float(keys::REFRACTI, 1.3)
            .add_texture(TextureUsage::Diffuse, "brick.png");

        assert_eq!(material.name(), "Brick");
        assert_eq!(material.color(keys::COLOR_DIFFUSE), Some(Vec3::new(0.5, 0.2, 0.1)));
        assert_eq!(material.float(keys::REFRACTI), Some(1.3));
        // Wrong type reads as absent
        assert_eq!(material.float(keys::COLOR_DIFFUSE), None);
        assert_eq!(material.color(keys::COLOR_EMISSIVE), None);
        assert_eq!(material.texture(TextureUsage::Diffuse, 0), Some("brick.png"));
        assert_eq!(material.texture(TextureUsage::Diffuse, 1), None);
        assert_eq!(material.texture(TextureUsage::Normals, 0), None);
        assert_eq!(material.texture_count(TextureUsage::Diffuse), 1);
    }

    #[test]
    fn test_unnamed_material_has_empty_name() {
        assert_eq!(ForeignMaterial::default().name(), "");
    }

    #[test]
    fn test_same_content_ignores_name() {
        let mut a = ForeignMaterial::named("A");
        a.set_float(keys::SHININESS, 10.0);
        let mut b = ForeignMaterial::named("B");
        b.set_float(keys::SHININESS, 10.0);
        assert!(a.same_content(&b));

        b.add_texture(TextureUsage::Specular, "spec.png");
        assert!(!a.same_content(&b));
    }

    #[test]
    fn test_uv_channel_requires_full_length() {
        let mesh = ForeignMesh {
            positions: vec![Vec3::zeros(); 3],
            uv_channels: vec![vec![Vec2::zeros(); 2]],
            ..Default::default()
        };
        assert!(mesh.uv_channel(0).is_none());
        assert!(mesh.uv_channel(1).is_none());
        assert!(!mesh.has_normals());
    }
}
