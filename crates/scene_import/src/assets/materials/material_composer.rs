//! Maps foreign material records onto the layered material model
//!
//! Each layer is decided independently from the source properties and bound
//! through [`InputExpression`] trees:
//!
//! - Emission when the emissive color is non-zero, from the emissive texture if
//!   one is present and the constant color otherwise
//! - Refraction when the index of refraction exceeds
//!   [`PROPERTY_EPSILON`](crate::foundation::math::PROPERTY_EPSILON)
//! - Reflection whenever the (fixed) reflectivity exceeds the same epsilon
//! - Shading normal when a normal map is present
//! - Diffuse always, from the diffuse texture or the diffuse color
//!
//! Texture-backed color inputs are gamma corrected when the import
//! configuration asks for it.

use std::path::Path;

use crate::assets::foreign::{keys, ForeignMaterial, TextureUsage};
use crate::assets::image_loader::TextureResolver;
use crate::assets::ImportError;
use crate::config::ImportConfig;
use crate::foundation::math::{utils, Vec3};
use crate::render::{InputExpression, LayeredMaterial, MaterialInput, Scene, TextureHandle};

/// IOR bound on the refraction and reflection layers
pub const DEFAULT_IOR: f32 = 1.5;
/// Roughness of the refraction layer
pub const REFRACTION_ROUGHNESS: f32 = 0.01;
/// Roughness of the reflection layer (near mirror)
pub const REFLECTION_ROUGHNESS: f32 = 1e-6;
/// Reflectivity used for every material; the source value is not read
pub const DEFAULT_REFLECTIVITY: f32 = 1.0;
/// Diffuse color of materials without diffuse color or texture
pub const DEFAULT_DIFFUSE: [f32; 3] = [0.0, 0.0, 1.0];
/// Metalness vector of the reflection layer
pub const REFLECTION_METALNESS: [f32; 3] = [1.0, 0.0, 0.0];
/// Reflection color when no specular texture is present
pub const REFLECTION_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
/// Remap source range of tangent-space normal maps
pub const NORMAL_REMAP_FROM: [f32; 3] = [0.0, 1.0, 0.0];
/// Remap target range of tangent-space normal maps
pub const NORMAL_REMAP_TO: [f32; 3] = [-1.0, 1.0, 0.0];

/// Composes [`LayeredMaterial`]s from foreign material records
#[derive(Debug, Clone, Default)]
pub struct MaterialComposer {
    config: ImportConfig,
}

impl MaterialComposer {
    /// Create a composer with the given settings
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    /// Import settings in use
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Compose one material
    ///
    /// Textures are resolved relative to `basepath` and attached to `scene`; a
    /// texture already attached under the same file name is reused. Empty slots
    /// fall back to constants, but a slot whose file fails to load is an error.
    pub fn compose(
        &self,
        material: &ForeignMaterial,
        basepath: &Path,
        resolver: &dyn TextureResolver,
        scene: &mut Scene,
    ) -> Result<LayeredMaterial, ImportError> {
        let mut textures = TextureLoader {
            material,
            basepath,
            resolver,
            scene,
        };
        let mut builder = LayeredMaterial::builder(material.name());

        let emission = material.color(keys::COLOR_EMISSIVE).unwrap_or_else(Vec3::zeros);
        if emission.norm_squared() > 0.0 {
            let value = match textures.load(TextureUsage::Emissive)? {
                Some(texture) => self.color_texture(texture),
                None => InputExpression::constant_float3(emission),
            };
            builder.set_input(MaterialInput::EmissionColor, value);
        }

        let refracti = material.float(keys::REFRACTI).unwrap_or(0.0);
        if utils::is_active(refracti) {
            let transmission = material
                .color(keys::COLOR_TRANSPARENT)
                .unwrap_or_else(Vec3::zeros);
            builder
                .set_input(MaterialInput::RefractionIor, InputExpression::constant_float(DEFAULT_IOR))
                .set_input(
                    MaterialInput::RefractionRoughness,
                    InputExpression::constant_float(REFRACTION_ROUGHNESS),
                )
                .set_input(
                    MaterialInput::RefractionColor,
                    InputExpression::constant_float3(transmission),
                );
        }

        if utils::is_active(DEFAULT_REFLECTIVITY) {
            builder
                .set_input(MaterialInput::ReflectionIor, InputExpression::constant_float(DEFAULT_IOR))
                .set_input(
                    MaterialInput::ReflectionRoughness,
                    InputExpression::constant_float(REFLECTION_ROUGHNESS),
                )
                .set_input(
                    MaterialInput::ReflectionMetalness,
                    InputExpression::constant_float3(Vec3::from(REFLECTION_METALNESS)),
                );
            let color = match textures.load(TextureUsage::Specular)? {
                Some(texture) => self.color_texture(texture),
                None => InputExpression::constant_float3(Vec3::from(REFLECTION_COLOR)),
            };
            builder.set_input(MaterialInput::ReflectionColor, color);
        }

        if let Some(texture) = textures.load(TextureUsage::Normals)? {
            builder.set_input(
                MaterialInput::ShadingNormal,
                InputExpression::remap(
                    Vec3::from(NORMAL_REMAP_FROM),
                    Vec3::from(NORMAL_REMAP_TO),
                    InputExpression::bump_sampler(texture),
                ),
            );
        }

        let diffuse = match textures.load(TextureUsage::Diffuse)? {
            Some(texture) => self.color_texture(texture),
            None => InputExpression::constant_float3(
                material
                    .color(keys::COLOR_DIFFUSE)
                    .unwrap_or_else(|| Vec3::from(DEFAULT_DIFFUSE)),
            ),
        };
        builder.set_input(MaterialInput::DiffuseColor, diffuse);

        log::debug!("Composed material '{}' with layers {:?}", material.name(), builder.layers());
        Ok(builder.build())
    }

    fn color_texture(&self, texture: TextureHandle) -> InputExpression {
        let gamma = self.config.apply_gamma.then_some(self.config.gamma);
        InputExpression::color_texture(texture, gamma)
    }
}

/// Resolves the first texture slot of a usage, reusing scene textures by name
struct TextureLoader<'a> {
    material: &'a ForeignMaterial,
    basepath: &'a Path,
    resolver: &'a dyn TextureResolver,
    scene: &'a mut Scene,
}

impl TextureLoader<'_> {
    fn load(&mut self, usage: TextureUsage) -> Result<Option<TextureHandle>, ImportError> {
        let Some(name) = self.material.texture(usage, 0) else {
            return Ok(None);
        };
        if let Some(handle) = self.scene.find_texture(name) {
            return Ok(Some(handle));
        }

        let texture = self
            .resolver
            .resolve(self.basepath, name)
            .map_err(|source| ImportError::Texture {
                name: name.to_string(),
                source,
            })?;
        Ok(Some(self.scene.attach_texture(texture)))
    }
}
