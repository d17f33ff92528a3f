//! Import driver: parse, compose materials, convert meshes, assemble the scene

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::foreign::{ForeignMesh, ForeignScene};
use super::image_loader::{ImageIo, TextureResolver};
use super::materials::{MaterialCache, MaterialComposer};
use super::parser::SceneParser;
use super::post_process::PostProcess;
use super::ImportError;
use crate::config::ImportConfig;
use crate::foundation::math::{Vec2, Vec3};
use crate::render::{LayeredMaterial, Light, Mesh, Scene};

/// Translates files read by a [`SceneParser`] into render [`Scene`]s
///
/// Every [`import`](Self::import) call owns its own material cache; nothing is
/// shared between calls.
#[derive(Debug, Clone, Default)]
pub struct SceneTranslator<P, R = ImageIo> {
    parser: P,
    resolver: R,
    config: ImportConfig,
}

impl<P: SceneParser> SceneTranslator<P> {
    /// Translator resolving textures from the file system with default settings
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            resolver: ImageIo::new(),
            config: ImportConfig::default(),
        }
    }
}

impl<P: SceneParser, R: TextureResolver> SceneTranslator<P, R> {
    /// Replace the texture resolver
    pub fn with_resolver<T: TextureResolver>(self, resolver: T) -> SceneTranslator<P, T> {
        SceneTranslator {
            parser: self.parser,
            resolver,
            config: self.config,
        }
    }

    /// Replace the import settings
    pub fn with_config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    /// Import settings in use
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Parser backend
    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Texture resolver
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Import the scene file at `path`
    ///
    /// Textures are resolved relative to `basepath`, falling back to the
    /// configured default and then to the directory containing `path`.
    pub fn import(&self, path: &Path, basepath: Option<&Path>) -> Result<Scene, ImportError> {
        let basepath = self.basepath(path, basepath);
        log::info!("Importing scene {:?}", path);

        let foreign = self.parser.parse(path, PostProcess::IMPORT)?;
        let mut scene = Scene::new();

        let materials = self.compose_materials(&foreign, &basepath, &mut scene)?;
        for foreign_mesh in &foreign.meshes {
            let mesh = Self::convert_mesh(foreign_mesh, &materials, &mut scene)?;
            scene.attach_mesh(mesh);
        }

        scene.attach_light(Light::import_default());

        log::info!(
            "Imported {:?}: {} mesh(es), {} material(s), {} emissive, {} texture(s)",
            path,
            scene.meshes().len(),
            scene.materials().len(),
            scene.emissive_materials().len(),
            scene.texture_count()
        );
        Ok(scene)
    }

    fn basepath(&self, path: &Path, basepath: Option<&Path>) -> PathBuf {
        basepath
            .map(Path::to_path_buf)
            .or_else(|| self.config.default_basepath.clone())
            .or_else(|| path.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Composed material per foreign material, indexed like the foreign array
    fn compose_materials(
        &self,
        foreign: &ForeignScene,
        basepath: &Path,
        scene: &mut Scene,
    ) -> Result<Vec<Arc<LayeredMaterial>>, ImportError> {
        let composer = MaterialComposer::new(self.config.clone());
        let mut cache = MaterialCache::new();
        let mut composed = Vec::with_capacity(foreign.materials.len());

        for material in &foreign.materials {
            let layered = cache.get_or_create(material.name(), || {
                composer.compose(material, basepath, &self.resolver, scene)
            })?;
            scene.add_material(&layered);
            if layered.has_emission() {
                scene.track_emissive(&layered);
            }
            composed.push(layered);
        }

        Ok(composed)
    }

    fn convert_mesh(
        foreign: &ForeignMesh,
        materials: &[Arc<LayeredMaterial>],
        scene: &mut Scene,
    ) -> Result<Mesh, ImportError> {
        let material = materials
            .get(foreign.material_index)
            .ok_or_else(|| ImportError::MaterialIndexOutOfRange {
                mesh: foreign.name.clone(),
                index: foreign.material_index,
                count: materials.len(),
            })?;
        let vertex_count = foreign.vertex_count();

        let normals = if foreign.has_normals() {
            foreign.normals.clone()
        } else {
            log::warn!("Mesh '{}' has no normals; using zero vectors", foreign.name);
            vec![Vec3::zeros(); vertex_count]
        };
        let uvs = match foreign.uv_channel(0) {
            Some(uvs) => uvs.to_vec(),
            None => {
                log::warn!("Mesh '{}' has no texture coordinates; using zeros", foreign.name);
                vec![Vec2::zeros(); vertex_count]
            }
        };

        let mut indices = Vec::with_capacity(foreign.faces.len() * 3);
        let mut skipped = 0usize;
        for face in &foreign.faces {
            if face.indices.len() == 3 {
                indices.extend_from_slice(&face.indices);
            } else {
                skipped += 1;
            }
        }
        if skipped > 0 {
            log::warn!("Mesh '{}': skipped {} non-triangular face(s)", foreign.name, skipped);
        }

        let material_index = scene.add_material(material);
        Mesh::new(
            foreign.name.clone(),
            foreign.positions.clone(),
            normals,
            uvs,
            indices,
            material_index,
            Arc::clone(material),
        )
        .map_err(|source| ImportError::Mesh {
            name: foreign.name.clone(),
            source,
        })
    }
}
