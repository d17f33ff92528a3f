//! Format registry dispatching scene loads by file extension
//!
//! Loaders are registered explicitly by whoever owns the registry; nothing
//! registers itself on construction.

use std::collections::HashMap;
use std::path::Path;

use super::gltf_loader::GltfParser;
use super::image_loader::TextureResolver;
use super::obj_loader::ObjParser;
use super::parser::SceneParser;
use super::scene_translator::SceneTranslator;
use super::ImportError;
use crate::config::ImportConfig;
use crate::render::Scene;

/// Something that can load a scene file
pub trait SceneLoader {
    /// Load the scene at `path`, resolving textures relative to `basepath`
    fn load_scene(&self, path: &Path, basepath: Option<&Path>) -> Result<Scene, ImportError>;
}

impl<P: SceneParser, R: TextureResolver> SceneLoader for SceneTranslator<P, R> {
    fn load_scene(&self, path: &Path, basepath: Option<&Path>) -> Result<Scene, ImportError> {
        self.import(path, basepath)
    }
}

/// Scene loaders keyed by format tag (lowercase file extension)
#[derive(Default)]
pub struct LoaderRegistry {
    loaders: HashMap<String, Box<dyn SceneLoader>>,
}

impl LoaderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the OBJ and glTF loaders
    pub fn with_default_loaders(config: &ImportConfig) -> Self {
        let mut registry = Self::new();
        registry.register("obj", SceneTranslator::new(ObjParser::new()).with_config(config.clone()));
        registry.register("gltf", SceneTranslator::new(GltfParser::new()).with_config(config.clone()));
        registry.register("glb", SceneTranslator::new(GltfParser::new()).with_config(config.clone()));
        registry
    }

    /// Register `loader` under `tag`, returning the loader it replaces
    pub fn register(
        &mut self,
        tag: &str,
        loader: impl SceneLoader + 'static,
    ) -> Option<Box<dyn SceneLoader>> {
        log::debug!("Registering scene loader for '{}'", tag);
        self.loaders.insert(tag.to_ascii_lowercase(), Box::new(loader))
    }

    /// Remove the loader registered under `tag`
    pub fn unregister(&mut self, tag: &str) -> Option<Box<dyn SceneLoader>> {
        self.loaders.remove(&tag.to_ascii_lowercase())
    }

    /// Loader registered under `tag`
    pub fn loader(&self, tag: &str) -> Option<&dyn SceneLoader> {
        self.loaders.get(&tag.to_ascii_lowercase()).map(Box::as_ref)
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.loaders.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Load `path` with the loader registered for its extension
    pub fn load_scene(&self, path: &Path, basepath: Option<&Path>) -> Result<Scene, ImportError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let loader = self
            .loader(extension)
            .ok_or_else(|| ImportError::UnsupportedFormat(path.display().to_string()))?;
        loader.load_scene(path, basepath)
    }
}

impl std::fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}
