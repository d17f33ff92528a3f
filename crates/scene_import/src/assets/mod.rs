//! Scene import: parser backends, material translation and scene assembly

pub mod foreign;
pub mod gltf_loader;
pub mod image_loader;
pub mod materials;
pub mod obj_loader;
pub mod parser;
pub mod post_process;
pub mod registry;
pub mod scene_translator;

pub use foreign::{ForeignMaterial, ForeignMesh, ForeignScene, TextureUsage};
pub use gltf_loader::GltfParser;
pub use image_loader::{ImageData, ImageIo, TextureResolver};
pub use materials::{MaterialCache, MaterialComposer};
pub use obj_loader::ObjParser;
pub use parser::{ParseError, SceneParser};
pub use post_process::PostProcess;
pub use registry::{LoaderRegistry, SceneLoader};
pub use scene_translator::SceneTranslator;

#[cfg(test)]
mod tests;

use thiserror::Error;

use crate::render::MeshError;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors of a scene import call
#[derive(Error, Debug)]
pub enum ImportError {
    /// The parser rejected the file
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A texture referenced by a material could not be loaded
    #[error("Failed to load texture '{name}': {source}")]
    Texture {
        /// File name from the texture slot
        name: String,
        /// Underlying asset error
        #[source]
        source: AssetError,
    },

    /// A mesh references a material the parser did not produce
    #[error("Mesh '{mesh}' references material {index}, but only {count} exist")]
    MaterialIndexOutOfRange {
        /// Mesh name
        mesh: String,
        /// Referenced material index
        index: usize,
        /// Number of parsed materials
        count: usize,
    },

    /// Mesh data could not be assembled
    #[error("Invalid mesh '{name}': {source}")]
    Mesh {
        /// Mesh name
        name: String,
        /// Underlying mesh error
        #[source]
        source: MeshError,
    },

    /// No loader is registered for the file extension
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
