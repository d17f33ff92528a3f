//! # Scene Import
//!
//! Translates scenes read by third-party format parsers into a render scene of
//! triangle meshes and layered materials.
//!
//! ## Features
//!
//! - **Layered Materials**: Foreign material properties mapped onto emission,
//!   refraction, reflection, shading-normal and diffuse layers
//! - **Expression Graphs**: Layer inputs built from constants, texture samplers,
//!   gamma and remap nodes
//! - **Format Backends**: Wavefront OBJ/MTL and glTF 2.0
//! - **Material Deduplication**: One material per source name per import
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_import::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     scene_import::foundation::logging::init();
//!
//!     let registry = LoaderRegistry::with_default_loaders(&ImportConfig::default());
//!     let scene = registry.load_scene(Path::new("models/house.obj"), None)?;
//!     for mesh in scene.meshes() {
//!         println!("{}: {:?}", mesh.name(), mesh.material().layers());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod render;
pub mod assets;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        assets::{
            GltfParser, ImportError, LoaderRegistry, ObjParser, SceneLoader, SceneParser,
            SceneTranslator, TextureResolver,
        },
        config::{Config, ImportConfig},
        foundation::math::{Vec2, Vec3},
        render::{
            InputExpression, LayeredMaterial, Light, MaterialInput, MaterialLayers, Mesh, Scene,
        },
    };
}
