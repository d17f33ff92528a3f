//! Renderer-side scene representation
//!
//! These are the containers imported data lands in: meshes with parallel vertex
//! attributes, layered materials whose inputs are expression trees, lights and
//! scene-owned textures.

pub mod input;
pub mod lighting;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod texture;

pub use input::InputExpression;
pub use lighting::Light;
pub use material::{LayeredMaterial, LayeredMaterialBuilder, MaterialInput, MaterialLayers};
pub use mesh::{Mesh, MeshError};
pub use scene::Scene;
pub use texture::{Texture, TextureHandle};
