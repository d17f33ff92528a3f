//! Mesh representation for imported geometry
//!
//! Vertex attributes are stored as parallel arrays (one entry per vertex) and
//! triangles as a flat list of 32-bit indices.

use std::sync::Arc;

use thiserror::Error;

use super::material::LayeredMaterial;
use crate::foundation::math::{Vec2, Vec3};

/// Mesh invariant violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Attribute arrays of different lengths
    #[error("attribute count mismatch: {positions} positions, {normals} normals, {uvs} uvs")]
    AttributeMismatch {
        /// Position count
        positions: usize,
        /// Normal count
        normals: usize,
        /// UV count
        uvs: usize,
    },

    /// Index list does not describe whole triangles
    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    /// Index pointing past the vertex arrays
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index
        index: u32,
        /// Vertex count of the mesh
        vertex_count: usize,
    },
}

/// Triangle mesh bound to one material
///
/// The material is shared with every other mesh that uses it.
#[derive(Debug, Clone)]
pub struct Mesh {
    name: String,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    indices: Vec<u32>,
    material_index: usize,
    material: Arc<LayeredMaterial>,
}

impl Mesh {
    /// Create a mesh, checking attribute and index consistency
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        uvs: Vec<Vec2>,
        indices: Vec<u32>,
        material_index: usize,
        material: Arc<LayeredMaterial>,
    ) -> Result<Self, MeshError> {
        if positions.len() != normals.len() || positions.len() != uvs.len() {
            return Err(MeshError::AttributeMismatch {
                positions: positions.len(),
                normals: normals.len(),
                uvs: uvs.len(),
            });
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: positions.len(),
            });
        }

        Ok(Self {
            name: name.into(),
            positions,
            normals,
            uvs,
            indices,
            material_index,
            material,
        })
    }

    /// Mesh name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Vertex positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Vertex normals
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Vertex texture coordinates (first channel)
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    /// Triangle indices, three per triangle
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Index of the material in the owning scene's material list
    pub fn material_index(&self) -> usize {
        self.material_index
    }

    /// Bound material
    pub fn material(&self) -> &Arc<LayeredMaterial> {
        &self.material
    }
}
