//! Post-processing applied to a freshly parsed foreign scene
//!
//! Parser backends receive a [`PostProcess`] flag set and run [`apply`] on their
//! output before handing it to the translator. The importer always uses
//! [`PostProcess::IMPORT`].

use std::collections::HashMap;

use bitflags::bitflags;

use super::foreign::{Face, ForeignMaterial, ForeignMesh, ForeignScene};
use crate::foundation::math::utils::float_key;

bitflags! {
    /// Post-processing steps requested from a parser
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PostProcess: u32 {
        /// Generate tangents and bitangents
        const CALC_TANGENT_SPACE = 1 << 0;
        /// Split polygons into triangles
        const TRIANGULATE = 1 << 1;
        /// Merge vertices with identical attributes
        const JOIN_IDENTICAL_VERTICES = 1 << 2;
        /// Convert to a left-handed coordinate system
        const MAKE_LEFT_HANDED = 1 << 3;
        /// Bake node transforms into world-space vertices
        const PRE_TRANSFORM_VERTICES = 1 << 4;
        /// Merge duplicate materials and drop unused ones
        const REMOVE_REDUNDANT_MATERIALS = 1 << 5;
        /// Merge meshes that share a material
        const OPTIMIZE_MESHES = 1 << 6;
        /// Flip the vertical texture axis
        const FLIP_UVS = 1 << 7;
        /// Reverse triangle winding
        const FLIP_WINDING_ORDER = 1 << 8;
    }
}

impl PostProcess {
    /// Fixed flag set of the import pipeline
    pub const IMPORT: Self = Self::CALC_TANGENT_SPACE
        .union(Self::TRIANGULATE)
        .union(Self::JOIN_IDENTICAL_VERTICES)
        .union(Self::MAKE_LEFT_HANDED)
        .union(Self::PRE_TRANSFORM_VERTICES)
        .union(Self::REMOVE_REDUNDANT_MATERIALS)
        .union(Self::OPTIMIZE_MESHES)
        .union(Self::FLIP_UVS)
        .union(Self::FLIP_WINDING_ORDER);
}

/// Run the generic passes selected by `flags`
///
/// Tangent generation and pre-transformation are left to the backends.
pub fn apply(scene: &mut ForeignScene, flags: PostProcess) {
    if flags.contains(PostProcess::TRIANGULATE) {
        log::trace!("post-process: triangulate");
        scene.meshes.iter_mut().for_each(triangulate);
    }
    if flags.contains(PostProcess::JOIN_IDENTICAL_VERTICES) {
        log::trace!("post-process: join identical vertices");
        scene.meshes.iter_mut().for_each(join_identical_vertices);
    }
    if flags.contains(PostProcess::MAKE_LEFT_HANDED) {
        log::trace!("post-process: make left-handed");
        scene.meshes.iter_mut().for_each(make_left_handed);
    }
    if flags.contains(PostProcess::FLIP_UVS) {
        log::trace!("post-process: flip uvs");
        scene.meshes.iter_mut().for_each(flip_uvs);
    }
    if flags.contains(PostProcess::FLIP_WINDING_ORDER) {
        log::trace!("post-process: flip winding order");
        scene.meshes.iter_mut().for_each(flip_winding_order);
    }
    if flags.contains(PostProcess::REMOVE_REDUNDANT_MATERIALS) {
        log::trace!("post-process: remove redundant materials");
        remove_redundant_materials(scene);
    }
    if flags.contains(PostProcess::OPTIMIZE_MESHES) {
        log::trace!("post-process: optimize meshes");
        optimize_meshes(scene);
    }
}

/// Fan-triangulate polygons; points and lines are dropped
pub fn triangulate(mesh: &mut ForeignMesh) {
    let mut faces = Vec::with_capacity(mesh.faces.len());
    for face in mesh.faces.drain(..) {
        match face.indices.len() {
            0..=2 => {}
            3 => faces.push(face),
            _ => {
                let first = face.indices[0];
                for pair in face.indices[1..].windows(2) {
                    faces.push(Face::triangle(first, pair[0], pair[1]));
                }
            }
        }
    }
    mesh.faces = faces;
}

/// Merge vertices whose position, normal and UVs are bitwise identical
pub fn join_identical_vertices(mesh: &mut ForeignMesh) {
    let vertex_key = |i: usize| -> Vec<u32> {
        let mut key: Vec<u32> = mesh.positions[i].iter().copied().map(float_key).collect();
        if let Some(normal) = mesh.normals.get(i) {
            key.extend(normal.iter().copied().map(float_key));
        }
        for channel in &mesh.uv_channels {
            if let Some(uv) = channel.get(i) {
                key.extend(uv.iter().copied().map(float_key));
            }
        }
        key
    };

    let mut seen: HashMap<Vec<u32>, u32> = HashMap::new();
    let mut remap = Vec::with_capacity(mesh.positions.len());
    let mut kept = Vec::new();
    for i in 0..mesh.positions.len() {
        let next = kept.len() as u32;
        let index = *seen.entry(vertex_key(i)).or_insert(next);
        if index == next {
            kept.push(i);
        }
        remap.push(index);
    }

    if kept.len() == mesh.positions.len() {
        return;
    }

    mesh.positions = pick(&mesh.positions, &kept);
    mesh.normals = pick(&mesh.normals, &kept);
    mesh.uv_channels = mesh.uv_channels.iter().map(|channel| pick(channel, &kept)).collect();
    for face in &mut mesh.faces {
        for index in &mut face.indices {
            if let Some(&mapped) = remap.get(*index as usize) {
                *index = mapped;
            }
        }
    }
}

fn pick<T: Copy>(values: &[T], kept: &[usize]) -> Vec<T> {
    kept.iter().filter_map(|&i| values.get(i).copied()).collect()
}

/// Mirror along z
pub fn make_left_handed(mesh: &mut ForeignMesh) {
    for p in &mut mesh.positions {
        p.z = -p.z;
    }
    for n in &mut mesh.normals {
        n.z = -n.z;
    }
}

/// `v' = 1 - v` on every UV channel
pub fn flip_uvs(mesh: &mut ForeignMesh) {
    for uv in mesh.uv_channels.iter_mut().flatten() {
        uv.y = 1.0 - uv.y;
    }
}

/// Reverse the index order of every face
pub fn flip_winding_order(mesh: &mut ForeignMesh) {
    for face in &mut mesh.faces {
        face.indices.reverse();
    }
}

/// Merge materials with identical content (names ignored), drop materials no mesh
/// references and remap mesh material indices
pub fn remove_redundant_materials(scene: &mut ForeignScene) {
    let mut kept: Vec<ForeignMaterial> = Vec::new();
    let mut remap: HashMap<usize, usize> = HashMap::new();

    for (old_index, material) in scene.materials.iter().enumerate() {
        if !scene.meshes.iter().any(|m| m.material_index == old_index) {
            continue;
        }
        let new_index = match kept.iter().position(|k| k.same_content(material)) {
            Some(existing) => existing,
            None => {
                kept.push(material.clone());
                kept.len() - 1
            }
        };
        remap.insert(old_index, new_index);
    }

    let removed = scene.materials.len() - kept.len();
    if removed > 0 {
        log::debug!("Removed {} redundant material(s)", removed);
    }

    for mesh in &mut scene.meshes {
        if let Some(&new_index) = remap.get(&mesh.material_index) {
            mesh.material_index = new_index;
        }
    }
    scene.materials = kept;
}

/// Merge meshes that use the same material, keeping first-appearance order
pub fn optimize_meshes(scene: &mut ForeignScene) {
    let mut merged: Vec<ForeignMesh> = Vec::new();
    for mesh in scene.meshes.drain(..) {
        match merged.iter_mut().find(|m| m.material_index == mesh.material_index) {
            Some(target) if compatible(target, &mesh) => append_mesh(target, mesh),
            _ => merged.push(mesh),
        }
    }
    scene.meshes = merged;
}

/// Meshes can merge only if they carry the same attribute set
fn compatible(a: &ForeignMesh, b: &ForeignMesh) -> bool {
    a.has_normals() == b.has_normals() && a.uv_channels.len() == b.uv_channels.len()
}

fn append_mesh(target: &mut ForeignMesh, mut source: ForeignMesh) {
    let offset = target.positions.len() as u32;
    target.positions.append(&mut source.positions);
    target.normals.append(&mut source.normals);
    for (channel, mut uvs) in target.uv_channels.iter_mut().zip(source.uv_channels) {
        channel.append(&mut uvs);
    }
    target.faces.extend(source.faces.into_iter().map(|mut face| {
        face.indices.iter_mut().for_each(|i| *i += offset);
        face
    }));
}
