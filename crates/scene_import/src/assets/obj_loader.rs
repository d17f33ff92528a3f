//! Wavefront OBJ/MTL parser backend built on `tobj`

use std::collections::HashMap;
use std::path::Path;

use super::foreign::{keys, Face, ForeignMaterial, ForeignMesh, ForeignScene, TextureUsage};
use super::parser::{ParseError, SceneParser};
use super::post_process::{self, PostProcess};
use crate::foundation::math::{Vec2, Vec3};

/// Name given to the material of meshes that reference none
pub const DEFAULT_MATERIAL_NAME: &str = "DefaultMaterial";

/// OBJ scene parser
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjParser;

impl ObjParser {
    /// Create a parser
    pub fn new() -> Self {
        Self
    }

    fn convert_mesh(model: tobj::Model, material_count: usize, fallback: &mut Option<usize>) -> ForeignMesh {
        let mesh = model.mesh;

        let positions: Vec<Vec3> = mesh
            .positions
            .chunks_exact(3)
            .map(|v| Vec3::new(v[0], v[1], v[2]))
            .collect();
        let normals: Vec<Vec3> = mesh
            .normals
            .chunks_exact(3)
            .map(|n| Vec3::new(n[0], n[1], n[2]))
            .collect();
        let uv_channels = if mesh.texcoords.is_empty() {
            Vec::new()
        } else {
            vec![mesh
                .texcoords
                .chunks_exact(2)
                .map(|t| Vec2::new(t[0], t[1]))
                .collect()]
        };

        // No arities means every face is a triangle
        let faces = if mesh.face_arities.is_empty() {
            mesh.indices
                .chunks_exact(3)
                .map(|t| Face::triangle(t[0], t[1], t[2]))
                .collect()
        } else {
            let mut faces = Vec::with_capacity(mesh.face_arities.len());
            let mut start = 0usize;
            for &arity in &mesh.face_arities {
                let end = start + arity as usize;
                if let Some(indices) = mesh.indices.get(start..end) {
                    faces.push(Face {
                        indices: indices.to_vec(),
                    });
                }
                start = end;
            }
            faces
        };

        let material_index = match mesh.material_id {
            Some(id) if id < material_count => id,
            _ => *fallback.get_or_insert(material_count),
        };

        ForeignMesh {
            name: model.name,
            positions,
            normals,
            uv_channels,
            faces,
            material_index,
        }
    }

    fn convert_material(material: tobj::Material) -> ForeignMaterial {
        let mut out = ForeignMaterial::named(material.name);

        let colors = [
            (keys::COLOR_AMBIENT, material.ambient),
            (keys::COLOR_DIFFUSE, material.diffuse),
            (keys::COLOR_SPECULAR, material.specular),
        ];
        for (key, value) in colors {
            if let Some(rgb) = value {
                out.set_color(key, Vec3::from(rgb));
            }
        }
        if let Some(shininess) = material.shininess {
            out.set_float(keys::SHININESS, shininess);
        }
        if let Some(ior) = material.optical_density {
            out.set_float(keys::REFRACTI, ior);
        }

        let textures = [
            (TextureUsage::Ambient, material.ambient_texture),
            (TextureUsage::Diffuse, material.diffuse_texture),
            (TextureUsage::Specular, material.specular_texture),
            // `map_Bump`/`bump` hold height maps; tangent-space maps come from `norm`
            (TextureUsage::Height, material.normal_texture),
            (TextureUsage::Shininess, material.shininess_texture),
            (TextureUsage::Opacity, material.dissolve_texture),
        ];
        for (usage, file) in textures {
            if let Some(file) = file {
                out.add_texture(usage, file);
            }
        }

        Self::convert_extensions(&mut out, material.dissolve, &material.unknown_param);
        out
    }

    /// Statements `tobj` leaves in its unknown-parameter map
    fn convert_extensions<S: std::hash::BuildHasher>(
        out: &mut ForeignMaterial,
        dissolve: Option<f32>,
        params: &HashMap<String, String, S>,
    ) {
        if let Some(color) = params.get("Ke").and_then(|v| parse_color(v)) {
            out.set_color(keys::COLOR_EMISSIVE, color);
        }
        if let Some(color) = params.get("Tf").and_then(|v| parse_color(v)) {
            out.set_color(keys::COLOR_TRANSPARENT, color);
        }
        if let Some(file) = params.get("map_Ke") {
            out.add_texture(TextureUsage::Emissive, file.trim());
        }
        if let Some(file) = params.get("norm") {
            out.add_texture(TextureUsage::Normals, file.trim());
        }
        if let Some(file) = params.get("disp") {
            out.add_texture(TextureUsage::Height, file.trim());
        }

        let transparency = params.get("Tr").and_then(|v| v.trim().parse::<f32>().ok());
        let opacity = dissolve.or_else(|| transparency.map(|tr| 1.0 - tr));
        if let Some(opacity) = opacity {
            out.set_float(keys::OPACITY, opacity);
        }
    }
}

/// Parse `r [g b]`; a single value is used for all three channels
fn parse_color(value: &str) -> Option<Vec3> {
    let components: Vec<f32> = value
        .split_whitespace()
        .map(str::parse::<f32>)
        .collect::<Result<_, _>>()
        .ok()?;
    match components.as_slice() {
        [v] => Some(Vec3::repeat(*v)),
        [r, g, b, ..] => Some(Vec3::new(*r, *g, *b)),
        _ => None,
    }
}

impl SceneParser for ObjParser {
    fn parse(&self, path: &Path, flags: PostProcess) -> Result<ForeignScene, ParseError> {
        let options = tobj::LoadOptions {
            single_index: true,
            triangulate: false,
            ..Default::default()
        };
        let (models, materials) = tobj::load_obj(path, &options)
            .map_err(|e| ParseError::new(path, e.to_string()))?;

        let materials = materials.unwrap_or_else(|e| {
            log::warn!("No usable material library for {:?}: {}", path, e);
            Vec::new()
        });

        let mut scene = ForeignScene {
            meshes: Vec::with_capacity(models.len()),
            materials: materials.into_iter().map(Self::convert_material).collect(),
        };

        let material_count = scene.materials.len();
        let mut fallback = None;
        scene.meshes = models
            .into_iter()
            .map(|model| Self::convert_mesh(model, material_count, &mut fallback))
            .collect();
        if fallback.is_some() {
            scene.materials.push(ForeignMaterial::named(DEFAULT_MATERIAL_NAME));
        }

        post_process::apply(&mut scene, flags);

        log::debug!(
            "Parsed {:?}: {} mesh(es), {} material(s)",
            path,
            scene.meshes.len(),
            scene.materials.len()
        );
        Ok(scene)
    }
}
