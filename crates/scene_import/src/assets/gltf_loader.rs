//! glTF 2.0 parser backend built on the `gltf` crate

use std::path::Path;

use gltf::mesh::Mode;

use super::foreign::{keys, Face, ForeignMaterial, ForeignMesh, ForeignScene, TextureUsage};
use super::obj_loader::DEFAULT_MATERIAL_NAME;
use super::parser::{ParseError, SceneParser};
use super::post_process::{self, PostProcess};
use crate::foundation::math::{utils, Mat4, Vec2, Vec3};

/// glTF/GLB scene parser
#[derive(Debug, Clone, Copy, Default)]
pub struct GltfParser;

/// Geometry gathering state for one document
struct MeshCollector<'a> {
    buffers: &'a [gltf::buffer::Data],
    default_material: usize,
    uses_default: bool,
    pre_transform: bool,
    meshes: Vec<ForeignMesh>,
}

impl GltfParser {
    /// Create a parser
    pub fn new() -> Self {
        Self
    }

    fn convert_material(material: &gltf::Material<'_>, index: usize) -> ForeignMaterial {
        let name = material
            .name()
            .map_or_else(|| format!("material{index}"), str::to_string);
        let mut out = ForeignMaterial::named(name);

        let pbr = material.pbr_metallic_roughness();
        let [r, g, b, a] = pbr.base_color_factor();
        out.set_color(keys::COLOR_DIFFUSE, Vec3::new(r, g, b))
            .set_float(keys::OPACITY, a);
        if let Some(file) = pbr
            .base_color_texture()
            .and_then(|info| texture_file(&info.texture(), info.tex_coord()))
        {
            out.add_texture(TextureUsage::Diffuse, file);
        }

        let emissive = Vec3::from(material.emissive_factor());
        if emissive != Vec3::zeros() {
            out.set_color(keys::COLOR_EMISSIVE, emissive);
        }
        if let Some(file) = material
            .emissive_texture()
            .and_then(|info| texture_file(&info.texture(), info.tex_coord()))
        {
            out.add_texture(TextureUsage::Emissive, file);
        }
        if let Some(file) = material
            .normal_texture()
            .and_then(|normal| texture_file(&normal.texture(), normal.tex_coord()))
        {
            out.add_texture(TextureUsage::Normals, file);
        }
        if let Some(ior) = material.ior() {
            out.set_float(keys::REFRACTI, ior);
        }

        out
    }
}

/// File name of an external texture image
///
/// Meshes only carry `TEXCOORD_0`, so textures mapped through another set are
/// sampled with the wrong coordinates.
fn texture_file(texture: &gltf::Texture<'_>, tex_coord: u32) -> Option<String> {
    if tex_coord != 0 {
        log::warn!(
            "Texture {} uses TEXCOORD_{}; only TEXCOORD_0 is imported",
            texture.index(),
            tex_coord
        );
    }
    match texture.source().source() {
        gltf::image::Source::Uri { uri, .. } if !uri.starts_with("data:") => Some(uri.to_string()),
        _ => {
            log::warn!(
                "Texture {} is embedded; only external image files are supported",
                texture.index()
            );
            None
        }
    }
}

impl MeshCollector<'_> {
    fn visit(&mut self, node: &gltf::Node<'_>, parent: &Mat4) {
        let world = parent * Mat4::from(node.transform().matrix());
        if let Some(mesh) = node.mesh() {
            self.collect_mesh(&mesh, &world);
        }
        for child in node.children() {
            self.visit(&child, &world);
        }
    }

    fn collect_mesh(&mut self, mesh: &gltf::Mesh<'_>, world: &Mat4) {
        let name = mesh
            .name()
            .map_or_else(|| format!("mesh{}", mesh.index()), str::to_string);
        let buffers = self.buffers;

        for primitive in mesh.primitives() {
            if primitive.mode() != Mode::Triangles {
                log::warn!(
                    "Skipping primitive {} of mesh '{}': unsupported mode {:?}",
                    primitive.index(),
                    name,
                    primitive.mode()
                );
                continue;
            }

            let reader = primitive
                .reader(move |buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
            let Some(positions) = reader.read_positions() else {
                log::warn!("Skipping primitive {} of mesh '{}': no positions", primitive.index(), name);
                continue;
            };
            let mut positions: Vec<Vec3> = positions.map(Vec3::from).collect();
            let mut normals: Vec<Vec3> = reader
                .read_normals()
                .map(|iter| iter.map(Vec3::from).collect())
                .unwrap_or_default();
            let uv_channels: Vec<Vec<Vec2>> = reader
                .read_tex_coords(0)
                .map(|iter| vec![iter.into_f32().map(Vec2::from).collect()])
                .unwrap_or_default();

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };
            let faces = indices
                .chunks_exact(3)
                .map(|t| Face::triangle(t[0], t[1], t[2]))
                .collect();

            if self.pre_transform {
                let normal_matrix = utils::normal_matrix(world);
                for p in &mut positions {
                    *p = utils::transform_point(world, p);
                }
                for n in &mut normals {
                    *n = (normal_matrix * *n).normalize();
                }
            }

            let material_index = primitive.material().index().unwrap_or_else(|| {
                self.uses_default = true;
                self.default_material
            });

            self.meshes.push(ForeignMesh {
                name: name.clone(),
                positions,
                normals,
                uv_channels,
                faces,
                material_index,
            });
        }
    }
}

impl SceneParser for GltfParser {
    fn parse(&self, path: &Path, flags: PostProcess) -> Result<ForeignScene, ParseError> {
        // Images are left to the texture resolver
        let gltf::Gltf { document, blob } =
            gltf::Gltf::open(path).map_err(|e| ParseError::new(path, e.to_string()))?;
        let buffers = gltf::import_buffers(&document, path.parent(), blob)
            .map_err(|e| ParseError::new(path, e.to_string()))?;

        let mut materials: Vec<ForeignMaterial> = document
            .materials()
            .enumerate()
            .map(|(index, material)| Self::convert_material(&material, index))
            .collect();

        let mut collector = MeshCollector {
            buffers: &buffers,
            default_material: materials.len(),
            uses_default: false,
            pre_transform: flags.contains(PostProcess::PRE_TRANSFORM_VERTICES),
            meshes: Vec::new(),
        };

        let scene = document.default_scene().or_else(|| document.scenes().next());
        match scene {
            Some(scene) => {
                for node in scene.nodes() {
                    collector.visit(&node, &Mat4::identity());
                }
            }
            None => {
                for mesh in document.meshes() {
                    collector.collect_mesh(&mesh, &Mat4::identity());
                }
            }
        }

        if collector.uses_default {
            materials.push(ForeignMaterial::named(DEFAULT_MATERIAL_NAME));
        }

        let mut scene = ForeignScene {
            meshes: collector.meshes,
            materials,
        };
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
