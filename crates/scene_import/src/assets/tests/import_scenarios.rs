use std::fs;
use std::path::Path;
use std::sync::Arc;

use approx::assert_relative_eq;

use super::{material, triangle, FakeParser, FakeResolver};
use crate::assets::foreign::{keys, Face, ForeignScene, TextureUsage};
use crate::assets::{ImportError, ObjParser, PostProcess, SceneTranslator};
use crate::config::ImportConfig;
use crate::foundation::logging;
use crate::foundation::math::{Vec2, Vec3};
use crate::render::{InputExpression, Light, MaterialInput, MaterialLayers};

fn translator(scene: ForeignScene) -> SceneTranslator<FakeParser, FakeResolver> {
    SceneTranslator::new(FakeParser::returning(scene)).with_resolver(FakeResolver::default())
}

#[test]
fn test_single_emissive_triangle() {
    logging::init_for_tests();

    let mut lamp = material("Lamp");
    lamp.set_color(keys::COLOR_EMISSIVE, Vec3::new(2.0, 2.0, 2.0));
    let foreign = ForeignScene {
        meshes: vec![triangle("Bulb", 0)],
        materials: vec![lamp],
    };

    let translator = translator(foreign);
    let scene = translator.import(Path::new("lamp.fbx"), None).unwrap();

    assert_eq!(scene.meshes().len(), 1);
    assert_eq!(scene.materials().len(), 1);

    let mesh = &scene.meshes()[0];
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.indices(), &[0, 1, 2]);
    assert_eq!(mesh.material_index(), 0);

    let composed = mesh.material();
    assert!(composed
        .layers()
        .contains(MaterialLayers::EMISSION | MaterialLayers::DIFFUSE));
    assert_eq!(
        composed.input_by_name("emission.color"),
        Some(&InputExpression::ConstantFloat3(Vec3::new(2.0, 2.0, 2.0)))
    );
    assert_eq!(scene.emissive_materials().len(), 1);
    assert!(Arc::ptr_eq(&scene.emissive_materials()[0], composed));

    assert_eq!(scene.lights().len(), 1);
    let Light::Directional { direction, radiance } = &scene.lights()[0];
    assert_relative_eq!(*direction, Vec3::new(0.1, -1.0, -0.1));
    assert_relative_eq!(*radiance, Vec3::new(1.0, 1.0, 1.0));

    assert_eq!(translator.parser().flags.get(), Some(PostProcess::IMPORT));
}

#[test]
fn test_empty_scene_still_gets_light() {
    let scene = translator(ForeignScene::default())
        .import(Path::new("empty.fbx"), None)
        .unwrap();
    assert!(scene.meshes().is_empty());
    assert!(scene.materials().is_empty());
    assert_eq!(scene.lights(), &[Light::import_default()]);
}

#[test]
fn test_parser_failure_is_reported() {
    let translator = SceneTranslator::new(FakeParser::default()).with_resolver(FakeResolver::default());
    let err = translator.import(Path::new("broken.fbx"), None).unwrap_err();
    match err {
        ImportError::Parse(parse) => {
            assert_eq!(parse.path, Path::new("broken.fbx"));
            assert_eq!(parse.message, "unexpected end of file");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_same_name_materials_share_one_instance() {
    let mut red = material("Paint");
    red.set_color(keys::COLOR_DIFFUSE, Vec3::x());
    let mut green = material("Paint");
    green.set_color(keys::COLOR_DIFFUSE, Vec3::y());

    let foreign = ForeignScene {
        meshes: vec![triangle("A", 0), triangle("B", 1)],
        materials: vec![red, green],
    };
    let scene = translator(foreign).import(Path::new("paint.fbx"), None).unwrap();

    let [a, b] = scene.meshes() else {
        panic!("expected two meshes");
    };
    assert!(Arc::ptr_eq(a.material(), b.material()));
    assert_eq!(scene.materials().len(), 1);
    assert_eq!(a.material_index(), b.material_index());
    assert_eq!(
        a.material().input(MaterialInput::DiffuseColor),
        Some(&InputExpression::ConstantFloat3(Vec3::x()))
    );
}

#[test]
fn test_every_material_has_diffuse() {
    let mut textured = material("Textured");
    textured.add_texture(TextureUsage::Diffuse, "wood.png");
    let foreign = ForeignScene {
        meshes: vec![triangle("A", 0), triangle("B", 1)],
        materials: vec![material("Bare"), textured],
    };
    let scene = translator(foreign).import(Path::new("mixed.fbx"), None).unwrap();

    for composed in scene.materials() {
        assert!(composed.layers().contains(MaterialLayers::DIFFUSE));
        assert!(composed.input(MaterialInput::DiffuseColor).is_some());
    }
    assert_eq!(scene.texture_count(), 1);
}

#[test]
fn test_material_index_out_of_range() {
    let foreign = ForeignScene {
        meshes: vec![triangle("Orphan", 3)],
        materials: vec![material("Only")],
    };
    let err = translator(foreign).import(Path::new("orphan.fbx"), None).unwrap_err();
    assert!(matches!(
        err,
        ImportError::MaterialIndexOutOfRange { index: 3, count: 1, .. }
    ));
}

#[test]
fn test_missing_attributes_are_zero_filled() {
    let mut mesh = triangle("Bare", 0);
    mesh.normals.clear();
    mesh.uv_channels.clear();
    let foreign = ForeignScene {
        meshes: vec![mesh],
        materials: vec![material("Plain")],
    };

    let scene = translator(foreign).import(Path::new("bare.fbx"), None).unwrap();
    let mesh = &scene.meshes()[0];
    assert_eq!(mesh.normals(), &[Vec3::zeros(); 3]);
    assert_eq!(mesh.uvs(), &[Vec2::zeros(); 3]);
}

#[test]
fn test_non_triangle_faces_are_skipped() {
    let mut mesh = triangle("Mixed", 0);
    mesh.faces.push(Face { indices: vec![0, 1] });
    let foreign = ForeignScene {
        meshes: vec![mesh],
        materials: vec![material("Plain")],
    };

    let scene = translator(foreign).import(Path::new("mixed.fbx"), None).unwrap();
    assert_eq!(scene.meshes()[0].triangle_count(), 1);
}

#[test]
fn test_out_of_range_vertex_index_is_rejected() {
    let mut mesh = triangle("Bad", 0);
    mesh.faces.push(Face::triangle(0, 1, 9));
    let foreign = ForeignScene {
        meshes: vec![mesh],
        materials: vec![material("Plain")],
    };

    let err = translator(foreign).import(Path::new("bad.fbx"), None).unwrap_err();
    assert!(matches!(err, ImportError::Mesh { ref name, .. } if name == "Bad"));
}

#[test]
fn test_texture_basepath_selection() {
    let mut textured = material("Textured");
    textured.add_texture(TextureUsage::Diffuse, "wood.png");
    let foreign = ForeignScene {
        meshes: vec![triangle("A", 0)],
        materials: vec![textured],
    };
    let translator = translator(foreign);

    translator
        .import(Path::new("/scenes/house/house.fbx"), None)
        .unwrap();
    translator
        .import(Path::new("/scenes/house/house.fbx"), Some(Path::new("/textures")))
        .unwrap();
    let translator = translator.with_config(ImportConfig {
        default_basepath: Some("/shared".into()),
        ..ImportConfig::default()
    });
    translator
        .import(Path::new("/scenes/house/house.fbx"), None)
        .unwrap();

    let seen = translator.resolver().basepaths.borrow();
    assert_eq!(
        seen.as_slice(),
        [
            Path::new("/scenes/house").to_path_buf(),
            Path::new("/textures").to_path_buf(),
            Path::new("/shared").to_path_buf(),
        ]
    );
}

#[test]
fn test_obj_file_end_to_end() {
    logging::init_for_tests();

    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("quad.obj"),
        "mtllib quad.mtl\n\
         o Quad\n\
         v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
         vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\n\
         vn 0 0 1\n\
         usemtl Glass\n\
         f 1/1/1 2/2/1 3/3/1 4/4/1\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("quad.mtl"),
        "newmtl Glass\nKd 0.5 0.5 0.5\nNi 1.45\n",
    )
    .unwrap();

    let scene = SceneTranslator::new(ObjParser::new())
        .import(&dir.path().join("quad.obj"), None)
        .unwrap();

    assert_eq!(scene.meshes().len(), 1);
    let mesh = &scene.meshes()[0];
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangle_count(), 2);
    assert_eq!(mesh.material().name(), "Glass");
    assert!(mesh
        .material()
        .layers()
        .contains(MaterialLayers::REFRACTION | MaterialLayers::DIFFUSE));
    assert_eq!(
        mesh.material().input(MaterialInput::DiffuseColor),
        Some(&InputExpression::ConstantFloat3(Vec3::repeat(0.5)))
    );
    assert!(scene.emissive_materials().is_empty());
    assert_eq!(scene.lights().len(), 1);
}
