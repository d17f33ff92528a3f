//! Import scenarios driven through fake collaborators and on-disk fixtures

mod import_scenarios;

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use crate::assets::foreign::{Face, ForeignMaterial, ForeignMesh, ForeignScene};
use crate::assets::{AssetError, ImageData, ParseError, PostProcess, SceneParser, TextureResolver};
use crate::foundation::math::{Vec2, Vec3};
use crate::render::Texture;

/// Parser returning a canned scene, or failing when none is set
#[derive(Default)]
pub(crate) struct FakeParser {
    pub scene: Option<ForeignScene>,
    pub flags: Cell<Option<PostProcess>>,
}

impl FakeParser {
    pub fn returning(scene: ForeignScene) -> Self {
        Self {
            scene: Some(scene),
            flags: Cell::new(None),
        }
    }
}

impl SceneParser for FakeParser {
    fn parse(&self, path: &Path, flags: PostProcess) -> Result<ForeignScene, ParseError> {
        self.flags.set(Some(flags));
        self.scene
            .clone()
            .ok_or_else(|| ParseError::new(path, "unexpected end of file"))
    }
}

/// Resolver producing 1x1 textures and recording the base paths it saw
#[derive(Default)]
pub(crate) struct FakeResolver {
    pub basepaths: RefCell<Vec<PathBuf>>,
}

impl TextureResolver for FakeResolver {
    fn resolve(&self, basepath: &Path, file_name: &str) -> Result<Texture, AssetError> {
        self.basepaths.borrow_mut().push(basepath.to_path_buf());
        Ok(Texture::new(file_name, ImageData::solid_color(1, 1, [128, 128, 128, 255])))
    }
}

/// Single triangle with normals and one UV channel
pub(crate) fn triangle(name: &str, material_index: usize) -> ForeignMesh {
    ForeignMesh {
        name: name.to_string(),
        positions: vec![Vec3::zeros(), Vec3::x(), Vec3::y()],
        normals: vec![Vec3::z(); 3],
        uv_channels: vec![vec![Vec2::zeros(), Vec2::x(), Vec2::y()]],
        faces: vec![Face::triangle(0, 1, 2)],
        material_index,
    }
}

pub(crate) fn material(name: &str) -> ForeignMaterial {
    ForeignMaterial::named(name)
}
