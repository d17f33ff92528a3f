//! Image loading and texture resolution
//!
//! [`ImageData`] decodes image files into RGBA8 pixels. [`TextureResolver`] is the
//! seam the material composer uses to turn a texture-slot file name into a
//! [`Texture`]; [`ImageIo`] is the file-system implementation.

use std::path::{Path, PathBuf};

use crate::assets::AssetError;
use crate::render::Texture;

/// Decoded image data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of color channels (typically 4 for RGBA)
    pub channels: u8,
}

impl ImageData {
    /// Decode an image file into RGBA8
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }

        let decoded = image::open(path)
            .map_err(|e| AssetError::LoadFailed(format!("{}: {}", path.display(), e)))?;
        let image = Self::from_dynamic(decoded);
        log::debug!("Decoded texture {:?} ({}x{})", path, image.width, image.height);
        Ok(image)
    }

    fn from_dynamic(decoded: image::DynamicImage) -> Self {
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            data: rgba.into_raw(),
            width,
            height,
            channels: 4,
        }
    }

    /// Image filled with a single RGBA color
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = width as usize * height as usize;
        Self {
            data: color.repeat(pixel_count),
            width,
            height,
            channels: 4,
        }
    }

    /// RGB of the texel nearest to `uv` (wrapping), normalized to `[0, 1]`
    ///
    /// Channels missing from `data` read as zero.
    pub fn texel(&self, u: f32, v: f32) -> [f32; 3] {
        if self.width == 0 || self.height == 0 {
            return [0.0; 3];
        }
        let x = ((u.rem_euclid(1.0) * self.width as f32) as u32).min(self.width - 1);
        let y = ((v.rem_euclid(1.0) * self.height as f32) as u32).min(self.height - 1);
        let offset = ((y * self.width + x) as usize) * self.channels as usize;
        let channel = |c: usize| {
            if c >= self.channels as usize {
                return 0.0;
            }
            self.data
                .get(offset + c)
                .map_or(0.0, |&byte| f32::from(byte) / 255.0)
        };
        [channel(0), channel(1), channel(2)]
    }

    /// Size of the pixel data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Resolves texture-slot file names to loaded textures
///
/// Implementations either return a texture or report a loading error; the
/// composer never calls a resolver for an empty slot.
pub trait TextureResolver {
    /// Load `file_name`, interpreted relative to `basepath` unless absolute
    fn resolve(&self, basepath: &Path, file_name: &str) -> Result<Texture, AssetError>;
}

/// File-system texture resolver backed by the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageIo;

impl ImageIo {
    /// Create a resolver
    pub fn new() -> Self {
        Self
    }

    /// Full path a texture file name resolves to
    pub fn resolve_path(basepath: &Path, file_name: &str) -> PathBuf {
        let file = Path::new(file_name);
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            basepath.join(file)
        }
    }
}

impl TextureResolver for ImageIo {
    fn resolve(&self, basepath: &Path, file_name: &str) -> Result<Texture, AssetError> {
        let path = Self::resolve_path(basepath, file_name);
        let image = ImageData::from_file(&path)?;
        Ok(Texture::new(file_name, image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_image() {
        let img = ImageData::solid_color(4, 4, [255, 0, 0, 255]);
        assert_eq!(img.width, 4);
        assert_eq!(img.height, 4);
        assert_eq!(img.channels, 4);
        assert_eq!(img.size_bytes(), 4 * 4 * 4);
        assert_eq!(&img.data[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_texel_lookup_wraps() {
        let mut img = ImageData::solid_color(2, 1, [0, 0, 0, 255]);
        img.data[4..8].copy_from_slice(&[255, 255, 0, 255]);
        assert_eq!(img.texel(0.25, 0.0), [0.0, 0.0, 0.0]);
        assert_eq!(img.texel(0.75, 0.0), [1.0, 1.0, 0.0]);
        assert_eq!(img.texel(1.75, 0.5), [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_texel_tolerates_short_data() {
        let gray = ImageData {
            data: vec![255, 128],
            width: 2,
            height: 1,
            channels: 1,
        };
        assert_eq!(gray.texel(0.0, 0.0), [1.0, 0.0, 0.0]);

        let truncated = ImageData {
            data: vec![255, 0, 0, 255],
            width: 2,
            height: 2,
            channels: 4,
        };
        assert_eq!(truncated.texel(0.75, 0.75), [0.0; 3]);
    }

    #[test]
    fn test_resolve_relative_and_absolute_paths() {
        let base = Path::new("/scenes/house");
        assert_eq!(
            ImageIo::resolve_path(base, "tex/wood.png"),
            PathBuf::from("/scenes/house/tex/wood.png")
        );
        assert_eq!(
            ImageIo::resolve_path(base, "/abs/wood.png"),
            PathBuf::from("/abs/wood.png")
        );
    }

    #[test]
    fn test_missing_file_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageIo::new().resolve(dir.path(), "missing.png").unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)));
    }

    #[test]
    fn test_load_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        image::RgbaImage::from_pixel(2, 3, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let texture = ImageIo::new().resolve(dir.path(), "red.png").unwrap();
        assert_eq!(texture.name, "red.png");
        assert_eq!((texture.image.width, texture.image.height), (2, 3));
        assert_eq!(texture.image.texel(0.0, 0.0), [1.0, 0.0, 0.0]);
    }
}
