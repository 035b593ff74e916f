//! Loading textures from the asset directory.
//!
//! Images are decoded with the `image` crate and flipped so that the top of the picture
//! ends up at `v = 1`. An image that cannot be loaded is reported and replaced by a
//! magenta placeholder, so a missing file shows up on screen instead of stopping the
//! demo.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use cgdemo_core::color_key::apply_color_key;
use fxhash::FxHashMap;
use image::RgbaImage;

use crate::abs::{Sampling, Texture, TextureHandle};

const PLACEHOLDER_PIXEL: [u8; 4] = [255, 0, 255, 255];

/// Decodes an image file into bottom-up RGBA8 rows, applying the colour key if given.
pub fn load_rgba(path: &Path, color_key: Option<[u8; 3]>) -> Result<RgbaImage, image::ImageError> {
    let mut image = image::open(path)?.flipv().to_rgba8();
    if let Some(key) = color_key {
        let keyed = apply_color_key(&mut image, key);
        log::debug!("{}: {} pixels keyed out", path.display(), keyed);
    }
    Ok(image)
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    name: String,
    color_key: Option<[u8; 3]>,
    sampling: Sampling,
}

/// Textures loaded from the asset directory, each uploaded once and shared by handle.
pub struct TextureCache {
    gl: Arc<glow::Context>,
    asset_dir: PathBuf,
    textures: FxHashMap<CacheKey, Texture>,
    placeholder: Option<Texture>,
}

impl TextureCache {
    pub fn new(gl: &Arc<glow::Context>, asset_dir: impl Into<PathBuf>) -> Self {
        Self {
            gl: Arc::clone(gl),
            asset_dir: asset_dir.into(),
            textures: FxHashMap::default(),
            placeholder: None,
        }
    }

    /// Returns the texture for `name`, loading it on first use.
    ///
    /// Decoding failures are logged and answered with the placeholder texture. Only a
    /// failure to create GL objects is returned as an error.
    pub fn get_or_load(
        &mut self,
        name: &str,
        color_key: Option<[u8; 3]>,
        sampling: Sampling,
    ) -> Result<TextureHandle, String> {
        let key = CacheKey {
            name: name.to_string(),
            color_key,
            sampling,
        };
        if let Some(texture) = self.textures.get(&key) {
            return Ok(texture.handle());
        }

        let path = self.asset_dir.join(name);
        match load_rgba(&path, color_key) {
            Ok(image) => {
                let texture = Texture::new(&self.gl, &image, sampling)?;
                log::info!(
                    "Loaded texture {} ({}x{})",
                    path.display(),
                    image.width(),
                    image.height()
                );
                let handle = texture.handle();
                self.textures.insert(key, texture);
                Ok(handle)
            }
            Err(e) => {
                log::error!("Failed to load image {}: {}", path.display(), e);
                self.placeholder()
            }
        }
    }

    fn placeholder(&mut self) -> Result<TextureHandle, String> {
        if let Some(texture) = &self.placeholder {
            return Ok(texture.handle());
        }
        let texture = Texture::new_from_data(&self.gl, 1, 1, &PLACEHOLDER_PIXEL, Sampling::Sprite)?;
        let handle = texture.handle();
        self.placeholder = Some(texture);
        Ok(handle)
    }

    /// Number of textures successfully loaded from disk.
    pub fn loaded_count(&self) -> usize {
        self.textures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn load_rgba_flips_and_keys() {
        let mut source = RgbaImage::new(1, 2);
        source.put_pixel(0, 0, Rgba([255, 0, 255, 255]));
        source.put_pixel(0, 1, Rgba([10, 20, 30, 255]));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keyed.png");
        source.save(&path).unwrap();

        let keyed = load_rgba(&path, Some([255, 0, 255])).unwrap();
        let plain = load_rgba(&path, None).unwrap();

        // The top row of the file ends up last.
        assert_eq!(keyed.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
        assert_eq!(keyed.get_pixel(0, 1)[3], 0);
        assert_eq!(plain.get_pixel(0, 1), &Rgba([255, 0, 255, 255]));
    }

    #[test]
    fn load_rgba_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_rgba(&dir.path().join("missing.png"), None).is_err());
    }
}
