//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct, which owns a GPU texture, and the
//! [`TextureHandle`] struct, a copyable non-owning reference to one.

use std::{num::NonZero, sync::Arc};

use glow::HasContext;
use image::RgbaImage;

/// How a texture is sampled outside of the `[0, 1]` range and between texels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sampling {
    /// Clamped edges and linear filtering, for sprites and sprite sheets.
    Sprite,
    /// Repeating, mipmapped and linearly filtered, for surfaces.
    Surface,
}

/// Represents a handle to a texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub NonZero<u32>);

impl TextureHandle {
    /// Binds the texture handle to the specified texture unit.
    pub fn bind(&self, gl: &glow::Context, unit: u32) {
        unsafe {
            gl.active_texture(glow::TEXTURE0 + unit);
            gl.bind_texture(glow::TEXTURE_2D, Some(glow::NativeTexture(self.0)));
        }
    }
}

/// Represents a texture stored on the GPU side.
pub struct Texture {
    gl: Arc<glow::Context>,
    id: glow::Texture,
}

impl Texture {
    /// Uploads an RGBA8 image. The first row of the image becomes `v = 0`.
    pub fn new(gl: &Arc<glow::Context>, image: &RgbaImage, sampling: Sampling) -> Result<Self, String> {
        let (width, height) = image.dimensions();
        Self::new_from_data(gl, width, height, image.as_raw(), sampling)
    }

    /// Creates a new texture from the given raw RGBA data.
    pub fn new_from_data(
        gl: &Arc<glow::Context>,
        width: u32,
        height: u32,
        data: &[u8],
        sampling: Sampling,
    ) -> Result<Self, String> {
        unsafe {
            let texture = gl.create_texture()?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(data)),
            );

            let (wrap, min_filter) = match sampling {
                Sampling::Sprite => (glow::CLAMP_TO_EDGE, glow::LINEAR),
                Sampling::Surface => {
                    gl.generate_mipmap(glow::TEXTURE_2D);
                    (glow::REPEAT, glow::LINEAR_MIPMAP_LINEAR)
                }
            };
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, min_filter as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                gl: Arc::clone(gl),
                id: texture,
            })
        }
    }

    /// Returns a handle to the texture.
    pub fn handle(&self) -> TextureHandle {
        TextureHandle(self.id.0)
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
    }
}
