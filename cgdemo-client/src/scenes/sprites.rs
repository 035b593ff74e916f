//! The 2D sprite demo: a background, two still sprites and two animated asteroids.

use std::{rc::Rc, sync::Arc};

use anyhow::Context;
use cgdemo_core::{config::DemoConfig, sprite::SpriteAnimation};
use glam::Mat4;
use glow::HasContext;
use sdl2::keyboard::Keycode;

use crate::{
    abs::{Mesh, Sampling, ShaderProgram, TextureHandle},
    assets::TextureCache,
    input::UpdateContext,
    render::{quad_vertices, sprite_quad},
    shader_program,
};

/// The [`SpriteScene`] struct represents the sprite demo.
pub struct SpriteScene {
    gl: Arc<glow::Context>,
    shader: ShaderProgram,
    quad: Mesh,
    sprites: Vec<SpriteAnimation<TextureHandle>>,
    /// Owns the GL textures the sprites refer to by handle.
    _textures: TextureCache,
    projection: Mat4,
}

impl SpriteScene {
    /// Loads every configured sprite. Images that fail to load are drawn with the
    /// placeholder texture.
    pub fn new(gl: &Arc<glow::Context>, config: &Rc<DemoConfig>) -> anyhow::Result<Self> {
        let shader = shader_program!(sprite, gl, "..")
            .map_err(anyhow::Error::msg)
            .context("Failed to build the sprite shader")?;
        let quad = sprite_quad(gl).map_err(anyhow::Error::msg)?;

        let mut textures = TextureCache::new(gl, &config.asset_dir);
        let sprites = config
            .sprites
            .iter()
            .map(|sprite| {
                let key = sprite.color_key.then_some(config.color_key);
                let texture = textures.get_or_load(&sprite.texture, key, Sampling::Sprite)?;
                Ok(sprite.animation(texture))
            })
            .collect::<Result<Vec<_>, String>>()
            .map_err(anyhow::Error::msg)?;

        log::info!(
            "Sprite demo ready: {} sprites from {} textures",
            sprites.len(),
            textures.loaded_count()
        );

        // The view always spans the configured window size, centred on the origin.
        let half_width = config.window.width as f32 / 2.0;
        let half_height = config.window.height as f32 / 2.0;
        let projection =
            Mat4::orthographic_rh_gl(-half_width, half_width, -half_height, half_height, -1.0, 1.0);

        Ok(Self {
            gl: Arc::clone(gl),
            shader,
            quad,
            sprites,
            _textures: textures,
            projection,
        })
    }
}

impl super::Scene for SpriteScene {
    fn update(&mut self, ctx: &UpdateContext, _sdl: &sdl2::Sdl) -> super::SceneSwitch {
        if ctx.keyboard.pressed.contains(&Keycode::Escape) {
            return super::SceneSwitch::Quit;
        }
        if ctx.keyboard.pressed.contains(&Keycode::Tab) {
            return super::SceneSwitch::Next;
        }

        for sprite in &mut self.sprites {
            sprite.advance(ctx.delta_time);
        }
        super::SceneSwitch::None
    }

    fn render(&mut self) {
        unsafe {
            self.gl.disable(glow::DEPTH_TEST);
            self.gl.enable(glow::BLEND);
            self.gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            self.gl.clear_color(0.0, 0.0, 0.0, 1.0);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }

        self.shader.use_program();
        self.shader.set_uniform("u_projection", self.projection);
        self.shader.set_uniform("u_view", Mat4::IDENTITY);
        self.shader.set_uniform("u_texture", 0i32);

        for sprite in &self.sprites {
            self.quad.update_vertices(&quad_vertices(sprite.current_uv()));
            self.shader.set_uniform("u_model", sprite.model_matrix());
            sprite.texture.bind(&self.gl, 0);
            self.quad.draw();
        }
    }
}
