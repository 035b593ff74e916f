//! The 3D demo: a textured OBJ model at the end of a corridor, seen through a fly
//! camera.

use std::{rc::Rc, sync::Arc};

use anyhow::Context;
use cgdemo_core::{camera::FlyCamera, config::DemoConfig, obj::load_obj};
use glam::{Mat4, Vec3};
use glow::HasContext;
use sdl2::keyboard::Keycode;

use crate::{
    abs::{Mesh, Sampling, ShaderProgram, TextureHandle},
    assets::TextureCache,
    input::UpdateContext,
    render::corridor_meshes,
    shader_program,
};

/// The [`ModelScene`] struct represents the model demo.
pub struct ModelScene {
    gl: Arc<glow::Context>,
    shader: ShaderProgram,
    model: Mesh,
    walls: Mesh,
    floor: Mesh,
    model_texture: TextureHandle,
    floor_texture: TextureHandle,
    _textures: TextureCache,
    model_position: Vec3,
    clear_color: [f32; 4],
    camera: FlyCamera,
    width: u32,
    height: u32,
    /// Whether the mouse is captured and steering the camera.
    captured: bool,
}

impl ModelScene {
    /// Loads the configured model and textures. A model that cannot be read or parsed
    /// is an error.
    pub fn new(
        gl: &Arc<glow::Context>,
        config: &Rc<DemoConfig>,
        (width, height): (u32, u32),
    ) -> anyhow::Result<Self> {
        let shader = shader_program!(model, gl, "..")
            .map_err(anyhow::Error::msg)
            .context("Failed to build the model shader")?;

        let mesh_path = config.asset_path(&config.model.mesh);
        let mesh = load_obj(&mesh_path)
            .with_context(|| format!("Failed to load model {}", mesh_path.display()))?;
        let (vertices, indices) = mesh.to_vertices();
        let model = Mesh::new(gl, &vertices, &indices, glow::TRIANGLES).map_err(anyhow::Error::msg)?;
        let (walls, floor) = corridor_meshes(gl).map_err(anyhow::Error::msg)?;

        let mut textures = TextureCache::new(gl, &config.asset_dir);
        let model_texture = textures
            .get_or_load(&config.model.texture, None, Sampling::Surface)
            .map_err(anyhow::Error::msg)?;
        let floor_texture = textures
            .get_or_load(&config.model.floor_texture, None, Sampling::Surface)
            .map_err(anyhow::Error::msg)?;

        log::info!(
            "Model demo ready: {} triangles from {}",
            mesh.triangle_count(),
            mesh_path.display()
        );

        Ok(Self {
            gl: Arc::clone(gl),
            shader,
            model,
            walls,
            floor,
            model_texture,
            floor_texture,
            _textures: textures,
            model_position: config.model.position,
            clear_color: config.model.clear_color,
            camera: FlyCamera::new(&config.camera),
            width,
            height,
            captured: true,
        })
    }
}

impl super::Scene for ModelScene {
    fn handle_event(&mut self, event: &sdl2::event::Event) {
        if let sdl2::event::Event::Window {
            win_event: sdl2::event::WindowEvent::Resized(width, height),
            ..
        } = event
        {
            self.width = *width as u32;
            self.height = *height as u32;
        }
    }

    fn update(&mut self, ctx: &UpdateContext, sdl: &sdl2::Sdl) -> super::SceneSwitch {
        if ctx.keyboard.pressed.contains(&Keycode::Tab) {
            return super::SceneSwitch::Next;
        }
        if ctx.keyboard.pressed.contains(&Keycode::Escape) {
            self.captured = !self.captured;
            log::debug!("Mouse capture {}", if self.captured { "on" } else { "off" });
        }
        sdl.mouse().set_relative_mouse_mode(self.captured);

        if self.captured {
            self.camera
                .process_mouse_motion(ctx.mouse.delta.x, ctx.mouse.delta.y);
            if ctx.mouse.scroll_delta.y != 0.0 {
                self.camera.process_scroll(ctx.mouse.scroll_delta.y);
            }
        }
        self.camera
            .process_movement(ctx.keyboard.move_input(), ctx.delta_time);

        super::SceneSwitch::None
    }

    fn render(&mut self) {
        let [r, g, b, a] = self.clear_color;
        unsafe {
            self.gl.enable(glow::DEPTH_TEST);
            self.gl.disable(glow::BLEND);
            self.gl.clear_color(r, g, b, a);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        let aspect_ratio = self.width as f32 / self.height.max(1) as f32;
        self.shader.use_program();
        self.shader.set_uniform("u_view", self.camera.view());
        self.shader
            .set_uniform("u_projection", self.camera.projection(aspect_ratio));
        self.shader.set_uniform("u_texture", 0i32);

        self.model_texture.bind(&self.gl, 0);
        self.shader
            .set_uniform("u_model", Mat4::from_translation(self.model_position));
        self.model.draw();

        self.shader.set_uniform("u_model", Mat4::IDENTITY);
        self.walls.draw();

        self.floor_texture.bind(&self.gl, 0);
        self.floor.draw();
    }
}
