use std::rc::Rc;

use anyhow::Context;
use cgdemo_core::config::DemoKind;
use glam::Vec2;
use glow::HasContext;

use crate::abs::App;

mod abs;
mod assets;
mod input;
mod logging;
mod render;
mod scenes;
mod settings;

/// Compiles and links `render/shaders/<name>/{vert,frag}.glsl`. The path prefix leads
/// from the invoking file back to `src`.
#[macro_export]
macro_rules! shader_program {
    ($name:ident, $gl:expr, $path_prefix:literal) => {{
        let vert = $crate::abs::Shader::new(
            &$gl,
            glow::VERTEX_SHADER,
            include_str!(concat!(
                $path_prefix,
                "/render/shaders/",
                stringify!($name),
                "/vert.glsl"
            )),
        );
        let frag = $crate::abs::Shader::new(
            &$gl,
            glow::FRAGMENT_SHADER,
            include_str!(concat!(
                $path_prefix,
                "/render/shaders/",
                stringify!($name),
                "/frag.glsl"
            )),
        );
        match (vert, frag) {
            (Ok(vert), Ok(frag)) => $crate::abs::ShaderProgram::new(&$gl, &[&vert, &frag]),
            (Err(e), _) | (_, Err(e)) => Err(e),
        }
    }};
}

fn main() -> anyhow::Result<()> {
    logging::init().context("Failed to install the logger")?;

    let mut config = settings::load_config();
    if let Some(arg) = std::env::args().nth(1) {
        match arg.parse::<DemoKind>() {
            Ok(kind) => config.start_demo = kind,
            Err(e) => log::warn!("{}", e),
        }
    }
    let config = Rc::new(config);

    let mut app = App::new(&config.window)
        .map_err(anyhow::Error::msg)
        .context("Failed to open the window")?;

    let size = app.window.size();
    let mut scene_manager =
        scenes::SceneManager::new(&app.gl, Rc::clone(&config), config.start_demo, size)?;

    let mut keyboard_state = input::KeyboardState::default();
    let mut mouse_state = input::MouseState::default();

    let mut last_frame_time = std::time::Instant::now();

    'running: loop {
        let now = std::time::Instant::now();
        let delta_time = now.duration_since(last_frame_time).as_secs_f32();
        last_frame_time = now;

        keyboard_state.begin_frame();
        mouse_state.begin_frame();

        for event in app.event_pump.poll_iter() {
            scene_manager.handle_event(&event);
            match event {
                sdl2::event::Event::Quit { .. } => break 'running,
                sdl2::event::Event::Window {
                    win_event: sdl2::event::WindowEvent::Resized(width, height),
                    ..
                } => unsafe {
                    app.gl.viewport(0, 0, width, height);
                },
                sdl2::event::Event::MouseMotion { xrel, yrel, .. } => {
                    mouse_state.delta += Vec2::new(xrel as f32, yrel as f32);
                }
                sdl2::event::Event::MouseWheel { x, y, .. } => {
                    mouse_state.scroll_delta += Vec2::new(x as f32, y as f32);
                }
                sdl2::event::Event::KeyDown {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => {
                    keyboard_state.down.insert(keycode);
                    keyboard_state.pressed.insert(keycode);
                }
                sdl2::event::Event::KeyUp {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => {
                    keyboard_state.down.remove(&keycode);
                }
                _ => {}
            }
        }

        let update_ctx = input::UpdateContext::new(&keyboard_state, &mouse_state, delta_time);
        if !scene_manager.update(&update_ctx, &app.sdl) {
            break 'running;
        }

        scene_manager.render();
        app.window.gl_swap_window();
    }

    log::info!("Shutting down");
    Ok(())
}
