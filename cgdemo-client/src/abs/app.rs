//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which owns the SDL2 window, the OpenGL 3.3 core
//! context created for it and the event pump the render loop polls.

use std::sync::Arc;

use cgdemo_core::config::WindowConfig;

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
}

impl App {
    /// Creates the window and its GL context from the window configuration.
    /// The configured size is ignored if `fullscreen` is set.
    pub fn new(config: &WindowConfig) -> Result<Self, String> {
        let sdl = sdl2::init()?;
        let video_subsystem = sdl.video()?;

        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_stencil_size(8);

        let (width, height) = if config.fullscreen {
            let display_mode = video_subsystem.current_display_mode(0)?;
            (display_mode.w as u32, display_mode.h as u32)
        } else {
            (config.width, config.height)
        };

        let mut window = video_subsystem
            .window(&config.title, width, height)
            .opengl()
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| e.to_string())?;
        if config.fullscreen {
            window.set_fullscreen(sdl2::video::FullscreenType::Desktop)?;
        }

        let gl_context = window.gl_create_context()?;
        window.gl_make_current(&gl_context)?;

        let swap_interval = if config.vsync {
            sdl2::video::SwapInterval::VSync
        } else {
            sdl2::video::SwapInterval::Immediate
        };
        if let Err(e) = video_subsystem.gl_set_swap_interval(swap_interval) {
            log::warn!("Could not set vsync={}: {}", config.vsync, e);
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let event_pump = sdl.event_pump()?;

        log::info!(
            "Created {}x{} window with an OpenGL {:?} context",
            width,
            height,
            gl_attr.context_version()
        );

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl: Arc::new(gl),
            event_pump,
        })
    }
}
