//! Module providing the `Scene` trait and the two demo scenes.
//!
//! One scene runs at a time. A switch builds the next demo first, so a demo that fails
//! to start leaves the current one running.

use std::{rc::Rc, sync::Arc};

use cgdemo_core::config::{DemoConfig, DemoKind};

use crate::input::UpdateContext;

pub enum SceneSwitch {
    None,
    /// Replace the current demo with the next one.
    Next,
    Quit,
}

/// The Scene trait defines the common interface for all demo scenes.
pub trait Scene {
    /// Handles an event.
    fn handle_event(&mut self, _event: &sdl2::event::Event) {}

    /// Updates the scene state.
    fn update(&mut self, _ctx: &UpdateContext, _sdl: &sdl2::Sdl) -> SceneSwitch {
        SceneSwitch::None
    }

    /// Renders the scene.
    fn render(&mut self);
}

/// Builds the scene for a demo.
pub fn build(
    kind: DemoKind,
    gl: &Arc<glow::Context>,
    config: &Rc<DemoConfig>,
    size: (u32, u32),
) -> anyhow::Result<Box<dyn Scene>> {
    log::info!("Starting {:?} demo", kind);
    Ok(match kind {
        DemoKind::Sprites => Box::new(sprites::SpriteScene::new(gl, config)?),
        DemoKind::Model => Box::new(model::ModelScene::new(gl, config, size)?),
    })
}

/// Owns the running scene and replaces it when it asks to switch.
pub struct SceneManager {
    gl: Arc<glow::Context>,
    config: Rc<DemoConfig>,
    kind: DemoKind,
    scene: Box<dyn Scene>,
    size: (u32, u32),
}

impl SceneManager {
    /// Creates a new SceneManager running the given demo.
    pub fn new(
        gl: &Arc<glow::Context>,
        config: Rc<DemoConfig>,
        kind: DemoKind,
        size: (u32, u32),
    ) -> anyhow::Result<Self> {
        let scene = build(kind, gl, &config, size)?;
        Ok(Self {
            gl: Arc::clone(gl),
            config,
            kind,
            scene,
            size,
        })
    }

    /// Handles an event by passing it to the current scene.
    pub fn handle_event(&mut self, event: &sdl2::event::Event) {
        if let sdl2::event::Event::Window {
            win_event: sdl2::event::WindowEvent::Resized(width, height),
            ..
        } = event
        {
            self.size = (*width as u32, *height as u32);
        }
        self.scene.handle_event(event);
    }

    /// Updates the current scene and manages scene transitions. Returns `false` once the
    /// scene asks to quit.
    pub fn update(&mut self, ctx: &UpdateContext, sdl: &sdl2::Sdl) -> bool {
        match self.scene.update(ctx, sdl) {
            SceneSwitch::None => {}
            SceneSwitch::Next => self.switch_to(self.kind.next(), sdl),
            SceneSwitch::Quit => return false,
        }
        true
    }

    fn switch_to(&mut self, kind: DemoKind, sdl: &sdl2::Sdl) {
        sdl.mouse().set_relative_mouse_mode(false);
        match build(kind, &self.gl, &self.config, self.size) {
            Ok(scene) => {
                self.scene = scene;
                self.kind = kind;
            }
            Err(e) => log::error!("Could not start {:?} demo: {:#}", kind, e),
        }
    }

    /// Renders the current scene.
    pub fn render(&mut self) {
        self.scene.render();
    }
}

pub mod model;
pub mod sprites;
