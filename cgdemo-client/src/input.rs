use std::collections::HashSet;

use cgdemo_core::camera::MoveInput;
use glam::Vec2;
use sdl2::keyboard::Keycode;

/// The current state of the keyboard.
#[derive(Default)]
pub struct KeyboardState {
    pub down: HashSet<Keycode>,
    pub pressed: HashSet<Keycode>,
}

impl KeyboardState {
    /// Clears the keys pressed last frame, keeping held keys.
    pub fn begin_frame(&mut self) {
        self.pressed.clear();
    }

    /// The movement keys held this frame. WASD and the arrow keys are equivalent.
    pub fn move_input(&self) -> MoveInput {
        let held = |a: Keycode, b: Keycode| self.down.contains(&a) || self.down.contains(&b);
        MoveInput {
            forward: held(Keycode::W, Keycode::Up),
            backward: held(Keycode::S, Keycode::Down),
            left: held(Keycode::A, Keycode::Left),
            right: held(Keycode::D, Keycode::Right),
        }
    }
}

/// The current state of the mouse.
#[derive(Default)]
pub struct MouseState {
    /// Relative motion accumulated over the frame.
    pub delta: Vec2,
    pub scroll_delta: Vec2,
}

impl MouseState {
    /// Clears the motion accumulated last frame.
    pub fn begin_frame(&mut self) {
        self.delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }
}

/// Context provided to scenes during the update phase.
pub struct UpdateContext<'a> {
    pub keyboard: &'a KeyboardState,
    pub mouse: &'a MouseState,
    pub delta_time: f32,
}

impl<'a> UpdateContext<'a> {
    /// Creates a new `UpdateContext` from the given keyboard and mouse states and delta time.
    pub fn new(keyboard: &'a KeyboardState, mouse: &'a MouseState, delta_time: f32) -> Self {
        Self {
            keyboard,
            mouse,
            delta_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_map_to_the_same_input() {
        let mut keyboard = KeyboardState::default();
        keyboard.down.insert(Keycode::Up);
        keyboard.down.insert(Keycode::D);
        let input = keyboard.move_input();
        assert!(input.forward && input.right);
        assert!(!input.backward && !input.left);
    }

    #[test]
    fn begin_frame_keeps_held_keys() {
        let mut keyboard = KeyboardState::default();
        keyboard.down.insert(Keycode::W);
        keyboard.pressed.insert(Keycode::W);
        keyboard.begin_frame();
        assert!(keyboard.pressed.is_empty());
        assert!(keyboard.move_input().forward);

        let mut mouse = MouseState {
            delta: Vec2::new(3.0, -2.0),
            scroll_delta: Vec2::Y,
        };
        mouse.begin_frame();
        assert_eq!(mouse.delta, Vec2::ZERO);
        assert_eq!(mouse.scroll_delta, Vec2::ZERO);
    }
}
