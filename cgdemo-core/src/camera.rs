//! First-person fly camera driven by keyboard movement, mouse look and scroll zoom.

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

const MAX_PITCH: f32 = 89.0;
const MIN_FOV: f32 = 1.0;
const MAX_FOV: f32 = 45.0;

/// Which movement keys are held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// A camera that walks on the horizontal plane and looks around with yaw and pitch.
///
/// Angles are stored in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    pub up: Vec3,
    front: Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Degrees of rotation per pixel of mouse motion.
    pub sensitivity: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

impl FlyCamera {
    /// Creates a camera at the configured start position, looking down -Z.
    pub fn new(config: &CameraConfig) -> Self {
        let mut camera = Self {
            position: config.position,
            up: Vec3::Y,
            front: Vec3::NEG_Z,
            yaw: -90.0,
            pitch: 0.0,
            fov: config.fov.clamp(MIN_FOV, MAX_FOV),
            speed: config.speed,
            sensitivity: config.sensitivity,
        };
        camera.update_front();
        camera
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Moves the camera for one frame of held keys.
    ///
    /// The vertical part of the movement is discarded, so looking up or down does not
    /// make the camera fly.
    pub fn process_movement(&mut self, input: MoveInput, dt: f32) {
        let step = self.speed * dt;
        let right = self.front.cross(self.up).normalize_or_zero();
        let mut movement = Vec3::ZERO;

        if input.forward {
            movement += self.front * step;
        }
        if input.backward {
            movement -= self.front * step;
        }
        if input.left {
            movement -= right * step;
        }
        if input.right {
            movement += right * step;
        }

        movement.y = 0.0;
        self.position += movement;
    }

    /// Turns the camera by a relative mouse motion in pixels. Positive `dy` is the mouse
    /// moving down the screen, which pitches the camera down.
    pub fn process_mouse_motion(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
        self.update_front();
    }

    /// Zooms by narrowing the field of view for positive scroll amounts.
    pub fn process_scroll(&mut self, amount: f32) {
        self.fov = (self.fov - amount).clamp(MIN_FOV, MAX_FOV);
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), aspect_ratio, 0.1, 100.0)
    }

    fn update_front(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        self.front = Vec3::new(
            pitch.cos() * yaw.cos(),
            pitch.sin(),
            pitch.cos() * yaw.sin(),
        )
        .normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_looking_down_negative_z() {
        let camera = FlyCamera::default();
        assert!(camera.front().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert_eq!(camera.position, Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(camera.fov(), 45.0);
    }

    #[test]
    fn walking_stays_on_the_ground() {
        let mut camera = FlyCamera::default();
        camera.process_mouse_motion(0.0, -800.0);
        assert!(camera.front().y > 0.5);

        let start = camera.position;
        camera.process_movement(
            MoveInput {
                forward: true,
                ..Default::default()
            },
            1.0,
        );
        assert_eq!(camera.position.y, start.y);
        assert!(camera.position.z < start.z);
    }

    #[test]
    fn strafing_moves_sideways() {
        let mut camera = FlyCamera::default();
        camera.process_movement(
            MoveInput {
                right: true,
                ..Default::default()
            },
            0.5,
        );
        assert!(camera.position.abs_diff_eq(Vec3::new(2.5, 1.0, 1.0), 1e-5));

        camera.process_movement(
            MoveInput {
                left: true,
                right: true,
                ..Default::default()
            },
            0.5,
        );
        assert!(camera.position.abs_diff_eq(Vec3::new(2.5, 1.0, 1.0), 1e-5));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = FlyCamera::default();
        camera.process_mouse_motion(0.0, -10_000.0);
        assert_eq!(camera.pitch(), 89.0);
        camera.process_mouse_motion(0.0, 10_000.0);
        assert_eq!(camera.pitch(), -89.0);
    }

    #[test]
    fn yaw_follows_horizontal_motion() {
        let mut camera = FlyCamera::default();
        camera.process_mouse_motion(1800.0, 0.0);
        assert!((camera.yaw() - 0.0).abs() < 1e-4);
        assert!(camera.front().abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = FlyCamera::default();
        camera.process_scroll(10.0);
        assert_eq!(camera.fov(), 35.0);
        camera.process_scroll(100.0);
        assert_eq!(camera.fov(), 1.0);
        camera.process_scroll(-100.0);
        assert_eq!(camera.fov(), 45.0);
    }

    #[test]
    fn view_looks_along_front() {
        let camera = FlyCamera::default();
        let ahead = camera.position + camera.front() * 3.0;
        let in_view = camera.view().transform_point3(ahead);
        assert!(in_view.abs_diff_eq(Vec3::new(0.0, 0.0, -3.0), 1e-5));
    }
}
