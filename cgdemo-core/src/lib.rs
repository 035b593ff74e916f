//! The core of the cgdemo graphics demos. This crate contains everything that does not
//! need a window or a graphics context: Wavefront OBJ loading, sprite-sheet animation,
//! the fly camera, colour keying and the demo configuration.

pub mod camera;
pub mod color_key;
pub mod config;
pub mod obj;
pub mod sprite;

pub use camera::{FlyCamera, MoveInput};
pub use config::DemoConfig;
pub use obj::{NormalMode, ObjError, ObjMesh};
pub use sprite::SpriteAnimation;
