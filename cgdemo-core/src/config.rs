//! Demo configuration.
//!
//! The configuration is stored as JSON. Every field has a default, so a file only needs
//! to contain the values it wants to change. The defaults describe the two stock demos:
//! a 2D scene of textured sprites and a 3D room with a loaded model.

use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::{
    color_key::MAGENTA,
    sprite::{self, SpriteAnimation},
};

/// Errors produced while reading or writing the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Returns `true` if the config file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// The demo shown in the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoKind {
    #[default]
    Sprites,
    Model,
}

impl DemoKind {
    /// The demo that follows this one when cycling.
    pub fn next(self) -> Self {
        match self {
            DemoKind::Sprites => DemoKind::Model,
            DemoKind::Model => DemoKind::Sprites,
        }
    }
}

impl std::str::FromStr for DemoKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sprites" | "sprite" | "2d" => Ok(DemoKind::Sprites),
            "model" | "mesh" | "3d" => Ok(DemoKind::Model),
            other => Err(format!("Unknown demo '{}', expected 'sprites' or 'model'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Computer Graphics Demos".to_string(),
            width: 800,
            height: 600,
            fullscreen: false,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Units per second.
    pub speed: f32,
    /// Degrees per pixel of mouse motion.
    pub sensitivity: f32,
    /// Initial vertical field of view in degrees.
    pub fov: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 1.0),
            speed: 5.0,
            sensitivity: 0.05,
            fov: 45.0,
        }
    }
}

/// One sprite of the 2D demo. Sprites are drawn in the order they are listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    /// Image path relative to the asset directory.
    pub texture: String,
    pub rows: u32,
    pub cols: u32,
    /// Seconds per frame.
    pub frame_duration: f32,
    pub position: Vec2,
    pub size: Vec2,
    pub rotation_degrees: f32,
    /// Whether the configured key colour becomes transparent.
    pub color_key: bool,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            texture: String::new(),
            rows: 1,
            cols: 1,
            frame_duration: 0.1,
            position: Vec2::ZERO,
            size: Vec2::splat(100.0),
            rotation_degrees: 0.0,
            color_key: true,
        }
    }
}

impl SpriteConfig {
    fn still(texture: &str, position: Vec2, size: Vec2) -> Self {
        Self {
            texture: texture.to_string(),
            position,
            size,
            ..Default::default()
        }
    }

    /// Builds the animation state for this sprite around an already loaded texture.
    pub fn animation<H>(&self, texture: H) -> SpriteAnimation<H> {
        let (rows, cols) = sprite::grid(self.rows, self.cols);
        SpriteAnimation::new(texture, rows, cols, self.frame_duration)
            .with_placement(self.position, self.size)
            .with_rotation(self.rotation_degrees.to_radians())
    }
}

/// The 3D demo: a model standing at the end of a corridor of two walls and a floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSceneConfig {
    /// OBJ path relative to the asset directory.
    pub mesh: String,
    pub texture: String,
    pub floor_texture: String,
    pub position: Vec3,
    pub clear_color: [f32; 4],
}

impl Default for ModelSceneConfig {
    fn default() -> Self {
        Self {
            mesh: "suzanne.obj".to_string(),
            texture: "container.jpg".to_string(),
            floor_texture: "bricks.jpg".to_string(),
            position: Vec3::new(0.0, 1.5, -15.0),
            clear_color: [0.2, 0.5, 0.3, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub asset_dir: PathBuf,
    pub start_demo: DemoKind,
    pub color_key: [u8; 3],
    pub camera: CameraConfig,
    pub sprites: Vec<SpriteConfig>,
    pub model: ModelSceneConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        let asteroid = SpriteConfig {
            texture: "graphics/SAster96A.bmp".to_string(),
            rows: 5,
            cols: 5,
            frame_duration: 0.08,
            position: Vec2::new(200.0, -50.0),
            size: Vec2::splat(300.0),
            ..Default::default()
        };
        let second_asteroid = SpriteConfig {
            position: Vec2::new(100.0, -100.0),
            frame_duration: 0.12,
            ..asteroid.clone()
        };

        Self {
            window: WindowConfig::default(),
            asset_dir: PathBuf::from("assets"),
            start_demo: DemoKind::default(),
            color_key: MAGENTA,
            camera: CameraConfig::default(),
            sprites: vec![
                SpriteConfig::still(
                    "graphics/galaxy2.bmp",
                    Vec2::ZERO,
                    Vec2::new(800.0, 600.0),
                ),
                SpriteConfig {
                    rotation_degrees: 90.0,
                    ..SpriteConfig::still(
                        "graphics/ShipIdle.bmp",
                        Vec2::new(-350.0, 0.0),
                        Vec2::splat(100.0),
                    )
                },
                SpriteConfig::still(
                    "graphics/cloneA.bmp",
                    Vec2::new(200.0, 50.0),
                    Vec2::splat(100.0),
                ),
                asteroid,
                second_asteroid,
            ],
            model: ModelSceneConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Parses a configuration from JSON, filling missing fields with defaults.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Writes the configuration, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, self.to_json()?).map_err(io_err)
    }

    /// Resolves a path relative to the asset directory.
    pub fn asset_path(&self, name: &str) -> PathBuf {
        self.asset_dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_survive_json() {
        let config = DemoConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(DemoConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config = DemoConfig::from_json(
            r#"{
                "start_demo": "model",
                "window": { "width": 1280 },
                "sprites": [ { "texture": "boom.png", "rows": 4, "cols": 4 } ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.start_demo, DemoKind::Model);
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.sprites.len(), 1);
        assert_eq!(config.sprites[0].frame_duration, 0.1);
        assert!(config.sprites[0].color_key);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn rejects_unknown_demo() {
        let err = DemoConfig::from_json(r#"{ "start_demo": "voxels" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn demo_kind_from_str() {
        assert_eq!("Model".parse::<DemoKind>(), Ok(DemoKind::Model));
        assert_eq!("2d".parse::<DemoKind>(), Ok(DemoKind::Sprites));
        assert!("voxels".parse::<DemoKind>().is_err());
        assert_eq!(DemoKind::Sprites.next().next(), DemoKind::Sprites);
    }

    #[test]
    fn sprite_config_builds_animation() {
        let config = SpriteConfig {
            texture: "ship.png".to_string(),
            rows: 0,
            cols: 8,
            rotation_degrees: 180.0,
            ..Default::default()
        };
        let animation = config.animation(3u32);
        assert_eq!(animation.frame_count(), 8);
        assert_eq!(animation.texture, 3);
        assert_eq!(animation.size, Vec2::splat(100.0));
        assert!((animation.rotation - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn oversized_sprite_grid_is_clamped() {
        let config = DemoConfig::from_json(
            r#"{ "sprites": [ { "texture": "a.png", "rows": 65536, "cols": 65536 } ] }"#,
        )
        .unwrap();
        let mut animation = config.sprites[0].animation(());
        assert_eq!(animation.rows(), sprite::MAX_GRID_SIDE);
        assert_eq!(animation.cols(), sprite::MAX_GRID_SIDE);
        assert!(animation.advance(1.0));
        assert_eq!(animation.current_frame(), 1);
        assert!(animation.current_uv().iter().all(|corner| corner.is_finite()));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = DemoConfig::load(&dir.path().join("config.json")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = DemoConfig::default();
        config.window.title = "Saved".to_string();
        config.save(&path).unwrap();
        let loaded = DemoConfig::load(&path).unwrap();
        assert_eq!(loaded.window.title, "Saved");
        assert_eq!(loaded.asset_path("a.png"), PathBuf::from("assets").join("a.png"));
    }
}
