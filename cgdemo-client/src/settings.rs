//! Locating and loading the user's configuration file.

use std::path::PathBuf;

use cgdemo_core::config::DemoConfig;

/// `<config dir>/cgdemo/config.json`, or `None` on platforms without a config directory.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cgdemo").join("config.json"))
}

/// Loads the configuration, falling back to the defaults. On first run the defaults
/// are written out so they can be edited.
pub fn load_config() -> DemoConfig {
    let Some(path) = config_path() else {
        log::warn!("No config directory on this platform, using defaults");
        return DemoConfig::default();
    };

    match DemoConfig::load(&path) {
        Ok(config) => {
            log::info!("Loaded config from {}", path.display());
            config
        }
        Err(e) if e.is_not_found() => {
            let config = DemoConfig::default();
            match config.save(&path) {
                Ok(()) => log::info!("Wrote default config to {}", path.display()),
                Err(e) => log::warn!("Could not write default config: {}", e),
            }
            config
        }
        Err(e) => {
            log::warn!("Ignoring config at {}: {}", path.display(), e);
            DemoConfig::default()
        }
    }
}
