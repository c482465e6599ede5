//! Game configuration, read from a JSON file at start-up.
//!
//! Every field has a default, so a partial file (or no file at all) is valid:
//!
//! ```json
//! { "window": { "width": 1600, "height": 900 }, "map_size": 24 }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::window::WindowConfig;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "isorts.json";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    /// Directory scanned for texture PNGs and font descriptors.
    pub asset_dir: PathBuf,
    /// Tiles per side of the editor map.
    pub map_size: usize,
    /// Camera pan speed in pixels per second.
    pub scroll_speed: f32,
    /// Fixed update rate of the state stack.
    pub target_ups: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            asset_dir: PathBuf::from("assets"),
            map_size: 16,
            scroll_speed: 500.0,
            target_ups: 60,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the configuration from command-line arguments.
    ///
    /// `--config <path>` must point at a readable file; otherwise
    /// `isorts.json` is used when present, and defaults when it is not.
    pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
        let explicit = args
            .iter()
            .position(|a| a == "--config")
            .and_then(|i| args.get(i + 1))
            .map(PathBuf::from);

        match explicit {
            Some(path) => {
                log::info!("loading config from {}", path.display());
                Self::load(&path)
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    log::info!("loading config from {}", path.display());
                    Self::load(path)
                } else {
                    log::info!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Screen-space size of the UI layer in pixels.
    pub fn screen_size(&self) -> glam::Vec2 {
        glam::Vec2::new(self.window.width as f32, self.window.height as f32)
    }
}
