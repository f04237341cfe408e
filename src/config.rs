// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::{DEFAULT_TIMER_SECONDS, IDEAL_CAPTURE_SIZE};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory name used under the XDG config/cache/pictures directories
pub const APP_DIR_NAME: &str = "photobooth";

/// Persistent user settings
///
/// Stored as JSON at `$XDG_CONFIG_HOME/photobooth/config.json`. Every field has
/// a default so partial files keep working across versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where exported strips are written
    pub export_dir: PathBuf,
    /// V4L2 device index (`/dev/videoN`)
    pub camera_index: usize,
    /// Countdown length used by the timer toggle
    pub timer_seconds: u32,
    /// Mirror camera preview horizontally (selfie mode)
    pub mirror_preview: bool,
    /// Requested capture width
    pub capture_width: u32,
    /// Requested capture height
    pub capture_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
            camera_index: 0,
            timer_seconds: DEFAULT_TIMER_SECONDS,
            mirror_preview: true, // Default to mirrored (selfie mode)
            capture_width: IDEAL_CAPTURE_SIZE.0,
            capture_height: IDEAL_CAPTURE_SIZE.1,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.json"))
    }

    /// Load the config from the default location, falling back to defaults
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("No config directory available, using defaults");
                Self::default()
            }
        }
    }

    /// Load the config from `path`
    ///
    /// A missing file is normal on first start. A malformed file is logged and
    /// replaced by defaults rather than aborting startup.
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Self::default();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read config file");
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded config");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Malformed config file, using defaults");
                Self::default()
            }
        }
    }

    /// Write the config as pretty JSON to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json =
            serde_json::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Saved config");
        Ok(())
    }
}

/// Get the default export directory (~/Pictures/photobooth)
pub fn default_export_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Log file used by terminal mode so tracing output does not tear the UI
pub fn log_file_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
        .join("photobooth.log")
}
