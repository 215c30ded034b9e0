use std::fs;
use std::path::{Path, PathBuf};

use egui::Color32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::time::millis_to_secs;

/// Fixed canvas resolution in design units. All guide and transform math
/// happens in this space, on-screen zoom is applied afterwards.
pub const RESOLUTION: Resolution = Resolution {
    width: 2835.0,
    height: 1181.0,
};
pub const ASPECT_RATIO: f32 = RESOLUTION.height / RESOLUTION.width;

/// Horizontal space kept free around the on-screen canvas
pub const CANVAS_MARGIN: f32 = 32.0;

pub const SNAP_THRESHOLD: f32 = 5.0;
pub const GUIDE_LINE_EXTENT: f32 = 6000.0;
pub const GUIDE_LINE_COLOR: Color32 = Color32::from_rgb(0x6a, 0x6a, 0xc8);
pub const GUIDE_LINE_WIDTH: f32 = 2.0;
pub const GUIDE_LINE_DASH: [f32; 2] = [4.0, 6.0];

pub const MIN_SHAPE_SIZE: f32 = 5.0;

pub const ANCHOR_SIZE: f32 = 15.0;
pub const ANCHOR_SIZE_NARROW: f32 = 20.0;
pub const NARROW_VIEWPORT_WIDTH: f32 = 639.0;

pub const CONFIG_ENV_VAR: &str = "MUKI_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: f32,
    pub height: f32,
}

impl Resolution {
    pub fn as_vec2(&self) -> egui::Vec2 {
        egui::Vec2::new(self.width, self.height)
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width.round() as u32, self.height.round() as u32)
    }
}

/// When the scene gets rasterized while a gesture is still running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RasterPolicy {
    /// Only content commits (gesture end, property edits) trigger a raster
    #[default]
    CommitOnRelease,
    /// Pointer moves also trigger rasters, at most once per interval
    Throttled { interval_ms: u64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Runtime settings. Persisted together with the app state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub raster_policy: RasterPolicy,
    /// Quiet period after a content change before the scene is rasterized
    pub raster_delay_ms: u64,
    pub viewport_debounce_ms: u64,
    pub export_dir: PathBuf,
    pub export_file_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            raster_policy: RasterPolicy::default(),
            raster_delay_ms: 150,
            viewport_debounce_ms: 50,
            export_dir: PathBuf::from("."),
            export_file_name: "muki.png".to_owned(),
        }
    }
}

impl EditorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Reads the file named by `MUKI_CONFIG`, falling back to defaults.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        match Self::load(Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded config from {}", Path::new(&path).display());
                config
            }
            Err(err) => {
                log::warn!("Ignoring config {}: {}", Path::new(&path).display(), err);
                Self::default()
            }
        }
    }

    pub fn export_path(&self) -> PathBuf {
        self.export_dir.join(&self.export_file_name)
    }

    pub fn raster_delay_secs(&self) -> f64 {
        millis_to_secs(self.raster_delay_ms)
    }

    pub fn viewport_debounce_secs(&self) -> f64 {
        millis_to_secs(self.viewport_debounce_ms)
    }
}
