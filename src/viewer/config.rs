use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ModelError, Result};
use crate::math::parse_color;

/// Highest antialiasing quality the viewer accepts
pub const MAX_QUALITY: u32 = 16;

/// Viewer settings, loadable from JSON with every field optional
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub file_path: PathBuf,
    pub background_color: String,
    pub model_color: String,
    pub window_width: u32,
    pub window_height: u32,
    pub fov: f32,
    pub quality: u32,
    pub autopan_speed: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from("./target/model.stl"),
            background_color: "black".to_string(),
            model_color: "#8080ff".to_string(),
            window_width: 800,
            window_height: 600,
            fov: 45.0,
            quality: 12,
            autopan_speed: 0.30,
        }
    }
}

impl ViewerConfig {
    /// Read settings from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ModelError::io(path, e))?;
        serde_json::from_str(&text)
            .map_err(|e| ModelError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Check the file and numeric ranges; normalizes nothing
    pub fn validate(&self) -> Result<()> {
        let metadata = fs::metadata(&self.file_path).map_err(|_| {
            ModelError::Config(format!(
                "file_path: {} does not exist",
                self.file_path.display()
            ))
        })?;
        if !metadata.is_file() {
            return Err(ModelError::Config(format!(
                "file_path: {} is not a file",
                self.file_path.display()
            )));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ModelError::Config(format!(
                "window size must be non-zero: {}x{}",
                self.window_width, self.window_height
            )));
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(ModelError::Config(format!(
                "fov must be between 0 and 180 degrees: {}",
                self.fov
            )));
        }
        if !(-360.0..=360.0).contains(&self.autopan_speed) {
            return Err(ModelError::Config(format!(
                "autopan_speed must be within -360..360: {}",
                self.autopan_speed
            )));
        }
        self.background_rgba()?;
        self.model_rgba()?;
        Ok(())
    }

    pub fn background_rgba(&self) -> Result<[f32; 4]> {
        color_field("background_color", &self.background_color)
    }

    pub fn model_rgba(&self) -> Result<[f32; 4]> {
        color_field("model_color", &self.model_color)
    }

    /// Quality clamped to the supported range
    pub fn clamped_quality(&self) -> u32 {
        self.quality.min(MAX_QUALITY)
    }
}

fn color_field(name: &str, value: &str) -> Result<[f32; 4]> {
    parse_color(value)
        .ok_or_else(|| ModelError::Config(format!("{}: unknown color '{}'", name, value)))
}
