//! Glass configuration system
//!
//! Centralized settings for the glass background-synchronization engine,
//! loaded from `glass.toml` with environment variable overrides.

mod glass;
mod scene;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use glass::{GlassOptions, Light};
pub use scene::{
    AmbientLight, ClearcoatConfig, DirectionalLight, EmissionConfig, IridescenceConfig,
    LightingConfig, MaterialConfig, MetalnessConfig, PlaneConfig, Rgb, SceneConfig, SheenConfig,
    TransmissionConfig, WHITE,
};

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "glass.toml";

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlassConfig {
    /// Material, lighting and plane settings for the 3D scene
    pub scene: SceneConfig,
    /// Perceptual glass sliders
    pub glass: GlassOptions,
    /// Background capture settings
    pub capture: CaptureConfig,
    /// Presentation settings
    pub presentation: PresentationConfig,
}

/// Background capture configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Raster scale factor for the capture (1.0 = CSS pixels)
    pub scale: f32,
    /// Maximum time to wait for images inside the captured document
    pub image_timeout_ms: u64,
    /// Attribute marking a subtree as non-capturable
    pub ignore_attribute: String,
    /// Tags that are never captured (the render canvas itself)
    pub ignore_tags: Vec<String>,
    /// Allow cross-origin images to taint the capture
    pub allow_taint: bool,
    /// Request cross-origin images with CORS
    pub use_cors: bool,
}

/// Presentation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Force the fallback presentation regardless of capture state
    pub reduced_motion: bool,
    /// Nominal corner radius of the glass silhouette
    pub border_radius: f32,
    /// Hex tint of the flat fallback panel
    pub fallback_color: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            image_timeout_ms: 2000,
            ignore_attribute: "glass-ignore".to_string(),
            ignore_tags: vec!["canvas".to_string()],
            allow_taint: true,
            use_cors: true,
        }
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            border_radius: 16.0,
            fallback_color: "#ffffff".to_string(),
        }
    }
}

fn env_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl GlassConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the glass.toml configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text. Missing sections fall back to defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from the default location (glass.toml in the current directory)
    /// or return default configuration if the file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_FILE).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("GLASS_PLANE_BLUR") {
            if let Ok(blur) = val.parse::<f32>() {
                self.scene.plane.blur = blur;
            }
        }
        if let Ok(val) = std::env::var("GLASS_FROST") {
            if let Ok(frost) = val.parse::<f32>() {
                self.glass.frost = frost;
            }
        }
        if let Ok(val) = std::env::var("GLASS_REDUCED_MOTION") {
            self.presentation.reduced_motion = env_flag(&val);
        }
        if let Ok(val) = std::env::var("GLASS_CAPTURE_SCALE") {
            if let Ok(scale) = val.parse::<f32>() {
                self.capture.scale = scale;
            }
        }
        if let Ok(val) = std::env::var("GLASS_IMAGE_TIMEOUT_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.capture.image_timeout_ms = ms;
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from glass.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
