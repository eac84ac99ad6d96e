use serde::{Deserialize, Serialize};

use crate::scene::Rgb;

/// Light source settings for a glass element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Light {
    /// Angle of the light source in degrees.
    pub angle: f32,
    pub strength: f32,
    /// 0 is fully ambient, 1 is fully directional.
    pub directionality: f32,
    pub color: Rgb,
}

/// Perceptual glass sliders, mapped to physical parameters by the material mapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassOptions {
    /// Index of refraction.
    pub refraction: f32,
    /// Depth relative to the element size: 0 is thin walled, 1 is fully thick.
    pub depth: f32,
    pub dispersion: f32,
    /// Frostiness, used directly as roughness.
    pub frost: f32,
    pub light: Light,
}

impl Default for Light {
    fn default() -> Self {
        Self { angle: 45.0, strength: 6.0, directionality: 0.5, color: [1.0, 1.0, 1.0] }
    }
}

impl Default for GlassOptions {
    fn default() -> Self {
        Self {
            refraction: 1.2,
            depth: 0.6,
            dispersion: 0.2,
            frost: 0.5,
            light: Light::default(),
        }
    }
}
