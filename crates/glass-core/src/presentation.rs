//! Choice between the refractive 3D layer and the flat blur fallback.

use std::str::FromStr;

use palette::Srgb;
use palette::rgb::FromHexError;

use glass_config::SceneConfig;

use crate::bounds::ElementBounds;

/// Alpha applied to the tint in the fallback presentation.
pub const FALLBACK_TINT_ALPHA: u8 = 0xCC;
/// Backdrop blur per unit of roughness.
pub const FALLBACK_BLUR_SCALE: f32 = 12.0;

/// RGBA with 8-bit channels, as handed to the fallback visual.
pub type Rgba8 = [u8; 4];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallbackStyle {
    pub blur_px: f32,
    pub tint: Rgba8,
    pub outline: Rgba8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Presentation {
    Refractive,
    Fallback(FallbackStyle),
}

fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl FallbackStyle {
    /// `tint` is a hex colour such as `#f8fafc`.
    pub fn new(tint: &str, scene: &SceneConfig) -> Result<Self, FromHexError> {
        let rgb: Srgb<u8> = Srgb::from_str(tint)?;
        let ambient = &scene.lighting.ambient;
        Ok(Self {
            blur_px: scene.material.roughness * FALLBACK_BLUR_SCALE,
            tint: [rgb.red, rgb.green, rgb.blue, FALLBACK_TINT_ALPHA],
            outline: [
                unit_to_u8(ambient.color[0]),
                unit_to_u8(ambient.color[1]),
                unit_to_u8(ambient.color[2]),
                unit_to_u8(ambient.intensity / 10.0),
            ],
        })
    }
}

impl Presentation {
    /// Refractive only when a capture exists, the GPU can run the refractive
    /// pass, motion is allowed and the element has area.
    pub fn choose(
        has_texture: bool,
        gpu_capable: bool,
        reduced_motion: bool,
        bounds: &ElementBounds,
        fallback: FallbackStyle,
    ) -> Self {
        if has_texture && gpu_capable && !reduced_motion && !bounds.is_empty() {
            Presentation::Refractive
        } else {
            Presentation::Fallback(fallback)
        }
    }

    pub fn is_refractive(&self) -> bool {
        matches!(self, Presentation::Refractive)
    }
}
