//! Mapping from perceptual glass settings to physical material parameters.

use glass_config::{GlassOptions, MaterialConfig, Rgb};

use crate::bounds::ElementBounds;

/// Parameters the renderer's physical material stage consumes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicalMaterial {
    pub roughness: f32,
    pub transmission: f32,
    pub thickness: f32,
    pub ior: f32,
    pub dispersion: f32,
}

impl PhysicalMaterial {
    /// Map the perceptual sliders for an element of the given size.
    ///
    /// Frost is clamped to `[0, 1]`, which keeps transmission in `[0.1, 1.0]`.
    pub fn from_options(options: &GlassOptions, width: f32, height: f32) -> Self {
        let frost = options.frost.clamp(0.0, 1.0);
        let r = width.min(height) / 2.0;
        Self {
            roughness: frost,
            transmission: 0.1 + (1.0 - frost) * 0.9,
            thickness: options.depth * (2.0 * r),
            ior: options.refraction,
            dispersion: options.dispersion * 10.0,
        }
    }

    pub fn for_bounds(options: &GlassOptions, bounds: &ElementBounds) -> Self {
        Self::from_options(options, bounds.width, bounds.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransmissionParams {
    pub transmission: f32,
    pub thickness: f32,
    pub attenuation_color: Rgb,
    pub attenuation_distance: f32,
}

/// Full material record for a schema-configured scene. Optional blocks are
/// present only when enabled in the configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicalMaterialParams {
    pub color: Rgb,
    pub roughness: f32,
    pub ior: f32,
    pub dispersion: f32,
    pub metalness: Option<f32>,
    /// (strength, roughness)
    pub clearcoat: Option<(f32, f32)>,
    /// (color, roughness)
    pub sheen: Option<(Rgb, f32)>,
    pub transmission: Option<TransmissionParams>,
    /// (strength, ior)
    pub iridescence: Option<(f32, f32)>,
    /// (color, intensity)
    pub emissive: Option<(Rgb, f32)>,
}

/// Resolve schema material settings; `max_depth` scales the relative transmission thickness.
pub fn physical_params(m: &MaterialConfig, max_depth: f32) -> PhysicalMaterialParams {
    PhysicalMaterialParams {
        color: m.color,
        roughness: m.roughness,
        ior: m.ior,
        dispersion: m.dispersion,
        metalness: m.metalness.enabled.then_some(m.metalness.strength),
        clearcoat: m
            .clearcoat
            .enabled
            .then_some((m.clearcoat.strength, m.clearcoat.roughness)),
        sheen: m.sheen.enabled.then_some((m.sheen.color, m.sheen.roughness)),
        transmission: m.transmission.enabled.then(|| TransmissionParams {
            transmission: m.transmission.value,
            thickness: max_depth * m.transmission.thickness,
            attenuation_color: m.transmission.attenuation_color,
            attenuation_distance: m.transmission.attenuation_distance,
        }),
        iridescence: m
            .iridescence
            .enabled
            .then_some((m.iridescence.strength, m.iridescence.ior)),
        emissive: m.emission.enabled.then_some((m.emission.color, m.emission.intensity)),
    }
}
