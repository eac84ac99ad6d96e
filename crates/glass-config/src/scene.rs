//! Scene configuration: the validated material, lighting and plane record
//! consumed read-only by the synchronization core.

use serde::{Deserialize, Serialize};

/// Linear RGB triple, each channel in `[0, 1]`. `[1, 1, 1]` is white.
pub type Rgb = [f32; 3];

pub const WHITE: Rgb = [1.0, 1.0, 1.0];

/// Full scene record: material, lighting and background plane settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SceneConfig {
    pub material: MaterialConfig,
    pub lighting: LightingConfig,
    pub plane: PlaneConfig,
}

/// Physical material settings for the glass mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub color: Rgb,
    /// Index of refraction.
    pub ior: f32,
    /// Surface roughness.
    pub roughness: f32,
    /// Chromatic dispersion.
    pub dispersion: f32,
    pub transmission: TransmissionConfig,
    pub sheen: SheenConfig,
    pub iridescence: IridescenceConfig,
    pub clearcoat: ClearcoatConfig,
    pub metalness: MetalnessConfig,
    pub emission: EmissionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransmissionConfig {
    pub enabled: bool,
    pub value: f32,
    /// Thickness relative to the maximum depth of the mesh.
    pub thickness: f32,
    pub attenuation_color: Rgb,
    pub attenuation_distance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheenConfig {
    pub enabled: bool,
    pub color: Rgb,
    pub strength: f32,
    pub roughness: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IridescenceConfig {
    pub enabled: bool,
    pub strength: f32,
    pub ior: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearcoatConfig {
    pub enabled: bool,
    pub strength: f32,
    pub roughness: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetalnessConfig {
    pub enabled: bool,
    pub strength: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionConfig {
    pub enabled: bool,
    pub color: Rgb,
    pub intensity: f32,
}

/// Background plane settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneConfig {
    /// Blur amount applied to the captured background.
    pub blur: f32,
}

/// Ambient plus directional lights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient: AmbientLight,
    pub directional: Vec<DirectionalLight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLight {
    pub color: Rgb,
    pub intensity: f32,
    /// Angle in degrees of rotation relative to the XY plane.
    pub position: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            color: WHITE,
            ior: 1.2,
            roughness: 0.6,
            dispersion: 2.0,
            transmission: TransmissionConfig::default(),
            sheen: SheenConfig::default(),
            iridescence: IridescenceConfig::default(),
            clearcoat: ClearcoatConfig::default(),
            metalness: MetalnessConfig::default(),
            emission: EmissionConfig::default(),
        }
    }
}

impl Default for TransmissionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            value: 0.8,
            thickness: 0.6,
            attenuation_color: WHITE,
            attenuation_distance: 1000.0,
        }
    }
}

impl Default for SheenConfig {
    fn default() -> Self {
        Self { enabled: true, color: WHITE, strength: 0.8, roughness: 0.8 }
    }
}

impl Default for IridescenceConfig {
    fn default() -> Self {
        Self { enabled: true, strength: 0.5, ior: 1.5 }
    }
}

impl Default for ClearcoatConfig {
    fn default() -> Self {
        Self { enabled: true, strength: 0.5, roughness: 0.8 }
    }
}

impl Default for MetalnessConfig {
    fn default() -> Self {
        Self { enabled: false, strength: 0.0 }
    }
}

impl Default for EmissionConfig {
    fn default() -> Self {
        Self { enabled: false, color: WHITE, intensity: 0.1 }
    }
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self { blur: 2.0 }
    }
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self { color: [0.8, 0.8, 1.0], intensity: 3.0 }
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self { color: WHITE, intensity: 0.0, position: 0.0 }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient: AmbientLight::default(),
            directional: vec![
                DirectionalLight { color: [1.0, 0.8, 0.8], intensity: 10.0, position: 45.0 },
                DirectionalLight { color: [0.8, 1.0, 0.8], intensity: 10.0, position: 135.0 },
            ],
        }
    }
}
