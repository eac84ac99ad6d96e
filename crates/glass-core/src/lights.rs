use glass_config::{Light, LightingConfig, Rgb};

/// Unit direction on the XY plane for an angle in degrees (0° points up).
pub fn dir_from_angle(angle_deg: f32) -> [f32; 3] {
    let rad = angle_deg.to_radians();
    [rad.sin(), rad.cos(), 0.0]
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedLight {
    pub color: Rgb,
    pub intensity: f32,
    pub direction: [f32; 3],
}

/// Lights ready for the renderer: one ambient term plus shadow-casting directionals.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLights {
    pub ambient_color: Rgb,
    pub ambient_intensity: f32,
    pub directional: Vec<ResolvedLight>,
}

impl SceneLights {
    pub fn from_config(cfg: &LightingConfig) -> Self {
        Self {
            ambient_color: cfg.ambient.color,
            ambient_intensity: cfg.ambient.intensity,
            directional: cfg
                .directional
                .iter()
                .map(|l| ResolvedLight {
                    color: l.color,
                    intensity: l.intensity,
                    direction: dir_from_angle(l.position),
                })
                .collect(),
        }
    }

    /// Add the element's own light: its strength is split between a directional
    /// key light and the ambient term by `directionality`.
    pub fn with_key_light(mut self, light: &Light) -> Self {
        let directionality = light.directionality.clamp(0.0, 1.0);
        self.ambient_intensity += light.strength * (1.0 - directionality);
        self.directional.push(ResolvedLight {
            color: light.color,
            intensity: light.strength * directionality,
            direction: dir_from_angle(light.angle),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_to_direction() {
        let up = dir_from_angle(0.0);
        assert!((up[0]).abs() < 1e-6 && (up[1] - 1.0).abs() < 1e-6);
        let right = dir_from_angle(90.0);
        assert!((right[0] - 1.0).abs() < 1e-6 && right[1].abs() < 1e-6);
    }

    #[test]
    fn resolves_default_lighting() {
        let lights = SceneLights::from_config(&LightingConfig::default());
        assert_eq!(lights.directional.len(), 2);
        assert_eq!(lights.ambient_intensity, 3.0);
        let d = lights.directional[0].direction;
        assert!((d[0] - d[1]).abs() < 1e-6);
    }

    #[test]
    fn key_light_splits_strength() {
        let lights = SceneLights::from_config(&LightingConfig::default()).with_key_light(&Light::default());
        assert_eq!(lights.directional.len(), 3);
        assert!((lights.ambient_intensity - 6.0).abs() < 1e-6);
        let key = lights.directional[2];
        assert!((key.intensity - 3.0).abs() < 1e-6);
        assert_eq!(key.direction, dir_from_angle(45.0));

        let spot = Light { directionality: 1.0, ..Light::default() };
        let lights = SceneLights::from_config(&LightingConfig::default()).with_key_light(&spot);
        assert_eq!(lights.ambient_intensity, 3.0);
        assert_eq!(lights.directional[2].intensity, 6.0);
    }
}
