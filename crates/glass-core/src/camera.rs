use crate::bounds::ElementBounds;

pub const CAMERA_NEAR: f32 = 0.01;
pub const CAMERA_FAR: f32 = 2048.0;
pub const CAMERA_Z: f32 = 512.0;

/// Orthographic camera framing the glass element one pixel per unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrthoCamera {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl OrthoCamera {
    /// `None` while the element has no area.
    pub fn from_bounds(bounds: &ElementBounds) -> Option<Self> {
        if bounds.is_empty() {
            return None;
        }
        let (hw, hh) = (bounds.width / 2.0, bounds.height / 2.0);
        Some(Self {
            left: -hw,
            right: hw,
            top: hh,
            bottom: -hh,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            position: [0.0, 0.0, CAMERA_Z],
        })
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Column-major orthographic projection (OpenGL clip space), view translation included.
    pub fn view_projection(&self) -> [[f32; 4]; 4] {
        let rl = self.right - self.left;
        let tb = self.top - self.bottom;
        let fan = self.far - self.near;
        let [cx, cy, cz] = self.position;
        // camera looks down -z from `position`
        let tx = -(self.right + self.left) / rl - 2.0 * cx / rl;
        let ty = -(self.top + self.bottom) / tb - 2.0 * cy / tb;
        let tz = -(self.far + self.near) / fan + 2.0 * cz / fan;
        [
            [2.0 / rl, 0.0, 0.0, 0.0],
            [0.0, 2.0 / tb, 0.0, 0.0],
            [0.0, 0.0, -2.0 / fan, 0.0],
            [tx, ty, tz, 1.0],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_element_size() {
        let cam = OrthoCamera::from_bounds(&ElementBounds::from_rect(10.0, 20.0, 300.0, 200.0)).unwrap();
        assert_eq!((cam.left, cam.right, cam.top, cam.bottom), (-150.0, 150.0, 100.0, -100.0));
        assert_eq!(cam.width(), 300.0);
        assert_eq!(cam.height(), 200.0);
        assert_eq!(cam.position, [0.0, 0.0, 512.0]);
    }

    #[test]
    fn empty_bounds_have_no_camera() {
        assert!(OrthoCamera::from_bounds(&ElementBounds::ZERO).is_none());
    }

    #[test]
    fn projection_maps_frustum_corners_to_clip_space() {
        let cam = OrthoCamera::from_bounds(&ElementBounds::from_rect(0.0, 0.0, 300.0, 200.0)).unwrap();
        let m = cam.view_projection();
        let project = |p: [f32; 3]| {
            [
                m[0][0] * p[0] + m[3][0],
                m[1][1] * p[1] + m[3][1],
                m[2][2] * p[2] + m[3][2],
            ]
        };
        let right_top_near = project([150.0, 100.0, CAMERA_Z - CAMERA_NEAR]);
        assert!((right_top_near[0] - 1.0).abs() < 1e-5);
        assert!((right_top_near[1] - 1.0).abs() < 1e-5);
        assert!((right_top_near[2] + 1.0).abs() < 1e-4);
        let far = project([0.0, 0.0, CAMERA_Z - CAMERA_FAR]);
        assert!((far[2] - 1.0).abs() < 1e-4);
    }
}
