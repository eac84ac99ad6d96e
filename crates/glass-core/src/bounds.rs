/// Position and size of an element's box, in viewport pixels.
///
/// A snapshot taken at one point in time; consumers never mutate it, they
/// replace it with the next query.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl ElementBounds {
    /// Bounds of an element that is not mounted yet.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Build bounds from an origin and a size, deriving the edges.
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            top: y,
            right: x + width,
            bottom: y + height,
            left: x,
        }
    }

    /// True when there is nothing to render a 3D layer into.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Radius of the largest circle fitting the box.
    pub fn inscribed_radius(&self) -> f32 {
        self.width.min(self.height) / 2.0
    }

    pub fn center(&self) -> [f32; 2] {
        [self.left + self.width / 2.0, self.top + self.height / 2.0]
    }

    pub fn same_size(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bounds_are_empty() {
        assert!(ElementBounds::ZERO.is_empty());
        assert_eq!(ElementBounds::default(), ElementBounds::ZERO);
    }

    #[test]
    fn nan_size_is_empty() {
        let b = ElementBounds::from_rect(0.0, 0.0, f32::NAN, 10.0);
        assert!(b.is_empty());
    }

    #[test]
    fn from_rect_derives_edges() {
        let b = ElementBounds::from_rect(850.0, 300.0, 300.0, 200.0);
        assert_eq!(b.right, 1150.0);
        assert_eq!(b.bottom, 500.0);
        assert_eq!(b.center(), [1000.0, 400.0]);
        assert_eq!(b.inscribed_radius(), 100.0);
        assert!(!b.is_empty());
    }
}
