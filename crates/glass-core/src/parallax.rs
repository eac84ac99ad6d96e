//! Background plane alignment.
//!
//! The plane carries one static capture of the whole document. To make the
//! glass reveal the patch of page that sits behind it, the plane moves against
//! the scroll, offset by where the element sits relative to the document center.

use crate::bounds::ElementBounds;

/// Depth of the background plane behind the glass mesh.
pub const PLANE_Z: f32 = -1000.0;

/// Everything the offset depends on, sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameState {
    /// Full scrollable document size.
    pub document_size: [f32; 2],
    pub bounds: ElementBounds,
    pub scroll: [f32; 2],
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParallaxOffset {
    pub x: f32,
    pub y: f32,
}

pub fn parallax_offset(frame: &FrameState) -> ParallaxOffset {
    let [docw, doch] = frame.document_size;
    let b = &frame.bounds;
    let x_offset = b.left + b.width / 2.0 - docw / 2.0;
    let y_offset = b.top + b.height / 2.0 - doch / 2.0;
    ParallaxOffset {
        x: frame.scroll[0] - x_offset,
        y: frame.scroll[1] + y_offset,
    }
}

/// Recomputes the offset every frame and reports it only when it moved, so an
/// on-demand renderer invalidates only when the plane actually changes.
#[derive(Debug, Default)]
pub struct ParallaxCoordinator {
    last: Option<ParallaxOffset>,
}

impl ParallaxCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value written to the plane.
    pub fn current(&self) -> Option<ParallaxOffset> {
        self.last
    }

    pub fn update(&mut self, frame: &FrameState) -> Option<ParallaxOffset> {
        if frame.bounds.is_empty() {
            return None;
        }
        let next = parallax_offset(frame);
        if self.last == Some(next) {
            return None;
        }
        self.last = Some(next);
        Some(next)
    }

    /// Forget the last written value, e.g. after the plane was recreated.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(scroll_y: f32) -> FrameState {
        FrameState {
            document_size: [2000.0, 4000.0],
            bounds: ElementBounds::from_rect(850.0, 300.0, 300.0, 200.0),
            scroll: [0.0, scroll_y],
        }
    }

    #[test]
    fn offset_matches_reference_values() {
        let offset = parallax_offset(&frame(500.0));
        assert_eq!(offset, ParallaxOffset { x: 0.0, y: -1100.0 });
    }

    #[test]
    fn writes_only_on_change() {
        let mut coord = ParallaxCoordinator::new();
        assert_eq!(coord.update(&frame(500.0)), Some(ParallaxOffset { x: 0.0, y: -1100.0 }));
        assert_eq!(coord.update(&frame(500.0)), None);
        assert_eq!(coord.update(&frame(520.0)), Some(ParallaxOffset { x: 0.0, y: -1080.0 }));
        assert_eq!(coord.current(), Some(ParallaxOffset { x: 0.0, y: -1080.0 }));

        coord.reset();
        assert!(coord.update(&frame(520.0)).is_some());
    }

    #[test]
    fn empty_bounds_skip_the_write() {
        let mut coord = ParallaxCoordinator::new();
        coord.update(&frame(0.0));
        let empty = FrameState { bounds: ElementBounds::ZERO, ..frame(100.0) };
        assert_eq!(coord.update(&empty), None);
        assert_eq!(coord.current(), Some(parallax_offset(&frame(0.0))));
    }
}
