//! Glass mesh silhouette: tessellated once at its nominal size, rescaled after.
//!
//! Tessellating the bevelled outline is the expensive part of building the
//! glass mesh, so the cache keeps the mesh built for the first size it saw and
//! hands out a scale factor for later sizes. Only an explicit invalidation or a
//! new corner radius rebuilds it.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use lyon_tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, TessellationError, VertexBuffers,
};
use tracing::{debug, warn};

use crate::bounds::ElementBounds;
use crate::geometry::{GeometryPath, rounded_rect_path};

/// Extra bevel beyond half the corner radius.
pub const BEVEL_PADDING: f32 = 16.0;
pub const DEFAULT_TOLERANCE: f32 = 0.1;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SilhouetteVertex {
    pub pos: [f32; 2],
}

/// Size the mesh was built for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NominalSize {
    pub width: f32,
    pub height: f32,
    pub radius: f32,
}

/// Extrusion parameters handed to the renderer along with the outline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtrudeSettings {
    pub depth: f32,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub curve_segments: u32,
    pub bevel_segments: u32,
}

#[derive(Clone, Debug)]
pub struct SilhouetteMesh {
    pub nominal: NominalSize,
    pub outline: GeometryPath,
    pub extrude: ExtrudeSettings,
    pub vertices: Vec<SilhouetteVertex>,
    pub indices: Vec<u16>,
}

/// Per-frame view of the cached mesh.
#[derive(Clone, Debug)]
pub struct SilhouetteFrame {
    pub mesh: Arc<SilhouetteMesh>,
    /// Scale to apply to the mesh so it covers the current bounds.
    pub scale: [f32; 2],
    /// True when the mesh was tessellated during this update.
    pub rebuilt: bool,
}

pub fn bevel_size(radius: f32) -> f32 {
    radius / 2.0 + BEVEL_PADDING
}

/// Outline of the glass body before bevelling: inset by the bevel on each side.
pub fn extrusion_profile(nominal: NominalSize) -> (GeometryPath, ExtrudeSettings) {
    let bevel = bevel_size(nominal.radius);
    let outline = rounded_rect_path(
        nominal.width - bevel * 2.0,
        nominal.height - bevel * 2.0,
        nominal.radius / 2.0,
    );
    let extrude = ExtrudeSettings {
        depth: 0.0,
        bevel_thickness: BEVEL_PADDING,
        bevel_size: bevel,
        curve_segments: 32,
        bevel_segments: 32,
    };
    (outline, extrude)
}

pub fn tessellate(nominal: NominalSize, tolerance: f32) -> Result<SilhouetteMesh, TessellationError> {
    let (outline, extrude) = extrusion_profile(nominal);
    let lyon_path = outline.to_lyon();

    let mut geom: VertexBuffers<SilhouetteVertex, u16> = VertexBuffers::new();
    let mut tess = FillTessellator::new();
    tess.tessellate_path(
        lyon_path.as_slice(),
        &FillOptions::default().with_tolerance(tolerance),
        &mut BuffersBuilder::new(&mut geom, |fv: FillVertex| {
            let p = fv.position();
            SilhouetteVertex { pos: [p.x, p.y] }
        }),
    )?;

    Ok(SilhouetteMesh {
        nominal,
        outline,
        extrude,
        vertices: geom.vertices,
        indices: geom.indices,
    })
}

pub struct SilhouetteCache {
    tolerance: f32,
    mesh: Option<Arc<SilhouetteMesh>>,
    builds: u64,
}

impl Default for SilhouetteCache {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl SilhouetteCache {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance, mesh: None, builds: 0 }
    }

    /// Number of tessellations performed so far.
    pub fn builds(&self) -> u64 {
        self.builds
    }

    pub fn mesh(&self) -> Option<&Arc<SilhouetteMesh>> {
        self.mesh.as_ref()
    }

    /// Drop the cached mesh; the next update tessellates at the then-current size.
    pub fn invalidate(&mut self) {
        self.mesh = None;
    }

    /// Resolve the silhouette for `bounds`. Returns `None` while bounds are empty.
    pub fn update(&mut self, bounds: &ElementBounds, radius: f32) -> Option<SilhouetteFrame> {
        if bounds.is_empty() {
            return None;
        }

        let stale = self.mesh.as_ref().is_none_or(|m| m.nominal.radius != radius);
        let mut rebuilt = false;
        if stale {
            let nominal = NominalSize { width: bounds.width, height: bounds.height, radius };
            match tessellate(nominal, self.tolerance) {
                Ok(mesh) => {
                    self.builds += 1;
                    debug!(
                        width = nominal.width,
                        height = nominal.height,
                        radius,
                        vertices = mesh.vertices.len(),
                        "tessellated glass silhouette"
                    );
                    self.mesh = Some(Arc::new(mesh));
                    rebuilt = true;
                }
                Err(e) => {
                    warn!("silhouette tessellation failed: {e:?}");
                    self.mesh = None;
                    return None;
                }
            }
        }

        let mesh = self.mesh.clone()?;
        let scale = [
            bounds.width / mesh.nominal.width,
            bounds.height / mesh.nominal.height,
        ];
        Some(SilhouetteFrame { mesh, scale, rebuilt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(w: f32, h: f32) -> ElementBounds {
        ElementBounds::from_rect(0.0, 0.0, w, h)
    }

    #[test]
    fn profile_is_inset_by_bevel() {
        let (outline, extrude) = extrusion_profile(NominalSize { width: 300.0, height: 200.0, radius: 16.0 });
        assert_eq!(extrude.bevel_size, 24.0);
        // 300 - 48 = 252 wide, so the outline spans +-126
        let max_x = outline.points().map(|p| p[0]).fold(f32::MIN, f32::max);
        assert_eq!(max_x, 126.0);
        assert!(outline.is_closed());
    }

    #[test]
    fn tessellation_produces_triangles() {
        let mesh = tessellate(NominalSize { width: 300.0, height: 200.0, radius: 16.0 }, 0.1).unwrap();
        assert!(!mesh.vertices.is_empty());
        assert!(!mesh.indices.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    #[test]
    fn resize_rescales_instead_of_rebuilding() {
        let mut cache = SilhouetteCache::default();
        let first = cache.update(&bounds(300.0, 200.0), 16.0).unwrap();
        assert!(first.rebuilt);
        assert_eq!(first.scale, [1.0, 1.0]);

        let second = cache.update(&bounds(600.0, 100.0), 16.0).unwrap();
        assert!(!second.rebuilt);
        assert_eq!(second.scale, [2.0, 0.5]);
        assert!(Arc::ptr_eq(&first.mesh, &second.mesh));
        assert_eq!(cache.builds(), 1);
    }

    #[test]
    fn radius_change_and_invalidate_rebuild() {
        let mut cache = SilhouetteCache::default();
        cache.update(&bounds(300.0, 200.0), 16.0);
        let changed = cache.update(&bounds(300.0, 200.0), 32.0).unwrap();
        assert!(changed.rebuilt);

        cache.invalidate();
        let rebuilt = cache.update(&bounds(400.0, 200.0), 32.0).unwrap();
        assert!(rebuilt.rebuilt);
        assert_eq!(rebuilt.scale, [1.0, 1.0]);
        assert_eq!(rebuilt.mesh.nominal.width, 400.0);
        assert_eq!(cache.builds(), 3);
    }

    #[test]
    fn empty_bounds_build_nothing() {
        let mut cache = SilhouetteCache::default();
        assert!(cache.update(&ElementBounds::ZERO, 16.0).is_none());
        assert_eq!(cache.builds(), 0);
        assert!(cache.mesh().is_none());
    }
}
