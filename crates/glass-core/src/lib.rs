//! glass-core: the pure, per-frame side of the glass background engine.
//!
//! Everything here is synchronous and allocation-light so it can run inside a
//! render loop: element bounds, the rounded-rectangle outline and its cached
//! silhouette mesh, the background-plane parallax, camera framing, lighting
//! and the perceptual-to-physical material mapping.

mod bounds;
pub mod camera;
pub mod geometry;
pub mod lights;
pub mod material;
pub mod parallax;
pub mod presentation;
pub mod silhouette;

pub use bounds::ElementBounds;
pub use camera::OrthoCamera;
pub use geometry::{GeometryPath, PathCmd, rounded_rect_path};
pub use lights::{SceneLights, dir_from_angle};
pub use material::{PhysicalMaterial, PhysicalMaterialParams, physical_params};
pub use parallax::{FrameState, ParallaxCoordinator, ParallaxOffset, parallax_offset};
pub use presentation::{FallbackStyle, Presentation};
pub use silhouette::{SilhouetteCache, SilhouetteFrame, SilhouetteMesh};
