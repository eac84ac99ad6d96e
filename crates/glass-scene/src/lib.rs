//! glass-scene: keeps the glass layer in step with the host page.
//!
//! [`BoundsTracker`] mirrors the element's box into a shared cell on every
//! layout event, and [`GlassLayer`] composes bounds, background capture,
//! silhouette, parallax and material into one [`FrameUpdate`] per frame.

pub mod layer;
pub mod tracker;

pub use layer::{FrameInput, FrameUpdate, GlassLayer, GlassMaterial, LayerError};
pub use tracker::{
    BoundsCell, BoundsTracker, ElementBox, LayoutEventHub, LayoutEventKind, LayoutEvents, Listener,
    ListenerId,
};
