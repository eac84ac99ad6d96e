//! Document background capture for the glass plane.
//!
//! Rasterizing the page is expensive, so captures go through a
//! [`TextureCaptureScheduler`] that keeps at most one capture in flight and
//! folds any number of triggers that arrive meanwhile into a single rerun.
//! The latest successful capture is exposed as a [`CaptureHandle`].
//!
//! # Features
//!
//! - `cdp`: capture through headless Chrome via chromiumoxide

use std::future::Future;

mod error;
mod exclusion;
mod frame;
mod handle;
mod scheduler;

#[cfg(feature = "cdp")]
mod cdp_backend;

pub use error::{CaptureError, Result};
pub use exclusion::{CaptureNode, ExclusionRules};
pub use frame::{PixelBuffer, PixelFormat};
pub use handle::{CaptureHandle, TextureSlot};
pub use scheduler::{CaptureStats, SchedulerState, TextureCaptureScheduler, TriggerOutcome};

#[cfg(feature = "cdp")]
pub use cdp_backend::{CdpConfig, CdpDocumentCapture};

use glass_config::CaptureConfig;

/// What to rasterize.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CaptureRoot {
    /// The whole document element.
    #[default]
    Document,
    /// The first element matching a CSS selector.
    Element(String),
}

/// Options forwarded to the capture backend.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOptions {
    /// Raster scale factor (1.0 = CSS pixels).
    pub scale: f32,
    /// Maximum time to wait for images inside the document.
    pub image_timeout_ms: u64,
    pub allow_taint: bool,
    pub use_cors: bool,
    pub exclusions: ExclusionRules,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self::from_config(&CaptureConfig::default())
    }
}

impl CaptureOptions {
    pub fn from_config(cfg: &CaptureConfig) -> Self {
        Self {
            scale: cfg.scale,
            image_timeout_ms: cfg.image_timeout_ms,
            allow_taint: cfg.allow_taint,
            use_cors: cfg.use_cors,
            exclusions: ExclusionRules::from_config(cfg),
        }
    }
}

/// Backend that turns the live document into pixels.
///
/// Implementations must honor `options.exclusions` so the render canvas never
/// ends up inside its own background.
pub trait DocumentCapture: Send + Sync + 'static {
    fn capture(
        &self,
        root: &CaptureRoot,
        options: &CaptureOptions,
    ) -> impl Future<Output = Result<PixelBuffer>> + Send;
}

impl<T: DocumentCapture> DocumentCapture for std::sync::Arc<T> {
    fn capture(
        &self,
        root: &CaptureRoot,
        options: &CaptureOptions,
    ) -> impl Future<Output = Result<PixelBuffer>> + Send {
        (**self).capture(root, options)
    }
}
