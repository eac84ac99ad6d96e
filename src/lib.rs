//! Glass panels whose background is a live capture of the page behind them.
//!
//! This crate bundles the workspace crates and adds the host-facing setup:
//!
//! - [`glass_config`]: TOML + environment configuration
//! - [`glass_core`]: per-frame geometry, parallax, camera, lights and material
//! - [`glass_capture`]: coalescing background capture scheduler
//! - [`glass_scene`]: bounds tracking and per-frame composition

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

pub use glass_capture;
pub use glass_config;
pub use glass_core;
pub use glass_scene;

pub use glass_capture::{CaptureHandle, DocumentCapture, TextureCaptureScheduler};
pub use glass_config::GlassConfig;
pub use glass_scene::{FrameInput, FrameUpdate, GlassLayer, LayoutEventHub, LayoutEvents};

/// Read `path` if given, otherwise `glass.toml` when present, then apply environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<GlassConfig> {
    let mut config = match path {
        Some(path) => GlassConfig::load_from_file(path)
            .with_context(|| format!("loading glass config from {}", path.display()))?,
        None => GlassConfig::load_or_default(),
    };
    config.merge_with_env();
    tracing::debug!(presentation = ?config.presentation, "glass config loaded");
    Ok(config)
}

/// Create a layer that captures through `capturer`. Must run inside a tokio runtime.
pub fn glass_layer<C: DocumentCapture>(
    capturer: C,
    config: GlassConfig,
    events: Arc<dyn LayoutEvents>,
) -> Result<GlassLayer<C>> {
    GlassLayer::from_config(capturer, config, events).context("creating glass layer")
}
