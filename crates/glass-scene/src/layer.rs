//! Per-frame composition of the glass layer.
//!
//! [`GlassLayer`] owns the moving parts (bounds tracker, capture scheduler,
//! silhouette cache, parallax coordinator) and turns them into a
//! [`FrameUpdate`] the renderer applies. Each field of the update is `Some`
//! only when that part changed since the previous frame.

use std::sync::Arc;

use glass_capture::{CaptureError, CaptureHandle, DocumentCapture, TextureCaptureScheduler, TriggerOutcome};
use glass_config::GlassConfig;
use glass_core::{
    ElementBounds, FallbackStyle, FrameState, OrthoCamera, ParallaxCoordinator, ParallaxOffset,
    PhysicalMaterial, PhysicalMaterialParams, Presentation, SceneLights, SilhouetteCache,
    SilhouetteFrame, physical_params,
};
use thiserror::Error;
use tracing::debug;

use crate::tracker::{BoundsTracker, ElementBox, LayoutEventKind, LayoutEvents, ListenerId};

#[derive(Error, Debug)]
pub enum LayerError {
    #[error("invalid fallback colour {color:?}: {message}")]
    FallbackColor { color: String, message: String },

    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// Document state sampled by the host at the start of a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Full scrollable document size.
    pub document_size: [f32; 2],
    pub scroll: [f32; 2],
}

/// Material settings resolved for the current element size.
#[derive(Clone, Debug, PartialEq)]
pub struct GlassMaterial {
    pub surface: PhysicalMaterial,
    pub scene: PhysicalMaterialParams,
}

/// What the renderer has to apply this frame.
#[derive(Clone, Debug, Default)]
pub struct FrameUpdate {
    pub camera: Option<OrthoCamera>,
    pub silhouette: Option<SilhouetteFrame>,
    pub plane_offset: Option<ParallaxOffset>,
    pub material: Option<GlassMaterial>,
    pub texture: Option<CaptureHandle>,
    pub presentation: Option<Presentation>,
}

impl FrameUpdate {
    /// Nothing changed; an on-demand renderer can skip the frame.
    pub fn is_empty(&self) -> bool {
        self.camera.is_none()
            && self.silhouette.is_none()
            && self.plane_offset.is_none()
            && self.material.is_none()
            && self.texture.is_none()
            && self.presentation.is_none()
    }
}

pub struct GlassLayer<C: DocumentCapture> {
    config: GlassConfig,
    events: Arc<dyn LayoutEvents>,
    tracker: BoundsTracker,
    scheduler: TextureCaptureScheduler<C>,
    document_listener: ListenerId,
    lights: SceneLights,
    fallback: FallbackStyle,
    silhouette: SilhouetteCache,
    parallax: ParallaxCoordinator,
    size: Option<[f32; 2]>,
    scale: Option<[f32; 2]>,
    texture_generation: Option<u64>,
    gpu_capable: bool,
    presentation: Option<Presentation>,
}

impl<C: DocumentCapture> GlassLayer<C> {
    /// Build a layer around an existing scheduler. Document resizes trigger a recapture.
    pub fn new(
        config: GlassConfig,
        events: Arc<dyn LayoutEvents>,
        scheduler: TextureCaptureScheduler<C>,
    ) -> Result<Self, LayerError> {
        let color = &config.presentation.fallback_color;
        let fallback = FallbackStyle::new(color, &config.scene).map_err(|e| LayerError::FallbackColor {
            color: color.clone(),
            message: e.to_string(),
        })?;

        let trigger = scheduler.clone();
        let document_listener = events.add_listener(
            LayoutEventKind::DocumentResize,
            Arc::new(move || {
                trigger.trigger();
            }),
        );

        Ok(Self {
            lights: SceneLights::from_config(&config.scene.lighting).with_key_light(&config.glass.light),
            tracker: BoundsTracker::new(events.clone()),
            events,
            scheduler,
            document_listener,
            fallback,
            silhouette: SilhouetteCache::default(),
            parallax: ParallaxCoordinator::new(),
            size: None,
            scale: None,
            texture_generation: None,
            gpu_capable: true,
            presentation: None,
            config,
        })
    }

    /// Layer capturing the whole document on the current tokio runtime.
    pub fn from_config(capturer: C, config: GlassConfig, events: Arc<dyn LayoutEvents>) -> Result<Self, LayerError> {
        let scheduler = TextureCaptureScheduler::from_config(capturer, &config)?;
        Self::new(config, events, scheduler)
    }

    /// Track `element` and request the initial background capture.
    pub fn attach(&mut self, element: Arc<dyn ElementBox>) -> TriggerOutcome {
        self.tracker.attach(element);
        self.scheduler.trigger()
    }

    pub fn detach(&mut self) {
        self.tracker.detach();
    }

    /// Request a recapture after a host-declared dependency changed.
    pub fn refresh_background(&self) -> TriggerOutcome {
        self.scheduler.trigger()
    }

    pub fn bounds(&self) -> ElementBounds {
        self.tracker.bounds()
    }

    pub fn tracker(&self) -> &BoundsTracker {
        &self.tracker
    }

    pub fn scheduler(&self) -> &TextureCaptureScheduler<C> {
        &self.scheduler
    }

    pub fn lights(&self) -> &SceneLights {
        &self.lights
    }

    /// Host verdict on whether the GPU can afford the refractive pass.
    /// A weak GPU keeps the fallback presentation.
    pub fn set_gpu_capable(&mut self, capable: bool) {
        self.gpu_capable = capable;
    }

    pub fn config(&self) -> &GlassConfig {
        &self.config
    }

    /// Rebuild the silhouette and rewrite every part on the next frame.
    pub fn invalidate(&mut self) {
        self.silhouette.invalidate();
        self.parallax.reset();
        self.size = None;
        self.scale = None;
        self.texture_generation = None;
        self.presentation = None;
    }

    /// Resolve this frame: camera, silhouette scale, then plane offset.
    pub fn frame(&mut self, input: &FrameInput) -> FrameUpdate {
        let bounds = self.tracker.bounds();
        let mut update = FrameUpdate::default();

        let size = [bounds.width, bounds.height];
        if !bounds.is_empty() && self.size != Some(size) {
            update.camera = OrthoCamera::from_bounds(&bounds);
            let surface = PhysicalMaterial::for_bounds(&self.config.glass, &bounds);
            update.material = Some(GlassMaterial {
                scene: physical_params(&self.config.scene.material, surface.thickness),
                surface,
            });
            debug!(width = size[0], height = size[1], "glass element resized");
            self.size = Some(size);
        }

        if let Some(silhouette) = self.silhouette.update(&bounds, self.config.presentation.border_radius) {
            if silhouette.rebuilt || self.scale != Some(silhouette.scale) {
                self.scale = Some(silhouette.scale);
                update.silhouette = Some(silhouette);
            }
        }

        update.plane_offset = self.parallax.update(&FrameState {
            document_size: input.document_size,
            bounds,
            scroll: input.scroll,
        });

        let texture = self.scheduler.current_texture();
        let generation = texture.as_ref().map(CaptureHandle::generation);
        if generation != self.texture_generation {
            self.texture_generation = generation;
            update.texture = texture.clone();
        }

        let presentation = Presentation::choose(
            texture.is_some(),
            self.gpu_capable,
            self.config.presentation.reduced_motion,
            &bounds,
            self.fallback,
        );
        if self.presentation != Some(presentation) {
            self.presentation = Some(presentation);
            update.presentation = Some(presentation);
        }

        update
    }
}

impl<C: DocumentCapture> Drop for GlassLayer<C> {
    fn drop(&mut self) {
        self.events.remove_listener(self.document_listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::LayoutEventHub;
    use glass_capture::{CaptureOptions, CaptureRoot, PixelBuffer};
    use parking_lot::RwLock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct StaticPage {
        calls: AtomicUsize,
        offline: bool,
    }

    impl DocumentCapture for StaticPage {
        async fn capture(&self, _root: &CaptureRoot, _options: &CaptureOptions) -> glass_capture::Result<PixelBuffer> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.offline {
                return Err(CaptureError::Failed("page unavailable".into()));
            }
            Ok(PixelBuffer::new(16, 16))
        }
    }

    struct Panel(RwLock<ElementBounds>);

    impl Panel {
        fn new(x: f32, y: f32, w: f32, h: f32) -> Arc<Self> {
            Arc::new(Self(RwLock::new(ElementBounds::from_rect(x, y, w, h))))
        }
    }

    impl ElementBox for Panel {
        fn bounding_rect(&self) -> ElementBounds {
            *self.0.read()
        }
    }

    const INPUT: FrameInput = FrameInput { document_size: [2000.0, 4000.0], scroll: [0.0, 500.0] };

    fn layer(config: GlassConfig, page: StaticPage) -> (Arc<LayoutEventHub>, GlassLayer<Arc<StaticPage>>, Arc<StaticPage>) {
        let hub = Arc::new(LayoutEventHub::new());
        let page = Arc::new(page);
        let layer = GlassLayer::from_config(page.clone(), config, hub.clone()).unwrap();
        (hub, layer, page)
    }

    #[tokio::test]
    async fn unattached_layer_presents_fallback_only() {
        let (_hub, mut layer, page) = layer(GlassConfig::default(), StaticPage::default());
        let update = layer.frame(&INPUT);
        assert!(update.camera.is_none());
        assert!(update.silhouette.is_none());
        assert!(update.plane_offset.is_none());
        assert!(matches!(update.presentation, Some(Presentation::Fallback(_))));
        assert_eq!(page.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn first_frame_after_capture_is_complete() {
        let (_hub, mut layer, _page) = layer(GlassConfig::default(), StaticPage::default());
        assert_eq!(layer.attach(Panel::new(850.0, 300.0, 300.0, 200.0)), TriggerOutcome::Started);
        layer.scheduler().wait_idle().await;

        let update = layer.frame(&INPUT);
        let camera = update.camera.unwrap();
        assert_eq!((camera.width(), camera.height()), (300.0, 200.0));
        assert!(update.silhouette.unwrap().rebuilt);
        assert_eq!(update.plane_offset, Some(ParallaxOffset { x: 0.0, y: -1100.0 }));
        assert!(update.material.is_some());
        assert_eq!(update.texture.unwrap().width(), 16);
        assert_eq!(update.presentation, Some(Presentation::Refractive));

        assert!(layer.frame(&INPUT).is_empty());
    }

    #[tokio::test]
    async fn scroll_only_moves_the_plane() {
        let (_hub, mut layer, _page) = layer(GlassConfig::default(), StaticPage::default());
        layer.attach(Panel::new(850.0, 300.0, 300.0, 200.0));
        layer.scheduler().wait_idle().await;
        layer.frame(&INPUT);

        let scrolled = FrameInput { scroll: [0.0, 520.0], ..INPUT };
        let update = layer.frame(&scrolled);
        assert_eq!(update.plane_offset, Some(ParallaxOffset { x: 0.0, y: -1080.0 }));
        assert!(update.camera.is_none());
        assert!(update.silhouette.is_none());
        assert!(update.texture.is_none());
    }

    #[tokio::test]
    async fn resize_rescales_without_retessellating() {
        let (hub, mut layer, _page) = layer(GlassConfig::default(), StaticPage::default());
        let panel = Panel::new(0.0, 0.0, 300.0, 200.0);
        layer.attach(panel.clone());
        layer.scheduler().wait_idle().await;
        layer.frame(&INPUT);

        *panel.0.write() = ElementBounds::from_rect(0.0, 0.0, 600.0, 100.0);
        hub.emit(LayoutEventKind::ElementResize);
        let update = layer.frame(&INPUT);

        assert_eq!(update.camera.unwrap().width(), 600.0);
        let silhouette = update.silhouette.unwrap();
        assert!(!silhouette.rebuilt);
        assert_eq!(silhouette.scale, [2.0, 0.5]);
        assert!(update.material.is_some());
    }

    #[tokio::test]
    async fn document_resize_recaptures() {
        let (hub, mut layer, page) = layer(GlassConfig::default(), StaticPage::default());
        layer.attach(Panel::new(0.0, 0.0, 300.0, 200.0));
        layer.scheduler().wait_idle().await;
        let first = layer.frame(&INPUT).texture.unwrap().generation();

        hub.emit(LayoutEventKind::DocumentResize);
        layer.scheduler().wait_idle().await;
        let second = layer.frame(&INPUT).texture.unwrap().generation();

        assert!(second > first);
        assert_eq!(page.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn reduced_motion_keeps_fallback() {
        let mut config = GlassConfig::default();
        config.presentation.reduced_motion = true;
        let (_hub, mut layer, _page) = layer(config, StaticPage::default());
        layer.attach(Panel::new(0.0, 0.0, 300.0, 200.0));
        layer.scheduler().wait_idle().await;

        let update = layer.frame(&INPUT);
        assert!(update.texture.is_some());
        assert!(matches!(update.presentation, Some(Presentation::Fallback(_))));
    }

    #[tokio::test]
    async fn weak_gpu_keeps_fallback_until_cleared() {
        let (_hub, mut layer, _page) = layer(GlassConfig::default(), StaticPage::default());
        layer.set_gpu_capable(false);
        layer.attach(Panel::new(0.0, 0.0, 300.0, 200.0));
        layer.scheduler().wait_idle().await;

        let update = layer.frame(&INPUT);
        assert!(update.texture.is_some());
        assert!(matches!(update.presentation, Some(Presentation::Fallback(_))));

        layer.set_gpu_capable(true);
        assert_eq!(layer.frame(&INPUT).presentation, Some(Presentation::Refractive));
    }

    #[tokio::test]
    async fn glass_light_joins_the_scene_lights() {
        let (_hub, layer, _page) = layer(GlassConfig::default(), StaticPage::default());
        let lights = layer.lights();
        assert_eq!(lights.directional.len(), 3);
        assert!((lights.ambient_intensity - 6.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn failed_capture_degrades_to_fallback() {
        let (_hub, mut layer, _page) = layer(GlassConfig::default(), StaticPage { offline: true, ..Default::default() });
        layer.attach(Panel::new(0.0, 0.0, 300.0, 200.0));
        layer.scheduler().wait_idle().await;

        let update = layer.frame(&INPUT);
        assert!(update.texture.is_none());
        assert!(update.camera.is_some());
        assert!(matches!(update.presentation, Some(Presentation::Fallback(_))));
    }

    #[tokio::test]
    async fn bad_fallback_color_is_rejected() {
        let mut config = GlassConfig::default();
        config.presentation.fallback_color = "teal-ish".into();
        let hub = Arc::new(LayoutEventHub::new());
        let result = GlassLayer::from_config(StaticPage::default(), config, hub.clone());
        assert!(matches!(result, Err(LayerError::FallbackColor { .. })));
        assert_eq!(hub.listener_count(), 0);
    }

    #[tokio::test]
    async fn drop_unregisters_everything() {
        let (hub, mut layer, _page) = layer(GlassConfig::default(), StaticPage::default());
        layer.attach(Panel::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(hub.listener_count(), LayoutEventKind::ALL.len() + 1);
        drop(layer);
        assert_eq!(hub.listener_count(), 0);
    }
}
