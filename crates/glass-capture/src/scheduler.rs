//! Single-flight capture scheduler.
//!
//! State machine: `Idle -> Running -> { Idle | RunningWithRerun -> Running }`.
//! A trigger while idle starts a capture; triggers while a capture runs only
//! mark one rerun. When a capture finishes with a rerun pending its result is
//! dropped and the next capture starts straight away, so a burst of triggers
//! costs at most two captures and the published texture reflects the layout
//! after the last trigger.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};

use glass_config::GlassConfig;

use crate::error::{CaptureError, Result};
use crate::frame::PixelBuffer;
use crate::handle::{CaptureHandle, TextureSlot};
use crate::{CaptureOptions, CaptureRoot, DocumentCapture};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Idle,
    Running,
    RunningWithRerun,
}

/// What a call to [`TextureCaptureScheduler::trigger`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A capture was started.
    Started,
    /// A capture is running; one rerun is now queued.
    Coalesced,
    /// A rerun was already queued; nothing changed.
    AlreadyPending,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    pub started: u64,
    pub published: u64,
    pub failed: u64,
    /// Captures whose result was dropped because a rerun was pending.
    pub superseded: u64,
    /// Triggers folded into a running capture.
    pub coalesced: u64,
}

struct Inner {
    state: SchedulerState,
    stats: CaptureStats,
}

struct Shared<C> {
    capturer: C,
    root: CaptureRoot,
    options: CaptureOptions,
    blur: f32,
    inner: Mutex<Inner>,
    slot: TextureSlot,
    state_tx: watch::Sender<SchedulerState>,
    published_tx: watch::Sender<u64>,
}

impl<C> Shared<C> {
    // Caller holds the `inner` lock, which keeps the mirror in transition order.
    fn set_state(&self, inner: &mut Inner, state: SchedulerState) {
        inner.state = state;
        self.state_tx.send_replace(state);
    }
}

impl<C: DocumentCapture> Shared<C> {
    async fn capture_once(&self) -> Result<PixelBuffer> {
        let buffer = self.capturer.capture(&self.root, &self.options).await?;
        if buffer.is_empty() {
            return Err(CaptureError::Unsupported("capture produced an empty image".to_string()));
        }
        if self.blur <= 0.0 {
            return Ok(buffer);
        }
        let sigma = self.blur;
        tokio::task::spawn_blocking(move || buffer.blurred(sigma))
            .await
            .map_err(|e| CaptureError::Failed(format!("blur task: {e}")))
    }
}

/// Coalescing scheduler producing the current background texture.
pub struct TextureCaptureScheduler<C> {
    runtime: Handle,
    shared: Arc<Shared<C>>,
}

impl<C> Clone for TextureCaptureScheduler<C> {
    fn clone(&self) -> Self {
        Self { runtime: self.runtime.clone(), shared: self.shared.clone() }
    }
}

impl<C: DocumentCapture> TextureCaptureScheduler<C> {
    /// Create a scheduler that runs captures on the current tokio runtime.
    ///
    /// `blur` is the gaussian sigma applied to each capture before publishing.
    pub fn new(capturer: C, root: CaptureRoot, options: CaptureOptions, blur: f32) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| CaptureError::NoRuntime)?;
        Ok(Self::with_runtime(runtime, capturer, root, options, blur))
    }

    /// Scheduler for the whole document, configured from capture and plane settings.
    pub fn from_config(capturer: C, config: &GlassConfig) -> Result<Self> {
        Self::new(
            capturer,
            CaptureRoot::Document,
            CaptureOptions::from_config(&config.capture),
            config.scene.plane.blur,
        )
    }

    pub fn with_runtime(
        runtime: Handle,
        capturer: C,
        root: CaptureRoot,
        options: CaptureOptions,
        blur: f32,
    ) -> Self {
        let (state_tx, _) = watch::channel(SchedulerState::Idle);
        let (published_tx, _) = watch::channel(0);
        Self {
            runtime,
            shared: Arc::new(Shared {
                capturer,
                root,
                options,
                blur,
                inner: Mutex::new(Inner { state: SchedulerState::Idle, stats: CaptureStats::default() }),
                slot: TextureSlot::new(),
                state_tx,
                published_tx,
            }),
        }
    }

    /// Request a fresh capture: layout changed, a dependency changed, or first mount.
    pub fn trigger(&self) -> TriggerOutcome {
        let mut inner = self.shared.inner.lock();
        match inner.state {
            SchedulerState::Idle => {
                self.shared.set_state(&mut inner, SchedulerState::Running);
                drop(inner);
                self.runtime.spawn(run(self.shared.clone()));
                TriggerOutcome::Started
            }
            SchedulerState::Running => {
                inner.stats.coalesced += 1;
                self.shared.set_state(&mut inner, SchedulerState::RunningWithRerun);
                debug!("capture in flight, queued one rerun");
                TriggerOutcome::Coalesced
            }
            SchedulerState::RunningWithRerun => {
                inner.stats.coalesced += 1;
                TriggerOutcome::AlreadyPending
            }
        }
    }

    /// The texture the renderer should sample, if any capture has succeeded.
    pub fn current_texture(&self) -> Option<CaptureHandle> {
        self.shared.slot.get()
    }

    pub fn state(&self) -> SchedulerState {
        self.shared.inner.lock().state
    }

    pub fn stats(&self) -> CaptureStats {
        self.shared.inner.lock().stats
    }

    /// Receiver that changes to the generation of every newly published texture.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.published_tx.subscribe()
    }

    /// Resolve once no capture is running or queued.
    pub async fn wait_idle(&self) {
        let mut rx = self.shared.state_tx.subscribe();
        // the sender lives in `shared`, so this cannot observe a closed channel
        let _ = rx.wait_for(|s| *s == SchedulerState::Idle).await;
    }
}

async fn run<C: DocumentCapture>(shared: Arc<Shared<C>>) {
    loop {
        let generation = {
            let mut inner = shared.inner.lock();
            inner.stats.started += 1;
            inner.stats.started
        };
        debug!(generation, "starting document capture");

        // a panicking backend counts as a failed capture so the state machine still settles
        let result = AssertUnwindSafe(shared.capture_once())
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(CaptureError::Failed("capture backend panicked".to_string())));

        let mut inner = shared.inner.lock();
        if inner.state == SchedulerState::RunningWithRerun {
            match &result {
                Ok(_) => inner.stats.superseded += 1,
                Err(e) => {
                    inner.stats.failed += 1;
                    warn!(generation, error = %e, "document capture failed");
                }
            }
            shared.set_state(&mut inner, SchedulerState::Running);
            debug!(generation, "layout changed during capture, capturing again");
            continue;
        }

        let replaced = match result {
            Ok(buffer) => {
                let (width, height) = (buffer.width, buffer.height);
                let replaced = shared.slot.replace(CaptureHandle::new(buffer, generation));
                inner.stats.published += 1;
                debug!(generation, width, height, "published background texture");
                Some(replaced)
            }
            Err(e) => {
                inner.stats.failed += 1;
                warn!(generation, error = %e, "document capture failed, keeping previous texture");
                None
            }
        };
        shared.set_state(&mut inner, SchedulerState::Idle);
        drop(inner);

        if let Some(replaced) = replaced {
            shared.published_tx.send_replace(generation);
            // release the superseded texture only after the new one is installed
            drop(replaced);
        }
        break;
    }
}
