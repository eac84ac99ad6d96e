//! CDP (Chrome DevTools Protocol) capture backend using chromiumoxide.
//!
//! Drives a headless Chrome/Chromium page and screenshots it. Excluded
//! subtrees are hidden with an injected style sheet for the duration of the
//! screenshot.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::error::{CaptureError, Result};
use crate::frame::PixelBuffer;
use crate::{CaptureOptions, CaptureRoot, DocumentCapture};

const EXCLUSION_STYLE_ID: &str = "__glass_capture_exclusions";

const WAIT_FOR_IMAGES: &str = "Promise.all(Array.from(document.images)\
    .filter(img => !img.complete)\
    .map(img => new Promise(done => { img.onload = img.onerror = done; })))";

/// Browser settings for [`CdpDocumentCapture`].
#[derive(Debug, Clone)]
pub struct CdpConfig {
    /// Page to load on launch.
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub disable_gpu: bool,
    /// Extra command line switches passed to the browser.
    pub args: Vec<String>,
}

impl Default for CdpConfig {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            width: 1280,
            height: 720,
            disable_gpu: true,
            args: Vec::new(),
        }
    }
}

/// Headless Chrome page used as a capture source.
pub struct CdpDocumentCapture {
    _browser: Browser,
    page: Page,
    config: CdpConfig,
    handler: JoinHandle<()>,
}

impl CdpDocumentCapture {
    /// Launch the browser and open `config.url`. Must be called inside a tokio runtime.
    pub async fn launch(config: CdpConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(config.width, config.height)
            .viewport(None);
        if config.disable_gpu {
            builder = builder.arg("--disable-gpu");
        }
        for arg in &config.args {
            builder = builder.arg(arg.as_str());
        }
        let browser_config = builder.build().map_err(CaptureError::Unsupported)?;

        let (browser, mut events) = Browser::launch(browser_config)
            .await
            .map_err(|e| CaptureError::Unsupported(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "cdp handler stopped");
                    break;
                }
            }
        });

        let page = browser
            .new_page(config.url.as_str())
            .await
            .map_err(|e| CaptureError::Failed(e.to_string()))?;

        tracing::info!(url = %config.url, width = config.width, height = config.height, "cdp capture ready");

        Ok(Self {
            _browser: browser,
            page,
            config,
            handler,
        })
    }

    /// The page being captured, for navigation and scripting by the host.
    pub fn page(&self) -> &Page {
        &self.page
    }

    async fn apply_scale(&self, scale: f32) -> Result<()> {
        let metrics = SetDeviceMetricsOverrideParams::new(
            i64::from(self.config.width),
            i64::from(self.config.height),
            f64::from(scale),
            false,
        );
        self.page
            .execute(metrics)
            .await
            .map_err(|e| CaptureError::Failed(e.to_string()))?;
        Ok(())
    }

    async fn set_exclusions(&self, css: Option<&str>) -> Result<()> {
        let script = match css {
            Some(css) => format!(
                "(() => {{ let s = document.getElementById({id:?}); \
                 if (!s) {{ s = document.createElement('style'); s.id = {id:?}; document.head.appendChild(s); }} \
                 s.textContent = {css:?}; }})()",
                id = EXCLUSION_STYLE_ID,
            ),
            None => format!("document.getElementById({EXCLUSION_STYLE_ID:?})?.remove()"),
        };
        self.page
            .evaluate(script)
            .await
            .map_err(|e| CaptureError::Failed(e.to_string()))?;
        Ok(())
    }

    async fn screenshot(&self, root: &CaptureRoot, options: &CaptureOptions) -> Result<Vec<u8>> {
        let timeout = Duration::from_millis(options.image_timeout_ms);
        if tokio::time::timeout(timeout, self.page.evaluate(WAIT_FOR_IMAGES)).await.is_err() {
            tracing::debug!(timeout_ms = options.image_timeout_ms, "images still loading, capturing anyway");
        }

        match root {
            CaptureRoot::Document => {
                let params = ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build();
                self.page.screenshot(params).await
            }
            CaptureRoot::Element(selector) => {
                let element = self
                    .page
                    .find_element(selector.as_str())
                    .await
                    .map_err(|e| CaptureError::Failed(format!("{selector}: {e}")))?;
                element.screenshot(CaptureScreenshotFormat::Png).await
            }
        }
        .map_err(|e| CaptureError::Failed(e.to_string()))
    }
}

impl DocumentCapture for CdpDocumentCapture {
    async fn capture(&self, root: &CaptureRoot, options: &CaptureOptions) -> Result<PixelBuffer> {
        self.apply_scale(options.scale).await?;
        self.set_exclusions(Some(&options.exclusions.stylesheet())).await?;

        let shot = self.screenshot(root, options).await;
        // the page must not keep hidden content around after a failed shot
        let cleanup = self.set_exclusions(None).await;

        let png = shot?;
        cleanup?;
        PixelBuffer::decode(&png)
    }
}

impl Drop for CdpDocumentCapture {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
