//! Headless Chrome backend built on `chromiumoxide`.
//!
//! ## Why a background handler task?
//!
//! `chromiumoxide` splits a browser into a [`Browser`] handle and a
//! `Handler` stream that pumps DevTools messages. Nothing on the handle makes
//! progress unless the handler is polled, so [`ChromeEngine::open`] spawns a
//! task that drives it for the whole session and [`ChromeSession::close`]
//! stops it once the browser has exited.
//!
//! ## Settling
//!
//! A `networkidle` wait is not exposed by the DevTools protocol. We wait for
//! the `load` event (stylesheets, images, iframes) and `document.fonts.ready`
//! inside the page, then allow a short grace period for late requests.
//!
//! The wait is one `Runtime.evaluate` command, so chromiumoxide's per-command
//! timeout would otherwise cap it at 30 s. [`ChromeEngine::request_timeout`]
//! keeps that timeout above the configured settle bound, which then fires
//! first and reports [`RenderError::SettleTimeout`].

use crate::config::{ConversionConfig, PageLayout};
use crate::error::RenderError;
use crate::pipeline::session::{RenderEngine, RenderPage, RenderSession};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Resolves once the document has loaded and its web fonts are ready.
const SETTLE_SCRIPT: &str = r#"new Promise((resolve) => {
  const settled = () => document.fonts.ready.then(() => resolve(document.readyState));
  if (document.readyState === 'complete') {
    settled();
  } else {
    window.addEventListener('load', settled, { once: true });
  }
})"#;

/// Quiet period after settling, mirroring the 500 ms idle window of `networkidle`.
const SETTLE_GRACE: Duration = Duration::from_millis(500);

/// Headroom between the settle bound and the DevTools command timeout.
const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(30);

/// DevTools command timeout when settling is unbounded.
const UNBOUNDED_REQUEST_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Launches a local Chrome/Chromium per session.
#[derive(Debug, Clone, Default)]
pub struct ChromeEngine {
    executable: Option<PathBuf>,
    sandbox: bool,
    settle_timeout: Option<Duration>,
}

impl ChromeEngine {
    pub fn new(executable: Option<PathBuf>, sandbox: bool) -> Self {
        Self {
            executable,
            sandbox,
            settle_timeout: None,
        }
    }

    pub fn from_config(config: &ConversionConfig) -> Self {
        Self::new(config.browser_executable.clone(), config.sandbox)
            .with_settle_timeout(config.settle_timeout_secs.map(Duration::from_secs))
    }

    /// Settle bound the sessions will be driven with; sizes the DevTools
    /// command timeout.
    pub fn with_settle_timeout(mut self, settle_timeout: Option<Duration>) -> Self {
        self.settle_timeout = settle_timeout;
        self
    }

    /// Per-command DevTools timeout: the settle bound plus a margin, or a
    /// day when settling is unbounded.
    pub fn request_timeout(&self) -> Duration {
        match self.settle_timeout {
            Some(limit) => limit + REQUEST_TIMEOUT_MARGIN,
            None => UNBOUNDED_REQUEST_TIMEOUT,
        }
    }

    fn resolve_executable(&self) -> Result<PathBuf, RenderError> {
        match &self.executable {
            Some(path) => Ok(path.clone()),
            None => chrome_locate::locate_browser().map_err(|e| RenderError::Launch(e.to_string())),
        }
    }
}

#[async_trait]
impl RenderEngine for ChromeEngine {
    async fn open(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        let executable = self.resolve_executable()?;
        info!(
            "Launching browser: {} (sandbox {})",
            executable.display(),
            if self.sandbox { "on" } else { "off" }
        );

        let mut builder = BrowserConfig::builder()
            .chrome_executable(&executable)
            .request_timeout(self.request_timeout());
        if !self.sandbox {
            builder = builder.no_sandbox();
        }
        let browser_config = builder.build().map_err(RenderError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("DevTools handler error: {}", e);
                }
            }
        });

        Ok(Box::new(ChromeSession {
            browser: Some(browser),
            handler_task: Some(handler_task),
        }))
    }
}

/// One running browser process.
pub struct ChromeSession {
    browser: Option<Browser>,
    handler_task: Option<JoinHandle<()>>,
}

#[async_trait]
impl RenderSession for ChromeSession {
    async fn new_page(&mut self) -> Result<Box<dyn RenderPage>, RenderError> {
        let browser = self.browser.as_ref().ok_or(RenderError::SessionClosed)?;
        let page = browser.new_page("about:blank").await.map_err(page_error)?;
        Ok(Box::new(ChromePage { page: Some(page) }))
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        let Some(mut browser) = self.browser.take() else {
            return Ok(());
        };

        debug!("Closing browser...");
        let closed = browser.close().await.map(|_| ()).map_err(page_error);
        if let Err(e) = browser.wait().await {
            warn!("Browser process did not exit cleanly: {}", e);
        }
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
        closed
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        // `Browser` kills its child process on drop; only the handler task
        // needs stopping here.
        if self.browser.is_some() {
            warn!("Browser session dropped without close(); killing browser process");
        }
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
    }
}

/// One tab, used for exactly one document.
pub struct ChromePage {
    page: Option<Page>,
}

impl ChromePage {
    fn page(&self) -> Result<&Page, RenderError> {
        self.page
            .as_ref()
            .ok_or_else(|| RenderError::Page("page already closed".into()))
    }
}

#[async_trait]
impl RenderPage for ChromePage {
    async fn load_markup(&mut self, html: &str) -> Result<(), RenderError> {
        self.page()?.set_content(html).await.map_err(page_error)?;
        Ok(())
    }

    async fn wait_until_settled(&mut self, timeout: Option<Duration>) -> Result<(), RenderError> {
        let page = self.page()?;
        let settle = async {
            let script = EvaluateParams::builder()
                .expression(SETTLE_SCRIPT)
                .await_promise(true)
                .return_by_value(true)
                .build()
                .map_err(RenderError::Page)?;
            page.evaluate_expression(script).await.map_err(page_error)?;
            tokio::time::sleep(SETTLE_GRACE).await;
            Ok::<(), RenderError>(())
        };

        match timeout {
            None => settle.await,
            Some(limit) => tokio::time::timeout(limit, settle)
                .await
                .map_err(|_| RenderError::SettleTimeout {
                    secs: limit.as_secs(),
                })?,
        }
    }

    async fn print_pdf(&mut self, layout: &PageLayout) -> Result<Vec<u8>, RenderError> {
        self.page()?
            .pdf(print_params(layout))
            .await
            .map_err(page_error)
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        if let Some(page) = self.page.take() {
            page.close().await.map_err(page_error)?;
        }
        Ok(())
    }
}

/// Map our layout onto the DevTools `Page.printToPDF` parameters.
fn print_params(layout: &PageLayout) -> PrintToPdfParams {
    PrintToPdfParams {
        landscape: Some(false),
        print_background: Some(layout.print_background),
        scale: Some(layout.scale),
        paper_width: Some(layout.paper_width_in),
        paper_height: Some(layout.paper_height_in),
        margin_top: Some(layout.margin_top_in),
        margin_bottom: Some(layout.margin_bottom_in),
        margin_left: Some(layout.margin_left_in),
        margin_right: Some(layout.margin_right_in),
        prefer_css_page_size: Some(false),
        ..Default::default()
    }
}

fn page_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Page(e.to_string())
}
