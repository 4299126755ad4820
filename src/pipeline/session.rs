//! Rendering-engine abstraction.
//!
//! ## Lifecycle
//!
//! ```text
//! RenderEngine::open ──▶ RenderSession ──▶ new_page ──▶ RenderPage ──▶ close
//!                              │                (one per file)
//!                              └──────────────────────────────────────▶ close
//! ```
//!
//! A session is one live browser, shared by every file of a batch and owned
//! exclusively by whoever opened it. A page is the unit of work for exactly
//! one file and is closed as soon as that file is done, so nothing
//! accumulates in the browser across a long batch.
//!
//! The converter only talks to these traits. [`crate::pipeline::chrome`] is
//! the production backend; tests plug in an in-memory one.

use crate::config::PageLayout;
use crate::error::RenderError;
use async_trait::async_trait;
use std::time::Duration;

/// Factory for rendering sessions.
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Start the engine and return a session bound to it.
    async fn open(&self) -> Result<Box<dyn RenderSession>, RenderError>;
}

/// One live engine instance.
#[async_trait]
pub trait RenderSession: Send {
    /// Acquire a fresh page for one conversion.
    ///
    /// Fails with [`RenderError::SessionClosed`] after [`close`](Self::close).
    async fn new_page(&mut self) -> Result<Box<dyn RenderPage>, RenderError>;

    /// Shut the engine down. Calling it again is a no-op.
    async fn close(&mut self) -> Result<(), RenderError>;
}

/// A per-file unit of work inside a session.
#[async_trait]
pub trait RenderPage: Send {
    /// Replace the page's document with `html`.
    async fn load_markup(&mut self, html: &str) -> Result<(), RenderError>;

    /// Wait until the document and the resources it references have loaded.
    ///
    /// `None` waits without bound.
    async fn wait_until_settled(&mut self, timeout: Option<Duration>) -> Result<(), RenderError>;

    /// Print the current document to PDF bytes.
    async fn print_pdf(&mut self, layout: &PageLayout) -> Result<Vec<u8>, RenderError>;

    /// Release the page. Calling it again is a no-op.
    async fn close(&mut self) -> Result<(), RenderError>;
}
