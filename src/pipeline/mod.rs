//! Pipeline stages for HTML/text-to-PDF conversion.
//!
//! Each submodule implements exactly one concern. The converter and the
//! batch orchestrator compose them; none of them knows about the others'
//! internals, which lets the rendering backend be swapped without touching
//! discovery or naming.
//!
//! ## Data Flow
//!
//! ```text
//! discover ──▶ naming ──▶ markup ──▶ session (chrome)
//! (walkdir)    (pure)     (escape)   (load, settle, print)
//! ```
//!
//! 1. [`discover`] — walk a directory tree for HTML inputs
//! 2. [`naming`]   — derive each output path from its input path
//! 3. [`markup`]   — detect the input format; wrap plain text in HTML
//! 4. [`session`]  — engine/session/page traits the converter drives
//! 5. [`chrome`]   — the headless Chrome implementation of those traits

pub mod chrome;
pub mod discover;
pub mod markup;
pub mod naming;
pub mod session;
