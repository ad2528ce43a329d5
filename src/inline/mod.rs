//! Resource inlining functionality
//!
//! This module provides the pieces that turn a page's external scripts,
//! stylesheets, images and CSS `url()` references into embedded content:
//! a per-run fetch cache, media type lookup, data URI encoding, CSS
//! rewriting and the HTML tree passes that tie them together.

// Sub-modules
pub mod cache;
pub mod css;
pub mod data_uri;
pub mod html;
pub mod media_type;
pub mod types;

// Re-exports for public API
pub use cache::{CacheState, FetchFailure, ResourceCache};
pub use css::rewrite_css;
pub use data_uri::{encode, encode_bytes};
pub use html::{HtmlRewriter, ensure_charset_declaration};
pub use media_type::MediaType;
pub use types::{ArchiveReport, ArchiveWarning, Diagnostics, InlineError, ResourceKind};
