//! Single-file HTML archives.
//!
//! Fetches a page and inlines its scripts, stylesheets, images and CSS
//! `url()` references so the result renders without network access.
//!
//! ```no_run
//! # async fn run() -> Result<(), html_archiver::ArchiveError> {
//! let archiver = html_archiver::HtmlArchiver::new()?;
//! let html = archiver.archive_url("https://example.com/").await?;
//! # let _ = html;
//! # Ok(())
//! # }
//! ```

pub mod archiver;
pub mod config;
pub mod error;
pub mod fetch;
pub mod inline;
pub mod utils;

pub use archiver::HtmlArchiver;
pub use config::{ArchiverConfig, ArchiverConfigBuilder};
pub use error::{ArchiveError, ArchiveResult};
pub use fetch::{Fetch, FetchError, FetchedResource, HttpSession};
pub use inline::{
    ArchiveReport, ArchiveWarning, CacheState, FetchFailure, InlineError, MediaType,
    ResourceCache, ResourceKind,
};
