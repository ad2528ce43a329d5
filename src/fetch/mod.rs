//! Resource fetching
//!
//! The archiver never talks to the network directly. Everything goes through
//! the [`Fetch`] trait so that a test harness can substitute recorded
//! responses for live requests. [`HttpSession`] is the production
//! implementation.
//!
//! A `Fetch` implementation returns every HTTP response it receives,
//! whatever the status. Deciding what counts as a usable response belongs
//! to [`crate::inline::ResourceCache`]; only transport failures surface
//! here as [`FetchError`].

pub mod charset;
pub mod file;
pub mod http;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

pub use charset::{decode_html, decode_text};
pub use http::HttpSession;

/// A retrieved resource: final URL, status, declared content type and raw body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResource {
    pub url: Url,
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FetchedResource {
    #[must_use]
    pub fn new(url: Url, status: u16, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            url,
            status,
            content_type,
            bytes,
        }
    }

    /// Body decoded as text using the charset from the `Content-Type` header
    #[must_use]
    pub fn text(&self) -> String {
        decode_text(&self.bytes, self.content_type.as_deref())
    }
}

/// Transport-level failure; no usable response was received
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {reason}")]
    Client { reason: String },

    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Resource too large: {url} is {size} bytes, limit is {limit} bytes")]
    TooLarge { url: String, size: u64, limit: usize },

    #[error("Unsupported URL scheme: {url}")]
    UnsupportedScheme { url: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// GET capability used for the root page and every inlined resource
pub trait Fetch: Send + Sync {
    /// Retrieve `url`, returning the response whatever its status
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedResource, FetchError>> + Send;
}

impl<T: Fetch> Fetch for Arc<T> {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedResource, FetchError>> + Send {
        (**self).fetch(url)
    }
}
