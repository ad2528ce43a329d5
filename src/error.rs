//! Errors that abort an archiving call
//!
//! Per-resource problems are never errors; they become
//! [`crate::ArchiveWarning`]s and the resource stays a remote reference.

use crate::fetch::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Could not retrieve root document {url} [{status}]")]
    RootFetch { url: String, status: u16 },

    #[error("Could not retrieve root document {url}: {source}")]
    RootTransport {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("Failed to create HTTP session: {0}")]
    Session(#[source] FetchError),

    #[error("Selector {0:?} is invalid or matched no element")]
    Selector(&'static str),

    #[error("Failed to serialize archived document: {0}")]
    Serialize(#[from] std::io::Error),

    #[error("Archived document is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Convenience alias for Result with `ArchiveError`
pub type ArchiveResult<T> = Result<T, ArchiveError>;
