//! Shared configuration constants for the archiver
//!
//! Default values used by `ArchiverConfig` and the HTTP session so that
//! the library, the binary and the tests agree on them.

/// Default per-request timeout: 30 seconds
///
/// Applies to the root page and to every inlined resource. A request that
/// exceeds it is reported as an ordinary fetch failure.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default maximum size of a single fetched resource: 10MB
///
/// Data URIs grow by a third over the raw payload, so anything beyond this
/// makes the archived document impractically large.
pub const DEFAULT_MAX_RESOURCE_SIZE: usize = 10 * 1024 * 1024;

/// Default number of resource fetches in flight during one rewrite pass
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// Browser-like user agent string (current stable Chrome)
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Charset inserted into documents that do not declare one
pub const OUTPUT_CHARSET: &str = "utf-8";
