//! Core configuration types for archiving
//!
//! `ArchiverConfig` carries the knobs shared by the HTTP session and the
//! rewrite passes. Build it with [`ArchiverConfig::builder`] or take the
//! [`Default`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::{
    DEFAULT_MAX_CONCURRENT_FETCHES, DEFAULT_MAX_RESOURCE_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};

/// Main configuration struct for archiving operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiverConfig {
    /// Timeout applied to every request, root page included.
    ///
    /// A request that runs past it is a fetch failure like any other.
    pub(crate) request_timeout: Duration,

    /// Maximum size of a single fetched body in bytes
    ///
    /// Enforced against `Content-Length` before the body is read and again
    /// while streaming.
    pub(crate) max_resource_size: usize,

    /// `User-Agent` header sent with every request
    pub(crate) user_agent: String,

    /// Upper bound on concurrent fetches while prefetching a pass
    pub(crate) max_concurrent_fetches: usize,
}

impl Default for ArchiverConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_resource_size: DEFAULT_MAX_RESOURCE_SIZE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }
}

impl ArchiverConfig {
    #[must_use]
    pub fn builder() -> super::builder::ArchiverConfigBuilder {
        super::builder::ArchiverConfigBuilder::default()
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    #[must_use]
    pub fn max_resource_size(&self) -> usize {
        self.max_resource_size
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn max_concurrent_fetches(&self) -> usize {
        self.max_concurrent_fetches
    }
}
