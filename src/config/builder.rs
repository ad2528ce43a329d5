//! Fluent builder for `ArchiverConfig`
//!
//! Every field has a default, so the builder only validates what was set.

use anyhow::{Result, anyhow};
use std::time::Duration;

use super::types::ArchiverConfig;

#[derive(Debug, Clone, Default)]
pub struct ArchiverConfigBuilder {
    config: ArchiverConfig,
}

impl ArchiverConfigBuilder {
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn max_resource_size(mut self, bytes: usize) -> Self {
        self.config.max_resource_size = bytes;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn max_concurrent_fetches(mut self, limit: usize) -> Self {
        self.config.max_concurrent_fetches = limit;
        self
    }

    /// Validate and produce the configuration
    ///
    /// # Errors
    ///
    /// Returns an error when the timeout, size limit or concurrency limit is zero,
    /// or when the user agent is blank.
    pub fn build(self) -> Result<ArchiverConfig> {
        let config = self.config;

        if config.request_timeout.is_zero() {
            return Err(anyhow!("request_timeout must be greater than zero"));
        }
        if config.max_resource_size == 0 {
            return Err(anyhow!("max_resource_size must be greater than zero"));
        }
        if config.max_concurrent_fetches == 0 {
            return Err(anyhow!("max_concurrent_fetches must be at least 1"));
        }
        if config.user_agent.trim().is_empty() {
            return Err(anyhow!("user_agent must not be empty"));
        }

        Ok(config)
    }
}
