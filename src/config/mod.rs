//! Configuration module for archiving
//!
//! This module provides the `ArchiverConfig` struct and its builder for
//! configuring the HTTP session and the rewrite passes.

// Sub-modules
pub mod builder;
pub mod types;

// Re-exports for public API
pub use builder::ArchiverConfigBuilder;
pub use types::ArchiverConfig;
