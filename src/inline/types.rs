//! Type definitions for resource inlining

use serde::Serialize;

use super::cache::FetchFailure;

/// Kind of reference a warning was raised for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResourceKind {
    Script,
    Stylesheet,
    Image,
    /// A `url()` inside a `<style>` element, `style` attribute or stylesheet
    CssUrl,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Script => write!(f, "script"),
            ResourceKind::Stylesheet => write!(f, "stylesheet"),
            ResourceKind::Image => write!(f, "image"),
            ResourceKind::CssUrl => write!(f, "CSS url()"),
        }
    }
}

/// Why a resource was left un-inlined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum InlineError {
    #[error("Unable to determine media type for {url}")]
    UnresolvedMediaType { url: String },

    #[error(transparent)]
    Fetch(#[from] FetchFailure),

    #[error("Unable to resolve {reference:?}: {reason}")]
    InvalidUrl { reference: String, reason: String },
}

impl InlineError {
    /// URL (or raw reference) the error concerns
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            InlineError::UnresolvedMediaType { url } => url,
            InlineError::Fetch(failure) => &failure.url,
            InlineError::InvalidUrl { reference, .. } => reference,
        }
    }
}

/// Non-fatal diagnostic raised while archiving
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveWarning {
    pub resource: ResourceKind,
    pub error: InlineError,
}

impl ArchiveWarning {
    #[must_use]
    pub fn url(&self) -> &str {
        self.error.url()
    }
}

impl std::fmt::Display for ArchiveWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} not inlined: {}", self.resource, self.error)
    }
}

/// Result of archiving with success and warning tracking
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveReport {
    pub html: String,
    pub inlined: usize,
    pub warnings: Vec<ArchiveWarning>,
}

impl ArchiveReport {
    /// Total number of references processed
    #[must_use]
    pub fn total(&self) -> usize {
        self.inlined + self.warnings.len()
    }

    /// Check if any reference was left un-inlined
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Collects per-reference outcomes while the passes run
#[derive(Debug, Default)]
pub struct Diagnostics {
    inlined: usize,
    warnings: Vec<ArchiveWarning>,
}

impl Diagnostics {
    pub fn record_inlined(&mut self) {
        self.inlined += 1;
    }

    /// Log and keep a warning; never aborts the run
    pub fn record_warning(&mut self, resource: ResourceKind, error: InlineError) {
        let warning = ArchiveWarning { resource, error };
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    #[must_use]
    pub fn into_report(self, html: String) -> ArchiveReport {
        ArchiveReport {
            html,
            inlined: self.inlined,
            warnings: self.warnings,
        }
    }
}
