//! Archiver facade
//!
//! [`HtmlArchiver`] is the entry point: it fetches a page (or accepts raw
//! markup), makes sure the document declares its charset, runs the inlining
//! passes and serializes the result once.
//!
//! An archiver owns its [`ResourceCache`], so every call made through the
//! same instance shares fetched resources and known-bad URLs. Create a new
//! archiver for an isolated run.

use kuchiki::traits::TendrilSink;
use url::Url;

use crate::config::ArchiverConfig;
use crate::error::{ArchiveError, ArchiveResult};
use crate::fetch::{Fetch, HttpSession, decode_html};
use crate::inline::{
    ArchiveReport, Diagnostics, HtmlRewriter, ResourceCache, ensure_charset_declaration,
};

const OK_STATUS: u16 = 200;

fn parse_url(url: &str) -> ArchiveResult<Url> {
    Url::parse(url).map_err(|source| ArchiveError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

/// Produces single-file HTML archives
///
/// The parsed document is reference counted and lives across the fetches of
/// every pass, so the futures returned by the `archive_*` methods are not
/// `Send`. Await them directly, or run them on a [`tokio::task::LocalSet`]
/// with `spawn_local` instead of `tokio::spawn`:
///
/// ```no_run
/// # async fn run() -> Result<(), html_archiver::ArchiveError> {
/// use html_archiver::HtmlArchiver;
///
/// let local = tokio::task::LocalSet::new();
/// let html = local
///     .run_until(async {
///         tokio::task::spawn_local(async {
///             HtmlArchiver::new()?.archive_url("https://example.com/").await
///         })
///         .await
///         .expect("archiving task panicked")
///     })
///     .await?;
/// # let _ = html;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HtmlArchiver<F = HttpSession> {
    cache: ResourceCache<F>,
    config: ArchiverConfig,
}

impl HtmlArchiver<HttpSession> {
    /// Archiver with a live HTTP session and default settings
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::Session` if the HTTP client cannot be created.
    pub fn new() -> ArchiveResult<Self> {
        Self::with_config(ArchiverConfig::default())
    }

    /// Archiver with a live HTTP session
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::Session` if the HTTP client cannot be created.
    pub fn with_config(config: ArchiverConfig) -> ArchiveResult<Self> {
        let session = HttpSession::new(&config).map_err(ArchiveError::Session)?;
        Ok(Self::with_fetcher(session, config))
    }
}

impl<F: Fetch> HtmlArchiver<F> {
    /// Archiver on top of any [`Fetch`] implementation
    pub fn with_fetcher(fetcher: F, config: ArchiverConfig) -> Self {
        Self {
            cache: ResourceCache::new(fetcher),
            config,
        }
    }

    pub fn cache(&self) -> &ResourceCache<F> {
        &self.cache
    }

    pub fn config(&self) -> &ArchiverConfig {
        &self.config
    }

    /// Fetch `url` and return it as a self-contained HTML document
    ///
    /// # Errors
    ///
    /// Fails only when the root document itself cannot be retrieved (or
    /// `url` is not a valid absolute URL).
    pub async fn archive_url(&self, url: &str) -> ArchiveResult<String> {
        Ok(self.archive_url_report(url).await?.html)
    }

    /// Like [`Self::archive_url`], also returning counts and warnings
    ///
    /// # Errors
    ///
    /// See [`Self::archive_url`].
    pub async fn archive_url_report(&self, url: &str) -> ArchiveResult<ArchiveReport> {
        let target = parse_url(url)?;

        log::info!("Archiving {target}");
        let page = self
            .cache
            .fetcher()
            .fetch(&target)
            .await
            .map_err(|source| ArchiveError::RootTransport {
                url: target.to_string(),
                source,
            })?;

        if page.status != OK_STATUS {
            return Err(ArchiveError::RootFetch {
                url: target.to_string(),
                status: page.status,
            });
        }

        let html = decode_html(&page.bytes, page.content_type.as_deref());

        // Relative references resolve against where the page ended up after redirects
        self.archive_document(&html, &page.url).await
    }

    /// Inline every resource referenced by `html`, resolving against `base_url`
    ///
    /// # Errors
    ///
    /// Fails for an invalid `base_url`; per-resource problems are warnings.
    pub async fn archive_html(&self, html: &str, base_url: &str) -> ArchiveResult<String> {
        Ok(self.archive_html_report(html, base_url).await?.html)
    }

    /// Like [`Self::archive_html`], also returning counts and warnings
    ///
    /// # Errors
    ///
    /// See [`Self::archive_html`].
    pub async fn archive_html_report(
        &self,
        html: &str,
        base_url: &str,
    ) -> ArchiveResult<ArchiveReport> {
        let base = parse_url(base_url)?;
        self.archive_document(html, &base).await
    }

    /// Rewrite the `url()` references of a standalone CSS block
    ///
    /// # Errors
    ///
    /// Fails for an invalid `base_url`.
    pub async fn archive_css(&self, css: &str, base_url: &str) -> ArchiveResult<String> {
        let base = parse_url(base_url)?;
        let mut diagnostics = Diagnostics::default();
        Ok(self.rewriter().rewrite_css(css, &base, &mut diagnostics).await)
    }

    fn rewriter(&self) -> HtmlRewriter<'_, F> {
        HtmlRewriter::new(&self.cache, self.config.max_concurrent_fetches())
    }

    async fn archive_document(&self, html: &str, base: &Url) -> ArchiveResult<ArchiveReport> {
        // Parse once, mutate the tree, serialize once
        let document = kuchiki::parse_html().one(html);
        ensure_charset_declaration(&document)?;

        let mut diagnostics = Diagnostics::default();
        self.rewriter()
            .rewrite(&document, base, &mut diagnostics)
            .await?;

        let mut output = Vec::new();
        document.serialize(&mut output)?;
        let html = String::from_utf8(output)?;

        let report = diagnostics.into_report(html);
        log::info!(
            "Archived {base}: {} resources inlined, {} left remote",
            report.inlined,
            report.warnings.len()
        );
        Ok(report)
    }
}
