//! Per-run resource cache
//!
//! Deduplicates fetches by absolute URL and remembers URLs that failed, so
//! that no URL is requested more than once for the lifetime of the cache.
//! The cache is owned by one [`crate::HtmlArchiver`]; nothing is global.
//!
//! Each URL maps to a `OnceCell`. Concurrent requests for the same URL wait
//! on the same cell instead of issuing a second request, and the cell's
//! value is either the stored resource or the failure, never both.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use futures::StreamExt;
use serde::Serialize;
use tokio::sync::OnceCell;
use url::Url;

use crate::fetch::{Fetch, FetchedResource};

/// HTTP status accepted as a successful fetch
const OK_STATUS: u16 = 200;

/// A URL that could not be retrieved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("Unable to fetch {url} [{}]", describe(.status, .reason))]
pub struct FetchFailure {
    pub url: String,
    /// Response status, `None` for transport errors
    pub status: Option<u16>,
    pub reason: String,
}

fn describe(status: &Option<u16>, reason: &str) -> String {
    match status {
        Some(code) => code.to_string(),
        None => reason.to_string(),
    }
}

/// What the cache knows about a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Fetched successfully; later lookups return the stored body
    Cached,
    /// Failed before; later lookups fail without a request
    KnownBad,
    /// Never requested (or a request is still in flight)
    Untried,
}

#[derive(Debug)]
enum CacheEntry {
    Cached(Arc<FetchedResource>),
    KnownBad(FetchFailure),
}

/// Fetch-once cache in front of a [`Fetch`] implementation
#[derive(Debug)]
pub struct ResourceCache<F> {
    fetcher: F,
    entries: DashMap<String, Arc<OnceCell<CacheEntry>>>,
}

impl<F: Fetch> ResourceCache<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            entries: DashMap::new(),
        }
    }

    /// The wrapped fetcher, for requests that must bypass the cache
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Return the body of `url`, fetching it only if it was never attempted
    ///
    /// # Errors
    ///
    /// Returns the recorded `FetchFailure` for a non-200 status or transport
    /// error, now or on any earlier attempt.
    pub async fn fetch(&self, url: &Url) -> Result<Arc<FetchedResource>, FetchFailure> {
        // Clone the cell out so the map shard is not locked across the await
        let cell = Arc::clone(&self.entries.entry(url.as_str().to_string()).or_default());

        match cell.get_or_init(|| self.fetch_uncached(url)).await {
            CacheEntry::Cached(resource) => Ok(Arc::clone(resource)),
            CacheEntry::KnownBad(failure) => Err(failure.clone()),
        }
    }

    /// Fetch every distinct URL with at most `concurrency` requests in flight
    ///
    /// The map is keyed by the URL's serialized form.
    pub async fn fetch_all<'u>(
        &self,
        urls: impl IntoIterator<Item = &'u Url>,
        concurrency: usize,
    ) -> HashMap<String, Result<Arc<FetchedResource>, FetchFailure>> {
        let mut distinct: Vec<&Url> = urls.into_iter().collect();
        distinct.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));
        distinct.dedup_by(|a, b| a.as_str() == b.as_str());

        futures::stream::iter(distinct)
            .map(|url| async move { (url.to_string(), self.fetch(url).await) })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await
    }

    async fn fetch_uncached(&self, url: &Url) -> CacheEntry {
        match self.fetcher.fetch(url).await {
            Ok(resource) if resource.status == OK_STATUS => {
                log::debug!("Cached {url} ({} bytes)", resource.bytes.len());
                CacheEntry::Cached(Arc::new(resource))
            }
            Ok(resource) => CacheEntry::KnownBad(FetchFailure {
                url: url.to_string(),
                status: Some(resource.status),
                reason: format!("HTTP status {}", resource.status),
            }),
            Err(e) => CacheEntry::KnownBad(FetchFailure {
                url: url.to_string(),
                status: None,
                reason: e.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn state(&self, url: &Url) -> CacheState {
        let Some(cell) = self.entries.get(url.as_str()) else {
            return CacheState::Untried;
        };
        match cell.get() {
            Some(CacheEntry::Cached(_)) => CacheState::Cached,
            Some(CacheEntry::KnownBad(_)) => CacheState::KnownBad,
            None => CacheState::Untried,
        }
    }

    /// Number of URLs attempted so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every stored resource and failure
    pub fn clear(&self) {
        self.entries.clear();
    }
}
