//! Test utilities shared by the archiver test suite
//!
//! `FixtureFetcher` replays recorded responses instead of touching the
//! network and counts how often each URL was requested.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use base64::Engine;
use html_archiver::{ArchiverConfig, Fetch, FetchError, FetchedResource, HtmlArchiver};
use url::Url;

/// Bytes standing in for a PNG file
#[allow(dead_code)]
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

/// Recorded responses keyed by absolute URL; anything else is a 404
#[derive(Debug, Default)]
pub struct FixtureFetcher {
    responses: HashMap<String, FetchedResource>,
    calls: Mutex<HashMap<String, usize>>,
}

#[allow(dead_code)]
impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200
    pub fn with(self, url: &str, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        self.with_status(url, 200, content_type, body)
    }

    pub fn with_status(
        mut self,
        url: &str,
        status: u16,
        content_type: &str,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        let url = Url::parse(url).expect("fixture URL must be absolute");
        let resource = FetchedResource::new(
            url.clone(),
            status,
            Some(content_type.to_string()),
            body.into(),
        );
        self.responses.insert(url.to_string(), resource);
        self
    }

    /// Number of requests made for `url`
    pub fn calls(&self, url: &str) -> usize {
        let key = Url::parse(url).expect("URL must be absolute").to_string();
        self.calls.lock().unwrap().get(&key).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

impl Fetch for FixtureFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedResource, FetchError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        Ok(self
            .responses
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| FetchedResource::new(url.clone(), 404, None, b"Not Found".to_vec())))
    }
}

/// Archiver over a shared fixture so the test can inspect call counts
#[allow(dead_code)]
pub fn archiver(fetcher: &Arc<FixtureFetcher>) -> HtmlArchiver<Arc<FixtureFetcher>> {
    HtmlArchiver::with_fetcher(Arc::clone(fetcher), ArchiverConfig::default())
}

/// Expected data URI for `bytes`
#[allow(dead_code)]
pub fn data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{media_type};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Wraps `head` and `body` markup in a minimal document
#[allow(dead_code)]
pub fn page(head: &str, body: &str) -> String {
    format!("<!DOCTYPE html>\n<html><head>{head}</head><body>{body}</body></html>")
}

/// Number of `<meta charset>` declarations in serialized HTML
#[allow(dead_code)]
pub fn count_charset_declarations(html: &str) -> usize {
    use kuchiki::traits::TendrilSink;

    let document = kuchiki::parse_html().one(html);
    document
        .select("meta")
        .unwrap()
        .filter(|meta| meta.attributes.borrow().contains("charset"))
        .count()
}
