//! Data URI encoding
//!
//! Turns a resource URL into a `data:<media type>;base64,<payload>` string
//! that can stand in for the URL in a `src` attribute or a CSS `url()`.

use std::collections::HashMap;

use base64::Engine;
use futures::StreamExt;
use url::Url;

use super::cache::ResourceCache;
use super::media_type::{self, MediaType};
use super::types::InlineError;
use crate::fetch::Fetch;

/// Encode raw bytes as a base64 data URI
#[must_use]
pub fn encode_bytes(media_type: MediaType, bytes: &[u8]) -> String {
    let prefix_len = "data:;base64,".len() + media_type.as_str().len();
    let encoded_capacity = base64::encoded_len(bytes.len(), true).unwrap_or(0);
    let mut encoded = String::with_capacity(prefix_len + encoded_capacity);

    encoded.push_str("data:");
    encoded.push_str(media_type.as_str());
    encoded.push_str(";base64,");

    base64::engine::general_purpose::STANDARD.encode_string(bytes, &mut encoded);

    encoded
}

/// Resolve the media type of `url`, fetch it through the cache and encode it
///
/// The media type is checked first, so an unsupported resource is never
/// requested.
///
/// # Errors
///
/// `UnresolvedMediaType` when the extension is not in the table, `Fetch`
/// when the resource cannot be retrieved.
pub async fn encode<F: Fetch>(cache: &ResourceCache<F>, url: &Url) -> Result<String, InlineError> {
    let media_type = media_type::resolve(url).ok_or_else(|| InlineError::UnresolvedMediaType {
        url: url.to_string(),
    })?;

    let resource = cache.fetch(url).await?;
    Ok(encode_bytes(media_type, &resource.bytes))
}

/// Encode every distinct URL with at most `concurrency` fetches in flight
///
/// The map is keyed by the URL's serialized form; callers look results up in
/// document order, so the output does not depend on completion order.
pub async fn encode_all<'u, F: Fetch>(
    cache: &ResourceCache<F>,
    urls: impl IntoIterator<Item = &'u Url>,
    concurrency: usize,
) -> HashMap<String, Result<String, InlineError>> {
    let mut distinct: Vec<&Url> = urls.into_iter().collect();
    distinct.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));
    distinct.dedup_by(|a, b| a.as_str() == b.as_str());

    futures::stream::iter(distinct)
        .map(|url| async move { (url.to_string(), encode(cache, url).await) })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}
