//! CSS `url()` rewriting
//!
//! CSS is scanned for `url(...)` tokens with a regular expression instead
//! of being parsed, so references inside `@font-face` and other at-rules are
//! found as well. Re-validate against `@font-face` before switching this to
//! a CSS parser.

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use super::cache::ResourceCache;
use super::data_uri::encode_all;
use super::types::{Diagnostics, InlineError, ResourceKind};
use crate::fetch::Fetch;
use crate::utils::{is_data_url, resolve_url, unquote_plus};

lazy_static! {
    // Hardcoded and syntactically valid; a failure here is a bug in the pattern.
    static ref CSS_URL: Regex = Regex::new(r"url\((?P<url>[^)]+)\)")
        .expect("BUG: hardcoded CSS url() regex is invalid - this is a compile-time bug");
}

/// Strip surrounding whitespace and quotes
///
/// Leading and trailing quotes are removed independently: a quoted value
/// that itself contains `)` is cut short by the scan and keeps only its
/// opening quote.
fn strip_quotes(value: &str) -> &str {
    value.trim().trim_matches('"').trim_matches('\'')
}

/// Remote `url()` targets of `css`: the raw value's byte range and the absolute URL
///
/// Fragment references (`#id`, common for SVG filters and masks) and `data:`
/// URIs are skipped. Values that cannot be resolved are reported and skipped.
fn collect_references(
    css: &str,
    base: &Url,
    diagnostics: &mut Diagnostics,
) -> Vec<(Range<usize>, Url)> {
    let mut references = Vec::new();

    for captures in CSS_URL.captures_iter(css) {
        let Some(value) = captures.name("url") else {
            continue;
        };

        let decoded = unquote_plus(strip_quotes(value.as_str()));
        if decoded.starts_with('#') || is_data_url(&decoded) {
            continue;
        }

        match resolve_url(base, &decoded) {
            Ok(url) => references.push((value.range(), url)),
            Err(e) => diagnostics.record_warning(
                ResourceKind::CssUrl,
                InlineError::InvalidUrl {
                    reference: decoded,
                    reason: e.to_string(),
                },
            ),
        }
    }

    references
}

/// Replace every remote `url()` in `css` with a data URI
///
/// Relative references resolve against `base`. A reference that cannot be
/// inlined keeps its original text; the rest of the block is unaffected.
pub async fn rewrite_css<F: Fetch>(
    cache: &ResourceCache<F>,
    css: &str,
    base: &Url,
    concurrency: usize,
    diagnostics: &mut Diagnostics,
) -> String {
    let references = collect_references(css, base, diagnostics);
    if references.is_empty() {
        return css.to_string();
    }

    let encoded = encode_all(cache, references.iter().map(|(_, url)| url), concurrency).await;

    // Rebuild in source order so the output never depends on fetch completion order
    let mut output = String::with_capacity(css.len());
    let mut last = 0;
    for (range, url) in references {
        output.push_str(&css[last..range.start]);
        match encoded.get(url.as_str()) {
            Some(Ok(data_uri)) => {
                log::debug!("Inlined CSS url() {url}");
                output.push_str(data_uri);
                diagnostics.record_inlined();
            }
            Some(Err(e)) => {
                output.push_str(&css[range.clone()]);
                diagnostics.record_warning(ResourceKind::CssUrl, e.clone());
            }
            None => output.push_str(&css[range.clone()]),
        }
        last = range.end;
    }
    output.push_str(&css[last..]);

    output
}
