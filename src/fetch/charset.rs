//! Character encoding detection and decoding
//!
//! Stylesheets and scripts are decoded with the charset their server
//! declares. HTML documents additionally honour an in-document
//! `<meta charset>` (or `http-equiv` content type) declaration, which wins
//! over the transport header.
//!
//! Precedence for HTML: byte order mark, then `<meta>` declaration, then
//! `Content-Type` charset, then UTF-8.

use encoding_rs::{Encoding, UTF_8};
use lazy_static::lazy_static;
use regex::bytes::Regex;

/// Number of leading bytes searched for a `<meta>` charset declaration
const META_PRESCAN_BYTES: usize = 4096;

lazy_static! {
    // Matches both `<meta charset="...">` and
    // `<meta http-equiv="Content-Type" content="text/html; charset=...">`.
    static ref META_CHARSET: Regex = Regex::new(
        r#"(?i-u)<meta\b[^>]*?\bcharset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#
    )
    .expect("BUG: hardcoded meta charset regex is invalid - this is a compile-time bug");
}

/// Extract the `charset` parameter from a `Content-Type` header value
#[must_use]
pub fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(|c| c == '"' || c == '\''))
            .filter(|value| !value.is_empty())
    })
}

/// Find the encoding declared by a `<meta>` tag near the start of a document
#[must_use]
pub fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let window = &bytes[..bytes.len().min(META_PRESCAN_BYTES)];
    let label = META_CHARSET.captures(window)?.get(1)?.as_bytes();
    let encoding = Encoding::for_label(label)?;

    // A document that could be scanned as ASCII cannot really be UTF-16.
    if encoding == encoding_rs::UTF_16LE || encoding == encoding_rs::UTF_16BE {
        return Some(UTF_8);
    }
    Some(encoding)
}

fn header_encoding(content_type: Option<&str>) -> Option<&'static Encoding> {
    content_type
        .and_then(charset_from_content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
}

/// Decode a non-HTML text resource (stylesheet, script)
///
/// A byte order mark overrides the declared charset.
#[must_use]
pub fn decode_text(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = header_encoding(content_type).unwrap_or(UTF_8);
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        log::debug!("Replaced malformed {} sequences while decoding text", used.name());
    }
    text.into_owned()
}

/// Decode an HTML document, respecting its `<meta>` charset declaration
#[must_use]
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = sniff_meta_charset(bytes)
        .or_else(|| header_encoding(content_type))
        .unwrap_or(UTF_8);
    let (text, used, had_errors) = encoding.decode(bytes);
    log::debug!("Decoded HTML document as {}", used.name());
    if had_errors {
        log::debug!("Replaced malformed {} sequences while decoding HTML", used.name());
    }
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charset_from_content_type() {
        assert_eq!(charset_from_content_type("text/html; charset=utf-8"), Some("utf-8"));
        assert_eq!(
            charset_from_content_type("text/css; Charset=\"ISO-8859-1\"; foo=bar"),
            Some("ISO-8859-1")
        );
        assert_eq!(charset_from_content_type("text/html"), None);
        assert_eq!(charset_from_content_type("text/html; charset="), None);
    }

    #[test]
    fn test_sniff_meta_charset_forms() {
        let html5 = br#"<html><head><meta charset="UTF-8"><title>x</title>"#;
        assert_eq!(sniff_meta_charset(html5), Some(UTF_8));

        let legacy = br#"<meta http-equiv="Content-Type" content="text/html; charset=iso-8859-1">"#;
        assert_eq!(sniff_meta_charset(legacy), Some(encoding_rs::WINDOWS_1252));

        assert_eq!(sniff_meta_charset(b"<html><head></head></html>"), None);
    }

    #[test]
    fn test_meta_declaration_beats_transport_header() {
        // "∞" encoded as UTF-8; read as Latin-1 it would become "âˆž".
        let html = "<html><head><meta charset=\"utf-8\"></head><body>∞</body></html>";
        let decoded = decode_html(html.as_bytes(), Some("text/html; charset=ISO-8859-1"));
        assert!(decoded.contains('∞'));
    }

    #[test]
    fn test_header_used_without_meta_declaration() {
        let bytes = b"<p>caf\xe9</p>";
        let decoded = decode_html(bytes, Some("text/html; charset=latin1"));
        assert_eq!(decoded, "<p>café</p>");
    }

    #[test]
    fn test_decode_text_defaults_to_utf8_and_honours_bom() {
        assert_eq!(decode_text("a { content: \"→\" }".as_bytes(), None), "a { content: \"→\" }");

        let mut with_bom = vec![0xEF, 0xBB, 0xBF];
        with_bom.extend_from_slice(b"body{}");
        assert_eq!(decode_text(&with_bom, Some("text/css; charset=latin1")), "body{}");
    }
}
