//! Media type resolution by file extension
//!
//! Only a fixed set of image and font types is inlined as data URIs;
//! anything else is left as a remote reference.

use url::Url;

/// Lowercase extension (without the dot) to media type
const DATA_MEDIA_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("svg", "image/svg+xml"),
    ("woff", "application/font-woff"),
    ("woff2", "font/woff2"),
    ("eot", "font/eot"),
    ("ttf", "font/ttf"),
];

/// A MIME media type from the inlining table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaType(&'static str);

impl MediaType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Extension of the last path segment, ignoring query and fragment
///
/// Leading dots do not start an extension, so `/.hidden` has none.
fn path_extension(url: &Url) -> Option<&str> {
    let file_name = url.path().rsplit('/').next()?;
    let (stem, extension) = file_name.rsplit_once('.')?;
    if stem.trim_start_matches('.').is_empty() || extension.is_empty() {
        return None;
    }
    Some(extension)
}

/// Look up the media type for a resource URL
#[must_use]
pub fn resolve(url: &Url) -> Option<MediaType> {
    let extension = path_extension(url)?.to_ascii_lowercase();
    DATA_MEDIA_TYPES
        .iter()
        .find(|(known, _)| *known == extension)
        .map(|(_, media_type)| MediaType(media_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_str(url: &str) -> Option<&'static str> {
        resolve(&Url::parse(url).unwrap()).map(|m| m.as_str())
    }

    #[test]
    fn test_known_extensions() {
        assert_eq!(resolve_str("https://example.com/a.png"), Some("image/png"));
        assert_eq!(resolve_str("https://example.com/a.jpeg"), Some("image/jpeg"));
        assert_eq!(resolve_str("https://example.com/icons/a.svg"), Some("image/svg+xml"));
        assert_eq!(resolve_str("https://example.com/f/x.woff2"), Some("font/woff2"));
        assert_eq!(resolve_str("https://example.com/f/x.woff"), Some("application/font-woff"));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(resolve_str("https://example.com/PHOTO.JPG"), Some("image/jpeg"));
    }

    #[test]
    fn test_query_and_fragment_are_ignored() {
        assert_eq!(resolve_str("https://example.com/a.gif?v=3.css"), Some("image/gif"));
        assert_eq!(resolve_str("https://example.com/font.ttf#iefix"), Some("font/ttf"));
        assert_eq!(resolve_str("https://example.com/image?format=png"), None);
    }

    #[test]
    fn test_unknown_or_missing_extension() {
        assert_eq!(resolve_str("https://example.com/script.js"), None);
        assert_eq!(resolve_str("https://example.com/photo.webp"), None);
        assert_eq!(resolve_str("https://example.com/"), None);
        assert_eq!(resolve_str("https://example.com/.png"), None);
        assert_eq!(resolve_str("https://example.com/archive.tar.gz"), None);
    }
}
