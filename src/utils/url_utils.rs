//! URL helpers shared by the rewriters.

use url::Url;

/// Resolve a potentially relative reference against a base URL
///
/// Leading and trailing ASCII whitespace is ignored, as browsers do for
/// `src`/`href` attribute values.
pub fn resolve_url(base: &Url, reference: &str) -> Result<Url, url::ParseError> {
    base.join(reference.trim())
}

/// Check whether a reference is already self-contained
#[must_use]
pub fn is_data_url(reference: &str) -> bool {
    reference
        .trim_start()
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Decode a `url()` value the way query values are decoded
///
/// `+` becomes a space and percent escapes are decoded; invalid UTF-8 in the
/// decoded bytes is replaced rather than rejected.
#[must_use]
pub fn unquote_plus(value: &str) -> String {
    let spaced = value.replace('+', " ");
    let decoded = urlencoding::decode_binary(spaced.as_bytes());
    String::from_utf8_lossy(&decoded).into_owned()
}
