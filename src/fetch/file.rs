//! `file://` resources
//!
//! Local pages reference their assets with relative paths, which resolve to
//! `file://` URLs. They are served from disk with HTTP-like statuses so the
//! cache treats a missing file exactly like a 404.

use url::Url;

use super::{FetchError, FetchedResource};

/// Read a `file://` URL from the local filesystem
///
/// # Errors
///
/// Returns `UnsupportedScheme` when the URL has no local path representation,
/// `TooLarge` when the file exceeds `max_size`, and `Io` for read failures
/// other than a missing file.
pub async fn read_file_url(url: &Url, max_size: usize) -> Result<FetchedResource, FetchError> {
    let path = url
        .to_file_path()
        .map_err(|()| FetchError::UnsupportedScheme {
            url: url.to_string(),
        })?;

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return Ok(FetchedResource::new(url.clone(), 404, None, Vec::new())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("Local resource not found: {}", path.display());
            return Ok(FetchedResource::new(url.clone(), 404, None, Vec::new()));
        }
        Err(source) => return Err(FetchError::Io { path, source }),
    };

    if metadata.len() > max_size as u64 {
        return Err(FetchError::TooLarge {
            url: url.to_string(),
            size: metadata.len(),
            limit: max_size,
        });
    }

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| FetchError::Io { path, source })?;

    Ok(FetchedResource::new(url.clone(), 200, None, bytes))
}
