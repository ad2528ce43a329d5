//! HTTP session backed by `reqwest`
//!
//! One `HttpSession` is shared by every fetch of an archiving run. The
//! underlying `Client` pools connections and is cheap to clone.

use futures::StreamExt;
use reqwest::Client;
use url::Url;

use super::file::read_file_url;
use super::{Fetch, FetchError, FetchedResource};
use crate::config::ArchiverConfig;

/// Production [`Fetch`] implementation
#[derive(Debug, Clone)]
pub struct HttpSession {
    client: Client,
    config: ArchiverConfig,
}

impl HttpSession {
    /// Build a session with a fresh connection pool
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Client` if the TLS backend cannot be initialised.
    pub fn new(config: &ArchiverConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent())
            .build()
            .map_err(|e| FetchError::Client {
                reason: e.to_string(),
            })?;

        Ok(Self::with_client(client, config))
    }

    /// Reuse an existing client, e.g. one that already carries cookies
    #[must_use]
    pub fn with_client(client: Client, config: &ArchiverConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    async fn fetch_http(&self, url: &Url) -> Result<FetchedResource, FetchError> {
        let timeout = self.config.request_timeout();
        let limit = self.config.max_resource_size();

        let request_error = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    timeout,
                }
            } else {
                FetchError::Request {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        };

        // Timeout covers connect, headers and the full body.
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .header("User-Agent", self.config.user_agent())
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Enforce the limit BEFORE downloading when the server announces a size
        let expected_size = response.content_length().unwrap_or(0);
        if expected_size > limit as u64 {
            return Err(FetchError::TooLarge {
                url: url.to_string(),
                size: expected_size,
                limit,
            });
        }

        let mut buffer = if expected_size > 0 {
            Vec::with_capacity(expected_size as usize)
        } else {
            Vec::new()
        };

        // Stream with size checking, Content-Length may be absent or wrong
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(request_error)?;

            let new_total = buffer.len() + chunk.len();
            if new_total > limit {
                return Err(FetchError::TooLarge {
                    url: url.to_string(),
                    size: new_total as u64,
                    limit,
                });
            }
            buffer.extend_from_slice(&chunk);
        }

        log::debug!("Fetched {url} [{status}] ({} bytes)", buffer.len());

        Ok(FetchedResource::new(final_url, status, content_type, buffer))
    }
}

impl Fetch for HttpSession {
    async fn fetch(&self, url: &Url) -> Result<FetchedResource, FetchError> {
        match url.scheme() {
            "http" | "https" => self.fetch_http(url).await,
            "file" => read_file_url(url, self.config.max_resource_size()).await,
            _ => Err(FetchError::UnsupportedScheme {
                url: url.to_string(),
            }),
        }
    }
}
