//! Thumbnail HTTP fetcher
//!
//! Plain GET with a bounded timeout. Any non-200 answer is a failure.

use futures::future::{BoxFuture, FutureExt};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

use super::ThumbnailFetcher;

/// Thumbnail fetch error types
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No thumbnail URL")]
    EmptyUrl,

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Empty response body")]
    EmptyBody,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Fetch task panicked")]
    Panicked,
}

/// reqwest-backed thumbnail fetcher
pub struct HttpThumbnailFetcher {
    client: reqwest::Client,
}

impl HttpThumbnailFetcher {
    /// Default timeout per thumbnail request
    pub const TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new() -> Self {
        Self::with_timeout(Self::TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Fetch the bytes behind `url`
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if url.trim().is_empty() {
            return Err(FetchError::EmptyUrl);
        }

        let response = self.client.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(FetchError::EmptyBody);
        }
        Ok(bytes.to_vec())
    }
}

impl Default for HttpThumbnailFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ThumbnailFetcher for HttpThumbnailFetcher {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>> {
        self.fetch(url).boxed()
    }
}
