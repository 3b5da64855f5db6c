//! External service clients
//!
//! - `ytdlp`: catalog search and stream resolution through the yt-dlp CLI
//! - `thumbnail`: HTTP fetcher for thumbnail bytes

pub mod thumbnail;
pub mod ytdlp;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::models::{CatalogEntry, StreamInfo};

pub use thumbnail::{FetchError, HttpThumbnailFetcher};
pub use ytdlp::YtDlpClient;

/// Catalog error types
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("'{0}' not found. Install it first.")]
    NotInstalled(String),

    #[error("Failed to run extractor: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("{0}")]
    Failed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("No stream URL in extractor response")]
    NoStreamUrl,
}

/// Remote video catalog: search plus stream extraction
pub trait CatalogService: Send + Sync {
    /// Search the catalog, returning at most `limit` entries in relevance order
    fn search<'a>(
        &'a self,
        query: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<CatalogEntry>, CatalogError>>;

    /// Resolve a video id to a direct audio stream URL
    fn resolve_stream<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<StreamInfo, CatalogError>>;
}

/// Fetches raw thumbnail bytes
pub trait ThumbnailFetcher: Send + Sync {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>>;
}
