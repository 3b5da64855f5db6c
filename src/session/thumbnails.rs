//! Thumbnail cache
//!
//! Unbounded id → bytes map that lives as long as the process. Failures
//! are never stored, so a later lookup retries the fetch.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::{FetchError, ThumbnailFetcher};

/// Answer to a cache lookup
#[derive(Debug, Clone, PartialEq)]
pub enum ThumbnailLookup {
    /// Bytes are cached, no network needed
    Cached(Arc<[u8]>),
    /// Caller should fetch the URL and report back via `complete`
    Fetch,
    /// A fetch for this id is already running
    InFlight,
    /// No URL to fetch from
    Unavailable,
}

#[derive(Debug, Default)]
pub struct ThumbnailCache {
    entries: HashMap<String, Arc<[u8]>>,
    in_flight: HashSet<String>,
}

impl ThumbnailCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached bytes for `id`
    pub fn get(&self, id: &str) -> Option<Arc<[u8]>> {
        self.entries.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn is_in_flight(&self, id: &str) -> bool {
        self.in_flight.contains(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up `id`, claiming the fetch when it has to go to the network
    pub fn get_or_fetch(&mut self, id: &str, url: &str) -> ThumbnailLookup {
        if let Some(bytes) = self.get(id) {
            return ThumbnailLookup::Cached(bytes);
        }
        if url.trim().is_empty() {
            return ThumbnailLookup::Unavailable;
        }
        if !self.in_flight.insert(id.to_string()) {
            return ThumbnailLookup::InFlight;
        }
        ThumbnailLookup::Fetch
    }

    /// Record the result of a fetch claimed through `get_or_fetch`
    pub fn complete(
        &mut self,
        id: &str,
        result: Result<Vec<u8>, FetchError>,
    ) -> Option<Arc<[u8]>> {
        self.in_flight.remove(id);
        match result {
            Ok(bytes) if !bytes.is_empty() => {
                let bytes: Arc<[u8]> = Arc::from(bytes);
                self.entries.insert(id.to_string(), bytes.clone());
                debug!(id, size = bytes.len(), "thumbnail cached");
                Some(bytes)
            }
            Ok(_) => {
                warn!(id, "thumbnail fetch returned no data");
                None
            }
            Err(e) => {
                warn!(id, error = %e, "thumbnail fetch failed");
                None
            }
        }
    }

    /// Look up `id` and fetch inline on a miss
    pub async fn fetch_with(
        &mut self,
        fetcher: &dyn ThumbnailFetcher,
        id: &str,
        url: &str,
    ) -> Option<Arc<[u8]>> {
        match self.get_or_fetch(id, url) {
            ThumbnailLookup::Cached(bytes) => Some(bytes),
            ThumbnailLookup::Fetch => {
                let result = fetcher.get(url).await;
                self.complete(id, result)
            }
            ThumbnailLookup::InFlight | ThumbnailLookup::Unavailable => None,
        }
    }
}
