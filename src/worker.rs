//! Background workers
//!
//! Catalog search, stream resolution and thumbnail fetches run as tokio
//! tasks. They never see session state: each posts a [`WorkerEvent`] back
//! to the control loop, which applies it. A panicking task still posts
//! a failure event so no claim or busy flag is left behind.

use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{CatalogError, CatalogService, FetchError, ThumbnailFetcher};
use crate::models::{CatalogEntry, StreamInfo};
use crate::session::{ResolveTicket, SearchRequest};

/// Result of one unit of background work
#[derive(Debug)]
pub enum WorkerEvent {
    SearchFinished(Result<Vec<CatalogEntry>, CatalogError>),
    StreamResolved {
        ticket: ResolveTicket,
        result: Result<StreamInfo, CatalogError>,
    },
    ThumbnailFetched {
        id: String,
        result: Result<Vec<u8>, FetchError>,
    },
}

/// Spawns background work against the injected collaborators
#[derive(Clone)]
pub struct Workers {
    catalog: Arc<dyn CatalogService>,
    fetcher: Arc<dyn ThumbnailFetcher>,
    tx: mpsc::UnboundedSender<WorkerEvent>,
}

impl Workers {
    /// Create workers and the receiving end the control loop drains
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        fetcher: Arc<dyn ThumbnailFetcher>,
    ) -> (Self, mpsc::UnboundedReceiver<WorkerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                catalog,
                fetcher,
                tx,
            },
            rx,
        )
    }

    pub fn spawn_search(&self, request: SearchRequest) {
        debug!(query = %request.query, limit = request.limit, "dispatching search");
        let catalog = self.catalog.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = guarded("search", catalog.search(&request.query, request.limit), || {
                Err(CatalogError::Failed("worker crashed".to_string()))
            })
            .await;
            let _ = tx.send(WorkerEvent::SearchFinished(result));
        });
    }

    pub fn spawn_resolve(&self, ticket: ResolveTicket) {
        debug!(id = ticket.id(), generation = ticket.generation(), "dispatching resolve");
        let catalog = self.catalog.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = guarded("resolve", catalog.resolve_stream(ticket.id()), || {
                Err(CatalogError::Failed("worker crashed".to_string()))
            })
            .await;
            let _ = tx.send(WorkerEvent::StreamResolved { ticket, result });
        });
    }

    pub fn spawn_thumbnail(&self, id: String, url: String) {
        debug!(%id, "dispatching thumbnail fetch");
        let fetcher = self.fetcher.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = guarded("thumbnail", fetcher.get(&url), || Err(FetchError::Panicked)).await;
            let _ = tx.send(WorkerEvent::ThumbnailFetched { id, result });
        });
    }
}

/// Await `work`, substituting `on_panic()` if it panics
async fn guarded<T>(
    task: &'static str,
    work: impl Future<Output = T>,
    on_panic: impl FnOnce() -> T,
) -> T {
    match AssertUnwindSafe(work).catch_unwind().await {
        Ok(output) => output,
        Err(_) => {
            warn!(task, "worker panicked");
            on_panic()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
