//! Shared fakes for the integration tests
//!
//! Each test crate pulls in only what it needs.
#![allow(dead_code)]

use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tubetui::api::{CatalogError, CatalogService, FetchError, ThumbnailFetcher};
use tubetui::app::{App, Settings};
use tubetui::models::{CatalogEntry, StreamInfo};
use tubetui::stream::{EngineError, PlaybackEngine};
use tubetui::worker::Workers;

// =============================================================================
// Fake Engine
// =============================================================================

/// Everything the fake engine was asked to do, plus what it reports back
#[derive(Debug)]
pub struct EngineState {
    pub played: Vec<String>,
    pub stops: usize,
    pub seeks: Vec<f64>,
    pub paused: bool,
    pub idle: bool,
    pub volume: Option<i32>,
    pub position: Option<f64>,
    pub duration: Option<f64>,
    pub fail_play: bool,
    pub fail_reads: bool,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            played: Vec::new(),
            stops: 0,
            seeks: Vec::new(),
            paused: false,
            idle: true,
            volume: Some(80),
            position: None,
            duration: None,
            fail_play: false,
            fail_reads: false,
        }
    }
}

/// In-memory engine; clones share state so a test can keep a handle
/// after boxing one into the app
#[derive(Debug, Clone, Default)]
pub struct FakeEngine {
    state: Arc<Mutex<EngineState>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap()
    }

    /// Pretend the engine is mid-stream at `position` of `duration`
    pub fn set_progress(&self, position: f64, duration: Option<f64>) {
        let mut state = self.state();
        state.idle = false;
        state.position = Some(position);
        state.duration = duration;
    }
}

impl PlaybackEngine for FakeEngine {
    fn play(&self, url: &str) -> Result<(), EngineError> {
        let mut state = self.state();
        if state.fail_play {
            return Err(EngineError::Disconnected);
        }
        state.played.push(url.to_string());
        state.idle = false;
        state.paused = false;
        state.position = Some(0.0);
        Ok(())
    }

    fn pause(&self) -> Result<bool, EngineError> {
        let mut state = self.state();
        state.paused = !state.paused;
        Ok(state.paused)
    }

    fn stop(&self) -> Result<(), EngineError> {
        let mut state = self.state();
        state.stops += 1;
        state.idle = true;
        state.position = None;
        state.duration = None;
        Ok(())
    }

    fn seek(&self, delta_seconds: f64) -> Result<(), EngineError> {
        let mut state = self.state();
        if state.idle {
            return Ok(());
        }
        state.seeks.push(delta_seconds);
        state.position = state.position.map(|p| (p + delta_seconds).max(0.0));
        Ok(())
    }

    fn time_position(&self) -> Result<Option<f64>, EngineError> {
        let state = self.state();
        if state.fail_reads {
            return Err(EngineError::Disconnected);
        }
        Ok(state.position)
    }

    fn duration(&self) -> Result<Option<f64>, EngineError> {
        let state = self.state();
        if state.fail_reads {
            return Err(EngineError::Disconnected);
        }
        Ok(state.duration)
    }

    fn volume(&self) -> Result<Option<i32>, EngineError> {
        Ok(self.state().volume)
    }

    fn set_volume(&self, level: i32) -> Result<(), EngineError> {
        self.state().volume = Some(level);
        Ok(())
    }

    fn is_idle(&self) -> Result<bool, EngineError> {
        Ok(self.state().idle)
    }
}

// =============================================================================
// Fake Catalog
// =============================================================================

/// Catalog answering from fixed data
#[derive(Debug, Default)]
pub struct FakeCatalog {
    pub entries: Vec<CatalogEntry>,
    /// When set, every search fails with this message
    pub search_error: Option<String>,
    /// id -> stream URL; ids missing here fail to resolve
    pub streams: HashMap<String, String>,
    pub queries: Mutex<Vec<(String, usize)>>,
    pub resolves: AtomicUsize,
}

impl FakeCatalog {
    /// Catalog with `n` entries that all resolve
    pub fn with_entries(n: usize) -> Self {
        let entries = catalog_entries(n);
        let streams = entries
            .iter()
            .filter_map(|e| e.id.clone())
            .map(|id| {
                let url = stream_url(&id);
                (id, url)
            })
            .collect();
        Self {
            entries,
            streams,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            search_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn search_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl CatalogService for FakeCatalog {
    fn search<'a>(
        &'a self,
        query: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<CatalogEntry>, CatalogError>> {
        async move {
            self.queries.lock().unwrap().push((query.to_string(), limit));
            if let Some(msg) = &self.search_error {
                return Err(CatalogError::Failed(msg.clone()));
            }
            Ok(self.entries.iter().take(limit).cloned().collect())
        }
        .boxed()
    }

    fn resolve_stream<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<StreamInfo, CatalogError>> {
        async move {
            self.resolves.fetch_add(1, Ordering::SeqCst);
            self.streams
                .get(id)
                .map(|url| StreamInfo::new(url.clone()))
                .ok_or_else(|| CatalogError::Failed("Video unavailable".to_string()))
        }
        .boxed()
    }
}

// =============================================================================
// Fake Thumbnail Fetcher
// =============================================================================

/// Fetcher returning the same bytes for every URL
#[derive(Debug, Default)]
pub struct FakeFetcher {
    pub bytes: Vec<u8>,
    pub calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ThumbnailFetcher for FakeFetcher {
    fn get<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>> {
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.bytes.is_empty() {
                Err(FetchError::Status(404))
            } else {
                Ok(self.bytes.clone())
            }
        }
        .boxed()
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Eleven-character id for entry `i`
pub fn video_id(i: usize) -> String {
    format!("vid{:08}", i)
}

pub fn stream_url(id: &str) -> String {
    format!("https://media.example.com/{}.webm", id)
}

pub fn catalog_entries(n: usize) -> Vec<CatalogEntry> {
    (0..n)
        .map(|i| CatalogEntry {
            id: Some(video_id(i)),
            title: Some(format!("Track {}", i)),
            uploader: Some("Lofi Girl".to_string()),
            thumbnail: None,
        })
        .collect()
}

/// Settings with thumbnails off so tests only see the traffic they ask for
pub fn quiet_settings() -> Settings {
    Settings {
        thumbnails: false,
        ..Settings::default()
    }
}

/// App wired to fakes. Must be called inside a tokio runtime.
pub fn build_app(catalog: FakeCatalog, settings: Settings) -> (App, FakeEngine, Arc<FakeCatalog>) {
    let catalog = Arc::new(catalog);
    let (app, engine) = build_app_with(catalog.clone(), Arc::new(FakeFetcher::default()), settings);
    (app, engine, catalog)
}

/// App wired to any catalog and fetcher, with a fake engine
pub fn build_app_with(
    catalog: Arc<dyn CatalogService>,
    fetcher: Arc<dyn ThumbnailFetcher>,
    settings: Settings,
) -> (App, FakeEngine) {
    let engine = FakeEngine::new();
    let (workers, events) = Workers::new(catalog, fetcher);
    let app = App::new(Box::new(engine.clone()), workers, events, settings);
    (app, engine)
}
