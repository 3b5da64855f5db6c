//! tubetui - terminal audio player for a video catalog
//!
//! Search the catalog, pick a result, and stream its audio through mpv
//! with live progress and transport controls.
//!
//! # Modules
//!
//! - `models` - Result items, stream info, session states, progress values
//! - `api` - Catalog (yt-dlp) and thumbnail (HTTP) clients
//! - `stream` - Playback engine trait and the mpv engine
//! - `session` - Session coordination: search, cursor, playback, progress, volume, thumbnails
//! - `worker` - Background tasks feeding results back to the control loop
//! - `app` - Application state and key handling
//! - `ui` - TUI components
//! - `cli`, `commands`, `config`, `logging` - Outer surfaces and ambient setup

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod models;
pub mod session;
pub mod stream;
pub mod ui;
pub mod worker;

// Re-export commonly used types
pub use models::{CatalogEntry, ProgressDisplay, ResultItem, ResultSet, SessionState, StreamInfo};

pub use api::{CatalogError, CatalogService, HttpThumbnailFetcher, ThumbnailFetcher, YtDlpClient};
pub use app::{Action, App, InputMode};
pub use stream::{EngineError, MpvEngine, PlaybackEngine};
