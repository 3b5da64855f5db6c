//! Integration tests for tubetui
//!
//! Tests are organized by component:
//! - session_test: Playback state machine, cursor and volume
//! - progress_test: Progress sampling
//! - thumbnail_test: HTTP thumbnail fetcher and cache
//! - app_test: End-to-end flow (Search -> Select -> Play -> Stop)
//! - ui_test: UI rendering and theme
//! - cli_test: CLI parsing and command handlers
//!
//! Fakes shared between them live in `common/`.

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
