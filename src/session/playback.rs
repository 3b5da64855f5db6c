//! Playback session state machine
//!
//! ```text
//!   Idle/Stopped/Errored ──select──► Loading ──resolve_ok──► Playing ◄─toggle─► Paused
//!                                       │                        │                │
//!                                       └──resolve_fail──► Errored               │
//!   Loading/Playing/Paused/Errored ──stop──► Stopped ◄───────────┴────────────────┘
//! ```
//!
//! Every selection hands out a [`ResolveTicket`]. A resolution result is
//! applied only if its ticket still matches the current selection, which
//! is how superseded resolutions get dropped without being cancelled.

use tracing::{debug, info, warn};

use crate::models::{ResultItem, SessionState, StreamInfo};
use crate::stream::{EngineError, PlaybackEngine};

/// Identifies the selection a background resolution belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveTicket {
    generation: u64,
    item: ResultItem,
}

impl ResolveTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Item whose stream is being resolved
    pub fn item(&self) -> &ResultItem {
        &self.item
    }

    pub fn id(&self) -> &str {
        self.item.id()
    }
}

/// What a resolution result did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Engine is playing the resolved stream
    Playing,
    /// Session moved to Errored with this message
    Errored(String),
    /// Result belonged to a superseded selection and was dropped
    Stale,
}

#[derive(Debug, Default)]
pub struct PlaybackSession {
    state: SessionState,
    item: Option<ResultItem>,
    stream_url: Option<String>,
    error: Option<String>,
    generation: u64,
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn item(&self) -> Option<&ResultItem> {
        self.item.as_ref()
    }

    pub fn stream_url(&self) -> Option<&str> {
        self.stream_url.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True if `ticket` belongs to the selection still waiting for its stream
    pub fn is_current(&self, ticket: &ResolveTicket) -> bool {
        self.state == SessionState::Loading
            && ticket.generation == self.generation
            && self.item.as_ref().map(ResultItem::id) == Some(ticket.id())
    }

    /// Select `item` for playback and enter Loading
    ///
    /// The caller resolves the returned ticket in the background. Any
    /// resolution still running for a previous selection becomes stale.
    pub fn select(&mut self, item: ResultItem) -> ResolveTicket {
        self.generation = self.generation.wrapping_add(1);
        info!(id = item.id(), generation = self.generation, "selected");

        self.state = SessionState::Loading;
        self.item = Some(item.clone());
        self.stream_url = None;
        self.error = None;

        ResolveTicket {
            generation: self.generation,
            item,
        }
    }

    /// Apply a successful resolution: store the URL and start the engine
    pub fn resolve_ok(
        &mut self,
        ticket: &ResolveTicket,
        info: StreamInfo,
        engine: &dyn PlaybackEngine,
    ) -> ResolveOutcome {
        if !self.is_current(ticket) {
            debug!(id = ticket.id(), "dropping stale stream resolution");
            return ResolveOutcome::Stale;
        }

        self.stream_url = Some(info.stream_url.clone());
        match engine.play(&info.stream_url) {
            Ok(()) => {
                info!(id = ticket.id(), "playing");
                self.state = SessionState::Playing;
                ResolveOutcome::Playing
            }
            Err(e) => {
                let msg = e.to_string();
                warn!(id = ticket.id(), error = %msg, "engine failed to start stream");
                self.state = SessionState::Errored;
                self.error = Some(msg.clone());
                ResolveOutcome::Errored(msg)
            }
        }
    }

    /// Apply a failed resolution. The engine is not touched.
    pub fn resolve_fail(&mut self, ticket: &ResolveTicket, message: impl Into<String>) -> ResolveOutcome {
        if !self.is_current(ticket) {
            debug!(id = ticket.id(), "dropping stale resolution failure");
            return ResolveOutcome::Stale;
        }

        let msg = message.into();
        warn!(id = ticket.id(), error = %msg, "stream resolution failed");
        self.state = SessionState::Errored;
        self.error = Some(msg.clone());
        ResolveOutcome::Errored(msg)
    }

    /// Toggle pause while Playing or Paused
    ///
    /// Returns the new state, or `None` when there is nothing to toggle.
    pub fn toggle_pause(
        &mut self,
        engine: &dyn PlaybackEngine,
    ) -> Result<Option<SessionState>, EngineError> {
        if !self.state.is_active() {
            return Ok(None);
        }
        let paused = engine.pause()?;
        self.state = if paused {
            SessionState::Paused
        } else {
            SessionState::Playing
        };
        debug!(state = %self.state, "pause toggled");
        Ok(Some(self.state))
    }

    /// Stop playback and drop the selection
    ///
    /// Returns `Ok(false)` when there was nothing to stop. The session is
    /// Stopped even if the engine call fails.
    pub fn stop(&mut self, engine: &dyn PlaybackEngine) -> Result<bool, EngineError> {
        if !self.state.has_item() {
            return Ok(false);
        }

        info!(from = %self.state, "stopped");
        // invalidates a pending resolution
        self.generation = self.generation.wrapping_add(1);
        self.state = SessionState::Stopped;
        self.item = None;
        self.stream_url = None;
        self.error = None;

        engine.stop()?;
        Ok(true)
    }

    /// Seek relative to the current position
    ///
    /// Returns `Ok(false)` without touching the engine when it is idle.
    pub fn seek(&self, engine: &dyn PlaybackEngine, delta_seconds: f64) -> Result<bool, EngineError> {
        if engine.is_idle()? {
            return Ok(false);
        }
        engine.seek(delta_seconds)?;
        Ok(true)
    }
}
