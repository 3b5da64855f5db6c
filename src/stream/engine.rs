//! Playback engine abstraction
//!
//! The control loop talks to the audio engine only through this trait.
//! Every method must return promptly: implementations serve reads from
//! buffered state and queue writes.

use thiserror::Error;

/// Errors from playback engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Player '{0}' not found. Install it first.")]
    NotFound(String),

    #[error("Failed to start player: {0}")]
    StartFailed(#[from] std::io::Error),

    #[error("Player IPC socket did not appear")]
    SocketTimeout,

    #[error("Player connection lost")]
    Disconnected,

    #[error("Local playback is not supported on this platform")]
    Unsupported,
}

/// Audio playback engine
///
/// Volume is expressed in mpv's scale, where 100 is unamplified.
pub trait PlaybackEngine: Send {
    /// Load `url` and start playing it, replacing anything loaded
    fn play(&self, url: &str) -> Result<(), EngineError>;

    /// Toggle pause, returning the paused flag after the toggle
    fn pause(&self) -> Result<bool, EngineError>;

    /// Unload the current stream
    fn stop(&self) -> Result<(), EngineError>;

    /// Seek relative to the current position. No-op when idle.
    fn seek(&self, delta_seconds: f64) -> Result<(), EngineError>;

    /// Current position in seconds, if known
    fn time_position(&self) -> Result<Option<f64>, EngineError>;

    /// Duration of the loaded stream in seconds, if known
    fn duration(&self) -> Result<Option<f64>, EngineError>;

    /// Current volume, if known
    fn volume(&self) -> Result<Option<i32>, EngineError>;

    fn set_volume(&self, level: i32) -> Result<(), EngineError>;

    /// True when nothing is loaded
    fn is_idle(&self) -> Result<bool, EngineError>;
}
