//! Playback infrastructure
//!
//! - Engine: the trait the control loop drives
//! - Mpv: mpv implementation over JSON IPC

pub mod engine;
pub mod mpv;

pub use engine::{EngineError, PlaybackEngine};
pub use mpv::{MpvEngine, MpvOptions};
