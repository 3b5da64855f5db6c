//! Session coordination core
//!
//! Everything here runs on the control thread. Background work is started
//! by the caller from the request values these components hand out, and
//! the results are fed back through their `complete`/`resolve_*` methods.
//!
//! - **volume**: clamp/apply logic
//! - **thumbnails**: id → image bytes cache with single-flight fetches
//! - **search**: single-flight catalog search
//! - **cursor**: selected index into the current result set
//! - **playback**: playback state machine
//! - **progress**: periodic progress sampling

pub mod cursor;
pub mod playback;
pub mod progress;
pub mod search;
pub mod thumbnails;
pub mod volume;

pub use cursor::PlaylistCursor;
pub use playback::{PlaybackSession, ResolveOutcome, ResolveTicket};
pub use progress::ProgressPoller;
pub use search::{SearchCoordinator, SearchOutcome, SearchRequest, SubmitError};
pub use thumbnails::{ThumbnailCache, ThumbnailLookup};
pub use volume::VolumeController;
