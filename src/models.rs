//! Data structures and types for tubetui
//!
//! Contains the shared models used across the application organized by domain:
//! - **Catalog**: raw search entries and the immutable result items built from them
//! - **Stream**: resolved audio stream info
//! - **Session**: playback session states
//! - **Progress**: derived progress display values

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Placeholder for catalog fields that are missing
pub const UNKNOWN: &str = "Unknown";

/// Thumbnail template used when the catalog does not supply a thumbnail
pub const THUMBNAIL_URL_TEMPLATE: &str = "https://i.ytimg.com/vi/{id}/hqdefault.jpg";

/// Watch page template handed to the stream extractor
pub const WATCH_URL_TEMPLATE: &str = "https://www.youtube.com/watch?v={id}";

// =============================================================================
// Catalog Models
// =============================================================================

/// Raw entry as returned by a catalog search
///
/// Every field is optional because flat extraction routinely omits metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl CatalogEntry {
    /// Entry with only an id, everything else left to defaulting
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// A single playable search result
///
/// Immutable once created: fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResultItem {
    id: String,
    title: String,
    uploader: String,
    thumbnail_url: String,
}

impl ResultItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        uploader: impl Into<String>,
        thumbnail_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            uploader: uploader.into(),
            thumbnail_url: thumbnail_url.into(),
        }
    }

    /// Build an item from a raw catalog entry, applying the defaulting rules.
    ///
    /// Returns `None` for entries without an id since nothing could be played.
    pub fn from_entry(entry: CatalogEntry) -> Option<Self> {
        let id = entry.id.filter(|id| !id.trim().is_empty())?;
        let title = non_empty_or_unknown(entry.title);
        let uploader = non_empty_or_unknown(entry.uploader);
        let thumbnail_url = entry
            .thumbnail
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| thumbnail_url_for(&id));

        Some(Self {
            id,
            title,
            uploader,
            thumbnail_url,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn uploader(&self) -> &str {
        &self.uploader
    }

    pub fn thumbnail_url(&self) -> &str {
        &self.thumbnail_url
    }

    /// Watch page URL for this item
    pub fn watch_url(&self) -> String {
        watch_url_for(&self.id)
    }
}

impl fmt::Display for ResultItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.uploader)
    }
}

fn non_empty_or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Thumbnail URL derived from a video id
pub fn thumbnail_url_for(id: &str) -> String {
    THUMBNAIL_URL_TEMPLATE.replace("{id}", &urlencoding::encode(id))
}

/// Watch page URL derived from a video id
pub fn watch_url_for(id: &str) -> String {
    WATCH_URL_TEMPLATE.replace("{id}", &urlencoding::encode(id))
}

/// Ordered, immutable set of search results
///
/// Cloning is cheap; a new search replaces the whole set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    items: Arc<[ResultItem]>,
}

impl ResultSet {
    pub fn empty() -> Self {
        Self {
            items: Arc::from(Vec::new()),
        }
    }

    /// Map raw entries in catalog order, dropping entries that lack an id
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        entries
            .into_iter()
            .filter_map(ResultItem::from_entry)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ResultItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultItem> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[ResultItem] {
        &self.items
    }
}

impl Default for ResultSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<I: IntoIterator<Item = ResultItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ResultItem;
    type IntoIter = std::slice::Iter<'a, ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// =============================================================================
// Stream Models
// =============================================================================

/// Result of resolving a video id to a direct audio stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub stream_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Duration in seconds, when the extractor knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl StreamInfo {
    pub fn new(stream_url: impl Into<String>) -> Self {
        Self {
            stream_url: stream_url.into(),
            title: None,
            duration: None,
        }
    }
}

// =============================================================================
// Session Models
// =============================================================================

/// Playback session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Nothing selected yet
    #[default]
    Idle,
    /// Stream URL is being resolved
    Loading,
    Playing,
    Paused,
    /// Stopped by the user
    Stopped,
    /// Stream resolution or engine start failed
    Errored,
}

impl SessionState {
    /// States in which the session references an item
    pub fn has_item(&self) -> bool {
        matches!(
            self,
            SessionState::Loading
                | SessionState::Playing
                | SessionState::Paused
                | SessionState::Errored
        )
    }

    /// States in which the engine has something loaded
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Playing | SessionState::Paused)
    }

    /// Label shown next to the now playing title
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Loading => "Loading",
            SessionState::Playing => "Playing",
            SessionState::Paused => "Paused",
            SessionState::Stopped => "Stopped",
            SessionState::Errored => "Error",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Progress Models
// =============================================================================

/// Values shown by the progress row
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressDisplay {
    /// Elapsed seconds
    pub position: f64,
    /// Total seconds, after degenerate-duration substitution
    pub duration: f64,
    /// Whole percent, floored
    pub percent: u32,
    /// Elapsed, formatted
    pub elapsed: String,
    /// Remaining, formatted with a leading '-'
    pub remaining: String,
}

impl ProgressDisplay {
    /// Display for "nothing played yet"
    pub fn zero() -> Self {
        Self {
            position: 0.0,
            duration: 0.0,
            percent: 0,
            elapsed: format_clock(0.0),
            remaining: format!("-{}", format_clock(0.0)),
        }
    }

    /// Percent label, e.g. "42%"
    pub fn percent_label(&self) -> String {
        format!("{}%", self.percent)
    }

    /// Gauge ratio clamped to [0, 1]
    pub fn ratio(&self) -> f64 {
        if self.duration > 0.0 {
            (self.position / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Default for ProgressDisplay {
    fn default() -> Self {
        Self::zero()
    }
}

/// Format seconds as MM:SS, or H:MM:SS once an hour is reached
///
/// Negative and non-finite inputs render as "00:00".
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }
    let total_secs = seconds as u64;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
