//! App state and core application logic
//!
//! Owns the playback engine and the session components, maps keys to
//! actions, and applies worker results on the control thread.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{ResultItem, SessionState};
use crate::session::{
    PlaybackSession, PlaylistCursor, ProgressPoller, ResolveOutcome, SearchCoordinator,
    SearchOutcome, SubmitError, ThumbnailCache, ThumbnailLookup, VolumeController,
};
use crate::stream::PlaybackEngine;
use crate::ui::thumbnail::ThumbnailArt;
use crate::worker::{WorkerEvent, Workers};

/// How long a regular notice stays up
pub const NOTICE_DURATION: Duration = Duration::from_secs(3);

/// How long seek/volume feedback stays up
pub const SHORT_NOTICE_DURATION: Duration = Duration::from_secs(1);

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

// =============================================================================
// Actions
// =============================================================================

/// User intents the control surface can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    FocusSearch,
    LeaveSearch,
    Submit,
    PlaySelection,
    Up,
    Down,
    TogglePause,
    SeekBackward,
    SeekForward,
    Next,
    Prev,
    Stop,
    VolumeUp,
    VolumeDown,
    Quit,
}

impl Action {
    /// Map a key press to an action for the given mode
    ///
    /// In editing mode only Enter and Esc map; other keys edit the query.
    pub fn from_key(key: &KeyEvent, mode: InputMode) -> Option<Self> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Action::Quit);
        }

        match mode {
            InputMode::Editing => match key.code {
                KeyCode::Enter => Some(Action::Submit),
                KeyCode::Esc => Some(Action::LeaveSearch),
                _ => None,
            },
            InputMode::Normal => match key.code {
                KeyCode::Char('/') => Some(Action::FocusSearch),
                KeyCode::Enter => Some(Action::PlaySelection),
                KeyCode::Up | KeyCode::Char('k') => Some(Action::Up),
                KeyCode::Down | KeyCode::Char('j') => Some(Action::Down),
                KeyCode::Char(' ') => Some(Action::TogglePause),
                KeyCode::Left => Some(Action::SeekBackward),
                KeyCode::Right => Some(Action::SeekForward),
                KeyCode::Char('n') => Some(Action::Next),
                KeyCode::Char('p') => Some(Action::Prev),
                KeyCode::Char('s') => Some(Action::Stop),
                KeyCode::Char('0') => Some(Action::VolumeUp),
                KeyCode::Char('9') => Some(Action::VolumeDown),
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            },
        }
    }
}

// =============================================================================
// Query Input
// =============================================================================

/// Search box contents
///
/// `cursor` counts characters, not bytes.
#[derive(Debug, Clone, Default)]
pub struct QueryInput {
    pub text: String,
    pub cursor: usize,
}

impl QueryInput {
    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

// =============================================================================
// Notices
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient toast message
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    expires_at: Instant,
}

impl Notice {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Tunables taken from the config
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub seek_step: f64,
    pub volume_step: i32,
    pub search_limit: usize,
    pub thumbnails: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            seek_step: f64::from(config.seek_step_secs()),
            volume_step: config.volume_step(),
            search_limit: config.search_limit(),
            thumbnails: config.thumbnails(),
        }
    }
}

// =============================================================================
// Main Application State
// =============================================================================

pub struct App {
    /// Whether the app is running
    pub running: bool,
    pub input_mode: InputMode,
    pub query: QueryInput,

    pub search: SearchCoordinator,
    pub cursor: PlaylistCursor,
    pub session: PlaybackSession,
    pub progress: ProgressPoller,
    pub thumbnails: ThumbnailCache,

    /// Status line below the progress bar
    pub status: Option<String>,
    notice: Option<Notice>,
    volume: Option<i32>,
    art: HashMap<String, ThumbnailArt>,
    visible: HashSet<String>,

    settings: Settings,
    engine: Box<dyn PlaybackEngine>,
    workers: Workers,
    events: mpsc::UnboundedReceiver<WorkerEvent>,
}

impl App {
    pub fn new(
        engine: Box<dyn PlaybackEngine>,
        workers: Workers,
        events: mpsc::UnboundedReceiver<WorkerEvent>,
        settings: Settings,
    ) -> Self {
        let volume = engine.volume().ok().flatten();
        Self {
            running: true,
            input_mode: InputMode::Normal,
            query: QueryInput::default(),

            search: SearchCoordinator::new(settings.search_limit),
            cursor: PlaylistCursor::new(),
            session: PlaybackSession::new(),
            progress: ProgressPoller::default(),
            thumbnails: ThumbnailCache::new(),

            status: None,
            notice: None,
            volume,
            art: HashMap::new(),
            visible: HashSet::new(),

            settings,
            engine,
            workers,
            events,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Last known engine volume
    pub fn volume(&self) -> Option<i32> {
        self.volume
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Decoded thumbnail for `id`, once fetched
    pub fn art(&self, id: &str) -> Option<&ThumbnailArt> {
        self.art.get(id)
    }

    pub fn notify(&mut self, message: impl Into<String>, level: NoticeLevel, ttl: Duration) {
        self.notice = Some(Notice {
            message: message.into(),
            level,
            expires_at: Instant::now() + ttl,
        });
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if let Some(action) = Action::from_key(&key, self.input_mode) {
            self.handle_action(action);
            return true;
        }
        if self.input_mode == InputMode::Editing {
            return self.handle_editing_key(key);
        }
        false
    }

    /// Handle keys in editing (text input) mode
    fn handle_editing_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => self.query.insert(c),
            KeyCode::Backspace => self.query.backspace(),
            KeyCode::Delete => self.query.delete(),
            KeyCode::Left => self.query.cursor_left(),
            KeyCode::Right => self.query.cursor_right(),
            KeyCode::Home => self.query.cursor_home(),
            KeyCode::End => self.query.cursor_end(),
            _ => return false,
        }
        true
    }

    pub fn handle_action(&mut self, action: Action) {
        debug!(?action, "action");
        match action {
            Action::FocusSearch => self.input_mode = InputMode::Editing,
            Action::LeaveSearch => self.input_mode = InputMode::Normal,
            Action::Submit => {
                self.input_mode = InputMode::Normal;
                self.submit_search();
            }
            Action::PlaySelection => {
                if let Some(item) = self.cursor.select_current() {
                    self.play(item);
                }
            }
            Action::Up => {
                self.cursor.up();
                self.prefetch_selected();
            }
            Action::Down => {
                self.cursor.down();
                self.prefetch_selected();
            }
            Action::TogglePause => {
                if let Err(e) = self.session.toggle_pause(self.engine.as_ref()) {
                    warn!(error = %e, "pause failed");
                    self.notify(format!("Playback error: {}", e), NoticeLevel::Error, NOTICE_DURATION);
                }
            }
            Action::SeekBackward => self.seek(-self.settings.seek_step),
            Action::SeekForward => self.seek(self.settings.seek_step),
            Action::Next => {
                if let Some(item) = self.cursor.next() {
                    self.play(item);
                }
            }
            Action::Prev => {
                if let Some(item) = self.cursor.prev() {
                    self.play(item);
                }
            }
            Action::Stop => self.stop(),
            Action::VolumeUp => self.change_volume(self.settings.volume_step),
            Action::VolumeDown => self.change_volume(-self.settings.volume_step),
            Action::Quit => self.quit(),
        }
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Submit the search box contents
    pub fn submit_search(&mut self) {
        match self.search.submit(&self.query.text) {
            Ok(request) => {
                self.cursor.clear();
                self.visible.clear();
                self.status = Some(format!("Searching for '{}'...", request.query));
                self.workers.spawn_search(request);
            }
            Err(SubmitError::Busy) => {
                self.notify(SubmitError::Busy.to_string(), NoticeLevel::Warning, NOTICE_DURATION);
            }
            Err(SubmitError::EmptyQuery) => {}
        }
    }

    /// Select `item` for playback and start resolving its stream
    pub fn play(&mut self, item: ResultItem) {
        self.progress.reset();
        self.status = None;
        self.request_thumbnail(&item);
        let ticket = self.session.select(item);
        self.workers.spawn_resolve(ticket);
    }

    pub fn stop(&mut self) {
        match self.session.stop(self.engine.as_ref()) {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => warn!(error = %e, "engine stop failed"),
        }
        self.progress.reset();
        self.status = None;
    }

    fn seek(&mut self, delta: f64) {
        match self.session.seek(self.engine.as_ref(), delta) {
            Ok(true) => {
                let msg = if delta >= 0.0 {
                    format!("Seek +{}s", delta)
                } else {
                    format!("Seek {}s", delta)
                };
                self.notify(msg, NoticeLevel::Info, SHORT_NOTICE_DURATION);
            }
            Ok(false) => {}
            Err(e) => warn!(error = %e, "seek failed"),
        }
    }

    fn change_volume(&mut self, delta: i32) {
        match VolumeController::change_volume(self.engine.as_ref(), delta) {
            Ok(level) => {
                self.volume = Some(level);
                self.notify(format!("Volume {}", level), NoticeLevel::Info, SHORT_NOTICE_DURATION);
            }
            Err(e) => warn!(error = %e, "volume change failed"),
        }
    }

    // -------------------------------------------------------------------------
    // Thumbnails
    // -------------------------------------------------------------------------

    fn request_thumbnail(&mut self, item: &ResultItem) {
        if !self.settings.thumbnails {
            return;
        }
        match self.thumbnails.get_or_fetch(item.id(), item.thumbnail_url()) {
            ThumbnailLookup::Cached(bytes) => {
                if !self.art.contains_key(item.id()) {
                    if let Some(art) = ThumbnailArt::decode(&bytes) {
                        self.art.insert(item.id().to_string(), art);
                    }
                }
            }
            ThumbnailLookup::Fetch => self
                .workers
                .spawn_thumbnail(item.id().to_string(), item.thumbnail_url().to_string()),
            ThumbnailLookup::InFlight | ThumbnailLookup::Unavailable => {}
        }
    }

    fn prefetch_selected(&mut self) {
        if let Some(item) = self.cursor.current().cloned() {
            self.request_thumbnail(&item);
        }
    }

    /// Keep the cursor on screen and fetch thumbnails for rows that just
    /// became visible
    pub fn prefetch_visible(&mut self, rows: usize) {
        self.cursor.scroll_into_view(rows);
        let items: Vec<ResultItem> = self.cursor.visible(rows).to_vec();
        let now_visible: HashSet<String> = items.iter().map(|i| i.id().to_string()).collect();
        let fresh: Vec<ResultItem> = items
            .into_iter()
            .filter(|i| !self.visible.contains(i.id()))
            .collect();
        self.visible = now_visible;

        for item in &fresh {
            self.request_thumbnail(item);
        }
    }

    // -------------------------------------------------------------------------
    // Worker Results
    // -------------------------------------------------------------------------

    /// Apply every worker result that is ready. Returns true if any was.
    pub fn drain_worker_events(&mut self) -> bool {
        let mut any = false;
        while let Ok(event) = self.events.try_recv() {
            self.apply_worker_event(event);
            any = true;
        }
        any
    }

    /// Wait for the next worker result and apply it
    pub async fn next_worker_event(&mut self) -> bool {
        match self.events.recv().await {
            Some(event) => {
                self.apply_worker_event(event);
                true
            }
            None => false,
        }
    }

    pub fn apply_worker_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::SearchFinished(result) => {
                let outcome = self.search.complete(result);
                match &outcome {
                    SearchOutcome::Found(_) => {
                        self.cursor.replace(self.search.results().clone());
                        self.status = None;
                        self.notify(outcome.message(), NoticeLevel::Success, NOTICE_DURATION);
                    }
                    SearchOutcome::Empty => {
                        self.cursor.clear();
                        self.status = Some(outcome.message());
                        self.notify(outcome.message(), NoticeLevel::Warning, NOTICE_DURATION);
                    }
                    SearchOutcome::Failed(_) => {
                        self.status = Some(outcome.message());
                        self.notify(outcome.message(), NoticeLevel::Error, NOTICE_DURATION);
                    }
                }
                self.visible.clear();
            }
            WorkerEvent::StreamResolved { ticket, result } => {
                let outcome = match result {
                    Ok(info) => self.session.resolve_ok(&ticket, info, self.engine.as_ref()),
                    Err(e) => self.session.resolve_fail(&ticket, e.to_string()),
                };
                match outcome {
                    ResolveOutcome::Playing => {
                        self.status = None;
                    }
                    ResolveOutcome::Errored(msg) => {
                        let msg = format!("Error fetching stream: {}", msg);
                        self.status = Some(msg.clone());
                        self.notify(msg, NoticeLevel::Error, NOTICE_DURATION);
                    }
                    ResolveOutcome::Stale => {}
                }
            }
            WorkerEvent::ThumbnailFetched { id, result } => {
                if let Some(bytes) = self.thumbnails.complete(&id, result) {
                    if let Some(art) = ThumbnailArt::decode(&bytes) {
                        self.art.insert(id, art);
                    }
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Periodic work: progress sampling and notice expiry
    pub fn on_tick(&mut self, now: Instant) {
        // While Loading the engine is still on the previous stream
        if !matches!(self.session.state(), SessionState::Idle | SessionState::Loading) {
            self.progress.poll(now, self.engine.as_ref());
        }
        if let Ok(Some(level)) = self.engine.volume() {
            self.volume = Some(level);
        }
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    // -------------------------------------------------------------------------
    // QueryInput Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_query_input_editing() {
        let mut query = QueryInput::default();

        for c in "hello".chars() {
            query.insert(c);
        }
        assert_eq!(query.text, "hello");
        assert_eq!(query.cursor, 5);

        query.cursor_left();
        query.cursor_left();
        query.insert('X');
        assert_eq!(query.text, "helXlo");

        query.backspace();
        assert_eq!(query.text, "hello");

        query.cursor_home();
        query.delete();
        assert_eq!(query.text, "ello");

        query.cursor_end();
        assert_eq!(query.cursor, 4);

        query.clear();
        assert!(query.text.is_empty());
        assert_eq!(query.cursor, 0);
    }

    #[test]
    fn test_query_input_multibyte() {
        let mut query = QueryInput::default();
        for c in "café".chars() {
            query.insert(c);
        }
        query.backspace();
        assert_eq!(query.text, "caf");
        query.cursor_home();
        query.insert('ñ');
        query.cursor_right();
        query.delete();
        assert_eq!(query.text, "ñcf");
    }

    // -------------------------------------------------------------------------
    // Key Mapping Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_normal_key_bindings() {
        let m = InputMode::Normal;
        assert_eq!(Action::from_key(&key(KeyCode::Char('/')), m), Some(Action::FocusSearch));
        assert_eq!(Action::from_key(&key(KeyCode::Enter), m), Some(Action::PlaySelection));
        assert_eq!(Action::from_key(&key(KeyCode::Char('j')), m), Some(Action::Down));
        assert_eq!(Action::from_key(&key(KeyCode::Up), m), Some(Action::Up));
        assert_eq!(Action::from_key(&key(KeyCode::Char(' ')), m), Some(Action::TogglePause));
        assert_eq!(Action::from_key(&key(KeyCode::Left), m), Some(Action::SeekBackward));
        assert_eq!(Action::from_key(&key(KeyCode::Right), m), Some(Action::SeekForward));
        assert_eq!(Action::from_key(&key(KeyCode::Char('n')), m), Some(Action::Next));
        assert_eq!(Action::from_key(&key(KeyCode::Char('p')), m), Some(Action::Prev));
        assert_eq!(Action::from_key(&key(KeyCode::Char('s')), m), Some(Action::Stop));
        assert_eq!(Action::from_key(&key(KeyCode::Char('0')), m), Some(Action::VolumeUp));
        assert_eq!(Action::from_key(&key(KeyCode::Char('9')), m), Some(Action::VolumeDown));
        assert_eq!(Action::from_key(&key(KeyCode::Char('q')), m), Some(Action::Quit));
        assert_eq!(Action::from_key(&key(KeyCode::Char('x')), m), None);
    }

    #[test]
    fn test_editing_keys_type_text() {
        let m = InputMode::Editing;
        assert_eq!(Action::from_key(&key(KeyCode::Char('q')), m), None);
        assert_eq!(Action::from_key(&key(KeyCode::Char('s')), m), None);
        assert_eq!(Action::from_key(&key(KeyCode::Enter), m), Some(Action::Submit));
        assert_eq!(Action::from_key(&key(KeyCode::Esc), m), Some(Action::LeaveSearch));
    }

    #[test]
    fn test_ctrl_c_quits_in_any_mode() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(Action::from_key(&ctrl_c, InputMode::Normal), Some(Action::Quit));
        assert_eq!(Action::from_key(&ctrl_c, InputMode::Editing), Some(Action::Quit));
    }

    #[test]
    fn test_settings_from_config() {
        let config = Config {
            seek_step_secs: Some(30),
            volume_step: Some(2),
            thumbnails: Some(false),
            ..Config::default()
        };
        let settings = Settings::from_config(&config);
        assert_eq!(settings.seek_step, 30.0);
        assert_eq!(settings.volume_step, 2);
        assert_eq!(settings.search_limit, 15);
        assert!(!settings.thumbnails);
    }
}
