//! Session component tests
//!
//! Drives the playback state machine, cursor and volume controller
//! against the fake engine.

mod common;

use common::{catalog_entries, stream_url, video_id, FakeEngine};
use tubetui::models::{ResultItem, ResultSet, SessionState, StreamInfo};
use tubetui::session::{PlaybackSession, PlaylistCursor, ResolveOutcome, VolumeController};

fn item(i: usize) -> ResultItem {
    ResultItem::new(video_id(i), format!("Track {}", i), "Lofi Girl", "")
}

fn stream(i: usize) -> StreamInfo {
    StreamInfo::new(stream_url(&video_id(i)))
}

// =============================================================================
// Selection and Resolution
// =============================================================================

#[test]
fn test_select_enters_loading() {
    let mut session = PlaybackSession::new();
    assert_eq!(session.state(), SessionState::Idle);

    let ticket = session.select(item(0));
    assert_eq!(session.state(), SessionState::Loading);
    assert_eq!(session.item().map(ResultItem::id), Some(ticket.id()));
    assert!(session.is_current(&ticket));
    assert!(session.stream_url().is_none());
}

#[test]
fn test_resolve_ok_starts_engine() {
    let engine = FakeEngine::new();
    let mut session = PlaybackSession::new();

    let ticket = session.select(item(0));
    let outcome = session.resolve_ok(&ticket, stream(0), &engine);

    assert_eq!(outcome, ResolveOutcome::Playing);
    assert_eq!(session.state(), SessionState::Playing);
    assert_eq!(session.stream_url(), Some(stream_url(&video_id(0)).as_str()));
    assert_eq!(engine.state().played, vec![stream_url(&video_id(0))]);
}

#[test]
fn test_superseded_resolution_is_dropped() {
    let engine = FakeEngine::new();
    let mut session = PlaybackSession::new();

    let first = session.select(item(0));
    let second = session.select(item(1));

    // first selection's stream arrives late
    assert_eq!(session.resolve_ok(&first, stream(0), &engine), ResolveOutcome::Stale);
    assert_eq!(session.state(), SessionState::Loading);
    assert!(engine.state().played.is_empty());

    assert_eq!(session.resolve_ok(&second, stream(1), &engine), ResolveOutcome::Playing);
    assert_eq!(engine.state().played, vec![stream_url(&video_id(1))]);

    // and a late failure for the first one changes nothing either
    assert_eq!(session.resolve_fail(&first, "gone"), ResolveOutcome::Stale);
    assert_eq!(session.state(), SessionState::Playing);
    assert!(session.error().is_none());
}

#[test]
fn test_reselecting_same_item_invalidates_old_ticket() {
    let engine = FakeEngine::new();
    let mut session = PlaybackSession::new();

    let old = session.select(item(3));
    let new = session.select(item(3));
    assert!(!session.is_current(&old));

    assert_eq!(session.resolve_ok(&old, stream(3), &engine), ResolveOutcome::Stale);
    assert_eq!(session.resolve_ok(&new, stream(3), &engine), ResolveOutcome::Playing);
    assert_eq!(engine.state().played.len(), 1);
}

#[test]
fn test_resolve_fail_errors_without_engine() {
    let engine = FakeEngine::new();
    let mut session = PlaybackSession::new();

    let ticket = session.select(item(0));
    let outcome = session.resolve_fail(&ticket, "Video unavailable");

    assert_eq!(outcome, ResolveOutcome::Errored("Video unavailable".to_string()));
    assert_eq!(session.state(), SessionState::Errored);
    assert_eq!(session.error(), Some("Video unavailable"));
    assert!(engine.state().played.is_empty());
    assert_eq!(engine.state().stops, 0);
}

#[test]
fn test_engine_play_failure_errors() {
    let engine = FakeEngine::new();
    engine.state().fail_play = true;
    let mut session = PlaybackSession::new();

    let ticket = session.select(item(0));
    match session.resolve_ok(&ticket, stream(0), &engine) {
        ResolveOutcome::Errored(msg) => assert!(msg.contains("connection lost")),
        other => panic!("Expected Errored, got {:?}", other),
    }
    assert_eq!(session.state(), SessionState::Errored);
}

#[test]
fn test_select_from_errored_recovers() {
    let engine = FakeEngine::new();
    let mut session = PlaybackSession::new();

    let ticket = session.select(item(0));
    session.resolve_fail(&ticket, "boom");

    let ticket = session.select(item(1));
    assert_eq!(session.state(), SessionState::Loading);
    assert!(session.error().is_none());
    assert_eq!(session.resolve_ok(&ticket, stream(1), &engine), ResolveOutcome::Playing);
}

// =============================================================================
// Transport
// =============================================================================

#[test]
fn test_toggle_pause_only_when_active() {
    let engine = FakeEngine::new();
    let mut session = PlaybackSession::new();

    assert_eq!(session.toggle_pause(&engine).unwrap(), None);
    assert!(!engine.state().paused);

    let ticket = session.select(item(0));
    assert_eq!(session.toggle_pause(&engine).unwrap(), None, "Loading has nothing to pause");

    session.resolve_ok(&ticket, stream(0), &engine);
    assert_eq!(session.toggle_pause(&engine).unwrap(), Some(SessionState::Paused));
    assert!(engine.state().paused);
    assert_eq!(session.toggle_pause(&engine).unwrap(), Some(SessionState::Playing));
    assert!(!engine.state().paused);
}

#[test]
fn test_stop_clears_selection() {
    let engine = FakeEngine::new();
    let mut session = PlaybackSession::new();

    let ticket = session.select(item(0));
    session.resolve_ok(&ticket, stream(0), &engine);

    assert!(session.stop(&engine).unwrap());
    assert_eq!(session.state(), SessionState::Stopped);
    assert!(session.item().is_none());
    assert!(session.stream_url().is_none());
    assert_eq!(engine.state().stops, 1);

    // nothing left to stop
    assert!(!session.stop(&engine).unwrap());
    assert_eq!(engine.state().stops, 1);
}

#[test]
fn test_stop_while_loading_drops_pending_resolution() {
    let engine = FakeEngine::new();
    let mut session = PlaybackSession::new();

    let ticket = session.select(item(0));
    assert!(session.stop(&engine).unwrap());
    assert_eq!(session.state(), SessionState::Stopped);

    assert_eq!(session.resolve_ok(&ticket, stream(0), &engine), ResolveOutcome::Stale);
    assert_eq!(session.state(), SessionState::Stopped);
    assert!(engine.state().played.is_empty());
}

#[test]
fn test_stop_from_idle_is_noop() {
    let engine = FakeEngine::new();
    let mut session = PlaybackSession::new();
    assert!(!session.stop(&engine).unwrap());
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(engine.state().stops, 0);
}

#[test]
fn test_seek_ignored_while_idle() {
    let engine = FakeEngine::new();
    let session = PlaybackSession::new();

    assert!(!session.seek(&engine, 10.0).unwrap());
    assert!(engine.state().seeks.is_empty());

    engine.set_progress(30.0, Some(120.0));
    assert!(session.seek(&engine, -10.0).unwrap());
    assert_eq!(engine.state().seeks, vec![-10.0]);
    assert_eq!(engine.state().position, Some(20.0));
}

// =============================================================================
// Volume
// =============================================================================

#[test]
fn test_volume_steps_and_clamps() {
    let engine = FakeEngine::new();

    assert_eq!(VolumeController::change_volume(&engine, 5).unwrap(), 85);
    assert_eq!(engine.state().volume, Some(85));

    engine.state().volume = Some(148);
    assert_eq!(VolumeController::change_volume(&engine, 5).unwrap(), 150);

    engine.state().volume = Some(2);
    assert_eq!(VolumeController::change_volume(&engine, -5).unwrap(), 0);
}

#[test]
fn test_volume_result_is_always_clamped_sum() {
    let engine = FakeEngine::new();
    let deltas: Vec<i32> = (-200..=200).chain([i32::MIN, i32::MAX]).collect();

    for start in 0..=150 {
        for &delta in &deltas {
            engine.state().volume = Some(start);
            let expected = start.saturating_add(delta).clamp(0, 150);

            let level = VolumeController::change_volume(&engine, delta).unwrap();
            assert_eq!(level, expected, "start {} delta {}", start, delta);
            assert_eq!(engine.state().volume, Some(expected), "start {} delta {}", start, delta);
        }
    }
}

#[test]
fn test_volume_unknown_starts_from_zero() {
    let engine = FakeEngine::new();
    engine.state().volume = None;
    assert_eq!(VolumeController::change_volume(&engine, 5).unwrap(), 5);
}

// =============================================================================
// Cursor
// =============================================================================

#[test]
fn test_cursor_next_prev_clamp_at_edges() {
    let mut cursor = PlaylistCursor::new();
    cursor.replace(ResultSet::from_entries(catalog_entries(3)));
    assert_eq!(cursor.index(), Some(0));

    assert_eq!(cursor.prev().map(|i| i.id().to_string()), Some(video_id(0)));
    assert_eq!(cursor.index(), Some(0));

    assert_eq!(cursor.next().map(|i| i.id().to_string()), Some(video_id(1)));
    assert_eq!(cursor.next().map(|i| i.id().to_string()), Some(video_id(2)));
    // past the end re-selects the last item
    assert_eq!(cursor.next().map(|i| i.id().to_string()), Some(video_id(2)));
    assert_eq!(cursor.index(), Some(2));
}

#[test]
fn test_cursor_empty_results() {
    let mut cursor = PlaylistCursor::new();
    cursor.replace(ResultSet::from_entries(Vec::new()));
    assert_eq!(cursor.index(), None);
    assert!(cursor.next().is_none());
    assert!(cursor.prev().is_none());
    assert!(cursor.select_current().is_none());
}
