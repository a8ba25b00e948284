// =====
// TESTS: 6
// =====
//
// Editing session integration tests.
// Validates key sequences against App state, file I/O, and history.

use crossterm::event::{KeyCode, KeyModifiers};
use markedit::app::{App, Command, handle_paste};
use markedit::config::EditorSettings;
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

use crate::helpers::{DEBOUNCE, press, press_ctrl, test_app, type_text};

#[test]
fn typing_pauses_split_history() {
    let mut app = test_app();
    let t0 = Instant::now();
    type_text(&mut app, "Organic ", t0);
    app.editor.poll(t0 + DEBOUNCE);
    let t1 = t0 + DEBOUNCE + Duration::from_millis(1);
    type_text(&mut app, "beans", t1);
    app.editor.poll(t1 + DEBOUNCE);

    assert_eq!(app.editor.history_position(), (3, 3));
    press_ctrl(&mut app, 'z', t1 + DEBOUNCE);
    assert_eq!(app.editor.text(), "Organic ");
    press_ctrl(&mut app, 'y', t1 + DEBOUNCE);
    assert_eq!(app.editor.text(), "Organic beans");
}

#[test]
fn markup_shortcut_is_its_own_undo_step() {
    let mut app = test_app();
    let now = Instant::now();
    type_text(&mut app, "Sale", now);
    press(&mut app, KeyCode::Home, KeyModifiers::SHIFT, now);
    press(&mut app, KeyCode::Char('b'), KeyModifiers::ALT, now);
    assert_eq!(app.editor.text(), "**Sale**");

    press_ctrl(&mut app, 'z', now);
    assert_eq!(app.editor.text(), "Sale");
    press_ctrl(&mut app, 'z', now);
    assert_eq!(app.editor.text(), "");
}

#[test]
fn paste_then_undo_removes_whole_paste() {
    let mut app = test_app();
    let now = Instant::now();
    type_text(&mut app, "Intro\n", now);
    handle_paste(&mut app, "- 250g\n- whole bean", now);
    assert_eq!(app.editor.text(), "Intro\n- 250g\n- whole bean");

    press_ctrl(&mut app, 'z', now);
    assert_eq!(app.editor.text(), "Intro\n");
}

#[test]
fn windows_line_endings_paste_without_blank_lines() {
    let mut app = test_app();
    handle_paste(&mut app, "para one\r\npara two", Instant::now());
    assert_eq!(app.editor.text(), "para one\npara two");
    assert_eq!(app.editor.history_position(), (2, 2));
}

#[test]
fn dirty_flag_tracks_saved_text() {
    let mut app = test_app();
    let now = Instant::now();
    type_text(&mut app, "x", now);
    app.drain_events();
    assert!(app.dirty);
    press(&mut app, KeyCode::Backspace, KeyModifiers::NONE, now);
    app.drain_events();
    assert!(!app.dirty);
    assert_eq!(app.stats.chars, 0);
}

#[tokio::test]
async fn open_edit_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("product.md");
    std::fs::write(&path, "# Kettle\n").unwrap();

    let mut app = App::open(path.clone(), &EditorSettings::default()).await.unwrap();
    assert_eq!(app.editor.text(), "# Kettle\n");
    let now = Instant::now();
    app.editor.edit_with(now, markedit::app::TextBuffer::move_buffer_end);
    type_text(&mut app, "1.7 litres", now);

    let cmd = press_ctrl(&mut app, 's', now);
    assert_eq!(cmd, Some(Command::Save));
    app.save().await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Kettle\n1.7 litres");
    assert!(!app.dirty);
    assert_eq!(app.status.as_deref(), Some("Saved product.md"));
}

#[tokio::test]
async fn save_into_missing_directory_creates_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drafts").join("review-reply.md");
    let mut app = App::open(path.clone(), &EditorSettings::default()).await.unwrap();
    type_text(&mut app, "Thanks!", Instant::now());
    app.save().await.unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "Thanks!");
}
