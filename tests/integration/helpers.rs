use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use markedit::app::{App, Command, EditController, handle_key};
use markedit::config::EditorSettings;
use std::time::{Duration, Instant};

pub const DEBOUNCE: Duration = Duration::from_millis(1500);

/// Build a minimal `App` for integration testing.
/// No terminal, no file -- just state.
pub fn test_app() -> App {
    App::test_default()
}

pub fn controller(content: &str) -> EditController {
    EditController::new(content, &EditorSettings::default())
}

/// Helper: type a string one key at a time, the way the terminal delivers it.
pub fn type_text(app: &mut App, text: &str, now: Instant) {
    for c in text.chars() {
        let code = if c == '\n' { KeyCode::Enter } else { KeyCode::Char(c) };
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE), now);
    }
}

pub fn press_ctrl(app: &mut App, c: char, now: Instant) -> Option<Command> {
    handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL), now)
}

pub fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers, now: Instant) {
    handle_key(app, KeyEvent::new(code, modifiers), now);
}
