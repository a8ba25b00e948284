// markedit - A terminal markdown editor with bounded undo history
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use super::buffer::TextBuffer;
use super::markup::MarkupAction;
use super::App;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Instant;

/// Work the key handler cannot finish synchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Save,
    Reload,
}

const TAB_TEXT: &str = "  ";

pub fn handle_key(app: &mut App, key: KeyEvent, now: Instant) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    app.status = None;

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    if ctrl && !alt && matches!(key.code, KeyCode::Char('q' | 'Q')) {
        request_quit(app);
        return None;
    }
    app.quit_armed = false;

    // AltGr arrives as Ctrl+Alt on some platforms.
    if ctrl && alt {
        if let KeyCode::Char(c) = key.code {
            app.editor.edit_with(now, |b| b.insert_char(c));
        }
        return None;
    }
    if ctrl {
        return handle_ctrl(app, key.code, shift, now);
    }
    if alt {
        if let KeyCode::Char(c) = key.code
            && let Some(action) = markup_for_alt(c)
        {
            apply_markup(app, action);
        }
        return None;
    }

    match key.code {
        KeyCode::Char(c) => {
            app.editor.edit_with(now, |b| b.insert_char(c));
        }
        KeyCode::Enter => {
            app.editor.edit_with(now, TextBuffer::insert_newline);
        }
        KeyCode::Tab => {
            app.editor.edit_with(now, |b| b.insert_str(TAB_TEXT));
        }
        KeyCode::Backspace => {
            app.editor.edit_with(now, TextBuffer::delete_char_before);
        }
        KeyCode::Delete => {
            app.editor.edit_with(now, TextBuffer::delete_char_after);
        }
        KeyCode::Esc => {
            app.editor.edit_with(now, TextBuffer::clear_selection);
        }
        KeyCode::Left => move_cursor(app, now, shift, TextBuffer::move_left),
        KeyCode::Right => move_cursor(app, now, shift, TextBuffer::move_right),
        KeyCode::Up => move_cursor(app, now, shift, TextBuffer::move_up),
        KeyCode::Down => move_cursor(app, now, shift, TextBuffer::move_down),
        KeyCode::Home => move_cursor(app, now, shift, TextBuffer::move_home),
        KeyCode::End => move_cursor(app, now, shift, TextBuffer::move_end),
        _ => {}
    }
    None
}

fn handle_ctrl(app: &mut App, code: KeyCode, shift: bool, now: Instant) -> Option<Command> {
    match code {
        KeyCode::Char('s' | 'S') => return Some(Command::Save),
        KeyCode::Char('r' | 'R') => return Some(Command::Reload),
        KeyCode::Char('z') if !shift => {
            if !app.editor.undo() {
                app.status = Some("Nothing to undo".to_owned());
            }
        }
        KeyCode::Char('y' | 'Y' | 'Z' | 'z') => {
            if !app.editor.redo() {
                app.status = Some("Nothing to redo".to_owned());
            }
        }
        KeyCode::Char('p' | 'P') => app.show_preview = !app.show_preview,
        KeyCode::Char('a' | 'A') => {
            app.editor.edit_with(now, TextBuffer::select_all);
        }
        KeyCode::Char('b' | 'B') => apply_markup(app, MarkupAction::Bold),
        KeyCode::Home => move_cursor(app, now, shift, TextBuffer::move_buffer_start),
        KeyCode::End => move_cursor(app, now, shift, TextBuffer::move_buffer_end),
        _ => {}
    }
    None
}

/// Bracketed paste lands as one history entry, the same way a finished composition does.
pub fn handle_paste(app: &mut App, text: &str, now: Instant) {
    app.quit_armed = false;
    app.editor.on_composition_start();
    app.editor.edit_with(now, |b| b.insert_str(text));
    app.editor.on_composition_end();
}

fn request_quit(app: &mut App) {
    app.drain_events();
    if app.dirty && !app.quit_armed {
        app.quit_armed = true;
        app.status = Some("Unsaved changes. Press Ctrl+Q again to quit".to_owned());
        return;
    }
    app.should_quit = true;
}

fn move_cursor(app: &mut App, now: Instant, extend: bool, motion: fn(&mut TextBuffer)) {
    app.editor.edit_with(now, |b| {
        if extend {
            b.start_selection();
        } else {
            b.clear_selection();
        }
        motion(b);
    });
}

fn apply_markup(app: &mut App, action: MarkupAction) {
    if !action.apply(&mut app.editor) {
        app.status = Some(format!("{} unavailable while composing", action.label()));
    }
}

fn markup_for_alt(c: char) -> Option<MarkupAction> {
    let action = match c.to_ascii_lowercase() {
        'b' => MarkupAction::Bold,
        'i' => MarkupAction::Italic,
        's' => MarkupAction::Strikethrough,
        'h' => MarkupAction::Heading,
        'q' => MarkupAction::Quote,
        'c' => MarkupAction::InlineCode,
        'm' => MarkupAction::CodeBlock,
        'k' => MarkupAction::Link,
        'g' => MarkupAction::Image,
        'l' => MarkupAction::BulletList,
        'n' => MarkupAction::NumberedList,
        'r' => MarkupAction::HorizontalRule,
        _ => return None,
    };
    Some(action)
}
