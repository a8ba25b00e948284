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

use std::time::Instant;

use super::buffer::TextBuffer;
use super::debounce::Debouncer;
use super::history::{History, Snapshot};
use crate::config::EditorSettings;

/// Called with the full document text whenever the live buffer content changes.
pub type ChangeListener = Box<dyn FnMut(&str)>;

/// Owns the live buffer and decides when its state becomes an undo step.
///
/// Typing updates the buffer immediately and (re)arms a debounce; the snapshot is
/// committed once the user pauses. Composition suspends snapshotting until it ends.
/// Explicit actions (markup insertion, composition end) commit right away.
pub struct EditController {
    buffer: TextBuffer,
    history: History,
    pending: Debouncer<Snapshot>,
    composing: bool,
    listener: Option<ChangeListener>,
}

impl EditController {
    pub fn new(content: &str, settings: &EditorSettings) -> Self {
        let buffer = TextBuffer::from_text(content);
        let history =
            History::new(Snapshot::new(content, buffer.cursor_offset()), settings.history_capacity);
        Self {
            buffer,
            history,
            pending: Debouncer::new(settings.debounce),
            composing: false,
            listener: None,
        }
    }

    #[must_use]
    pub fn with_listener(mut self, listener: impl FnMut(&str) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Replace the whole document with `new_text`.
    pub fn on_edit(&mut self, new_text: &str, now: Instant) {
        if self.buffer.text() == new_text {
            return;
        }
        self.buffer.set_text(new_text);
        self.content_changed(now);
    }

    /// Apply an in-place mutation. Content changes arm the debounce; cursor motion does not.
    pub fn edit_with<R>(&mut self, now: Instant, f: impl FnOnce(&mut TextBuffer) -> R) -> R {
        let before = self.buffer.content_version;
        let out = f(&mut self.buffer);
        if self.buffer.content_version != before {
            self.content_changed(now);
        }
        out
    }

    pub fn on_composition_start(&mut self) {
        if self.composing {
            tracing::debug!("composition already active, ignoring start");
            return;
        }
        // Pre-composition typing gets its own entry.
        self.flush();
        self.composing = true;
    }

    pub fn on_composition_end(&mut self) {
        if !self.composing {
            tracing::debug!("composition end without start, ignoring");
            return;
        }
        self.composing = false;
        self.pending.cancel();
        self.commit(self.snapshot());
    }

    /// Commit the pending snapshot if its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending.take_due(now) {
            Some(snapshot) => self.commit(snapshot),
            None => false,
        }
    }

    /// Commit the pending snapshot immediately, if there is one.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(snapshot) => self.commit(snapshot),
            None => false,
        }
    }

    pub fn undo(&mut self) -> bool {
        if self.composing {
            tracing::debug!("undo ignored during composition");
            return false;
        }
        self.flush();
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(&snapshot);
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.composing {
            tracing::debug!("redo ignored during composition");
            return false;
        }
        self.flush();
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(&snapshot);
        true
    }

    /// Wrap the selection (or `placeholder`) in `prefix`/`suffix` and commit at once.
    pub fn insert_markup(&mut self, prefix: &str, suffix: &str, placeholder: &str) -> bool {
        if self.composing {
            tracing::debug!("markup insertion ignored during composition");
            return false;
        }
        self.flush();

        let cursor = self.buffer.cursor_offset();
        let (start, end) = self.buffer.selection_range().unwrap_or((cursor, cursor));
        let inner = self.buffer.selected_text().unwrap_or_else(|| placeholder.to_owned());
        let inserted = format!("{prefix}{inner}{suffix}");
        self.buffer.replace_range(start, end, &inserted);

        self.notify();
        self.commit(self.snapshot());
        true
    }

    /// Start over with new host-supplied content. History collapses to that one entry.
    pub fn load(&mut self, content: &str) {
        self.buffer = TextBuffer::from_text(content);
        self.history.reset(Snapshot::new(content, self.buffer.cursor_offset()));
        self.pending.cancel();
        self.composing = false;
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.has_uncommitted_changes()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo() && !self.has_uncommitted_changes()
    }

    /// One-based position of the current entry and the entry count.
    #[must_use]
    pub fn history_position(&self) -> (usize, usize) {
        (self.history.cursor() + 1, self.history.len())
    }

    #[must_use]
    pub fn is_composing(&self) -> bool {
        self.composing
    }

    #[must_use]
    pub fn has_pending_commit(&self) -> bool {
        self.pending.is_pending()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.deadline()
    }

    fn has_uncommitted_changes(&self) -> bool {
        let current = &self.history.current().text;
        match self.pending.peek() {
            Some(snapshot) => snapshot.text != *current,
            None => self.composing && self.buffer.text() != *current,
        }
    }

    fn content_changed(&mut self, now: Instant) {
        self.notify();
        if self.composing {
            return;
        }
        self.pending.schedule(self.snapshot(), now);
    }

    fn commit(&mut self, snapshot: Snapshot) -> bool {
        let committed = self.history.commit(snapshot);
        if committed {
            let (pos, len) = self.history_position();
            tracing::debug!(pos, len, "committed history entry");
        }
        committed
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        self.buffer.set_text(&snapshot.text);
        self.buffer.set_cursor_offset(snapshot.cursor);
        self.notify();
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.buffer.text(), self.buffer.cursor_offset())
    }

    fn notify(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            let text = self.buffer.text();
            listener(&text);
        }
    }
}
