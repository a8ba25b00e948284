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

/// Live document text, stored line by line with a char-indexed cursor.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    pub lines: Vec<String>,
    pub cursor_row: usize,
    pub cursor_col: usize,
    /// Other end of the selection; the cursor is the moving end.
    pub anchor: Option<(usize, usize)>,
    /// Monotonically increasing version counter. Bumped on every content or cursor change
    /// so that downstream caches (e.g. wrap result) can detect staleness cheaply.
    pub version: u64,
    /// Bumped only when the text itself changes.
    pub content_version: u64,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
            anchor: None,
            version: 0,
            content_version: 0,
        }
    }

    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.set_text(text);
        buffer.move_buffer_start();
        buffer.version = 0;
        buffer.content_version = 0;
        buffer
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Replace the content with the given text, placing the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(String::from).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.cursor_row = self.lines.len() - 1;
        self.cursor_col = self.lines[self.cursor_row].chars().count();
        self.anchor = None;
        self.touch_content();
    }

    pub fn insert_char(&mut self, c: char) {
        self.delete_selection();
        let line = &mut self.lines[self.cursor_row];
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        line.insert(byte_idx, c);
        self.cursor_col += 1;
        self.touch_content();
    }

    pub fn insert_newline(&mut self) {
        self.delete_selection();
        let line = &mut self.lines[self.cursor_row];
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        let rest = line[byte_idx..].to_owned();
        line.truncate(byte_idx);
        self.cursor_row += 1;
        self.lines.insert(self.cursor_row, rest);
        self.cursor_col = 0;
        self.touch_content();
    }

    /// Insert text at the cursor. `\r\n` and lone `\r` both count as one line break.
    pub fn insert_str(&mut self, s: &str) {
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' => {
                    chars.next_if_eq(&'\n');
                    self.insert_newline();
                }
                '\n' => self.insert_newline(),
                _ => self.insert_char(c),
            }
        }
    }

    pub fn delete_char_before(&mut self) {
        if self.delete_selection() {
            return;
        }
        if self.cursor_col > 0 {
            let line = &mut self.lines[self.cursor_row];
            self.cursor_col -= 1;
            let byte_idx = char_to_byte_index(line, self.cursor_col);
            line.remove(byte_idx);
            self.touch_content();
        } else if self.cursor_row > 0 {
            let removed = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.lines[self.cursor_row].chars().count();
            self.lines[self.cursor_row].push_str(&removed);
            self.touch_content();
        }
    }

    pub fn delete_char_after(&mut self) {
        if self.delete_selection() {
            return;
        }
        let line_len = self.lines[self.cursor_row].chars().count();
        if self.cursor_col < line_len {
            let line = &mut self.lines[self.cursor_row];
            let byte_idx = char_to_byte_index(line, self.cursor_col);
            line.remove(byte_idx);
            self.touch_content();
        } else if self.cursor_row + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&next);
            self.touch_content();
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
            self.version += 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.lines[self.cursor_row].chars().count();
            self.version += 1;
        }
    }

    pub fn move_right(&mut self) {
        let line_len = self.lines[self.cursor_row].chars().count();
        if self.cursor_col < line_len {
            self.cursor_col += 1;
            self.version += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
            self.version += 1;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            let line_len = self.lines[self.cursor_row].chars().count();
            self.cursor_col = self.cursor_col.min(line_len);
            self.version += 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            let line_len = self.lines[self.cursor_row].chars().count();
            self.cursor_col = self.cursor_col.min(line_len);
            self.version += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_col = 0;
        self.version += 1;
    }

    pub fn move_end(&mut self) {
        self.cursor_col = self.lines[self.cursor_row].chars().count();
        self.version += 1;
    }

    pub fn move_buffer_start(&mut self) {
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.version += 1;
    }

    pub fn move_buffer_end(&mut self) {
        self.cursor_row = self.lines.len() - 1;
        self.cursor_col = self.lines[self.cursor_row].chars().count();
        self.version += 1;
    }

    /// Pin the selection anchor at the cursor unless a selection is already open.
    pub fn start_selection(&mut self) {
        if self.anchor.is_none() {
            self.anchor = Some((self.cursor_row, self.cursor_col));
        }
    }

    pub fn clear_selection(&mut self) {
        if self.anchor.take().is_some() {
            self.version += 1;
        }
    }

    pub fn select_all(&mut self) {
        self.anchor = Some((0, 0));
        self.move_buffer_end();
    }

    /// Selected range as ordered char offsets. An empty selection is `None`.
    #[must_use]
    pub fn selection_range(&self) -> Option<(usize, usize)> {
        let (row, col) = self.anchor?;
        let anchor = self.offset_of(row, col);
        let cursor = self.cursor_offset();
        match anchor.cmp(&cursor) {
            std::cmp::Ordering::Less => Some((anchor, cursor)),
            std::cmp::Ordering::Greater => Some((cursor, anchor)),
            std::cmp::Ordering::Equal => None,
        }
    }

    #[must_use]
    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.selection_range()?;
        Some(self.text().chars().skip(start).take(end - start).collect())
    }

    /// Cursor position as a char offset into `text()`, counting each line break as one char.
    #[must_use]
    pub fn cursor_offset(&self) -> usize {
        self.offset_of(self.cursor_row, self.cursor_col)
    }

    /// Move the cursor to a char offset, clamped to the end of the text.
    pub fn set_cursor_offset(&mut self, offset: usize) {
        let (row, col) = self.position_of(offset);
        self.cursor_row = row;
        self.cursor_col = col;
        self.anchor = None;
        self.version += 1;
    }

    /// Replace the chars in `start..end` with `replacement` and leave the cursor after it.
    pub fn replace_range(&mut self, start: usize, end: usize, replacement: &str) {
        let text = self.text();
        let total = text.chars().count();
        let end = end.min(total);
        let start = start.min(end);
        let start_byte = char_to_byte_index(&text, start);
        let end_byte = char_to_byte_index(&text, end);
        let mut next = String::with_capacity(text.len() + replacement.len());
        next.push_str(&text[..start_byte]);
        next.push_str(replacement);
        next.push_str(&text[end_byte..]);
        self.set_text(&next);
        self.set_cursor_offset(start + replacement.chars().count());
    }

    #[must_use]
    pub fn line_count(&self) -> u16 {
        u16::try_from(self.lines.len()).unwrap_or(u16::MAX)
    }

    #[must_use]
    pub fn char_count(&self) -> usize {
        self.lines.iter().map(|l| l.chars().count()).sum::<usize>() + self.lines.len() - 1
    }

    #[must_use]
    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|l| l.split_whitespace().count()).sum()
    }

    fn offset_of(&self, row: usize, col: usize) -> usize {
        let row = row.min(self.lines.len() - 1);
        let before: usize = self.lines[..row].iter().map(|l| l.chars().count() + 1).sum();
        before + col.min(self.lines[row].chars().count())
    }

    fn position_of(&self, offset: usize) -> (usize, usize) {
        let mut remaining = offset;
        for (row, line) in self.lines.iter().enumerate() {
            let len = line.chars().count();
            if remaining <= len {
                return (row, remaining);
            }
            remaining -= len + 1;
        }
        let last = self.lines.len() - 1;
        (last, self.lines[last].chars().count())
    }

    /// Remove the selected text, if any. Returns whether anything was removed.
    fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection_range() else {
            self.anchor = None;
            return false;
        };
        self.replace_range(start, end, "");
        true
    }

    fn touch_content(&mut self) {
        self.version += 1;
        self.content_version += 1;
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a character index to a byte index within a string.
pub(crate) fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // char_to_byte_index

    #[test]
    fn char_to_byte_index_multibyte() {
        let s = "\u{1F600}hello";
        assert_eq!(char_to_byte_index(s, 0), 0);
        assert_eq!(char_to_byte_index(s, 1), 4);
        assert_eq!(char_to_byte_index(s, 99), s.len());
    }

    // construction

    #[test]
    fn from_text_places_cursor_at_start_without_bumping_versions() {
        let buf = TextBuffer::from_text("# Title\nbody");
        assert_eq!(buf.lines, vec!["# Title", "body"]);
        assert_eq!((buf.cursor_row, buf.cursor_col), (0, 0));
        assert_eq!(buf.version, 0);
        assert_eq!(buf.content_version, 0);
    }

    #[test]
    fn insert_str_treats_crlf_as_one_break() {
        let mut buf = TextBuffer::new();
        buf.insert_str("one\r\ntwo\rthree\n");
        assert_eq!(buf.lines, vec!["one", "two", "three", ""]);
        assert_eq!((buf.cursor_row, buf.cursor_col), (3, 0));
    }

    #[test]
    fn set_text_places_cursor_at_end() {
        let mut buf = TextBuffer::new();
        buf.set_text("ab\ncde");
        assert_eq!((buf.cursor_row, buf.cursor_col), (1, 3));
        assert_eq!(buf.text(), "ab\ncde");
    }

    // editing

    #[test]
    fn insert_str_treats_carriage_return_as_newline() {
        let mut buf = TextBuffer::new();
        buf.insert_str("a\rb\nc");
        assert_eq!(buf.lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn backspace_start_of_line_joins() {
        let mut buf = TextBuffer::new();
        buf.insert_str("hello\nworld");
        buf.move_home();
        buf.delete_char_before();
        assert_eq!(buf.lines, vec!["helloworld"]);
        assert_eq!(buf.cursor_col, 5);
    }

    #[test]
    fn backspace_at_origin_is_noop() {
        let mut buf = TextBuffer::new();
        buf.insert_str("hi");
        buf.move_home();
        let v = buf.content_version;
        buf.delete_char_before();
        assert_eq!(buf.text(), "hi");
        assert_eq!(buf.content_version, v);
    }

    #[test]
    fn delete_end_of_line_joins_next() {
        let mut buf = TextBuffer::new();
        buf.insert_str("hello\nworld");
        buf.cursor_row = 0;
        buf.cursor_col = 5;
        buf.delete_char_after();
        assert_eq!(buf.lines, vec!["helloworld"]);
    }

    #[test]
    fn cursor_motion_does_not_touch_content_version() {
        let mut buf = TextBuffer::new();
        buf.insert_str("ab\ncd");
        let v = buf.content_version;
        buf.move_up();
        buf.move_left();
        buf.move_end();
        buf.move_buffer_start();
        assert_eq!(buf.content_version, v);
    }

    #[test]
    fn vertical_motion_clamps_column() {
        let mut buf = TextBuffer::new();
        buf.insert_str("ab\nhello");
        buf.move_up();
        assert_eq!((buf.cursor_row, buf.cursor_col), (0, 2));
    }

    // offsets

    #[test]
    fn cursor_offset_counts_line_breaks() {
        let mut buf = TextBuffer::new();
        buf.insert_str("ab\ncd");
        assert_eq!(buf.cursor_offset(), 5);
        buf.move_home();
        assert_eq!(buf.cursor_offset(), 3);
    }

    #[test]
    fn set_cursor_offset_round_trips_and_clamps() {
        let mut buf = TextBuffer::from_text("ab\n\u{4F60}\u{597D}\nxyz");
        buf.set_cursor_offset(4);
        assert_eq!((buf.cursor_row, buf.cursor_col), (1, 1));
        assert_eq!(buf.cursor_offset(), 4);
        buf.set_cursor_offset(1_000);
        assert_eq!((buf.cursor_row, buf.cursor_col), (2, 3));
    }

    // selection

    #[test]
    fn selection_range_is_ordered_either_direction() {
        let mut buf = TextBuffer::from_text("hello world");
        buf.set_cursor_offset(6);
        buf.start_selection();
        buf.move_end();
        assert_eq!(buf.selection_range(), Some((6, 11)));
        assert_eq!(buf.selected_text().as_deref(), Some("world"));

        buf.clear_selection();
        buf.start_selection();
        buf.move_home();
        assert_eq!(buf.selection_range(), Some((0, 11)));
    }

    #[test]
    fn empty_selection_is_none() {
        let mut buf = TextBuffer::from_text("abc");
        buf.start_selection();
        assert_eq!(buf.selection_range(), None);
    }

    #[test]
    fn typing_replaces_selection() {
        let mut buf = TextBuffer::from_text("hello world");
        buf.select_all();
        buf.insert_char('x');
        assert_eq!(buf.text(), "x");
        assert_eq!(buf.anchor, None);
    }

    #[test]
    fn backspace_deletes_multiline_selection() {
        let mut buf = TextBuffer::from_text("one\ntwo\nthree");
        buf.set_cursor_offset(2);
        buf.start_selection();
        buf.move_down();
        buf.move_down();
        buf.delete_char_before();
        assert_eq!(buf.text(), "onree");
        assert_eq!(buf.cursor_offset(), 2);
    }

    #[test]
    fn replace_range_across_lines_places_cursor_after_replacement() {
        let mut buf = TextBuffer::from_text("ab\ncd");
        buf.replace_range(1, 4, "**X**");
        assert_eq!(buf.text(), "a**X**d");
        assert_eq!(buf.cursor_offset(), 6);
    }

    #[test]
    fn replace_range_clamps_out_of_bounds() {
        let mut buf = TextBuffer::from_text("abc");
        buf.replace_range(10, 20, "!");
        assert_eq!(buf.text(), "abc!");
    }

    // statistics

    #[test]
    fn counts_words_and_chars() {
        let buf = TextBuffer::from_text("Fresh **roasted** beans\n\n- 250g bag");
        assert_eq!(buf.word_count(), 6);
        assert_eq!(buf.char_count(), "Fresh **roasted** beans\n\n- 250g bag".chars().count());
    }

    #[test]
    fn unicode_editing_keeps_char_boundaries() {
        let mut buf = TextBuffer::new();
        buf.insert_str("hi\u{1F600}\u{4F60}");
        buf.move_home();
        buf.move_right();
        buf.move_right();
        buf.delete_char_after();
        assert_eq!(buf.text(), "hi\u{4F60}");
    }
}
