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

use crate::app::App;
use crate::app::buffer::{TextBuffer, char_to_byte_index};
use crate::ui::theme;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthChar;

/// Horizontal padding between the gutter and the text.
const GUTTER_PAD: u16 = 1;

/// One screen row: a char range of a buffer line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VisualRow {
    line: usize,
    start: usize,
    end: usize,
}

pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
    let buffer = app.editor.buffer();
    let gutter = gutter_width(buffer.lines.len());
    let [gutter_area, text_area] =
        Layout::horizontal([Constraint::Length(gutter), Constraint::Min(1)]).areas(area);

    let width = usize::from(text_area.width);
    let height = usize::from(text_area.height);
    if width == 0 || height == 0 {
        return;
    }

    if buffer.is_empty() {
        let placeholder = Line::from(Span::styled(
            "Start writing markdown...",
            Style::default().fg(theme::DIM),
        ));
        frame.render_widget(Paragraph::new(placeholder), text_area);
        frame.set_cursor_position((text_area.x, text_area.y));
        app.editor_scroll = 0;
        return;
    }

    let rows = visual_rows(buffer, width);
    let (cursor_row, cursor_x) = cursor_visual_position(buffer, &rows, width);
    let scroll = scroll_to_cursor(app.editor_scroll, cursor_row, height);

    let selection = ordered_selection(buffer);
    let styles = line_styles(&buffer.lines);
    let mut text_lines = Vec::with_capacity(height);
    let mut gutter_lines = Vec::with_capacity(height);
    for row in rows.iter().skip(scroll).take(height) {
        let line = &buffer.lines[row.line];
        text_lines.push(row_line(line, row, styles[row.line], selection));
        gutter_lines.push(gutter_line(row, buffer.cursor_row, gutter));
    }

    frame.render_widget(Paragraph::new(gutter_lines), gutter_area);
    frame.render_widget(Paragraph::new(text_lines), text_area);

    let visible_row = cursor_row.saturating_sub(scroll);
    if visible_row < height
        && let (Ok(dy), Ok(dx)) = (u16::try_from(visible_row), u16::try_from(cursor_x))
    {
        frame.set_cursor_position((text_area.x + dx, text_area.y + dy));
    }
    app.editor_scroll = scroll;
}

fn gutter_width(line_count: usize) -> u16 {
    let digits = line_count.max(1).to_string().len();
    u16::try_from(digits).unwrap_or(u16::MAX).saturating_add(GUTTER_PAD)
}

fn gutter_line(row: &VisualRow, cursor_line: usize, gutter: u16) -> Line<'static> {
    if row.start > 0 {
        return Line::default();
    }
    let digits = usize::from(gutter.saturating_sub(GUTTER_PAD));
    let color = if row.line == cursor_line { theme::GUTTER_CURRENT } else { theme::DIM };
    Line::from(Span::styled(format!("{:>digits$}", row.line + 1), Style::default().fg(color)))
}

/// Split every buffer line into rows no wider than `width` display columns.
fn visual_rows(buffer: &TextBuffer, width: usize) -> Vec<VisualRow> {
    let mut rows = Vec::with_capacity(buffer.lines.len());
    for (line_idx, line) in buffer.lines.iter().enumerate() {
        let mut start = 0;
        let mut used = 0;
        let mut count = 0;
        for (i, c) in line.chars().enumerate() {
            let w = c.width().unwrap_or(0);
            if used + w > width && i > start {
                rows.push(VisualRow { line: line_idx, start, end: i });
                start = i;
                used = 0;
            }
            used += w;
            count = i + 1;
        }
        rows.push(VisualRow { line: line_idx, start, end: count });
    }
    rows
}

/// Visual row index and display column of the terminal cursor.
///
/// A cursor sitting on a wrap boundary belongs to the following row. On a full last row
/// it spills onto the next (empty) screen row.
fn cursor_visual_position(buffer: &TextBuffer, rows: &[VisualRow], width: usize) -> (usize, usize) {
    let col = buffer.cursor_col;
    let found = rows.iter().enumerate().find(|&(idx, row)| {
        let is_last = rows.get(idx + 1).is_none_or(|next| next.line != row.line);
        row.line == buffer.cursor_row && col >= row.start && (col < row.end || is_last)
    });
    let Some((idx, row)) = found else {
        return (0, 0);
    };
    let x: usize = buffer.lines[row.line]
        .chars()
        .skip(row.start)
        .take(col - row.start)
        .map(|c| c.width().unwrap_or(0))
        .sum();
    if x >= width { (idx + 1, 0) } else { (idx, x) }
}

/// Keep the cursor row inside the viewport, moving the scroll offset as little as possible.
fn scroll_to_cursor(scroll: usize, cursor_row: usize, height: usize) -> usize {
    if cursor_row < scroll {
        cursor_row
    } else if cursor_row >= scroll + height {
        cursor_row + 1 - height
    } else {
        scroll
    }
}

type Selection = Option<((usize, usize), (usize, usize))>;

fn ordered_selection(buffer: &TextBuffer) -> Selection {
    let anchor = buffer.anchor?;
    buffer.selection_range()?;
    let cursor = (buffer.cursor_row, buffer.cursor_col);
    Some(if anchor <= cursor { (anchor, cursor) } else { (cursor, anchor) })
}

/// Base style per line from a light markdown scan. Fenced code is tracked across lines.
fn line_styles(lines: &[String]) -> Vec<Style> {
    let mut in_fence = false;
    lines
        .iter()
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") {
                in_fence = !in_fence;
                return Style::default().fg(theme::CODE);
            }
            if in_fence {
                Style::default().fg(theme::CODE)
            } else if trimmed.starts_with('#') {
                Style::default().fg(theme::HEADING).add_modifier(Modifier::BOLD)
            } else if trimmed.starts_with('>') {
                Style::default().fg(theme::QUOTE).add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
            }
        })
        .collect()
}

fn row_line(line: &str, row: &VisualRow, base: Style, selection: Selection) -> Line<'static> {
    let slice = |from: usize, to: usize| -> String {
        line[char_to_byte_index(line, from)..char_to_byte_index(line, to)].to_owned()
    };

    let highlighted = selection.and_then(|((r0, c0), (r1, c1))| {
        if row.line < r0 || row.line > r1 {
            return None;
        }
        let from = if row.line == r0 { c0 } else { 0 };
        let to = if row.line == r1 { c1 } else { usize::MAX };
        let from = from.max(row.start);
        let to = to.min(row.end);
        (from < to).then_some((from, to))
    });

    let Some((from, to)) = highlighted else {
        return Line::from(Span::styled(slice(row.start, row.end), base));
    };
    let selected = base.bg(theme::SELECTION_BG);
    Line::from(vec![
        Span::styled(slice(row.start, from), base),
        Span::styled(slice(from, to), selected),
        Span::styled(slice(to, row.end), base),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn visual_rows_wrap_long_lines() {
        let buffer = TextBuffer::from_text("abcdefgh\nxy");
        let rows = visual_rows(&buffer, 3);
        assert_eq!(
            rows,
            vec![
                VisualRow { line: 0, start: 0, end: 3 },
                VisualRow { line: 0, start: 3, end: 6 },
                VisualRow { line: 0, start: 6, end: 8 },
                VisualRow { line: 1, start: 0, end: 2 },
            ]
        );
    }

    #[test]
    fn visual_rows_respect_wide_chars() {
        let buffer = TextBuffer::from_text("\u{4F60}\u{597D}\u{5417}");
        let rows = visual_rows(&buffer, 4);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].start, rows[0].end), (0, 2));
    }

    #[test]
    fn empty_line_still_gets_a_row() {
        let buffer = TextBuffer::from_text("a\n\nb");
        assert_eq!(visual_rows(&buffer, 10).len(), 3);
    }

    #[test]
    fn cursor_on_wrapped_row() {
        let mut buffer = TextBuffer::from_text("abcdefgh");
        buffer.set_cursor_offset(4);
        let rows = visual_rows(&buffer, 3);
        assert_eq!(cursor_visual_position(&buffer, &rows, 3), (1, 1));
    }

    #[test]
    fn cursor_at_end_of_full_row_moves_to_next_row() {
        let mut buffer = TextBuffer::from_text("abc");
        buffer.move_end();
        let rows = visual_rows(&buffer, 3);
        assert_eq!(cursor_visual_position(&buffer, &rows, 3), (1, 0));
    }

    #[test]
    fn cursor_at_segment_boundary_prefers_next_segment() {
        let mut buffer = TextBuffer::from_text("abcdef");
        buffer.set_cursor_offset(3);
        let rows = visual_rows(&buffer, 3);
        assert_eq!(cursor_visual_position(&buffer, &rows, 3), (1, 0));
    }

    #[test]
    fn scroll_follows_cursor() {
        assert_eq!(scroll_to_cursor(0, 3, 10), 0);
        assert_eq!(scroll_to_cursor(0, 12, 10), 3);
        assert_eq!(scroll_to_cursor(8, 2, 10), 2);
    }

    #[test]
    fn gutter_width_grows_with_line_count() {
        assert_eq!(gutter_width(9), 2);
        assert_eq!(gutter_width(120), 4);
    }

    #[test]
    fn row_line_highlights_selection_slice() {
        let mut buffer = TextBuffer::from_text("hello world");
        buffer.set_cursor_offset(6);
        buffer.start_selection();
        buffer.move_end();
        let rows = visual_rows(&buffer, 80);
        let selection = ordered_selection(&buffer);
        let line = row_line(&buffer.lines[0], &rows[0], Style::default(), selection);
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "world");
        assert_eq!(line.spans[1].style.bg, Some(theme::SELECTION_BG));
        assert_eq!(line_text(&line), "hello world");
    }

    #[test]
    fn line_styles_track_fences() {
        let lines: Vec<String> =
            ["# Title", "```", "# not a heading", "```", "> quote"].map(String::from).to_vec();
        let styles = line_styles(&lines);
        assert!(styles[0].add_modifier.contains(Modifier::BOLD));
        assert_eq!(styles[2].fg, Some(theme::CODE));
        assert!(styles[4].add_modifier.contains(Modifier::ITALIC));
    }
}
