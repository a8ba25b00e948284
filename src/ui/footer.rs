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
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme;

const FOOTER_PAD: u16 = 1;
const FOOTER_COLUMN_GAP: u16 = 1;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let padded = Rect {
        x: area.x.saturating_add(FOOTER_PAD),
        y: area.y,
        width: area.width.saturating_sub(FOOTER_PAD * 2),
        height: area.height,
    };

    let right_text = footer_right_text(app);
    let right_width =
        u16::try_from(UnicodeWidthStr::width(right_text.as_str())).unwrap_or(u16::MAX);
    let (left_area, right_area) = split_footer_columns(padded, right_width);

    frame.render_widget(Paragraph::new(footer_left_line(app)), left_area);
    render_footer_right_info(frame, right_area, &right_text, theme::DIM);
}

fn footer_left_line(app: &App) -> Line<'static> {
    let mut spans = vec![Span::styled(app.file_name(), Style::default().fg(Color::White))];
    if app.dirty {
        spans.push(Span::styled(" [+]", Style::default().fg(theme::STATUS_DIRTY)));
    }
    if app.editor.is_composing() {
        spans.push(Span::styled(" composing", Style::default().fg(theme::STATUS_COMPOSING)));
    }
    match &app.status {
        Some(status) => {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(status.clone(), Style::default().fg(theme::STATUS_MESSAGE)));
        }
        None => {
            spans.push(Span::styled(
                "  ^S save  ^R reload  ^Z undo  ^Y redo  ^P preview  ^Q quit",
                Style::default().fg(theme::DIM),
            ));
        }
    }
    Line::from(spans)
}

/// Right-hand telemetry: history position, undo/redo availability, counts, cursor.
fn footer_right_text(app: &App) -> String {
    let (pos, len) = app.editor.history_position();
    let pending = if app.editor.has_pending_commit() { "*" } else { "" };
    let buffer = app.editor.buffer();
    format!(
        "undo {} redo {}  hist {pos}/{len}{pending}  {} words {} chars  Ln {}, Col {}",
        availability_icon(app.editor.can_undo()),
        availability_icon(app.editor.can_redo()),
        app.stats.words,
        app.stats.chars,
        buffer.cursor_row + 1,
        buffer.cursor_col + 1,
    )
}

fn availability_icon(available: bool) -> &'static str {
    if available { theme::ICON_AVAILABLE } else { theme::ICON_UNAVAILABLE }
}

/// Two-column split: left (file/status) | right (telemetry).
///
/// `Length` gives the telemetry its exact footprint; `Fill(1)` hands everything else
/// to the left column.
fn split_footer_columns(area: Rect, right_text_width: u16) -> (Rect, Rect) {
    if area.width == 0 {
        return (area, Rect { width: 0, ..area });
    }

    let [left, right] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(right_text_width)])
            .spacing(FOOTER_COLUMN_GAP)
            .areas(area);
    (left, right)
}

fn fit_footer_right_text(text: &str, max_width: usize) -> Option<String> {
    if max_width == 0 || text.trim().is_empty() {
        return None;
    }

    if UnicodeWidthStr::width(text) <= max_width {
        return Some(text.to_owned());
    }

    if max_width <= 3 {
        return Some(".".repeat(max_width));
    }

    let mut fitted = String::new();
    let mut width: usize = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width.saturating_add(ch_width).saturating_add(3) > max_width {
            break;
        }
        fitted.push(ch);
        width = width.saturating_add(ch_width);
    }

    if fitted.is_empty() {
        return Some("...".to_owned());
    }
    fitted.push_str("...");
    Some(fitted)
}

fn render_footer_right_info(frame: &mut Frame, area: Rect, right_text: &str, right_color: Color) {
    if area.width == 0 {
        return;
    }
    let Some(fitted) = fit_footer_right_text(right_text, usize::from(area.width)) else {
        return;
    };

    let line = Line::from(Span::styled(fitted, Style::default().fg(right_color)));
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Right), area);
}
