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

mod editor;
mod footer;
pub mod preview;
pub mod theme;

use crate::app::App;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

const FOOTER_HEIGHT: u16 = 1;

pub fn render(frame: &mut Frame, app: &mut App) {
    let [body, footer_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(FOOTER_HEIGHT)])
            .areas(frame.area());

    if app.show_preview {
        let [editor_area, preview_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(body);
        editor::render(frame, editor_area, app);
        preview::render(frame, preview_area, app);
    } else {
        editor::render(frame, body, app);
    }

    footer::render(frame, footer_area, app);
}
