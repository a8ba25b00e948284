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

use ratatui::style::Color;

// Accent
pub const RUST_ORANGE: Color = Color::Rgb(244, 118, 0);

// UI chrome
pub const DIM: Color = Color::DarkGray;
pub const SEPARATOR_CHAR: &str = "\u{2500}";
pub const QUOTE_BAR: &str = "\u{2502} ";
pub const BULLET: &str = "\u{2022} ";

// Editor
pub const SELECTION_BG: Color = Color::Rgb(60, 66, 82);
pub const GUTTER_CURRENT: Color = RUST_ORANGE;

// Markdown
pub const HEADING: Color = RUST_ORANGE;
pub const QUOTE: Color = Color::Gray;
pub const CODE: Color = Color::LightGreen;
pub const LINK: Color = Color::LightBlue;

// History status icons
pub const ICON_AVAILABLE: &str = "\u{2713}";
pub const ICON_UNAVAILABLE: &str = "\u{2717}";

// Status colors
pub const STATUS_DIRTY: Color = Color::Yellow;
pub const STATUS_COMPOSING: Color = Color::LightMagenta;
pub const STATUS_MESSAGE: Color = Color::White;
