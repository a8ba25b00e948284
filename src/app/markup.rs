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
use super::controller::EditController;

/// Toolbar formatting actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupAction {
    Bold,
    Italic,
    Strikethrough,
    Heading,
    Quote,
    InlineCode,
    CodeBlock,
    Link,
    Image,
    BulletList,
    NumberedList,
    HorizontalRule,
}

impl MarkupAction {
    pub const ALL: [Self; 12] = [
        Self::Bold,
        Self::Italic,
        Self::Strikethrough,
        Self::Heading,
        Self::Quote,
        Self::InlineCode,
        Self::CodeBlock,
        Self::Link,
        Self::Image,
        Self::BulletList,
        Self::NumberedList,
        Self::HorizontalRule,
    ];

    /// `(prefix, suffix, placeholder)` inserted around the selection.
    pub fn parts(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Self::Bold => ("**", "**", "bold text"),
            Self::Italic => ("_", "_", "italic text"),
            Self::Strikethrough => ("~~", "~~", "struck text"),
            Self::Heading => ("## ", "", "Heading"),
            Self::Quote => ("> ", "", "Quote"),
            Self::InlineCode => ("`", "`", "code"),
            Self::CodeBlock => ("```\n", "\n```", "code"),
            Self::Link => ("[", "](https://)", "link text"),
            Self::Image => ("![", "](https://)", "alt text"),
            Self::BulletList => ("- ", "", "List item"),
            Self::NumberedList => ("1. ", "", "List item"),
            Self::HorizontalRule => ("---\n", "", ""),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Strikethrough => "Strikethrough",
            Self::Heading => "Heading",
            Self::Quote => "Quote",
            Self::InlineCode => "Code",
            Self::CodeBlock => "Code block",
            Self::Link => "Link",
            Self::Image => "Image",
            Self::BulletList => "Bullet list",
            Self::NumberedList => "Numbered list",
            Self::HorizontalRule => "Rule",
        }
    }

    /// Block-level markup must begin at column 0.
    pub fn is_line_level(self) -> bool {
        matches!(
            self,
            Self::Heading
                | Self::Quote
                | Self::CodeBlock
                | Self::BulletList
                | Self::NumberedList
                | Self::HorizontalRule
        )
    }

    /// Insert this markup through the controller so it lands as a single undo step.
    ///
    /// Line-level markup is moved onto its own lines when text surrounds it.
    pub fn apply(self, editor: &mut EditController) -> bool {
        let (prefix, suffix, placeholder) = self.parts();
        let buffer = editor.buffer();
        let line_level = self.is_line_level();
        let prefix = if line_level && !starts_at_line_start(buffer) {
            format!("\n{prefix}")
        } else {
            prefix.to_owned()
        };
        // A rule already ends in a newline.
        let suffix = if line_level && self != Self::HorizontalRule && !ends_at_line_end(buffer) {
            format!("{suffix}\n")
        } else {
            suffix.to_owned()
        };
        editor.insert_markup(&prefix, &suffix, placeholder)
    }
}

fn ends_at_line_end(buffer: &TextBuffer) -> bool {
    let cursor = (buffer.cursor_row, buffer.cursor_col);
    let (row, col) = match (buffer.anchor, buffer.selection_range()) {
        (Some(anchor), Some(_)) if anchor > cursor => anchor,
        _ => cursor,
    };
    buffer.lines.get(row).is_none_or(|line| col >= line.chars().count())
}

fn starts_at_line_start(buffer: &TextBuffer) -> bool {
    let col = match (buffer.anchor, buffer.selection_range()) {
        (Some((row, col)), Some(_)) if (row, col) < (buffer.cursor_row, buffer.cursor_col) => col,
        _ => buffer.cursor_col,
    };
    col == 0
}
