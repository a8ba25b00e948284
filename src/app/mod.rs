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

pub mod buffer;
pub mod controller;
pub mod debounce;
pub mod history;
mod keys;
pub mod markup;
pub mod terminal;

pub use buffer::TextBuffer;
pub use controller::EditController;
pub use history::{History, Snapshot};
pub use keys::{Command, handle_key, handle_paste};
pub use markup::MarkupAction;

use crate::config::EditorSettings;
use crate::error::{EditorError, Result};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Events produced by the editor for the host loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ContentChanged(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocStats {
    pub words: usize,
    pub chars: usize,
    pub lines: usize,
}

impl DocStats {
    pub fn of(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            chars: text.chars().count(),
            lines: text.split('\n').count(),
        }
    }
}

pub struct App {
    pub editor: EditController,
    pub path: Option<PathBuf>,
    /// Text as last loaded or saved; `dirty` compares against it.
    pub saved_text: String,
    pub dirty: bool,
    pub stats: DocStats,
    pub show_preview: bool,
    /// Transient message shown in the footer until the next key press.
    pub status: Option<String>,
    pub should_quit: bool,
    pub(crate) quit_armed: bool,
    /// First visual row shown in the editor pane.
    pub editor_scroll: usize,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(content: &str, path: Option<PathBuf>, settings: &EditorSettings) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let tx = event_tx.clone();
        let editor = EditController::new(content, settings).with_listener(move |text| {
            let _ = tx.send(AppEvent::ContentChanged(text.to_owned()));
        });
        Self {
            editor,
            path,
            saved_text: content.to_owned(),
            dirty: false,
            stats: DocStats::of(content),
            show_preview: false,
            status: None,
            should_quit: false,
            quit_armed: false,
            editor_scroll: 0,
            event_tx,
            event_rx,
        }
    }

    /// Open `path`, starting empty when it does not exist yet.
    pub async fn open(path: PathBuf, settings: &EditorSettings) -> Result<Self> {
        let content = read_document(&path).await?;
        tracing::info!(chars = content.chars().count(), "opened {}", path.display());
        Ok(Self::new(&content, Some(path), settings))
    }

    /// Replace the buffer with the file's current content. Undo history starts over.
    pub async fn reload(&mut self) -> Result<()> {
        let Some(path) = self.path.clone() else {
            self.status = Some("No file to reload".to_owned());
            return Ok(());
        };
        let content = read_document(&path).await?;
        self.editor.load(&content);
        self.stats = DocStats::of(&content);
        self.saved_text = content;
        self.dirty = false;
        self.editor_scroll = 0;
        // Events queued before the reload describe the discarded buffer.
        while self.event_rx.try_recv().is_ok() {}
        tracing::info!("reloaded {}", path.display());
        self.status = Some(format!("Reloaded {}", display_name(&path)));
        Ok(())
    }

    pub fn test_default() -> Self {
        Self::new("", None, &EditorSettings::default())
    }

    /// Write the buffer to disk. Pending typing is committed first so the saved
    /// state is always an undo step of its own.
    pub async fn save(&mut self) -> Result<()> {
        let Some(path) = self.path.clone() else {
            self.status = Some("No file name; pass a path on the command line".to_owned());
            return Ok(());
        };
        self.editor.flush();
        let text = self.editor.text();
        write_document(&path, &text).await?;
        tracing::info!(chars = text.chars().count(), "saved {}", path.display());
        self.saved_text = text;
        self.dirty = false;
        self.status = Some(format!("Saved {}", display_name(&path)));
        Ok(())
    }

    pub fn file_name(&self) -> String {
        self.path.as_deref().map_or_else(|| "[scratch]".to_owned(), display_name)
    }

    /// Apply every queued editor event.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            handle_app_event(self, event);
        }
    }
}

pub fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::ContentChanged(text) => {
            app.dirty = text != app.saved_text;
            app.stats = DocStats::of(&text);
        }
    }
}

async fn read_document(path: &Path) -> Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("{} does not exist yet, starting empty", path.display());
            Ok(String::new())
        }
        Err(source) => Err(EditorError::Load { path: path.to_path_buf(), source }),
    }
}

async fn write_document(path: &Path, text: &str) -> Result<()> {
    let save_err = |source| EditorError::Save { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(save_err)?;
    }
    tokio::fs::write(path, text).await.map_err(save_err)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
