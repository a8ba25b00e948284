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

use super::{App, Command, handle_key, handle_paste};
use crate::Cli;
use crate::config::EditorSettings;
use crate::ui;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, Event, EventStream};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::time::Instant;

/// Open the document, take over the terminal, and run until the user quits.
pub async fn run(cli: &Cli, settings: EditorSettings) -> anyhow::Result<()> {
    let mut app = match cli.file.clone() {
        Some(path) => App::open(path, &settings).await?,
        None => App::new("", None, &settings),
    };

    let mut terminal = ratatui::init();
    crossterm::execute!(std::io::stdout(), EnableBracketedPaste)?;
    let result = event_loop(&mut terminal, &mut app).await;
    if let Err(err) = crossterm::execute!(std::io::stdout(), DisableBracketedPaste) {
        tracing::warn!("failed to disable bracketed paste: {err}");
    }
    ratatui::restore();
    result
}

async fn event_loop(terminal: &mut DefaultTerminal, app: &mut App) -> anyhow::Result<()> {
    let mut events = EventStream::new();

    while !app.should_quit {
        app.drain_events();
        terminal.draw(|frame| ui::render(frame, app))?;

        let deadline = app.editor.next_deadline();
        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(event)) => handle_terminal_event(app, event).await,
                Some(Err(err)) => return Err(err.into()),
                None => break,
            },
            () = sleep_until(deadline) => {
                app.editor.poll(Instant::now());
            }
        }
    }

    // Anything typed in the last quiet period still becomes an entry.
    app.editor.flush();
    Ok(())
}

async fn handle_terminal_event(app: &mut App, event: Event) {
    let now = Instant::now();
    match event {
        Event::Key(key) => {
            let result = match handle_key(app, key, now) {
                Some(Command::Save) => app.save().await,
                Some(Command::Reload) => app.reload().await,
                None => Ok(()),
            };
            if let Err(err) = result {
                tracing::warn!("{err}");
                app.status = Some(err.to_string());
            }
        }
        Event::Paste(text) => handle_paste(app, &text, now),
        _ => {}
    }
    // A due commit may have been overtaken by a burst of events.
    app.editor.poll(now);
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}
