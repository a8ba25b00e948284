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

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod ui;

use std::path::PathBuf;

#[derive(Debug, Default, clap::Parser)]
#[command(name = "markedit", version, about = "Terminal markdown editor")]
pub struct Cli {
    /// Markdown file to edit. Created on first save if it does not exist.
    pub file: Option<PathBuf>,

    /// Config file (defaults to `<config dir>/markedit/config.json`).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Quiet period before typing becomes an undo step.
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Maximum number of undo entries kept.
    #[arg(long, value_name = "N")]
    pub history_capacity: Option<u64>,

    /// Write tracing output to this file. Filter with `MARKEDIT_LOG`.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
