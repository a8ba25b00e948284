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

use crate::Cli;
use crate::app::debounce::DEFAULT_DEBOUNCE;
use crate::app::history::DEFAULT_HISTORY_CAPACITY;
use crate::error::{EditorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR_NAME: &str = "markedit";
const CONFIG_FILE: &str = "config.json";
const MAX_HISTORY_CAPACITY: u64 = 1000;
const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Tunables for the edit/history controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSettings {
    pub debounce: Duration,
    pub history_capacity: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self { debounce: DEFAULT_DEBOUNCE, history_capacity: DEFAULT_HISTORY_CAPACITY }
    }
}

/// On-disk shape of `config.json`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub debounce_ms: Option<u64>,
    pub history_capacity: Option<u64>,
}

impl EditorSettings {
    /// Resolve settings from defaults, the config file, then CLI flags.
    ///
    /// A missing file at the default location is fine; a missing `--config` path is not.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match cli.config.as_deref() {
            Some(path) => read_file_config(path)?.ok_or_else(|| EditorError::ConfigRead {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })?,
            None => match default_config_path() {
                Some(path) => read_file_config(&path)?.unwrap_or_default(),
                None => FileConfig::default(),
            },
        };
        Self::from_sources(&file, cli.debounce_ms, cli.history_capacity)
    }

    pub fn from_sources(
        file: &FileConfig,
        debounce_ms: Option<u64>,
        history_capacity: Option<u64>,
    ) -> Result<Self> {
        let defaults = Self::default();
        let debounce_ms = debounce_ms.or(file.debounce_ms);
        let capacity = history_capacity.or(file.history_capacity);

        let debounce = match debounce_ms {
            Some(ms) => Duration::from_millis(check_range("debounce_ms", ms, 0, MAX_DEBOUNCE_MS)?),
            None => defaults.debounce,
        };
        let history_capacity = match capacity {
            Some(n) => {
                let n = check_range("history_capacity", n, 1, MAX_HISTORY_CAPACITY)?;
                usize::try_from(n).unwrap_or(defaults.history_capacity)
            }
            None => defaults.history_capacity,
        };

        Ok(Self { debounce, history_capacity })
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE))
}

/// Read and parse a config file. `Ok(None)` when the file does not exist.
pub fn read_file_config(path: &Path) -> Result<Option<FileConfig>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no config at {}", path.display());
            return Ok(None);
        }
        Err(source) => return Err(EditorError::ConfigRead { path: path.to_path_buf(), source }),
    };
    serde_json::from_str::<FileConfig>(&content)
        .map(Some)
        .map_err(|source| EditorError::ConfigParse { path: path.to_path_buf(), source })
}

fn check_range(field: &'static str, value: u64, min: u64, max: u64) -> Result<u64> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(EditorError::OutOfRange { field, value, min, max })
    }
}
