// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

//! Local JSON mirror of every rating lookup, keyed by movie id.
//!
//! The file is one pretty-printed object rewritten in full on every update.
//! There is no lock and no atomic rename, so only one job may write a given
//! journal at a time.

use crate::error::JournalError;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Movie id to rating; `None` records a lookup that found nothing.
pub type RatingsMap = BTreeMap<String, Option<String>>;

/// Matches the indentation of journals written by earlier tooling.
const INDENT: &[u8] = b"    ";

/// Loads `path`, treating a missing file as empty.
pub fn load(path: &Path) -> Result<RatingsMap, JournalError> {
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(RatingsMap::new()),
        Err(source) => {
            return Err(JournalError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_slice(&content).map_err(|source| JournalError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Replaces the contents of `path` with exactly `ratings`.
pub fn save(path: &Path, ratings: &RatingsMap) -> Result<(), JournalError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    ratings.serialize(&mut ser)?;
    fs::write(path, buf).map_err(|source| JournalError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Overlays `new_entries` on the journal at `path` and rewrites it.
/// Entries already on disk are overwritten by new ones with the same key.
pub fn merge_and_persist(path: &Path, new_entries: RatingsMap) -> Result<RatingsMap, JournalError> {
    let mut ratings = load(path)?;
    ratings.extend(new_entries);
    save(path, &ratings)?;
    Ok(ratings)
}

#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<RatingsMap, JournalError> {
        load(&self.path)
    }

    pub fn save(&self, ratings: &RatingsMap) -> Result<(), JournalError> {
        save(&self.path, ratings)
    }

    pub fn merge_and_persist(&self, new_entries: RatingsMap) -> Result<RatingsMap, JournalError> {
        merge_and_persist(&self.path, new_entries)
    }

    pub fn record(&self, id: impl ToString, rating: Option<String>) -> Result<(), JournalError> {
        self.merge_and_persist(RatingsMap::from([(id.to_string(), rating)]))
            .map(drop)
    }
}
