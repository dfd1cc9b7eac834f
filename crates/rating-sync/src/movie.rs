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

use neo4rs::BoltType;
use std::fmt;

/// The `imdbId` property of a `Movie` node.
///
/// Imported datasets disagree on whether the id is stored as an integer or a
/// string, so both forms are kept and handed back to the store unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MovieId {
    Int(i64),
    Text(String),
}

impl MovieId {
    /// The form OMDb expects in its `i` parameter.
    pub fn external(&self) -> String {
        format!("tt{self}")
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for MovieId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for MovieId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<MovieId> for BoltType {
    fn from(id: MovieId) -> Self {
        match id {
            MovieId::Int(id) => id.into(),
            MovieId::Text(id) => id.into(),
        }
    }
}
