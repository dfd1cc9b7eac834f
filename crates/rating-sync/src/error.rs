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

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Required setting '{0}' is not set")]
    Missing(&'static str),
    #[error("Invalid value '{value}' for '{key}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("OMDB_API_KEYS contains no usable keys")]
    NoApiKeys,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Neo4j configuration rejected: {0}")]
    Configuration(String),
    #[error("Neo4j query failed")]
    Query(#[from] neo4rs::Error),
}

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Failed to access journal {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Journal {path} is not a valid ratings map")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialise ratings map")]
    Serialize(#[from] serde_json::Error),
}

/// Anything that aborts a run. Provider failures never show up here.
#[derive(Error, Debug)]
pub enum BackfillError {
    #[error("Configuration error")]
    Config(#[from] ConfigError),
    #[error("Graph store error")]
    Store(#[from] StoreError),
    #[error("Journal error")]
    Journal(#[from] JournalError),
    #[error("Failed to build HTTP client")]
    HttpClient(#[from] reqwest::Error),
}
