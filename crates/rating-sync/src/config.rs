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

use crate::error::ConfigError;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DATABASE: &str = "courseProject2024.db";
pub const DEFAULT_OMDB_ENDPOINT: &str = "http://www.omdbapi.com/";
pub const DEFAULT_JOURNAL_PATH: &str = "imdb_ratings.json";
pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Neo4jSettings {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct OmdbSettings {
    pub endpoint: String,
    /// Rotated one per batch to spread the per-key daily limit.
    pub api_keys: Vec<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct BackfillConfig {
    pub neo4j: Neo4jSettings,
    pub omdb: OmdbSettings,
    pub journal_path: PathBuf,
    pub batch_size: usize,
    pub skip_journaled: bool,
}

impl BackfillConfig {
    /// Reads settings from the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let neo4j = Neo4jSettings {
            uri: required("NEO4J_URI")?,
            user: required("NEO4J_USER")?,
            password: required("NEO4J_PASSWORD")?,
            database: lookup("NEO4J_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        };

        let api_keys = parse_api_keys(&required("OMDB_API_KEYS")?)?;
        let timeout_secs = parsed(&lookup, "OMDB_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let omdb = OmdbSettings {
            endpoint: lookup("OMDB_ENDPOINT").unwrap_or_else(|| DEFAULT_OMDB_ENDPOINT.to_string()),
            api_keys,
            timeout: Duration::from_secs(timeout_secs),
        };

        let batch_size = parsed(&lookup, "BACKFILL_BATCH_SIZE", DEFAULT_BATCH_SIZE)?;
        if batch_size == 0 {
            return Err(ConfigError::Invalid {
                key: "BACKFILL_BATCH_SIZE",
                value: "0".to_string(),
                reason: "batch size must be positive".to_string(),
            });
        }

        Ok(Self {
            neo4j,
            omdb,
            journal_path: lookup("IMDB_RATINGS_JSON")
                .map_or_else(|| PathBuf::from(DEFAULT_JOURNAL_PATH), PathBuf::from),
            batch_size,
            skip_journaled: parsed(&lookup, "BACKFILL_SKIP_JOURNALED", false)?,
        })
    }
}

/// Splits the comma-separated key list, dropping blanks.
fn parse_api_keys(raw: &str) -> Result<Vec<String>, ConfigError> {
    let keys: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    if keys.is_empty() {
        return Err(ConfigError::NoApiKeys);
    }
    Ok(keys)
}

/// Parses `key` if set, otherwise returns `default`.
fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}
