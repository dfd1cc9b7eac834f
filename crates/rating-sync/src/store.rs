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

use crate::config::Neo4jSettings;
use crate::error::StoreError;
use crate::movie::MovieId;
use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph, Row};
use tracing::{debug, warn};

pub const LIST_UNRATED: &str = "MATCH (m:Movie)
WHERE m.imdbRating IS NULL
RETURN m.imdbId AS imdb_id
ORDER BY m.imdbId DESC
LIMIT $limit";

pub const SET_RATING: &str = "MATCH (m:Movie {imdbId: $imdb_id})
SET m.imdbRating = $imdb_rating";

/// Column alias the read query returns ids under.
const ID_COLUMN: &str = "imdb_id";

#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Up to `limit` movies with no rating, highest id first.
    async fn list_unrated(&self, limit: usize) -> Result<Vec<MovieId>, StoreError>;

    /// Sets the rating on the movie with this id. Unknown ids are a no-op.
    async fn set_rating(&self, id: &MovieId, rating: &str) -> Result<(), StoreError>;
}

pub struct Neo4jStore {
    graph: Graph,
}

impl Neo4jStore {
    pub fn connect(settings: &Neo4jSettings) -> Result<Self, StoreError> {
        let config = ConfigBuilder::default()
            .uri(settings.uri.as_str())
            .user(settings.user.as_str())
            .password(settings.password.as_str())
            .db(settings.database.as_str())
            .build()
            .map_err(|e| StoreError::Configuration(e.to_string()))?;
        Ok(Self::new(Graph::connect(config)?))
    }

    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    /// Round-trips a trivial statement so bad credentials fail before any work starts.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.graph.run(query("RETURN 1")).await?;
        Ok(())
    }
}

/// Integer ids first, then strings; anything else is `None`.
fn movie_id(row: &Row) -> Option<MovieId> {
    if let Ok(id) = row.get::<i64>(ID_COLUMN) {
        return Some(MovieId::Int(id));
    }
    row.get::<String>(ID_COLUMN).ok().map(MovieId::Text)
}

#[async_trait]
impl MovieStore for Neo4jStore {
    async fn list_unrated(&self, limit: usize) -> Result<Vec<MovieId>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        debug!(limit, "Querying movies without a rating");

        let mut stream = self
            .graph
            .execute(query(LIST_UNRATED).param("limit", limit))
            .await?;

        let mut ids = Vec::new();
        while let Some(row) = stream.next().await? {
            match movie_id(&row) {
                Some(id) => ids.push(id),
                None => warn!("Skipping Movie node with a missing or unsupported imdbId"),
            }
        }
        Ok(ids)
    }

    async fn set_rating(&self, id: &MovieId, rating: &str) -> Result<(), StoreError> {
        let mut txn = self.graph.start_txn().await?;

        let result = txn
            .run(
                query(SET_RATING)
                    .param("imdb_id", id.clone())
                    .param("imdb_rating", rating),
            )
            .await;

        match result {
            Ok(_) => {
                txn.commit().await?;
                debug!(imdb_id = %id, rating, "Stored rating");
                Ok(())
            }
            Err(e) => {
                txn.rollback().await?;
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_query_only_selects_unrated_movies_in_descending_order() {
        assert!(LIST_UNRATED.contains("WHERE m.imdbRating IS NULL"));
        assert!(LIST_UNRATED.contains("ORDER BY m.imdbId DESC"));
        assert!(LIST_UNRATED.contains("LIMIT $limit"));
        assert!(LIST_UNRATED.contains(&format!("AS {ID_COLUMN}")));
    }

    #[test]
    fn write_query_matches_instead_of_merging() {
        assert!(SET_RATING.starts_with("MATCH (m:Movie {imdbId: $imdb_id})"));
        assert!(!SET_RATING.contains("MERGE"));
        assert!(!SET_RATING.contains("CREATE"));
        assert!(SET_RATING.contains("SET m.imdbRating = $imdb_rating"));
    }
}
