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

//! These need a reachable Neo4j named by NEO4J_URI / NEO4J_USER / NEO4J_PASSWORD.
//! Run with `cargo test -p rating-sync --test neo4j_tests -- --ignored`.

use neo4rs::{query, Graph};
use rating_sync::config::{Neo4jSettings, DEFAULT_DATABASE};
use rating_sync::{MovieId, MovieStore, Neo4jStore};

const FIXTURE_IDS: [i64; 3] = [-1001, -1002, -1003];

fn settings() -> Neo4jSettings {
    let _ = dotenvy::dotenv();
    let var = |key: &str| std::env::var(key).unwrap_or_else(|_| panic!("{key} must be set"));
    Neo4jSettings {
        uri: var("NEO4J_URI"),
        user: var("NEO4J_USER"),
        password: var("NEO4J_PASSWORD"),
        database: std::env::var("NEO4J_DATABASE").unwrap_or_else(|_| DEFAULT_DATABASE.to_string()),
    }
}

async fn connect() -> (Graph, Neo4jStore) {
    let settings = settings();
    let config = neo4rs::ConfigBuilder::default()
        .uri(settings.uri.as_str())
        .user(settings.user.as_str())
        .password(settings.password.as_str())
        .db(settings.database.as_str())
        .build()
        .unwrap();
    let graph = Graph::connect(config).unwrap();
    let store = Neo4jStore::new(graph.clone());
    store.ping().await.unwrap();
    (graph, store)
}

async fn reset_fixtures(graph: &Graph) {
    graph
        .run(query("MATCH (m:Movie) WHERE m.imdbId IN $ids DETACH DELETE m").param("ids", FIXTURE_IDS.to_vec()))
        .await
        .unwrap();
    graph
        .run(query("UNWIND $ids AS id CREATE (:Movie {imdbId: id})").param("ids", FIXTURE_IDS.to_vec()))
        .await
        .unwrap();
}

async fn rating_of(graph: &Graph, id: i64) -> Option<String> {
    let mut stream = graph
        .execute(query("MATCH (m:Movie {imdbId: $id}) RETURN m.imdbRating AS rating").param("id", id))
        .await
        .unwrap();
    let row = stream.next().await.unwrap()?;
    row.get::<Option<String>>("rating").unwrap()
}

async fn count_movies(graph: &Graph, id: i64) -> i64 {
    let mut stream = graph
        .execute(query("MATCH (m:Movie {imdbId: $id}) RETURN count(m) AS n").param("id", id))
        .await
        .unwrap();
    stream.next().await.unwrap().unwrap().get::<i64>("n").unwrap()
}

#[tokio::test]
#[ignore]
async fn test_listed_movies_have_no_rating() {
    let (graph, store) = connect().await;
    reset_fixtures(&graph).await;

    let ids = store.list_unrated(usize::MAX).await.unwrap();

    for fixture in FIXTURE_IDS {
        assert!(ids.contains(&MovieId::Int(fixture)));
    }
    for id in ids.iter().filter_map(|id| match id {
        MovieId::Int(i) => Some(*i),
        MovieId::Text(_) => None,
    }) {
        assert_eq!(rating_of(&graph, id).await, None);
    }
}

#[tokio::test]
#[ignore]
async fn test_set_rating_removes_movie_from_unrated_and_is_idempotent() {
    let (graph, store) = connect().await;
    reset_fixtures(&graph).await;
    let id = MovieId::Int(FIXTURE_IDS[0]);

    store.set_rating(&id, "7.3").await.unwrap();
    store.set_rating(&id, "7.3").await.unwrap();

    assert_eq!(rating_of(&graph, FIXTURE_IDS[0]).await.as_deref(), Some("7.3"));
    assert_eq!(count_movies(&graph, FIXTURE_IDS[0]).await, 1);
    let remaining = store.list_unrated(usize::MAX).await.unwrap();
    assert!(!remaining.contains(&id));
}

#[tokio::test]
#[ignore]
async fn test_set_rating_on_unknown_id_is_a_no_op() {
    let (graph, store) = connect().await;
    let ghost = -999_999;

    store.set_rating(&MovieId::Int(ghost), "9.9").await.unwrap();

    assert_eq!(count_movies(&graph, ghost).await, 0);
}
