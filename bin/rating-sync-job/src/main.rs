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

use anyhow::{Context, Result};
use rating_sync::{BackfillConfig, BackfillJob, Neo4jStore, OmdbClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn,hyper_util=warn,neo4rs=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = BackfillConfig::from_env().context("Failed to load configuration")?;
    info!(
        database = %config.neo4j.database,
        journal = %config.journal_path.display(),
        api_keys = config.omdb.api_keys.len(),
        batch_size = config.batch_size,
        "Starting IMDb rating backfill"
    );

    let ratings = OmdbClient::new(&config.omdb).context("Failed to build OMDb client")?;

    // The graph handle lives for this block only; it is dropped on every exit path.
    let summary = {
        let store = Neo4jStore::connect(&config.neo4j).context("Failed to connect to Neo4j")?;
        store.ping().await.context("Neo4j is not reachable")?;
        BackfillJob::from_config(&store, &ratings, &config)
            .run()
            .await
            .context("Backfill aborted")?
    };

    info!(
        batches = summary.batches,
        processed = summary.processed,
        rated = summary.rated,
        missed = summary.missed,
        skipped = summary.skipped,
        stop_reason = ?summary.stop_reason,
        "Backfill finished"
    );
    Ok(())
}
