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

use crate::config::BackfillConfig;
use crate::error::BackfillError;
use crate::journal::Journal;
use crate::omdb::{RatingLookup, RatingSource};
use crate::store::MovieStore;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A batch came back empty. Remaining keys are not tried.
    NoCandidates,
    CredentialsExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub batches: usize,
    pub processed: usize,
    pub rated: usize,
    pub missed: usize,
    pub skipped: usize,
    pub stop_reason: StopReason,
}

impl RunSummary {
    /// Zeroed counters; the stop reason is overwritten on an early exit.
    const fn new() -> Self {
        Self {
            batches: 0,
            processed: 0,
            rated: 0,
            missed: 0,
            skipped: 0,
            stop_reason: StopReason::CredentialsExhausted,
        }
    }
}

pub struct BackfillJob<'a, S: ?Sized, R: ?Sized> {
    store: &'a S,
    source: &'a R,
    journal: Journal,
    api_keys: Vec<String>,
    batch_size: usize,
    skip_journaled: bool,
}

impl<'a, S, R> BackfillJob<'a, S, R>
where
    S: MovieStore + ?Sized,
    R: RatingSource + ?Sized,
{
    pub fn new(store: &'a S, source: &'a R, journal: Journal, api_keys: Vec<String>) -> Self {
        Self {
            store,
            source,
            journal,
            api_keys,
            batch_size: crate::config::DEFAULT_BATCH_SIZE,
            skip_journaled: false,
        }
    }

    pub fn from_config(store: &'a S, source: &'a R, config: &BackfillConfig) -> Self {
        Self::new(
            store,
            source,
            Journal::new(&config.journal_path),
            config.omdb.api_keys.clone(),
        )
        .batch_size(config.batch_size)
        .skip_journaled(config.skip_journaled)
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn skip_journaled(mut self, skip: bool) -> Self {
        self.skip_journaled = skip;
        self
    }

    /// Runs one batch per API key until a batch comes back empty or the keys run out.
    ///
    /// Store and journal failures abort the run; provider failures are journaled
    /// as `null` and the run moves on.
    pub async fn run(&self) -> Result<RunSummary, BackfillError> {
        let mut summary = RunSummary::new();

        for api_key in &self.api_keys {
            let movies = self.store.list_unrated(self.batch_size).await?;
            if movies.is_empty() {
                info!("No more movies to process.");
                summary.stop_reason = StopReason::NoCandidates;
                return Ok(summary);
            }
            summary.batches += 1;

            let journaled = if self.skip_journaled {
                self.journal.load()?
            } else {
                Default::default()
            };

            for id in &movies {
                let key = id.to_string();
                if matches!(journaled.get(&key), Some(Some(r)) if !r.is_empty()) {
                    debug!(imdb_id = %id.external(), "Already rated in journal, skipping");
                    summary.skipped += 1;
                    continue;
                }

                info!("Fetching IMDb rating for: {}", id.external());
                let lookup = self.source.lookup(id, api_key).await;
                let rating = lookup.rating().map(str::to_string);
                self.journal.record(&key, rating)?;

                // An empty rating is journaled but left off the node so a later run retries it.
                match lookup {
                    RatingLookup::Rated(rating) if !rating.is_empty() => {
                        self.store.set_rating(id, &rating).await?;
                        summary.rated += 1;
                        info!("Updated: {} with rating {}", id.external(), rating);
                    }
                    other => {
                        summary.missed += 1;
                        warn!(
                            "Failed to fetch IMDb rating for: {} ({other})",
                            id.external()
                        );
                    }
                }
            }

            summary.processed += movies.len();
            info!("Processed {} movies so far.", summary.processed);
        }

        Ok(summary)
    }
}
