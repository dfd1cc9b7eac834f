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

//! Backfills missing IMDb ratings on `Movie` nodes in Neo4j from the OMDb API,
//! mirroring every lookup into a local JSON journal.

pub mod config;
pub mod error;
pub mod job;
pub mod journal;
pub mod movie;
pub mod omdb;
pub mod store;

pub use config::{BackfillConfig, Neo4jSettings, OmdbSettings};
pub use error::{BackfillError, ConfigError, JournalError, StoreError};
pub use job::{BackfillJob, RunSummary, StopReason};
pub use journal::{merge_and_persist, Journal, RatingsMap};
pub use movie::MovieId;
pub use omdb::{fetch_rating, OmdbClient, RatingLookup, RatingSource};
pub use store::{MovieStore, Neo4jStore};
