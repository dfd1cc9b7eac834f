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

use crate::config::OmdbSettings;
use crate::movie::MovieId;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use tracing::debug;

/// Everything a single OMDb lookup can end in.
///
/// Only [`RatingLookup::Rated`] carries a rating. The other variants exist
/// so the job can log why a movie came back empty; callers that just want the
/// rating use [`RatingLookup::into_rating`] and cannot tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingLookup {
    Rated(String),
    /// `"Response": "False"`, with the provider's `Error` text when given.
    Rejected(Option<String>),
    /// `"Response": "True"` but no `imdbRating` field.
    MissingRating,
    HttpStatus(u16),
    Transport(String),
    Malformed(String),
}

impl RatingLookup {
    pub fn into_rating(self) -> Option<String> {
        match self {
            Self::Rated(rating) => Some(rating),
            _ => None,
        }
    }

    pub fn rating(&self) -> Option<&str> {
        match self {
            Self::Rated(rating) => Some(rating),
            _ => None,
        }
    }

    /// Classifies an HTTP status and body the way OMDb reports results.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        if status != StatusCode::OK {
            return Self::HttpStatus(status.as_u16());
        }
        match serde_json::from_slice::<OmdbBody>(body) {
            Err(e) => Self::Malformed(e.to_string()),
            Ok(body) if body.response.as_deref() == Some("True") => body
                .imdb_rating
                .map_or(Self::MissingRating, Self::Rated),
            Ok(body) => Self::Rejected(body.error),
        }
    }
}

impl fmt::Display for RatingLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rated(rating) if rating.is_empty() => f.write_str("empty rating"),
            Self::Rated(rating) => write!(f, "rated {rating}"),
            Self::Rejected(Some(reason)) => write!(f, "rejected by provider: {reason}"),
            Self::Rejected(None) => f.write_str("rejected by provider"),
            Self::MissingRating => f.write_str("no imdbRating in response"),
            Self::HttpStatus(code) => write!(f, "HTTP status {code}"),
            Self::Transport(e) => write!(f, "request failed: {e}"),
            Self::Malformed(e) => write!(f, "malformed response: {e}"),
        }
    }
}

/// The subset of an OMDb response the lookup reads.
#[derive(Debug, Deserialize)]
struct OmdbBody {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[async_trait]
pub trait RatingSource: Send + Sync {
    async fn lookup(&self, id: &MovieId, api_key: &str) -> RatingLookup;
}

/// `fetch_rating(identifier, credential) -> rating | absent`.
pub async fn fetch_rating<R>(source: &R, id: &MovieId, api_key: &str) -> Option<String>
where
    R: RatingSource + ?Sized,
{
    source.lookup(id, api_key).await.into_rating()
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    endpoint: String,
}

impl OmdbClient {
    pub fn new(settings: &OmdbSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self::with_client(client, settings.endpoint.clone()))
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RatingSource for OmdbClient {
    async fn lookup(&self, id: &MovieId, api_key: &str) -> RatingLookup {
        let external = id.external();
        debug!(imdb_id = %external, endpoint = %self.endpoint(), "Requesting OMDb rating");

        let response = match self
            .client
            .get(self.endpoint())
            .query(&[("apikey", api_key), ("i", external.as_str())])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => return RatingLookup::Transport(e.to_string()),
        };

        let status = response.status();
        match response.bytes().await {
            Ok(body) => RatingLookup::from_response(status, &body),
            Err(e) => RatingLookup::Transport(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_passes_rating_through_verbatim() {
        let lookup = RatingLookup::from_response(
            StatusCode::OK,
            br#"{"Response":"True","imdbRating":"N/A","Title":"Obscure"}"#,
        );
        assert_eq!(lookup, RatingLookup::Rated("N/A".to_string()));
    }

    #[test]
    fn provider_failure_keeps_error_text() {
        let lookup = RatingLookup::from_response(
            StatusCode::OK,
            br#"{"Response":"False","Error":"Incorrect IMDb ID."}"#,
        );
        assert_eq!(
            lookup,
            RatingLookup::Rejected(Some("Incorrect IMDb ID.".to_string()))
        );
        assert_eq!(lookup.into_rating(), None);
    }

    #[test]
    fn non_success_status_wins_over_body() {
        let lookup = RatingLookup::from_response(
            StatusCode::UNAUTHORIZED,
            br#"{"Response":"True","imdbRating":"9.0"}"#,
        );
        assert_eq!(lookup, RatingLookup::HttpStatus(401));
    }

    #[test]
    fn only_200_counts_as_success() {
        let lookup = RatingLookup::from_response(
            StatusCode::ACCEPTED,
            br#"{"Response":"True","imdbRating":"9.0"}"#,
        );
        assert_eq!(lookup, RatingLookup::HttpStatus(202));
    }

    #[test]
    fn response_flag_must_be_exactly_true() {
        let lookup =
            RatingLookup::from_response(StatusCode::OK, br#"{"Response":"true","imdbRating":"7.0"}"#);
        assert!(matches!(lookup, RatingLookup::Rejected(None)));
    }

    #[test]
    fn garbage_and_missing_fields() {
        assert!(matches!(
            RatingLookup::from_response(StatusCode::OK, b"<html>busy</html>"),
            RatingLookup::Malformed(_)
        ));
        assert_eq!(
            RatingLookup::from_response(StatusCode::OK, br#"{"Response":"True"}"#),
            RatingLookup::MissingRating
        );
    }
}
