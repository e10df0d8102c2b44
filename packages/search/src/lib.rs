#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the conversational parcel search service.
//!
//! The service takes a natural-language query and answers with a batch of
//! parcels plus a short summary. It keeps conversational context keyed by a
//! session ID, so follow-up queries can refine the previous search.
//! [`SearchConversation`] tracks that ID across turns and turns each raw
//! [`SearchResponse`] into a [`SearchTurn`] ready for the map.

pub mod client;
pub mod conversation;

use parcel_map_parcel_models::Parcel;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::SearchClient;
pub use conversation::SearchConversation;

/// Environment variable holding the search service base URL.
pub const SEARCH_URL_ENV: &str = "PARCEL_SEARCH_URL";

/// Base URL used when [`SEARCH_URL_ENV`] is not set.
pub const DEFAULT_SEARCH_URL: &str = "http://localhost:8000";

/// Prefix the service puts on summaries that report a failure.
const ERROR_SUMMARY_PREFIX: &str = "Error: ";

/// Appended to the assistant message when the service refined a search.
const REFINEMENT_NOTE: &str = "\n\n(Refining previous search...)";

/// Errors that can occur while searching.
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP request to the search service failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The service answered with a non-success status.
    #[error("Search service error ({status}): {detail}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The service's `detail` message, or a generic description.
        detail: String,
    },
}

/// Body of `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest<'a> {
    /// Natural-language query.
    pub query: &'a str,
    /// Session to continue, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

/// Raw answer from `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Matching parcels, best first.
    #[serde(default)]
    pub parcels: Vec<Parcel>,
    /// Natural-language summary of the result.
    #[serde(default)]
    pub summary: Option<String>,
    /// Session to pass back on the next turn.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Whether this turn refined the previous search.
    #[serde(default)]
    pub is_refinement: bool,
}

/// One interpreted search turn.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchTurn {
    /// Parcels found this turn. Always empty for an error turn, which
    /// clears the map. A non-error turn may also come back empty, in which
    /// case the map keeps showing the previous batch.
    pub parcels: Vec<Parcel>,
    /// Assistant message to show in the conversation.
    pub message: String,
    /// Whether the service reported an error in its summary.
    pub is_error: bool,
}

impl SearchResponse {
    /// Interprets the response as a conversation turn.
    ///
    /// A summary starting with `"Error: "` is a service-reported failure:
    /// the message is the rest of the summary and the batch is cleared.
    /// Otherwise the summary (or a generated fallback) becomes the message,
    /// with a note appended when the turn refined a previous search.
    #[must_use]
    pub fn into_turn(self) -> SearchTurn {
        if let Some(message) = self
            .summary
            .as_deref()
            .and_then(|s| s.strip_prefix(ERROR_SUMMARY_PREFIX))
        {
            return SearchTurn {
                parcels: Vec::new(),
                message: message.to_string(),
                is_error: true,
            };
        }

        let note = if self.is_refinement { REFINEMENT_NOTE } else { "" };
        let summary = self.summary.filter(|s| !s.is_empty()).unwrap_or_else(|| {
            if self.parcels.is_empty() {
                "No parcels found matching your criteria. Try adjusting your search parameters."
                    .to_string()
            } else {
                format!("Found {} parcels matching your criteria.", self.parcels.len())
            }
        });

        SearchTurn {
            parcels: self.parcels,
            message: format!("{summary}{note}"),
            is_error: false,
        }
    }
}

/// Something that can answer parcel search queries.
#[async_trait::async_trait]
pub trait ParcelSearch: Send + Sync {
    /// Runs one search turn.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request fails or the service answers
    /// with an error status.
    async fn search(
        &self,
        query: &str,
        session_id: Option<&str>,
    ) -> Result<SearchResponse, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_service_response() {
        let response: SearchResponse = serde_json::from_str(
            r#"{
                "parcels": [{
                    "address": "12 Farm Rd",
                    "county": "Franklin",
                    "acreage": 31.2,
                    "explanation": "Flat",
                    "geometry": {"type": "Polygon", "coordinates": [[[-72.5, 42.1]]]}
                }],
                "summary": "Found 1 parcel matching your criteria.",
                "session_id": "abc",
                "is_refinement": false
            }"#,
        )
        .unwrap();

        assert_eq!(response.parcels.len(), 1);
        assert_eq!(response.session_id.as_deref(), Some("abc"));
    }

    #[test]
    fn request_omits_missing_session() {
        let body = serde_json::to_value(SearchRequest {
            query: "flat land",
            session_id: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "query": "flat land" }));
    }

    #[test]
    fn error_summary_clears_parcels() {
        let turn = SearchResponse {
            parcels: vec![Parcel::default()],
            summary: Some("Error: Query is not about land parcels.".to_string()),
            ..SearchResponse::default()
        }
        .into_turn();

        assert!(turn.is_error);
        assert!(turn.parcels.is_empty());
        assert_eq!(turn.message, "Query is not about land parcels.");
    }

    #[test]
    fn fallback_messages() {
        let found = SearchResponse {
            parcels: vec![Parcel::default(), Parcel::default()],
            ..SearchResponse::default()
        }
        .into_turn();
        assert_eq!(found.message, "Found 2 parcels matching your criteria.");

        let none = SearchResponse::default().into_turn();
        assert!(none.message.starts_with("No parcels found"));
        assert!(!none.is_error);
    }

    #[test]
    fn refinement_note_is_appended() {
        let turn = SearchResponse {
            summary: Some("Narrowed to 3 parcels.".to_string()),
            is_refinement: true,
            ..SearchResponse::default()
        }
        .into_turn();
        assert_eq!(
            turn.message,
            "Narrowed to 3 parcels.\n\n(Refining previous search...)"
        );
    }
}
