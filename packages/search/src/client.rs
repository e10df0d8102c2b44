//! HTTP implementation of [`ParcelSearch`].

use serde::Deserialize;

use crate::{
    DEFAULT_SEARCH_URL, ParcelSearch, SEARCH_URL_ENV, SearchError, SearchRequest, SearchResponse,
};

/// Talks to the search service over HTTP.
pub struct SearchClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

impl SearchClient {
    /// Creates a client for the service at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Creates a client from the `PARCEL_SEARCH_URL` environment variable,
    /// falling back to a local service.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(SEARCH_URL_ENV).unwrap_or_else(|_| DEFAULT_SEARCH_URL.to_string());
        Self::new(base_url)
    }

    /// The search endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/api/search", self.base_url)
    }
}

#[async_trait::async_trait]
impl ParcelSearch for SearchClient {
    async fn search(
        &self,
        query: &str,
        session_id: Option<&str>,
    ) -> Result<SearchResponse, SearchError> {
        let url = self.endpoint();
        log::debug!("Sending search request to {url}");

        let resp = self
            .client
            .post(&url)
            .json(&SearchRequest { query, session_id })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        log::debug!("Search service responded with {status}");

        if !status.is_success() {
            let detail = error_detail(&body, status.as_u16());
            log::error!("Search service error: {detail}");
            return Err(SearchError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// The message to surface for a failed request.
///
/// An unparsable body reads as "Unknown error"; a parsed body without a
/// `detail` falls back to the status code.
fn error_detail(body: &str, status: u16) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: Some(detail),
        }) if !detail.is_empty() => detail,
        Ok(_) => format!("HTTP error! status: {status}"),
        Err(_) => "Unknown error".to_string(),
    }
}
