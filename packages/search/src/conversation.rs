//! Session tracking across search turns.

use crate::{ParcelSearch, SearchError, SearchTurn};

/// A multi-turn conversation with the search service.
///
/// Remembers the session ID the service hands back so follow-up queries
/// refine the previous search instead of starting over.
pub struct SearchConversation<S: ParcelSearch> {
    search: S,
    session_id: Option<String>,
}

impl<S: ParcelSearch> SearchConversation<S> {
    /// Starts a new conversation.
    #[must_use]
    pub const fn new(search: S) -> Self {
        Self {
            search,
            session_id: None,
        }
    }

    /// Resumes an existing session.
    #[must_use]
    pub const fn with_session(search: S, session_id: String) -> Self {
        Self {
            search,
            session_id: Some(session_id),
        }
    }

    /// The current session ID, once the service has assigned one.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Sends `query` and interprets the answer.
    ///
    /// Blank queries are not sent and yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request fails.
    pub async fn ask(&mut self, query: &str) -> Result<Option<SearchTurn>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let response = self.search.search(query, self.session_id.as_deref()).await?;

        if let Some(id) = response.session_id.clone() {
            if self.session_id.as_deref() != Some(id.as_str()) {
                log::debug!("Search session is now {id}");
            }
            self.session_id = Some(id);
        }

        let turn = response.into_turn();
        log::info!(
            "Search turn returned {} parcels{}",
            turn.parcels.len(),
            if turn.is_error { " (error)" } else { "" }
        );
        Ok(Some(turn))
    }
}
