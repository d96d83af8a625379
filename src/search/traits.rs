use crate::models::SearchRecord;
use crate::search::error::SearchError;
use async_trait::async_trait;

/// The remote service behind the search widget
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Look up units matching a non-empty, trimmed term
    async fn search(&self, term: &str) -> Result<Vec<SearchRecord>, SearchError>;

    /// Inner HTML of the results container as the server renders it before
    /// any search
    async fn initial_view(&self) -> Result<String, SearchError>;
}
