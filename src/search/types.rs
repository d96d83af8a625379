use serde::Serialize;

/// Body of a search request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchRequest {
    /// Trimmed search term, never empty
    #[serde(rename = "termo")]
    pub term: String,
}

impl SearchRequest {
    pub fn new(term: impl Into<String>) -> Self {
        Self { term: term.into() }
    }
}
