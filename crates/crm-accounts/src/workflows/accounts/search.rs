use async_trait::async_trait;

use super::domain::CandidateSearchResponse;

/// Looks up existing companies that might collide with a normalized name.
#[async_trait]
pub trait CandidateSearch: Send + Sync {
    async fn search(&self, normalized_name: &str) -> Result<CandidateSearchResponse, SearchError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("candidate search unavailable: {0}")]
    Unavailable(String),
    #[error("candidate search returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Message shown to users whenever the search collaborator fails.
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to validate company name";
