use crate::index::IndexError;
use crate::provider::ProviderError;

/// Errors surfaced by hybrid search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A caller-supplied parameter was rejected before any work ran.
    #[error("invalid search input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// The query could not be embedded; search cannot proceed without a
    /// query vector.
    #[error(transparent)]
    Embedding(#[from] ProviderError),

    /// Nearest-neighbor retrieval failed.
    #[error(transparent)]
    Index(#[from] IndexError),
}

impl SearchError {
    /// Whether retrying the search may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InvalidInput { .. } => false,
            Self::Embedding(err) => err.is_retryable(),
            Self::Index(_) => true,
        }
    }
}
