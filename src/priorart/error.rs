use crate::index::IndexError;
use crate::provider::ProviderError;

/// Errors surfaced by the prior-art locator.
#[derive(Debug, thiserror::Error)]
pub enum PriorArtError {
    /// A caller-supplied parameter was rejected before any work ran.
    #[error("invalid prior-art input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// The referenced document does not exist.
    #[error("document not found: {id}")]
    DocumentNotFound {
        /// Id that failed to resolve.
        id: String,
    },

    /// The invention description could not be embedded.
    #[error(transparent)]
    Embedding(#[from] ProviderError),

    /// Nearest-neighbor retrieval over claims failed.
    #[error(transparent)]
    Index(#[from] IndexError),
}

impl PriorArtError {
    /// Whether retrying the operation may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InvalidInput { .. } | Self::DocumentNotFound { .. } => false,
            Self::Embedding(err) => err.is_retryable(),
            Self::Index(_) => true,
        }
    }
}
