use thiserror::Error;

use crate::provider::ProviderError;

#[derive(Debug, Error)]
/// Errors from claim processing.
pub enum ClaimsError {
    /// The referenced document does not exist in the store.
    #[error("document not found: {id}")]
    DocumentNotFound {
        /// Document id.
        id: String,
    },

    /// An essential provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ClaimsError {
    /// `true` if retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClaimsError::DocumentNotFound { .. } => false,
            ClaimsError::Provider(e) => e.is_retryable(),
        }
    }
}
