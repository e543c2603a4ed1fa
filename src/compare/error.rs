use crate::claims::ClaimsError;

/// Errors surfaced by the claim comparator.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// A caller-supplied parameter was rejected before any work ran.
    #[error("invalid comparison input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// Claim processing failed for one of the documents.
    #[error(transparent)]
    Claims(#[from] ClaimsError),
}

impl CompareError {
    /// Whether retrying the comparison may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InvalidInput { .. } => false,
            Self::Claims(err) => err.is_retryable(),
        }
    }
}
