use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by external capability providers.
pub enum ProviderError {
    /// The provider could not be reached or returned a transport error.
    #[error("provider '{provider}' unavailable: {message}")]
    Unavailable {
        /// Provider name for diagnostics.
        provider: &'static str,
        /// Error message.
        message: String,
    },

    /// The call exceeded its time bound.
    #[error("provider '{provider}' timed out after {timeout:?}")]
    Timeout {
        /// Provider name for diagnostics.
        provider: &'static str,
        /// The bound that was exceeded.
        timeout: Duration,
    },

    /// The provider answered, but the response could not be interpreted.
    /// Enrichment callers must degrade to a default instead of
    /// propagating this.
    #[error("malformed response from provider '{provider}': {message}")]
    MalformedResponse {
        /// Provider name for diagnostics.
        provider: &'static str,
        /// What failed to parse.
        message: String,
    },
}

impl ProviderError {
    /// `true` if retrying the same call may succeed. Malformed responses
    /// are not retryable: the provider answered, we just could not use it.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::Unavailable { .. } | ProviderError::Timeout { .. }
        )
    }
}
