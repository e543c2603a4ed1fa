//! External capability providers.
//!
//! The core consumes two async contracts: [`EmbeddingProvider`] for text
//! embeddings and [`NarrativeProvider`] for LLM-backed narrative analysis.
//! Both are narrow on purpose; their internals (model serving, API
//! transport) are not part of this crate's design. Production adapters:
//! [`OllamaEmbedder`] (HTTP), [`LlmNarrativeProvider`] (genai), and the
//! [`CachedEmbedder`] wrapper. Mocks live in [`mock`] behind the `mock`
//! feature.

pub mod cached;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod narrative;
pub mod ollama;

#[cfg(test)]
mod tests;

pub use cached::CachedEmbedder;
pub use error::ProviderError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockEmbedder, MockNarrativeProvider};
pub use narrative::{
    ClaimRef, FreedomAnalysis, GroupContext, LlmNarrativeProvider, MatchAnalysis,
    MatchPairContext, NarrativeConfig, PriorArtContext, extract_fenced_json,
};
pub use ollama::{OllamaConfig, OllamaEmbedder};

/// Generates embeddings for text.
///
/// Implementations must be pure with respect to text content: the same
/// text always yields the same vector, so results are cacheable by a
/// hash of the text (see [`CachedEmbedder`]).
pub trait EmbeddingProvider: Send + Sync {
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, ProviderError>> + Send;
}

impl<T: EmbeddingProvider> EmbeddingProvider for std::sync::Arc<T> {
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, ProviderError>> + Send {
        T::embed(self, text)
    }
}

/// Produces structured narrative analysis of claim overlap.
///
/// Callers on enrichment paths must treat any failure as a signal to
/// degrade to a fixed default, never as a reason to fail the enclosing
/// operation.
pub trait NarrativeProvider: Send + Sync {
    /// Assesses the top claim matches of a document comparison.
    fn assess_matches(
        &self,
        matches: &[MatchPairContext],
    ) -> impl std::future::Future<Output = Result<MatchAnalysis, ProviderError>> + Send;

    /// Assesses freedom to operate against potentially blocking documents.
    fn assess_prior_art(
        &self,
        context: &PriorArtContext,
    ) -> impl std::future::Future<Output = Result<FreedomAnalysis, ProviderError>> + Send;
}

impl<T: NarrativeProvider> NarrativeProvider for std::sync::Arc<T> {
    fn assess_matches(
        &self,
        matches: &[MatchPairContext],
    ) -> impl std::future::Future<Output = Result<MatchAnalysis, ProviderError>> + Send {
        T::assess_matches(self, matches)
    }

    fn assess_prior_art(
        &self,
        context: &PriorArtContext,
    ) -> impl std::future::Future<Output = Result<FreedomAnalysis, ProviderError>> + Send {
        T::assess_prior_art(self, context)
    }
}
