//! Retrieval primitives over stored embeddings.
//!
//! [`VectorIndex`] answers nearest-neighbor queries over document and
//! claim embeddings; [`TextScorer`] produces normalized lexical
//! similarity scores over a bounded candidate set. Both are read-only
//! from the core's perspective. The production [`QdrantIndex`] maintains
//! one cosine-distance collection per entity kind; the fuzzy metric
//! itself is an external capability, so [`TextScorer`] ships with only
//! an in-memory mock for tests.

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod qdrant;

#[cfg(test)]
mod tests;

pub use error::IndexError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockIndex;
pub use qdrant::QdrantIndex;

/// Qdrant collection holding document-level embeddings.
pub const DOCUMENTS_COLLECTION: &str = "claimscope_documents";

/// Qdrant collection holding claim-level embeddings.
pub const CLAIMS_COLLECTION: &str = "claimscope_claims";

/// An entity id paired with a similarity score in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredId {
    pub id: String,
    pub score: f32,
}

impl ScoredId {
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

/// Nearest-neighbor queries over stored embeddings, ordered by
/// descending similarity.
pub trait VectorIndex: Send + Sync {
    /// Top `limit` documents nearest to `query`.
    fn nearest_documents(
        &self,
        query: &[f32],
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ScoredId>, IndexError>> + Send;

    /// Top `limit` claims nearest to `query`, across all documents.
    fn nearest_claims(
        &self,
        query: &[f32],
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ScoredId>, IndexError>> + Send;
}

impl<T: VectorIndex> VectorIndex for std::sync::Arc<T> {
    fn nearest_documents(
        &self,
        query: &[f32],
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ScoredId>, IndexError>> + Send {
        T::nearest_documents(self, query, limit)
    }

    fn nearest_claims(
        &self,
        query: &[f32],
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ScoredId>, IndexError>> + Send {
        T::nearest_claims(self, query, limit)
    }
}

/// Bulk lexical similarity over a bounded candidate set (at most about a
/// thousand documents). Scores are normalized to `[0, 1]`.
pub trait TextScorer: Send + Sync {
    /// Top `limit` documents by fuzzy similarity between `query` and
    /// each document's searchable text.
    fn fuzzy_scores(
        &self,
        query: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ScoredId>, IndexError>> + Send;
}

impl<T: TextScorer> TextScorer for std::sync::Arc<T> {
    fn fuzzy_scores(
        &self,
        query: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ScoredId>, IndexError>> + Send {
        T::fuzzy_scores(self, query, limit)
    }
}
