//! In-memory index for tests and the `mock` feature.

use std::collections::HashMap;
use std::sync::RwLock;

use super::error::IndexError;
use super::{ScoredId, TextScorer, VectorIndex};
use crate::scoring::cosine;

/// In-memory [`VectorIndex`] ranking by exact cosine similarity, plus a
/// [`TextScorer`] that replays canned fuzzy results per query.
#[derive(Default)]
pub struct MockIndex {
    documents: RwLock<HashMap<String, Vec<f32>>>,
    claims: RwLock<HashMap<String, Vec<f32>>>,
    fuzzy: RwLock<HashMap<String, Vec<ScoredId>>>,
    failing: RwLock<bool>,
}

impl MockIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_document(&self, id: &str, vector: Vec<f32>) {
        self.documents
            .write()
            .expect("lock poisoned")
            .insert(id.to_string(), vector);
    }

    pub fn insert_claim(&self, id: &str, vector: Vec<f32>) {
        self.claims
            .write()
            .expect("lock poisoned")
            .insert(id.to_string(), vector);
    }

    /// Registers the fuzzy result list replayed for `query`.
    pub fn set_fuzzy_results(&self, query: &str, results: Vec<ScoredId>) {
        self.fuzzy
            .write()
            .expect("lock poisoned")
            .insert(query.to_string(), results);
    }

    /// Makes every operation fail with a search error.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.write().expect("lock poisoned") = failing;
    }

    pub fn document_count(&self) -> usize {
        self.documents.read().expect("lock poisoned").len()
    }

    pub fn claim_count(&self) -> usize {
        self.claims.read().expect("lock poisoned").len()
    }

    fn check_failing(&self, collection: &str) -> Result<(), IndexError> {
        if *self.failing.read().expect("lock poisoned") {
            return Err(IndexError::SearchFailed {
                collection: collection.to_string(),
                message: "mock index down".to_string(),
            });
        }
        Ok(())
    }

    fn rank(
        entries: &HashMap<String, Vec<f32>>,
        query: &[f32],
        limit: usize,
    ) -> Vec<ScoredId> {
        let mut scored: Vec<ScoredId> = entries
            .iter()
            .map(|(id, vector)| ScoredId::new(id.clone(), cosine(query, vector).max(0.0)))
            .collect();

        // Tie-break on id so ranking is deterministic across runs.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        scored.truncate(limit);
        scored
    }
}

impl VectorIndex for MockIndex {
    async fn nearest_documents(
        &self,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredId>, IndexError> {
        self.check_failing("documents")?;
        let documents = self.documents.read().expect("lock poisoned");
        Ok(Self::rank(&documents, query, limit))
    }

    async fn nearest_claims(
        &self,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredId>, IndexError> {
        self.check_failing("claims")?;
        let claims = self.claims.read().expect("lock poisoned");
        Ok(Self::rank(&claims, query, limit))
    }
}

impl TextScorer for MockIndex {
    async fn fuzzy_scores(&self, query: &str, limit: usize) -> Result<Vec<ScoredId>, IndexError> {
        self.check_failing("fuzzy")?;
        let mut results = self
            .fuzzy
            .read()
            .expect("lock poisoned")
            .get(query)
            .cloned()
            .unwrap_or_default();
        results.truncate(limit);
        Ok(results)
    }
}
