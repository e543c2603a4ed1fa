//! Hybrid document search.
//!
//! [`HybridSearchEngine::search`] blends two channels: nearest-neighbor
//! retrieval over document embeddings and lexical fuzzy scoring over
//! document text. Each channel is asked for twice the requested limit so
//! a document strong in only one channel can still place; the merged
//! list is ranked by the weighted [`crate::scoring::combine`] score,
//! truncated to the limit, and only then filtered by the similarity
//! floor. Completed searches are recorded to an optional
//! [`QueryHistorySink`] on a detached task.

pub mod error;
pub mod history;
pub mod types;


pub use error::SearchError;
pub use history::{MemoryQueryHistory, QueryHistorySink, QueryRecord};
pub use types::{MatchType, SearchQuery, SearchResult};

use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, warn};

use crate::claims::ClaimStore;
use crate::constants::{DEFAULT_SIMILARITY_FLOOR, MAX_RESULT_LIMIT};
use crate::index::{TextScorer, VectorIndex};
use crate::provider::EmbeddingProvider;
use crate::scoring::combine;

/// Tuning for [`HybridSearchEngine`].
#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    /// Combined scores below this are dropped after ranking.
    pub similarity_floor: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            similarity_floor: DEFAULT_SIMILARITY_FLOOR,
        }
    }
}

/// Two-channel document search over an embedding index and a lexical
/// scorer, with results resolved against the document store.
pub struct HybridSearchEngine<E, V, T, S, H = std::sync::Arc<MemoryQueryHistory>> {
    embedder: E,
    index: V,
    scorer: T,
    store: S,
    history: Option<H>,
    config: SearchConfig,
}

impl<E, V, T, S, H> std::fmt::Debug for HybridSearchEngine<E, V, T, S, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridSearchEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E, V, T, S> HybridSearchEngine<E, V, T, S>
where
    E: EmbeddingProvider,
    V: VectorIndex,
    T: TextScorer,
    S: ClaimStore,
{
    pub fn new(embedder: E, index: V, scorer: T, store: S, config: SearchConfig) -> Self {
        Self {
            embedder,
            index,
            scorer,
            store,
            history: None,
            config,
        }
    }
}

impl<E, V, T, S, H> HybridSearchEngine<E, V, T, S, H>
where
    E: EmbeddingProvider,
    V: VectorIndex,
    T: TextScorer,
    S: ClaimStore,
    H: QueryHistorySink + Clone + 'static,
{
    /// Swaps in a history sink. Sinks are cloned onto a detached
    /// recording task, so shared sinks go behind an `Arc`.
    pub fn with_history<G>(self, history: G) -> HybridSearchEngine<E, V, T, S, G>
    where
        G: QueryHistorySink + Clone + 'static,
    {
        HybridSearchEngine {
            embedder: self.embedder,
            index: self.index,
            scorer: self.scorer,
            store: self.store,
            history: Some(history),
            config: self.config,
        }
    }

    /// Runs a hybrid search.
    ///
    /// The query embedding is essential: an embedding failure fails the
    /// search. A fuzzy-channel failure degrades to vector-only results.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SearchError> {
        validate(query)?;
        let started = Instant::now();

        let query_vector = self.embedder.embed(&query.text).await?;

        // Over-fetch both channels so a document strong in one channel
        // survives the merged ranking.
        let candidate_limit = query.limit.saturating_mul(2);
        let (vector, fuzzy) = tokio::join!(
            self.index.nearest_documents(&query_vector, candidate_limit),
            self.scorer.fuzzy_scores(&query.text, candidate_limit),
        );
        let vector = vector?;
        let fuzzy = match fuzzy {
            Ok(scores) => scores,
            Err(e) => {
                warn!(error = %e, "fuzzy scoring failed; continuing vector-only");
                Vec::new()
            }
        };

        let mut ranked = merge_channels(&vector, &fuzzy, query.vector_weight);
        ranked.sort_by(|a, b| {
            b.combined_score
                .partial_cmp(&a.combined_score)
                .unwrap_or(Ordering::Equal)
        });
        // Truncation happens before the floor filter, so weak trailing
        // candidates cannot fill slots freed by filtered-out leaders.
        ranked.truncate(query.limit);
        ranked.retain(|c| c.combined_score >= self.config.similarity_floor);

        let mut results = Vec::with_capacity(ranked.len());
        for candidate in ranked {
            match self.store.document(&candidate.id).await {
                Some(document) => results.push(SearchResult {
                    document,
                    vector_score: candidate.vector_score,
                    fuzzy_score: candidate.fuzzy_score,
                    combined_score: candidate.combined_score,
                    match_type: candidate.match_type,
                }),
                None => warn!(id = %candidate.id, "indexed document missing from store"),
            }
        }

        debug!(
            query = %query.text,
            result_count = results.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "search completed"
        );

        if let Some(history) = &self.history {
            let record = QueryRecord {
                query: query.text.clone(),
                result_count: results.len(),
                top_score: results.first().map(|r| r.combined_score).unwrap_or(0.0),
                latency_ms: started.elapsed().as_millis() as u64,
                timestamp: Utc::now(),
            };
            let sink = history.clone();
            tokio::spawn(async move {
                sink.record(record).await;
            });
        }

        Ok(results)
    }
}

fn validate(query: &SearchQuery) -> Result<(), SearchError> {
    if query.text.trim().is_empty() {
        return Err(SearchError::InvalidInput {
            reason: "query text is empty".to_string(),
        });
    }
    if query.limit == 0 || query.limit > MAX_RESULT_LIMIT {
        return Err(SearchError::InvalidInput {
            reason: format!("limit {} not in 1..={MAX_RESULT_LIMIT}", query.limit),
        });
    }
    if !(0.0..=1.0).contains(&query.vector_weight) {
        return Err(SearchError::InvalidInput {
            reason: format!("vector_weight {} not in [0, 1]", query.vector_weight),
        });
    }
    Ok(())
}

struct Candidate {
    id: String,
    vector_score: f32,
    fuzzy_score: f32,
    combined_score: f32,
    match_type: MatchType,
}

/// Merges the two channels by document id. Insertion order (vector
/// candidates in rank order, then fuzzy-only candidates in rank order)
/// breaks combined-score ties via the stable sort upstream.
fn merge_channels(
    vector: &[crate::index::ScoredId],
    fuzzy: &[crate::index::ScoredId],
    vector_weight: f32,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = Vec::with_capacity(vector.len() + fuzzy.len());
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(vector.len());

    for scored in vector {
        positions.insert(scored.id.clone(), candidates.len());
        candidates.push(Candidate {
            id: scored.id.clone(),
            vector_score: scored.score,
            fuzzy_score: 0.0,
            combined_score: 0.0,
            match_type: MatchType::Vector,
        });
    }

    for scored in fuzzy {
        match positions.get(&scored.id) {
            Some(&i) => {
                candidates[i].fuzzy_score = scored.score;
                candidates[i].match_type = MatchType::Hybrid;
            }
            None => candidates.push(Candidate {
                id: scored.id.clone(),
                vector_score: 0.0,
                fuzzy_score: scored.score,
                combined_score: 0.0,
                match_type: MatchType::Fuzzy,
            }),
        }
    }

    for candidate in &mut candidates {
        candidate.combined_score = combine(
            candidate.vector_score,
            candidate.fuzzy_score,
            vector_weight,
        );
    }
    candidates
}
