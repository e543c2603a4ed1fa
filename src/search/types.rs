use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_RESULTS, DEFAULT_VECTOR_WEIGHT};
use crate::model::Document;

/// Which retrieval channel(s) produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Found only by nearest-neighbor retrieval.
    Vector,
    /// Found only by lexical scoring.
    Fuzzy,
    /// Found by both channels.
    Hybrid,
}

/// A search query with per-query tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    /// Maximum results returned, at most
    /// [`crate::constants::MAX_RESULT_LIMIT`].
    pub limit: usize,
    /// Weight of the vector channel in `[0, 1]`; the fuzzy channel gets
    /// the complement.
    pub vector_weight: f32,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: DEFAULT_MAX_RESULTS,
            vector_weight: DEFAULT_VECTOR_WEIGHT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_vector_weight(mut self, vector_weight: f32) -> Self {
        self.vector_weight = vector_weight;
        self
    }
}

/// One ranked search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub document: Document,
    /// Vector-channel similarity; `0.0` when the vector channel did not
    /// surface this document.
    pub vector_score: f32,
    /// Fuzzy-channel similarity; `0.0` when the fuzzy channel did not
    /// surface this document.
    pub fuzzy_score: f32,
    /// Weighted blend the ranking orders by.
    pub combined_score: f32,
    pub match_type: MatchType,
}
