//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift.
//! Runtime-configurable values live in [`crate::config::Config`]; the
//! constants here are the defaults those values fall back to, plus caps
//! that are part of the result contract and never configurable.

use thiserror::Error;

/// Default embedding dimension (nomic-embed-text).
pub const DEFAULT_EMBEDDING_DIM: usize = 768;

/// Minimum cleaned claim text length kept by the parser.
pub const MIN_CLAIM_TEXT_LEN: usize = 11;

/// Maximum key elements extracted per claim.
pub const MAX_KEY_ELEMENTS: usize = 10;

/// Reportable claim matches per comparison.
pub const TOP_MATCHES_LIMIT: usize = 10;

/// Claim matches handed to the narrative provider for assessment.
pub const NARRATIVE_MATCH_LIMIT: usize = 5;

/// Blocking claims kept per document group in prior-art results.
pub const CLAIMS_PER_GROUP_LIMIT: usize = 5;

/// Document groups handed to the narrative provider in prior-art results.
pub const NARRATIVE_GROUP_LIMIT: usize = 5;

/// Minimum group similarity for a document to appear in prior-art results.
/// Deliberately below the medium-risk threshold; it is a noise floor,
/// not a risk boundary.
pub const PRIOR_ART_NOISE_FLOOR: f32 = 0.4;

/// Default minimum similarity for a claim pair to count as a match.
pub const DEFAULT_MIN_MATCH_SIMILARITY: f32 = 0.5;

/// Default combined-score floor applied to hybrid search results.
pub const DEFAULT_SIMILARITY_FLOOR: f32 = 0.7;

/// Default result cap for hybrid search.
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Hard cap on caller-supplied result limits.
pub const MAX_RESULT_LIMIT: usize = 50;

/// Default weight given to the vector score when fusing with the fuzzy score.
pub const DEFAULT_VECTOR_WEIGHT: f32 = 0.7;

/// Default claim-comparison risk thresholds.
pub const DEFAULT_CLAIM_MEDIUM_THRESHOLD: f32 = 0.6;
pub const DEFAULT_CLAIM_HIGH_THRESHOLD: f32 = 0.8;

/// Default prior-art risk thresholds.
pub const DEFAULT_PRIOR_ART_MEDIUM_THRESHOLD: f32 = 0.55;
pub const DEFAULT_PRIOR_ART_HIGH_THRESHOLD: f32 = 0.75;

/// Minimum length for an invention description submitted to prior-art search.
pub const MIN_INVENTION_DESCRIPTION_LEN: usize = 50;

/// Claim pairs above which all-pairs scoring runs on the rayon pool.
pub const PARALLEL_PAIRS_THRESHOLD: usize = 4096;

/// Claims text is truncated to this many chars for document-level embeddings.
pub const DOCUMENT_CLAIMS_EMBED_LIMIT: usize = 3000;

/// Default per-call timeout for external providers, in seconds.
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 60;

/// Default capacity of the in-memory embedding cache.
pub const DEFAULT_EMBED_CACHE_CAPACITY: u64 = 10_000;

/// Runtime dimension configuration for modules that need to agree on
/// vector dimensions at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimConfig {
    /// The embedding vector dimension (number of floats).
    pub embedding_dim: usize,
}

impl Default for DimConfig {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl DimConfig {
    /// Creates a new dimension configuration.
    pub fn new(embedding_dim: usize) -> Self {
        Self { embedding_dim }
    }

    /// Validates that the dimension is usable.
    pub fn validate(&self) -> Result<(), DimValidationError> {
        if self.embedding_dim == 0 {
            return Err(DimValidationError::ZeroDimension);
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DimValidationError {
    #[error("embedding dimension must be nonzero")]
    ZeroDimension,

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    Mismatch { expected: usize, actual: usize },
}

/// Checks a vector's length against the configured dimension.
pub fn validate_embedding_dim(vector: &[f32], dim: &DimConfig) -> Result<(), DimValidationError> {
    if vector.len() != dim.embedding_dim {
        return Err(DimValidationError::Mismatch {
            expected: dim.embedding_dim,
            actual: vector.len(),
        });
    }
    Ok(())
}
