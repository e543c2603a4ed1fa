//! Claimscope library crate: patent infringement screening.
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Runtime configuration
//! - [`Document`], [`Claim`], [`ClaimType`] - Patent records
//! - [`RiskLevel`], [`RiskThresholds`] - Similarity risk buckets
//!
//! ## Claim Processing
//! - [`ClaimParser`], [`ParsedClaim`] - Claims-text parsing
//! - [`ClaimProcessor`], [`ClaimStore`], [`MemoryClaimStore`] - Claim lifecycle
//!
//! ## Analysis Pipelines
//! - [`ClaimComparator`], [`ClaimAnalysis`] - Claim-level comparison
//! - [`HybridSearchEngine`], [`SearchQuery`], [`SearchResult`] - Document search
//! - [`PriorArtLocator`], [`PriorArtReport`] - Prior-art search
//!
//! ## Providers & Index
//! - [`OllamaEmbedder`], [`CachedEmbedder`], [`EmbeddingProvider`] - Embeddings
//! - [`LlmNarrativeProvider`], [`NarrativeProvider`] - Narrative analysis
//! - [`QdrantIndex`], [`VectorIndex`], [`TextScorer`] - Retrieval
//!
//! ## Constants
//! Thresholds, limits, and dimension defaults live in [`constants`].
//! Prefer [`DimConfig`] for runtime dimension configuration.
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod claims;
pub mod compare;
pub mod config;
pub mod constants;
pub mod index;
pub mod model;
pub mod parser;
pub mod priorart;
pub mod provider;
pub mod scoring;
pub mod search;

pub use claims::{
    ClaimProcessor, ClaimStore, ClaimsError, MemoryClaimStore, claim_embedding_text,
};
pub use compare::{
    ClaimAnalysis, ClaimComparator, ClaimComparison, ClaimMatch, CompareError, ComparatorConfig,
    ComparisonStats,
};
pub use config::{Config, ConfigError};
pub use constants::{DimConfig, DimValidationError, validate_embedding_dim};
#[cfg(any(test, feature = "mock"))]
pub use index::MockIndex;
pub use index::{
    CLAIMS_COLLECTION, DOCUMENTS_COLLECTION, IndexError, QdrantIndex, ScoredId, TextScorer,
    VectorIndex,
};
pub use model::{Claim, ClaimType, Document};
pub use parser::{ClaimParser, ParsedClaim, extract_key_elements};
pub use priorart::{BlockingGroup, ClaimHit, LocatorConfig, PriorArtError, PriorArtLocator, PriorArtReport};
#[cfg(any(test, feature = "mock"))]
pub use provider::{MockEmbedder, MockNarrativeProvider};
pub use provider::{
    CachedEmbedder, ClaimRef, EmbeddingProvider, FreedomAnalysis, GroupContext,
    LlmNarrativeProvider, MatchAnalysis, MatchPairContext, NarrativeConfig, NarrativeProvider,
    OllamaConfig, OllamaEmbedder, PriorArtContext, ProviderError,
};
pub use scoring::{RiskLevel, RiskThresholds, combine, cosine, risk_of};
pub use search::{
    HybridSearchEngine, MatchType, MemoryQueryHistory, QueryHistorySink, QueryRecord, SearchConfig,
    SearchError, SearchQuery, SearchResult,
};
