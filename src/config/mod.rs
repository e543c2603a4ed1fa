//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `CLAIMSCOPE_*` environment
//! variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CLAIM_HIGH_THRESHOLD, DEFAULT_CLAIM_MEDIUM_THRESHOLD, DEFAULT_EMBED_CACHE_CAPACITY,
    DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_RESULTS, DEFAULT_MIN_MATCH_SIMILARITY,
    DEFAULT_PRIOR_ART_HIGH_THRESHOLD, DEFAULT_PRIOR_ART_MEDIUM_THRESHOLD,
    DEFAULT_PROVIDER_TIMEOUT_SECS, DEFAULT_SIMILARITY_FLOOR, DEFAULT_VECTOR_WEIGHT,
};
use crate::provider::{NarrativeConfig, OllamaConfig};
use crate::scoring::RiskThresholds;

/// Default Ollama URL used when `CLAIMSCOPE_OLLAMA_URL` is not set.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default Qdrant URL used when `CLAIMSCOPE_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default embedding model name.
pub const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text";

/// Default chat model for narrative analysis.
pub const DEFAULT_LLM_MODEL: &str = "openai/gpt-4o-mini";

/// Runtime configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CLAIMSCOPE_*` overrides on top of
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Embedding dimension shared by providers and index. Default: `768`.
    pub embedding_dim: usize,

    /// Ollama endpoint URL. Default: `http://localhost:11434`.
    pub ollama_url: String,

    /// Embedding model name. Default: `nomic-embed-text`.
    pub embed_model: String,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Chat model for narrative analysis. Default: `openai/gpt-4o-mini`.
    pub llm_model: String,

    /// Search results below this combined score are dropped. Default: `0.7`.
    pub similarity_floor: f32,

    /// Default search result limit. Default: `20`.
    pub max_results: usize,

    /// Default weight of the vector channel. Default: `0.7`.
    pub vector_weight: f32,

    /// Risk buckets for claim comparison. Default: `0.6` / `0.8`.
    pub claim_thresholds: RiskThresholds,

    /// Risk buckets for prior-art search. Default: `0.55` / `0.75`.
    pub prior_art_thresholds: RiskThresholds,

    /// Claim pairs below this similarity are discarded. Default: `0.5`.
    pub min_match_similarity: f32,

    /// Per-call provider timeout in seconds. Default: `60`.
    pub provider_timeout_secs: u64,

    /// Max entries in the embedding cache. Default: `10_000`.
    pub embed_cache_capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            similarity_floor: DEFAULT_SIMILARITY_FLOOR,
            max_results: DEFAULT_MAX_RESULTS,
            vector_weight: DEFAULT_VECTOR_WEIGHT,
            claim_thresholds: RiskThresholds::new(
                DEFAULT_CLAIM_MEDIUM_THRESHOLD,
                DEFAULT_CLAIM_HIGH_THRESHOLD,
            ),
            prior_art_thresholds: RiskThresholds::new(
                DEFAULT_PRIOR_ART_MEDIUM_THRESHOLD,
                DEFAULT_PRIOR_ART_HIGH_THRESHOLD,
            ),
            min_match_similarity: DEFAULT_MIN_MATCH_SIMILARITY,
            provider_timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
            embed_cache_capacity: DEFAULT_EMBED_CACHE_CAPACITY,
        }
    }
}

impl Config {
    const ENV_EMBEDDING_DIM: &'static str = "CLAIMSCOPE_EMBEDDING_DIM";
    const ENV_OLLAMA_URL: &'static str = "CLAIMSCOPE_OLLAMA_URL";
    const ENV_EMBED_MODEL: &'static str = "CLAIMSCOPE_EMBED_MODEL";
    const ENV_QDRANT_URL: &'static str = "CLAIMSCOPE_QDRANT_URL";
    const ENV_LLM_MODEL: &'static str = "CLAIMSCOPE_LLM_MODEL";
    const ENV_SIMILARITY_FLOOR: &'static str = "CLAIMSCOPE_SIMILARITY_FLOOR";
    const ENV_MAX_RESULTS: &'static str = "CLAIMSCOPE_MAX_RESULTS";
    const ENV_VECTOR_WEIGHT: &'static str = "CLAIMSCOPE_VECTOR_WEIGHT";
    const ENV_CLAIM_MEDIUM: &'static str = "CLAIMSCOPE_CLAIM_MEDIUM_THRESHOLD";
    const ENV_CLAIM_HIGH: &'static str = "CLAIMSCOPE_CLAIM_HIGH_THRESHOLD";
    const ENV_PRIOR_ART_MEDIUM: &'static str = "CLAIMSCOPE_PRIOR_ART_MEDIUM_THRESHOLD";
    const ENV_PRIOR_ART_HIGH: &'static str = "CLAIMSCOPE_PRIOR_ART_HIGH_THRESHOLD";
    const ENV_MIN_MATCH_SIMILARITY: &'static str = "CLAIMSCOPE_MIN_MATCH_SIMILARITY";
    const ENV_PROVIDER_TIMEOUT_SECS: &'static str = "CLAIMSCOPE_PROVIDER_TIMEOUT_SECS";
    const ENV_EMBED_CACHE_CAPACITY: &'static str = "CLAIMSCOPE_EMBED_CACHE_CAPACITY";

    /// Loads configuration from environment variables (falling back to
    /// defaults), then validates it.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            embedding_dim: Self::parse_usize_from_env(
                Self::ENV_EMBEDDING_DIM,
                defaults.embedding_dim,
            )?,
            ollama_url: Self::parse_string_from_env(Self::ENV_OLLAMA_URL, defaults.ollama_url),
            embed_model: Self::parse_string_from_env(Self::ENV_EMBED_MODEL, defaults.embed_model),
            qdrant_url: Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url),
            llm_model: Self::parse_string_from_env(Self::ENV_LLM_MODEL, defaults.llm_model),
            similarity_floor: Self::parse_f32_from_env(
                Self::ENV_SIMILARITY_FLOOR,
                defaults.similarity_floor,
            )?,
            max_results: Self::parse_usize_from_env(Self::ENV_MAX_RESULTS, defaults.max_results)?,
            vector_weight: Self::parse_f32_from_env(
                Self::ENV_VECTOR_WEIGHT,
                defaults.vector_weight,
            )?,
            claim_thresholds: RiskThresholds::new(
                Self::parse_f32_from_env(Self::ENV_CLAIM_MEDIUM, defaults.claim_thresholds.medium)?,
                Self::parse_f32_from_env(Self::ENV_CLAIM_HIGH, defaults.claim_thresholds.high)?,
            ),
            prior_art_thresholds: RiskThresholds::new(
                Self::parse_f32_from_env(
                    Self::ENV_PRIOR_ART_MEDIUM,
                    defaults.prior_art_thresholds.medium,
                )?,
                Self::parse_f32_from_env(
                    Self::ENV_PRIOR_ART_HIGH,
                    defaults.prior_art_thresholds.high,
                )?,
            ),
            min_match_similarity: Self::parse_f32_from_env(
                Self::ENV_MIN_MATCH_SIMILARITY,
                defaults.min_match_similarity,
            )?,
            provider_timeout_secs: Self::parse_u64_from_env(
                Self::ENV_PROVIDER_TIMEOUT_SECS,
                defaults.provider_timeout_secs,
            )?,
            embed_cache_capacity: Self::parse_u64_from_env(
                Self::ENV_EMBED_CACHE_CAPACITY,
                defaults.embed_cache_capacity,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates ranges and threshold ordering.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding_dim == 0 {
            return Err(ConfigError::ZeroEmbeddingDim);
        }

        for (name, value) in [
            ("similarity_floor", self.similarity_floor),
            ("vector_weight", self.vector_weight),
            ("min_match_similarity", self.min_match_similarity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange { name, value });
            }
        }

        for (name, thresholds) in [
            ("claim", self.claim_thresholds),
            ("prior_art", self.prior_art_thresholds),
        ] {
            for value in [thresholds.medium, thresholds.high] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ConfigError::OutOfUnitRange { name, value });
                }
            }
            if !thresholds.is_ordered() {
                return Err(ConfigError::UnorderedThresholds {
                    name,
                    medium: thresholds.medium,
                    high: thresholds.high,
                });
            }
        }

        Ok(())
    }

    /// Per-call provider time bound.
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    /// Embedding provider settings derived from this configuration.
    pub fn ollama(&self) -> OllamaConfig {
        OllamaConfig {
            base_url: self.ollama_url.clone(),
            model: self.embed_model.clone(),
            dim: crate::constants::DimConfig::new(self.embedding_dim),
            timeout: self.provider_timeout(),
        }
    }

    /// Narrative provider settings derived from this configuration.
    pub fn narrative(&self) -> NarrativeConfig {
        NarrativeConfig {
            model: self.llm_model.clone(),
            timeout: self.provider_timeout(),
        }
    }

    fn parse_string_from_env(var_name: &'static str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_f32_from_env(var_name: &'static str, default: f32) -> Result<f32, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::FloatParseError {
                name: var_name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::IntParseError {
                name: var_name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::IntParseError {
                name: var_name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }
}
