//! Ollama-backed embedding provider.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::EmbeddingProvider;
use super::error::ProviderError;
use crate::constants::{DEFAULT_PROVIDER_TIMEOUT_SECS, DimConfig};

const PROVIDER_NAME: &str = "ollama";

/// Configuration for [`OllamaEmbedder`].
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Ollama endpoint. Default: `http://localhost:11434`.
    pub base_url: String,
    /// Embedding model name. Default: `nomic-embed-text`.
    pub model: String,
    /// Expected embedding dimension.
    pub dim: DimConfig,
    /// Per-request time bound.
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "nomic-embed-text".to_string(),
            dim: DimConfig::default(),
            timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Embedding provider backed by Ollama's `/api/embeddings` endpoint.
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaEmbedder {
    pub fn new(config: OllamaConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Unavailable {
                provider: PROVIDER_NAME,
                message: e.to_string(),
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn map_request_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout {
                provider: PROVIDER_NAME,
                timeout: self.config.timeout,
            }
        } else {
            ProviderError::Unavailable {
                provider: PROVIDER_NAME,
                message: err.to_string(),
            }
        }
    }
}

impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let text = text.trim();
        if text.is_empty() {
            // Blank input embeds to the zero vector; it scores 0.0
            // against everything downstream.
            return Ok(vec![0.0; self.config.dim.embedding_dim]);
        }

        let url = format!("{}/api/embeddings", self.config.base_url);
        let request = EmbeddingRequest {
            model: &self.config.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?
            .error_for_status()
            .map_err(|e| self.map_request_error(e))?;

        let body: EmbeddingResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::MalformedResponse {
                    provider: PROVIDER_NAME,
                    message: e.to_string(),
                })?;

        if body.embedding.len() != self.config.dim.embedding_dim {
            return Err(ProviderError::MalformedResponse {
                provider: PROVIDER_NAME,
                message: format!(
                    "expected dimension {}, got {}",
                    self.config.dim.embedding_dim,
                    body.embedding.len()
                ),
            });
        }

        debug!(
            text_len = text.len(),
            dim = body.embedding.len(),
            "generated embedding"
        );

        Ok(body.embedding)
    }
}
