//! Embedding cache wrapper.
//!
//! Embeddings are pure functions of their text, so caching by a BLAKE3
//! hash of the text is safe: concurrent writers racing on the same key
//! write the same value, and last-writer-wins costs nothing.

use std::sync::Arc;

use moka::sync::Cache;
use tracing::debug;

use super::EmbeddingProvider;
use super::error::ProviderError;
use crate::constants::DEFAULT_EMBED_CACHE_CAPACITY;

/// Wraps any [`EmbeddingProvider`] with an in-memory LRU cache.
pub struct CachedEmbedder<P> {
    inner: P,
    cache: Cache<[u8; 32], Arc<Vec<f32>>>,
}

impl<P: std::fmt::Debug> std::fmt::Debug for CachedEmbedder<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedEmbedder")
            .field("inner", &self.inner)
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

impl<P: EmbeddingProvider> CachedEmbedder<P> {
    /// Wraps `inner` with the default cache capacity.
    pub fn new(inner: P) -> Self {
        Self::with_capacity(inner, DEFAULT_EMBED_CACHE_CAPACITY)
    }

    /// Wraps `inner` with a max entry capacity (LRU eviction).
    pub fn with_capacity(inner: P, capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Returns the wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of cached embeddings (approximate, per moka semantics).
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl<P: EmbeddingProvider> EmbeddingProvider for CachedEmbedder<P> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let key = *blake3::hash(text.as_bytes()).as_bytes();

        if let Some(hit) = self.cache.get(&key) {
            debug!("embedding cache hit");
            return Ok(hit.as_ref().clone());
        }

        let embedding = self.inner.embed(text).await?;
        self.cache.insert(key, Arc::new(embedding.clone()));
        Ok(embedding)
    }
}
