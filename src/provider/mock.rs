//! Mock providers for tests and the `mock` feature.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::error::ProviderError;
use super::narrative::{FreedomAnalysis, MatchAnalysis, MatchPairContext, PriorArtContext};
use super::{EmbeddingProvider, NarrativeProvider};
use crate::constants::DEFAULT_EMBEDDING_DIM;

/// How a mock provider responds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    Succeed,
    Unavailable,
    Timeout,
    Malformed,
}

fn behavior_error(behavior: MockBehavior) -> Option<ProviderError> {
    match behavior {
        MockBehavior::Succeed => None,
        MockBehavior::Unavailable => Some(ProviderError::Unavailable {
            provider: "mock",
            message: "mock provider down".to_string(),
        }),
        MockBehavior::Timeout => Some(ProviderError::Timeout {
            provider: "mock",
            timeout: Duration::from_secs(1),
        }),
        MockBehavior::Malformed => Some(ProviderError::MalformedResponse {
            provider: "mock",
            message: "mock provider returned garbage".to_string(),
        }),
    }
}

/// Deterministic embedding provider: the same text always yields the
/// same vector. Specific vectors can be registered per text; everything
/// else gets a BLAKE3-derived pseudo-embedding.
pub struct MockEmbedder {
    dim: usize,
    fixed: RwLock<HashMap<String, Vec<f32>>>,
    behavior: RwLock<MockBehavior>,
    call_count: AtomicUsize,
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIM)
    }
}

impl MockEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            fixed: RwLock::new(HashMap::new()),
            behavior: RwLock::new(MockBehavior::Succeed),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Registers an exact vector for a text.
    pub fn register(&self, text: &str, vector: Vec<f32>) {
        self.fixed
            .write()
            .expect("lock poisoned")
            .insert(text.to_string(), vector);
    }

    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.write().expect("lock poisoned") = behavior;
    }

    /// Number of embed calls made (registered or derived).
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }

    fn derive(&self, text: &str) -> Vec<f32> {
        let mut reader = blake3::Hasher::new()
            .update(text.as_bytes())
            .finalize_xof();
        let mut bytes = vec![0u8; self.dim];
        reader.fill(&mut bytes);
        bytes
            .into_iter()
            .map(|b| (f32::from(b) - 127.5) / 127.5)
            .collect()
    }
}

impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if let Some(err) = behavior_error(*self.behavior.read().expect("lock poisoned")) {
            return Err(err);
        }

        if let Some(vector) = self.fixed.read().expect("lock poisoned").get(text) {
            return Ok(vector.clone());
        }

        Ok(self.derive(text))
    }
}

/// Canned narrative provider.
pub struct MockNarrativeProvider {
    match_analysis: MatchAnalysis,
    freedom_analysis: FreedomAnalysis,
    behavior: RwLock<MockBehavior>,
    call_count: AtomicUsize,
}

impl Default for MockNarrativeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNarrativeProvider {
    pub fn new() -> Self {
        Self {
            match_analysis: MatchAnalysis {
                summary: "Mock summary of claim overlap.".to_string(),
                recommendation: "Mock recommendation.".to_string(),
                match_assessments: vec!["Mock assessment.".to_string()],
            },
            freedom_analysis: FreedomAnalysis {
                freedom_to_operate: "unlikely".to_string(),
                key_risks: vec!["Mock risk.".to_string()],
                design_around_suggestions: vec!["Mock suggestion.".to_string()],
                recommendation: "Mock recommendation.".to_string(),
            },
            behavior: RwLock::new(MockBehavior::Succeed),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn with_match_analysis(mut self, analysis: MatchAnalysis) -> Self {
        self.match_analysis = analysis;
        self
    }

    pub fn with_freedom_analysis(mut self, analysis: FreedomAnalysis) -> Self {
        self.freedom_analysis = analysis;
        self
    }

    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.write().expect("lock poisoned") = behavior;
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl NarrativeProvider for MockNarrativeProvider {
    async fn assess_matches(
        &self,
        _matches: &[MatchPairContext],
    ) -> Result<MatchAnalysis, ProviderError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        match behavior_error(*self.behavior.read().expect("lock poisoned")) {
            Some(err) => Err(err),
            None => Ok(self.match_analysis.clone()),
        }
    }

    async fn assess_prior_art(
        &self,
        _context: &PriorArtContext,
    ) -> Result<FreedomAnalysis, ProviderError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        match behavior_error(*self.behavior.read().expect("lock poisoned")) {
            Some(err) => Err(err),
            None => Ok(self.freedom_analysis.clone()),
        }
    }
}
