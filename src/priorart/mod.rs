//! Prior-art search for an invention description.
//!
//! [`PriorArtLocator::locate`] embeds a free-text invention description,
//! retrieves the nearest stored claims, and groups the hits by owning
//! document. Groups whose strongest claim sits below the noise floor are
//! discarded outright rather than shown as low-relevance results.
//! [`PriorArtLocator::compare_to_claims`] is the targeted variant: the
//! invention against every claim of one known document.

pub mod error;
pub mod types;


pub use error::PriorArtError;
pub use types::{BlockingGroup, ClaimHit, PriorArtReport};

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::claims::ClaimStore;
use crate::constants::{
    CLAIMS_PER_GROUP_LIMIT, MAX_RESULT_LIMIT, MIN_INVENTION_DESCRIPTION_LEN,
    NARRATIVE_GROUP_LIMIT, PRIOR_ART_NOISE_FLOOR,
};
use crate::index::VectorIndex;
use crate::provider::{
    EmbeddingProvider, FreedomAnalysis, GroupContext, NarrativeProvider, PriorArtContext,
};
use crate::scoring::{RiskThresholds, cosine, risk_of};

/// Tuning for [`PriorArtLocator`].
#[derive(Debug, Clone, Copy)]
pub struct LocatorConfig {
    /// Risk bucket boundaries for prior-art similarities.
    pub thresholds: RiskThresholds,
    /// Groups whose strongest claim is below this are dropped.
    pub noise_floor: f32,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            thresholds: RiskThresholds::prior_art(),
            noise_floor: PRIOR_ART_NOISE_FLOOR,
        }
    }
}

/// Searches stored claims for prior art blocking an invention.
pub struct PriorArtLocator<E, V, S, N = crate::provider::LlmNarrativeProvider> {
    embedder: E,
    index: V,
    store: S,
    narrative: Option<N>,
    config: LocatorConfig,
}

impl<E, V, S, N> std::fmt::Debug for PriorArtLocator<E, V, S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorArtLocator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E, V, S> PriorArtLocator<E, V, S>
where
    E: EmbeddingProvider,
    V: VectorIndex,
    S: ClaimStore,
{
    pub fn new(embedder: E, index: V, store: S, config: LocatorConfig) -> Self {
        Self {
            embedder,
            index,
            store,
            narrative: None,
            config,
        }
    }
}

impl<E, V, S, N> PriorArtLocator<E, V, S, N>
where
    E: EmbeddingProvider,
    V: VectorIndex,
    S: ClaimStore,
    N: NarrativeProvider,
{
    /// Swaps in a narrative provider for enrichment.
    pub fn with_narrative<M: NarrativeProvider>(self, narrative: M) -> PriorArtLocator<E, V, S, M> {
        PriorArtLocator {
            embedder: self.embedder,
            index: self.index,
            store: self.store,
            narrative: Some(narrative),
            config: self.config,
        }
    }

    /// Finds documents whose claims read on `invention`.
    ///
    /// Claim-level retrieval over-fetches three groups' worth per
    /// requested group, since several top claims usually belong to the
    /// same document.
    pub async fn locate(
        &self,
        invention: &str,
        limit: usize,
        include_narrative: bool,
    ) -> Result<PriorArtReport, PriorArtError> {
        validate_invention(invention)?;
        if limit == 0 || limit > MAX_RESULT_LIMIT {
            return Err(PriorArtError::InvalidInput {
                reason: format!("limit {limit} not in 1..={MAX_RESULT_LIMIT}"),
            });
        }

        let invention_vector = self.embedder.embed(invention).await?;
        let hits = self
            .index
            .nearest_claims(&invention_vector, limit.saturating_mul(3))
            .await?;

        // Group hits by owning document, keeping claim-level detail.
        let mut grouped: HashMap<String, Vec<ClaimHit>> = HashMap::new();
        for hit in hits {
            let Some(claim) = self.store.claim(&hit.id).await else {
                warn!(claim_id = %hit.id, "indexed claim missing from store");
                continue;
            };
            grouped.entry(claim.document_id.clone()).or_default().push(ClaimHit {
                similarity: hit.score,
                risk: risk_of(hit.score, self.config.thresholds),
                claim,
            });
        }

        let mut groups: Vec<BlockingGroup> = Vec::with_capacity(grouped.len());
        for (document_id, mut claims) in grouped {
            claims.sort_by(|a, b| {
                b.similarity
                    .partial_cmp(&a.similarity)
                    .unwrap_or(Ordering::Equal)
                    .then(a.claim.number.cmp(&b.claim.number))
            });
            claims.truncate(CLAIMS_PER_GROUP_LIMIT);

            let max_similarity = claims.first().map(|c| c.similarity).unwrap_or(0.0);
            if max_similarity < self.config.noise_floor {
                continue;
            }

            let Some(document) = self.store.document(&document_id).await else {
                warn!(document_id, "claim owner missing from store");
                continue;
            };

            groups.push(BlockingGroup {
                document,
                max_similarity,
                risk: risk_of(max_similarity, self.config.thresholds),
                claims,
            });
        }

        groups.sort_by(|a, b| {
            b.max_similarity
                .partial_cmp(&a.max_similarity)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.document.id.cmp(&b.document.id))
        });
        groups.truncate(limit);

        debug!(group_count = groups.len(), "prior-art search completed");

        let freedom = match (&self.narrative, include_narrative) {
            (Some(narrative), true) if !groups.is_empty() => {
                Some(self.assess_freedom(narrative, invention, &groups).await)
            }
            _ => None,
        };

        Ok(PriorArtReport { groups, freedom })
    }

    /// Ranks every embedded claim of one document against `invention`.
    pub async fn compare_to_claims(
        &self,
        invention: &str,
        document_id: &str,
    ) -> Result<Vec<ClaimHit>, PriorArtError> {
        validate_invention(invention)?;
        if self.store.document(document_id).await.is_none() {
            return Err(PriorArtError::DocumentNotFound {
                id: document_id.to_string(),
            });
        }

        let invention_vector = self.embedder.embed(invention).await?;

        let mut hits: Vec<ClaimHit> = self
            .store
            .claims_for(document_id)
            .await
            .into_iter()
            .filter_map(|claim| {
                let similarity = cosine(&invention_vector, claim.embedding.as_deref()?)
                    .clamp(0.0, 1.0);
                Some(ClaimHit {
                    similarity,
                    risk: risk_of(similarity, self.config.thresholds),
                    claim,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then(a.claim.number.cmp(&b.claim.number))
        });
        Ok(hits)
    }

    /// Runs the freedom-to-operate assessment over the leading groups,
    /// degrading to the fixed manual-review result on provider failure.
    async fn assess_freedom(
        &self,
        narrative: &N,
        invention: &str,
        groups: &[BlockingGroup],
    ) -> FreedomAnalysis {
        let contexts: Vec<GroupContext> = groups
            .iter()
            .take(NARRATIVE_GROUP_LIMIT)
            .filter_map(|g| {
                let top = g.claims.first()?;
                Some(GroupContext {
                    patent_number: g.document.patent_number.clone(),
                    title: g.document.title.clone(),
                    max_similarity: g.max_similarity,
                    top_claim_number: top.claim.number,
                    top_claim_text: top.claim.text.clone(),
                })
            })
            .collect();

        let context = PriorArtContext {
            invention: invention.to_string(),
            groups: contexts,
        };

        match narrative.assess_prior_art(&context).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(error = %e, "freedom-to-operate assessment failed");
                FreedomAnalysis::manual_review()
            }
        }
    }
}

fn validate_invention(invention: &str) -> Result<(), PriorArtError> {
    if invention.trim().chars().count() < MIN_INVENTION_DESCRIPTION_LEN {
        return Err(PriorArtError::InvalidInput {
            reason: format!(
                "invention description shorter than {MIN_INVENTION_DESCRIPTION_LEN} characters"
            ),
        });
    }
    Ok(())
}
