//! Claim-level comparison between two documents.
//!
//! [`ClaimComparator::compare_claims`] is the pure core: all-pairs
//! cosine over claim embeddings, filtered by a minimum similarity and
//! reduced to [`ComparisonStats`]. [`ClaimComparator::compare_documents`]
//! wraps it with on-demand claim regeneration and optional narrative
//! enrichment, degrading to fixed text when the narrative provider
//! fails.

pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::CompareError;
pub use types::{ClaimAnalysis, ClaimComparison, ClaimMatch, ComparisonStats};

use std::cmp::Ordering;
use std::collections::BTreeSet;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::claims::{ClaimProcessor, ClaimStore};
use crate::constants::{NARRATIVE_MATCH_LIMIT, PARALLEL_PAIRS_THRESHOLD, TOP_MATCHES_LIMIT};
use crate::model::Claim;
use crate::provider::{ClaimRef, EmbeddingProvider, MatchPairContext, NarrativeProvider};
use crate::scoring::{RiskLevel, RiskThresholds, cosine, risk_of};

const UNPARSED_SUMMARY: &str = "Could not parse claims from one or both documents.";
const UNPARSED_RECOMMENDATION: &str =
    "Manual review required - claims could not be automatically parsed.";

/// Tuning for [`ClaimComparator`].
#[derive(Debug, Clone, Copy)]
pub struct ComparatorConfig {
    /// Pairs below this similarity are discarded entirely.
    pub min_similarity: f32,
    /// Risk bucket boundaries applied per match and overall.
    pub thresholds: RiskThresholds,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self {
            min_similarity: crate::constants::DEFAULT_MIN_MATCH_SIMILARITY,
            thresholds: RiskThresholds::claim_comparison(),
        }
    }
}

/// Compares the claims of two documents pairwise.
pub struct ClaimComparator<E, S, N = crate::provider::LlmNarrativeProvider> {
    processor: ClaimProcessor<E, S>,
    narrative: Option<N>,
    config: ComparatorConfig,
}

impl<E, S, N> std::fmt::Debug for ClaimComparator<E, S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimComparator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E, S> ClaimComparator<E, S>
where
    E: EmbeddingProvider,
    S: ClaimStore,
{
    pub fn new(processor: ClaimProcessor<E, S>, config: ComparatorConfig) -> Self {
        Self {
            processor,
            narrative: None,
            config,
        }
    }
}

impl<E, S, N> ClaimComparator<E, S, N>
where
    E: EmbeddingProvider,
    S: ClaimStore,
    N: NarrativeProvider,
{
    /// Swaps in a narrative provider for enrichment.
    pub fn with_narrative<M: NarrativeProvider>(self, narrative: M) -> ClaimComparator<E, S, M> {
        ClaimComparator {
            processor: self.processor,
            narrative: Some(narrative),
            config: self.config,
        }
    }

    pub fn processor(&self) -> &ClaimProcessor<E, S> {
        &self.processor
    }

    /// All-pairs comparison of two claim sets.
    ///
    /// Pairs missing an embedding on either side are skipped. Kept
    /// matches are ordered by descending similarity; ties keep source
    /// then target claim order, so the result is deterministic.
    pub fn compare_claims(
        &self,
        source: &[Claim],
        target: &[Claim],
        min_similarity: f32,
    ) -> Result<ClaimComparison, CompareError> {
        if !(0.0..=1.0).contains(&min_similarity) {
            return Err(CompareError::InvalidInput {
                reason: format!("min_similarity {min_similarity} not in [0, 1]"),
            });
        }

        let scored = score_pairs(source, target, min_similarity);

        let stats = if scored.is_empty() {
            ComparisonStats::empty()
        } else {
            let highest = scored[0].2;
            let sum: f32 = scored.iter().map(|&(_, _, sim)| sim).sum();

            let at_risk: BTreeSet<u32> = scored
                .iter()
                .filter(|&&(i, _, sim)| {
                    source[i].is_independent && sim >= self.config.thresholds.medium
                })
                .map(|&(i, _, _)| source[i].number)
                .collect();

            ComparisonStats {
                highest_similarity: highest,
                average_similarity: sum / scored.len() as f32,
                independent_claims_at_risk: at_risk.len(),
                overall_risk: risk_of(highest, self.config.thresholds),
            }
        };

        let matches = scored
            .into_iter()
            .map(|(i, j, sim)| ClaimMatch {
                source: source[i].clone(),
                target: target[j].clone(),
                similarity: sim,
                risk: risk_of(sim, self.config.thresholds),
                assessment: None,
            })
            .collect();

        Ok(ClaimComparison { matches, stats })
    }

    /// Compares two stored documents, regenerating claims on demand.
    ///
    /// When either side yields no claims the analysis short-circuits to
    /// an `Unknown` overall risk with fixed summary text instead of
    /// reporting a misleading zero-risk result.
    pub async fn compare_documents(
        &self,
        source_id: &str,
        target_id: &str,
        include_narrative: bool,
    ) -> Result<ClaimAnalysis, CompareError> {
        let (source_claims, target_claims) = tokio::try_join!(
            self.processor.ensure_claims(source_id),
            self.processor.ensure_claims(target_id),
        )?;

        if source_claims.is_empty() || target_claims.is_empty() {
            debug!(
                source_id,
                target_id,
                source_claims = source_claims.len(),
                target_claims = target_claims.len(),
                "comparison short-circuited: no claims on one side"
            );
            return Ok(ClaimAnalysis {
                source_document_id: source_id.to_string(),
                target_document_id: target_id.to_string(),
                source_claims_count: source_claims.len(),
                target_claims_count: target_claims.len(),
                top_matches: Vec::new(),
                highest_similarity: 0.0,
                average_similarity: 0.0,
                independent_claims_at_risk: 0,
                overall_risk: RiskLevel::Unknown,
                summary: UNPARSED_SUMMARY.to_string(),
                recommendation: UNPARSED_RECOMMENDATION.to_string(),
            });
        }

        let comparison =
            self.compare_claims(&source_claims, &target_claims, self.config.min_similarity)?;
        let stats = comparison.stats;
        let mut top_matches: Vec<ClaimMatch> = comparison
            .matches
            .into_iter()
            .take(TOP_MATCHES_LIMIT)
            .collect();

        let (summary, recommendation) = match (&self.narrative, include_narrative) {
            (Some(narrative), true) if !top_matches.is_empty() => {
                self.enrich_matches(narrative, &mut top_matches).await
            }
            _ => (String::new(), String::new()),
        };

        Ok(ClaimAnalysis {
            source_document_id: source_id.to_string(),
            target_document_id: target_id.to_string(),
            source_claims_count: source_claims.len(),
            target_claims_count: target_claims.len(),
            top_matches,
            highest_similarity: stats.highest_similarity,
            average_similarity: stats.average_similarity,
            independent_claims_at_risk: stats.independent_claims_at_risk,
            overall_risk: stats.overall_risk,
            summary,
            recommendation,
        })
    }

    /// Runs narrative assessment over the leading matches, attaching
    /// per-match text by position. Any provider failure degrades to the
    /// fixed unavailable text.
    async fn enrich_matches(
        &self,
        narrative: &N,
        matches: &mut [ClaimMatch],
    ) -> (String, String) {
        let contexts: Vec<MatchPairContext> = matches
            .iter()
            .take(NARRATIVE_MATCH_LIMIT)
            .map(|m| MatchPairContext {
                similarity: m.similarity,
                source: claim_ref(&m.source),
                target: claim_ref(&m.target),
            })
            .collect();

        let analysis = match narrative.assess_matches(&contexts).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(error = %e, "narrative match assessment failed");
                crate::provider::MatchAnalysis::unavailable()
            }
        };

        for (m, assessment) in matches.iter_mut().zip(analysis.match_assessments) {
            m.assessment = Some(assessment);
        }

        (analysis.summary, analysis.recommendation)
    }
}

fn claim_ref(claim: &Claim) -> ClaimRef {
    ClaimRef {
        number: claim.number,
        is_independent: claim.is_independent,
        text: claim.text.clone(),
    }
}

/// Scores each embedded pair and keeps those at or above the floor,
/// sorted by descending similarity with `(source, target)` index
/// tie-breaks. Cosine is clamped to `[0, 1]` so opposed vectors score
/// as unrelated rather than negatively.
fn score_pairs(source: &[Claim], target: &[Claim], min_similarity: f32) -> Vec<(usize, usize, f32)> {
    let pairs: Vec<(usize, usize, &[f32], &[f32])> = source
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.embedding.as_deref().map(|e| (i, e)))
        .flat_map(|(i, se)| {
            target
                .iter()
                .enumerate()
                .filter_map(move |(j, t)| t.embedding.as_deref().map(|te| (i, j, se, te)))
        })
        .collect();

    let score = |&(i, j, se, te): &(usize, usize, &[f32], &[f32])| {
        let sim = cosine(se, te).clamp(0.0, 1.0);
        (sim >= min_similarity).then_some((i, j, sim))
    };

    let mut scored: Vec<(usize, usize, f32)> = if pairs.len() > PARALLEL_PAIRS_THRESHOLD {
        pairs.par_iter().filter_map(score).collect()
    } else {
        pairs.iter().filter_map(score).collect()
    };

    scored.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(Ordering::Equal)
            .then(a.0.cmp(&b.0))
            .then(a.1.cmp(&b.1))
    });
    scored
}
