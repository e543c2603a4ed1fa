use serde::{Deserialize, Serialize};

use crate::model::Claim;
use crate::scoring::RiskLevel;

/// A matched claim pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimMatch {
    pub source: Claim,
    pub target: Claim,
    /// Cosine similarity clamped to `[0, 1]`.
    pub similarity: f32,
    pub risk: RiskLevel,
    /// Narrative overlap assessment, when enrichment ran.
    pub assessment: Option<String>,
}

/// Aggregate statistics over all kept matches (not just the reportable
/// top matches).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonStats {
    /// Highest kept similarity; `0.0` when nothing matched.
    pub highest_similarity: f32,
    /// Mean over all kept matches; `0.0` when nothing matched.
    pub average_similarity: f32,
    /// Distinct independent source claim numbers appearing in a kept
    /// match at or above the medium threshold. Deliberately independent
    /// of `overall_risk`, which looks only at the single highest
    /// similarity; the two can disagree.
    pub independent_claims_at_risk: usize,
    /// Risk bucket of the highest similarity.
    pub overall_risk: RiskLevel,
}

impl ComparisonStats {
    /// Stats for a comparison with no kept matches.
    pub fn empty() -> Self {
        Self {
            highest_similarity: 0.0,
            average_similarity: 0.0,
            independent_claims_at_risk: 0,
            overall_risk: RiskLevel::Low,
        }
    }
}

/// Result of a raw claim-set comparison: every kept match plus the
/// statistics computed over them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimComparison {
    /// Kept matches, descending by similarity.
    pub matches: Vec<ClaimMatch>,
    pub stats: ComparisonStats,
}

/// Full claim-level analysis between two documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimAnalysis {
    pub source_document_id: String,
    pub target_document_id: String,
    pub source_claims_count: usize,
    pub target_claims_count: usize,
    /// Top matches, descending by similarity, capped at
    /// [`crate::constants::TOP_MATCHES_LIMIT`].
    pub top_matches: Vec<ClaimMatch>,
    pub highest_similarity: f32,
    pub average_similarity: f32,
    pub independent_claims_at_risk: usize,
    /// `Unknown` when claims could not be parsed for either side.
    pub overall_risk: RiskLevel,
    pub summary: String,
    pub recommendation: String,
}
