use serde::{Deserialize, Serialize};

use crate::model::{Claim, Document};
use crate::provider::FreedomAnalysis;
use crate::scoring::RiskLevel;

/// A single claim that reads on the invention description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimHit {
    pub claim: Claim,
    /// Similarity of the claim embedding to the invention embedding.
    pub similarity: f32,
    pub risk: RiskLevel,
}

/// One potentially blocking document with its strongest claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockingGroup {
    pub document: Document,
    /// Similarity of the group's strongest claim.
    pub max_similarity: f32,
    /// Risk bucket of `max_similarity`.
    pub risk: RiskLevel,
    /// Strongest claims, descending, capped at
    /// [`crate::constants::CLAIMS_PER_GROUP_LIMIT`].
    pub claims: Vec<ClaimHit>,
}

/// Result of a prior-art search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorArtReport {
    /// Blocking groups, descending by strongest claim.
    pub groups: Vec<BlockingGroup>,
    /// Narrative freedom-to-operate assessment, when enrichment ran.
    pub freedom: Option<FreedomAnalysis>,
}
