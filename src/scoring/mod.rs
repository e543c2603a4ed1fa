//! Similarity fusion: cosine scoring, weighted combination, and risk
//! bucketing.
//!
//! Everything here is pure math over caller-supplied values. The two
//! threshold pairs in use ([`RiskThresholds::claim_comparison`] and
//! [`RiskThresholds::prior_art`]) are distinct on purpose: claim-level
//! comparison and prior-art screening bucket risk differently and must
//! never share a hardcoded union.


use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CLAIM_HIGH_THRESHOLD, DEFAULT_CLAIM_MEDIUM_THRESHOLD,
    DEFAULT_PRIOR_ART_HIGH_THRESHOLD, DEFAULT_PRIOR_ART_MEDIUM_THRESHOLD,
};

/// Discretized similarity bucket.
///
/// `Unknown` is never produced by [`risk_of`]; it is reserved for results
/// that could not be scored at all (e.g. a comparison where claims could
/// not be parsed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named pair of risk thresholds. Scores at or above `high` bucket as
/// high risk, at or above `medium` as medium, anything else low.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    pub medium: f32,
    pub high: f32,
}

impl RiskThresholds {
    pub fn new(medium: f32, high: f32) -> Self {
        Self { medium, high }
    }

    /// Thresholds used when comparing two documents claim-by-claim.
    pub fn claim_comparison() -> Self {
        Self {
            medium: DEFAULT_CLAIM_MEDIUM_THRESHOLD,
            high: DEFAULT_CLAIM_HIGH_THRESHOLD,
        }
    }

    /// Thresholds used when screening an invention against the claim corpus.
    pub fn prior_art() -> Self {
        Self {
            medium: DEFAULT_PRIOR_ART_MEDIUM_THRESHOLD,
            high: DEFAULT_PRIOR_ART_HIGH_THRESHOLD,
        }
    }

    /// `true` if `0 < medium <= high <= 1`.
    pub fn is_ordered(&self) -> bool {
        0.0 < self.medium && self.medium <= self.high && self.high <= 1.0
    }
}

/// Buckets a similarity score against a threshold pair.
pub fn risk_of(score: f32, thresholds: RiskThresholds) -> RiskLevel {
    if score >= thresholds.high {
        RiskLevel::High
    } else if score >= thresholds.medium {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Cosine similarity between two vectors.
///
/// Returns `0.0` (not an error) when either vector has zero norm or the
/// lengths differ; a single unscorable pair must never abort a batch.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Weighted fusion of a vector score and a fuzzy score.
///
/// `vector_weight` must be in `[0, 1]`; the fuzzy weight is its
/// complement. The result is trusted by construction and not re-clamped.
pub fn combine(vector_score: f32, fuzzy_score: f32, vector_weight: f32) -> f32 {
    vector_score * vector_weight + fuzzy_score * (1.0 - vector_weight)
}
