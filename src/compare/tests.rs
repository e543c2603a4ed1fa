use std::sync::Arc;

use super::*;
use crate::claims::MemoryClaimStore;
use crate::model::Document;
use crate::provider::{MatchAnalysis, MockEmbedder, MockNarrativeProvider, mock::MockBehavior};

const SOURCE_CLAIMS: &str = "1. A method of producing widgets, comprising: a sensor module; \
                             and a controller unit.\n\
                             2. The method of claim 1, wherein the sensor module is optical.";

fn test_claim(number: u32, independent: bool, embedding: Option<Vec<f32>>) -> Claim {
    let mut claim = Claim::new(
        format!("claim-{number}"),
        "doc-a",
        number,
        format!("A method of processing data, variant {number}"),
    );
    if !independent {
        claim = claim.with_dependency(1);
    }
    if let Some(embedding) = embedding {
        claim = claim.with_embedding(embedding);
    }
    claim
}

fn comparator() -> ClaimComparator<Arc<MockEmbedder>, Arc<MemoryClaimStore>> {
    let processor = ClaimProcessor::new(
        Arc::new(MockEmbedder::new(8)),
        Arc::new(MemoryClaimStore::new()),
    );
    ClaimComparator::new(processor, ComparatorConfig::default())
}

fn document_fixture() -> (
    Arc<MemoryClaimStore>,
    ClaimComparator<Arc<MockEmbedder>, Arc<MemoryClaimStore>>,
) {
    let store = Arc::new(MemoryClaimStore::new());
    store.upsert_document(
        Document::new("doc-a", "Widget Press", "A press for widgets.")
            .with_claims_text(SOURCE_CLAIMS),
    );
    store.upsert_document(
        Document::new("doc-b", "Widget Stamper", "A stamper for widgets.")
            .with_claims_text(SOURCE_CLAIMS),
    );
    store.upsert_document(Document::new("doc-empty", "Prose Only", "No claims here."));
    let processor = ClaimProcessor::new(Arc::new(MockEmbedder::new(8)), Arc::clone(&store));
    (
        store,
        ClaimComparator::new(processor, ComparatorConfig::default()),
    )
}

#[test]
fn claims_without_embeddings_produce_no_matches() {
    let comparator = comparator();
    let source = vec![test_claim(1, true, None)];
    let target = vec![test_claim(1, true, Some(vec![1.0, 0.0]))];

    let result = comparator.compare_claims(&source, &target, 0.0).unwrap();

    assert!(result.matches.is_empty());
    assert_eq!(result.stats, ComparisonStats::empty());
    assert_eq!(result.stats.overall_risk, RiskLevel::Low);
}

#[test]
fn self_comparison_scores_high_risk() {
    let comparator = comparator();
    let claims = vec![
        test_claim(1, true, Some(vec![0.3, 0.7, 0.1])),
        test_claim(2, false, Some(vec![0.9, 0.2, 0.4])),
    ];

    let result = comparator.compare_claims(&claims, &claims, 0.0).unwrap();

    assert!((result.stats.highest_similarity - 1.0).abs() < 1e-6);
    assert_eq!(result.stats.overall_risk, RiskLevel::High);
}

#[test]
fn matches_are_sorted_descending_with_stable_ties() {
    let comparator = comparator();
    let source = vec![
        test_claim(1, true, Some(vec![1.0, 0.0])),
        test_claim(2, true, Some(vec![1.0, 0.0])),
    ];
    let target = vec![
        test_claim(1, true, Some(vec![1.0, 0.0])),
        test_claim(2, true, Some(vec![1.0, 0.0])),
    ];

    let result = comparator.compare_claims(&source, &target, 0.0).unwrap();

    let order: Vec<(u32, u32)> = result
        .matches
        .iter()
        .map(|m| (m.source.number, m.target.number))
        .collect();
    assert_eq!(order, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
}

#[test]
fn min_similarity_filters_weak_pairs() {
    let comparator = comparator();
    let source = vec![test_claim(1, true, Some(vec![1.0, 0.0]))];
    let target = vec![
        test_claim(1, true, Some(vec![1.0, 0.0])),
        test_claim(2, true, Some(vec![0.0, 1.0])),
    ];

    let result = comparator.compare_claims(&source, &target, 0.5).unwrap();

    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].target.number, 1);
}

#[test]
fn opposed_vectors_clamp_to_zero() {
    let comparator = comparator();
    let source = vec![test_claim(1, true, Some(vec![1.0, 0.0]))];
    let target = vec![test_claim(1, true, Some(vec![-1.0, 0.0]))];

    let result = comparator.compare_claims(&source, &target, 0.0).unwrap();

    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].similarity, 0.0);
}

#[test]
fn independent_claims_at_risk_counts_distinct_source_numbers() {
    let comparator = comparator();
    // Claim 1 (independent) matches both targets strongly; counting
    // distinct numbers keeps it at one. The dependent claim never counts.
    let source = vec![
        test_claim(1, true, Some(vec![1.0, 0.0])),
        test_claim(2, false, Some(vec![1.0, 0.0])),
    ];
    let target = vec![
        test_claim(1, true, Some(vec![1.0, 0.0])),
        test_claim(2, true, Some(vec![1.0, 0.1])),
    ];

    let result = comparator.compare_claims(&source, &target, 0.0).unwrap();

    assert_eq!(result.stats.independent_claims_at_risk, 1);
}

#[test]
fn stats_track_medium_matches_even_when_overall_is_medium() {
    let comparator = comparator();
    // Similarity ~0.707 sits between the medium (0.6) and high (0.8)
    // boundaries.
    let source = vec![test_claim(1, true, Some(vec![1.0, 0.0]))];
    let target = vec![test_claim(1, true, Some(vec![1.0, 1.0]))];

    let result = comparator.compare_claims(&source, &target, 0.0).unwrap();

    assert_eq!(result.stats.overall_risk, RiskLevel::Medium);
    assert_eq!(result.stats.independent_claims_at_risk, 1);
}

#[test]
fn average_covers_all_kept_matches() {
    let comparator = comparator();
    let source = vec![test_claim(1, true, Some(vec![1.0, 0.0]))];
    let target = vec![
        test_claim(1, true, Some(vec![1.0, 0.0])),
        test_claim(2, true, Some(vec![0.0, 1.0])),
    ];

    let result = comparator.compare_claims(&source, &target, 0.0).unwrap();

    assert_eq!(result.matches.len(), 2);
    assert!((result.stats.average_similarity - 0.5).abs() < 1e-6);
}

#[test]
fn repeated_comparison_of_embedded_sets_is_identical() {
    let comparator = comparator();
    let source = vec![
        test_claim(1, true, Some(vec![0.9, 0.1, 0.3])),
        test_claim(2, false, Some(vec![0.2, 0.8, 0.5])),
    ];
    let target = vec![
        test_claim(1, true, Some(vec![0.7, 0.2, 0.4])),
        test_claim(2, true, Some(vec![0.1, 0.9, 0.2])),
    ];

    let first = comparator.compare_claims(&source, &target, 0.0).unwrap();
    let second = comparator.compare_claims(&source, &target, 0.0).unwrap();

    assert_eq!(first.stats, second.stats);
    let order = |c: &ClaimComparison| {
        c.matches
            .iter()
            .map(|m| (m.source.number, m.target.number, m.similarity))
            .collect::<Vec<_>>()
    };
    assert_eq!(order(&first), order(&second));
}

#[test]
fn out_of_range_min_similarity_is_rejected() {
    let comparator = comparator();
    let err = comparator
        .compare_claims(&[], &[], 1.5)
        .expect_err("should reject");
    assert!(matches!(err, CompareError::InvalidInput { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn missing_claims_short_circuit_to_unknown() {
    let (_store, comparator) = document_fixture();

    let analysis = comparator
        .compare_documents("doc-a", "doc-empty", false)
        .await
        .unwrap();

    assert_eq!(analysis.overall_risk, RiskLevel::Unknown);
    assert!(analysis.top_matches.is_empty());
    assert_eq!(analysis.summary, UNPARSED_SUMMARY);
    assert_eq!(analysis.recommendation, UNPARSED_RECOMMENDATION);
}

#[tokio::test]
async fn identical_documents_score_high() {
    let (_store, comparator) = document_fixture();

    let analysis = comparator
        .compare_documents("doc-a", "doc-b", false)
        .await
        .unwrap();

    assert_eq!(analysis.source_claims_count, 2);
    assert_eq!(analysis.target_claims_count, 2);
    assert!((analysis.highest_similarity - 1.0).abs() < 1e-5);
    assert_eq!(analysis.overall_risk, RiskLevel::High);
    assert_eq!(analysis.independent_claims_at_risk, 1);
}

#[tokio::test]
async fn repeated_comparison_is_stable() {
    let (_store, comparator) = document_fixture();

    let first = comparator
        .compare_documents("doc-a", "doc-b", false)
        .await
        .unwrap();
    let second = comparator
        .compare_documents("doc-a", "doc-b", false)
        .await
        .unwrap();

    assert_eq!(first.highest_similarity, second.highest_similarity);
    assert_eq!(first.top_matches.len(), second.top_matches.len());
    let first_ids: Vec<&str> = first.top_matches.iter().map(|m| m.source.id.as_str()).collect();
    let second_ids: Vec<&str> = second.top_matches.iter().map(|m| m.source.id.as_str()).collect();
    assert_eq!(first_ids, second_ids);
}

#[tokio::test]
async fn narrative_enrichment_attaches_assessments() {
    let (_store, comparator) = document_fixture();
    let narrative = Arc::new(MockNarrativeProvider::new().with_match_analysis(MatchAnalysis {
        summary: "Substantial overlap.".to_string(),
        recommendation: "Seek counsel.".to_string(),
        match_assessments: vec!["Nearly identical scope.".to_string()],
    }));
    let comparator = comparator.with_narrative(Arc::clone(&narrative));

    let analysis = comparator
        .compare_documents("doc-a", "doc-b", true)
        .await
        .unwrap();

    assert_eq!(analysis.summary, "Substantial overlap.");
    assert_eq!(analysis.recommendation, "Seek counsel.");
    assert_eq!(
        analysis.top_matches[0].assessment.as_deref(),
        Some("Nearly identical scope.")
    );
    assert!(analysis.top_matches[1].assessment.is_none());
    assert_eq!(narrative.call_count(), 1);
}

#[tokio::test]
async fn narrative_failure_degrades_to_fixed_text() {
    let (_store, comparator) = document_fixture();
    let narrative = Arc::new(MockNarrativeProvider::new());
    narrative.set_behavior(MockBehavior::Unavailable);
    let comparator = comparator.with_narrative(Arc::clone(&narrative));

    let analysis = comparator
        .compare_documents("doc-a", "doc-b", true)
        .await
        .unwrap();

    assert_eq!(analysis.summary, "Narrative analysis unavailable.");
    assert_eq!(analysis.overall_risk, RiskLevel::High);
    assert!(analysis.top_matches[0].assessment.is_none());
}

#[tokio::test]
async fn narrative_skipped_when_not_requested() {
    let (_store, comparator) = document_fixture();
    let narrative = Arc::new(MockNarrativeProvider::new());
    let comparator = comparator.with_narrative(Arc::clone(&narrative));

    let analysis = comparator
        .compare_documents("doc-a", "doc-b", false)
        .await
        .unwrap();

    assert!(analysis.summary.is_empty());
    assert_eq!(narrative.call_count(), 0);
}
