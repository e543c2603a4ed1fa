use super::mock::MockIndex;
use super::{ScoredId, TextScorer, VectorIndex};

#[tokio::test]
async fn test_mock_index_ranks_documents_by_cosine() {
    let index = MockIndex::new();
    index.insert_document("far", vec![0.0, 1.0]);
    index.insert_document("near", vec![1.0, 0.05]);
    index.insert_document("exact", vec![1.0, 0.0]);

    let results = index
        .nearest_documents(&[1.0, 0.0], 10)
        .await
        .expect("search");

    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["exact", "near", "far"]);
    assert!((results[0].score - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_mock_index_negative_cosine_clamped() {
    let index = MockIndex::new();
    index.insert_claim("opposite", vec![-1.0, 0.0]);

    let results = index.nearest_claims(&[1.0, 0.0], 10).await.expect("search");
    assert_eq!(results[0].score, 0.0);
}

#[tokio::test]
async fn test_mock_index_respects_limit() {
    let index = MockIndex::new();
    for i in 0..10 {
        index.insert_document(&format!("d{i}"), vec![1.0, i as f32 / 10.0]);
    }

    let results = index.nearest_documents(&[1.0, 0.0], 3).await.expect("search");
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn test_mock_index_fuzzy_replays_canned_results() {
    let index = MockIndex::new();
    index.set_fuzzy_results(
        "turbine",
        vec![ScoredId::new("a", 0.9), ScoredId::new("b", 0.5)],
    );

    let results = index.fuzzy_scores("turbine", 10).await.expect("scores");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, "a");

    let empty = index.fuzzy_scores("unseen query", 10).await.expect("scores");
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_mock_index_failure_mode() {
    let index = MockIndex::new();
    index.set_failing(true);
    assert!(index.nearest_documents(&[1.0], 5).await.is_err());
    assert!(index.fuzzy_scores("q", 5).await.is_err());
}
