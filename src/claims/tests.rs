use std::sync::Arc;

use super::store::MemoryClaimStore;
use super::{ClaimProcessor, ClaimStore, claim_embedding_text};
use crate::model::{ClaimType, Document};
use crate::provider::mock::MockEmbedder;

const CLAIMS_TEXT: &str =
    "1. A method comprising a sensor array.\n2. The method of claim 1, wherein the array is linear.";

fn processor() -> ClaimProcessor<Arc<MockEmbedder>, Arc<MemoryClaimStore>> {
    let embedder = Arc::new(MockEmbedder::new(16));
    let store = Arc::new(MemoryClaimStore::new());
    ClaimProcessor::new(embedder, store)
}

fn seed_document(store: &MemoryClaimStore, id: &str, claims_text: Option<&str>) {
    let mut doc = Document::new(id, "Sensor array", "A sensor array apparatus.");
    if let Some(text) = claims_text {
        doc = doc.with_claims_text(text);
    }
    store.upsert_document(doc);
}

#[tokio::test]
async fn test_process_document_creates_structured_claims() {
    let processor = processor();
    seed_document(processor.store(), "doc-1", Some(CLAIMS_TEXT));

    let claims = processor.process_document("doc-1").await.expect("process");

    assert_eq!(claims.len(), 2);
    assert_eq!(claims[0].number, 1);
    assert!(claims[0].is_independent);
    assert_eq!(claims[0].claim_type, Some(ClaimType::Method));
    assert!(claims[0].embedding.is_some());
    assert!(!claims[0].key_elements.is_empty());

    assert_eq!(claims[1].number, 2);
    assert_eq!(claims[1].parent_number, Some(1));
    assert_eq!(claims[1].document_id, "doc-1");
}

#[tokio::test]
async fn test_process_document_persists_to_store() {
    let processor = processor();
    seed_document(processor.store(), "doc-1", Some(CLAIMS_TEXT));

    processor.process_document("doc-1").await.expect("process");

    let stored = processor.store().claims_for("doc-1").await;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].number, 1);
}

#[tokio::test]
async fn test_regeneration_keeps_content_but_not_ids() {
    let processor = processor();
    seed_document(processor.store(), "doc-1", Some(CLAIMS_TEXT));

    let first = processor.process_document("doc-1").await.expect("process");
    let second = processor.process_document("doc-1").await.expect("process");

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.number, b.number);
        assert_eq!(a.text, b.text);
        assert_eq!(a.is_independent, b.is_independent);
        // Ids are fresh each regeneration.
        assert_ne!(a.id, b.id);
    }
}

#[tokio::test]
async fn test_ensure_claims_parses_on_demand_once() {
    let processor = processor();
    seed_document(processor.store(), "doc-1", Some(CLAIMS_TEXT));

    let first = processor.ensure_claims("doc-1").await.expect("ensure");
    let second = processor.ensure_claims("doc-1").await.expect("ensure");

    assert_eq!(first.len(), 2);
    // Second call reuses the stored claims, ids included.
    assert_eq!(first[0].id, second[0].id);
}

#[tokio::test]
async fn test_missing_document_is_an_error() {
    let processor = processor();
    let err = processor
        .process_document("nope")
        .await
        .expect_err("must fail");
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_document_without_claims_text_yields_empty() {
    let processor = processor();
    seed_document(processor.store(), "doc-1", None);

    let claims = processor.process_document("doc-1").await.expect("process");
    assert!(claims.is_empty());
}

#[tokio::test]
async fn test_unparseable_claims_text_yields_empty() {
    let processor = processor();
    seed_document(
        processor.store(),
        "doc-1",
        Some("General remarks about widgets, with no numbered claims."),
    );

    let claims = processor.process_document("doc-1").await.expect("process");
    assert!(claims.is_empty());
}

#[tokio::test]
async fn test_embedding_failure_downgrades_the_claim() {
    let embedder = Arc::new(MockEmbedder::new(16));
    let store = Arc::new(MemoryClaimStore::new());
    let processor = ClaimProcessor::new(Arc::clone(&embedder), store);
    seed_document(processor.store(), "doc-1", Some(CLAIMS_TEXT));
    embedder.set_behavior(crate::provider::mock::MockBehavior::Unavailable);

    let claims = processor.process_document("doc-1").await.expect("process");

    assert_eq!(claims.len(), 2);
    assert!(claims.iter().all(|c| c.embedding.is_none()));
}

#[tokio::test]
async fn test_claims_resolve_by_their_own_id() {
    let processor = processor();
    seed_document(processor.store(), "doc-1", Some(CLAIMS_TEXT));
    let claims = processor.process_document("doc-1").await.expect("process");

    let found = processor.store().claim(&claims[1].id).await.expect("claim");
    assert_eq!(found.number, 2);
    assert!(processor.store().claim("nope").await.is_none());
}

#[test]
fn test_claim_embedding_text_prefix() {
    assert_eq!(
        claim_embedding_text(3, "A method."),
        "Patent Claim 3: A method."
    );
}
