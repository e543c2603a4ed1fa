use super::cached::CachedEmbedder;
use super::error::ProviderError;
use super::mock::{MockBehavior, MockEmbedder};
use super::narrative::{FreedomAnalysis, MatchAnalysis, extract_fenced_json};
use super::EmbeddingProvider;

#[test]
fn test_extract_json_fenced_block() {
    let content = r#"Here is the analysis:
```json
{"summary": "High overlap.", "recommendation": "Consult counsel.", "match_assessments": ["a", "b"]}
```
Hope that helps."#;

    let analysis: MatchAnalysis = extract_fenced_json(content).expect("should parse");
    assert_eq!(analysis.summary, "High overlap.");
    assert_eq!(analysis.match_assessments.len(), 2);
}

#[test]
fn test_extract_json_bare_fence() {
    let content = "```\n{\"freedom_to_operate\": \"likely\", \"recommendation\": \"Proceed.\"}\n```";
    let analysis: FreedomAnalysis = extract_fenced_json(content).expect("should parse");
    assert_eq!(analysis.freedom_to_operate, "likely");
    // Missing arrays default to empty.
    assert!(analysis.key_risks.is_empty());
}

#[test]
fn test_extract_json_unfenced() {
    let content = r#"{"summary": "s", "recommendation": "r", "match_assessments": []}"#;
    let analysis: MatchAnalysis = extract_fenced_json(content).expect("should parse");
    assert_eq!(analysis.summary, "s");
}

#[test]
fn test_extract_json_prose_is_malformed() {
    let result: Result<MatchAnalysis, _> =
        extract_fenced_json("I cannot produce JSON today, sorry.");
    match result {
        Err(ProviderError::MalformedResponse { .. }) => {}
        other => panic!("expected malformed response, got {other:?}"),
    }
}

#[test]
fn test_malformed_is_not_retryable() {
    let result: Result<MatchAnalysis, _> = extract_fenced_json("nope");
    let err = result.expect_err("must fail");
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_mock_embedder_is_deterministic() {
    let embedder = MockEmbedder::new(64);
    let a = embedder.embed("a method for sorting").await.expect("embed");
    let b = embedder.embed("a method for sorting").await.expect("embed");
    let c = embedder.embed("something else").await.expect("embed");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), 64);
}

#[tokio::test]
async fn test_cached_embedder_hits_inner_once() {
    let cached = CachedEmbedder::new(MockEmbedder::new(32));

    let first = cached.embed("same text").await.expect("embed");
    let second = cached.embed("same text").await.expect("embed");

    assert_eq!(first, second);
    assert_eq!(cached.inner().call_count(), 1);
}

#[tokio::test]
async fn test_cached_embedder_distinct_texts_miss() {
    let cached = CachedEmbedder::new(MockEmbedder::new(32));

    cached.embed("one").await.expect("embed");
    cached.embed("two").await.expect("embed");

    assert_eq!(cached.inner().call_count(), 2);
}

#[tokio::test]
async fn test_cached_embedder_propagates_errors_uncached() {
    let cached = CachedEmbedder::new(MockEmbedder::new(32));
    cached.inner().set_behavior(MockBehavior::Unavailable);

    let err = cached.embed("text").await.expect_err("must fail");
    assert!(err.is_retryable());

    // Recovery: the failure was not cached.
    cached.inner().set_behavior(MockBehavior::Succeed);
    cached.embed("text").await.expect("embed after recovery");
}

#[tokio::test]
async fn test_mock_embedder_timeout_is_retryable() {
    let embedder = MockEmbedder::new(8);
    embedder.set_behavior(MockBehavior::Timeout);
    let err = embedder.embed("x").await.expect_err("must fail");
    assert!(err.is_retryable());
}
