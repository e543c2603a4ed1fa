mod common;

use common::Pipeline;

use claimscope::{
    ClaimStore, Document, MatchAnalysis, MatchType, MockNarrativeProvider, RiskLevel,
    ScoredId, SearchConfig, SearchQuery,
};
use std::sync::Arc;

const PRESS_CLAIMS: &str = "\
1. A method of forming a widget, comprising: pressing a blank with a hydraulic ram; \
and curing the widget in a thermal chamber.
2. The method of claim 1, wherein the hydraulic ram is servo-controlled.
3. An apparatus for forming widgets, comprising: a hydraulic ram; a thermal chamber; \
and a controller coupled to both.";

const FILTER_CLAIMS: &str = "\
1. A composition for filtering water, comprising: activated carbon granules; \
and a polymer binder holding the granules in a porous matrix.";

const INVENTION: &str = "\
A widget forming process in which a blank is pressed by a hydraulic ram and then \
cured inside a thermal chamber controlled by a feedback loop.";

fn press_document(id: &str) -> Document {
    Document::new(id, "Widget Forming Press", "Forms widgets by pressing and curing.")
        .with_patent_number(format!("US-{id}"))
        .with_claims_text(PRESS_CLAIMS)
}

#[tokio::test]
async fn claims_regenerate_through_the_full_pipeline() {
    let pipeline = Pipeline::new();
    pipeline.seed_document(press_document("press-a")).await;

    let claims = pipeline.store.claims_for("press-a").await;
    assert_eq!(claims.len(), 3);
    assert!(claims[0].is_independent);
    assert_eq!(claims[1].parent_number, Some(1));
    assert!(claims.iter().all(|c| c.embedding.is_some()));
    assert!(!claims[0].key_elements.is_empty());
}

#[tokio::test]
async fn identical_patents_compare_as_high_risk() {
    let pipeline = Pipeline::new();
    pipeline.seed_document(press_document("press-a")).await;
    pipeline.seed_document(press_document("press-b")).await;

    let analysis = pipeline
        .comparator()
        .compare_documents("press-a", "press-b", false)
        .await
        .unwrap();

    assert_eq!(analysis.source_claims_count, 3);
    assert!((analysis.highest_similarity - 1.0).abs() < 1e-5);
    assert_eq!(analysis.overall_risk, RiskLevel::High);
    assert!(analysis.independent_claims_at_risk >= 1);
}

#[tokio::test]
async fn comparison_parses_unprocessed_documents_on_demand() {
    let pipeline = Pipeline::new();
    // Stored but never run through the processor.
    pipeline.store.upsert_document(press_document("press-a"));
    pipeline.store.upsert_document(press_document("press-b"));

    let analysis = pipeline
        .comparator()
        .compare_documents("press-a", "press-b", false)
        .await
        .unwrap();

    assert_eq!(analysis.source_claims_count, 3);
    assert_eq!(analysis.overall_risk, RiskLevel::High);
    // The on-demand parse persisted the claims.
    assert_eq!(pipeline.store.claims_for("press-a").await.len(), 3);
}

#[tokio::test]
async fn comparison_with_narrative_enrichment() {
    let pipeline = Pipeline::new();
    pipeline.seed_document(press_document("press-a")).await;
    pipeline.seed_document(press_document("press-b")).await;

    let narrative = Arc::new(MockNarrativeProvider::new().with_match_analysis(MatchAnalysis {
        summary: "The claim sets are effectively identical.".to_string(),
        recommendation: "Escalate to counsel.".to_string(),
        match_assessments: vec!["Same ram-and-chamber method.".to_string()],
    }));
    let comparator = pipeline.comparator().with_narrative(Arc::clone(&narrative));

    let analysis = comparator
        .compare_documents("press-a", "press-b", true)
        .await
        .unwrap();

    assert_eq!(analysis.summary, "The claim sets are effectively identical.");
    assert!(analysis.top_matches[0].assessment.is_some());
    assert_eq!(narrative.call_count(), 1);
}

#[tokio::test]
async fn hybrid_search_returns_stored_documents() {
    let pipeline = Pipeline::new();
    pipeline.seed_document(press_document("press-a")).await;
    pipeline
        .seed_document(
            Document::new("filter-a", "Water Filter", "Filters water through carbon.")
                .with_claims_text(FILTER_CLAIMS),
        )
        .await;

    let mut press_vector = vec![0.0; common::EMBEDDING_DIM];
    press_vector[0] = 1.0;
    let mut filter_vector = vec![0.0; common::EMBEDDING_DIM];
    filter_vector[1] = 1.0;
    pipeline.index.insert_document("press-a", press_vector.clone());
    pipeline.index.insert_document("filter-a", filter_vector);

    let query = "hydraulic widget press";
    pipeline.embedder.register(query, press_vector);
    pipeline
        .index
        .set_fuzzy_results(query, vec![ScoredId::new("press-a", 0.9)]);

    let engine = pipeline.search_engine(SearchConfig::default());
    let results = engine.search(&SearchQuery::new(query)).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document.id, "press-a");
    assert_eq!(results[0].document.title, "Widget Forming Press");
    assert_eq!(results[0].match_type, MatchType::Hybrid);
    assert!(results[0].combined_score > 0.9);
}

#[tokio::test]
async fn prior_art_finds_the_blocking_patent() {
    let pipeline = Pipeline::new();
    pipeline.seed_document(press_document("press-a")).await;
    pipeline
        .seed_document(
            Document::new("filter-a", "Water Filter", "Filters water through carbon.")
                .with_claims_text(FILTER_CLAIMS),
        )
        .await;

    // Point the invention embedding straight at the first press claim.
    let press_claims = pipeline.store.claims_for("press-a").await;
    let target = press_claims[0].embedding.clone().expect("seeded embedding");
    pipeline.embedder.register(INVENTION, target);

    let report = pipeline.locator().locate(INVENTION, 10, false).await.unwrap();

    let top = &report.groups[0];
    assert_eq!(top.document.id, "press-a");
    assert!((top.max_similarity - 1.0).abs() < 1e-5);
    assert_eq!(top.risk, RiskLevel::High);
    assert_eq!(top.claims[0].claim.number, 1);
}

#[tokio::test]
async fn reprocessing_replaces_claims_wholesale() {
    let pipeline = Pipeline::new();
    pipeline.seed_document(press_document("press-a")).await;
    assert_eq!(pipeline.store.claims_for("press-a").await.len(), 3);

    // The amended filing carries a single claim.
    pipeline.store.upsert_document(
        press_document("press-a").with_claims_text(
            "1. A method of forming a widget by pressing a blank with a hydraulic ram.",
        ),
    );
    let claims = pipeline
        .processor()
        .process_document("press-a")
        .await
        .unwrap();

    assert_eq!(claims.len(), 1);
    assert_eq!(pipeline.store.claims_for("press-a").await.len(), 1);
}
