//! Qdrant-backed vector index.
//!
//! Two cosine-distance collections: one for document embeddings, one for
//! claim embeddings. Point ids are the entities' own string ids (UUIDs),
//! with the id mirrored into the payload so searches can recover it
//! regardless of the point-id representation.

use std::collections::HashMap;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, DeletePointsBuilder, Distance, PointStruct, PointsIdsList,
    ScoredPoint, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use tracing::debug;

use super::error::IndexError;
use super::{CLAIMS_COLLECTION, DOCUMENTS_COLLECTION, ScoredId, VectorIndex};
use crate::constants::DimConfig;

#[derive(Clone)]
/// Qdrant client wrapper managing the two claimscope collections.
pub struct QdrantIndex {
    client: Qdrant,
    url: String,
    dim: DimConfig,
}

impl QdrantIndex {
    /// Creates an index client for `url`.
    pub async fn new(url: &str, dim: DimConfig) -> Result<Self, IndexError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| IndexError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
            dim,
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), IndexError> {
        self.client
            .health_check()
            .await
            .map_err(|e| IndexError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Ensures both collections exist (creates them if missing).
    pub async fn ensure_collections(&self) -> Result<(), IndexError> {
        for collection in [DOCUMENTS_COLLECTION, CLAIMS_COLLECTION] {
            let exists = self.client.collection_exists(collection).await.map_err(|e| {
                IndexError::CreateCollectionFailed {
                    collection: collection.to_string(),
                    message: e.to_string(),
                }
            })?;

            if !exists {
                let vectors_config =
                    VectorParamsBuilder::new(self.dim.embedding_dim as u64, Distance::Cosine);
                self.client
                    .create_collection(
                        CreateCollectionBuilder::new(collection)
                            .vectors_config(vectors_config)
                            .on_disk_payload(true),
                    )
                    .await
                    .map_err(|e| IndexError::CreateCollectionFailed {
                        collection: collection.to_string(),
                        message: e.to_string(),
                    })?;
            }
        }

        Ok(())
    }

    /// Upserts a document embedding.
    pub async fn upsert_document(&self, id: &str, vector: Vec<f32>) -> Result<(), IndexError> {
        self.upsert(DOCUMENTS_COLLECTION, id, vector).await
    }

    /// Upserts a claim embedding.
    pub async fn upsert_claim(&self, id: &str, vector: Vec<f32>) -> Result<(), IndexError> {
        self.upsert(CLAIMS_COLLECTION, id, vector).await
    }

    /// Deletes claim points, e.g. before a document's claims are
    /// regenerated.
    pub async fn delete_claims(&self, ids: Vec<String>) -> Result<(), IndexError> {
        if ids.is_empty() {
            return Ok(());
        }

        let points_selector = PointsIdsList {
            ids: ids.into_iter().map(Into::into).collect(),
        };

        self.client
            .delete_points(
                DeletePointsBuilder::new(CLAIMS_COLLECTION)
                    .points(points_selector)
                    .wait(true),
            )
            .await
            .map_err(|e| IndexError::UpsertFailed {
                collection: CLAIMS_COLLECTION.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn upsert(&self, collection: &str, id: &str, vector: Vec<f32>) -> Result<(), IndexError> {
        if vector.len() != self.dim.embedding_dim {
            return Err(IndexError::InvalidDimension {
                expected: self.dim.embedding_dim,
                actual: vector.len(),
            });
        }

        let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
        payload.insert("entity_id".to_string(), id.to_string().into());

        let point = PointStruct::new(id.to_string(), vector, payload);

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, vec![point]).wait(true))
            .await
            .map_err(|e| IndexError::UpsertFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredId>, IndexError> {
        let search_builder =
            SearchPointsBuilder::new(collection, query.to_vec(), limit as u64).with_payload(true);

        let search_result = self
            .client
            .search_points(search_builder)
            .await
            .map_err(|e| IndexError::SearchFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        let results: Vec<ScoredId> = search_result
            .result
            .into_iter()
            .filter_map(scored_id_from_point)
            .collect();

        debug!(
            collection,
            requested = limit,
            returned = results.len(),
            "vector search"
        );

        Ok(results)
    }
}

fn scored_id_from_point(point: ScoredPoint) -> Option<ScoredId> {
    let id = point
        .payload
        .get("entity_id")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .or_else(|| match point.id.and_then(|pid| pid.point_id_options) {
            Some(PointIdOptions::Uuid(uuid)) => Some(uuid),
            Some(PointIdOptions::Num(n)) => Some(n.to_string()),
            None => None,
        })?;

    Some(ScoredId::new(id, point.score))
}

impl VectorIndex for QdrantIndex {
    async fn nearest_documents(
        &self,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredId>, IndexError> {
        self.search(DOCUMENTS_COLLECTION, query, limit).await
    }

    async fn nearest_claims(
        &self,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredId>, IndexError> {
        self.search(CLAIMS_COLLECTION, query, limit).await
    }
}
