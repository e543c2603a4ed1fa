//! Claim lifecycle: storage contract and regeneration.
//!
//! Claims are derived artifacts. [`ClaimProcessor::process_document`]
//! deletes and recreates a document's claims from its raw claims text,
//! embedding each claim and extracting key elements.
//! [`ClaimProcessor::ensure_claims`] is the explicit precondition step
//! used before claim-level comparison: it parses on demand and is
//! idempotent with respect to claim content (ids and embeddings may
//! differ between regenerations).

pub mod error;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::ClaimsError;
pub use store::MemoryClaimStore;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::model::{Claim, Document};
use crate::parser::{ClaimParser, extract_key_elements};
use crate::provider::EmbeddingProvider;

/// Storage for documents and their claims.
///
/// Lookups return `Option`/empty rather than errors; absence is a normal
/// outcome for the callers here.
pub trait ClaimStore: Send + Sync {
    /// Fetches a document by id.
    fn document(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Option<Document>> + Send;

    /// Fetches a single claim by id.
    fn claim(
        &self,
        claim_id: &str,
    ) -> impl std::future::Future<Output = Option<Claim>> + Send;

    /// All claims of a document, ascending by claim number.
    fn claims_for(
        &self,
        document_id: &str,
    ) -> impl std::future::Future<Output = Vec<Claim>> + Send;

    /// Replaces a document's claims wholesale (delete-then-recreate).
    fn replace_claims(
        &self,
        document_id: &str,
        claims: Vec<Claim>,
    ) -> impl std::future::Future<Output = ()> + Send;
}

impl<T: ClaimStore> ClaimStore for std::sync::Arc<T> {
    async fn document(&self, id: &str) -> Option<Document> {
        self.as_ref().document(id).await
    }

    async fn claim(&self, claim_id: &str) -> Option<Claim> {
        self.as_ref().claim(claim_id).await
    }

    async fn claims_for(&self, document_id: &str) -> Vec<Claim> {
        self.as_ref().claims_for(document_id).await
    }

    async fn replace_claims(&self, document_id: &str, claims: Vec<Claim>) {
        self.as_ref().replace_claims(document_id, claims).await;
    }
}

/// Text a claim is embedded as: the number prefix gives the model context.
pub fn claim_embedding_text(number: u32, text: &str) -> String {
    format!("Patent Claim {number}: {text}")
}

/// Parses, embeds, and stores claims for documents.
pub struct ClaimProcessor<E, S> {
    parser: ClaimParser,
    embedder: E,
    store: S,
}

impl<E, S> std::fmt::Debug for ClaimProcessor<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimProcessor").finish_non_exhaustive()
    }
}

impl<E, S> ClaimProcessor<E, S>
where
    E: EmbeddingProvider,
    S: ClaimStore,
{
    pub fn new(embedder: E, store: S) -> Self {
        Self {
            parser: ClaimParser::new(),
            embedder,
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a document's claims, regenerating them first if none exist.
    pub async fn ensure_claims(&self, document_id: &str) -> Result<Vec<Claim>, ClaimsError> {
        let existing = self.store.claims_for(document_id).await;
        if !existing.is_empty() {
            return Ok(existing);
        }
        self.process_document(document_id).await
    }

    /// Regenerates a document's claims from its raw claims text.
    ///
    /// Yields an empty set when the document has no claims text or the
    /// text parses to nothing; that is a normal terminal state, not an
    /// error. A failed embedding downgrades that one claim to
    /// embedding-less instead of aborting the batch.
    pub async fn process_document(&self, document_id: &str) -> Result<Vec<Claim>, ClaimsError> {
        let document =
            self.store
                .document(document_id)
                .await
                .ok_or_else(|| ClaimsError::DocumentNotFound {
                    id: document_id.to_string(),
                })?;

        let Some(claims_text) = document.claims_text.as_deref() else {
            self.store.replace_claims(document_id, Vec::new()).await;
            return Ok(Vec::new());
        };

        let parsed = self.parser.parse(claims_text);
        if parsed.is_empty() {
            debug!(document_id, "claims text parsed to nothing");
            self.store.replace_claims(document_id, Vec::new()).await;
            return Ok(Vec::new());
        }

        let mut claims = Vec::with_capacity(parsed.len());
        for p in parsed {
            let embedding = match self
                .embedder
                .embed(&claim_embedding_text(p.number, &p.text))
                .await
            {
                Ok(vector) => Some(vector),
                Err(e) => {
                    warn!(
                        document_id,
                        claim_number = p.number,
                        error = %e,
                        "claim embedding failed; storing claim without embedding"
                    );
                    None
                }
            };

            let key_elements = extract_key_elements(&p.text);

            let mut claim = Claim::new(Uuid::new_v4().to_string(), document_id, p.number, p.text)
                .with_key_elements(key_elements);
            if let Some(parent) = p.parent_number {
                claim = claim.with_dependency(parent);
            }
            if let Some(claim_type) = p.claim_type {
                claim = claim.with_claim_type(claim_type);
            }
            if let Some(embedding) = embedding {
                claim = claim.with_embedding(embedding);
            }

            claims.push(claim);
        }

        debug!(
            document_id,
            claim_count = claims.len(),
            "regenerated claims"
        );

        self.store.replace_claims(document_id, claims.clone()).await;
        Ok(claims)
    }
}
