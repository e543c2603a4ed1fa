//! In-memory reference implementation of [`ClaimStore`].

use std::collections::HashMap;
use std::sync::RwLock;

use super::ClaimStore;
use crate::model::{Claim, Document};

/// Thread-safe in-memory store for documents and claims.
#[derive(Default)]
pub struct MemoryClaimStore {
    documents: RwLock<HashMap<String, Document>>,
    claims: RwLock<HashMap<String, Vec<Claim>>>,
}

impl MemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a document.
    pub fn upsert_document(&self, document: Document) {
        self.documents
            .write()
            .expect("lock poisoned")
            .insert(document.id.clone(), document);
    }

    pub fn document_count(&self) -> usize {
        self.documents.read().expect("lock poisoned").len()
    }

}

impl ClaimStore for MemoryClaimStore {
    async fn document(&self, id: &str) -> Option<Document> {
        self.documents.read().expect("lock poisoned").get(id).cloned()
    }

    async fn claim(&self, claim_id: &str) -> Option<Claim> {
        self.claims
            .read()
            .expect("lock poisoned")
            .values()
            .flatten()
            .find(|c| c.id == claim_id)
            .cloned()
    }

    async fn claims_for(&self, document_id: &str) -> Vec<Claim> {
        self.claims
            .read()
            .expect("lock poisoned")
            .get(document_id)
            .cloned()
            .unwrap_or_default()
    }

    async fn replace_claims(&self, document_id: &str, mut claims: Vec<Claim>) {
        claims.sort_by_key(|c| c.number);
        self.claims
            .write()
            .expect("lock poisoned")
            .insert(document_id.to_string(), claims);
    }
}
