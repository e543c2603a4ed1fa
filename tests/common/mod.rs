//! Shared pipeline harness for integration tests: mock providers and
//! index wired exactly as the production components expect them.

use std::sync::Arc;

use claimscope::{
    ClaimComparator, ClaimProcessor, ComparatorConfig, Document, HybridSearchEngine,
    LocatorConfig, MemoryClaimStore, MockEmbedder, MockIndex, PriorArtLocator, SearchConfig,
};

pub const EMBEDDING_DIM: usize = 64;

pub struct Pipeline {
    pub embedder: Arc<MockEmbedder>,
    pub index: Arc<MockIndex>,
    pub store: Arc<MemoryClaimStore>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            embedder: Arc::new(MockEmbedder::new(EMBEDDING_DIM)),
            index: Arc::new(MockIndex::new()),
            store: Arc::new(MemoryClaimStore::new()),
        }
    }

    pub fn processor(&self) -> ClaimProcessor<Arc<MockEmbedder>, Arc<MemoryClaimStore>> {
        ClaimProcessor::new(Arc::clone(&self.embedder), Arc::clone(&self.store))
    }

    pub fn comparator(&self) -> ClaimComparator<Arc<MockEmbedder>, Arc<MemoryClaimStore>> {
        ClaimComparator::new(self.processor(), ComparatorConfig::default())
    }

    pub fn search_engine(
        &self,
        config: SearchConfig,
    ) -> HybridSearchEngine<Arc<MockEmbedder>, Arc<MockIndex>, Arc<MockIndex>, Arc<MemoryClaimStore>>
    {
        HybridSearchEngine::new(
            Arc::clone(&self.embedder),
            Arc::clone(&self.index),
            Arc::clone(&self.index),
            Arc::clone(&self.store),
            config,
        )
    }

    pub fn locator(&self) -> PriorArtLocator<Arc<MockEmbedder>, Arc<MockIndex>, Arc<MemoryClaimStore>> {
        PriorArtLocator::new(
            Arc::clone(&self.embedder),
            Arc::clone(&self.index),
            Arc::clone(&self.store),
            LocatorConfig::default(),
        )
    }

    /// Stores a document, regenerates its claims through the processor,
    /// and indexes every claim embedding.
    pub async fn seed_document(&self, document: Document) {
        let id = document.id.clone();
        self.store.upsert_document(document);
        let claims = self
            .processor()
            .process_document(&id)
            .await
            .expect("seeding claims");
        for claim in claims {
            if let Some(embedding) = claim.embedding {
                self.index.insert_claim(&claim.id, embedding);
            }
        }
    }
}
