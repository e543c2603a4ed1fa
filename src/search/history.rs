//! Query history recording.
//!
//! History is observational: a sink never returns an error and a slow or
//! absent sink must never affect search results, so recording runs on a
//! detached task after the response is assembled.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed search, as remembered by a sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    pub query: String,
    pub result_count: usize,
    /// Combined score of the best hit; `0.0` when nothing matched.
    pub top_score: f32,
    pub latency_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Receives completed-search records.
pub trait QueryHistorySink: Send + Sync {
    fn record(&self, record: QueryRecord) -> impl std::future::Future<Output = ()> + Send;
}

impl<T: QueryHistorySink> QueryHistorySink for std::sync::Arc<T> {
    fn record(&self, record: QueryRecord) -> impl std::future::Future<Output = ()> + Send {
        T::record(self, record)
    }
}

/// In-memory sink, newest record last.
#[derive(Debug, Default)]
pub struct MemoryQueryHistory {
    records: RwLock<Vec<QueryRecord>>,
}

impl MemoryQueryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent `n` records, newest first.
    pub fn recent(&self, n: usize) -> Vec<QueryRecord> {
        let records = self.records.read().expect("lock poisoned");
        records.iter().rev().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl QueryHistorySink for MemoryQueryHistory {
    async fn record(&self, record: QueryRecord) {
        self.records
            .write()
            .expect("lock poisoned")
            .push(record);
    }
}
