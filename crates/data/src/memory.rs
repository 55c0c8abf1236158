use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use cdr_analytics_core::{CdrRecord, CdrStore};

/// In-memory record store. Backs the engine's tests and the server's
/// database-free mode with the same key-dedup semantics as the
/// `PostgreSQL` store.
#[derive(Default)]
pub struct MemoryCdrStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    records: Vec<CdrRecord>,
    seen: HashSet<String>,
}

impl MemoryCdrStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CdrStore for MemoryCdrStore {
    async fn append_batch(&self, records: Vec<CdrRecord>) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let mut written = 0u64;
        for record in records {
            if inner.seen.insert(record.reference.clone()) {
                inner.records.push(record);
                written += 1;
            }
        }
        Ok(written)
    }

    async fn snapshot(&self) -> Result<Vec<CdrRecord>> {
        let inner = self.inner.read().await;
        let mut records = inner.records.clone();
        records.sort_by(|a, b| a.reference.cmp(&b.reference));
        Ok(records)
    }
}
