use crate::records::CdrRecord;
use anyhow::Result;
use async_trait::async_trait;

/// Storage contract for call detail records.
///
/// Writes are append-only batches, de-duplicated by `reference`; reads are
/// full snapshots in ascending `reference` order so that "first
/// encountered" tie-breaking behaves the same on every backend.
#[async_trait]
pub trait CdrStore: Send + Sync {
    /// Appends a batch of records, skipping any whose `reference` is
    /// already present. Returns the number of records actually written.
    async fn append_batch(&self, records: Vec<CdrRecord>) -> Result<u64>;

    /// Returns the full record set, ordered by `reference` ascending.
    async fn snapshot(&self) -> Result<Vec<CdrRecord>>;
}
