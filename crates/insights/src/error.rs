use thiserror::Error;

/// Errors produced by the insights engine.
#[derive(Debug, Error)]
pub enum InsightsError {
    /// The store holds no records, so a mean cannot be formed. Aggregates
    /// with a meaningful neutral value (counts, totals) return that value
    /// instead of this error.
    #[error("no call records have been ingested")]
    EmptyDataset,

    /// The underlying record store failed.
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// Result type alias for insights operations.
pub type Result<T> = std::result::Result<T, InsightsError>;
