//! Read-only aggregation over the full CDR snapshot.
//!
//! Every operation is a pure function of the store's contents at call
//! time: take a snapshot, group/reduce in process, return a scalar or a
//! small ranked result set. No caching, no incremental state.

pub mod aggregate;
pub mod engine;
pub mod error;

pub use engine::InsightsEngine;
pub use error::{InsightsError, Result};
