//! Storage backends and CSV ingestion for CDR analytics.
//!
//! This crate provides:
//! - A `PostgreSQL`-backed implementation of the `CdrStore` contract
//! - An in-memory implementation for tests and database-free runs
//! - The CSV ingestion adapter with its fixed column mapping

pub mod csv_loader;
pub mod database;
pub mod memory;

pub use csv_loader::{CsvLoader, IngestError};
pub use database::PgCdrStore;
pub use memory::MemoryCdrStore;
