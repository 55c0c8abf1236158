//! CSV ingestion adapter.
//!
//! The column mapping is fixed: `reference`, `caller_id`, `recipient`,
//! `call_date` (dd/MM/yyyy), `end_time` (HH:MM:SS), `duration`, `cost`,
//! `currency`. Any row that fails to parse fails the whole batch; there
//! is no partial-row recovery.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use cdr_analytics_core::CdrRecord;

const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Errors raised while turning a CSV upload into typed records.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The upload had no bytes, or a header with no data rows.
    #[error("upload contains no records")]
    Empty,

    /// A row parsed as CSV but one of its fields is not valid.
    #[error("line {line}: {message}")]
    Row { line: usize, message: String },

    /// The byte stream is not well-formed CSV against the expected header.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Row as it appears on the wire, before typed conversion.
#[derive(Debug, Deserialize)]
struct RawRow {
    reference: String,
    caller_id: String,
    recipient: String,
    call_date: String,
    end_time: String,
    duration: i32,
    cost: String,
    currency: String,
}

pub struct CsvLoader;

impl CsvLoader {
    /// Parses a CSV byte stream into call records.
    ///
    /// # Errors
    /// Returns `IngestError::Empty` for an empty upload, and a row or CSV
    /// error for the first line that cannot be parsed (the whole batch is
    /// rejected).
    pub fn parse(bytes: &[u8]) -> Result<Vec<CdrRecord>, IngestError> {
        if bytes.is_empty() {
            return Err(IngestError::Empty);
        }

        let mut reader = csv::Reader::from_reader(bytes);
        let mut records = Vec::new();

        for (index, row) in reader.deserialize::<RawRow>().enumerate() {
            // line 1 is the header
            let line = index + 2;
            records.push(Self::convert(row?, line)?);
        }

        if records.is_empty() {
            return Err(IngestError::Empty);
        }

        Ok(records)
    }

    fn convert(raw: RawRow, line: usize) -> Result<CdrRecord, IngestError> {
        let call_date = NaiveDate::parse_from_str(&raw.call_date, DATE_FORMAT).map_err(|e| {
            IngestError::Row {
                line,
                message: format!("invalid call_date {:?}: {e}", raw.call_date),
            }
        })?;
        let end_time = NaiveTime::parse_from_str(&raw.end_time, TIME_FORMAT).map_err(|e| {
            IngestError::Row {
                line,
                message: format!("invalid end_time {:?}: {e}", raw.end_time),
            }
        })?;
        let cost = Decimal::from_str(&raw.cost).map_err(|e| IngestError::Row {
            line,
            message: format!("invalid cost {:?}: {e}", raw.cost),
        })?;

        Ok(CdrRecord {
            reference: raw.reference,
            caller_id: raw.caller_id,
            recipient: raw.recipient,
            call_date,
            end_time,
            duration: raw.duration,
            cost,
            currency: raw.currency,
        })
    }
}
