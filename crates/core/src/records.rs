//! Call detail record model and derived aggregate shapes.
//!
//! `CdrRecord` is the single persisted entity; the remaining types are
//! produced by the insights engine and serialized straight onto the HTTP
//! surface, hence the camelCase field names.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One logged phone call event.
///
/// `reference` is the entity key; the store never holds two records with
/// the same reference. Everything else is carried as ingested, including
/// zero durations and empty caller ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdrRecord {
    /// Unique identifier of the call.
    pub reference: String,
    /// Originating party.
    pub caller_id: String,
    /// Destination party.
    pub recipient: String,
    /// Calendar day the call took place. Only the date component is ever
    /// significant for aggregation, so no time-of-day is stored here.
    pub call_date: NaiveDate,
    /// Time of day the call ended. Carried through unchanged; no
    /// aggregation reads it.
    pub end_time: NaiveTime,
    /// Call length in seconds.
    pub duration: i32,
    /// Monetary cost of the call, 3-decimal precision.
    pub cost: Decimal,
    /// ISO-like currency code for `cost`.
    pub currency: String,
}

/// Total cost accumulated for one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostByCurrency {
    pub currency: String,
    pub total_cost: Decimal,
}

/// Call count for one caller, used in top-N rankings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCaller {
    pub caller_id: String,
    pub call_count: i64,
}

/// Per-day totals across all calls on that day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_calls: i64,
    pub total_duration: i64,
    pub total_cost: Decimal,
}
