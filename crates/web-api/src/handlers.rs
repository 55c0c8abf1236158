use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cdr_analytics_core::{CdrRecord, CostByCurrency, DailySummary, TopCaller};
use cdr_analytics_data::CsvLoader;

use crate::error::ApiError;
use crate::server::AppState;

#[derive(Deserialize)]
pub struct TopCallersParams {
    #[serde(default = "default_top_n")]
    pub n: i64,
}

const fn default_top_n() -> i64 {
    5
}

#[derive(Deserialize)]
pub struct CountParams {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Deserialize)]
pub struct RecipientParams {
    pub recipient: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageCallsPerDayResponse {
    pub average_calls_per_day: f64,
}

#[derive(Serialize)]
pub struct CountResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub count: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalDurationResponse {
    pub recipient: String,
    pub total_duration: i64,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Ingests a CSV upload into the record store.
///
/// # Errors
/// Returns 400 for an empty body or any unparseable row, 500 if the store
/// rejects the batch.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<String, ApiError> {
    let records = CsvLoader::parse(&body).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let written = state
        .store
        .append_batch(records)
        .await
        .map_err(|e| ApiError::internal(&e))?;

    Ok(format!("{written} records uploaded successfully."))
}

/// Mean cost across all records.
///
/// # Errors
/// Returns 404 when no records have been ingested.
pub async fn average_cost(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Decimal>, ApiError> {
    Ok(Json(state.engine.average_cost().await?))
}

/// The most expensive call.
///
/// # Errors
/// Returns 404 when the store is empty.
pub async fn max_cost(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CdrRecord>, ApiError> {
    let record = state.engine.max_cost_call().await?;
    record.map(Json).ok_or_else(ApiError::not_found)
}

/// The longest call.
///
/// # Errors
/// Returns 404 when the store is empty.
pub async fn longest_call(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CdrRecord>, ApiError> {
    let record = state.engine.longest_call().await?;
    record.map(Json).ok_or_else(ApiError::not_found)
}

/// Mean number of calls per distinct calendar day.
///
/// # Errors
/// Returns 500 if the store read fails.
pub async fn average_calls_per_day(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AverageCallsPerDayResponse>, ApiError> {
    let average = state.engine.average_calls_per_day().await?;
    Ok(Json(AverageCallsPerDayResponse {
        average_calls_per_day: average,
    }))
}

/// Cost totals per currency.
///
/// # Errors
/// Returns 500 if the store read fails.
pub async fn total_cost_by_currency(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CostByCurrency>>, ApiError> {
    Ok(Json(state.engine.total_cost_by_currency().await?))
}

/// The `n` most frequent callers, default 5.
///
/// # Errors
/// Returns 500 if the store read fails.
pub async fn top_callers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopCallersParams>,
) -> Result<Json<Vec<TopCaller>>, ApiError> {
    Ok(Json(state.engine.top_callers(params.n).await?))
}

/// Per-day call totals, ascending by date.
///
/// # Errors
/// Returns 500 if the store read fails.
pub async fn daily_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DailySummary>>, ApiError> {
    Ok(Json(state.engine.daily_summary().await?))
}

/// Count of calls within an inclusive date range.
///
/// # Errors
/// Returns 400 when `start` is after `end`.
pub async fn call_count(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CountParams>,
) -> Result<Json<CountResponse>, ApiError> {
    if params.start > params.end {
        return Err(ApiError::bad_request(
            "Start date must be earlier than end date.",
        ));
    }

    let count = state
        .engine
        .call_count_in_range(params.start, params.end)
        .await?;
    Ok(Json(CountResponse {
        start: params.start,
        end: params.end,
        count,
    }))
}

/// Total call duration for one recipient.
///
/// # Errors
/// Returns 400 when the recipient parameter is blank.
pub async fn total_duration(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecipientParams>,
) -> Result<Json<TotalDurationResponse>, ApiError> {
    if params.recipient.trim().is_empty() {
        return Err(ApiError::bad_request("Recipient is required."));
    }

    let total = state
        .engine
        .total_duration_by_recipient(&params.recipient)
        .await?;
    Ok(Json(TotalDurationResponse {
        recipient: params.recipient,
        total_duration: total,
    }))
}

/// Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
