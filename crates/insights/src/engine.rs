use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use cdr_analytics_core::{CdrRecord, CdrStore, CostByCurrency, DailySummary, TopCaller};

use crate::aggregate;
use crate::error::{InsightsError, Result};

/// Stateless aggregation operations over the current record snapshot.
///
/// The store is the engine's one dependency, passed in at construction.
/// Repeated calls with unchanged data return identical results.
pub struct InsightsEngine {
    store: Arc<dyn CdrStore>,
}

impl InsightsEngine {
    #[must_use]
    pub fn new(store: Arc<dyn CdrStore>) -> Self {
        Self { store }
    }

    async fn records(&self) -> Result<Vec<CdrRecord>> {
        Ok(self.store.snapshot().await?)
    }

    /// Exact decimal mean of `cost` across all records.
    ///
    /// # Errors
    /// Returns `InsightsError::EmptyDataset` when the store is empty, and
    /// propagates store failures.
    pub async fn average_cost(&self) -> Result<Decimal> {
        let records = self.records().await?;
        if records.is_empty() {
            return Err(InsightsError::EmptyDataset);
        }
        let total: Decimal = records.iter().map(|r| r.cost).sum();
        Ok(total / Decimal::from(records.len() as u64))
    }

    /// The record with the greatest `cost`, or `None` on an empty store.
    /// Ties keep the first record in snapshot order.
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn max_cost_call(&self) -> Result<Option<CdrRecord>> {
        let records = self.records().await?;
        Ok(aggregate::max_by_first(&records, |r| r.cost).cloned())
    }

    /// The record with the greatest `duration`, or `None` on an empty
    /// store. Ties keep the first record in snapshot order.
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn longest_call(&self) -> Result<Option<CdrRecord>> {
        let records = self.records().await?;
        Ok(aggregate::max_by_first(&records, |r| r.duration).cloned())
    }

    /// Mean of per-date call counts: total records over distinct calendar
    /// days. Returns 0 when the store is empty.
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn average_calls_per_day(&self) -> Result<f64> {
        let records = self.records().await?;
        if records.is_empty() {
            return Ok(0.0);
        }
        let per_day = aggregate::group_by(&records, |r| r.call_date);
        Ok(records.len() as f64 / per_day.len() as f64)
    }

    /// Sum of `cost` per distinct currency, sorted by currency code.
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn total_cost_by_currency(&self) -> Result<Vec<CostByCurrency>> {
        let records = self.records().await?;
        let totals = aggregate::group_by(&records, |r| r.currency.clone())
            .into_iter()
            .map(|(currency, calls)| CostByCurrency {
                currency,
                total_cost: calls.iter().map(|r| r.cost).sum(),
            })
            .collect();
        Ok(totals)
    }

    /// The `n` callers with the most calls, descending by count. Records
    /// with an empty caller id are excluded. Equal counts rank by caller
    /// id ascending (group keys are sorted and the sort is stable), so the
    /// output is deterministic. `n <= 0` yields an empty result.
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn top_callers(&self, n: i64) -> Result<Vec<TopCaller>> {
        if n <= 0 {
            return Ok(Vec::new());
        }
        let records = self.records().await?;
        let mut ranked: Vec<TopCaller> = aggregate::group_by(&records, |r| r.caller_id.clone())
            .into_iter()
            .filter(|(caller_id, _)| !caller_id.is_empty())
            .map(|(caller_id, calls)| TopCaller {
                caller_id,
                call_count: calls.len() as i64,
            })
            .collect();
        ranked.sort_by(|a, b| b.call_count.cmp(&a.call_count));
        ranked.truncate(usize::try_from(n).unwrap_or(usize::MAX));
        Ok(ranked)
    }

    /// One entry per distinct calendar day, ascending by date, with call
    /// count, total duration, and total cost for that day.
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn daily_summary(&self) -> Result<Vec<DailySummary>> {
        let records = self.records().await?;
        let summaries = aggregate::group_by(&records, |r| r.call_date)
            .into_iter()
            .map(|(date, calls)| DailySummary {
                date,
                total_calls: calls.len() as i64,
                total_duration: calls.iter().map(|r| i64::from(r.duration)).sum(),
                total_cost: calls.iter().map(|r| r.cost).sum(),
            })
            .collect();
        Ok(summaries)
    }

    /// Count of records whose date falls within `[start, end]`, inclusive
    /// on both ends. `start > end` yields 0.
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn call_count_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<i64> {
        if start > end {
            return Ok(0);
        }
        let records = self.records().await?;
        let count = records
            .iter()
            .filter(|r| r.call_date >= start && r.call_date <= end)
            .count();
        Ok(count as i64)
    }

    /// Sum of `duration` for records whose `recipient` matches exactly.
    /// An unmatched recipient yields 0, not an error.
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn total_duration_by_recipient(&self, recipient: &str) -> Result<i64> {
        let records = self.records().await?;
        let total = records
            .iter()
            .filter(|r| r.recipient == recipient)
            .map(|r| i64::from(r.duration))
            .sum();
        Ok(total)
    }
}
