use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};

use cdr_analytics_core::{CdrRecord, CdrStore};

/// `PostgreSQL`-backed record store.
pub struct PgCdrStore {
    pool: PgPool,
}

impl PgCdrStore {
    /// Connects to the database and ensures the records table exists.
    ///
    /// # Errors
    /// Returns an error if the connection cannot be established or the
    /// schema bootstrap fails.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Wraps an existing pool. The schema is assumed to be in place.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS cdr_records (
                reference  TEXT PRIMARY KEY,
                caller_id  TEXT NOT NULL,
                recipient  TEXT NOT NULL,
                call_date  DATE NOT NULL,
                end_time   TIME NOT NULL,
                duration   INT4 NOT NULL,
                cost       NUMERIC(18,3) NOT NULL,
                currency   TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct CdrRow {
    reference: String,
    caller_id: String,
    recipient: String,
    call_date: NaiveDate,
    end_time: NaiveTime,
    duration: i32,
    cost: Decimal,
    currency: String,
}

impl From<CdrRow> for CdrRecord {
    fn from(row: CdrRow) -> Self {
        Self {
            reference: row.reference,
            caller_id: row.caller_id,
            recipient: row.recipient,
            call_date: row.call_date,
            end_time: row.end_time,
            duration: row.duration,
            cost: row.cost,
            currency: row.currency,
        }
    }
}

#[async_trait]
impl CdrStore for PgCdrStore {
    async fn append_batch(&self, records: Vec<CdrRecord>) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0u64;

        for record in records {
            let result = sqlx::query(
                r"
                INSERT INTO cdr_records
                    (reference, caller_id, recipient, call_date, end_time, duration, cost, currency)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (reference) DO NOTHING
                ",
            )
            .bind(&record.reference)
            .bind(&record.caller_id)
            .bind(&record.recipient)
            .bind(record.call_date)
            .bind(record.end_time)
            .bind(record.duration)
            .bind(record.cost)
            .bind(&record.currency)
            .execute(&mut *tx)
            .await?;

            written += result.rows_affected();
        }

        tx.commit().await?;
        tracing::debug!(written, "appended CDR batch");
        Ok(written)
    }

    async fn snapshot(&self) -> Result<Vec<CdrRecord>> {
        let rows = sqlx::query_as::<_, CdrRow>(
            r"
            SELECT reference, caller_id, recipient, call_date, end_time, duration, cost, currency
            FROM cdr_records
            ORDER BY reference ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CdrRecord::from).collect())
    }
}
