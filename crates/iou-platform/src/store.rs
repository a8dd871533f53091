use anyhow::Result;
use async_trait::async_trait;
use iou_schema::{PersistentIou, ProjectionStore};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

const SELECT_COLUMNS: &str =
    "SELECT linear_id, lender, borrower, currency, value, paid_currency, paid_value FROM iou_states";

/// [`ProjectionStore`] backed by the `iou_states` table.
#[derive(Clone)]
pub struct PgProjectionStore {
    pool: PgPool,
}

impl PgProjectionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectionStore for PgProjectionStore {
    async fn upsert(&self, row: &PersistentIou, sequence: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO iou_states (
                linear_id, lender, borrower, currency, value, paid_currency, paid_value,
                state_sequence
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (linear_id) DO UPDATE SET
                lender = EXCLUDED.lender,
                borrower = EXCLUDED.borrower,
                currency = EXCLUDED.currency,
                value = EXCLUDED.value,
                paid_currency = EXCLUDED.paid_currency,
                paid_value = EXCLUDED.paid_value,
                state_sequence = EXCLUDED.state_sequence
            WHERE iou_states.state_sequence <= EXCLUDED.state_sequence
            "#,
        )
        .bind(row.linear_id)
        .bind(&row.lender_name)
        .bind(&row.borrower_name)
        .bind(&row.currency)
        .bind(row.value)
        .bind(&row.paid_currency)
        .bind(row.paid_value)
        .bind(sequence)
        .execute(&self.pool)
        .await?;

        let written = result.rows_affected() > 0;
        debug!(
            linear_id = %row.linear_id,
            lender = %row.lender_name,
            sequence,
            written,
            "projection upsert"
        );
        Ok(written)
    }

    async fn get(&self, linear_id: Uuid) -> Result<Option<PersistentIou>> {
        let row = sqlx::query_as::<_, PersistentIou>(&format!("{SELECT_COLUMNS} WHERE linear_id = $1"))
            .bind(linear_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn by_lender(&self, lender_name: &str) -> Result<Vec<PersistentIou>> {
        let rows = sqlx::query_as::<_, PersistentIou>(&format!(
            "{SELECT_COLUMNS} WHERE lender = $1 ORDER BY value, linear_id"
        ))
        .bind(lender_name)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_value_range(&self, min: i64, max: i64) -> Result<Vec<PersistentIou>> {
        let rows = sqlx::query_as::<_, PersistentIou>(&format!(
            "{SELECT_COLUMNS} WHERE value BETWEEN $1 AND $2 ORDER BY value, linear_id"
        ))
        .bind(min)
        .bind(max)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
