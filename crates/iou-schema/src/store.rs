use async_trait::async_trait;
use uuid::Uuid;

use crate::row::PersistentIou;

/// Persistence for projected IOU rows, one row per agreement.
///
/// `upsert` stores `row` under its projection key unless the key already
/// holds a row derived from a later `sequence`, and reports whether it wrote.
/// Lookups return rows ordered by `value`, then `linear_id`. Range bounds are
/// inclusive.
#[async_trait]
pub trait ProjectionStore: Send + Sync {
    async fn upsert(&self, row: &PersistentIou, sequence: i64) -> anyhow::Result<bool>;
    async fn get(&self, linear_id: Uuid) -> anyhow::Result<Option<PersistentIou>>;
    async fn by_lender(&self, lender_name: &str) -> anyhow::Result<Vec<PersistentIou>>;
    async fn by_value_range(&self, min: i64, max: i64) -> anyhow::Result<Vec<PersistentIou>>;
}
