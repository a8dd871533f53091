use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use iou_schema::{PersistentIou, ProjectionStore};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryProjectionStore {
    // Row per projection key, with the sequence it was derived from.
    rows: RwLock<HashMap<Uuid, (i64, PersistentIou)>>,
}

impl InMemoryProjectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    async fn select(&self, predicate: impl Fn(&PersistentIou) -> bool) -> Vec<PersistentIou> {
        let rows = self.rows.read().await;
        let mut selected: Vec<PersistentIou> =
            rows.values().map(|(_, row)| row).filter(|row| predicate(row)).cloned().collect();
        selected.sort_by(|a, b| {
            a.value
                .cmp(&b.value)
                .then_with(|| a.linear_id.cmp(&b.linear_id))
        });
        selected
    }
}

#[async_trait]
impl ProjectionStore for InMemoryProjectionStore {
    async fn upsert(&self, row: &PersistentIou, sequence: i64) -> anyhow::Result<bool> {
        let mut rows = self.rows.write().await;
        match rows.entry(row.projection_key()) {
            Entry::Occupied(stored) if stored.get().0 > sequence => Ok(false),
            Entry::Occupied(mut stored) => {
                stored.insert((sequence, row.clone()));
                Ok(true)
            }
            Entry::Vacant(slot) => {
                slot.insert((sequence, row.clone()));
                Ok(true)
            }
        }
    }

    async fn get(&self, linear_id: Uuid) -> anyhow::Result<Option<PersistentIou>> {
        let rows = self.rows.read().await;
        Ok(rows.get(&linear_id).map(|(_, row)| row.clone()))
    }

    async fn by_lender(&self, lender_name: &str) -> anyhow::Result<Vec<PersistentIou>> {
        Ok(self.select(|row| row.lender_name == lender_name).await)
    }

    async fn by_value_range(&self, min: i64, max: i64) -> anyhow::Result<Vec<PersistentIou>> {
        Ok(self
            .select(|row| (min..=max).contains(&row.value))
            .await)
    }
}
