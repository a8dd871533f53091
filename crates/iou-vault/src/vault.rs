use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use iou_core::{Currency, LedgerTransaction, StateAndRef, StateRef, StateVault};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    #[error("input {}:{} is not in the vault", .0.tx_id, .0.index)]
    UnknownInput(StateRef),
    #[error("input {}:{} was already consumed by transaction {consumed_by}", .reference.tx_id, .reference.index)]
    AlreadyConsumed {
        reference: StateRef,
        consumed_by: Uuid,
    },
    #[error("input {}:{} is listed more than once", .0.tx_id, .0.index)]
    DuplicateInput(StateRef),
    #[error("transaction {0} was already recorded")]
    DuplicateTransaction(Uuid),
    #[error("transaction {tx_id} has {count} outputs, more than a state ref can index")]
    TooManyOutputs { tx_id: Uuid, count: usize },
}

struct VaultEntry<C: Currency> {
    recorded: StateAndRef<C>,
    consumed_by: Option<Uuid>,
}

struct VaultInner<C: Currency> {
    entries: HashMap<StateRef, VaultEntry<C>>,
    // Refs per agreement, in recording order.
    lineage: HashMap<Uuid, Vec<StateRef>>,
    transactions: HashSet<Uuid>,
    sequence: i64,
}

impl<C: Currency> VaultInner<C> {
    fn check(&self, tx: &LedgerTransaction<C>) -> Result<(), VaultError> {
        if self.transactions.contains(&tx.id) {
            return Err(VaultError::DuplicateTransaction(tx.id));
        }
        if u32::try_from(tx.outputs.len()).is_err() {
            return Err(VaultError::TooManyOutputs {
                tx_id: tx.id,
                count: tx.outputs.len(),
            });
        }

        let mut seen = HashSet::with_capacity(tx.inputs.len());
        for reference in tx.input_refs() {
            if !seen.insert(reference) {
                return Err(VaultError::DuplicateInput(reference));
            }
            let entry = self
                .entries
                .get(&reference)
                .ok_or(VaultError::UnknownInput(reference))?;
            if let Some(consumed_by) = entry.consumed_by {
                return Err(VaultError::AlreadyConsumed {
                    reference,
                    consumed_by,
                });
            }
        }
        Ok(())
    }
}

pub struct InMemoryVault<C: Currency> {
    inner: RwLock<VaultInner<C>>,
}

impl<C: Currency> Default for InMemoryVault<C> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(VaultInner {
                entries: HashMap::new(),
                lineage: HashMap::new(),
                transactions: HashSet::new(),
                sequence: 0,
            }),
        }
    }
}

impl<C: Currency> InMemoryVault<C> {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<C: Currency> StateVault<C> for InMemoryVault<C> {
    async fn record(&self, tx: &LedgerTransaction<C>) -> anyhow::Result<Vec<StateAndRef<C>>> {
        let mut inner = self.inner.write().await;
        inner.check(tx)?;

        inner.transactions.insert(tx.id);
        for reference in tx.input_refs() {
            if let Some(entry) = inner.entries.get_mut(&reference) {
                entry.consumed_by = Some(tx.id);
            }
        }

        let recorded_at = Utc::now();
        let mut recorded = Vec::with_capacity(tx.outputs.len());
        for (state, reference) in tx.outputs.iter().zip(tx.output_refs()) {
            inner.sequence += 1;
            let state_and_ref = StateAndRef {
                state: state.clone(),
                reference,
                sequence: inner.sequence,
                recorded_at,
            };
            inner
                .lineage
                .entry(state.linear_id().id)
                .or_default()
                .push(reference);
            inner.entries.insert(
                reference,
                VaultEntry {
                    recorded: state_and_ref.clone(),
                    consumed_by: None,
                },
            );
            recorded.push(state_and_ref);
        }

        debug!(
            tx_id = %tx.id,
            command = ?tx.command,
            inputs = tx.inputs.len(),
            outputs = recorded.len(),
            sequence = inner.sequence,
            "recorded transaction"
        );

        Ok(recorded)
    }

    async fn unconsumed(&self, linear_id: Uuid) -> anyhow::Result<Option<StateAndRef<C>>> {
        let inner = self.inner.read().await;
        let Some(refs) = inner.lineage.get(&linear_id) else {
            return Ok(None);
        };

        Ok(refs
            .iter()
            .rev()
            .filter_map(|reference| inner.entries.get(reference))
            .find(|entry| entry.consumed_by.is_none())
            .map(|entry| entry.recorded.clone()))
    }

    async fn history(&self, linear_id: Uuid) -> anyhow::Result<Vec<StateAndRef<C>>> {
        let inner = self.inner.read().await;
        Ok(inner
            .lineage
            .get(&linear_id)
            .map(|refs| {
                refs.iter()
                    .filter_map(|reference| inner.entries.get(reference))
                    .map(|entry| entry.recorded.clone())
                    .collect()
            })
            .unwrap_or_default())
    }
}
