use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::amount::Currency;
use crate::state::IouState;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IouCommand {
    Issue,
    Transfer,
    Settle,
}

/// Position of a state among the outputs of the transaction that created it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct StateRef {
    pub tx_id: Uuid,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateAndRef<C: Currency> {
    pub state: IouState<C>,
    pub reference: StateRef,
    /// Vault-assigned position; a later recording always has a larger value.
    pub sequence: i64,
    pub recorded_at: DateTime<Utc>,
}

/// A proposed state change: the versions it consumes and the versions it
/// creates, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct LedgerTransaction<C: Currency> {
    pub id: Uuid,
    pub command: IouCommand,
    pub inputs: Vec<StateAndRef<C>>,
    pub outputs: Vec<IouState<C>>,
}

impl<C: Currency> LedgerTransaction<C> {
    pub fn issue(output: IouState<C>) -> Self {
        Self::new(IouCommand::Issue, Vec::new(), vec![output])
    }

    pub fn transfer(input: StateAndRef<C>, output: IouState<C>) -> Self {
        Self::new(IouCommand::Transfer, vec![input], vec![output])
    }

    pub fn settle(input: StateAndRef<C>, output: IouState<C>) -> Self {
        Self::new(IouCommand::Settle, vec![input], vec![output])
    }

    fn new(command: IouCommand, inputs: Vec<StateAndRef<C>>, outputs: Vec<IouState<C>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            command,
            inputs,
            outputs,
        }
    }

    pub fn input_refs(&self) -> impl Iterator<Item = StateRef> + '_ {
        self.inputs.iter().map(|input| input.reference)
    }

    /// References the outputs will have once the transaction is recorded.
    ///
    /// Only the first `u32::MAX + 1` outputs get a reference; vaults reject
    /// transactions with more outputs than that.
    pub fn output_refs(&self) -> impl Iterator<Item = StateRef> + '_ {
        (0..=u32::MAX)
            .zip(&self.outputs)
            .map(|(index, _)| StateRef {
                tx_id: self.id,
                index,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transaction {tx_id} rejected: {reason}")]
pub struct VerificationError {
    pub tx_id: Uuid,
    pub reason: String,
}

/// Contract verification for IOU transactions. Implementations decide which
/// transitions are acceptable; nothing in this crate provides one.
pub trait TransactionVerifier<C: Currency>: Send + Sync {
    fn verify(&self, tx: &LedgerTransaction<C>) -> Result<(), VerificationError>;
}

#[async_trait]
pub trait StateVault<C: Currency>: Send + Sync {
    /// Marks every input consumed and stores every output, assigning each a
    /// fresh `sequence`. Either all of it happens or none of it does; a
    /// transaction id is recorded at most once.
    async fn record(&self, tx: &LedgerTransaction<C>) -> anyhow::Result<Vec<StateAndRef<C>>>;
    async fn unconsumed(&self, linear_id: Uuid) -> anyhow::Result<Option<StateAndRef<C>>>;
    async fn history(&self, linear_id: Uuid) -> anyhow::Result<Vec<StateAndRef<C>>>;
}
