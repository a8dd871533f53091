use std::marker::PhantomData;

use anyhow::Context;
use iou_core::{Currency, LedgerTransaction, StateAndRef, StateVault, TransactionVerifier};
use iou_schema::{ProjectionStore, QueryableState};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Runs accepted transactions through the vault and keeps the projection
/// store in step with the latest version of every agreement.
pub struct LedgerService<C, V, P>
where
    C: Currency,
    V: StateVault<C>,
    P: ProjectionStore,
{
    vault: V,
    projections: P,
    currency: PhantomData<C>,
}

impl<C, V, P> LedgerService<C, V, P>
where
    C: Currency,
    V: StateVault<C>,
    P: ProjectionStore,
{
    pub fn new(vault: V, projections: P) -> Self {
        Self {
            vault,
            projections,
            currency: PhantomData,
        }
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub fn projections(&self) -> &P {
        &self.projections
    }

    /// Verifies `tx`, records it, then projects every output.
    ///
    /// A rejected or unrecordable transaction leaves both stores untouched.
    /// If projection fails after recording, the vault keeps the transaction
    /// and [`LedgerService::reproject`] can restore the row.
    pub async fn submit(
        &self,
        tx: LedgerTransaction<C>,
        verifier: &dyn TransactionVerifier<C>,
    ) -> anyhow::Result<Vec<StateAndRef<C>>> {
        if let Err(rejection) = verifier.verify(&tx) {
            warn!(tx_id = %tx.id, command = ?tx.command, "{rejection}");
            return Err(rejection.into());
        }

        let recorded = self.vault.record(&tx).await?;
        for output in &recorded {
            self.index(output).await.with_context(|| {
                format!(
                    "transaction {} recorded but projection of {} failed",
                    tx.id,
                    output.state.linear_id()
                )
            })?;
        }

        info!(
            tx_id = %tx.id,
            command = ?tx.command,
            outputs = recorded.len(),
            "transaction accepted"
        );
        Ok(recorded)
    }

    /// Regenerates the projection row for `linear_id` from the vault's
    /// unconsumed version. Returns `false` when the agreement has none.
    pub async fn reproject(&self, linear_id: Uuid) -> anyhow::Result<bool> {
        match self.vault.unconsumed(linear_id).await? {
            Some(current) => {
                self.index(&current).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn index(&self, output: &StateAndRef<C>) -> anyhow::Result<()> {
        for schema in output.state.supported_schemas() {
            let row = output.state.generate_mapped_object(schema)?;
            if !self.projections.upsert(&row, output.sequence).await? {
                debug!(
                    linear_id = %row.linear_id,
                    sequence = output.sequence,
                    "projection already holds a newer version"
                );
            }
        }
        Ok(())
    }
}
