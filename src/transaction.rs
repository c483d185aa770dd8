//! Lock/unlock transaction building and submission

use tracing::info;

use crate::client::ContractClient;
use crate::codec::StakeTransaction;
use crate::constants::ProtocolConstants;
use crate::error::{QearnError, Result};
use crate::identity::Identity;
use crate::types::{SubmissionResult, TransactionRequest};

/// Builds QEARN transactions and hands them to the wallet.
///
/// Lock amounts at or below `min_lock_amount` are rejected before a request
/// is built, so they never reach the submitter.
///
/// The caller must not issue a second submission for the same identity and
/// epoch until the first one has completed; nothing here deduplicates.
#[derive(Clone)]
pub struct TransactionBuilder {
    client: ContractClient,
    protocol: ProtocolConstants,
}

impl TransactionBuilder {
    pub fn new(client: ContractClient) -> Self {
        Self::with_protocol(client, ProtocolConstants::default())
    }

    pub fn with_protocol(client: ContractClient, protocol: ProtocolConstants) -> Self {
        Self { client, protocol }
    }

    /// Expiry tick for a transaction built at `current_tick`
    pub fn expiry_tick(&self, current_tick: u32) -> u32 {
        current_tick.saturating_add(self.protocol.expiry_tick_offset)
    }

    pub fn build(
        &self,
        identity: &Identity,
        transaction: StakeTransaction,
        expiry_tick: u32,
    ) -> Result<TransactionRequest> {
        if let StakeTransaction::Lock { amount } = transaction {
            if amount <= self.protocol.min_lock_amount {
                return Err(QearnError::AmountBelowMinimum {
                    amount,
                    minimum: self.protocol.min_lock_amount,
                });
            }
        }

        Ok(TransactionRequest {
            source: *identity,
            contract_index: self.protocol.transaction_contract_index,
            input_type: transaction.input_type(&self.protocol),
            transfer_amount: transaction.transfer_amount(),
            payload: transaction.payload(),
            expiry_tick,
        })
    }

    pub fn build_lock(
        &self,
        identity: &Identity,
        amount: u64,
        expiry_tick: u32,
    ) -> Result<TransactionRequest> {
        self.build(identity, StakeTransaction::Lock { amount }, expiry_tick)
    }

    pub fn build_unlock(
        &self,
        identity: &Identity,
        amount: u64,
        epoch: u32,
        expiry_tick: u32,
    ) -> Result<TransactionRequest> {
        self.build(
            identity,
            StakeTransaction::Unlock {
                amount,
                locked_epoch: epoch,
            },
            expiry_tick,
        )
    }

    /// Lock `amount` from `identity`, scheduled at `expiry_tick`
    pub async fn lock_qubic(
        &self,
        identity: &Identity,
        amount: u64,
        expiry_tick: u32,
    ) -> Result<SubmissionResult> {
        let request = self.build_lock(identity, amount, expiry_tick)?;
        info!(%identity, amount, expiry_tick, "Locking");
        self.client.submit(request).await
    }

    /// Unlock `amount` that `identity` locked in `epoch`
    pub async fn unlock_qubic(
        &self,
        identity: &Identity,
        amount: u64,
        epoch: u32,
        expiry_tick: u32,
    ) -> Result<SubmissionResult> {
        let request = self.build_unlock(identity, amount, epoch, expiry_tick)?;
        info!(%identity, amount, epoch, expiry_tick, "Unlocking");
        self.client.submit(request).await
    }

    /// Like [`lock_qubic`](Self::lock_qubic), with the expiry tick taken
    /// from the ledger's current tick
    pub async fn lock_qubic_now(
        &self,
        identity: &Identity,
        amount: u64,
    ) -> Result<SubmissionResult> {
        let tick = self.client.current_tick().await?;
        self.lock_qubic(identity, amount, self.expiry_tick(tick.tick))
            .await
    }

    /// Like [`unlock_qubic`](Self::unlock_qubic), with the expiry tick
    /// taken from the ledger's current tick
    pub async fn unlock_qubic_now(
        &self,
        identity: &Identity,
        amount: u64,
        epoch: u32,
    ) -> Result<SubmissionResult> {
        let tick = self.client.current_tick().await?;
        self.unlock_qubic(identity, amount, epoch, self.expiry_tick(tick.tick))
            .await
    }
}
