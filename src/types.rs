//! Types for the QEARN client API

use crate::identity::Identity;
use serde::{Deserialize, Serialize};

/// RPC endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Base URL of the Qubic RPC API
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            base_url: "https://rpc.qubic.org".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Aggregate lock state of one epoch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochLockInfo {
    /// Total amount locked in the epoch
    pub lock_amount: u64,
    /// Bonus pool shared by the epoch's lockers
    pub bonus_amount: u64,
}

/// One locked position, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    /// Epoch the amount was locked in
    pub epoch: u32,
    pub locked_amount: u64,
    /// Weeks elapsed since the lock
    pub weeks_locked: u32,
    pub total_locked_amount_in_epoch: u64,
    pub current_bonus_amount_in_epoch: u64,
    pub early_unlock_percent: u8,
    /// Always 100
    pub full_unlock_percent: u8,
}

/// A contract transaction ready for signing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// Identity whose seed signs the transaction
    pub source: Identity,
    pub contract_index: u32,
    pub input_type: u16,
    /// Amount transferred to the contract
    pub transfer_amount: u64,
    /// Structured input, hex-encoded in JSON
    #[serde(with = "hex")]
    pub payload: Vec<u8>,
    /// Tick the transaction is scheduled for
    pub expiry_tick: u32,
}

/// Answer from the wallet after signing and broadcasting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub success: bool,
    /// Transaction id, when the broadcaster reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
}

/// Current ledger position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickInfo {
    pub tick: u32,
    pub epoch: u32,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub initial_tick: u32,
}

/// Response from the tick info endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickInfoResponse {
    pub tick_info: TickInfo,
}

/// Request body for a smart contract query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySmartContractRequest {
    pub contract_index: u32,
    pub input_type: u16,
    pub input_size: u16,
    /// Input payload as base64
    pub request_data: String,
}

/// Response from a smart contract query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySmartContractResponse {
    /// Output payload as base64
    pub response_data: String,
}
