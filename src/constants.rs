//! QEARN protocol constants
//!
//! Every routing number the client sends to the ledger lives here. Call
//! sites read them through [`ProtocolConstants`] so a contract revision can
//! be tracked by changing one table (or the `[protocol]` config section)
//! instead of hunting for literals.
//!
//! Unlock routing has been observed both as input type 2 and as 12 across
//! wallet revisions. The default below is 2; confirm against the live
//! contract before relying on unlock submission.

use serde::{Deserialize, Serialize};

/// Version tag of the constants table below
pub const PROTOCOL_VERSION: &str = "qearn-2024.08";

/// Contract index used for read-only lock queries
pub const QUERY_CONTRACT_INDEX: u32 = 6;

/// Contract index used for lock/unlock transactions
pub const TRANSACTION_CONTRACT_INDEX: u32 = 1;

/// Query input type: aggregate lock/bonus info for an epoch
pub const EPOCH_INFO_INPUT_TYPE: u16 = 1;

/// Query input type: one identity's locked amount in an epoch
pub const USER_LOCK_INFO_INPUT_TYPE: u16 = 2;

/// Transaction input type: lock the transferred amount
pub const LOCK_INPUT_TYPE: u16 = 1;

/// Transaction input type: unlock from a given epoch
pub const UNLOCK_INPUT_TYPE: u16 = 2;

/// Ticks added to the current tick to schedule a transaction.
///
/// Wallet call sites have used 5 and 9; 9 leaves more room for the
/// signing round trip.
pub const DEFAULT_EXPIRY_TICK_OFFSET: u32 = 9;

/// Lock amounts must be strictly greater than this
pub const MIN_LOCK_AMOUNT: u64 = 10_000_000;

/// Number of epochs (one per week) covered by lock history
pub const HISTORY_WEEKS: u32 = 52;

/// Percentage returned when a lock runs its full term
pub const FULL_UNLOCK_PERCENT: u8 = 100;

/// Routing table for contract calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConstants {
    /// Free-form tag identifying the contract revision these numbers match
    pub version: String,
    pub query_contract_index: u32,
    pub transaction_contract_index: u32,
    pub epoch_info_input_type: u16,
    pub user_lock_info_input_type: u16,
    pub lock_input_type: u16,
    pub unlock_input_type: u16,
    /// Ticks between the current tick and a transaction's expiry tick
    pub expiry_tick_offset: u32,
    /// Exclusive lower bound on a lock's transfer amount
    pub min_lock_amount: u64,
}

impl Default for ProtocolConstants {
    fn default() -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            query_contract_index: QUERY_CONTRACT_INDEX,
            transaction_contract_index: TRANSACTION_CONTRACT_INDEX,
            epoch_info_input_type: EPOCH_INFO_INPUT_TYPE,
            user_lock_info_input_type: USER_LOCK_INFO_INPUT_TYPE,
            lock_input_type: LOCK_INPUT_TYPE,
            unlock_input_type: UNLOCK_INPUT_TYPE,
            expiry_tick_offset: DEFAULT_EXPIRY_TICK_OFFSET,
            min_lock_amount: MIN_LOCK_AMOUNT,
        }
    }
}
