//! Rust client for the QEARN staking contract on the Qubic ledger
//!
//! Queries epoch and per-identity lock state, builds lock/unlock
//! transactions for an external wallet to sign, and assembles a
//! display-ready lock history.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use qearn_client::{
//!     ContractClient, HistoryAggregator, HttpRpcClient, Identity, LockQueryService, RpcConfig,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let rpc = Arc::new(HttpRpcClient::new(RpcConfig::default())?);
//! let client = ContractClient::new(rpc.clone()).with_tick_source(rpc);
//! let queries = LockQueryService::new(client.clone());
//!
//! // Aggregate state of the current epoch
//! let tick = client.current_tick().await?;
//! let info = queries.get_lock_info_per_epoch(tick.epoch).await?;
//!
//! // One year of lock history for a wallet identity
//! let identity: Identity = "ab".repeat(32).parse()?;
//! let history = HistoryAggregator::new(queries)
//!     .aggregate(&[identity], tick.epoch)
//!     .await?;
//! for record in history.flatten() {
//!     println!("epoch {}: {}", record.epoch, record.locked_amount);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod history;
pub mod identity;
pub mod query;
pub mod rewards;
pub mod transaction;
pub mod transport;
pub mod types;

// Re-export main types
pub use client::ContractClient;
pub use codec::{StakeQuery, StakeTransaction};
pub use config::QearnConfig;
pub use constants::ProtocolConstants;
pub use error::{QearnError, Result};
pub use history::{AggregateEpoch, HistoryAggregator, HistoryConfig, LockHistory};
pub use identity::Identity;
pub use query::LockQueryService;
pub use rewards::{RewardBracket, RewardScheduleTable};
pub use transaction::TransactionBuilder;
pub use transport::{
    HttpRpcClient, MockTransport, RpcTransport, TickSource, TransactionSubmitter, TransportError,
};
pub use types::*;
