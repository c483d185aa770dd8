//! Collaborator traits for ledger access.
//!
//! The client never talks to the network directly. Queries, tick lookups
//! and signed submissions go through these traits so the same services run
//! against the public RPC, a wallet, or the in-memory mock.

use async_trait::async_trait;

use crate::types::{
    QuerySmartContractRequest, QuerySmartContractResponse, SubmissionResult, TickInfo,
    TransactionRequest,
};

/// Error types for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP request failed (connect, timeout, body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 payload could not be decoded
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Collaborator is not reachable or refused the call
    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

/// Read-only smart contract queries.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Run one contract query. Payloads are base64 on both sides.
    async fn query_smart_contract(
        &self,
        request: QuerySmartContractRequest,
    ) -> Result<QuerySmartContractResponse, TransportError>;
}

/// Ledger status collaborator.
#[async_trait]
pub trait TickSource: Send + Sync {
    /// Current tick and epoch.
    async fn tick_info(&self) -> Result<TickInfo, TransportError>;
}

/// Wallet collaborator: reveals the seed for `request.source`, signs and
/// broadcasts.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit(
        &self,
        request: &TransactionRequest,
    ) -> Result<SubmissionResult, TransportError>;
}
