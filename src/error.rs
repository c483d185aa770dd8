//! Error types for the QEARN client

use thiserror::Error;

/// QEARN client error
#[derive(Debug, Error)]
pub enum QearnError {
    /// Response shorter than the fixed size for its query
    #[error("Malformed response: expected at least {expected} bytes, got {actual}")]
    MalformedResponse { expected: usize, actual: usize },

    /// Transport-level failure on a read query
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Submission-level failure on a state-changing call
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Lock amount at or below the contract minimum
    #[error("Lock amount {amount} must be greater than {minimum}")]
    AmountBelowMinimum { amount: u64, minimum: u64 },

    /// Reward table has no bracket for the given week
    #[error("No reward bracket covers week {0}")]
    NoMatchingBracket(u32),

    /// Identity text could not be parsed into a public key
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for QEARN operations
pub type Result<T> = std::result::Result<T, QearnError>;
