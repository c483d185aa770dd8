//! Ledger transport abstraction layer.
//!
//! - HTTP client for the public Qubic RPC API
//! - Mock ledger for testing

pub mod http;
pub mod mock;
pub mod traits;

pub use http::HttpRpcClient;
pub use mock::MockTransport;
pub use traits::{RpcTransport, TickSource, TransactionSubmitter, TransportError};
