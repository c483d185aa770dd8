//! Contract client: raw bytes in, raw bytes out

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{QearnError, Result};
use crate::transport::{RpcTransport, TickSource, TransactionSubmitter};
use crate::types::{QuerySmartContractRequest, SubmissionResult, TickInfo, TransactionRequest};

/// Sends contract queries and transactions through the configured
/// collaborators.
///
/// The base64 transport encoding never leaves this type. Failures are
/// reported once and never retried here; retry policy belongs to the caller.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use qearn_client::{ContractClient, HttpRpcClient, RpcConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let rpc = Arc::new(HttpRpcClient::new(RpcConfig::default())?);
/// let client = ContractClient::new(rpc.clone()).with_tick_source(rpc);
///
/// let bytes = client.query(6, 1, 4, &119u32.to_le_bytes()).await?;
/// let tick = client.current_tick().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ContractClient {
    transport: Arc<dyn RpcTransport>,
    ticks: Option<Arc<dyn TickSource>>,
    submitter: Option<Arc<dyn TransactionSubmitter>>,
}

impl ContractClient {
    /// Create a client that can run queries
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            transport,
            ticks: None,
            submitter: None,
        }
    }

    /// Attach the ledger status collaborator
    pub fn with_tick_source(mut self, ticks: Arc<dyn TickSource>) -> Self {
        self.ticks = Some(ticks);
        self
    }

    /// Attach the wallet that signs and broadcasts transactions
    pub fn with_submitter(mut self, submitter: Arc<dyn TransactionSubmitter>) -> Self {
        self.submitter = Some(submitter);
        self
    }

    /// Run a read-only contract query
    pub async fn query(
        &self,
        contract_index: u32,
        input_type: u16,
        input_size: u16,
        payload: &[u8],
    ) -> Result<Vec<u8>> {
        debug!(contract_index, input_type, input_size, "Querying contract");

        let request = QuerySmartContractRequest {
            contract_index,
            input_type,
            input_size,
            request_data: STANDARD.encode(payload),
        };

        let response = self
            .transport
            .query_smart_contract(request)
            .await
            .map_err(|e| {
                warn!(contract_index, input_type, error = %e, "Contract query failed");
                QearnError::QueryFailed(e.to_string())
            })?;

        STANDARD.decode(&response.response_data).map_err(|e| {
            warn!(contract_index, input_type, error = %e, "Undecodable response data");
            QearnError::QueryFailed(format!("undecodable response data: {}", e))
        })
    }

    /// Hand a transaction to the wallet for signing and broadcast
    pub async fn submit(&self, request: TransactionRequest) -> Result<SubmissionResult> {
        let submitter = self.submitter.as_ref().ok_or_else(|| {
            QearnError::TransactionFailed("no transaction submitter configured".to_string())
        })?;

        info!(
            identity = %request.source,
            contract_index = request.contract_index,
            input_type = request.input_type,
            amount = request.transfer_amount,
            expiry_tick = request.expiry_tick,
            "Submitting transaction"
        );

        let result = submitter.submit(&request).await.map_err(|e| {
            warn!(error = %e, "Transaction submission failed");
            QearnError::TransactionFailed(e.to_string())
        })?;

        if !result.success {
            warn!(expiry_tick = request.expiry_tick, "Transaction rejected");
            return Err(QearnError::TransactionFailed(
                "submission was not accepted".to_string(),
            ));
        }

        Ok(result)
    }

    /// Current tick and epoch from the ledger status collaborator
    pub async fn current_tick(&self) -> Result<TickInfo> {
        let ticks = self
            .ticks
            .as_ref()
            .ok_or_else(|| QearnError::QueryFailed("no tick source configured".to_string()))?;

        ticks
            .tick_info()
            .await
            .map_err(|e| QearnError::QueryFailed(e.to_string()))
    }
}
