//! HTTP transport for the Qubic RPC API

use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;
use tracing::debug;

use super::traits::*;
use crate::error::{QearnError, Result};
use crate::types::{
    QuerySmartContractRequest, QuerySmartContractResponse, RpcConfig, TickInfo, TickInfoResponse,
};

/// HTTP client for the Qubic RPC API
///
/// # Example
///
/// ```rust,no_run
/// use qearn_client::{HttpRpcClient, RpcConfig, TickSource};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let rpc = HttpRpcClient::new(RpcConfig {
///     base_url: "https://rpc.qubic.org".into(),
///     ..Default::default()
/// })?;
///
/// let tick = rpc.tick_info().await?;
/// println!("epoch {} tick {}", tick.epoch, tick.tick);
/// # Ok(())
/// # }
/// ```
pub struct HttpRpcClient {
    config: RpcConfig,
    client: Client,
}

impl HttpRpcClient {
    /// Create a new RPC client
    pub fn new(config: RpcConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| QearnError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> std::result::Result<T, TransportError> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Server {
                status,
                message: body,
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl RpcTransport for HttpRpcClient {
    async fn query_smart_contract(
        &self,
        request: QuerySmartContractRequest,
    ) -> std::result::Result<QuerySmartContractResponse, TransportError> {
        let url = self.url("/v1/querySmartContract");
        debug!(
            %url,
            contract_index = request.contract_index,
            input_type = request.input_type,
            "POST query"
        );

        let response = self.client.post(&url).json(&request).send().await?;
        self.handle_response(response).await
    }
}

#[async_trait]
impl TickSource for HttpRpcClient {
    async fn tick_info(&self) -> std::result::Result<TickInfo, TransportError> {
        let url = self.url("/v1/tick-info");

        let response = self.client.get(&url).send().await?;
        let body: TickInfoResponse = self.handle_response(response).await?;
        Ok(body.tick_info)
    }
}
