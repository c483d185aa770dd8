//! Read-only QEARN lock queries

use tracing::debug;

use crate::client::ContractClient;
use crate::codec::{self, StakeQuery};
use crate::constants::ProtocolConstants;
use crate::error::Result;
use crate::identity::Identity;
use crate::types::EpochLockInfo;

/// Per-epoch and per-identity lock lookups.
///
/// Both operations are idempotent; repeating a call only differs if the
/// ledger state changed in between.
#[derive(Clone)]
pub struct LockQueryService {
    client: ContractClient,
    protocol: ProtocolConstants,
}

impl LockQueryService {
    pub fn new(client: ContractClient) -> Self {
        Self::with_protocol(client, ProtocolConstants::default())
    }

    pub fn with_protocol(client: ContractClient, protocol: ProtocolConstants) -> Self {
        Self { client, protocol }
    }

    /// Aggregate locked amount and bonus pool of `epoch`
    pub async fn get_lock_info_per_epoch(&self, epoch: u32) -> Result<EpochLockInfo> {
        let bytes = self.run(StakeQuery::EpochInfo { epoch }).await?;
        let info = codec::decode_epoch_info_response(&bytes)?;
        debug!(
            epoch,
            lock_amount = info.lock_amount,
            bonus_amount = info.bonus_amount,
            "Epoch lock info"
        );
        Ok(info)
    }

    /// Amount `identity` locked in `epoch`
    pub async fn get_user_lock_info(&self, identity: &Identity, epoch: u32) -> Result<u64> {
        let bytes = self
            .run(StakeQuery::UserLockInfo {
                identity: *identity,
                epoch,
            })
            .await?;
        codec::decode_user_lock_response(&bytes)
    }

    async fn run(&self, query: StakeQuery) -> Result<Vec<u8>> {
        self.client
            .query(
                self.protocol.query_contract_index,
                query.input_type(&self.protocol),
                query.input_size(),
                &query.payload(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QearnError;
    use crate::transport::MockTransport;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_lock_info_per_epoch() {
        let mock = Arc::new(MockTransport::new().with_epoch_info(119, 1000, 2000));
        let service = LockQueryService::new(ContractClient::new(mock.clone()));

        let info = service.get_lock_info_per_epoch(119).await.unwrap();
        assert_eq!(info.lock_amount, 1000);
        assert_eq!(info.bonus_amount, 2000);

        let sent = &mock.requests().await[0];
        assert_eq!(sent.contract_index, 6);
        assert_eq!(sent.input_type, 1);
        assert_eq!(sent.input_size, 4);
    }

    #[tokio::test]
    async fn test_get_user_lock_info() {
        let identity = Identity::from_bytes([5u8; 32]);
        let mock = Arc::new(MockTransport::new().with_user_lock(identity, 118, 500));
        let service = LockQueryService::new(ContractClient::new(mock.clone()));

        assert_eq!(service.get_user_lock_info(&identity, 118).await.unwrap(), 500);
        assert_eq!(service.get_user_lock_info(&identity, 117).await.unwrap(), 0);

        let sent = &mock.requests().await[0];
        assert_eq!(sent.contract_index, 6);
        assert_eq!(sent.input_type, 2);
        assert_eq!(sent.input_size, 36);
        let payload = STANDARD.decode(&sent.request_data).unwrap();
        assert_eq!(&payload[..32], identity.as_bytes());
        assert_eq!(&payload[32..], &118u32.to_le_bytes());
    }

    #[tokio::test]
    async fn test_short_responses() {
        let mock = Arc::new(MockTransport::new().with_raw_response(vec![0u8; 8]));
        let service = LockQueryService::new(ContractClient::new(mock));

        let err = service.get_lock_info_per_epoch(1).await.unwrap_err();
        assert!(matches!(err, QearnError::MalformedResponse { expected: 16, actual: 8 }));

        let mock = Arc::new(MockTransport::new().with_raw_response(vec![0u8; 4]));
        let service = LockQueryService::new(ContractClient::new(mock));
        let identity = Identity::from_bytes([0u8; 32]);
        let err = service.get_user_lock_info(&identity, 1).await.unwrap_err();
        assert!(matches!(err, QearnError::MalformedResponse { expected: 8, actual: 4 }));
    }

    #[tokio::test]
    async fn test_routing_follows_protocol_table() {
        let mock = Arc::new(MockTransport::new());
        let protocol = ProtocolConstants {
            query_contract_index: 9,
            ..Default::default()
        };
        let service = LockQueryService::with_protocol(ContractClient::new(mock.clone()), protocol);

        service.get_lock_info_per_epoch(3).await.unwrap();
        assert_eq!(mock.requests().await[0].contract_index, 9);
    }
}
