//! In-memory ledger for testing.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

use super::traits::*;
use crate::constants::{EPOCH_INFO_INPUT_TYPE, USER_LOCK_INFO_INPUT_TYPE};
use crate::identity::{Identity, IDENTITY_LEN};
use crate::types::{
    QuerySmartContractRequest, QuerySmartContractResponse, SubmissionResult, TickInfo,
    TransactionRequest,
};

/// Mock ledger for testing.
///
/// Answers QEARN queries from configured tables (unknown entries read as
/// zero), records every call, and accepts or rejects submissions.
pub struct MockTransport {
    epoch_infos: HashMap<u32, (u64, u64)>,
    user_locks: HashMap<(Identity, u32), u64>,
    raw_response: Option<Vec<u8>>,
    delays: HashMap<u32, Duration>,
    tick: TickInfo,
    available: AtomicBool,
    accept_submissions: AtomicBool,
    epoch_info_calls: AtomicU32,
    user_lock_calls: AtomicU32,
    requests: Mutex<Vec<QuerySmartContractRequest>>,
    answered_epochs: Mutex<Vec<u32>>,
    submissions: Mutex<Vec<TransactionRequest>>,
}

impl MockTransport {
    /// Create an empty mock ledger.
    pub fn new() -> Self {
        Self {
            epoch_infos: HashMap::new(),
            user_locks: HashMap::new(),
            raw_response: None,
            delays: HashMap::new(),
            tick: TickInfo::default(),
            available: AtomicBool::new(true),
            accept_submissions: AtomicBool::new(true),
            epoch_info_calls: AtomicU32::new(0),
            user_lock_calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
            answered_epochs: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Set the aggregate lock/bonus amounts for an epoch.
    pub fn with_epoch_info(mut self, epoch: u32, lock_amount: u64, bonus_amount: u64) -> Self {
        self.epoch_infos.insert(epoch, (lock_amount, bonus_amount));
        self
    }

    /// Set an identity's locked amount for an epoch.
    pub fn with_user_lock(mut self, identity: Identity, epoch: u32, amount: u64) -> Self {
        self.user_locks.insert((identity, epoch), amount);
        self
    }

    /// Answer every query with these bytes instead of the tables.
    pub fn with_raw_response(mut self, bytes: Vec<u8>) -> Self {
        self.raw_response = Some(bytes);
        self
    }

    /// Delay every query about `epoch` before answering.
    pub fn with_epoch_delay(mut self, epoch: u32, delay: Duration) -> Self {
        self.delays.insert(epoch, delay);
        self
    }

    /// Set the current tick and epoch.
    pub fn with_tick(mut self, tick: u32, epoch: u32) -> Self {
        self.tick = TickInfo {
            tick,
            epoch,
            ..Default::default()
        };
        self
    }

    /// Set availability. An unavailable mock fails every call.
    pub fn with_available(self, available: bool) -> Self {
        self.available.store(available, Ordering::SeqCst);
        self
    }

    /// Whether submissions report success.
    pub fn with_accept_submissions(self, accept: bool) -> Self {
        self.accept_submissions.store(accept, Ordering::SeqCst);
        self
    }

    /// Number of epoch info queries answered or refused.
    pub fn epoch_info_calls(&self) -> u32 {
        self.epoch_info_calls.load(Ordering::SeqCst)
    }

    /// Number of user lock queries answered or refused.
    pub fn user_lock_calls(&self) -> u32 {
        self.user_lock_calls.load(Ordering::SeqCst)
    }

    /// All query requests received, in arrival order.
    pub async fn requests(&self) -> Vec<QuerySmartContractRequest> {
        self.requests.lock().await.clone()
    }

    /// Epochs of answered table queries, in completion order.
    pub async fn answered_epochs(&self) -> Vec<u32> {
        self.answered_epochs.lock().await.clone()
    }

    /// All transaction requests received, in arrival order.
    pub async fn submissions(&self) -> Vec<TransactionRequest> {
        self.submissions.lock().await.clone()
    }

    fn check_available(&self) -> Result<(), TransportError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(TransportError::Unavailable("Mock transport disabled".to_string()))
        }
    }

    fn queried_epoch(input_type: u16, input: &[u8]) -> Option<u32> {
        match input_type {
            EPOCH_INFO_INPUT_TYPE if input.len() >= 4 => Some(read_u32_le(&input[..4])),
            USER_LOCK_INFO_INPUT_TYPE if input.len() >= IDENTITY_LEN + 4 => {
                Some(read_u32_le(&input[IDENTITY_LEN..IDENTITY_LEN + 4]))
            }
            _ => None,
        }
    }

    fn answer(&self, input_type: u16, input: &[u8]) -> Result<Vec<u8>, TransportError> {
        match input_type {
            EPOCH_INFO_INPUT_TYPE if input.len() >= 4 => {
                let epoch = read_u32_le(&input[..4]);
                let (lock, bonus) = self.epoch_infos.get(&epoch).copied().unwrap_or_default();
                let mut out = lock.to_le_bytes().to_vec();
                out.extend_from_slice(&bonus.to_le_bytes());
                Ok(out)
            }
            USER_LOCK_INFO_INPUT_TYPE if input.len() >= IDENTITY_LEN + 4 => {
                let identity = Identity::from_slice(&input[..IDENTITY_LEN])
                    .map_err(|e| TransportError::Unavailable(e.to_string()))?;
                let epoch = read_u32_le(&input[IDENTITY_LEN..IDENTITY_LEN + 4]);
                let amount = self
                    .user_locks
                    .get(&(identity, epoch))
                    .copied()
                    .unwrap_or_default();
                Ok(amount.to_le_bytes().to_vec())
            }
            other => Err(TransportError::Server {
                status: 400,
                message: format!("unsupported input type {} ({} bytes)", other, input.len()),
            }),
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn read_u32_le(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn query_smart_contract(
        &self,
        request: QuerySmartContractRequest,
    ) -> Result<QuerySmartContractResponse, TransportError> {
        match request.input_type {
            EPOCH_INFO_INPUT_TYPE => self.epoch_info_calls.fetch_add(1, Ordering::SeqCst),
            USER_LOCK_INFO_INPUT_TYPE => self.user_lock_calls.fetch_add(1, Ordering::SeqCst),
            _ => 0,
        };
        self.requests.lock().await.push(request.clone());
        self.check_available()?;

        let output = match &self.raw_response {
            Some(bytes) => bytes.clone(),
            None => {
                let input = STANDARD.decode(&request.request_data)?;
                let epoch = Self::queried_epoch(request.input_type, &input);
                if let Some(delay) = epoch.and_then(|e| self.delays.get(&e)) {
                    tokio::time::sleep(*delay).await;
                }
                let output = self.answer(request.input_type, &input)?;
                if let Some(epoch) = epoch {
                    self.answered_epochs.lock().await.push(epoch);
                }
                output
            }
        };

        Ok(QuerySmartContractResponse {
            response_data: STANDARD.encode(output),
        })
    }
}

#[async_trait]
impl TickSource for MockTransport {
    async fn tick_info(&self) -> Result<TickInfo, TransportError> {
        self.check_available()?;
        Ok(self.tick)
    }
}

#[async_trait]
impl TransactionSubmitter for MockTransport {
    async fn submit(
        &self,
        request: &TransactionRequest,
    ) -> Result<SubmissionResult, TransportError> {
        self.submissions.lock().await.push(request.clone());
        self.check_available()?;

        let success = self.accept_submissions.load(Ordering::SeqCst);
        Ok(SubmissionResult {
            success,
            tx_id: success.then(|| format!("mock-tx-{}", request.expiry_tick)),
        })
    }
}
