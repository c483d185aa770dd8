//! Fixed-layout binary payloads for QEARN calls
//!
//! All integers are unsigned and little-endian.
//!
//! | Payload              | Layout                                  | Size |
//! |----------------------|-----------------------------------------|------|
//! | epoch query          | epoch u32                               | 4    |
//! | user lock query      | identity \[u8; 32\] ++ epoch u32        | 36   |
//! | unlock transaction   | amount u64 ++ locked epoch u32          | 12   |
//! | epoch info response  | lock amount u64 ++ bonus amount u64     | 16   |
//! | user lock response   | lock amount u64                         | 8    |

use crate::constants::ProtocolConstants;
use crate::error::{QearnError, Result};
use crate::identity::{Identity, IDENTITY_LEN};
use crate::types::EpochLockInfo;

pub const EPOCH_QUERY_SIZE: usize = 4;
pub const USER_LOCK_QUERY_SIZE: usize = IDENTITY_LEN + 4;
pub const UNLOCK_PAYLOAD_SIZE: usize = 12;
pub const EPOCH_INFO_RESPONSE_SIZE: usize = 16;
pub const USER_LOCK_RESPONSE_SIZE: usize = 8;

pub fn encode_epoch_query(epoch: u32) -> [u8; EPOCH_QUERY_SIZE] {
    epoch.to_le_bytes()
}

pub fn encode_user_lock_query(identity: &Identity, epoch: u32) -> [u8; USER_LOCK_QUERY_SIZE] {
    let mut out = [0u8; USER_LOCK_QUERY_SIZE];
    out[..IDENTITY_LEN].copy_from_slice(identity.as_bytes());
    out[IDENTITY_LEN..].copy_from_slice(&epoch.to_le_bytes());
    out
}

pub fn encode_unlock_payload(amount: u64, epoch: u32) -> [u8; UNLOCK_PAYLOAD_SIZE] {
    let mut out = [0u8; UNLOCK_PAYLOAD_SIZE];
    out[..8].copy_from_slice(&amount.to_le_bytes());
    out[8..].copy_from_slice(&epoch.to_le_bytes());
    out
}

/// Decode the aggregate lock/bonus response. Bytes past offset 16 are ignored.
pub fn decode_epoch_info_response(bytes: &[u8]) -> Result<EpochLockInfo> {
    ensure_len(bytes, EPOCH_INFO_RESPONSE_SIZE)?;
    Ok(EpochLockInfo {
        lock_amount: read_u64_le(bytes, 0),
        bonus_amount: read_u64_le(bytes, 8),
    })
}

/// Decode a single identity's locked amount. Bytes past offset 8 are ignored.
pub fn decode_user_lock_response(bytes: &[u8]) -> Result<u64> {
    ensure_len(bytes, USER_LOCK_RESPONSE_SIZE)?;
    Ok(read_u64_le(bytes, 0))
}

fn ensure_len(bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() < expected {
        return Err(QearnError::MalformedResponse {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

// Callers check the length first.
fn read_u64_le(bytes: &[u8], offset: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(buf)
}

/// A read-only contract query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StakeQuery {
    /// Aggregate lock and bonus amounts for one epoch
    EpochInfo { epoch: u32 },
    /// One identity's locked amount in one epoch
    UserLockInfo { identity: Identity, epoch: u32 },
}

impl StakeQuery {
    pub fn input_type(&self, protocol: &ProtocolConstants) -> u16 {
        match self {
            StakeQuery::EpochInfo { .. } => protocol.epoch_info_input_type,
            StakeQuery::UserLockInfo { .. } => protocol.user_lock_info_input_type,
        }
    }

    pub fn payload(&self) -> Vec<u8> {
        match self {
            StakeQuery::EpochInfo { epoch } => encode_epoch_query(*epoch).to_vec(),
            StakeQuery::UserLockInfo { identity, epoch } => {
                encode_user_lock_query(identity, *epoch).to_vec()
            }
        }
    }

    pub fn input_size(&self) -> u16 {
        match self {
            StakeQuery::EpochInfo { .. } => EPOCH_QUERY_SIZE as u16,
            StakeQuery::UserLockInfo { .. } => USER_LOCK_QUERY_SIZE as u16,
        }
    }

    /// Minimum response length for this query
    pub fn response_size(&self) -> usize {
        match self {
            StakeQuery::EpochInfo { .. } => EPOCH_INFO_RESPONSE_SIZE,
            StakeQuery::UserLockInfo { .. } => USER_LOCK_RESPONSE_SIZE,
        }
    }
}

/// A state-changing contract call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StakeTransaction {
    /// Lock `amount`; the amount travels as the transfer value
    Lock { amount: u64 },
    /// Unlock `amount` that was locked in `locked_epoch`
    Unlock { amount: u64, locked_epoch: u32 },
}

impl StakeTransaction {
    pub fn input_type(&self, protocol: &ProtocolConstants) -> u16 {
        match self {
            StakeTransaction::Lock { .. } => protocol.lock_input_type,
            StakeTransaction::Unlock { .. } => protocol.unlock_input_type,
        }
    }

    pub fn transfer_amount(&self) -> u64 {
        match self {
            StakeTransaction::Lock { amount } => *amount,
            StakeTransaction::Unlock { .. } => 0,
        }
    }

    pub fn payload(&self) -> Vec<u8> {
        match self {
            StakeTransaction::Lock { .. } => Vec::new(),
            StakeTransaction::Unlock {
                amount,
                locked_epoch,
            } => encode_unlock_payload(*amount, *locked_epoch).to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epoch_info_bytes(lock: u64, bonus: u64) -> Vec<u8> {
        let mut bytes = lock.to_le_bytes().to_vec();
        bytes.extend_from_slice(&bonus.to_le_bytes());
        bytes
    }

    #[test]
    fn test_epoch_info_round_trip() {
        let pairs = [
            (0, 0),
            (1000, 2000),
            (u64::MAX, 1),
            (1, u64::MAX),
            (0x0102_0304_0506_0708, 0x8070_6050_4030_2010),
        ];
        for (lock, bonus) in pairs {
            let info = decode_epoch_info_response(&epoch_info_bytes(lock, bonus)).unwrap();
            assert_eq!(info.lock_amount, lock);
            assert_eq!(info.bonus_amount, bonus);
        }
    }

    #[test]
    fn test_decode_user_lock() {
        assert_eq!(decode_user_lock_response(&500u64.to_le_bytes()).unwrap(), 500);
    }

    #[test]
    fn test_short_responses_are_malformed() {
        let err = decode_epoch_info_response(&[0u8; 15]).unwrap_err();
        assert!(matches!(
            err,
            QearnError::MalformedResponse {
                expected: 16,
                actual: 15
            }
        ));

        let err = decode_user_lock_response(&[0u8; 7]).unwrap_err();
        assert!(matches!(
            err,
            QearnError::MalformedResponse {
                expected: 8,
                actual: 7
            }
        ));

        assert!(decode_user_lock_response(&[]).is_err());
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut bytes = 42u64.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0xff; 4]);
        assert_eq!(decode_user_lock_response(&bytes).unwrap(), 42);
    }

    #[test]
    fn test_encode_unlock_payload() {
        let payload = encode_unlock_payload(466_000_000, 120);
        assert_eq!(payload.len(), 12);
        assert_eq!(&payload[..8], &466_000_000u64.to_le_bytes());
        assert_eq!(&payload[8..], &120u32.to_le_bytes());
    }

    #[test]
    fn test_encode_queries() {
        assert_eq!(encode_epoch_query(119), [119, 0, 0, 0]);

        let identity = Identity::from_bytes([7u8; 32]);
        let payload = encode_user_lock_query(&identity, 0x0102_0304);
        assert_eq!(&payload[..32], &[7u8; 32]);
        assert_eq!(&payload[32..], &[4, 3, 2, 1]);
    }

    #[test]
    fn test_query_routing() {
        let protocol = ProtocolConstants::default();
        let identity = Identity::from_bytes([1u8; 32]);

        let epoch = StakeQuery::EpochInfo { epoch: 5 };
        assert_eq!(epoch.input_type(&protocol), 1);
        assert_eq!(epoch.input_size(), 4);
        assert_eq!(epoch.payload().len(), 4);
        assert_eq!(epoch.response_size(), 16);

        let user = StakeQuery::UserLockInfo { identity, epoch: 5 };
        assert_eq!(user.input_type(&protocol), 2);
        assert_eq!(user.input_size(), 36);
        assert_eq!(user.payload().len(), 36);
        assert_eq!(user.response_size(), 8);
    }

    #[test]
    fn test_transaction_shapes() {
        let lock = StakeTransaction::Lock { amount: 50_000_000 };
        assert_eq!(lock.transfer_amount(), 50_000_000);
        assert!(lock.payload().is_empty());

        let unlock = StakeTransaction::Unlock {
            amount: 466_000_000,
            locked_epoch: 120,
        };
        assert_eq!(unlock.transfer_amount(), 0);
        assert_eq!(unlock.payload(), encode_unlock_payload(466_000_000, 120).to_vec());
    }
}
